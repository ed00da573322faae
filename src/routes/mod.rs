pub mod get_routes;
pub mod post_routes;
pub mod routes_utils;

use super::ODM;
use super::config;
use super::manifest;

use rocket::serde::json::{ Json, Error as JsonError };

use rocket::{Catcher, Request, Route};
pub use routes_utils::*;
use rocket::http::Status;

use rocket::State;

use log::warn;

use get_routes::get_routes;
use post_routes::post_routes;

pub fn routes() -> Vec<Route> {
    let mut routes = get_routes();
    routes.append(&mut post_routes());
    routes
}

pub fn catchers() -> Vec<Catcher> {
    catchers![default_catcher]
}

/// Anything no route answered (unknown path, guard failure) still gets a JSON body
#[catch(default)]
fn default_catcher(status: Status, request: &Request) -> Json<ErrorBody> {
    warn!("{}", format!("Server>>Client:\t{} for {} {}", status, request.method(), request.uri()));
    Json(ErrorBody {
        error: status.reason_lossy().to_string(),
        field: None,
    })
}
