use super::{*};
use chrono::Utc;
use log::info;
use std::str::FromStr;

use manifest::models::*;
use manifest::service;

///
///All manifests, newest first
///
#[get("/manifests")]
async fn get_manifests(db: &State<StoreState>, route: &Route) -> Result<Json<Vec<ManifestRecord>>, ApiError> {
    info!("{}", format!("Client>>Server:\tListing manifests on route: {}", route));

    let manifests = service::all_manifests(db.store.as_ref()).await?;
    Ok(Json(manifests))
}

///
///The most recent manifests, as many as 'latest_limit'
///
#[get("/manifests/latest")]
async fn get_latest_manifests(db: &State<StoreState>, config: &State<Config>) -> Result<Json<Vec<ManifestRecord>>, ApiError> {
    let manifests = service::latest_manifests(db.store.as_ref(), config.config.latest_limit).await?;
    Ok(Json(manifests))
}

///
///A single manifest
///
///INPUT:  manifest id, DB access
///OUTPUT: the manifest / 404
///
#[get("/manifests/<id>")]
async fn get_manifest(id: &str, db: &State<StoreState>, route: &Route) -> Result<Json<ManifestRecord>, ApiError> {
    info!("{}", format!("Client>>Server:\tGetting manifest {} on route: {}", id, route));

    let manifest = service::get_manifest(db.store.as_ref(), id).await?;
    Ok(Json(manifest))
}

///
///Search manifests by route, station or plate
///
#[get("/search/<query>")]
async fn search(query: &str, db: &State<StoreState>) -> Result<Json<Vec<ManifestRecord>>, ApiError> {
    let manifests = service::search_manifests(db.store.as_ref(), query).await?;
    Ok(Json(manifests))
}

///
///The manifests of one user, newest first
///
#[get("/users/<user_id>/manifests")]
async fn get_user_manifests(user_id: &str, db: &State<StoreState>, route: &Route) -> Result<Json<Vec<ManifestRecord>>, ApiError> {
    info!("{}", format!("Client>>Server:\t{} is listing manifests on route: {}", user_id, route));

    let manifests = service::user_manifests(db.store.as_ref(), user_id).await?;
    Ok(Json(manifests))
}

///
///Monthly summary of a user
///
///INPUT:  user id, optional year and month (defaults to the current UTC month), DB access
///OUTPUT: the summary JSON
///
#[get("/users/<user_id>/summary?<year>&<month>")]
async fn get_monthly_summary(
    user_id: &str,
    year: Option<&str>,
    month: Option<&str>,
    db: &State<StoreState>,
    route: &Route,
) -> Result<Json<MonthlySummary>, ApiError> {
    info!("{}", format!("Client>>Server:\t{} is asking for a summary on route: {}", user_id, route));

    let current = CalendarMonth::containing(Utc::now());
    let year = query_number("year", year, current.year)?;
    let month = query_number("month", month, current.month)?;
    let month = CalendarMonth::new(year, month)?;

    let summary = service::monthly_summary(db.store.as_ref(), user_id, month).await?;
    info!("{}", format!("Server>>Client:\t{} manifests in {} {} for {}",
        summary.manifest_count, summary.current_month_name, summary.year, user_id));
    Ok(Json(summary))
}

/// A missing query value takes `default`, one that does not parse is a 400
fn query_number<T: FromStr>(name: &str, value: Option<&str>, default: T) -> Result<T, ApiError> {
    match value {
        None => Ok(default),
        Some(text) => text.trim().parse::<T>()
            .map_err(|_| ApiError::new(Status::BadRequest, format!("{} must be a number, got '{}'", name, text))),
    }
}

pub fn get_routes() -> Vec<Route> {
    routes![
        get_manifests,
        get_latest_manifests,
        get_manifest,
        search,
        get_user_manifests,
        get_monthly_summary,
    ]
}
