use super::{*};
use chrono::Utc;
use rocket::response::status::Created;
use log::{error, info};

use manifest::models::*;
use manifest::service;

///
///Derives and uploads a new manifest
///
///INPUT:  manifest form JSON, DB access
///OUTPUT: 201 with the stored manifest / 422 naming the bad field
///
#[post("/manifests", format = "json", data = "<form>")]
async fn post_manifest(
    form: Result<Json<ManifestInput>, JsonError<'_>>,
    db: &State<StoreState>,
    config: &State<Config>,
    route: &Route,
) -> Result<Created<Json<ManifestRecord>>, ApiError> {
    let input = json_body(form)?;
    info!("{}", format!("Client>>Server:\t{} is uploading a manifest on route: {}", input.user_id, route));

    let manifest = match service::create_manifest(db.store.as_ref(), &config.config.rules, &input, Utc::now()).await {
        Ok(value) => value,
        Err(value) => {
            error!("{}", format!("Manifest upload for {} failed: {}", input.user_id, value));
            return Err(value.into());
        }
    };

    let location = format!("/manifests/{}", manifest.id.clone().unwrap_or_default());
    Ok(Created::new(location).body(Json(manifest)))
}

///
///Re-derives an existing manifest from a full form
///
#[put("/manifests/<id>", format = "json", data = "<form>")]
async fn put_manifest(
    id: &str,
    form: Result<Json<ManifestInput>, JsonError<'_>>,
    db: &State<StoreState>,
    config: &State<Config>,
    route: &Route,
) -> Result<Json<ManifestRecord>, ApiError> {
    let input = json_body(form)?;
    info!("{}", format!("Client>>Server:\tUpdating manifest {} on route: {}", id, route));

    let manifest = service::update_manifest(db.store.as_ref(), &config.config.rules, id, &input).await?;
    Ok(Json(manifest))
}

///
///Deletes a manifest
///
///INPUT:  manifest id, DB access
///OUTPUT: 204 / 404
///
#[delete("/manifests/<id>")]
async fn delete_manifest(id: &str, db: &State<StoreState>, route: &Route) -> Result<Status, ApiError> {
    service::delete_manifest(db.store.as_ref(), id).await?;

    info!("{}", format!("Server>>Client:\tApproving action {} for {}", route, id));
    Ok(Status::NoContent)
}

pub fn post_routes() -> Vec<Route> {
    routes![post_manifest, put_manifest, delete_manifest]
}
