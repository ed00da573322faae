use super::*;
use chrono::Utc;
use config::config::StorageBackend;
use manifest::models::{CalendarMonth, ManifestRecord, MonthlySummary};
use ODM::memory::MemoryStore;

use rocket::http::{ContentType, Status};
use rocket::local::asynchronous::Client;
use serde_json::Value;

const FULL_DAY: &str = r#"{
    "tor": "TOR-114",
    "station": "DXB3",
    "plate": "AB-123-CD",
    "startTime": "8:00 AM",
    "departure": "8:20 AM",
    "firstDelivery": { "hour": 9, "minute": 5 },
    "lastDelivery": "15:40",
    "returnTime": "4:30 PM",
    "endTime": "5:00 PM",
    "kmStart": 100,
    "kmEnd": "250",
    "packages": 20,
    "returnedPackages": 2,
    "userId": "driver-1"
}"#;

async fn redo_main() -> Client {
    let mut config = ConfyConfig::default();
    config.storage = StorageBackend::Memory;

    let lift = super::rocket(config, Box::new(MemoryStore::new()));
    Client::tracked(lift).await.unwrap()
}

async fn upload(client: &Client, body: &str) -> ManifestRecord {
    let response = client.post("/manifests")
    .header(ContentType::JSON)
    .body(body)
    .dispatch().await;

    assert_eq!(response.status(), Status::Created);
    response.into_json::<ManifestRecord>().await.unwrap()
}

fn for_user(user_id: &str, tor: &str) -> String {
    FULL_DAY
        .replace("driver-1", user_id)
        .replace("TOR-114", tor)
}

#[rocket::async_test]
async fn test_upload_derives_fields() {
    let client = redo_main().await;
    let response = client.post("/manifests")
    .header(ContentType::JSON)
    .body(FULL_DAY)
    .dispatch().await;

    assert_eq!(response.status(), Status::Created);
    let location = response.headers().get_one("Location").unwrap().to_string();
    let body = response.into_json::<Value>().await.unwrap();

    assert_eq!(body["workingHours"], 8.25);
    assert_eq!(body["driverBreak"], "30 min");
    assert_eq!(body["expenses"], true);
    assert_eq!(body["totalPackages"], 18);
    assert_eq!(body["kmTotal"], 150.0);
    assert_eq!(body["creator"], "driver-1");
    assert_eq!(location, format!("/manifests/{}", body["id"].as_str().unwrap()));
}

#[rocket::async_test]
async fn test_client_cannot_supply_derived_fields() {
    let client = redo_main().await;
    let body = FULL_DAY.replace(r#""tor""#, r#""workingHours": 99, "expenses": true, "tor""#);

    let record = upload(&client, &body).await;
    assert_eq!(record.working_hours, 8.25);
}

#[rocket::async_test]
async fn test_validation_error_names_field() {
    let client = redo_main().await;
    let response = client.post("/manifests")
    .header(ContentType::JSON)
    .body(FULL_DAY.replace(r#""5:00 PM""#, r#""five-ish""#))
    .dispatch().await;

    assert_eq!(response.status(), Status::UnprocessableEntity);
    let body = response.into_json::<Value>().await.unwrap();
    assert_eq!(body["field"], "endTime");
}

#[rocket::async_test]
async fn test_malformed_json_is_bad_request() {
    let client = redo_main().await;
    let response = client.post("/manifests")
    .header(ContentType::JSON)
    .body("{ not json")
    .dispatch().await;

    assert_eq!(response.status(), Status::BadRequest);
}

#[rocket::async_test]
async fn test_get_update_delete() {
    let client = redo_main().await;
    let created = upload(&client, FULL_DAY).await;
    let path = format!("/manifests/{}", created.id.clone().unwrap());

    let fetched = client.get(&path).dispatch().await;
    assert_eq!(fetched.status(), Status::Ok);
    assert_eq!(fetched.into_json::<ManifestRecord>().await.unwrap(), created);

    let shorter = FULL_DAY.replace(r#""5:00 PM""#, r#""4:00 PM""#);
    let updated = client.put(&path)
    .header(ContentType::JSON)
    .body(shorter)
    .dispatch().await;
    assert_eq!(updated.status(), Status::Ok);
    let updated = updated.into_json::<ManifestRecord>().await.unwrap();
    assert_eq!(updated.working_hours, 7.5);
    assert!(!updated.expenses);
    assert_eq!(updated.upload_date, created.upload_date);

    let deleted = client.delete(&path).dispatch().await;
    assert_eq!(deleted.status(), Status::NoContent);

    let gone = client.get(&path).dispatch().await;
    assert_eq!(gone.status(), Status::NotFound);
    let again = client.delete(&path).dispatch().await;
    assert_eq!(again.status(), Status::NotFound);
}

#[rocket::async_test]
async fn test_latest_and_search() {
    let client = redo_main().await;
    for n in 1..=9 {
        upload(&client, &for_user("driver-1", &format!("TOR-{}", n))).await;
    }

    let latest = client.get("/manifests/latest").dispatch().await;
    assert_eq!(latest.status(), Status::Ok);
    assert_eq!(latest.into_json::<Vec<ManifestRecord>>().await.unwrap().len(), 7);

    let all = client.get("/manifests").dispatch().await;
    assert_eq!(all.into_json::<Vec<ManifestRecord>>().await.unwrap().len(), 9);

    let found = client.get("/search/tor-3").dispatch().await;
    let found = found.into_json::<Vec<ManifestRecord>>().await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].tor, "TOR-3");
}

#[rocket::async_test]
async fn test_monthly_summary() {
    let client = redo_main().await;
    upload(&client, &for_user("driver-1", "TOR-1")).await;
    upload(&client, &for_user("driver-1", "TOR-2")).await;
    upload(&client, &for_user("driver-2", "TOR-3")).await;

    let current = CalendarMonth::containing(Utc::now());
    let response = client.get("/users/driver-1/summary").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let summary = response.into_json::<MonthlySummary>().await.unwrap();

    assert_eq!(summary.manifest_count, 2);
    assert_eq!(summary.working_hours, 16.5);
    assert_eq!(summary.km_total, 300.0);
    assert_eq!(summary.total_packages, 36);
    assert_eq!(summary.expenses, 2);
    assert_eq!(summary.current_month_name, current.name());

    let users = client.get("/users/driver-2/manifests").dispatch().await;
    assert_eq!(users.into_json::<Vec<ManifestRecord>>().await.unwrap().len(), 1);
}

#[rocket::async_test]
async fn test_summary_of_an_empty_month() {
    let client = redo_main().await;
    let response = client.get("/users/driver-1/summary?year=2020&month=2").dispatch().await;
    assert_eq!(response.status(), Status::Ok);

    let summary = response.into_json::<MonthlySummary>().await.unwrap();
    assert_eq!(summary.manifest_count, 0);
    assert_eq!(summary.km_total, 0.0);
    assert_eq!(summary.current_month_name, "February");

    let bad = client.get("/users/driver-1/summary?year=2020&month=13").dispatch().await;
    assert_eq!(bad.status(), Status::BadRequest);
}

#[rocket::async_test]
async fn test_summary_rejects_unusable_months() {
    let client = redo_main().await;
    for query in ["year=2020&month=abc", "year=twenty&month=2", "month=-1", "year=262142&month=12"] {
        let uri = format!("/users/driver-1/summary?{}", query);
        let response = client.get(&uri).dispatch().await;
        assert_eq!(response.status(), Status::BadRequest, "{}", query);

        let body = response.into_json::<Value>().await.unwrap();
        assert!(body["error"].is_string(), "{}", query);
    }
}

#[rocket::async_test]
async fn test_oversized_package_count_is_rejected() {
    let client = redo_main().await;
    let response = client.post("/manifests")
    .header(ContentType::JSON)
    .body(FULL_DAY.replace(r#""packages": 20"#, r#""packages": 1e19"#))
    .dispatch().await;

    assert_eq!(response.status(), Status::UnprocessableEntity);
    let body = response.into_json::<Value>().await.unwrap();
    assert_eq!(body["field"], "packages");
}

#[rocket::async_test]
async fn test_unknown_route_is_json() {
    let client = redo_main().await;
    let response = client.get("/nowhere").dispatch().await;

    assert_eq!(response.status(), Status::NotFound);
    let body = response.into_json::<Value>().await.unwrap();
    assert_eq!(body["error"], "Not Found");
}
