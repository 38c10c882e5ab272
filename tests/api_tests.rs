use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, SecondsFormat, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use fleet_booking::config::EnvironmentConfig;
use fleet_booking::{create_app_router, AppState};

// Función helper para crear la app de test con store en memoria
fn create_test_app() -> Router {
    create_app_router(AppState::in_memory(EnvironmentConfig::default()))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

fn iso(t: chrono::DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

async fn register(app: &Router, name: &str, capacity_kg: f64, tyres: i32) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/vehicles",
        Some(json!({ "name": name, "capacityKg": capacity_kg, "tyres": tyres })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["vehicle"]["id"].as_str().unwrap().to_string()
}

async fn book(app: &Router, vehicle_id: &str, from: &str, to: &str, start: &str) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        "/api/bookings",
        Some(json!({
            "vehicleId": vehicle_id,
            "customerId": "acme-logistics",
            "fromPincode": from,
            "toPincode": to,
            "startTime": start
        })),
    )
    .await
}

#[tokio::test]
async fn test_ping() {
    let app = create_test_app();
    let (status, body) = send(&app, "GET", "/api/ping", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "ping");
}

#[tokio::test]
async fn test_end_to_end_scenario() {
    let app = create_test_app();
    let vehicle_id = register(&app, "Tata 407", 500.0, 6).await;

    let start = iso(Utc::now() + Duration::minutes(5));
    let uri = format!(
        "/api/vehicles/available?capacityRequired=200&fromPincode=474009&toPincode=410099&startTime={}",
        start.replace('+', "%2B")
    );
    let (status, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["estimatedRideDurationHours"], 22);
    let available: Vec<&str> = body["available"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["id"].as_str().unwrap())
        .collect();
    assert_eq!(available, vec![vehicle_id.as_str()]);

    let (status, body) = book(&app, &vehicle_id, "474009", "410099", &start).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["booking"]["status"], "active");
    assert_eq!(body["booking"]["estimatedRideDurationHours"], 22);
    assert_eq!(body["booking"]["vehicle"]["name"], "Tata 407");
    assert_eq!(body["booking"]["vehicle"]["capacityKg"], 500.0);

    let (status, body) = book(&app, &vehicle_id, "474009", "410099", &start).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    // Tampoco aparece en una búsqueda que se solapa
    let (_, body) = send(&app, "GET", &uri, None).await;
    assert!(body["available"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_register_vehicle_validation() {
    let app = create_test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/vehicles",
        Some(json!({ "name": "", "capacityKg": 500, "tyres": 6 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = send(
        &app,
        "POST",
        "/api/vehicles",
        Some(json!({ "name": "Eicher", "capacityKg": 0, "tyres": 6 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/api/vehicles",
        Some(json!({ "name": "Eicher", "capacityKg": 500, "tyres": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "POST", "/api/vehicles", Some(json!({ "name": "Eicher" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_list_vehicles_newest_first() {
    let app = create_test_app();
    let first = register(&app, "first", 100.0, 4).await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = register(&app, "second", 200.0, 6).await;

    let (status, body) = send(&app, "GET", "/api/vehicles", None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body["vehicles"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![second.as_str(), first.as_str()]);
}

#[tokio::test]
async fn test_availability_validation() {
    let app = create_test_app();
    let start = iso(Utc::now());

    let cases = [
        "/api/vehicles/available".to_string(),
        format!("/api/vehicles/available?capacityRequired=0&fromPincode=1&toPincode=2&startTime={}", start),
        format!("/api/vehicles/available?capacityRequired=10&fromPincode=abc&toPincode=2&startTime={}", start),
        "/api/vehicles/available?capacityRequired=10&fromPincode=1&toPincode=2&startTime=tomorrow".to_string(),
    ];
    for uri in cases {
        let (status, body) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn test_search_is_idempotent() {
    let app = create_test_app();
    register(&app, "A", 300.0, 4).await;
    register(&app, "B", 900.0, 10).await;

    let uri = format!(
        "/api/vehicles/available?capacityRequired=250&fromPincode=100&toPincode=110&startTime={}",
        iso(Utc::now() + Duration::hours(1))
    );
    let (_, first) = send(&app, "GET", &uri, None).await;
    let (_, second) = send(&app, "GET", &uri, None).await;
    assert_eq!(first, second);
    assert_eq!(first["available"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_booking_validation_and_not_found() {
    let app = create_test_app();
    let vehicle_id = register(&app, "Tata 407", 500.0, 6).await;
    let start = iso(Utc::now() + Duration::hours(1));

    let (status, _) = book(&app, &vehicle_id, "1", "2", "not-a-date").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = book(&app, &vehicle_id, "", "2", &start).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = book(&app, &vehicle_id, "north", "2", &start).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = book(&app, &uuid::Uuid::new_v4().to_string(), "1", "2", &start).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, _) = book(&app, "64f1c2aa", "1", "2", &start).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_touching_bookings_are_allowed() {
    let app = create_test_app();
    let vehicle_id = register(&app, "Tata 407", 500.0, 6).await;
    let start = Utc::now() + Duration::hours(1);

    // 100 -> 104: 4 horas
    let (status, _) = book(&app, &vehicle_id, "100", "104", &iso(start)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = book(&app, &vehicle_id, "100", "104", &iso(start + Duration::hours(4))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = book(&app, &vehicle_id, "100", "102", &iso(start + Duration::hours(3))).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_cancel_frees_interval() {
    let app = create_test_app();
    let vehicle_id = register(&app, "Tata 407", 500.0, 6).await;
    let start = iso(Utc::now() + Duration::hours(2));

    let (_, body) = book(&app, &vehicle_id, "100", "110", &start).await;
    let booking_id = body["booking"]["id"].as_str().unwrap().to_string();

    let (status, _) = book(&app, &vehicle_id, "100", "105", &start).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(&app, "DELETE", &format!("/api/bookings/{}", booking_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["booking"]["id"], booking_id.as_str());

    let (status, _) = book(&app, &vehicle_id, "100", "105", &start).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(&app, "DELETE", &format!("/api/bookings/{}", booking_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_vehicle_guard() {
    let app = create_test_app();
    let vehicle_id = register(&app, "Tata 407", 500.0, 6).await;

    let (_, body) = book(&app, &vehicle_id, "100", "103", &iso(Utc::now() + Duration::hours(1))).await;
    let booking_id = body["booking"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, "DELETE", &format!("/api/vehicles/{}", vehicle_id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    send(&app, "DELETE", &format!("/api/bookings/{}", booking_id), None).await;

    let (status, body) = send(&app, "DELETE", &format!("/api/vehicles/{}", vehicle_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["vehicle"]["id"], vehicle_id.as_str());

    let (status, _) = send(&app, "DELETE", &format!("/api/vehicles/{}", vehicle_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_vehicle_allowed_after_booking_ended() {
    let app = create_test_app();
    let vehicle_id = register(&app, "Tata 407", 500.0, 6).await;

    let (status, _) = book(&app, &vehicle_id, "100", "102", &iso(Utc::now() - Duration::hours(5))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(&app, "DELETE", &format!("/api/vehicles/{}", vehicle_id), None).await;
    assert_eq!(status, StatusCode::OK);

    // La reserva pasada sigue listada, sin datos de vehículo
    let (_, body) = send(&app, "GET", "/api/bookings", None).await;
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert!(items[0]["vehicle"].is_null());
    assert_eq!(items[0]["vehicleId"], vehicle_id.as_str());
}

#[tokio::test]
async fn test_list_bookings_newest_first_and_capped() {
    let app = create_test_app();
    let vehicle_id = register(&app, "Ashok Leyland", 2000.0, 10).await;
    let base = Utc::now() + Duration::hours(1);

    let mut created = Vec::new();
    for i in 0..27 {
        let (status, body) = book(&app, &vehicle_id, "100", "101", &iso(base + Duration::hours(i * 2))).await;
        assert_eq!(status, StatusCode::CREATED);
        created.push(body["booking"]["id"].as_str().unwrap().to_string());
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }

    let (status, body) = send(&app, "GET", "/api/bookings", None).await;
    assert_eq!(status, StatusCode::OK);
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 25);
    assert_eq!(items[0]["id"], created.last().unwrap().as_str());
    assert_eq!(items[0]["vehicle"]["name"], "Ashok Leyland");

    let (_, body) = send(&app, "GET", "/api/bookings?limit=3", None).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 3);

    let (status, _) = send(&app, "GET", "/api/bookings?limit=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_query_string_uses_error_envelope() {
    let app = create_test_app();
    let start = iso(Utc::now());

    let uri = format!(
        "/api/vehicles/available?capacityRequired=1&capacityRequired=2&fromPincode=1&toPincode=2&startTime={}",
        start
    );
    let (status, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["message"].as_str().unwrap().contains("capacityRequired"));

    let (status, body) = send(&app, "GET", "/api/bookings?limit=1&limit=2", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_unknown_vehicle_reported_before_bad_pincode() {
    let app = create_test_app();
    let start = iso(Utc::now() + Duration::hours(1));

    let (status, body) = book(&app, &uuid::Uuid::new_v4().to_string(), "north", "2", &start).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_start_time_without_offset_is_utc() {
    let app = create_test_app();
    let vehicle_id = register(&app, "Tata 407", 500.0, 6).await;

    let uri = "/api/vehicles/available?capacityRequired=100&fromPincode=100&toPincode=103&startTime=2030-01-01T10:00:00";
    let (status, body) = send(&app, "GET", uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["estimatedRideDurationHours"], 3);

    let (status, body) = book(&app, &vehicle_id, "100", "103", "2030-01-01T10:00:00").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["booking"]["endTime"], "2030-01-01T13:00:00Z");
}
