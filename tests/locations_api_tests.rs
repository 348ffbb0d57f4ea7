//! Locations API integration tests
//!
//! HTTP status codes and bodies for the /locations endpoints.

mod common;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use serde_json::Value;

use common::{INVALID_IP, POZNAN_IP, TestEnv, UNAVAILABLE_IP, invalid_ip_payload, setup};
use geolocator::api::services::{TrustedProxies, locations_routes};
use geolocator::storage::LocationRecord;

macro_rules! init_app {
    ($env:expr, $proxies:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($env.service.clone()))
                .app_data(web::Data::new(TrustedProxies($proxies)))
                .service(locations_routes()),
        )
        .await
    };
    ($env:expr) => {
        init_app!($env, Vec::new())
    };
}

async fn seed(env: &TestEnv, ip: &str) -> LocationRecord {
    env.service.resolve_or_create(ip).await.unwrap().record
}

#[actix_rt::test]
async fn test_add_new_ip_returns_201_then_200() {
    let env = setup().await;
    let app = init_app!(env);

    let req = TestRequest::get()
        .uri(&format!("/locations/add/{}", POZNAN_IP))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let first: Value = test::read_body_json(resp).await;
    assert_eq!(first["ip"], POZNAN_IP);
    assert_eq!(first["country_name"], "Poland");
    assert_eq!(first["type"], "ipv4");

    let req = TestRequest::get()
        .uri(&format!("/locations/add/{}", POZNAN_IP))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let second: Value = test::read_body_json(resp).await;
    assert_eq!(second["id"], first["id"]);
    assert_eq!(second["created_at"], first["created_at"]);

    assert_eq!(env.provider.calls(), 1);
}

#[actix_rt::test]
async fn test_add_rejected_ip_returns_provider_payload() {
    let env = setup().await;
    let app = init_app!(env);

    let req = TestRequest::get()
        .uri(&format!("/locations/add/{}", INVALID_IP))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, invalid_ip_payload());

    let req = TestRequest::get().uri("/locations").to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list, Value::Array(vec![]));
}

#[actix_rt::test]
async fn test_add_with_unavailable_provider_returns_502() {
    let env = setup().await;
    let app = init_app!(env);

    let req = TestRequest::get()
        .uri(&format!("/locations/add/{}", UNAVAILABLE_IP))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 4001);
    assert!(body["message"].is_string());

    let req = TestRequest::get().uri("/locations").to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list, Value::Array(vec![]));
}

#[actix_rt::test]
async fn test_record_json_shape() {
    let env = setup().await;
    let record = seed(&env, "203.0.113.7").await;
    let app = init_app!(env);

    let req = TestRequest::get()
        .uri(&format!("/locations/{}", record.id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let object = body.as_object().unwrap();
    for key in [
        "id",
        "ip",
        "type",
        "continent_code",
        "continent_name",
        "country_code",
        "country_name",
        "region_code",
        "region_name",
        "city",
        "zip",
        "latitude",
        "longitude",
        "location",
        "time_zone",
        "currency",
        "connection",
        "security",
        "created_at",
        "updated_at",
    ] {
        assert!(object.contains_key(key), "missing key {}", key);
    }
    assert_eq!(object.len(), 20);
    assert!(body["city"].is_null());
    assert_eq!(body["country_name"], "Testland");
}

#[actix_rt::test]
async fn test_list_newest_first() {
    let env = setup().await;
    let older = seed(&env, "198.51.100.1").await;
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    let newer = seed(&env, "198.51.100.2").await;
    let app = init_app!(env);

    let req = TestRequest::get().uri("/locations").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;

    let ids: Vec<String> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec![newer.id.to_string(), older.id.to_string()]);
}

#[actix_rt::test]
async fn test_get_missing_and_malformed_ids_return_404() {
    let env = setup().await;
    let app = init_app!(env);

    for id in ["5f0c9a52-3f1c-4f0e-9a77-0e2f3d4c5b6a", "not-a-uuid"] {
        let req = TestRequest::get()
            .uri(&format!("/locations/{}", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], 3000);
        assert!(body["message"].as_str().unwrap().contains(id));
    }
}

#[actix_rt::test]
async fn test_delete_returns_204_even_when_missing() {
    let env = setup().await;
    let record = seed(&env, "192.0.2.44").await;
    let app = init_app!(env);
    let uri = format!("/locations/{}", record.id);

    let resp = test::call_service(&app, TestRequest::delete().uri(&uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = test::call_service(&app, TestRequest::get().uri(&uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(&app, TestRequest::delete().uri(&uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = test::call_service(
        &app,
        TestRequest::delete().uri("/locations/garbage").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[actix_rt::test]
async fn test_add_auto_uses_peer_address() {
    let env = setup().await;
    let app = init_app!(env);

    let req = TestRequest::get()
        .uri("/locations/add-auto")
        .peer_addr(format!("{}:40000", POZNAN_IP).parse().unwrap())
        .insert_header(("X-Forwarded-For", "1.2.3.4"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    // 公网直连不信任转发头
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["ip"], POZNAN_IP);
    assert_eq!(body["city"], "Poznań");
}

#[actix_rt::test]
async fn test_add_auto_returns_200_for_existing_and_new() {
    let env = setup().await;
    let app = init_app!(env);

    for _ in 0..2 {
        let req = TestRequest::get()
            .uri("/locations/add-auto")
            .peer_addr("127.0.0.1:40000".parse().unwrap())
            .insert_header(("X-Forwarded-For", format!("{}, 10.0.0.1", POZNAN_IP)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    assert_eq!(env.provider.calls(), 1);
    assert!(env.storage.find_by_ip(POZNAN_IP).await.unwrap().is_some());
}

#[actix_rt::test]
async fn test_add_auto_with_trusted_proxy() {
    let env = setup().await;
    let app = init_app!(env, vec!["10.0.0.0/8".to_string()]);

    let req = TestRequest::get()
        .uri("/locations/add-auto")
        .peer_addr("10.20.30.40:40000".parse().unwrap())
        .insert_header(("X-Real-IP", POZNAN_IP))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["ip"], POZNAN_IP);
}

#[actix_rt::test]
async fn test_add_auto_without_any_address_returns_400() {
    let env = setup().await;
    let app = init_app!(env);

    let req = TestRequest::get().uri("/locations/add-auto").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 3010);
    assert_eq!(env.provider.calls(), 0);
}
