//! SeaOrmStorage tests
//!
//! First-writer-wins insertion, ordering and deletion on SQLite.

mod common;

use chrono::{Duration, Utc};
use geolocator::config::DatabaseConfig;
use geolocator::storage::{InsertOutcome, LocationRecord, StorageFactory};
use serde_json::json;
use uuid::Uuid;

use common::setup;

fn record_created_at(ip: &str, minutes_ago: i64) -> LocationRecord {
    let mut record = LocationRecord::new(ip);
    record.created_at = Utc::now() - Duration::minutes(minutes_ago);
    record.updated_at = record.created_at;
    record
}

#[tokio::test]
async fn test_insert_then_find_by_ip_and_id() {
    let env = setup().await;
    let mut record = LocationRecord::new("8.8.8.8");
    record.country_code = Some("US".to_string());
    record.connection = Some(json!({ "asn": 15169, "isp": "Google LLC" }));

    let outcome = env.storage.insert_if_absent(&record).await.unwrap();
    assert!(outcome.is_inserted());

    let by_ip = env.storage.find_by_ip("8.8.8.8").await.unwrap().unwrap();
    let by_id = env.storage.find_by_id(record.id).await.unwrap().unwrap();
    assert_eq!(by_ip, by_id);
    assert_eq!(by_ip.connection.unwrap()["asn"], 15169);
}

#[tokio::test]
async fn test_second_insert_for_same_ip_keeps_first_record() {
    let env = setup().await;
    let first = LocationRecord::new("1.1.1.1");
    let mut second = LocationRecord::new("1.1.1.1");
    second.city = Some("Elsewhere".to_string());

    env.storage.insert_if_absent(&first).await.unwrap();
    let outcome = env.storage.insert_if_absent(&second).await.unwrap();

    match outcome {
        InsertOutcome::AlreadyExists(existing) => {
            assert_eq!(existing.id, first.id);
            assert!(existing.city.is_none());
        }
        InsertOutcome::Inserted(_) => panic!("duplicate ip must not be inserted"),
    }
    assert_eq!(env.storage.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let env = setup().await;
    for (ip, minutes_ago) in [("10.0.0.2", 5), ("10.0.0.1", 10), ("10.0.0.3", 1)] {
        env.storage
            .insert_if_absent(&record_created_at(ip, minutes_ago))
            .await
            .unwrap();
    }

    let ips: Vec<String> = env
        .storage
        .list_newest_first()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.ip)
        .collect();

    assert_eq!(ips, vec!["10.0.0.3", "10.0.0.2", "10.0.0.1"]);
}

#[tokio::test]
async fn test_list_empty_store() {
    let env = setup().await;
    assert!(env.storage.list_newest_first().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_if_present_reports_whether_a_row_was_removed() {
    let env = setup().await;
    let record = LocationRecord::new("9.9.9.9");
    env.storage.insert_if_absent(&record).await.unwrap();

    assert!(env.storage.delete_if_present(record.id).await.unwrap());
    assert!(!env.storage.delete_if_present(record.id).await.unwrap());
    assert!(!env.storage.delete_if_present(Uuid::new_v4()).await.unwrap());
    assert_eq!(env.storage.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_reopening_database_keeps_records() {
    let env = setup().await;
    let record = LocationRecord::new("4.4.4.4");
    env.storage.insert_if_absent(&record).await.unwrap();

    let config = DatabaseConfig {
        database_url: env
            .dir
            .path()
            .join("geolocations_test.db")
            .to_string_lossy()
            .to_string(),
        ..DatabaseConfig::default()
    };
    let reopened = StorageFactory::create(&config).await.unwrap();

    let found = reopened.find_by_ip("4.4.4.4").await.unwrap().unwrap();
    assert_eq!(found.id, record.id);
    assert_eq!(reopened.backend_info().storage_type, "sqlite");
}
