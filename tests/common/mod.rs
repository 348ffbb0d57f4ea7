//! Shared test fixtures: temporary SQLite storage and a scripted provider.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{Value, json};
use tempfile::TempDir;

use geolocator::config::DatabaseConfig;
use geolocator::errors::Result;
use geolocator::services::geoip::classify_response;
use geolocator::services::{GeolocationPayload, GeolocationProvider, LocationService};
use geolocator::storage::{SeaOrmStorage, StorageFactory};

pub const POZNAN_IP: &str = "37.249.212.228";
pub const INVALID_IP: &str = "999.999.999.999";
/// 服务商对该 IP 返回非对象 JSON，视为服务不可用
pub const UNAVAILABLE_IP: &str = "203.0.113.250";

pub fn poznan_payload() -> Value {
    json!({
        "ip": POZNAN_IP,
        "type": "ipv4",
        "continent_code": "EU",
        "continent_name": "Europe",
        "country_code": "PL",
        "country_name": "Poland",
        "region_code": "30",
        "region_name": "Greater Poland",
        "city": "Poznań",
        "zip": "60-001",
        "latitude": 52.40692,
        "longitude": 16.92993,
        "location": {
            "geoname_id": 3088171,
            "capital": "Warsaw",
            "languages": [{ "code": "pl", "name": "Polish", "native": "Polski" }],
            "is_eu": true
        }
    })
}

pub fn invalid_ip_payload() -> Value {
    json!({
        "success": false,
        "error": {
            "code": 106,
            "type": "invalid_ip_address",
            "info": "The IP Address supplied is invalid."
        }
    })
}

/// 按 IP 返回预设响应的服务商，记录调用次数
///
/// 未预设的 IP 返回只有国家名的最小负载。
pub struct MockProvider {
    responses: HashMap<String, Value>,
    calls: AtomicUsize,
}

impl MockProvider {
    pub fn new() -> Self {
        let mut responses = HashMap::new();
        responses.insert(POZNAN_IP.to_string(), poznan_payload());
        responses.insert(INVALID_IP.to_string(), invalid_ip_payload());
        responses.insert(UNAVAILABLE_IP.to_string(), json!("upstream maintenance"));
        Self {
            responses,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GeolocationProvider for MockProvider {
    async fn lookup(&self, ip: &str) -> Result<GeolocationPayload> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let raw = self
            .responses
            .get(ip)
            .cloned()
            .unwrap_or_else(|| json!({ "ip": ip, "country_name": "Testland" }));
        classify_response(raw)
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

pub struct TestEnv {
    // 保持临时目录存活
    pub dir: TempDir,
    pub storage: Arc<SeaOrmStorage>,
    pub provider: Arc<MockProvider>,
    pub service: Arc<LocationService>,
}

pub async fn setup() -> TestEnv {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = DatabaseConfig {
        database_url: dir
            .path()
            .join("geolocations_test.db")
            .to_string_lossy()
            .to_string(),
        ..DatabaseConfig::default()
    };

    let storage = StorageFactory::create(&config)
        .await
        .expect("Failed to create storage");
    let provider = Arc::new(MockProvider::new());
    let service = Arc::new(LocationService::new(storage.clone(), provider.clone()));

    TestEnv {
        dir,
        storage,
        provider,
        service,
    }
}
