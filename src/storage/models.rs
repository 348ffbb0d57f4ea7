use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 一个 IP 地址对应的地理位置记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub id: Uuid,
    pub ip: String,
    #[serde(rename = "type")]
    pub ip_type: Option<String>,
    pub continent_code: Option<String>,
    pub continent_name: Option<String>,
    pub country_code: Option<String>,
    pub country_name: Option<String>,
    pub region_code: Option<String>,
    pub region_name: Option<String>,
    pub city: Option<String>,
    pub zip: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub location: Option<serde_json::Value>,
    pub time_zone: Option<serde_json::Value>,
    pub currency: Option<serde_json::Value>,
    pub connection: Option<serde_json::Value>,
    pub security: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LocationRecord {
    /// 创建一条只有 IP 的空记录，时间戳取当前时间
    pub fn new(ip: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            ip: ip.into(),
            ip_type: None,
            continent_code: None,
            continent_name: None,
            country_code: None,
            country_name: None,
            region_code: None,
            region_name: None,
            city: None,
            zip: None,
            latitude: None,
            longitude: None,
            location: None,
            time_zone: None,
            currency: None,
            connection: None,
            security: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct BackendInfo {
    pub storage_type: String,
}
