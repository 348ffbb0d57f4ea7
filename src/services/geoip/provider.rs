//! 地理位置服务商抽象层
//!
//! 服务商只负责把一个 IP 变成 [`GeolocationPayload`] 或错误；
//! 原始 JSON 的形状判断集中在 [`classify_response`]。

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::errors::{GeolocatorError, ProviderErrorDetail, Result};
use crate::storage::LocationRecord;

/// 地理位置查询 trait
#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    /// 查询 IP 的地理位置
    async fn lookup(&self, ip: &str) -> Result<GeolocationPayload>;

    /// provider 名称（用于日志）
    fn name(&self) -> &'static str;
}

/// 服务商返回的地理位置数据
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GeolocationPayload {
    #[serde(rename = "type", default)]
    pub ip_type: Option<String>,
    #[serde(default)]
    pub continent_code: Option<String>,
    #[serde(default)]
    pub continent_name: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub country_name: Option<String>,
    #[serde(default)]
    pub region_code: Option<String>,
    #[serde(default)]
    pub region_name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub zip: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub latitude: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub longitude: Option<String>,
    #[serde(default)]
    pub location: Option<Value>,
    #[serde(default)]
    pub time_zone: Option<Value>,
    #[serde(default)]
    pub currency: Option<Value>,
    #[serde(default)]
    pub connection: Option<Value>,
    #[serde(default)]
    pub security: Option<Value>,
}

impl GeolocationPayload {
    /// 转换为新的存储记录，`ip` 使用调用方请求的原始值
    pub fn into_record(self, ip: &str) -> LocationRecord {
        LocationRecord {
            ip_type: self.ip_type,
            continent_code: self.continent_code,
            continent_name: self.continent_name,
            country_code: self.country_code,
            country_name: self.country_name,
            region_code: self.region_code,
            region_name: self.region_name,
            city: self.city,
            zip: self.zip,
            latitude: self.latitude,
            longitude: self.longitude,
            location: non_null(self.location),
            time_zone: non_null(self.time_zone),
            currency: non_null(self.currency),
            connection: non_null(self.connection),
            security: non_null(self.security),
            ..LocationRecord::new(ip)
        }
    }
}

fn non_null(value: Option<Value>) -> Option<Value> {
    value.filter(|v| !v.is_null())
}

/// 经纬度等字段服务商可能返回数字，统一存为十进制字符串
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// 对服务商原始响应分类
///
/// - 非 JSON 对象 → `ProviderUnavailable`
/// - 含 `success` 字段 → `ProviderLookupFailed`（保留原始负载）
/// - 其余按地理位置数据解析
pub fn classify_response(payload: Value) -> Result<GeolocationPayload> {
    let Some(object) = payload.as_object() else {
        return Err(GeolocatorError::provider_unavailable(
            "provider returned a non-object JSON response",
        ));
    };

    if object.contains_key("success") {
        return Err(GeolocatorError::provider_lookup_failed(
            ProviderErrorDetail::from_payload(payload),
        ));
    }

    serde_json::from_value(payload).map_err(|e| {
        GeolocatorError::provider_unavailable(format!("unparsable provider response: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn poznan_payload() -> Value {
        json!({
            "ip": "37.249.212.228",
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
                "country_flag_emoji": "🇵🇱"
            },
            "time_zone": null
        })
    }

    #[test]
    fn test_classify_geolocation_payload() {
        let payload = classify_response(poznan_payload()).unwrap();

        assert_eq!(payload.ip_type.as_deref(), Some("ipv4"));
        assert_eq!(payload.country_name.as_deref(), Some("Poland"));
        assert_eq!(payload.city.as_deref(), Some("Poznań"));
        assert_eq!(payload.latitude.as_deref(), Some("52.40692"));
        assert_eq!(payload.longitude.as_deref(), Some("16.92993"));
        assert_eq!(payload.location.as_ref().unwrap()["capital"], "Warsaw");
        assert!(payload.currency.is_none());
    }

    #[test]
    fn test_classify_error_payload() {
        let raw = json!({
            "success": false,
            "error": {
                "code": 106,
                "type": "invalid_ip_address",
                "info": "The IP Address supplied is invalid."
            }
        });

        let err = classify_response(raw.clone()).unwrap_err();
        let detail = err.provider_detail().expect("provider detail");
        assert_eq!(detail.raw, raw);
        assert_eq!(detail.code, Some(106));
    }

    #[test]
    fn test_classify_non_object_is_unavailable() {
        let err = classify_response(json!("rate limited")).unwrap_err();
        assert!(matches!(err, GeolocatorError::ProviderUnavailable(_)));
    }

    #[test]
    fn test_classify_wrong_field_types_is_unavailable() {
        let err = classify_response(json!({ "country_name": 42 })).unwrap_err();
        assert!(matches!(err, GeolocatorError::ProviderUnavailable(_)));
    }

    #[test]
    fn test_latitude_accepts_strings() {
        let payload = classify_response(json!({ "latitude": "52.4", "zip": 61100 })).unwrap();
        assert_eq!(payload.latitude.as_deref(), Some("52.4"));
        assert_eq!(payload.zip.as_deref(), Some("61100"));
    }

    #[test]
    fn test_into_record_uses_requested_ip() {
        let record = classify_response(poznan_payload())
            .unwrap()
            .into_record("37.249.212.228");

        assert_eq!(record.ip, "37.249.212.228");
        assert_eq!(record.country_code.as_deref(), Some("PL"));
        assert_eq!(record.created_at, record.updated_at);
        // JSON null 不落库
        assert!(record.time_zone.is_none());
        assert!(record.location.is_some());
    }
}
