//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::GeolocatorError;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字。按千位分域：
/// - 1000-1099: 通用错误
/// - 3000-3099: 地理位置记录错误
/// - 4000-4099: 服务商错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    // 通用错误 1000-1099
    BadRequest = 1000,
    InternalServerError = 1005,

    // 地理位置记录错误 3000-3099
    LocationNotFound = 3000,
    LocationDatabaseError = 3005,
    ClientIpUnavailable = 3010,

    // 服务商错误 4000-4099
    ProviderLookupFailed = 4000,
    ProviderUnavailable = 4001,
}

impl From<&GeolocatorError> for ErrorCode {
    fn from(err: &GeolocatorError) -> Self {
        match err {
            GeolocatorError::NotFound(_) => ErrorCode::LocationNotFound,
            GeolocatorError::Validation(_) => ErrorCode::BadRequest,
            GeolocatorError::ProviderLookupFailed(..) => ErrorCode::ProviderLookupFailed,
            GeolocatorError::ProviderUnavailable(_) => ErrorCode::ProviderUnavailable,
            GeolocatorError::DatabaseConfig(_)
            | GeolocatorError::DatabaseConnection(_)
            | GeolocatorError::DatabaseOperation(_) => ErrorCode::LocationDatabaseError,
            GeolocatorError::FileOperation(_)
            | GeolocatorError::Serialization(_)
            | GeolocatorError::Config(_) => ErrorCode::InternalServerError,
        }
    }
}
