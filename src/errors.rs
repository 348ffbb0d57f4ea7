use std::fmt;

use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};

/// 地理位置服务商返回的错误详情
///
/// `raw` 保留服务商返回的原始 JSON，对外原样透传。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderErrorDetail {
    pub code: Option<i64>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub info: Option<String>,
    pub raw: serde_json::Value,
}

impl ProviderErrorDetail {
    /// 从服务商错误负载（带 `success` 字段的 JSON）解析
    pub fn from_payload(payload: serde_json::Value) -> Self {
        let error = &payload["error"];
        Self {
            code: error["code"].as_i64(),
            kind: error["type"].as_str().map(String::from),
            info: error["info"].as_str().map(String::from),
            raw: payload,
        }
    }

    fn summary(&self) -> String {
        match (&self.kind, &self.info) {
            (Some(kind), Some(info)) => format!("{}: {}", kind, info),
            (Some(kind), None) => kind.clone(),
            (None, Some(info)) => info.clone(),
            (None, None) => "provider returned an error payload".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum GeolocatorError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    Validation(String),
    NotFound(String),
    Serialization(String),
    Config(String),
    ProviderLookupFailed(ProviderErrorDetail, String),
    ProviderUnavailable(String),
}

impl GeolocatorError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            GeolocatorError::DatabaseConfig(_) => "E001",
            GeolocatorError::DatabaseConnection(_) => "E002",
            GeolocatorError::DatabaseOperation(_) => "E003",
            GeolocatorError::FileOperation(_) => "E004",
            GeolocatorError::Validation(_) => "E005",
            GeolocatorError::NotFound(_) => "E006",
            GeolocatorError::Serialization(_) => "E007",
            GeolocatorError::Config(_) => "E008",
            GeolocatorError::ProviderLookupFailed(..) => "E009",
            GeolocatorError::ProviderUnavailable(_) => "E010",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            GeolocatorError::DatabaseConfig(_) => "Database Configuration Error",
            GeolocatorError::DatabaseConnection(_) => "Database Connection Error",
            GeolocatorError::DatabaseOperation(_) => "Database Operation Error",
            GeolocatorError::FileOperation(_) => "File Operation Error",
            GeolocatorError::Validation(_) => "Validation Error",
            GeolocatorError::NotFound(_) => "Resource Not Found",
            GeolocatorError::Serialization(_) => "Serialization Error",
            GeolocatorError::Config(_) => "Configuration Error",
            GeolocatorError::ProviderLookupFailed(..) => "Provider Lookup Failed",
            GeolocatorError::ProviderUnavailable(_) => "Provider Unavailable",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            GeolocatorError::DatabaseConfig(msg) => msg,
            GeolocatorError::DatabaseConnection(msg) => msg,
            GeolocatorError::DatabaseOperation(msg) => msg,
            GeolocatorError::FileOperation(msg) => msg,
            GeolocatorError::Validation(msg) => msg,
            GeolocatorError::NotFound(msg) => msg,
            GeolocatorError::Serialization(msg) => msg,
            GeolocatorError::Config(msg) => msg,
            GeolocatorError::ProviderLookupFailed(_, msg) => msg,
            GeolocatorError::ProviderUnavailable(msg) => msg,
        }
    }

    /// 映射到 HTTP 状态码
    pub fn http_status(&self) -> StatusCode {
        match self {
            GeolocatorError::Validation(_) | GeolocatorError::ProviderLookupFailed(..) => {
                StatusCode::BAD_REQUEST
            }
            GeolocatorError::NotFound(_) => StatusCode::NOT_FOUND,
            GeolocatorError::ProviderUnavailable(_) => StatusCode::BAD_GATEWAY,
            GeolocatorError::DatabaseConfig(_)
            | GeolocatorError::DatabaseConnection(_)
            | GeolocatorError::DatabaseOperation(_)
            | GeolocatorError::FileOperation(_)
            | GeolocatorError::Serialization(_)
            | GeolocatorError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 服务商拒绝查询时的原始错误详情
    pub fn provider_detail(&self) -> Option<&ProviderErrorDetail> {
        match self {
            GeolocatorError::ProviderLookupFailed(detail, _) => Some(detail),
            _ => None,
        }
    }

    /// 格式化为彩色输出（用于 Server 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for GeolocatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for GeolocatorError {}

// 便捷的构造函数
impl GeolocatorError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        GeolocatorError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        GeolocatorError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        GeolocatorError::DatabaseOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        GeolocatorError::FileOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        GeolocatorError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        GeolocatorError::NotFound(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        GeolocatorError::Serialization(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        GeolocatorError::Config(msg.into())
    }

    pub fn provider_lookup_failed(detail: ProviderErrorDetail) -> Self {
        let summary = detail.summary();
        GeolocatorError::ProviderLookupFailed(detail, summary)
    }

    pub fn provider_unavailable<T: Into<String>>(msg: T) -> Self {
        GeolocatorError::ProviderUnavailable(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for GeolocatorError {
    fn from(err: sea_orm::DbErr) -> Self {
        GeolocatorError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for GeolocatorError {
    fn from(err: std::io::Error) -> Self {
        GeolocatorError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for GeolocatorError {
    fn from(err: serde_json::Error) -> Self {
        GeolocatorError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GeolocatorError>;
