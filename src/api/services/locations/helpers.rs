//! Locations API 帮助函数

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::errors::GeolocatorError;

use super::error_code::ErrorCode;

/// 错误响应体 `{"code": ..., "message": ...}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
}

/// 构建错误响应
pub fn error_response(status: StatusCode, code: ErrorCode, message: &str) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ErrorBody {
            code,
            message: message.to_string(),
        })
}

/// 从 GeolocatorError 构建错误响应
///
/// 服务商拒绝查询时原样返回服务商的错误负载，其余错误使用统一错误体。
pub fn error_from_geolocator(err: &GeolocatorError) -> HttpResponse {
    if let Some(detail) = err.provider_detail() {
        warn!("Provider rejected lookup: {}", err.message());
        return HttpResponse::BadRequest()
            .append_header(("Content-Type", "application/json; charset=utf-8"))
            .json(&detail.raw);
    }

    let status = err.http_status();
    if status.is_server_error() {
        error!("{} ({})", err, err.code());
    } else {
        warn!("{}", err);
    }
    error_response(status, ErrorCode::from(err), err.message())
}
