//! Locations API 请求处理

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, Result as ActixResult, web};
use std::sync::Arc;
use tracing::{info, trace, warn};

use crate::services::{LocationService, ResolveOutcome};
use crate::utils::ip::extract_client_ip;

use super::TrustedProxies;
use super::error_code::ErrorCode;
use super::helpers::{error_from_geolocator, error_response};

fn json_ok() -> actix_web::HttpResponseBuilder {
    let mut builder = HttpResponse::Ok();
    builder.append_header(("Content-Type", "application/json; charset=utf-8"));
    builder
}

/// 获取全部记录
pub async fn list_locations(
    service: web::Data<Arc<LocationService>>,
) -> ActixResult<impl Responder> {
    trace!("Locations API: list request");

    match service.list().await {
        Ok(records) => {
            trace!("Locations API: returning {} records", records.len());
            Ok(json_ok().json(records))
        }
        Err(e) => Ok(error_from_geolocator(&e)),
    }
}

/// 获取单条记录
pub async fn get_location(
    path: web::Path<String>,
    service: web::Data<Arc<LocationService>>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    trace!("Locations API: get {}", id);

    match service.get(&id).await {
        Ok(record) => Ok(json_ok().json(record)),
        Err(e) => Ok(error_from_geolocator(&e)),
    }
}

/// 删除记录，不存在同样返回 204
pub async fn delete_location(
    path: web::Path<String>,
    service: web::Data<Arc<LocationService>>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();

    match service.delete(&id).await {
        Ok(()) => {
            info!("Locations API: delete {}", id);
            Ok(HttpResponse::NoContent().finish())
        }
        Err(e) => Ok(error_from_geolocator(&e)),
    }
}

/// 以路径中的 IP 查询或创建，新建返回 201，已存在返回 200
pub async fn add_by_ip(
    path: web::Path<String>,
    service: web::Data<Arc<LocationService>>,
) -> ActixResult<impl Responder> {
    let ip = path.into_inner();
    trace!("Locations API: add {}", ip);

    match service.resolve_or_create(&ip).await {
        Ok(ResolveOutcome { record, created }) => {
            let mut builder = if created {
                HttpResponse::Created()
            } else {
                HttpResponse::Ok()
            };
            Ok(builder
                .append_header(("Content-Type", "application/json; charset=utf-8"))
                .json(record))
        }
        Err(e) => Ok(error_from_geolocator(&e)),
    }
}

/// 以调用方 IP 查询或创建，始终返回 200
pub async fn add_auto(
    req: HttpRequest,
    service: web::Data<Arc<LocationService>>,
    trusted_proxies: web::Data<TrustedProxies>,
) -> ActixResult<impl Responder> {
    let Some(client) = extract_client_ip(&req, &trusted_proxies.0) else {
        warn!("Locations API: add-auto without a derivable client IP");
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::ClientIpUnavailable,
            "Unable to determine client IP address",
        ));
    };
    trace!("Locations API: add-auto for {}", client.ip);

    match service.resolve_from_connection(&client).await {
        Ok(outcome) => Ok(json_ok().json(outcome.record)),
        Err(e) => Ok(error_from_geolocator(&e)),
    }
}
