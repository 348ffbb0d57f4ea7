//! Locations API 路由配置

use actix_web::web;

use super::handlers::{add_auto, add_by_ip, delete_location, get_location, list_locations};

/// 地理位置路由 `/locations`
///
/// - GET /locations - 全部记录，最新在前
/// - GET /locations/add-auto - 以调用方 IP 查询或创建
/// - GET /locations/add/{ip} - 以指定 IP 查询或创建
/// - GET /locations/{id} - 获取单条记录
/// - DELETE /locations/{id} - 删除记录（幂等）
pub fn locations_routes() -> actix_web::Scope {
    web::scope("/locations")
        .route("", web::get().to(list_locations))
        .route("/", web::get().to(list_locations))
        // 固定路径必须在 /{id} 之前
        .route("/add-auto", web::get().to(add_auto))
        .route("/add/{ip}", web::get().to(add_by_ip))
        .route("/{id}", web::get().to(get_location))
        .route("/{id}", web::delete().to(delete_location))
}
