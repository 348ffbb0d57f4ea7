//! Locations API
//!
//! 地理位置记录的查询、创建与删除接口。

mod error_code;
mod handlers;
mod helpers;
mod routes;

pub use error_code::ErrorCode;
pub use handlers::{add_auto, add_by_ip, delete_location, get_location, list_locations};
pub use helpers::{ErrorBody, error_from_geolocator, error_response};
pub use routes::locations_routes;

/// 可信反向代理列表，`add-auto` 推导调用方 IP 时使用
#[derive(Debug, Clone, Default)]
pub struct TrustedProxies(pub Vec<String>);
