//! 地理位置服务商模块
//!
//! - `provider`: 服务商抽象与响应分类
//! - `ipstack`: ipstack 兼容 HTTP API 实现

mod ipstack;
mod provider;

pub use ipstack::IpstackProvider;
pub use provider::{GeolocationPayload, GeolocationProvider, classify_response};
