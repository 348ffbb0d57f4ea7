//! 调用方 IP 推导
//!
//! 根据连接地址与反向代理头推导发起请求的客户端 IP：
//! - 可信代理配置（trusted_proxies，单 IP 或 CIDR）
//! - 未配置时对私有地址自动信任转发头

use std::net::{IpAddr, SocketAddr};

use actix_web::HttpRequest;
use actix_web::http::header::HeaderMap;
use tracing::debug;

/// 推导出的调用方 IP
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp {
    pub ip: String,
    /// 是否为公网可路由地址（仅用于日志，不影响查询）
    pub is_routable: bool,
}

impl ClientIp {
    pub fn new(ip: impl Into<String>) -> Self {
        let ip = ip.into();
        let is_routable = ip.parse::<IpAddr>().is_ok_and(|addr| is_routable(&addr));
        Self { ip, is_routable }
    }
}

/// 检查 IP 是否为私有地址或 localhost
pub fn is_private_or_local(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_private() || v4.is_loopback(),
        IpAddr::V6(v6) => {
            v6.is_loopback()
                || (v6.segments()[0] & 0xfe00) == 0xfc00 // fc00::/7 ULA
                || (v6.segments()[0] & 0xffc0) == 0xfe80 // fe80::/10 link-local
        }
    }
}

/// 公网可路由：排除私有、回环、链路本地、未指定、广播、文档保留段
pub fn is_routable(ip: &IpAddr) -> bool {
    if is_private_or_local(ip) || ip.is_unspecified() || ip.is_multicast() {
        return false;
    }
    match ip {
        IpAddr::V4(v4) => !(v4.is_link_local() || v4.is_broadcast() || v4.is_documentation()),
        IpAddr::V6(v6) => !ip_in_cidr(&IpAddr::V6(*v6), "2001:db8::/32"),
    }
}

/// 检查地址是否在可信代理列表中（支持 ip:port 形式）
pub fn is_trusted_proxy(ip: &str, trusted_proxies: &[String]) -> bool {
    let ip_addr = if let Ok(socket_addr) = ip.parse::<SocketAddr>() {
        socket_addr.ip()
    } else if let Ok(ip_addr) = ip.parse::<IpAddr>() {
        ip_addr
    } else {
        return false;
    };

    trusted_proxies.iter().any(|proxy| {
        if proxy.contains('/') {
            ip_in_cidr(&ip_addr, proxy)
        } else {
            proxy
                .parse::<IpAddr>()
                .is_ok_and(|proxy_addr| proxy_addr == ip_addr)
        }
    })
}

/// CIDR 检查
pub fn ip_in_cidr(ip: &IpAddr, cidr: &str) -> bool {
    let Some((network, prefix_len)) = cidr.split_once('/') else {
        return false;
    };
    let Ok(prefix_len) = prefix_len.parse::<u32>() else {
        return false;
    };
    let Ok(network_addr) = network.parse::<IpAddr>() else {
        return false;
    };

    match (ip, network_addr) {
        (IpAddr::V4(ip), IpAddr::V4(net)) if prefix_len <= 32 => {
            let mask = u32::MAX.checked_shl(32 - prefix_len).unwrap_or(0);
            (u32::from(*ip) & mask) == (u32::from(net) & mask)
        }
        (IpAddr::V6(ip), IpAddr::V6(net)) if prefix_len <= 128 => {
            let mask = u128::MAX.checked_shl(128 - prefix_len).unwrap_or(0);
            (u128::from(*ip) & mask) == (u128::from(net) & mask)
        }
        _ => false,
    }
}

/// 推导调用方 IP（核心逻辑，不依赖 actix 请求对象）
///
/// 策略（按优先级）：
/// 1. 配置了 trusted_proxies 且连接地址匹配 → 转发头，缺失时用连接地址
/// 2. 配置了但不匹配 → 连接地址（不信任转发头）
/// 3. 未配置且连接来自私有地址 → 优先转发头
/// 4. 默认 → 连接地址
pub fn derive_client_ip<F>(
    peer_ip: Option<&str>,
    trusted_proxies: &[String],
    get_forwarded_ip: F,
) -> Option<ClientIp>
where
    F: FnOnce() -> Option<String>,
{
    let Some(peer_ip) = peer_ip else {
        // 没有连接地址时只能依赖转发头
        return get_forwarded_ip().map(ClientIp::new);
    };

    if !trusted_proxies.is_empty() {
        if is_trusted_proxy(peer_ip, trusted_proxies) {
            let real_ip = get_forwarded_ip().unwrap_or_else(|| peer_ip.to_string());
            debug!("Trusted proxy {}: client ip {}", peer_ip, real_ip);
            return Some(ClientIp::new(real_ip));
        }
        debug!("Peer {} not in trusted_proxies, using peer address", peer_ip);
        return Some(ClientIp::new(peer_ip));
    }

    if let Ok(ip_addr) = peer_ip.parse::<IpAddr>()
        && is_private_or_local(&ip_addr)
    {
        if let Some(real_ip) = get_forwarded_ip() {
            debug!("Private peer {}, using forwarded ip {}", peer_ip, real_ip);
            return Some(ClientIp::new(real_ip));
        }
        debug!("Private peer {} without forwarded headers", peer_ip);
    }

    Some(ClientIp::new(peer_ip))
}

/// 从 HttpRequest 推导调用方 IP
pub fn extract_client_ip(req: &HttpRequest, trusted_proxies: &[String]) -> Option<ClientIp> {
    let conn_info = req.connection_info();
    derive_client_ip(conn_info.peer_addr(), trusted_proxies, || {
        extract_forwarded_ip_from_headers(req.headers())
    })
}

/// 从请求头提取转发的 IP：X-Forwarded-For 第一跳，其次 X-Real-IP
pub fn extract_forwarded_ip_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
}
