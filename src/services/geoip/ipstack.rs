//! ipstack 兼容 HTTP API 实现
//!
//! 请求格式：`GET {base_url}/{ip}?access_key={access_key}`
//!
//! IP 作为单个路径段编码，`#`、`?`、空格等字符原样送达服务商。

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, trace, warn};
use ureq::Agent;
use url::Url;

use super::provider::{GeolocationPayload, GeolocationProvider, classify_response};
use crate::config::ProviderConfig;
use crate::errors::{GeolocatorError, Result};

pub struct IpstackProvider {
    agent: Agent,
    base_url: String,
    access_key: String,
}

impl IpstackProvider {
    pub fn new(config: &ProviderConfig) -> Self {
        // 非 2xx 不直接报错：部分兼容服务用 4xx 返回 `success: false` 负载
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .http_status_as_error(false)
            .build()
            .into();

        if config.access_key.is_empty() {
            warn!("Provider access key is empty, lookups will likely be rejected");
        }

        Self {
            agent,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_key: config.access_key.clone(),
        }
    }

    fn lookup_url(&self, ip: &str) -> Result<Url> {
        let invalid_base = || {
            GeolocatorError::provider_unavailable(format!(
                "invalid provider base_url: {}",
                self.base_url
            ))
        };

        let mut url = Url::parse(&self.base_url).map_err(|_| invalid_base())?;
        url.path_segments_mut()
            .map_err(|_| invalid_base())?
            .pop_if_empty()
            .push(ip);
        url.query_pairs_mut()
            .append_pair("access_key", &self.access_key);
        Ok(url)
    }

    /// 同步请求（在 spawn_blocking 中调用）
    fn fetch_sync(agent: Agent, url: String, ip: String) -> Result<GeolocationPayload> {
        let resp = agent.get(&url).call().map_err(|e| {
            warn!("Provider request for {} failed: {}", ip, e);
            GeolocatorError::provider_unavailable(format!("provider request failed: {}", e))
        })?;

        let status = resp.status();
        let json: serde_json::Value = resp.into_body().read_json().map_err(|e| {
            warn!("Provider response for {} is not JSON (status {}): {}", ip, status, e);
            GeolocatorError::provider_unavailable(format!("provider response parse failed: {}", e))
        })?;

        if !status.is_success() && json.get("success").is_none() {
            warn!("Provider returned status {} for {}", status, ip);
            return Err(GeolocatorError::provider_unavailable(format!(
                "provider returned HTTP {}",
                status
            )));
        }

        trace!("Provider response for {}: {}", ip, json);
        classify_response(json)
    }
}

#[async_trait]
impl GeolocationProvider for IpstackProvider {
    async fn lookup(&self, ip: &str) -> Result<GeolocationPayload> {
        debug!("Looking up {} via {}", ip, self.name());

        let agent = self.agent.clone();
        let url = self.lookup_url(ip)?.to_string();
        let ip = ip.to_string();

        tokio::task::spawn_blocking(move || Self::fetch_sync(agent, url, ip))
            .await
            .map_err(|e| {
                GeolocatorError::provider_unavailable(format!("provider task failed: {}", e))
            })?
    }

    fn name(&self) -> &'static str {
        "ipstack"
    }
}
