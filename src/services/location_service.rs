//! Location service
//!
//! 查询即创建：已有记录直接返回，否则调用服务商并保存结果。
//! HTTP API 与 CLI `lookup` 共用这一层。

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::{GeolocatorError, Result};
use crate::services::geoip::GeolocationProvider;
use crate::storage::{LocationRecord, SeaOrmStorage};
use crate::utils::ip::ClientIp;

/// `resolve_or_create` 的结果
#[derive(Debug, Clone)]
pub struct ResolveOutcome {
    pub record: LocationRecord,
    /// 本次调用是否新建了记录
    pub created: bool,
}

pub struct LocationService {
    storage: Arc<SeaOrmStorage>,
    provider: Arc<dyn GeolocationProvider>,
    /// 同一 IP 的首次查询串行化，保证进程内只调用一次服务商
    ip_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl LocationService {
    pub fn new(storage: Arc<SeaOrmStorage>, provider: Arc<dyn GeolocationProvider>) -> Self {
        Self {
            storage,
            provider,
            ip_locks: DashMap::new(),
        }
    }

    /// 查找 IP 对应的记录，不存在时调用服务商创建
    ///
    /// IP 不做格式校验，原样交给存储和服务商。
    pub async fn resolve_or_create(&self, ip: &str) -> Result<ResolveOutcome> {
        // 先声明后释放：锁守卫和 Arc 都已 drop 后再清理条目，请求被取消时同样生效
        let _release = IpLockRelease {
            locks: &self.ip_locks,
            ip,
        };
        let lock = self.ip_lock(ip);
        let _guard = lock.lock().await;
        self.resolve_locked(ip).await
    }

    /// 以推导出的调用方 IP 执行 [`Self::resolve_or_create`]
    pub async fn resolve_from_connection(&self, client: &ClientIp) -> Result<ResolveOutcome> {
        debug!(
            "Resolving caller ip {} (routable: {})",
            client.ip, client.is_routable
        );
        self.resolve_or_create(&client.ip).await
    }

    async fn resolve_locked(&self, ip: &str) -> Result<ResolveOutcome> {
        if let Some(existing) = self.storage.find_by_ip(ip).await? {
            debug!("Location hit for {}: {}", ip, existing.id);
            return Ok(ResolveOutcome {
                record: existing,
                created: false,
            });
        }

        let payload = self.provider.lookup(ip).await?;
        let outcome = self
            .storage
            .insert_if_absent(&payload.into_record(ip))
            .await?;
        let created = outcome.is_inserted();
        let record = outcome.into_record();

        if created {
            info!(
                "Geolocated {} via {}: {}",
                ip,
                self.provider.name(),
                record.country_name.as_deref().unwrap_or("-")
            );
        }

        Ok(ResolveOutcome { record, created })
    }

    fn ip_lock(&self, ip: &str) -> Arc<Mutex<()>> {
        self.ip_locks
            .entry(ip.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// 全部记录，最新在前
    pub async fn list(&self) -> Result<Vec<LocationRecord>> {
        self.storage.list_newest_first().await
    }

    /// 按 ID 获取，ID 格式非法同样视为不存在
    pub async fn get(&self, id: &str) -> Result<LocationRecord> {
        let not_found = || GeolocatorError::not_found(format!("Location not found: {}", id));

        let Ok(uuid) = Uuid::parse_str(id) else {
            return Err(not_found());
        };

        self.storage.find_by_id(uuid).await?.ok_or_else(not_found)
    }

    /// 幂等删除：记录不存在或 ID 非法都视为成功
    pub async fn delete(&self, id: &str) -> Result<()> {
        let Ok(uuid) = Uuid::parse_str(id) else {
            debug!("Delete ignored, malformed id: {}", id);
            return Ok(());
        };

        self.storage.delete_if_present(uuid).await?;
        Ok(())
    }

    #[cfg(test)]
    fn lock_table_len(&self) -> usize {
        self.ip_locks.len()
    }
}

/// 离开作用域时，若没有其他等待者则移除该 IP 的锁条目
struct IpLockRelease<'a> {
    locks: &'a DashMap<String, Arc<Mutex<()>>>,
    ip: &'a str,
}

impl Drop for IpLockRelease<'_> {
    fn drop(&mut self) {
        self.locks
            .remove_if(self.ip, |_, lock| Arc::strong_count(lock) == 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::services::geoip::GeolocationPayload;
    use crate::storage::StorageFactory;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    struct SlowProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl GeolocationProvider for SlowProvider {
        async fn lookup(&self, _ip: &str) -> Result<GeolocationPayload> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            Ok(GeolocationPayload {
                country_name: Some("Poland".to_string()),
                ..GeolocationPayload::default()
            })
        }

        fn name(&self) -> &'static str {
            "slow"
        }
    }

    async fn service(dir: &TempDir, provider: Arc<SlowProvider>) -> LocationService {
        let config = DatabaseConfig {
            database_url: dir.path().join("unit.db").to_string_lossy().to_string(),
            ..DatabaseConfig::default()
        };
        let storage = StorageFactory::create(&config).await.unwrap();
        LocationService::new(storage, provider)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_lookups_call_provider_once() {
        let dir = TempDir::new().unwrap();
        let provider = Arc::new(SlowProvider {
            calls: AtomicUsize::new(0),
        });
        let service = Arc::new(service(&dir, provider.clone()).await);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.resolve_or_create("37.249.212.228").await })
            })
            .collect();

        let mut created = 0;
        let mut ids = std::collections::HashSet::new();
        for handle in handles {
            let outcome = handle.await.unwrap().unwrap();
            if outcome.created {
                created += 1;
            }
            ids.insert(outcome.record.id);
        }

        assert_eq!(created, 1);
        assert_eq!(ids.len(), 1);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        assert_eq!(service.lock_table_len(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_lookup_releases_lock_entry() {
        let dir = TempDir::new().unwrap();
        let provider = Arc::new(SlowProvider {
            calls: AtomicUsize::new(0),
        });
        let service = service(&dir, provider).await;

        // 服务商耗时 50ms，10ms 后放弃，模拟客户端断开
        let result = tokio::time::timeout(
            std::time::Duration::from_millis(10),
            service.resolve_or_create("37.249.212.228"),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(service.lock_table_len(), 0);
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_and_delete_with_malformed_id() {
        let dir = TempDir::new().unwrap();
        let provider = Arc::new(SlowProvider {
            calls: AtomicUsize::new(0),
        });
        let service = service(&dir, provider).await;

        let err = service.get("not-a-uuid").await.unwrap_err();
        assert!(matches!(err, GeolocatorError::NotFound(_)));
        assert!(service.delete("not-a-uuid").await.is_ok());
    }
}
