//! Query operations for SeaOrmStorage
//!
//! This module contains all read-only database operations.

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use tracing::{debug, trace};
use uuid::Uuid;

use super::converters::model_to_record;
use super::{SeaOrmStorage, retry};
use crate::errors::{GeolocatorError, Result};
use crate::storage::LocationRecord;

use migration::entities::location;

impl SeaOrmStorage {
    /// 按 IP 精确查找
    pub async fn find_by_ip(&self, ip: &str) -> Result<Option<LocationRecord>> {
        let db = &self.db;
        let ip_owned = ip.to_string();

        let model = retry::with_retry(&format!("find_by_ip({})", ip), self.retry_config, || async {
            location::Entity::find()
                .filter(location::Column::Ip.eq(ip_owned.as_str()))
                .one(db)
                .await
        })
        .await
        .map_err(|e| GeolocatorError::database_operation(format!("按 IP 查询失败: {}", e)))?;

        trace!("find_by_ip({}) hit={}", ip, model.is_some());
        Ok(model.map(model_to_record))
    }

    /// 按 ID 查找
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<LocationRecord>> {
        let db = &self.db;

        let model = retry::with_retry(&format!("find_by_id({})", id), self.retry_config, || async {
            location::Entity::find_by_id(id).one(db).await
        })
        .await
        .map_err(|e| GeolocatorError::database_operation(format!("按 ID 查询失败: {}", e)))?;

        Ok(model.map(model_to_record))
    }

    /// 全部记录，按创建时间倒序
    pub async fn list_newest_first(&self) -> Result<Vec<LocationRecord>> {
        let db = &self.db;

        let models = retry::with_retry("list_newest_first", self.retry_config, || async {
            location::Entity::find()
                .order_by_desc(location::Column::CreatedAt)
                .all(db)
                .await
        })
        .await
        .map_err(|e| GeolocatorError::database_operation(format!("加载记录列表失败: {}", e)))?;

        debug!("Loaded {} location records", models.len());
        Ok(models.into_iter().map(model_to_record).collect())
    }

    /// 记录总数（健康检查用）
    pub async fn count(&self) -> Result<u64> {
        let db = &self.db;

        retry::with_retry("count", self.retry_config, || async {
            location::Entity::find().count(db).await
        })
        .await
        .map_err(|e| GeolocatorError::database_operation(format!("统计记录数失败: {}", e)))
    }
}
