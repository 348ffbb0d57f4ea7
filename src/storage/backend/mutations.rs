//! Mutation operations for SeaOrmStorage
//!
//! This module contains all write database operations.

use sea_orm::{DbErr, EntityTrait, sea_query::OnConflict};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::converters::record_to_active_model;
use super::{InsertOutcome, SeaOrmStorage, retry};
use crate::errors::{GeolocatorError, Result};
use crate::storage::LocationRecord;

use migration::entities::location;

impl SeaOrmStorage {
    /// 插入记录，若同一 IP 已存在则保留已有记录
    ///
    /// 依赖 `ip` 唯一索引 + `ON CONFLICT (ip) DO NOTHING`。插入后重新读取，
    /// 以数据库中实际保存的 id 判断本次是否胜出。
    pub async fn insert_if_absent(&self, record: &LocationRecord) -> Result<InsertOutcome> {
        let db = &self.db;

        let insert_result = retry::with_retry(
            &format!("insert_if_absent({})", record.ip),
            self.retry_config,
            || async {
                let active_model = record_to_active_model(record);
                location::Entity::insert(active_model)
                    .on_conflict(
                        OnConflict::column(location::Column::Ip)
                            .do_nothing()
                            .to_owned(),
                    )
                    .exec(db)
                    .await
                    .map(|_| ())
            },
        )
        .await;

        match insert_result {
            Ok(()) => {}
            // DO NOTHING 命中冲突时 SeaORM 报告 RecordNotInserted
            Err(DbErr::RecordNotInserted) => {
                debug!("Insert for {} skipped: record already exists", record.ip);
            }
            Err(e) => {
                // 不支持 DO NOTHING 的后端会直接报唯一约束冲突，此时以已有记录为准
                warn!("Insert for {} failed: {}, checking for existing record", record.ip, e);
                return match self.find_by_ip(&record.ip).await? {
                    Some(existing) => Ok(InsertOutcome::AlreadyExists(existing)),
                    None => Err(GeolocatorError::database_operation(format!(
                        "插入地理位置记录 '{}' 失败: {}",
                        record.ip, e
                    ))),
                };
            }
        }

        let stored = self.find_by_ip(&record.ip).await?.ok_or_else(|| {
            GeolocatorError::database_operation(format!(
                "插入后未找到地理位置记录: {}",
                record.ip
            ))
        })?;

        if stored.id == record.id {
            info!("Location record created: {} ({})", stored.ip, stored.id);
            Ok(InsertOutcome::Inserted(stored))
        } else {
            info!(
                "Location record for {} already created by a concurrent request ({})",
                stored.ip, stored.id
            );
            Ok(InsertOutcome::AlreadyExists(stored))
        }
    }

    /// 删除记录（存在则删除，不存在也视为成功）
    ///
    /// 返回是否真的删除了一行。
    pub async fn delete_if_present(&self, id: Uuid) -> Result<bool> {
        let db = &self.db;

        let result = retry::with_retry(&format!("delete_if_present({})", id), self.retry_config, || async {
            location::Entity::delete_by_id(id).exec(db).await
        })
        .await
        .map_err(|e| GeolocatorError::database_operation(format!("删除地理位置记录失败: {}", e)))?;

        let deleted = result.rows_affected > 0;
        if deleted {
            info!("Location record deleted: {}", id);
        } else {
            debug!("Delete skipped, no location record with id {}", id);
        }
        Ok(deleted)
    }
}
