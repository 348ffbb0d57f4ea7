use crate::storage::LocationRecord;
use migration::entities::location;

/// 将 Sea-ORM Model 转换为 LocationRecord
pub fn model_to_record(model: location::Model) -> LocationRecord {
    LocationRecord {
        id: model.id,
        ip: model.ip,
        ip_type: model.ip_type,
        continent_code: model.continent_code,
        continent_name: model.continent_name,
        country_code: model.country_code,
        country_name: model.country_name,
        region_code: model.region_code,
        region_name: model.region_name,
        city: model.city,
        zip: model.zip,
        latitude: model.latitude,
        longitude: model.longitude,
        location: model.location,
        time_zone: model.time_zone,
        currency: model.currency,
        connection: model.connection,
        security: model.security,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

/// 将 LocationRecord 转换为 ActiveModel（仅用于插入，记录创建后不再更新）
pub fn record_to_active_model(record: &LocationRecord) -> location::ActiveModel {
    use sea_orm::ActiveValue::*;

    location::ActiveModel {
        id: Set(record.id),
        ip: Set(record.ip.clone()),
        ip_type: Set(record.ip_type.clone()),
        continent_code: Set(record.continent_code.clone()),
        continent_name: Set(record.continent_name.clone()),
        country_code: Set(record.country_code.clone()),
        country_name: Set(record.country_name.clone()),
        region_code: Set(record.region_code.clone()),
        region_name: Set(record.region_name.clone()),
        city: Set(record.city.clone()),
        zip: Set(record.zip.clone()),
        latitude: Set(record.latitude.clone()),
        longitude: Set(record.longitude.clone()),
        location: Set(record.location.clone()),
        time_zone: Set(record.time_zone.clone()),
        currency: Set(record.currency.clone()),
        connection: Set(record.connection.clone()),
        security: Set(record.security.clone()),
        created_at: Set(record.created_at),
        updated_at: Set(record.updated_at),
    }
}
