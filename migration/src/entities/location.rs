use sea_orm::entity::prelude::*;

/// 地理位置记录，每个 IP 一行
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "locations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub ip: String,
    #[sea_orm(column_name = "type")]
    pub ip_type: Option<String>,
    pub continent_code: Option<String>,
    pub continent_name: Option<String>,
    pub country_code: Option<String>,
    pub country_name: Option<String>,
    pub region_code: Option<String>,
    pub region_name: Option<String>,
    pub city: Option<String>,
    pub zip: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    #[sea_orm(column_type = "Json", nullable)]
    pub location: Option<Json>,
    #[sea_orm(column_type = "Json", nullable)]
    pub time_zone: Option<Json>,
    #[sea_orm(column_type = "Json", nullable)]
    pub currency: Option<Json>,
    #[sea_orm(column_type = "Json", nullable)]
    pub connection: Option<Json>,
    #[sea_orm(column_type = "Json", nullable)]
    pub security: Option<Json>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
