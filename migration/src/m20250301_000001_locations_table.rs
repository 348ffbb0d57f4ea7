use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 locations 表
        manager
            .create_table(
                Table::create()
                    .table(Location::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Location::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Location::Ip).string_len(45).not_null())
                    .col(ColumnDef::new(Location::Type).string_len(50).null())
                    .col(ColumnDef::new(Location::ContinentCode).string_len(50).null())
                    .col(ColumnDef::new(Location::ContinentName).string_len(50).null())
                    .col(ColumnDef::new(Location::CountryCode).string_len(50).null())
                    .col(ColumnDef::new(Location::CountryName).string_len(50).null())
                    .col(ColumnDef::new(Location::RegionCode).string_len(50).null())
                    .col(ColumnDef::new(Location::RegionName).string_len(50).null())
                    .col(ColumnDef::new(Location::City).string_len(50).null())
                    .col(ColumnDef::new(Location::Zip).string_len(50).null())
                    .col(ColumnDef::new(Location::Latitude).string_len(50).null())
                    .col(ColumnDef::new(Location::Longitude).string_len(50).null())
                    .col(ColumnDef::new(Location::Location).json().null())
                    .col(ColumnDef::new(Location::TimeZone).json().null())
                    .col(ColumnDef::new(Location::Currency).json().null())
                    .col(ColumnDef::new(Location::Connection).json().null())
                    .col(ColumnDef::new(Location::Security).json().null())
                    .col(
                        ColumnDef::new(Location::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Location::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // ip 唯一索引：并发首次查询同一 IP 时只保留先写入的一条
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_locations_ip")
                    .table(Location::Table)
                    .col(Location::Ip)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 列表按创建时间倒序
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_locations_created_at")
                    .table(Location::Table)
                    .col(Location::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_locations_created_at")
                    .table(Location::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_locations_ip")
                    .table(Location::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Location::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Location {
    #[sea_orm(iden = "locations")]
    Table,
    Id,
    Ip,
    Type,
    ContinentCode,
    ContinentName,
    CountryCode,
    CountryName,
    RegionCode,
    RegionName,
    City,
    Zip,
    Latitude,
    Longitude,
    Location,
    TimeZone,
    Currency,
    Connection,
    Security,
    CreatedAt,
    UpdatedAt,
}
