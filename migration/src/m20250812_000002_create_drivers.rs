use sea_orm_migration::{prelude::*, schema::*, sea_orm::sea_query::extension::postgres::Type};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create driver status enum
        manager
            .create_type(
                Type::create()
                    .as_enum(DriverStatus::Enum)
                    .values([DriverStatus::Available, DriverStatus::Unavailable])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Driver::Table)
                    .if_not_exists()
                    .col(uuid(Driver::Id).primary_key())
                    .col(string_len(Driver::Username, 100).not_null().unique_key())
                    .col(string_len(Driver::PasswordHash, 255).not_null())
                    .col(string_len(Driver::FullName, 100).not_null())
                    .col(string_len(Driver::Email, 255).not_null())
                    .col(string_len(Driver::Phone, 20).not_null())
                    .col(string_len(Driver::CarModel, 100).not_null())
                    .col(string_len(Driver::LicensePlate, 20).not_null().unique_key())
                    .col(string_len(Driver::DriverLicense, 50).not_null().unique_key())
                    .col(
                        ColumnDef::new(Driver::Status)
                            .custom(DriverStatus::Enum)
                            .not_null(),
                    )
                    .col(
                        timestamp_with_time_zone(Driver::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Driver::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(DriverStatus::Enum).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Driver {
    Table,
    Id,
    Username,
    PasswordHash,
    FullName,
    Email,
    Phone,
    CarModel,
    LicensePlate,
    DriverLicense,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum DriverStatus {
    #[sea_orm(iden = "driver_status")]
    Enum,
    #[sea_orm(iden = "available")]
    Available,
    #[sea_orm(iden = "unavailable")]
    Unavailable,
}
