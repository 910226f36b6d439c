use sea_orm_migration::{prelude::*, schema::*, sea_orm::sea_query::extension::postgres::Type};

use super::m20250812_000001_create_customers::Customer;
use super::m20250812_000002_create_drivers::Driver;
use super::m20250812_000003_create_admins::Admin;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create booking status enum
        manager
            .create_type(
                Type::create()
                    .as_enum(BookingStatus::Enum)
                    .values([
                        BookingStatus::Pending,
                        BookingStatus::Assigned,
                        BookingStatus::Confirmed,
                        BookingStatus::Declined,
                        BookingStatus::OnTheWay,
                        BookingStatus::Completed,
                        BookingStatus::Incomplete,
                        BookingStatus::Cancelled,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Booking::Table)
                    .if_not_exists()
                    .col(uuid(Booking::Id).primary_key())
                    .col(uuid(Booking::CustomerId).not_null())
                    .col(uuid_null(Booking::DriverId))
                    .col(uuid_null(Booking::AdminId))
                    .col(string_len(Booking::PickupLocation, 255).not_null())
                    .col(string_len(Booking::DropoffLocation, 255).not_null())
                    .col(timestamp_with_time_zone(Booking::PickupTime).not_null())
                    .col(
                        ColumnDef::new(Booking::Status)
                            .custom(BookingStatus::Enum)
                            .not_null(),
                    )
                    .col(double(Booking::Fare).not_null())
                    .col(string_null(Booking::CancellationReason))
                    .col(
                        timestamp_with_time_zone(Booking::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_customer")
                            .from(Booking::Table, Booking::CustomerId)
                            .to(Customer::Table, Customer::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_driver")
                            .from(Booking::Table, Booking::DriverId)
                            .to(Driver::Table, Driver::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_admin")
                            .from(Booking::Table, Booking::AdminId)
                            .to(Admin::Table, Admin::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Booking::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(BookingStatus::Enum).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Booking {
    Table,
    Id,
    CustomerId,
    DriverId,
    AdminId,
    PickupLocation,
    DropoffLocation,
    PickupTime,
    Status,
    Fare,
    CancellationReason,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum BookingStatus {
    #[sea_orm(iden = "booking_status")]
    Enum,
    #[sea_orm(iden = "pending")]
    Pending,
    #[sea_orm(iden = "assigned")]
    Assigned,
    #[sea_orm(iden = "confirmed")]
    Confirmed,
    #[sea_orm(iden = "declined")]
    Declined,
    #[sea_orm(iden = "on_the_way")]
    OnTheWay,
    #[sea_orm(iden = "completed")]
    Completed,
    #[sea_orm(iden = "incomplete")]
    Incomplete,
    #[sea_orm(iden = "cancelled")]
    Cancelled,
}
