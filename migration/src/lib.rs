pub use sea_orm_migration::prelude::*;

mod m20250812_000001_create_customers;
mod m20250812_000002_create_drivers;
mod m20250812_000003_create_admins;
mod m20250812_000004_create_bookings;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250812_000001_create_customers::Migration),
            Box::new(m20250812_000002_create_drivers::Migration),
            Box::new(m20250812_000003_create_admins::Migration),
            Box::new(m20250812_000004_create_bookings::Migration),
        ]
    }
}
