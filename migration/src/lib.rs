pub use sea_orm_migration::prelude::*;

mod m20250301_000001_initial;
mod m20250308_000001_add_finance_records;
mod m20250315_000001_add_member_expiry_date;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_initial::Migration),
            Box::new(m20250308_000001_add_finance_records::Migration),
            Box::new(m20250315_000001_add_member_expiry_date::Migration),
        ]
    }
}
