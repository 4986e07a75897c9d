use sea_orm_migration::prelude::extension::postgres::Type;
use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum FinanceRecords {
    Table,
    Id,
    RecordType,
    Category,
    Name,
    Amount,
    RecordDate,
    CreatedAt,
    DeletedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("finance_type"))
                    .values(vec![Alias::new("income"), Alias::new("expense")])
                    .to_owned(),
            )
            .await?;
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("finance_category"))
                    .values(vec![
                        Alias::new("course"),
                        Alias::new("coach_fee"),
                        Alias::new("other"),
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FinanceRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FinanceRecords::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FinanceRecords::RecordType)
                            .custom(Alias::new("finance_type"))
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FinanceRecords::Category)
                            .custom(Alias::new("finance_category"))
                            .not_null()
                            .default(Expr::cust("'other'::finance_category")),
                    )
                    .col(
                        ColumnDef::new(FinanceRecords::Name)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FinanceRecords::Amount)
                            .big_integer()
                            .not_null()
                            .check(Expr::col(FinanceRecords::Amount).gt(0)),
                    )
                    .col(
                        ColumnDef::new(FinanceRecords::RecordDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FinanceRecords::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .col(
                        ColumnDef::new(FinanceRecords::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_finance_records_date")
                    .table(FinanceRecords::Table)
                    .col(FinanceRecords::RecordDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(FinanceRecords::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_type(Type::drop().name(Alias::new("finance_category")).to_owned())
            .await?;
        manager
            .drop_type(Type::drop().name(Alias::new("finance_type")).to_owned())
            .await?;
        Ok(())
    }
}
