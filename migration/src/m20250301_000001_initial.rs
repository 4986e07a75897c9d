use sea_orm_migration::prelude::extension::postgres::Type;
use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Name,
    Phone,
    PasswordHash,
    Role,
    Gender,
    BirthDate,
    RemainingClasses,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum CoursePurchases {
    Table,
    Id,
    UserId,
    Amount,
    Quantity,
    PurchaseDate,
    ValidDays,
    ExpiryDate,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ClassRecords {
    Table,
    Id,
    UserId,
    CoachId,
    ClassDate,
    CoachFee,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("user_role"))
                    .values(vec![
                        Alias::new("admin"),
                        Alias::new("member"),
                        Alias::new("coach"),
                    ])
                    .to_owned(),
            )
            .await?;
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("gender"))
                    .values(vec![Alias::new("male"), Alias::new("female")])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Name).string_len(64).not_null())
                    .col(ColumnDef::new(Users::Phone).string_len(20).not_null())
                    .col(ColumnDef::new(Users::PasswordHash).string_len(255).null())
                    .col(
                        ColumnDef::new(Users::Role)
                            .custom(Alias::new("user_role"))
                            .not_null()
                            .default(Expr::cust("'member'::user_role")),
                    )
                    .col(
                        ColumnDef::new(Users::Gender)
                            .custom(Alias::new("gender"))
                            .null(),
                    )
                    .col(ColumnDef::new(Users::BirthDate).date().null())
                    .col(
                        ColumnDef::new(Users::RemainingClasses)
                            .integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(Users::RemainingClasses).gte(0)),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Users::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 手机号在未删除用户中唯一
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS uq_users_phone_active ON users (phone) WHERE deleted_at IS NULL",
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_role")
                    .table(Users::Table)
                    .col(Users::Role)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CoursePurchases::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CoursePurchases::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CoursePurchases::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CoursePurchases::Amount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CoursePurchases::Quantity)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CoursePurchases::PurchaseDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CoursePurchases::ValidDays)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CoursePurchases::ExpiryDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CoursePurchases::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_purchases_user")
                            .from(CoursePurchases::Table, CoursePurchases::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_course_purchases_user")
                    .table(CoursePurchases::Table)
                    .col(CoursePurchases::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ClassRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClassRecords::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ClassRecords::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(ClassRecords::CoachId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ClassRecords::ClassDate).date().not_null())
                    .col(
                        ColumnDef::new(ClassRecords::CoachFee)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClassRecords::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_class_records_user")
                            .from(ClassRecords::Table, ClassRecords::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_class_records_coach")
                            .from(ClassRecords::Table, ClassRecords::CoachId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_class_records_user_date")
                    .table(ClassRecords::Table)
                    .col(ClassRecords::UserId)
                    .col(ClassRecords::ClassDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(ClassRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(CoursePurchases::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_type(Type::drop().name(Alias::new("gender")).to_owned())
            .await?;
        manager
            .drop_type(Type::drop().name(Alias::new("user_role")).to_owned())
            .await?;
        Ok(())
    }
}
