use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Users {
    Table,
    ExpiryDate,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Users::Table)
                    .add_column_if_not_exists(ColumnDef::new(Users::ExpiryDate).date().null())
                    .to_owned(),
            )
            .await?;

        // 回填：取每个会员购课记录中最晚的到期日
        manager
            .get_connection()
            .execute_unprepared(
                r#"UPDATE users u SET expiry_date = p.max_expiry
                   FROM (SELECT user_id, MAX(expiry_date) AS max_expiry
                         FROM course_purchases GROUP BY user_id) p
                   WHERE u.id = p.user_id"#,
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Users::Table)
                    .drop_column(Users::ExpiryDate)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}
