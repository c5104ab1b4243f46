use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ==================== 反馈轮次状态（单行，按固定 key 寻址） ====================
        manager
            .create_table(
                Table::create()
                    .table(FeedbackRoundStatus::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FeedbackRoundStatus::Key)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FeedbackRoundStatus::Active)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(FeedbackRoundStatus::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 管理员访问开关（单行） ====================
        manager
            .create_table(
                Table::create()
                    .table(AdminFlags::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdminFlags::Key)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AdminFlags::JmAccess)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(AdminFlags::StudentFormAccess)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(AdminFlags::ProfessorAccess)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(AdminFlags::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AdminFlags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FeedbackRoundStatus::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum FeedbackRoundStatus {
    #[sea_orm(iden = "feedback_round_status")]
    Table,
    Key,
    Active,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AdminFlags {
    #[sea_orm(iden = "admin_flags")]
    Table,
    Key,
    JmAccess,
    StudentFormAccess,
    ProfessorAccess,
    UpdatedAt,
}
