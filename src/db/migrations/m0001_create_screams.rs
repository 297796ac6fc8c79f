use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Screams::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Screams::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Screams::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Screams::Text).text().not_null())
                    .col(
                        ColumnDef::new(Screams::CreatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Screams::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Screams {
    Table,
    Id,
    UserId,
    Text,
    CreatedAt,
}
