use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Members::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Members::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Members::Username)
                            .string_len(30)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Members::Password).string().not_null())
                    .col(ColumnDef::new(Members::Name).string_len(30).not_null())
                    .col(ColumnDef::new(Members::NickName).string_len(30).not_null())
                    .col(ColumnDef::new(Members::Age).integer().not_null())
                    .col(ColumnDef::new(Members::Role).string_len(30).not_null())
                    .col(ColumnDef::new(Members::RefreshToken).string_len(1000).null())
                    .col(ColumnDef::new(Members::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Members::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // Refresh token lookups happen on every token refresh
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_members_refresh_token")
                    .table(Members::Table)
                    .col(Members::RefreshToken)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Members::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Members {
    Table,
    Id,
    Username,
    Password,
    Name,
    NickName,
    Age,
    Role,
    RefreshToken,
    CreatedAt,
    UpdatedAt,
}
