use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Users::Nome).string().not_null())
                    .col(ColumnDef::new(Users::Cpf).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::SenhaHash).string().not_null())
                    .col(ColumnDef::new(Users::Telefone).string())
                    .col(ColumnDef::new(Users::Tipo).string().not_null().default("VEREADOR"))
                    .col(ColumnDef::new(Users::Status).string().not_null().default("PENDENTE"))
                    .col(ColumnDef::new(Users::IsSuperAdmin).boolean().not_null().default(false))
                    .col(ColumnDef::new(Users::FotoPerfil).string())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // Create password_reset_tokens table
        manager
            .create_table(
                Table::create()
                    .table(PasswordResetTokens::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PasswordResetTokens::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(PasswordResetTokens::UsuarioId).string().not_null())
                    .col(ColumnDef::new(PasswordResetTokens::TokenHash).string().not_null())
                    .col(ColumnDef::new(PasswordResetTokens::ExpiresAt).big_integer().not_null())
                    .col(ColumnDef::new(PasswordResetTokens::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_password_reset_tokens_usuario_id")
                            .from(PasswordResetTokens::Table, PasswordResetTokens::UsuarioId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_password_reset_tokens_token_hash")
                    .table(PasswordResetTokens::Table)
                    .col(PasswordResetTokens::TokenHash)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_password_reset_tokens_usuario_id")
                    .table(PasswordResetTokens::Table)
                    .col(PasswordResetTokens::UsuarioId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PasswordResetTokens::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Nome,
    Cpf,
    Email,
    SenhaHash,
    Telefone,
    Tipo,
    Status,
    IsSuperAdmin,
    FotoPerfil,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PasswordResetTokens {
    Table,
    Id,
    UsuarioId,
    TokenHash,
    ExpiresAt,
    CreatedAt,
}
