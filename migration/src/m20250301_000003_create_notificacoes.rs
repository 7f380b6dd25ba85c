use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Notificacoes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Notificacoes::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Notificacoes::UsuarioId).string().not_null())
                    .col(ColumnDef::new(Notificacoes::Tipo).string().not_null())
                    .col(ColumnDef::new(Notificacoes::Titulo).string().not_null())
                    .col(ColumnDef::new(Notificacoes::Mensagem).string().not_null())
                    .col(ColumnDef::new(Notificacoes::Lida).boolean().not_null().default(false))
                    .col(ColumnDef::new(Notificacoes::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notificacoes_usuario_id")
                            .from(Notificacoes::Table, Notificacoes::UsuarioId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_notificacoes_usuario_id")
                    .table(Notificacoes::Table)
                    .col(Notificacoes::UsuarioId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_notificacoes_lida")
                    .table(Notificacoes::Table)
                    .col(Notificacoes::Lida)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Notificacoes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Notificacoes {
    Table,
    Id,
    UsuarioId,
    Tipo,
    Titulo,
    Mensagem,
    Lida,
    CreatedAt,
}
