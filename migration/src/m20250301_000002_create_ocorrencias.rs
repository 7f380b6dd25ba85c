use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create ocorrencias table
        manager
            .create_table(
                Table::create()
                    .table(Ocorrencias::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Ocorrencias::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Ocorrencias::Titulo).string().not_null())
                    .col(ColumnDef::new(Ocorrencias::Descricao).string().not_null())
                    .col(ColumnDef::new(Ocorrencias::Categoria).string().not_null().default("OUTROS"))
                    .col(ColumnDef::new(Ocorrencias::Endereco).string().not_null())
                    .col(ColumnDef::new(Ocorrencias::Latitude).double())
                    .col(ColumnDef::new(Ocorrencias::Longitude).double())
                    .col(ColumnDef::new(Ocorrencias::Prioridade).string().not_null().default("MEDIA"))
                    .col(ColumnDef::new(Ocorrencias::Status).string().not_null().default("PENDENTE"))
                    .col(ColumnDef::new(Ocorrencias::VereadorId).string().not_null())
                    .col(ColumnDef::new(Ocorrencias::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Ocorrencias::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ocorrencias_vereador_id")
                            .from(Ocorrencias::Table, Ocorrencias::VereadorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ocorrencias_vereador_id")
                    .table(Ocorrencias::Table)
                    .col(Ocorrencias::VereadorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ocorrencias_status")
                    .table(Ocorrencias::Table)
                    .col(Ocorrencias::Status)
                    .to_owned(),
            )
            .await?;

        // Create fotos table
        manager
            .create_table(
                Table::create()
                    .table(Fotos::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Fotos::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Fotos::OcorrenciaId).string().not_null())
                    .col(ColumnDef::new(Fotos::UrlFoto).string().not_null())
                    .col(ColumnDef::new(Fotos::ThumbnailUrl).string().not_null())
                    .col(ColumnDef::new(Fotos::StorageId).string().not_null())
                    .col(ColumnDef::new(Fotos::Ordem).integer().not_null())
                    .col(ColumnDef::new(Fotos::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_fotos_ocorrencia_id")
                            .from(Fotos::Table, Fotos::OcorrenciaId)
                            .to(Ocorrencias::Table, Ocorrencias::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_fotos_ocorrencia_id")
                    .table(Fotos::Table)
                    .col(Fotos::OcorrenciaId)
                    .to_owned(),
            )
            .await?;

        // Create historicos table. The auto-increment id doubles as the
        // insertion sequence, so "most recent first" stays deterministic
        // even when entries share a created_at second.
        manager
            .create_table(
                Table::create()
                    .table(Historicos::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Historicos::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Historicos::OcorrenciaId).string().not_null())
                    .col(ColumnDef::new(Historicos::UsuarioId).string().not_null())
                    .col(ColumnDef::new(Historicos::Acao).string().not_null())
                    .col(ColumnDef::new(Historicos::Comentario).string())
                    .col(ColumnDef::new(Historicos::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_historicos_ocorrencia_id")
                            .from(Historicos::Table, Historicos::OcorrenciaId)
                            .to(Ocorrencias::Table, Ocorrencias::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_historicos_ocorrencia_id")
                    .table(Historicos::Table)
                    .col(Historicos::OcorrenciaId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Historicos::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Fotos::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Ocorrencias::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Ocorrencias {
    Table,
    Id,
    Titulo,
    Descricao,
    Categoria,
    Endereco,
    Latitude,
    Longitude,
    Prioridade,
    Status,
    VereadorId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Fotos {
    Table,
    Id,
    OcorrenciaId,
    UrlFoto,
    ThumbnailUrl,
    StorageId,
    Ordem,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Historicos {
    Table,
    Id,
    OcorrenciaId,
    UsuarioId,
    Acao,
    Comentario,
    CreatedAt,
}
