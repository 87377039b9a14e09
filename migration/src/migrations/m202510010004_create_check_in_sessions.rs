use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202510010004_create_check_in_sessions"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("check_in_sessions"))
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alias::new("id"))
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Alias::new("token"))
                            .string_len(16)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Alias::new("target_kind")).string_len(8).not_null())
                    .col(ColumnDef::new(Alias::new("target_key")).string().not_null())
                    .col(ColumnDef::new(Alias::new("class_id")).big_integer().null())
                    .col(ColumnDef::new(Alias::new("lesson_id")).string().null())
                    .col(ColumnDef::new(Alias::new("exam_id")).big_integer().null())
                    .col(ColumnDef::new(Alias::new("level")).small_integer().not_null())
                    .col(
                        ColumnDef::new(Alias::new("mode"))
                            .string_len(16)
                            .not_null()
                            .default("standard"),
                    )
                    .col(
                        ColumnDef::new(Alias::new("status"))
                            .string_len(8)
                            .not_null()
                            .default("open"),
                    )
                    .col(
                        ColumnDef::new(Alias::new("opened_by"))
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Alias::new("opened_at")).timestamp().not_null())
                    .col(ColumnDef::new(Alias::new("expires_at")).timestamp().not_null())
                    .col(ColumnDef::new(Alias::new("closed_at")).timestamp().null())
                    .col(ColumnDef::new(Alias::new("reconciled_at")).timestamp().null())
                    .col(
                        ColumnDef::new(Alias::new("created_at"))
                            .timestamp()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_check_in_sess_user")
                            .from(Alias::new("check_in_sessions"), Alias::new("opened_by"))
                            .to(Alias::new("users"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_check_in_sessions_target_status")
                    .table(Alias::new("check_in_sessions"))
                    .col(Alias::new("target_key"))
                    .col(Alias::new("status"))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(Alias::new("check_in_sessions"))
                    .to_owned(),
            )
            .await
    }
}
