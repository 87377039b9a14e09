use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202510010005_create_attendance"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // attendance_logs: one row per successful check-in event
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("attendance_logs"))
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alias::new("id"))
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Alias::new("student_id")).big_integer().not_null())
                    .col(ColumnDef::new(Alias::new("session_id")).big_integer().not_null())
                    .col(ColumnDef::new(Alias::new("target_kind")).string_len(8).not_null())
                    .col(ColumnDef::new(Alias::new("target_key")).string().not_null())
                    .col(ColumnDef::new(Alias::new("class_id")).big_integer().null())
                    .col(ColumnDef::new(Alias::new("lesson_id")).string().null())
                    .col(ColumnDef::new(Alias::new("exam_id")).big_integer().null())
                    .col(ColumnDef::new(Alias::new("method")).string_len(16).not_null())
                    .col(ColumnDef::new(Alias::new("check_in_time")).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_att_log_session")
                            .from(Alias::new("attendance_logs"), Alias::new("session_id"))
                            .to(Alias::new("check_in_sessions"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_att_log_student")
                            .from(Alias::new("attendance_logs"), Alias::new("student_id"))
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
                    .name("uq_attendance_logs_student_session")
                    .table(Alias::new("attendance_logs"))
                    .col(Alias::new("student_id"))
                    .col(Alias::new("session_id"))
                    .unique()
                    .to_owned(),
            )
            .await?;

        // attendance_results: the authoritative outcome per student and target
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("attendance_results"))
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alias::new("id"))
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Alias::new("student_id")).big_integer().not_null())
                    .col(ColumnDef::new(Alias::new("target_kind")).string_len(8).not_null())
                    .col(ColumnDef::new(Alias::new("target_key")).string().not_null())
                    .col(ColumnDef::new(Alias::new("class_id")).big_integer().null())
                    .col(ColumnDef::new(Alias::new("lesson_id")).string().null())
                    .col(ColumnDef::new(Alias::new("exam_id")).big_integer().null())
                    .col(ColumnDef::new(Alias::new("status")).string_len(8).not_null())
                    .col(ColumnDef::new(Alias::new("first_check_in")).timestamp().not_null())
                    .col(ColumnDef::new(Alias::new("last_check_in")).timestamp().not_null())
                    .col(
                        ColumnDef::new(Alias::new("check_in_count"))
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(Alias::new("created_at")).timestamp().not_null())
                    .col(ColumnDef::new(Alias::new("updated_at")).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_att_result_student")
                            .from(Alias::new("attendance_results"), Alias::new("student_id"))
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
                    .name("uq_attendance_results_student_target")
                    .table(Alias::new("attendance_results"))
                    .col(Alias::new("student_id"))
                    .col(Alias::new("target_key"))
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(Alias::new("attendance_results"))
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(Alias::new("attendance_logs"))
                    .to_owned(),
            )
            .await
    }
}
