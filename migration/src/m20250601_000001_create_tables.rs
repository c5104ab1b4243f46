use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 教授表
        manager
            .create_table(
                Table::create()
                    .table(Professors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Professors::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Professors::Name).string().not_null())
                    .col(
                        ColumnDef::new(Professors::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Professors::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 课程表
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Courses::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Courses::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Courses::Name).string().not_null())
                    .col(ColumnDef::new(Courses::Acronym).string().not_null())
                    .col(ColumnDef::new(Courses::Department).string().not_null())
                    .col(
                        ColumnDef::new(Courses::TaRequired)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Courses::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Courses::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 学生表（allocated_ta 不设外键，由同步任务清理悬挂引用）
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Students::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Students::Name).string().not_null())
                    .col(
                        ColumnDef::new(Students::RollNo)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Students::Email).string().not_null())
                    .col(
                        ColumnDef::new(Students::AllocationStatus)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Students::AllocatedTa).big_integer().null())
                    .col(ColumnDef::new(Students::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Students::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 课程-教授关联表
        manager
            .create_table(
                Table::create()
                    .table(CourseProfessors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CourseProfessors::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CourseProfessors::CourseId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CourseProfessors::ProfessorId)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CourseProfessors::Table, CourseProfessors::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CourseProfessors::Table, CourseProfessors::ProfessorId)
                            .to(Professors::Table, Professors::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_course_professors_pair")
                    .table(CourseProfessors::Table)
                    .col(CourseProfessors::CourseId)
                    .col(CourseProfessors::ProfessorId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 课程-助教关联表
        manager
            .create_table(
                Table::create()
                    .table(CourseTas::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CourseTas::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CourseTas::CourseId).big_integer().not_null())
                    .col(ColumnDef::new(CourseTas::StudentId).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(CourseTas::Table, CourseTas::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CourseTas::Table, CourseTas::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_course_tas_pair")
                    .table(CourseTas::Table)
                    .col(CourseTas::CourseId)
                    .col(CourseTas::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 分配轮次表（由分配引擎维护，这里只负责清空）
        manager
            .create_table(
                Table::create()
                    .table(Rounds::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Rounds::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Rounds::CurrentRound).integer().not_null())
                    .col(
                        ColumnDef::new(Rounds::Active)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Rounds::StartedAt).big_integer().not_null())
                    .col(ColumnDef::new(Rounds::EndedAt).big_integer().null())
                    .to_owned(),
            )
            .await?;

        // 操作日志表
        manager
            .create_table(
                Table::create()
                    .table(LogEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LogEntries::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LogEntries::Actor).string().not_null())
                    .col(ColumnDef::new(LogEntries::Action).text().not_null())
                    .col(
                        ColumnDef::new(LogEntries::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 在线反馈表
        manager
            .create_table(
                Table::create()
                    .table(Feedbacks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Feedbacks::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Feedbacks::CourseId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Feedbacks::ProfessorId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Feedbacks::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(Feedbacks::OverallGrade).string().not_null())
                    .col(
                        ColumnDef::new(Feedbacks::RegularityInMeeting)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Feedbacks::AttendanceInLectures)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Feedbacks::PreparednessForTutorials)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Feedbacks::TimelinessOfTasks)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Feedbacks::QualityOfWork).string().not_null())
                    .col(
                        ColumnDef::new(Feedbacks::AttitudeCommitment)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Feedbacks::NominatedForBestTa)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Feedbacks::Comments).text().not_null())
                    .col(
                        ColumnDef::new(Feedbacks::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Feedbacks::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Feedbacks::Table, Feedbacks::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Feedbacks::Table, Feedbacks::ProfessorId)
                            .to(Professors::Table, Professors::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Feedbacks::Table, Feedbacks::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 每个 (课程, 教授, 学生) 三元组至多一条在线反馈
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_feedbacks_triple")
                    .table(Feedbacks::Table)
                    .col(Feedbacks::CourseId)
                    .col(Feedbacks::ProfessorId)
                    .col(Feedbacks::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 归档反馈表：全部字段去规范化，不引用任何在线表
        manager
            .create_table(
                Table::create()
                    .table(ArchivedFeedbacks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ArchivedFeedbacks::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ArchivedFeedbacks::CourseCode)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ArchivedFeedbacks::CourseName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ArchivedFeedbacks::StudentName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ArchivedFeedbacks::StudentRollNo)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ArchivedFeedbacks::StudentEmail)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ArchivedFeedbacks::ProfessorName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ArchivedFeedbacks::ProfessorEmail)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ArchivedFeedbacks::OverallGrade)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ArchivedFeedbacks::RegularityInMeeting)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ArchivedFeedbacks::AttendanceInLectures)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ArchivedFeedbacks::PreparednessForTutorials)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ArchivedFeedbacks::TimelinessOfTasks)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ArchivedFeedbacks::QualityOfWork)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ArchivedFeedbacks::AttitudeCommitment)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ArchivedFeedbacks::NominatedForBestTa)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(ArchivedFeedbacks::Comments).text().not_null())
                    .col(
                        ColumnDef::new(ArchivedFeedbacks::Semester)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ArchivedFeedbacks::ArchivedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_archived_feedbacks_semester")
                    .table(ArchivedFeedbacks::Table)
                    .col(ArchivedFeedbacks::Semester)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ArchivedFeedbacks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Feedbacks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LogEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Rounds::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CourseTas::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CourseProfessors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Professors::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Professors {
    #[sea_orm(iden = "professors")]
    Table,
    Id,
    Name,
    Email,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Courses {
    #[sea_orm(iden = "courses")]
    Table,
    Id,
    Code,
    Name,
    Acronym,
    Department,
    TaRequired,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Students {
    #[sea_orm(iden = "students")]
    Table,
    Id,
    Name,
    RollNo,
    Email,
    AllocationStatus,
    AllocatedTa,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CourseProfessors {
    #[sea_orm(iden = "course_professors")]
    Table,
    Id,
    CourseId,
    ProfessorId,
}

#[derive(DeriveIden)]
enum CourseTas {
    #[sea_orm(iden = "course_tas")]
    Table,
    Id,
    CourseId,
    StudentId,
}

#[derive(DeriveIden)]
enum Rounds {
    #[sea_orm(iden = "rounds")]
    Table,
    Id,
    CurrentRound,
    Active,
    StartedAt,
    EndedAt,
}

#[derive(DeriveIden)]
enum LogEntries {
    #[sea_orm(iden = "log_entries")]
    Table,
    Id,
    Actor,
    Action,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Feedbacks {
    #[sea_orm(iden = "feedbacks")]
    Table,
    Id,
    CourseId,
    ProfessorId,
    StudentId,
    OverallGrade,
    RegularityInMeeting,
    AttendanceInLectures,
    PreparednessForTutorials,
    TimelinessOfTasks,
    QualityOfWork,
    AttitudeCommitment,
    NominatedForBestTa,
    Comments,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ArchivedFeedbacks {
    #[sea_orm(iden = "archived_feedbacks")]
    Table,
    Id,
    CourseCode,
    CourseName,
    StudentName,
    StudentRollNo,
    StudentEmail,
    ProfessorName,
    ProfessorEmail,
    OverallGrade,
    RegularityInMeeting,
    AttendanceInLectures,
    PreparednessForTutorials,
    TimelinessOfTasks,
    QualityOfWork,
    AttitudeCommitment,
    NominatedForBestTa,
    Comments,
    Semester,
    ArchivedAt,
}
