//! 在线反馈实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "feedbacks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub professor_id: i64,
    pub student_id: i64,
    pub overall_grade: String,
    pub regularity_in_meeting: String,
    pub attendance_in_lectures: String,
    pub preparedness_for_tutorials: String,
    pub timeliness_of_tasks: String,
    pub quality_of_work: String,
    pub attitude_commitment: String,
    pub nominated_for_best_ta: bool,
    #[sea_orm(column_type = "Text")]
    pub comments: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id"
    )]
    Course,
    #[sea_orm(
        belongs_to = "super::professors::Entity",
        from = "Column::ProfessorId",
        to = "super::professors::Column::Id"
    )]
    Professor,
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id"
    )]
    Student,
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::professors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Professor.def()
    }
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn triple(&self) -> crate::models::feedbacks::entities::FeedbackTriple {
        crate::models::feedbacks::entities::FeedbackTriple {
            course_id: self.course_id,
            professor_id: self.professor_id,
            student_id: self.student_id,
        }
    }

    pub fn ratings(&self) -> crate::models::feedbacks::entities::FeedbackRatings {
        crate::models::feedbacks::entities::FeedbackRatings {
            overall_grade: self.overall_grade.clone(),
            regularity_in_meeting: self.regularity_in_meeting.clone(),
            attendance_in_lectures: self.attendance_in_lectures.clone(),
            preparedness_for_tutorials: self.preparedness_for_tutorials.clone(),
            timeliness_of_tasks: self.timeliness_of_tasks.clone(),
            quality_of_work: self.quality_of_work.clone(),
            attitude_commitment: self.attitude_commitment.clone(),
        }
    }

    // 从数据库模型转换为业务模型，关联对象由调用方预先加载
    pub fn into_feedback(
        self,
        course: crate::models::feedbacks::entities::CourseRef,
        professor: crate::models::feedbacks::entities::ProfessorRef,
        student: crate::models::feedbacks::entities::StudentRef,
    ) -> crate::models::feedbacks::entities::Feedback {
        use crate::models::feedbacks::entities::Feedback;
        use chrono::{DateTime, Utc};

        let ratings = self.ratings();
        Feedback {
            id: self.id,
            course,
            professor,
            student,
            ratings,
            nominated_for_best_ta: self.nominated_for_best_ta,
            comments: self.comments,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
