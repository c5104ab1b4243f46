//! 归档反馈实体
//!
//! 课程、学生、教授信息以纯字符串快照保存，源记录被删除或改名后归档依然可读。

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "archived_feedbacks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_code: String,
    pub course_name: String,
    pub student_name: String,
    pub student_roll_no: String,
    pub student_email: String,
    pub professor_name: String,
    pub professor_email: String,
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
    pub semester: String,
    pub archived_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_archived_feedback(
        self,
    ) -> crate::models::archived_feedbacks::entities::ArchivedFeedback {
        use crate::models::archived_feedbacks::entities::ArchivedFeedback;
        use crate::models::feedbacks::entities::FeedbackRatings;
        use chrono::{DateTime, Utc};

        ArchivedFeedback {
            id: self.id,
            course_code: self.course_code,
            course_name: self.course_name,
            student_name: self.student_name,
            student_roll_no: self.student_roll_no,
            student_email: self.student_email,
            professor_name: self.professor_name,
            professor_email: self.professor_email,
            ratings: FeedbackRatings {
                overall_grade: self.overall_grade,
                regularity_in_meeting: self.regularity_in_meeting,
                attendance_in_lectures: self.attendance_in_lectures,
                preparedness_for_tutorials: self.preparedness_for_tutorials,
                timeliness_of_tasks: self.timeliness_of_tasks,
                quality_of_work: self.quality_of_work,
                attitude_commitment: self.attitude_commitment,
            },
            nominated_for_best_ta: self.nominated_for_best_ta,
            comments: self.comments,
            semester: self.semester,
            archived_at: DateTime::<Utc>::from_timestamp(self.archived_at, 0).unwrap_or_default(),
        }
    }
}
