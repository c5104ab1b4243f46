//! 预导入模块，方便使用

pub use super::admin_flags::{
    ActiveModel as AdminFlagsActiveModel, Entity as AdminFlags, Model as AdminFlagsModel,
};
pub use super::archived_feedbacks::{
    ActiveModel as ArchivedFeedbackActiveModel, Entity as ArchivedFeedbacks,
    Model as ArchivedFeedbackModel,
};
pub use super::course_professors::{
    ActiveModel as CourseProfessorActiveModel, Entity as CourseProfessors,
    Model as CourseProfessorModel,
};
pub use super::course_tas::{
    ActiveModel as CourseTaActiveModel, Entity as CourseTas, Model as CourseTaModel,
};
pub use super::courses::{ActiveModel as CourseActiveModel, Entity as Courses, Model as CourseModel};
pub use super::feedback_round_status::{
    ActiveModel as FeedbackRoundStatusActiveModel, Entity as FeedbackRoundStatus,
    Model as FeedbackRoundStatusModel,
};
pub use super::feedbacks::{
    ActiveModel as FeedbackActiveModel, Entity as Feedbacks, Model as FeedbackModel,
};
pub use super::log_entries::{
    ActiveModel as LogEntryActiveModel, Entity as LogEntries, Model as LogEntryModel,
};
pub use super::professors::{
    ActiveModel as ProfessorActiveModel, Entity as Professors, Model as ProfessorModel,
};
pub use super::rounds::{ActiveModel as RoundActiveModel, Entity as Rounds, Model as RoundModel};
pub use super::students::{
    ActiveModel as StudentActiveModel, Entity as Students, Model as StudentModel,
};
