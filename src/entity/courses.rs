//! 课程实体
//!
//! 课程的教授集合与助教集合分别存放在 `course_professors` 与 `course_tas` 关联表中。

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    pub acronym: String,
    pub department: String,
    pub ta_required: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::course_professors::Entity")]
    CourseProfessors,
    #[sea_orm(has_many = "super::course_tas::Entity")]
    CourseTas,
    #[sea_orm(has_many = "super::feedbacks::Entity")]
    Feedbacks,
}

impl Related<super::course_professors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CourseProfessors.def()
    }
}

impl Related<super::course_tas::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CourseTas.def()
    }
}

impl Related<super::feedbacks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Feedbacks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_course_ref(self) -> crate::models::feedbacks::entities::CourseRef {
        crate::models::feedbacks::entities::CourseRef {
            id: self.id,
            code: self.code,
            name: self.name,
        }
    }
}
