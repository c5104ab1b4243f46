//! 学生实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(unique)]
    pub roll_no: String,
    pub email: String,
    // 0 = 未分配, 1 = 已分配
    pub allocation_status: i32,
    // 分配到的课程 ID
    pub allocated_ta: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::course_tas::Entity")]
    CourseTas,
    #[sea_orm(has_many = "super::feedbacks::Entity")]
    Feedbacks,
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
    pub fn into_student_ref(self) -> crate::models::feedbacks::entities::StudentRef {
        crate::models::feedbacks::entities::StudentRef {
            id: self.id,
            name: self.name,
            roll_no: self.roll_no,
            email: self.email,
        }
    }
}
