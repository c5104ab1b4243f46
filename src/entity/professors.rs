//! 教授实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "professors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::course_professors::Entity")]
    CourseProfessors,
    #[sea_orm(has_many = "super::feedbacks::Entity")]
    Feedbacks,
}

impl Related<super::course_professors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CourseProfessors.def()
    }
}

impl Related<super::feedbacks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Feedbacks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_professor_ref(self) -> crate::models::feedbacks::entities::ProfessorRef {
        crate::models::feedbacks::entities::ProfessorRef {
            id: self.id,
            name: self.name,
            email: self.email,
        }
    }
}
