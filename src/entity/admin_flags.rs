//! 管理员访问开关实体（单行）

use sea_orm::entity::prelude::*;

/// 开关行的固定主键
pub const SINGLETON_KEY: &str = "admin";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "admin_flags")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    pub jm_access: bool,
    pub student_form_access: bool,
    pub professor_access: bool,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
