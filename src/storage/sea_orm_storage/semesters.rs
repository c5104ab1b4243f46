//! 学期级存储操作：新学期重置与分配一致性同步

use std::collections::{BTreeSet, HashMap, HashSet};

use super::feedback_rounds::{round_active_locked, set_round_active};
use super::{SeaOrmStorage, commit_txn, rollback_txn};
use crate::entity::admin_flags::SINGLETON_KEY as ADMIN_KEY;
use crate::entity::prelude::*;
use crate::entity::{course_tas, students};
use crate::errors::{PortalError, Result};
use crate::models::semesters::entities::{AllocationSyncReport, ResetSummary};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, Set,
    sea_query::LockType,
};
use tracing::{debug, info};

/// 复位管理员开关，开关行不存在时创建
async fn reset_admin_flags<C: ConnectionTrait>(conn: &C) -> Result<()> {
    let now = chrono::Utc::now().timestamp();
    let existing = AdminFlags::find_by_id(ADMIN_KEY)
        .one(conn)
        .await
        .map_err(|e| PortalError::database_operation(format!("查询管理员开关失败: {e}")))?;

    let result = match existing {
        Some(model) => {
            let mut model: AdminFlagsActiveModel = model.into();
            model.jm_access = Set(false);
            model.student_form_access = Set(false);
            model.professor_access = Set(false);
            model.updated_at = Set(now);
            model.update(conn).await
        }
        None => {
            AdminFlagsActiveModel {
                key: Set(ADMIN_KEY.to_string()),
                jm_access: Set(false),
                student_form_access: Set(false),
                professor_access: Set(false),
                updated_at: Set(now),
            }
            .insert(conn)
            .await
        }
    };

    result
        .map(|_| ())
        .map_err(|e| PortalError::database_operation(format!("更新管理员开关失败: {e}")))
}

async fn reset_in_txn<C: ConnectionTrait>(txn: &C) -> Result<ResetSummary> {
    // 先锁住轮次状态行，避免与开启或关闭交错
    let active = round_active_locked(txn, LockType::Update).await?;
    let live = Feedbacks::find()
        .count(txn)
        .await
        .map_err(|e| PortalError::database_operation(format!("查询在线反馈失败: {e}")))?;
    if live > 0 && active {
        return Err(PortalError::conflict(
            "Feedback round is still active with unarchived feedback; close it first.",
        ));
    }

    let map_err = |what: &str, e: sea_orm::DbErr| {
        PortalError::database_operation(format!("清空{what}失败: {e}"))
    };

    // 先删除引用方，再删除被引用的课程与学生
    let feedbacks = Feedbacks::delete_many()
        .exec(txn)
        .await
        .map_err(|e| map_err("在线反馈", e))?
        .rows_affected;
    CourseTas::delete_many()
        .exec(txn)
        .await
        .map_err(|e| map_err("课程助教", e))?;
    CourseProfessors::delete_many()
        .exec(txn)
        .await
        .map_err(|e| map_err("课程教授", e))?;
    let courses = Courses::delete_many()
        .exec(txn)
        .await
        .map_err(|e| map_err("课程", e))?
        .rows_affected;
    let students = Students::delete_many()
        .exec(txn)
        .await
        .map_err(|e| map_err("学生", e))?
        .rows_affected;
    let rounds = Rounds::delete_many()
        .exec(txn)
        .await
        .map_err(|e| map_err("分配轮次", e))?
        .rows_affected;
    let log_entries = LogEntries::delete_many()
        .exec(txn)
        .await
        .map_err(|e| map_err("操作日志", e))?
        .rows_affected;

    reset_admin_flags(txn).await?;
    set_round_active(txn, false).await?;

    Ok(ResetSummary {
        students: students as i64,
        courses: courses as i64,
        rounds: rounds as i64,
        log_entries: log_entries as i64,
        feedbacks: feedbacks as i64,
    })
}

async fn sync_in_txn<C: ConnectionTrait>(txn: &C) -> Result<AllocationSyncReport> {
    let course_ids: HashSet<i64> = Courses::find()
        .all(txn)
        .await
        .map_err(|e| PortalError::database_operation(format!("查询课程失败: {e}")))?
        .into_iter()
        .map(|c| c.id)
        .collect();
    let student_list = Students::find()
        .all(txn)
        .await
        .map_err(|e| PortalError::database_operation(format!("查询学生失败: {e}")))?;
    let allocation: HashMap<i64, Option<i64>> = student_list
        .iter()
        .map(|s| (s.id, s.allocated_ta))
        .collect();
    let entries = CourseTas::find()
        .all(txn)
        .await
        .map_err(|e| PortalError::database_operation(format!("查询课程助教失败: {e}")))?;

    // 1) 助教集合中分配字段不指向该课程的条目
    let stale: Vec<i64> = entries
        .iter()
        .filter(|e| allocation.get(&e.student_id).copied().flatten() != Some(e.course_id))
        .map(|e| e.id)
        .collect();
    if !stale.is_empty() {
        CourseTas::delete_many()
            .filter(course_tas::Column::Id.is_in(stale.clone()))
            .exec(txn)
            .await
            .map_err(|e| PortalError::database_operation(format!("移除课程助教失败: {e}")))?;
    }

    // 2) 已分配到课程却不在其助教集合中的学生
    let present: BTreeSet<(i64, i64)> = entries
        .iter()
        .map(|e| (e.course_id, e.student_id))
        .collect();
    let missing: Vec<CourseTaActiveModel> = student_list
        .iter()
        .filter_map(|s| s.allocated_ta.map(|course_id| (course_id, s.id)))
        .filter(|(course_id, _)| course_ids.contains(course_id))
        .filter(|pair| !present.contains(pair))
        .map(|(course_id, student_id)| CourseTaActiveModel {
            course_id: Set(course_id),
            student_id: Set(student_id),
            ..Default::default()
        })
        .collect();
    let added = missing.len() as i64;
    if !missing.is_empty() {
        CourseTas::insert_many(missing)
            .exec(txn)
            .await
            .map_err(|e| PortalError::database_operation(format!("补充课程助教失败: {e}")))?;
    }

    // 3) 分配字段指向不存在的课程，或标记已分配却没有课程的学生
    let orphaned: Vec<i64> = student_list
        .iter()
        .filter(|s| match s.allocated_ta {
            Some(course_id) => !course_ids.contains(&course_id),
            None => s.allocation_status == 1,
        })
        .map(|s| s.id)
        .collect();
    if !orphaned.is_empty() {
        Students::update_many()
            .set(StudentActiveModel {
                allocated_ta: Set(None),
                allocation_status: Set(0),
                updated_at: Set(chrono::Utc::now().timestamp()),
                ..Default::default()
            })
            .filter(students::Column::Id.is_in(orphaned.clone()))
            .exec(txn)
            .await
            .map_err(|e| PortalError::database_operation(format!("复位学生分配失败: {e}")))?;
    }

    debug!(
        "Allocation sync: removed {:?}, reset students {:?}",
        stale, orphaned
    );

    Ok(AllocationSyncReport {
        removed_tas: stale.len() as i64,
        added_tas: added,
        reset_students: orphaned.len() as i64,
    })
}

impl SeaOrmStorage {
    /// 新学期重置
    pub async fn reset_semester_impl(&self) -> Result<ResetSummary> {
        let txn = self.begin_txn().await?;
        match reset_in_txn(&txn).await {
            Ok(summary) => {
                commit_txn(txn).await?;
                info!("Semester reset completed: {:?}", summary);
                Ok(summary)
            }
            Err(e) => {
                rollback_txn(txn, &e).await;
                Err(e.into_aborted())
            }
        }
    }

    /// 分配一致性同步
    pub async fn sync_allocations_impl(&self) -> Result<AllocationSyncReport> {
        let txn = self.begin_txn().await?;
        match sync_in_txn(&txn).await {
            Ok(report) => {
                commit_txn(txn).await?;
                info!("Allocation sync completed: {:?}", report);
                Ok(report)
            }
            Err(e) => {
                rollback_txn(txn, &e).await;
                Err(e.into_aborted())
            }
        }
    }
}
