//! 反馈轮次存储操作：开启与关闭

use std::collections::{BTreeMap, BTreeSet};

use super::feedbacks::hydrate_feedbacks;
use super::{SeaOrmStorage, commit_txn, rollback_txn};
use crate::entity::feedback_round_status::{self, SINGLETON_KEY};
use crate::entity::prelude::*;
use crate::entity::{archived_feedbacks, feedbacks};
use crate::errors::{PortalError, Result};
use crate::models::feedbacks::entities::{Feedback, FeedbackRatings, FeedbackTriple};
use crate::models::semesters::entities::{CloseOutcome, ClosedRound};
use crate::utils::plan_retention;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, sea_query::LockType,
};
use tracing::{debug, info};

// 单次批量插入的行数
const INSERT_CHUNK: usize = 500;

/// 读取轮次状态，状态行不存在视为关闭
pub(super) async fn round_active<C: ConnectionTrait>(conn: &C) -> Result<bool> {
    let status = FeedbackRoundStatus::find_by_id(SINGLETON_KEY)
        .one(conn)
        .await
        .map_err(|e| PortalError::database_operation(format!("查询反馈轮次状态失败: {e}")))?;

    Ok(status.is_some_and(|s| s.active))
}

/// 在事务内加锁读取轮次状态
///
/// 关闭操作的 CAS 会等待持锁事务提交，读取后再写入的操作应使用此函数。
/// SQLite 不支持行锁，由其写事务串行化保证。
pub(super) async fn round_active_locked<C: ConnectionTrait>(
    txn: &C,
    lock: LockType,
) -> Result<bool> {
    let status = locked_status_select(lock)
        .one(txn)
        .await
        .map_err(|e| PortalError::database_operation(format!("查询反馈轮次状态失败: {e}")))?;

    Ok(status.is_some_and(|s| s.active))
}

fn locked_status_select(lock: LockType) -> sea_orm::Select<FeedbackRoundStatus> {
    FeedbackRoundStatus::find_by_id(SINGLETON_KEY).lock(lock)
}

/// 写入轮次状态，状态行不存在时创建
pub(super) async fn set_round_active<C: ConnectionTrait>(conn: &C, active: bool) -> Result<()> {
    let now = chrono::Utc::now().timestamp();
    let existing = FeedbackRoundStatus::find_by_id(SINGLETON_KEY)
        .one(conn)
        .await
        .map_err(|e| PortalError::database_operation(format!("查询反馈轮次状态失败: {e}")))?;

    let result = match existing {
        Some(model) => {
            let mut model: FeedbackRoundStatusActiveModel = model.into();
            model.active = Set(active);
            model.updated_at = Set(now);
            model.update(conn).await
        }
        None => {
            FeedbackRoundStatusActiveModel {
                key: Set(SINGLETON_KEY.to_string()),
                active: Set(active),
                updated_at: Set(now),
            }
            .insert(conn)
            .await
        }
    };

    result
        .map(|_| ())
        .map_err(|e| PortalError::database_operation(format!("更新反馈轮次状态失败: {e}")))
}

/// 为每个 (课程, 教授, 助教) 三元组生成默认占位反馈
pub(super) fn plan_placeholders(
    course_professors: &[CourseProfessorModel],
    course_tas: &[CourseTaModel],
) -> Vec<FeedbackTriple> {
    let mut professors: BTreeMap<i64, Vec<i64>> = BTreeMap::new();
    for cp in course_professors {
        professors.entry(cp.course_id).or_default().push(cp.professor_id);
    }
    let mut tas: BTreeMap<i64, Vec<i64>> = BTreeMap::new();
    for ct in course_tas {
        tas.entry(ct.course_id).or_default().push(ct.student_id);
    }

    let mut seen = BTreeSet::new();
    let mut triples = Vec::new();
    for (course_id, students) in &tas {
        let Some(profs) = professors.get(course_id) else {
            continue;
        };
        for &professor_id in profs {
            for &student_id in students {
                let triple = FeedbackTriple {
                    course_id: *course_id,
                    professor_id,
                    student_id,
                };
                // 已存在的三元组跳过
                if seen.insert(triple) {
                    triples.push(triple);
                }
            }
        }
    }
    triples
}

fn placeholder(triple: FeedbackTriple, now: i64) -> FeedbackActiveModel {
    let ratings = FeedbackRatings::default();
    FeedbackActiveModel {
        course_id: Set(triple.course_id),
        professor_id: Set(triple.professor_id),
        student_id: Set(triple.student_id),
        overall_grade: Set(ratings.overall_grade),
        regularity_in_meeting: Set(ratings.regularity_in_meeting),
        attendance_in_lectures: Set(ratings.attendance_in_lectures),
        preparedness_for_tutorials: Set(ratings.preparedness_for_tutorials),
        timeliness_of_tasks: Set(ratings.timeliness_of_tasks),
        quality_of_work: Set(ratings.quality_of_work),
        attitude_commitment: Set(ratings.attitude_commitment),
        nominated_for_best_ta: Set(false),
        comments: Set(String::new()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
}

fn snapshot(feedback: Feedback, semester: &str, archived_at: i64) -> ArchivedFeedbackActiveModel {
    ArchivedFeedbackActiveModel {
        course_code: Set(feedback.course.code),
        course_name: Set(feedback.course.name),
        student_name: Set(feedback.student.name),
        student_roll_no: Set(feedback.student.roll_no),
        student_email: Set(feedback.student.email),
        professor_name: Set(feedback.professor.name),
        professor_email: Set(feedback.professor.email),
        overall_grade: Set(feedback.ratings.overall_grade),
        regularity_in_meeting: Set(feedback.ratings.regularity_in_meeting),
        attendance_in_lectures: Set(feedback.ratings.attendance_in_lectures),
        preparedness_for_tutorials: Set(feedback.ratings.preparedness_for_tutorials),
        timeliness_of_tasks: Set(feedback.ratings.timeliness_of_tasks),
        quality_of_work: Set(feedback.ratings.quality_of_work),
        attitude_commitment: Set(feedback.ratings.attitude_commitment),
        nominated_for_best_ta: Set(feedback.nominated_for_best_ta),
        comments: Set(feedback.comments),
        semester: Set(semester.to_string()),
        archived_at: Set(archived_at),
        ..Default::default()
    }
}

async fn start_in_txn<C: ConnectionTrait>(txn: &C) -> Result<i64> {
    set_round_active(txn, true).await?;

    Feedbacks::delete_many()
        .exec(txn)
        .await
        .map_err(|e| PortalError::database_operation(format!("清空在线反馈失败: {e}")))?;

    let course_professors = CourseProfessors::find()
        .order_by_asc(crate::entity::course_professors::Column::Id)
        .all(txn)
        .await
        .map_err(|e| PortalError::database_operation(format!("查询课程教授失败: {e}")))?;
    let course_tas = CourseTas::find()
        .order_by_asc(crate::entity::course_tas::Column::Id)
        .all(txn)
        .await
        .map_err(|e| PortalError::database_operation(format!("查询课程助教失败: {e}")))?;

    let triples = plan_placeholders(&course_professors, &course_tas);
    let now = chrono::Utc::now().timestamp();

    for chunk in triples.chunks(INSERT_CHUNK) {
        let models: Vec<FeedbackActiveModel> =
            chunk.iter().map(|t| placeholder(*t, now)).collect();
        Feedbacks::insert_many(models)
            .exec(txn)
            .await
            .map_err(|e| PortalError::database_operation(format!("创建占位反馈失败: {e}")))?;
    }

    Ok(triples.len() as i64)
}

async fn close_in_txn<C: ConnectionTrait>(
    txn: &C,
    semester: &str,
    keep_recent: usize,
) -> Result<ClosedRound> {
    let now = chrono::Utc::now().timestamp();

    // 状态 CAS：只有 active = true 的状态行会被翻转
    let flipped = FeedbackRoundStatus::update_many()
        .set(FeedbackRoundStatusActiveModel {
            active: Set(false),
            updated_at: Set(now),
            ..Default::default()
        })
        .filter(feedback_round_status::Column::Key.eq(SINGLETON_KEY))
        .filter(feedback_round_status::Column::Active.eq(true))
        .exec(txn)
        .await
        .map_err(|e| PortalError::database_operation(format!("更新反馈轮次状态失败: {e}")))?;
    if flipped.rows_affected == 0 {
        return Err(PortalError::conflict(
            "Feedback round is not active; nothing to close.",
        ));
    }

    // 保留窗口基于本次归档之前的数据计算
    let projection: Vec<(String, i64)> = ArchivedFeedbacks::find()
        .select_only()
        .column(archived_feedbacks::Column::Semester)
        .column(archived_feedbacks::Column::ArchivedAt)
        .into_tuple()
        .all(txn)
        .await
        .map_err(|e| PortalError::database_operation(format!("查询归档学期失败: {e}")))?;

    let live = Feedbacks::find()
        .order_by_asc(feedbacks::Column::Id)
        .all(txn)
        .await
        .map_err(|e| PortalError::database_operation(format!("查询在线反馈失败: {e}")))?;
    let live = hydrate_feedbacks(txn, live).await?;
    let archived = live.len() as i64;

    let snapshots: Vec<ArchivedFeedbackActiveModel> = live
        .into_iter()
        .map(|fb| snapshot(fb, semester, now))
        .collect();
    for chunk in snapshots.chunks(INSERT_CHUNK) {
        ArchivedFeedbacks::insert_many(chunk.to_vec())
            .exec(txn)
            .await
            .map_err(|e| PortalError::database_operation(format!("写入归档反馈失败: {e}")))?;
    }

    let plan = plan_retention(&projection, keep_recent, semester);
    let stale = archived_feedbacks::Column::Semester.is_not_in(plan.keep.clone());

    let pruned_rows: Vec<_> = ArchivedFeedbacks::find()
        .filter(stale.clone())
        .order_by_asc(archived_feedbacks::Column::Id)
        .all(txn)
        .await
        .map_err(|e| PortalError::database_operation(format!("查询过期归档失败: {e}")))?
        .into_iter()
        .map(|m| m.into_archived_feedback())
        .collect();

    let pruned = if pruned_rows.is_empty() {
        0
    } else {
        ArchivedFeedbacks::delete_many()
            .filter(stale)
            .exec(txn)
            .await
            .map_err(|e| PortalError::database_operation(format!("清理过期归档失败: {e}")))?
            .rows_affected as i64
    };

    debug!(
        "Close plan for {}: keep {:?}, prune {:?}",
        semester, plan.keep, plan.prune
    );

    Ok(ClosedRound {
        outcome: CloseOutcome {
            semester: semester.to_string(),
            archived,
            pruned,
            kept_semesters: plan.keep,
        },
        pruned_rows,
    })
}

impl SeaOrmStorage {
    /// 查询反馈轮次是否开放
    pub async fn is_feedback_round_active_impl(&self) -> Result<bool> {
        round_active(&self.db).await
    }

    /// 开启反馈轮次，整体在一个事务中完成
    pub async fn start_feedback_round_impl(&self) -> Result<i64> {
        let txn = self.begin_txn().await?;
        match start_in_txn(&txn).await {
            Ok(created) => {
                commit_txn(txn).await?;
                info!("Feedback round started with {} placeholders", created);
                Ok(created)
            }
            Err(e) => {
                rollback_txn(txn, &e).await;
                Err(e.into_aborted())
            }
        }
    }

    /// 关闭反馈轮次：归档、清理、翻转状态，任何一步失败整体回滚
    pub async fn close_feedback_round_impl(
        &self,
        semester: &str,
        keep_recent: usize,
    ) -> Result<ClosedRound> {
        let txn = self.begin_txn().await?;
        match close_in_txn(&txn, semester, keep_recent).await {
            Ok(closed) => {
                commit_txn(txn).await?;
                info!(
                    "Feedback round closed for {}: archived {}, pruned {}",
                    semester, closed.outcome.archived, closed.outcome.pruned
                );
                Ok(closed)
            }
            Err(e) => {
                rollback_txn(txn, &e).await;
                Err(e.into_aborted())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::test_support::*;
    use sea_orm::PaginatorTrait;

    async fn storage() -> SeaOrmStorage {
        SeaOrmStorage::in_memory().await.expect("in-memory storage")
    }

    /// 两门课：C1 有两位教授、两名助教；C2 有一位教授、没有助教
    async fn seed(storage: &SeaOrmStorage) {
        let db = storage.connection();
        let p1 = professor(db, "Rao").await;
        let p2 = professor(db, "Iyer").await;
        let c1 = course(db, "CSE101").await;
        let c2 = course(db, "CSE202").await;
        let s1 = student(db, "2022001", Some(c1.id)).await;
        let s2 = student(db, "2022002", Some(c1.id)).await;
        assign_professor(db, c1.id, p1.id).await;
        assign_professor(db, c1.id, p2.id).await;
        assign_professor(db, c2.id, p1.id).await;
        assign_ta(db, c1.id, s1.id).await;
        assign_ta(db, c1.id, s2.id).await;
    }

    #[test]
    fn test_guarded_status_read_takes_row_lock() {
        use sea_orm::{DbBackend, QueryTrait};

        let share = locked_status_select(LockType::Share)
            .build(DbBackend::Postgres)
            .to_string();
        assert!(share.ends_with("FOR SHARE"), "{share}");

        let update = locked_status_select(LockType::Update)
            .build(DbBackend::MySql)
            .to_string();
        assert!(update.ends_with("FOR UPDATE"), "{update}");

        // SQLite 没有行锁语法
        let sqlite = locked_status_select(LockType::Share)
            .build(DbBackend::Sqlite)
            .to_string();
        assert!(!sqlite.contains(" FOR "), "{sqlite}");
    }

    #[test]
    fn test_plan_placeholders_skips_duplicates_and_empty_courses() {
        let cp = |id, course_id, professor_id| CourseProfessorModel {
            id,
            course_id,
            professor_id,
        };
        let ct = |id, course_id, student_id| CourseTaModel {
            id,
            course_id,
            student_id,
        };

        let triples = plan_placeholders(
            &[cp(1, 1, 10), cp(2, 1, 10), cp(3, 2, 11)],
            &[ct(1, 1, 100), ct(2, 1, 101), ct(3, 3, 102)],
        );
        // 课程 2 没有助教，课程 3 没有教授
        assert_eq!(triples.len(), 2);
        assert!(triples.iter().all(|t| t.course_id == 1 && t.professor_id == 10));
    }

    #[tokio::test]
    async fn test_start_round_is_idempotent() {
        let storage = storage().await;
        seed(&storage).await;

        assert!(!storage.is_feedback_round_active_impl().await.unwrap());

        let created = storage.start_feedback_round_impl().await.unwrap();
        assert_eq!(created, 4);
        assert!(storage.is_feedback_round_active_impl().await.unwrap());

        let created_again = storage.start_feedback_round_impl().await.unwrap();
        assert_eq!(created_again, 4);
        let total = Feedbacks::find().count(storage.connection()).await.unwrap();
        assert_eq!(total, 4);

        let first = Feedbacks::find().one(storage.connection()).await.unwrap().unwrap();
        assert_eq!(first.overall_grade, "S");
        assert_eq!(first.quality_of_work, "Excellent");
        assert!(!first.nominated_for_best_ta);
        assert!(first.comments.is_empty());
    }

    #[tokio::test]
    async fn test_close_round_trip() {
        let storage = storage().await;
        seed(&storage).await;
        storage.start_feedback_round_impl().await.unwrap();

        let closed = storage
            .close_feedback_round_impl("Winter-2025", 2)
            .await
            .unwrap();
        assert_eq!(closed.outcome.archived, 4);
        assert_eq!(closed.outcome.pruned, 0);
        assert_eq!(closed.outcome.kept_semesters, vec!["Winter-2025"]);
        assert!(closed.pruned_rows.is_empty());

        let archived = ArchivedFeedbacks::find()
            .all(storage.connection())
            .await
            .unwrap();
        assert_eq!(archived.len(), 4);
        assert!(archived.iter().all(|a| a.semester == "Winter-2025"));
        assert!(archived.iter().all(|a| a.course_code == "CSE101"));

        // 关闭不会清空在线反馈
        let live = Feedbacks::find().count(storage.connection()).await.unwrap();
        assert_eq!(live, 4);
        assert!(!storage.is_feedback_round_active_impl().await.unwrap());
    }

    #[tokio::test]
    async fn test_double_close_is_rejected() {
        let storage = storage().await;
        seed(&storage).await;
        storage.start_feedback_round_impl().await.unwrap();
        storage
            .close_feedback_round_impl("Winter-2025", 2)
            .await
            .unwrap();

        let err = storage
            .close_feedback_round_impl("Winter-2025", 2)
            .await
            .unwrap_err();
        assert!(matches!(err, PortalError::Conflict(_)));

        let archived = ArchivedFeedbacks::find()
            .count(storage.connection())
            .await
            .unwrap();
        assert_eq!(archived, 4);
    }

    #[tokio::test]
    async fn test_close_without_status_row_is_rejected() {
        let storage = storage().await;
        let err = storage
            .close_feedback_round_impl("Winter-2025", 2)
            .await
            .unwrap_err();
        assert!(matches!(err, PortalError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_zero_live_close_still_prunes_and_flips() {
        let storage = storage().await;
        let db = storage.connection();
        archived(db, "A", 100).await;
        archived(db, "B", 200).await;
        archived(db, "C", 300).await;
        set_round_active(db, true).await.unwrap();

        let closed = storage.close_feedback_round_impl("D", 2).await.unwrap();
        assert_eq!(closed.outcome.archived, 0);
        assert_eq!(closed.outcome.pruned, 1);
        assert_eq!(closed.outcome.kept_semesters, vec!["C", "B", "D"]);
        assert_eq!(closed.pruned_rows.len(), 1);
        assert_eq!(closed.pruned_rows[0].semester, "A");

        let remaining: Vec<String> = ArchivedFeedbacks::find()
            .order_by_asc(archived_feedbacks::Column::Semester)
            .all(db)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.semester)
            .collect();
        assert_eq!(remaining, vec!["B", "C"]);
        assert!(!storage.is_feedback_round_active_impl().await.unwrap());
    }
}
