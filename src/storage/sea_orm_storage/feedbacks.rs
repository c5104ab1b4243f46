//! 在线反馈存储操作

use std::collections::{BTreeSet, HashMap};

use super::feedback_rounds::round_active_locked;
use super::{SeaOrmStorage, commit_txn, rollback_txn};
use crate::entity::prelude::*;
use crate::entity::{course_professors, course_tas, courses, feedbacks, professors, students};
use crate::errors::{PortalError, Result};
use crate::models::{
    PaginationInfo,
    feedbacks::{
        entities::{Feedback, FeedbackRatings, Nomination, NominationCourse, NominationStudent},
        requests::{FeedbackListQuery, UpdateFeedbackRequest},
        responses::{FeedbackListResponse, ProfessorFeedbackItem},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, sea_query::LockType,
};
use tracing::warn;

/// 批量加载关联的课程、教授、学生，拼装为业务模型
///
/// 关联记录缺失的反馈会被跳过。
pub(super) async fn hydrate_feedbacks<C: ConnectionTrait>(
    conn: &C,
    rows: Vec<FeedbackModel>,
) -> Result<Vec<Feedback>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let course_ids: BTreeSet<i64> = rows.iter().map(|r| r.course_id).collect();
    let professor_ids: BTreeSet<i64> = rows.iter().map(|r| r.professor_id).collect();
    let student_ids: BTreeSet<i64> = rows.iter().map(|r| r.student_id).collect();

    let course_map: HashMap<i64, CourseModel> = Courses::find()
        .filter(courses::Column::Id.is_in(course_ids))
        .all(conn)
        .await
        .map_err(|e| PortalError::database_operation(format!("查询课程失败: {e}")))?
        .into_iter()
        .map(|m| (m.id, m))
        .collect();
    let professor_map: HashMap<i64, ProfessorModel> = Professors::find()
        .filter(professors::Column::Id.is_in(professor_ids))
        .all(conn)
        .await
        .map_err(|e| PortalError::database_operation(format!("查询教授失败: {e}")))?
        .into_iter()
        .map(|m| (m.id, m))
        .collect();
    let student_map: HashMap<i64, StudentModel> = Students::find()
        .filter(students::Column::Id.is_in(student_ids))
        .all(conn)
        .await
        .map_err(|e| PortalError::database_operation(format!("查询学生失败: {e}")))?
        .into_iter()
        .map(|m| (m.id, m))
        .collect();

    let mut items = Vec::with_capacity(rows.len());
    for row in rows {
        let (Some(course), Some(professor), Some(student)) = (
            course_map.get(&row.course_id),
            professor_map.get(&row.professor_id),
            student_map.get(&row.student_id),
        ) else {
            warn!("Feedback {} references a missing record, skipped", row.id);
            continue;
        };
        items.push(row.into_feedback(
            course.clone().into_course_ref(),
            professor.clone().into_professor_ref(),
            student.clone().into_student_ref(),
        ));
    }
    Ok(items)
}

fn apply_update(model: FeedbackModel, update: UpdateFeedbackRequest) -> FeedbackActiveModel {
    let mut active: FeedbackActiveModel = model.into();

    if let Some(v) = update.overall_grade {
        active.overall_grade = Set(v);
    }
    if let Some(v) = update.regularity_in_meeting {
        active.regularity_in_meeting = Set(v);
    }
    if let Some(v) = update.attendance_in_lectures {
        active.attendance_in_lectures = Set(v);
    }
    if let Some(v) = update.preparedness_for_tutorials {
        active.preparedness_for_tutorials = Set(v);
    }
    if let Some(v) = update.timeliness_of_tasks {
        active.timeliness_of_tasks = Set(v);
    }
    if let Some(v) = update.quality_of_work {
        active.quality_of_work = Set(v);
    }
    if let Some(v) = update.attitude_commitment {
        active.attitude_commitment = Set(v);
    }
    if let Some(v) = update.nominated_for_best_ta {
        active.nominated_for_best_ta = Set(v);
    }
    if let Some(v) = update.comments {
        active.comments = Set(v);
    }
    active.updated_at = Set(chrono::Utc::now().timestamp());
    active
}

async fn update_in_txn<C: ConnectionTrait>(
    txn: &C,
    id: i64,
    update: UpdateFeedbackRequest,
) -> Result<Feedback> {
    if !round_active_locked(txn, LockType::Share).await? {
        return Err(PortalError::form_closed("Feedback form is closed."));
    }

    let model = Feedbacks::find_by_id(id)
        .one(txn)
        .await
        .map_err(|e| PortalError::database_operation(format!("查询反馈失败: {e}")))?
        .ok_or_else(|| PortalError::not_found("Feedback not found."))?;

    update.validate().map_err(PortalError::validation)?;

    let updated = apply_update(model, update)
        .update(txn)
        .await
        .map_err(|e| PortalError::database_operation(format!("更新反馈失败: {e}")))?;

    hydrate_feedbacks(txn, vec![updated])
        .await?
        .pop()
        .ok_or_else(|| PortalError::not_found("Feedback not found."))
}

impl SeaOrmStorage {
    /// 在开放的轮次内更新反馈
    ///
    /// 轮次状态行以共享锁读取，写入提交前关闭操作无法翻转状态。
    pub async fn update_feedback_impl(
        &self,
        id: i64,
        update: UpdateFeedbackRequest,
    ) -> Result<Feedback> {
        let txn = self.begin_txn().await?;
        match update_in_txn(&txn, id, update).await {
            Ok(feedback) => {
                commit_txn(txn).await?;
                Ok(feedback)
            }
            Err(e) => {
                rollback_txn(txn, &e).await;
                Err(e)
            }
        }
    }

    /// 教授视角的反馈列表
    pub async fn list_professor_feedbacks_impl(
        &self,
        professor_id: i64,
    ) -> Result<Vec<ProfessorFeedbackItem>> {
        let course_ids: Vec<i64> = CourseProfessors::find()
            .filter(course_professors::Column::ProfessorId.eq(professor_id))
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询教授课程失败: {e}")))?
            .into_iter()
            .map(|cp| cp.course_id)
            .collect();
        if course_ids.is_empty() {
            return Ok(Vec::new());
        }

        let course_list = Courses::find()
            .filter(courses::Column::Id.is_in(course_ids.clone()))
            .order_by_asc(courses::Column::Code)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询课程失败: {e}")))?;

        // 每门课程的全部教授，用于补齐缺失反馈时的教授名称
        let all_course_professors = CourseProfessors::find()
            .filter(course_professors::Column::CourseId.is_in(course_ids.clone()))
            .order_by_asc(course_professors::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询课程教授失败: {e}")))?;
        let professor_ids: BTreeSet<i64> = all_course_professors
            .iter()
            .map(|cp| cp.professor_id)
            .collect();
        let professor_names: HashMap<i64, String> = Professors::find()
            .filter(professors::Column::Id.is_in(professor_ids))
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询教授失败: {e}")))?
            .into_iter()
            .map(|p| (p.id, p.name))
            .collect();
        let mut course_professor_names: HashMap<i64, Vec<String>> = HashMap::new();
        for cp in &all_course_professors {
            if let Some(name) = professor_names.get(&cp.professor_id) {
                course_professor_names
                    .entry(cp.course_id)
                    .or_default()
                    .push(name.clone());
            }
        }

        let tas = CourseTas::find()
            .filter(course_tas::Column::CourseId.is_in(course_ids.clone()))
            .order_by_asc(course_tas::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询课程助教失败: {e}")))?;
        let student_ids: BTreeSet<i64> = tas.iter().map(|t| t.student_id).collect();
        let student_map: HashMap<i64, StudentModel> = Students::find()
            .filter(students::Column::Id.is_in(student_ids))
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询学生失败: {e}")))?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        let existing: HashMap<(i64, i64), FeedbackModel> = Feedbacks::find()
            .filter(feedbacks::Column::ProfessorId.eq(professor_id))
            .filter(feedbacks::Column::CourseId.is_in(course_ids))
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询反馈失败: {e}")))?
            .into_iter()
            .map(|f| ((f.course_id, f.student_id), f))
            .collect();

        let own_name = professor_names.get(&professor_id).cloned().unwrap_or_default();

        let mut items = Vec::new();
        for course in course_list {
            let joined_names = course_professor_names
                .get(&course.id)
                .map(|names| names.join(", "))
                .unwrap_or_default();

            for ta in tas.iter().filter(|t| t.course_id == course.id) {
                let Some(student) = student_map.get(&ta.student_id) else {
                    continue;
                };
                let item = match existing.get(&(course.id, student.id)) {
                    Some(fb) => ProfessorFeedbackItem {
                        id: Some(fb.id),
                        course: course.clone().into_course_ref(),
                        student: student.clone().into_student_ref(),
                        professor_name: own_name.clone(),
                        ratings: fb.ratings(),
                        nominated_for_best_ta: fb.nominated_for_best_ta,
                        comments: fb.comments.clone(),
                    },
                    // 尚未生成占位记录：以默认值补齐
                    None => ProfessorFeedbackItem {
                        id: None,
                        course: course.clone().into_course_ref(),
                        student: student.clone().into_student_ref(),
                        professor_name: joined_names.clone(),
                        ratings: FeedbackRatings::default(),
                        nominated_for_best_ta: false,
                        comments: String::new(),
                    },
                };
                items.push(item);
            }
        }

        Ok(items)
    }

    /// 分页列出在线反馈
    pub async fn list_feedbacks_with_pagination_impl(
        &self,
        query: FeedbackListQuery,
    ) -> Result<FeedbackListResponse> {
        let (page, size) = query.pagination.normalized();

        let paginator = Feedbacks::find()
            .order_by_asc(feedbacks::Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| PortalError::database_operation(format!("查询反馈总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| PortalError::database_operation(format!("查询反馈页数失败: {e}")))?;
        let rows = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询反馈列表失败: {e}")))?;

        Ok(FeedbackListResponse {
            items: hydrate_feedbacks(&self.db, rows).await?,
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 列出全部在线反馈
    pub async fn list_all_feedbacks_impl(&self) -> Result<Vec<Feedback>> {
        let rows = Feedbacks::find()
            .order_by_asc(feedbacks::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询反馈列表失败: {e}")))?;

        hydrate_feedbacks(&self.db, rows).await
    }

    /// 在线提名
    pub async fn list_nominations_impl(&self) -> Result<Vec<Nomination>> {
        let rows = Feedbacks::find()
            .filter(feedbacks::Column::NominatedForBestTa.eq(true))
            .order_by_asc(feedbacks::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询提名失败: {e}")))?;

        Ok(hydrate_feedbacks(&self.db, rows)
            .await?
            .into_iter()
            .map(|fb| Nomination {
                course: NominationCourse {
                    code: fb.course.code,
                    name: fb.course.name,
                },
                student: NominationStudent {
                    name: fb.student.name,
                    roll_no: fb.student.roll_no,
                },
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::common::PaginationQuery;
    use crate::storage::sea_orm_storage::feedback_rounds::set_round_active;
    use crate::storage::sea_orm_storage::test_support::*;

    struct Seeded {
        storage: SeaOrmStorage,
        rao: i64,
        iyer: i64,
    }

    async fn seeded() -> Seeded {
        let storage = SeaOrmStorage::in_memory().await.expect("in-memory storage");
        let db = storage.connection();
        let rao = professor(db, "Rao").await;
        let iyer = professor(db, "Iyer").await;
        let c1 = course(db, "CSE101").await;
        let s1 = student(db, "2022001", Some(c1.id)).await;
        let s2 = student(db, "2022002", Some(c1.id)).await;
        assign_professor(db, c1.id, rao.id).await;
        assign_professor(db, c1.id, iyer.id).await;
        assign_ta(db, c1.id, s1.id).await;
        assign_ta(db, c1.id, s2.id).await;
        Seeded {
            storage,
            rao: rao.id,
            iyer: iyer.id,
        }
    }

    fn nominate() -> UpdateFeedbackRequest {
        UpdateFeedbackRequest {
            quality_of_work: Some("Good".into()),
            nominated_for_best_ta: Some(true),
            comments: Some("Great TA".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_update_is_gated_by_round_status() {
        let s = seeded().await;
        s.storage.start_feedback_round_impl().await.unwrap();
        let id = Feedbacks::find()
            .one(s.storage.connection())
            .await
            .unwrap()
            .unwrap()
            .id;

        let updated = s.storage.update_feedback_impl(id, nominate()).await.unwrap();
        assert_eq!(updated.ratings.quality_of_work, "Good");
        assert_eq!(updated.ratings.overall_grade, "S");
        assert!(updated.nominated_for_best_ta);
        assert_eq!(updated.comments, "Great TA");

        let missing = s.storage.update_feedback_impl(9999, nominate()).await;
        assert!(matches!(missing, Err(PortalError::NotFound(_))));

        set_round_active(s.storage.connection(), false).await.unwrap();
        let late = UpdateFeedbackRequest {
            quality_of_work: Some("Poor".into()),
            nominated_for_best_ta: Some(false),
            comments: Some("Edited after close".into()),
            ..Default::default()
        };
        let closed = s.storage.update_feedback_impl(id, late).await;
        assert!(matches!(closed, Err(PortalError::FormClosed(_))));

        let stored = Feedbacks::find_by_id(id)
            .one(s.storage.connection())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.quality_of_work, "Good");
        assert!(stored.nominated_for_best_ta);
        assert_eq!(stored.comments, "Great TA");

        // 轮次关闭时，即使记录不存在也报告表单关闭
        let closed_missing = s.storage.update_feedback_impl(9999, nominate()).await;
        assert!(matches!(closed_missing, Err(PortalError::FormClosed(_))));
    }

    #[tokio::test]
    async fn test_update_rejects_invalid_rating() {
        let s = seeded().await;
        s.storage.start_feedback_round_impl().await.unwrap();
        let id = Feedbacks::find()
            .one(s.storage.connection())
            .await
            .unwrap()
            .unwrap()
            .id;

        let bad = UpdateFeedbackRequest {
            attendance_in_lectures: Some("Stellar".into()),
            ..Default::default()
        };
        let err = s.storage.update_feedback_impl(id, bad).await.unwrap_err();
        assert!(matches!(err, PortalError::Validation(_)));

        let unchanged = Feedbacks::find_by_id(id)
            .one(s.storage.connection())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(unchanged.attendance_in_lectures, "Excellent");
    }

    #[tokio::test]
    async fn test_professor_view_synthesizes_missing_feedback() {
        let s = seeded().await;

        // 尚未开启轮次：全部以默认值补齐
        let items = s.storage.list_professor_feedbacks_impl(s.rao).await.unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.id.is_none()));
        assert!(items.iter().all(|i| i.professor_name == "Rao, Iyer"));

        s.storage.start_feedback_round_impl().await.unwrap();
        let items = s.storage.list_professor_feedbacks_impl(s.iyer).await.unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.id.is_some()));
        assert!(items.iter().all(|i| i.professor_name == "Iyer"));

        let unknown = s.storage.list_professor_feedbacks_impl(424242).await.unwrap();
        assert!(unknown.is_empty());
    }

    #[tokio::test]
    async fn test_pagination_and_nominations() {
        let s = seeded().await;
        s.storage.start_feedback_round_impl().await.unwrap();

        let page = s
            .storage
            .list_feedbacks_with_pagination_impl(FeedbackListQuery {
                pagination: PaginationQuery { page: 2, limit: 3 },
            })
            .await
            .unwrap();
        assert_eq!(page.pagination.total, 4);
        assert_eq!(page.pagination.total_pages, 2);
        assert_eq!(page.items.len(), 1);

        assert!(s.storage.list_nominations_impl().await.unwrap().is_empty());

        let id = page.items[0].id;
        s.storage.update_feedback_impl(id, nominate()).await.unwrap();
        let nominations = s.storage.list_nominations_impl().await.unwrap();
        assert_eq!(nominations.len(), 1);
        assert_eq!(nominations[0].course.code, "CSE101");
        assert_eq!(nominations[0].student.roll_no, page.items[0].student.roll_no);
    }
}
