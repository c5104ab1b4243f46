//! 归档反馈存储操作（只读）

use super::SeaOrmStorage;
use crate::entity::archived_feedbacks::{Column, Entity as ArchivedFeedbacks};
use crate::errors::{PortalError, Result};
use crate::models::{
    PaginationInfo,
    archived_feedbacks::{
        entities::ArchivedFeedback, requests::ArchivedFeedbackListQuery,
        responses::ArchivedFeedbackListResponse,
    },
    feedbacks::entities::{Nomination, NominationCourse, NominationStudent},
};
use crate::utils::semesters_to_keep;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};

impl SeaOrmStorage {
    /// 某学期的归档提名
    pub async fn list_archived_nominations_impl(&self, semester: &str) -> Result<Vec<Nomination>> {
        let rows = ArchivedFeedbacks::find()
            .filter(Column::Semester.eq(semester))
            .filter(Column::NominatedForBestTa.eq(true))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询归档提名失败: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|m| Nomination {
                course: NominationCourse {
                    code: m.course_code,
                    name: m.course_name,
                },
                student: NominationStudent {
                    name: m.student_name,
                    roll_no: m.student_roll_no,
                },
            })
            .collect())
    }

    /// 分页列出归档反馈，最近归档的在前
    pub async fn list_archived_feedbacks_with_pagination_impl(
        &self,
        query: ArchivedFeedbackListQuery,
    ) -> Result<ArchivedFeedbackListResponse> {
        let (page, size) = query.pagination.normalized();

        let mut select = ArchivedFeedbacks::find();
        if let Some(ref semester) = query.semester
            && !semester.trim().is_empty()
        {
            select = select.filter(Column::Semester.eq(semester.trim()));
        }
        select = select
            .order_by_desc(Column::ArchivedAt)
            .order_by_asc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| PortalError::database_operation(format!("查询归档总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| PortalError::database_operation(format!("查询归档页数失败: {e}")))?;
        let rows = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询归档列表失败: {e}")))?;

        Ok(ArchivedFeedbackListResponse {
            items: rows.into_iter().map(|m| m.into_archived_feedback()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 列出归档反馈，可按学期过滤
    pub async fn list_archived_feedbacks_impl(
        &self,
        semester: Option<&str>,
    ) -> Result<Vec<ArchivedFeedback>> {
        let mut select = ArchivedFeedbacks::find();
        if let Some(semester) = semester {
            select = select.filter(Column::Semester.eq(semester));
        }

        let rows = select
            .order_by_asc(Column::Semester)
            .order_by_asc(Column::CourseCode)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询归档列表失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_archived_feedback()).collect())
    }

    /// 已归档学期，按最新归档时间倒序
    pub async fn list_archived_semesters_impl(&self) -> Result<Vec<String>> {
        let projection: Vec<(String, i64)> = ArchivedFeedbacks::find()
            .select_only()
            .column(Column::Semester)
            .column(Column::ArchivedAt)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询归档学期失败: {e}")))?;

        Ok(semesters_to_keep(&projection, usize::MAX))
    }

    /// 归档总数
    pub async fn count_archived_feedbacks_impl(&self) -> Result<i64> {
        let total = ArchivedFeedbacks::find()
            .count(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询归档总数失败: {e}")))?;

        Ok(total as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::common::PaginationQuery;
    use crate::storage::sea_orm_storage::test_support::archived;

    #[tokio::test]
    async fn test_semesters_and_filtering() {
        let storage = SeaOrmStorage::in_memory().await.expect("in-memory storage");
        let db = storage.connection();
        archived(db, "Monsoon-2024", 100).await;
        archived(db, "Winter-2025", 300).await;
        archived(db, "Winter-2025", 250).await;

        assert_eq!(
            storage.list_archived_semesters_impl().await.unwrap(),
            vec!["Winter-2025", "Monsoon-2024"]
        );
        assert_eq!(storage.count_archived_feedbacks_impl().await.unwrap(), 3);

        let page = storage
            .list_archived_feedbacks_with_pagination_impl(ArchivedFeedbackListQuery {
                pagination: PaginationQuery { page: 1, limit: 10 },
                semester: Some("Winter-2025".into()),
            })
            .await
            .unwrap();
        assert_eq!(page.pagination.total, 2);
        assert!(page.items.iter().all(|f| f.semester == "Winter-2025"));
        assert_eq!(page.items[0].archived_at.timestamp(), 300);

        let all = storage.list_archived_feedbacks_impl(None).await.unwrap();
        assert_eq!(all.len(), 3);
        assert!(
            storage
                .list_archived_nominations_impl("Winter-2025")
                .await
                .unwrap()
                .is_empty()
        );
    }
}
