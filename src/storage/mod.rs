use std::sync::Arc;

use crate::models::{
    archived_feedbacks::{
        entities::ArchivedFeedback, requests::ArchivedFeedbackListQuery,
        responses::ArchivedFeedbackListResponse,
    },
    feedbacks::{
        entities::{Feedback, Nomination},
        requests::{FeedbackListQuery, UpdateFeedbackRequest},
        responses::{FeedbackListResponse, ProfessorFeedbackItem},
    },
    semesters::entities::{AllocationSyncReport, ClosedRound, ResetSummary},
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 反馈轮次方法
    // 当前轮次是否开放（状态行不存在视为关闭）
    async fn is_feedback_round_active(&self) -> Result<bool>;
    // 开启轮次并重建全部占位反馈，返回创建数量
    async fn start_feedback_round(&self) -> Result<i64>;
    // 关闭轮次：归档、按保留窗口清理、翻转状态
    async fn close_feedback_round(&self, semester: &str, keep_recent: usize)
    -> Result<ClosedRound>;

    /// 在线反馈方法
    // 在开放的轮次内更新单条反馈
    async fn update_feedback(&self, id: i64, update: UpdateFeedbackRequest) -> Result<Feedback>;
    // 列出某位教授名下所有助教的反馈（缺失的以默认值补齐）
    async fn list_professor_feedbacks(&self, professor_id: i64)
    -> Result<Vec<ProfessorFeedbackItem>>;
    // 分页列出在线反馈
    async fn list_feedbacks_with_pagination(
        &self,
        query: FeedbackListQuery,
    ) -> Result<FeedbackListResponse>;
    // 列出全部在线反馈（导出用）
    async fn list_all_feedbacks(&self) -> Result<Vec<Feedback>>;
    // 在线提名
    async fn list_nominations(&self) -> Result<Vec<Nomination>>;

    /// 归档方法
    // 某学期的归档提名
    async fn list_archived_nominations(&self, semester: &str) -> Result<Vec<Nomination>>;
    // 分页列出归档反馈
    async fn list_archived_feedbacks_with_pagination(
        &self,
        query: ArchivedFeedbackListQuery,
    ) -> Result<ArchivedFeedbackListResponse>;
    // 列出归档反馈（导出用），可按学期过滤
    async fn list_archived_feedbacks(&self, semester: Option<&str>)
    -> Result<Vec<ArchivedFeedback>>;
    // 已归档学期，最近的在前
    async fn list_archived_semesters(&self) -> Result<Vec<String>>;
    // 归档总数
    async fn count_archived_feedbacks(&self) -> Result<i64>;

    /// 学期方法
    // 新学期重置：清空在线数据并复位开关
    async fn reset_semester(&self) -> Result<ResetSummary>;
    // 修复课程助教集合与学生分配字段之间的不一致
    async fn sync_allocations(&self) -> Result<AllocationSyncReport>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
