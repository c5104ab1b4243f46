//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod archived_feedbacks;
mod feedback_rounds;
mod feedbacks;
mod semesters;

use crate::config::AppConfig;
use crate::errors::{PortalError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ConnectOptions, Database, DatabaseConnection, DatabaseTransaction, TransactionTrait,
};
use std::time::Duration;
use tracing::{info, warn};

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        let storage = Self::from_connection(db).await?;
        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(storage)
    }

    /// 基于已有连接构建存储并执行迁移
    pub async fn from_connection(db: DatabaseConnection) -> Result<Self> {
        Migrator::up(&db, None)
            .await
            .map_err(|e| PortalError::database_operation(format!("数据库迁移失败: {e}")))?;

        Ok(Self { db })
    }

    /// 内存 SQLite 存储
    ///
    /// 连接池固定为单个永不回收的连接，否则内存数据库会随连接关闭而丢失。
    pub async fn in_memory() -> Result<Self> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| PortalError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opt)
            .await
            .map_err(|e| PortalError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Self::from_connection(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool)).await
    }

    /// 底层连接
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| PortalError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| PortalError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false);

        Database::connect(opt)
            .await
            .map_err(|e| PortalError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(PortalError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }

    /// 开启事务
    pub(crate) async fn begin_txn(&self) -> Result<DatabaseTransaction> {
        self.db
            .begin()
            .await
            .map_err(|e| PortalError::transaction_aborted(format!("开启事务失败: {e}")))
    }
}

/// 提交事务
pub(crate) async fn commit_txn(txn: DatabaseTransaction) -> Result<()> {
    txn.commit()
        .await
        .map_err(|e| PortalError::transaction_aborted(format!("提交事务失败: {e}")))
}

/// 回滚事务，回滚本身失败只记录日志
pub(crate) async fn rollback_txn(txn: DatabaseTransaction, cause: &PortalError) {
    warn!("Rolling back transaction: {}", cause);
    if let Err(e) = txn.rollback().await {
        warn!("Transaction rollback failed: {}", e);
    }
}

// Storage trait 实现
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
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 反馈轮次模块
    async fn is_feedback_round_active(&self) -> Result<bool> {
        self.is_feedback_round_active_impl().await
    }

    async fn start_feedback_round(&self) -> Result<i64> {
        self.start_feedback_round_impl().await
    }

    async fn close_feedback_round(
        &self,
        semester: &str,
        keep_recent: usize,
    ) -> Result<ClosedRound> {
        self.close_feedback_round_impl(semester, keep_recent).await
    }

    // 在线反馈模块
    async fn update_feedback(&self, id: i64, update: UpdateFeedbackRequest) -> Result<Feedback> {
        self.update_feedback_impl(id, update).await
    }

    async fn list_professor_feedbacks(
        &self,
        professor_id: i64,
    ) -> Result<Vec<ProfessorFeedbackItem>> {
        self.list_professor_feedbacks_impl(professor_id).await
    }

    async fn list_feedbacks_with_pagination(
        &self,
        query: FeedbackListQuery,
    ) -> Result<FeedbackListResponse> {
        self.list_feedbacks_with_pagination_impl(query).await
    }

    async fn list_all_feedbacks(&self) -> Result<Vec<Feedback>> {
        self.list_all_feedbacks_impl().await
    }

    async fn list_nominations(&self) -> Result<Vec<Nomination>> {
        self.list_nominations_impl().await
    }

    // 归档模块
    async fn list_archived_nominations(&self, semester: &str) -> Result<Vec<Nomination>> {
        self.list_archived_nominations_impl(semester).await
    }

    async fn list_archived_feedbacks_with_pagination(
        &self,
        query: ArchivedFeedbackListQuery,
    ) -> Result<ArchivedFeedbackListResponse> {
        self.list_archived_feedbacks_with_pagination_impl(query)
            .await
    }

    async fn list_archived_feedbacks(
        &self,
        semester: Option<&str>,
    ) -> Result<Vec<ArchivedFeedback>> {
        self.list_archived_feedbacks_impl(semester).await
    }

    async fn list_archived_semesters(&self) -> Result<Vec<String>> {
        self.list_archived_semesters_impl().await
    }

    async fn count_archived_feedbacks(&self) -> Result<i64> {
        self.count_archived_feedbacks_impl().await
    }

    // 学期模块
    async fn reset_semester(&self) -> Result<ResetSummary> {
        self.reset_semester_impl().await
    }

    async fn sync_allocations(&self) -> Result<AllocationSyncReport> {
        self.sync_allocations_impl().await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! 存储层测试用的种子数据

    use sea_orm::{ActiveModelTrait, ConnectionTrait, Set};

    use crate::entity::prelude::*;

    pub async fn professor<C: ConnectionTrait>(db: &C, name: &str) -> ProfessorModel {
        ProfessorActiveModel {
            name: Set(name.to_string()),
            email: Set(format!("{}@example.edu", name.to_lowercase())),
            created_at: Set(0),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("insert professor")
    }

    pub async fn course<C: ConnectionTrait>(db: &C, code: &str) -> CourseModel {
        CourseActiveModel {
            code: Set(code.to_string()),
            name: Set(format!("{code} Course")),
            acronym: Set(code.to_string()),
            department: Set("CSE".to_string()),
            ta_required: Set(1),
            created_at: Set(0),
            updated_at: Set(0),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("insert course")
    }

    pub async fn student<C: ConnectionTrait>(
        db: &C,
        roll_no: &str,
        allocated_ta: Option<i64>,
    ) -> StudentModel {
        StudentActiveModel {
            name: Set(format!("Student {roll_no}")),
            roll_no: Set(roll_no.to_string()),
            email: Set(format!("{roll_no}@example.edu")),
            allocation_status: Set(i32::from(allocated_ta.is_some())),
            allocated_ta: Set(allocated_ta),
            created_at: Set(0),
            updated_at: Set(0),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("insert student")
    }

    pub async fn assign_professor<C: ConnectionTrait>(db: &C, course_id: i64, professor_id: i64) {
        CourseProfessorActiveModel {
            course_id: Set(course_id),
            professor_id: Set(professor_id),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("insert course professor");
    }

    pub async fn assign_ta<C: ConnectionTrait>(db: &C, course_id: i64, student_id: i64) {
        CourseTaActiveModel {
            course_id: Set(course_id),
            student_id: Set(student_id),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("insert course ta");
    }

    pub async fn archived<C: ConnectionTrait>(db: &C, semester: &str, archived_at: i64) {
        ArchivedFeedbackActiveModel {
            course_code: Set("OLD100".to_string()),
            course_name: Set("Old Course".to_string()),
            student_name: Set("Old Student".to_string()),
            student_roll_no: Set("2019001".to_string()),
            student_email: Set("old@example.edu".to_string()),
            professor_name: Set("Old Prof".to_string()),
            professor_email: Set("oldprof@example.edu".to_string()),
            overall_grade: Set("S".to_string()),
            regularity_in_meeting: Set("Good".to_string()),
            attendance_in_lectures: Set("Good".to_string()),
            preparedness_for_tutorials: Set("Good".to_string()),
            timeliness_of_tasks: Set("Good".to_string()),
            quality_of_work: Set("Good".to_string()),
            attitude_commitment: Set("Good".to_string()),
            nominated_for_best_ta: Set(false),
            comments: Set(String::new()),
            semester: Set(semester.to_string()),
            archived_at: Set(archived_at),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("insert archived feedback");
    }
}
