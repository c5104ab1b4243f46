//! 关闭反馈轮次
//!
//! 存储层在单个事务内完成归档与清理，提交后再失效缓存并发送清理备份。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info, warn};

use super::{ArchivePolicy, FeedbackService};
use crate::cache::invalidate_archive_views;
use crate::errors::PortalError;
use crate::models::archived_feedbacks::entities::{ArchivedFeedback, ExportFormat};
use crate::models::common::response::{error_response, error_response_with_code};
use crate::models::{ApiResponse, ErrorCode};
use crate::notification::{ArchiveNotification, NotificationSink};
use crate::utils::{current_semester_label, export::render_archive};

pub async fn close_feedback_round(
    service: &FeedbackService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let policy = service.get_policy(request);
    let semester = current_semester_label();

    let closed = match storage
        .close_feedback_round(&semester, policy.keep_recent)
        .await
    {
        Ok(closed) => closed,
        Err(e @ PortalError::Conflict(_)) => {
            warn!("Rejected close for {}: {}", semester, e.message());
            return Ok(error_response_with_code(
                &e,
                ErrorCode::FeedbackRoundNotActive,
            ));
        }
        Err(e) => return Ok(error_response(&e)),
    };

    info!(
        "Feedback round closed for {}: archived {}, pruned {}, kept {:?}",
        semester, closed.outcome.archived, closed.outcome.pruned, closed.outcome.kept_semesters
    );

    if let Some(cache) = service.get_cache(request) {
        invalidate_archive_views(cache.as_ref()).await;
    }

    if !closed.pruned_rows.is_empty() {
        let notifier = service.get_notifier(request);
        notify_pruned(notifier.as_ref(), &policy, &semester, &closed.pruned_rows).await;
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        closed.outcome,
        format!("Feedback form closed for {semester}."),
    )))
}

/// 发送被清理归档的备份，失败只记录日志
async fn notify_pruned(
    notifier: &dyn NotificationSink,
    policy: &ArchivePolicy,
    semester: &str,
    pruned: &[ArchivedFeedback],
) {
    let attachment = match render_archive(pruned, ExportFormat::Xlsx, "Archived_Feedback") {
        Ok(export) => export,
        Err(e) => {
            error!("NotificationFailure: could not render pruned archive: {}", e);
            return;
        }
    };

    let notification = ArchiveNotification::for_semester(
        semester,
        policy.sender.clone(),
        policy.recipients.clone(),
        attachment,
    );

    match notifier.send(notification).await {
        Ok(()) => info!(
            "Pruned archive backup ({} rows) sent via {}",
            pruned.len(),
            notifier.name()
        ),
        Err(e) => warn!("NotificationFailure via {}: {}", notifier.name(), e),
    }
}
