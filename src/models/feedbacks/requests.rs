use serde::Deserialize;
use ts_rs::TS;

use super::entities::{OverallGrade, RatingLevel};
use crate::models::common::PaginationQuery;

// 在线反馈列表查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/feedback.ts")]
pub struct FeedbackListQuery {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
}

// 更新反馈请求
//
// 所有字段可选，只写入出现的字段；未识别的字段直接忽略。
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/feedback.ts")]
#[serde(rename_all = "camelCase")]
pub struct UpdateFeedbackRequest {
    pub overall_grade: Option<String>,
    pub regularity_in_meeting: Option<String>,
    pub attendance_in_lectures: Option<String>,
    pub preparedness_for_tutorials: Option<String>,
    pub timeliness_of_tasks: Option<String>,
    pub quality_of_work: Option<String>,
    pub attitude_commitment: Option<String>,
    #[serde(rename = "nominatedForBestTA")]
    pub nominated_for_best_ta: Option<bool>,
    pub comments: Option<String>,
}

impl UpdateFeedbackRequest {
    /// 校验评价字段是否属于固定枚举
    pub fn validate(&self) -> Result<(), String> {
        if let Some(grade) = &self.overall_grade {
            grade.parse::<OverallGrade>()?;
        }

        let ratings = [
            ("regularityInMeeting", &self.regularity_in_meeting),
            ("attendanceInLectures", &self.attendance_in_lectures),
            ("preparednessForTutorials", &self.preparedness_for_tutorials),
            ("timelinessOfTasks", &self.timeliness_of_tasks),
            ("qualityOfWork", &self.quality_of_work),
            ("attitudeCommitment", &self.attitude_commitment),
        ];
        for (field, value) in ratings {
            if let Some(value) = value {
                value
                    .parse::<RatingLevel>()
                    .map_err(|e| format!("{field}: {e}"))?;
            }
        }

        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.overall_grade.is_none()
            && self.regularity_in_meeting.is_none()
            && self.attendance_in_lectures.is_none()
            && self.preparedness_for_tutorials.is_none()
            && self.timeliness_of_tasks.is_none()
            && self.quality_of_work.is_none()
            && self.attitude_commitment.is_none()
            && self.nominated_for_best_ta.is_none()
            && self.comments.is_none()
    }
}

// 归档提名查询参数
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/feedback.ts")]
pub struct ArchivedNominationsQuery {
    pub semester: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_fields_are_ignored() {
        let req: UpdateFeedbackRequest = serde_json::from_str(
            r#"{"comments":"solid work","course":"ignored","nominatedForBestTA":true}"#,
        )
        .expect("valid body");
        assert_eq!(req.comments.as_deref(), Some("solid work"));
        assert_eq!(req.nominated_for_best_ta, Some(true));
        assert!(req.overall_grade.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_invalid_rating_is_rejected() {
        let req = UpdateFeedbackRequest {
            quality_of_work: Some("Superb".into()),
            ..Default::default()
        };
        let err = req.validate().unwrap_err();
        assert!(err.contains("qualityOfWork"));

        let req = UpdateFeedbackRequest {
            overall_grade: Some("A".into()),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_empty_request() {
        assert!(UpdateFeedbackRequest::default().is_empty());
        let req = UpdateFeedbackRequest {
            nominated_for_best_ta: Some(false),
            ..Default::default()
        };
        assert!(!req.is_empty());
    }
}
