use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

/// 分项评价等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/feedback.ts")]
pub enum RatingLevel {
    #[serde(rename = "Excellent")]
    Excellent,
    #[serde(rename = "Very Good")]
    VeryGood,
    #[serde(rename = "Good")]
    Good,
    #[serde(rename = "Average")]
    Average,
    #[serde(rename = "Below Average")]
    BelowAverage,
    #[serde(rename = "NA")]
    NotApplicable,
}

impl RatingLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RatingLevel::Excellent => "Excellent",
            RatingLevel::VeryGood => "Very Good",
            RatingLevel::Good => "Good",
            RatingLevel::Average => "Average",
            RatingLevel::BelowAverage => "Below Average",
            RatingLevel::NotApplicable => "NA",
        }
    }
}

impl fmt::Display for RatingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RatingLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Excellent" => Ok(RatingLevel::Excellent),
            "Very Good" => Ok(RatingLevel::VeryGood),
            "Good" => Ok(RatingLevel::Good),
            "Average" => Ok(RatingLevel::Average),
            "Below Average" => Ok(RatingLevel::BelowAverage),
            "NA" => Ok(RatingLevel::NotApplicable),
            _ => Err(format!("Invalid rating: {s}")),
        }
    }
}

/// 总评等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/feedback.ts")]
pub enum OverallGrade {
    S,
    X,
}

impl OverallGrade {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverallGrade::S => "S",
            OverallGrade::X => "X",
        }
    }
}

impl fmt::Display for OverallGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OverallGrade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "S" => Ok(OverallGrade::S),
            "X" => Ok(OverallGrade::X),
            _ => Err(format!("Invalid overall grade: {s}")),
        }
    }
}

/// 七个评价字段
///
/// 存储层按字符串保存，写入前由请求校验保证取值合法。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/feedback.ts")]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRatings {
    pub overall_grade: String,
    pub regularity_in_meeting: String,
    pub attendance_in_lectures: String,
    pub preparedness_for_tutorials: String,
    pub timeliness_of_tasks: String,
    pub quality_of_work: String,
    pub attitude_commitment: String,
}

impl Default for FeedbackRatings {
    // 新建占位反馈的默认值：全部 Excellent，总评 S
    fn default() -> Self {
        let excellent = RatingLevel::Excellent.as_str().to_string();
        Self {
            overall_grade: OverallGrade::S.as_str().to_string(),
            regularity_in_meeting: excellent.clone(),
            attendance_in_lectures: excellent.clone(),
            preparedness_for_tutorials: excellent.clone(),
            timeliness_of_tasks: excellent.clone(),
            quality_of_work: excellent.clone(),
            attitude_commitment: excellent,
        }
    }
}

/// (课程, 教授, 学生) 三元组，在线反馈的唯一键
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FeedbackTriple {
    pub course_id: i64,
    pub professor_id: i64,
    pub student_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/feedback.ts")]
pub struct CourseRef {
    pub id: i64,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/feedback.ts")]
pub struct ProfessorRef {
    pub id: i64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/feedback.ts")]
#[serde(rename_all = "camelCase")]
pub struct StudentRef {
    pub id: i64,
    pub name: String,
    pub roll_no: String,
    pub email: String,
}

/// 在线反馈（关联课程、教授、学生）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/feedback.ts")]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: i64,
    pub course: CourseRef,
    pub professor: ProfessorRef,
    pub student: StudentRef,
    #[serde(flatten)]
    #[ts(flatten)]
    pub ratings: FeedbackRatings,
    #[serde(rename = "nominatedForBestTA")]
    pub nominated_for_best_ta: bool,
    pub comments: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 提名记录，在线与归档共用同一形状
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/feedback.ts")]
pub struct Nomination {
    pub course: NominationCourse,
    pub student: NominationStudent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/feedback.ts")]
pub struct NominationCourse {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/feedback.ts")]
#[serde(rename_all = "camelCase")]
pub struct NominationStudent {
    pub name: String,
    pub roll_no: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_level_round_trips_display_names() {
        for level in [
            RatingLevel::Excellent,
            RatingLevel::VeryGood,
            RatingLevel::Good,
            RatingLevel::Average,
            RatingLevel::BelowAverage,
            RatingLevel::NotApplicable,
        ] {
            assert_eq!(level.as_str().parse::<RatingLevel>(), Ok(level));
        }
        assert!("very good".parse::<RatingLevel>().is_err());
    }

    #[test]
    fn test_default_ratings() {
        let ratings = FeedbackRatings::default();
        assert_eq!(ratings.overall_grade, "S");
        assert_eq!(ratings.regularity_in_meeting, "Excellent");
        assert_eq!(ratings.attitude_commitment, "Excellent");
    }

    #[test]
    fn test_feedback_serializes_flat_ratings() {
        let feedback = Feedback {
            id: 7,
            course: CourseRef {
                id: 1,
                code: "CSE101".into(),
                name: "Intro".into(),
            },
            professor: ProfessorRef {
                id: 2,
                name: "Prof".into(),
                email: "prof@example.edu".into(),
            },
            student: StudentRef {
                id: 3,
                name: "Stu".into(),
                roll_no: "2022001".into(),
                email: "stu@example.edu".into(),
            },
            ratings: FeedbackRatings::default(),
            nominated_for_best_ta: true,
            comments: String::new(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };

        let value = serde_json::to_value(&feedback).expect("serializable");
        assert_eq!(value["overallGrade"], "S");
        assert_eq!(value["nominatedForBestTA"], true);
        assert_eq!(value["student"]["rollNo"], "2022001");
    }
}
