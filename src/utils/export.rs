//! 反馈表格导出
//!
//! 生成的文件只存在于内存中，由调用方决定作为下载响应返回或交给通知通道。

use rust_xlsxwriter::{Format, Workbook};

use crate::errors::Result;
use crate::models::archived_feedbacks::entities::{ArchiveExport, ArchivedFeedback, ExportFormat};
use crate::models::feedbacks::entities::Feedback;

/// 归档导出表头
pub const ARCHIVE_HEADERS: [&str; 18] = [
    "Course Code",
    "Course Name",
    "Student RollNo",
    "Student Name",
    "Student Email",
    "Professor Name",
    "Professor Email",
    "Overall Grade",
    "Regularity",
    "Attendance",
    "Preparedness",
    "Timeliness",
    "Quality of Work",
    "Commitment",
    "Nominated For Best TA",
    "Comments",
    "Semester",
    "Archived Date",
];

/// 在线反馈导出表头
pub const LIVE_HEADERS: [&str; 14] = [
    "Professor Name",
    "Professor Email",
    "Student Roll No.",
    "Student Name",
    "Course Name",
    "Overall Grade",
    "Regularity in Meeting",
    "Attendance in Lectures",
    "Preparedness for Tutorials",
    "Timeliness of Tasks",
    "Quality of Work",
    "Attitude and Commitment",
    "Nominated for Best TA",
    "Comments",
];

pub const ARCHIVE_SHEET_NAME: &str = "Archived Feedback";
pub const LIVE_SHEET_NAME: &str = "Submitted Feedbacks";
pub const LIVE_EXPORT_FILENAME: &str = "SubmittedFeedbacks.xlsx";

fn yes_no(flag: bool) -> String {
    if flag { "Yes" } else { "No" }.to_string()
}

fn or_na(value: &str) -> String {
    if value.is_empty() {
        "N/A".to_string()
    } else {
        value.to_string()
    }
}

fn archive_row(fb: &ArchivedFeedback) -> [String; 18] {
    [
        fb.course_code.clone(),
        fb.course_name.clone(),
        fb.student_roll_no.clone(),
        fb.student_name.clone(),
        fb.student_email.clone(),
        fb.professor_name.clone(),
        fb.professor_email.clone(),
        fb.ratings.overall_grade.clone(),
        fb.ratings.regularity_in_meeting.clone(),
        fb.ratings.attendance_in_lectures.clone(),
        fb.ratings.preparedness_for_tutorials.clone(),
        fb.ratings.timeliness_of_tasks.clone(),
        fb.ratings.quality_of_work.clone(),
        fb.ratings.attitude_commitment.clone(),
        yes_no(fb.nominated_for_best_ta),
        fb.comments.clone(),
        fb.semester.clone(),
        fb.archived_at.to_rfc3339(),
    ]
}

fn live_row(fb: &Feedback) -> [String; 14] {
    [
        or_na(&fb.professor.name),
        or_na(&fb.professor.email),
        or_na(&fb.student.roll_no),
        or_na(&fb.student.name),
        or_na(&fb.course.name),
        or_na(&fb.ratings.overall_grade),
        or_na(&fb.ratings.regularity_in_meeting),
        or_na(&fb.ratings.attendance_in_lectures),
        or_na(&fb.ratings.preparedness_for_tutorials),
        or_na(&fb.ratings.timeliness_of_tasks),
        or_na(&fb.ratings.quality_of_work),
        or_na(&fb.ratings.attitude_commitment),
        yes_no(fb.nominated_for_best_ta),
        or_na(&fb.comments),
    ]
}

fn write_xlsx<const N: usize>(
    sheet_name: &str,
    headers: &[&str; N],
    rows: impl Iterator<Item = [String; N]>,
) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    // 表头格式
    let header_format = Format::new().set_bold();
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    for (row, values) in rows.enumerate() {
        let row = (row + 1) as u32;
        for (col, value) in values.iter().enumerate() {
            worksheet.write_string(row, col as u16, value.as_str())?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn write_csv<const N: usize>(
    headers: &[&str; N],
    rows: impl Iterator<Item = [String; N]>,
) -> Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(headers)?;
    for values in rows {
        wtr.write_record(&values)?;
    }
    wtr.into_inner()
        .map_err(|e| crate::errors::PortalError::export(format!("CSV 生成失败: {e}")))
}

/// 渲染归档反馈导出文件
pub fn render_archive(
    feedbacks: &[ArchivedFeedback],
    format: ExportFormat,
    file_stem: &str,
) -> Result<ArchiveExport> {
    let rows = feedbacks.iter().map(archive_row);
    let bytes = match format {
        ExportFormat::Xlsx => write_xlsx(ARCHIVE_SHEET_NAME, &ARCHIVE_HEADERS, rows)?,
        ExportFormat::Csv => write_csv(&ARCHIVE_HEADERS, rows)?,
    };

    Ok(ArchiveExport {
        filename: format!("{file_stem}.{}", format.extension()),
        format,
        bytes,
    })
}

/// 渲染在线反馈导出文件（固定为 xlsx）
pub fn render_live(feedbacks: &[Feedback]) -> Result<ArchiveExport> {
    let bytes = write_xlsx(LIVE_SHEET_NAME, &LIVE_HEADERS, feedbacks.iter().map(live_row))?;
    Ok(ArchiveExport {
        filename: LIVE_EXPORT_FILENAME.to_string(),
        format: ExportFormat::Xlsx,
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::feedbacks::entities::FeedbackRatings;
    use chrono::{TimeZone, Utc};

    fn archived(semester: &str, nominated: bool) -> ArchivedFeedback {
        ArchivedFeedback {
            id: 1,
            course_code: "CSE101".into(),
            course_name: "Intro, Programming".into(),
            student_name: "Asha".into(),
            student_roll_no: "2022001".into(),
            student_email: "asha@example.edu".into(),
            professor_name: "Rao".into(),
            professor_email: "rao@example.edu".into(),
            ratings: FeedbackRatings::default(),
            nominated_for_best_ta: nominated,
            comments: "Helpful".into(),
            semester: semester.into(),
            archived_at: Utc.with_ymd_and_hms(2025, 5, 1, 10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_archive_csv_columns() {
        let export = render_archive(
            &[archived("Winter-2025", true), archived("Winter-2025", false)],
            ExportFormat::Csv,
            "Archived_Feedback",
        )
        .expect("csv renders");
        assert_eq!(export.filename, "Archived_Feedback.csv");

        let text = String::from_utf8(export.bytes).expect("utf-8");
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(ARCHIVE_HEADERS.join(",").as_str()));

        let first = lines.next().expect("first row");
        assert!(first.starts_with("CSE101,\"Intro, Programming\",2022001,Asha,"));
        assert!(first.contains(",Yes,Helpful,Winter-2025,2025-05-01T10:00:00+00:00"));
        assert!(lines.next().expect("second row").contains(",No,"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_archive_xlsx_is_a_zip_container() {
        let export = render_archive(
            &[archived("Monsoon-2024", false)],
            ExportFormat::Xlsx,
            "Archived_Feedback",
        )
        .expect("xlsx renders");
        assert_eq!(export.filename, "Archived_Feedback.xlsx");
        assert!(export.bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_empty_archive_still_renders_headers() {
        let export =
            render_archive(&[], ExportFormat::Csv, "empty").expect("empty csv renders");
        let text = String::from_utf8(export.bytes).expect("utf-8");
        assert_eq!(text.trim_end(), ARCHIVE_HEADERS.join(","));
    }
}
