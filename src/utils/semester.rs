//! 学期标签推导

use chrono::{Datelike, Local};

/// 根据日期推导学期标签
///
/// 1–6 月为 `Winter-<年>`，7–12 月为 `Monsoon-<年>`。
pub fn semester_label(date: impl Datelike) -> String {
    let term = if date.month() <= 6 { "Winter" } else { "Monsoon" };
    format!("{term}-{}", date.year())
}

/// 当前时刻对应的学期标签
///
/// 按服务器本地时区的日期计算，6/7 月与 12/1 月交界处以本地日期为准。
pub fn current_semester_label() -> String {
    semester_label(Local::now())
}
