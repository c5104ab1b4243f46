use once_cell::sync::Lazy;
use regex::Regex;

static SEMESTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]+-\d{4}$").expect("Invalid semester regex"));

pub fn validate_semester_label(label: &str) -> Result<(), &'static str> {
    // 学期标签格式：<学期名>-<四位年份>，例如 Winter-2025
    if !SEMESTER_RE.is_match(label) {
        return Err("Semester must look like <Term>-<YYYY>, e.g. Winter-2025");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_labels() {
        assert!(validate_semester_label("Winter-2025").is_ok());
        assert!(validate_semester_label("Monsoon-1999").is_ok());
    }

    #[test]
    fn test_invalid_labels() {
        assert!(validate_semester_label("").is_err());
        assert!(validate_semester_label("Fall 2025").is_err());
        assert!(validate_semester_label("Winter-25").is_err());
        assert!(validate_semester_label("Winter-2025; DROP").is_err());
    }
}
