//! 归档保留策略
//!
//! 只依赖 (学期, 归档时间) 投影，排序与分组都在内存中完成。

use std::collections::{BTreeMap, BTreeSet};

/// 按学期最新归档时间倒序取前 `n` 个学期
///
/// 最新归档时间相同时按标签倒序，保证结果确定。
pub fn semesters_to_keep(projection: &[(String, i64)], n: usize) -> Vec<String> {
    let mut latest: BTreeMap<&str, i64> = BTreeMap::new();
    for (semester, archived_at) in projection {
        latest
            .entry(semester.as_str())
            .and_modify(|t| *t = (*t).max(*archived_at))
            .or_insert(*archived_at);
    }

    let mut groups: Vec<(&str, i64)> = latest.into_iter().collect();
    groups.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| b.0.cmp(a.0)));
    groups
        .into_iter()
        .take(n)
        .map(|(semester, _)| semester.to_string())
        .collect()
}

/// 一次关闭操作的保留计划
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionPlan {
    /// 保留的学期：最近 `n` 个之后追加当前学期
    pub keep: Vec<String>,
    /// 需要清理的学期，按标签升序
    pub prune: Vec<String>,
}

impl RetentionPlan {
    pub fn is_kept(&self, semester: &str) -> bool {
        self.keep.iter().any(|s| s == semester)
    }
}

/// 计算保留集与清理集
///
/// 保留集 = `semesters_to_keep(n)` ∪ {当前学期}，其余出现在投影中的学期全部清理。
pub fn plan_retention(projection: &[(String, i64)], n: usize, current: &str) -> RetentionPlan {
    let mut keep = semesters_to_keep(projection, n);
    if !keep.iter().any(|s| s == current) {
        keep.push(current.to_string());
    }

    let prune: BTreeSet<&str> = projection
        .iter()
        .map(|(semester, _)| semester.as_str())
        .filter(|semester| !keep.iter().any(|k| k == semester))
        .collect();

    RetentionPlan {
        keep,
        prune: prune.into_iter().map(str::to_string).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(items: &[(&str, i64)]) -> Vec<(String, i64)> {
        items.iter().map(|(s, t)| (s.to_string(), *t)).collect()
    }

    #[test]
    fn test_keeps_two_most_recent_plus_current() {
        let projection = rows(&[("A", 100), ("A", 110), ("B", 200), ("C", 300), ("C", 250)]);
        assert_eq!(semesters_to_keep(&projection, 2), vec!["C", "B"]);

        let plan = plan_retention(&projection, 2, "D");
        assert_eq!(plan.keep, vec!["C", "B", "D"]);
        assert_eq!(plan.prune, vec!["A"]);
        assert!(plan.is_kept("D"));
        assert!(!plan.is_kept("A"));
    }

    #[test]
    fn test_uses_latest_archive_date_per_semester() {
        // A 的最新归档晚于 B，即使 A 的最早记录更早
        let projection = rows(&[("A", 10), ("A", 500), ("B", 300), ("C", 200)]);
        assert_eq!(semesters_to_keep(&projection, 2), vec!["A", "B"]);
    }

    #[test]
    fn test_ties_are_broken_by_label() {
        let projection = rows(&[("Monsoon-2024", 100), ("Winter-2024", 100), ("Alpha-2020", 100)]);
        assert_eq!(
            semesters_to_keep(&projection, 2),
            vec!["Winter-2024", "Monsoon-2024"]
        );
    }

    #[test]
    fn test_current_already_kept_is_not_duplicated() {
        let projection = rows(&[("A", 1), ("B", 2), ("C", 3)]);
        let plan = plan_retention(&projection, 2, "C");
        assert_eq!(plan.keep, vec!["C", "B"]);
        assert_eq!(plan.prune, vec!["A"]);
    }

    #[test]
    fn test_empty_projection() {
        let plan = plan_retention(&[], 2, "Winter-2025");
        assert_eq!(plan.keep, vec!["Winter-2025"]);
        assert!(plan.prune.is_empty());
        assert!(semesters_to_keep(&[], 2).is_empty());
    }

    #[test]
    fn test_zero_window_keeps_only_current() {
        let projection = rows(&[("A", 1), ("B", 2)]);
        let plan = plan_retention(&projection, 0, "B");
        assert_eq!(plan.keep, vec!["B"]);
        assert_eq!(plan.prune, vec!["A"]);
    }
}
