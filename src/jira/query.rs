//! JQL construction for the open/closed classification queries.

use super::window::DateRange;

// The two status classes every issue is bucketed into. The literal lists are
// wire format: downstream servers see them verbatim inside `status IN(...)`.
const OPEN_STATUSES: &str = "'open', 'in progress', 'reopened', 'waiting for customer', 'waiting for assignment', 'pending vendor'";
const CLOSED_STATUSES: &str = "'resolved', 'closed'";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Open,
    Closed,
}

impl StatusClass {
    fn status_set(self) -> &'static str {
        match self {
            StatusClass::Open => OPEN_STATUSES,
            StatusClass::Closed => CLOSED_STATUSES,
        }
    }
}

/// One filter query: project equality, creation-date bounds, status-class
/// membership. Built once per (window, class) pair and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationQuery {
    pub project: String,
    pub range: DateRange,
    pub status_class: StatusClass,
}

impl ClassificationQuery {
    pub fn new(project: &str, range: DateRange, status_class: StatusClass) -> Self {
        Self {
            project: project.to_string(),
            range,
            status_class,
        }
    }

    /// Render the JQL string.
    ///
    /// The project value is concatenated unquoted and unescaped. That matches
    /// the query syntax the deployed servers already accept; callers must
    /// pre-sanitize project identifiers.
    pub fn to_jql(&self) -> String {
        format!(
            "project ={} AND createdDate >={} AND createdDate <={} AND status IN({})",
            self.project,
            self.range.start,
            self.range.end,
            self.status_class.status_set()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jira::window::WindowKind;
    use chrono::NaiveDate;

    fn march_2024() -> DateRange {
        WindowKind::Monthly.range(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
    }

    #[test]
    fn open_query_lists_all_six_open_statuses() {
        let jql = ClassificationQuery::new("X", march_2024(), StatusClass::Open).to_jql();
        for status in [
            "'open'",
            "'in progress'",
            "'reopened'",
            "'waiting for customer'",
            "'waiting for assignment'",
            "'pending vendor'",
        ] {
            assert!(jql.contains(status), "missing {status} in {jql}");
        }
        assert!(!jql.contains("'resolved'"));
        assert!(!jql.contains("'closed'"));
    }

    #[test]
    fn closed_query_lists_only_the_closed_statuses() {
        let jql = ClassificationQuery::new("X", march_2024(), StatusClass::Closed).to_jql();
        assert!(jql.contains("'resolved'"));
        assert!(jql.contains("'closed'"));
        assert!(!jql.contains("'reopened'"));
    }

    #[test]
    fn jql_matches_the_exact_wire_format() {
        let jql = ClassificationQuery::new("X", march_2024(), StatusClass::Closed).to_jql();
        assert_eq!(
            jql,
            "project =X AND createdDate >=2024-03-01 AND createdDate <=2024-03-31 \
             AND status IN('resolved', 'closed')"
        );
    }
}
