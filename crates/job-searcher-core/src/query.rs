//! Query state for a search session.
//!
//! A query is a plain value: filter fields plus a 1-based page number and a
//! fixed page size. Equality covers every field, page included.
//!
//! # Wire mapping
//!
//! [`SearchQuery::to_params`] turns a query into URL parameters:
//! - empty text fields are omitted,
//! - booleans and numbers are always sent, stringified,
//! - list fields are trimmed, lower-cased, stripped of blank entries and
//!   joined with `,` (omitted when nothing is left).

use std::fmt::Debug;

/// Default number of results requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Capability the search controller needs from a query type.
pub trait SearchQuery: Clone + PartialEq + Debug + Send + Sync + 'static {
    /// Current 1-based page.
    fn page(&self) -> u32;

    fn set_page(&mut self, page: u32);

    /// Results per page; fixed for a session.
    fn page_size(&self) -> u32;

    /// True iff at least one significant (discriminating) field is non-blank.
    ///
    /// Boolean toggles and numeric thresholds never count.
    fn has_criteria(&self) -> bool;

    /// URL query parameters, in a stable order.
    fn to_params(&self) -> Vec<(&'static str, String)>;

    /// True if `other` differs from `self` in anything but the page.
    fn filters_differ(&self, other: &Self) -> bool {
        let mut normalized = other.clone();
        normalized.set_page(self.page());
        normalized != *self
    }
}

fn non_blank(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Normalize a list filter for transmission.
pub fn normalize_list(values: &[String]) -> Option<String> {
    let normalized: Vec<String> = values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(|v| v.to_lowercase())
        .collect();
    if normalized.is_empty() {
        None
    } else {
        Some(normalized.join(","))
    }
}

fn push_text(params: &mut Vec<(&'static str, String)>, name: &'static str, value: &str) {
    if !value.is_empty() {
        params.push((name, value.to_string()));
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Job search
// ═══════════════════════════════════════════════════════════════════════

/// Filters for `/jobs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobQuery {
    /// Free-text terms.
    pub q: String,
    pub city: String,
    /// Workday tenant selector, e.g. `"pwc.wd3.myworkdayjobs.com:Global_Experienced_Careers:pwc"`.
    pub workday: String,
    pub include_netflix: bool,
    pub strict: bool,
    pub page: u32,
    pub page_size: u32,
}

impl Default for JobQuery {
    fn default() -> Self {
        Self {
            q: String::new(),
            city: String::new(),
            workday: String::new(),
            include_netflix: true,
            strict: true,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl JobQuery {
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            ..Default::default()
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }
}

impl SearchQuery for JobQuery {
    fn page(&self) -> u32 {
        self.page
    }

    fn set_page(&mut self, page: u32) {
        self.page = page;
    }

    fn page_size(&self) -> u32 {
        self.page_size
    }

    fn has_criteria(&self) -> bool {
        non_blank(&self.q) || non_blank(&self.city) || non_blank(&self.workday)
    }

    fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(7);
        push_text(&mut params, "q", &self.q);
        push_text(&mut params, "city", &self.city);
        push_text(&mut params, "workday", &self.workday);
        params.push(("include_netflix", self.include_netflix.to_string()));
        params.push(("strict", self.strict.to_string()));
        params.push(("page", self.page.to_string()));
        params.push(("page_size", self.page_size.to_string()));
        params
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Insight search
// ═══════════════════════════════════════════════════════════════════════

/// Filters for `/job-insights`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightsQuery {
    pub position: String,
    pub companies: Vec<String>,
    pub years_experience: u32,
    pub remote: bool,
    pub page: u32,
    pub page_size: u32,
}

impl Default for InsightsQuery {
    fn default() -> Self {
        Self {
            position: String::new(),
            companies: Vec::new(),
            years_experience: 0,
            remote: false,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl InsightsQuery {
    pub fn new(position: impl Into<String>) -> Self {
        Self {
            position: position.into(),
            ..Default::default()
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }
}

impl SearchQuery for InsightsQuery {
    fn page(&self) -> u32 {
        self.page
    }

    fn set_page(&mut self, page: u32) {
        self.page = page;
    }

    fn page_size(&self) -> u32 {
        self.page_size
    }

    fn has_criteria(&self) -> bool {
        non_blank(&self.position) || self.companies.iter().any(|c| non_blank(c))
    }

    fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(6);
        push_text(&mut params, "position", &self.position);
        if let Some(companies) = normalize_list(&self.companies) {
            params.push(("companies", companies));
        }
        params.push(("years_experience", self.years_experience.to_string()));
        params.push(("remote", self.remote.to_string()));
        params.push(("page", self.page.to_string()));
        params.push(("page_size", self.page_size.to_string()));
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param<'a>(params: &'a [(&'static str, String)], name: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_job_criteria_ignores_toggles() {
        let mut query = JobQuery::default();
        assert!(!query.has_criteria());
        query.strict = false;
        query.include_netflix = false;
        assert!(!query.has_criteria());
        query.city = "   ".into();
        assert!(!query.has_criteria());
        query.workday = "pwc.wd3.myworkdayjobs.com".into();
        assert!(query.has_criteria());
    }

    #[test]
    fn test_insight_criteria_from_companies() {
        let mut query = InsightsQuery::default();
        query.years_experience = 10;
        query.remote = true;
        assert!(!query.has_criteria());
        query.companies = vec!["  ".into(), "".into()];
        assert!(!query.has_criteria());
        query.companies.push("Acme".into());
        assert!(query.has_criteria());
    }

    #[test]
    fn test_job_params_omit_empty_text() {
        let query = JobQuery::new("rust");
        let params = query.to_params();
        assert_eq!(param(&params, "q"), Some("rust"));
        assert_eq!(param(&params, "city"), None);
        assert_eq!(param(&params, "workday"), None);
        assert_eq!(param(&params, "include_netflix"), Some("true"));
        assert_eq!(param(&params, "strict"), Some("true"));
        assert_eq!(param(&params, "page"), Some("1"));
        assert_eq!(param(&params, "page_size"), Some("20"));
    }

    #[test]
    fn test_insight_params_normalize_companies() {
        let query = InsightsQuery {
            companies: vec![" Acme ".into(), "".into(), "GLOBEX".into(), "  ".into()],
            ..Default::default()
        };
        let params = query.to_params();
        assert_eq!(param(&params, "position"), None);
        assert_eq!(param(&params, "companies"), Some("acme,globex"));
        assert_eq!(param(&params, "years_experience"), Some("0"));
        assert_eq!(param(&params, "remote"), Some("false"));
    }

    #[test]
    fn test_insight_params_drop_empty_company_list() {
        let query = InsightsQuery {
            position: "analyst".into(),
            companies: vec![" ".into()],
            ..Default::default()
        };
        assert_eq!(param(&query.to_params(), "companies"), None);
    }

    #[test]
    fn test_equality_includes_page() {
        let a = JobQuery::new("rust");
        let mut b = a.clone();
        assert_eq!(a, b);
        b.page = 2;
        assert_ne!(a, b);
        assert!(!a.filters_differ(&b));
        b.city = "Austin".into();
        assert!(a.filters_differ(&b));
    }

    #[test]
    fn test_page_size_floor() {
        assert_eq!(JobQuery::default().with_page_size(0).page_size, 1);
        assert_eq!(InsightsQuery::default().with_page_size(50).page_size, 50);
    }
}
