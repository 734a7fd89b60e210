use std::fmt;

/// 查詢目標：一組郵遞區號，或單一地區代碼
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchTarget {
    Locations(Vec<String>),
    Region(String),
}

/// Exact-match eligibility criterion, compared against `min_age_limit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibilityFilter(String);

impl EligibilityFilter {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EligibilityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 一個查詢單位的請求參數
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestParams {
    pub label: String,
    pub query: Vec<(String, String)>,
}

/// Session-level selection criteria: positive capacity, plus the eligibility
/// filter when one is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionQuery {
    pub min_age_limit: Option<EligibilityFilter>,
}

impl fmt::Display for SessionQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.min_age_limit {
            Some(filter) => write!(
                f,
                "$.centers[*].sessions[?(@.available_capacity > 0 & @.min_age_limit == '{}')]",
                filter
            ),
            None => f.write_str("$.centers[*].sessions[?(@.available_capacity > 0)]"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    pub endpoint: String,
    pub units: Vec<RequestParams>,
    pub criteria: SessionQuery,
}

/// 正規化後的單筆可預約紀錄 (session + center)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub center_name: Option<String>,
    pub available_capacity: u64,
    pub age_range: Option<String>,
    pub price_tier: Option<String>,
    pub vaccine_name: Option<String>,
    pub date: Option<String>,
    /// JSON pointer of the source session, e.g. `/centers/2/sessions/0`.
    pub pointer: String,
}

/// Records ordered by `available_capacity`, highest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankedResultSet {
    records: Vec<Record>,
}

impl RankedResultSet {
    pub(crate) fn from_sorted(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn top(&self, n: usize) -> &[Record] {
        &self.records[..n.min(self.records.len())]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub body: String,
    pub click_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Notified { count: usize },
    Skipped,
}
