//! crates/code_explainer_core/src/domain.rs
//!
//! Defines the pure, core data structures for the code explainer client.
//! These structs are independent of any HTTP library or serialization format.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// Server-assigned identifier of an explanation record.
pub type ExplanationId = i64;

/// Number of history records requested per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Largest page size the history endpoint accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

//=========================================================================================
// Complexity Level and Language Choice
//=========================================================================================

/// The depth of explanation requested for a code snippet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ComplexityLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl ComplexityLevel {
    pub const ALL: [ComplexityLevel; 3] = [
        ComplexityLevel::Beginner,
        ComplexityLevel::Intermediate,
        ComplexityLevel::Advanced,
    ];

    /// The canonical lowercase name used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplexityLevel::Beginner => "beginner",
            ComplexityLevel::Intermediate => "intermediate",
            ComplexityLevel::Advanced => "advanced",
        }
    }
}

impl fmt::Display for ComplexityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown complexity level '{0}' (expected beginner, intermediate or advanced)")]
pub struct ParseComplexityError(pub String);

impl FromStr for ComplexityLevel {
    type Err = ParseComplexityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(ComplexityLevel::Beginner),
            "intermediate" => Ok(ComplexityLevel::Intermediate),
            "advanced" => Ok(ComplexityLevel::Advanced),
            _ => Err(ParseComplexityError(s.to_string())),
        }
    }
}

/// The language sent along with an explain request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LanguageChoice {
    /// Let the backend detect the language.
    #[default]
    Auto,
    /// An explicit, lowercased language tag such as `python`.
    Tag(String),
}

impl LanguageChoice {
    /// Interprets user input. Blank input, `auto` and `auto-detect` all mean auto-detection.
    pub fn parse(input: &str) -> Self {
        let normalized = input.trim().to_lowercase();
        match normalized.as_str() {
            "" | "auto" | "auto-detect" => LanguageChoice::Auto,
            _ => LanguageChoice::Tag(normalized),
        }
    }

    pub fn as_tag(&self) -> Option<&str> {
        match self {
            LanguageChoice::Auto => None,
            LanguageChoice::Tag(tag) => Some(tag),
        }
    }
}

//=========================================================================================
// Explanation Records
//=========================================================================================

/// A stored code snippet plus its generated explanation and metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplanationRecord {
    pub id: ExplanationId,
    pub code_snippet: String,
    pub language: String,
    pub complexity_level: ComplexityLevel,
    /// Rendered HTML produced by the backend.
    pub explanation: String,
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
    pub tags: Option<String>,
}

/// One page of history as returned by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryPage {
    pub records: Vec<ExplanationRecord>,
    pub total_count: u64,
}

//=========================================================================================
// Filter, Page and Selection State
//=========================================================================================

/// The user's current history filters. Absent fields never reach the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub language: Option<String>,
    pub complexity_level: Option<ComplexityLevel>,
    pub is_favorite: Option<bool>,
    pub search_term: Option<String>,
}

impl FilterState {
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = non_blank(language.into());
        self
    }

    pub fn with_complexity(mut self, level: ComplexityLevel) -> Self {
        self.complexity_level = Some(level);
        self
    }

    pub fn with_favorite(mut self, is_favorite: bool) -> Self {
        self.is_favorite = Some(is_favorite);
        self
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = non_blank(term.into());
        self
    }

    /// True when no field would contribute to the query.
    pub fn is_empty(&self) -> bool {
        self.query_pairs().is_empty()
    }

    /// The filter fields that carry a value, as query-string pairs.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(language) = self.language.as_deref().filter(|s| !s.trim().is_empty()) {
            pairs.push(("language", language.to_string()));
        }
        if let Some(level) = self.complexity_level {
            pairs.push(("complexity_level", level.as_str().to_string()));
        }
        if let Some(is_favorite) = self.is_favorite {
            pairs.push(("is_favorite", is_favorite.to_string()));
        }
        if let Some(term) = self.search_term.as_deref().filter(|s| !s.trim().is_empty()) {
            pairs.push(("search_term", term.to_string()));
        }
        pairs
    }
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// A fully specified request for one page of history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    pub page: u32,
    pub per_page: u32,
    pub filters: FilterState,
}

impl HistoryQuery {
    pub fn new(page: u32, per_page: u32, filters: FilterState) -> Self {
        Self {
            page,
            per_page,
            filters,
        }
    }

    /// Pagination parameters first, then every non-empty filter field.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("per_page", self.per_page.to_string()),
        ];
        pairs.extend(self.filters.query_pairs());
        pairs
    }
}

/// Which pagination controls are usable for the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationControls {
    pub visible: bool,
    pub previous_enabled: bool,
    pub next_enabled: bool,
}

/// Current page plus the totals reported by the last successful fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    page: u32,
    per_page: u32,
    total_count: u64,
    total_pages: u32,
}

impl PageState {
    /// Creates the state for page 1. The page size is clamped to `1..=MAX_PAGE_SIZE`.
    pub fn new(per_page: u32) -> Self {
        Self {
            page: 1,
            per_page: per_page.clamp(1, MAX_PAGE_SIZE),
            total_count: 0,
            total_pages: 0,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// `ceil(total_count / per_page)`.
    pub fn total_pages_for(total_count: u64, per_page: u32) -> u32 {
        let pages = total_count.div_ceil(u64::from(per_page.max(1)));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    pub(crate) fn reset(&mut self) {
        self.page = 1;
    }

    pub(crate) fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    pub(crate) fn record_totals(&mut self, total_count: u64) {
        self.total_count = total_count;
        self.total_pages = Self::total_pages_for(total_count, self.per_page);
    }

    /// The page reached by moving `delta` pages, if it lies within `1..=total_pages`.
    pub fn target(&self, delta: i32) -> Option<u32> {
        let target = i64::from(self.page) + i64::from(delta);
        if target >= 1 && target <= i64::from(self.total_pages) {
            u32::try_from(target).ok()
        } else {
            None
        }
    }

    pub fn controls(&self) -> PaginationControls {
        PaginationControls {
            visible: self.total_pages > 1,
            previous_enabled: self.page > 1,
            next_enabled: self.page < self.total_pages,
        }
    }

    /// The 1-based inclusive span of records shown on this page, `None` when there are none.
    pub fn range(&self) -> Option<(u64, u64)> {
        if self.total_count == 0 {
            return None;
        }
        let per_page = u64::from(self.per_page);
        let start = u64::from(self.page - 1) * per_page + 1;
        let end = (u64::from(self.page) * per_page).min(self.total_count);
        Some((start, end))
    }
}

/// The record whose detail view is currently open, if any.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    open: Option<ExplanationRecord>,
}

impl SelectionState {
    pub fn record(&self) -> Option<&ExplanationRecord> {
        self.open.as_ref()
    }

    pub fn id(&self) -> Option<ExplanationId> {
        self.open.as_ref().map(|record| record.id)
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub(crate) fn open(&mut self, record: ExplanationRecord) {
        self.open = Some(record);
    }

    pub(crate) fn clear(&mut self) {
        self.open = None;
    }

    pub(crate) fn record_mut(&mut self) -> Option<&mut ExplanationRecord> {
        self.open.as_mut()
    }
}

/// What the history list area should currently show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryView {
    /// Nothing has been requested yet.
    Idle,
    Loading,
    Empty,
    Items,
    Error(String),
}

//=========================================================================================
// Catalog, Explain and Status Types
//=========================================================================================

/// A language the backend can explain, as offered in selection lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageOption {
    pub value: String,
    pub name: String,
    pub icon: String,
}

/// A complexity level as described by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexityOption {
    pub level: ComplexityLevel,
    pub name: String,
    pub description: String,
    pub icon: String,
}

/// A request to explain one code snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplainRequest {
    pub code_snippet: String,
    pub language: LanguageChoice,
    pub complexity_level: ComplexityLevel,
}

/// The backend's answer to an explain request.
#[derive(Debug, Clone, PartialEq)]
pub struct Explanation {
    /// Rendered HTML.
    pub text: String,
    /// The language the backend used, detected or as requested.
    pub language: String,
    pub complexity_level: ComplexityLevel,
    /// Server-side processing time in seconds.
    pub processing_time: Option<f64>,
}

/// Aggregate counts over the whole history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryStats {
    pub total_explanations: u64,
    pub favorite_explanations: u64,
    pub language_distribution: Vec<(String, u64)>,
    pub complexity_distribution: Vec<(String, u64)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthReport {
    pub status: String,
    pub version: String,
    pub llm_service_status: String,
    pub database_status: String,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

//=========================================================================================
// Notifications
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

/// A transient, user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Warning,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Info,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complexity_parses_case_insensitively() {
        assert_eq!("Advanced".parse(), Ok(ComplexityLevel::Advanced));
        assert_eq!(" beginner ".parse(), Ok(ComplexityLevel::Beginner));
        assert!("expert".parse::<ComplexityLevel>().is_err());
    }

    #[test]
    fn language_choice_treats_auto_and_blank_alike() {
        assert_eq!(LanguageChoice::parse(""), LanguageChoice::Auto);
        assert_eq!(LanguageChoice::parse("Auto-Detect"), LanguageChoice::Auto);
        assert_eq!(
            LanguageChoice::parse("Python"),
            LanguageChoice::Tag("python".to_string())
        );
    }

    #[test]
    fn blank_filter_fields_are_left_out_of_the_query() {
        let filters = FilterState {
            language: Some(String::new()),
            complexity_level: None,
            is_favorite: Some(false),
            search_term: Some("   ".to_string()),
        };
        let query = HistoryQuery::new(2, 12, filters);
        assert_eq!(
            query.query_pairs(),
            vec![
                ("page", "2".to_string()),
                ("per_page", "12".to_string()),
                ("is_favorite", "false".to_string()),
            ]
        );
    }

    #[test]
    fn builder_drops_blank_values() {
        let filters = FilterState::default().with_language("").with_search(" ");
        assert!(filters.is_empty());
        assert_eq!(filters, FilterState::default());
    }

    #[test]
    fn total_pages_is_the_ceiling() {
        assert_eq!(PageState::total_pages_for(25, 12), 3);
        assert_eq!(PageState::total_pages_for(24, 12), 2);
        assert_eq!(PageState::total_pages_for(0, 12), 0);
        assert_eq!(PageState::total_pages_for(1, 12), 1);
    }

    #[test]
    fn controls_follow_page_boundaries() {
        let mut state = PageState::new(12);
        state.record_totals(25);

        let first = state.controls();
        assert!(first.visible);
        assert!(!first.previous_enabled);
        assert!(first.next_enabled);

        state.set_page(3);
        let last = state.controls();
        assert!(last.previous_enabled);
        assert!(!last.next_enabled);
        assert_eq!(state.target(1), None);
        assert_eq!(state.target(-1), Some(2));
    }

    #[test]
    fn single_page_hides_controls() {
        let mut state = PageState::new(12);
        state.record_totals(5);
        let controls = state.controls();
        assert!(!controls.visible);
        assert!(!controls.next_enabled);
        assert_eq!(state.target(1), None);
    }

    #[test]
    fn range_is_clipped_to_the_total() {
        let mut state = PageState::new(12);
        state.record_totals(25);
        state.set_page(3);
        assert_eq!(state.range(), Some((25, 25)));
        state.set_page(2);
        assert_eq!(state.range(), Some((13, 24)));
        state.record_totals(0);
        assert_eq!(state.range(), None);
    }

    #[test]
    fn page_size_is_clamped() {
        assert_eq!(PageState::new(0).per_page(), 1);
        assert_eq!(PageState::new(500).per_page(), MAX_PAGE_SIZE);
    }
}
