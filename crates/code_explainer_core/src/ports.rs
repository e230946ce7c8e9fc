//! crates/code_explainer_core/src/ports.rs
//!
//! Defines the service contracts (traits) the controllers depend on.
//! The backend's REST API, the terminal, and the user's confirmation prompt all sit
//! behind these traits so the controllers can be driven by fakes in tests.

use async_trait::async_trait;

use crate::domain::{
    ComplexityOption, ExplainRequest, Explanation, ExplanationId, ExplanationRecord,
    HealthReport, HistoryPage, HistoryQuery, HistoryStats, LanguageOption, Notification,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors of the transport in use.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Request rejected: {0}")]
    Rejected(String),
    #[error("Could not reach the backend: {0}")]
    Transport(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Backend Ports
//=========================================================================================

/// The `/history` half of the backend API.
#[async_trait]
pub trait HistoryService: Send + Sync {
    /// Fetches one page of records matching the query's filters, newest first.
    async fn list_explanations(&self, query: &HistoryQuery) -> PortResult<HistoryPage>;

    async fn get_explanation(&self, id: ExplanationId) -> PortResult<ExplanationRecord>;

    /// Sets the favorite flag and returns the server's confirmation message.
    async fn set_favorite(&self, id: ExplanationId, is_favorite: bool) -> PortResult<String>;

    async fn delete_explanation(&self, id: ExplanationId) -> PortResult<()>;

    async fn stats(&self) -> PortResult<HistoryStats>;
}

/// The `/code` half of the backend API, plus its health probe.
#[async_trait]
pub trait CodeService: Send + Sync {
    async fn languages(&self) -> PortResult<Vec<LanguageOption>>;

    async fn complexity_levels(&self) -> PortResult<Vec<ComplexityOption>>;

    async fn explain(&self, request: &ExplainRequest) -> PortResult<Explanation>;

    async fn health(&self) -> PortResult<HealthReport>;
}

//=========================================================================================
// User-Facing Ports
//=========================================================================================

/// Receives transient messages meant for the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Asks the user to confirm a destructive action.
#[async_trait]
pub trait Confirmation: Send + Sync {
    async fn confirm(&self, prompt: &str) -> bool;
}

/// A `Confirmation` whose answer is already known, e.g. from a `--yes` flag.
#[derive(Debug, Clone, Copy)]
pub struct Preanswered(pub bool);

#[async_trait]
impl Confirmation for Preanswered {
    async fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}
