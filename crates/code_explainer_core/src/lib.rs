pub mod domain;
pub mod explain;
pub mod history;
pub mod ports;
pub mod samples;

pub use domain::{
    ComplexityLevel, ComplexityOption, ExplainRequest, Explanation, ExplanationId,
    ExplanationRecord, FilterState, HealthReport, HistoryPage, HistoryQuery, HistoryStats,
    HistoryView, LanguageChoice, LanguageOption, Notification, NotificationKind, PageState,
    PaginationControls, SelectionState,
};
pub use explain::ExplainController;
pub use history::{FetchOutcome, FetchTicket, HistoryController};
pub use ports::{
    CodeService, Confirmation, HistoryService, Notifier, PortError, PortResult, Preanswered,
};
