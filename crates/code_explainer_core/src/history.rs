//! crates/code_explainer_core/src/history.rs
//!
//! The history view controller. It owns the filter, page and selection state of the
//! history list and keeps them consistent with user actions and with the paginated
//! results returned by the `HistoryService`.
//!
//! Every fetch is tagged with a sequence number. A response that arrives after a newer
//! request has been issued is discarded, so the most recent request always wins.

use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::domain::{
    ExplanationId, ExplanationRecord, FilterState, HistoryPage, HistoryQuery, HistoryView,
    LanguageOption, Notification, NotificationKind, PageState, PaginationControls,
    SelectionState,
};
use crate::ports::{CodeService, Confirmation, HistoryService, Notifier, PortError, PortResult};

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this explanation?";

//=========================================================================================
// Fetch Tickets
//=========================================================================================

/// A handle for one issued history request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
    query: HistoryQuery,
}

impl FetchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn query(&self) -> &HistoryQuery {
        &self.query
    }
}

/// What happened to a completed fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// A newer request was issued while this one was in flight.
    Stale,
    Failed(PortError),
}

//=========================================================================================
// The Controller
//=========================================================================================

pub struct HistoryController {
    history: Arc<dyn HistoryService>,
    notifier: Arc<dyn Notifier>,
    filters: FilterState,
    page: PageState,
    records: Vec<ExplanationRecord>,
    selection: SelectionState,
    view: HistoryView,
    language_options: Vec<LanguageOption>,
    last_issued: u64,
}

impl HistoryController {
    pub fn new(
        history: Arc<dyn HistoryService>,
        notifier: Arc<dyn Notifier>,
        per_page: u32,
    ) -> Self {
        Self {
            history,
            notifier,
            filters: FilterState::default(),
            page: PageState::new(per_page),
            records: Vec::new(),
            selection: SelectionState::default(),
            view: HistoryView::Idle,
            language_options: Vec::new(),
            last_issued: 0,
        }
    }

    // --- Read Accessors ---

    pub fn records(&self) -> &[ExplanationRecord] {
        &self.records
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn page_state(&self) -> &PageState {
        &self.page
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn view(&self) -> &HistoryView {
        &self.view
    }

    pub fn controls(&self) -> PaginationControls {
        self.page.controls()
    }

    /// The records shown, as a 1-based inclusive span. `(0, 0)` when the history is empty.
    pub fn range(&self) -> (u64, u64) {
        self.page.range().unwrap_or((0, 0))
    }

    pub fn language_options(&self) -> &[LanguageOption] {
        &self.language_options
    }

    // --- Startup ---

    /// Loads the first page and then the language list used by the language filter.
    pub async fn initialize(&mut self, catalog: &dyn CodeService) -> PortResult<()> {
        let fetched = self.fetch_page().await;
        self.load_language_filter(catalog).await;
        fetched
    }

    /// Failures here only cost the user the language filter, so they are logged, not shown.
    pub async fn load_language_filter(&mut self, catalog: &dyn CodeService) {
        match catalog.languages().await {
            Ok(options) => {
                debug!("Loaded {} language filter options", options.len());
                self.language_options = options;
            }
            Err(e) => error!("Error loading language filter: {}", e),
        }
    }

    // --- Fetching ---

    /// Issues a ticket for the current page and filters and puts the view into `Loading`.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.last_issued += 1;
        self.view = HistoryView::Loading;
        FetchTicket {
            seq: self.last_issued,
            query: HistoryQuery::new(self.page.page(), self.page.per_page(), self.filters.clone()),
        }
    }

    /// Applies the result of a ticket's request, unless a newer ticket has been issued since.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: PortResult<HistoryPage>,
    ) -> FetchOutcome {
        if ticket.seq < self.last_issued {
            debug!(
                "Discarding stale history response #{} (latest is #{})",
                ticket.seq, self.last_issued
            );
            return FetchOutcome::Stale;
        }

        match result {
            Ok(page) => {
                self.page.record_totals(page.total_count);
                self.records = page.records;
                self.refresh_selection();
                self.view = if self.records.is_empty() {
                    HistoryView::Empty
                } else {
                    HistoryView::Items
                };
                debug!(
                    "Loaded history page {} of {} ({} records total)",
                    self.page.page(),
                    self.page.total_pages(),
                    self.page.total_count()
                );
                FetchOutcome::Applied
            }
            Err(e) => {
                error!("Error loading history: {}", e);
                self.view = HistoryView::Error(
                    "Failed to load your code history. Please try again.".to_string(),
                );
                self.notify(Notification::error("Failed to load history"));
                FetchOutcome::Failed(e)
            }
        }
    }

    /// Fetches the current page with the current filters. Also serves as "refresh" and "retry".
    pub async fn fetch_page(&mut self) -> PortResult<()> {
        let ticket = self.begin_fetch();
        debug!("Issuing history request #{}", ticket.seq());
        let result = self.history.list_explanations(ticket.query()).await;
        match self.complete_fetch(ticket, result) {
            FetchOutcome::Applied | FetchOutcome::Stale => Ok(()),
            FetchOutcome::Failed(e) => Err(e),
        }
    }

    // --- Filters and Paging ---

    /// Replaces the filters and starts again from page 1.
    pub async fn apply_filters(&mut self, filters: FilterState) -> PortResult<()> {
        info!("Applying history filters: {:?}", filters);
        self.filters = filters;
        self.page.reset();
        self.fetch_page().await
    }

    pub async fn clear_filters(&mut self) -> PortResult<()> {
        self.apply_filters(FilterState::default()).await
    }

    /// Moves `delta` pages. Returns `false` without fetching when the matching control is
    /// disabled, i.e. the target page lies outside `1..=total_pages`.
    pub async fn change_page(&mut self, delta: i32) -> PortResult<bool> {
        let Some(target) = self.page.target(delta) else {
            debug!(
                "Ignoring page change by {} from page {} of {}",
                delta,
                self.page.page(),
                self.page.total_pages()
            );
            return Ok(false);
        };
        self.page.set_page(target);
        self.fetch_page().await?;
        Ok(true)
    }

    /// Jumps straight to `page`, under the same bounds as `change_page`.
    pub async fn go_to_page(&mut self, page: u32) -> PortResult<bool> {
        if page == 0 || page > self.page.total_pages() {
            return Ok(false);
        }
        self.page.set_page(page);
        self.fetch_page().await?;
        Ok(true)
    }

    pub async fn next_page(&mut self) -> PortResult<bool> {
        self.change_page(1).await
    }

    pub async fn previous_page(&mut self) -> PortResult<bool> {
        self.change_page(-1).await
    }

    // --- Record Actions ---

    /// Sets the favorite flag on the server, then reloads the current page.
    /// The cached records are never edited locally.
    pub async fn toggle_favorite(
        &mut self,
        id: ExplanationId,
        is_favorite: bool,
    ) -> PortResult<()> {
        match self.history.set_favorite(id, is_favorite).await {
            Ok(message) => {
                let message = if message.trim().is_empty() {
                    "Favorite status updated".to_string()
                } else {
                    message
                };
                self.notify(Notification::success(message));
                if let Some(open) = self.selection.record_mut().filter(|r| r.id == id) {
                    open.is_favorite = is_favorite;
                }
                self.fetch_page().await
            }
            Err(e) => {
                error!("Error updating favorite for explanation {}: {}", id, e);
                self.notify(Notification::error("Failed to update favorite status"));
                Err(e)
            }
        }
    }

    /// Deletes a record after the user confirms. Returns `false` if they declined.
    ///
    /// If the deletion empties the last page, the page is clamped to the new last page
    /// and fetched again.
    pub async fn delete_record(
        &mut self,
        id: ExplanationId,
        confirmation: &dyn Confirmation,
    ) -> PortResult<bool> {
        if !confirmation.confirm(DELETE_PROMPT).await {
            debug!("Deletion of explanation {} cancelled", id);
            return Ok(false);
        }

        if let Err(e) = self.history.delete_explanation(id).await {
            error!("Error deleting explanation {}: {}", id, e);
            self.notify(Notification::error("Failed to delete explanation"));
            return Err(e);
        }

        self.notify(Notification::success("Explanation deleted successfully"));
        if self.selection.id() == Some(id) {
            self.selection.clear();
        }
        self.fetch_page().await?;
        self.clamp_after_delete().await?;
        Ok(true)
    }

    async fn clamp_after_delete(&mut self) -> PortResult<()> {
        let page = self.page.page();
        let total_pages = self.page.total_pages();
        if self.records.is_empty() && page > 1 && page > total_pages {
            let clamped = total_pages.max(1);
            warn!("Page {} no longer exists, moving to page {}", page, clamped);
            self.page.set_page(clamped);
            self.fetch_page().await?;
        }
        Ok(())
    }

    // --- Detail View ---

    pub fn open_detail(&mut self, record: ExplanationRecord) {
        debug!("Opening explanation {}", record.id);
        self.selection.open(record);
    }

    pub fn close_detail(&mut self) {
        self.selection.clear();
    }

    /// Flips the favorite flag of the open record. Returns `false` if no record is open.
    pub async fn toggle_selected_favorite(&mut self) -> PortResult<bool> {
        let Some(open) = self.selection.record() else {
            return Ok(false);
        };
        let (id, desired) = (open.id, !open.is_favorite);
        self.toggle_favorite(id, desired).await?;
        Ok(true)
    }

    /// Deletes the open record and closes the detail view once it is gone.
    pub async fn delete_selected(&mut self, confirmation: &dyn Confirmation) -> PortResult<bool> {
        let Some(id) = self.selection.id() else {
            return Ok(false);
        };
        let deleted = self.delete_record(id, confirmation).await?;
        if deleted {
            self.close_detail();
        }
        Ok(deleted)
    }

    // --- Helpers ---

    /// Keeps the open record in step with a freshly fetched copy of it.
    fn refresh_selection(&mut self) {
        let Some(id) = self.selection.id() else {
            return;
        };
        if let Some(fresh) = self.records.iter().find(|r| r.id == id) {
            self.selection.open(fresh.clone());
        }
    }

    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Error => warn!("{}", notification.message),
            _ => debug!("{}", notification.message),
        }
        self.notifier.notify(notification);
    }
}
