//! services/client/src/browse.rs
//!
//! The interactive history browser. One task owns the `HistoryController` and reacts to
//! two event sources: command lines typed on stdin, and settled search terms coming out
//! of the debouncer.

use futures::StreamExt;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::Config;
use crate::debounce::Debouncer;
use crate::error::ClientError;
use crate::render;
use crate::terminal::{LineConfirmation, SharedLines};
use code_explainer_core::domain::{ComplexityLevel, HistoryView, Notification};
use code_explainer_core::ports::{CodeService, HistoryService, Notifier, PortResult};
use code_explainer_core::HistoryController;

pub const HELP: &str = "\
Commands:
  n, next            next page
  p, prev            previous page
  page N             jump to page N
  lang [LANG|any]    filter by language
  level [LEVEL|any]  filter by complexity (beginner, intermediate, advanced)
  fav yes|no|any     filter by favorite flag
  search [TEXT]      search code and explanations (empty clears)
  clear              clear all filters
  r, refresh         reload the current page
  open N             show card N in full
  close              close the open explanation
  star [N]           toggle favorite on card N, or on the open explanation
  rm [N]             delete card N, or the open explanation
  h, help            show this help
  q, quit            leave";

//=========================================================================================
// Command Parsing
//=========================================================================================

/// One parsed line of browser input. Card numbers are 1-based positions on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Next,
    Previous,
    Page(u32),
    Language(Option<String>),
    Level(Option<ComplexityLevel>),
    Favorite(Option<bool>),
    Search(String),
    Clear,
    Refresh,
    Open(usize),
    Close,
    Star(Option<usize>),
    Remove(Option<usize>),
    Help,
    Quit,
}

impl BrowseCommand {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let optional = |value: &str| {
            let value = value.to_lowercase();
            if value.is_empty() || value == "any" || value == "all" {
                None
            } else {
                Some(value)
            }
        };

        match word.to_lowercase().as_str() {
            "n" | "next" => Ok(Self::Next),
            "p" | "prev" | "previous" => Ok(Self::Previous),
            "page" => parse_number(rest).map(Self::Page),
            "lang" | "language" => Ok(Self::Language(optional(rest))),
            "level" | "complexity" => match optional(rest) {
                None => Ok(Self::Level(None)),
                Some(level) => level
                    .parse()
                    .map(|l| Self::Level(Some(l)))
                    .map_err(|e: code_explainer_core::domain::ParseComplexityError| e.to_string()),
            },
            "fav" | "favorite" => match optional(rest).as_deref() {
                None => Ok(Self::Favorite(None)),
                Some("yes" | "y" | "true") => Ok(Self::Favorite(Some(true))),
                Some("no" | "n" | "false") => Ok(Self::Favorite(Some(false))),
                Some(other) => Err(format!("expected yes, no or any, got '{}'", other)),
            },
            "search" | "s" | "/" => Ok(Self::Search(rest.to_string())),
            "clear" => Ok(Self::Clear),
            "r" | "refresh" | "retry" => Ok(Self::Refresh),
            "open" | "o" => parse_number(rest).map(Self::Open),
            "close" | "c" => Ok(Self::Close),
            "star" => parse_optional_number(rest).map(Self::Star),
            "rm" | "delete" => parse_optional_number(rest).map(Self::Remove),
            "h" | "help" | "?" => Ok(Self::Help),
            "q" | "quit" | "exit" => Ok(Self::Quit),
            "" => Err("type 'help' for a list of commands".to_string()),
            other => Err(format!("unknown command '{}', type 'help'", other)),
        }
    }
}

fn parse_number<T: std::str::FromStr>(raw: &str) -> Result<T, String> {
    raw.parse()
        .map_err(|_| format!("expected a number, got '{}'", raw))
}

fn parse_optional_number(raw: &str) -> Result<Option<usize>, String> {
    if raw.is_empty() {
        Ok(None)
    } else {
        parse_number(raw).map(Some)
    }
}

//=========================================================================================
// The Browse Loop
//=========================================================================================

pub async fn run_browse(
    history: Arc<dyn HistoryService>,
    catalog: Arc<dyn CodeService>,
    notifier: Arc<dyn Notifier>,
    config: &Config,
) -> Result<(), ClientError> {
    let mut controller = HistoryController::new(history, notifier.clone(), config.page_size);
    // Failures are already shown as notifications and in the error view.
    let _ = controller.initialize(catalog.as_ref()).await;
    if !controller.language_options().is_empty() {
        let tags: Vec<_> = controller
            .language_options()
            .iter()
            .map(|l| l.value.as_str())
            .collect();
        println!("Languages: {}", tags.join(", "));
    }
    print!("{}", render::history_listing(&controller));

    let lines = SharedLines::stdin();
    let confirmation = LineConfirmation::new(lines.clone());
    let mut searches = Debouncer::new(config.search_debounce);
    info!("Browsing history at {}", config.api_base_url);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let command = match BrowseCommand::parse(&line) {
                    Ok(command) => command,
                    Err(message) => {
                        eprintln!("{}", message);
                        continue;
                    }
                };
                match command {
                    BrowseCommand::Quit => break,
                    BrowseCommand::Help => {
                        println!("{}", HELP);
                        continue;
                    }
                    BrowseCommand::Search(term) => {
                        searches.push(term);
                        continue;
                    }
                    other => {
                        let outcome =
                            execute(&mut controller, other, &confirmation, notifier.as_ref())
                                .await;
                        if let Err(e) = outcome {
                            debug!("Browse command failed: {}", e);
                        }
                    }
                }
            }
            Some(term) = searches.next() => {
                let filters = controller.filters().clone().with_search(term);
                if let Err(e) = controller.apply_filters(filters).await {
                    debug!("Search failed: {}", e);
                }
            }
        }

        match controller.selection().record() {
            Some(record) => println!("{}", render::detail(record)),
            None => print!("{}", render::history_listing(&controller)),
        }
    }
    Ok(())
}

const OPEN_FIRST: &str = "Open an explanation first, or give a card number";

/// Page bounds are unknown while the last load failed, so paging waits for a retry.
pub(crate) fn paging_blocked(controller: &HistoryController) -> Option<Notification> {
    match controller.view() {
        HistoryView::Error(_) => Some(Notification::warning(
            "History could not be loaded. Type 'r' to retry.",
        )),
        _ => None,
    }
}

/// Runs one non-search command against the controller.
async fn execute(
    controller: &mut HistoryController,
    command: BrowseCommand,
    confirmation: &LineConfirmation,
    notifier: &dyn Notifier,
) -> PortResult<()> {
    if matches!(
        command,
        BrowseCommand::Next | BrowseCommand::Previous | BrowseCommand::Page(_)
    ) {
        if let Some(hint) = paging_blocked(controller) {
            notifier.notify(hint);
            return Ok(());
        }
    }

    match command {
        BrowseCommand::Next => {
            if !controller.next_page().await? {
                notifier.notify(Notification::info("Already on the last page"));
            }
        }
        BrowseCommand::Previous => {
            if !controller.previous_page().await? {
                notifier.notify(Notification::info("Already on the first page"));
            }
        }
        BrowseCommand::Page(page) => {
            if !controller.go_to_page(page).await? {
                notifier.notify(Notification::warning(format!("There is no page {}", page)));
            }
        }
        BrowseCommand::Language(language) => {
            let mut filters = controller.filters().clone();
            filters.language = language;
            controller.apply_filters(filters).await?;
        }
        BrowseCommand::Level(level) => {
            let mut filters = controller.filters().clone();
            filters.complexity_level = level;
            controller.apply_filters(filters).await?;
        }
        BrowseCommand::Favorite(is_favorite) => {
            let mut filters = controller.filters().clone();
            filters.is_favorite = is_favorite;
            controller.apply_filters(filters).await?;
        }
        BrowseCommand::Clear => controller.clear_filters().await?,
        BrowseCommand::Refresh => controller.fetch_page().await?,
        BrowseCommand::Open(card) => match card_record(controller, card) {
            Some(record) => controller.open_detail(record),
            None => notifier.notify(Notification::warning(format!("There is no card {}", card))),
        },
        BrowseCommand::Close => controller.close_detail(),
        BrowseCommand::Star(None) => {
            if !controller.toggle_selected_favorite().await? {
                notifier.notify(Notification::warning(OPEN_FIRST));
            }
        }
        BrowseCommand::Star(Some(card)) => match card_record(controller, card) {
            Some(record) => controller.toggle_favorite(record.id, !record.is_favorite).await?,
            None => notifier.notify(Notification::warning(format!("There is no card {}", card))),
        },
        BrowseCommand::Remove(None) => {
            if !controller.selection().is_open() {
                notifier.notify(Notification::warning(OPEN_FIRST));
            } else {
                controller.delete_selected(confirmation).await?;
            }
        }
        BrowseCommand::Remove(Some(card)) => match card_record(controller, card) {
            Some(record) => {
                controller.delete_record(record.id, confirmation).await?;
            }
            None => notifier.notify(Notification::warning(format!("There is no card {}", card))),
        },
        BrowseCommand::Search(_) | BrowseCommand::Help | BrowseCommand::Quit => {}
    }
    Ok(())
}

fn card_record(
    controller: &HistoryController,
    card: usize,
) -> Option<code_explainer_core::domain::ExplanationRecord> {
    card.checked_sub(1)
        .and_then(|index| controller.records().get(index))
        .cloned()
}
