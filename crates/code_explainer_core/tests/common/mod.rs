//! In-memory fakes for the core ports, shared by the integration suites.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::DateTime;
use code_explainer_core::{
    CodeService, ComplexityLevel, ComplexityOption, ExplainRequest, Explanation, ExplanationId,
    ExplanationRecord, HealthReport, HistoryPage, HistoryQuery, HistoryService, HistoryStats,
    LanguageOption, Notification, NotificationKind, Notifier, PortError, PortResult,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

pub fn record(id: ExplanationId, language: &str) -> ExplanationRecord {
    ExplanationRecord {
        id,
        code_snippet: format!("print({id})"),
        language: language.to_string(),
        complexity_level: ComplexityLevel::Intermediate,
        explanation: format!("<p>Explanation number {id}</p>"),
        is_favorite: false,
        created_at: DateTime::from_timestamp(1_700_000_000 + id, 0).unwrap(),
        tags: None,
    }
}

/// Filters and paginates like the real backend: newest first, substring search.
#[derive(Default)]
pub struct FakeHistory {
    pub records: Mutex<Vec<ExplanationRecord>>,
    pub queries: Mutex<Vec<HistoryQuery>>,
    pub fail_listing: AtomicBool,
}

impl FakeHistory {
    pub fn with_records(count: i64) -> Self {
        let records = (1..=count).map(|id| record(id, "python")).collect();
        Self {
            records: Mutex::new(records),
            ..Default::default()
        }
    }

    pub fn last_query(&self) -> HistoryQuery {
        self.queries.lock().unwrap().last().cloned().unwrap()
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail_listing.store(failing, Ordering::SeqCst);
    }

    pub fn matching(&self, query: &HistoryQuery) -> Vec<ExplanationRecord> {
        let filters = &query.filters;
        let mut matching: Vec<_> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| filters.language.as_ref().map_or(true, |l| &r.language == l))
            .filter(|r| {
                filters
                    .complexity_level
                    .map_or(true, |c| r.complexity_level == c)
            })
            .filter(|r| filters.is_favorite.map_or(true, |f| r.is_favorite == f))
            .filter(|r| {
                filters.search_term.as_ref().map_or(true, |t| {
                    r.code_snippet.contains(t.as_str()) || r.explanation.contains(t.as_str())
                })
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching
    }
}

#[async_trait]
impl HistoryService for FakeHistory {
    async fn list_explanations(&self, query: &HistoryQuery) -> PortResult<HistoryPage> {
        self.queries.lock().unwrap().push(query.clone());
        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(PortError::Transport("connection refused".to_string()));
        }
        let matching = self.matching(query);
        let total_count = matching.len() as u64;
        let offset = ((query.page - 1) * query.per_page) as usize;
        let records = matching
            .into_iter()
            .skip(offset)
            .take(query.per_page as usize)
            .collect();
        Ok(HistoryPage {
            records,
            total_count,
        })
    }

    async fn get_explanation(&self, id: ExplanationId) -> PortResult<ExplanationRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Explanation with ID {id} not found")))
    }

    async fn set_favorite(&self, id: ExplanationId, is_favorite: bool) -> PortResult<String> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| PortError::NotFound(format!("Explanation with ID {id} not found")))?;
        record.is_favorite = is_favorite;
        Ok(if is_favorite {
            "Explanation added to favorites".to_string()
        } else {
            "Explanation removed from favorites".to_string()
        })
    }

    async fn delete_explanation(&self, id: ExplanationId) -> PortResult<()> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Err(PortError::NotFound(format!(
                "Explanation with ID {id} not found"
            )));
        }
        Ok(())
    }

    async fn stats(&self) -> PortResult<HistoryStats> {
        let records = self.records.lock().unwrap();
        Ok(HistoryStats {
            total_explanations: records.len() as u64,
            favorite_explanations: records.iter().filter(|r| r.is_favorite).count() as u64,
            ..Default::default()
        })
    }
}

/// A code catalog with a fixed language list and a canned explanation.
#[derive(Default)]
pub struct FakeCatalog {
    pub unavailable: bool,
    pub explained: Mutex<Vec<ExplainRequest>>,
}

#[async_trait]
impl CodeService for FakeCatalog {
    async fn languages(&self) -> PortResult<Vec<LanguageOption>> {
        if self.unavailable {
            return Err(PortError::Transport("connection refused".to_string()));
        }
        Ok(vec![
            LanguageOption {
                value: "python".to_string(),
                name: "Python".to_string(),
                icon: "🐍".to_string(),
            },
            LanguageOption {
                value: "rust".to_string(),
                name: "Rust".to_string(),
                icon: "🦀".to_string(),
            },
        ])
    }

    async fn complexity_levels(&self) -> PortResult<Vec<ComplexityOption>> {
        if self.unavailable {
            return Err(PortError::Transport("connection refused".to_string()));
        }
        Ok(ComplexityLevel::ALL
            .iter()
            .map(|level| ComplexityOption {
                level: *level,
                name: level.as_str().to_string(),
                description: String::new(),
                icon: String::new(),
            })
            .collect())
    }

    async fn explain(&self, request: &ExplainRequest) -> PortResult<Explanation> {
        self.explained.lock().unwrap().push(request.clone());
        if self.unavailable {
            return Err(PortError::Transport("connection refused".to_string()));
        }
        Ok(Explanation {
            text: "<p>It prints a number.</p>".to_string(),
            language: request
                .language
                .as_tag()
                .unwrap_or("python")
                .to_string(),
            complexity_level: request.complexity_level,
            processing_time: Some(0.42),
        })
    }

    async fn health(&self) -> PortResult<HealthReport> {
        Ok(HealthReport {
            status: "healthy".to_string(),
            version: "1.0.0".to_string(),
            llm_service_status: "healthy".to_string(),
            database_status: "healthy".to_string(),
        })
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn kinds(&self) -> Vec<NotificationKind> {
        self.seen.lock().unwrap().iter().map(|n| n.kind).collect()
    }

    pub fn last(&self) -> Option<Notification> {
        self.seen.lock().unwrap().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().unwrap().push(notification);
    }
}
