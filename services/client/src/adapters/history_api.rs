//! services/client/src/adapters/history_api.rs
//!
//! Implements the `HistoryService` port against the backend's `/history` endpoints.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::http::{ensure_success, HttpBackend};
use code_explainer_core::domain::{
    ComplexityLevel, ExplanationId, ExplanationRecord, HistoryPage, HistoryQuery, HistoryStats,
};
use code_explainer_core::ports::{HistoryService, PortError, PortResult};

//=========================================================================================
// Wire Structs
//=========================================================================================

#[derive(Deserialize)]
struct RecordWire {
    id: ExplanationId,
    code_snippet: String,
    language: String,
    explanation: String,
    #[serde(default)]
    complexity_level: Option<String>,
    created_at: String,
    #[serde(default)]
    is_favorite: bool,
    #[serde(default)]
    tags: Option<String>,
}
impl RecordWire {
    fn to_domain(self) -> PortResult<ExplanationRecord> {
        let complexity_level = match self.complexity_level.as_deref() {
            None | Some("") => ComplexityLevel::default(),
            Some(raw) => raw
                .parse()
                .map_err(|e| PortError::Unexpected(format!("record {}: {}", self.id, e)))?,
        };
        Ok(ExplanationRecord {
            id: self.id,
            code_snippet: self.code_snippet,
            language: self.language,
            complexity_level,
            explanation: self.explanation,
            is_favorite: self.is_favorite,
            created_at: parse_timestamp(&self.created_at)?,
            tags: self.tags.filter(|t| !t.trim().is_empty()),
        })
    }
}

#[derive(Deserialize)]
struct ListResponse {
    success: bool,
    explanations: Vec<RecordWire>,
    total_count: u64,
}

#[derive(Deserialize)]
struct SingleResponse {
    success: bool,
    explanation: RecordWire,
}

#[derive(Serialize)]
struct FavoriteBody {
    explanation_id: ExplanationId,
    is_favorite: bool,
}

#[derive(Deserialize)]
struct MessageResponse {
    success: bool,
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct StatsResponse {
    success: bool,
    stats: StatsWire,
}

#[derive(Deserialize)]
struct StatsWire {
    total_explanations: u64,
    favorite_explanations: u64,
    #[serde(default)]
    language_distribution: Vec<LanguageCount>,
    #[serde(default)]
    complexity_distribution: Vec<ComplexityCount>,
}

#[derive(Deserialize)]
struct LanguageCount {
    language: String,
    count: u64,
}

#[derive(Deserialize)]
struct ComplexityCount {
    complexity: String,
    count: u64,
}

/// Accepts RFC 3339 as well as the naive ISO-8601 form the backend stores, read as UTC.
pub(crate) fn parse_timestamp(raw: &str) -> PortResult<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| PortError::Unexpected(format!("invalid timestamp '{}': {}", raw, e)))
}

//=========================================================================================
// `HistoryService` Trait Implementation
//=========================================================================================

#[async_trait]
impl HistoryService for HttpBackend {
    async fn list_explanations(&self, query: &HistoryQuery) -> PortResult<HistoryPage> {
        let mut url = self.endpoint("history/explanations")?;
        url.query_pairs_mut().extend_pairs(query.query_pairs());
        debug!("Fetching history: {}", url);

        let response: ListResponse = self.send_json(self.client().get(url)).await?;
        ensure_success(response.success, "load history")?;

        let records = response
            .explanations
            .into_iter()
            .map(RecordWire::to_domain)
            .collect::<PortResult<Vec<_>>>()?;
        Ok(HistoryPage {
            records,
            total_count: response.total_count,
        })
    }

    async fn get_explanation(&self, id: ExplanationId) -> PortResult<ExplanationRecord> {
        let url = self.endpoint(&format!("history/explanations/{}", id))?;
        let response: SingleResponse = self.send_json(self.client().get(url)).await?;
        ensure_success(response.success, "load the explanation")?;
        response.explanation.to_domain()
    }

    async fn set_favorite(&self, id: ExplanationId, is_favorite: bool) -> PortResult<String> {
        let url = self.endpoint(&format!("history/explanations/{}/favorite", id))?;
        let body = FavoriteBody {
            explanation_id: id,
            is_favorite,
        };
        let response: MessageResponse = self
            .send_json(self.client().post(url).json(&body))
            .await?;
        ensure_success(response.success, "update the favorite status")?;
        Ok(response.message)
    }

    async fn delete_explanation(&self, id: ExplanationId) -> PortResult<()> {
        let url = self.endpoint(&format!("history/explanations/{}", id))?;
        let response: MessageResponse = self.send_json(self.client().delete(url)).await?;
        ensure_success(response.success, "delete the explanation")
    }

    async fn stats(&self) -> PortResult<HistoryStats> {
        let url = self.endpoint("history/stats")?;
        let response: StatsResponse = self.send_json(self.client().get(url)).await?;
        ensure_success(response.success, "load statistics")?;

        let stats = response.stats;
        Ok(HistoryStats {
            total_explanations: stats.total_explanations,
            favorite_explanations: stats.favorite_explanations,
            language_distribution: stats
                .language_distribution
                .into_iter()
                .map(|c| (c.language, c.count))
                .collect(),
            complexity_distribution: stats
                .complexity_distribution
                .into_iter()
                .map(|c| (c.complexity, c.count))
                .collect(),
        })
    }
}
