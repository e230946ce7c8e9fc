//! services/client/src/adapters/code_api.rs
//!
//! Implements the `CodeService` port against the backend's `/code` endpoints and its
//! `/health` probe.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::http::{ensure_success, HttpBackend};
use code_explainer_core::domain::{
    ComplexityLevel, ComplexityOption, ExplainRequest, Explanation, HealthReport, LanguageOption,
};
use code_explainer_core::ports::{CodeService, PortError, PortResult};

//=========================================================================================
// Wire Structs
//=========================================================================================

#[derive(Deserialize)]
struct LanguagesResponse {
    success: bool,
    languages: Vec<LanguageWire>,
}

#[derive(Deserialize)]
struct LanguageWire {
    value: String,
    name: String,
    #[serde(default)]
    icon: String,
}

#[derive(Deserialize)]
struct LevelsResponse {
    success: bool,
    complexity_levels: Vec<LevelWire>,
}

#[derive(Deserialize)]
struct LevelWire {
    value: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
}

/// `language` serialises as `null` when the backend should detect it.
#[derive(Serialize)]
struct ExplainBody<'a> {
    code_snippet: &'a str,
    language: Option<&'a str>,
    complexity_level: &'static str,
}

#[derive(Deserialize)]
struct ExplainResponse {
    success: bool,
    explanation: String,
    language: String,
    complexity_level: String,
    #[serde(default)]
    processing_time: Option<f64>,
}

#[derive(Deserialize)]
struct HealthWire {
    status: String,
    version: String,
    llm_service_status: String,
    database_status: String,
}

fn parse_level(raw: &str) -> PortResult<ComplexityLevel> {
    raw.parse::<ComplexityLevel>()
        .map_err(|e| PortError::Unexpected(e.to_string()))
}

//=========================================================================================
// `CodeService` Trait Implementation
//=========================================================================================

#[async_trait]
impl CodeService for HttpBackend {
    async fn languages(&self) -> PortResult<Vec<LanguageOption>> {
        let url = self.endpoint("code/languages")?;
        let response: LanguagesResponse = self.send_json(self.client().get(url)).await?;
        ensure_success(response.success, "list languages")?;
        Ok(response
            .languages
            .into_iter()
            .map(|l| LanguageOption {
                value: l.value,
                name: l.name,
                icon: l.icon,
            })
            .collect())
    }

    async fn complexity_levels(&self) -> PortResult<Vec<ComplexityOption>> {
        let url = self.endpoint("code/complexity-levels")?;
        let response: LevelsResponse = self.send_json(self.client().get(url)).await?;
        ensure_success(response.success, "list complexity levels")?;
        response
            .complexity_levels
            .into_iter()
            .map(|l| {
                Ok(ComplexityOption {
                    level: parse_level(&l.value)?,
                    name: l.name,
                    description: l.description,
                    icon: l.icon,
                })
            })
            .collect()
    }

    async fn explain(&self, request: &ExplainRequest) -> PortResult<Explanation> {
        let url = self.endpoint("code/explain")?;
        let body = ExplainBody {
            code_snippet: &request.code_snippet,
            language: request.language.as_tag(),
            complexity_level: request.complexity_level.as_str(),
        };
        let response: ExplainResponse = self
            .send_json(self.client().post(url).json(&body))
            .await?;
        ensure_success(response.success, "generate an explanation")?;

        if let Some(seconds) = response.processing_time {
            info!("Explanation generated in {:.2}s", seconds);
        }
        Ok(Explanation {
            text: response.explanation,
            language: response.language,
            complexity_level: parse_level(&response.complexity_level)?,
            processing_time: response.processing_time,
        })
    }

    async fn health(&self) -> PortResult<HealthReport> {
        let url = self.endpoint("health")?;
        let wire: HealthWire = self.send_json(self.client().get(url)).await?;
        Ok(HealthReport {
            status: wire.status,
            version: wire.version,
            llm_service_status: wire.llm_service_status,
            database_status: wire.database_status,
        })
    }
}
