//! crates/code_explainer_core/src/explain.rs
//!
//! The explain controller: validates a snippet, submits it to the `CodeService`, and
//! keeps the most recent explanation around for display.

use std::sync::Arc;
use tracing::{error, info};

use crate::domain::{
    ComplexityLevel, ComplexityOption, ExplainRequest, Explanation, LanguageChoice,
    LanguageOption, Notification,
};
use crate::ports::{CodeService, Notifier, PortResult};

pub struct ExplainController {
    code: Arc<dyn CodeService>,
    notifier: Arc<dyn Notifier>,
    last_explanation: Option<Explanation>,
}

impl ExplainController {
    pub fn new(code: Arc<dyn CodeService>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            code,
            notifier,
            last_explanation: None,
        }
    }

    pub fn last_explanation(&self) -> Option<&Explanation> {
        self.last_explanation.as_ref()
    }

    pub fn clear(&mut self) {
        self.last_explanation = None;
    }

    /// The languages offered for selection. An unreachable backend yields an empty list.
    pub async fn load_languages(&self) -> Vec<LanguageOption> {
        self.code.languages().await.unwrap_or_else(|e| {
            error!("Error loading languages: {}", e);
            Vec::new()
        })
    }

    pub async fn load_complexity_levels(&self) -> Vec<ComplexityOption> {
        self.code.complexity_levels().await.unwrap_or_else(|e| {
            error!("Error loading complexity levels: {}", e);
            Vec::new()
        })
    }

    /// Submits `code` for explanation.
    ///
    /// Blank input is refused with a warning and `Ok(None)`, without contacting the backend.
    /// On failure the previous explanation, if any, is kept.
    pub async fn explain(
        &mut self,
        code: &str,
        language: LanguageChoice,
        complexity_level: ComplexityLevel,
    ) -> PortResult<Option<&Explanation>> {
        if code.trim().is_empty() {
            self.notifier
                .notify(Notification::warning("Please enter some code to explain"));
            return Ok(None);
        }

        let request = ExplainRequest {
            code_snippet: code.to_string(),
            language,
            complexity_level,
        };
        info!(
            "Requesting {} explanation ({} bytes, language: {})",
            request.complexity_level,
            request.code_snippet.len(),
            request.language.as_tag().unwrap_or("auto")
        );

        match self.code.explain(&request).await {
            Ok(explanation) => {
                self.notifier
                    .notify(Notification::success("Explanation generated successfully!"));
                self.last_explanation = Some(explanation);
                Ok(self.last_explanation.as_ref())
            }
            Err(e) => {
                error!("Error explaining code: {}", e);
                self.notifier.notify(Notification::error(
                    "Failed to generate explanation. Please try again.",
                ));
                Err(e)
            }
        }
    }
}
