//! services/client/src/commands.rs
//!
//! One function per one-shot CLI command. Each builds the controller or calls the port
//! it needs, prints the rendered result to stdout, and propagates failures.

use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::info;

use crate::cli::{ExplainArgs, HistoryArgs};
use crate::error::ClientError;
use crate::render;
use crate::terminal::{LineConfirmation, SharedLines};
use code_explainer_core::domain::{ExplanationId, FilterState, LanguageChoice, Notification};
use code_explainer_core::ports::{
    CodeService, Confirmation, HistoryService, Notifier, PortError, Preanswered,
};
use code_explainer_core::samples;
use code_explainer_core::{ExplainController, HistoryController};

/// The ports every command works against, plus where notifications go.
#[derive(Clone)]
pub struct Services {
    pub history: Arc<dyn HistoryService>,
    pub code: Arc<dyn CodeService>,
    pub notifier: Arc<dyn Notifier>,
    pub page_size: u32,
}

impl Services {
    fn explain_controller(&self) -> ExplainController {
        ExplainController::new(self.code.clone(), self.notifier.clone())
    }

    fn history_controller(&self) -> HistoryController {
        HistoryController::new(self.history.clone(), self.notifier.clone(), self.page_size)
    }
}

pub async fn run_languages(services: &Services) -> Result<(), ClientError> {
    let languages = services.explain_controller().load_languages().await;
    if languages.is_empty() {
        return Err(ClientError::Internal("the backend offered no languages".to_string()));
    }
    println!("{}", render::languages(&languages));
    Ok(())
}

pub async fn run_levels(services: &Services) -> Result<(), ClientError> {
    let levels = services.explain_controller().load_complexity_levels().await;
    if levels.is_empty() {
        return Err(ClientError::Internal("the backend offered no complexity levels".to_string()));
    }
    println!("{}", render::complexity_levels(&levels));
    Ok(())
}

pub async fn run_health(services: &Services) -> Result<(), ClientError> {
    let report = services.code.health().await?;
    println!("{}", render::health(&report));
    if !report.is_healthy() {
        services
            .notifier
            .notify(Notification::warning("The backend reports a degraded state"));
    }
    Ok(())
}

pub async fn run_explain(services: &Services, args: ExplainArgs) -> Result<(), ClientError> {
    let mut language = LanguageChoice::parse(&args.language);

    let code = if let Some(name) = &args.sample {
        let sample = samples::sample(name).ok_or_else(|| {
            let available: Vec<_> = samples::samples().iter().map(|s| s.language).collect();
            ClientError::Internal(format!(
                "no sample for '{}' (available: {})",
                name,
                available.join(", ")
            ))
        })?;
        if language == LanguageChoice::Auto {
            language = LanguageChoice::Tag(sample.language.to_string());
        }
        services
            .notifier
            .notify(Notification::info(format!("Loaded {} example code", sample.language)));
        sample.code.to_string()
    } else if let Some(path) = &args.file {
        info!("Reading code from {}", path.display());
        tokio::fs::read_to_string(path).await?
    } else {
        let mut buffer = String::new();
        tokio::io::stdin().read_to_string(&mut buffer).await?;
        buffer
    };

    let mut controller = services.explain_controller();
    if let Some(explanation) = controller.explain(&code, language, args.complexity).await? {
        println!("{}", render::explanation(explanation));
    }
    Ok(())
}

pub async fn run_history(services: &Services, args: HistoryArgs) -> Result<(), ClientError> {
    let mut filters = FilterState {
        complexity_level: args.complexity,
        is_favorite: args.favorite,
        ..FilterState::default()
    };
    if let Some(language) = args.language {
        filters = filters.with_language(language.to_lowercase());
    }
    if let Some(term) = args.search {
        filters = filters.with_search(term);
    }

    let mut controller = services.history_controller();
    controller.apply_filters(filters).await?;

    if args.page > 1 && !controller.go_to_page(args.page).await? {
        return Err(ClientError::Internal(format!(
            "page {} does not exist (there are {} pages)",
            args.page,
            controller.page_state().total_pages()
        )));
    }
    print!("{}", render::history_listing(&controller));
    Ok(())
}

pub async fn run_show(services: &Services, id: ExplanationId) -> Result<(), ClientError> {
    let record = services.history.get_explanation(id).await?;
    println!("{}", render::detail(&record));
    Ok(())
}

/// Sets the favorite flag through the history controller, which also reloads the first
/// page of history.
pub async fn run_favorite(
    services: &Services,
    id: ExplanationId,
    is_favorite: bool,
) -> Result<(), ClientError> {
    services
        .history_controller()
        .toggle_favorite(id, is_favorite)
        .await?;
    Ok(())
}

pub async fn run_delete(
    services: &Services,
    id: ExplanationId,
    assume_yes: bool,
) -> Result<(), ClientError> {
    let confirmation: Box<dyn Confirmation> = if assume_yes {
        Box::new(Preanswered(true))
    } else {
        Box::new(LineConfirmation::new(SharedLines::stdin()))
    };
    let deleted = services
        .history_controller()
        .delete_record(id, confirmation.as_ref())
        .await?;
    if !deleted {
        services.notifier.notify(Notification::info("Deletion cancelled"));
    }
    Ok(())
}

pub async fn run_stats(services: &Services) -> Result<(), ClientError> {
    let stats = services.history.stats().await.map_err(|e| match e {
        PortError::NotFound(_) => {
            PortError::Unexpected("this backend does not provide statistics".to_string())
        }
        other => other,
    })?;
    println!("{}", render::stats(&stats));
    Ok(())
}
