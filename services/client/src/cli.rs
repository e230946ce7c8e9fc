//! CLI argument definitions for the code explainer client.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use code_explainer_core::domain::{ComplexityLevel, ExplanationId};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(
    name = "code-explainer",
    version,
    about = "Explain code snippets and browse the explanation history",
    long_about = "Client for the Code Explainer API.\n\n\
                  Submit code for an AI-generated explanation, then list, filter,\n\
                  favorite and delete past explanations."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Backend base URL (overrides CODE_EXPLAINER_API_URL).
    #[arg(long = "base-url", value_name = "URL", global = true)]
    pub base_url: Option<String>,

    /// Log level (overrides RUST_LOG).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// History records per page (overrides HISTORY_PAGE_SIZE).
    #[arg(
        long = "page-size",
        value_name = "N",
        global = true,
        value_parser = clap::value_parser!(u32).range(1..=100)
    )]
    pub page_size: Option<u32>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the languages the backend can explain.
    Languages,

    /// List the available explanation complexity levels.
    Levels,

    /// Show the backend's health status.
    Health,

    /// Explain a code snippet read from a file, stdin, or a built-in sample.
    Explain(ExplainArgs),

    /// Print one page of the explanation history.
    History(HistoryArgs),

    /// Print one explanation in full.
    Show {
        /// Explanation ID.
        id: ExplanationId,
    },

    /// Mark an explanation as favorite (or unmark it with --off).
    Favorite {
        /// Explanation ID.
        id: ExplanationId,

        /// Remove the favorite mark instead of setting it.
        #[arg(long)]
        off: bool,
    },

    /// Delete an explanation from the history.
    Delete {
        /// Explanation ID.
        id: ExplanationId,

        /// Skip the confirmation prompt.
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Show aggregate statistics over the history.
    Stats,

    /// Browse the history interactively.
    Browse,
}

#[derive(Parser, Debug)]
pub struct ExplainArgs {
    /// Source file to explain (reads stdin when omitted).
    #[arg(value_name = "FILE", conflicts_with = "sample")]
    pub file: Option<PathBuf>,

    /// Language of the snippet, or "auto" to let the backend detect it.
    #[arg(long, default_value = "auto")]
    pub language: String,

    /// Depth of the explanation.
    #[arg(long, default_value = "intermediate")]
    pub complexity: ComplexityLevel,

    /// Use a built-in sample instead of a file (python, javascript or java).
    #[arg(long, value_name = "LANGUAGE")]
    pub sample: Option<String>,
}

#[derive(Parser, Debug)]
pub struct HistoryArgs {
    /// Only show explanations in this language.
    #[arg(long)]
    pub language: Option<String>,

    /// Only show explanations at this complexity level.
    #[arg(long)]
    pub complexity: Option<ComplexityLevel>,

    /// Only show favorites (true) or non-favorites (false).
    #[arg(long)]
    pub favorite: Option<bool>,

    /// Only show explanations whose code or text contains this term.
    #[arg(long)]
    pub search: Option<String>,

    /// Page to show.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Level::ERROR,
            LogLevelArg::Warn => Level::WARN,
            LogLevelArg::Info => Level::INFO,
            LogLevelArg::Debug => Level::DEBUG,
            LogLevelArg::Trace => Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn history_flags_parse() {
        let cli = Cli::try_parse_from([
            "code-explainer",
            "history",
            "--language",
            "rust",
            "--complexity",
            "Advanced",
            "--favorite",
            "true",
            "--page",
            "2",
        ])
        .unwrap();
        let Command::History(args) = cli.command else {
            panic!("expected the history command");
        };
        assert_eq!(args.language.as_deref(), Some("rust"));
        assert_eq!(args.complexity, Some(ComplexityLevel::Advanced));
        assert_eq!(args.favorite, Some(true));
        assert_eq!(args.page, 2);
    }

    #[test]
    fn global_flags_work_after_the_subcommand() {
        let cli = Cli::try_parse_from([
            "code-explainer",
            "browse",
            "--page-size",
            "20",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.page_size, Some(20));
        assert_eq!(cli.log_level, Some(LogLevelArg::Debug));
        assert!(Cli::try_parse_from(["code-explainer", "stats", "--page-size", "0"]).is_err());
    }

    #[test]
    fn a_file_and_a_sample_cannot_be_combined() {
        assert!(
            Cli::try_parse_from(["code-explainer", "explain", "main.rs", "--sample", "python"])
                .is_err()
        );
    }
}
