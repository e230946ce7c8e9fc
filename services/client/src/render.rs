//! services/client/src/render.rs
//!
//! Plain-text projections of the controller state for the terminal.
//! Everything here is a pure function from domain values to a `String`.

use chrono::{DateTime, Utc};
use std::fmt::Write;

use code_explainer_core::domain::{
    ComplexityLevel, ComplexityOption, Explanation, ExplanationRecord, HealthReport,
    HistoryStats, HistoryView, LanguageOption,
};
use code_explainer_core::HistoryController;

const CODE_PREVIEW_CHARS: usize = 200;
const EXPLANATION_PREVIEW_CHARS: usize = 300;

//=========================================================================================
// Small Helpers
//=========================================================================================

pub fn language_icon(language: &str) -> &'static str {
    match language {
        "python" => "🐍",
        "javascript" => "🟨",
        "java" => "☕",
        "cpp" => "⚡",
        "csharp" | "typescript" => "🔷",
        "php" => "🐘",
        "ruby" => "💎",
        "go" => "🐹",
        "rust" => "🦀",
        "html" => "🌐",
        "css" => "🎨",
        "sql" => "🗄️",
        "bash" => "🐚",
        _ => "💻",
    }
}

pub fn complexity_icon(level: ComplexityLevel) -> &'static str {
    match level {
        ComplexityLevel::Beginner => "🌱",
        ComplexityLevel::Intermediate => "🎯",
        ComplexityLevel::Advanced => "🚀",
    }
}

/// Cuts `text` to `max_chars` characters, appending `...` when something was dropped.
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

/// Formats a timestamp the way the history list shows it, e.g. `Jan 2, 2024, 03:04 PM`.
pub fn format_date(at: &DateTime<Utc>) -> String {
    at.format("%b %-d, %Y, %I:%M %p").to_string()
}

/// Reduces backend HTML to readable text. Block-level closing tags become line breaks.
pub fn strip_html(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(start) = rest.find('<') {
        text.push_str(&rest[..start]);
        let Some(end) = rest[start..].find('>') else {
            // An unterminated tag is kept as literal text.
            text.push_str(&rest[start..]);
            rest = "";
            break;
        };
        let tag = rest[start + 1..start + end].trim().to_ascii_lowercase();
        if breaks_line(&tag) {
            text.push('\n');
        }
        rest = &rest[start + end + 1..];
    }
    text.push_str(rest);

    let decoded = decode_entities(&text);
    collapse_blank_lines(decoded.trim())
}

fn breaks_line(tag: &str) -> bool {
    let name = tag
        .trim_start_matches('/')
        .split(|c: char| c.is_whitespace() || c == '/')
        .next()
        .unwrap_or("");
    match name {
        "br" => true,
        "p" | "div" | "li" | "ul" | "ol" | "pre" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            tag.starts_with('/')
        }
        _ => false,
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0;
    for line in text.lines() {
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out.truncate(out.trim_end().len());
    out
}

//=========================================================================================
// History
//=========================================================================================

/// One history card. `index` is the 1-based position used by `open`, `star` and `rm`.
pub fn history_card(index: usize, record: &ExplanationRecord) -> String {
    let mut out = String::new();
    let heart = if record.is_favorite { " ♥" } else { "" };
    let _ = writeln!(
        out,
        "[{}] #{} {} {}  {} {}{}",
        index,
        record.id,
        language_icon(&record.language),
        record.language,
        complexity_icon(record.complexity_level),
        record.complexity_level,
        heart
    );
    for line in preview(&record.code_snippet, CODE_PREVIEW_CHARS).lines() {
        let _ = writeln!(out, "    | {}", line);
    }
    let summary = strip_html(&record.explanation).replace('\n', " ");
    let _ = writeln!(out, "    {}", preview(&summary, EXPLANATION_PREVIEW_CHARS));
    let _ = write!(out, "    {}", format_date(&record.created_at));
    out
}

/// The whole list area: summary line, cards or status, and pagination.
pub fn history_listing(controller: &HistoryController) -> String {
    let mut out = String::new();
    let page = controller.page_state();

    match controller.view() {
        HistoryView::Idle | HistoryView::Loading => {
            let _ = writeln!(out, "Loading history...");
            return out;
        }
        HistoryView::Error(message) => {
            let _ = writeln!(out, "Error loading history: {}", message);
            let _ = writeln!(out, "Type 'r' to try again.");
            return out;
        }
        HistoryView::Empty => {
            let _ = writeln!(out, "No explanations found.");
            if !controller.filters().is_empty() {
                let _ = writeln!(out, "Try clearing the filters with 'clear'.");
            }
            return out;
        }
        HistoryView::Items => {}
    }

    let (first, last) = controller.range();
    let _ = writeln!(
        out,
        "Showing {}-{} of {} explanations",
        first,
        last,
        page.total_count()
    );
    for (i, record) in controller.records().iter().enumerate() {
        let _ = writeln!(out, "{}", history_card(i + 1, record));
    }

    let controls = controller.controls();
    if controls.visible {
        let prev = if controls.previous_enabled { "[p]rev" } else { " prev " };
        let next = if controls.next_enabled { "[n]ext" } else { " next " };
        let _ = writeln!(
            out,
            "{}  Page {} of {}  {}",
            prev,
            page.page(),
            page.total_pages(),
            next
        );
    }
    out
}

/// The detail view of one record.
pub fn detail(record: &ExplanationRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Explanation #{}", record.id);
    let _ = writeln!(out, "Language: {}", record.language);
    let _ = writeln!(out, "Complexity: {}", record.complexity_level);
    let _ = writeln!(out, "Date: {}", format_date(&record.created_at));
    if let Some(tags) = &record.tags {
        let _ = writeln!(out, "Tags: {}", tags);
    }
    let _ = writeln!(
        out,
        "Favorite: {}",
        if record.is_favorite { "yes" } else { "no" }
    );
    let _ = writeln!(out, "\n--- code ---\n{}", record.code_snippet);
    let _ = write!(out, "\n--- explanation ---\n{}", strip_html(&record.explanation));
    out
}

//=========================================================================================
// Explain and Catalog
//=========================================================================================

pub fn explanation(explanation: &Explanation) -> String {
    let time = explanation
        .processing_time
        .map(|t| format!("{:.2}s", t))
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{}\n\nProcessing time: {} | Language: {} | Complexity: {}",
        strip_html(&explanation.text),
        time,
        explanation.language,
        explanation.complexity_level
    )
}

pub fn languages(options: &[LanguageOption]) -> String {
    options
        .iter()
        .map(|l| format!("{} {:<12} {}", l.icon, l.value, l.name))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn complexity_levels(options: &[ComplexityOption]) -> String {
    options
        .iter()
        .map(|l| format!("{} {:<13} {}", l.icon, l.level, l.description))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn stats(stats: &HistoryStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total explanations: {}", stats.total_explanations);
    let _ = writeln!(out, "Favorites: {}", stats.favorite_explanations);
    if !stats.language_distribution.is_empty() {
        let _ = writeln!(out, "By language:");
        for (language, count) in &stats.language_distribution {
            let _ = writeln!(out, "  {} {:<12} {}", language_icon(language), language, count);
        }
    }
    if !stats.complexity_distribution.is_empty() {
        let _ = writeln!(out, "By complexity:");
        for (level, count) in &stats.complexity_distribution {
            let _ = writeln!(out, "  {:<14} {}", level, count);
        }
    }
    out.truncate(out.trim_end().len());
    out
}

pub fn health(report: &HealthReport) -> String {
    format!(
        "Status: {} (version {})\nLLM service: {}\nDatabase: {}",
        report.status, report.version, report.llm_service_status, report.database_status
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> ExplanationRecord {
        ExplanationRecord {
            id: 7,
            code_snippet: "x".repeat(250),
            language: "rust".to_string(),
            complexity_level: ComplexityLevel::Advanced,
            explanation: "<h3>Overview</h3><p>Uses &lt;Vec&gt; &amp; slices.</p>".to_string(),
            is_favorite: true,
            created_at: DateTime::from_timestamp(1_704_207_845, 0).unwrap(),
            tags: None,
        }
    }

    #[test]
    fn previews_are_cut_on_character_boundaries() {
        assert_eq!(preview("héllo", 3), "hél...");
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("exact", 5), "exact");
    }

    #[test]
    fn html_is_reduced_to_text() {
        assert_eq!(
            strip_html("<h3>Overview</h3><p>Uses &lt;Vec&gt; &amp; slices.</p>"),
            "Overview\nUses <Vec> & slices."
        );
        assert_eq!(strip_html("line one<br/>line two"), "line one\nline two");
        assert_eq!(strip_html("a < b"), "a < b");
        assert_eq!(strip_html("<p>a</p>\n\n\n<p>b</p>"), "a\n\nb");
    }

    #[test]
    fn dates_use_the_short_month_format() {
        let at = DateTime::from_timestamp(1_704_207_845, 0).unwrap();
        assert_eq!(format_date(&at), "Jan 2, 2024, 03:04 PM");
    }

    #[test]
    fn cards_show_icons_and_truncated_code() {
        let card = history_card(1, &sample_record());
        let first_line = card.lines().next().unwrap();
        assert_eq!(first_line, "[1] #7 🦀 rust  🚀 advanced ♥");
        assert!(card.contains(&format!("{}...", "x".repeat(200))));
        assert!(card.contains("Overview Uses <Vec> & slices."));
    }

    #[test]
    fn unknown_languages_get_a_generic_icon() {
        assert_eq!(language_icon("fortran"), "💻");
        assert_eq!(complexity_icon(ComplexityLevel::Beginner), "🌱");
    }

    #[test]
    fn explanation_footer_lists_the_metadata() {
        let rendered = explanation(&Explanation {
            text: "<p>Adds two numbers.</p>".to_string(),
            language: "python".to_string(),
            complexity_level: ComplexityLevel::Beginner,
            processing_time: Some(1.5),
        });
        assert_eq!(
            rendered,
            "Adds two numbers.\n\nProcessing time: 1.50s | Language: python | Complexity: beginner"
        );
    }
}
