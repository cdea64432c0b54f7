//! Terminal rendering for the CLI.
//!
//! Colored output, a spinner for blocking calls, and the paper/bucket/answer
//! layouts. Everything here writes to stdout except the spinner, which draws
//! on stderr.

use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::time::Duration;

use crate::models::{AnswerSpan, Category, ClassificationResult, PaperRecord};

/// Characters of the abstract shown before the "View full summary" cut
pub const SUMMARY_PREVIEW_CHARS: usize = 500;

/// Get the current terminal width.
pub fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(100)
}

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Warning,
    Search,
}

/// Status icons for different operations.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Warning => "⚠",
        Status::Search => "🔍",
    }
}

/// Print a styled status message.
pub fn print_status(status: Status, msg: &str) {
    let icon = status_icon(status);
    match status {
        Status::Success => println!("{} {}", icon.green().bold(), msg),
        Status::Warning => println!("{} {}", icon.yellow().bold(), msg.yellow()),
        Status::Search => println!("{} {}", icon.yellow(), msg),
    }
}

/// Print a section header.
pub fn print_section(title: &str) {
    println!();
    println!("{}", format!("━━━ {} ━━━", title).bold().cyan());
}

/// Start a spinner on stderr; `None` when output is quiet
pub fn spinner(message: &str, quiet: bool) -> Option<ProgressBar> {
    if quiet {
        return None;
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        pb.set_style(style.tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "));
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

/// Stop and clear a spinner started with [`spinner`]
pub fn finish_spinner(spinner: Option<ProgressBar>) {
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
}

/// Greedy word wrap to `width` columns
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(20);
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

fn print_wrapped(text: &str, indent: &str) {
    let width = terminal_width().saturating_sub(indent.len());
    for line in wrap(text, width) {
        println!("{}{}", indent, line);
    }
}

/// Print one paper as "Paper N" with a 500-character abstract preview
pub fn print_paper(index: usize, paper: &PaperRecord) {
    println!();
    println!(
        "{} {}",
        format!("Paper {}:", index + 1).cyan().bold(),
        paper.title.split_whitespace().collect::<Vec<_>>().join(" ").bold()
    );
    println!("  {} {}", "Authors:".dimmed(), paper.author_line());
    println!("  {} {}", "Published:".dimmed(), paper.published.yellow());
    println!("  {}", "Summary:".dimmed());
    print_wrapped(
        &format!("{}...", paper.summary_preview(SUMMARY_PREVIEW_CHARS)),
        "    ",
    );
}

/// Print a model summary under the paper it belongs to
pub fn print_full_summary(summary: &str) {
    println!("  {}", "Full summary:".green());
    print_wrapped(summary, "    ");
}

/// Render papers as a table
pub fn papers_table(papers: &[PaperRecord]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(comfy_table::presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(terminal_width() as u16)
        .set_header(vec!["#", "Title", "Authors", "Published"]);

    for (i, paper) in papers.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(paper.title.split_whitespace().collect::<Vec<_>>().join(" "))
                .add_attribute(Attribute::Bold),
            Cell::new(paper.author_line()),
            Cell::new(paper.year().unwrap_or("????")),
        ]);
    }
    table
}

/// Print the three keyword buckets
pub fn print_classification(result: &ClassificationResult) {
    for category in Category::ALL {
        let bucket = result.bucket(category);
        print_section(&format!("{} ({})", category, bucket.len()));
        if bucket.is_empty() {
            println!("  {}", "none".dimmed());
        }
        for (i, summary) in bucket.iter().enumerate() {
            println!("  {}", format!("[{}]", i + 1).yellow());
            print_wrapped(summary, "    ");
        }
    }
}

/// Print an answer and the excerpt its offsets point at
pub fn print_answer(span: &AnswerSpan) {
    println!("{} {}", "Answer:".green().bold(), span.answer);
    println!(
        "{} {} {}",
        "Exact part:".green().bold(),
        span.exact_part,
        format!("[{}..{}]", span.start, span.end).dimmed()
    );
    if let Some(score) = span.score {
        println!("{} {:.3}", "Score:".dimmed(), score);
    }
}
