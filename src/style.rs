//! Terminal output for the CLI.
//!
//! The `*_report`/`*_summary` helpers build strings (so they can be checked
//! without a terminal); the message helpers print them with a colored prefix.

use crate::index::IndexStats;
use crate::model::{Language, RenderGraph};
use colored::{ColoredString, Colorize};
use std::path::Path;

#[derive(Debug, Clone, Copy)]
enum Tone {
    Error,
    Warning,
    Hint,
    Done,
}

impl Tone {
    fn prefix(self) -> ColoredString {
        match self {
            Tone::Error => "error:".red().bold(),
            Tone::Warning => "warning:".yellow().bold(),
            Tone::Hint => "hint:".dimmed(),
            Tone::Done => "✓".green().bold(),
        }
    }
}

fn say(tone: Tone, msg: &str) {
    match tone {
        Tone::Done => println!("{} {}", tone.prefix(), msg),
        Tone::Hint => eprintln!("{} {}", tone.prefix(), msg.dimmed()),
        Tone::Error | Tone::Warning => eprintln!("{} {}", tone.prefix(), msg),
    }
}

pub fn error(msg: &str) {
    say(Tone::Error, msg);
}

pub fn warning(msg: &str) {
    say(Tone::Warning, msg);
}

pub fn hint(msg: &str) {
    say(Tone::Hint, msg);
}

pub fn success(msg: &str) {
    say(Tone::Done, msg);
}

pub fn path(p: &Path) -> String {
    p.display().to_string().bright_white().to_string()
}

/// `1 file`, `3 files`.
pub fn count(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{} {}", n, noun)
    } else {
        format!("{} {}s", n, noun)
    }
}

/// Short colored tag for a file language, as used on the wire.
pub fn language_tag(language: Language) -> ColoredString {
    let tag = language.as_str();
    match language {
        Language::TypeScript => tag.blue(),
        Language::JavaScript => tag.yellow(),
        Language::Python => tag.green(),
        Language::Other => tag.dimmed(),
    }
}

/// Multi-line summary of an index for `codecanvas index`.
pub fn stats_report(root: &Path, stats: &IndexStats) -> String {
    let by_language = [
        (Language::TypeScript, stats.typescript),
        (Language::JavaScript, stats.javascript),
        (Language::Python, stats.python),
    ]
    .iter()
    .filter(|(_, n)| *n > 0)
    .map(|(lang, n)| format!("{} {}", language_tag(*lang), n))
    .collect::<Vec<_>>()
    .join(", ");

    let mut report = format!("{} {}\n", "Indexed".cyan().bold(), path(root));
    report.push_str(&format!("  {}", count(stats.files, "file").as_str().cyan()));
    if !by_language.is_empty() {
        report.push_str(&format!(" ({})", by_language));
    }
    report.push('\n');
    report.push_str(&format!(
        "  {} from {}",
        count(stats.edges, "import edge").as_str().cyan(),
        count(stats.specifiers, "specifier")
    ));
    if stats.unresolved > 0 {
        let unresolved = format!("{} unresolved", stats.unresolved);
        report.push_str(&format!(", {}", unresolved.as_str().yellow()));
    }
    report
}

/// One-line size of a materialized graph.
pub fn graph_summary(graph: &RenderGraph) -> String {
    format!(
        "{} and {}",
        count(graph.nodes.len(), "file"),
        count(graph.edges.len(), "import")
    )
}

/// Banner for a running server.
pub fn serving(root: &Path, url: &str) {
    println!("{} {}", "codecanvas".cyan().bold(), path(root));
    println!("{} panel messages at {}", "→".blue(), url.bright_blue().underline());
    say(Tone::Hint, "Press Ctrl+C to stop");
}
