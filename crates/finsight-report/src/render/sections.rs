use std::sync::OnceLock;

use html_escape::encode_text;
use regex::Regex;

use super::markdown::markdown_to_html;

/// Accent colors cycled across section cards
pub const SECTION_COLORS: [&str; 8] = [
    "#3b82f6", "#10b981", "#f59e0b", "#ef4444", "#8b5cf6", "#06b6d4", "#84cc16", "#f97316",
];

/// One `## ` delimited block of report content
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    /// Position among all split pieces, empty ones included
    pub index: usize,
    pub title: String,
    pub body: String,
}

impl Section {
    pub fn color(&self) -> &'static str {
        SECTION_COLORS[self.index % SECTION_COLORS.len()]
    }
}

fn header_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?m)^##[ \t]+").ok()).as_ref()
}

/// Split report text on `## ` headings at line start.
///
/// The first line of each piece is the title; pieces without one, and
/// single-line text ahead of the first heading, are titled `Section {n}`. Pieces with an empty body are skipped but still
/// advance the index, so colors stay stable.
pub fn split_sections(content: &str) -> Vec<Section> {
    let pieces: Vec<&str> = match header_pattern() {
        Some(re) => re.split(content).collect(),
        None => vec![content],
    };

    pieces
        .into_iter()
        .enumerate()
        .filter_map(|(index, piece)| {
            let piece = piece.trim();
            if piece.is_empty() {
                return None;
            }
            let (title, body) = match piece.split_once('\n') {
                Some((first, rest)) => (first.trim(), rest.trim()),
                // Text before any heading on a single line is all body
                None if index == 0 => ("", piece),
                None => (piece, ""),
            };
            if body.is_empty() {
                return None;
            }
            let title = match title {
                "" => format!("Section {}", index + 1),
                t => t.to_string(),
            };
            Some(Section {
                index,
                title,
                body: body.to_string(),
            })
        })
        .collect()
}

/// Render every non-empty section as a colored card
pub fn render_sections(content: &str) -> String {
    split_sections(content)
        .iter()
        .map(|section| {
            format!(
                "<section class=\"report-section\" style=\"border-left-color: {color}\">\
                 <h2 style=\"color: {color}\">{title}</h2>\
                 <div class=\"section-body\">{body}</div>\
                 </section>",
                color = section.color(),
                title = encode_text(&section.title),
                body = markdown_to_html(&section.body),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
