//! Letter pagination: wraps the editable output onto fixed-size pages.
//!
//! The first page opens with a header naming the position and company. Every
//! page ends with a blank line and a `Page N of M` footer.

use crate::export::DocumentFields;
use crate::layout::font_metrics::{get_metrics, PageConfig};

/// Blank separator plus the `Page N of M` line.
pub const FOOTER_LINES: usize = 2;

/// Separates pages in the rendered text.
pub const PAGE_BREAK: char = '\u{000C}';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaidOutLetter {
    pages: Vec<Vec<String>>,
}

impl LaidOutLetter {
    #[cfg(test)]
    pub fn pages(&self) -> &[Vec<String>] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Renders all pages with footers, separated by form feeds.
    pub fn render(&self) -> String {
        let total = self.pages.len();
        self.pages
            .iter()
            .enumerate()
            .map(|(i, lines)| format!("{}\n\nPage {} of {total}\n", lines.join("\n"), i + 1))
            .collect::<Vec<_>>()
            .join(&PAGE_BREAK.to_string())
    }
}

pub fn layout_letter(fields: &DocumentFields, config: &PageConfig) -> LaidOutLetter {
    let metrics = get_metrics(&config.font);

    let mut body = metrics.wrap(&header_line(fields), config);
    body.push(String::new());

    for paragraph in fields.content.lines() {
        let wrapped = metrics.wrap(paragraph, config);
        if wrapped.is_empty() {
            body.push(String::new());
        } else {
            body.extend(wrapped);
        }
    }
    while body.last().is_some_and(|line| line.is_empty()) {
        body.pop();
    }

    let per_page = (config.usable_height_lines as usize)
        .saturating_sub(FOOTER_LINES)
        .max(1);

    let pages = body.chunks(per_page).map(<[String]>::to_vec).collect();
    LaidOutLetter { pages }
}

fn header_line(fields: &DocumentFields) -> String {
    match (fields.position.trim(), fields.company_name.trim()) {
        ("", "") => "Cover Letter".to_string(),
        (position, "") => format!("Cover Letter: {position}"),
        ("", company) => format!("Cover Letter: {company}"),
        (position, company) => format!("Cover Letter: {position} at {company}"),
    }
}
