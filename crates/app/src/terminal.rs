use hadith_panel_core::{PanelView, Severity};
use regex::{Captures, Regex};
use std::fmt::Write as _;

/// Paints a `PanelView` as plain terminal text.
pub struct TerminalPainter {
    line_breaks: Regex,
    tags: Regex,
    entities: Regex,
}

impl TerminalPainter {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            line_breaks: Regex::new(r"(?i)<br\s*/?>")?,
            tags: Regex::new(r"<[^>]*>")?,
            entities: Regex::new(r"&(#x[0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);")?,
        })
    }

    /// Flattens sanitized response markup into readable text.
    pub fn html_to_text(&self, html: &str) -> String {
        let text = self.line_breaks.replace_all(html, "\n");
        let text = self.tags.replace_all(&text, "");
        let decoded = self
            .entities
            .replace_all(&text, |captures: &Captures<'_>| decode_entity(&captures[1], &captures[0]));
        strip_controls(&decoded)
    }

    pub fn paint(&self, view: &PanelView) -> String {
        let mut out = String::new();

        let toggles = view
            .mode_toggles
            .iter()
            .map(|toggle| {
                if toggle.active {
                    format!("[{}]", toggle.label)
                } else {
                    format!(" {} ", toggle.label)
                }
            })
            .collect::<Vec<_>>()
            .join(" ");
        let _ = writeln!(out, "mode: {toggles}");

        if view.loading_visible {
            let _ = writeln!(out, "{} (please wait)", view.search_button.label);
        }

        if let Some(results) = &view.results {
            let _ = writeln!(out, "=== Answer ({}) ===", strip_controls(&results.mode_label));
            let _ = writeln!(out, "{}", self.html_to_text(&results.response_html).trim());
            let _ = writeln!(out);
            let _ = writeln!(
                out,
                "{} [{}: :toggle]",
                strip_controls(&results.count_label),
                results.collapse_label
            );

            for card in &results.hadiths {
                let _ = writeln!(
                    out,
                    "  {}. Hadith #{} | Chapter {} | {} | similarity {}",
                    card.position + 1,
                    strip_controls(&card.number),
                    strip_controls(&card.chapter),
                    strip_controls(&card.grade),
                    card.similarity_label
                );
                if results.expanded {
                    let _ = writeln!(out, "     {}", strip_controls(&card.english_text));
                    let _ = writeln!(out, "     {}", strip_controls(&card.arabic_text));
                    let _ = writeln!(out, "     Narrated by: {}", strip_controls(&card.narrator));
                }
            }
        }

        out
    }
}

pub fn paint_notification(severity: Severity, message: &str) -> String {
    let marker = match severity {
        Severity::Info => "i",
        Severity::Warning => "!",
        Severity::Error => "x",
    };
    format!(
        "[{marker}] {}: {}",
        severity.as_str(),
        strip_controls(message)
    )
}

/// Drops terminal control characters (ESC, BEL, CR, ...) so backend text
/// cannot drive the terminal. Newlines and tabs survive.
pub fn strip_controls(text: &str) -> String {
    text.chars()
        .filter(|character| !character.is_control() || matches!(character, '\n' | '\t'))
        .collect()
}

fn decode_entity(name: &str, raw: &str) -> String {
    let decoded = match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        "ldquo" => Some('\u{201C}'),
        "rdquo" => Some('\u{201D}'),
        "lsquo" => Some('\u{2018}'),
        "rsquo" => Some('\u{2019}'),
        _ => name
            .strip_prefix("#x")
            .or_else(|| name.strip_prefix("#X"))
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .or_else(|| name.strip_prefix('#').and_then(|dec| dec.parse().ok()))
            .and_then(char::from_u32),
    };

    decoded.map_or_else(|| raw.to_string(), |character| character.to_string())
}
