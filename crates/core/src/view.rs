use crate::notifications::Severity;
use crate::render::HadithCard;
use crate::Mode;

pub const SEARCH_LABEL: &str = "Search";
pub const SEARCHING_LABEL: &str = "Searching...";
pub const SHOW_DETAILS_LABEL: &str = "Show Details";
pub const HIDE_DETAILS_LABEL: &str = "Hide Details";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonView {
    pub label: &'static str,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeToggleView {
    pub mode: Mode,
    pub label: &'static str,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationView {
    pub id: u64,
    pub message: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultsView {
    pub mode_label: String,
    pub response_html: String,
    pub count_label: String,
    pub hadiths: Vec<HadithCard>,
    pub expanded: bool,
    pub collapse_label: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub input: String,
    pub search_button: ButtonView,
    pub loading_visible: bool,
    pub mode_toggles: Vec<ModeToggleView>,
    pub presets: Vec<String>,
    pub results: Option<ResultsView>,
    pub notifications: Vec<NotificationView>,
}

pub fn capitalize(text: &str) -> String {
    let mut characters = text.chars();
    match characters.next() {
        Some(first) => first.to_uppercase().chain(characters).collect(),
        None => String::new(),
    }
}

pub fn count_label(count: usize) -> String {
    if count > 1 {
        format!("{count} Hadiths")
    } else {
        format!("{count} Hadith")
    }
}

pub fn collapse_label(expanded: bool) -> &'static str {
    if expanded {
        HIDE_DETAILS_LABEL
    } else {
        SHOW_DETAILS_LABEL
    }
}
