use crate::PanelError;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, NoneAsEmptyString};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Concise,
    Detailed,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Concise, Mode::Detailed];

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Concise => "concise",
            Mode::Detailed => "detailed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Concise => "Concise",
            Mode::Detailed => "Detailed",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = PanelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "concise" => Ok(Mode::Concise),
            "detailed" => Ok(Mode::Detailed),
            other => Err(PanelError::InvalidMode(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct QueryRequest {
    pub query: String,
    pub mode: Mode,
}

/// Hadith and chapter identifiers arrive as numbers from some collections and
/// as strings from others. Zero counts as missing, like an empty string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RecordLabel {
    Number(serde_json::Number),
    Text(String),
}

impl RecordLabel {
    pub fn is_blank(&self) -> bool {
        match self {
            RecordLabel::Number(number) => number.as_f64() == Some(0.0),
            RecordLabel::Text(text) => text.trim().is_empty(),
        }
    }
}

impl fmt::Display for RecordLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordLabel::Number(number) => write!(f, "{number}"),
            RecordLabel::Text(text) => f.write_str(text),
        }
    }
}

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HadithRecord {
    #[serde(rename = "Hadith_number", default)]
    pub number: Option<RecordLabel>,

    #[serde(rename = "Chapter_Number", default)]
    pub chapter_number: Option<RecordLabel>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(rename = "English_Grade", default)]
    pub english_grade: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(rename = "English_Hadith", default)]
    pub english_text: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(rename = "Arabic_Hadith", default)]
    pub arabic_text: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(rename = "English_Isnad", default)]
    pub narrator: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(rename = "English_Matn", default)]
    pub english_matn: Option<String>,

    /// Lower is more relevant.
    #[serde(rename = "Distance")]
    pub distance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryResponse {
    pub mode: String,
    #[serde(rename = "response")]
    pub response_html: String,
    pub hadiths: Vec<HadithRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub hadiths_loaded: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}
