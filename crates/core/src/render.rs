use crate::{HadithRecord, PanelError, RecordLabel, ResponseTrust};
use regex::Regex;
use std::time::Duration;

pub const MISSING_LABEL: &str = "N/A";
pub const UNKNOWN_LABEL: &str = "Unknown";
pub const MISSING_ENGLISH: &str = "No English translation available";
pub const MISSING_ARABIC: &str = "لا يوجد نص عربي";

pub const CARD_ANIMATION_STEP: Duration = Duration::from_millis(100);

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for character in text.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Converts a backend distance into a percentage, rounded to two decimals.
/// Negative or NaN distances are treated as an exact match.
pub fn similarity_percent(distance: f64) -> f64 {
    let percent = 100.0 / (1.0 + distance.max(0.0));
    (percent * 100.0).round() / 100.0
}

pub fn format_similarity(distance: f64) -> String {
    format!("{:.2}%", similarity_percent(distance))
}

#[derive(Debug, Clone, PartialEq)]
pub struct HadithCard {
    pub position: usize,
    pub number: String,
    pub chapter: String,
    pub grade: String,
    pub english_text: String,
    pub arabic_text: String,
    pub narrator: String,
    pub similarity: f64,
    pub similarity_label: String,
    pub animation_delay: Duration,
}

impl HadithCard {
    pub fn from_record(record: &HadithRecord) -> Self {
        Self {
            position: 0,
            number: label_or(record.number.as_ref(), MISSING_LABEL),
            chapter: label_or(record.chapter_number.as_ref(), MISSING_LABEL),
            grade: text_or(record.english_grade.as_deref(), UNKNOWN_LABEL),
            english_text: text_or(record.english_text.as_deref(), MISSING_ENGLISH),
            arabic_text: text_or(record.arabic_text.as_deref(), MISSING_ARABIC),
            narrator: text_or(record.narrator.as_deref(), UNKNOWN_LABEL),
            similarity: similarity_percent(record.distance),
            similarity_label: format_similarity(record.distance),
            animation_delay: Duration::ZERO,
        }
    }

    fn at_position(mut self, position: usize) -> Self {
        self.position = position;
        self.animation_delay = CARD_ANIMATION_STEP * position as u32;
        self
    }

    pub fn to_html(&self) -> String {
        format!(
            concat!(
                "<div class=\"hadith-card\" style=\"animation-delay: {delay:.1}s\">",
                "<div class=\"hadith-header-info\">",
                "<span class=\"hadith-number\">Hadith #{number}</span>",
                "<span class=\"hadith-badge\">Chapter {chapter}</span>",
                "<span class=\"grade-badge\">{grade}</span>",
                "</div>",
                "<div class=\"hadith-text\">",
                "<div class=\"hadith-english\">{english}</div>",
                "<div class=\"hadith-arabic\">{arabic}</div>",
                "</div>",
                "<div class=\"hadith-metadata\">",
                "<div class=\"metadata-row\"><span class=\"metadata-label\">Narrated by:</span>",
                "<span class=\"metadata-value\">{narrator}</span></div>",
                "<div class=\"metadata-row\"><span class=\"metadata-label\">Similarity Score:</span>",
                "<span class=\"metadata-value\">{similarity}</span></div>",
                "</div>",
                "</div>"
            ),
            delay = self.animation_delay.as_secs_f64(),
            number = escape_html(&self.number),
            chapter = escape_html(&self.chapter),
            grade = escape_html(&self.grade),
            english = escape_html(&self.english_text),
            arabic = escape_html(&self.arabic_text),
            narrator = escape_html(&self.narrator),
            similarity = escape_html(&self.similarity_label),
        )
    }
}

pub fn render_hadith(record: &HadithRecord) -> String {
    HadithCard::from_record(record).to_html()
}

pub fn render_hadith_cards(records: &[HadithRecord]) -> Vec<HadithCard> {
    records
        .iter()
        .enumerate()
        .map(|(position, record)| HadithCard::from_record(record).at_position(position))
        .collect()
}

fn label_or(label: Option<&RecordLabel>, fallback: &str) -> String {
    match label {
        Some(label) if !label.is_blank() => label.to_string(),
        _ => fallback.to_string(),
    }
}

fn text_or(text: Option<&str>, fallback: &str) -> String {
    match text {
        Some(text) if !text.trim().is_empty() => text.to_string(),
        _ => fallback.to_string(),
    }
}

/// Filters the backend's pre-rendered `response` markup at the trust boundary.
#[derive(Debug, Clone)]
pub struct ResponseSanitizer {
    trust: ResponseTrust,
    allowed: Regex,
}

impl ResponseSanitizer {
    pub fn new(trust: ResponseTrust) -> Result<Self, PanelError> {
        let allowed = Regex::new(
            r#"(?i)</?strong>|<br\s*/?>|<span class="quote">|</span>|&(?:[a-z][a-z0-9]*|#[0-9]+|#x[0-9a-f]+);"#,
        )?;
        Ok(Self { trust, allowed })
    }

    pub fn trust(&self) -> ResponseTrust {
        self.trust
    }

    pub fn sanitize(&self, html: &str) -> String {
        match self.trust {
            ResponseTrust::Trusted => html.to_string(),
            ResponseTrust::Escape => escape_html(html),
            ResponseTrust::Allowlist => self.allowlist(html),
        }
    }

    fn allowlist(&self, html: &str) -> String {
        let mut output = String::with_capacity(html.len());
        let mut open: Vec<&'static str> = Vec::new();
        let mut cursor = 0;

        for found in self.allowed.find_iter(html) {
            output.push_str(&escape_html(&html[cursor..found.start()]));
            cursor = found.end();

            let token = found.as_str();
            let lowered = token.to_ascii_lowercase();
            match lowered.as_str() {
                "<strong>" => {
                    open.push("strong");
                    output.push_str("<strong>");
                }
                "<span class=\"quote\">" => {
                    open.push("span");
                    output.push_str("<span class=\"quote\">");
                }
                "</strong>" | "</span>" => {
                    let name = &lowered[2..lowered.len() - 1];
                    if open.last().copied() == Some(name) {
                        open.pop();
                        output.push_str(&lowered);
                    } else {
                        output.push_str(&escape_html(token));
                    }
                }
                _ if lowered.starts_with("<br") => output.push_str("<br>"),
                _ => output.push_str(token),
            }
        }

        output.push_str(&escape_html(&html[cursor..]));
        for name in open.into_iter().rev() {
            output.push_str("</");
            output.push_str(name);
            output.push('>');
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(distance: f64) -> HadithRecord {
        HadithRecord {
            number: Some(RecordLabel::Number(1.into())),
            chapter_number: Some(RecordLabel::Number(2.into())),
            english_grade: Some("Sahih".to_string()),
            english_text: Some("The strong man is not the good wrestler.".to_string()),
            arabic_text: Some("ليس الشديد بالصرعة".to_string()),
            narrator: Some("Narrated Abu Huraira".to_string()),
            english_matn: None,
            distance,
        }
    }

    #[test]
    fn similarity_follows_inverse_distance() {
        assert_eq!(format_similarity(0.0), "100.00%");
        assert_eq!(format_similarity(1.0), "50.00%");
        assert_eq!(format_similarity(3.0), "25.00%");
        assert_eq!(similarity_percent(2.0), 33.33);
        assert_eq!(format_similarity(-4.0), "100.00%");
    }

    #[test]
    fn hadith_fields_are_escaped() {
        let mut hostile = record(1.0);
        hostile.english_text = Some("<script>alert('x')</script> & more".to_string());
        hostile.narrator = Some("<b>narrator</b>".to_string());
        hostile.english_grade = Some("<i>Hasan</i>".to_string());
        hostile.number = Some(RecordLabel::Text("<img src=x>".to_string()));

        let html = render_hadith(&hostile);
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt; &amp; more"));
        assert!(html.contains("&lt;b&gt;narrator&lt;/b&gt;"));
        assert!(html.contains("&lt;i&gt;Hasan&lt;/i&gt;"));
        assert!(html.contains("Hadith #&lt;img src=x&gt;"));
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn missing_fields_use_fallbacks() {
        let empty = HadithRecord {
            number: None,
            chapter_number: Some(RecordLabel::Text(String::new())),
            english_grade: None,
            english_text: None,
            arabic_text: Some("   ".to_string()),
            narrator: None,
            english_matn: None,
            distance: 0.0,
        };

        let card = HadithCard::from_record(&empty);
        assert_eq!(card.number, MISSING_LABEL);
        assert_eq!(card.chapter, MISSING_LABEL);
        assert_eq!(card.grade, UNKNOWN_LABEL);
        assert_eq!(card.narrator, UNKNOWN_LABEL);
        assert_eq!(card.english_text, MISSING_ENGLISH);
        assert_eq!(card.arabic_text, MISSING_ARABIC);
        assert_eq!(card.similarity_label, "100.00%");
    }

    #[test]
    fn zero_number_and_chapter_show_as_missing() {
        let record = HadithRecord {
            number: Some(RecordLabel::Number(0.into())),
            chapter_number: Some(RecordLabel::Number(0.into())),
            ..record(1.0)
        };
        let card = HadithCard::from_record(&record);
        assert_eq!(card.number, MISSING_LABEL);
        assert_eq!(card.chapter, MISSING_LABEL);

        let text_zero = HadithRecord {
            number: Some(RecordLabel::Text("0".to_string())),
            ..self::record(1.0)
        };
        assert_eq!(HadithCard::from_record(&text_zero).number, "0");
    }

    #[test]
    fn cards_keep_rank_order_and_stagger() {
        let records = vec![record(0.0), record(1.0), record(3.0)];
        let cards = render_hadith_cards(&records);

        let labels: Vec<_> = cards.iter().map(|card| card.similarity_label.as_str()).collect();
        assert_eq!(labels, vec!["100.00%", "50.00%", "25.00%"]);
        assert_eq!(cards[2].position, 2);
        assert_eq!(cards[2].animation_delay, Duration::from_millis(200));
        assert!(cards[1].to_html().contains("animation-delay: 0.1s"));
    }

    #[test]
    fn allowlist_keeps_backend_formatting() {
        let sanitizer = ResponseSanitizer::new(ResponseTrust::Allowlist).unwrap();
        let formatted =
            "<strong>Grade:</strong> Sahih<br><br><span class=\"quote\">&ldquo;Be kind&rdquo;</span>";
        assert_eq!(sanitizer.sanitize(formatted), formatted);
    }

    #[test]
    fn allowlist_escapes_everything_else() {
        let sanitizer = ResponseSanitizer::new(ResponseTrust::Allowlist).unwrap();
        let hostile = "<img src=x onerror=alert(1)></span>1 < 2 & <strong>bold";

        assert_eq!(
            sanitizer.sanitize(hostile),
            "&lt;img src=x onerror=alert(1)&gt;&lt;/span&gt;1 &lt; 2 &amp; <strong>bold</strong>"
        );
    }

    #[test]
    fn escape_and_trusted_modes() {
        let markup = "<strong>x</strong>";
        let escape = ResponseSanitizer::new(ResponseTrust::Escape).unwrap();
        let trusted = ResponseSanitizer::new(ResponseTrust::Trusted).unwrap();

        assert_eq!(escape.sanitize(markup), "&lt;strong&gt;x&lt;/strong&gt;");
        assert_eq!(trusted.sanitize(markup), markup);
    }
}
