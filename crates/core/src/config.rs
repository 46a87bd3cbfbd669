use crate::notifications::NOTIFICATION_TTL;
use crate::PanelError;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

pub const SCROLL_DELAY: Duration = Duration::from_millis(300);

pub const DEFAULT_PRESETS: [&str; 4] = [
    "prayer times",
    "charity",
    "fasting in Ramadan",
    "kindness to parents",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ResponseTrust {
    #[default]
    Allowlist,
    Escape,
    /// Insert the response verbatim. Only for backends you control.
    Trusted,
}

impl FromStr for ResponseTrust {
    type Err = PanelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "allowlist" => Ok(ResponseTrust::Allowlist),
            "escape" => Ok(ResponseTrust::Escape),
            "trusted" => Ok(ResponseTrust::Trusted),
            other => Err(PanelError::InvalidArgument(format!(
                "response trust must be allowlist, escape or trusted, got {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PanelConfig {
    pub base_url: Url,
    pub notification_ttl: Duration,
    pub scroll_delay: Duration,
    pub presets: Vec<String>,
    pub response_trust: ResponseTrust,
}

impl PanelConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            notification_ttl: NOTIFICATION_TTL,
            scroll_delay: SCROLL_DELAY,
            presets: DEFAULT_PRESETS.iter().map(|preset| preset.to_string()).collect(),
            response_trust: ResponseTrust::default(),
        }
    }

    pub fn from_base_url(raw: &str) -> Result<Self, PanelError> {
        let base_url = Url::parse(raw)?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(PanelError::InvalidArgument(format!(
                "base url must be http or https: {raw}"
            )));
        }
        Ok(Self::new(base_url))
    }

    pub fn with_presets(mut self, presets: Vec<String>) -> Self {
        let presets: Vec<String> = presets
            .into_iter()
            .map(|preset| preset.trim().to_string())
            .filter(|preset| !preset.is_empty())
            .collect();
        if !presets.is_empty() {
            self.presets = presets;
        }
        self
    }

    pub fn with_response_trust(mut self, trust: ResponseTrust) -> Self {
        self.response_trust = trust;
        self
    }
}
