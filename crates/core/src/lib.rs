pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod notifications;
pub mod panel;
pub mod render;
pub mod traits;
pub mod view;

pub use client::HttpQueryClient;
pub use config::{PanelConfig, ResponseTrust, DEFAULT_BASE_URL, DEFAULT_PRESETS, SCROLL_DELAY};
pub use error::PanelError;
pub use models::{
    ErrorBody, HadithRecord, HealthStatus, Mode, QueryRequest, QueryResponse, RecordLabel,
};
pub use notifications::{Notification, NotificationQueue, Severity, NOTIFICATION_TTL};
pub use panel::{
    Completion, Effect, PanelState, QueryPanel, Rejection, SubmitOutcome, Submission,
    EMPTY_QUERY_MESSAGE, FAILURE_MESSAGE,
};
pub use render::{
    escape_html, format_similarity, render_hadith, render_hadith_cards, similarity_percent,
    HadithCard, ResponseSanitizer,
};
pub use traits::QueryBackend;
pub use view::{ButtonView, ModeToggleView, NotificationView, PanelView, ResultsView};
