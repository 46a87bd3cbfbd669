use crate::notifications::{Notification, NotificationQueue, Severity};
use crate::render::{render_hadith_cards, ResponseSanitizer};
use crate::traits::QueryBackend;
use crate::view::{
    capitalize, collapse_label, count_label, ButtonView, ModeToggleView, NotificationView,
    PanelView, ResultsView, SEARCHING_LABEL, SEARCH_LABEL,
};
use crate::{Mode, PanelConfig, PanelError, QueryRequest, QueryResponse};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a query";
pub const FAILURE_MESSAGE: &str = "An error occurred. Please try again.";

/// `Loading` keeps whatever was on screen before the submission so a failure
/// can put it back untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelState {
    Idle,
    Loading { previous: Option<QueryResponse> },
    ResultsShown(QueryResponse),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    EmptyQuery,
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Started(QueryRequest),
    Rejected(Rejection),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    ScrollToResults { after: Duration },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Shown(Vec<Effect>),
    Failed,
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Rejected(Rejection),
    Completed(Completion),
}

pub struct QueryPanel {
    config: PanelConfig,
    sanitizer: ResponseSanitizer,
    state: PanelState,
    mode: Mode,
    input: String,
    hadiths_expanded: bool,
    notifications: NotificationQueue,
}

impl QueryPanel {
    pub fn new(config: PanelConfig) -> Result<Self, PanelError> {
        let sanitizer = ResponseSanitizer::new(config.response_trust)?;
        let notifications = NotificationQueue::new(config.notification_ttl);
        Ok(Self {
            config,
            sanitizer,
            state: PanelState::Idle,
            mode: Mode::default(),
            input: String::new(),
            hadiths_expanded: false,
            notifications,
        })
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, PanelState::Loading { .. })
    }

    pub fn hadiths_expanded(&self) -> bool {
        self.hadiths_expanded
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn set_mode(&mut self, mode: Mode) {
        debug!(%mode, "mode selected");
        self.mode = mode;
    }

    pub fn toggle_hadiths_expansion(&mut self) -> bool {
        self.hadiths_expanded = !self.hadiths_expanded;
        self.hadiths_expanded
    }

    pub fn notify(&mut self, message: impl Into<String>, severity: Severity) -> u64 {
        self.notify_at(message, severity, Instant::now())
    }

    pub fn notify_at(
        &mut self,
        message: impl Into<String>,
        severity: Severity,
        now: Instant,
    ) -> u64 {
        self.notifications.push(message, severity, now)
    }

    pub fn tick(&mut self, now: Instant) -> Vec<Notification> {
        self.notifications.drain_expired(now)
    }

    pub fn begin_submit(&mut self, text: &str) -> Submission {
        self.input = text.to_string();

        let query = text.trim();
        if query.is_empty() {
            self.notify(EMPTY_QUERY_MESSAGE, Severity::Warning);
            return Submission::Rejected(Rejection::EmptyQuery);
        }

        let previous = match std::mem::replace(&mut self.state, PanelState::Idle) {
            PanelState::Idle => None,
            PanelState::ResultsShown(response) => Some(response),
            loading @ PanelState::Loading { .. } => {
                self.state = loading;
                debug!(query, "submission dropped while a request is in flight");
                return Submission::Rejected(Rejection::Busy);
            }
        };

        self.state = PanelState::Loading { previous };
        let request = QueryRequest {
            query: query.to_string(),
            mode: self.mode,
        };
        info!(query = %request.query, mode = %request.mode, "query submitted");
        Submission::Started(request)
    }

    pub fn finish_submit(&mut self, result: Result<QueryResponse, PanelError>) -> Completion {
        let previous = match std::mem::replace(&mut self.state, PanelState::Idle) {
            PanelState::Loading { previous } => previous,
            other => {
                self.state = other;
                warn!("completion arrived with no request in flight");
                return Completion::Ignored;
            }
        };

        match result {
            Ok(response) => {
                info!(
                    mode = %response.mode,
                    hadiths = response.hadiths.len(),
                    "results received"
                );
                self.state = PanelState::ResultsShown(response);
                self.hadiths_expanded = false;
                Completion::Shown(vec![Effect::ScrollToResults {
                    after: self.config.scroll_delay,
                }])
            }
            Err(error) => {
                warn!(%error, "query failed");
                self.state = match previous {
                    Some(response) => PanelState::ResultsShown(response),
                    None => PanelState::Idle,
                };
                self.notify(FAILURE_MESSAGE, Severity::Error);
                Completion::Failed
            }
        }
    }

    pub async fn submit_query<B>(&mut self, backend: &B, text: &str) -> SubmitOutcome
    where
        B: QueryBackend + Sync + ?Sized,
    {
        let request = match self.begin_submit(text) {
            Submission::Started(request) => request,
            Submission::Rejected(rejection) => return SubmitOutcome::Rejected(rejection),
        };

        let result = backend.query(&request).await;
        SubmitOutcome::Completed(self.finish_submit(result))
    }

    pub fn select_preset(&mut self, index: usize) -> Option<Submission> {
        let preset = self.config.presets.get(index)?.clone();
        Some(self.begin_submit(&preset))
    }

    pub fn view(&self) -> PanelView {
        self.view_at(Instant::now())
    }

    pub fn view_at(&self, now: Instant) -> PanelView {
        let loading = self.is_loading();

        let results = match &self.state {
            PanelState::ResultsShown(response) => Some(self.results_view(response)),
            _ => None,
        };

        PanelView {
            input: self.input.clone(),
            search_button: ButtonView {
                label: if loading { SEARCHING_LABEL } else { SEARCH_LABEL },
                disabled: loading,
            },
            loading_visible: loading,
            mode_toggles: Mode::ALL
                .iter()
                .map(|mode| ModeToggleView {
                    mode: *mode,
                    label: mode.label(),
                    active: *mode == self.mode,
                })
                .collect(),
            presets: self.config.presets.clone(),
            results,
            notifications: self
                .notifications
                .active(now)
                .map(|entry| NotificationView {
                    id: entry.id,
                    message: entry.message.clone(),
                    severity: entry.severity,
                })
                .collect(),
        }
    }

    fn results_view(&self, response: &QueryResponse) -> ResultsView {
        ResultsView {
            mode_label: capitalize(&response.mode),
            response_html: self.sanitizer.sanitize(&response.response_html),
            count_label: count_label(response.hadiths.len()),
            hadiths: render_hadith_cards(&response.hadiths),
            expanded: self.hadiths_expanded,
            collapse_label: collapse_label(self.hadiths_expanded),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_BASE_URL;
    use crate::view::{HIDE_DETAILS_LABEL, SHOW_DETAILS_LABEL};
    use crate::{HadithRecord, HealthStatus, RecordLabel};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeBackend {
        calls: Mutex<Vec<QueryRequest>>,
        reply: Result<QueryResponse, String>,
    }

    impl FakeBackend {
        fn replying(reply: Result<QueryResponse, String>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                reply,
            }
        }

        fn calls(&self) -> Vec<QueryRequest> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl QueryBackend for FakeBackend {
        async fn query(&self, request: &QueryRequest) -> Result<QueryResponse, PanelError> {
            self.calls.lock().unwrap().push(request.clone());
            self.reply
                .clone()
                .map_err(|details| PanelError::Status { status: 500, details })
        }

        async fn health(&self) -> Result<HealthStatus, PanelError> {
            Ok(HealthStatus {
                status: "healthy".to_string(),
                hadiths_loaded: 0,
            })
        }
    }

    fn panel() -> QueryPanel {
        QueryPanel::new(PanelConfig::from_base_url(DEFAULT_BASE_URL).unwrap()).unwrap()
    }

    fn hadith(number: u32, distance: f64) -> HadithRecord {
        HadithRecord {
            number: Some(RecordLabel::Number(number.into())),
            chapter_number: Some(RecordLabel::Number(1.into())),
            english_grade: Some("Sahih".to_string()),
            english_text: Some(format!("hadith {number}")),
            arabic_text: None,
            narrator: Some("Narrated Ibn Umar".to_string()),
            english_matn: None,
            distance,
        }
    }

    fn response(mode: &str, hadiths: Vec<HadithRecord>) -> QueryResponse {
        QueryResponse {
            mode: mode.to_string(),
            response_html: "<strong>Answer</strong>".to_string(),
            hadiths,
        }
    }

    #[tokio::test]
    async fn blank_queries_warn_without_network_calls() {
        for input in ["", "   ", "\t\n"] {
            let backend = FakeBackend::replying(Ok(response("concise", Vec::new())));
            let mut panel = panel();

            let outcome = panel.submit_query(&backend, input).await;

            assert_eq!(outcome, SubmitOutcome::Rejected(Rejection::EmptyQuery));
            assert!(backend.calls().is_empty());
            let warnings: Vec<_> = panel.notifications().iter().collect();
            assert_eq!(warnings.len(), 1);
            assert_eq!(warnings[0].severity, Severity::Warning);
            assert_eq!(warnings[0].message, EMPTY_QUERY_MESSAGE);
            assert_eq!(panel.state(), &PanelState::Idle);
        }
    }

    #[test]
    fn repeated_blank_submission_warns_again() {
        let mut panel = panel();
        panel.begin_submit("");
        let first = panel.view().notifications[0].id;
        panel.begin_submit(" ");
        let view = panel.view();

        assert_eq!(view.notifications.len(), 1);
        assert!(view.notifications[0].id > first);
    }

    #[tokio::test]
    async fn submissions_while_loading_are_dropped() {
        let backend = FakeBackend::replying(Ok(response("concise", vec![hadith(1, 0.5)])));
        let mut panel = panel();

        let first = panel.begin_submit("charity");
        assert!(matches!(first, Submission::Started(_)));
        assert!(panel.is_loading());

        assert_eq!(
            panel.begin_submit("fasting"),
            Submission::Rejected(Rejection::Busy)
        );
        assert_eq!(
            panel.submit_query(&backend, "fasting").await,
            SubmitOutcome::Rejected(Rejection::Busy)
        );
        assert!(panel.select_preset(0).is_some_and(|submission| {
            submission == Submission::Rejected(Rejection::Busy)
        }));

        assert!(backend.calls().is_empty());
        assert!(panel.notifications().is_empty());
        assert!(panel.is_loading());
    }

    #[tokio::test]
    async fn detailed_query_renders_similarity_and_mode() {
        let backend = FakeBackend::replying(Ok(response("detailed", vec![hadith(7, 1.0)])));
        let mut panel = panel();
        panel.set_mode(Mode::Detailed);

        let outcome = panel.submit_query(&backend, "  prayer times ").await;

        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            serde_json::to_string(&calls[0]).unwrap(),
            r#"{"query":"prayer times","mode":"detailed"}"#
        );
        assert_eq!(
            outcome,
            SubmitOutcome::Completed(Completion::Shown(vec![Effect::ScrollToResults {
                after: Duration::from_millis(300)
            }]))
        );

        let view = panel.view();
        let results = view.results.expect("results should be shown");
        assert_eq!(results.mode_label, "Detailed");
        assert_eq!(results.count_label, "1 Hadith");
        assert_eq!(results.hadiths[0].similarity_label, "50.00%");
        assert!(!results.expanded);
        assert_eq!(results.collapse_label, SHOW_DETAILS_LABEL);
        assert_eq!(results.response_html, "<strong>Answer</strong>");
        assert_eq!(view.search_button.label, SEARCH_LABEL);
        assert!(!view.search_button.disabled);
        assert!(!view.loading_visible);
    }

    #[tokio::test]
    async fn last_mode_selection_wins() {
        let backend = FakeBackend::replying(Ok(response("detailed", Vec::new())));
        let mut panel = panel();
        panel.set_mode(Mode::Concise);
        panel.set_mode(Mode::Detailed);

        panel.submit_query(&backend, "prayer times").await;

        assert_eq!(backend.calls()[0].mode, Mode::Detailed);
        let active: Vec<_> = panel
            .view()
            .mode_toggles
            .into_iter()
            .filter(|toggle| toggle.active)
            .map(|toggle| toggle.mode)
            .collect();
        assert_eq!(active, vec![Mode::Detailed]);
    }

    #[tokio::test]
    async fn hadith_list_keeps_backend_order() {
        let records = vec![hadith(3, 0.2), hadith(1, 0.4), hadith(2, 0.9)];
        let backend = FakeBackend::replying(Ok(response("concise", records)));
        let mut panel = panel();

        panel.submit_query(&backend, "kindness").await;

        let results = panel.view().results.unwrap();
        let numbers: Vec<_> = results.hadiths.iter().map(|card| card.number.as_str()).collect();
        assert_eq!(numbers, vec!["3", "1", "2"]);
        assert_eq!(results.count_label, "3 Hadiths");
    }

    #[tokio::test]
    async fn failure_restores_previous_results() {
        let mut panel = panel();
        let first = response("concise", vec![hadith(1, 0.1)]);
        let ok = FakeBackend::replying(Ok(first.clone()));
        panel.submit_query(&ok, "charity").await;
        panel.toggle_hadiths_expansion();
        let before = panel.view();

        let failing = FakeBackend::replying(Err("index not loaded".to_string()));
        let outcome = panel.submit_query(&failing, "fasting").await;

        assert_eq!(outcome, SubmitOutcome::Completed(Completion::Failed));
        assert_eq!(panel.state(), &PanelState::ResultsShown(first));
        assert!(panel.hadiths_expanded());

        let after = panel.view();
        assert_eq!(after.results, before.results);
        assert_eq!(after.results.unwrap().collapse_label, HIDE_DETAILS_LABEL);

        let errors: Vec<_> = panel
            .notifications()
            .iter()
            .filter(|entry| entry.severity == Severity::Error)
            .collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, FAILURE_MESSAGE);
        assert!(!panel.is_loading());
    }

    #[tokio::test]
    async fn failure_from_idle_returns_to_idle() {
        let failing = FakeBackend::replying(Err("boom".to_string()));
        let mut panel = panel();

        panel.submit_query(&failing, "zakat").await;

        assert_eq!(panel.state(), &PanelState::Idle);
        assert!(panel.view().results.is_none());
        assert_eq!(failing.calls().len(), 1);
    }

    #[test]
    fn loading_view_disables_search() {
        let mut panel = panel();
        panel.begin_submit("fasting");

        let view = panel.view();
        assert_eq!(view.search_button.label, SEARCHING_LABEL);
        assert!(view.search_button.disabled);
        assert!(view.loading_visible);
        assert!(view.results.is_none());
        assert_eq!(view.input, "fasting");
    }

    #[test]
    fn new_results_collapse_the_list() {
        let mut panel = panel();
        panel.begin_submit("charity");
        panel.finish_submit(Ok(response("concise", vec![hadith(1, 0.0)])));
        assert!(panel.toggle_hadiths_expansion());

        panel.begin_submit("charity");
        panel.finish_submit(Ok(response("concise", vec![hadith(2, 0.0)])));

        assert!(!panel.hadiths_expanded());
    }

    #[test]
    fn completion_without_request_is_ignored() {
        let mut panel = panel();
        assert_eq!(
            panel.finish_submit(Ok(response("concise", Vec::new()))),
            Completion::Ignored
        );
        assert_eq!(panel.state(), &PanelState::Idle);
    }

    #[test]
    fn preset_fills_input_and_submits() {
        let mut panel = panel();

        let submission = panel.select_preset(0).expect("preset exists");

        assert_eq!(
            submission,
            Submission::Started(QueryRequest {
                query: "prayer times".to_string(),
                mode: Mode::Concise,
            })
        );
        assert_eq!(panel.input(), "prayer times");
        assert!(panel.select_preset(99).is_none());
    }

    #[test]
    fn notifications_leave_view_after_ttl() {
        let mut panel = panel();
        let start = Instant::now();
        panel.notify_at("Copied", Severity::Info, start);

        assert_eq!(panel.view_at(start).notifications.len(), 1);
        let expired = panel.tick(start + Duration::from_secs(3));
        assert_eq!(expired.len(), 1);
        assert!(panel.view_at(start).notifications.is_empty());
    }
}
