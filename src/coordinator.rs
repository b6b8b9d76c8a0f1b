//! The owning context of the mediation pipeline.
//!
//! One coordinator instance owns the text buffer, the scheduler, the risk
//! reconciler, the fallback generator, and all request bookkeeping. Input
//! events and state mutation happen here, serialized; network calls run on
//! spawned tasks and marshal their results back over a channel, where they
//! are applied only if their request token is still current. That token
//! comparison - not transport-level cancellation - is what guarantees
//! "last issued wins" regardless of completion order.
//!
//! # Error Handling
//!
//! Background tasks use `let _ =` for channel sends: if the receiver is
//! dropped (the session ended), nobody is listening for the result anyway.

use crate::api::{
    MediateRequest, MediateResponse, MediationClient, RemoteSuggestion, RewriteRequest,
};
use crate::buffer::{BufferEvent, InputBuffer};
use crate::config::Config;
use crate::error::ApiError;
use crate::risk::{BannerPhase, RiskReconciler, RiskState};
use crate::scheduler::MediationScheduler;
use crate::suggest::{FallbackSuggestionGenerator, Suggestion, SuggestionTag};
use crate::util::truncate;
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Background probe frequency for service availability.
pub const HEALTH_CHECK_INTERVAL: Duration = Duration::from_secs(30);

/// Monotonically increasing request identity. Exactly one token is current
/// at any time; results carrying any other token are silently dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// How a request was initiated. Trigger-point results are confirmed/final
/// and update the display immediately; debounce results are intermediate
/// and go through the reconciler's coalescing window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RequestOrigin {
    Debounce,
    Trigger,
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    token: RequestToken,
    origin: RequestOrigin,
}

/// Input events from the host keyboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Text committed into the field (a character, or a chunk).
    TextCommitted(String),
    Backspace,
    /// Space/enter: a likely natural pause, bypasses debounce.
    TriggerPoint,
    /// The input field changed or was cleared by the host.
    FieldReset,
    /// The editing session ended.
    SessionEnd,
    /// The user explicitly asked for rewrite help.
    RewriteRequested,
}

/// Results marshaled from background tasks back onto the owning context.
#[derive(Debug)]
pub enum BackgroundMessage {
    MediationReady {
        token: RequestToken,
        response: MediateResponse,
    },
    MediationFailed {
        token: RequestToken,
        error: ApiError,
    },
    RewriteReady {
        token: RequestToken,
        suggestions: Vec<RemoteSuggestion>,
    },
    RewriteFailed {
        token: RequestToken,
        error: ApiError,
    },
    HealthChecked {
        available: bool,
    },
}

pub struct Coordinator {
    buffer: InputBuffer,
    scheduler: MediationScheduler,
    reconciler: RiskReconciler,
    fallback: FallbackSuggestionGenerator,
    client: Arc<MediationClient>,
    config: Config,

    next_token: u64,
    current: Option<InFlight>,
    current_task: Option<JoinHandle<()>>,

    /// Last accepted mediation result; source of the one-tap rewrite.
    last_response: Option<MediateResponse>,
    /// Rewrite suggestions currently offered to the user.
    suggestions: Vec<Suggestion>,
    /// Non-blocking notice for the host UI (degradations, never errors).
    toast: Option<String>,

    availability: Option<bool>,
    last_health_check: Option<Instant>,
    running: bool,

    tx: mpsc::Sender<BackgroundMessage>,
    rx: mpsc::Receiver<BackgroundMessage>,
}

impl Coordinator {
    pub fn new(client: Arc<MediationClient>, config: Config) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            buffer: InputBuffer::new(),
            scheduler: MediationScheduler::new(),
            reconciler: RiskReconciler::new(),
            fallback: FallbackSuggestionGenerator::new(),
            client,
            config,
            next_token: 0,
            current: None,
            current_task: None,
            last_response: None,
            suggestions: Vec::new(),
            toast: None,
            availability: None,
            last_health_check: None,
            running: false,
            tx,
            rx,
        }
    }

    /// Called by the host when its input surface becomes visible.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.availability = None;
        self.last_health_check = None;
        info!("mediation coordinator started");
    }

    /// Called by the host when its input surface goes away. Cancels all
    /// in-flight work and resets to SAFE.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.buffer.on_session_end();
        self.clear_all();
        self.running = false;
        info!("mediation coordinator stopped");
    }

    /// Route one input event. All mutation is synchronous on this context.
    pub fn handle_event(&mut self, event: SessionEvent, now: Instant) {
        if !self.running {
            return;
        }

        match event {
            SessionEvent::TextCommitted(text) => {
                match self.buffer.on_text_committed(&text) {
                    BufferEvent::Changed(_) => self.scheduler.notify_changed(now),
                    BufferEvent::Cleared => self.clear_all(),
                }
            }
            SessionEvent::Backspace => match self.buffer.on_backspace() {
                BufferEvent::Changed(_) => self.scheduler.notify_changed(now),
                BufferEvent::Cleared => self.clear_all(),
            },
            SessionEvent::TriggerPoint => {
                self.scheduler.notify_trigger_point();
                if self.buffer.is_empty() {
                    self.clear_all();
                } else {
                    self.issue_mediation(RequestOrigin::Trigger);
                }
            }
            SessionEvent::FieldReset => {
                self.buffer.on_field_reset();
                self.clear_all();
            }
            SessionEvent::SessionEnd => {
                self.buffer.on_session_end();
                self.clear_all();
            }
            SessionEvent::RewriteRequested => self.request_rewrite_help(),
        }
    }

    /// Drive debounce deadlines, reconciler windows, banner animations, and
    /// the periodic health probe. Call from the host loop.
    pub fn tick(&mut self, now: Instant) {
        if !self.running {
            return;
        }

        if self.scheduler.poll(now) && !self.buffer.is_empty() {
            self.issue_mediation(RequestOrigin::Debounce);
        }

        self.reconciler.poll(now);
        self.maybe_check_health(now);
    }

    /// Apply completed background results (non-blocking).
    pub fn drain_messages(&mut self, now: Instant) {
        while let Ok(message) = self.rx.try_recv() {
            self.apply_message(message, now);
        }
    }

    /// Sender half used by background tasks to post results back.
    pub fn sender(&self) -> mpsc::Sender<BackgroundMessage> {
        self.tx.clone()
    }

    pub fn risk_state(&self) -> &RiskState {
        self.reconciler.state()
    }

    pub fn banner(&self) -> BannerPhase {
        self.reconciler.banner()
    }

    pub fn banner_visible(&self) -> bool {
        self.reconciler.banner_visible()
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    /// Take the pending notice, if any.
    pub fn take_toast(&mut self) -> Option<String> {
        self.toast.take()
    }

    pub fn availability(&self) -> Option<bool> {
        self.availability
    }

    pub fn buffer_text(&self) -> &str {
        self.buffer.as_str()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn current_token(&self) -> Option<RequestToken> {
        self.current.map(|c| c.token)
    }

    /// Everything that must die with an empty buffer: pending debounce,
    /// in-flight request, risk display, cached result, suggestions.
    fn clear_all(&mut self) {
        self.scheduler.cancel_all();
        self.cancel_current();
        self.reconciler.reset();
        self.last_response = None;
        self.suggestions.clear();
    }

    fn cancel_current(&mut self) {
        if let Some(task) = self.current_task.take() {
            // Best-effort transport abort; correctness comes from the token
            // check when results are applied.
            task.abort();
        }
        self.current = None;
    }

    /// Supersede the previous request and mark a fresh token current.
    fn mint(&mut self, origin: RequestOrigin) -> RequestToken {
        if let Some(task) = self.current_task.take() {
            task.abort();
        }
        self.next_token += 1;
        let token = RequestToken(self.next_token);
        self.current = Some(InFlight { token, origin });
        token
    }

    fn issue_mediation(&mut self, origin: RequestOrigin) {
        let text = self.buffer.as_str().to_string();
        if text.trim().is_empty() {
            return;
        }

        let token = self.mint(origin);
        let request = MediateRequest::new(text, self.config.tone, self.config.lang_hint);
        debug!(
            token = token.value(),
            text = %truncate(&request.text, 50),
            "issuing mediation request"
        );

        let client = self.client.clone();
        let tx = self.tx.clone();
        self.current_task = Some(spawn_background("mediation", async move {
            let message = match client.mediate(&request).await {
                Ok(response) => BackgroundMessage::MediationReady { token, response },
                Err(error) => BackgroundMessage::MediationFailed { token, error },
            };
            let _ = tx.send(message);
        }));
    }

    fn request_rewrite_help(&mut self) {
        let text = self.buffer.as_str().to_string();
        if text.trim().is_empty() {
            return;
        }

        // The mediation result usually already carries a rewrite; reuse it
        // instead of a second round-trip.
        if let Some(response) = &self.last_response {
            if response.has_rewrite() {
                debug!("reusing rewrite from last mediation result");
                let reason = if response.why.is_empty() {
                    None
                } else {
                    Some(response.why.clone())
                };
                self.suggestions = vec![Suggestion::remote(
                    response.rewrite.clone(),
                    reason,
                    SuggestionTag::Calm,
                )];
                return;
            }
        }

        let token = self.mint(RequestOrigin::Trigger);
        let request = RewriteRequest {
            text,
            lang: self.detected_lang(),
            tone: self.config.tone,
            risk_label: self.reconciler.state().level.badge().to_string(),
            risk_score: self.reconciler.state().score,
        };
        debug!(token = token.value(), "issuing rewrite request");

        let client = self.client.clone();
        let tx = self.tx.clone();
        self.current_task = Some(spawn_background("rewrite", async move {
            let message = match client.rewrite(&request).await {
                Ok(suggestions) => BackgroundMessage::RewriteReady { token, suggestions },
                Err(error) => BackgroundMessage::RewriteFailed { token, error },
            };
            let _ = tx.send(message);
        }));
    }

    fn maybe_check_health(&mut self, now: Instant) {
        let due = self
            .last_health_check
            .map_or(true, |t| now.duration_since(t) >= HEALTH_CHECK_INTERVAL);
        if !due {
            return;
        }
        self.last_health_check = Some(now);

        let client = self.client.clone();
        let tx = self.tx.clone();
        spawn_background("health_check", async move {
            let available = client.check_health().await;
            let _ = tx.send(BackgroundMessage::HealthChecked { available });
        });
    }

    fn is_current(&self, token: RequestToken) -> bool {
        self.current.is_some_and(|c| c.token == token)
    }

    fn apply_message(&mut self, message: BackgroundMessage, now: Instant) {
        match message {
            BackgroundMessage::MediationReady { token, response } => {
                let Some(inflight) = self.current.filter(|c| c.token == token) else {
                    debug!(token = token.value(), "dropping stale mediation result");
                    return;
                };

                debug!(
                    token = token.value(),
                    risk = ?response.risk_level,
                    why = %truncate(&response.why, 60),
                    "mediation result accepted"
                );

                let next = RiskState::from_response(&response);
                self.last_response = Some(response);
                match inflight.origin {
                    RequestOrigin::Trigger => self.reconciler.update_immediate(next, now),
                    RequestOrigin::Debounce => self.reconciler.update_debounced(next, now),
                }
            }
            BackgroundMessage::MediationFailed { token, error } => {
                if !self.is_current(token) || error.is_cancelled() {
                    return;
                }
                // Never regress the display to an error badge; the last
                // known risk state stays up.
                warn!(error = %error, "mediation failed; keeping last known risk state");
                self.last_response = None;
            }
            BackgroundMessage::RewriteReady { token, suggestions } => {
                if !self.is_current(token) {
                    debug!(token = token.value(), "dropping stale rewrite result");
                    return;
                }
                info!(count = suggestions.len(), "remote rewrite suggestions ready");
                let tags = [
                    SuggestionTag::Calm,
                    SuggestionTag::Firm,
                    SuggestionTag::Educational,
                ];
                self.suggestions = suggestions
                    .into_iter()
                    .zip(tags.iter().cycle())
                    .map(|(remote, tag)| Suggestion::from_remote(remote, *tag))
                    .collect();
            }
            BackgroundMessage::RewriteFailed { token, error } => {
                if !self.is_current(token) || error.is_cancelled() {
                    return;
                }
                warn!(error = %error, "rewrite failed; generating offline suggestions");
                let text = self.buffer.as_str().to_string();
                let lang = self.detected_lang();
                self.suggestions = self
                    .fallback
                    .generate_for_tone(&text, &lang, self.config.tone);
                self.toast = Some(error.offline_notice().to_string());
            }
            BackgroundMessage::HealthChecked { available } => {
                if self.availability != Some(available) {
                    info!(available, "mediation service availability changed");
                }
                self.availability = Some(available);
            }
        }
    }

    /// Language for local suggestion pools: the detected language from the
    /// last result when known, otherwise the configured hint.
    fn detected_lang(&self) -> String {
        if let Some(response) = &self.last_response {
            if !response.language.is_empty() {
                return response.language.clone();
            }
        }
        match self.config.lang_hint {
            crate::api::LangHint::Auto => "en".to_string(),
            other => other.as_str().to_string(),
        }
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        if let Some(task) = self.current_task.take() {
            task.abort();
        }
    }
}

/// Spawn a background task that cannot take the session down: panics are
/// caught and logged instead of propagating.
pub fn spawn_background<F>(task_name: &'static str, fut: F) -> JoinHandle<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(panic) = AssertUnwindSafe(fut).catch_unwind().await {
            let detail = if let Some(s) = panic.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "unknown panic payload".to_string()
            };
            tracing::error!(task = task_name, %detail, "background task crashed unexpectedly");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::RiskLevel;
    use crate::suggest::SuggestionSource;
    use std::net::TcpListener;

    /// Client pointed at a loopback port with nothing listening.
    fn dead_client() -> Arc<MediationClient> {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        Arc::new(MediationClient::new(format!("http://{}", addr)).unwrap())
    }

    fn coordinator() -> Coordinator {
        let mut c = Coordinator::new(dead_client(), Config::default());
        c.start();
        c
    }

    fn harmful_response(why: &str, rewrite: &str) -> MediateResponse {
        serde_json::from_str(&format!(
            r#"{{"risk_level":"harmful","why":"{}","rewrite":"{}","language":"en"}}"#,
            why, rewrite
        ))
        .unwrap()
    }

    fn safe_response() -> MediateResponse {
        serde_json::from_str(r#"{"risk_level":"safe","why":"","rewrite":"","language":"en"}"#)
            .unwrap()
    }

    fn dangerous_response() -> MediateResponse {
        serde_json::from_str(
            r#"{"risk_level":"dangerous","why":"threat","rewrite":"","language":"en"}"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_burst_of_keystrokes_issues_one_request() {
        let mut c = coordinator();
        let start = Instant::now();

        for (i, ch) in ["h", "e", "l", "l", "o"].iter().enumerate() {
            c.handle_event(
                SessionEvent::TextCommitted(ch.to_string()),
                start + Duration::from_millis(i as u64 * 100),
            );
        }
        assert_eq!(c.current_token(), None);

        // 800ms after the last keystroke the single request goes out.
        c.tick(start + Duration::from_millis(400 + 799));
        assert_eq!(c.current_token(), None);
        c.tick(start + Duration::from_millis(400 + 800));
        let token = c.current_token().expect("request issued");
        assert_eq!(token.value(), 1);

        // No further requests from later ticks.
        c.tick(start + Duration::from_secs(5));
        assert_eq!(c.current_token(), Some(token));
    }

    #[tokio::test]
    async fn test_trigger_point_bypasses_debounce() {
        let mut c = coordinator();
        let start = Instant::now();

        c.handle_event(SessionEvent::TextCommitted("hello".into()), start);
        c.handle_event(
            SessionEvent::TriggerPoint,
            start + Duration::from_millis(100),
        );
        assert!(c.current_token().is_some());

        // The pending debounce deadline died with the trigger.
        c.tick(start + Duration::from_secs(5));
        assert_eq!(c.current_token().map(|t| t.value()), Some(1));
    }

    #[tokio::test]
    async fn test_trigger_point_on_empty_buffer_clears() {
        let mut c = coordinator();
        let start = Instant::now();

        c.handle_event(SessionEvent::TriggerPoint, start);
        assert_eq!(c.current_token(), None);
        assert_eq!(c.risk_state().level, RiskLevel::Safe);
    }

    #[tokio::test]
    async fn test_last_issued_wins_over_completion_order() {
        let mut c = coordinator();
        let start = Instant::now();

        c.handle_event(SessionEvent::TextCommitted("text".into()), start);
        c.handle_event(SessionEvent::TriggerPoint, start);
        let token_a = c.current_token().unwrap();

        c.handle_event(
            SessionEvent::TriggerPoint,
            start + Duration::from_millis(100),
        );
        let token_b = c.current_token().unwrap();
        assert!(token_b > token_a);

        let tx = c.sender();

        // B's SAFE result lands first...
        tx.send(BackgroundMessage::MediationReady {
            token: token_b,
            response: safe_response(),
        })
        .unwrap();
        c.drain_messages(start + Duration::from_millis(200));

        // ...then A's DANGER result straggles in. It must be dropped.
        tx.send(BackgroundMessage::MediationReady {
            token: token_a,
            response: dangerous_response(),
        })
        .unwrap();
        c.drain_messages(start + Duration::from_millis(250));

        assert_eq!(c.risk_state().level, RiskLevel::Safe);
        assert!(!c.banner_visible());
    }

    #[tokio::test]
    async fn test_clear_while_pending_drops_stale_result() {
        let mut c = coordinator();
        let start = Instant::now();

        c.handle_event(SessionEvent::TextCommitted("insulting draft".into()), start);
        c.handle_event(SessionEvent::TriggerPoint, start);
        let token = c.current_token().unwrap();

        c.handle_event(SessionEvent::FieldReset, start + Duration::from_millis(50));
        assert_eq!(c.current_token(), None);

        let tx = c.sender();
        tx.send(BackgroundMessage::MediationReady {
            token,
            response: harmful_response("Contains a personal insult", ""),
        })
        .unwrap();
        c.drain_messages(start + Duration::from_millis(100));

        assert_eq!(c.risk_state().level, RiskLevel::Safe);
        assert!(!c.banner_visible());
        assert!(c.buffer_text().is_empty());
    }

    #[tokio::test]
    async fn test_trigger_result_applies_immediately_with_explanation() {
        let mut c = coordinator();
        let start = Instant::now();

        c.handle_event(SessionEvent::TextCommitted("You're an idiot".into()), start);
        c.handle_event(SessionEvent::TriggerPoint, start);
        let token = c.current_token().unwrap();

        c.sender()
            .send(BackgroundMessage::MediationReady {
                token,
                response: harmful_response("Contains a personal insult", "I'm upset about this"),
            })
            .unwrap();
        c.drain_messages(start + Duration::from_millis(100));

        assert_eq!(c.risk_state().level, RiskLevel::Risky);
        assert_eq!(c.risk_state().explanation, "Contains a personal insult");
        assert!(c.banner_visible());
    }

    #[tokio::test]
    async fn test_debounce_result_goes_through_coalescing_window() {
        let mut c = coordinator();
        let start = Instant::now();

        c.handle_event(SessionEvent::TextCommitted("hello".into()), start);
        c.tick(start + Duration::from_millis(800));
        let token = c.current_token().unwrap();

        let arrival = start + Duration::from_millis(900);
        c.sender()
            .send(BackgroundMessage::MediationReady {
                token,
                response: dangerous_response(),
            })
            .unwrap();
        c.drain_messages(arrival);

        // Not applied until the reconciler window elapses.
        assert_eq!(c.risk_state().level, RiskLevel::Safe);
        c.tick(arrival + Duration::from_millis(300));
        assert_eq!(c.risk_state().level, RiskLevel::Danger);
    }

    #[tokio::test]
    async fn test_mediation_failure_keeps_last_known_state() {
        let mut c = coordinator();
        let start = Instant::now();

        c.handle_event(SessionEvent::TextCommitted("text".into()), start);
        c.handle_event(SessionEvent::TriggerPoint, start);
        c.sender()
            .send(BackgroundMessage::MediationReady {
                token: c.current_token().unwrap(),
                response: harmful_response("insult", ""),
            })
            .unwrap();
        c.drain_messages(start);
        assert_eq!(c.risk_state().level, RiskLevel::Risky);

        // Next request fails; the stale-but-valid state stays up.
        c.handle_event(SessionEvent::TriggerPoint, start + Duration::from_secs(1));
        c.sender()
            .send(BackgroundMessage::MediationFailed {
                token: c.current_token().unwrap(),
                error: ApiError::Timeout,
            })
            .unwrap();
        c.drain_messages(start + Duration::from_secs(2));

        assert_eq!(c.risk_state().level, RiskLevel::Risky);
        assert!(c.take_toast().is_none());
    }

    #[tokio::test]
    async fn test_rewrite_failure_falls_back_to_offline_suggestions() {
        let mut c = coordinator();
        let start = Instant::now();

        c.handle_event(SessionEvent::TextCommitted("you idiot".into()), start);
        c.handle_event(SessionEvent::RewriteRequested, start);
        let token = c.current_token().unwrap();

        c.sender()
            .send(BackgroundMessage::RewriteFailed {
                token,
                error: ApiError::Timeout,
            })
            .unwrap();
        c.drain_messages(start + Duration::from_millis(100));

        let suggestions = c.suggestions();
        assert_eq!(suggestions.len(), 3);
        assert!(suggestions
            .iter()
            .all(|s| s.source == SuggestionSource::Local));
        let texts: std::collections::HashSet<_> =
            suggestions.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts.len(), 3, "offline suggestions must be distinct");

        let toast = c.take_toast().expect("offline notice raised");
        assert!(toast.contains("offline suggestions"));
    }

    #[tokio::test]
    async fn test_remote_rewrite_suggestions_applied() {
        let mut c = coordinator();
        let start = Instant::now();

        c.handle_event(SessionEvent::TextCommitted("some text".into()), start);
        c.handle_event(SessionEvent::RewriteRequested, start);
        let token = c.current_token().unwrap();

        c.sender()
            .send(BackgroundMessage::RewriteReady {
                token,
                suggestions: vec![
                    RemoteSuggestion {
                        text: "Calmer version".into(),
                        reason: Some("softer".into()),
                    },
                    RemoteSuggestion {
                        text: "Firmer version".into(),
                        reason: None,
                    },
                ],
            })
            .unwrap();
        c.drain_messages(start);

        let suggestions = c.suggestions();
        assert_eq!(suggestions.len(), 2);
        assert!(suggestions
            .iter()
            .all(|s| s.source == SuggestionSource::Remote));
        assert_eq!(suggestions[0].tag, SuggestionTag::Calm);
        assert_eq!(suggestions[1].tag, SuggestionTag::Firm);
    }

    #[tokio::test]
    async fn test_rewrite_reuses_last_mediation_rewrite() {
        let mut c = coordinator();
        let start = Instant::now();

        c.handle_event(SessionEvent::TextCommitted("rude draft".into()), start);
        c.handle_event(SessionEvent::TriggerPoint, start);
        let mediation_token = c.current_token().unwrap();
        c.sender()
            .send(BackgroundMessage::MediationReady {
                token: mediation_token,
                response: harmful_response("harsh wording", "Could we talk about this?"),
            })
            .unwrap();
        c.drain_messages(start);

        c.handle_event(SessionEvent::RewriteRequested, start + Duration::from_secs(1));

        // No new request was needed; the cached rewrite is offered.
        assert_eq!(c.current_token(), Some(mediation_token));
        assert_eq!(c.suggestions().len(), 1);
        assert_eq!(c.suggestions()[0].text, "Could we talk about this?");
        assert_eq!(c.suggestions()[0].source, SuggestionSource::Remote);
    }

    #[tokio::test]
    async fn test_cancelled_errors_are_fully_silent() {
        let mut c = coordinator();
        let start = Instant::now();

        c.handle_event(SessionEvent::TextCommitted("text".into()), start);
        c.handle_event(SessionEvent::TriggerPoint, start);
        let token = c.current_token().unwrap();

        c.sender()
            .send(BackgroundMessage::MediationFailed {
                token,
                error: ApiError::Cancelled,
            })
            .unwrap();
        c.sender()
            .send(BackgroundMessage::RewriteFailed {
                token,
                error: ApiError::Cancelled,
            })
            .unwrap();
        c.drain_messages(start);

        assert_eq!(c.risk_state().level, RiskLevel::Safe);
        assert!(c.suggestions().is_empty());
        assert!(c.take_toast().is_none());
    }

    #[tokio::test]
    async fn test_health_transitions_tracked() {
        let mut c = coordinator();
        assert_eq!(c.availability(), None);

        c.sender()
            .send(BackgroundMessage::HealthChecked { available: true })
            .unwrap();
        c.drain_messages(Instant::now());
        assert_eq!(c.availability(), Some(true));

        c.sender()
            .send(BackgroundMessage::HealthChecked { available: false })
            .unwrap();
        c.drain_messages(Instant::now());
        assert_eq!(c.availability(), Some(false));
    }

    #[tokio::test]
    async fn test_events_ignored_until_started() {
        let mut c = Coordinator::new(dead_client(), Config::default());
        let start = Instant::now();

        c.handle_event(SessionEvent::TextCommitted("hello".into()), start);
        c.handle_event(SessionEvent::TriggerPoint, start);
        assert_eq!(c.current_token(), None);
        assert!(c.buffer_text().is_empty());
    }

    #[tokio::test]
    async fn test_stop_cancels_everything() {
        let mut c = coordinator();
        let start = Instant::now();

        c.handle_event(SessionEvent::TextCommitted("draft".into()), start);
        c.handle_event(SessionEvent::TriggerPoint, start);
        let token = c.current_token().unwrap();

        c.stop();
        assert!(!c.is_running());
        assert_eq!(c.current_token(), None);
        assert!(c.buffer_text().is_empty());

        // Straggling results after stop are stale by definition.
        c.sender()
            .send(BackgroundMessage::MediationReady {
                token,
                response: dangerous_response(),
            })
            .unwrap();
        c.drain_messages(start + Duration::from_secs(1));
        assert_eq!(c.risk_state().level, RiskLevel::Safe);
    }
}
