//! Tab/scenario state machine and the submit pipeline.
//!
//! Everything that the UI needs to decide lives here, with the active scenario
//! held explicitly on the controller instead of in process-wide state. The
//! terminal screens only translate key presses and draw what this exposes.

use std::collections::HashSet;
use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::client::{CalculationClient, CalculationOutcome};
use crate::export::{export_calculation, LastCalculation};
use crate::render::ResultsRenderer;
use crate::request::{build_for, CalculationRequest, FormValues};
use crate::scenario::Scenario;
use crate::store::{FormStateStore, KeyValueStore};

/// Identifies one in-flight submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitTicket {
    pub scenario: Scenario,
    /// View epoch at submit time; a tab switch moves the epoch on.
    pub epoch: u64,
}

#[derive(Debug, Clone)]
pub struct Submission {
    pub ticket: SubmitTicket,
    pub request: CalculationRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDispatch {
    /// Consumed; nothing else to do.
    Handled,
    /// Tab changed; the form editor should reset its focus.
    Switched(Scenario),
    /// Submit the active form.
    Submit,
    /// Not a controller key; the form editor may use it.
    Unhandled,
}

pub struct UiController<R, S> {
    active: Scenario,
    form: FormValues,
    renderer: R,
    store: FormStateStore<S>,
    in_flight: HashSet<Scenario>,
    epoch: u64,
    last: Option<LastCalculation>,
    export_dir: PathBuf,
}

impl<R: ResultsRenderer, S: KeyValueStore> UiController<R, S> {
    pub fn new(renderer: R, store: FormStateStore<S>, export_dir: PathBuf) -> Self {
        let active = Scenario::DEFAULT;
        let mut c = Self {
            active,
            form: FormValues::new(),
            renderer,
            store,
            in_flight: HashSet::new(),
            epoch: 0,
            last: None,
            export_dir,
        };
        c.form = c.restored(active);
        c
    }

    pub fn active(&self) -> Scenario {
        self.active
    }

    pub fn form(&self) -> &FormValues {
        &self.form
    }

    pub fn field(&self, name: &str) -> &str {
        self.form.get(name).map(String::as_str).unwrap_or("")
    }

    /// Returns false when the active scenario has no such field.
    pub fn set_field(&mut self, name: &str, value: &str) -> bool {
        if self.active.field(name).is_none() {
            return false;
        }
        self.form.insert(name.to_string(), value.to_string());
        true
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn store(&self) -> &FormStateStore<S> {
        &self.store
    }

    pub fn last_calculation(&self) -> Option<&LastCalculation> {
        self.last.as_ref()
    }

    /// Submit control state for `scenario`.
    pub fn is_submitting(&self, scenario: Scenario) -> bool {
        self.in_flight.contains(&scenario)
    }

    /// Persisted values that still match a field of `scenario`.
    fn restored(&self, scenario: Scenario) -> FormValues {
        self.store
            .load(scenario)
            .unwrap_or_default()
            .into_iter()
            .filter(|(k, _)| scenario.field(k).is_some())
            .collect()
    }

    pub fn select(&mut self, scenario: Scenario) {
        if scenario != self.active {
            debug!(from = %self.active, to = %scenario, "switching scenario");
            self.active = scenario;
            self.form = self.restored(scenario);
            self.epoch += 1;
        }
        self.clear_results();
    }

    pub fn clear_results(&mut self) {
        self.renderer.clear();
    }

    /// Global keys. `on_button` is true when focus sits on the submit control,
    /// which then handles Enter itself.
    pub fn dispatch_key(&mut self, key: KeyEvent, on_button: bool) -> KeyDispatch {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let ctrl_or_alt = ctrl || key.modifiers.contains(KeyModifiers::ALT);

        match key.code {
            KeyCode::Char(c) if ctrl_or_alt && c.is_ascii_digit() => match Scenario::from_shortcut(c) {
                Some(s) => {
                    self.select(s);
                    KeyDispatch::Switched(s)
                }
                None => KeyDispatch::Unhandled,
            },
            // F1..F4 for terminals that swallow Ctrl+digit
            KeyCode::F(n @ 1..=4) => {
                let s = Scenario::ALL[usize::from(n - 1)];
                self.select(s);
                KeyDispatch::Switched(s)
            }
            KeyCode::Char('e' | 'E') if ctrl => {
                self.export_last(OffsetDateTime::now_utc());
                KeyDispatch::Handled
            }
            KeyCode::Esc => {
                self.clear_results();
                self.renderer.dismiss_notifications();
                KeyDispatch::Handled
            }
            KeyCode::Enter if !on_button => KeyDispatch::Submit,
            _ => KeyDispatch::Unhandled,
        }
    }

    /// Validate the active form and claim its submit control.
    ///
    /// `None` when a request for this scenario is already in flight or the
    /// form is invalid (the errors are rendered).
    pub fn begin_submit(&mut self) -> Option<Submission> {
        let scenario = self.active;
        if self.in_flight.contains(&scenario) {
            debug!(%scenario, "submit ignored; request already in flight");
            return None;
        }

        let request = match build_for(scenario, &self.form) {
            Ok(r) => r,
            Err(errors) => {
                debug!(%scenario, count = errors.errors().len(), "form rejected");
                self.renderer.show_error(&errors.to_string());
                return None;
            }
        };

        if let Err(e) = self.store.save(scenario, &self.form) {
            warn!(%scenario, error = %e, "could not persist form values");
        }

        self.in_flight.insert(scenario);
        Some(Submission {
            ticket: SubmitTicket { scenario, epoch: self.epoch },
            request,
        })
    }

    /// Release the submit control and render `outcome` unless the view moved on.
    /// Returns whether anything was rendered.
    pub fn complete_submit(&mut self, ticket: SubmitTicket, outcome: CalculationOutcome) -> bool {
        self.in_flight.remove(&ticket.scenario);

        if ticket.epoch != self.epoch || ticket.scenario != self.active {
            info!(scenario = %ticket.scenario, "discarding response for an abandoned view");
            return false;
        }

        match outcome {
            CalculationOutcome::Success { results, explanation } => {
                self.renderer.show_results(ticket.scenario, &results, &explanation);
                self.last = Some(LastCalculation { scenario: ticket.scenario, results, explanation });
            }
            CalculationOutcome::Failure { kind, message } => {
                debug!(?kind, "calculation failed");
                self.renderer.show_error(&message);
            }
        }
        true
    }

    /// Begin, await and complete in one go.
    pub async fn submit_with(&mut self, client: &dyn CalculationClient) -> bool {
        let Some(sub) = self.begin_submit() else {
            return false;
        };
        let outcome = client.submit(&sub.request).await;
        self.complete_submit(sub.ticket, outcome)
    }

    /// Export the last calculation; failures become notifications.
    pub fn export_last(&mut self, at: OffsetDateTime) -> Option<PathBuf> {
        let Some(calc) = self.last.as_ref() else {
            self.renderer.show_error("No results to export yet");
            return None;
        };
        match export_calculation(&self.export_dir, calc, at) {
            Ok(path) => {
                info!(path = %path.display(), "exported calculation");
                Some(path)
            }
            Err(e) => {
                warn!(error = %format!("{e:#}"), "export failed");
                self.renderer.show_error(&format!("Export failed: {e}"));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{FailureKind, ResultSet};
    use crate::render::{RecordingRenderer, RenderEvent};
    use crate::store::MemoryStore;

    type Ctl = UiController<RecordingRenderer, MemoryStore>;

    fn controller() -> Ctl {
        UiController::new(
            RecordingRenderer::default(),
            FormStateStore::new(MemoryStore::new()),
            PathBuf::from("unused-exports"),
        )
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    fn fill_link_budget(c: &mut Ctl) {
        c.select(Scenario::LinkBudget);
        c.set_field("transmit_power_dbm", "30");
        c.set_field("frequency_mhz", "2400");
        c.set_field("distance_km", "1");
    }

    fn success() -> CalculationOutcome {
        CalculationOutcome::Success {
            results: ResultSet(vec![("fspl_db".into(), 100.0)]),
            explanation: "ok".into(),
        }
    }

    #[test]
    fn starts_on_default_scenario() {
        assert_eq!(controller().active(), Scenario::WirelessComm);
    }

    #[test]
    fn shortcuts_switch_tabs() {
        let mut c = controller();
        assert_eq!(
            c.dispatch_key(key(KeyCode::Char('3'), KeyModifiers::CONTROL), false),
            KeyDispatch::Switched(Scenario::LinkBudget)
        );
        assert_eq!(c.active(), Scenario::LinkBudget);
        assert_eq!(
            c.dispatch_key(key(KeyCode::Char('2'), KeyModifiers::ALT), false),
            KeyDispatch::Switched(Scenario::Ofdm)
        );
        assert_eq!(
            c.dispatch_key(key(KeyCode::Char('7'), KeyModifiers::CONTROL), false),
            KeyDispatch::Unhandled
        );
        assert_eq!(c.active(), Scenario::Ofdm);
        assert_eq!(
            c.dispatch_key(key(KeyCode::F(4), KeyModifiers::NONE), false),
            KeyDispatch::Switched(Scenario::Cellular)
        );
        assert_eq!(c.dispatch_key(key(KeyCode::F(5), KeyModifiers::NONE), false), KeyDispatch::Unhandled);
        // plain digits are form input
        assert_eq!(c.dispatch_key(key(KeyCode::Char('1'), KeyModifiers::NONE), false), KeyDispatch::Unhandled);
    }

    #[test]
    fn escape_clears_results_but_keeps_scenario() {
        let mut c = controller();
        fill_link_budget(&mut c);
        let sub = c.begin_submit().unwrap();
        c.complete_submit(sub.ticket, success());
        assert!(c.renderer().displayed().is_some());

        assert_eq!(c.dispatch_key(key(KeyCode::Esc, KeyModifiers::NONE), false), KeyDispatch::Handled);
        assert!(c.renderer().displayed().is_none());
        assert_eq!(c.active(), Scenario::LinkBudget);
    }

    #[test]
    fn enter_submits_only_off_the_button() {
        let mut c = controller();
        assert_eq!(c.dispatch_key(key(KeyCode::Enter, KeyModifiers::NONE), false), KeyDispatch::Submit);
        assert_eq!(c.dispatch_key(key(KeyCode::Enter, KeyModifiers::NONE), true), KeyDispatch::Unhandled);
    }

    #[test]
    fn switching_clears_results_and_restores_saved_values() {
        let mut c = controller();
        fill_link_budget(&mut c);
        let sub = c.begin_submit().unwrap();
        c.complete_submit(sub.ticket, success());

        c.select(Scenario::Ofdm);
        assert_eq!(c.renderer().last(), Some(&RenderEvent::Clear));
        assert!(c.form().is_empty());

        c.select(Scenario::LinkBudget);
        assert_eq!(c.field("frequency_mhz"), "2400");
        assert_eq!(c.field("distance_km"), "1");
    }

    #[test]
    fn restore_ignores_fields_the_form_does_not_have() {
        let mut store = FormStateStore::new(MemoryStore::new());
        let saved: FormValues = [("input_rate", "8000"), ("legacy_field", "1")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        store.save(Scenario::WirelessComm, &saved).unwrap();

        let c = UiController::new(RecordingRenderer::default(), store, PathBuf::new());
        assert_eq!(c.field("input_rate"), "8000");
        assert!(!c.form().contains_key("legacy_field"));
    }

    #[test]
    fn unknown_fields_are_not_settable() {
        let mut c = controller();
        assert!(!c.set_field("distance_km", "1"));
        assert!(c.set_field("input_rate", "1"));
    }

    #[test]
    fn invalid_form_renders_errors_and_keeps_control_enabled() {
        let mut c = controller();
        assert!(c.begin_submit().is_none());
        assert!(!c.is_submitting(Scenario::WirelessComm));
        let errors = c.renderer().errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Input Rate is required\nSampling Rate is required"));
    }

    #[test]
    fn duplicate_submit_is_blocked_while_in_flight() {
        let mut c = controller();
        fill_link_budget(&mut c);
        let sub = c.begin_submit().unwrap();
        assert!(c.is_submitting(Scenario::LinkBudget));
        assert!(c.begin_submit().is_none());

        c.complete_submit(sub.ticket, success());
        assert!(!c.is_submitting(Scenario::LinkBudget));
        assert!(c.begin_submit().is_some());
    }

    #[test]
    fn failure_re_enables_submit_and_shows_message() {
        let mut c = controller();
        fill_link_budget(&mut c);
        let sub = c.begin_submit().unwrap();
        let rendered = c.complete_submit(
            sub.ticket,
            CalculationOutcome::Failure { kind: FailureKind::Transport, message: "down".into() },
        );
        assert!(rendered);
        assert!(!c.is_submitting(Scenario::LinkBudget));
        assert_eq!(c.renderer().errors(), vec!["down"]);
        assert!(c.last_calculation().is_none());
    }

    #[test]
    fn stale_response_is_discarded_after_tab_switch() {
        let mut c = controller();
        fill_link_budget(&mut c);
        let sub = c.begin_submit().unwrap();
        c.select(Scenario::Cellular);

        assert!(!c.complete_submit(sub.ticket, success()));
        assert!(!c.is_submitting(Scenario::LinkBudget));
        assert!(c.renderer().displayed().is_none());
        assert!(c.last_calculation().is_none());

        // switching back does not resurrect it either
        c.select(Scenario::LinkBudget);
        assert!(c.renderer().displayed().is_none());
    }

    #[test]
    fn submit_persists_form_values() {
        let mut c = controller();
        fill_link_budget(&mut c);
        c.begin_submit().unwrap();
        let saved = c.store().load(Scenario::LinkBudget).unwrap();
        assert_eq!(saved.get("transmit_power_dbm").map(String::as_str), Some("30"));
    }

    #[test]
    fn export_without_results_is_a_notification() {
        let mut c = controller();
        assert!(c.export_last(OffsetDateTime::UNIX_EPOCH).is_none());
        assert_eq!(c.renderer().errors(), vec!["No results to export yet"]);
    }
}
