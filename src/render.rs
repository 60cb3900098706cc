//! Turning outcomes into something a user can read.

use std::io::Write;
use std::time::{Duration, Instant};

use crate::client::ResultSet;
use crate::defaults::Defaults;
use crate::format::{format_label, format_value, unit_for};
use crate::scenario::Scenario;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub label: String,
    pub value: String,
    pub unit: &'static str,
}

pub fn result_rows(results: &ResultSet) -> Vec<ResultRow> {
    results
        .iter()
        .map(|(key, value)| ResultRow {
            label: format_label(key),
            value: format_value(value),
            unit: unit_for(key),
        })
        .collect()
}

pub trait ResultsRenderer {
    fn show_results(&mut self, scenario: Scenario, results: &ResultSet, explanation: &str);
    fn show_error(&mut self, message: &str);
    fn clear(&mut self);
    fn dismiss_notifications(&mut self) {}
}

/// Writes results as aligned text; used by the one-shot `calc` command.
pub struct ConsoleRenderer<W: Write> {
    out: W,
}

impl<W: Write> ConsoleRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ResultsRenderer for ConsoleRenderer<W> {
    fn show_results(&mut self, scenario: Scenario, results: &ResultSet, explanation: &str) {
        let rows = result_rows(results);
        let width = rows.iter().map(|r| r.label.chars().count()).max().unwrap_or(0);
        // stdout going away mid-print is not worth surfacing
        let _ = writeln!(self.out, "{} results", scenario.title());
        for r in &rows {
            let pad = width - r.label.chars().count();
            let _ = writeln!(self.out, "  {}{}  {} {}", r.label, " ".repeat(pad), r.value, r.unit);
        }
        if !explanation.is_empty() {
            let _ = writeln!(self.out, "\n{explanation}");
        }
    }

    fn show_error(&mut self, message: &str) {
        let _ = writeln!(self.out, "Error: {message}");
    }

    fn clear(&mut self) {}
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub created: Instant,
}

impl Notification {
    pub fn expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.created) >= ttl
    }
}

/// Backing state for the TUI results panel.
#[derive(Debug, Clone)]
pub struct PanelRenderer {
    pub visible: bool,
    pub scenario: Option<Scenario>,
    pub rows: Vec<ResultRow>,
    pub explanation: String,
    pub notifications: Vec<Notification>,
    ttl: Duration,
}

impl Default for PanelRenderer {
    fn default() -> Self {
        Self::with_ttl(Defaults::NOTIFICATION_TTL)
    }
}

impl PanelRenderer {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            visible: false,
            scenario: None,
            rows: Vec::new(),
            explanation: String::new(),
            notifications: Vec::new(),
            ttl,
        }
    }

    /// Drop notifications older than the TTL.
    pub fn prune(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.notifications.retain(|n| !n.expired(now, ttl));
    }
}

impl ResultsRenderer for PanelRenderer {
    fn show_results(&mut self, scenario: Scenario, results: &ResultSet, explanation: &str) {
        self.visible = true;
        self.scenario = Some(scenario);
        self.rows = result_rows(results);
        self.explanation = explanation.to_string();
    }

    fn show_error(&mut self, message: &str) {
        // newest first, like a prepended banner
        self.notifications.insert(
            0,
            Notification { message: message.to_string(), created: Instant::now() },
        );
    }

    fn clear(&mut self) {
        self.visible = false;
        self.scenario = None;
        self.rows.clear();
        self.explanation.clear();
    }

    fn dismiss_notifications(&mut self) {
        self.notifications.clear();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderEvent {
    Results { scenario: Scenario, rows: Vec<ResultRow>, explanation: String },
    Error(String),
    Clear,
}

/// Test double that records every call.
#[derive(Debug, Default, Clone)]
pub struct RecordingRenderer {
    pub events: Vec<RenderEvent>,
}

impl RecordingRenderer {
    pub fn errors(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                RenderEvent::Error(m) => Some(m.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn last(&self) -> Option<&RenderEvent> {
        self.events.last()
    }

    /// Rows currently on screen, i.e. since the last clear.
    pub fn displayed(&self) -> Option<&[ResultRow]> {
        match self
            .events
            .iter()
            .rev()
            .find(|e| !matches!(e, RenderEvent::Error(_)))?
        {
            RenderEvent::Results { rows, .. } => Some(rows),
            _ => None,
        }
    }
}

impl ResultsRenderer for RecordingRenderer {
    fn show_results(&mut self, scenario: Scenario, results: &ResultSet, explanation: &str) {
        self.events.push(RenderEvent::Results {
            scenario,
            rows: result_rows(results),
            explanation: explanation.to_string(),
        });
    }

    fn show_error(&mut self, message: &str) {
        self.events.push(RenderEvent::Error(message.to_string()));
    }

    fn clear(&mut self) {
        self.events.push(RenderEvent::Clear);
    }
}
