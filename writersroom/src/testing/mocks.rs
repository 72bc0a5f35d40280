//! Mock host bridge and notifier.

use crate::host::{CommandOptions, CommandOutcome, HostBridge, Injection, Notifier};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// A scriptable host bridge that records every call.
///
/// Non-generation scripts succeed by default; generation scripts pop
/// outcomes from a queue (an exhausted queue yields an empty pipe, which
/// the pipeline treats as empty output). Any script containing a
/// registered failure fragment returns an error outcome instead.
#[derive(Default)]
pub struct ScriptedHost {
    ready: AtomicBool,
    scripts: Mutex<Vec<String>>,
    generations: Mutex<VecDeque<CommandOutcome>>,
    failure_fragments: Mutex<Vec<String>>,
    injections: Mutex<HashMap<String, Injection>>,
    generation_delay: Mutex<Option<Duration>>,
}

impl ScriptedHost {
    /// Creates a ready host with no scripted outcomes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ready: AtomicBool::new(true),
            ..Self::default()
        }
    }

    /// Creates a host that reports not-ready.
    #[must_use]
    pub fn not_ready() -> Self {
        Self::default()
    }

    /// Sets the readiness flag.
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    /// Queues a successful generation outcome.
    pub fn push_generation(&self, text: &str) {
        self.generations.lock().push_back(CommandOutcome::ok(text));
    }

    /// Queues a failing generation outcome.
    pub fn push_generation_error(&self, message: &str) {
        self.generations
            .lock()
            .push_back(CommandOutcome::error(message));
    }

    /// Makes every script containing the fragment fail.
    pub fn fail_scripts_containing(&self, fragment: &str) {
        self.failure_fragments.lock().push(fragment.to_string());
    }

    /// Delays every generation round trip, for in-flight guard tests.
    pub fn set_generation_delay(&self, delay: Duration) {
        *self.generation_delay.lock() = Some(delay);
    }

    /// All executed scripts, in order.
    #[must_use]
    pub fn scripts(&self) -> Vec<String> {
        self.scripts.lock().clone()
    }

    /// Number of generation round trips executed.
    #[must_use]
    pub fn generation_count(&self) -> usize {
        self.scripts
            .lock()
            .iter()
            .filter(|s| s.starts_with("/gen"))
            .count()
    }

    /// The currently staged injection for an id, if any.
    #[must_use]
    pub fn injection(&self, id: &str) -> Option<Injection> {
        self.injections.lock().get(id).cloned()
    }

    /// Stages an injection directly, to simulate leftovers from a
    /// previous run.
    pub fn seed_injection(&self, injection: Injection) {
        self.injections.lock().insert(injection.id.clone(), injection);
    }
}

#[async_trait]
impl HostBridge for ScriptedHost {
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    async fn execute(&self, script: &str, _options: CommandOptions) -> CommandOutcome {
        self.scripts.lock().push(script.to_string());

        let failing = self
            .failure_fragments
            .lock()
            .iter()
            .find(|fragment| script.contains(fragment.as_str()))
            .cloned();
        if let Some(fragment) = failing {
            return CommandOutcome::error(format!("forced failure for \"{fragment}\""));
        }

        if script.starts_with("/gen") {
            let delay = *self.generation_delay.lock();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            return self
                .generations
                .lock()
                .pop_front()
                .unwrap_or_else(|| CommandOutcome::ok(""));
        }

        CommandOutcome::ok("")
    }

    async fn inject(&self, injection: Injection) {
        self.injections
            .lock()
            .insert(injection.id.clone(), injection);
    }

    async fn remove_injection(&self, id: &str) {
        self.injections.lock().remove(id);
    }
}

/// A notifier that records every toast.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<(Level, String, String)>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Info,
    Success,
    Warning,
    Error,
}

impl RecordingNotifier {
    /// Creates an empty recording notifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, level: Level, message: &str, title: &str) {
        self.notices
            .lock()
            .push((level, message.to_string(), title.to_string()));
    }

    fn messages_at(&self, level: Level) -> Vec<String> {
        self.notices
            .lock()
            .iter()
            .filter(|(l, _, _)| *l == level)
            .map(|(_, m, _)| m.clone())
            .collect()
    }

    /// All recorded info messages.
    #[must_use]
    pub fn infos(&self) -> Vec<String> {
        self.messages_at(Level::Info)
    }

    /// All recorded success messages.
    #[must_use]
    pub fn successes(&self) -> Vec<String> {
        self.messages_at(Level::Success)
    }

    /// All recorded warning messages.
    #[must_use]
    pub fn warnings(&self) -> Vec<String> {
        self.messages_at(Level::Warning)
    }

    /// All recorded error messages.
    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        self.messages_at(Level::Error)
    }

    /// Total number of recorded notices.
    #[must_use]
    pub fn count(&self) -> usize {
        self.notices.lock().len()
    }
}

impl Notifier for RecordingNotifier {
    fn info(&self, message: &str, title: &str) {
        self.record(Level::Info, message, title);
    }

    fn success(&self, message: &str, title: &str) {
        self.record(Level::Success, message, title);
    }

    fn warning(&self, message: &str, title: &str) {
        self.record(Level::Warning, message, title);
    }

    fn error(&self, message: &str, title: &str) {
        self.record(Level::Error, message, title);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_host_records_scripts() {
        let host = ScriptedHost::new();
        host.execute("/flushinject", CommandOptions::silent()).await;

        assert_eq!(host.scripts(), vec!["/flushinject".to_string()]);
        assert_eq!(host.generation_count(), 0);
    }

    #[tokio::test]
    async fn test_generation_queue_playback() {
        let host = ScriptedHost::new();
        host.push_generation("first");
        host.push_generation_error("second fails");

        let first = host.execute("/gen \"p\" |", CommandOptions::silent()).await;
        assert_eq!(first.pipe, "first");

        let second = host.execute("/gen \"p\" |", CommandOptions::silent()).await;
        assert!(second.is_error);

        // Exhausted queue yields an empty pipe.
        let third = host.execute("/gen \"p\" |", CommandOptions::silent()).await;
        assert!(!third.is_error);
        assert!(third.pipe.is_empty());
    }

    #[tokio::test]
    async fn test_failure_fragment_matches_any_script() {
        let host = ScriptedHost::new();
        host.fail_scripts_containing("/api claude");

        let outcome = host
            .execute("/preset \"P\" | /api claude", CommandOptions::silent())
            .await;
        assert!(outcome.is_error);
    }

    #[tokio::test]
    async fn test_injection_store() {
        let host = ScriptedHost::new();
        host.inject(Injection::new("id", "text")).await;
        assert!(host.injection("id").is_some());

        host.remove_injection("id").await;
        assert!(host.injection("id").is_none());
    }

    #[test]
    fn test_recording_notifier_levels() {
        let notifier = RecordingNotifier::new();
        notifier.info("i", "t");
        notifier.error("e1", "t");
        notifier.error("e2", "t");

        assert_eq!(notifier.infos(), vec!["i".to_string()]);
        assert_eq!(notifier.errors().len(), 2);
        assert_eq!(notifier.count(), 3);
    }
}
