use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::{Value, json};

use crate::catalog::TemplateStore;
use crate::clipboard::{ClipboardSink, CopyAck};
use crate::config::PanelSettings;
use crate::error::{ForgeError, Result};
use crate::latency::{DelayHandle, DelayPoll, PendingDelay};
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::metrics::{SharedMetrics, with_metrics};
use crate::selection::Selector;
use crate::session::{GeneratedResult, Payload, ResultFlag, ResultId, SessionLog};

use super::{
    Generator, IntentOutcome, Panel, PanelInput, PanelIntent, PanelKind, PanelState, PanelView,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    Started { delay: Duration, settles_at: Instant },
    AlreadyGenerating,
}

struct PendingGeneration {
    delay: PendingDelay,
    handle: DelayHandle,
    payloads: Vec<(String, Payload)>,
}

pub struct PanelController<G: Generator> {
    generator: G,
    store: Arc<TemplateStore>,
    selector: Selector,
    settings: PanelSettings,
    input: PanelInput,
    state: PanelState,
    pending: Option<PendingGeneration>,
    log: SessionLog,
    next_id: u64,
    copy_ack: Option<CopyAck>,
    logger: Option<Logger>,
    metrics: Option<SharedMetrics>,
    target: String,
}

impl<G: Generator> PanelController<G> {
    pub fn new(generator: G, store: Arc<TemplateStore>, settings: PanelSettings) -> Result<Self> {
        settings.latency.validate()?;
        let category = store
            .first_key()
            .ok_or_else(|| {
                ForgeError::Configuration(format!(
                    "{} panel has an empty template store",
                    generator.kind()
                ))
            })?
            .to_string();
        let selector = settings
            .seed
            .map(Selector::seeded)
            .unwrap_or_else(Selector::from_entropy);
        let log = SessionLog::new(generator.retention());
        let target = generator.kind().log_target();

        Ok(Self {
            generator,
            store,
            selector,
            settings,
            input: PanelInput {
                category,
                text: String::new(),
            },
            state: PanelState::Idle,
            pending: None,
            log,
            next_id: 1,
            copy_ack: None,
            logger: None,
            metrics: None,
            target,
        })
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_metrics(mut self, metrics: SharedMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn kind(&self) -> PanelKind {
        self.generator.kind()
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn input(&self) -> &PanelInput {
        &self.input
    }

    pub fn log(&self) -> &SessionLog {
        &self.log
    }

    pub fn is_generating(&self) -> bool {
        self.pending.is_some()
    }

    /// Handle for cancelling the in-flight delay from outside the controller.
    /// The cancellation is observed on the next poll.
    pub fn delay_handle(&self) -> Option<DelayHandle> {
        self.pending.as_ref().map(|pending| pending.handle.clone())
    }

    pub fn select_category(&mut self, key: &str) -> Result<()> {
        if !self.store.contains_key(key) {
            return Err(ForgeError::unknown_category(key));
        }
        self.input.category = key.to_string();
        Ok(())
    }

    /// Move the category selection by `step`, wrapping at both ends.
    pub fn cycle_category(&mut self, step: isize) {
        let keys: Vec<&str> = self.store.keys().collect();
        if keys.is_empty() {
            return;
        }
        let current = keys
            .iter()
            .position(|key| *key == self.input.category)
            .unwrap_or(0) as isize;
        let next = (current + step).rem_euclid(keys.len() as isize) as usize;
        self.input.category = keys[next].to_string();
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.input.text = text.into();
    }

    pub fn push_char(&mut self, ch: char) {
        self.input.text.push(ch);
    }

    pub fn pop_char(&mut self) {
        self.input.text.pop();
    }

    pub fn can_generate(&self) -> bool {
        !self.is_generating() && !(self.generator.text_field().required && self.input.text_is_blank())
    }

    /// Start a generation. Payloads are chosen now and revealed once the
    /// simulated delay elapses on a later [`PanelController::poll`].
    pub fn trigger(&mut self, now: Instant) -> Result<TriggerOutcome> {
        if self.is_generating() {
            return Ok(TriggerOutcome::AlreadyGenerating);
        }

        let field = self.generator.text_field();
        if field.required && self.input.text_is_blank() {
            with_metrics(self.metrics.as_ref(), |m| m.record_refusal());
            self.emit(
                LogLevel::Debug,
                "input_refused",
                [json_kv("field", json!(field.name))],
            );
            return Err(ForgeError::EmptyInput { field: field.name });
        }

        let payloads = self
            .generator
            .produce(&self.store, &mut self.selector, &self.input)?;
        let duration = self.settings.latency.sample(self.selector.rng_mut());
        let (delay, handle) = PendingDelay::start(now, duration);
        let settles_at = delay.deadline();

        self.emit(
            LogLevel::Info,
            "generation_started",
            [
                json_kv("category", json!(self.input.category)),
                json_kv("delay_ms", json!(duration.as_millis() as u64)),
                json_kv("items", json!(payloads.len())),
            ],
        );
        with_metrics(self.metrics.as_ref(), |m| m.record_generation_started());

        self.pending = Some(PendingGeneration {
            delay,
            handle,
            payloads,
        });
        self.state = PanelState::Generating;

        Ok(TriggerOutcome::Started {
            delay: duration,
            settles_at,
        })
    }

    /// Settle an elapsed generation and expire the copy acknowledgement.
    pub fn poll(&mut self, now: Instant) -> bool {
        let mut changed = false;

        if let Some(ack) = self.copy_ack {
            if !ack.is_active(now) {
                self.copy_ack = None;
                changed = true;
            }
        }

        let outcome = match self.pending.as_ref() {
            Some(pending) => pending.delay.poll(now),
            None => return changed,
        };

        match outcome {
            DelayPoll::Pending { .. } => changed,
            DelayPoll::Cancelled => {
                self.pending = None;
                self.fall_back_state();
                with_metrics(self.metrics.as_ref(), |m| m.record_generation_cancelled());
                self.emit(LogLevel::Info, "generation_cancelled", std::iter::empty());
                true
            }
            DelayPoll::Elapsed => {
                if let Some(pending) = self.pending.take() {
                    self.settle(pending.payloads);
                }
                true
            }
        }
    }

    fn settle(&mut self, payloads: Vec<(String, Payload)>) {
        let results: Vec<GeneratedResult> = payloads
            .into_iter()
            .map(|(category, payload)| {
                let id = ResultId(self.next_id);
                self.next_id += 1;
                GeneratedResult::new(id, category, payload)
            })
            .collect();
        let ids: Vec<u64> = results.iter().map(|result| result.id.0).collect();

        self.log.commit(results);
        self.state = PanelState::Settled;

        with_metrics(self.metrics.as_ref(), |m| m.record_generation_settled());
        self.emit(
            LogLevel::Info,
            "generation_settled",
            [
                json_kv("ids", json!(ids)),
                json_kv("log_len", json!(self.log.len())),
            ],
        );
    }

    /// Abandon an in-flight generation. Returns `false` when nothing was pending.
    pub fn cancel(&mut self) -> bool {
        let Some(pending) = self.pending.take() else {
            return false;
        };
        pending.handle.cancel();
        self.fall_back_state();
        with_metrics(self.metrics.as_ref(), |m| m.record_generation_cancelled());
        self.emit(LogLevel::Info, "generation_cancelled", std::iter::empty());
        true
    }

    fn fall_back_state(&mut self) {
        self.state = if self.log.is_empty() {
            PanelState::Idle
        } else {
            PanelState::Settled
        };
    }

    pub fn remove(&mut self, id: ResultId) -> bool {
        let removed = self.log.remove(id);
        if removed {
            self.emit(
                LogLevel::Debug,
                "result_removed",
                [json_kv("id", json!(id.0))],
            );
        }
        removed
    }

    pub fn toggle_flag(&mut self, id: ResultId, flag: ResultFlag) -> Option<bool> {
        let value = self.log.toggle_flag(id, flag)?;
        self.emit(
            LogLevel::Debug,
            "flag_toggled",
            [
                json_kv("id", json!(id.0)),
                json_kv("flag", json!(flag.as_str())),
                json_kv("value", json!(value)),
            ],
        );
        Some(value)
    }

    /// Empty the log. An in-flight generation keeps running.
    pub fn clear(&mut self) {
        self.log.clear();
        if !self.is_generating() {
            self.state = PanelState::Idle;
        }
        self.emit(LogLevel::Debug, "log_cleared", std::iter::empty());
    }

    /// Hand the current result's exact text to `clipboard`.
    pub fn copy_current(
        &mut self,
        now: Instant,
        clipboard: &mut dyn ClipboardSink,
    ) -> Result<Option<String>> {
        let Some(current) = self.log.first() else {
            return Ok(None);
        };
        let text = current.payload.copy_text();
        let id = current.id;
        clipboard.copy(&text)?;
        self.copy_ack = Some(CopyAck::new(now, self.settings.copy_ack));
        with_metrics(self.metrics.as_ref(), |m| m.record_copy());
        self.emit(
            LogLevel::Info,
            "snippet_copied",
            [
                json_kv("id", json!(id.0)),
                json_kv("chars", json!(text.chars().count())),
            ],
        );
        Ok(Some(text))
    }

    pub fn copy_acknowledged(&self, now: Instant) -> bool {
        self.copy_ack.is_some_and(|ack| ack.is_active(now))
    }

    pub fn view(&self, now: Instant) -> PanelView {
        PanelView {
            kind: self.kind(),
            state: self.state,
            categories: self.store.keys().map(str::to_string).collect(),
            category: self.input.category.clone(),
            shows_categories: self.generator.shows_categories(),
            text_field: self.generator.text_field(),
            text: self.input.text.clone(),
            entries: self.log.entries().to_vec(),
            can_generate: self.can_generate(),
            copied: self.copy_acknowledged(now),
            remaining: self.pending.as_ref().and_then(|p| match p.delay.poll(now) {
                DelayPoll::Pending { remaining } => Some(remaining),
                _ => None,
            }),
        }
    }

    fn emit<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        if let Some(logger) = self.logger.as_ref() {
            let event = event_with_fields(level, &self.target, message, fields);
            let _ = logger.log_event(event);
        }
    }
}

impl<G: Generator> Panel for PanelController<G> {
    fn kind(&self) -> PanelKind {
        PanelController::kind(self)
    }

    fn apply(
        &mut self,
        intent: PanelIntent,
        now: Instant,
        clipboard: &mut dyn ClipboardSink,
    ) -> Result<IntentOutcome> {
        let outcome = match intent {
            PanelIntent::SelectCategory(key) => {
                self.select_category(&key)?;
                IntentOutcome::Applied
            }
            PanelIntent::CycleCategory(step) => {
                self.cycle_category(step);
                IntentOutcome::Applied
            }
            PanelIntent::InsertChar(ch) => {
                self.push_char(ch);
                IntentOutcome::Applied
            }
            PanelIntent::DeleteChar => {
                self.pop_char();
                IntentOutcome::Applied
            }
            PanelIntent::SetText(text) => {
                self.set_text(text);
                IntentOutcome::Applied
            }
            PanelIntent::Generate => match self.trigger(now)? {
                TriggerOutcome::Started { delay, .. } => IntentOutcome::Started { delay },
                TriggerOutcome::AlreadyGenerating => IntentOutcome::AlreadyGenerating,
            },
            PanelIntent::ToggleFlag(id, flag) => match self.toggle_flag(id, flag) {
                Some(_) => IntentOutcome::Applied,
                None => IntentOutcome::Ignored,
            },
            PanelIntent::Remove(id) => {
                if self.remove(id) {
                    IntentOutcome::Applied
                } else {
                    IntentOutcome::Ignored
                }
            }
            PanelIntent::Clear => {
                self.clear();
                IntentOutcome::Applied
            }
            PanelIntent::Copy => match self.copy_current(now, clipboard)? {
                Some(_) => IntentOutcome::Applied,
                None => IntentOutcome::Ignored,
            },
        };
        Ok(outcome)
    }

    fn poll(&mut self, now: Instant) -> bool {
        PanelController::poll(self, now)
    }

    fn view(&self, now: Instant) -> PanelView {
        PanelController::view(self, now)
    }

    fn teardown(&mut self) {
        self.cancel();
        self.copy_ack = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ContentItem, code_store, idea_store, research_store};
    use crate::clipboard::MemoryClipboard;
    use crate::config::SampleRange;
    use crate::latency::LatencyRange;
    use crate::logging::MemorySink;
    use crate::metrics::ForgeMetrics;
    use crate::panel::{code_panel, idea_panel, research_panel};
    use std::collections::HashSet;

    fn settings(min_ms: u64, max_ms: u64) -> PanelSettings {
        PanelSettings {
            latency: LatencyRange { min_ms, max_ms },
            sample: SampleRange { min: 3, max: 5 },
            copy_ack: Duration::from_secs(2),
            seed: Some(17),
        }
    }

    fn settle(panel: &mut PanelController<impl Generator>, now: Instant) -> Instant {
        match panel.trigger(now).unwrap() {
            TriggerOutcome::Started { settles_at, .. } => {
                assert!(panel.poll(settles_at));
                settles_at
            }
            TriggerOutcome::AlreadyGenerating => panic!("panel was busy"),
        }
    }

    #[test]
    fn store_without_categories_is_rejected() {
        let store = Arc::new(TemplateStore::builder().build().unwrap());
        assert!(store.is_empty());
        let err = idea_panel(store, settings(10, 20)).err().unwrap();
        assert!(err.is_configuration());
    }

    #[test]
    fn idea_generation_walks_through_states() {
        let mut panel = idea_panel(Arc::new(idea_store().unwrap()), settings(500, 500)).unwrap();
        let start = Instant::now();
        assert_eq!(panel.state(), PanelState::Idle);

        let outcome = panel.trigger(start).unwrap();
        assert_eq!(
            outcome,
            TriggerOutcome::Started {
                delay: Duration::from_millis(500),
                settles_at: start + Duration::from_millis(500),
            }
        );
        assert_eq!(panel.state(), PanelState::Generating);
        assert!(panel.log().is_empty());

        assert!(!panel.poll(start + Duration::from_millis(499)));
        assert_eq!(panel.state(), PanelState::Generating);

        assert!(panel.poll(start + Duration::from_millis(500)));
        assert_eq!(panel.state(), PanelState::Settled);
        assert_eq!(panel.log().len(), 1);
    }

    #[test]
    fn generating_refuses_reentrant_trigger() {
        let mut panel = idea_panel(Arc::new(idea_store().unwrap()), settings(300, 600)).unwrap();
        let now = Instant::now();
        panel.trigger(now).unwrap();
        assert!(!panel.can_generate());
        assert_eq!(
            panel.trigger(now + Duration::from_millis(1)).unwrap(),
            TriggerOutcome::AlreadyGenerating
        );
    }

    #[test]
    fn idea_results_are_prepended_and_annotated() {
        let store = Arc::new(idea_store().unwrap());
        let mut panel = idea_panel(store.clone(), settings(10, 20)).unwrap();
        panel.select_category("creative").unwrap();
        panel.set_text("rainy weekends");

        let mut now = Instant::now();
        now = settle(&mut panel, now);
        now = settle(&mut panel, now);
        settle(&mut panel, now);

        let entries = panel.log().entries();
        assert_eq!(entries.len(), 3);
        let ids: Vec<u64> = entries.iter().map(|e| e.id.0).collect();
        assert_eq!(ids, vec![3, 2, 1]);

        let creative = store.category("creative").unwrap();
        for entry in entries {
            assert_eq!(entry.category, "creative");
            let Payload::Idea(text) = &entry.payload else {
                panic!("expected idea payload");
            };
            let (base, context) = text.split_once(" — customized for: ").unwrap();
            assert_eq!(context, "\"rainy weekends\"");
            assert!(creative.contains(&ContentItem::Text(base.to_string())));
        }
    }

    #[test]
    fn blank_research_query_never_leaves_idle() {
        let mut panel =
            research_panel(Arc::new(research_store().unwrap()), settings(10, 20)).unwrap();
        let now = Instant::now();
        for query in ["", "   ", "\t\n"] {
            panel.set_text(query);
            assert!(!panel.can_generate());
            let err = panel.trigger(now).unwrap_err();
            assert!(matches!(err, ForgeError::EmptyInput { field: "query" }));
            assert_eq!(panel.state(), PanelState::Idle);
            assert!(!panel.poll(now + Duration::from_secs(10)));
            assert_eq!(panel.state(), PanelState::Idle);
        }
    }

    #[test]
    fn research_results_replace_and_stay_distinct() {
        let mut panel =
            research_panel(Arc::new(research_store().unwrap()), settings(10, 20)).unwrap();
        panel.set_text("soil carbon");
        let mut now = Instant::now();
        let mut previous_ids: Vec<ResultId> = Vec::new();
        for _ in 0..50 {
            now = settle(&mut panel, now);
            let view = panel.view(now);
            assert!((3..=5).contains(&view.entries.len()));

            let entry_ids: HashSet<u32> = view
                .entries
                .iter()
                .map(|entry| match &entry.payload {
                    Payload::Research(research) => research.id,
                    other => panic!("unexpected payload {other:?}"),
                })
                .collect();
            assert_eq!(entry_ids.len(), view.entries.len());

            for id in &previous_ids {
                assert!(!panel.log().contains(*id), "stale result {id} survived");
            }
            previous_ids = view.entries.iter().map(|entry| entry.id).collect();
        }
    }

    #[test]
    fn code_regeneration_keeps_exactly_one_snippet() {
        let mut panel = code_panel(Arc::new(code_store().unwrap()), settings(10, 20)).unwrap();
        panel.select_category("go").unwrap();
        let now = settle(&mut panel, Instant::now());
        let first = panel.view(now).entries[0].id;
        let now = settle(&mut panel, now);

        let view = panel.view(now);
        assert_eq!(view.entries.len(), 1);
        assert_ne!(view.entries[0].id, first);
        assert_eq!(view.entries[0].category, "go");
    }

    #[test]
    fn code_prompt_annotates_description_not_body() {
        let store = Arc::new(code_store().unwrap());
        let mut panel = code_panel(store.clone(), settings(10, 20)).unwrap();
        panel.select_category("rust").unwrap();
        panel.set_text("a CLI tool");
        settle(&mut panel, Instant::now());

        let Payload::Snippet(snippet) = &panel.log().entries()[0].payload else {
            panic!("expected snippet");
        };
        assert!(snippet.description.ends_with("— customized for: \"a CLI tool\""));
        let bodies: Vec<&str> = store
            .category("rust")
            .unwrap()
            .items()
            .iter()
            .filter_map(|item| match item {
                ContentItem::Snippet(s) => Some(s.body.as_str()),
                _ => None,
            })
            .collect();
        assert!(bodies.contains(&snippet.body.as_str()));
    }

    #[test]
    fn copy_exposes_exact_body_and_ack_auto_clears() {
        let mut panel = code_panel(Arc::new(code_store().unwrap()), settings(10, 20)).unwrap();
        let mut clipboard = MemoryClipboard::new();
        let now = Instant::now();
        assert_eq!(panel.copy_current(now, &mut clipboard).unwrap(), None);

        let now = settle(&mut panel, now);
        let copied = panel.copy_current(now, &mut clipboard).unwrap().unwrap();
        let Payload::Snippet(snippet) = &panel.log().entries()[0].payload else {
            panic!("expected snippet");
        };
        assert_eq!(copied, snippet.body);
        assert_eq!(clipboard.contents(), Some(snippet.body.clone()));
        assert!(panel.view(now).copied);

        assert!(!panel.poll(now + Duration::from_millis(1500)));
        assert!(panel.view(now + Duration::from_millis(1500)).copied);
        assert!(panel.poll(now + Duration::from_secs(2)));
        assert!(!panel.view(now + Duration::from_secs(2)).copied);
    }

    #[test]
    fn remove_and_flag_keep_settled_state() {
        let mut panel = idea_panel(Arc::new(idea_store().unwrap()), settings(10, 20)).unwrap();
        let now = settle(&mut panel, Instant::now());
        settle(&mut panel, now);
        let id = panel.log().entries()[0].id;

        assert_eq!(panel.toggle_flag(id, ResultFlag::Saved), Some(true));
        assert_eq!(panel.toggle_flag(id, ResultFlag::Saved), Some(false));
        assert_eq!(panel.state(), PanelState::Settled);

        assert!(panel.remove(id));
        assert!(!panel.log().contains(id));
        assert_eq!(panel.state(), PanelState::Settled);
        assert_eq!(panel.toggle_flag(id, ResultFlag::Saved), None);

        panel.clear();
        assert!(panel.log().is_empty());
        assert_eq!(panel.state(), PanelState::Idle);
    }

    #[test]
    fn clear_during_generation_keeps_generating() {
        let mut panel = idea_panel(Arc::new(idea_store().unwrap()), settings(100, 100)).unwrap();
        let now = settle(&mut panel, Instant::now());
        panel.trigger(now).unwrap();
        panel.clear();
        assert_eq!(panel.state(), PanelState::Generating);
        assert!(panel.poll(now + Duration::from_millis(100)));
        assert_eq!(panel.log().len(), 1);
    }

    #[test]
    fn cancel_drops_pending_results() {
        let sink = MemorySink::new();
        let metrics = ForgeMetrics::shared();
        let mut panel = idea_panel(Arc::new(idea_store().unwrap()), settings(100, 100))
            .unwrap()
            .with_logger(Logger::new(sink.clone()))
            .with_metrics(metrics.clone());
        let now = Instant::now();
        panel.trigger(now).unwrap();

        assert!(panel.cancel());
        assert!(!panel.cancel());
        assert_eq!(panel.state(), PanelState::Idle);
        assert!(!panel.poll(now + Duration::from_secs(1)));
        assert!(panel.log().is_empty());

        assert_eq!(sink.count("generation_started"), 1);
        assert_eq!(sink.count("generation_cancelled"), 1);
        assert_eq!(sink.count("generation_settled"), 0);
        let snapshot = metrics.lock().unwrap().snapshot(Duration::ZERO);
        assert_eq!(snapshot.generations_cancelled, 1);
    }

    #[test]
    fn external_handle_cancellation_is_seen_on_poll() {
        let mut panel = idea_panel(Arc::new(idea_store().unwrap()), settings(100, 100)).unwrap();
        let now = settle(&mut panel, Instant::now());
        panel.trigger(now).unwrap();
        let handle = panel.delay_handle().unwrap();
        handle.cancel();
        handle.cancel();

        assert!(panel.poll(now + Duration::from_millis(10)));
        assert_eq!(panel.state(), PanelState::Settled);
        assert_eq!(panel.log().len(), 1);
    }

    #[test]
    fn unknown_category_is_configuration_error() {
        let mut panel = idea_panel(Arc::new(idea_store().unwrap()), settings(10, 20)).unwrap();
        let err = panel.select_category("cooking").unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(panel.input().category, "tech");
    }

    #[test]
    fn category_cycle_wraps() {
        let mut panel = code_panel(Arc::new(code_store().unwrap()), settings(10, 20)).unwrap();
        assert_eq!(panel.input().category, "rust");
        panel.cycle_category(-1);
        assert_eq!(panel.input().category, "go");
        panel.cycle_category(2);
        assert_eq!(panel.input().category, "python");
    }

    #[test]
    fn refused_trigger_is_logged_and_counted() {
        let sink = MemorySink::new();
        let metrics = ForgeMetrics::shared();
        let mut panel = research_panel(Arc::new(research_store().unwrap()), settings(10, 20))
            .unwrap()
            .with_logger(Logger::new(sink.clone()))
            .with_metrics(metrics.clone());
        assert!(panel.trigger(Instant::now()).is_err());
        assert_eq!(sink.count("input_refused"), 1);
        assert_eq!(metrics.lock().unwrap().snapshot(Duration::ZERO).refusals, 1);
    }

    #[test]
    fn apply_routes_intents() {
        let mut panel = idea_panel(Arc::new(idea_store().unwrap()), settings(50, 50)).unwrap();
        let mut clipboard = MemoryClipboard::new();
        let now = Instant::now();

        for ch in "kids".chars() {
            Panel::apply(&mut panel, PanelIntent::InsertChar(ch), now, &mut clipboard).unwrap();
        }
        Panel::apply(&mut panel, PanelIntent::DeleteChar, now, &mut clipboard).unwrap();
        assert_eq!(panel.input().text, "kid");

        let outcome = Panel::apply(&mut panel, PanelIntent::Generate, now, &mut clipboard).unwrap();
        assert_eq!(
            outcome,
            IntentOutcome::Started {
                delay: Duration::from_millis(50)
            }
        );
        assert!(Panel::poll(&mut panel, now + Duration::from_millis(50)));

        let id = panel.log().entries()[0].id;
        let outcome = Panel::apply(
            &mut panel,
            PanelIntent::Remove(ResultId(id.0 + 100)),
            now,
            &mut clipboard,
        )
        .unwrap();
        assert_eq!(outcome, IntentOutcome::Ignored);

        Panel::teardown(&mut panel);
        assert_eq!(panel.state(), PanelState::Settled);
    }
}
