// SPDX-FileCopyrightText: 2026 Faqdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The resolution cascade: exact, substring, fuzzy, then code fallback.
//!
//! [`Matcher`] is pure over one [`FaqIndex`]. Each stage attempt is reported
//! to a [`MatchObserver`]; observers see what happened but cannot change it.

use std::sync::Arc;

use faqdesk_core::FaqSource;
use tracing::debug;

use crate::codes::extract_codes;
use crate::fuzzy::partial_ratio;
use crate::index::FaqIndex;
use crate::normalize::search_key;

/// Minimum partial-ratio score accepted by the fuzzy stages unless configured otherwise.
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 75.0;

/// Which stage produced a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchStage {
    /// Query key equals a question key.
    Exact,
    /// One key contains the other.
    Substring,
    /// Best partial-ratio score at or above the threshold.
    Fuzzy,
    /// A code from the query is contained in a question key.
    CodeSubstring,
    /// A code from the query fuzzily matches a question key.
    CodeFuzzy,
}

impl MatchStage {
    /// Stable label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStage::Exact => "exact",
            MatchStage::Substring => "substring",
            MatchStage::Fuzzy => "fuzzy",
            MatchStage::CodeSubstring => "code_substring",
            MatchStage::CodeFuzzy => "code_fuzzy",
        }
    }
}

impl std::fmt::Display for MatchStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A matched FAQ entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// The question as stored (display form).
    pub question: String,
    pub answer: String,
    /// 100 for exact/substring hits, the partial-ratio score for fuzzy ones.
    pub score: f64,
    pub stage: MatchStage,
}

/// One stage attempt, as reported to a [`MatchObserver`].
#[derive(Debug, Clone, PartialEq)]
pub struct StageEvent<'a> {
    pub stage: MatchStage,
    /// The normalized query (or normalized code) the stage ran with.
    pub query: &'a str,
    /// Matched question, if the stage succeeded.
    pub matched: Option<&'a str>,
    /// Best score seen, for fuzzy stages.
    pub score: Option<f64>,
}

/// Receives a [`StageEvent`] for every stage the matcher tries.
pub trait MatchObserver: Send + Sync {
    fn on_stage(&self, event: &StageEvent<'_>);
}

/// Logs stage events at `debug`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl MatchObserver for TracingObserver {
    fn on_stage(&self, event: &StageEvent<'_>) {
        debug!(
            stage = %event.stage,
            query = event.query,
            matched = event.matched,
            score = event.score,
            "match stage"
        );
    }
}

/// Discards stage events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl MatchObserver for NoopObserver {
    fn on_stage(&self, _event: &StageEvent<'_>) {}
}

/// Runs the resolution cascade against an index snapshot.
#[derive(Clone)]
pub struct Matcher {
    threshold: f64,
    observer: Arc<dyn MatchObserver>,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(DEFAULT_FUZZY_THRESHOLD)
    }
}

impl Matcher {
    /// Matcher with the given fuzzy threshold, reporting to [`TracingObserver`].
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            observer: Arc::new(TracingObserver),
        }
    }

    /// Replace the stage observer.
    pub fn with_observer(mut self, observer: Arc<dyn MatchObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Resolve `query` against `index`. `None` means no stage matched.
    pub fn resolve(&self, index: &FaqIndex, query: &str) -> Option<Resolution> {
        let key = search_key(query);

        if let Some(found) = self.exact(index, &key) {
            return Some(found);
        }
        // An empty key is contained in every question, so it lands here.
        if let Some(found) = self.substring(index, &key, MatchStage::Substring) {
            return Some(found);
        }
        if let Some(found) = self.fuzzy(index, &key, MatchStage::Fuzzy) {
            return Some(found);
        }

        for code in extract_codes(query) {
            let code_key = search_key(code);
            if let Some(found) = self.contained_code(index, &code_key) {
                return Some(found);
            }
            if let Some(found) = self.fuzzy(index, &code_key, MatchStage::CodeFuzzy) {
                return Some(found);
            }
        }

        None
    }

    fn exact(&self, index: &FaqIndex, key: &str) -> Option<Resolution> {
        let hit = index.entry_for_key(key);
        self.report(MatchStage::Exact, key, hit.map(|(q, _)| q), None);
        hit.map(|(question, answer)| resolution(question, answer, 100.0, MatchStage::Exact))
    }

    fn substring(&self, index: &FaqIndex, key: &str, stage: MatchStage) -> Option<Resolution> {
        let hit = index
            .normalized_keys()
            .iter()
            .find(|candidate| candidate.contains(key) || key.contains(candidate.as_str()))
            .and_then(|candidate| index.entry_for_key(candidate));
        self.report(stage, key, hit.map(|(q, _)| q), None);
        hit.map(|(question, answer)| resolution(question, answer, 100.0, stage))
    }

    /// Code stage (a): the code must appear inside the question key.
    fn contained_code(&self, index: &FaqIndex, code: &str) -> Option<Resolution> {
        let hit = index
            .normalized_keys()
            .iter()
            .find(|candidate| candidate.contains(code))
            .and_then(|candidate| index.entry_for_key(candidate));
        self.report(MatchStage::CodeSubstring, code, hit.map(|(q, _)| q), None);
        hit.map(|(question, answer)| {
            resolution(question, answer, 100.0, MatchStage::CodeSubstring)
        })
    }

    fn fuzzy(&self, index: &FaqIndex, key: &str, stage: MatchStage) -> Option<Resolution> {
        let mut best: Option<(&str, f64)> = None;
        for candidate in index.normalized_keys() {
            let score = partial_ratio(key, candidate);
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((candidate, score));
            }
        }

        let accepted = best.filter(|&(_, score)| score >= self.threshold);
        let hit = accepted.and_then(|(candidate, score)| {
            index
                .entry_for_key(candidate)
                .map(|(question, answer)| (question, answer, score))
        });
        self.report(
            stage,
            key,
            hit.map(|(q, _, _)| q),
            best.map(|(_, score)| score),
        );
        hit.map(|(question, answer, score)| resolution(question, answer, score, stage))
    }

    fn report(&self, stage: MatchStage, query: &str, matched: Option<&str>, score: Option<f64>) {
        self.observer.on_stage(&StageEvent {
            stage,
            query,
            matched,
            score,
        });
    }
}

fn resolution(question: &str, answer: &str, score: f64, stage: MatchStage) -> Resolution {
    Resolution {
        question: question.to_string(),
        answer: answer.to_string(),
        score,
        stage,
    }
}

/// Loads a fresh [`FaqIndex`] for every query and runs the [`Matcher`] on it.
#[derive(Clone)]
pub struct Resolver {
    source: Arc<dyn FaqSource>,
    matcher: Matcher,
}

impl Resolver {
    pub fn new(source: Arc<dyn FaqSource>, matcher: Matcher) -> Self {
        Self { source, matcher }
    }

    /// Resolve `query` against the store's current contents.
    pub async fn resolve(&self, query: &str) -> Option<Resolution> {
        let index = FaqIndex::load(self.source.as_ref()).await;
        self.matcher.resolve(&index, query)
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use faqdesk_core::{FaqEntry, FaqdeskError};

    use super::*;

    fn index(pairs: &[(&str, &str)]) -> FaqIndex {
        FaqIndex::from_entries(pairs.iter().map(|(q, a)| FaqEntry::new(*q, *a)))
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<(MatchStage, String, bool)>>);

    impl MatchObserver for Recorder {
        fn on_stage(&self, event: &StageEvent<'_>) {
            self.0.lock().unwrap().push((
                event.stage,
                event.query.to_string(),
                event.matched.is_some(),
            ));
        }
    }

    #[test]
    fn exact_match_for_every_entry() {
        let pairs = [
            ("Как сбросить пароль?", "reset"),
            ("Ошибка APK36651065", "reinstall"),
            ("How do I log in", "login"),
        ];
        let idx = index(&pairs);
        let matcher = Matcher::default();
        for (q, a) in pairs {
            let found = matcher.resolve(&idx, q).expect("entry should match itself");
            assert_eq!(found.question, q);
            assert_eq!(found.answer, a);
            assert_eq!(found.score, 100.0);
            assert_eq!(found.stage, MatchStage::Exact);
        }
    }

    #[test]
    fn substring_takes_first_key_in_order() {
        let idx = index(&[("reset password now", "first"), ("reset password later", "second")]);
        let found = Matcher::default().resolve(&idx, "Reset password").unwrap();
        assert_eq!(found.answer, "first");
        assert_eq!(found.stage, MatchStage::Substring);
        assert_eq!(found.score, 100.0);
    }

    #[test]
    fn key_inside_query_is_a_substring_hit() {
        let idx = index(&[("billing", "pay here")]);
        let found = Matcher::default()
            .resolve(&idx, "I have a question about billing!")
            .unwrap();
        assert_eq!(found.stage, MatchStage::Substring);
        assert_eq!(found.answer, "pay here");
    }

    #[test]
    fn substring_bypasses_fuzzy_scoring() {
        let recorder = Arc::new(Recorder::default());
        let matcher = Matcher::default().with_observer(recorder.clone());
        let idx = index(&[("zzabcyzz", "fuzzy target"), ("hello world", "greeting")]);

        let found = matcher.resolve(&idx, "world").unwrap();
        assert_eq!(found.answer, "greeting");

        let stages: Vec<MatchStage> = recorder.0.lock().unwrap().iter().map(|e| e.0).collect();
        assert_eq!(stages, vec![MatchStage::Exact, MatchStage::Substring]);
    }

    #[test]
    fn fuzzy_matches_at_threshold() {
        // partial_ratio("abcx", "zzabcyzz") == 75
        let idx = index(&[("zzabcyzz", "found")]);
        let found = Matcher::new(75.0).resolve(&idx, "abcx").unwrap();
        assert_eq!(found.stage, MatchStage::Fuzzy);
        assert_eq!(found.score, 75.0);
        assert_eq!(found.answer, "found");
    }

    #[test]
    fn fuzzy_just_below_threshold_falls_through() {
        let recorder = Arc::new(Recorder::default());
        let idx = index(&[("zzabcyzz", "found")]);
        let matcher = Matcher::new(76.0).with_observer(recorder.clone());

        assert!(matcher.resolve(&idx, "abcx").is_none());
        let events = recorder.0.lock().unwrap();
        assert!(events.iter().any(|e| e.0 == MatchStage::Fuzzy && !e.2));
    }

    #[test]
    fn fuzzy_picks_highest_score_then_first() {
        // scores against "abcdx": 60, 80, 80
        let idx = index(&[
            ("qqqqabxyqqqq", "weaker"),
            ("zzabcdyzz", "stronger"),
            ("yyabcdwyy", "tie loses"),
        ]);
        let found = Matcher::new(50.0).resolve(&idx, "abcdx").unwrap();
        assert_eq!(found.score, 80.0);
        assert_eq!(found.answer, "stronger");
    }

    #[test]
    fn code_contained_in_question() {
        let idx = index(&[
            ("Ошибка APK36651065 при запуске", "reinstall"),
            ("Как сбросить пароль", "reset"),
        ]);
        let found = Matcher::default()
            .resolve(&idx, "вчера вылезло окно с APK36651065, что делать")
            .unwrap();
        assert_eq!(found.stage, MatchStage::CodeSubstring);
        assert_eq!(found.answer, "reinstall");
        assert_eq!(found.score, 100.0);
    }

    #[test]
    fn code_fuzzy_fallback() {
        let idx = index(&[("Ошибка APK36651065", "reinstall")]);
        // one digit off: not contained, but close enough for the code fuzzy stage
        let found = Matcher::default()
            .resolve(&idx, "у меня тут постоянно вылетает приложение APK36651066 помогите")
            .unwrap();
        assert_eq!(found.stage, MatchStage::CodeFuzzy);
        assert_eq!(found.answer, "reinstall");
        assert!(found.score >= 75.0);
    }

    #[test]
    fn codes_tried_in_order() {
        let idx = index(&[("code B2 help", "b"), ("code A1 help", "a")]);
        let found = Matcher::default()
            .resolve(&idx, "zzzzzzzzzzzzzzzzzzzz A1 and B2 zzzzzzzzzzzzzzzzzzz")
            .unwrap();
        assert_eq!(found.answer, "a");
    }

    #[test]
    fn nothing_matches() {
        let idx = index(&[("Как сбросить пароль", "reset")]);
        assert!(Matcher::default().resolve(&idx, "qwxz").is_none());
        assert!(Matcher::default().resolve(&FaqIndex::default(), "anything").is_none());
    }

    #[test]
    fn punctuation_only_query_hits_first_question() {
        let idx = index(&[("Как сбросить пароль", "reset"), ("Где чек?", "receipt")]);
        let found = Matcher::default().resolve(&idx, " ?! ").unwrap();
        assert_eq!(found.stage, MatchStage::Substring);
        assert_eq!(found.score, 100.0);
        assert_eq!(found.answer, "reset");

        assert!(Matcher::default().resolve(&FaqIndex::default(), "?").is_none());
    }

    #[test]
    fn observer_sees_each_attempted_stage() {
        let recorder = Arc::new(Recorder::default());
        let matcher = Matcher::default().with_observer(recorder.clone());
        let idx = index(&[("Ошибка APK36651065 при запуске", "reinstall")]);

        matcher.resolve(&idx, "вчера вылезло окно с APK36651065, что делать");

        let events = recorder.0.lock().unwrap();
        let stages: Vec<MatchStage> = events.iter().map(|e| e.0).collect();
        assert_eq!(
            stages,
            vec![
                MatchStage::Exact,
                MatchStage::Substring,
                MatchStage::Fuzzy,
                MatchStage::CodeSubstring
            ]
        );
        assert_eq!(events[3].1, "apk36651065");
        assert!(events[3].2);
    }

    #[tracing_test::traced_test]
    #[test]
    fn tracing_observer_logs_stage() {
        let idx = index(&[("hello", "world")]);
        Matcher::default().resolve(&idx, "hello");
        assert!(logs_contain("match stage"));
        assert!(logs_contain("exact"));
    }

    struct Store(Mutex<Vec<FaqEntry>>);

    #[async_trait]
    impl FaqSource for Store {
        async fn list_entries(&self) -> Result<Vec<FaqEntry>, FaqdeskError> {
            Ok(self.0.lock().unwrap().clone())
        }
    }

    #[tokio::test]
    async fn resolver_sees_store_edits_immediately() {
        let store = Arc::new(Store(Mutex::new(vec![])));
        let resolver = Resolver::new(store.clone(), Matcher::default());

        assert!(resolver.resolve("pricing").await.is_none());

        store
            .0
            .lock()
            .unwrap()
            .push(FaqEntry::new("Pricing", "See /pricing"));
        let found = resolver.resolve("pricing").await.unwrap();
        assert_eq!(found.answer, "See /pricing");
    }

    #[tokio::test]
    async fn password_reset_scenario() {
        let store = Arc::new(Store(Mutex::new(vec![FaqEntry::new(
            "Как сбросить пароль",
            "Нажмите кнопку Забыли пароль",
        )])));
        let resolver = Resolver::new(store, Matcher::default());

        let exact = resolver.resolve("как сбросить пароль?").await.unwrap();
        assert_eq!(exact.stage, MatchStage::Exact);
        assert_eq!(exact.score, 100.0);
        assert_eq!(exact.answer, "Нажмите кнопку Забыли пароль");

        let sub = resolver.resolve("сбросить").await.unwrap();
        assert_eq!(sub.stage, MatchStage::Substring);
        assert_eq!(sub.score, 100.0);
        assert_eq!(sub.answer, "Нажмите кнопку Забыли пароль");

        // about 72 against the stored question: below the default threshold
        let typo = "как скинуть пороль";
        assert!(partial_ratio(typo, "как сбросить пароль") < DEFAULT_FUZZY_THRESHOLD);
        assert!(resolver.resolve(typo).await.is_none());
    }
}
