use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use lexi_config::translator::TranslatorConfig;
use lexi_translator::Translator;
use lexi_types::{SearchState, document_order};
use tokio::sync::watch;

use crate::language::Dictionary;
use crate::preprocess::{DefaultPreprocessor, Preprocessor};

pub const NOT_FOUND_MESSAGE: &str = "No definition found for the word.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The search ran to the end; final state attached
    Completed(SearchState),
    /// Input was empty after trimming, state untouched
    Skipped,
    /// A newer search started before this one finished; its results were dropped
    Superseded,
}

/// Sequences one lookup and its per-definition translations, and owns the
/// observable [`SearchState`].
///
/// A new call supersedes any call still in flight: the state is reset at once,
/// and the older call stops writing at its next suspension point.
pub struct SearchOrchestrator {
    dictionary: Arc<dyn Dictionary>,
    translator: Option<Arc<dyn Translator>>,
    from_lang: String,
    to_lang: String,
    state: watch::Sender<SearchState>,
    latest: AtomicU64,
}

impl SearchOrchestrator {
    pub fn new(
        dictionary: Arc<dyn Dictionary>,
        translator: Option<Arc<dyn Translator>>,
        config: &TranslatorConfig,
    ) -> Self {
        let (state, _) = watch::channel(SearchState::default());

        Self {
            dictionary,
            translator,
            from_lang: config.from_lang.clone(),
            to_lang: config.to_lang.clone(),
            state,
            latest: AtomicU64::new(0),
        }
    }

    /// Receiver that observes every state step
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> SearchState {
        self.state.borrow().clone()
    }

    pub async fn search(&self, raw_input: &str) -> SearchOutcome {
        let word = DefaultPreprocessor.process(raw_input);
        if word.is_empty() {
            return SearchOutcome::Skipped;
        }

        let generation = self.begin(&word);
        tracing::debug!(generation, %word, "search started");

        let result = match self.dictionary.lookup(&word).await {
            Ok(result) => result,
            Err(e) => {
                tracing::info!(%word, "lookup failed: {e}");
                return self.finish(generation, |state| {
                    state.error = Some(NOT_FOUND_MESSAGE.to_string());
                    state.result.clear();
                });
            }
        };

        if !self.apply(generation, |state| state.result = result.clone()) {
            return self.superseded(generation);
        }

        if let Some(translator) = &self.translator {
            for (key, definition) in document_order(&result) {
                let translated = translator
                    .translate_or_skip(&definition.text, &self.from_lang, &self.to_lang)
                    .await;

                let applied = self.apply(generation, |state| {
                    if let Some(text) = translated {
                        state.translations.insert(key, text);
                    }
                });
                if !applied {
                    return self.superseded(generation);
                }
            }
        }

        self.finish(generation, |_| {})
    }

    /// Reset the state and claim a new generation under the state lock
    fn begin(&self, word: &str) -> u64 {
        let mut generation = 0;
        self.state.send_modify(|state| {
            generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
            *state = SearchState {
                input_text: word.to_string(),
                loading: true,
                ..SearchState::default()
            };
        });
        generation
    }

    /// Mutate the state only if `generation` is still the latest search
    fn apply(&self, generation: u64, modify: impl FnOnce(&mut SearchState)) -> bool {
        self.state.send_if_modified(|state| {
            if self.latest.load(Ordering::SeqCst) != generation {
                return false;
            }
            modify(state);
            true
        })
    }

    fn finish(&self, generation: u64, modify: impl FnOnce(&mut SearchState)) -> SearchOutcome {
        let mut snapshot = None;
        let applied = self.apply(generation, |state| {
            modify(state);
            state.loading = false;
            snapshot = Some(state.clone());
        });

        match snapshot {
            Some(state) if applied => SearchOutcome::Completed(state),
            _ => self.superseded(generation),
        }
    }

    fn superseded(&self, generation: u64) -> SearchOutcome {
        tracing::debug!(generation, "search superseded, discarding results");
        SearchOutcome::Superseded
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use lexi_translator::{ProviderMetadata, TranslateError, Translation};
    use lexi_types::{Definition, LookupResult, Meaning, TranslationKey};
    use tokio::sync::Notify;
    use tokio::time::timeout;

    use super::*;
    use crate::error::LookupError;

    fn meaning(pos: &str, defs: &[&str]) -> Meaning {
        Meaning {
            part_of_speech: pos.to_string(),
            definitions: defs
                .iter()
                .map(|d| Definition {
                    text: d.to_string(),
                    example: None,
                })
                .collect(),
        }
    }

    #[derive(Default)]
    struct FakeDictionary {
        entries: HashMap<String, LookupResult>,
        calls: Mutex<Vec<String>>,
        /// Word whose lookup blocks until `release` is notified
        gated: Option<String>,
        entered: Notify,
        release: Notify,
    }

    #[async_trait]
    impl Dictionary for FakeDictionary {
        async fn lookup(&self, word: &str) -> Result<LookupResult, LookupError> {
            self.calls.lock().unwrap().push(word.to_string());
            if self.gated.as_deref() == Some(word) {
                self.entered.notify_one();
                self.release.notified().await;
            }
            self.entries
                .get(word)
                .cloned()
                .ok_or_else(|| LookupError::NotFound(word.to_string()))
        }
    }

    #[derive(Default)]
    struct FakeTranslator {
        table: HashMap<String, String>,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Translator for FakeTranslator {
        async fn translate(
            &self,
            text: &str,
            from: &str,
            to: &str,
        ) -> Result<Translation, TranslateError> {
            self.calls.lock().unwrap().push(text.to_string());
            let translated = self
                .table
                .get(text)
                .ok_or_else(|| TranslateError::ApiError("HTTP 500".to_string()))?;
            Ok(Translation {
                text: translated.clone(),
                from: from.to_string(),
                to: to.to_string(),
                provider: "fake".to_string(),
                confidence: None,
            })
        }

        fn metadata(&self) -> ProviderMetadata {
            ProviderMetadata {
                name: "fake".to_string(),
                requires_api_key: false,
                free_tier_available: true,
            }
        }
    }

    fn orchestrator(
        dictionary: FakeDictionary,
        translator: Option<Arc<FakeTranslator>>,
    ) -> SearchOrchestrator {
        SearchOrchestrator::new(
            Arc::new(dictionary),
            translator.map(|t| t as Arc<dyn Translator>),
            &TranslatorConfig::default(),
        )
    }

    #[tokio::test]
    async fn hello_is_shown_with_translation() {
        let mut dictionary = FakeDictionary::default();
        dictionary.entries.insert(
            "hello".into(),
            vec![meaning("exclamation", &["used as a greeting"])],
        );
        let mut translator = FakeTranslator::default();
        translator
            .table
            .insert("used as a greeting".into(), "你好".into());

        let search = orchestrator(dictionary, Some(Arc::new(translator)));
        let SearchOutcome::Completed(state) = search.search("hello").await else {
            panic!("search did not complete");
        };

        assert!(!state.loading);
        assert_eq!(state.error, None);
        assert_eq!(state.result.len(), 1);
        assert_eq!(state.result[0].part_of_speech, "exclamation");
        assert_eq!(state.result[0].definitions[0].text, "used as a greeting");
        assert_eq!(state.translation(TranslationKey::new(0, 0)), Some("你好"));
        assert_eq!(search.snapshot(), state);
    }

    #[tokio::test]
    async fn unknown_word_sets_error_and_empty_result() {
        let search = orchestrator(FakeDictionary::default(), None);
        let SearchOutcome::Completed(state) = search.search("qwzx").await else {
            panic!("search did not complete");
        };

        assert_eq!(state.error.as_deref(), Some(NOT_FOUND_MESSAGE));
        assert!(state.result.is_empty());
        assert!(state.translations.is_empty());
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn blank_input_never_searches() {
        let search = orchestrator(FakeDictionary::default(), None);
        assert_eq!(search.search("   \t").await, SearchOutcome::Skipped);
        assert_eq!(search.snapshot(), SearchState::default());
    }

    #[tokio::test]
    async fn input_is_trimmed_before_lookup() {
        let mut dictionary = FakeDictionary::default();
        dictionary
            .entries
            .insert("run".into(), vec![meaning("verb", &["move fast"])]);
        let dictionary = Arc::new(dictionary);
        let search = SearchOrchestrator::new(dictionary.clone(), None, &TranslatorConfig::default());

        search.search("  run \n").await;
        assert_eq!(*dictionary.calls.lock().unwrap(), ["run"]);
        assert_eq!(search.snapshot().input_text, "run");
    }

    #[tokio::test]
    async fn translations_follow_document_order_and_skip_failures() {
        let mut dictionary = FakeDictionary::default();
        dictionary.entries.insert(
            "set".into(),
            vec![meaning("verb", &["put", "fix"]), meaning("noun", &["group"])],
        );
        let mut translator = FakeTranslator::default();
        translator.table.insert("put".into(), "放".into());
        translator.table.insert("group".into(), "组".into());
        let translator = Arc::new(translator);

        let search = orchestrator(dictionary, Some(translator.clone()));
        let SearchOutcome::Completed(state) = search.search("set").await else {
            panic!("search did not complete");
        };

        assert_eq!(*translator.calls.lock().unwrap(), ["put", "fix", "group"]);
        let keys: Vec<_> = state.translations.keys().copied().collect();
        assert_eq!(keys, [TranslationKey::new(0, 0), TranslationKey::new(1, 0)]);
        assert!(keys.iter().all(|k| k.is_valid_for(&state.result)));
    }

    #[tokio::test]
    async fn new_search_clears_previous_translations() {
        let mut dictionary = FakeDictionary::default();
        dictionary
            .entries
            .insert("a".into(), vec![meaning("noun", &["first", "second"])]);
        dictionary
            .entries
            .insert("b".into(), vec![meaning("noun", &["third"])]);
        let mut translator = FakeTranslator::default();
        translator.table.insert("second".into(), "二".into());

        let search = orchestrator(dictionary, Some(Arc::new(translator)));
        search.search("a").await;
        let SearchOutcome::Completed(state) = search.search("b").await else {
            panic!("search did not complete");
        };

        assert!(state.translations.is_empty());
        assert_eq!(state.result, vec![meaning("noun", &["third"])]);
    }

    #[tokio::test]
    async fn error_is_cleared_by_a_successful_search() {
        let mut dictionary = FakeDictionary::default();
        dictionary
            .entries
            .insert("cat".into(), vec![meaning("noun", &["a small feline"])]);

        let search = orchestrator(dictionary, None);
        search.search("nope").await;
        assert!(search.snapshot().error.is_some());

        search.search("cat").await;
        let state = search.snapshot();
        assert_eq!(state.error, None);
        assert_eq!(state.result.len(), 1);
    }

    #[tokio::test]
    async fn observers_see_loading_then_idle() {
        let mut dictionary = FakeDictionary::default();
        dictionary
            .entries
            .insert("slow".into(), vec![meaning("adjective", &["not fast"])]);
        dictionary.gated = Some("slow".into());
        let dictionary = Arc::new(dictionary);

        let search = Arc::new(SearchOrchestrator::new(
            dictionary.clone(),
            None,
            &TranslatorConfig::default(),
        ));
        let mut rx = search.subscribe();

        let task = tokio::spawn({
            let search = search.clone();
            async move { search.search("slow").await }
        });
        dictionary.entered.notified().await;

        {
            let state = rx.borrow_and_update();
            assert!(state.loading);
            assert_eq!(state.input_text, "slow");
            assert!(state.result.is_empty());
        }

        dictionary.release.notify_one();
        let outcome = timeout(Duration::from_secs(2), task).await.unwrap().unwrap();
        assert!(matches!(outcome, SearchOutcome::Completed(_)));

        rx.changed().await.unwrap();
        let state = rx.borrow_and_update().clone();
        assert!(!state.loading);
        assert_eq!(state.result.len(), 1);
    }

    #[tokio::test]
    async fn newer_search_supersedes_in_flight_one() {
        let mut dictionary = FakeDictionary::default();
        dictionary
            .entries
            .insert("slow".into(), vec![meaning("adjective", &["not fast"])]);
        dictionary
            .entries
            .insert("fast".into(), vec![meaning("adjective", &["quick"])]);
        dictionary.gated = Some("slow".into());
        let dictionary = Arc::new(dictionary);

        let search = Arc::new(SearchOrchestrator::new(
            dictionary.clone(),
            None,
            &TranslatorConfig::default(),
        ));

        let first = tokio::spawn({
            let search = search.clone();
            async move { search.search("slow").await }
        });
        dictionary.entered.notified().await;

        let second = search.search("fast").await;
        assert!(matches!(second, SearchOutcome::Completed(_)));

        dictionary.release.notify_one();
        let first = timeout(Duration::from_secs(2), first).await.unwrap().unwrap();
        assert_eq!(first, SearchOutcome::Superseded);

        let state = search.snapshot();
        assert_eq!(state.input_text, "fast");
        assert_eq!(state.result, vec![meaning("adjective", &["quick"])]);
        assert!(!state.loading);
    }
}
