use std::sync::Arc;

use lexi_config::Config;
use lexi_config::translator::TranslatorConfig;
use lexi_core::bookmarks::{BookmarkService, BookmarkStore};
use lexi_core::language::Dictionary;
use lexi_core::listing::BookmarkListView;
use lexi_core::search::SearchOrchestrator;
use lexi_core::session::{SessionContext, SessionProvider};
use lexi_lang_english::{EnglishDictionary, MyMemoryTranslator};
use lexi_supabase::{SupabaseAuth, SupabaseBookmarkStore, SupabaseClient};
use lexi_translator::Translator;
use tokio::sync::{Mutex, RwLock};

/// Translator named by `provider`, or `None` when disabled or unknown
pub fn build_translator(config: &TranslatorConfig) -> Option<Arc<dyn Translator>> {
    if !config.enabled {
        tracing::warn!("Translator disabled, definitions will not be translated");
        return None;
    }

    match config.provider.as_str() {
        "mymemory" => {
            let translator = MyMemoryTranslator::from_config(config);
            tracing::info!(
                provider = %translator.metadata().name,
                "translating {} -> {}",
                config.from_lang,
                config.to_lang
            );
            Some(Arc::new(translator))
        }
        other => {
            tracing::warn!("Unknown translation provider {other:?}, definitions will not be translated");
            None
        }
    }
}

pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    pub search: Arc<SearchOrchestrator>,
    /// Absent when no backend is configured
    pub session: Option<Arc<SessionContext>>,
    pub bookmarks: Option<BookmarkService>,
    pub bookmark_list: Mutex<BookmarkListView>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let dictionary = Arc::new(EnglishDictionary::from_config(&config.dictionary));

        let translator = build_translator(&config.translator);

        let (session, store): (Option<Arc<dyn SessionProvider>>, Option<Arc<dyn BookmarkStore>>) =
            if config.backend.is_configured() {
                let client = SupabaseClient::from_config(&config.backend);
                tracing::info!(url = %client.base_url(), "backend configured");
                (
                    Some(Arc::new(SupabaseAuth::new(client.clone(), &config.backend))),
                    Some(Arc::new(SupabaseBookmarkStore::new(client, &config.backend))),
                )
            } else {
                tracing::warn!("Backend not configured, sign-in and bookmarks disabled");
                (None, None)
            };

        Self::with_components(config, dictionary, translator, session, store)
    }

    pub fn with_components(
        config: Config,
        dictionary: Arc<dyn Dictionary>,
        translator: Option<Arc<dyn Translator>>,
        session: Option<Arc<dyn SessionProvider>>,
        store: Option<Arc<dyn BookmarkStore>>,
    ) -> Self {
        let search = SearchOrchestrator::new(dictionary, translator, &config.translator);
        let bookmark_list = BookmarkListView::new(config.ui.page_size);

        Self {
            config: Arc::new(RwLock::new(config)),
            search: Arc::new(search),
            session: session.map(|p| Arc::new(SessionContext::new(p))),
            bookmarks: store.map(BookmarkService::new),
            bookmark_list: Mutex::new(bookmark_list),
        }
    }

    /// Id of the signed-in user, if any
    pub fn user_id(&self) -> Option<String> {
        self.session.as_ref().and_then(|s| s.user_id())
    }
}
