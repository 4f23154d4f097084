use crate::model::{Bookmark, Credentials, Identity, SearchState, SortKey, SortOrder};

#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Submitted input, already trimmed by the UI
    Search(String),
    ToggleBookmark,
    ShowBookmarks,
    SortBookmarks(SortKey),
    GoToPage(usize),
    NextPage,
    PrevPage,
    /// 1-based position on the current page
    SelectBookmark(usize),
    /// 1-based position on the current page
    RemoveBookmark(usize),
    SignIn(Credentials),
    RequestOAuthUrl,
    SignOut,
    Quit,

    SearchUpdated(SearchState),
    BookmarkState {
        word: String,
        bookmarked: bool,
    },
    ShowBookmarkPage(BookmarkPage),
    SessionChanged(Option<Identity>),
    Status(String),
}

/// One rendered page of the bookmark list
#[derive(Debug, Clone, PartialEq)]
pub struct BookmarkPage {
    pub items: Vec<Bookmark>,
    pub page: usize,
    pub total_pages: usize,
    pub total_count: usize,
    pub sort_key: SortKey,
    pub sort_order: SortOrder,
    pub selected: Option<Bookmark>,
}
