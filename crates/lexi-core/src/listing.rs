use std::cmp::Ordering;

use lexi_types::{Bookmark, BookmarkPage, SortKey, SortOrder};
use uuid::Uuid;

/// Client-side sorted, paginated view over a user's bookmarks.
///
/// Pages are 1-based. Any change to the list or to the sort order puts the
/// view back on page 1.
#[derive(Debug, Clone)]
pub struct BookmarkListView {
    bookmarks: Vec<Bookmark>,
    sort_key: SortKey,
    sort_order: SortOrder,
    page_size: usize,
    current_page: usize,
    selected: Option<Uuid>,
}

impl BookmarkListView {
    pub fn new(page_size: usize) -> Self {
        Self {
            bookmarks: Vec::new(),
            sort_key: SortKey::CreatedAt,
            sort_order: SortOrder::Desc,
            page_size: page_size.max(1),
            current_page: 1,
            selected: None,
        }
    }

    /// Replace the underlying list. The selection survives if its row is still present.
    pub fn set_bookmarks(&mut self, bookmarks: Vec<Bookmark>) {
        self.bookmarks = bookmarks;
        if let Some(id) = self.selected {
            if !self.bookmarks.iter().any(|b| b.id == id) {
                self.selected = None;
            }
        }
        self.apply_sort();
    }

    /// Same key flips the order; a new key starts descending
    pub fn toggle_sort(&mut self, key: SortKey) {
        if self.sort_key == key {
            self.sort_order = self.sort_order.flipped();
        } else {
            self.sort_key = key;
            self.sort_order = SortOrder::Desc;
        }
        self.apply_sort();
    }

    fn apply_sort(&mut self) {
        let key = self.sort_key;
        let order = self.sort_order;
        self.bookmarks.sort_by(|a, b| {
            let ordering = compare(key, a, b);
            match order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
        self.current_page = 1;
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    pub fn len(&self) -> usize {
        self.bookmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookmarks.is_empty()
    }

    pub fn total_pages(&self) -> usize {
        self.bookmarks.len().div_ceil(self.page_size)
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Clamped to `1..=total_pages` (page 1 when the list is empty)
    pub fn go_to_page(&mut self, page: usize) {
        self.current_page = page.min(self.total_pages()).max(1);
    }

    pub fn next_page(&mut self) {
        self.go_to_page(self.current_page + 1);
    }

    pub fn prev_page(&mut self) {
        self.go_to_page(self.current_page.saturating_sub(1));
    }

    pub fn page_items(&self) -> &[Bookmark] {
        let start = (self.current_page - 1) * self.page_size;
        let end = (start + self.page_size).min(self.bookmarks.len());
        self.bookmarks.get(start..end).unwrap_or(&[])
    }

    /// Item at a 1-based position on the current page
    pub fn item_at(&self, position: usize) -> Option<&Bookmark> {
        position
            .checked_sub(1)
            .and_then(|i| self.page_items().get(i))
    }

    pub fn select(&mut self, position: usize) -> Option<&Bookmark> {
        let id = self.item_at(position)?.id;
        self.selected = Some(id);
        self.selected()
    }

    pub fn selected(&self) -> Option<&Bookmark> {
        let id = self.selected?;
        self.bookmarks.iter().find(|b| b.id == id)
    }

    /// Drop a row that was deleted from the store
    pub fn remove(&mut self, id: Uuid) -> Option<Bookmark> {
        let index = self.bookmarks.iter().position(|b| b.id == id)?;
        let removed = self.bookmarks.remove(index);
        if self.selected == Some(id) {
            self.selected = None;
        }
        self.apply_sort();
        Some(removed)
    }

    pub fn page(&self) -> BookmarkPage {
        BookmarkPage {
            items: self.page_items().to_vec(),
            page: self.current_page,
            total_pages: self.total_pages(),
            total_count: self.bookmarks.len(),
            sort_key: self.sort_key,
            sort_order: self.sort_order,
            selected: self.selected().cloned(),
        }
    }
}

fn compare(key: SortKey, a: &Bookmark, b: &Bookmark) -> Ordering {
    match key {
        SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
        SortKey::Word => a.word.to_lowercase().cmp(&b.word.to_lowercase()),
    }
}
