use std::sync::Arc;

use kanal::AsyncSender;
use lexi_types::AppEvent;

use crate::state::AppState;

pub async fn handle_show_bookmarks(
    state: Arc<AppState>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let (Some(user_id), Some(bookmarks)) = (state.user_id(), &state.bookmarks) else {
        app_to_ui_tx
            .send(AppEvent::Status("Sign in to see your bookmarks.".to_string()))
            .await?;
        return Ok(());
    };

    let rows = match bookmarks.list(&user_id).await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("Error fetching bookmarks: {}", e);
            return Ok(());
        }
    };
    tracing::debug!(count = rows.len(), "bookmarks fetched");

    let page = {
        let mut list = state.bookmark_list.lock().await;
        list.set_bookmarks(rows);
        list.page()
    };
    app_to_ui_tx.send(AppEvent::ShowBookmarkPage(page)).await?;

    Ok(())
}

/// Sorting, paging and selection on the already fetched list
pub async fn handle_bookmark_navigation(
    state: Arc<AppState>,
    event: AppEvent,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let page = {
        let mut list = state.bookmark_list.lock().await;
        match event {
            AppEvent::SortBookmarks(key) => list.toggle_sort(key),
            AppEvent::GoToPage(page) => list.go_to_page(page),
            AppEvent::NextPage => list.next_page(),
            AppEvent::PrevPage => list.prev_page(),
            AppEvent::SelectBookmark(position) => {
                if list.select(position).is_none() {
                    drop(list);
                    app_to_ui_tx
                        .send(AppEvent::Status(format!("No bookmark #{position} on this page.")))
                        .await?;
                    return Ok(());
                }
            }
            _ => return Ok(()),
        }
        list.page()
    };

    app_to_ui_tx.send(AppEvent::ShowBookmarkPage(page)).await?;
    Ok(())
}

pub async fn handle_bookmark_removal(
    state: Arc<AppState>,
    position: usize,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let Some(bookmarks) = &state.bookmarks else {
        return Ok(());
    };

    let target = {
        let list = state.bookmark_list.lock().await;
        list.item_at(position).map(|b| (b.id, b.word.clone()))
    };
    let Some((id, word)) = target else {
        app_to_ui_tx
            .send(AppEvent::Status(format!("No bookmark #{position} on this page.")))
            .await?;
        return Ok(());
    };

    if let Err(e) = bookmarks.remove(id).await {
        tracing::error!("Error removing bookmark: {}", e);
        return Ok(());
    }
    tracing::info!(%word, "bookmark removed from list");

    let page = {
        let mut list = state.bookmark_list.lock().await;
        list.remove(id);
        list.page()
    };
    app_to_ui_tx.send(AppEvent::ShowBookmarkPage(page)).await?;

    // Keep the result view's bookmark state in sync
    let current = state.search.snapshot();
    if current.input_text.to_lowercase() == word {
        app_to_ui_tx
            .send(AppEvent::BookmarkState {
                word,
                bookmarked: false,
            })
            .await?;
    }

    Ok(())
}
