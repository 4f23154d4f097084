use std::fmt::{Display, Write};

use chrono::{DateTime, Local, TimeZone};
use lexi_types::{BookmarkPage, Identity, Meaning, SearchState, SortKey, SortOrder, TranslationKey};

/// Meaning cards: part of speech, numbered definitions, translation beneath, example last
pub fn render_meanings<'a>(
    meanings: &[Meaning],
    translation: impl Fn(TranslationKey) -> Option<&'a str>,
) -> String {
    let mut out = String::new();

    for (i, meaning) in meanings.iter().enumerate() {
        let _ = writeln!(out, "  [{}]", meaning.part_of_speech.to_uppercase());
        for (j, definition) in meaning.definitions.iter().enumerate() {
            let _ = writeln!(out, "    {}. {}", j + 1, definition.text);
            if let Some(translated) = translation(TranslationKey::new(i, j)) {
                let _ = writeln!(out, "       {translated}");
            }
            if let Some(example) = &definition.example {
                let _ = writeln!(out, "       \"{example}\"");
            }
        }
    }

    out
}

pub fn render_search(state: &SearchState) -> String {
    if state.loading {
        return format!("Searching for \"{}\"...\n", state.input_text);
    }

    if let Some(error) = &state.error {
        return format!("  ! {error}\n");
    }

    let mut out = format!("{}\n", state.input_text);
    out.push_str(&render_meanings(&state.result, |key| state.translation(key)));
    out
}

pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    date.format("%b %-d, %Y %H:%M").to_string()
}

fn sort_label(key: SortKey, order: SortOrder) -> &'static str {
    match (key, order) {
        (SortKey::CreatedAt, SortOrder::Desc) => "date, newest first",
        (SortKey::CreatedAt, SortOrder::Asc) => "date, oldest first",
        (SortKey::Word, SortOrder::Asc) => "word, A-Z",
        (SortKey::Word, SortOrder::Desc) => "word, Z-A",
    }
}

pub fn render_bookmark_page(page: &BookmarkPage) -> String {
    let mut out = String::new();
    let plural = if page.total_count == 1 { "" } else { "s" };
    let _ = writeln!(
        out,
        "My Bookmarks: {} word{plural} (sorted by {})",
        page.total_count,
        sort_label(page.sort_key, page.sort_order)
    );

    if page.items.is_empty() {
        out.push_str("  No bookmarks yet. Look up a word and use /bookmark.\n");
        return out;
    }

    for (n, bookmark) in page.items.iter().enumerate() {
        let marker = match &page.selected {
            Some(selected) if selected.id == bookmark.id => '>',
            _ => ' ',
        };
        let _ = writeln!(
            out,
            " {marker}{:>3}. {:<24} {}",
            n + 1,
            bookmark.word,
            format_date(&bookmark.created_at.with_timezone(&Local))
        );
    }

    if page.total_pages > 1 {
        let _ = writeln!(out, "  Page {} of {}", page.page, page.total_pages);
    }

    if let Some(selected) = &page.selected {
        let _ = writeln!(out, "\n{}", selected.word);
        out.push_str(&render_meanings(&selected.definition_data.meanings, |key| {
            selected.definition_data.translation(key)
        }));
    }

    out
}

pub fn render_identity(identity: Option<&Identity>) -> String {
    match identity {
        Some(identity) => format!("Signed in as {}", identity.display_name()),
        None => "Not signed in".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use lexi_types::{Bookmark, Definition, DefinitionData, TranslationMap};

    use super::*;

    fn hello() -> Vec<Meaning> {
        vec![Meaning {
            part_of_speech: "exclamation".into(),
            definitions: vec![Definition {
                text: "used as a greeting".into(),
                example: Some("hello there!".into()),
            }],
        }]
    }

    #[test]
    fn translation_sits_beneath_definition() {
        let mut translations = TranslationMap::new();
        translations.insert(TranslationKey::new(0, 0), "你好".into());
        let state = SearchState {
            input_text: "hello".into(),
            result: hello(),
            translations,
            ..SearchState::default()
        };

        let out = render_search(&state);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "hello");
        assert_eq!(lines[1], "  [EXCLAMATION]");
        assert_eq!(lines[2], "    1. used as a greeting");
        assert_eq!(lines[3], "       你好");
        assert_eq!(lines[4], "       \"hello there!\"");
    }

    #[test]
    fn error_is_shown_instead_of_results() {
        let state = SearchState {
            input_text: "qwzx".into(),
            error: Some("No definition found for the word.".into()),
            ..SearchState::default()
        };
        assert_eq!(render_search(&state), "  ! No definition found for the word.\n");
    }

    #[test]
    fn dates_are_short_and_readable() {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 9, 5, 0).unwrap();
        assert_eq!(format_date(&date), "Mar 1, 2024 09:05");
    }

    #[test]
    fn page_lists_items_and_selection() {
        let bookmark = Bookmark {
            id: uuid::Uuid::new_v4(),
            user_id: "u1".into(),
            word: "hello".into(),
            definition_data: DefinitionData::new(hello(), TranslationMap::new()),
            created_at: Utc::now(),
        };
        let page = BookmarkPage {
            items: vec![bookmark.clone()],
            page: 1,
            total_pages: 1,
            total_count: 1,
            sort_key: SortKey::Word,
            sort_order: SortOrder::Asc,
            selected: Some(bookmark),
        };

        let out = render_bookmark_page(&page);
        assert!(out.starts_with("My Bookmarks: 1 word (sorted by word, A-Z)"));
        assert!(out.contains(">  1. hello"));
        assert!(out.contains("[EXCLAMATION]"));
        assert!(!out.contains("Page 1 of 1"));
    }
}
