use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Sense groups of the first matching lexical entry, in source order
pub type LookupResult = Vec<Meaning>;

/// Translations keyed by definition position. Only successful translations are present.
pub type TranslationMap = BTreeMap<TranslationKey, String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meaning {
    #[serde(rename = "partOfSpeech", default)]
    pub part_of_speech: String,
    #[serde(default)]
    pub definitions: Vec<Definition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    #[serde(rename = "definition")]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

/// Position of a definition inside a [`LookupResult`].
///
/// Ordering follows document order: meaning first, then definition.
/// On the wire the key is written as `"<meaning>-<definition>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TranslationKey {
    pub meaning: usize,
    pub definition: usize,
}

impl TranslationKey {
    pub fn new(meaning: usize, definition: usize) -> Self {
        Self {
            meaning,
            definition,
        }
    }

    /// Whether this key addresses an existing definition of `result`
    pub fn is_valid_for(&self, result: &[Meaning]) -> bool {
        result
            .get(self.meaning)
            .is_some_and(|m| self.definition < m.definitions.len())
    }
}

impl fmt::Display for TranslationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.meaning, self.definition)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTranslationKey(pub String);

impl fmt::Display for InvalidTranslationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid translation key: {:?}", self.0)
    }
}

impl std::error::Error for InvalidTranslationKey {}

impl FromStr for TranslationKey {
    type Err = InvalidTranslationKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidTranslationKey(s.to_string());
        let (meaning, definition) = s.split_once('-').ok_or_else(invalid)?;

        Ok(Self {
            meaning: meaning.parse().map_err(|_| invalid())?,
            definition: definition.parse().map_err(|_| invalid())?,
        })
    }
}

impl Serialize for TranslationKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TranslationKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Every definition of `result` with its key, in document order
pub fn document_order(result: &[Meaning]) -> impl Iterator<Item = (TranslationKey, &Definition)> {
    result.iter().enumerate().flat_map(|(i, meaning)| {
        meaning
            .definitions
            .iter()
            .enumerate()
            .map(move |(j, definition)| (TranslationKey::new(i, j), definition))
    })
}

/// Payload embedded verbatim in a bookmark record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionData {
    #[serde(default)]
    pub meanings: LookupResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translations: Option<TranslationMap>,
}

impl DefinitionData {
    pub fn new(meanings: LookupResult, translations: TranslationMap) -> Self {
        Self {
            meanings,
            translations: Some(translations),
        }
    }

    pub fn translation(&self, key: TranslationKey) -> Option<&str> {
        self.translations
            .as_ref()
            .and_then(|t| t.get(&key))
            .map(String::as_str)
    }
}

/// A stored bookmark row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: Uuid,
    pub user_id: String,
    pub word: String,
    pub definition_data: DefinitionData,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a bookmark. The store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewBookmark {
    pub user_id: String,
    pub word: String,
    pub definition_data: DefinitionData,
}

impl NewBookmark {
    pub fn new(user_id: &str, word: &str, definition_data: DefinitionData) -> Self {
        Self {
            user_id: user_id.to_string(),
            word: word.to_lowercase(),
            definition_data,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Signed-in identity as reported by the auth provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "user_metadata", default)]
    pub metadata: UserMetadata,
}

impl Identity {
    /// Full name when known, otherwise the email, otherwise the id
    pub fn display_name(&self) -> &str {
        self.metadata
            .full_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(self.email.as_deref())
            .unwrap_or(&self.id)
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Password { email: String, password: String },
    /// Tokens returned by an OAuth redirect
    Tokens {
        access_token: String,
        refresh_token: Option<String>,
    },
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Password { email, .. } => f
                .debug_struct("Password")
                .field("email", email)
                .finish_non_exhaustive(),
            Credentials::Tokens { .. } => f.debug_struct("Tokens").finish_non_exhaustive(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    CreatedAt,
    Word,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn flipped(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// Observable state of one search view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pub input_text: String,
    pub loading: bool,
    pub error: Option<String>,
    pub result: LookupResult,
    pub translations: TranslationMap,
}

impl SearchState {
    pub fn translation(&self, key: TranslationKey) -> Option<&str> {
        self.translations.get(&key).map(String::as_str)
    }

    /// Snapshot suitable for storing with a bookmark
    pub fn definition_data(&self) -> DefinitionData {
        DefinitionData::new(self.result.clone(), self.translations.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn translation_key_wire_form() {
        let key = TranslationKey::new(2, 11);
        assert_eq!(key.to_string(), "2-11");
        assert_eq!("2-11".parse::<TranslationKey>().unwrap(), key);
        assert!("2".parse::<TranslationKey>().is_err());
        assert!("a-1".parse::<TranslationKey>().is_err());
    }

    #[test]
    fn document_order_walks_meanings_then_definitions() {
        let result = vec![meaning("noun", &["a", "b"]), meaning("verb", &["c"])];
        let keys: Vec<String> = document_order(&result)
            .map(|(k, d)| format!("{k}:{}", d.text))
            .collect();
        assert_eq!(keys, ["0-0:a", "0-1:b", "1-0:c"]);
    }

    #[test]
    fn key_validity_against_result() {
        let result = vec![meaning("noun", &["a", "b"])];
        assert!(TranslationKey::new(0, 1).is_valid_for(&result));
        assert!(!TranslationKey::new(0, 2).is_valid_for(&result));
        assert!(!TranslationKey::new(1, 0).is_valid_for(&result));
    }

    #[test]
    fn definition_data_matches_stored_shape() {
        let mut translations = TranslationMap::new();
        translations.insert(TranslationKey::new(0, 0), "你好".to_string());
        let data = DefinitionData::new(vec![meaning("exclamation", &["used as a greeting"])], translations);

        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "meanings": [{
                    "partOfSpeech": "exclamation",
                    "definitions": [{ "definition": "used as a greeting" }]
                }],
                "translations": { "0-0": "你好" }
            })
        );

        let back: DefinitionData = serde_json::from_value(json).unwrap();
        assert_eq!(back.translation(TranslationKey::new(0, 0)), Some("你好"));
    }

    #[test]
    fn legacy_rows_without_translations_decode() {
        let data: DefinitionData = serde_json::from_str(r#"{"meanings":[]}"#).unwrap();
        assert!(data.translations.is_none());
        assert_eq!(data.translation(TranslationKey::new(0, 0)), None);
    }

    #[test]
    fn new_bookmark_lowercases_word() {
        let b = NewBookmark::new("u1", "Hello", DefinitionData::default());
        assert_eq!(b.word, "hello");
    }

    #[test]
    fn display_name_prefers_full_name() {
        let mut identity = Identity {
            id: "u1".into(),
            email: Some("a@b.c".into()),
            metadata: UserMetadata::default(),
        };
        assert_eq!(identity.display_name(), "a@b.c");
        identity.metadata.full_name = Some("Ada".into());
        assert_eq!(identity.display_name(), "Ada");
    }

    #[test]
    fn credentials_debug_hides_secrets() {
        let c = Credentials::Password {
            email: "a@b.c".into(),
            password: "hunter2".into(),
        };
        assert!(!format!("{c:?}").contains("hunter2"));
    }
}
