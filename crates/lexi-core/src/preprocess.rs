use unicode_normalization::UnicodeNormalization;

pub trait Preprocessor {
    /// Trimmed, NFC-normalized single-line query; inner line breaks become
    /// spaces. Empty means "do not search".
    fn process(&self, text: &str) -> String {
        let text = text.trim();

        if text.is_empty() {
            return String::new();
        }

        text.nfc()
            .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
            .collect()
    }
}

pub struct DefaultPreprocessor;
impl Preprocessor for DefaultPreprocessor {}
