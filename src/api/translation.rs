//! Translation and language detection.

use crate::endpoints::join;
use crate::params::Params;
use crate::{Client, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Languages supported by the translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Language {
    #[serde(rename = "kr")]
    Korean,
    #[serde(rename = "en")]
    English,
    #[serde(rename = "jp")]
    Japanese,
    #[serde(rename = "cn")]
    Chinese,
    #[serde(rename = "vi")]
    Vietnamese,
    #[serde(rename = "id")]
    Indonesian,
    #[serde(rename = "ar")]
    Arabic,
    #[serde(rename = "bn")]
    Bengali,
    #[serde(rename = "de")]
    German,
    #[serde(rename = "es")]
    Spanish,
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "hi")]
    Hindi,
    #[serde(rename = "it")]
    Italian,
    #[serde(rename = "ms")]
    Malay,
    #[serde(rename = "nl")]
    Dutch,
    #[serde(rename = "pt")]
    Portuguese,
    #[serde(rename = "ru")]
    Russian,
    #[serde(rename = "th")]
    Thai,
    #[serde(rename = "tr")]
    Turkish,
}

impl Language {
    /// The wire code, e.g. `"kr"`.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Korean => "kr",
            Language::English => "en",
            Language::Japanese => "jp",
            Language::Chinese => "cn",
            Language::Vietnamese => "vi",
            Language::Indonesian => "id",
            Language::Arabic => "ar",
            Language::Bengali => "bn",
            Language::German => "de",
            Language::Spanish => "es",
            Language::French => "fr",
            Language::Hindi => "hi",
            Language::Italian => "it",
            Language::Malay => "ms",
            Language::Dutch => "nl",
            Language::Portuguese => "pt",
            Language::Russian => "ru",
            Language::Thai => "th",
            Language::Turkish => "tr",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Translated sentences, grouped by paragraph.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TranslatedText {
    pub translated_text: Vec<Vec<String>>,
}

impl TranslatedText {
    /// Paragraphs joined by newlines, sentences by spaces.
    pub fn joined(&self) -> String {
        self.translated_text
            .iter()
            .map(|sentences| sentences.join(" "))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Candidate languages, most likely first.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DetectedLanguage {
    pub language_info: Vec<LanguageInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LanguageInfo {
    /// The wire code. Kept as a string since detection covers more languages than translation.
    pub code: String,
    pub name: String,
    pub confidence: f64,
}

impl Client {
    /// Translates `text` from one language to another.
    pub fn translate_text(&self, text: &str, from: Language, to: Language) -> Result<TranslatedText> {
        let url = join(&self.endpoints().dapi, "/v2/translation/translate");
        let params = Params::new()
            .with("query", text)
            .with("src_lang", from.code())
            .with("target_lang", to.code());
        self.post_params(url, params)
    }

    /// Detects the language of `text`.
    pub fn detect_language(&self, text: &str) -> Result<DetectedLanguage> {
        let url = join(&self.endpoints().dapi, "/v3/translation/language/detect");
        self.post_params(url, Params::new().with("query", text))
    }
}
