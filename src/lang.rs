//! Source language of a draft and a lightweight IT/EN detector.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, ErrorContext, Result};

/// Words that rarely appear in English mail but are common in Italian.
const ITALIAN_MARKERS: &[&str] = &[
    "che", "non", "per", "con", "sono", "della", "questo", "quello", "anche", "tutto", "più",
    "cosa", "perché", "ma", "come", "grazie", "buongiorno", "salve", "cordiali", "resto",
    "attesa", "inviato", "allego", "riscontro", "gentile", "spettabile", "prego", "scusi",
    "scusa", "ciao", "oggetto",
];

/// Marker hits needed to call a text Italian.
const ITALIAN_THRESHOLD: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    It,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::It => "it",
        }
    }

    /// Label shown in the prompt. Cosmetic only.
    pub fn label(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::It => "Italian",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "it" => Ok(Language::It),
            other => Err(Error::validation_with_context(
                format!("unsupported language code: {}", other),
                ErrorContext::new()
                    .with_field_path("request.language")
                    .with_details("expected one of: en, it"),
            )),
        }
    }
}

/// Guess whether `text` is Italian or English.
///
/// Counts marker words surrounded by single spaces; punctuation-adjacent words do not count.
pub fn detect_language(text: &str) -> Language {
    let padded = format!(" {} ", text.to_lowercase());
    let score = ITALIAN_MARKERS
        .iter()
        .filter(|w| padded.contains(&format!(" {} ", w)))
        .count();
    if score >= ITALIAN_THRESHOLD {
        Language::It
    } else {
        Language::En
    }
}
