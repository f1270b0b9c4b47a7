//! Provider response normalization
//!
//! Maps the raw dictionary API payload into a [`Definition`], applying the
//! meaning/sense truncation limits so the cache only ever stores the
//! presentation shape. Optional fields default to empty values; wrongly
//! typed optional fields are treated as absent.

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::{Definition, Meaning, Sense};
use crate::config::{MAX_MEANINGS, MAX_SENSES};

/// Errors that can occur while normalizing a provider payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// The payload was not an array, or the array was empty
    #[error("No definition found")]
    EmptyResult,

    /// The first entry is not an object carrying a headword
    #[error("Provider entry has no headword")]
    MissingWord,
}

/// A single entry of the provider's response array
#[derive(Debug, Default, Deserialize)]
struct ProviderEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    word: String,
    #[serde(default, deserialize_with = "lenient_string")]
    phonetic: String,
    #[serde(default, deserialize_with = "lenient_seq")]
    phonetics: Vec<ProviderPhonetic>,
    #[serde(default, deserialize_with = "lenient_seq")]
    meanings: Vec<ProviderMeaning>,
}

#[derive(Debug, Default, Deserialize)]
struct ProviderPhonetic {
    #[serde(default, deserialize_with = "lenient_string")]
    text: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderMeaning {
    #[serde(default, deserialize_with = "lenient_string")]
    part_of_speech: String,
    #[serde(default, deserialize_with = "lenient_seq")]
    definitions: Vec<ProviderSense>,
}

#[derive(Debug, Default, Deserialize)]
struct ProviderSense {
    #[serde(default, deserialize_with = "lenient_string")]
    definition: String,
    #[serde(default, deserialize_with = "lenient_string")]
    example: String,
}

/// Accepts any JSON value, keeping it only if it is a string
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Ok(s),
        _ => Ok(String::new()),
    }
}

/// Accepts any JSON value, keeping it only if it is an array.
///
/// Elements that do not have the expected shape become defaults so that
/// positions (and therefore truncation) match the provider's ordering.
fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => Ok(items
            .into_iter()
            .map(|item| serde_json::from_value(item).unwrap_or_default())
            .collect()),
        _ => Ok(Vec::new()),
    }
}

/// Normalizes a full provider response into a [`Definition`].
///
/// Only the first element of the response array is used.
///
/// # Returns
/// * `Ok(Definition)` truncated to [`MAX_MEANINGS`] meanings of at most
///   [`MAX_SENSES`] senses each
/// * `Err(NormalizeError::EmptyResult)` if `payload` is not a non-empty array
/// * `Err(NormalizeError::MissingWord)` if the first element has no headword
pub fn normalize(payload: &Value) -> Result<Definition, NormalizeError> {
    let first = payload
        .as_array()
        .and_then(|entries| entries.first())
        .ok_or(NormalizeError::EmptyResult)?;

    if !first.is_object() {
        return Err(NormalizeError::MissingWord);
    }

    let entry = ProviderEntry::deserialize(first).map_err(|_| NormalizeError::MissingWord)?;
    if entry.word.is_empty() {
        return Err(NormalizeError::MissingWord);
    }

    let phonetic = extract_phonetic(&entry);

    let meanings = entry
        .meanings
        .into_iter()
        .take(MAX_MEANINGS)
        .map(|meaning| Meaning {
            part_of_speech: meaning.part_of_speech,
            definitions: meaning
                .definitions
                .into_iter()
                .take(MAX_SENSES)
                .map(|sense| Sense {
                    definition: sense.definition,
                    example: sense.example,
                })
                .collect(),
        })
        .collect();

    Ok(Definition {
        word: entry.word,
        phonetic,
        meanings,
    })
}

/// Top-level phonetic first, then the first `phonetics` entry with text
fn extract_phonetic(entry: &ProviderEntry) -> String {
    if !entry.phonetic.is_empty() {
        return entry.phonetic.clone();
    }

    entry
        .phonetics
        .iter()
        .find(|p| !p.text.is_empty())
        .map(|p| p.text.clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn senses(n: usize) -> Vec<Value> {
        (0..n)
            .map(|i| json!({ "definition": format!("sense {i}"), "example": format!("example {i}") }))
            .collect()
    }

    #[test]
    fn test_hello_scenario() {
        let payload = json!([{
            "word": "hello",
            "phonetic": "/həˈloʊ/",
            "meanings": [{
                "partOfSpeech": "exclamation",
                "definitions": [{ "definition": "used as a greeting" }]
            }]
        }]);

        let definition = normalize(&payload).expect("should normalize");

        assert_eq!(
            definition,
            Definition {
                word: "hello".to_string(),
                phonetic: "/həˈloʊ/".to_string(),
                meanings: vec![Meaning {
                    part_of_speech: "exclamation".to_string(),
                    definitions: vec![Sense {
                        definition: "used as a greeting".to_string(),
                        example: String::new(),
                    }],
                }],
            }
        );
    }

    #[test]
    fn test_empty_or_missing_array_is_empty_result() {
        assert_eq!(normalize(&json!([])), Err(NormalizeError::EmptyResult));
        assert_eq!(normalize(&Value::Null), Err(NormalizeError::EmptyResult));
        assert_eq!(
            normalize(&json!({ "title": "No Definitions Found" })),
            Err(NormalizeError::EmptyResult)
        );
    }

    #[test]
    fn test_entry_without_word_is_rejected() {
        assert_eq!(
            normalize(&json!([{ "phonetic": "/x/" }])),
            Err(NormalizeError::MissingWord)
        );
        assert_eq!(normalize(&json!(["hello"])), Err(NormalizeError::MissingWord));
    }

    #[test]
    fn test_only_first_entry_is_used() {
        let payload = json!([{ "word": "bank" }, { "word": "banks" }]);
        assert_eq!(normalize(&payload).unwrap().word, "bank");
    }

    #[test]
    fn test_phonetic_falls_back_to_first_phonetics_entry_with_text() {
        let payload = json!([{
            "word": "tomato",
            "phonetics": [
                { "audio": "https://example.invalid/tomato.mp3" },
                { "text": "" },
                { "text": "/təˈmeɪtoʊ/" },
                { "text": "/təˈmɑːtəʊ/" }
            ]
        }]);

        assert_eq!(normalize(&payload).unwrap().phonetic, "/təˈmeɪtoʊ/");
    }

    #[test]
    fn test_top_level_phonetic_wins() {
        let payload = json!([{
            "word": "tomato",
            "phonetic": "/top/",
            "phonetics": [{ "text": "/list/" }]
        }]);

        assert_eq!(normalize(&payload).unwrap().phonetic, "/top/");
    }

    #[test]
    fn test_missing_phonetics_yield_empty_string() {
        let payload = json!([{ "word": "hmm", "phonetics": [] }]);
        assert_eq!(normalize(&payload).unwrap().phonetic, "");
    }

    #[test]
    fn test_truncates_meanings_and_senses() {
        let meanings: Vec<Value> = (0..5)
            .map(|i| json!({ "partOfSpeech": format!("pos {i}"), "definitions": senses(6) }))
            .collect();
        let payload = json!([{ "word": "set", "meanings": meanings }]);

        let definition = normalize(&payload).unwrap();

        assert_eq!(definition.meanings.len(), MAX_MEANINGS);
        assert_eq!(definition.meanings[2].part_of_speech, "pos 2");
        for meaning in &definition.meanings {
            assert_eq!(meaning.definitions.len(), MAX_SENSES);
            assert_eq!(meaning.definitions[0].definition, "sense 0");
            assert_eq!(meaning.definitions[2].example, "example 2");
        }
    }

    #[test]
    fn test_missing_optional_fields_default_to_empty() {
        let payload = json!([{
            "word": "odd",
            "meanings": [
                {},
                { "partOfSpeech": "adjective", "definitions": [{}] }
            ]
        }]);

        let definition = normalize(&payload).unwrap();

        assert_eq!(definition.meanings[0].part_of_speech, "");
        assert!(definition.meanings[0].definitions.is_empty());
        assert_eq!(definition.meanings[1].definitions[0].definition, "");
        assert_eq!(definition.meanings[1].definitions[0].example, "");
    }

    #[test]
    fn test_wrongly_typed_fields_are_treated_as_absent() {
        let payload = json!([{
            "word": "weird",
            "phonetic": 42,
            "meanings": [
                { "partOfSpeech": null, "definitions": "not a list" },
                "not an object"
            ]
        }]);

        let definition = normalize(&payload).unwrap();

        assert_eq!(definition.phonetic, "");
        assert_eq!(definition.meanings.len(), 2);
        assert_eq!(definition.meanings[0].part_of_speech, "");
        assert!(definition.meanings[0].definitions.is_empty());
        assert_eq!(definition.meanings[1].part_of_speech, "");
    }

    #[test]
    fn test_normalize_is_idempotent_on_its_own_output() {
        let meanings: Vec<Value> = (0..4)
            .map(|i| json!({ "partOfSpeech": format!("pos {i}"), "definitions": senses(4) }))
            .collect();
        let payload = json!([{
            "word": "run",
            "phonetics": [{ "text": "/ɹʌn/" }],
            "meanings": meanings
        }]);

        let once = normalize(&payload).unwrap();
        let reshaped = json!([serde_json::to_value(&once).unwrap()]);
        let twice = normalize(&reshaped).unwrap();

        assert_eq!(once, twice);
    }
}
