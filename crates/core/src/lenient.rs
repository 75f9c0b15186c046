//! Tolerant field decoders for data written by older clients
//!
//! Numbers may arrive as JSON numbers or as numeric text (`"25"`, `" 3 "`).
//! Blank text reads as absent. Free-text fields also accept a bare number
//! (`"reps": 10`). Anything else is still a decode error, so a
//! value that cannot be understood is never silently replaced.

use std::fmt::Display;
use std::str::FromStr;

use serde::de::Deserializer;
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText<N> {
    Number(N),
    Text(String),
}

fn parse_text<N, E>(text: &str) -> Result<Option<N>, E>
where
    N: FromStr,
    N::Err: Display,
    E: serde::de::Error,
{
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse()
        .map(Some)
        .map_err(|e| E::custom(format!("invalid number {:?}: {}", text, e)))
}

/// A number, or numeric text; blank text reads as `N::default()`
pub fn number<'de, D, N>(deserializer: D) -> Result<N, D::Error>
where
    D: Deserializer<'de>,
    N: Deserialize<'de> + FromStr + Default,
    N::Err: Display,
{
    match NumberOrText::<N>::deserialize(deserializer)? {
        NumberOrText::Number(n) => Ok(n),
        NumberOrText::Text(text) => parse_text(&text).map(Option::unwrap_or_default),
    }
}

/// An optional number, or numeric text; `null` and blank text read as `None`
pub fn optional_number<'de, D, N>(deserializer: D) -> Result<Option<N>, D::Error>
where
    D: Deserializer<'de>,
    N: Deserialize<'de> + FromStr,
    N::Err: Display,
{
    match Option::<NumberOrText<N>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(n)) => Ok(Some(n)),
        Some(NumberOrText::Text(text)) => parse_text(&text),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Number(serde_json::Number),
}

/// Optional free text that may have been stored as a number
pub fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<TextOrNumber>::deserialize(deserializer)?.map(|value| match value {
            TextOrNumber::Text(text) => text,
            TextOrNumber::Number(n) => n.to_string(),
        }),
    )
}
