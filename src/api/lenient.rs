//! Field decoders for loosely typed backend JSON.
//!
//! The backend sends ids and amounts as numbers or strings depending on the
//! endpoint, and `null` for missing values. These helpers normalise them so
//! record structs can stay strongly typed. Use together with `#[serde(default)]`.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Int(i64),
    Float(f64),
    Flag(bool),
    Text(String),
}

/// Any primitive as its string form; `null` becomes an empty string.
pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Option::<Loose>::deserialize(deserializer)? {
        Some(Loose::Int(v)) => v.to_string(),
        Some(Loose::Float(v)) => v.to_string(),
        Some(Loose::Flag(v)) => v.to_string(),
        Some(Loose::Text(v)) => v,
        None => String::new(),
    })
}

/// A float; unparseable strings and `null` become 0.
pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(match Option::<Loose>::deserialize(deserializer)? {
        Some(Loose::Int(v)) => v as f64,
        Some(Loose::Float(v)) => v,
        Some(Loose::Flag(v)) => f64::from(u8::from(v)),
        Some(Loose::Text(v)) => v.trim().parse().unwrap_or(0.0),
        None => 0.0,
    })
}

/// An integer; floats are truncated, unparseable strings and `null` become 0.
pub fn integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Ok(match Option::<Loose>::deserialize(deserializer)? {
        Some(Loose::Int(v)) => v,
        Some(Loose::Float(v)) => v as i64,
        Some(Loose::Flag(v)) => i64::from(v),
        Some(Loose::Text(v)) => {
            let trimmed = v.trim();
            trimmed
                .parse::<i64>()
                .or_else(|_| trimmed.parse::<f64>().map(|f| f as i64))
                .unwrap_or(0)
        }
        None => 0,
    })
}

/// A list of strings; `null` becomes empty.
pub fn string_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(Option::<Vec<Loose>>::deserialize(deserializer)?
        .unwrap_or_default()
        .into_iter()
        .map(|item| match item {
            Loose::Int(v) => v.to_string(),
            Loose::Float(v) => v.to_string(),
            Loose::Flag(v) => v.to_string(),
            Loose::Text(v) => v,
        })
        .collect())
}
