use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ParseError;

/// Opaque puzzle identifier. Backends send either integers or strings, and
/// the id is echoed back to them in whichever shape it arrived.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PuzzleId {
    Numeric(i64),
    Text(String),
}

impl fmt::Display for PuzzleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(id) => f.pad(&id.to_string()),
            Self::Text(id) => f.pad(id),
        }
    }
}

impl From<i64> for PuzzleId {
    fn from(value: i64) -> Self {
        Self::Numeric(value)
    }
}

impl From<&str> for PuzzleId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PuzzleImage {
    pub puzzle_id: PuzzleId,
    pub filename: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PuzzleImage {
    pub fn new(puzzle_id: impl Into<PuzzleId>, filename: impl Into<String>) -> Self {
        Self {
            puzzle_id: puzzle_id.into(),
            filename: filename.into(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub puzzle_id: PuzzleId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Recommendation {
    pub fn new(puzzle_id: impl Into<PuzzleId>) -> Self {
        Self {
            puzzle_id: puzzle_id.into(),
            filename: None,
            extra: Map::new(),
        }
    }
}

pub fn puzzle_ids(images: &[PuzzleImage]) -> Vec<PuzzleId> {
    images.iter().map(|image| image.puzzle_id.clone()).collect()
}

/// Server-side implementation answering a feature: the ontology query
/// service or the machine-learning service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    #[default]
    Rdf,
    Ml,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rdf => f.write_str("rdf"),
            Self::Ml => f.write_str("ml"),
        }
    }
}

impl FromStr for Backend {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rdf" => Ok(Self::Rdf),
            "ml" => Ok(Self::Ml),
            _ => Err(ParseError::UnknownBackend(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn puzzle_image_keeps_unknown_fields() {
        let raw = r#"{"puzzle_id":3,"filename":"c.png","rating":1450}"#;
        let image: PuzzleImage = serde_json::from_str(raw).expect("decode");
        assert_eq!(image.puzzle_id, PuzzleId::Numeric(3));
        assert_eq!(image.extra.get("rating"), Some(&Value::from(1450)));

        let encoded = serde_json::to_value(&image).expect("encode");
        assert_eq!(encoded["rating"], 1450);
        assert_eq!(encoded["puzzle_id"], 3);
    }

    #[test]
    fn puzzle_id_accepts_string_ids() {
        let image: PuzzleImage =
            serde_json::from_str(r#"{"puzzle_id":"abc","filename":"x.png"}"#).expect("decode");
        assert_eq!(image.puzzle_id, PuzzleId::from("abc"));
        assert_eq!(image.puzzle_id.to_string(), "abc");
    }

    #[test]
    fn backend_parses_case_insensitively() {
        assert_eq!("RDF".parse::<Backend>().expect("rdf"), Backend::Rdf);
        assert_eq!("ml".parse::<Backend>().expect("ml"), Backend::Ml);
        assert!("sparql".parse::<Backend>().is_err());
        assert_eq!(Backend::default(), Backend::Rdf);
    }
}
