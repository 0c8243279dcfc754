//! Filter panel model: the six piece/game-state categories, the values
//! selected in each, and which panel sections are expanded.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterCategory {
    Rooks,
    Queens,
    Bishops,
    Knights,
    Pawns,
    GameState,
}

impl FilterCategory {
    pub const ALL: [FilterCategory; 6] = [
        Self::Rooks,
        Self::Queens,
        Self::Bishops,
        Self::Knights,
        Self::Pawns,
        Self::GameState,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rooks => "rooks",
            Self::Queens => "queens",
            Self::Bishops => "bishops",
            Self::Knights => "knights",
            Self::Pawns => "pawns",
            Self::GameState => "game_state",
        }
    }
}

impl fmt::Display for FilterCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterCategory {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == normalized)
            .ok_or_else(|| ParseError::UnknownCategory(s.to_string()))
    }
}

/// Values selected per category, in the order the user picked them.
/// Serializes as an object with exactly the six category keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    #[serde(default)]
    pub rooks: Vec<String>,
    #[serde(default)]
    pub queens: Vec<String>,
    #[serde(default)]
    pub bishops: Vec<String>,
    #[serde(default)]
    pub knights: Vec<String>,
    #[serde(default)]
    pub pawns: Vec<String>,
    #[serde(default)]
    pub game_state: Vec<String>,
}

impl FilterSelection {
    pub fn values(&self, category: FilterCategory) -> &[String] {
        match category {
            FilterCategory::Rooks => &self.rooks,
            FilterCategory::Queens => &self.queens,
            FilterCategory::Bishops => &self.bishops,
            FilterCategory::Knights => &self.knights,
            FilterCategory::Pawns => &self.pawns,
            FilterCategory::GameState => &self.game_state,
        }
    }

    fn values_mut(&mut self, category: FilterCategory) -> &mut Vec<String> {
        match category {
            FilterCategory::Rooks => &mut self.rooks,
            FilterCategory::Queens => &mut self.queens,
            FilterCategory::Bishops => &mut self.bishops,
            FilterCategory::Knights => &mut self.knights,
            FilterCategory::Pawns => &mut self.pawns,
            FilterCategory::GameState => &mut self.game_state,
        }
    }

    pub fn set(&mut self, category: FilterCategory, values: Vec<String>) {
        *self.values_mut(category) = values;
    }

    pub fn with(mut self, category: FilterCategory, values: &[&str]) -> Self {
        self.set(category, values.iter().map(|v| v.to_string()).collect());
        self
    }

    /// Adds `value` to the category, or removes it if already selected.
    /// Returns whether the value is selected afterwards.
    pub fn toggle(&mut self, category: FilterCategory, value: &str) -> bool {
        let values = self.values_mut(category);
        if let Some(pos) = values.iter().position(|v| v == value) {
            values.remove(pos);
            false
        } else {
            values.push(value.to_string());
            true
        }
    }

    pub fn is_empty(&self) -> bool {
        FilterCategory::ALL
            .into_iter()
            .all(|category| self.values(category).is_empty())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionState {
    pub rooks: bool,
    pub queens: bool,
    pub bishops: bool,
    pub knights: bool,
    pub pawns: bool,
    pub game_state: bool,
}

impl ExpansionState {
    pub fn is_expanded(&self, category: FilterCategory) -> bool {
        match category {
            FilterCategory::Rooks => self.rooks,
            FilterCategory::Queens => self.queens,
            FilterCategory::Bishops => self.bishops,
            FilterCategory::Knights => self.knights,
            FilterCategory::Pawns => self.pawns,
            FilterCategory::GameState => self.game_state,
        }
    }

    pub fn set(&mut self, category: FilterCategory, expanded: bool) {
        let slot = match category {
            FilterCategory::Rooks => &mut self.rooks,
            FilterCategory::Queens => &mut self.queens,
            FilterCategory::Bishops => &mut self.bishops,
            FilterCategory::Knights => &mut self.knights,
            FilterCategory::Pawns => &mut self.pawns,
            FilterCategory::GameState => &mut self.game_state,
        };
        *slot = expanded;
    }

    pub fn toggle(&mut self, category: FilterCategory) -> bool {
        let expanded = !self.is_expanded(category);
        self.set(category, expanded);
        expanded
    }
}
