use std::{
    collections::HashMap,
    fs, io,
    path::Path,
};

use anyhow::{Context, Result};
use shared::domain::Backend;
use tracing::warn;
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "explorer.toml";

/// Base URLs of every remote endpoint the explorer talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub initial_base_url: String,
    pub image_base_url: String,
    pub search_base_url: String,
    pub filter_base_url: String,
    pub rdf_recommendation_base_url: String,
    pub ml_recommendation_base_url: String,
    pub filter_game_state_rdf_base_url: String,
    pub filter_game_state_ml_base_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            initial_base_url: "http://localhost:5000/initial_images".into(),
            image_base_url: "http://localhost:5000/images/".into(),
            search_base_url: "http://localhost:5000/search?query=".into(),
            filter_base_url: "http://localhost:5000/filter".into(),
            rdf_recommendation_base_url: "http://localhost:5000/recommendations/rdf".into(),
            ml_recommendation_base_url: "http://localhost:5001/recommendations/ml".into(),
            filter_game_state_rdf_base_url: "http://localhost:5000/filter/game_state/rdf".into(),
            filter_game_state_ml_base_url: "http://localhost:5001/filter/game_state/ml".into(),
        }
    }
}

impl Settings {
    pub const KEYS: [&'static str; 8] = [
        "initial_base_url",
        "image_base_url",
        "search_base_url",
        "filter_base_url",
        "rdf_recommendation_base_url",
        "ml_recommendation_base_url",
        "filter_game_state_rdf_base_url",
        "filter_game_state_ml_base_url",
    ];

    pub fn get(&self, key: &str) -> Option<&str> {
        let value = match key {
            "initial_base_url" => &self.initial_base_url,
            "image_base_url" => &self.image_base_url,
            "search_base_url" => &self.search_base_url,
            "filter_base_url" => &self.filter_base_url,
            "rdf_recommendation_base_url" => &self.rdf_recommendation_base_url,
            "ml_recommendation_base_url" => &self.ml_recommendation_base_url,
            "filter_game_state_rdf_base_url" => &self.filter_game_state_rdf_base_url,
            "filter_game_state_ml_base_url" => &self.filter_game_state_ml_base_url,
            _ => return None,
        };
        Some(value)
    }

    fn field_mut(&mut self, key: &str) -> Option<&mut String> {
        let value = match key {
            "initial_base_url" => &mut self.initial_base_url,
            "image_base_url" => &mut self.image_base_url,
            "search_base_url" => &mut self.search_base_url,
            "filter_base_url" => &mut self.filter_base_url,
            "rdf_recommendation_base_url" => &mut self.rdf_recommendation_base_url,
            "ml_recommendation_base_url" => &mut self.ml_recommendation_base_url,
            "filter_game_state_rdf_base_url" => &mut self.filter_game_state_rdf_base_url,
            "filter_game_state_ml_base_url" => &mut self.filter_game_state_ml_base_url,
            _ => return None,
        };
        Some(value)
    }

    pub fn recommendation_url(&self, backend: Backend) -> &str {
        match backend {
            Backend::Rdf => &self.rdf_recommendation_base_url,
            Backend::Ml => &self.ml_recommendation_base_url,
        }
    }

    pub fn game_state_filter_url(&self, backend: Backend) -> &str {
        match backend {
            Backend::Rdf => &self.filter_game_state_rdf_base_url,
            Backend::Ml => &self.filter_game_state_ml_base_url,
        }
    }

    /// Overlays values from a flat `key = "value"` TOML document.
    pub fn apply_file(&mut self, raw: &str) -> Result<()> {
        let file_cfg: HashMap<String, String> =
            toml::from_str(raw).context("config file is not a flat table of strings")?;
        for (key, value) in file_cfg {
            match self.field_mut(&key) {
                Some(slot) => *slot = value,
                None => warn!(key = %key, "ignoring unknown config key"),
            }
        }
        Ok(())
    }

    /// Overlays environment variables. For each key both `INITIAL_BASE_URL`
    /// and `APP__INITIAL_BASE_URL` forms are read; the prefixed one wins.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        for key in Self::KEYS {
            let upper = key.to_ascii_uppercase();
            let prefixed = format!("APP__{upper}");
            let value = lookup(&prefixed).or_else(|| lookup(&upper));
            if let (Some(value), Some(slot)) = (value, self.field_mut(key)) {
                *slot = value;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        for key in Self::KEYS {
            let value = self.get(key).unwrap_or_default();
            Url::parse(value).with_context(|| format!("invalid URL for {key}: '{value}'"))?;
        }
        Ok(())
    }
}

/// Defaults, then the config file, then the environment.
///
/// A missing default config file is fine; an explicitly requested one must
/// exist.
pub fn load_settings(config_path: Option<&Path>) -> Result<Settings> {
    let mut settings = Settings::default();
    let path = config_path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));

    match fs::read_to_string(path) {
        Ok(raw) => settings
            .apply_file(&raw)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))?,
        Err(err) if config_path.is_none() && err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()))
        }
    }

    settings.apply_env(|key| std::env::var(key).ok());
    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
