use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/marcena.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding `catalog.json` and `projects.json`.
    pub data_dir: String,
    /// Log level for the binary and its crates.
    pub level: String,
    /// Gemini API key. Idea commands refuse to run without one.
    pub api_key: String,
    pub base_url: String,
    pub ideas_model: String,
    pub image_model: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            level: "info".to_string(),
            api_key: String::new(),
            base_url: assistant::DEFAULT_BASE_URL.to_string(),
            ideas_model: assistant::IDEAS_MODEL.to_string(),
            image_model: assistant::IMAGE_MODEL.to_string(),
        }
    }
}

impl Settings {
    pub fn catalog_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join("catalog.json")
    }

    pub fn projects_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join("projects.json")
    }
}

pub fn load(config_path: Option<&str>, data_dir: Option<String>) -> Result<Settings> {
    let config_path = config_path.unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("MARCENA"));
    let mut settings: Settings = builder.build()?.try_deserialize()?;

    if let Some(data_dir) = data_dir {
        settings.data_dir = data_dir;
    }

    Ok(settings)
}
