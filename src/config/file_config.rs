use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub data_path: Option<String>,
    pub port: Option<u16>,
    pub metrics_port: Option<u16>,
    pub logging_level: Option<String>,
    pub content_cache_age_sec: Option<usize>,
    pub frontend_dir_path: Option<String>,
    /// Column layout preset: "en" or "pt-br"
    pub schema: Option<String>,
    /// Worksheet to read when the data source is a workbook
    pub sheet_name: Option<String>,

    pub columns: Option<ColumnsConfig>,
}

/// Per-column overrides applied on top of the schema preset.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct ColumnsConfig {
    pub date: Option<String>,
    pub id: Option<String>,
    pub action: Option<String>,
    pub network: Option<String>,
    pub topic: Option<String>,
    pub link: Option<String>,
    pub vote_count: Option<String>,
    pub comment_action: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
