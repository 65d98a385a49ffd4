mod file_config;

pub use file_config::{ColumnsConfig, FileConfig};

use crate::dataset::{ColumnSchema, SchemaPreset};
use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub data_path: Option<PathBuf>,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub content_cache_age_sec: usize,
    pub frontend_dir_path: Option<String>,
    pub schema_preset: SchemaPreset,
    pub sheet_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub content_cache_age_sec: usize,
    pub frontend_dir_path: Option<String>,
    pub schema: ColumnSchema,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let data_path = file
            .data_path
            .map(PathBuf::from)
            .or_else(|| cli.data_path.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("data_path must be specified on the command line or in config file")
            })?;

        if !data_path.exists() {
            bail!("Data source does not exist: {:?}", data_path);
        }
        if !data_path.is_file() {
            bail!("Data source is not a file: {:?}", data_path);
        }

        let port = file.port.unwrap_or(cli.port);
        let metrics_port = file.metrics_port.unwrap_or(cli.metrics_port);

        let logging_level = match file.logging_level {
            Some(name) => match parse_logging_level(&name) {
                Some(level) => level,
                None => bail!("Unknown logging level \"{}\"", name),
            },
            None => cli.logging_level.clone(),
        };

        let content_cache_age_sec = file
            .content_cache_age_sec
            .unwrap_or(cli.content_cache_age_sec);
        let frontend_dir_path = file
            .frontend_dir_path
            .or_else(|| cli.frontend_dir_path.clone());

        let preset = match file.schema {
            Some(name) => match parse_schema_preset(&name) {
                Some(preset) => preset,
                None => bail!("Unknown schema preset \"{}\"", name),
            },
            None => cli.schema_preset,
        };
        let mut schema = apply_column_overrides(
            ColumnSchema::from_preset(preset),
            file.columns.unwrap_or_default(),
        );
        if let Some(sheet_name) = file.sheet_name.or_else(|| cli.sheet_name.clone()) {
            schema.sheet_name = sheet_name;
        }

        Ok(Self {
            data_path,
            port,
            metrics_port,
            logging_level,
            content_cache_age_sec,
            frontend_dir_path,
            schema,
        })
    }
}

fn apply_column_overrides(schema: ColumnSchema, columns: ColumnsConfig) -> ColumnSchema {
    ColumnSchema {
        sheet_name: schema.sheet_name,
        date: columns.date.unwrap_or(schema.date),
        id: columns.id.unwrap_or(schema.id),
        action: columns.action.unwrap_or(schema.action),
        network: columns.network.unwrap_or(schema.network),
        topic: columns.topic.unwrap_or(schema.topic),
        link: columns.link.unwrap_or(schema.link),
        vote_count: columns.vote_count.unwrap_or(schema.vote_count),
        comment_action: columns.comment_action.unwrap_or(schema.comment_action),
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}

fn parse_schema_preset(s: &str) -> Option<SchemaPreset> {
    SchemaPreset::from_str(s, true).ok()
}
