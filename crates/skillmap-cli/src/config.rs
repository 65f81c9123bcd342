use anyhow::Context;
use serde::Deserialize;
use skillmap_export::{PdfLayoutConfig, DEFAULT_SHEET_NAME};
use skillmap_logging::LogFormat;
use skillmap_types::Taxonomy;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Default config template created when no config exists
const DEFAULT_CONFIG: &str = r#"
[database]
path = "skillmap.db"

[logging]
level = "info"  # trace, debug, info, warn, error
format = "pretty"  # pretty or json

[export]
output_dir = "reports"
font_path = ""  # TrueType font with CJK glyphs; empty falls back to Helvetica
sheet_name = "Skill Matrix"

[pdf]
margin_in = 0.5

# Category taxonomy. Stored skill levels are indexed in this order, so do not
# reorder groups or categories once workers exist. Leave out to use the
# built-in warehouse taxonomy.
#
# [[taxonomy]]
# name = "Induction"
# categories = ["Unloader", "Every Labeler", "Auto Labeler"]
"#;

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExportConfig {
    pub output_dir: String,
    #[serde(default)]
    pub font_path: Option<String>,
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,
}

fn default_sheet_name() -> String {
    DEFAULT_SHEET_NAME.to_string()
}

impl ExportConfig {
    /// Configured font, ignoring an empty setting
    pub fn font_path(&self) -> Option<PathBuf> {
        self.font_path
            .as_deref()
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub export: ExportConfig,
    #[serde(default)]
    pub pdf: PdfLayoutConfig,
    #[serde(default)]
    pub taxonomy: Option<Taxonomy>,
}

impl Config {
    /// Get the global config path: ~/.skillmap/skillmap.toml
    fn global_config_path() -> anyhow::Result<PathBuf> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".skillmap").join("skillmap.toml"))
    }

    /// Ensure global config directory and file exist, creating defaults if needed
    fn ensure_global_config() -> anyhow::Result<PathBuf> {
        let config_path = Self::global_config_path()?;
        if let Some(config_dir) = config_path.parent() {
            if !config_dir.exists() {
                fs::create_dir_all(config_dir)
                    .with_context(|| format!("Failed to create {}", config_dir.display()))?;
                eprintln!("Created config directory: {}", config_dir.display());
            }
        }

        if !config_path.exists() {
            fs::write(&config_path, DEFAULT_CONFIG.trim())?;
            eprintln!("Created default config: {}", config_path.display());
        }

        Ok(config_path)
    }

    /// Load configuration with layered approach:
    /// 1. Global config: ~/.skillmap/skillmap.toml (auto-created if missing)
    /// 2. Local override: ./skillmap.toml (optional)
    /// 3. Environment variables: SKILLMAP__DATABASE__PATH and friends
    /// 4. Shorthands SKILLMAP_DB and SKILLMAP_OUTPUT_DIR (highest priority)
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let global_config_path = Self::ensure_global_config()?;

        let mut config_builder = config::Config::builder()
            .add_source(config::File::from(global_config_path))
            .add_source(config::File::with_name("skillmap").required(false))
            .add_source(config::Environment::with_prefix("SKILLMAP").separator("__"));

        if let Ok(path) = env::var("SKILLMAP_DB") {
            config_builder = config_builder.set_override("database.path", path)?;
        }

        if let Ok(dir) = env::var("SKILLMAP_OUTPUT_DIR") {
            config_builder = config_builder.set_override("export.output_dir", dir)?;
        }

        let config: Self = config_builder
            .build()?
            .try_deserialize()
            .context("Invalid skillmap configuration")?;
        Ok(config)
    }

    /// The configured taxonomy, or the built-in one
    pub fn taxonomy(&self) -> Taxonomy {
        self.taxonomy.clone().unwrap_or_default()
    }
}

#[cfg(test)]
impl Config {
    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(contents, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        Ok(config)
    }
}
