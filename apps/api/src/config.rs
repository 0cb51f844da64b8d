use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_LETTER_FONT: &str = "Roboto";
const DEFAULT_LETTER_FONT_SIZE_PT: f32 = 9.0;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed numbers fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// PNG used as the letter logo. `None` uses the bundled logo.
    pub logo_path: Option<PathBuf>,
    pub letter_font: String,
    pub letter_font_size_pt: f32,
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: DEFAULT_PORT,
            rust_log: "info".to_string(),
            logo_path: None,
            letter_font: DEFAULT_LETTER_FONT.to_string(),
            letter_font_size_pt: DEFAULT_LETTER_FONT_SIZE_PT,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        Ok(Config {
            port: parse_env("PORT", defaults.port)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            logo_path: optional_env("LOGO_PATH").map(PathBuf::from),
            letter_font: optional_env("LETTER_FONT").unwrap_or(defaults.letter_font),
            letter_font_size_pt: parse_env("LETTER_FONT_SIZE_PT", defaults.letter_font_size_pt)?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
        })
    }
}

/// Unset or blank counts as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
