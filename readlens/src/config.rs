use serde::Deserialize;
use std::env;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub ocr: OcrConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on request body size. Base64-encoded images are roughly
    /// a third larger than the raw file, so this must leave headroom.
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    /// Directory holding Tesseract traineddata files. `None` uses the
    /// system default (TESSDATA_PREFIX or the build-time path).
    pub data_path: Option<String>,
    pub timeout_secs: u64,
    pub min_image_dimension: u32,
    pub max_image_dimension: u32,
    /// Language sets to warm in the engine cache at startup.
    pub preload_languages: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("PORT", 8000),
                max_body_bytes: parse_env_or("MAX_BODY_BYTES", 20 * 1024 * 1024),
            },
            ocr: OcrConfig {
                data_path: env::var("OCR_DATA_PATH").ok(),
                timeout_secs: parse_env_or("OCR_TIMEOUT", 60),
                min_image_dimension: parse_env_or("OCR_MIN_DIMENSION", 1),
                max_image_dimension: parse_env_or("OCR_MAX_DIMENSION", 8192),
                preload_languages: env::var("PRELOAD_LANGUAGES")
                    .map(|langs| {
                        langs
                            .split(',')
                            .map(|s| s.trim().to_string())
                            .filter(|s| !s.is_empty())
                            .collect()
                    })
                    .unwrap_or_default(),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}
