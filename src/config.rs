use anyhow::{Context, Result};
use std::path::PathBuf;
use std::str::FromStr;
use url::Url;

pub const DEFAULT_MAX_FILE_SIZE: usize = 10_000_000;
pub const DEFAULT_MAX_FILES: usize = 10;

/// Startup configuration, read once and shared with every worker.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Directory receiving the stored images
    pub images_dir: PathBuf,
    /// Directory holding the upload form
    pub static_dir: PathBuf,
    pub allowed_origin: Url,
    /// Per file limit, in bytes
    pub max_file_size: usize,
    /// Per request limit on the multiple images route
    pub max_files: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: String::from("127.0.0.1"),
            port: 4000,
            images_dir: PathBuf::from("./images"),
            static_dir: PathBuf::from("./static"),
            allowed_origin: Url::parse("http://localhost:3000")
                .expect("default origin is a valid url"),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_files: DEFAULT_MAX_FILES,
        }
    }
}

impl Config {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Config> {
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any variable source, falling back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        Ok(Config {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_var(&lookup, "PORT")?.unwrap_or(defaults.port),
            images_dir: lookup("IMAGES_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.images_dir),
            static_dir: lookup("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            allowed_origin: parse_var(&lookup, "ALLOWED_ORIGIN")?
                .unwrap_or(defaults.allowed_origin),
            max_file_size: parse_var(&lookup, "MAX_FILE_SIZE")?
                .unwrap_or(defaults.max_file_size),
            max_files: parse_var(&lookup, "MAX_FILES")?.unwrap_or(defaults.max_files),
        })
    }

    /// The allowed origin the way browsers send it, without a trailing slash.
    pub fn cors_origin(&self) -> String {
        self.allowed_origin.origin().ascii_serialization()
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|value| {
            value
                .trim()
                .parse::<T>()
                .with_context(|| format!("invalid value for {}: {:?}", key, value))
        })
        .transpose()
}
