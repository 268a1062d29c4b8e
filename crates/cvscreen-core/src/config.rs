//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge built-in defaults + `config.toml` + `config.<env>.toml`
//! + `APP_*` env vars (`__` separates nested keys). Provides helpers to expand
//! `~` and `${VAR}` and to resolve relative paths against a known base directory.
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const DEFAULT_THRESHOLD: i32 = 70;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// Pretrained BERT-family model loaded from `model_dir`.
    #[default]
    Bert,
    /// Deterministic feature-hashing embedder; needs no weights.
    Hash,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingConfig {
    pub backend: EmbeddingBackend,
    pub model_dir: Option<PathBuf>,
    pub max_len: usize,
    pub normalize: bool,
    pub hash_dim: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self { backend: EmbeddingBackend::Bert, model_dir: None, max_len: 512, normalize: true, hash_dim: 1024 }
    }
}

/// Everything a screening run needs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScreenConfig {
    pub job_path: PathBuf,
    pub candidates_dir: PathBuf,
    pub destination_dir: PathBuf,
    /// Inclusive minimum score for selection.
    pub threshold: i32,
    pub embedding: EmbeddingConfig,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            job_path: PathBuf::from("Job.txt"),
            candidates_dir: PathBuf::from("CVs"),
            destination_dir: PathBuf::from("Selected applicants"),
            threshold: DEFAULT_THRESHOLD,
            embedding: EmbeddingConfig::default(),
        }
    }
}

impl ScreenConfig {
    pub fn validate(&self) -> Result<()> {
        if !(-100..=100).contains(&self.threshold) {
            return Err(Error::InvalidConfig(format!("threshold {} outside [-100, 100]", self.threshold)));
        }
        if self.embedding.max_len == 0 {
            return Err(Error::InvalidConfig("embedding.max_len must be > 0".into()));
        }
        if self.embedding.hash_dim == 0 {
            return Err(Error::InvalidConfig("embedding.hash_dim must be > 0".into()));
        }
        Ok(())
    }

    fn resolve_paths(mut self, base: &Path) -> Self {
        self.job_path = resolve_with_base(base, self.job_path.to_string_lossy());
        self.candidates_dir = resolve_with_base(base, self.candidates_dir.to_string_lossy());
        self.destination_dir = resolve_with_base(base, self.destination_dir.to_string_lossy());
        self.embedding.model_dir = self
            .embedding
            .model_dir
            .map(|p| resolve_with_base(base, p.to_string_lossy()));
        self
    }
}

pub struct Config {
    figment: Figment,
    base_dir: PathBuf,
}

impl Config {
    /// Load from the current working directory.
    pub fn load() -> Result<Self> {
        let cwd = env::current_dir().map_err(|e| Error::io(".", e))?;
        Self::load_in(&cwd)
    }

    /// Load `config.toml` and the `RUST_ENV` overlay from `base_dir`.
    pub fn load_in(base_dir: &Path) -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::from(Serialized::defaults(ScreenConfig::default()))
            .merge(Toml::file(base_dir.join("config.toml")));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file(base_dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(base_dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(base_dir.join("config.test.toml"))),
            other => tracing::debug!("no config overlay for RUST_ENV={other}"),
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        Ok(Self { figment, base_dir: base_dir.to_path_buf() })
    }

    /// Build from an explicit figment; defaults are merged underneath it.
    pub fn from_figment(figment: Figment, base_dir: &Path) -> Self {
        let figment = Figment::from(Serialized::defaults(ScreenConfig::default())).merge(figment);
        Self { figment, base_dir: base_dir.to_path_buf() }
    }

    pub fn base_dir(&self) -> &Path { &self.base_dir }

    pub fn get<T>(&self, key: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| Error::InvalidConfig(format!("Failed to get '{}': {}", key, e)))
    }

    /// Typed screening settings with paths resolved against the base directory.
    pub fn screening(&self) -> Result<ScreenConfig> {
        let config: ScreenConfig = self
            .figment
            .extract()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        let config = config.resolve_paths(&self.base_dir);
        config.validate()?;
        Ok(config)
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
