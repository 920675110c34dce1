use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::{encode::CsvEncoder, matrix::Normalizer, matrix::Padding};

/// Env var naming an optional YAML config file.
pub const CONFIG_ENV: &str = "SHEETKIT_CONFIG";
pub const PADDING_ENV: &str = "SHEETKIT_PADDING";
pub const INTERN_ENV: &str = "SHEETKIT_INTERN";
pub const DELIMITER_ENV: &str = "SHEETKIT_DELIMITER";

/// Settings for the file pipeline.
///
/// Resolution order: defaults, then the YAML file named by
/// `SHEETKIT_CONFIG`, then the individual `SHEETKIT_*` variables. The CLI
/// applies its own arguments last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How jagged input rows are padded.
    pub padding: Padding,
    /// Write a code matrix + code table instead of the plain values.
    pub intern: bool,
    pub delimiter: char,
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            padding: Padding::default(),
            intern: true,
            delimiter: crate::encode::DEFAULT_DELIMITER,
            output_dir: PathBuf::from("out"),
        }
    }
}

impl Config {
    /// Defaults + optional YAML file + env overrides.
    pub fn load() -> Result<Self> {
        let mut config = match env::var(CONFIG_ENV) {
            Ok(path) => Self::from_yaml_file(&path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {:?}", path))?;
        serde_yaml::from_str(&text).with_context(|| format!("parsing config file {:?}", path))
    }

    /// Apply `SHEETKIT_*` overrides, looking each key up through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(PADDING_ENV) {
            self.padding = raw.parse::<Padding>().with_context(|| format!("invalid {}", PADDING_ENV))?;
        }
        if let Some(raw) = lookup(INTERN_ENV) {
            self.intern = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                other => bail!("invalid {}: {:?}", INTERN_ENV, other),
            };
        }
        if let Some(raw) = lookup(DELIMITER_ENV) {
            let mut chars = raw.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c != '\n' => self.delimiter = c,
                _ => bail!("invalid {}: {:?} (expected one character)", DELIMITER_ENV, raw),
            }
        }
        Ok(())
    }

    pub fn normalizer(&self) -> Normalizer {
        Normalizer::new(self.padding)
    }

    pub fn encoder(&self) -> CsvEncoder {
        CsvEncoder::new().with_delimiter(self.delimiter)
    }
}
