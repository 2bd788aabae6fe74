//! Run configuration.
//!
//! The process environment and CLI flags are read once here and handed to each
//! component explicitly; nothing below `main` looks at the environment.
use crate::cli::RootArgs;
use crate::lm::{DEFAULT_API_BASE, DEFAULT_MODEL};
use crate::paths::JokePaths;
use crate::types::CATEGORIES;
use anyhow::{anyhow, Result};

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const API_BASE_ENV: &str = "GEMINI_API_BASE";
pub const MODEL_ENV: &str = "GEMINI_MODEL";

/// Duplicate detection looks this many entries back.
pub const DUPLICATE_WINDOW: usize = 10;

/// Everything a single run needs.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
    pub paths: JokePaths,
    pub history_cap: usize,
    pub categories: Vec<&'static str>,
}

impl Config {
    /// Build a config from CLI args plus a variable lookup (normally
    /// `std::env::var`).
    pub fn from_args<F>(args: &RootArgs, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_ENV)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| anyhow!("{API_KEY_ENV} is not set"))?;
        if args.history_cap == 0 {
            return Err(anyhow!("--history-cap must be at least 1"));
        }
        let api_base = non_empty(lookup(API_BASE_ENV)).unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let model = non_empty(lookup(MODEL_ENV)).unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let mut paths = JokePaths::new(args.root.clone());
        if let Some(document) = &args.document {
            paths = paths.with_document(document.clone());
        }

        Ok(Self {
            api_key,
            api_base,
            model,
            paths,
            history_cap: args.history_cap,
            categories: CATEGORIES.to_vec(),
        })
    }

    /// Build a config from CLI args and the process environment.
    pub fn from_env(args: &RootArgs) -> Result<Self> {
        Self::from_args(args, |name| std::env::var(name).ok())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: BTreeMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    fn args(argv: &[&str]) -> RootArgs {
        let mut full = vec!["devjoke"];
        full.extend_from_slice(argv);
        RootArgs::try_parse_from(full).expect("parse args")
    }

    #[test]
    fn missing_credential_is_rejected() {
        let err = Config::from_args(&args(&[]), lookup_from(&[])).expect_err("no key");
        assert!(err.to_string().contains(API_KEY_ENV));

        let blank = Config::from_args(&args(&[]), lookup_from(&[(API_KEY_ENV, "   ")]));
        assert!(blank.is_err());
    }

    #[test]
    fn defaults_fill_optional_settings() {
        let config = Config::from_args(&args(&[]), lookup_from(&[(API_KEY_ENV, "secret")]))
            .expect("build config");
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.history_cap, 10);
        assert_eq!(config.categories, CATEGORIES.to_vec());
        assert_eq!(config.paths.document_path(), PathBuf::from("./README.md"));
    }

    #[test]
    fn overrides_are_honored() {
        let config = Config::from_args(
            &args(&["--root", "/srv", "--document", "JOKES.md", "--history-cap", "50"]),
            lookup_from(&[
                (API_KEY_ENV, "secret"),
                (API_BASE_ENV, "http://127.0.0.1:8080"),
                (MODEL_ENV, "custom-model"),
            ]),
        )
        .expect("build config");
        assert_eq!(config.api_base, "http://127.0.0.1:8080");
        assert_eq!(config.model, "custom-model");
        assert_eq!(config.history_cap, 50);
        assert_eq!(config.paths.document_path(), PathBuf::from("/srv/JOKES.md"));
    }

    #[test]
    fn zero_history_cap_is_rejected() {
        let result = Config::from_args(
            &args(&["--history-cap", "0"]),
            lookup_from(&[(API_KEY_ENV, "secret")]),
        );
        assert!(result.is_err());
    }
}
