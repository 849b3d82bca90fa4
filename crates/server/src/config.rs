use std::{collections::HashMap, fs, path::Path, str::FromStr, time::Duration};

use anyhow::Context;
use tracing::warn;

use crate::word_source::WordSourcePolicy;

const DEFAULT_FAILURE_RATE: f64 = 0.15;

#[derive(Debug, Clone)]
pub struct Settings {
    pub server_bind: String,
    pub log_filter: String,
    pub min_delay_ms: u64,
    pub delay_spread_ms: u64,
    pub failure_rate: f64,
    pub random_seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:3000".into(),
            log_filter: "info".into(),
            min_delay_ms: 500,
            delay_spread_ms: 1000,
            failure_rate: DEFAULT_FAILURE_RATE,
            random_seed: None,
        }
    }
}

impl Settings {
    pub fn word_source_policy(&self) -> WordSourcePolicy {
        WordSourcePolicy {
            min_delay: Duration::from_millis(self.min_delay_ms),
            delay_spread_ms: self.delay_spread_ms,
            failure_rate: probability(self.failure_rate),
        }
    }
}

/// A setting that was present but could not be applied. Settings load before
/// the log subscriber exists, so problems are collected and reported once
/// logging is up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsIssue {
    pub key: String,
    pub raw: String,
    pub reason: String,
}

impl SettingsIssue {
    fn new(key: &str, raw: &str, reason: impl ToString) -> Self {
        Self {
            key: key.to_string(),
            raw: raw.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub fn load_settings() -> (Settings, Vec<SettingsIssue>) {
    let mut settings = Settings::default();
    let mut issues = Vec::new();

    match read_settings_file(Path::new("server.toml")) {
        Ok(Some(file_cfg)) => apply_file_overrides(&mut settings, &file_cfg, &mut issues),
        Ok(None) => {}
        Err(error) => issues.push(SettingsIssue::new(
            "server.toml",
            "",
            format!("{error:#}; file ignored"),
        )),
    }

    apply_env_overrides(&mut settings, |name| std::env::var(name).ok(), &mut issues);
    settings.failure_rate = probability(settings.failure_rate);
    (settings, issues)
}

pub fn report_issues(issues: &[SettingsIssue]) {
    for issue in issues {
        warn!(
            key = %issue.key,
            raw = %issue.raw,
            reason = %issue.reason,
            "ignoring invalid setting"
        );
    }
}

/// Clamps into [0, 1]; non-finite rates fall back to the default.
fn probability(rate: f64) -> f64 {
    if rate.is_finite() {
        rate.clamp(0.0, 1.0)
    } else {
        DEFAULT_FAILURE_RATE
    }
}

fn read_settings_file(path: &Path) -> anyhow::Result<Option<HashMap<String, String>>> {
    if !path.exists() {
        return Ok(None);
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
    let table = toml::from_str::<HashMap<String, String>>(&raw)
        .with_context(|| format!("settings file '{}' is not a flat string table", path.display()))?;
    Ok(Some(table))
}

fn apply_file_overrides(
    settings: &mut Settings,
    file_cfg: &HashMap<String, String>,
    issues: &mut Vec<SettingsIssue>,
) {
    if let Some(v) = file_cfg.get("bind_addr") {
        settings.server_bind = v.clone();
    }
    if let Some(v) = file_cfg.get("log_filter") {
        settings.log_filter = v.clone();
    }
    if let Some(v) = file_cfg.get("min_delay_ms") {
        set_parsed(&mut settings.min_delay_ms, "min_delay_ms", v, issues);
    }
    if let Some(v) = file_cfg.get("delay_spread_ms") {
        set_parsed(&mut settings.delay_spread_ms, "delay_spread_ms", v, issues);
    }
    if let Some(v) = file_cfg.get("failure_rate") {
        set_failure_rate(&mut settings.failure_rate, "failure_rate", v, issues);
    }
    if let Some(v) = file_cfg.get("random_seed") {
        set_parsed_option(&mut settings.random_seed, "random_seed", v, issues);
    }
}

fn apply_env_overrides(
    settings: &mut Settings,
    env: impl Fn(&str) -> Option<String>,
    issues: &mut Vec<SettingsIssue>,
) {
    if let Some(v) = env("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = env("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = env("APP__LOG_FILTER") {
        settings.log_filter = v;
    }

    if let Some(v) = env("APP__MIN_DELAY_MS") {
        set_parsed(&mut settings.min_delay_ms, "APP__MIN_DELAY_MS", &v, issues);
    }
    if let Some(v) = env("APP__DELAY_SPREAD_MS") {
        set_parsed(&mut settings.delay_spread_ms, "APP__DELAY_SPREAD_MS", &v, issues);
    }
    if let Some(v) = env("APP__FAILURE_RATE") {
        set_failure_rate(&mut settings.failure_rate, "APP__FAILURE_RATE", &v, issues);
    }
    if let Some(v) = env("APP__RANDOM_SEED") {
        set_parsed_option(&mut settings.random_seed, "APP__RANDOM_SEED", &v, issues);
    }
}

fn set_parsed<T: FromStr>(slot: &mut T, key: &str, raw: &str, issues: &mut Vec<SettingsIssue>)
where
    T::Err: std::fmt::Display,
{
    match raw.trim().parse::<T>() {
        Ok(parsed) => *slot = parsed,
        Err(error) => issues.push(SettingsIssue::new(key, raw, error)),
    }
}

fn set_parsed_option<T: FromStr>(
    slot: &mut Option<T>,
    key: &str,
    raw: &str,
    issues: &mut Vec<SettingsIssue>,
) where
    T::Err: std::fmt::Display,
{
    if raw.trim().is_empty() {
        *slot = None;
        return;
    }
    match raw.trim().parse::<T>() {
        Ok(parsed) => *slot = Some(parsed),
        Err(error) => issues.push(SettingsIssue::new(key, raw, error)),
    }
}

fn set_failure_rate(slot: &mut f64, key: &str, raw: &str, issues: &mut Vec<SettingsIssue>) {
    let mut parsed = *slot;
    set_parsed(&mut parsed, key, raw, issues);
    if parsed.is_finite() {
        *slot = parsed;
    } else {
        issues.push(SettingsIssue::new(key, raw, "failure rate must be a finite number"));
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
