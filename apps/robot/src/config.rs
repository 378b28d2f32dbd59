use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use client_core::DEFAULT_API_URL;
use serde::Deserialize;
use translator::{
    activation::DEFAULT_THRESHOLD, AxisBinding, ControlMap, TactileBinding, Threshold,
};

pub const DEFAULT_CONFIG_FILE: &str = "crowdplay.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub threshold: f64,
    pub injector: String,
    pub dry_run: bool,
    /// Empty tactile and joystick bindings mean the built-in tetris map.
    pub tactile: Vec<TactileBinding>,
    pub joystick: Vec<AxisBinding>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            username: None,
            password: None,
            threshold: DEFAULT_THRESHOLD,
            injector: "xdotool".into(),
            dry_run: false,
            tactile: Vec::new(),
            joystick: Vec::new(),
        }
    }
}

impl Settings {
    pub fn control_map(&self) -> Result<ControlMap> {
        if self.tactile.is_empty() && self.joystick.is_empty() {
            return Ok(ControlMap::tetris());
        }
        ControlMap::from_bindings(&self.tactile, &self.joystick).context("invalid control bindings")
    }

    pub fn threshold(&self) -> Result<Threshold> {
        Threshold::new(self.threshold).context("invalid threshold setting")
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub api_url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub threshold: Option<f64>,
    pub injector: Option<String>,
    pub dry_run: Option<bool>,
    #[serde(default)]
    pub tactile: Vec<TactileBinding>,
    #[serde(default)]
    pub joystick: Vec<AxisBinding>,
}

/// Defaults, then the config file, then `APP__*` environment variables.
///
/// An explicit `path` must exist; the default file is optional.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let mut settings = Settings::default();

    let (path, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };
    if let Some(file_cfg) = read_config_file(&path, required)? {
        apply_file(&mut settings, file_cfg);
    }

    apply_env(&mut settings, |key| std::env::var(key).ok())?;
    Ok(settings)
}

fn read_config_file(path: &Path, required: bool) -> Result<Option<FileConfig>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound && !required => return Ok(None),
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read {}", path.display()))
        }
    };
    let file_cfg = toml::from_str(&raw)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(Some(file_cfg))
}

pub fn apply_file(settings: &mut Settings, file_cfg: FileConfig) {
    if let Some(v) = file_cfg.api_url {
        settings.api_url = v;
    }
    if let Some(v) = file_cfg.username {
        settings.username = Some(v);
    }
    if let Some(v) = file_cfg.password {
        settings.password = Some(v);
    }
    if let Some(v) = file_cfg.threshold {
        settings.threshold = v;
    }
    if let Some(v) = file_cfg.injector {
        settings.injector = v;
    }
    if let Some(v) = file_cfg.dry_run {
        settings.dry_run = v;
    }
    if !file_cfg.tactile.is_empty() || !file_cfg.joystick.is_empty() {
        settings.tactile = file_cfg.tactile;
        settings.joystick = file_cfg.joystick;
    }
}

pub fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) -> Result<()> {
    if let Some(v) = var("APP__API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = var("APP__USERNAME") {
        settings.username = Some(v);
    }
    if let Some(v) = var("APP__PASSWORD") {
        settings.password = Some(v);
    }
    if let Some(v) = var("APP__THRESHOLD") {
        settings.threshold = v
            .trim()
            .parse()
            .with_context(|| format!("APP__THRESHOLD is not a number: {v}"))?;
    }
    if let Some(v) = var("APP__INJECTOR") {
        settings.injector = v;
    }
    if let Some(v) = var("APP__DRY_RUN") {
        settings.dry_run = matches!(v.trim(), "1" | "true" | "yes");
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
