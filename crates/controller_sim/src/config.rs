use std::fs;

use serde::Deserialize;
use shared::protocol::{ProtocolRevision, ProtocolTable};
use tracing::warn;

const SETTINGS_FILE: &str = "controller.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub bind_addr: String,
    pub protocol: ProtocolTable,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".into(),
            protocol: ProtocolRevision::Current.table(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct FileSettings {
    bind_addr: Option<String>,
    protocol: Option<ProtocolSetting>,
}

// `protocol = "legacy"` or a `[protocol]` table laid over the current codes.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProtocolSetting {
    Revision(String),
    Table(ProtocolTable),
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(SETTINGS_FILE) {
        apply_file(&mut settings, &raw);
    }
    apply_env(&mut settings, |key| std::env::var(key).ok());

    settings
}

fn apply_file(settings: &mut Settings, raw: &str) {
    let file_cfg: FileSettings = match toml::from_str(raw) {
        Ok(file_cfg) => file_cfg,
        Err(err) => {
            warn!(%err, file = SETTINGS_FILE, "ignoring unreadable settings file");
            return;
        }
    };

    if let Some(v) = file_cfg.bind_addr {
        settings.bind_addr = v;
    }
    match file_cfg.protocol {
        Some(ProtocolSetting::Revision(v)) => set_revision(settings, &v),
        Some(ProtocolSetting::Table(table)) => set_table(settings, table),
        None => {}
    }
}

fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("CONTROLLER_BIND") {
        settings.bind_addr = v;
    }
    if let Some(v) = var("APP__BIND_ADDR") {
        settings.bind_addr = v;
    }

    if let Some(v) = var("APP__PROTOCOL") {
        set_revision(settings, &v);
    }
}

fn set_revision(settings: &mut Settings, raw: &str) {
    match raw.parse::<ProtocolRevision>() {
        Ok(revision) => settings.protocol = revision.table(),
        Err(err) => warn!(%err, "keeping previous protocol table"),
    }
}

fn set_table(settings: &mut Settings, table: ProtocolTable) {
    match table.validate() {
        Ok(()) => settings.protocol = table,
        Err(err) => warn!(%err, ?table, "keeping previous protocol table"),
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
