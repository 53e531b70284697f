use std::{collections::HashMap, fs, path::PathBuf};

use tracing::warn;

pub const CONFIG_FILE: &str = "podvis.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub events_bind: String,
    pub reflector_bind: String,
    pub static_dir: PathBuf,
    pub index_path: PathBuf,
    pub channel_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            events_bind: "0.0.0.0:8000".into(),
            reflector_bind: "0.0.0.0:8001".into(),
            static_dir: PathBuf::from("./static"),
            index_path: PathBuf::from("./templates/index.html"),
            channel_capacity: 256,
        }
    }
}

impl Settings {
    /// Overlays a flat TOML table. Unknown keys and unusable values are
    /// skipped.
    pub fn apply_file(&mut self, raw: &str) {
        let file_cfg = match toml::from_str::<HashMap<String, toml::Value>>(raw) {
            Ok(file_cfg) => file_cfg,
            Err(error) => {
                warn!(%error, "ignoring unparsable {CONFIG_FILE}");
                return;
            }
        };
        let lookup = |key: &str| match file_cfg.get(key)? {
            toml::Value::String(v) => Some(v.clone()),
            toml::Value::Integer(v) => Some(v.to_string()),
            _ => None,
        };
        self.apply(lookup);
    }

    /// Overlays `PODVIS__*` variables as returned by `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        self.apply(|key| lookup(&format!("PODVIS__{}", key.to_ascii_uppercase())));
    }

    fn apply(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("events_bind") {
            self.events_bind = v;
        }
        if let Some(v) = lookup("reflector_bind") {
            self.reflector_bind = v;
        }
        if let Some(v) = lookup("static_dir") {
            self.static_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("index_path") {
            self.index_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("channel_capacity") {
            match v.parse::<usize>() {
                Ok(parsed) if parsed > 0 => self.channel_capacity = parsed,
                _ => warn!(value = %v, "ignoring invalid channel_capacity"),
            }
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(CONFIG_FILE) {
        settings.apply_file(&raw);
    }
    settings.apply_env(|key| std::env::var(key).ok());

    settings
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
