// src/i18n.rs
//
// Lightweight runtime i18n:
// - English strings are compiled in (assets/i18n/en.json) and always act as
//   the fallback table.
// - Other languages load from assets/i18n/<lang>.json, searched next to the
//   executable first, then in the working directory.
// - Lookup: tr("key") / tr_with("key", &[("name", ...)]) with {name} placeholders

use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::RwLock,
};

const EMBEDDED_EN: &str = include_str!("../assets/i18n/en.json");
pub const FALLBACK_LANG: &str = "en";

#[derive(Debug, Clone)]
pub struct I18n {
    pub lang: String,
    map: HashMap<String, String>,
    fallback_map: HashMap<String, String>,
}

impl I18n {
    pub fn new(lang: impl Into<String>, map: HashMap<String, String>) -> Self {
        Self {
            lang: lang.into(),
            map,
            fallback_map: embedded_fallback(),
        }
    }

    pub fn get(&self, key: &str) -> String {
        self.map
            .get(key)
            .or_else(|| self.fallback_map.get(key))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

static I18N: OnceCell<RwLock<I18n>> = OnceCell::new();

// 语言文件：扁平的 key → 文本表，值必须是字符串
#[derive(Debug, Deserialize)]
#[serde(transparent)]
struct StringTable(HashMap<String, String>);

fn parse_table(text: &str) -> serde_json::Result<HashMap<String, String>> {
    serde_json::from_str::<StringTable>(text).map(|t| t.0)
}

fn embedded_fallback() -> HashMap<String, String> {
    match parse_table(EMBEDDED_EN) {
        Ok(m) => m,
        Err(e) => {
            log::error!("embedded string table is malformed: {e}");
            HashMap::new()
        }
    }
}

fn load_json_map(path: &Path) -> Option<HashMap<String, String>> {
    let text = std::fs::read_to_string(path).ok()?;
    match parse_table(&text) {
        Ok(m) => Some(m),
        Err(e) => {
            log::warn!("ignoring {}: {e}", path.display());
            None
        }
    }
}

/// Find assets/i18n/<lang>.json by searching:
/// 1) <exe_dir>/assets/i18n/<lang>.json
/// 2) ./assets/i18n/<lang>.json  (dev working dir)
fn find_lang_file(lang: &str) -> Option<PathBuf> {
    let file = format!("{lang}.json");

    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let p = dir.join("assets").join("i18n").join(&file);
            if p.exists() {
                return Some(p);
            }
        }
    }

    let p = PathBuf::from("assets").join("i18n").join(&file);
    p.exists().then_some(p)
}

fn load_lang(lang: &str) -> HashMap<String, String> {
    if let Some(p) = find_lang_file(lang) {
        if let Some(m) = load_json_map(&p) {
            log::info!("strings loaded from {}", p.display());
            return m;
        }
    }
    if lang != FALLBACK_LANG {
        log::warn!("no strings for language '{lang}', using {FALLBACK_LANG}");
    }
    HashMap::new()
}

/// Initialize global i18n. Safe to call multiple times; later calls overwrite current lang maps.
pub fn init(lang: impl Into<String>) {
    let lang = lang.into();
    let i = I18n::new(lang.clone(), load_lang(&lang));

    if let Some(lock) = I18N.get() {
        if let Ok(mut w) = lock.write() {
            *w = i;
        }
    } else {
        let _ = I18N.set(RwLock::new(i));
    }
}

/// Get localized text by key. Before `init`, the embedded English table is
/// used. If the key is missing everywhere, returns the key itself.
pub fn tr(key: &str) -> String {
    match I18N.get().and_then(|l| l.read().ok()) {
        Some(i) => i.get(key),
        None => embedded_fallback()
            .remove(key)
            .unwrap_or_else(|| key.to_string()),
    }
}

/// Substitute `{name}` placeholders. Any placeholder not provided is kept as-is.
pub fn format_with(template: &str, args: &[(&str, String)]) -> String {
    let mut s = template.to_string();
    for (k, v) in args {
        s = s.replace(&format!("{{{k}}}"), v);
    }
    s
}

/// Get localized text and substitute `{name}` placeholders.
pub fn tr_with(key: &str, args: &[(&str, String)]) -> String {
    format_with(&tr(key), args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_table_parses_and_has_ui_keys() {
        let en = embedded_fallback();
        for key in ["app.title", "landing.cta", "viewer.loading", "error.title", "error.remediation"] {
            assert!(en.contains_key(key), "missing {key}");
        }
    }

    #[test]
    fn override_falls_back_per_key() {
        let mut map = HashMap::new();
        map.insert("viewer.loading".to_string(), "Chargement...".to_string());
        let i = I18n::new("fr", map);
        assert_eq!(i.get("viewer.loading"), "Chargement...");
        assert_eq!(i.get("viewer.credits"), "Tanmay & Irika Austin Demo");
        assert_eq!(i.get("no.such.key"), "no.such.key");
    }

    #[test]
    fn tables_must_be_flat_strings() {
        let m = parse_table(r#"{"viewer.title": "Vue"}"#).unwrap();
        assert_eq!(m["viewer.title"], "Vue");
        assert!(parse_table(r#"{"viewer": {"title": "Vue"}}"#).is_err());
        assert!(parse_table(r#"["viewer.title"]"#).is_err());
    }

    #[test]
    fn placeholders_substitute_and_unknown_ones_survive() {
        let out = format_with(
            "Please ensure {file} is in the {folder} folder {extra}",
            &[("file", "pano.jpg".into()), ("folder", "assets".into())],
        );
        assert_eq!(out, "Please ensure pano.jpg is in the assets folder {extra}");
    }
}
