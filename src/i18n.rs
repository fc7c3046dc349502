//! UI strings for Pixelpad.
//!
//! Each `locales/<code>.txt` file is compiled into the binary and parsed into
//! a flat table by `init()`. `t!` resolves keys against the active table and
//! substitutes `{name}` placeholders.

use std::collections::HashMap;
use std::sync::Mutex;

type Table = HashMap<String, String>;

/// Loaded string tables plus the language the UI is showing.
struct Catalog {
    active: &'static str,
    tables: HashMap<&'static str, Table>,
}

impl Catalog {
    fn lookup(&self, key: &str) -> Option<&String> {
        self.tables
            .get(self.active)
            .and_then(|table| table.get(key))
            .or_else(|| self.tables.get(FALLBACK).and_then(|table| table.get(key)))
    }
}

static CATALOG: Mutex<Option<Catalog>> = Mutex::new(None);

const FALLBACK: &str = "en";

/// Languages shipped in `locales/`, as (code, name shown in the menu).
pub const LANGUAGES: &[(&str, &str)] = &[("en", "English"), ("es", "Español")];

/// Parse the embedded locale files. Until this runs `t!` echoes keys.
pub fn init() {
    let tables = HashMap::from([
        ("en", parse_translations(include_str!("../locales/en.txt"))),
        ("es", parse_translations(include_str!("../locales/es.txt"))),
    ]);
    if let Ok(mut guard) = CATALOG.lock() {
        *guard = Some(Catalog {
            active: FALLBACK,
            tables,
        });
    }
}

/// Switch the UI language. Codes without a table select English.
pub fn set_language(code: &str) {
    let known = LANGUAGES
        .iter()
        .map(|(c, _)| *c)
        .find(|c| *c == code)
        .unwrap_or(FALLBACK);
    if let Ok(mut guard) = CATALOG.lock()
        && let Some(catalog) = guard.as_mut()
    {
        catalog.active = known;
    }
}

pub fn current_language() -> String {
    CATALOG
        .lock()
        .ok()
        .and_then(|guard| guard.as_ref().map(|c| c.active))
        .unwrap_or(FALLBACK)
        .to_string()
}

/// Active language first, English second, the key itself last.
pub fn translate(key: &str) -> String {
    if let Ok(guard) = CATALOG.lock()
        && let Some(text) = guard.as_ref().and_then(|c| c.lookup(key))
    {
        return text.clone();
    }
    key.to_string()
}

/// First shipped language named by the locale environment variables.
pub fn detect_system_language() -> String {
    for var in &["LC_ALL", "LC_MESSAGES", "LANG", "LANGUAGE"] {
        if let Ok(val) = std::env::var(var)
            && let Some(lang) = match_system_locale(&val)
        {
            return lang;
        }
    }
    FALLBACK.to_string()
}

/// Match a locale string ("es_ES.UTF-8", "en-GB", "es") to a supported language.
fn match_system_locale(locale: &str) -> Option<String> {
    let normalized = locale.to_lowercase().replace('_', "-");
    let lang_part = normalized.split(['.', '@']).next().unwrap_or(&normalized);
    let primary = lang_part.split('-').next().unwrap_or(lang_part);

    LANGUAGES
        .iter()
        .find(|(code, _)| code.to_lowercase() == lang_part || *code == primary)
        .map(|(code, _)| code.to_string())
}

/// Parse `key=value` lines. `#` starts a comment line; blank lines are skipped.
fn parse_translations(data: &str) -> Table {
    data.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, val)| (key.trim().to_string(), val.trim().to_string()))
        .collect()
}

/// Translation macro. Usage: `t!("tool.pencil")` or `t!("history.fill", count = 12)`
#[macro_export]
macro_rules! t {
    ($key:expr) => {
        $crate::i18n::translate($key)
    };
    ($key:expr, $($name:ident = $val:expr),+ $(,)?) => {{
        let mut s = $crate::i18n::translate($key);
        $(
            s = s.replace(concat!("{", stringify!($name), "}"), &format!("{}", $val));
        )+
        s
    }};
}
