//! API key discovery.

use secrecy::{ExposeSecret, Secret};
use std::path::Path;

/// Environment variable checked before the credentials file.
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Value shipped in the sample `config.js`; never a real key.
const PLACEHOLDER_KEY: &str = "YOUR_API_KEY_HERE";
const KEY_PREFIX: &str = "sk-ant-";

/// Resolve the provider key: `env_value` first, then the credentials file.
///
/// Empty values and the placeholder count as absent, so callers only ever see
/// a key that is worth sending.
pub fn resolve_api_key(env_value: Option<String>, credentials_file: &Path) -> Option<Secret<String>> {
    env_value
        .filter(|key| is_usable(key))
        .or_else(|| read_key_file(credentials_file))
        .map(Secret::new)
}

pub fn is_configured(key: Option<&Secret<String>>) -> bool {
    key.is_some_and(|k| is_usable(k.expose_secret()))
}

fn is_usable(key: &str) -> bool {
    let key = key.trim();
    !key.is_empty() && key != PLACEHOLDER_KEY
}

fn read_key_file(path: &Path) -> Option<String> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read credentials file");
            return None;
        }
    };

    extract_key(&content).filter(|key| is_usable(key))
}

/// First quoted `sk-ant-...` literal on a line that mentions the key variable.
fn extract_key(content: &str) -> Option<String> {
    content
        .lines()
        .filter(|line| line.contains(API_KEY_ENV) && line.contains(KEY_PREFIX))
        .find_map(quoted_key)
}

fn quoted_key(line: &str) -> Option<String> {
    let (open, quote) = ['\'', '"']
        .iter()
        .filter_map(|&q| line.find(&format!("{q}{KEY_PREFIX}")).map(|i| (i, q)))
        .min_by_key(|&(i, _)| i)?;
    let start = open + 1;
    let len = line[start..].find(quote)?;
    Some(line[start..start + len].to_string())
}
