//! Seed handling: string hashing, random fallbacks and seed-list records.

use std::fs;
use std::path::Path;

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};

/// Seed driving every generator in a session.
pub type Seed = i32;

const FALLBACK_SEED_LEN: usize = 8;

/// Hashes text into a seed with `h = h * 31 + c` over UTF-16 code units,
/// wrapping like 32-bit two's-complement arithmetic. The empty string hashes to 0.
pub fn hash_seed(text: &str) -> Seed {
    text.encode_utf16()
        .fold(0i32, |h, c| h.wrapping_mul(31).wrapping_add(c as i32))
}

/// Random alphanumeric text used when no seed was supplied.
pub fn fallback_seed_text() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(FALLBACK_SEED_LEN)
        .map(char::from)
        .collect()
}

/// Turns user input into a seed.
///
/// Missing or blank input is replaced by [`fallback_seed_text`]. Text that
/// parses as a signed 32-bit integer is used as-is, anything else is hashed
/// exactly as given, surrounding whitespace included.
/// Returns the text actually used alongside the seed.
pub fn resolve_seed(input: Option<&str>) -> (String, Seed) {
    let text = match input {
        Some(text) if !text.trim().is_empty() => text.to_string(),
        _ => {
            let text = fallback_seed_text();
            tracing::info!(seed_text = %text, "no seed given, using random fallback");
            text
        }
    };

    let seed = text.parse::<Seed>().unwrap_or_else(|_| hash_seed(&text));
    (text, seed)
}

/// One entry of a static seed list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedRecord {
    pub name: String,
    pub seed: Seed,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_width: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_height: Option<usize>,
}

impl SeedRecord {
    /// Label shown in seed listings.
    pub fn label(&self) -> String {
        format!("{} (Seed: {})", self.name, self.seed)
    }
}

/// Parses a JSON array of seed records.
pub fn parse_seed_list(json: &str) -> Result<Vec<SeedRecord>> {
    Ok(serde_json::from_str(json)?)
}

/// Reads a seed list such as `seeds.json` from disk.
pub fn load_seed_list(path: &Path) -> Result<Vec<SeedRecord>> {
    let contents = fs::read_to_string(path)?;
    let records = parse_seed_list(&contents)?;
    tracing::debug!(path = %path.display(), count = records.len(), "loaded seed list");
    Ok(records)
}

/// Looks up a record by name.
pub fn find_seed<'a>(records: &'a [SeedRecord], name: &str) -> Result<&'a SeedRecord> {
    records
        .iter()
        .find(|record| record.name == name)
        .ok_or_else(|| MapError::UnknownSeed(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_known_values() {
        assert_eq!(hash_seed(""), 0);
        assert_eq!(hash_seed("a"), 97);
        assert_eq!(hash_seed("abc"), 96354);
    }

    #[test]
    fn test_hash_is_stable_and_distinguishes() {
        assert_eq!(hash_seed("abc"), hash_seed("abc"));
        assert_ne!(hash_seed("abc"), hash_seed("abd"));
    }

    #[test]
    fn test_hash_wraps_on_overflow() {
        // Long inputs overflow 32 bits many times over and must not panic.
        let long = "the quick brown fox jumps over the lazy dog".repeat(20);
        let first = hash_seed(&long);
        assert_eq!(first, hash_seed(&long));

        // "polygenelubricants" is a well-known string whose 31-hash is i32::MIN.
        assert_eq!(hash_seed("polygenelubricants"), i32::MIN);
    }

    #[test]
    fn test_resolve_seed_uses_literal_numbers() {
        assert_eq!(resolve_seed(Some("42")), ("42".to_string(), 42));
        assert_eq!(resolve_seed(Some("-7")).1, -7);
        assert_eq!(resolve_seed(Some("test")).1, hash_seed("test"));
    }

    #[test]
    fn test_resolve_seed_keeps_whitespace() {
        let (text, seed) = resolve_seed(Some(" test"));
        assert_eq!(text, " test");
        assert_eq!(seed, hash_seed(" test"));
        assert_ne!(seed, hash_seed("test"));
    }

    #[test]
    fn test_resolve_seed_falls_back_on_empty() {
        let (text, seed) = resolve_seed(Some("   "));
        assert_eq!(text.len(), FALLBACK_SEED_LEN);
        assert!(text.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(seed, text.parse::<Seed>().unwrap_or_else(|_| hash_seed(&text)));

        let (text, _) = resolve_seed(None);
        assert!(!text.is_empty());
    }

    #[test]
    fn test_parse_seed_list() {
        let json = r#"[
            {"name": "Frostlands", "seed": 12345, "mapWidth": 320, "mapHeight": 240},
            {"name": "Archipelago", "seed": -99}
        ]"#;
        let records = parse_seed_list(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].map_width, Some(320));
        assert_eq!(records[1].map_height, None);
        assert_eq!(records[1].label(), "Archipelago (Seed: -99)");

        assert_eq!(find_seed(&records, "Frostlands").unwrap().seed, 12345);
        assert!(matches!(
            find_seed(&records, "Nowhere"),
            Err(MapError::UnknownSeed(_))
        ));
    }
}
