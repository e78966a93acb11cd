//! Claim persistence: user-marked points stored per seed.
//!
//! Claims are append-only. They are never deduplicated or checked against the
//! map bounds, and unreadable data is treated as "no claims".

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::seed::Seed;

/// A claimed point in map coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub x: f64,
    pub y: f64,
}

impl Claim {
    pub fn new(x: f64, y: f64) -> Self {
        Claim { x, y }
    }
}

pub trait ClaimStore {
    /// All claims recorded for `seed`, oldest first.
    fn claims(&self, seed: Seed) -> Vec<Claim>;

    /// Appends a claim for `seed`.
    fn add_claim(&mut self, seed: Seed, claim: Claim) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryClaimStore {
    claims: HashMap<Seed, Vec<Claim>>,
}

impl MemoryClaimStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClaimStore for MemoryClaimStore {
    fn claims(&self, seed: Seed) -> Vec<Claim> {
        self.claims.get(&seed).cloned().unwrap_or_default()
    }

    fn add_claim(&mut self, seed: Seed, claim: Claim) -> Result<()> {
        self.claims.entry(seed).or_default().push(claim);
        Ok(())
    }
}

/// Claims kept in one JSON document of `"claims-<seed>": [{x, y}, ...]` entries.
#[derive(Debug, Clone)]
pub struct JsonClaimStore {
    path: PathBuf,
}

fn claim_key(seed: Seed) -> String {
    format!("claims-{}", seed)
}

impl JsonClaimStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonClaimStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole document. A missing file is empty; a malformed one is
    /// logged and treated as empty.
    fn read_document(&self) -> BTreeMap<String, Value> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return BTreeMap::new(),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "could not read claims");
                return BTreeMap::new();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(document) => document,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "ignoring malformed claims file");
                BTreeMap::new()
            }
        }
    }
}

impl ClaimStore for JsonClaimStore {
    fn claims(&self, seed: Seed) -> Vec<Claim> {
        let mut document = self.read_document();
        let Some(entry) = document.remove(&claim_key(seed)) else {
            return Vec::new();
        };

        serde_json::from_value(entry).unwrap_or_else(|err| {
            tracing::warn!(seed, error = %err, "ignoring malformed claim list");
            Vec::new()
        })
    }

    fn add_claim(&mut self, seed: Seed, claim: Claim) -> Result<()> {
        let mut claims = self.claims(seed);
        claims.push(claim);

        let mut document = self.read_document();
        document.insert(claim_key(seed), serde_json::to_value(&claims)?);
        fs::write(&self.path, serde_json::to_string_pretty(&document)?)?;

        tracing::info!(seed, x = claim.x, y = claim.y, total = claims.len(), "claim stored");
        Ok(())
    }
}
