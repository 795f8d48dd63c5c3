//! Hashing - SHA-256 fingerprints for build reports
//!
//! Same catalog, engine version and backend give the same input hash, so
//! two reports can be compared without diffing the output tree.

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

/// SHA-256 of bytes as lowercase hex.
pub fn sha256_hex(data: &[u8]) -> String {
    let digest = Sha256::digest(data);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// JSON with object keys sorted at every level and no whitespace.
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let v = serde_json::to_value(value)?;
    serde_json::to_string(&sort_keys(v))
}

fn sort_keys(v: Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut pairs: Vec<_> = map.into_iter().collect();
            pairs.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(pairs.into_iter().map(|(k, v)| (k, sort_keys(v))).collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// Hash of the manifest's canonical JSON.
pub fn compute_manifest_hash<T: Serialize>(manifest: &T) -> Result<String, serde_json::Error> {
    Ok(sha256_hex(canonical_json(manifest)?.as_bytes()))
}

/// input_hash = sha256(canonical catalog + ":" + engine version + ":" + backend)
pub fn compute_input_hash(
    catalog: &impl Serialize,
    engine_version: &str,
    backend: &str,
) -> Result<String, serde_json::Error> {
    let combined = format!("{}:{}:{}", canonical_json(catalog)?, engine_version, backend);
    Ok(sha256_hex(combined.as_bytes()))
}
