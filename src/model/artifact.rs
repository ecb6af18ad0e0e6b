//! Binary model artifact.
//!
//! Layout, little-endian:
//!
//! ```text
//! magic "PNTR" | version u32 | created_at i64 (unix seconds)
//! | payload_len u64 | crc32(payload) u32 | payload
//! ```
//!
//! The payload is bincode. Recipes travel inside it as JSON text because
//! their `nutritions` field is free-form JSON.

use std::io::{Cursor, Read};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use chrono::{DateTime, TimeZone, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{PantryError, Result};
use crate::model::VectorSpaceModel;
use crate::recipe::CleanedRecipe;
use crate::storage::{Storage, read_all, write_atomic};
use crate::vectorizer::{SparseVector, TfidfVectorizer};

pub const MAGIC: &[u8; 4] = b"PNTR";
pub const FORMAT_VERSION: u32 = 1;
/// Bytes before the payload.
pub const HEADER_LEN: usize = 4 + 4 + 8 + 8 + 4;

#[derive(Serialize)]
struct PayloadRef<'a> {
    vectorizer: &'a TfidfVectorizer,
    corpus_vectors: &'a [SparseVector],
    recipes_json: String,
}

#[derive(Deserialize)]
struct Payload {
    vectorizer: TfidfVectorizer,
    corpus_vectors: Vec<SparseVector>,
    recipes_json: String,
}

/// Header fields of a stored artifact.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ArtifactInfo {
    pub version: u32,
    pub created_at: DateTime<Utc>,
    pub payload_len: u64,
    pub checksum: u32,
    /// Total artifact size in bytes.
    pub size_bytes: u64,
}

/// Encode a model into artifact bytes.
pub fn encode_model(model: &VectorSpaceModel) -> Result<Vec<u8>> {
    let payload = PayloadRef {
        vectorizer: model.vectorizer(),
        corpus_vectors: model.corpus_vectors(),
        recipes_json: serde_json::to_string(model.recipes())?,
    };
    let payload = bincode::serde::encode_to_vec(&payload, bincode::config::standard())
        .map_err(|e| PantryError::serialization(format!("Failed to encode model: {e}")))?;

    let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
    bytes.extend_from_slice(MAGIC);
    bytes.write_u32::<LittleEndian>(FORMAT_VERSION)?;
    bytes.write_i64::<LittleEndian>(model.created_at().timestamp())?;
    bytes.write_u64::<LittleEndian>(payload.len() as u64)?;
    bytes.write_u32::<LittleEndian>(crc32fast::hash(&payload))?;
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

/// Write a model atomically: readers see either the old artifact or the new one.
pub fn save_model(storage: &dyn Storage, name: &str, model: &VectorSpaceModel) -> Result<u64> {
    let bytes = encode_model(model)?;
    write_atomic(storage, name, &bytes)?;
    info!(
        "Saved model ({} recipes, {} terms, {} bytes) to {}",
        model.len(),
        model.vocabulary_size(),
        bytes.len(),
        storage.location(name)
    );
    Ok(bytes.len() as u64)
}

fn parse_header(bytes: &[u8]) -> std::result::Result<ArtifactInfo, String> {
    if bytes.len() < HEADER_LEN {
        return Err(format!("truncated header ({} bytes)", bytes.len()));
    }

    let mut cursor = Cursor::new(bytes);
    let mut magic = [0u8; 4];
    cursor.read_exact(&mut magic).map_err(|e| e.to_string())?;
    if &magic != MAGIC {
        return Err("bad magic, not a pantry model".to_string());
    }

    let version = cursor.read_u32::<LittleEndian>().map_err(|e| e.to_string())?;
    if version != FORMAT_VERSION {
        return Err(format!("unsupported format version {version}"));
    }

    let created_at = cursor.read_i64::<LittleEndian>().map_err(|e| e.to_string())?;
    let payload_len = cursor.read_u64::<LittleEndian>().map_err(|e| e.to_string())?;
    let checksum = cursor.read_u32::<LittleEndian>().map_err(|e| e.to_string())?;

    let created_at = Utc
        .timestamp_opt(created_at, 0)
        .single()
        .ok_or_else(|| format!("invalid creation time {created_at}"))?;

    Ok(ArtifactInfo {
        version,
        created_at,
        payload_len,
        checksum,
        size_bytes: bytes.len() as u64,
    })
}

/// Decode artifact bytes. Every failure is a [`PantryError::ModelCorrupt`].
pub fn decode_model(bytes: &[u8]) -> Result<VectorSpaceModel> {
    let info = parse_header(bytes).map_err(PantryError::model_corrupt)?;

    let body = &bytes[HEADER_LEN..];
    if body.len() as u64 != info.payload_len {
        return Err(PantryError::model_corrupt(format!(
            "payload is {} bytes, header says {}",
            body.len(),
            info.payload_len
        )));
    }
    if crc32fast::hash(body) != info.checksum {
        return Err(PantryError::model_corrupt("checksum mismatch"));
    }

    let (payload, read): (Payload, usize) =
        bincode::serde::decode_from_slice(body, bincode::config::standard())
            .map_err(|e| PantryError::model_corrupt(format!("cannot decode payload: {e}")))?;
    if read != body.len() {
        return Err(PantryError::model_corrupt("trailing bytes after payload"));
    }

    let recipes: Vec<CleanedRecipe> = serde_json::from_str(&payload.recipes_json)
        .map_err(|e| PantryError::model_corrupt(format!("cannot decode recipes: {e}")))?;

    payload
        .vectorizer
        .validate()
        .map_err(|e| PantryError::model_corrupt(e.to_string()))?;

    let model = VectorSpaceModel::new(payload.vectorizer, payload.corpus_vectors, recipes)
        .map_err(|e| PantryError::model_corrupt(e.to_string()))?;
    debug!(
        "Decoded model with {} recipes, created {}",
        model.len(),
        info.created_at
    );
    Ok(model.with_created_at(info.created_at))
}

/// Load a model from storage.
///
/// A missing artifact is [`PantryError::ModelNotFound`]; anything unreadable
/// is [`PantryError::ModelCorrupt`].
pub fn load_model(storage: &dyn Storage, name: &str) -> Result<VectorSpaceModel> {
    load_model_with_info(storage, name).map(|(model, _)| model)
}

/// Load a model and its header from a single read of the artifact.
pub fn load_model_with_info(
    storage: &dyn Storage,
    name: &str,
) -> Result<(VectorSpaceModel, ArtifactInfo)> {
    let bytes = read_artifact(storage, name)?;
    let info = parse_header(&bytes).map_err(PantryError::model_corrupt)?;
    let model = decode_model(&bytes)?;
    info!(
        "Loaded model ({} recipes, {} terms) from {}",
        model.len(),
        model.vocabulary_size(),
        storage.location(name)
    );
    Ok((model, info))
}

/// Parse the header of a stored artifact without decoding the payload.
pub fn read_artifact_info(storage: &dyn Storage, name: &str) -> Result<ArtifactInfo> {
    let bytes = read_artifact(storage, name)?;
    parse_header(&bytes).map_err(PantryError::model_corrupt)
}

fn read_artifact(storage: &dyn Storage, name: &str) -> Result<Vec<u8>> {
    let location = storage.location(name);
    if !storage.file_exists(name) {
        return Err(PantryError::model_not_found(location));
    }
    read_all(storage, name)
        .map_err(|e| PantryError::model_corrupt(format!("cannot read {location}: {e}")))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::train;
    use crate::storage::memory::MemoryStorage;

    fn model() -> VectorSpaceModel {
        let mut soup = CleanedRecipe::new(
            "Tomato Soup",
            vec!["cups tomatoes".to_string(), "salt".to_string()],
        );
        soup.nutritions = json!({"calories": {"value": 120, "unit": "kcal"}});
        soup.yield_ = "4 bowls".to_string();
        let salad = CleanedRecipe::new(
            "Green Salad",
            vec!["lettuce".to_string(), "olive oil".to_string()],
        );
        train(vec![soup, salad]).unwrap()
    }

    fn corrupt_message(bytes: &[u8]) -> String {
        match decode_model(bytes) {
            Err(PantryError::ModelCorrupt(msg)) => msg,
            other => panic!("expected ModelCorrupt, got {other:?}"),
        }
    }

    #[test]
    fn test_save_and_load() {
        let storage = MemoryStorage::new();
        let original = model();
        let size = save_model(&storage, "model.bin", &original).unwrap();

        let loaded = load_model(&storage, "model.bin").unwrap();
        assert_eq!(loaded.recipes(), original.recipes());
        assert_eq!(loaded.corpus_vectors(), original.corpus_vectors());
        assert_eq!(loaded.vectorizer().vocabulary(), original.vectorizer().vocabulary());
        assert_eq!(loaded.created_at().timestamp(), original.created_at().timestamp());

        let info = read_artifact_info(&storage, "model.bin").unwrap();
        assert_eq!(info.version, FORMAT_VERSION);
        assert_eq!(info.size_bytes, size);
        assert_eq!(info.payload_len as usize + HEADER_LEN, size as usize);
        assert_eq!(storage.list_files(), vec!["model.bin".to_string()]);
    }

    #[test]
    fn test_load_with_info_reads_artifact_once() {
        let storage = MemoryStorage::new();
        let size = save_model(&storage, "model.bin", &model()).unwrap();
        let opened = storage.inputs_opened();

        let (loaded, info) = load_model_with_info(&storage, "model.bin").unwrap();
        assert_eq!(storage.inputs_opened(), opened + 1);
        assert_eq!(loaded.len(), 2);
        assert_eq!(info.size_bytes, size);
        assert_eq!(info.created_at, loaded.created_at());
    }

    #[test]
    fn test_missing_artifact() {
        let storage = MemoryStorage::new();
        assert!(matches!(
            load_model(&storage, "model.bin"),
            Err(PantryError::ModelNotFound(_))
        ));
        assert!(matches!(
            read_artifact_info(&storage, "model.bin"),
            Err(PantryError::ModelNotFound(_))
        ));
    }

    #[test]
    fn test_corrupt_artifacts() {
        let bytes = encode_model(&model()).unwrap();

        assert!(corrupt_message(&bytes[..10]).contains("truncated header"));

        let mut bad_magic = bytes.clone();
        bad_magic[0] = b'X';
        assert!(corrupt_message(&bad_magic).contains("bad magic"));

        let mut bad_version = bytes.clone();
        bad_version[4] = 9;
        assert!(corrupt_message(&bad_version).contains("unsupported format version 9"));

        let truncated = &bytes[..bytes.len() - 3];
        assert!(corrupt_message(truncated).contains("header says"));

        let mut flipped = bytes.clone();
        let last = flipped.len() - 1;
        flipped[last] ^= 0xff;
        assert_eq!(corrupt_message(&flipped), "checksum mismatch");

        assert!(corrupt_message(b"").contains("truncated header"));
    }

    #[test]
    fn test_garbage_file_is_corrupt_not_io() {
        let storage = MemoryStorage::new();
        storage.put("model.bin", b"not a model at all, just text".to_vec());
        assert!(matches!(
            load_model(&storage, "model.bin"),
            Err(PantryError::ModelCorrupt(_))
        ));
    }
}
