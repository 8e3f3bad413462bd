//! Cart persistence adapters.
//!
//! The cart is stored as a single JSON array under one key of a
//! browser-style key/value store. [`CartStorage`] is the seam; the store
//! itself never touches files.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Map, Number, Value};
use thiserror::Error;
use tracing::{debug, warn};

use mk_store_core::ProductId;

use super::CartLineItem;

/// Errors raised by a storage backend.
///
/// The cart store absorbs these; they are only visible to callers that use
/// an adapter directly.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The cart could not be encoded.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The backend refuses writes (disabled or over quota).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Durable home for the cart's line items.
pub trait CartStorage {
    /// Read the saved cart. Missing or unreadable data yields an empty list;
    /// only backend failures are errors.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read at all.
    fn load(&self) -> Result<Vec<CartLineItem>, StorageError>;

    /// Replace the saved cart with `items`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    fn save(&self, items: &[CartLineItem]) -> Result<(), StorageError>;
}

impl<S: CartStorage + ?Sized> CartStorage for &S {
    fn load(&self) -> Result<Vec<CartLineItem>, StorageError> {
        (**self).load()
    }

    fn save(&self, items: &[CartLineItem]) -> Result<(), StorageError> {
        (**self).save(items)
    }
}

impl<S: CartStorage + ?Sized> CartStorage for Box<S> {
    fn load(&self) -> Result<Vec<CartLineItem>, StorageError> {
        (**self).load()
    }

    fn save(&self, items: &[CartLineItem]) -> Result<(), StorageError> {
        (**self).save(items)
    }
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode a persisted cart, keeping every well-formed line.
///
/// A document that is not a JSON array decodes to an empty cart. Entries
/// with a missing field, a non-numeric or negative price, or a quantity
/// that is not a positive integer are dropped. A repeated id is folded into
/// its first occurrence.
#[must_use]
pub fn decode_items(raw: &str) -> Vec<CartLineItem> {
    let entries = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(entries)) => entries,
        Ok(_) => {
            debug!("Saved cart is not an array, starting empty");
            return Vec::new();
        }
        Err(e) => {
            debug!(error = %e, "Saved cart is not valid JSON, starting empty");
            return Vec::new();
        }
    };

    let mut items: Vec<CartLineItem> = Vec::with_capacity(entries.len());
    let mut seen = HashSet::new();

    for (index, entry) in entries.into_iter().enumerate() {
        let Some(item) = decode_entry(entry) else {
            debug!(index, "Dropping malformed cart entry");
            continue;
        };

        if seen.insert(item.id.clone()) {
            items.push(item);
        } else if let Some(existing) = items.iter_mut().find(|i| i.id == item.id) {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
        }
    }

    items
}

/// A stored line as written, with the price kept as its JSON number text.
#[derive(Deserialize)]
struct StoredLine {
    id: ProductId,
    name: String,
    price: Number,
    image: String,
    quantity: u32,
}

fn decode_entry(entry: Value) -> Option<CartLineItem> {
    let line: StoredLine = serde_json::from_value(entry).ok()?;
    let price = parse_price(&line.price)?;
    (line.quantity >= 1 && price >= Decimal::ZERO).then_some(CartLineItem {
        id: line.id,
        name: line.name,
        price,
        image: line.image,
        quantity: line.quantity,
    })
}

fn parse_price(number: &Number) -> Option<Decimal> {
    let text = number.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

fn encode_items(items: &[CartLineItem]) -> Result<String, StorageError> {
    Ok(serde_json::to_string(items)?)
}

// =============================================================================
// In-memory storage
// =============================================================================

#[derive(Debug, Default)]
struct MemorySlot {
    raw: Option<String>,
    fail_writes: bool,
}

/// Storage that keeps the serialized cart in process memory.
///
/// Clones share one slot, so a test can hand one clone to a store, drop the
/// store, and open a new store on another clone to simulate a page reload.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Arc<Mutex<MemorySlot>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `raw` already saved, as if left behind by an earlier visit.
    #[must_use]
    pub fn with_raw(raw: impl Into<String>) -> Self {
        let storage = Self::new();
        storage.with_slot(|slot| slot.raw = Some(raw.into()));
        storage
    }

    /// The exact serialized value currently saved.
    #[must_use]
    pub fn raw(&self) -> Option<String> {
        self.with_slot(|slot| slot.raw.clone())
    }

    /// Make subsequent writes fail, like a full or disabled local storage.
    pub fn set_fail_writes(&self, fail: bool) {
        self.with_slot(|slot| slot.fail_writes = fail);
    }

    fn with_slot<T>(&self, f: impl FnOnce(&mut MemorySlot) -> T) -> T {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut slot)
    }
}

impl CartStorage for MemoryStorage {
    fn load(&self) -> Result<Vec<CartLineItem>, StorageError> {
        Ok(self.raw().as_deref().map(decode_items).unwrap_or_default())
    }

    fn save(&self, items: &[CartLineItem]) -> Result<(), StorageError> {
        let encoded = encode_items(items)?;
        self.with_slot(|slot| {
            if slot.fail_writes {
                return Err(StorageError::Unavailable("quota exceeded".to_string()));
            }
            slot.raw = Some(encoded);
            Ok(())
        })
    }
}

// =============================================================================
// File storage
// =============================================================================

/// Storage backed by a JSON file of string values, one entry per key.
///
/// Mirrors how the browser keeps the cart: the file is the origin's local
/// storage and the cart is the JSON text stored under one key. Entries
/// under other keys are left alone.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
    key: String,
}

impl FileStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    fn read_entries(&self) -> Result<Map<String, Value>, StorageError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Object(entries)) => Ok(entries),
            _ => {
                warn!(path = %self.path.display(), "Local storage file is corrupt, ignoring it");
                Ok(Map::new())
            }
        }
    }
}

impl CartStorage for FileStorage {
    fn load(&self) -> Result<Vec<CartLineItem>, StorageError> {
        let entries = self.read_entries()?;
        Ok(match entries.get(&self.key) {
            Some(Value::String(raw)) => decode_items(raw),
            Some(_) => {
                debug!(key = %self.key, "Saved cart is not a string value, starting empty");
                Vec::new()
            }
            None => Vec::new(),
        })
    }

    fn save(&self, items: &[CartLineItem]) -> Result<(), StorageError> {
        let mut entries = self.read_entries()?;
        entries.insert(self.key.clone(), Value::String(encode_items(items)?));

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        // Write-then-rename so a crash never leaves a half-written file.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&Value::Object(entries))?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn item(id: &str, price: i64, quantity: u32) -> CartLineItem {
        CartLineItem {
            id: ProductId::new(id),
            name: "Widget".to_string(),
            price: Decimal::from(price),
            image: "x.png".to_string(),
            quantity,
        }
    }

    #[test]
    fn test_decode_garbage_is_empty() {
        assert!(decode_items("").is_empty());
        assert!(decode_items("not json").is_empty());
        assert!(decode_items("{\"id\":\"p1\"}").is_empty());
        assert!(decode_items("null").is_empty());
    }

    #[test]
    fn test_decode_drops_malformed_entries() {
        let raw = r#"[
            {"id":"ok","name":"A","price":10,"image":"a.png","quantity":2},
            {"id":"no-name","price":10,"image":"a.png","quantity":1},
            {"id":"str-price","name":"B","price":"10","image":"b.png","quantity":1},
            {"id":"neg-price","name":"C","price":-1,"image":"c.png","quantity":1},
            {"id":"zero-qty","name":"D","price":1,"image":"d.png","quantity":0},
            {"id":"neg-qty","name":"E","price":1,"image":"e.png","quantity":-3},
            {"id":"frac-qty","name":"F","price":1,"image":"f.png","quantity":1.5},
            42,
            {"id":"ok2","name":"G","price":2.5,"image":"g.png","quantity":1}
        ]"#;

        let items = decode_items(raw);
        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["ok", "ok2"]);
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[1].price, Decimal::new(25, 1));
    }

    #[test]
    fn test_decode_keeps_exact_prices() {
        let raw = r#"[
            {"id":"fine","name":"A","price":0.1234567890123456789,"image":"a.png","quantity":1},
            {"id":"big","name":"B","price":79228162514264337593543950335,"image":"b.png","quantity":1},
            {"id":"sci","name":"C","price":1.5e3,"image":"c.png","quantity":1},
            {"id":"scale","name":"D","price":12.50,"image":"d.png","quantity":1}
        ]"#;

        let items = decode_items(raw);
        assert_eq!(items.len(), 4);
        assert_eq!(items[0].price, Decimal::new(1_234_567_890_123_456_789, 19));
        assert_eq!(items[1].price, Decimal::MAX);
        assert_eq!(items[2].price, Decimal::from(1500));
        assert_eq!(items[3].price.to_string(), "12.50");
    }

    #[test]
    fn test_save_then_load_is_exact() {
        let storage = MemoryStorage::new();
        let items = vec![
            CartLineItem {
                price: Decimal::new(12_345_678_901_234_567, 3),
                ..item("p1", 0, 2)
            },
            CartLineItem {
                price: Decimal::MAX,
                ..item("p2", 0, 1)
            },
        ];

        storage.save(&items).unwrap();
        assert_eq!(storage.load().unwrap(), items);
    }

    #[test]
    fn test_decode_merges_duplicate_ids() {
        let raw = r#"[
            {"id":"p1","name":"First","price":10,"image":"a.png","quantity":2},
            {"id":"p2","name":"Other","price":3,"image":"b.png","quantity":1},
            {"id":"p1","name":"Second","price":99,"image":"c.png","quantity":3}
        ]"#;

        let items = decode_items(raw);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "First");
        assert_eq!(items[0].price, Decimal::from(10));
        assert_eq!(items[0].quantity, 5);
    }

    #[test]
    fn test_memory_storage_roundtrip_and_failure() {
        let storage = MemoryStorage::new();
        assert!(storage.load().unwrap().is_empty());

        let items = vec![item("p1", 10, 2), item("p2", 4, 1)];
        storage.save(&items).unwrap();
        assert_eq!(storage.clone().load().unwrap(), items);

        storage.set_fail_writes(true);
        let err = storage.save(&[]).unwrap_err();
        assert!(matches!(err, StorageError::Unavailable(_)));
        assert_eq!(storage.load().unwrap(), items);
    }

    #[test]
    fn test_file_storage_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("local_storage.json"), "cart");
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn test_file_storage_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("local_storage.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{"theme":"dark"}"#).unwrap();

        let storage = FileStorage::new(&path, "cart");
        let items = vec![item("p1", 10, 3)];
        storage.save(&items).unwrap();

        let on_disk: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk["theme"], "dark");
        assert!(on_disk["cart"].is_string());
        assert_eq!(storage.load().unwrap(), items);
    }

    #[test]
    fn test_file_storage_corrupt_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local_storage.json");
        fs::write(&path, "{{{{").unwrap();

        let storage = FileStorage::new(&path, "cart");
        assert!(storage.load().unwrap().is_empty());

        // A save replaces the corrupt file with a valid one.
        storage.save(&[item("p1", 1, 1)]).unwrap();
        assert_eq!(storage.load().unwrap().len(), 1);
    }

    #[test]
    fn test_file_storage_non_string_value_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local_storage.json");
        fs::write(&path, r#"{"cart":[1,2,3]}"#).unwrap();

        assert!(FileStorage::new(&path, "cart").load().unwrap().is_empty());
    }
}
