//! Flattening items to and from store records.
//!
//! The store only holds flat `field -> text` maps. The nested status is kept
//! as embedded JSON text under the `status` field.

use super::{DownloadStatus, Item};
use crate::store::{Record, StoreError};

const TITLE: &str = "title";
const SIZE: &str = "size";
const SEEDERS: &str = "seeders";
const ID: &str = "id";
const CATEGORY: &str = "category";
const SUB_CATEGORY: &str = "sub_category";
const MAGNET_LINK: &str = "magnet_link";
const STATUS: &str = "status";
const PATH: &str = "path";

impl Item {
    /// Flatten into a store record. Absent status and path produce no field.
    pub fn to_record(&self) -> Result<Record, StoreError> {
        let mut record = Record::new();
        record.insert(TITLE.to_string(), self.title.clone());
        record.insert(SIZE.to_string(), self.size.clone());
        record.insert(SEEDERS.to_string(), self.seeders.to_string());
        record.insert(ID.to_string(), self.id.clone());
        record.insert(CATEGORY.to_string(), self.category.clone());
        record.insert(SUB_CATEGORY.to_string(), self.sub_category.clone());
        record.insert(MAGNET_LINK.to_string(), self.magnet_link.clone());

        if let Some(status) = &self.status {
            let encoded = serde_json::to_string(status).map_err(|e| StoreError::Corrupt {
                id: self.id.clone(),
                reason: format!("cannot encode status: {}", e),
            })?;
            record.insert(STATUS.to_string(), encoded);
        }
        if let Some(path) = &self.path {
            record.insert(PATH.to_string(), path.clone());
        }

        Ok(record)
    }

    /// Rebuild an item from the record stored under `key`.
    ///
    /// Missing catalog fields fall back to empty values; the id falls back to
    /// the key. A status field that is not valid JSON is an error.
    pub fn from_record(key: &str, record: &Record) -> Result<Item, StoreError> {
        let text = |field: &str| record.get(field).cloned().unwrap_or_default();

        let seeders = record
            .get(SEEDERS)
            .and_then(|s| s.trim().parse::<u32>().ok())
            .unwrap_or(0);

        let status = match record.get(STATUS).filter(|s| !s.is_empty()) {
            Some(encoded) => Some(serde_json::from_str::<DownloadStatus>(encoded).map_err(
                |e| StoreError::Corrupt {
                    id: key.to_string(),
                    reason: format!("invalid status: {}", e),
                },
            )?),
            None => None,
        };

        let id = record
            .get(ID)
            .filter(|s| !s.is_empty())
            .cloned()
            .unwrap_or_else(|| key.to_string());

        Ok(Item {
            title: text(TITLE),
            size: record
                .get(SIZE)
                .cloned()
                .unwrap_or_else(|| "0 B".to_string()),
            seeders,
            id,
            category: text(CATEGORY),
            sub_category: text(SUB_CATEGORY),
            magnet_link: text(MAGNET_LINK),
            status,
            path: record.get(PATH).filter(|p| !p.is_empty()).cloned(),
        })
    }
}
