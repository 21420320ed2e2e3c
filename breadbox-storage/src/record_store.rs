use breadbox_model::{Record, TranslationBundle};
use breadbox_types::RecordId;
use serde_json::Value;

use crate::error::StorageResult;

/// Record persistence as seen by the engine.
pub trait RecordStore: Send + Sync {
    fn find(&self, resource: &str, id: RecordId) -> StorageResult<Option<Record>>;

    /// Every record of a resource, in id order.
    fn all(&self, resource: &str) -> StorageResult<Vec<Record>>;

    /// Inserts or updates a record. An unsaved record receives its new id.
    fn save(&self, record: &mut Record) -> StorageResult<RecordId>;

    /// Returns false when the record did not exist.
    fn delete(&self, resource: &str, id: RecordId) -> StorageResult<bool>;

    /// Replaces the related ids of `owner` in a pivot table with exactly
    /// `related`, keeping their order. Duplicates keep their first position.
    fn sync_pivot(&self, pivot_table: &str, owner: RecordId, related: &[RecordId]) -> StorageResult<()>;

    fn pivot_ids(&self, pivot_table: &str, owner: RecordId) -> StorageResult<Vec<RecordId>>;

    /// Drops every pivot row owned by `owner`.
    fn delete_pivots(&self, pivot_table: &str, owner: RecordId) -> StorageResult<()> {
        self.sync_pivot(pivot_table, owner, &[])
    }

    fn save_translations(
        &self,
        resource: &str,
        id: RecordId,
        bundle: &TranslationBundle,
    ) -> StorageResult<()>;

    fn translations(&self, resource: &str, id: RecordId) -> StorageResult<TranslationBundle>;

    /// Removes translations of one field, or of every field when `field` is
    /// `None`.
    fn delete_translations(&self, resource: &str, id: RecordId, field: Option<&str>) -> StorageResult<()>;

    /// True when another record of `resource` stores `value` in `column`.
    fn value_taken(
        &self,
        resource: &str,
        column: &str,
        value: &Value,
        ignore: Option<RecordId>,
    ) -> StorageResult<bool>;

    fn exists(&self, resource: &str, id: RecordId) -> StorageResult<bool> {
        Ok(self.find(resource, id)?.is_some())
    }
}
