use serde::Serialize;

use beadstash_core::{
    catalog::CatalogEntry,
    color::{BrandId, ColorKey},
    identity::{OverrideFields, OverridePatch},
    ids::*,
    visibility::HideTarget,
};

use crate::error::StorageError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryRecord {
    pub id: InventoryId,
    pub user_id: UserId,
    pub key: ColorKey,
    pub quantity: u32,
    pub is_custom_color: bool,
    /// Unix milliseconds.
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverrideRecord {
    pub id: OverrideId,
    pub user_id: UserId,
    pub key: ColorKey,
    pub fields: OverrideFields,
    pub updated_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HiddenEntry {
    pub user_id: UserId,
    pub target: HideTarget,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub id: HistoryId,
    pub user_id: UserId,
    pub key: ColorKey,
    pub change_amount: i64,
    pub previous_quantity: u32,
    pub new_quantity: u32,
    pub reason: Option<String>,
    pub created_at: i64,
}

/// Result of a quantity write: the stored line plus what it held before.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantityCommit {
    pub record: InventoryRecord,
    pub previous_quantity: u32,
    /// True when the line did not exist and was created by this write.
    pub materialized: bool,
    pub history: Option<HistoryEntry>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResetCounts {
    pub inventory: usize,
    pub overrides: usize,
    pub hidden: usize,
    pub history: usize,
}

pub trait Storage {
    // Catalog (shared, read-only after seeding)

    fn insert_catalog_entries(&mut self, entries: &[CatalogEntry]) -> Result<usize, StorageError>;

    fn load_catalog(&self) -> Result<Vec<CatalogEntry>, StorageError>;

    // Inventory

    /// Fails with [`StorageError::DuplicateInventoryLine`] if the user already
    /// has a line for `key`.
    fn insert_inventory(
        &mut self,
        user_id: UserId,
        key: &ColorKey,
        quantity: u32,
        is_custom_color: bool,
    ) -> Result<InventoryRecord, StorageError>;

    fn get_inventory(
        &self,
        user_id: UserId,
        key: &ColorKey,
    ) -> Result<Option<InventoryRecord>, StorageError>;

    fn list_inventory(&self, user_id: UserId) -> Result<Vec<InventoryRecord>, StorageError>;

    /// Last-write-wins quantity update. Reads the stored value, writes the new
    /// one (creating the line if it is still virtual) and appends a history
    /// entry when the value changed, all in one transaction.
    fn set_quantity(
        &mut self,
        user_id: UserId,
        key: &ColorKey,
        quantity: u32,
        reason: Option<&str>,
    ) -> Result<QuantityCommit, StorageError>;

    // Overrides

    fn get_override(
        &self,
        user_id: UserId,
        key: &ColorKey,
    ) -> Result<Option<OverrideRecord>, StorageError>;

    fn list_overrides(&self, user_id: UserId) -> Result<Vec<OverrideRecord>, StorageError>;

    /// Merges `patch` over the stored fields (or an empty set) and writes the result.
    fn upsert_override(
        &mut self,
        user_id: UserId,
        key: &ColorKey,
        patch: OverridePatch,
    ) -> Result<OverrideRecord, StorageError>;

    // Visibility

    /// Returns whether a row was inserted or removed.
    fn set_hidden(
        &mut self,
        user_id: UserId,
        target: &HideTarget,
        hidden: bool,
    ) -> Result<bool, StorageError>;

    fn list_hidden(&self, user_id: UserId) -> Result<Vec<HiddenEntry>, StorageError>;

    // History

    /// Newest first; all lines when `key` is `None`.
    fn list_history(
        &self,
        user_id: UserId,
        key: Option<&ColorKey>,
    ) -> Result<Vec<HistoryEntry>, StorageError>;

    // Brand selection

    fn set_selected_brands(&mut self, user_id: UserId, brands: &[BrandId]) -> Result<(), StorageError>;

    fn selected_brands(&self, user_id: UserId) -> Result<Vec<BrandId>, StorageError>;

    /// Deletes the user's inventory, overrides, hidden entries and history.
    fn reset_user(&mut self, user_id: UserId) -> Result<ResetCounts, StorageError>;
}
