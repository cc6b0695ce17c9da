pub mod config;
pub mod error;
pub mod listing;
pub mod reconciler;

pub use config::EngineConfig;
pub use error::EngineError;
pub use listing::{
    FamilyGroup, InventoryLine, InventoryListing, InventoryQuery, InventoryView, SortMode,
    StockFilter, StockLevel, StockStats,
};
pub use reconciler::{FlushReport, InventoryReconciler, LineState, QuantitySink};

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use beadstash_core::{
    catalog::{CatalogEntry, CatalogIndex},
    color::{BrandId, ColorKey, NormalizedHex},
    identity::{self, DisplayIdentity, OverridePatch},
    ids::UserId,
    visibility::{HideTarget, VisibilityFilter},
};
use beadstash_storage::{
    HiddenEntry, HistoryEntry, InventoryRecord, OverrideRecord, ResetCounts, SqliteStorage,
    Storage,
};

/// Server-side entry point: one request, one call, no state carried between
/// calls except the read-only catalog.
pub struct Engine {
    storage: SqliteStorage,
    catalog: Arc<CatalogIndex>,
    config: EngineConfig,
}

impl Engine {
    pub fn new(storage: SqliteStorage, config: EngineConfig) -> Result<Self, EngineError> {
        let catalog = CatalogIndex::build(storage.load_catalog()?)?;
        tracing::info!(entries = catalog.len(), "catalog loaded");
        Ok(Self {
            storage,
            catalog: Arc::new(catalog),
            config,
        })
    }

    /// Opens the configured database, or an in-memory one when none is set.
    pub fn open(config: EngineConfig) -> Result<Self, EngineError> {
        let storage = match &config.database_path {
            Some(path) => {
                let path = path.to_str().ok_or_else(|| {
                    EngineError::Config(format!("database path is not UTF-8: {}", path.display()))
                })?;
                SqliteStorage::open(path)?
            }
            None => SqliteStorage::open_in_memory()?,
        };
        Self::new(storage, config)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> Arc<CatalogIndex> {
        Arc::clone(&self.catalog)
    }

    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    /// Adds palette rows to the shared catalog. The merged catalog is
    /// validated before anything is written.
    pub fn seed_catalog(&mut self, entries: Vec<CatalogEntry>) -> Result<usize, EngineError> {
        let mut merged = self.storage.load_catalog()?;
        merged.extend(entries.iter().cloned());
        let index = CatalogIndex::build(merged)?;

        let inserted = self
            .storage
            .insert_catalog_entries(&entries)
            .map_err(EngineError::persistence)?;
        self.catalog = Arc::new(index);
        tracing::info!(inserted, entries = self.catalog.len(), "catalog seeded");
        Ok(inserted)
    }

    // ========================================================================
    // Identity
    // ========================================================================

    pub fn resolve_catalog(&self, hex: &NormalizedHex, brand: &BrandId) -> Result<String, EngineError> {
        self.catalog
            .lookup(hex, brand)
            .map(str::to_string)
            .ok_or_else(|| EngineError::ColorNotFound {
                hex: hex.to_string(),
                brand: brand.to_string(),
            })
    }

    pub fn resolve_display_identity(
        &self,
        user_id: UserId,
        key: &ColorKey,
    ) -> Result<DisplayIdentity, EngineError> {
        let overrides = self.storage.get_override(user_id, key)?;
        let resolved = identity::resolve(
            key,
            self.catalog.get(key),
            overrides.as_ref().map(|o| &o.fields),
        )?;
        Ok(resolved)
    }

    pub fn get_override(
        &self,
        user_id: UserId,
        key: &ColorKey,
    ) -> Result<Option<OverrideRecord>, EngineError> {
        Ok(self.storage.get_override(user_id, key)?)
    }

    pub fn upsert_override(
        &mut self,
        user_id: UserId,
        key: &ColorKey,
        patch: OverridePatch,
    ) -> Result<OverrideRecord, EngineError> {
        self.require_known_color(user_id, key)?;
        let record = self
            .storage
            .upsert_override(user_id, key, patch)
            .map_err(EngineError::persistence)?;
        tracing::debug!(line = %key, "override updated");
        Ok(record)
    }

    /// A color is known when the catalog has it or the user added it as a
    /// custom line.
    fn require_known_color(&self, user_id: UserId, key: &ColorKey) -> Result<(), EngineError> {
        if self.catalog.contains(key) || self.storage.get_inventory(user_id, key)?.is_some() {
            return Ok(());
        }
        Err(EngineError::ColorNotFound {
            hex: key.hex.to_string(),
            brand: key.brand.to_string(),
        })
    }

    // ========================================================================
    // Visibility
    // ========================================================================

    pub fn visibility(&self, user_id: UserId) -> Result<VisibilityFilter, EngineError> {
        let hidden = self.storage.list_hidden(user_id)?;
        Ok(VisibilityFilter::from_targets(hidden.iter().map(|h| &h.target)))
    }

    /// Idempotent; returns whether anything changed.
    pub fn set_hidden(
        &mut self,
        user_id: UserId,
        target: &HideTarget,
        hidden: bool,
    ) -> Result<bool, EngineError> {
        let value = match target {
            HideTarget::Family(v) | HideTarget::Code(v) => v,
        };
        if value.trim().is_empty() {
            return Err(EngineError::InvalidInput("hide target must not be empty".into()));
        }
        let changed = self
            .storage
            .set_hidden(user_id, target, hidden)
            .map_err(EngineError::persistence)?;
        tracing::debug!(?target, hidden, changed, "visibility toggled");
        Ok(changed)
    }

    pub fn hidden_entries(&self, user_id: UserId) -> Result<Vec<HiddenEntry>, EngineError> {
        Ok(self.storage.list_hidden(user_id)?)
    }

    // ========================================================================
    // Inventory
    // ========================================================================

    pub fn select_brands(&mut self, user_id: UserId, brands: &[BrandId]) -> Result<(), EngineError> {
        self.storage
            .set_selected_brands(user_id, brands)
            .map_err(EngineError::persistence)
    }

    pub fn selected_brands(&self, user_id: UserId) -> Result<Vec<BrandId>, EngineError> {
        Ok(self.storage.selected_brands(user_id)?)
    }

    /// Explicit "add to inventory". A second add for the same line is a
    /// conflict, not a merge.
    pub fn add_to_inventory(
        &mut self,
        user_id: UserId,
        key: &ColorKey,
        quantity: u32,
        is_custom_color: bool,
    ) -> Result<InventoryRecord, EngineError> {
        if !is_custom_color && !self.catalog.contains(key) {
            return Err(EngineError::ColorNotFound {
                hex: key.hex.to_string(),
                brand: key.brand.to_string(),
            });
        }
        let record = self
            .storage
            .insert_inventory(user_id, key, quantity, is_custom_color)
            .map_err(EngineError::persistence)?;
        tracing::debug!(line = %key, quantity, is_custom_color, "inventory line added");
        Ok(record)
    }

    pub fn adjust_quantity(
        &mut self,
        user_id: UserId,
        key: &ColorKey,
        target: i64,
    ) -> Result<InventoryRecord, EngineError> {
        self.adjust_quantity_with_reason(user_id, key, target, None)
    }

    /// Writes `target` as the line's quantity (last write wins) and records
    /// the change. A virtual line is materialized on its first write.
    pub fn adjust_quantity_with_reason(
        &mut self,
        user_id: UserId,
        key: &ColorKey,
        target: i64,
        reason: Option<&str>,
    ) -> Result<InventoryRecord, EngineError> {
        let quantity = u32::try_from(target)
            .map_err(|_| EngineError::InvalidQuantity(format!("{target} is not a valid quantity")))?;
        self.require_known_color(user_id, key)?;

        let commit = self
            .storage
            .set_quantity(user_id, key, quantity, reason)
            .map_err(EngineError::persistence)?;
        tracing::debug!(
            line = %key,
            previous = commit.previous_quantity,
            quantity,
            materialized = commit.materialized,
            "quantity set"
        );
        Ok(commit.record)
    }

    pub fn history(
        &self,
        user_id: UserId,
        key: Option<&ColorKey>,
    ) -> Result<Vec<HistoryEntry>, EngineError> {
        Ok(self.storage.list_history(user_id, key)?)
    }

    /// Irreversibly deletes the user's inventory, overrides, hidden entries
    /// and history. The catalog and brand selection are kept.
    pub fn reset_user_inventory_data(&mut self, user_id: UserId) -> Result<ResetCounts, EngineError> {
        let counts = self
            .storage
            .reset_user(user_id)
            .map_err(EngineError::persistence)?;
        tracing::info!(
            %user_id,
            inventory = counts.inventory,
            overrides = counts.overrides,
            hidden = counts.hidden,
            history = counts.history,
            "user inventory data reset"
        );
        Ok(counts)
    }

    // ========================================================================
    // Listing
    // ========================================================================

    /// Brands a listing covers: the explicit filter, else the user's
    /// selection, else whatever brands the user already holds.
    fn listing_brands(
        &self,
        user_id: UserId,
        query: &InventoryQuery,
        records: &[InventoryRecord],
    ) -> Result<BTreeSet<BrandId>, EngineError> {
        if !query.brands.is_empty() {
            return Ok(query.brands.iter().cloned().collect());
        }
        let selected = self.storage.selected_brands(user_id)?;
        if !selected.is_empty() {
            return Ok(selected.into_iter().collect());
        }
        Ok(records.iter().map(|r| r.key.brand.clone()).collect())
    }

    pub fn list_visible_inventory(
        &self,
        user_id: UserId,
        query: &InventoryQuery,
    ) -> Result<InventoryListing, EngineError> {
        let records = self.storage.list_inventory(user_id)?;
        let brands = self.listing_brands(user_id, query, &records)?;
        let overrides: HashMap<ColorKey, OverrideRecord> = self
            .storage
            .list_overrides(user_id)?
            .into_iter()
            .map(|o| (o.key.clone(), o))
            .collect();
        let visibility = self.visibility(user_id)?;
        let low_stock_max = self.config.low_stock_max;

        let mut stored: HashMap<ColorKey, InventoryRecord> = records
            .into_iter()
            .filter(|r| brands.contains(&r.key.brand))
            .map(|r| (r.key.clone(), r))
            .collect();

        // Stored lines first, then a zero line for every catalog color the
        // user does not hold yet.
        let mut candidates: Vec<(ColorKey, Option<InventoryRecord>)> = Vec::new();
        for brand in &brands {
            for entry in self.catalog.entries_for_brand(brand) {
                let key = entry.key();
                let record = stored.remove(&key);
                candidates.push((key, record));
            }
        }
        candidates.extend(stored.into_iter().map(|(key, record)| (key, Some(record))));

        let search = query.search.as_deref().unwrap_or("");
        let mut visible = Vec::new();
        for (key, record) in candidates {
            let resolved = identity::resolve(
                &key,
                self.catalog.get(&key),
                overrides.get(&key).map(|o| &o.fields),
            );
            let display = match resolved {
                Ok(display) => display,
                Err(err) => {
                    tracing::debug!(line = %key, "skipping unresolvable line: {err}");
                    continue;
                }
            };
            if visibility.is_hidden(&display.code) {
                continue;
            }
            let line = match record {
                Some(r) => InventoryLine::new(key, Some(r.id), r.quantity, r.is_custom_color, display, low_stock_max),
                None => InventoryLine::new(key, None, 0, false, display, low_stock_max),
            };
            if line.matches_search(search) {
                visible.push(line);
            }
        }

        let stats = StockStats::of(&visible);
        visible.retain(|line| query.stock.accepts(line.stock));
        let view = listing::arrange(visible, query.sort, query.group_by_family);
        Ok(InventoryListing { stats, view })
    }
}

impl QuantitySink for Engine {
    fn commit_quantity(
        &mut self,
        user_id: UserId,
        key: &ColorKey,
        quantity: u32,
    ) -> Result<InventoryRecord, EngineError> {
        self.adjust_quantity(user_id, key, i64::from(quantity))
    }
}
