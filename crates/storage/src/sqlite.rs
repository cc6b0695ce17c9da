use rusqlite::{Connection, OptionalExtension, Row};

use beadstash_core::{
    catalog::CatalogEntry,
    color::{BrandId, ColorKey, NormalizedHex},
    identity::{OverrideFields, OverridePatch},
    ids::*,
    visibility::HideTarget,
};

use crate::error::StorageError;
use crate::traits::{
    HiddenEntry, HistoryEntry, InventoryRecord, OverrideRecord, QuantityCommit, ResetCounts,
    Storage,
};

/// Convert Vec<u8> to fixed-size array with proper error handling.
fn to_array<const N: usize>(v: Vec<u8>, label: &str) -> Result<[u8; N], StorageError> {
    v.try_into()
        .map_err(|_| StorageError::Serialization(format!("invalid {label} length")))
}

fn to_quantity(value: i64, label: &str) -> Result<u32, StorageError> {
    u32::try_from(value)
        .map_err(|_| StorageError::Serialization(format!("invalid {label}: {value}")))
}

pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    pub fn open(path: &str) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        crate::schema::init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        crate::schema::init_schema(&conn)?;
        Ok(Self { conn })
    }
}

const INVENTORY_COLUMNS: &str =
    "inventory_id, user_id, hex, brand, quantity, is_custom_color, created_at, updated_at";

const OVERRIDE_COLUMNS: &str = "override_id, user_id, hex, brand, custom_code, custom_name_zh, \
     custom_name_en, custom_hex_color, piece_id, notes, updated_at";

const HISTORY_COLUMNS: &str = "history_id, user_id, hex, brand, change_amount, previous_quantity, \
     new_quantity, reason, created_at";

struct InventoryRow {
    id: Vec<u8>,
    user_id: Vec<u8>,
    hex: String,
    brand: String,
    quantity: i64,
    is_custom_color: bool,
    created_at: i64,
    updated_at: i64,
}

impl InventoryRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            hex: row.get(2)?,
            brand: row.get(3)?,
            quantity: row.get(4)?,
            is_custom_color: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }

    fn into_record(self) -> Result<InventoryRecord, StorageError> {
        Ok(InventoryRecord {
            id: InventoryId::from_bytes(to_array::<16>(self.id, "inventory_id")?),
            user_id: UserId::from_bytes(to_array::<16>(self.user_id, "user_id")?),
            key: ColorKey::parse(&self.hex, &self.brand)?,
            quantity: to_quantity(self.quantity, "quantity")?,
            is_custom_color: self.is_custom_color,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

struct OverrideRow {
    id: Vec<u8>,
    user_id: Vec<u8>,
    hex: String,
    brand: String,
    custom_code: Option<String>,
    custom_name_zh: Option<String>,
    custom_name_en: Option<String>,
    custom_hex_color: Option<String>,
    piece_id: Option<String>,
    notes: Option<String>,
    updated_at: i64,
}

impl OverrideRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            hex: row.get(2)?,
            brand: row.get(3)?,
            custom_code: row.get(4)?,
            custom_name_zh: row.get(5)?,
            custom_name_en: row.get(6)?,
            custom_hex_color: row.get(7)?,
            piece_id: row.get(8)?,
            notes: row.get(9)?,
            updated_at: row.get(10)?,
        })
    }

    fn into_record(self) -> Result<OverrideRecord, StorageError> {
        let custom_hex_color = self
            .custom_hex_color
            .as_deref()
            .map(NormalizedHex::parse)
            .transpose()?;
        Ok(OverrideRecord {
            id: OverrideId::from_bytes(to_array::<16>(self.id, "override_id")?),
            user_id: UserId::from_bytes(to_array::<16>(self.user_id, "user_id")?),
            key: ColorKey::parse(&self.hex, &self.brand)?,
            fields: OverrideFields {
                custom_code: self.custom_code,
                custom_name_zh: self.custom_name_zh,
                custom_name_en: self.custom_name_en,
                custom_hex_color,
                piece_id: self.piece_id,
                notes: self.notes,
            },
            updated_at: self.updated_at,
        })
    }
}

struct HistoryRow {
    id: Vec<u8>,
    user_id: Vec<u8>,
    hex: String,
    brand: String,
    change_amount: i64,
    previous_quantity: i64,
    new_quantity: i64,
    reason: Option<String>,
    created_at: i64,
}

impl HistoryRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            hex: row.get(2)?,
            brand: row.get(3)?,
            change_amount: row.get(4)?,
            previous_quantity: row.get(5)?,
            new_quantity: row.get(6)?,
            reason: row.get(7)?,
            created_at: row.get(8)?,
        })
    }

    fn into_entry(self) -> Result<HistoryEntry, StorageError> {
        Ok(HistoryEntry {
            id: HistoryId::from_bytes(to_array::<16>(self.id, "history_id")?),
            user_id: UserId::from_bytes(to_array::<16>(self.user_id, "user_id")?),
            key: ColorKey::parse(&self.hex, &self.brand)?,
            change_amount: self.change_amount,
            previous_quantity: to_quantity(self.previous_quantity, "previous_quantity")?,
            new_quantity: to_quantity(self.new_quantity, "new_quantity")?,
            reason: self.reason,
            created_at: self.created_at,
        })
    }
}

fn fetch_inventory(
    conn: &Connection,
    user_id: UserId,
    key: &ColorKey,
) -> Result<Option<InventoryRecord>, StorageError> {
    let row = conn
        .query_row(
            &format!(
                "SELECT {INVENTORY_COLUMNS} FROM inventory WHERE user_id = ?1 AND hex = ?2 AND brand = ?3"
            ),
            rusqlite::params![
                user_id.as_bytes().as_slice(),
                key.hex.as_str(),
                key.brand.as_str(),
            ],
            InventoryRow::read,
        )
        .optional()?;
    row.map(InventoryRow::into_record).transpose()
}

fn fetch_override(
    conn: &Connection,
    user_id: UserId,
    key: &ColorKey,
) -> Result<Option<OverrideRecord>, StorageError> {
    let row = conn
        .query_row(
            &format!(
                "SELECT {OVERRIDE_COLUMNS} FROM overrides WHERE user_id = ?1 AND hex = ?2 AND brand = ?3"
            ),
            rusqlite::params![
                user_id.as_bytes().as_slice(),
                key.hex.as_str(),
                key.brand.as_str(),
            ],
            OverrideRow::read,
        )
        .optional()?;
    row.map(OverrideRow::into_record).transpose()
}

fn append_history(
    conn: &Connection,
    user_id: UserId,
    key: &ColorKey,
    previous_quantity: u32,
    new_quantity: u32,
    reason: Option<&str>,
) -> Result<HistoryEntry, StorageError> {
    let history_id = HistoryId::new();
    let change_amount = i64::from(new_quantity) - i64::from(previous_quantity);
    conn.execute(
        "INSERT INTO history (history_id, user_id, hex, brand, change_amount, previous_quantity, new_quantity, reason) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        rusqlite::params![
            history_id.as_bytes().as_slice(),
            user_id.as_bytes().as_slice(),
            key.hex.as_str(),
            key.brand.as_str(),
            change_amount,
            i64::from(previous_quantity),
            i64::from(new_quantity),
            reason,
        ],
    )?;
    let row = conn.query_row(
        &format!("SELECT {HISTORY_COLUMNS} FROM history WHERE history_id = ?1"),
        rusqlite::params![history_id.as_bytes().as_slice()],
        HistoryRow::read,
    )?;
    row.into_entry()
}

impl Storage for SqliteStorage {
    fn insert_catalog_entries(&mut self, entries: &[CatalogEntry]) -> Result<usize, StorageError> {
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        for entry in entries {
            inserted += tx.execute(
                "INSERT INTO catalog (hex, brand, code, name_zh, name_en) VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![
                    entry.hex.as_str(),
                    entry.brand.as_str(),
                    entry.code,
                    entry.name_zh,
                    entry.name_en,
                ],
            )?;
        }
        tx.commit()?;
        Ok(inserted)
    }

    fn load_catalog(&self) -> Result<Vec<CatalogEntry>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT hex, brand, code, name_zh, name_en FROM catalog ORDER BY brand, hex")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, Option<String>>(4)?,
            ))
        })?;

        let mut result = Vec::new();
        for row in rows {
            let (hex, brand, code, name_zh, name_en) = row?;
            result.push(CatalogEntry {
                hex: NormalizedHex::parse(&hex)?,
                brand: BrandId::parse(&brand)?,
                code,
                name_zh,
                name_en,
            });
        }
        Ok(result)
    }

    fn insert_inventory(
        &mut self,
        user_id: UserId,
        key: &ColorKey,
        quantity: u32,
        is_custom_color: bool,
    ) -> Result<InventoryRecord, StorageError> {
        let result = self.conn.execute(
            "INSERT INTO inventory (inventory_id, user_id, hex, brand, quantity, is_custom_color) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                InventoryId::new().as_bytes().as_slice(),
                user_id.as_bytes().as_slice(),
                key.hex.as_str(),
                key.brand.as_str(),
                i64::from(quantity),
                is_custom_color,
            ],
        );
        match result {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                return Err(StorageError::DuplicateInventoryLine {
                    key: key.to_string(),
                });
            }
            Err(e) => return Err(StorageError::Sqlite(e)),
        }
        fetch_inventory(&self.conn, user_id, key)?
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    fn get_inventory(
        &self,
        user_id: UserId,
        key: &ColorKey,
    ) -> Result<Option<InventoryRecord>, StorageError> {
        fetch_inventory(&self.conn, user_id, key)
    }

    fn list_inventory(&self, user_id: UserId) -> Result<Vec<InventoryRecord>, StorageError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {INVENTORY_COLUMNS} FROM inventory WHERE user_id = ?1 ORDER BY brand, hex"
        ))?;
        let rows = stmt.query_map(
            rusqlite::params![user_id.as_bytes().as_slice()],
            InventoryRow::read,
        )?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?.into_record()?);
        }
        Ok(result)
    }

    fn set_quantity(
        &mut self,
        user_id: UserId,
        key: &ColorKey,
        quantity: u32,
        reason: Option<&str>,
    ) -> Result<QuantityCommit, StorageError> {
        let tx = self.conn.transaction()?;

        let (previous_quantity, materialized) = match fetch_inventory(&tx, user_id, key)? {
            Some(existing) => {
                tx.execute(
                    "UPDATE inventory SET quantity = ?1, updated_at = CAST(unixepoch('now','subsec') * 1000 AS INTEGER) WHERE inventory_id = ?2",
                    rusqlite::params![i64::from(quantity), existing.id.as_bytes().as_slice()],
                )?;
                (existing.quantity, false)
            }
            None => {
                tx.execute(
                    "INSERT INTO inventory (inventory_id, user_id, hex, brand, quantity, is_custom_color) VALUES (?1, ?2, ?3, ?4, ?5, 0)",
                    rusqlite::params![
                        InventoryId::new().as_bytes().as_slice(),
                        user_id.as_bytes().as_slice(),
                        key.hex.as_str(),
                        key.brand.as_str(),
                        i64::from(quantity),
                    ],
                )?;
                (0, true)
            }
        };

        let history = if previous_quantity != quantity {
            Some(append_history(&tx, user_id, key, previous_quantity, quantity, reason)?)
        } else {
            None
        };

        let record = fetch_inventory(&tx, user_id, key)?
            .ok_or_else(|| StorageError::NotFound(key.to_string()))?;
        tx.commit()?;

        Ok(QuantityCommit {
            record,
            previous_quantity,
            materialized,
            history,
        })
    }

    fn get_override(
        &self,
        user_id: UserId,
        key: &ColorKey,
    ) -> Result<Option<OverrideRecord>, StorageError> {
        fetch_override(&self.conn, user_id, key)
    }

    fn list_overrides(&self, user_id: UserId) -> Result<Vec<OverrideRecord>, StorageError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {OVERRIDE_COLUMNS} FROM overrides WHERE user_id = ?1 ORDER BY brand, hex"
        ))?;
        let rows = stmt.query_map(
            rusqlite::params![user_id.as_bytes().as_slice()],
            OverrideRow::read,
        )?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?.into_record()?);
        }
        Ok(result)
    }

    fn upsert_override(
        &mut self,
        user_id: UserId,
        key: &ColorKey,
        patch: OverridePatch,
    ) -> Result<OverrideRecord, StorageError> {
        let tx = self.conn.transaction()?;

        let existing = fetch_override(&tx, user_id, key)?;
        let mut fields = existing
            .as_ref()
            .map(|o| o.fields.clone())
            .unwrap_or_default();
        patch.merge_into(&mut fields);
        let hex_color = fields.custom_hex_color.as_ref().map(|h| h.as_str());

        match existing {
            Some(existing) => {
                tx.execute(
                    "UPDATE overrides SET custom_code = ?1, custom_name_zh = ?2, custom_name_en = ?3, custom_hex_color = ?4, piece_id = ?5, notes = ?6, updated_at = CAST(unixepoch('now','subsec') * 1000 AS INTEGER) WHERE override_id = ?7",
                    rusqlite::params![
                        fields.custom_code.as_deref(),
                        fields.custom_name_zh.as_deref(),
                        fields.custom_name_en.as_deref(),
                        hex_color,
                        fields.piece_id.as_deref(),
                        fields.notes.as_deref(),
                        existing.id.as_bytes().as_slice(),
                    ],
                )?;
            }
            None => {
                tx.execute(
                    "INSERT INTO overrides (override_id, user_id, hex, brand, custom_code, custom_name_zh, custom_name_en, custom_hex_color, piece_id, notes) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                    rusqlite::params![
                        OverrideId::new().as_bytes().as_slice(),
                        user_id.as_bytes().as_slice(),
                        key.hex.as_str(),
                        key.brand.as_str(),
                        fields.custom_code.as_deref(),
                        fields.custom_name_zh.as_deref(),
                        fields.custom_name_en.as_deref(),
                        hex_color,
                        fields.piece_id.as_deref(),
                        fields.notes.as_deref(),
                    ],
                )?;
            }
        }

        let record = fetch_override(&tx, user_id, key)?
            .ok_or_else(|| StorageError::NotFound(key.to_string()))?;
        tx.commit()?;
        Ok(record)
    }

    fn set_hidden(
        &mut self,
        user_id: UserId,
        target: &HideTarget,
        hidden: bool,
    ) -> Result<bool, StorageError> {
        let changed = match (target, hidden) {
            (HideTarget::Family(family), true) => self.conn.execute(
                "INSERT OR IGNORE INTO hidden (user_id, family, color_code) VALUES (?1, ?2, NULL)",
                rusqlite::params![user_id.as_bytes().as_slice(), family],
            )?,
            (HideTarget::Code(code), true) => self.conn.execute(
                "INSERT OR IGNORE INTO hidden (user_id, family, color_code) VALUES (?1, NULL, ?2)",
                rusqlite::params![user_id.as_bytes().as_slice(), code],
            )?,
            (HideTarget::Family(family), false) => self.conn.execute(
                "DELETE FROM hidden WHERE user_id = ?1 AND family = ?2",
                rusqlite::params![user_id.as_bytes().as_slice(), family],
            )?,
            (HideTarget::Code(code), false) => self.conn.execute(
                "DELETE FROM hidden WHERE user_id = ?1 AND color_code = ?2",
                rusqlite::params![user_id.as_bytes().as_slice(), code],
            )?,
        };
        Ok(changed > 0)
    }

    fn list_hidden(&self, user_id: UserId) -> Result<Vec<HiddenEntry>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT family, color_code FROM hidden WHERE user_id = ?1 ORDER BY rowid")?;
        let rows = stmt.query_map(rusqlite::params![user_id.as_bytes().as_slice()], |row| {
            Ok((
                row.get::<_, Option<String>>(0)?,
                row.get::<_, Option<String>>(1)?,
            ))
        })?;

        let mut result = Vec::new();
        for row in rows {
            let target = match row? {
                (Some(family), None) => HideTarget::Family(family),
                (None, Some(code)) => HideTarget::Code(code),
                _ => {
                    return Err(StorageError::Serialization(
                        "hidden row must set exactly one of family/color_code".into(),
                    ));
                }
            };
            result.push(HiddenEntry { user_id, target });
        }
        Ok(result)
    }

    fn list_history(
        &self,
        user_id: UserId,
        key: Option<&ColorKey>,
    ) -> Result<Vec<HistoryEntry>, StorageError> {
        let mut result = Vec::new();
        match key {
            Some(key) => {
                let mut stmt = self.conn.prepare(&format!(
                    "SELECT {HISTORY_COLUMNS} FROM history WHERE user_id = ?1 AND hex = ?2 AND brand = ?3 ORDER BY rowid DESC"
                ))?;
                let rows = stmt.query_map(
                    rusqlite::params![
                        user_id.as_bytes().as_slice(),
                        key.hex.as_str(),
                        key.brand.as_str(),
                    ],
                    HistoryRow::read,
                )?;
                for row in rows {
                    result.push(row?.into_entry()?);
                }
            }
            None => {
                let mut stmt = self.conn.prepare(&format!(
                    "SELECT {HISTORY_COLUMNS} FROM history WHERE user_id = ?1 ORDER BY rowid DESC"
                ))?;
                let rows = stmt.query_map(
                    rusqlite::params![user_id.as_bytes().as_slice()],
                    HistoryRow::read,
                )?;
                for row in rows {
                    result.push(row?.into_entry()?);
                }
            }
        }
        Ok(result)
    }

    fn set_selected_brands(&mut self, user_id: UserId, brands: &[BrandId]) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM selected_brands WHERE user_id = ?1",
            rusqlite::params![user_id.as_bytes().as_slice()],
        )?;
        for (position, brand) in brands.iter().enumerate() {
            tx.execute(
                "INSERT OR IGNORE INTO selected_brands (user_id, brand, position) VALUES (?1, ?2, ?3)",
                rusqlite::params![user_id.as_bytes().as_slice(), brand.as_str(), position as i64],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn selected_brands(&self, user_id: UserId) -> Result<Vec<BrandId>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT brand FROM selected_brands WHERE user_id = ?1 ORDER BY position")?;
        let rows = stmt.query_map(rusqlite::params![user_id.as_bytes().as_slice()], |row| {
            row.get::<_, String>(0)
        })?;

        let mut result = Vec::new();
        for row in rows {
            result.push(BrandId::parse(&row?)?);
        }
        Ok(result)
    }

    fn reset_user(&mut self, user_id: UserId) -> Result<ResetCounts, StorageError> {
        let tx = self.conn.transaction()?;
        let user = user_id.as_bytes().as_slice();
        let counts = ResetCounts {
            inventory: tx.execute("DELETE FROM inventory WHERE user_id = ?1", [user])?,
            overrides: tx.execute("DELETE FROM overrides WHERE user_id = ?1", [user])?,
            hidden: tx.execute("DELETE FROM hidden WHERE user_id = ?1", [user])?,
            history: tx.execute("DELETE FROM history WHERE user_id = ?1", [user])?,
        };
        tx.commit()?;
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(hex: &str, brand: &str) -> ColorKey {
        ColorKey::parse(hex, brand).unwrap()
    }

    #[test]
    fn duplicate_inventory_line_is_a_conflict() {
        let mut storage = SqliteStorage::open_in_memory().unwrap();
        let user = UserId::new();
        let red = key("#ff0000", "MARD");

        storage.insert_inventory(user, &red, 3, false).unwrap();
        let err = storage.insert_inventory(user, &key("#FF0000", "mard"), 9, false).unwrap_err();
        assert!(matches!(err, StorageError::DuplicateInventoryLine { .. }));
        assert_eq!(storage.get_inventory(user, &red).unwrap().unwrap().quantity, 3);

        // other users are unaffected
        storage.insert_inventory(UserId::new(), &red, 1, false).unwrap();
    }

    #[test]
    fn set_quantity_materializes_and_logs() {
        let mut storage = SqliteStorage::open_in_memory().unwrap();
        let user = UserId::new();
        let red = key("#ff0000", "MARD");

        let commit = storage.set_quantity(user, &red, 4, Some("bought")).unwrap();
        assert!(commit.materialized);
        assert_eq!(commit.previous_quantity, 0);
        assert_eq!(commit.record.quantity, 4);
        let entry = commit.history.unwrap();
        assert_eq!(entry.change_amount, 4);
        assert_eq!(entry.reason.as_deref(), Some("bought"));

        let commit = storage.set_quantity(user, &red, 1, None).unwrap();
        assert!(!commit.materialized);
        assert_eq!(commit.previous_quantity, 4);
        assert_eq!(commit.history.unwrap().change_amount, -3);

        let unchanged = storage.set_quantity(user, &red, 1, None).unwrap();
        assert!(unchanged.history.is_none());

        let history = storage.list_history(user, Some(&red)).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].new_quantity, 1);
        assert_eq!(history[1].new_quantity, 4);
    }

    #[test]
    fn hidden_rows_are_idempotent() {
        let mut storage = SqliteStorage::open_in_memory().unwrap();
        let user = UserId::new();
        let family = HideTarget::Family("A".into());
        let code = HideTarget::Code("A3".into());

        assert!(storage.set_hidden(user, &family, true).unwrap());
        assert!(!storage.set_hidden(user, &family, true).unwrap());
        assert!(storage.set_hidden(user, &code, true).unwrap());
        assert_eq!(storage.list_hidden(user).unwrap().len(), 2);

        assert!(storage.set_hidden(user, &family, false).unwrap());
        assert!(!storage.set_hidden(user, &family, false).unwrap());
        let remaining = storage.list_hidden(user).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].target, code);
    }

    #[test]
    fn reopen_from_disk_keeps_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stash.db");
        let path = path.to_str().unwrap();
        let user = UserId::new();
        let red = key("#ff0000", "MARD");

        {
            let mut storage = SqliteStorage::open(path).unwrap();
            storage
                .insert_catalog_entries(&[CatalogEntry::new(red.hex.clone(), red.brand.clone(), "R3")])
                .unwrap();
            storage.set_quantity(user, &red, 2, None).unwrap();
            storage.set_selected_brands(user, &[red.brand.clone()]).unwrap();
        }

        let storage = SqliteStorage::open(path).unwrap();
        assert_eq!(storage.load_catalog().unwrap().len(), 1);
        assert_eq!(storage.get_inventory(user, &red).unwrap().unwrap().quantity, 2);
        assert_eq!(storage.selected_brands(user).unwrap(), vec![red.brand.clone()]);
    }
}
