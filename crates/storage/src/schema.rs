use rusqlite::Connection;

use crate::error::StorageError;

pub const SCHEMA_VERSION: i32 = 1;

pub fn init_schema(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
        PRAGMA busy_timeout = 5000;
    ",
    )?;
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at INTEGER NOT NULL
);
INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (1, unixepoch());

CREATE TABLE IF NOT EXISTS catalog (
    hex TEXT NOT NULL CHECK (length(hex) = 7 AND hex = lower(hex)),
    brand TEXT NOT NULL,
    code TEXT NOT NULL,
    name_zh TEXT,
    name_en TEXT,
    PRIMARY KEY (hex, brand),
    UNIQUE (brand, code)
);

CREATE TABLE IF NOT EXISTS inventory (
    inventory_id BLOB PRIMARY KEY CHECK (length(inventory_id) = 16),
    user_id BLOB NOT NULL CHECK (length(user_id) = 16),
    hex TEXT NOT NULL CHECK (length(hex) = 7 AND hex = lower(hex)),
    brand TEXT NOT NULL,
    quantity INTEGER NOT NULL CHECK (quantity >= 0),
    is_custom_color INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL DEFAULT (CAST(unixepoch('now','subsec') * 1000 AS INTEGER)),
    updated_at INTEGER NOT NULL DEFAULT (CAST(unixepoch('now','subsec') * 1000 AS INTEGER)),
    UNIQUE (user_id, hex, brand)
);

CREATE TABLE IF NOT EXISTS overrides (
    override_id BLOB PRIMARY KEY CHECK (length(override_id) = 16),
    user_id BLOB NOT NULL CHECK (length(user_id) = 16),
    hex TEXT NOT NULL,
    brand TEXT NOT NULL,
    custom_code TEXT,
    custom_name_zh TEXT,
    custom_name_en TEXT,
    custom_hex_color TEXT CHECK (custom_hex_color IS NULL OR length(custom_hex_color) = 7),
    piece_id TEXT,
    notes TEXT,
    updated_at INTEGER NOT NULL DEFAULT (CAST(unixepoch('now','subsec') * 1000 AS INTEGER)),
    UNIQUE (user_id, hex, brand)
);

CREATE TABLE IF NOT EXISTS hidden (
    rowid INTEGER PRIMARY KEY,
    user_id BLOB NOT NULL CHECK (length(user_id) = 16),
    family TEXT,
    color_code TEXT,
    CHECK ((family IS NULL) <> (color_code IS NULL))
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_hidden_family ON hidden (user_id, family) WHERE family IS NOT NULL;
CREATE UNIQUE INDEX IF NOT EXISTS idx_hidden_code ON hidden (user_id, color_code) WHERE color_code IS NOT NULL;

CREATE TABLE IF NOT EXISTS history (
    rowid INTEGER PRIMARY KEY,
    history_id BLOB NOT NULL UNIQUE CHECK (length(history_id) = 16),
    user_id BLOB NOT NULL CHECK (length(user_id) = 16),
    hex TEXT NOT NULL,
    brand TEXT NOT NULL,
    change_amount INTEGER NOT NULL,
    previous_quantity INTEGER NOT NULL CHECK (previous_quantity >= 0),
    new_quantity INTEGER NOT NULL CHECK (new_quantity >= 0),
    reason TEXT,
    created_at INTEGER NOT NULL DEFAULT (CAST(unixepoch('now','subsec') * 1000 AS INTEGER))
);
CREATE INDEX IF NOT EXISTS idx_history_user_line ON history (user_id, hex, brand, rowid);

CREATE TABLE IF NOT EXISTS selected_brands (
    user_id BLOB NOT NULL CHECK (length(user_id) = 16),
    brand TEXT NOT NULL,
    position INTEGER NOT NULL,
    PRIMARY KEY (user_id, brand)
);
";
