use beadstash_core::{
    catalog::CatalogEntry,
    color::{BrandId, ColorKey, NormalizedHex},
    ids::UserId,
    CoreError,
};
use beadstash_engine::{Engine, EngineConfig, EngineError};
use beadstash_storage::SqliteStorage;

/// A small two-brand palette. MARD and COCO share `#ff0000` and `#000000`
/// under different codes.
pub fn palette() -> Result<Vec<CatalogEntry>, CoreError> {
    let rows: &[(&str, &str, &str, Option<&str>, Option<&str>)] = &[
        ("#ff0000", "MARD", "R3", Some("大红"), Some("Red")),
        ("#fff5cc", "MARD", "A1", None, Some("Cream")),
        ("#ffe680", "MARD", "A2", None, Some("Butter")),
        ("#ffd633", "MARD", "A3", None, Some("Lemon")),
        ("#ffcc00", "MARD", "A9", None, Some("Sun")),
        ("#e6b800", "MARD", "A10", None, Some("Mustard")),
        ("#cce5ff", "MARD", "B1", None, Some("Ice")),
        ("#3399ff", "MARD", "B2", None, Some("Sky")),
        ("#000000", "MARD", "H7", Some("黑"), Some("Black")),
        ("#ff0000", "COCO", "E12", None, Some("Scarlet")),
        ("#000000", "COCO", "H1", None, Some("Ink")),
    ];
    rows.iter()
        .map(|(hex, brand, code, zh, en)| {
            Ok(CatalogEntry::new(NormalizedHex::parse(hex)?, BrandId::parse(brand)?, *code)
                .with_names(*zh, *en))
        })
        .collect()
}

/// One user against a fresh in-memory engine seeded with [`palette`].
pub struct TestShop {
    pub engine: Engine,
    pub user: UserId,
}

impl TestShop {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Result<Self, Box<dyn std::error::Error>> {
        crate::init_tracing();
        let mut engine = Engine::new(SqliteStorage::open_in_memory()?, config)?;
        engine.seed_catalog(palette()?)?;
        Ok(Self {
            engine,
            user: UserId::new(),
        })
    }

    pub fn key(&self, hex: &str, brand: &str) -> Result<ColorKey, CoreError> {
        ColorKey::parse(hex, brand)
    }

    pub fn brand(&self, brand: &str) -> Result<BrandId, CoreError> {
        BrandId::parse(brand)
    }

    /// Selects `brand` for the shop's user.
    pub fn select(&mut self, brand: &str) -> Result<(), Box<dyn std::error::Error>> {
        let brand = BrandId::parse(brand)?;
        self.engine.select_brands(self.user, &[brand])?;
        Ok(())
    }

    pub fn set(&mut self, hex: &str, brand: &str, quantity: i64) -> Result<(), EngineError> {
        let key = ColorKey::parse(hex, brand)?;
        self.engine.adjust_quantity(self.user, &key, quantity)?;
        Ok(())
    }
}
