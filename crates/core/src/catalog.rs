use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::code::compare_codes;
use crate::color::{BrandId, ColorKey, NormalizedHex};
use crate::CoreError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub hex: NormalizedHex,
    pub brand: BrandId,
    pub code: String,
    pub name_zh: Option<String>,
    pub name_en: Option<String>,
}

impl CatalogEntry {
    pub fn new(hex: NormalizedHex, brand: BrandId, code: impl Into<String>) -> Self {
        Self {
            hex,
            brand,
            code: code.into(),
            name_zh: None,
            name_en: None,
        }
    }

    pub fn with_names(mut self, name_zh: Option<&str>, name_en: Option<&str>) -> Self {
        self.name_zh = name_zh.map(str::to_string);
        self.name_en = name_en.map(str::to_string);
        self
    }

    pub fn key(&self) -> ColorKey {
        ColorKey::new(self.hex.clone(), self.brand.clone())
    }
}

/// Read-only `(hex, brand) -> code` index over every brand palette.
///
/// Integrity problems (two codes for one color, or one code for two colors
/// within a brand) are rejected by [`CatalogIndex::build`]; lookups never fail
/// for data reasons.
#[derive(Debug, Default)]
pub struct CatalogIndex {
    by_key: HashMap<ColorKey, CatalogEntry>,
    /// Per brand, keys in natural code order.
    by_brand: BTreeMap<BrandId, Vec<ColorKey>>,
}

impl CatalogIndex {
    pub fn build(entries: impl IntoIterator<Item = CatalogEntry>) -> Result<Self, CoreError> {
        let mut by_key: HashMap<ColorKey, CatalogEntry> = HashMap::new();
        let mut codes: HashMap<(BrandId, String), NormalizedHex> = HashMap::new();

        for entry in entries {
            let key = entry.key();
            if by_key.contains_key(&key) {
                return Err(CoreError::DuplicateCatalogEntry {
                    hex: key.hex.to_string(),
                    brand: key.brand.to_string(),
                });
            }
            if let Some(first) = codes.insert((entry.brand.clone(), entry.code.clone()), entry.hex.clone()) {
                return Err(CoreError::DuplicateCatalogCode {
                    brand: entry.brand.to_string(),
                    code: entry.code.clone(),
                    first: first.to_string(),
                    second: entry.hex.to_string(),
                });
            }
            by_key.insert(key, entry);
        }

        let mut by_brand: BTreeMap<BrandId, Vec<ColorKey>> = BTreeMap::new();
        for key in by_key.keys() {
            by_brand.entry(key.brand.clone()).or_default().push(key.clone());
        }
        for keys in by_brand.values_mut() {
            keys.sort_by(|a, b| compare_codes(&by_key[a].code, &by_key[b].code));
        }

        Ok(Self { by_key, by_brand })
    }

    pub fn lookup(&self, hex: &NormalizedHex, brand: &BrandId) -> Option<&str> {
        self.get(&ColorKey::new(hex.clone(), brand.clone()))
            .map(|e| e.code.as_str())
    }

    pub fn get(&self, key: &ColorKey) -> Option<&CatalogEntry> {
        self.by_key.get(key)
    }

    pub fn contains(&self, key: &ColorKey) -> bool {
        self.by_key.contains_key(key)
    }

    pub fn entries_for_brand<'a>(&'a self, brand: &BrandId) -> impl Iterator<Item = &'a CatalogEntry> + 'a {
        self.by_brand
            .get(brand)
            .into_iter()
            .flatten()
            .filter_map(|key| self.by_key.get(key))
    }

    pub fn brands(&self) -> impl Iterator<Item = &BrandId> {
        self.by_brand.keys()
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}
