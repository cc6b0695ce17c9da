use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use beadstash_core::{
    code::{compare_codes, family_of},
    color::{BrandId, ColorKey},
    identity::DisplayIdentity,
    ids::InventoryId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockLevel {
    InStock,
    LowStock,
    OutOfStock,
}

impl StockLevel {
    pub fn of(quantity: u32, low_stock_max: u32) -> Self {
        match quantity {
            0 => Self::OutOfStock,
            q if q <= low_stock_max => Self::LowStock,
            _ => Self::InStock,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockFilter {
    #[default]
    All,
    InStock,
    LowStock,
    OutOfStock,
}

impl StockFilter {
    pub fn accepts(&self, level: StockLevel) -> bool {
        match self {
            Self::All => true,
            Self::InStock => level == StockLevel::InStock,
            Self::LowStock => level == StockLevel::LowStock,
            Self::OutOfStock => level == StockLevel::OutOfStock,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    #[default]
    ByQuantity,
    ByCode,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryQuery {
    /// Empty means the user's selected brands.
    pub brands: Vec<BrandId>,
    pub search: Option<String>,
    pub stock: StockFilter,
    pub sort: SortMode,
    pub group_by_family: bool,
}

/// One resolved, visible line. Virtual lines have no stored record yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryLine {
    pub key: ColorKey,
    pub record_id: Option<InventoryId>,
    pub quantity: u32,
    pub is_custom_color: bool,
    pub identity: DisplayIdentity,
    pub family: String,
    pub stock: StockLevel,
}

impl InventoryLine {
    pub fn new(
        key: ColorKey,
        record_id: Option<InventoryId>,
        quantity: u32,
        is_custom_color: bool,
        identity: DisplayIdentity,
        low_stock_max: u32,
    ) -> Self {
        let family = family_of(&identity.code).to_string();
        Self {
            key,
            record_id,
            quantity,
            is_custom_color,
            identity,
            family,
            stock: StockLevel::of(quantity, low_stock_max),
        }
    }

    pub fn is_virtual(&self) -> bool {
        self.record_id.is_none()
    }

    /// Case-insensitive substring match over code, piece label, names and hex.
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        let id = &self.identity;
        [
            Some(id.code.as_str()),
            Some(id.piece_label.as_str()),
            id.name_zh.as_deref(),
            id.name_en.as_deref(),
            Some(id.hex_color.as_str()),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StockStats {
    pub total: usize,
    pub in_stock: usize,
    pub low_stock: usize,
    pub out_of_stock: usize,
    pub total_quantity: u64,
}

impl StockStats {
    pub fn of<'a>(lines: impl IntoIterator<Item = &'a InventoryLine>) -> Self {
        let mut stats = Self::default();
        for line in lines {
            stats.total += 1;
            stats.total_quantity += u64::from(line.quantity);
            match line.stock {
                StockLevel::InStock => stats.in_stock += 1,
                StockLevel::LowStock => stats.low_stock += 1,
                StockLevel::OutOfStock => stats.out_of_stock += 1,
            }
        }
        stats
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FamilyGroup {
    pub family: String,
    pub stats: StockStats,
    pub lines: Vec<InventoryLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InventoryView {
    Flat(Vec<InventoryLine>),
    Grouped(Vec<FamilyGroup>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryListing {
    /// Counts over every visible, search-matching line before the stock filter.
    pub stats: StockStats,
    pub view: InventoryView,
}

impl InventoryListing {
    /// All lines in display order, whichever view was requested.
    pub fn lines(&self) -> Vec<&InventoryLine> {
        match &self.view {
            InventoryView::Flat(lines) => lines.iter().collect(),
            InventoryView::Grouped(groups) => groups.iter().flat_map(|g| g.lines.iter()).collect(),
        }
    }
}

pub fn group(lines: Vec<InventoryLine>) -> BTreeMap<String, Vec<InventoryLine>> {
    let mut groups: BTreeMap<String, Vec<InventoryLine>> = BTreeMap::new();
    for line in lines {
        groups.entry(line.family.clone()).or_default().push(line);
    }
    groups
}

pub fn family_total(lines: &[InventoryLine]) -> u64 {
    lines.iter().map(|l| u64::from(l.quantity)).sum()
}

/// Families by descending total quantity, ties by ascending name.
pub fn sort_families(groups: &BTreeMap<String, Vec<InventoryLine>>) -> Vec<String> {
    let mut totals: Vec<(&String, u64)> = groups
        .iter()
        .map(|(family, lines)| (family, family_total(lines)))
        .collect();
    totals.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    totals.into_iter().map(|(family, _)| family.clone()).collect()
}

fn compare_lines(a: &InventoryLine, b: &InventoryLine, mode: SortMode) -> Ordering {
    let by_code = || {
        compare_codes(&a.identity.code, &b.identity.code).then_with(|| a.key.cmp(&b.key))
    };
    match mode {
        SortMode::ByQuantity => b.quantity.cmp(&a.quantity).then_with(by_code),
        SortMode::ByCode => by_code(),
    }
}

pub fn sort_lines(lines: &mut [InventoryLine], mode: SortMode) {
    lines.sort_by(|a, b| compare_lines(a, b, mode));
}

/// Orders already-filtered lines into the requested view.
pub fn arrange(lines: Vec<InventoryLine>, sort: SortMode, group_by_family: bool) -> InventoryView {
    if !group_by_family {
        let mut lines = lines;
        sort_lines(&mut lines, sort);
        return InventoryView::Flat(lines);
    }

    let mut groups = group(lines);
    let order = sort_families(&groups);
    let mut result = Vec::with_capacity(order.len());
    for family in order {
        if let Some(mut lines) = groups.remove(&family) {
            sort_lines(&mut lines, sort);
            result.push(FamilyGroup {
                stats: StockStats::of(&lines),
                family,
                lines,
            });
        }
    }
    InventoryView::Grouped(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use beadstash_core::color::NormalizedHex;

    fn line(code: &str, quantity: u32) -> InventoryLine {
        let hex = NormalizedHex::parse(&format!("{:06x}", code.len() as u32 * 4096 + quantity)).unwrap();
        let key = ColorKey::new(hex.clone(), BrandId::parse("MARD").unwrap());
        let identity = DisplayIdentity {
            code: code.to_string(),
            hex_color: hex,
            piece_label: code.to_string(),
            notes: None,
            name_zh: None,
            name_en: None,
        };
        InventoryLine::new(key, Some(InventoryId::new()), quantity, false, identity, 10)
    }

    fn codes(lines: &[InventoryLine]) -> Vec<&str> {
        lines.iter().map(|l| l.identity.code.as_str()).collect()
    }

    #[test]
    fn stock_levels() {
        assert_eq!(StockLevel::of(0, 10), StockLevel::OutOfStock);
        assert_eq!(StockLevel::of(1, 10), StockLevel::LowStock);
        assert_eq!(StockLevel::of(10, 10), StockLevel::LowStock);
        assert_eq!(StockLevel::of(11, 10), StockLevel::InStock);
    }

    #[test]
    fn families_by_total_then_name() {
        let lines = vec![
            line("C1", 10),
            line("B1", 25),
            line("A1", 30),
            line("B2", 15),
            line("A2", 10),
        ];
        let groups = group(lines);
        assert_eq!(sort_families(&groups), vec!["A", "B", "C"]);

        let lines = vec![line("B1", 40), line("C1", 10), line("A1", 40)];
        assert_eq!(sort_families(&group(lines)), vec!["A", "B", "C"]);
    }

    #[test]
    fn by_code_is_numeric_aware() {
        let mut lines = vec![line("A10", 1), line("A9", 1), line("A1", 1)];
        sort_lines(&mut lines, SortMode::ByCode);
        assert_eq!(codes(&lines), vec!["A1", "A9", "A10"]);
    }

    #[test]
    fn by_quantity_breaks_ties_by_code() {
        let mut lines = vec![line("A10", 5), line("A9", 5), line("A2", 7)];
        sort_lines(&mut lines, SortMode::ByQuantity);
        assert_eq!(codes(&lines), vec!["A2", "A9", "A10"]);
    }

    #[test]
    fn grouped_view_carries_family_stats() {
        let lines = vec![line("A1", 0), line("A2", 12), line("B1", 3), line("77", 1)];
        let InventoryView::Grouped(groups) = arrange(lines, SortMode::ByCode, true) else {
            panic!("expected grouped view");
        };
        let families: Vec<&str> = groups.iter().map(|g| g.family.as_str()).collect();
        assert_eq!(families, vec!["A", "B", "Other"]);
        assert_eq!(groups[0].stats.out_of_stock, 1);
        assert_eq!(groups[0].stats.in_stock, 1);
        assert_eq!(groups[0].stats.total_quantity, 12);
        assert_eq!(groups[1].stats.low_stock, 1);
    }

    #[test]
    fn search_is_case_insensitive() {
        let mut l = line("R3", 1);
        l.identity.name_en = Some("Cherry Red".into());
        assert!(l.matches_search("cherry"));
        assert!(l.matches_search("r3"));
        assert!(l.matches_search("  "));
        assert!(!l.matches_search("blue"));
    }
}
