use beadstash_core::{
    identity::{OverridePatch, Patch},
    ids::UserId,
    visibility::HideTarget,
};
use beadstash_engine::{
    EngineConfig, EngineError, InventoryQuery, InventoryView, SortMode, StockFilter,
};
use beadstash_harness::TestShop;
use beadstash_storage::Storage;

fn codes(listing: &beadstash_engine::InventoryListing) -> Vec<String> {
    listing.lines().iter().map(|l| l.identity.code.clone()).collect()
}

fn by_code() -> InventoryQuery {
    InventoryQuery {
        sort: SortMode::ByCode,
        ..Default::default()
    }
}

// ============================================================================
// Hiding
// ============================================================================

#[test]
fn family_and_code_hides_are_independent() -> Result<(), Box<dyn std::error::Error>> {
    let mut shop = TestShop::new()?;
    shop.select("MARD")?;
    let family = HideTarget::Family("A".into());
    let code = HideTarget::Code("A1".into());

    shop.engine.set_hidden(shop.user, &family, true)?;
    shop.engine.set_hidden(shop.user, &code, true)?;
    let listing = shop.engine.list_visible_inventory(shop.user, &by_code())?;
    assert!(codes(&listing).iter().all(|c| !c.starts_with('A')));

    // unhiding the family leaves A1 hidden on its own
    shop.engine.set_hidden(shop.user, &family, false)?;
    let listing = shop.engine.list_visible_inventory(shop.user, &by_code())?;
    let visible = codes(&listing);
    assert!(!visible.contains(&"A1".to_string()));
    assert!(visible.contains(&"A2".to_string()));

    shop.engine.set_hidden(shop.user, &code, false)?;
    let listing = shop.engine.list_visible_inventory(shop.user, &by_code())?;
    assert!(codes(&listing).contains(&"A1".to_string()));
    Ok(())
}

#[test]
fn hiding_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
    let mut shop = TestShop::new()?;
    let target = HideTarget::Family("B".into());

    assert!(shop.engine.set_hidden(shop.user, &target, true)?);
    assert!(!shop.engine.set_hidden(shop.user, &target, true)?);
    assert_eq!(shop.engine.hidden_entries(shop.user)?.len(), 1);

    assert!(shop.engine.set_hidden(shop.user, &target, false)?);
    assert!(!shop.engine.set_hidden(shop.user, &target, false)?);
    assert!(shop.engine.hidden_entries(shop.user)?.is_empty());
    Ok(())
}

#[test]
fn empty_hide_target_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let mut shop = TestShop::new()?;
    let err = shop
        .engine
        .set_hidden(shop.user, &HideTarget::Code("  ".into()), true)
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
    Ok(())
}

#[test]
fn hiding_keeps_inventory() -> Result<(), Box<dyn std::error::Error>> {
    let mut shop = TestShop::new()?;
    shop.select("MARD")?;
    shop.set("#ff0000", "MARD", 12)?;
    let red = shop.key("#ff0000", "MARD")?;

    shop.engine
        .set_hidden(shop.user, &HideTarget::Family("R".into()), true)?;
    let listing = shop.engine.list_visible_inventory(shop.user, &by_code())?;
    assert!(!codes(&listing).contains(&"R3".to_string()));

    let stored = shop.engine.storage().get_inventory(shop.user, &red)?;
    assert_eq!(stored.map(|r| r.quantity), Some(12));

    shop.engine
        .set_hidden(shop.user, &HideTarget::Family("R".into()), false)?;
    let listing = shop.engine.list_visible_inventory(shop.user, &by_code())?;
    let red_line = listing
        .lines()
        .into_iter()
        .find(|l| l.identity.code == "R3")
        .map(|l| l.quantity);
    assert_eq!(red_line, Some(12));
    Ok(())
}

#[test]
fn hiding_follows_the_display_code() -> Result<(), Box<dyn std::error::Error>> {
    let mut shop = TestShop::new()?;
    shop.select("MARD")?;
    let red = shop.key("#ff0000", "MARD")?;
    shop.engine.upsert_override(
        shop.user,
        &red,
        OverridePatch {
            custom_code: Patch::Set("Z1".into()),
            ..Default::default()
        },
    )?;

    shop.engine
        .set_hidden(shop.user, &HideTarget::Family("R".into()), true)?;
    let listing = shop.engine.list_visible_inventory(shop.user, &by_code())?;
    assert!(codes(&listing).contains(&"Z1".to_string()));

    shop.engine
        .set_hidden(shop.user, &HideTarget::Code("Z1".into()), true)?;
    let listing = shop.engine.list_visible_inventory(shop.user, &by_code())?;
    assert!(!codes(&listing).contains(&"Z1".to_string()));
    Ok(())
}

#[test]
fn hidden_state_is_per_user() -> Result<(), Box<dyn std::error::Error>> {
    let mut shop = TestShop::new()?;
    let other = UserId::new();
    let brand = shop.brand("MARD")?;
    shop.select("MARD")?;
    shop.engine.select_brands(other, &[brand])?;

    shop.engine
        .set_hidden(shop.user, &HideTarget::Family("A".into()), true)?;
    let theirs = shop.engine.list_visible_inventory(other, &by_code())?;
    assert!(codes(&theirs).contains(&"A1".to_string()));
    Ok(())
}

// ============================================================================
// Ordering and grouping
// ============================================================================

#[test]
fn families_order_by_total_then_name() -> Result<(), Box<dyn std::error::Error>> {
    let mut shop = TestShop::new()?;
    shop.select("MARD")?;
    // A = 30 + 10, B = 25 + 15, H = 40, R = 0
    shop.set("#fff5cc", "MARD", 30)?;
    shop.set("#ffe680", "MARD", 10)?;
    shop.set("#cce5ff", "MARD", 25)?;
    shop.set("#3399ff", "MARD", 15)?;
    shop.set("#000000", "MARD", 40)?;

    let query = InventoryQuery {
        group_by_family: true,
        ..Default::default()
    };
    let listing = shop.engine.list_visible_inventory(shop.user, &query)?;
    let InventoryView::Grouped(groups) = &listing.view else {
        panic!("expected grouped view");
    };
    let families: Vec<&str> = groups.iter().map(|g| g.family.as_str()).collect();
    assert_eq!(families, vec!["A", "B", "H", "R"]);

    let a_lines: Vec<&str> = groups[0].lines.iter().map(|l| l.identity.code.as_str()).collect();
    assert_eq!(a_lines, vec!["A1", "A2", "A3", "A9", "A10"]);
    assert_eq!(groups[0].stats.total_quantity, 40);
    assert_eq!(groups[0].stats.out_of_stock, 3);
    Ok(())
}

#[test]
fn code_sort_is_numeric_aware() -> Result<(), Box<dyn std::error::Error>> {
    let mut shop = TestShop::new()?;
    shop.select("MARD")?;
    let query = InventoryQuery {
        sort: SortMode::ByCode,
        search: Some("a".into()),
        ..Default::default()
    };
    let listing = shop.engine.list_visible_inventory(shop.user, &query)?;
    let visible = codes(&listing);
    let a9 = visible.iter().position(|c| c == "A9");
    let a10 = visible.iter().position(|c| c == "A10");
    assert!(a9.is_some() && a9 < a10);
    Ok(())
}

// ============================================================================
// Filtering and stats
// ============================================================================

#[test]
fn virtual_lines_for_selected_brand() -> Result<(), Box<dyn std::error::Error>> {
    let mut shop = TestShop::new()?;
    shop.select("COCO")?;
    let listing = shop.engine.list_visible_inventory(shop.user, &by_code())?;
    assert_eq!(codes(&listing), vec!["E12", "H1"]);
    assert!(listing.lines().iter().all(|l| l.is_virtual() && l.quantity == 0));
    assert_eq!(listing.stats.out_of_stock, 2);
    Ok(())
}

#[test]
fn stock_filter_keeps_overall_stats() -> Result<(), Box<dyn std::error::Error>> {
    let config = EngineConfig {
        low_stock_max: 5,
        ..Default::default()
    };
    let mut shop = TestShop::with_config(config)?;
    shop.select("COCO")?;
    shop.set("#ff0000", "COCO", 3)?;
    shop.set("#000000", "COCO", 50)?;

    let query = InventoryQuery {
        stock: StockFilter::LowStock,
        ..by_code()
    };
    let listing = shop.engine.list_visible_inventory(shop.user, &query)?;
    assert_eq!(codes(&listing), vec!["E12"]);
    assert_eq!(listing.stats.total, 2);
    assert_eq!(listing.stats.low_stock, 1);
    assert_eq!(listing.stats.in_stock, 1);
    assert_eq!(listing.stats.total_quantity, 53);
    Ok(())
}

#[test]
fn search_matches_names_and_piece_labels() -> Result<(), Box<dyn std::error::Error>> {
    let mut shop = TestShop::new()?;
    shop.select("MARD")?;
    let black = shop.key("#000000", "MARD")?;
    shop.engine
        .upsert_override(shop.user, &black, OverridePatch::piece_id("Shelf 4"))?;

    let query = |s: &str| InventoryQuery {
        search: Some(s.into()),
        ..by_code()
    };
    let found = shop.engine.list_visible_inventory(shop.user, &query("大红"))?;
    assert_eq!(codes(&found), vec!["R3"]);
    let found = shop.engine.list_visible_inventory(shop.user, &query("shelf"))?;
    assert_eq!(codes(&found), vec!["H7"]);
    let found = shop.engine.list_visible_inventory(shop.user, &query("MUSTARD"))?;
    assert_eq!(codes(&found), vec!["A10"]);
    Ok(())
}

#[test]
fn explicit_brand_filter_overrides_selection() -> Result<(), Box<dyn std::error::Error>> {
    let mut shop = TestShop::new()?;
    shop.select("MARD")?;
    let query = InventoryQuery {
        brands: vec![shop.brand("COCO")?],
        ..by_code()
    };
    let listing = shop.engine.list_visible_inventory(shop.user, &query)?;
    assert_eq!(codes(&listing), vec!["E12", "H1"]);
    Ok(())
}

#[test]
fn unresolvable_custom_line_is_left_out() -> Result<(), Box<dyn std::error::Error>> {
    let mut shop = TestShop::new()?;
    shop.select("MARD")?;
    let teal = shop.key("#008080", "MARD")?;
    shop.engine.add_to_inventory(shop.user, &teal, 4, true)?;

    let has_teal = |listing: &beadstash_engine::InventoryListing| {
        listing.lines().iter().any(|l| l.key == teal)
    };

    // no override: the rest of the list still renders
    let listing = shop.engine.list_visible_inventory(shop.user, &by_code())?;
    assert_eq!(listing.lines().len(), 9);
    assert!(!has_teal(&listing));
    assert_eq!(listing.stats.total, 9);

    // a partial override is not enough
    shop.engine
        .upsert_override(shop.user, &teal, OverridePatch::piece_id("jar"))?;
    let listing = shop.engine.list_visible_inventory(shop.user, &by_code())?;
    assert!(!has_teal(&listing));

    shop.engine.upsert_override(
        shop.user,
        &teal,
        OverridePatch {
            custom_code: Patch::Set("T1".into()),
            custom_hex_color: Patch::Set(teal.hex.clone()),
            ..Default::default()
        },
    )?;
    let listing = shop.engine.list_visible_inventory(shop.user, &by_code())?;
    assert_eq!(listing.lines().len(), 10);
    let line = listing
        .lines()
        .into_iter()
        .find(|l| l.key == teal)
        .cloned()
        .ok_or("teal line missing")?;
    assert_eq!(line.identity.code, "T1");
    assert_eq!(line.identity.piece_label, "jar");
    assert_eq!(line.quantity, 4);
    assert!(line.is_custom_color);
    assert_eq!(line.family, "T");
    Ok(())
}
