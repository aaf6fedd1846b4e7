use std::path::PathBuf;

use dg_core::{CellSize, IncRange, Sides};
use dg_template::{GeneratorKind, TemplateError, export_floor, load_floor, load_map, load_named};
use proptest::prelude::*;

fn maps_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data/maps")
}

#[test]
fn test_load_dungeon_map() {
    let template = load_named(maps_dir(), "dungeon").unwrap();
    assert_eq!(template.name, "dungeon");
    assert_eq!(template.kind().unwrap(), GeneratorKind::Room);
    assert_eq!(template.width, IncRange::new(24, 32));
    assert_eq!(template.height, IncRange::new(20, 28));

    let names: Vec<&str> = template.cells.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["cell1x1", "cell1x2", "cell2x2", "cell2x3", "cell3x3"]
    );
    let big = &template.cells[4];
    assert_eq!(big.size, CellSize::new(3, 3));
    assert_eq!(big.maximum_count, Some(4));
    assert_eq!(big.weight, 0.5);
    assert_eq!(big.door_sides(), Sides::all());
}

#[test]
fn test_load_pascal_case_map() {
    let template = load_map(maps_dir().join("hall")).unwrap();
    assert_eq!(template.name, "hall");
    assert_eq!(template.width, IncRange::exactly(16));
    assert_eq!(template.tuning.extra_rooms.min_divisor, 10);
    assert_eq!(template.tuning.extra_links.max_divisor, 20);

    let tall = template
        .cells
        .iter()
        .find(|c| c.name == "cell1x4")
        .unwrap();
    assert_eq!(tall.weight, 2.0);
    // N at 0, E at 1..5, S at 5, W at 6..10; only the south entry is closed
    assert_eq!(tall.door_sides(), Sides::EAST | Sides::WEST);

    let config = template.to_config().unwrap();
    assert!(config.catalog.contains(CellSize::new(4, 1)));
}

#[test]
fn test_missing_map_dir() {
    let err = load_named(maps_dir(), "no-such-map").unwrap_err();
    assert!(matches!(err, TemplateError::Io { .. }));
}

#[test]
fn test_generate_and_export() {
    let template = load_named(maps_dir(), "dungeon").unwrap();
    let floor = template.generate(1234).unwrap();
    assert!(floor.is_connected());
    assert!(floor.unpaired_doors().is_empty());

    let path = std::env::temp_dir().join("dg_template_dungeon_floor.json");
    export_floor(&floor, &template.name, &path).unwrap();
    let loaded = load_floor(&path).unwrap();
    assert_eq!(loaded.header.map, "dungeon");
    assert_eq!(loaded.floor, floor);
    let _ = std::fs::remove_file(&path);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn hall_floors_are_sound(seed in any::<u64>()) {
        let template = load_named(maps_dir(), "hall").unwrap();
        let config = template.to_config().unwrap();
        let floor = template.generate(seed).unwrap();
        prop_assert!(floor.overlapping_cells().is_empty());
        prop_assert!(floor.unpaired_doors().is_empty());
        prop_assert!(floor.is_connected());
        for cell in &floor.cells {
            prop_assert!(config.catalog.contains(cell.size()));
        }
    }
}
