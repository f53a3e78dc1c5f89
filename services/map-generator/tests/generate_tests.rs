//! Full generator runs against temporary output directories.

use map_generator::catalog::{MANUFACTURER_FILE, SUPPLY_CHAIN_FILE};
use map_generator::runner::exit_status;
use map_generator::{generate, Edition, GeneratorConfig, MapKind};
use renderer::{probe, render_map, Backend, BackendKind, FontSet};
use std::path::Path;
use test_utils::{feature_dir, png_info};

// Low resolution keeps the runs fast
const DPI: u32 = 20;

fn config(output_dir: &Path) -> GeneratorConfig {
    GeneratorConfig {
        output_dir: output_dir.to_path_buf(),
        dpi: DPI,
        ..GeneratorConfig::default()
    }
}

#[test]
fn test_basic_run_writes_both_maps() {
    let out = tempfile::tempdir().unwrap();
    let results = generate(Edition::Full, &config(out.path())).unwrap();

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.backend == BackendKind::Basic));

    let supply = std::fs::read(out.path().join(SUPPLY_CHAIN_FILE)).unwrap();
    let info = png_info(&supply).unwrap();
    assert_eq!((info.width, info.height), (280, 200));
    assert_eq!(info.dpi(), Some(DPI));

    let manufacturer = std::fs::read(out.path().join(MANUFACTURER_FILE)).unwrap();
    let info = png_info(&manufacturer).unwrap();
    assert_eq!((info.width, info.height), (240, 200));
    assert_eq!(results[1].bytes, manufacturer.len());
}

#[test]
fn test_enhanced_only_for_supply_chain_map() {
    let out = tempfile::tempdir().unwrap();
    let features = feature_dir();
    let config = GeneratorConfig {
        features_dir: Some(features.path().to_path_buf()),
        ..config(out.path())
    };

    let results = generate(Edition::Full, &config).unwrap();
    assert_eq!(results[0].backend, BackendKind::Enhanced);
    assert_eq!(results[1].backend, BackendKind::Basic);
}

#[test]
fn test_simple_edition_never_probes() {
    let out = tempfile::tempdir().unwrap();
    let features = feature_dir();
    let config = GeneratorConfig {
        features_dir: Some(features.path().to_path_buf()),
        ..config(out.path())
    };

    let results = generate(Edition::Simple, &config).unwrap();
    assert!(results.iter().all(|r| r.backend == BackendKind::Basic));
}

#[test]
fn test_missing_features_fall_back_to_basic() {
    let out = tempfile::tempdir().unwrap();
    let config = GeneratorConfig {
        features_dir: Some(out.path().join("no-such-dir")),
        ..config(out.path())
    };

    let results = generate(Edition::Full, &config).unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].backend, BackendKind::Basic);
    assert!(out.path().join(SUPPLY_CHAIN_FILE).exists());
    assert!(out.path().join(MANUFACTURER_FILE).exists());
}

#[test]
fn test_force_basic_changes_pixels_not_size() {
    let features = feature_dir();
    let enhanced_out = tempfile::tempdir().unwrap();
    let basic_out = tempfile::tempdir().unwrap();

    let enhanced = GeneratorConfig {
        features_dir: Some(features.path().to_path_buf()),
        maps: vec![MapKind::SupplyChain],
        ..config(enhanced_out.path())
    };
    let basic = GeneratorConfig {
        force_basic: true,
        ..enhanced.clone()
    };
    let basic = GeneratorConfig {
        output_dir: basic_out.path().to_path_buf(),
        ..basic
    };

    let e = generate(Edition::Full, &enhanced).unwrap();
    let b = generate(Edition::Full, &basic).unwrap();
    assert_eq!(e[0].backend, BackendKind::Enhanced);
    assert_eq!(b[0].backend, BackendKind::Basic);
    assert_eq!((e[0].width, e[0].height), (b[0].width, b[0].height));

    let e_pixels = image::open(&e[0].path).unwrap().to_rgba8();
    let b_pixels = image::open(&b[0].path).unwrap().to_rgba8();
    assert_ne!(e_pixels.as_raw(), b_pixels.as_raw());
}

#[test]
fn test_supply_chain_points_ignore_backend() {
    let features = feature_dir();
    let fonts = FontSet::embedded().unwrap();
    let doc = MapKind::SupplyChain.document(Edition::Full);

    let basic = render_map(&doc, &Backend::Basic, &fonts, DPI).unwrap();
    let enhanced = render_map(&doc, &probe(Some(features.path())), &fonts, DPI).unwrap();

    assert_eq!(enhanced.backend, BackendKind::Enhanced);
    assert_eq!(basic.points.len(), 7);
    assert_eq!(basic.points, enhanced.points);
}

#[test]
fn test_output_is_deterministic() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();

    generate(Edition::Simple, &config(first.path())).unwrap();
    generate(Edition::Simple, &config(second.path())).unwrap();

    for file in [SUPPLY_CHAIN_FILE, MANUFACTURER_FILE] {
        let a = std::fs::read(first.path().join(file)).unwrap();
        let b = std::fs::read(second.path().join(file)).unwrap();
        assert_eq!(a, b, "{} differs between runs", file);
    }
}

#[test]
fn test_only_one_map() {
    let out = tempfile::tempdir().unwrap();
    let config = GeneratorConfig {
        maps: vec![MapKind::Manufacturer],
        ..config(out.path())
    };

    let results = generate(Edition::Full, &config).unwrap();
    assert_eq!(results.len(), 1);
    assert!(!out.path().join(SUPPLY_CHAIN_FILE).exists());
    assert!(out.path().join(MANUFACTURER_FILE).exists());
}

#[test]
fn test_unwritable_output_fails() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"file").unwrap();

    let err = generate(Edition::Full, &config(&blocker.join("maps"))).unwrap_err();
    assert!(format!("{:#}", err).contains(SUPPLY_CHAIN_FILE));
}

#[test]
fn test_exit_status_by_edition() {
    assert_eq!(exit_status(Edition::Full, true), 0);
    assert_eq!(exit_status(Edition::Full, false), 1);
    assert_eq!(exit_status(Edition::Simple, false), 0);
}

#[test]
fn test_missing_font_file_fails() {
    let out = tempfile::tempdir().unwrap();
    let config = GeneratorConfig {
        font: Some(out.path().join("missing.ttf")),
        ..config(out.path())
    };
    assert!(generate(Edition::Full, &config).is_err());
}
