//! Integration tests for output-file discovery.

use std::fs;

use lisagg_io::{BindingMatcher, Bindings, discover_variables};
use tempfile::tempdir;

fn bindings() -> Bindings {
    [
        ("DischargeMaps", vec!["$(PathOut)/dis.nc"]),
        ("TotalRunoffMaps", vec!["$(PathOut)/runoff*"]),
        ("LZEnd", vec!["$(PathOut)/lz"]),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.into_iter().map(String::from).collect()))
    .collect()
}

#[test]
fn maps_files_to_bound_variables() {
    let dir = tempdir().unwrap();
    for name in ["dis.nc", "runoff_2020.nc", "lz.nc", "unbound.nc", "dis.csv"] {
        fs::write(dir.path().join(name), b"").unwrap();
    }

    let matcher = BindingMatcher::new(&bindings()).unwrap();
    let found = discover_variables(dir.path(), &matcher, &["LZEnd".to_string()]).unwrap();

    let names: Vec<_> = found.keys().cloned().collect();
    assert_eq!(names, vec!["DischargeMaps", "TotalRunoffMaps"]);
    assert_eq!(found["DischargeMaps"], dir.path().join("dis.nc"));
    assert_eq!(found["TotalRunoffMaps"], dir.path().join("runoff_2020.nc"));
}

#[test]
fn first_file_wins_for_duplicate_bindings() {
    let dir = tempdir().unwrap();
    for name in ["runoff_b.nc", "runoff_a.nc"] {
        fs::write(dir.path().join(name), b"").unwrap();
    }
    let matcher = BindingMatcher::new(&bindings()).unwrap();
    let found = discover_variables(dir.path(), &matcher, &[]).unwrap();
    assert_eq!(found["TotalRunoffMaps"], dir.path().join("runoff_a.nc"));
}

#[test]
fn missing_directory() {
    let dir = tempdir().unwrap();
    let matcher = BindingMatcher::new(&bindings()).unwrap();
    assert!(discover_variables(&dir.path().join("absent"), &matcher, &[]).is_err());
}
