use configuration::{load_settings, error::ConfigError};
use core_types::{BucketFill, RecencyReference};
use std::io::Write;
use std::path::PathBuf;
use tempfile::Builder;

fn toml_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn file_values_override_defaults() {
    let file = toml_file(
        r#"
[dataset]
path = "data/orders.csv"
delimiter = ";"

[analysis]
bucket_fill = "sparse"
recency_reference = "dataset"

[display]
top_n = 3
"#,
    );

    let settings = load_settings(Some(file.path())).unwrap();
    assert_eq!(settings.dataset.path, PathBuf::from("data/orders.csv"));
    assert_eq!(settings.dataset.delimiter_byte().unwrap(), b';');
    assert_eq!(settings.analysis.bucket_fill, BucketFill::Sparse);
    assert_eq!(settings.analysis.recency_reference, RecencyReference::Dataset);
    assert_eq!(settings.display.top_n, 3);
    // Untouched keys keep their defaults.
    assert_eq!(settings.display.rfm_top_n, 5);
    assert_eq!(settings.display.currency, "BRL");
}

#[test]
fn unknown_policy_name_fails_to_load() {
    let file = toml_file("[analysis]\nbucket_fill = \"weekly\"\n");
    let err = load_settings(Some(file.path())).unwrap_err();
    assert!(matches!(err, ConfigError::LoadError(_)));
}

#[test]
fn invalid_values_fail_validation() {
    let file = toml_file("[display]\ntop_n = 0\n");
    let err = load_settings(Some(file.path())).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationError(_)));
}

#[test]
fn explicit_missing_file_is_an_error() {
    let err = load_settings(Some(std::path::Path::new("/no/such/dashboard.toml"))).unwrap_err();
    assert!(matches!(err, ConfigError::LoadError(_)));
}
