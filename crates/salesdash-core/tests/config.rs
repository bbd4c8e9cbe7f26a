use std::collections::HashMap;
use std::path::PathBuf;

use salesdash_core::config::{DashboardConfig, BASE_URL_ENV, DATA_DIR_ENV, TOP_N_ENV};
use salesdash_core::source::{DataSource, DEFAULT_BASE_URL};
use salesdash_core::DashboardError;
use salesdash_parser::TableKind;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_point_at_published_dataset() {
    let config = DashboardConfig::default();

    assert_eq!(config.top_n, 10);
    assert_eq!(config.default_category, "All");
    assert_eq!(
        config.data_source(),
        DataSource::Remote {
            base_url: DEFAULT_BASE_URL.to_string()
        }
    );
    assert_eq!(
        config.data_source().location(TableKind::Payments),
        format!("{DEFAULT_BASE_URL}/order_payments_dataset.csv")
    );
}

#[test]
fn toml_fields_override_defaults() {
    let config = DashboardConfig::from_toml_str(
        r#"
            top_n = 5
            data_dir = "/srv/olist"
        "#,
    )
    .expect("config should parse");

    assert_eq!(config.top_n, 5);
    assert_eq!(config.base_url, DEFAULT_BASE_URL);
    assert_eq!(
        config.data_source(),
        DataSource::Directory(PathBuf::from("/srv/olist"))
    );
}

#[test]
fn environment_overrides_file() {
    let mut config = DashboardConfig::from_toml_str("top_n = 5").unwrap();

    config
        .apply_env(lookup(&[
            (TOP_N_ENV, "3"),
            (BASE_URL_ENV, "http://localhost:8080/data/"),
            (DATA_DIR_ENV, ""),
        ]))
        .expect("env overrides should apply");

    assert_eq!(config.top_n, 3);
    assert!(config.data_dir.is_none());
    assert_eq!(
        config.data_source().location(TableKind::Orders),
        "http://localhost:8080/data/orders_dataset.csv"
    );
}

#[test]
fn invalid_values_are_config_errors() {
    let mut config = DashboardConfig::default();
    let err = config
        .apply_env(lookup(&[(TOP_N_ENV, "ten")]))
        .expect_err("non-numeric top_n");
    assert!(matches!(err, DashboardError::Config(_)));

    let zero = DashboardConfig::from_toml_str("top_n = 0").unwrap();
    assert!(matches!(zero.validate(), Err(DashboardError::Config(_))));

    assert!(matches!(
        DashboardConfig::from_toml_str("top_n = \"many\""),
        Err(DashboardError::Config(_))
    ));
}
