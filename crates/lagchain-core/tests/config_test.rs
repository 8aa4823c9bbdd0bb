use lagchain_core::config::*;
use lagchain_core::errors::ConfigError;

#[test]
fn config_loads_from_empty_toml_with_all_defaults() {
    let config = AnalysisConfig::from_toml("").unwrap();

    // Alignment defaults
    assert_eq!(config.alignment.lag_min, -12);
    assert_eq!(config.alignment.lag_max, 24);
    assert_eq!(config.alignment.boot_n, 500);
    assert_eq!(config.alignment.seed, 13);
    assert_eq!(config.alignment.reference_lag, -1);
    assert_eq!(config.alignment.lags().len(), 37);

    // Null model defaults
    assert_eq!(config.null_model.block_size, 12);
    assert_eq!(config.null_model.n_shuffles, 1);
    assert_eq!(config.null_model.block_scheme, BlockScheme::TimeAligned);

    // Stability defaults
    assert_eq!(config.stability.window, 36);
    assert_eq!(config.stability.step, 6);
    assert_eq!(config.stability.ridge, 1e-6);

    // Anchor defaults
    assert_eq!(config.anchors.lag_pre, 6);
    assert_eq!(config.anchors.lag_post, 24);

    assert_eq!(config.simulation.initial_state, InitialStatePolicy::Observed);
    assert!(config.simulation.parallel);
    assert_eq!(config.observability.log_level, "info");
}

#[test]
fn config_loads_partial_toml_with_overrides() {
    let toml = r#"
[alignment]
lag_min = -3
lag_max = 5
trigger_flag = "E_active"

[null_model]
block_scheme = "positional"

[simulation]
initial_state = "baseline"
"#;
    let config = AnalysisConfig::from_toml(toml).unwrap();
    assert_eq!(config.alignment.lags(), (-3..=5).collect::<Vec<_>>());
    assert_eq!(config.alignment.trigger_flag, "E_active");
    assert_eq!(config.alignment.boot_n, 500);
    assert_eq!(config.null_model.block_scheme, BlockScheme::Positional);
    assert_eq!(config.simulation.initial_state, InitialStatePolicy::Baseline);
}

#[test]
fn inverted_lag_window_names_field() {
    let err = AnalysisConfig::from_toml("[alignment]\nlag_min = 4\nlag_max = 1\n").unwrap_err();
    match err {
        ConfigError::ValidationFailed { field, .. } => assert_eq!(field, "alignment.lag_min"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn zero_block_size_is_rejected() {
    let err = AnalysisConfig::from_toml("[null_model]\nblock_size = 0\n").unwrap_err();
    assert!(matches!(err, ConfigError::ValidationFailed { ref field, .. } if field == "null_model.block_size"));
}

#[test]
fn config_survives_toml_rewrite() {
    let mut config = AnalysisConfig::default();
    config.stability.window = 24;
    config.alignment.response_columns = vec!["E".to_string()];
    let again = AnalysisConfig::from_toml(&config.to_toml().unwrap()).unwrap();
    assert_eq!(again.stability.window, 24);
    assert_eq!(again.alignment.response_columns, vec!["E".to_string()]);
}

#[test]
fn edge_pairs_load_in_order_with_per_pair_seeds() {
    let toml = r#"
[alignment]
seed = 100

[[alignment.edge_pairs]]
flag = "A_low"
response = "B"

[[alignment.edge_pairs]]
flag = "B_on"
response = "C"
"#;
    let config = AnalysisConfig::from_toml(toml).unwrap();
    assert_eq!(
        config.alignment.edge_pairs,
        vec![EdgePair::new("A_low", "B"), EdgePair::new("B_on", "C")]
    );
    assert_eq!(config.alignment.pair_seed(0), 100);
    assert_eq!(config.alignment.pair_seed(1), 101);

    let again = AnalysisConfig::from_toml(&config.to_toml().unwrap()).unwrap();
    assert_eq!(again.alignment.edge_pairs, config.alignment.edge_pairs);
}

#[test]
fn duplicate_edge_pair_is_rejected() {
    let mut config = AnalysisConfig::default();
    config.alignment.edge_pairs = vec![EdgePair::new("A_low", "B"), EdgePair::new("A_low", "B")];
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ValidationFailed { ref field, .. }) if field == "alignment.edge_pairs"
    ));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    assert!(matches!(
        AnalysisConfig::from_toml("[alignment"),
        Err(ConfigError::ParseError { .. })
    ));
}
