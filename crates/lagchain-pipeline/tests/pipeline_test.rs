//! End-to-end analysis runs on synthetic panels.

use lagchain_align::AlignMode;
use lagchain_core::config::{
    AlignmentConfig, AnalysisConfig, AnchorConfig, EdgePair, NullModelConfig, SimulationConfig, StabilityConfig,
};
use lagchain_core::errors::{ConfigValidationError, EventError, LagchainError, SchemaError};
use lagchain_core::series::{Panel, UnitId};
use lagchain_core::structural::{AblationSpec, Edge};
use lagchain_core::traits::{Cancellable, CancellationToken};
use lagchain_pipeline::pipeline::OBSERVED_RUN_TAG;
use lagchain_null::NullModelGenerator;
use lagchain_pipeline::AnalysisPipeline;
use test_fixtures::{
    load_text, pulse_config, pulse_panel, random_panel, skip_edge_config, unit_with_driver, KAPPA_AB, KAPPA_BC,
    KAPPA_CD, KAPPA_DE, PULSE_T, PULSE_UNIT,
};

fn pulse_analysis(parallel: bool) -> AnalysisConfig {
    AnalysisConfig {
        alignment: AlignmentConfig {
            lag_min: -2,
            lag_max: 8,
            boot_n: 20,
            seed: 13,
            reference_lag: -1,
            trigger_flag: "A_pulse".to_string(),
            response_columns: Vec::new(),
            edge_pairs: Vec::new(),
        },
        null_model: NullModelConfig {
            block_size: 6,
            n_shuffles: 4,
            ..Default::default()
        },
        stability: StabilityConfig {
            window: 10,
            step: 5,
            ridge: 1e-6,
        },
        anchors: AnchorConfig {
            lag_pre: 2,
            lag_post: 8,
            ..Default::default()
        },
        simulation: SimulationConfig {
            parallel,
            ..Default::default()
        },
        ..Default::default()
    }
}

fn pulse_pair() -> EdgePair {
    EdgePair::new("A_pulse", "E")
}

#[test]
fn pulse_reaches_terminal_after_four_transitions() {
    let pipeline = AnalysisPipeline::new(pulse_analysis(true), pulse_config()).unwrap();
    let report = pipeline.run(&pulse_panel(30)).unwrap();

    assert_eq!(report.onsets.len(), 1);
    assert_eq!(report.onsets[0].len(), 1);
    let expected = KAPPA_AB * KAPPA_BC * KAPPA_CD * KAPPA_DE;
    let full = report.simulated("Full_main").unwrap();
    for row in full.iter() {
        let e = row.value("E").unwrap();
        if row.unit == UnitId::from(PULSE_UNIT) && row.t == PULSE_T + 4 {
            assert!((e - expected).abs() < 1e-12);
        } else {
            assert_eq!(e, 0.0, "unit {} t {}", row.unit, row.t);
        }
    }

    let none_e = report.simulated("NoneE").unwrap();
    assert!(none_e.iter().all(|r| r.value("E") == Some(0.0)));

    // curve aligned on the single onset: the bump sits at lag 4
    let cf = report.curve(&pulse_pair(), "Full_main", AlignMode::Mean);
    let at_four = cf.iter().find(|p| p.lag == 4).unwrap();
    assert!((at_four.mean - expected).abs() < 1e-12);
    assert_eq!(at_four.n, 1);
}

#[test]
fn report_covers_every_scenario_and_phase() {
    let pipeline = AnalysisPipeline::new(pulse_analysis(true), pulse_config()).unwrap();
    let report = pipeline.run(&pulse_panel(30)).unwrap();
    let tags: Vec<&str> = pipeline.catalogue().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(tags, ["Full_main", "NoAtoB", "NoBtoC", "NoCtoD", "None", "NoDtoE", "NoneE"]);

    assert_eq!(report.simulated.len(), 7);
    assert_eq!(report.windows.len(), 7);
    assert_eq!(report.metrics.len(), 7);
    assert_eq!(report.paired.len(), 7 * 11);
    assert_eq!(report.null_curves.len(), 1);
    assert_eq!(report.null_curves[0].name, "null_A_pulse_E");
    assert_eq!(report.stability.len(), 5);
    assert!(report.stability.iter().all(|t| t.len() == 5));
    assert_eq!(report.operators.len(), 7);
    assert!(report.exclusions.is_empty());

    // observed downstream nodes are flat, so removing E's causes changes nothing
    let none_e = report.metrics_for(&pulse_pair(), "NoneE").unwrap();
    assert_eq!(none_e.delta_auc, 0.0);
    assert_eq!(none_e.lag_onset, None);
    let full = report.metrics_for(&pulse_pair(), "Full_main").unwrap();
    assert!((full.delta_auc + KAPPA_AB * KAPPA_BC * KAPPA_CD * KAPPA_DE).abs() < 1e-12);

    let observed = report.curve(&pulse_pair(), OBSERVED_RUN_TAG, AlignMode::CumulativeRebased);
    assert_eq!(observed.len(), 11);
    assert!(observed.iter().all(|p| p.mean == 0.0));
}

#[test]
fn reruns_are_byte_identical_across_scheduling() {
    let config = skip_edge_config();
    let panel = random_panel(17, 6, 90, &config);
    let mut analysis = pulse_analysis(true);
    analysis.alignment.trigger_flag = "A_low".to_string();
    analysis.alignment.response_columns = vec!["D".to_string(), "E".to_string()];
    analysis.anchors.lag_pre = 3;
    analysis.anchors.lag_post = 6;

    let parallel = AnalysisPipeline::new(analysis.clone(), config.clone()).unwrap();
    let first = parallel.run(&panel).unwrap();
    let second = parallel.run(&panel).unwrap();
    assert_eq!(first.fingerprints().unwrap(), second.fingerprints().unwrap());

    analysis.simulation.parallel = false;
    let sequential = AnalysisPipeline::new(analysis, config).unwrap().run(&panel).unwrap();
    assert_eq!(first.fingerprint().unwrap(), sequential.fingerprint().unwrap());
}

#[test]
fn no_onsets_anywhere_is_fatal() {
    let panel = Panel::from_units((0..3).map(|i| unit_with_driver(&format!("u{i}"), 0, vec![0.0; 20])));
    let err = AnalysisPipeline::new(pulse_analysis(false), pulse_config())
        .unwrap()
        .run(&panel)
        .unwrap_err();
    assert!(matches!(err, LagchainError::Event(EventError::NoEvents { units: 3, .. })));
}

#[test]
fn missing_columns_fail_before_any_work() {
    let mut analysis = pulse_analysis(false);
    analysis.alignment.trigger_flag = "Q".to_string();
    analysis.alignment.response_columns = vec!["E".to_string(), "Z".to_string()];
    let err = AnalysisPipeline::new(analysis, pulse_config())
        .unwrap()
        .run(&pulse_panel(12))
        .unwrap_err();
    match err {
        LagchainError::Schema(SchemaError::MissingColumns { columns, .. }) => {
            assert_eq!(columns, vec!["Q".to_string(), "Z".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_scenario_never_simulates() {
    let err = AnalysisPipeline::new(pulse_analysis(false), pulse_config())
        .unwrap()
        .with_catalogue(vec![AblationSpec::full(), AblationSpec::remove_edge(Edge::new("A", "E"))])
        .run(&pulse_panel(30))
        .unwrap_err();
    assert!(matches!(
        err,
        LagchainError::ConfigValidation(ConfigValidationError::MissingKey { .. })
    ));
}

#[test]
fn too_short_units_leave_no_anchor() {
    let mut analysis = pulse_analysis(false);
    analysis.anchors.lag_post = 40;
    let pipeline = AnalysisPipeline::new(analysis, pulse_config()).unwrap();
    let err = pipeline.run(&pulse_panel(30)).unwrap_err();
    assert!(matches!(err, LagchainError::Event(EventError::NoEligibleAnchors { .. })));

    let report = pipeline.with_anchor_windows(false).run(&pulse_panel(30)).unwrap();
    assert!(report.windows.is_empty());
}

#[test]
fn cancelled_run_leaves_pipeline_reusable() {
    let pipeline = AnalysisPipeline::new(pulse_analysis(false), pulse_config()).unwrap();
    let cancel = CancellationToken::new();
    cancel.cancel();
    assert!(matches!(
        pipeline.run_with_cancel(&pulse_panel(30), &cancel),
        Err(LagchainError::Cancelled)
    ));

    let report = pipeline.run(&pulse_panel(30)).unwrap();
    assert_eq!(report.simulated.len(), 7);
}

#[test]
fn every_edge_pair_gets_its_own_curves_and_null() {
    let config = skip_edge_config();
    let panel = random_panel(29, 4, 120, &config)
        .try_map_units(|series| {
            let high = series.column("B").unwrap().iter().map(|b| if *b > 0.1 { 1.0 } else { 0.0 }).collect();
            series.with_column("B_high", high)
        })
        .unwrap();
    let pairs = vec![
        EdgePair::new("A_low", "B"),
        EdgePair::new("B_high", "C"),
        EdgePair::new("A_low", "E"),
    ];
    let mut analysis = pulse_analysis(false);
    analysis.alignment.trigger_flag = "A_low".to_string();
    analysis.alignment.edge_pairs = pairs.clone();
    analysis.anchors.lag_pre = 3;
    analysis.anchors.lag_post = 6;

    let pipeline = AnalysisPipeline::new(analysis.clone(), config).unwrap();
    assert_eq!(pipeline.edge_pairs(), pairs);
    let report = pipeline.run(&panel).unwrap();

    let onset_tables: Vec<&str> = report.onsets.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(onset_tables, ["onsets_A_low", "onsets_B_high"]);
    let null_tables: Vec<&str> = report.null_curves.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(null_tables, ["null_A_low_B", "null_B_high_C", "null_A_low_E"]);

    let scenarios = pipeline.catalogue().len();
    assert_eq!(report.metrics.len(), pairs.len() * scenarios);

    for (index, pair) in pairs.iter().enumerate() {
        // each pair's null draws from its own offset seed
        let expected = NullModelGenerator::from_config(&analysis.null_model)
            .unwrap()
            .with_seed(analysis.null_model.seed + index as u64)
            .ordered_vs_shuffled(&panel, &pair.flag, &pair.response, -2..=8, &CancellationToken::new())
            .unwrap();
        let null = report.null_curve(pair).unwrap();
        assert_eq!(null.fingerprint().unwrap(), expected.fingerprint().unwrap());

        // observed curve is aligned on the pair's own flag
        let observed = report.curve(pair, OBSERVED_RUN_TAG, AlignMode::Mean);
        assert_eq!(observed.len(), 11);
        for (point, row) in observed.iter().zip(null.iter()) {
            assert_eq!(point.n, row.n_ordered);
            if point.n > 0 {
                assert!((point.mean - row.mean_ordered).abs() < 1e-12);
            }
        }
        assert!(report.metrics_for(pair, "Full_main").is_some());
    }
}

#[test]
fn builds_from_toml_documents() {
    let analysis = r#"
        [alignment]
        lag_min = -3
        lag_max = 6
        trigger_flag = "A_low"

        [null_model]
        block_scheme = "time_aligned"
    "#;
    let pipeline = AnalysisPipeline::from_toml(analysis, &load_text("effects/icu.toml")).unwrap();
    assert_eq!(pipeline.catalogue().len(), 10);
    assert_eq!(pipeline.response_columns(), vec!["E".to_string()]);
    assert_eq!(pipeline.config().alignment.boot_n, 500);

    let bad = AnalysisPipeline::from_toml("[stability]\nwindow = 1\n", &load_text("effects/icu.toml"));
    assert!(matches!(bad, Err(LagchainError::Config(_))));
}
