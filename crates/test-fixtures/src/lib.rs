//! Shared fixtures for lagchain test suites: golden files under `data/` and
//! synthetic panels generated from a known chain.

use std::collections::BTreeMap;
use std::path::PathBuf;

use lagchain_core::series::{ObservationRecord, Panel, UnitSeries};
use lagchain_core::structural::StructuralConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::de::DeserializeOwned;

/// Node ordering of every synthetic panel.
pub const NODES: [&str; 5] = ["A", "B", "C", "D", "E"];

/// Main-chain coefficients of `pulse_config`.
pub const KAPPA_AB: f64 = 0.6;
pub const KAPPA_BC: f64 = 0.5;
pub const KAPPA_CD: f64 = 0.55;
pub const KAPPA_DE: f64 = 0.6;

/// Pulse position and the unit carrying it in `pulse_panel`.
pub const PULSE_T: i64 = 5;
pub const PULSE_UNIT: &str = "u0";

fn data_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

/// Absolute path of a golden file.
pub fn fixture_path(relative_path: &str) -> PathBuf {
    data_root().join(relative_path)
}

/// Read a golden file as text.
///
/// # Panics
/// Panics if the file is missing.
pub fn load_text(relative_path: &str) -> String {
    let path = fixture_path(relative_path);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e))
}

/// Read and deserialize a JSON golden file.
///
/// # Panics
/// Panics if the file is missing or malformed.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixture_path(relative_path);
    serde_json::from_str(&load_text(relative_path))
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Structural config loaded from `data/effects/<name>.toml`.
pub fn load_effects(name: &str) -> StructuralConfig {
    StructuralConfig::from_effects_toml(&load_text(&format!("effects/{name}.toml")))
        .unwrap_or_else(|e| panic!("invalid effects fixture {name}: {e}"))
}

/// Long-format records from `data/panels/<name>.json`.
pub fn load_records(name: &str) -> Vec<ObservationRecord> {
    load_fixture(&format!("panels/{name}.json"))
}

/// A->B->C->D->E with the `KAPPA_*` coefficients, all baselines 0.
pub fn pulse_config() -> StructuralConfig {
    StructuralConfig::five_node()
        .uniform_baseline(0.0)
        .edge("A", "B", KAPPA_AB)
        .edge("B", "C", KAPPA_BC)
        .edge("C", "D", KAPPA_CD)
        .edge("D", "E", KAPPA_DE)
        .build()
        .unwrap_or_else(|e| panic!("pulse config invalid: {e}"))
}

/// `pulse_config` plus every skip edge.
pub fn skip_edge_config() -> StructuralConfig {
    StructuralConfig::five_node()
        .baseline("B", 0.1)
        .baseline("C", -0.05)
        .baseline("D", 0.0)
        .baseline("E", 0.2)
        .edge("A", "B", KAPPA_AB)
        .edge("B", "C", KAPPA_BC)
        .edge("C", "D", KAPPA_CD)
        .edge("D", "E", KAPPA_DE)
        .edge("A", "C", 0.1)
        .edge("A", "D", -0.05)
        .edge("A", "E", 0.08)
        .edge("B", "D", 0.12)
        .edge("B", "E", -0.07)
        .edge("C", "E", 0.15)
        .build()
        .unwrap_or_else(|e| panic!("skip-edge config invalid: {e}"))
}

/// One unit of `len` steps from `t0`, all nodes zero except `A`, plus an
/// `A_pulse` flag equal to `A`.
pub fn unit_with_driver(unit: &str, t0: i64, a: Vec<f64>) -> UnitSeries {
    let len = a.len();
    let mut columns: BTreeMap<String, Vec<f64>> = NODES[1..]
        .iter()
        .map(|n| (n.to_string(), vec![0.0; len]))
        .collect();
    columns.insert("A_pulse".to_string(), a.clone());
    columns.insert("A".to_string(), a);
    let times = (0..len as i64).map(|i| t0 + i).collect();
    UnitSeries::new(unit, times, columns).unwrap_or_else(|e| panic!("fixture unit invalid: {e}"))
}

/// Five units `u0..u4` over `t = 0..len`; `u0` carries a width-1 pulse of
/// `A = 1` at `PULSE_T`, every other driver value is zero.
pub fn pulse_panel(len: usize) -> Panel {
    Panel::from_units((0..5).map(|i| {
        let mut a = vec![0.0; len];
        if i == 0 {
            a[PULSE_T as usize] = 1.0;
        }
        unit_with_driver(&format!("u{i}"), 0, a)
    }))
}

/// Random panel whose downstream nodes follow `config` with Gaussian-ish
/// noise, a mean-reverting driver, and an `A_low` flag marking driver
/// values below -0.5.
pub fn random_panel(seed: u64, n_units: usize, len: usize, config: &StructuralConfig) -> Panel {
    let mut rng = StdRng::seed_from_u64(seed);
    let nodes = config.nodes().to_vec();
    Panel::from_units((0..n_units).map(|u| {
        let mut cols: Vec<Vec<f64>> = vec![Vec::with_capacity(len); nodes.len()];
        let mut prev = vec![0.0; nodes.len()];
        for _ in 0..len {
            let mut cur = vec![0.0; nodes.len()];
            cur[0] = 0.7 * prev[0] + noise(&mut rng);
            for (i, node) in nodes.iter().enumerate().skip(1) {
                let mut v = config.baseline(node).unwrap_or(0.0) + 0.1 * noise(&mut rng);
                for edge in config.inbound(node) {
                    if let (Some(p), Some(k)) = (config.node_index(&edge.parent), config.coefficient(edge)) {
                        v += k * prev[p];
                    }
                }
                cur[i] = v;
            }
            for (col, v) in cols.iter_mut().zip(&cur) {
                col.push(*v);
            }
            prev = cur;
        }
        let flags: Vec<f64> = cols[0].iter().map(|a| if *a < -0.5 { 1.0 } else { 0.0 }).collect();
        let mut columns: BTreeMap<String, Vec<f64>> = nodes.iter().cloned().zip(cols).collect();
        columns.insert("A_low".to_string(), flags);
        let times = (0..len as i64).collect();
        UnitSeries::new(format!("r{u}"), times, columns)
            .unwrap_or_else(|e| panic!("random unit invalid: {e}"))
    }))
}

/// Random 0/1 series with roughly `rate` ones.
pub fn random_flags(seed: u64, len: usize, rate: f64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len)
        .map(|_| if rng.gen_bool(rate.clamp(0.0, 1.0)) { 1.0 } else { 0.0 })
        .collect()
}

fn noise(rng: &mut StdRng) -> f64 {
    // Irwin-Hall approximation of a standard normal.
    (0..12).map(|_| rng.gen::<f64>()).sum::<f64>() - 6.0
}
