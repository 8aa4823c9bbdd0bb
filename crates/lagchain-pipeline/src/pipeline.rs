//! Orchestrates one analysis run: onsets, scenario catalogue, lag curves
//! with counterfactual pairing, anchor windows, null model and stability.

use std::collections::{BTreeMap, BTreeSet};

use lagchain_align::{pair_with_rebase_offset, AlignMode, CounterfactualMetrics, LagAligner};
use lagchain_core::config::{AnalysisConfig, EdgePair};
use lagchain_core::errors::{EventError, LagchainResult, SchemaError};
use lagchain_core::models::{LagCurve, OnsetSet, ResultTable};
use lagchain_core::series::Panel;
use lagchain_core::structural::{AblationSpec, StructuralConfig};
use lagchain_core::traits::{Cancellable, CancellationToken};
use lagchain_events::{onset_table, require_events, EventExtractor};
use lagchain_null::NullModelGenerator;
use lagchain_observability::tracing_setup::events;
use lagchain_observability::{
    align_span, init_tracing, pipeline_span, shuffle_span, simulate_span, stability_span, DegradationKind,
    DegradationTracker,
};
use lagchain_simulate::{standard_catalogue, AblationRunner, AnchorEligibility, AnchorWindowRunner, ChainSimulator};
use lagchain_stability::{structural_operator, StabilityAnalyzer};

use crate::report::{AnalysisReport, CurveRow, PairedCurveRow, ScenarioMetrics};

/// Run tag of curves aligned on the observed panel.
pub const OBSERVED_RUN_TAG: &str = "observed";

/// One configured analysis. Holds no per-run state, so a pipeline can be
/// run on several panels, and several pipelines can run side by side.
pub struct AnalysisPipeline {
    config: AnalysisConfig,
    structural: StructuralConfig,
    catalogue: Vec<AblationSpec>,
    anchor_windows: bool,
}

impl AnalysisPipeline {
    /// Validates both configs; the catalogue defaults to the standard one.
    pub fn new(config: AnalysisConfig, structural: StructuralConfig) -> LagchainResult<Self> {
        config.validate()?;
        structural.validate()?;
        let catalogue = standard_catalogue(&structural);
        Ok(Self {
            config,
            structural,
            catalogue,
            anchor_windows: true,
        })
    }

    /// Analysis settings and an effects document, both TOML.
    pub fn from_toml(analysis: &str, effects: &str) -> LagchainResult<Self> {
        Self::new(
            AnalysisConfig::from_toml(analysis)?,
            StructuralConfig::from_effects_toml(effects)?,
        )
    }

    pub fn with_catalogue(mut self, catalogue: Vec<AblationSpec>) -> Self {
        self.catalogue = catalogue;
        self
    }

    /// Toggle anchor-window counterfactuals.
    pub fn with_anchor_windows(mut self, enabled: bool) -> Self {
        self.anchor_windows = enabled;
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn structural(&self) -> &StructuralConfig {
        &self.structural
    }

    pub fn catalogue(&self) -> &[AblationSpec] {
        &self.catalogue
    }

    /// Install the tracing subscriber described by the config.
    pub fn init_observability(&self) -> LagchainResult<()> {
        init_tracing(&self.config.observability)?;
        Ok(())
    }

    /// Configured response columns, or the terminal node when none are set.
    pub fn response_columns(&self) -> Vec<String> {
        if self.config.alignment.response_columns.is_empty() {
            vec![self.structural.terminal().to_string()]
        } else {
            self.config.alignment.response_columns.clone()
        }
    }

    /// Configured edge pairs, or the trigger flag against every response
    /// column.
    pub fn edge_pairs(&self) -> Vec<EdgePair> {
        let alignment = &self.config.alignment;
        if !alignment.edge_pairs.is_empty() {
            return alignment.edge_pairs.clone();
        }
        self.response_columns()
            .into_iter()
            .map(|response| EdgePair::new(alignment.trigger_flag.as_str(), response))
            .collect()
    }

    /// Flags whose onsets the run needs, first use first. The trigger
    /// flag anchors the windows even when every pair names its own flag.
    fn trigger_flags<'a>(&'a self, pairs: &'a [EdgePair]) -> Vec<&'a str> {
        let mut seen = BTreeSet::new();
        let anchor_flag = self
            .anchor_windows
            .then_some(self.config.alignment.trigger_flag.as_str());
        pairs
            .iter()
            .map(|p| p.flag.as_str())
            .chain(anchor_flag)
            .filter(|f| seen.insert(*f))
            .collect()
    }

    fn required_columns<'a>(&'a self, pairs: &'a [EdgePair]) -> Vec<&'a str> {
        let mut seen = BTreeSet::new();
        let anchor_flag = self
            .anchor_windows
            .then_some(self.config.alignment.trigger_flag.as_str());
        self.structural
            .nodes()
            .iter()
            .map(String::as_str)
            .chain(anchor_flag)
            .chain(pairs.iter().flat_map(|p| [p.flag.as_str(), p.response.as_str()]))
            .filter(|c| seen.insert(*c))
            .collect()
    }

    /// Run every phase over `panel`.
    pub fn run(&self, panel: &Panel) -> LagchainResult<AnalysisReport> {
        self.run_with_cancel(panel, &CancellationToken::new())
    }

    /// As `run`, stopping with `Cancelled` once `cancel` fires. The token
    /// belongs to this run only; the pipeline stays reusable.
    pub fn run_with_cancel(&self, panel: &Panel, cancel: &CancellationToken) -> LagchainResult<AnalysisReport> {
        let alignment = &self.config.alignment;
        let _pipeline = pipeline_span!(alignment.trigger_flag).entered();
        let parallel = self.config.simulation.parallel;
        let pairs = self.edge_pairs();
        let mut degradation = DegradationTracker::new();

        // Phase 1: schema, every missing column reported at once
        panel.require_columns(&self.required_columns(&pairs))?;

        // Phase 2: onsets per trigger flag; a flag with nothing to align on is fatal
        let mut onsets: BTreeMap<&str, OnsetSet> = BTreeMap::new();
        for flag in self.trigger_flags(&pairs) {
            let set = EventExtractor::new(flag).extract(panel)?;
            require_events(&set)?;
            onsets.insert(flag, set);
        }
        let triggers_for = |flag: &str| {
            onsets.get(flag).ok_or_else(|| EventError::NoEvents {
                flag: flag.to_string(),
                units: panel.len(),
            })
        };

        // Phase 3: scenario catalogue
        let simulated = {
            let _span = simulate_span!(self.catalogue.len()).entered();
            AblationRunner::new(&self.structural, self.config.simulation.clone())?.run(
                panel,
                &self.catalogue,
                cancel,
            )?
        };
        let scenario_panels: Vec<(&str, Panel)> = self
            .catalogue
            .iter()
            .zip(&simulated)
            .map(|(spec, table)| table.to_panel().map(|p| (spec.name.as_str(), p)))
            .collect::<Result<_, SchemaError>>()?;

        // Phase 4: per pair, observed curves and scenario curves paired at the reference lag
        let reference_lag = alignment.reference_lag;
        let (mut curves, mut paired, mut metrics) = (Vec::new(), Vec::new(), Vec::new());
        for (index, pair) in pairs.iter().enumerate() {
            let triggers = triggers_for(&pair.flag)?;
            let aligner = LagAligner::from_config(alignment)?
                .with_bootstrap(alignment.boot_n, alignment.pair_seed(index))
                .with_parallel(parallel);
            let column = pair.response.as_str();

            let _span = align_span!(column, AlignMode::Mean).entered();
            let observed = aligner.align(panel, column, triggers, AlignMode::Mean, cancel)?;
            record_curve(&mut degradation, pair, OBSERVED_RUN_TAG, &observed);
            curves.extend(CurveRow::from_curve(pair, OBSERVED_RUN_TAG, AlignMode::Mean, &observed));

            let rebased = aligner.align(panel, column, triggers, AlignMode::CumulativeRebased, cancel)?;
            curves.extend(CurveRow::from_curve(
                pair,
                OBSERVED_RUN_TAG,
                AlignMode::CumulativeRebased,
                &rebased,
            ));

            // scenarios only carry node columns
            if self.structural.node_index(column).is_none() {
                continue;
            }
            for (run_tag, scenario) in &scenario_panels {
                let counterfactual = aligner.align(scenario, column, triggers, AlignMode::Mean, cancel)?;
                record_curve(&mut degradation, pair, run_tag, &counterfactual);
                curves.extend(CurveRow::from_curve(pair, run_tag, AlignMode::Mean, &counterfactual));

                let rows = pair_with_rebase_offset(&observed, &counterfactual, reference_lag)?;
                metrics.push(ScenarioMetrics {
                    flag: pair.flag.clone(),
                    column: column.to_string(),
                    metrics: CounterfactualMetrics::from_pairs(*run_tag, &rows),
                });
                paired.extend(rows.into_iter().map(|row| PairedCurveRow {
                    flag: pair.flag.clone(),
                    run_tag: run_tag.to_string(),
                    column: column.to_string(),
                    row,
                }));
            }
        }

        // Phase 5: anchor-window counterfactuals over screened trigger-flag onsets
        let (windows, exclusions) = if self.anchor_windows {
            let anchors = &self.config.anchors;
            let eligibility = AnchorEligibility::screen_panel(
                panel,
                triggers_for(&alignment.trigger_flag)?,
                self.structural.nodes(),
                anchors.lag_pre,
                anchors.lag_post,
            );
            let excluded: BTreeSet<_> = eligibility.excluded.iter().map(|e| (&e.unit, e.anchor)).collect();
            degradation.record("anchors", DegradationKind::ExcludedAnchor, excluded.len());

            let runner = AnchorWindowRunner::new(ChainSimulator::new(&self.structural)?, anchors, parallel);
            let windows = runner.run(panel, &eligibility, &self.catalogue, cancel)?;
            (windows, eligibility.exclusion_table())
        } else {
            (Vec::new(), ResultTable::new("anchor_exclusions", Vec::new()))
        };

        // Phase 6: ordered vs block-shuffled onsets, one seed per pair
        let generator = NullModelGenerator::from_config(&self.config.null_model)?.with_parallel(parallel);
        let lags = alignment.lag_min..=alignment.lag_max;
        let mut null_curves = Vec::with_capacity(pairs.len());
        for (index, pair) in pairs.iter().enumerate() {
            let _span = shuffle_span!(pair.flag, generator.n_shuffles()).entered();
            let seed = self.config.null_model.seed.wrapping_add(index as u64);
            null_curves.push(generator.clone().with_seed(seed).ordered_vs_shuffled(
                panel,
                &pair.flag,
                &pair.response,
                lags.clone(),
                cancel,
            )?);
        }

        // Phase 7: rolling stability per unit, configured operator per scenario
        let analyzer = StabilityAnalyzer::from_config(&self.config.stability)?;
        let mut stability = Vec::with_capacity(panel.len());
        for series in panel.units() {
            cancel.check()?;
            let _span = stability_span!(series.unit(), analyzer.window()).entered();
            let table = analyzer.analyze_unit(series, self.structural.nodes())?;
            let degraded = table.iter().filter(|s| s.degraded_rows > 0).count();
            degradation.record(
                format!("stability.{}", series.unit()),
                DegradationKind::DegradedWindow,
                degraded,
            );
            stability.push(table);
        }
        let operators = self
            .catalogue
            .iter()
            .map(|spec| structural_operator(&self.structural, spec))
            .collect::<Result<Vec<_>, _>>()?;

        let report = AnalysisReport {
            onsets: onsets.values().map(onset_table).collect(),
            simulated,
            curves: ResultTable::new("curves", curves),
            paired: ResultTable::new("paired", paired),
            metrics: ResultTable::new("metrics", metrics),
            windows,
            exclusions,
            null_curves,
            stability,
            operators: ResultTable::new("operators", operators),
            degradation,
        };
        let fingerprints = report.fingerprints()?;
        events::run_finished(fingerprints.len(), &report.fingerprint()?);
        Ok(report)
    }
}

fn record_curve(degradation: &mut DegradationTracker, pair: &EdgePair, run_tag: &str, curve: &LagCurve) {
    let empty = curve.iter().filter(|p| p.is_degraded()).count();
    events::curve_aligned(run_tag, &pair.response, curve.len(), empty);
    degradation.record(
        format!("align.{}.{run_tag}.{}", pair.flag, pair.response),
        DegradationKind::EmptyLag,
        empty,
    );
}
