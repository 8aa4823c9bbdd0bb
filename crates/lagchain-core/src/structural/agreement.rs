//! Cross-config κ agreement: do two fitted chains point the same way?

use serde::{Deserialize, Serialize};

use super::config::StructuralConfig;
use super::edge::Edge;
use crate::errors::ConfigValidationError;

/// One edge's coefficient in both configs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeAgreement {
    pub edge: Edge,
    pub left: f64,
    pub right: f64,
    pub sign_agree: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KappaAgreement {
    pub rows: Vec<EdgeAgreement>,
    /// Share of edges whose signs agree; NaN for no edges.
    pub sign_rate: f64,
    /// Spearman rank correlation of the two coefficient vectors.
    pub spearman: f64,
}

/// Compare `left` and `right` on `edges`. Both zero counts as agreement.
pub fn kappa_agreement(
    left: &StructuralConfig,
    right: &StructuralConfig,
    edges: &[Edge],
) -> Result<KappaAgreement, ConfigValidationError> {
    let mut rows = Vec::with_capacity(edges.len());
    for edge in edges {
        let l = left.require_coefficient(edge)?;
        let r = right.require_coefficient(edge)?;
        let sign_agree = (l == 0.0 && r == 0.0) || (l > 0.0 && r > 0.0) || (l < 0.0 && r < 0.0);
        rows.push(EdgeAgreement {
            edge: edge.clone(),
            left: l,
            right: r,
            sign_agree,
        });
    }

    let sign_rate = if rows.is_empty() {
        f64::NAN
    } else {
        rows.iter().filter(|r| r.sign_agree).count() as f64 / rows.len() as f64
    };
    let xs: Vec<f64> = rows.iter().map(|r| r.left).collect();
    let ys: Vec<f64> = rows.iter().map(|r| r.right).collect();

    Ok(KappaAgreement {
        rows,
        sign_rate,
        spearman: spearman(&xs, &ys),
    })
}

/// Spearman correlation with average ranks for ties.
pub(crate) fn spearman(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.len() != ys.len() || xs.is_empty() {
        return f64::NAN;
    }
    let (rx, ry) = (average_ranks(xs), average_ranks(ys));
    let n = rx.len() as f64;
    let mx = rx.iter().sum::<f64>() / n;
    let my = ry.iter().sum::<f64>() / n;
    let vx: f64 = rx.iter().map(|r| (r - mx).powi(2)).sum();
    let vy: f64 = ry.iter().map(|r| (r - my).powi(2)).sum();
    if vx <= 0.0 || vy <= 0.0 {
        return f64::NAN;
    }
    let cov: f64 = rx.iter().zip(&ry).map(|(a, b)| (a - mx) * (b - my)).sum();
    cov / (vx * vy).sqrt()
}

fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]).then(a.cmp(&b)));
    let mut ranks = vec![0.0; values.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        let rank = (i + j + 2) as f64 / 2.0;
        for &idx in &order[i..=j] {
            ranks[idx] = rank;
        }
        i = j + 1;
    }
    ranks
}
