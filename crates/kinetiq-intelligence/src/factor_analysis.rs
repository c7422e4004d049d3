// ABOUTME: Latent performance factor decomposition across an athlete's tests
// ABOUTME: Standardized correlation matrix, Jacobi eigen-decomposition, three labelled factors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kinetiq Performance Lab

use std::cmp::Ordering;
use std::collections::BTreeMap;

use kinetiq_core::errors::{AnalysisError, EngineResult};
use serde::Serialize;
use tracing::debug;

use crate::statistical_analysis::{
    is_constant, mean, population_std, CorrelationCoefficient, StatisticalAnalyzer,
};

/// Labels of the retained factors, in eigenvalue order
pub const FACTOR_LABELS: [&str; 3] = ["Power", "Speed", "Endurance"];

/// Jacobi iteration limits
mod jacobi {
    /// Full sweeps over the upper triangle before giving up
    pub const MAX_SWEEPS: usize = 100;
    /// Off-diagonal sum of squares treated as converged
    pub const TOLERANCE: f64 = 1e-18;
}

/// One retained latent factor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatentFactor {
    /// Factor label
    pub label: &'static str,
    /// Eigenvalue of the correlation matrix
    pub eigenvalue: f64,
    /// Share of total variance (eigenvalue / number of tests)
    pub variance_explained: f64,
}

/// Factor structure of a set of tests
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorReport {
    /// Retained factors, strongest first
    pub factors: Vec<LatentFactor>,
    /// Loading of every test on every retained factor
    pub loadings: BTreeMap<String, BTreeMap<String, f64>>,
    /// Sum of squared loadings per test
    pub communalities: BTreeMap<String, f64>,
    /// Factor with the largest absolute loading per test
    pub primary_factors: BTreeMap<String, String>,
    /// Pearson correlation between every pair of distinct tests
    pub correlations: BTreeMap<String, BTreeMap<String, CorrelationCoefficient>>,
}

impl FactorReport {
    /// Total variance explained by the retained factors
    #[must_use]
    pub fn total_variance_explained(&self) -> f64 {
        self.factors.iter().map(|f| f.variance_explained).sum()
    }
}

/// Decomposes test batteries into latent performance factors
pub struct FactorAnalyzer;

impl FactorAnalyzer {
    /// Decompose paired test observations into at most three factors
    ///
    /// Each series is standardized (population std, constant series become
    /// zeros) before the correlation matrix is built. Fewer tests than
    /// factors retain one factor per test.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientData` without tests or with fewer than two
    /// observations, and `InvalidValue` for unequal lengths or non-finite
    /// values
    pub fn analyze(tests: &BTreeMap<String, Vec<f64>>) -> EngineResult<FactorReport> {
        let observations = validate(tests)?;
        let names: Vec<&String> = tests.keys().collect();
        let standardized: Vec<Vec<f64>> = tests.values().map(|v| standardize(v)).collect();

        let matrix = correlation_matrix(&standardized, observations);
        let (eigenvalues, eigenvectors) = jacobi_eigen(matrix);

        let mut order: Vec<usize> = (0..eigenvalues.len()).collect();
        order.sort_by(|&a, &b| {
            eigenvalues[b]
                .partial_cmp(&eigenvalues[a])
                .unwrap_or(Ordering::Equal)
        });
        order.truncate(FACTOR_LABELS.len());

        let test_count = names.len() as f64;
        let factors: Vec<LatentFactor> = order
            .iter()
            .zip(FACTOR_LABELS)
            .map(|(&component, label)| {
                let eigenvalue = eigenvalues[component].max(0.0);
                LatentFactor {
                    label,
                    eigenvalue,
                    variance_explained: eigenvalue / test_count,
                }
            })
            .collect();

        let mut loadings = BTreeMap::new();
        let mut communalities = BTreeMap::new();
        let mut primary_factors = BTreeMap::new();
        for (row, name) in names.iter().enumerate() {
            let test_loadings: Vec<(&'static str, f64)> = order
                .iter()
                .zip(&factors)
                .map(|(&component, factor)| {
                    let sign = component_sign(&eigenvectors, component);
                    (
                        factor.label,
                        sign * eigenvectors[row][component] * factor.eigenvalue.sqrt(),
                    )
                })
                .collect();

            communalities.insert(
                (*name).clone(),
                test_loadings.iter().map(|(_, l)| l * l).sum(),
            );
            let dominant = test_loadings
                .iter()
                .fold(None::<(&'static str, f64)>, |best, item| match best {
                    Some(current) if current.1.abs() >= item.1.abs() => Some(current),
                    _ => Some(*item),
                });
            if let Some((label, _)) = dominant {
                primary_factors.insert((*name).clone(), label.to_owned());
            }
            loadings.insert(
                (*name).clone(),
                test_loadings
                    .into_iter()
                    .map(|(label, loading)| (label.to_owned(), loading))
                    .collect(),
            );
        }

        let correlations = pairwise_correlations(tests)?;

        debug!(
            tests = names.len(),
            observations,
            factors = factors.len(),
            "Decomposed performance factors"
        );

        Ok(FactorReport {
            factors,
            loadings,
            communalities,
            primary_factors,
            correlations,
        })
    }
}

fn validate(tests: &BTreeMap<String, Vec<f64>>) -> EngineResult<usize> {
    let mut lengths = tests.values().map(Vec::len);
    let Some(observations) = lengths.next() else {
        return Err(AnalysisError::insufficient_data("factor analysis", 1, 0));
    };
    if lengths.any(|len| len != observations) {
        return Err(AnalysisError::invalid_value(
            "tests",
            "every test needs one value per observation",
        ));
    }
    if observations < 2 {
        return Err(AnalysisError::insufficient_data(
            "factor analysis",
            2,
            observations,
        ));
    }
    for (name, values) in tests {
        for value in values {
            AnalysisError::ensure_finite(name, *value)?;
        }
    }
    Ok(observations)
}

fn standardize(values: &[f64]) -> Vec<f64> {
    if is_constant(values) {
        return vec![0.0; values.len()];
    }
    let center = mean(values);
    let scale = population_std(values);
    values.iter().map(|v| (v - center) / scale).collect()
}

/// Correlation matrix of standardized rows with a unit diagonal
fn correlation_matrix(standardized: &[Vec<f64>], observations: usize) -> Vec<Vec<f64>> {
    let n = observations as f64;
    standardized
        .iter()
        .enumerate()
        .map(|(i, a)| {
            standardized
                .iter()
                .enumerate()
                .map(|(j, b)| {
                    if i == j {
                        1.0
                    } else {
                        a.iter().zip(b).map(|(x, y)| x * y).sum::<f64>() / n
                    }
                })
                .collect()
        })
        .collect()
}

/// Eigenvalues and column eigenvectors of a symmetric matrix
fn jacobi_eigen(mut a: Vec<Vec<f64>>) -> (Vec<f64>, Vec<Vec<f64>>) {
    let n = a.len();
    let mut v: Vec<Vec<f64>> = (0..n)
        .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect();

    for _ in 0..jacobi::MAX_SWEEPS {
        if off_diagonal_norm(&a) < jacobi::TOLERANCE {
            break;
        }
        for p in 0..n {
            for q in (p + 1)..n {
                if a[p][q] == 0.0 {
                    continue;
                }
                let theta = (a[q][q] - a[p][p]) / (2.0 * a[p][q]);
                let t = theta.signum() / (theta.abs() + theta.mul_add(theta, 1.0).sqrt());
                let c = 1.0 / t.mul_add(t, 1.0).sqrt();
                let s = t * c;
                rotate_columns(&mut a, p, q, c, s);
                rotate_rows(&mut a, p, q, c, s);
                rotate_columns(&mut v, p, q, c, s);
            }
        }
    }

    let eigenvalues = a.iter().enumerate().map(|(i, row)| row[i]).collect();
    (eigenvalues, v)
}

fn off_diagonal_norm(a: &[Vec<f64>]) -> f64 {
    a.iter()
        .enumerate()
        .flat_map(|(i, row)| row.iter().skip(i + 1))
        .map(|x| x * x)
        .sum()
}

fn rotate_columns(m: &mut [Vec<f64>], p: usize, q: usize, c: f64, s: f64) {
    for row in m.iter_mut() {
        let (mp, mq) = (row[p], row[q]);
        row[p] = c.mul_add(mp, -s * mq);
        row[q] = s.mul_add(mp, c * mq);
    }
}

fn rotate_rows(m: &mut [Vec<f64>], p: usize, q: usize, c: f64, s: f64) {
    let (row_p, row_q) = (m[p].clone(), m[q].clone());
    for (k, (mp, mq)) in row_p.into_iter().zip(row_q).enumerate() {
        m[p][k] = c.mul_add(mp, -s * mq);
        m[q][k] = s.mul_add(mp, c * mq);
    }
}

/// Orients a component so its largest entry is positive
fn component_sign(eigenvectors: &[Vec<f64>], component: usize) -> f64 {
    let dominant = eigenvectors
        .iter()
        .map(|row| row[component])
        .fold(0.0_f64, |best, x| if x.abs() > best.abs() { x } else { best });
    if dominant < 0.0 {
        -1.0
    } else {
        1.0
    }
}

fn pairwise_correlations(
    tests: &BTreeMap<String, Vec<f64>>,
) -> EngineResult<BTreeMap<String, BTreeMap<String, CorrelationCoefficient>>> {
    let mut correlations: BTreeMap<String, BTreeMap<String, CorrelationCoefficient>> =
        BTreeMap::new();
    for (a, x) in tests {
        for (b, y) in tests.iter().filter(|(b, _)| *b != a) {
            correlations
                .entry(a.clone())
                .or_default()
                .insert(b.clone(), StatisticalAnalyzer::pearson(x, y)?);
        }
    }
    Ok(correlations)
}
