//! Statistical regime classifier: k-means over a standardized monthly window.
//!
//! The partition algorithm sits behind [`ClusterClassifier`] so it can be
//! swapped or mocked without touching the rule-based path.

use crate::common::math;
use crate::error::ClusterError;
use crate::features::matrix::{FeatureMatrix, MIN_HISTORY_MONTHS};
use crate::models::regime::{ConfidenceTier, RegimeState};
use crate::models::signal::Indicator;
use tracing::debug;

pub const CLUSTER_COUNT: usize = 4;
pub const MAX_ITERATIONS: usize = 300;
const CONVERGENCE_TOLERANCE: f64 = 1e-9;

/// Nearest/second-nearest distance ratio at or below which confidence is High.
pub const HIGH_CONFIDENCE_RATIO: f64 = 0.5;
/// Ratio at or below which confidence is Medium; above it is a near-tie (Low).
pub const MEDIUM_CONFIDENCE_RATIO: f64 = 0.8;

/// Labels per row plus the fitted centroids.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterFit {
    pub labels: Vec<usize>,
    pub centroids: Vec<Vec<f64>>,
}

pub trait ClusterClassifier: Send + Sync {
    fn fit_predict(&self, matrix: &[Vec<f64>]) -> Result<ClusterFit, ClusterError>;
}

/// Fixed-k Lloyd's algorithm with deterministic farthest-first seeding.
#[derive(Debug, Clone)]
pub struct KMeans {
    k: usize,
    max_iterations: usize,
}

impl KMeans {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iterations: MAX_ITERATIONS,
        }
    }

    /// First seed is the row nearest the column means; each next seed is the
    /// row farthest from all seeds chosen so far. Ties go to the earlier row.
    fn seed(&self, matrix: &[Vec<f64>]) -> Vec<Vec<f64>> {
        let width = matrix[0].len();
        let centre: Vec<f64> = (0..width)
            .map(|c| matrix.iter().map(|r| r[c]).sum::<f64>() / matrix.len() as f64)
            .collect();

        let first = argmin(matrix.iter().map(|r| math::euclidean_distance(r, &centre)));
        let mut centroids = vec![matrix[first].clone()];

        while centroids.len() < self.k {
            let next = argmax(matrix.iter().map(|r| {
                centroids
                    .iter()
                    .map(|c| math::euclidean_distance(r, c))
                    .fold(f64::INFINITY, f64::min)
            }));
            centroids.push(matrix[next].clone());
        }

        centroids
    }
}

impl Default for KMeans {
    fn default() -> Self {
        Self::new(CLUSTER_COUNT)
    }
}

impl ClusterClassifier for KMeans {
    fn fit_predict(&self, matrix: &[Vec<f64>]) -> Result<ClusterFit, ClusterError> {
        validate(matrix)?;

        let distinct = count_distinct(matrix);
        if distinct < self.k {
            return Err(ClusterError::DegenerateData {
                distinct,
                k: self.k,
            });
        }

        let mut centroids = self.seed(matrix);
        let mut labels = vec![0; matrix.len()];

        for _ in 0..self.max_iterations {
            for (label, row) in labels.iter_mut().zip(matrix) {
                *label = nearest(row, &centroids).0;
            }

            let mut shift: f64 = 0.0;
            for (cluster, centroid) in centroids.iter_mut().enumerate() {
                let members: Vec<&Vec<f64>> = matrix
                    .iter()
                    .zip(&labels)
                    .filter(|(_, l)| **l == cluster)
                    .map(|(r, _)| r)
                    .collect();
                // An emptied cluster keeps its previous centroid.
                if members.is_empty() {
                    continue;
                }
                let updated: Vec<f64> = (0..centroid.len())
                    .map(|c| members.iter().map(|r| r[c]).sum::<f64>() / members.len() as f64)
                    .collect();
                shift = shift.max(math::euclidean_distance(centroid, &updated));
                *centroid = updated;
            }

            if shift <= CONVERGENCE_TOLERANCE {
                break;
            }
        }

        for (label, row) in labels.iter_mut().zip(matrix) {
            *label = nearest(row, &centroids).0;
        }

        Ok(ClusterFit { labels, centroids })
    }
}

/// Z-score each column over the window. Zero-variance columns become 0.
pub fn standardize(matrix: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, ClusterError> {
    validate(matrix)?;
    let width = matrix[0].len();

    let stats: Vec<(f64, f64)> = (0..width)
        .map(|c| {
            let column: Vec<f64> = matrix.iter().map(|r| r[c]).collect();
            let mean = math::mean(&column).unwrap_or(0.0);
            let std = math::population_std_dev(&column).unwrap_or(0.0);
            (mean, if std > 0.0 { std } else { 1.0 })
        })
        .collect();

    Ok(matrix
        .iter()
        .map(|row| {
            row.iter()
                .zip(&stats)
                .map(|(v, (mean, std))| (v - mean) / std)
                .collect()
        })
        .collect())
}

/// How much a standardized feature pushes a centroid towards stress.
pub fn stress_weight(indicator: Indicator) -> f64 {
    match indicator {
        Indicator::HighYieldSpread => 1.5,
        Indicator::YieldCurve10y2y => -1.5,
        Indicator::Nfci => 1.0,
        Indicator::InitialClaims => 1.0,
        Indicator::FedFundsRate => 0.5,
        _ => 0.0,
    }
}

/// Order centroids by stress: lowest becomes Bull, highest Recession Watch.
pub fn map_centroids(centroids: &[Vec<f64>], columns: &[Indicator]) -> Vec<RegimeState> {
    let scores: Vec<f64> = centroids
        .iter()
        .map(|c| {
            c.iter()
                .zip(columns)
                .map(|(v, ind)| v * stress_weight(*ind))
                .sum()
        })
        .collect();

    let mut order: Vec<usize> = (0..centroids.len()).collect();
    order.sort_by(|a, b| scores[*a].total_cmp(&scores[*b]).then(a.cmp(b)));

    let mut states = vec![RegimeState::Neutral; centroids.len()];
    let last = RegimeState::ORDERED.len() - 1;
    for (rank, cluster) in order.into_iter().enumerate() {
        states[cluster] = RegimeState::ORDERED[rank.min(last)];
    }
    states
}

/// Tier from the nearest vs second-nearest centroid distances.
pub fn confidence_from_distances(nearest: f64, second: f64) -> ConfidenceTier {
    let ratio = if second > 0.0 { nearest / second } else { 1.0 };
    if ratio <= HIGH_CONFIDENCE_RATIO {
        ConfidenceTier::High
    } else if ratio <= MEDIUM_CONFIDENCE_RATIO {
        ConfidenceTier::Medium
    } else {
        ConfidenceTier::Low
    }
}

/// Classify the most recent month. `None` whenever this path cannot answer.
pub fn classify_clusters(
    matrix: &FeatureMatrix,
    clusterer: &dyn ClusterClassifier,
) -> Option<(RegimeState, ConfidenceTier)> {
    match try_classify_clusters(matrix, clusterer) {
        Ok(result) => Some(result),
        Err(e) => {
            debug!(error = %e, "Statistical classifier unavailable, falling back to rules");
            None
        }
    }
}

pub fn try_classify_clusters(
    matrix: &FeatureMatrix,
    clusterer: &dyn ClusterClassifier,
) -> Result<(RegimeState, ConfidenceTier), ClusterError> {
    if matrix.len() < MIN_HISTORY_MONTHS {
        return Err(ClusterError::InsufficientHistory {
            got: matrix.len(),
            required: MIN_HISTORY_MONTHS,
        });
    }
    if matrix.columns.len() < 2 {
        return Err(ClusterError::InsufficientFeatures(matrix.columns.len()));
    }

    let scaled = standardize(&matrix.rows)?;
    let fit = clusterer.fit_predict(&scaled)?;
    if fit.centroids.len() < 2 {
        return Err(ClusterError::DegenerateData {
            distinct: fit.centroids.len(),
            k: CLUSTER_COUNT,
        });
    }

    let latest = scaled.last().ok_or(ClusterError::InsufficientHistory {
        got: 0,
        required: MIN_HISTORY_MONTHS,
    })?;

    let (cluster, nearest_dist, second_dist) = nearest(latest, &fit.centroids);
    let states = map_centroids(&fit.centroids, &matrix.columns);
    let confidence = confidence_from_distances(nearest_dist, second_dist);

    debug!(
        cluster,
        state = %states[cluster],
        confidence = %confidence,
        nearest = nearest_dist,
        second = second_dist,
        "Statistical classifier assigned latest month"
    );

    Ok((states[cluster], confidence))
}

fn validate(matrix: &[Vec<f64>]) -> Result<(), ClusterError> {
    let first = matrix.first().ok_or(ClusterError::InsufficientHistory {
        got: 0,
        required: 1,
    })?;
    if first.is_empty() {
        return Err(ClusterError::InsufficientFeatures(0));
    }
    if matrix.iter().any(|r| r.len() != first.len()) {
        return Err(ClusterError::RaggedMatrix);
    }
    if matrix.iter().flatten().any(|v| !v.is_finite()) {
        return Err(ClusterError::NonFinite);
    }
    Ok(())
}

fn count_distinct(matrix: &[Vec<f64>]) -> usize {
    let mut distinct: Vec<&Vec<f64>> = Vec::new();
    for row in matrix {
        if !distinct.iter().any(|d| *d == row) {
            distinct.push(row);
        }
    }
    distinct.len()
}

/// `(index, nearest distance, second-nearest distance)`
fn nearest(row: &[f64], centroids: &[Vec<f64>]) -> (usize, f64, f64) {
    let mut best = (0, f64::INFINITY);
    let mut second = f64::INFINITY;
    for (i, c) in centroids.iter().enumerate() {
        let d = math::euclidean_distance(row, c);
        if d < best.1 {
            second = best.1;
            best = (i, d);
        } else if d < second {
            second = d;
        }
    }
    (best.0, best.1, second)
}

fn argmin(values: impl Iterator<Item = f64>) -> usize {
    let mut best = (0, f64::INFINITY);
    for (i, v) in values.enumerate() {
        if v < best.1 {
            best = (i, v);
        }
    }
    best.0
}

fn argmax(values: impl Iterator<Item = f64>) -> usize {
    let mut best = (0, f64::NEG_INFINITY);
    for (i, v) in values.enumerate() {
        if v > best.1 {
            best = (i, v);
        }
    }
    best.0
}
