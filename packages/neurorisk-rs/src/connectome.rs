//! Functional connectivity: correlation matrix and thresholded graph.

use nalgebra::DMatrix;
use petgraph::graph::{NodeIndex, UnGraph};

use crate::error::{EngineError, Result};
use crate::ingest::Recording;

/// Pearson correlation of all channel pairs, `n × n`, symmetric with unit
/// diagonal. A zero-variance channel correlates 0 with everything.
pub fn correlation_matrix(recording: &Recording) -> Result<DMatrix<f64>> {
    let n = recording.n_channels();
    let samples = recording.n_samples();
    if n < 2 {
        return Err(EngineError::InvalidParameter(format!(
            "Connectivity needs at least 2 channels (got {})",
            n
        )));
    }
    if samples < 2 {
        return Err(EngineError::InvalidParameter(format!(
            "Connectivity needs at least 2 samples (got {})",
            samples
        )));
    }

    // Center each channel and precompute its norm
    let mut centered: Vec<Vec<f64>> = Vec::with_capacity(n);
    let mut norms: Vec<f64> = Vec::with_capacity(n);
    for channel in &recording.data {
        let mean = channel.iter().sum::<f64>() / samples as f64;
        let c: Vec<f64> = channel.iter().map(|v| v - mean).collect();
        let norm = c.iter().map(|v| v * v).sum::<f64>().sqrt();
        centered.push(c);
        norms.push(norm);
    }

    let mut corr = DMatrix::<f64>::identity(n, n);
    for i in 0..n {
        for j in (i + 1)..n {
            let denom = norms[i] * norms[j];
            let r = if denom <= f64::EPSILON {
                0.0
            } else {
                let dot: f64 = centered[i]
                    .iter()
                    .zip(centered[j].iter())
                    .map(|(a, b)| a * b)
                    .sum();
                (dot / denom).clamp(-1.0, 1.0)
            };
            corr[(i, j)] = r;
            corr[(j, i)] = r;
        }
    }

    Ok(corr)
}

/// The thresholded functional connectome.
///
/// Holds the binary graph used for topology metrics alongside the
/// absolute-correlation matrix retained for rendering.
pub struct ConnectivityGraph {
    pub graph: UnGraph<String, f64>,
    /// |r| with zeroed diagonal, row-major `n × n`
    pub weights: Vec<Vec<f64>>,
    pub threshold: f64,
}

impl ConnectivityGraph {
    /// Binarize absolute correlations at `|r| > threshold` and build the
    /// undirected region graph. Node weights are the region labels.
    pub fn from_correlation(
        corr: &DMatrix<f64>,
        labels: &[String],
        threshold: f64,
    ) -> Result<Self> {
        let n = corr.nrows();
        if corr.ncols() != n {
            return Err(EngineError::InvalidParameter(format!(
                "Correlation matrix must be square (got {}x{})",
                n,
                corr.ncols()
            )));
        }
        if labels.len() != n {
            return Err(EngineError::InvalidParameter(format!(
                "Got {} labels for {} regions",
                labels.len(),
                n
            )));
        }
        if !(0.0..1.0).contains(&threshold) {
            return Err(EngineError::InvalidParameter(format!(
                "Correlation threshold must be in [0, 1) (got {})",
                threshold
            )));
        }

        let mut graph = UnGraph::<String, f64>::with_capacity(n, n);
        let nodes: Vec<NodeIndex> = labels.iter().map(|l| graph.add_node(l.clone())).collect();

        let mut weights = vec![vec![0.0; n]; n];
        let mut edge_count = 0usize;
        for i in 0..n {
            for j in (i + 1)..n {
                let w = corr[(i, j)].abs();
                weights[i][j] = w;
                weights[j][i] = w;
                if w > threshold {
                    graph.add_edge(nodes[i], nodes[j], w);
                    edge_count += 1;
                }
            }
        }

        log::info!(
            "Connectome: {} regions, {} edges above |r| > {}",
            n,
            edge_count,
            threshold
        );

        Ok(Self {
            graph,
            weights,
            threshold,
        })
    }

    pub fn n_nodes(&self) -> usize {
        self.graph.node_count()
    }

    pub fn n_edges(&self) -> usize {
        self.graph.edge_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording(data: Vec<Vec<f64>>) -> Recording {
        let labels = (0..data.len()).map(|i| format!("Ch{}", i + 1)).collect();
        Recording {
            labels,
            data,
            sampling_rate: 1.0,
        }
    }

    fn labels(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("R{}", i)).collect()
    }

    #[test]
    fn test_correlation_of_identical_channels_is_one() {
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let rec = recording(vec![x.clone(), x]);
        let corr = correlation_matrix(&rec).unwrap();
        assert!((corr[(0, 1)] - 1.0).abs() < 1e-12);
        assert_eq!(corr[(0, 0)], 1.0);
    }

    #[test]
    fn test_correlation_of_negated_channel_is_minus_one() {
        let x = vec![1.0, 2.0, 3.0, 4.0];
        let y: Vec<f64> = x.iter().map(|v| -v).collect();
        let corr = correlation_matrix(&recording(vec![x, y])).unwrap();
        assert!((corr[(0, 1)] + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_channel_correlates_zero() {
        let corr =
            correlation_matrix(&recording(vec![vec![1.0, 2.0, 3.0], vec![7.0; 3]])).unwrap();
        assert_eq!(corr[(0, 1)], 0.0);
    }

    #[test]
    fn test_single_channel_is_error() {
        assert!(correlation_matrix(&recording(vec![vec![1.0, 2.0]])).is_err());
    }

    #[test]
    fn test_graph_thresholding() {
        let mut corr = DMatrix::<f64>::identity(3, 3);
        corr[(0, 1)] = 0.9;
        corr[(1, 0)] = 0.9;
        corr[(0, 2)] = -0.7; // negative but strong: kept via |r|
        corr[(2, 0)] = -0.7;
        corr[(1, 2)] = 0.2; // below threshold
        corr[(2, 1)] = 0.2;

        let g = ConnectivityGraph::from_correlation(&corr, &labels(3), 0.5).unwrap();
        assert_eq!(g.n_nodes(), 3);
        assert_eq!(g.n_edges(), 2);
        assert_eq!(g.weights[0][2], 0.7);
        assert_eq!(g.weights[0][0], 0.0);
    }

    #[test]
    fn test_graph_keeps_isolated_nodes() {
        let corr = DMatrix::<f64>::identity(4, 4);
        let g = ConnectivityGraph::from_correlation(&corr, &labels(4), 0.5).unwrap();
        assert_eq!(g.n_nodes(), 4);
        assert_eq!(g.n_edges(), 0);
    }

    #[test]
    fn test_graph_rejects_bad_threshold() {
        let corr = DMatrix::<f64>::identity(2, 2);
        assert!(ConnectivityGraph::from_correlation(&corr, &labels(2), 1.0).is_err());
        assert!(ConnectivityGraph::from_correlation(&corr, &labels(2), -0.1).is_err());
    }

    #[test]
    fn test_graph_rejects_label_mismatch() {
        let corr = DMatrix::<f64>::identity(3, 3);
        assert!(ConnectivityGraph::from_correlation(&corr, &labels(2), 0.5).is_err());
    }
}
