//! Graph-theoretic biomarkers of the thresholded connectome.
//!
//! Global efficiency, average clustering, and density all degrade with
//! network disintegration; hub strength tracks the posterior cingulate
//! specifically.

use petgraph::algo::dijkstra;
use petgraph::graph::{NodeIndex, UnGraph};
use rayon::prelude::*;

use crate::connectome::ConnectivityGraph;
use crate::types::NetworkBiomarkers;

/// Mean of 1/d(u,v) over all ordered node pairs. Unreachable pairs
/// contribute 0. BFS-equivalent distances via unit-cost Dijkstra,
/// parallelized per source node.
pub fn global_efficiency(graph: &UnGraph<String, f64>) -> f64 {
    let n = graph.node_count();
    if n < 2 {
        return 0.0;
    }

    let sources: Vec<NodeIndex> = graph.node_indices().collect();
    let total: f64 = sources
        .par_iter()
        .map(|&source| {
            let distances = dijkstra(graph, source, None, |_| 1usize);
            distances
                .iter()
                .filter(|(&target, _)| target != source)
                .map(|(_, &d)| 1.0 / d as f64)
                .sum::<f64>()
        })
        .sum();

    total / (n * (n - 1)) as f64
}

/// Mean local clustering coefficient. Nodes with degree < 2 contribute 0.
pub fn average_clustering(graph: &UnGraph<String, f64>) -> f64 {
    let n = graph.node_count();
    if n == 0 {
        return 0.0;
    }

    let total: f64 = graph
        .node_indices()
        .map(|v| {
            let neighbors: Vec<NodeIndex> = graph.neighbors(v).collect();
            let k = neighbors.len();
            if k < 2 {
                return 0.0;
            }
            let mut links = 0usize;
            for i in 0..k {
                for j in (i + 1)..k {
                    if graph.contains_edge(neighbors[i], neighbors[j]) {
                        links += 1;
                    }
                }
            }
            2.0 * links as f64 / (k * (k - 1)) as f64
        })
        .sum();

    total / n as f64
}

/// Edge density: 2m / (n(n-1)).
pub fn density(graph: &UnGraph<String, f64>) -> f64 {
    let n = graph.node_count();
    if n < 2 {
        return 0.0;
    }
    2.0 * graph.edge_count() as f64 / (n * (n - 1)) as f64
}

/// Mean degree over nodes whose label contains any of the patterns.
/// Returns 0 when no label matches.
pub fn hub_strength(graph: &UnGraph<String, f64>, patterns: &[String]) -> f64 {
    let hubs: Vec<NodeIndex> = graph
        .node_indices()
        .filter(|&v| {
            graph
                .node_weight(v)
                .map(|label| patterns.iter().any(|p| label.contains(p.as_str())))
                .unwrap_or(false)
        })
        .collect();

    if hubs.is_empty() {
        log::warn!("No region label matches hub patterns {:?}", patterns);
        return 0.0;
    }

    let degree_sum: usize = hubs.iter().map(|&v| graph.neighbors(v).count()).sum();
    degree_sum as f64 / hubs.len() as f64
}

/// All four network biomarkers in one pass.
pub fn network_biomarkers(
    connectome: &ConnectivityGraph,
    hub_patterns: &[String],
) -> NetworkBiomarkers {
    let graph = &connectome.graph;
    let biomarkers = NetworkBiomarkers {
        global_efficiency: global_efficiency(graph),
        average_clustering: average_clustering(graph),
        density: density(graph),
        hub_strength: hub_strength(graph, hub_patterns),
    };
    log::info!(
        "Network biomarkers: efficiency={:.4} clustering={:.4} density={:.4} hub={:.2}",
        biomarkers.global_efficiency,
        biomarkers.average_clustering,
        biomarkers.density,
        biomarkers.hub_strength
    );
    biomarkers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_from_edges(n: usize, edges: &[(usize, usize)]) -> UnGraph<String, f64> {
        let mut graph = UnGraph::<String, f64>::with_capacity(n, edges.len());
        let nodes: Vec<NodeIndex> = (0..n).map(|i| graph.add_node(format!("R{}", i))).collect();
        for &(a, b) in edges {
            graph.add_edge(nodes[a], nodes[b], 1.0);
        }
        graph
    }

    #[test]
    fn test_complete_graph_metrics() {
        // K4: every metric at its maximum
        let g = graph_from_edges(4, &[(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
        assert!((global_efficiency(&g) - 1.0).abs() < 1e-12);
        assert!((average_clustering(&g) - 1.0).abs() < 1e-12);
        assert!((density(&g) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_edgeless_graph_metrics_are_zero() {
        let g = graph_from_edges(5, &[]);
        assert_eq!(global_efficiency(&g), 0.0);
        assert_eq!(average_clustering(&g), 0.0);
        assert_eq!(density(&g), 0.0);
    }

    #[test]
    fn test_path_graph_efficiency() {
        // P3 (0-1-2): pairs at distance 1,1,2 -> (1+1+0.5)*2 / 6
        let g = graph_from_edges(3, &[(0, 1), (1, 2)]);
        let expected = (1.0 + 1.0 + 0.5) * 2.0 / 6.0;
        assert!((global_efficiency(&g) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_triangle_plus_isolate() {
        // Triangle 0-1-2 with isolated node 3
        let g = graph_from_edges(4, &[(0, 1), (1, 2), (0, 2)]);
        // 6 connected ordered pairs at distance 1, out of 12 ordered pairs
        assert!((global_efficiency(&g) - 0.5).abs() < 1e-12);
        // Three nodes with coefficient 1, one isolated with 0
        assert!((average_clustering(&g) - 0.75).abs() < 1e-12);
        assert!((density(&g) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_star_graph_clustering_is_zero() {
        let g = graph_from_edges(4, &[(0, 1), (0, 2), (0, 3)]);
        assert_eq!(average_clustering(&g), 0.0);
    }

    #[test]
    fn test_hub_strength_matches_labels() {
        let mut graph = UnGraph::<String, f64>::with_capacity(4, 3);
        let pcc = graph.add_node("Post Cing".to_string());
        let front = graph.add_node("Frontal".to_string());
        let occ = graph.add_node("Occipital".to_string());
        let temp = graph.add_node("Temporal".to_string());
        graph.add_edge(pcc, front, 1.0);
        graph.add_edge(pcc, occ, 1.0);
        graph.add_edge(front, temp, 1.0);

        let patterns = vec!["Cing".to_string(), "PCC".to_string()];
        assert_eq!(hub_strength(&graph, &patterns), 2.0);
    }

    #[test]
    fn test_hub_strength_no_match_is_zero() {
        let g = graph_from_edges(3, &[(0, 1)]);
        assert_eq!(hub_strength(&g, &["Cing".to_string()]), 0.0);
    }

    #[test]
    fn test_hub_strength_averages_multiple_hubs() {
        let mut graph = UnGraph::<String, f64>::with_capacity(3, 2);
        let a = graph.add_node("L Cing".to_string());
        let b = graph.add_node("R Cing".to_string());
        let c = graph.add_node("Frontal".to_string());
        graph.add_edge(a, c, 1.0);
        graph.add_edge(b, c, 1.0);
        graph.add_edge(a, b, 1.0);

        // degrees: a=2, b=2 -> mean 2
        let patterns = vec!["Cing".to_string()];
        assert_eq!(hub_strength(&graph, &patterns), 2.0);
    }
}
