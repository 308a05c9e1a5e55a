//! Bounding-box adjacency graph construction.
//!
//! Two regions are adjacent iff their axis-aligned bounding boxes overlap
//! once each side is expanded by a fixed tolerance. This is a deliberate
//! approximation of true border adjacency: cheap, symmetric, and
//! order-independent. It can false-positive for regions that are near but
//! not touching, and false-negative for regions whose shared border is
//! thinner than their boxes suggest. Both are accepted trade-offs of the
//! map contract, not defects to correct with polygon intersection.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::ADJACENCY_TOLERANCE;

use super::geometry::{BBox, GeometryProvider};

/// Undirected adjacency relation over region identifiers.
#[derive(Debug, Clone, Default)]
pub struct AdjacencyGraph {
    edges: BTreeMap<String, BTreeSet<String>>,
}

impl AdjacencyGraph {
    /// Builds the graph for `ids`, querying `provider` once per region.
    ///
    /// Each unordered pair is tested once and recorded in both directions,
    /// so the result is symmetric by construction. A region whose geometry
    /// is unavailable stays in the graph as an isolated node; the failed
    /// lookup is logged and every pair involving it is non-adjacent. The
    /// builder never fails.
    pub fn build(provider: &impl GeometryProvider, ids: &[String]) -> AdjacencyGraph {
        let mut edges: BTreeMap<String, BTreeSet<String>> = ids
            .iter()
            .map(|id| (id.clone(), BTreeSet::new()))
            .collect();

        let boxes: Vec<Option<BBox>> = ids
            .iter()
            .map(|id| {
                let bounds = provider.bounding_box(id);
                if bounds.is_none() {
                    tracing::warn!(region = %id, "no bounding box; region left isolated");
                }
                bounds
            })
            .collect();

        for i in 0..ids.len() {
            for j in (i + 1)..ids.len() {
                if let (Some(a), Some(b)) = (boxes[i], boxes[j]) {
                    if a.overlaps_within(&b, ADJACENCY_TOLERANCE) {
                        if let Some(set) = edges.get_mut(&ids[i]) {
                            set.insert(ids[j].clone());
                        }
                        if let Some(set) = edges.get_mut(&ids[j]) {
                            set.insert(ids[i].clone());
                        }
                    }
                }
            }
        }

        AdjacencyGraph { edges }
    }

    /// Returns the neighbor set of a region.
    pub fn neighbors(&self, id: &str) -> Option<&BTreeSet<String>> {
        self.edges.get(id)
    }

    /// Returns true if `a` and `b` are adjacent.
    pub fn are_adjacent(&self, a: &str, b: &str) -> bool {
        self.edges.get(a).map_or(false, |set| set.contains(b))
    }

    /// Number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Iterates (region, neighbors) pairs in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeSet<String>)> {
        self.edges.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::geometry::Point;

    struct FixedBoxes(Vec<(String, BBox)>);

    impl GeometryProvider for FixedBoxes {
        fn bounding_box(&self, region: &str) -> Option<BBox> {
            self.0.iter().find(|(id, _)| id == region).map(|(_, b)| *b)
        }

        fn boundary_point(&self, region: &str) -> Option<Point> {
            self.bounding_box(region).map(|b| Point::new(b.x, b.y))
        }
    }

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn touching_boxes_are_adjacent() {
        let provider = FixedBoxes(vec![
            ("a".to_string(), BBox::new(0.0, 0.0, 10.0, 10.0)),
            ("b".to_string(), BBox::new(10.0, 0.0, 10.0, 10.0)),
        ]);
        let graph = AdjacencyGraph::build(&provider, &ids(&["a", "b"]));
        assert!(graph.are_adjacent("a", "b"));
        assert!(graph.are_adjacent("b", "a"));
    }

    #[test]
    fn distant_boxes_are_not_adjacent() {
        let provider = FixedBoxes(vec![
            ("a".to_string(), BBox::new(0.0, 0.0, 10.0, 10.0)),
            ("b".to_string(), BBox::new(50.0, 50.0, 10.0, 10.0)),
        ]);
        let graph = AdjacencyGraph::build(&provider, &ids(&["a", "b"]));
        assert!(!graph.are_adjacent("a", "b"));
    }

    #[test]
    fn graph_is_symmetric() {
        let provider = FixedBoxes(vec![
            ("a".to_string(), BBox::new(0.0, 0.0, 10.0, 10.0)),
            ("b".to_string(), BBox::new(9.0, 0.0, 10.0, 10.0)),
            ("c".to_string(), BBox::new(18.0, 0.0, 10.0, 10.0)),
            ("d".to_string(), BBox::new(0.0, 30.0, 10.0, 10.0)),
        ]);
        let names = ids(&["a", "b", "c", "d"]);
        let graph = AdjacencyGraph::build(&provider, &names);

        for (id, neighbors) in graph.iter() {
            for neighbor in neighbors {
                assert!(
                    graph.are_adjacent(neighbor, id),
                    "edge {} -> {} missing its reverse",
                    id,
                    neighbor
                );
            }
        }
    }

    #[test]
    fn missing_geometry_isolates_only_that_region() {
        let provider = FixedBoxes(vec![
            ("a".to_string(), BBox::new(0.0, 0.0, 10.0, 10.0)),
            ("b".to_string(), BBox::new(10.0, 0.0, 10.0, 10.0)),
        ]);
        let graph = AdjacencyGraph::build(&provider, &ids(&["a", "b", "ghost"]));

        assert_eq!(graph.len(), 3);
        assert!(graph.neighbors("ghost").unwrap().is_empty());
        assert!(graph.are_adjacent("a", "b"));
    }

    #[test]
    fn degenerate_box_is_a_node_and_can_touch_within_tolerance() {
        let provider = FixedBoxes(vec![
            ("point".to_string(), BBox::new(10.5, 5.0, 0.0, 0.0)),
            ("a".to_string(), BBox::new(0.0, 0.0, 10.0, 10.0)),
            ("far".to_string(), BBox::new(40.0, 40.0, 10.0, 10.0)),
        ]);
        let graph = AdjacencyGraph::build(&provider, &ids(&["point", "a", "far"]));

        // Gap of 0.5 is inside the 1-unit tolerance.
        assert!(graph.are_adjacent("point", "a"));
        assert!(!graph.are_adjacent("point", "far"));
    }
}
