//! Board edges
//!
//! An edge links a category hub to one of the experts it recommends. It
//! carries the match percentage as its label and the gradient color for the
//! same score.

use super::color::{match_label, score_color};
use super::types::{EdgeId, NodeId};
use serde::{Deserialize, Serialize};

/// A directed category -> expert edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: EdgeId,

    /// Category hub
    pub source: NodeId,

    /// Expert leaf
    pub target: NodeId,

    /// e.g. `"82%"`
    pub label: String,

    /// `#rrggbb`
    pub color: String,

    /// Raw distance as received, 0 is the best match
    pub score: f64,
}

impl GraphEdge {
    pub fn new(id: EdgeId, source: NodeId, target: NodeId, score: f64) -> Self {
        GraphEdge {
            id,
            source,
            target,
            label: match_label(score),
            color: score_color(score).to_hex(),
            score,
        }
    }

    pub fn connects(&self, a: NodeId, b: NodeId) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_label_and_color() {
        let edge = GraphEdge::new(EdgeId::new(1), NodeId::new(1), NodeId::new(10), 0.0);
        assert_eq!(edge.label, "100%");
        assert_eq!(edge.color, "#00ff00");

        let edge = GraphEdge::new(EdgeId::new(2), NodeId::new(1), NodeId::new(11), 0.5);
        assert_eq!(edge.label, "50%");
        assert_eq!(edge.color, "#ffff00");
    }

    #[test]
    fn test_connects() {
        let edge = GraphEdge::new(EdgeId::new(1), NodeId::new(1), NodeId::new(10), 0.2);
        assert!(edge.connects(NodeId::new(1), NodeId::new(10)));
        assert!(edge.connects(NodeId::new(10), NodeId::new(1)));
        assert!(!edge.connects(NodeId::new(1), NodeId::new(11)));
    }
}
