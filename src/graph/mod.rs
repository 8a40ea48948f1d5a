//! Result board graph model
//!
//! This module turns search results into a graph for force-directed
//! rendering:
//! - Category hubs and expert leaves with non-overlapping ids
//! - Category -> expert edges labeled with the match percentage
//! - A fixed red-to-green score gradient and its legend
//! - Word-wrapped category labels

pub mod board;
pub mod color;
pub mod edge;
pub mod label;
pub mod node;
pub mod types;

// Re-export main types
pub use board::ResultBoard;
pub use color::{legend, match_label, match_percent, score_color, LegendStop, Rgb};
pub use edge::GraphEdge;
pub use label::{wrap_label, wrap_lines, CATEGORY_LABEL_WIDTH};
pub use node::{GraphNode, NodeKind};
pub use types::{EdgeId, NodeId, NodeShape};
