//! Board nodes
//!
//! A board has two kinds of nodes: one hub per non-empty result category and
//! one leaf per distinct recommended member.

use super::label::{wrap_label, CATEGORY_LABEL_WIDTH};
use super::types::{NodeId, NodeShape};
use crate::member::{Member, MemberId};
use serde::{Deserialize, Serialize};

/// What a node stands for
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKind {
    Category { name: String },
    Expert { member_id: MemberId },
}

/// A node of the result board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: NodeId,

    /// Display label; category labels are pre-wrapped with `\n`
    pub label: String,

    #[serde(flatten)]
    pub kind: NodeKind,

    pub shape: NodeShape,

    /// Category nodes carry their own id as group; experts carry the
    /// group of the category that introduced them
    pub group: NodeId,
}

impl GraphNode {
    /// Create a category hub with a wrapped label
    pub fn category(id: NodeId, name: impl Into<String>) -> Self {
        let name = name.into();
        GraphNode {
            id,
            label: wrap_label(&name, CATEGORY_LABEL_WIDTH),
            kind: NodeKind::Category { name },
            shape: NodeShape::Box,
            group: id,
        }
    }

    /// Create an expert leaf for `member`, grouped under `category`
    pub fn expert(id: NodeId, member: &Member, category: NodeId) -> Self {
        GraphNode {
            id,
            label: member.full_name(),
            kind: NodeKind::Expert {
                member_id: member.user_id,
            },
            shape: NodeShape::Dot,
            group: category,
        }
    }

    pub fn is_category(&self) -> bool {
        matches!(self.kind, NodeKind::Category { .. })
    }

    pub fn is_expert(&self) -> bool {
        matches!(self.kind, NodeKind::Expert { .. })
    }

    pub fn member_id(&self) -> Option<MemberId> {
        match self.kind {
            NodeKind::Expert { member_id } => Some(member_id),
            NodeKind::Category { .. } => None,
        }
    }
}

impl PartialEq for GraphNode {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for GraphNode {}

impl std::hash::Hash for GraphNode {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_node() {
        let node = GraphNode::category(NodeId::new(2), "Spécialiste en santé numérique et données");
        assert!(node.is_category());
        assert_eq!(node.shape, NodeShape::Box);
        assert_eq!(node.group, NodeId::new(2));
        assert!(node.label.contains('\n'));
        assert_eq!(node.member_id(), None);
    }

    #[test]
    fn test_expert_node() {
        let member = Member::new(57, "Ana", "Tremblay", "ana@example.org");
        let node = GraphNode::expert(NodeId::new(9), &member, NodeId::new(1));
        assert!(node.is_expert());
        assert_eq!(node.label, "Ana Tremblay");
        assert_eq!(node.member_id(), Some(MemberId::new(57)));
        assert_eq!(node.group, NodeId::new(1));
    }

    #[test]
    fn test_node_serialization_is_flat() {
        let member = Member::new(57, "Ana", "Tremblay", "ana@example.org");
        let node = GraphNode::expert(NodeId::new(9), &member, NodeId::new(1));
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["id"], 9);
        assert_eq!(json["kind"], "expert");
        assert_eq!(json["member_id"], 57);
        assert_eq!(json["shape"], "dot");
    }

    #[test]
    fn test_node_equality() {
        let a = GraphNode::category(NodeId::new(1), "A");
        let b = GraphNode::category(NodeId::new(1), "B");
        let c = GraphNode::category(NodeId::new(3), "A");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
