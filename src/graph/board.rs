//! Result board construction
//!
//! Turns the ranked result groups of a search into a node/edge model for the
//! force-directed widget:
//! - one category hub per non-empty group, id `group index + 1`
//! - one expert leaf per distinct member, whichever group mentions it first
//! - one edge per recommendation
//!
//! Expert ids come from an explicit member -> node table and start after the
//! last possible category id, so the two ranges can never overlap.

use super::color::{legend, LegendStop};
use super::edge::GraphEdge;
use super::node::{GraphNode, NodeKind};
use super::types::{EdgeId, NodeId};
use crate::member::{Member, MemberId};
use crate::search::ResultGroup;
use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::debug;

/// Graph model of one search result
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResultBoard {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,

    /// NodeId -> position in `nodes`
    #[serde(skip)]
    node_index: FxHashMap<NodeId, usize>,

    /// Canonical expert node per member
    #[serde(skip)]
    expert_nodes: FxHashMap<MemberId, NodeId>,

    /// Reverse lookup used when a rendered node is selected
    #[serde(skip)]
    members: FxHashMap<NodeId, Member>,
}

impl ResultBoard {
    /// Build the board for a list of result groups
    pub fn build(groups: &[ResultGroup]) -> Self {
        let mut board = ResultBoard::default();
        let mut next_expert_id = groups.len() as u64 + 1;
        let mut next_edge_id = 1u64;

        for (index, group) in groups.iter().enumerate() {
            if group.is_empty() {
                continue;
            }

            let category_id = NodeId::new(index as u64 + 1);
            board.push_node(GraphNode::category(category_id, &group.category));

            for recommendation in &group.recommendation {
                let member = &recommendation.expert;
                let expert_id = match board.expert_nodes.get(&member.user_id) {
                    Some(id) => *id,
                    None => {
                        let id = NodeId::new(next_expert_id);
                        next_expert_id += 1;
                        board.push_node(GraphNode::expert(id, member, category_id));
                        board.expert_nodes.insert(member.user_id, id);
                        board.members.insert(id, member.clone());
                        id
                    }
                };

                board.edges.push(GraphEdge::new(
                    EdgeId::new(next_edge_id),
                    category_id,
                    expert_id,
                    recommendation.score,
                ));
                next_edge_id += 1;
            }
        }

        debug!(
            categories = board.category_count(),
            experts = board.expert_count(),
            edges = board.edges.len(),
            "built result board"
        );

        board
    }

    fn push_node(&mut self, node: GraphNode) {
        self.node_index.insert(node.id, self.nodes.len());
        self.nodes.push(node);
    }

    /// True when no group had any recommendation
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.node_index.get(&id).map(|&i| &self.nodes[i])
    }

    pub fn category_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_category()).count()
    }

    pub fn expert_count(&self) -> usize {
        self.expert_nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Member behind a selected expert node; `None` for category hubs
    pub fn member_for(&self, id: NodeId) -> Option<&Member> {
        self.members.get(&id)
    }

    /// Category name behind a selected hub
    pub fn category_for(&self, id: NodeId) -> Option<&str> {
        match &self.node(id)?.kind {
            NodeKind::Category { name } => Some(name.as_str()),
            NodeKind::Expert { .. } => None,
        }
    }

    /// Canonical node of a member, if the member was recommended at all
    pub fn node_for_member(&self, member_id: MemberId) -> Option<NodeId> {
        self.expert_nodes.get(&member_id).copied()
    }

    /// Edges touching a node, in build order
    pub fn edges_of(&self, id: NodeId) -> impl Iterator<Item = &GraphEdge> {
        self.edges
            .iter()
            .filter(move |e| e.source == id || e.target == id)
    }

    /// Score legend displayed beside the board
    pub fn legend(&self) -> Vec<LegendStop> {
        legend()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::Recommendation;

    fn member(id: u64, first: &str) -> Member {
        Member::new(id, first, "Test", format!("{first}@example.org").to_lowercase())
    }

    fn group(name: &str, recs: Vec<(Member, f64)>) -> ResultGroup {
        ResultGroup::new(
            name,
            recs.into_iter()
                .map(|(m, s)| Recommendation::new(m, s))
                .collect(),
        )
    }

    #[test]
    fn test_empty_input() {
        let board = ResultBoard::build(&[]);
        assert!(board.is_empty());
        assert_eq!(board.edge_count(), 0);
    }

    #[test]
    fn test_empty_groups_create_no_nodes() {
        let groups = vec![group("A", vec![]), group("B", vec![])];
        let board = ResultBoard::build(&groups);
        assert!(board.is_empty());
    }

    #[test]
    fn test_category_ids_follow_input_index() {
        let groups = vec![
            group("A", vec![(member(1, "Ana"), 0.1)]),
            group("Empty", vec![]),
            group("C", vec![(member(2, "Bob"), 0.2)]),
        ];
        let board = ResultBoard::build(&groups);

        assert_eq!(board.category_count(), 2);
        assert_eq!(board.category_for(NodeId::new(1)), Some("A"));
        assert_eq!(board.category_for(NodeId::new(2)), None);
        assert_eq!(board.category_for(NodeId::new(3)), Some("C"));
    }

    #[test]
    fn test_expert_ids_never_collide_with_categories() {
        let groups: Vec<ResultGroup> = (0..5)
            .map(|i| group(&format!("Cat {i}"), vec![(member(i, "X"), 0.3)]))
            .collect();
        let board = ResultBoard::build(&groups);

        let category_ids: Vec<NodeId> = board.nodes.iter().filter(|n| n.is_category()).map(|n| n.id).collect();
        for node in board.nodes.iter().filter(|n| n.is_expert()) {
            assert!(!category_ids.contains(&node.id));
        }
    }

    #[test]
    fn test_shared_member_has_one_node() {
        let shared = member(57, "Ana");
        let groups = vec![
            group("A", vec![(shared.clone(), 0.1)]),
            group("B", vec![(shared.clone(), 0.4), (member(3, "Bob"), 0.2)]),
        ];
        let board = ResultBoard::build(&groups);

        assert_eq!(board.expert_count(), 2);
        let node = board.node_for_member(MemberId::new(57)).unwrap();
        assert_eq!(board.edges_of(node).count(), 2);
        // First referencing category owns the node
        assert_eq!(board.node(node).unwrap().group, NodeId::new(1));
    }

    #[test]
    fn test_reverse_lookup() {
        let groups = vec![group("A", vec![(member(23, "Ana"), 0.1)])];
        let board = ResultBoard::build(&groups);

        let node = board.node_for_member(MemberId::new(23)).unwrap();
        assert_eq!(board.member_for(node).unwrap().first_name, "Ana");
        assert!(board.member_for(NodeId::new(1)).is_none());
    }

    #[test]
    fn test_edges_carry_labels() {
        let groups = vec![group("A", vec![(member(1, "Ana"), 0.0), (member(2, "Bob"), 1.0)])];
        let board = ResultBoard::build(&groups);

        let labels: Vec<&str> = board.edges.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["100%", "0%"]);
        assert_eq!(board.edges[0].id, EdgeId::new(1));
        assert_eq!(board.edges[1].id, EdgeId::new(2));
    }

    #[test]
    fn test_serialized_board_omits_lookup_tables() {
        let groups = vec![group("A", vec![(member(1, "Ana"), 0.2)])];
        let board = ResultBoard::build(&groups);
        let json = serde_json::to_value(&board).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 2);
        assert_eq!(json["nodes"].as_array().unwrap().len(), 2);
        assert_eq!(json["edges"].as_array().unwrap().len(), 1);
    }
}
