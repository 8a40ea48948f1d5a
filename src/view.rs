//! Explicit view states
//!
//! The directory and search screens move through a small state machine
//! (loading, loaded, filtered, failed). Modeling it as an enum makes states
//! such as "loading and failed at once" unrepresentable.

use crate::filter::{filter_by_name, filter_members, summarize, AppliedFilters, FilterCriteria};
use crate::graph::ResultBoard;
use crate::member::Member;
use crate::search::ResultGroup;
use tracing::debug;

/// Which independent filter produced the visible list
#[derive(Debug, Clone, PartialEq)]
pub enum ActiveFilter {
    Criteria(AppliedFilters),
    Name(String),
}

/// State of the member directory screen
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DirectoryView {
    #[default]
    Loading,
    Loaded {
        members: Vec<Member>,
    },
    Filtered {
        members: Vec<Member>,
        visible: Vec<Member>,
        filter: ActiveFilter,
    },
    Failed {
        message: String,
    },
}

impl DirectoryView {
    pub fn loading() -> Self {
        DirectoryView::Loading
    }

    pub fn loaded(members: Vec<Member>) -> Self {
        DirectoryView::Loaded { members }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        DirectoryView::Failed {
            message: message.into(),
        }
    }

    /// Every member, regardless of filters
    pub fn members(&self) -> &[Member] {
        match self {
            DirectoryView::Loaded { members } | DirectoryView::Filtered { members, .. } => members.as_slice(),
            DirectoryView::Loading | DirectoryView::Failed { .. } => &[],
        }
    }

    /// Members currently shown
    pub fn visible(&self) -> &[Member] {
        match self {
            DirectoryView::Filtered { visible, .. } => visible.as_slice(),
            other => other.members(),
        }
    }

    /// Chips of the active criteria filter, if any
    pub fn applied(&self) -> Option<&AppliedFilters> {
        match self {
            DirectoryView::Filtered {
                filter: ActiveFilter::Criteria(applied),
                ..
            } => Some(applied),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, DirectoryView::Loaded { .. } | DirectoryView::Filtered { .. })
    }

    /// Filter by criteria; criteria with no active constraint go back to
    /// the unfiltered list
    pub fn apply_criteria(self, criteria: &FilterCriteria) -> Self {
        if !self.is_ready() {
            debug!("ignoring criteria filter while the directory is not loaded");
            return self;
        }
        let members = self.into_members();

        match summarize(criteria) {
            None => DirectoryView::Loaded { members },
            Some(applied) => {
                let visible = filter_members(&members, Some(&applied.criteria));
                DirectoryView::Filtered {
                    members,
                    visible,
                    filter: ActiveFilter::Criteria(applied),
                }
            }
        }
    }

    /// Filter by name; replaces any criteria filter
    pub fn apply_name(self, query: &str) -> Self {
        if !self.is_ready() {
            debug!("ignoring name filter while the directory is not loaded");
            return self;
        }
        let members = self.into_members();

        let query = query.trim();
        if query.is_empty() {
            return DirectoryView::Loaded { members };
        }

        let visible = filter_by_name(&members, query);
        DirectoryView::Filtered {
            members,
            visible,
            filter: ActiveFilter::Name(query.to_string()),
        }
    }

    pub fn clear_filter(self) -> Self {
        match self {
            DirectoryView::Filtered { members, .. } => DirectoryView::Loaded { members },
            other => other,
        }
    }

    fn into_members(self) -> Vec<Member> {
        match self {
            DirectoryView::Loaded { members } | DirectoryView::Filtered { members, .. } => members,
            DirectoryView::Loading | DirectoryView::Failed { .. } => Vec::new(),
        }
    }
}

/// State of the search screen
#[derive(Debug, Clone, Default)]
pub enum SearchView {
    #[default]
    Idle,
    Searching {
        question: String,
    },
    Results {
        question: String,
        board: ResultBoard,
    },
    NoResults {
        question: String,
    },
    Failed {
        message: String,
    },
}

impl SearchView {
    pub fn searching(question: impl Into<String>) -> Self {
        SearchView::Searching {
            question: question.into(),
        }
    }

    /// Settle a pending search with the groups the service returned
    ///
    /// Groups that are all empty settle into `NoResults`.
    pub fn resolve(self, groups: &[ResultGroup]) -> Self {
        let question = match self {
            SearchView::Searching { question } => question,
            other => {
                debug!("ignoring search results with no search in flight");
                return other;
            }
        };

        let board = ResultBoard::build(groups);
        if board.is_empty() {
            SearchView::NoResults { question }
        } else {
            SearchView::Results { question, board }
        }
    }

    pub fn fail(self, message: impl Into<String>) -> Self {
        SearchView::Failed {
            message: message.into(),
        }
    }

    pub fn board(&self) -> Option<&ResultBoard> {
        match self {
            SearchView::Results { board, .. } => Some(board),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::Recommendation;

    fn roster() -> Vec<Member> {
        let mut a = Member::new(1, "Ana", "Tremblay", "ana@example.org");
        a.affiliation_organization = "Mila".into();
        let mut b = Member::new(2, "Bob", "Roy", "bob@example.org");
        b.affiliation_organization = "CHUM".into();
        vec![a, b]
    }

    #[test]
    fn test_filters_ignored_while_loading() {
        let view = DirectoryView::loading().apply_name("ana");
        assert_eq!(view, DirectoryView::Loading);
        assert!(view.visible().is_empty());
    }

    #[test]
    fn test_criteria_filter_and_clear() {
        let view = DirectoryView::loaded(roster())
            .apply_criteria(&FilterCriteria::new().with_organizations(["mila"]));
        assert_eq!(view.visible().len(), 1);
        assert_eq!(view.members().len(), 2);
        assert_eq!(view.applied().unwrap().chips.len(), 1);

        let view = view.clear_filter();
        assert!(matches!(view, DirectoryView::Loaded { .. }));
        assert_eq!(view.visible().len(), 2);
    }

    #[test]
    fn test_unconstrained_criteria_return_to_loaded() {
        let view = DirectoryView::loaded(roster()).apply_criteria(&FilterCriteria::default());
        assert!(matches!(view, DirectoryView::Loaded { .. }));
        assert!(view.applied().is_none());
    }

    #[test]
    fn test_name_filter_replaces_criteria() {
        let view = DirectoryView::loaded(roster())
            .apply_criteria(&FilterCriteria::new().with_organizations(["Mila"]))
            .apply_name("roy");
        assert_eq!(view.visible().len(), 1);
        assert_eq!(view.visible()[0].first_name, "Bob");
        assert!(view.applied().is_none());
    }

    #[test]
    fn test_search_view_no_results() {
        let view = SearchView::searching("vision").resolve(&[ResultGroup::new("A", vec![])]);
        assert!(matches!(view, SearchView::NoResults { .. }));
    }

    #[test]
    fn test_search_view_results() {
        let member = Member::new(5, "Ana", "Tremblay", "ana@example.org");
        let groups = vec![ResultGroup::new("A", vec![Recommendation::new(member, 0.1)])];
        let view = SearchView::searching("vision").resolve(&groups);
        assert_eq!(view.board().unwrap().expert_count(), 1);
    }

    #[test]
    fn test_results_without_pending_search_are_ignored() {
        let view = SearchView::Idle.resolve(&[]);
        assert!(matches!(view, SearchView::Idle));
    }
}
