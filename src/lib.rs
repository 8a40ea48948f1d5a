//! Expert Directory
//!
//! Member directory and expert finder for a healthcare-AI community of
//! practice.
//!
//! # Components
//!
//! - `graph`: turns ranked search results into a node/edge board with
//!   quality-colored links
//! - `filter`: criteria and name filtering over the member list, plus the
//!   applied-filter chips
//! - `roster`: the member table, with CSV import/export of the community sheet
//! - `http`: the directory API served over the roster
//! - `client`: the client side of that API
//! - `view`: explicit loading/loaded/filtered/failed screen states
//!
//! ## Example Usage
//!
//! ```rust
//! use expert_directory::{Member, Recommendation, ResultBoard, ResultGroup};
//!
//! let ana = Member::new(7, "Ana", "Tremblay", "ana@example.org");
//! let groups = vec![
//!     ResultGroup::new("Data scientist", vec![Recommendation::new(ana.clone(), 0.1)]),
//!     ResultGroup::new("Clinicien", vec![Recommendation::new(ana, 0.4)]),
//! ];
//!
//! let board = ResultBoard::build(&groups);
//! assert_eq!(board.category_count(), 2);
//! assert_eq!(board.expert_count(), 1);
//! assert_eq!(board.edge_count(), 2);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod filter;
pub mod graph;
pub mod http;
pub mod member;
pub mod roster;
pub mod search;
pub mod view;

// Re-export main types for convenience
pub use graph::{EdgeId, GraphEdge, GraphNode, NodeId, NodeKind, ResultBoard};

pub use member::{Member, MemberField, MemberId};

pub use search::{Recommendation, ResultGroup, SearchResponse};

pub use filter::{
    filter_by_name, filter_members, summarize, AppliedFilters, ExperienceRange, FilterChip,
    FilterCriteria, FilterError,
};

pub use roster::{ImportReport, MemberUpdate, Roster, RosterError, RosterResult};

pub use config::{ApiConfig, ConfigError, ServerConfig};

pub use client::{DirectoryClient, DirectoryError, DirectoryResult, RemoteClient};

pub use http::HttpServer;

pub use view::{DirectoryView, SearchView};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
