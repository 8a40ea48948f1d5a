//! Directory service client
//!
//! `DirectoryClient` is the seam between the views and the remote service.
//! `RemoteClient` implements it over HTTP.

pub mod error;
pub mod remote;

use crate::filter::FilterCriteria;
use crate::member::{Member, MemberId};
use crate::search::ResultGroup;
use async_trait::async_trait;

pub use error::{DirectoryError, DirectoryResult};
pub use remote::{RemoteClient, ServiceStatus};

#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// Ranked experts per category; "no experts" is an empty list
    async fn search(&self, question: &str) -> DirectoryResult<Vec<ResultGroup>>;

    /// Every member; an empty directory is an empty list
    async fn list_members(&self) -> DirectoryResult<Vec<Member>>;

    async fn get_member(&self, id: MemberId) -> DirectoryResult<Option<Member>>;

    /// Members matching the criteria, filtered by the service
    async fn filter_members(&self, criteria: &FilterCriteria) -> DirectoryResult<Vec<Member>>;
}
