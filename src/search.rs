//! Search results as returned by the recommendation service
//!
//! A search produces, per generic expert profile ("category"), an ordered
//! list of recommended members with a distance-like score where 0 is the
//! best possible match.

use crate::member::Member;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// A recommended member and its match distance in [0, 1]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub expert: Member,
    pub score: f64,
}

impl Recommendation {
    pub fn new(expert: Member, score: f64) -> Self {
        Self { expert, score }
    }
}

/// A named category with its ranked recommendations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultGroup {
    pub category: String,
    #[serde(default, deserialize_with = "matched_recommendations")]
    pub recommendation: Vec<Recommendation>,
}

/// Recommendation as sent by the service, whose expert may no longer exist
#[derive(Deserialize)]
struct WireRecommendation {
    #[serde(default)]
    expert: Option<Member>,
    score: f64,
}

/// Drop recommendations whose expert has no member record
fn matched_recommendations<'de, D>(deserializer: D) -> Result<Vec<Recommendation>, D::Error>
where
    D: Deserializer<'de>,
{
    let wire = Option::<Vec<WireRecommendation>>::deserialize(deserializer)?.unwrap_or_default();
    let total = wire.len();
    let matched: Vec<Recommendation> = wire
        .into_iter()
        .filter_map(|r| r.expert.map(|expert| Recommendation::new(expert, r.score)))
        .collect();

    if matched.len() < total {
        warn!(dropped = total - matched.len(), "recommendations without a member record");
    }
    Ok(matched)
}

impl ResultGroup {
    pub fn new(category: impl Into<String>, recommendation: Vec<Recommendation>) -> Self {
        Self {
            category: category.into(),
            recommendation,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.recommendation.is_empty()
    }
}

/// Wire body of a search response: `{"experts": [...]}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub experts: Vec<ResultGroup>,
}

impl SearchResponse {
    /// Total number of recommendations across all groups
    pub fn recommendation_count(&self) -> usize {
        self.experts.iter().map(|g| g.recommendation.len()).sum()
    }
}

impl From<SearchResponse> for Vec<ResultGroup> {
    fn from(response: SearchResponse) -> Self {
        response.experts
    }
}
