//! Cross-cutting distance statistics.

use kin_core::Person;
use serde::{Deserialize, Serialize};

/// Pairwise-distance statistics over the whole family.
///
/// With fewer than two members every field stays at its default: no
/// pair identified, all distances zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FamilyStatistics {
    /// The pair of members living farthest apart.
    pub farthest_pair: Option<(Person, Person)>,
    pub max_distance: f64,

    /// The pair of members living closest together.
    pub closest_pair: Option<(Person, Person)>,
    pub min_distance: f64,

    /// Arithmetic mean over all unordered member pairs.
    pub average_distance: f64,
}
