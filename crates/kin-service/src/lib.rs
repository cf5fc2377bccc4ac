//! Kin Service - The single entry point collaborators use
//!
//! [`FamilyService`] owns both of the underlying structures (the
//! [`kin_graph::FamilyTree`] relationship index and the
//! [`kin_graph::DistanceGraph`]) and keeps them synchronized on every
//! add, update, and removal. Nothing else holds references into both,
//! so there is no aliasing to reason about: each public operation is an
//! atomic unit from the caller's point of view.
//!
//! Presentation layers (forms, maps, tree diagrams) sit on top of the
//! read accessors here; the service never calls back into them.

mod service;
mod stats;

pub use service::FamilyService;
pub use stats::FamilyStatistics;
