//! Kin Graph - Relationship index and geo-distance graph
//!
//! This crate holds the two data structures at the heart of Kin:
//!
//! - [`FamilyTree`]: owns every [`kin_core::Person`] record, enforces
//!   the link invariants (symmetric spouse links, parent/child
//!   back-references), and answers direct and derived relationship
//!   queries by graph traversal.
//! - [`DistanceGraph`]: a complete undirected graph over the members'
//!   residence coordinates, weighted by great-circle distance.
//!
//! The two structures never reference each other. `kin-service`
//! composes them and keeps them in sync on every mutation.
//!
//! # Example
//!
//! ```
//! use kin_core::Person;
//! use kin_graph::FamilyTree;
//!
//! let mut tree = FamilyTree::new();
//! let father = Person::new("Carlos");
//! let father_id = father.id.clone();
//! tree.add_person(father, None, None);
//!
//! let child = Person::new("Ana");
//! tree.add_person(child, Some(&father_id), None);
//!
//! assert_eq!(tree.children(&father_id).len(), 1);
//! ```

mod geo;
mod tree;

pub use geo::{haversine_km, DistanceGraph, GeoNode, EARTH_RADIUS_KM, NO_EDGE};
pub use tree::FamilyTree;
