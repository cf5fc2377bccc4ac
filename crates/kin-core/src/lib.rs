//! Kin Core - Domain model
//!
//! This crate defines the passive data entities the rest of Kin works
//! with: a family member ([`Person`]) and the residence coordinates
//! attached to one ([`GeoCoordinates`]).
//!
//! Records here hold relationship links as plain id strings, never as
//! owning references. The relationship index in `kin-graph` is the only
//! component that interprets those ids.

mod person;

pub use person::{GeoCoordinates, Person};
