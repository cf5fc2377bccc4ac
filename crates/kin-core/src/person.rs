//! The family member record.
//!
//! A `Person` carries its own identity and its relationship links as
//! id strings. Links are back-references, not ownership: removing the
//! record an id points at does not touch the record holding the id.

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A geographic residence: latitude/longitude in degrees plus a
/// free-text address the core stores but never interprets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinates {
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
}

impl GeoCoordinates {
    /// Creates coordinates from degrees and an address label.
    pub fn new(latitude: f64, longitude: f64, address: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            address: address.into(),
        }
    }
}

/// One member of the family.
///
/// The `age` field is a cache; call [`Person::calculate_age`] to bring
/// it up to date from `birth_date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    /// Unique, stable identity. Assigned at construction.
    pub id: String,
    pub full_name: String,
    pub id_number: String,
    pub birth_date: NaiveDate,
    /// Cached age in whole years, derived from `birth_date`.
    pub age: u32,
    pub is_alive: bool,
    /// Opaque path or handle to a photo. Not interpreted by the core.
    pub photo_path: Option<String>,
    pub residence: GeoCoordinates,

    /// Back-reference to the father's id, if recorded.
    pub father_id: Option<String>,
    /// Back-reference to the mother's id, if recorded.
    pub mother_id: Option<String>,
    /// Ids of direct children, insertion order, no duplicates.
    pub children_ids: Vec<String>,
    /// Symmetric spouse link, maintained by the relationship index.
    pub spouse_id: Option<String>,
}

impl Person {
    /// Creates a person with a fresh v4 uuid and default fields.
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            full_name: full_name.into(),
            id_number: String::new(),
            birth_date: NaiveDate::default(),
            age: 0,
            is_alive: true,
            photo_path: None,
            residence: GeoCoordinates::default(),
            father_id: None,
            mother_id: None,
            children_ids: Vec::new(),
            spouse_id: None,
        }
    }

    /// Sets the national id number.
    pub fn with_id_number(mut self, id_number: impl Into<String>) -> Self {
        self.id_number = id_number.into();
        self
    }

    /// Sets the birth date and refreshes the cached age.
    pub fn with_birth_date(mut self, birth_date: NaiveDate) -> Self {
        self.birth_date = birth_date;
        self.calculate_age();
        self
    }

    /// Sets the residence coordinates.
    pub fn with_residence(mut self, residence: GeoCoordinates) -> Self {
        self.residence = residence;
        self
    }

    /// Sets the photo reference.
    pub fn with_photo_path(mut self, path: impl Into<String>) -> Self {
        self.photo_path = Some(path.into());
        self
    }

    /// Recomputes the cached `age` from `birth_date` and today's date.
    pub fn calculate_age(&mut self) {
        self.age = self.age_on(Local::now().date_naive());
    }

    /// Age in whole years on the given reference date.
    ///
    /// The year difference is decremented when the birthday has not yet
    /// occurred in the reference year. A birth date in the future
    /// clamps to zero.
    pub fn age_on(&self, today: NaiveDate) -> u32 {
        let mut years = today.year() - self.birth_date.year();
        if (self.birth_date.month(), self.birth_date.day()) > (today.month(), today.day()) {
            years -= 1;
        }
        years.max(0) as u32
    }
}
