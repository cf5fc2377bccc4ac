//! The family service façade.
//!
//! Mutations run two-sided: the relationship index first, then the
//! distance graph, with a full edge rebuild after every geo-affecting
//! change. Simplicity over asymptotic efficiency: each addition or
//! update pays the O(n²) rebuild.

use crate::stats::FamilyStatistics;
use kin_core::Person;
use kin_graph::{haversine_km, DistanceGraph, FamilyTree};
use std::collections::HashMap;
use tracing::info;

/// Sole owner of the relationship index and the distance graph.
#[derive(Debug, Default)]
pub struct FamilyService {
    tree: FamilyTree,
    geo: DistanceGraph,
}

impl FamilyService {
    /// Creates a service over an empty family.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a person to the index and, on success, to the distance
    /// graph, followed by a full edge rebuild.
    pub fn add_person(
        &mut self,
        person: Person,
        father_id: Option<&str>,
        mother_id: Option<&str>,
    ) -> bool {
        let id = person.id.clone();
        let residence = person.residence.clone();

        if !self.tree.add_person(person, father_id, mother_id) {
            return false;
        }

        self.geo.add_node(id.clone(), residence);
        self.geo.rebuild_edges();
        info!("person {} added, {} members", id, self.tree.len());
        true
    }

    /// Overwrites the mutable fields of an existing record in place.
    ///
    /// Identity, parent links, children, and the spouse link are left
    /// untouched. The distance graph node is removed and re-added so a
    /// changed residence takes effect, then all edges are rebuilt.
    pub fn update_person(&mut self, updated: Person) -> bool {
        let id = updated.id.clone();
        let residence = updated.residence.clone();

        let Some(existing) = self.tree.get_person_mut(&id) else {
            return false;
        };
        existing.full_name = updated.full_name;
        existing.id_number = updated.id_number;
        existing.birth_date = updated.birth_date;
        existing.age = updated.age;
        existing.is_alive = updated.is_alive;
        existing.photo_path = updated.photo_path;
        existing.residence = updated.residence;

        self.geo.remove_node(&id);
        self.geo.add_node(id.clone(), residence);
        self.geo.rebuild_edges();
        info!("person {} updated", id);
        true
    }

    /// Removes a person from the distance graph, then from the index.
    /// Returns the index removal's result.
    pub fn remove_person(&mut self, id: &str) -> bool {
        self.geo.remove_node(id);
        let removed = self.tree.remove_person(id);
        if removed {
            info!("person {} removed, {} members", id, self.tree.len());
        }
        removed
    }

    /// Exact lookup by id.
    pub fn get_person(&self, id: &str) -> Option<&Person> {
        self.tree.get_person(id)
    }

    /// All members in insertion order.
    pub fn all_members(&self) -> Vec<&Person> {
        self.tree.all_members()
    }

    /// Number of members.
    pub fn member_count(&self) -> usize {
        self.tree.len()
    }

    /// Whether the family has no members.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Stored distances from one member to every other, in km.
    pub fn distances_from(&self, id: &str) -> HashMap<String, f64> {
        self.geo.distances_from(id)
    }

    /// Pairwise-distance statistics over all members.
    ///
    /// Computes haversine directly from residences in one pass over
    /// every unordered pair, independent of the distance graph. Ties
    /// for farthest or closest keep the first pair found in member
    /// insertion order.
    pub fn statistics(&self) -> FamilyStatistics {
        let mut stats = FamilyStatistics::default();
        let members = self.tree.all_members();
        if members.len() < 2 {
            return stats;
        }

        let mut max_distance = f64::MIN;
        let mut min_distance = f64::MAX;
        let mut total = 0.0;
        let mut pair_count = 0u64;

        for i in 0..members.len() {
            for j in (i + 1)..members.len() {
                let km = haversine_km(&members[i].residence, &members[j].residence);
                total += km;
                pair_count += 1;

                if km > max_distance {
                    max_distance = km;
                    stats.max_distance = km;
                    stats.farthest_pair = Some((members[i].clone(), members[j].clone()));
                }
                if km < min_distance {
                    min_distance = km;
                    stats.min_distance = km;
                    stats.closest_pair = Some((members[i].clone(), members[j].clone()));
                }
            }
        }

        stats.average_distance = total / pair_count as f64;
        stats
    }

    /// Direct children of a member.
    pub fn children(&self, id: &str) -> Vec<&Person> {
        self.tree.children(id)
    }

    /// Parents of a member, father first.
    pub fn parents(&self, id: &str) -> Vec<&Person> {
        self.tree.parents(id)
    }

    /// Members with no recorded parents.
    pub fn roots(&self) -> Vec<&Person> {
        self.tree.roots()
    }

    /// Siblings through either parent.
    pub fn siblings(&self, id: &str) -> Vec<&Person> {
        self.tree.siblings(id)
    }

    /// A member's spouse, if linked.
    pub fn spouse(&self, id: &str) -> Option<&Person> {
        self.tree.spouse(id)
    }

    /// Links two members as spouses.
    pub fn set_marriage(&mut self, id1: &str, id2: &str) -> bool {
        self.tree.set_marriage(id1, id2)
    }

    /// Clears a member's marriage link on both sides.
    pub fn remove_marriage(&mut self, id: &str) -> bool {
        self.tree.remove_marriage(id)
    }

    /// Parents of parents.
    pub fn grandparents(&self, id: &str) -> Vec<&Person> {
        self.tree.grandparents(id)
    }

    /// Children of children.
    pub fn grandchildren(&self, id: &str) -> Vec<&Person> {
        self.tree.grandchildren(id)
    }

    /// Siblings of parents.
    pub fn uncles_and_aunts(&self, id: &str) -> Vec<&Person> {
        self.tree.uncles_and_aunts(id)
    }

    /// Children of siblings.
    pub fn nephews_and_nieces(&self, id: &str) -> Vec<&Person> {
        self.tree.nephews_and_nieces(id)
    }

    /// Children of uncles and aunts.
    pub fn cousins(&self, id: &str) -> Vec<&Person> {
        self.tree.cousins(id)
    }

    /// Pre-order walk over the children relation from a starting member.
    pub fn depth_first_traversal(&self, start_id: &str) -> Vec<&Person> {
        self.tree.depth_first_traversal(start_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use kin_core::GeoCoordinates;

    fn person_at(name: &str, lat: f64, lon: f64) -> Person {
        Person::new(name).with_residence(GeoCoordinates::new(lat, lon, ""))
    }

    #[test]
    fn test_add_person_reaches_tree_and_graph() {
        let mut service = FamilyService::new();
        let person = Person::new("Juan Pérez")
            .with_id_number("123456789")
            .with_birth_date(NaiveDate::from_ymd_opt(1990, 5, 15).unwrap())
            .with_residence(GeoCoordinates::new(9.9281, -84.0907, "San José"));
        let id = person.id.clone();

        assert!(service.add_person(person, None, None));
        assert_eq!(service.member_count(), 1);
        assert!(!service.is_empty());
        assert_eq!(service.get_person(&id).unwrap().full_name, "Juan Pérez");
    }

    #[test]
    fn test_add_person_duplicate_id_rejected() {
        let mut service = FamilyService::new();
        let first = person_at("María López", 9.9281, -84.0907);
        let mut second = person_at("Ana García", 10.0, -85.0);
        second.id = first.id.clone();

        assert!(service.add_person(first, None, None));
        assert!(!service.add_person(second, None, None));
        assert_eq!(service.member_count(), 1);
    }

    #[test]
    fn test_add_person_populates_distances() {
        let mut service = FamilyService::new();
        let a = person_at("A", 9.9281, -84.0907);
        let b = person_at("B", 10.0, -85.0);
        let (aid, bid) = (a.id.clone(), b.id.clone());

        service.add_person(a, None, None);
        service.add_person(b, None, None);

        let distances = service.distances_from(&aid);
        assert_eq!(distances.len(), 1);
        let km = distances[&bid];
        assert!((99.0..101.0).contains(&km), "got {km}");
    }

    #[test]
    fn test_update_person_overwrites_fields_not_links() {
        let mut service = FamilyService::new();
        let father = person_at("Father", 9.9, -84.0);
        let fid = father.id.clone();
        service.add_person(father, None, None);

        let child = person_at("Child", 9.9, -84.1);
        let cid = child.id.clone();
        service.add_person(child, Some(&fid), None);

        let mut updated = person_at("Child Renamed", 10.5, -85.5);
        updated.id = cid.clone();
        updated.id_number = "111222333".to_owned();
        assert!(service.update_person(updated));

        let child = service.get_person(&cid).unwrap();
        assert_eq!(child.full_name, "Child Renamed");
        assert_eq!(child.id_number, "111222333");
        assert_eq!(child.residence.latitude, 10.5);
        // Relationship links survive the overwrite.
        assert_eq!(child.father_id.as_deref(), Some(fid.as_str()));
        assert!(service.children(&fid).iter().any(|c| c.id == cid));
    }

    #[test]
    fn test_update_person_unknown_id_fails() {
        let mut service = FamilyService::new();
        let ghost = person_at("Ghost", 9.9, -84.0);
        assert!(!service.update_person(ghost));
    }

    #[test]
    fn test_update_person_moves_distance_node() {
        let mut service = FamilyService::new();
        let a = person_at("A", 9.9281, -84.0907);
        let b = person_at("B", 10.0, -85.0);
        let (aid, bid) = (a.id.clone(), b.id.clone());
        service.add_person(a, None, None);
        service.add_person(b, None, None);

        let near = service.distances_from(&aid)[&bid];

        let mut moved = person_at("A", 15.0, -90.0);
        moved.id = aid.clone();
        assert!(service.update_person(moved));

        let far = service.distances_from(&aid)[&bid];
        assert!(far > near);
    }

    #[test]
    fn test_remove_person_clears_tree_and_graph() {
        let mut service = FamilyService::new();
        let a = person_at("A", 9.9281, -84.0907);
        let b = person_at("B", 10.0, -85.0);
        let (aid, bid) = (a.id.clone(), b.id.clone());
        service.add_person(a, None, None);
        service.add_person(b, None, None);

        assert!(service.remove_person(&aid));
        assert_eq!(service.member_count(), 1);
        assert!(service.get_person(&aid).is_none());
        assert!(service.distances_from(&bid).is_empty());

        assert!(!service.remove_person(&aid));
    }

    #[test]
    fn test_remove_parent_keeps_other_links() {
        let mut service = FamilyService::new();
        let father = person_at("F", 9.9, -84.0);
        let mother = person_at("M", 9.8, -84.1);
        let (fid, mid) = (father.id.clone(), mother.id.clone());
        service.add_person(father, None, None);
        service.add_person(mother, None, None);

        let child = person_at("C", 10.0, -84.2);
        let cid = child.id.clone();
        service.add_person(child, Some(&fid), Some(&mid));

        assert!(service.remove_person(&fid));
        let child = service.get_person(&cid).unwrap();
        assert!(child.father_id.is_none());
        assert!(service.children(&mid).iter().any(|c| c.id == cid));
    }

    #[test]
    fn test_relationship_queries_pass_through() {
        let mut service = FamilyService::new();
        let father = person_at("F", 9.9, -84.0);
        let mother = person_at("M", 9.8, -84.1);
        let (fid, mid) = (father.id.clone(), mother.id.clone());
        service.add_person(father, None, None);
        service.add_person(mother, None, None);
        service.set_marriage(&fid, &mid);

        let c1 = person_at("C1", 10.0, -84.2);
        let c2 = person_at("C2", 10.1, -84.3);
        let (c1id, c2id) = (c1.id.clone(), c2.id.clone());
        service.add_person(c1, Some(&fid), Some(&mid));
        service.add_person(c2, Some(&fid), Some(&mid));

        assert_eq!(service.spouse(&fid).unwrap().id, mid);

        let parents = service.parents(&c1id);
        assert_eq!(parents.len(), 2);
        assert_eq!(parents[0].id, fid);
        assert_eq!(parents[1].id, mid);

        let siblings = service.siblings(&c2id);
        assert_eq!(siblings.len(), 1);
        assert_eq!(siblings[0].id, c1id);

        assert_eq!(service.roots().len(), 2);

        let walk = service.depth_first_traversal(&fid);
        assert_eq!(walk.len(), 3);
        assert_eq!(walk[0].id, fid);

        assert!(service.remove_marriage(&fid));
        assert!(service.spouse(&mid).is_none());
    }

    #[test]
    fn test_cousins_keep_convergent_paths() {
        // A cousin reachable through two uncles (one per parent side)
        // shows up once per path.
        let mut service = FamilyService::new();
        let grandpa = person_at("GP", 9.0, -84.0);
        let grandma = person_at("GM", 9.1, -84.1);
        let (gpid, gmid) = (grandpa.id.clone(), grandma.id.clone());
        service.add_person(grandpa, None, None);
        service.add_person(grandma, None, None);

        let parent = person_at("P", 9.2, -84.2);
        let uncle = person_at("U", 9.3, -84.3);
        let (pid, uid) = (parent.id.clone(), uncle.id.clone());
        service.add_person(parent, Some(&gpid), Some(&gmid));
        service.add_person(uncle, Some(&gpid), Some(&gmid));

        let child = person_at("C", 9.4, -84.4);
        let cousin = person_at("K", 9.5, -84.5);
        let cid = child.id.clone();
        service.add_person(child, Some(&pid), None);
        service.add_person(cousin, Some(&uid), None);

        // Uncle is deduplicated across the two parent sides, so the
        // cousin appears once here.
        assert_eq!(service.uncles_and_aunts(&cid).len(), 1);
        assert_eq!(service.cousins(&cid).len(), 1);
        assert_eq!(service.grandparents(&cid).len(), 2);
        assert_eq!(service.grandchildren(&gpid).len(), 2);
        assert_eq!(service.nephews_and_nieces(&pid).len(), 1);
    }

    #[test]
    fn test_statistics_below_two_members_empty() {
        let mut service = FamilyService::new();

        let stats = service.statistics();
        assert!(stats.farthest_pair.is_none());
        assert!(stats.closest_pair.is_none());
        assert_eq!(stats.average_distance, 0.0);

        service.add_person(person_at("Solo", 9.9281, -84.0907), None, None);
        let stats = service.statistics();
        assert!(stats.farthest_pair.is_none());
        assert!(stats.closest_pair.is_none());
    }

    #[test]
    fn test_statistics_identifies_extremes_and_mean() {
        let mut service = FamilyService::new();
        let san_jose = person_at("San José", 9.9281, -84.0907);
        let cartago = person_at("Cartago", 9.8644, -83.9186);
        let limon = person_at("Limón", 9.9904, -83.0320);
        let (sj, ct, li) = (san_jose.id.clone(), cartago.id.clone(), limon.id.clone());
        service.add_person(san_jose, None, None);
        service.add_person(cartago, None, None);
        service.add_person(limon, None, None);

        let stats = service.statistics();
        assert!(stats.max_distance >= stats.min_distance);
        assert!(stats.min_distance > 0.0);
        assert!(stats.average_distance > 0.0);

        // San José–Limón is the longest leg, San José–Cartago the shortest.
        let (far1, far2) = stats.farthest_pair.as_ref().unwrap();
        assert_eq!((far1.id.as_str(), far2.id.as_str()), (sj.as_str(), li.as_str()));
        let (near1, near2) = stats.closest_pair.as_ref().unwrap();
        assert_eq!((near1.id.as_str(), near2.id.as_str()), (sj.as_str(), ct.as_str()));

        // Mean over the three pairwise legs.
        let legs = [
            service.distances_from(&sj)[&ct],
            service.distances_from(&sj)[&li],
            service.distances_from(&ct)[&li],
        ];
        let mean = legs.iter().sum::<f64>() / 3.0;
        assert!((stats.average_distance - mean).abs() < 1e-9);
    }

    #[test]
    fn test_statistics_two_members_single_pair() {
        let mut service = FamilyService::new();
        let a = person_at("A", 9.9281, -84.0907);
        let b = person_at("B", 10.0, -85.0);
        service.add_person(a, None, None);
        service.add_person(b, None, None);

        let stats = service.statistics();
        assert_eq!(stats.max_distance, stats.min_distance);
        assert!((stats.average_distance - stats.max_distance).abs() < 1e-9);
        assert!(stats.farthest_pair.is_some());
    }
}
