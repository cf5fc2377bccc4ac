//! The family relationship index.
//!
//! `FamilyTree` is the canonical store for person records. Relationship
//! links are id strings resolved through the store at read time; any id
//! that no longer resolves is silently dropped rather than reported, so
//! stale links left behind by a removal never cause a fault.

use kin_core::Person;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// The family tree: member store plus relationship queries.
///
/// Expected failures (unknown ids, duplicate inserts) are signalled by
/// `false`, `None`, or an empty result, never by an error type.
#[derive(Debug, Default)]
pub struct FamilyTree {
    /// Canonical person records keyed by id.
    members: HashMap<String, Person>,

    /// Member ids in insertion order, for stable enumeration.
    insertion_order: Vec<String>,

    /// Ids of people added with no father and no mother.
    root_ids: Vec<String>,
}

impl FamilyTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a person, optionally linking it to existing parents.
    ///
    /// Returns `false` without touching anything if the id is already
    /// present. On success the person's father/mother ids are set to
    /// the given values and, where a parent id resolves, the person is
    /// appended to that parent's children (no duplicate append).
    ///
    /// Root classification checks only that both parent ids are absent
    /// or empty. A non-empty id that resolves to nothing still prevents
    /// root status: the person ends up neither a root nor linked.
    pub fn add_person(
        &mut self,
        mut person: Person,
        father_id: Option<&str>,
        mother_id: Option<&str>,
    ) -> bool {
        if self.members.contains_key(&person.id) {
            return false;
        }

        person.father_id = father_id.filter(|id| !id.is_empty()).map(str::to_owned);
        person.mother_id = mother_id.filter(|id| !id.is_empty()).map(str::to_owned);

        for parent_id in [&person.father_id, &person.mother_id] {
            if let Some(parent_id) = parent_id.clone() {
                if let Some(parent) = self.members.get_mut(&parent_id) {
                    if !parent.children_ids.contains(&person.id) {
                        parent.children_ids.push(person.id.clone());
                    }
                }
            }
        }

        let is_root = father_id.map_or(true, str::is_empty) && mother_id.map_or(true, str::is_empty);

        let id = person.id.clone();
        self.members.insert(id.clone(), person);
        self.insertion_order.push(id.clone());
        if is_root {
            self.root_ids.push(id.clone());
        }

        debug!("added person {} (root: {})", id, is_root);
        true
    }

    /// Exact lookup by id. No traversal.
    pub fn get_person(&self, id: &str) -> Option<&Person> {
        self.members.get(id)
    }

    /// Mutable lookup, for in-place field updates by the service layer.
    pub fn get_person_mut(&mut self, id: &str) -> Option<&mut Person> {
        self.members.get_mut(id)
    }

    /// All members in insertion order.
    pub fn all_members(&self) -> Vec<&Person> {
        self.insertion_order
            .iter()
            .filter_map(|id| self.members.get(id))
            .collect()
    }

    /// Direct children, dangling ids dropped.
    pub fn children(&self, id: &str) -> Vec<&Person> {
        let Some(person) = self.members.get(id) else {
            return Vec::new();
        };
        person
            .children_ids
            .iter()
            .filter_map(|child_id| self.members.get(child_id))
            .collect()
    }

    /// Parents that resolve: father first, then mother. 0, 1, or 2 entries.
    pub fn parents(&self, id: &str) -> Vec<&Person> {
        let Some(person) = self.members.get(id) else {
            return Vec::new();
        };
        [&person.father_id, &person.mother_id]
            .into_iter()
            .filter_map(|parent_id| parent_id.as_deref())
            .filter_map(|parent_id| self.members.get(parent_id))
            .collect()
    }

    /// Siblings through either parent, deduplicated by id, self excluded.
    ///
    /// Order: the father's other children first, then the mother's
    /// children not already listed.
    pub fn siblings(&self, id: &str) -> Vec<&Person> {
        let Some(person) = self.members.get(id) else {
            return Vec::new();
        };

        let mut siblings: Vec<&Person> = Vec::new();

        for parent_id in [&person.father_id, &person.mother_id] {
            let Some(parent) = parent_id.as_deref().and_then(|pid| self.members.get(pid)) else {
                continue;
            };
            for child_id in &parent.children_ids {
                if child_id == id {
                    continue;
                }
                if let Some(child) = self.members.get(child_id) {
                    if !siblings.iter().any(|s| s.id == *child_id) {
                        siblings.push(child);
                    }
                }
            }
        }

        siblings
    }

    /// The person's spouse, if the link is set and resolves.
    pub fn spouse(&self, id: &str) -> Option<&Person> {
        let spouse_id = self.members.get(id)?.spouse_id.as_deref()?;
        self.members.get(spouse_id)
    }

    /// Links two people as spouses, symmetrically.
    ///
    /// Fails if either id is unknown. An existing spouse link on either
    /// side is overwritten without clearing the displaced partner's own
    /// link, which can leave a one-directional stale link behind.
    pub fn set_marriage(&mut self, id1: &str, id2: &str) -> bool {
        if !self.members.contains_key(id1) || !self.members.contains_key(id2) {
            return false;
        }

        if let Some(person) = self.members.get_mut(id1) {
            person.spouse_id = Some(id2.to_owned());
        }
        if let Some(person) = self.members.get_mut(id2) {
            person.spouse_id = Some(id1.to_owned());
        }

        debug!("married {} and {}", id1, id2);
        true
    }

    /// Clears the marriage link on both sides.
    ///
    /// Fails if the id is unknown or has no spouse link.
    pub fn remove_marriage(&mut self, id: &str) -> bool {
        let Some(spouse_id) = self.members.get(id).and_then(|p| p.spouse_id.clone()) else {
            return false;
        };

        if let Some(former) = self.members.get_mut(&spouse_id) {
            former.spouse_id = None;
        }
        if let Some(person) = self.members.get_mut(id) {
            person.spouse_id = None;
        }

        debug!("divorced {} and {}", id, spouse_id);
        true
    }

    /// Parents of parents. Not deduplicated.
    pub fn grandparents(&self, id: &str) -> Vec<&Person> {
        let mut grandparents = Vec::new();
        for parent in self.parents(id) {
            grandparents.extend(self.parents(&parent.id));
        }
        grandparents
    }

    /// Children of children. Not deduplicated.
    pub fn grandchildren(&self, id: &str) -> Vec<&Person> {
        let mut grandchildren = Vec::new();
        for child in self.children(id) {
            grandchildren.extend(self.children(&child.id));
        }
        grandchildren
    }

    /// Siblings of parents, deduplicated by id.
    pub fn uncles_and_aunts(&self, id: &str) -> Vec<&Person> {
        let mut uncles: Vec<&Person> = Vec::new();
        for parent in self.parents(id) {
            for sibling in self.siblings(&parent.id) {
                if !uncles.iter().any(|u| u.id == sibling.id) {
                    uncles.push(sibling);
                }
            }
        }
        uncles
    }

    /// Children of siblings. Not deduplicated; a child reachable
    /// through two shared-parent siblings appears once per path.
    pub fn nephews_and_nieces(&self, id: &str) -> Vec<&Person> {
        let mut nephews = Vec::new();
        for sibling in self.siblings(id) {
            nephews.extend(self.children(&sibling.id));
        }
        nephews
    }

    /// Children of uncles and aunts. Not deduplicated.
    pub fn cousins(&self, id: &str) -> Vec<&Person> {
        let mut cousins = Vec::new();
        for uncle in self.uncles_and_aunts(id) {
            cousins.extend(self.children(&uncle.id));
        }
        cousins
    }

    /// People recorded as roots, dangling ids dropped.
    pub fn roots(&self) -> Vec<&Person> {
        self.root_ids
            .iter()
            .filter_map(|id| self.members.get(id))
            .collect()
    }

    /// Removes a person and detaches its one-hop links.
    ///
    /// The id is removed from each resolving parent's children list,
    /// and each direct child pointing back at this id has that parent
    /// link cleared. Nothing beyond one hop is touched: grandchildren
    /// keep their links, and a spouse's link to the removed person is
    /// left in place (it resolves to nothing and reads filter it out).
    pub fn remove_person(&mut self, id: &str) -> bool {
        let Some(person) = self.members.get(id) else {
            return false;
        };

        let father_id = person.father_id.clone();
        let mother_id = person.mother_id.clone();
        let children_ids = person.children_ids.clone();

        for parent_id in [father_id, mother_id].into_iter().flatten() {
            if let Some(parent) = self.members.get_mut(&parent_id) {
                parent.children_ids.retain(|child_id| child_id != id);
            }
        }

        for child_id in &children_ids {
            if let Some(child) = self.members.get_mut(child_id) {
                if child.father_id.as_deref() == Some(id) {
                    child.father_id = None;
                }
                if child.mother_id.as_deref() == Some(id) {
                    child.mother_id = None;
                }
            }
        }

        self.root_ids.retain(|root_id| root_id != id);
        self.insertion_order.retain(|member_id| member_id != id);
        self.members.remove(id);

        debug!("removed person {}", id);
        true
    }

    /// Pre-order depth-first walk over the children relation only.
    ///
    /// Spouse and parent edges are ignored. The visited set guards
    /// against cycles in the children data; well-formed trees are
    /// acyclic since children are added after their parents exist.
    pub fn depth_first_traversal(&self, start_id: &str) -> Vec<&Person> {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut result = Vec::new();
        let mut stack = vec![start_id];

        while let Some(id) = stack.pop() {
            if visited.contains(id) {
                continue;
            }
            let Some(person) = self.members.get(id) else {
                continue;
            };
            visited.insert(&person.id);
            result.push(person);

            // Reverse push so the first child is visited first.
            for child_id in person.children_ids.iter().rev() {
                if !visited.contains(child_id.as_str()) {
                    stack.push(child_id);
                }
            }
        }

        result
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the tree has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
