//! Relationship projection over one owner's member list.
//!
//! # Responsibility
//! - Rebuild head / couple / family / unaffiliated groupings from flat
//!   `parent_id` and `spouse_id` references.
//! - Provide the derived views used by the tab screens.
//!
//! # Invariants
//! - Input is never mutated; every group borrows from the input slice.
//! - Groups are role-based: one member may appear in several groups.
//! - Dangling references are skipped, never reported as errors.
//! - Children keep input order inside their family.
//! - No recursion, so self-references cannot loop.

use crate::model::member::{Gender, Member, MemberId};
use crate::model::relation::{FATHER, MOTHER};
use std::collections::{HashMap, HashSet};

/// Two members joined by a resolvable `spouse_id` edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Couple<'a> {
    /// Member whose `spouse_id` produced the pair first.
    pub first: &'a Member,
    pub second: &'a Member,
}

/// A parent together with every member whose `parent_id` points at it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Family<'a> {
    pub parent: &'a Member,
    pub children: Vec<&'a Member>,
}

/// Head card content: head, optional spouse, children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadFamily<'a> {
    pub head: &'a Member,
    pub spouse: Option<&'a Member>,
    pub children: Vec<&'a Member>,
}

/// Role-based groupings for one member list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FamilyProjection<'a> {
    pub heads: Vec<&'a Member>,
    pub couples: Vec<Couple<'a>>,
    pub families: Vec<Family<'a>>,
    pub unaffiliated: Vec<&'a Member>,
}

/// Adjacency index built once per projection pass.
///
/// Holds slice positions so every lookup stays O(1) and order-preserving.
struct RelationshipIndex<'a> {
    members: &'a [Member],
    by_id: HashMap<MemberId, usize>,
    children_of: HashMap<MemberId, Vec<usize>>,
    /// Parent ids in order of first child appearance.
    parent_order: Vec<MemberId>,
}

impl<'a> RelationshipIndex<'a> {
    fn build(members: &'a [Member]) -> Self {
        let mut by_id = HashMap::with_capacity(members.len());
        for (position, member) in members.iter().enumerate() {
            by_id.entry(member.id).or_insert(position);
        }

        let mut children_of: HashMap<MemberId, Vec<usize>> = HashMap::new();
        let mut parent_order = Vec::new();
        for (position, member) in members.iter().enumerate() {
            let Some(parent_id) = member.parent_id else {
                continue;
            };
            if !by_id.contains_key(&parent_id) {
                continue;
            }
            children_of
                .entry(parent_id)
                .or_insert_with(|| {
                    parent_order.push(parent_id);
                    Vec::new()
                })
                .push(position);
        }

        Self {
            members,
            by_id,
            children_of,
            parent_order,
        }
    }

    fn get(&self, id: MemberId) -> Option<&'a Member> {
        self.by_id.get(&id).map(|&position| &self.members[position])
    }

    fn spouse_of(&self, member: &Member) -> Option<&'a Member> {
        member.spouse_id.and_then(|spouse_id| self.get(spouse_id))
    }

    fn children_of(&self, id: MemberId) -> Vec<&'a Member> {
        self.children_of
            .get(&id)
            .map(|positions| {
                positions
                    .iter()
                    .map(|&position| &self.members[position])
                    .collect()
            })
            .unwrap_or_default()
    }

    fn is_parent(&self, id: MemberId) -> bool {
        self.children_of.contains_key(&id)
    }
}

/// Projects a flat member list into role-based groups.
///
/// Runs in O(n) time and space. Never fails: unresolvable `spouse_id` or
/// `parent_id` values simply produce no pair or family.
pub fn project(members: &[Member]) -> FamilyProjection<'_> {
    let index = RelationshipIndex::build(members);

    let mut heads = Vec::new();
    let mut couples = Vec::new();
    let mut couple_keys: HashSet<(MemberId, MemberId)> = HashSet::new();
    let mut coupled: HashSet<MemberId> = HashSet::new();

    for member in members {
        if member.is_family_head() {
            heads.push(member);
        }

        if let Some(spouse) = index.spouse_of(member) {
            coupled.insert(member.id);
            coupled.insert(spouse.id);
            if couple_keys.insert(couple_key(member.id, spouse.id)) {
                couples.push(Couple {
                    first: member,
                    second: spouse,
                });
            }
        }
    }

    let families = index
        .parent_order
        .iter()
        .filter_map(|&parent_id| {
            index.get(parent_id).map(|parent| Family {
                parent,
                children: index.children_of(parent_id),
            })
        })
        .collect();

    let unaffiliated = members
        .iter()
        .filter(|member| {
            !member.is_family_head()
                && !coupled.contains(&member.id)
                && !index.is_parent(member.id)
                && member
                    .parent_id
                    .and_then(|parent_id| index.get(parent_id))
                    .is_none()
        })
        .collect();

    FamilyProjection {
        heads,
        couples,
        families,
        unaffiliated,
    }
}

/// Builds head cards, optionally restricted to heads of one gender.
///
/// The spouse is the head's own resolvable `spouse_id`, else the first
/// member whose `spouse_id` points at the head.
pub fn head_families(members: &[Member], gender: Option<Gender>) -> Vec<HeadFamily<'_>> {
    let index = RelationshipIndex::build(members);
    let mut spouse_pointing_at: HashMap<MemberId, &Member> = HashMap::new();
    for member in members {
        if let Some(spouse_id) = member.spouse_id {
            spouse_pointing_at.entry(spouse_id).or_insert(member);
        }
    }

    members
        .iter()
        .filter(|member| member.is_family_head())
        .filter(|member| gender.map_or(true, |gender| member.gender == gender))
        .map(|head| HeadFamily {
            head,
            spouse: index
                .spouse_of(head)
                .or_else(|| spouse_pointing_at.get(&head.id).copied()),
            children: index.children_of(head.id),
        })
        .collect()
}

/// Members labelled `father` or `mother`, each with its children.
pub fn grandparents(members: &[Member]) -> Vec<Family<'_>> {
    let index = RelationshipIndex::build(members);
    members
        .iter()
        .filter(|member| member.relation.contains_any(&[FATHER, MOTHER]))
        .map(|parent| Family {
            parent,
            children: index.children_of(parent.id),
        })
        .collect()
}

/// Resolvable spouse followed by children of one member.
///
/// Returns an empty list when `id` is not in `members`.
pub fn immediate_family(members: &[Member], id: MemberId) -> Vec<&Member> {
    let index = RelationshipIndex::build(members);
    let Some(member) = index.get(id) else {
        return Vec::new();
    };

    let mut family = Vec::new();
    if let Some(spouse) = index.spouse_of(member) {
        family.push(spouse);
    }
    family.extend(index.children_of(id));
    family
}

/// Case-insensitive filter over name, relation text and profession.
///
/// A blank term keeps every member.
pub fn search_members<'a>(members: &'a [Member], term: &str) -> Vec<&'a Member> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return members.iter().collect();
    }

    members
        .iter()
        .filter(|member| {
            member.name.to_lowercase().contains(needle.as_str())
                || member.relation.to_string().contains(needle.as_str())
                || member
                    .profession
                    .as_deref()
                    .is_some_and(|profession| profession.to_lowercase().contains(needle.as_str()))
        })
        .collect()
}

fn couple_key(a: MemberId, b: MemberId) -> (MemberId, MemberId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
