//! Exact-count mode: course-code groups first, then the residue is forced
//! into exactly as many clusters as are still missing.

use super::rebalance::fill_empty_groups;
use super::Invocation;
use crate::types::{Group, GroupOrigin, Tab};

pub const OTHER_KEY: &str = "Other";
pub const OTHER_COURSES_KEY: &str = "Other Courses";

pub fn run(inv: &mut Invocation<'_>, tabs: Vec<Tab>, count: usize, labels: Option<&[String]>) -> Vec<Group> {
    let (code_groups, residual) = inv.group_by_course_code(tabs);

    if code_groups.len() > count || (code_groups.len() == count && !residual.is_empty()) {
        return merge_overflow(code_groups, residual, count);
    }
    if code_groups.len() == count {
        return code_groups;
    }

    let needed = count - code_groups.len();
    let code_keys: Vec<&str> = code_groups.iter().map(|g| g.key.as_str()).collect();
    let mut slots = build_slots(needed, labels, &code_keys);

    match residual.len() {
        0 => {}
        1 => {
            // A lone tab cannot be clustered; it takes the first slot.
            slots[0].tabs = residual;
        }
        _ => {
            let vectors = inv.embed(&residual);
            let clustering = inv.clustering.cluster(&vectors, needed);
            let mut pending: Vec<Option<Tab>> = residual.into_iter().map(Some).collect();
            for (position, cluster) in clustering.clusters.iter().enumerate() {
                let slot = position % needed;
                for &member in &cluster.members {
                    if let Some(tab) = pending[member].take() {
                        slots[slot].tabs.push(tab);
                    }
                }
            }
        }
    }

    let slot_count = slots.len();
    let mut groups = code_groups;
    groups.extend(slots);
    let first_slot = groups.len() - slot_count;

    // Slots are filled from other slots first, then from course groups.
    let slot_keys: Vec<String> = groups[first_slot..].iter().map(|g| g.key.clone()).collect();
    fill_empty_groups(
        &mut groups,
        |g| slot_keys.contains(&g.key),
        |g| slot_keys.contains(&g.key),
    );

    let filled = groups.iter().filter(|g| !g.is_empty()).count();
    if filled < count {
        tracing::warn!(requested = count, produced = filled, "[Grouping] Not enough tabs for the requested group count");
    }
    groups
}

/// Slot groups named by the caller's labels in order, generic otherwise.
///
/// A label naming a course group that already exists is skipped; that group
/// already holds the course tabs.
fn build_slots(needed: usize, labels: Option<&[String]>, taken: &[&str]) -> Vec<Group> {
    let mut free_labels = labels
        .unwrap_or_default()
        .iter()
        .filter(|label| !taken.iter().any(|key| key.eq_ignore_ascii_case(label.as_str())));

    (0..needed)
        .map(|i| match free_labels.next() {
            Some(label) => Group::new(label.clone(), GroupOrigin::Label, Vec::new()),
            None => Group::new(format!("group_{}", i + 1), GroupOrigin::Cluster, Vec::new()),
        })
        .collect()
}

/// Keep the `count - 1` largest course groups and fold everything else into
/// one catch-all, so the result has exactly `count` groups.
fn merge_overflow(mut code_groups: Vec<Group>, residual: Vec<Tab>, count: usize) -> Vec<Group> {
    // Stable sort: equal sizes keep first-appearance order.
    code_groups.sort_by(|a, b| b.len().cmp(&a.len()));
    let overflow = code_groups.split_off(count.saturating_sub(1).min(code_groups.len()));

    let only_courses = residual.is_empty();
    let mut merged: Vec<Tab> = overflow.into_iter().flat_map(|g| g.tabs).collect();
    merged.extend(residual);

    if !merged.is_empty() {
        let key = if only_courses { OTHER_COURSES_KEY } else { OTHER_KEY };
        code_groups.push(Group::new(key, GroupOrigin::CatchAll, merged));
    }

    tracing::debug!(groups = code_groups.len(), "[Grouping] Merged overflowing course groups");
    code_groups
}
