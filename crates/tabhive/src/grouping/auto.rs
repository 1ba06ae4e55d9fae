//! Auto mode: configured stages peel groups off the eligible tabs, and the
//! last residue is clustered.

use std::collections::HashMap;

use super::Invocation;
use crate::clustering::mean_pairwise_similarity;
use crate::config::AutoStage;
use crate::processing::host_of;
use crate::types::{Group, GroupOrigin, Tab};

pub const MISC_KEY: &str = "misc";

pub fn run(inv: &mut Invocation<'_>, tabs: Vec<Tab>, preferred_count: Option<usize>) -> Vec<Group> {
    let mut groups = Vec::new();
    let mut residual = tabs;
    let stages = inv.config.auto.stages.clone();

    for stage in stages {
        if residual.is_empty() {
            break;
        }
        match stage {
            AutoStage::CourseCodes => {
                let (found, rest) = inv.group_by_course_code(residual);
                groups.extend(found);
                residual = rest;
            }
            AutoStage::DomainAffinity => {
                let (found, rest) = group_by_domain(residual, inv.config.auto.min_domain_group_size);
                tracing::debug!(domain_groups = found.len(), residual = rest.len(), "[Grouping] Domain pass");
                groups.extend(found);
                residual = rest;
            }
            AutoStage::Clustering => {
                let remaining = preferred_count.map(|p| p.saturating_sub(groups.len()).max(1));
                groups.extend(cluster_residual(inv, std::mem::take(&mut residual), remaining));
            }
        }
    }

    // Whatever no stage claimed still has to land somewhere.
    if !residual.is_empty() {
        groups.push(Group::new(MISC_KEY, GroupOrigin::Misc, residual));
    }
    groups
}

/// One group per host shared by at least `min_size` tabs. Tabs with an
/// unknown host never form a domain group.
pub fn group_by_domain(tabs: Vec<Tab>, min_size: usize) -> (Vec<Group>, Vec<Tab>) {
    let hosts: Vec<String> = tabs.iter().map(|t| host_of(&t.url)).collect();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for host in &hosts {
        if !host.is_empty() {
            *counts.entry(host.as_str()).or_insert(0) += 1;
        }
    }

    let mut groups: Vec<Group> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut residual = Vec::new();
    for (tab, host) in tabs.into_iter().zip(hosts.iter()) {
        if counts.get(host.as_str()).copied().unwrap_or(0) < min_size {
            residual.push(tab);
            continue;
        }
        let slot = *slots.entry(host.clone()).or_insert_with(|| {
            groups.push(Group::new(host.clone(), GroupOrigin::Domain, Vec::new()));
            groups.len() - 1
        });
        groups[slot].tabs.push(tab);
    }
    (groups, residual)
}

/// Cluster the residual tabs. Singleton and incoherent clusters are pooled
/// into one misc group.
fn cluster_residual(inv: &Invocation<'_>, tabs: Vec<Tab>, k: Option<usize>) -> Vec<Group> {
    match tabs.len() {
        0 => return Vec::new(),
        1 => return vec![Group::new(MISC_KEY, GroupOrigin::Misc, tabs)],
        _ => {}
    }

    let vectors = inv.embed(&tabs);
    let settings = &inv.config.clustering;
    let k = k.unwrap_or_else(|| inv.clustering.choose_k(&vectors, settings.min_k, settings.max_k));
    let clustering = inv.clustering.cluster(&vectors, k);

    let mut slots: Vec<Option<Tab>> = tabs.into_iter().map(Some).collect();
    let mut groups = Vec::new();
    let mut misc = Vec::new();
    for cluster in &clustering.clusters {
        let members: Vec<Tab> = cluster
            .members
            .iter()
            .filter_map(|&i| slots[i].take())
            .collect();
        let coherent = cluster.len() >= 2
            && mean_pairwise_similarity(&vectors, &cluster.members) >= settings.coherence_floor;
        if coherent {
            groups.push(Group::new(format!("cluster_{}", groups.len() + 1), GroupOrigin::Cluster, members));
        } else {
            misc.extend(members);
        }
    }

    tracing::debug!(
        requested_k = k,
        clusters = groups.len(),
        pooled = misc.len(),
        "[Grouping] Residual clustering"
    );

    if !misc.is_empty() {
        groups.push(Group::new(MISC_KEY, GroupOrigin::Misc, misc));
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tab(id: &str, title: &str, url: &str) -> Tab {
        Tab::new(id, title, url)
    }

    #[test]
    fn test_domain_groups_need_min_size() {
        let tabs = vec![
            tab("1", "a", "https://github.com/a"),
            tab("2", "b", "https://news.ycombinator.com"),
            tab("3", "c", "https://www.github.com/b"),
            tab("4", "d", "https://github.com/c"),
            tab("5", "e", "https://news.ycombinator.com/item"),
        ];
        let (groups, residual) = group_by_domain(tabs, 3);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, "github.com");
        assert_eq!(groups[0].tab_ids(), vec!["1", "3", "4"]);
        assert_eq!(residual.len(), 2);
    }

    #[test]
    fn test_unknown_hosts_stay_residual() {
        let tabs = vec![tab("1", "a", "nope"), tab("2", "b", ""), tab("3", "c", "::")];
        let (groups, residual) = group_by_domain(tabs, 2);
        assert!(groups.is_empty());
        assert_eq!(residual.len(), 3);
    }
}
