//! Label mode: a randomized best-of-N search assigning tabs to the caller's
//! labels, followed by auto-grouping of whatever no label claimed.

use std::collections::HashMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use super::domains::label_domain_match;
use super::quality::partition_quality;
use super::rebalance::fill_empty_groups;
use super::Invocation;
use crate::config::LabelingConfig;
use crate::embeddings::FeatureVector;
use crate::processing::host_of;
use crate::subject::label_relates_to;
use crate::types::{Group, GroupOrigin, Tab};

/// One candidate partition: the chosen label per tab (`None` = uncategorized).
#[derive(Debug, Clone)]
struct Candidate {
    attempt: usize,
    assignments: Vec<Option<usize>>,
    quality: f32,
}

pub fn run(inv: &Invocation<'_>, tabs: Vec<Tab>, labels: &[String]) -> Vec<Group> {
    let settings = &inv.config.labeling;
    let base = base_scores(inv, &tabs, labels);
    let vectors = inv.embed(&tabs);

    let candidates: Vec<Candidate> = (0..settings.attempts)
        .into_par_iter()
        .map(|attempt| generate_candidate(settings, &base, &vectors, labels.len(), attempt))
        .collect();

    let best = select_best(&candidates);
    let assignments = best
        .map(|c| c.assignments.clone())
        .unwrap_or_else(|| vec![None; tabs.len()]);

    let mut groups: Vec<Group> = labels
        .iter()
        .map(|l| Group::new(l.clone(), GroupOrigin::Label, Vec::new()))
        .collect();
    let mut uncategorized = Vec::new();
    for (tab, assignment) in tabs.into_iter().zip(assignments) {
        match assignment {
            Some(label) => groups[label].tabs.push(tab),
            None => uncategorized.push(tab),
        }
    }

    tracing::info!(
        labels = labels.len(),
        uncategorized = uncategorized.len(),
        quality = best.map(|c| c.quality).unwrap_or_default(),
        "[Labeling] Best partition selected"
    );

    groups.extend(supplementary_groups(uncategorized));
    fill_empty_groups(
        &mut groups,
        |g| g.origin == GroupOrigin::Label,
        |g| g.origin == GroupOrigin::Supplementary,
    );
    groups
}

/// Highest quality wins; ties keep the earliest attempt.
fn select_best(candidates: &[Candidate]) -> Option<&Candidate> {
    let mut best: Option<&Candidate> = None;
    for candidate in candidates {
        tracing::debug!(attempt = candidate.attempt, quality = candidate.quality, "[Labeling] Candidate scored");
        let better = match best {
            None => true,
            Some(b) => {
                candidate.quality > b.quality || (candidate.quality == b.quality && candidate.attempt < b.attempt)
            }
        };
        if better {
            best = Some(candidate);
        }
    }
    best
}

/// Deterministic part of every tab/label score.
fn base_scores(inv: &Invocation<'_>, tabs: &[Tab], labels: &[String]) -> Vec<Vec<f32>> {
    let settings = &inv.config.labeling;
    let lowered: Vec<String> = labels.iter().map(|l| l.to_lowercase()).collect();

    tabs.iter()
        .map(|tab| {
            let title = tab.title.to_lowercase();
            let url = tab.url.to_lowercase();
            let subject = inv.categories.classify(tab);

            lowered
                .iter()
                .map(|label| {
                    let mut score = 0.0;
                    if title.contains(label.as_str()) {
                        score += settings.title_weight;
                    }
                    if url.contains(label.as_str()) {
                        score += settings.url_weight;
                    }
                    if label_domain_match(label, &url) {
                        score += settings.domain_bonus;
                    }
                    if let Some(subject) = &subject {
                        if subject.is_confident(settings.min_subject_similarity)
                            && label_relates_to(label, &subject.category)
                        {
                            score += subject.similarity * settings.subject_weight;
                        }
                    }
                    score
                })
                .collect()
        })
        .collect()
}

fn generate_candidate(
    settings: &LabelingConfig,
    base: &[Vec<f32>],
    vectors: &[FeatureVector],
    label_count: usize,
    attempt: usize,
) -> Candidate {
    let mut rng = ChaCha8Rng::seed_from_u64(settings.seed.wrapping_add(attempt as u64));
    let decay = 1.0 - attempt as f32 / settings.attempts as f32;

    let assignments: Vec<Option<usize>> = base
        .iter()
        .map(|scores| {
            let mut best: Option<(usize, f32)> = None;
            for (label, &score) in scores.iter().enumerate() {
                let jitter = (rng.gen::<f32>() * 2.0 - 1.0) * settings.perturbation * decay;
                let score = score + jitter;
                if best.map_or(true, |(_, b)| score > b) {
                    best = Some((label, score));
                }
            }
            best.filter(|(_, score)| *score >= settings.confidence_threshold)
                .map(|(label, _)| label)
        })
        .collect();

    let mut members: Vec<Vec<usize>> = vec![Vec::new(); label_count];
    for (i, assignment) in assignments.iter().enumerate() {
        if let Some(label) = assignment {
            members[*label].push(i);
        }
    }
    let quality = partition_quality(vectors, &members, settings.empty_group_penalty);

    Candidate {
        attempt,
        assignments,
        quality,
    }
}

/// Auto-group unclaimed tabs: every host with two or more tabs gets its own
/// group, the rest share one.
fn supplementary_groups(tabs: Vec<Tab>) -> Vec<Group> {
    if tabs.is_empty() {
        return Vec::new();
    }

    let hosts: Vec<String> = tabs.iter().map(|t| host_of(&t.url)).collect();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for host in hosts.iter().filter(|h| !h.is_empty()) {
        *counts.entry(host.as_str()).or_insert(0) += 1;
    }

    let mut by_host: Vec<(String, Vec<Tab>)> = Vec::new();
    let mut singles = Vec::new();
    for (tab, host) in tabs.into_iter().zip(hosts.iter()) {
        if counts.get(host.as_str()).copied().unwrap_or(0) >= 2 {
            match by_host.iter_mut().find(|(h, _)| h == host) {
                Some((_, members)) => members.push(tab),
                None => by_host.push((host.clone(), vec![tab])),
            }
        } else {
            singles.push(tab);
        }
    }

    let mut groups: Vec<Group> = by_host
        .into_iter()
        .map(|(_, members)| members)
        .chain((!singles.is_empty()).then_some(singles))
        .enumerate()
        .map(|(i, members)| Group::new(format!("auto_{}", i + 1), GroupOrigin::Supplementary, members))
        .collect();
    groups.retain(|g| !g.is_empty());
    groups
}
