//! Filling empty groups by splitting the largest donor.

use crate::types::Group;

/// Give every empty group selected by `is_target` half of the largest group
/// that can spare tabs. Donors accepted by `preferred` are tried first; any
/// other group with at least two tabs is the fallback. Equal sizes resolve to
/// the earlier group.
///
/// Returns the number of groups that were filled.
pub fn fill_empty_groups<T, P>(groups: &mut [Group], is_target: T, preferred: P) -> usize
where
    T: Fn(&Group) -> bool,
    P: Fn(&Group) -> bool,
{
    let mut filled = 0;
    for target in 0..groups.len() {
        if !groups[target].is_empty() || !is_target(&groups[target]) {
            continue;
        }

        let donor = largest_donor(groups, target, &preferred)
            .or_else(|| largest_donor(groups, target, &|_: &Group| true));
        let Some(donor) = donor else {
            continue;
        };

        let keep = groups[donor].len() / 2;
        let moved = groups[donor].tabs.split_off(keep);
        tracing::debug!(
            from = %groups[donor].key,
            to = %groups[target].key,
            moved = moved.len(),
            "[Rebalance] Filled empty group"
        );
        groups[target].tabs = moved;
        filled += 1;
    }
    filled
}

fn largest_donor<P>(groups: &[Group], target: usize, accept: &P) -> Option<usize>
where
    P: Fn(&Group) -> bool,
{
    let mut best: Option<usize> = None;
    for (i, group) in groups.iter().enumerate() {
        if i == target || group.len() < 2 || !accept(group) {
            continue;
        }
        if best.map_or(true, |b| group.len() > groups[b].len()) {
            best = Some(i);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GroupOrigin, Tab};

    fn group(key: &str, origin: GroupOrigin, n: usize) -> Group {
        let tabs = (0..n)
            .map(|i| Tab::new(format!("{}-{}", key, i), "t", "https://a.com"))
            .collect();
        Group::new(key, origin, tabs)
    }

    #[test]
    fn test_takes_tail_half_of_largest() {
        let mut groups = vec![
            group("work", GroupOrigin::Label, 5),
            group("personal", GroupOrigin::Label, 0),
        ];
        let filled = fill_empty_groups(&mut groups, |g| g.origin == GroupOrigin::Label, |_| true);
        assert_eq!(filled, 1);
        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[1].len(), 3);
        assert_eq!(groups[1].tabs[0].id, "work-2");
    }

    #[test]
    fn test_prefers_marked_donors() {
        let mut groups = vec![
            group("work", GroupOrigin::Label, 6),
            group("personal", GroupOrigin::Label, 0),
            group("auto_1", GroupOrigin::Supplementary, 2),
        ];
        fill_empty_groups(
            &mut groups,
            |g| g.origin == GroupOrigin::Label,
            |g| g.origin == GroupOrigin::Supplementary,
        );
        assert_eq!(groups[0].len(), 6);
        assert_eq!(groups[1].len(), 1);
        assert_eq!(groups[2].len(), 1);
    }

    #[test]
    fn test_no_donor_leaves_group_empty() {
        let mut groups = vec![
            group("a", GroupOrigin::Label, 1),
            group("b", GroupOrigin::Label, 0),
        ];
        assert_eq!(fill_empty_groups(&mut groups, |_| true, |_| true), 0);
        assert!(groups[1].is_empty());
    }
}
