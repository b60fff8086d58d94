// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Grouping of labelled elements and majority propagation from vertices to triangles.

[`group_elements`] turns a per-element label array into a CSR-style layout:

```text
labels  = [3, 3, 3, 2, 2, 1, 0, -1, -1]
ids     = [6, 5, 3, 4, 0, 1, 2, 7, 8]
offsets = [0, 1, 2, 4, 7, 9]
groups  = [0, 1, 2, 3, -1]
```

Members of `groups[i]` are `ids[offsets[i]..offsets[i + 1]]`, in their original
order. The unassigned label sorts last.
*/

use serde::{Deserialize, Serialize};

/// Label of elements that belong to no group
pub const UNASSIGNED_GROUP: i64 = -1;

/// Elements grouped by label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedElements {
    /// Element indices ordered by group, original order within a group
    pub ids: Vec<usize>,
    /// `groups.len() + 1` slice boundaries into `ids`
    pub offsets: Vec<usize>,
    /// Distinct labels, ascending, [`UNASSIGNED_GROUP`] last
    pub groups: Vec<i64>,
}

impl GroupedElements {
    pub fn n_groups(&self) -> usize {
        self.groups.len()
    }

    /// Members of the `i`-th group
    pub fn members(&self, i: usize) -> &[usize] {
        &self.ids[self.offsets[i]..self.offsets[i + 1]]
    }

    /// All `(label, members)` pairs including the unassigned group
    pub fn iter_groups(&self) -> impl Iterator<Item = (i64, &[usize])> + '_ {
        self.groups
            .iter()
            .enumerate()
            .map(move |(i, &label)| (label, self.members(i)))
    }

    /// `(label, members)` pairs, skipping the unassigned group
    pub fn iter_assigned_groups(&self) -> impl Iterator<Item = (i64, &[usize])> + '_ {
        self.iter_groups().filter(|(label, _)| *label != UNASSIGNED_GROUP)
    }
}

/// Group element indices by their label
pub fn group_elements(labels: &[i64]) -> GroupedElements {
    let mut ids: Vec<usize> = (0..labels.len()).collect();
    // Stable: equal labels keep their original order
    ids.sort_by_key(|&i| (labels[i] == UNASSIGNED_GROUP, labels[i]));

    let mut offsets = Vec::new();
    let mut groups = Vec::new();
    for (position, &id) in ids.iter().enumerate() {
        let label = labels[id];
        if groups.last() != Some(&label) {
            groups.push(label);
            offsets.push(position);
        }
    }
    offsets.push(ids.len());

    GroupedElements { ids, offsets, groups }
}

/// Group of a triangle from the groups of its three vertices.
///
/// A label shared by at least two vertices wins. `v0` is checked against `v1`
/// and `v2` first, then `v1` against `v2`.
#[inline]
pub fn triangle_group(v0: i64, v1: i64, v2: i64) -> i64 {
    if v0 == v1 || v0 == v2 {
        v0
    } else if v1 == v2 {
        v1
    } else {
        UNASSIGNED_GROUP
    }
}

/// Per-triangle groups by two-out-of-three vertex consensus
pub fn vertex_to_triangle_groups(vertex_groups: &[i64], triangles: &[[usize; 3]]) -> Vec<i64> {
    triangles
        .iter()
        .map(|&[a, b, c]| triangle_group(vertex_groups[a], vertex_groups[b], vertex_groups[c]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_group_elements_layout() {
        let grouped = group_elements(&[3, 3, 3, 2, 2, 1, 0, -1, -1]);
        assert_eq!(grouped.ids, vec![6, 5, 3, 4, 0, 1, 2, 7, 8]);
        assert_eq!(grouped.offsets, vec![0, 1, 2, 4, 7, 9]);
        assert_eq!(grouped.groups, vec![0, 1, 2, 3, -1]);
    }

    #[test]
    fn test_stable_within_group() {
        let grouped = group_elements(&[1, 0, 1, -1, 0, 1]);
        assert_eq!(grouped.ids, vec![1, 4, 0, 2, 5, 3]);
        assert_eq!(grouped.members(1), &[0, 2, 5]);
    }

    #[test]
    fn test_other_negative_labels_sort_normally() {
        let grouped = group_elements(&[-1, -3, 2, -2]);
        assert_eq!(grouped.groups, vec![-3, -2, 2, -1]);
        assert_eq!(grouped.ids, vec![1, 3, 2, 0]);
    }

    #[test]
    fn test_empty_input() {
        let grouped = group_elements(&[]);
        assert!(grouped.ids.is_empty());
        assert_eq!(grouped.offsets, vec![0]);
        assert!(grouped.groups.is_empty());
        assert_eq!(grouped.iter_assigned_groups().count(), 0);
    }

    #[test]
    fn test_iter_assigned_groups_skips_unassigned() {
        let grouped = group_elements(&[3, 3, 3, 2, 2, 1, 0, -1, -1]);
        let pairs: Vec<(i64, Vec<usize>)> = grouped
            .iter_assigned_groups()
            .map(|(label, members)| (label, members.to_vec()))
            .collect();
        assert_eq!(
            pairs,
            vec![(0, vec![6]), (1, vec![5]), (2, vec![3, 4]), (3, vec![0, 1, 2])]
        );
        // Can be iterated again
        assert_eq!(grouped.iter_assigned_groups().count(), 4);
        assert_eq!(grouped.iter_groups().count(), 5);
    }

    #[test]
    fn test_triangle_consensus_tie_break() {
        assert_eq!(triangle_group(5, 5, 7), 5);
        assert_eq!(triangle_group(5, 7, 7), 7);
        assert_eq!(triangle_group(5, 7, 9), UNASSIGNED_GROUP);
        assert_eq!(triangle_group(5, 9, 5), 5);
        assert_eq!(triangle_group(4, 4, 4), 4);
    }

    #[test]
    fn test_vertex_to_triangle_groups() {
        let vertex_groups = [5, 5, 7, 7, 9];
        let triangles = [[0, 1, 2], [0, 2, 3], [0, 2, 4], [0, 4, 1]];
        assert_eq!(
            vertex_to_triangle_groups(&vertex_groups, &triangles),
            vec![5, 7, -1, 5]
        );
    }

    proptest! {
        #[test]
        fn prop_groups_recover_label_sets(labels in prop::collection::vec(-1i64..6, 0..80)) {
            let grouped = group_elements(&labels);

            prop_assert_eq!(grouped.offsets.len(), grouped.groups.len() + 1);
            prop_assert_eq!(*grouped.offsets.last().unwrap(), labels.len());

            for (i, &label) in grouped.groups.iter().enumerate() {
                let members: BTreeSet<usize> = grouped.members(i).iter().copied().collect();
                let expected: BTreeSet<usize> = labels
                    .iter()
                    .enumerate()
                    .filter(|(_, l)| **l == label)
                    .map(|(j, _)| j)
                    .collect();
                prop_assert_eq!(members, expected);
                prop_assert!(grouped.members(i).windows(2).all(|w| w[0] < w[1]));
            }
        }

        #[test]
        fn prop_grouping_is_pure(labels in prop::collection::vec(-1i64..4, 0..50)) {
            prop_assert_eq!(group_elements(&labels), group_elements(&labels));
        }
    }
}
