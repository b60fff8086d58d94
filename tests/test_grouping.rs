// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Grouping and vertex-to-triangle consensus tests.

use ngv::prelude::*;
use proptest::prelude::*;

#[test]
fn test_documented_layout() {
    let grouped = group_elements(&[3, 3, 3, 2, 2, 1, 0, -1, -1]);
    assert_eq!(grouped.ids, vec![6, 5, 3, 4, 0, 1, 2, 7, 8]);
    assert_eq!(grouped.offsets, vec![0, 1, 2, 4, 7, 9]);
    assert_eq!(grouped.groups, vec![0, 1, 2, 3, -1]);
}

#[test]
fn test_group_sizes_sum_to_element_count() {
    let labels = [4, -1, 4, 0, 2, 2, -1, 4, 0, 7];
    let grouped = group_elements(&labels);
    let total: usize = grouped.offsets.windows(2).map(|w| w[1] - w[0]).sum();
    assert_eq!(total, labels.len());
    assert_eq!(grouped.groups, vec![0, 2, 4, 7, -1]);
}

#[test]
fn test_triangle_groups_tie_break() {
    let vertex_groups = [5, 5, 7, 7, 9];
    // (5, 5, 7) (5, 7, 7) (5, 7, 9) (5, 9, 5)
    let triangles = [[0, 1, 2], [0, 2, 3], [0, 2, 4], [0, 4, 1]];
    assert_eq!(
        vertex_to_triangle_groups(&vertex_groups, &triangles),
        vec![5, 7, UNASSIGNED_GROUP, 5]
    );
}

#[test]
fn test_triangle_groups_then_grouping() {
    // Two quads of a strip, each quad split into two triangles
    let vertex_groups = [0, 0, 1, 1, 0, 0, 1, 1];
    let triangles = [[0, 1, 4], [1, 5, 4], [2, 3, 6], [3, 7, 6], [1, 2, 5]];
    let triangle_groups = vertex_to_triangle_groups(&vertex_groups, &triangles);
    assert_eq!(triangle_groups, vec![0, 0, 1, 1, 0]);

    let grouped = group_elements(&triangle_groups);
    let pairs: Vec<(i64, Vec<usize>)> = grouped
        .iter_assigned_groups()
        .map(|(label, members)| (label, members.to_vec()))
        .collect();
    assert_eq!(pairs, vec![(0, vec![0, 1, 4]), (1, vec![2, 3])]);
}

proptest! {
    #[test]
    fn prop_members_have_their_group_label(labels in prop::collection::vec(-1i64..10, 0..200)) {
        let grouped = group_elements(&labels);
        for (label, members) in grouped.iter_assigned_groups() {
            prop_assert!(label != UNASSIGNED_GROUP);
            for &m in members {
                prop_assert_eq!(labels[m], label);
            }
        }
        let unassigned = labels.iter().filter(|l| **l == UNASSIGNED_GROUP).count();
        let assigned: usize = grouped.iter_assigned_groups().map(|(_, m)| m.len()).sum();
        prop_assert_eq!(assigned + unassigned, labels.len());
    }

    #[test]
    fn prop_triangle_group_is_a_vertex_majority(
        vertex_groups in prop::collection::vec(-1i64..4, 3..30),
        raw in prop::collection::vec((0usize..1000, 0usize..1000, 0usize..1000), 0..50),
    ) {
        let n = vertex_groups.len();
        let triangles: Vec<[usize; 3]> = raw.iter().map(|&(a, b, c)| [a % n, b % n, c % n]).collect();
        let groups = vertex_to_triangle_groups(&vertex_groups, &triangles);
        prop_assert_eq!(groups.len(), triangles.len());

        for (tri, group) in triangles.iter().zip(&groups) {
            let labels = tri.map(|v| vertex_groups[v]);
            let votes = labels.iter().filter(|l| *l == group).count();
            if *group != UNASSIGNED_GROUP {
                prop_assert!(votes >= 2);
            } else {
                let all_distinct = labels[0] != labels[1] && labels[0] != labels[2] && labels[1] != labels[2];
                prop_assert!(all_distinct || votes >= 2);
            }
        }
    }
}
