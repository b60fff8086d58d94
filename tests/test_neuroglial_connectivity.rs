// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Neuroglial connectivity tests: synapses inside astrocyte microdomains.

use glam::DVec3;
use ngv::building::geometry::convex_shape_with_spheres;
use ngv::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn random_points(n: usize, seed: u64, side: f64) -> Vec<DVec3> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|_| DVec3::new(rng.gen(), rng.gen(), rng.gen()) * side)
        .collect()
}

#[test]
fn test_spheres_inside_domain_matches_mask() {
    let points = random_points(2000, 1, 50.0);
    let index = SpatialIndex::from_points(&points, &vec![0.0; points.len()], 4.0);
    let domain = Microdomain::from_triangles(
        vec![
            DVec3::new(10.0, 10.0, 10.0),
            DVec3::new(40.0, 12.0, 10.0),
            DVec3::new(12.0, 40.0, 12.0),
            DVec3::new(15.0, 15.0, 40.0),
        ],
        &[[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]],
    );

    let inside = spheres_inside_domain(&index, &points, &domain);
    let mask = convex_shape_with_spheres(
        domain.face_points(),
        domain.face_normals(),
        &points,
        &vec![0.0; points.len()],
    );
    let expected: Vec<usize> = mask
        .iter()
        .enumerate()
        .filter_map(|(i, inside)| inside.then_some(i))
        .collect();

    assert!(!expected.is_empty());
    assert_eq!(inside, expected);
}

#[test]
fn test_overlapping_domains_share_synapses() {
    let synapses = random_points(500, 2, 20.0);
    let synapse_to_neuron: Vec<usize> = (0..synapses.len()).map(|i| i / 10).collect();
    let tiles = Microdomain::from_box(DVec3::ZERO, DVec3::splat(10.0));
    let domains = vec![
        tiles.clone(),
        tiles.scaled(1.5),
        Microdomain::from_box(DVec3::splat(10.0), DVec3::splat(20.0)),
    ];

    let edges = astrocyte_neuroglial_connectivity(
        &[0, 1, 2],
        &domains,
        &synapses,
        &synapse_to_neuron,
        &NeuroglialParams::default(),
    );

    let of = |astrocyte: usize| -> Vec<usize> {
        edges.iter().filter(|e| e.astrocyte == astrocyte).map(|e| e.synapse).collect()
    };
    let small = of(0);
    let large = of(1);
    assert!(!small.is_empty());
    assert!(large.len() > small.len());
    assert!(small.iter().all(|s| large.contains(s)));
    assert!(edges.iter().all(|e| e.neuron == e.synapse / 10));
    assert!(edges.windows(2).all(|w| w[0].astrocyte < w[1].astrocyte
        || (w[0].astrocyte == w[1].astrocyte && w[0].synapse < w[1].synapse)));
}

#[test]
fn test_no_synapses() {
    let domains = vec![Microdomain::from_box(DVec3::ZERO, DVec3::ONE)];
    assert!(astrocyte_neuroglial_connectivity(&[0], &domains, &[], &[], &NeuroglialParams::default()).is_empty());
}

#[test]
fn test_configured_cell_size_matches_default() {
    let synapses = random_points(800, 3, 30.0);
    let synapse_to_neuron: Vec<usize> = (0..synapses.len()).collect();
    let domains: Vec<Microdomain> = (0..5)
        .map(|i| {
            let lo = DVec3::splat(i as f64 * 5.0);
            Microdomain::from_box(lo, lo + DVec3::splat(8.0))
        })
        .collect();
    let astrocytes = [4, 2, 0, 1, 3];

    let mut config = NgvConfig::default();
    config.spatial_index.cell_size = 1.5;
    let configured = NeuroglialParams::try_from(&config).unwrap();

    let a = astrocyte_neuroglial_connectivity(&astrocytes, &domains, &synapses, &synapse_to_neuron, &configured);
    let b = astrocyte_neuroglial_connectivity(
        &astrocytes,
        &domains,
        &synapses,
        &synapse_to_neuron,
        &NeuroglialParams::default(),
    );
    assert!(!a.is_empty());
    assert_eq!(a, b);
}
