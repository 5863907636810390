//! End-to-end tests of the wall thickness pipeline on generated slabs.

#![allow(clippy::unwrap_used, clippy::float_cmp, clippy::cast_possible_truncation)]

use approx::assert_relative_eq;
use mesh_thickness::{INVALID_RADIUS, ThicknessError, ThicknessParams, analyze_walls};
use mesh_types::{Point3, SurfaceMesh, Vector3};

/// Two facing `n x n` grids of the unit square, `gap` apart. Bottom normals
/// point up into the slab, top normals point down.
fn slab_parts(n: u32, gap: f64) -> (Vec<Point3<f64>>, Vec<[u32; 3]>, Vec<Vector3<f64>>) {
    let mut nodes = Vec::new();
    let mut triangles = Vec::new();
    let mut normals = Vec::new();
    let step = 1.0 / f64::from(n);

    for (z, normal) in [(0.0, Vector3::z()), (gap, -Vector3::z())] {
        let base = nodes.len() as u32;
        for j in 0..=n {
            for i in 0..=n {
                nodes.push(Point3::new(f64::from(i) * step, f64::from(j) * step, z));
            }
        }
        for j in 0..n {
            for i in 0..n {
                let a = base + j * (n + 1) + i;
                let c = a + n + 1;
                triangles.push([a, a + 1, c]);
                triangles.push([a + 1, c + 1, c]);
                normals.push(normal);
                normals.push(normal);
            }
        }
    }
    (nodes, triangles, normals)
}

fn slab(n: u32, gap: f64) -> SurfaceMesh {
    let (nodes, triangles, normals) = slab_parts(n, gap);
    SurfaceMesh::with_sequential_tags(nodes, triangles, normals).unwrap()
}

#[test]
fn uniform_slab_has_uniform_thickness() {
    let analysis = analyze_walls(&slab(4, 0.2), &ThicknessParams::default()).unwrap();

    assert_eq!(analysis.report.triangles, 64);
    assert_eq!(analysis.report.solve.converged, 64);
    for &r in analysis.radii.values() {
        assert_relative_eq!(r, 0.2, epsilon = 1e-6);
    }
    assert_relative_eq!(analysis.report.min_wall_thickness().unwrap(), 0.4, epsilon = 1e-5);

    // Every triangle has grid neighbours with the same radius
    assert_eq!(analysis.gradient.defined_count(), 64);
    assert!(analysis.gradient.values().iter().all(|g| g.abs() < 1e-4));

    for &s in &analysis.scaled_radii {
        assert_relative_eq!(s, 1.0, epsilon = 1e-6);
    }
    assert!(analysis.scaled_gradient.iter().all(|&g| (0.0..=1.0).contains(&g)));
}

#[test]
fn unit_gap_matches_first_guess() {
    let analysis = analyze_walls(&slab(2, 1.0), &ThicknessParams::default()).unwrap();
    for &r in analysis.radii.values() {
        assert_relative_eq!(r, 1.0, epsilon = 1e-6);
    }
}

#[test]
fn zero_normal_triangle_is_marked_and_skipped() {
    let (nodes, triangles, mut normals) = slab_parts(3, 0.2);
    normals[4] = Vector3::zeros();
    let mesh = SurfaceMesh::with_sequential_tags(nodes, triangles, normals).unwrap();

    let analysis = analyze_walls(&mesh, &ThicknessParams::default()).unwrap();

    assert_eq!(analysis.radii.values()[4], INVALID_RADIUS);
    assert_eq!(analysis.scaled_radii[4], INVALID_RADIUS);
    assert_eq!(analysis.report.solve.degenerate_normals, 1);
    // The sentinel radius against valid neighbours near 0.2 gives a steep jump
    assert!(analysis.gradient.is_defined(4));
    assert!(analysis.gradient.values()[4] > 1.0);
    assert!(analysis.scaled_gradient.iter().all(|&g| (0.0..=1.0).contains(&g)));

    // Neighbours of the bad triangle still see their other neighbours
    for i in [3, 5] {
        assert!(analysis.gradient.is_defined(i));
        assert!(analysis.gradient.values()[i].abs() < 1e-4);
    }
}

#[test]
fn sequential_and_parallel_agree() {
    let mesh = slab(5, 0.35);
    let par = analyze_walls(&mesh, &ThicknessParams::default()).unwrap();
    let seq = analyze_walls(&mesh, &ThicknessParams::default().parallel(false)).unwrap();
    assert_eq!(par, seq);
}

#[test]
fn invalid_params_are_reported() {
    let params = ThicknessParams::default().outlier_fraction(1.5);
    let err = analyze_walls(&slab(1, 0.2), &params).unwrap_err();
    assert!(matches!(err, ThicknessError::InvalidParams(_)));
}
