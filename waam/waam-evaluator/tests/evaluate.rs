//! End-to-end evaluation of STL fixtures written to a temporary directory.

#![allow(clippy::unwrap_used, clippy::float_cmp, clippy::cast_possible_truncation)]

use std::path::Path;

use approx::assert_relative_eq;
use mesh_io::{IoError, MeshBuilder, StlFacet, save_stl};
use mesh_thickness::ThicknessParams;
use mesh_types::{Point3, SurfaceMesh, Vector3};
use mesh_view::{ScalarView, ViewBackend, ViewError, ViewHandle, ViewOptions, ViewResult};
use tempfile::tempdir;
use waam_evaluator::{
    EvalError, EvaluationConfig, GRADIENT_FILE, GRADIENT_LABEL, RADII_FILE, RADII_LABEL, evaluate,
    evaluate_with,
};

/// Facets of two facing `n x n` grids, `gap` apart, with outward stored
/// normals: the bottom points down, the top points up.
fn slab_facets(n: u32, gap: f64) -> Vec<StlFacet> {
    let step = 1.0 / f64::from(n);
    let p = |i: u32, j: u32, z: f64| Point3::new(f64::from(i) * step, f64::from(j) * step, z);
    let mut facets = Vec::new();
    for j in 0..n {
        for i in 0..n {
            let (a, b, c, d) = (p(i, j, 0.0), p(i + 1, j, 0.0), p(i, j + 1, 0.0), p(i + 1, j + 1, 0.0));
            facets.push(StlFacet::new(-Vector3::z(), [a, c, b]));
            facets.push(StlFacet::new(-Vector3::z(), [b, c, d]));

            let (a, b, c, d) = (p(i, j, gap), p(i + 1, j, gap), p(i, j + 1, gap), p(i + 1, j + 1, gap));
            facets.push(StlFacet::new(Vector3::z(), [a, b, c]));
            facets.push(StlFacet::new(Vector3::z(), [b, d, c]));
        }
    }
    facets
}

fn write_slab(dir: &Path, binary: bool) -> std::path::PathBuf {
    let path = dir.join(if binary { "slab.stl" } else { "slab_ascii.STL" });
    save_stl(&slab_facets(3, 0.2), &path, binary).unwrap();
    path
}

#[test]
fn binary_stl_end_to_end() {
    let dir = tempdir().unwrap();
    let input = write_slab(dir.path(), true);
    let output = dir.path().join("views");

    let config = EvaluationConfig::new(&input).output_dir(&output);
    let evaluation = evaluate(&config).unwrap();

    assert_eq!(evaluation.mesh.triangle_count(), 36);
    assert_eq!(evaluation.mesh.node_count(), 32);
    for &r in evaluation.analysis.radii.values() {
        assert_relative_eq!(r, 0.2, epsilon = 1e-6);
    }
    assert_eq!(evaluation.analysis.report.solve.converged, 36);

    assert_eq!(evaluation.radii_file, output.join(RADII_FILE));
    assert_eq!(evaluation.gradient_file, output.join(GRADIENT_FILE));
    let radii = std::fs::read_to_string(&evaluation.radii_file).unwrap();
    let gradient = std::fs::read_to_string(&evaluation.gradient_file).unwrap();
    assert!(radii.contains(&format!("\"{RADII_LABEL}\"")));
    assert!(gradient.contains(&format!("\"{GRADIENT_LABEL}\"")));
}

#[test]
fn ascii_stl_with_upper_case_extension() {
    let dir = tempdir().unwrap();
    let input = write_slab(dir.path(), false);

    let config = EvaluationConfig::new(&input)
        .output_dir(dir.path().join("out"))
        .params(ThicknessParams::default().parallel(false));
    let evaluation = evaluate(&config).unwrap();
    assert_eq!(evaluation.analysis.radii.len(), 36);
    assert!(evaluation.gradient_file.exists());
}

#[test]
fn missing_input_is_a_load_error() {
    let dir = tempdir().unwrap();
    let config = EvaluationConfig::new(dir.path().join("absent.stl"));
    let err = evaluate(&config).unwrap_err();
    assert!(matches!(
        err,
        EvalError::Load {
            source: IoError::FileNotFound { .. },
            ..
        }
    ));
}

/// Keeps views in memory and records persisted paths.
#[derive(Default)]
struct RecordingViews {
    tags: Vec<u64>,
    views: Vec<ScalarView>,
    persisted: std::cell::RefCell<Vec<(usize, std::path::PathBuf)>>,
}

impl ViewBackend for RecordingViews {
    fn set_mesh(&mut self, mesh: &SurfaceMesh) {
        self.tags = mesh.element_tags().to_vec();
        self.views.clear();
    }

    fn publish(&mut self, element_tags: &[u64], values: &[f64], label: &str) -> ViewResult<ViewHandle> {
        assert_eq!(element_tags, self.tags.as_slice());
        self.views.push(ScalarView {
            label: label.to_string(),
            element_tags: element_tags.to_vec(),
            values: values.to_vec(),
            options: ViewOptions::default(),
        });
        Ok(ViewHandle::new(self.views.len() - 1))
    }

    fn view(&self, view: ViewHandle) -> ViewResult<&ScalarView> {
        self.views.get(view.index()).ok_or(ViewError::UnknownView(view))
    }

    fn options_mut(&mut self, view: ViewHandle) -> ViewResult<&mut ViewOptions> {
        self.views
            .get_mut(view.index())
            .map(|v| &mut v.options)
            .ok_or(ViewError::UnknownView(view))
    }

    fn persist(&self, view: ViewHandle, path: &Path) -> ViewResult<()> {
        self.persisted.borrow_mut().push((view.index(), path.to_path_buf()));
        Ok(())
    }
}

#[test]
fn injected_backend_receives_element_tags_and_visibility() {
    let dir = tempdir().unwrap();
    let input = write_slab(dir.path(), true);
    let config = EvaluationConfig::new(&input).output_dir(dir.path().join("o"));

    let mut builder = MeshBuilder::new();
    let mut views = RecordingViews::default();
    let evaluation = evaluate_with(&mut builder, &mut views, &config).unwrap();

    assert_eq!(views.views.len(), 2);
    assert_eq!(views.views[0].label, RADII_LABEL);
    assert_eq!(views.views[1].label, GRADIENT_LABEL);
    assert!(!views.views[0].options.visible);
    assert!(views.views[1].options.visible);
    assert_eq!(views.views[0].options.colormap, 17);
    assert_eq!(views.views[0].values, evaluation.analysis.scaled_radii);
    assert_eq!(views.views[1].values, evaluation.analysis.scaled_gradient);

    let persisted = views.persisted.borrow();
    assert_eq!(persisted.len(), 2);
    assert_eq!(persisted[0], (0, config.radii_path()));
    assert_eq!(persisted[1], (1, config.gradient_path()));
}
