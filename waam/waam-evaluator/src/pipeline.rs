//! Load, analyse, publish, persist.

use std::path::PathBuf;

use mesh_io::MeshBuilder;
use mesh_thickness::{WallAnalysis, analyze_walls};
use mesh_types::SurfaceMesh;
use mesh_view::{MshViewStore, ViewBackend, ViewHandle};
use tracing::info;

use crate::config::EvaluationConfig;
use crate::error::{EvalError, EvalResult};

/// Label of the scaled radius view.
pub const RADII_LABEL: &str = "Sphere Radii";

/// Label of the scaled gradient view.
pub const GRADIENT_LABEL: &str = "Radii Gradients";

/// Everything one evaluation produced.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// The canonical mesh the fields refer to.
    pub mesh: SurfaceMesh,
    /// Raw and scaled fields with the summary report.
    pub analysis: WallAnalysis,
    /// Written radius view.
    pub radii_file: PathBuf,
    /// Written gradient view.
    pub gradient_file: PathBuf,
}

/// Evaluate with the default mesh builder and MSH view files.
///
/// # Errors
///
/// See [`evaluate_with`].
pub fn evaluate(config: &EvaluationConfig) -> EvalResult<Evaluation> {
    let mut builder = MeshBuilder::new();
    let mut views = MshViewStore::new();
    evaluate_with(&mut builder, &mut views, config)
}

/// Evaluate with an injected mesh builder and view backend.
///
/// Both fields are published over the mesh's element tags with default
/// options; the gradient view is made visible. Each is written to its own
/// file in [`EvaluationConfig::output_dir`].
///
/// # Errors
///
/// Returns the failing stage: [`EvalError::Load`] for unsupported or
/// unreadable input, [`EvalError::Analyze`] for an empty mesh or invalid
/// parameters, [`EvalError::Publish`] and [`EvalError::Persist`] for the
/// view backend.
pub fn evaluate_with(
    builder: &mut MeshBuilder,
    views: &mut dyn ViewBackend,
    config: &EvaluationConfig,
) -> EvalResult<Evaluation> {
    info!(input = %config.input.display(), "Evaluating wall thickness");

    let mesh = builder
        .build(&config.input, config.sizing)
        .map_err(|source| EvalError::Load {
            path: config.input.clone(),
            source,
        })?;

    let analysis = analyze_walls(&mesh, &config.params)?;

    views.set_mesh(&mesh);
    let radii_view = publish(views, &mesh, &analysis.scaled_radii, RADII_LABEL)?;
    let gradient_view = publish(views, &mesh, &analysis.scaled_gradient, GRADIENT_LABEL)?;
    views
        .options_mut(gradient_view)
        .map_err(|source| EvalError::Publish {
            label: GRADIENT_LABEL.to_string(),
            source,
        })?
        .visible = true;

    let radii_file = config.radii_path();
    let gradient_file = config.gradient_path();
    for (view, path) in [(radii_view, &radii_file), (gradient_view, &gradient_file)] {
        views.persist(view, path).map_err(|source| EvalError::Persist {
            path: path.clone(),
            source,
        })?;
    }

    info!(
        triangles = mesh.triangle_count(),
        output = %config.output_dir.display(),
        "Evaluation complete"
    );

    Ok(Evaluation {
        mesh,
        analysis,
        radii_file,
        gradient_file,
    })
}

fn publish(
    views: &mut dyn ViewBackend,
    mesh: &SurfaceMesh,
    values: &[f64],
    label: &str,
) -> EvalResult<ViewHandle> {
    views
        .publish(mesh.element_tags(), values, label)
        .map_err(|source| EvalError::Publish {
            label: label.to_string(),
            source,
        })
}
