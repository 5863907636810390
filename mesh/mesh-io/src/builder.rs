//! Format dispatch: one entry point for every supported input.

use std::path::Path;

use mesh_types::SurfaceMesh;
use tracing::debug;

use crate::cad::{CadBackend, load_parametric};
use crate::error::{IoError, IoResult};
use crate::triangulated::load_triangulated;

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshFormat {
    /// STL (Stereolithography), binary or ASCII. Read directly.
    Stl,
    /// STEP (ISO 10303-21) parametric geometry. Meshed by a [`CadBackend`].
    Step,
}

impl MeshFormat {
    /// Detect format from file extension (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`IoError::UnsupportedFormat`] for any extension other than
    /// `.stl`, `.step` or `.stp`, including a missing one.
    pub fn from_path<P: AsRef<Path>>(path: P) -> IoResult<Self> {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_lowercase();
        match ext.as_str() {
            "stl" => Ok(Self::Stl),
            "step" | "stp" => Ok(Self::Step),
            _ => Err(IoError::UnsupportedFormat { extension: ext }),
        }
    }

    /// Canonical file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Stl => "stl",
            Self::Step => "step",
        }
    }
}

/// Builds canonical meshes from files.
///
/// The builder owns the CAD backend used for parametric input, so every
/// STEP load goes through a fresh [`CadSession`](crate::CadSession) on the
/// same backend. Triangulated input never touches the backend.
///
/// # Example
///
/// ```no_run
/// use mesh_io::MeshBuilder;
///
/// let mut builder = MeshBuilder::new();
/// let mesh = builder.build("bracket.stl", None).unwrap();
/// println!("{} triangles", mesh.triangle_count());
/// ```
#[derive(Default)]
pub struct MeshBuilder {
    cad: Option<Box<dyn CadBackend>>,
}

impl MeshBuilder {
    /// Builder with the default CAD backend: the truck kernel when the
    /// `step` feature is enabled, none otherwise.
    #[must_use]
    pub fn new() -> Self {
        #[cfg(feature = "step")]
        {
            Self::with_cad_backend(Box::new(crate::step::TruckBackend::new()))
        }
        #[cfg(not(feature = "step"))]
        {
            Self::default()
        }
    }

    /// Builder that meshes parametric input with `backend`.
    #[must_use]
    pub fn with_cad_backend(backend: Box<dyn CadBackend>) -> Self {
        Self { cad: Some(backend) }
    }

    /// Whether parametric input can be loaded.
    #[must_use]
    pub fn supports_parametric(&self) -> bool {
        self.cad.is_some()
    }

    /// Load `path` into a [`SurfaceMesh`].
    ///
    /// `sizing` is the backend's tessellation hint for parametric input (the
    /// STEP backend uses it as a chord-deviation tolerance); `None` or a
    /// non-positive value selects the backend's automatic sizing. It is
    /// ignored for triangulated input.
    ///
    /// # Errors
    ///
    /// - [`IoError::UnsupportedFormat`] for an unrecognised extension
    /// - [`IoError::GeometryImport`] if parametric input cannot be imported
    ///   or meshed, or no CAD backend is configured
    /// - [`IoError::FileNotFound`] and the other I/O kinds for unreadable
    ///   triangulated files
    pub fn build<P: AsRef<Path>>(&mut self, path: P, sizing: Option<f64>) -> IoResult<SurfaceMesh> {
        let path = path.as_ref();
        let format = MeshFormat::from_path(path)?;
        debug!(path = %path.display(), ?format, "Building mesh");

        match format {
            MeshFormat::Stl => load_triangulated(path),
            MeshFormat::Step => {
                let Some(backend) = self.cad.as_deref_mut() else {
                    return Err(IoError::geometry_import(
                        path,
                        "no CAD backend available (enable the `step` feature)",
                    ));
                };
                load_parametric(backend, path, sizing)
            }
        }
    }
}

impl std::fmt::Debug for MeshBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeshBuilder")
            .field("supports_parametric", &self.supports_parametric())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn format_detection() {
        assert_eq!(MeshFormat::from_path("a.stl").unwrap(), MeshFormat::Stl);
        assert_eq!(MeshFormat::from_path("a.STL").unwrap(), MeshFormat::Stl);
        assert_eq!(MeshFormat::from_path("a.step").unwrap(), MeshFormat::Step);
        assert_eq!(MeshFormat::from_path("dir/a.Stp").unwrap(), MeshFormat::Step);
        assert_eq!(MeshFormat::Step.extension(), "step");
    }

    #[test]
    fn unsupported_extensions() {
        let err = MeshFormat::from_path("model.obj").unwrap_err();
        assert!(matches!(err, IoError::UnsupportedFormat { ref extension } if extension == "obj"));
        assert!(MeshFormat::from_path("no_extension").is_err());
    }

    #[test]
    fn unsupported_format_fails_before_touching_disk() {
        let mut builder = MeshBuilder::default();
        let err = builder.build("does/not/exist.ply", None).unwrap_err();
        assert!(matches!(err, IoError::UnsupportedFormat { .. }));
    }

    #[test]
    fn step_without_backend_is_an_import_error() {
        let mut builder = MeshBuilder::default();
        assert!(!builder.supports_parametric());
        let err = builder.build("part.step", None).unwrap_err();
        assert!(matches!(err, IoError::GeometryImport { .. }));
    }

    #[test]
    fn missing_stl_is_not_found() {
        let mut builder = MeshBuilder::new();
        let err = builder.build("nonexistent_12345.stl", None).unwrap_err();
        assert!(matches!(err, IoError::FileNotFound { .. }));
    }
}
