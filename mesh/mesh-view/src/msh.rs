//! Gmsh MSH 2.2 ASCII view store.
//!
//! Each persisted view is a self-contained file: the attached mesh
//! (`$Nodes`, `$Elements`) followed by one `$ElementData` block carrying
//! the view label and one value per element tag.
//!
//! Node numbers are 1-based table indices. Element numbers are the mesh's
//! element tags.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use hashbrown::HashSet;
use mesh_types::SurfaceMesh;
use tracing::{debug, info};

use crate::backend::ViewBackend;
use crate::error::{ViewError, ViewResult};
use crate::view::{ScalarView, ViewHandle, ViewOptions};

/// MSH element type of a 3-node triangle.
const MSH_TRIANGLE: u8 = 2;

/// In-memory views over one mesh, written as MSH 2.2 files.
///
/// # Example
///
/// ```
/// use mesh_types::{Point3, SurfaceMesh, Vector3};
/// use mesh_view::{MshViewStore, ViewBackend};
///
/// let mesh = SurfaceMesh::with_sequential_tags(
///     vec![
///         Point3::new(0.0, 0.0, 0.0),
///         Point3::new(1.0, 0.0, 0.0),
///         Point3::new(0.0, 1.0, 0.0),
///     ],
///     vec![[0, 1, 2]],
///     vec![Vector3::z()],
/// )
/// .unwrap();
///
/// let mut store = MshViewStore::new();
/// store.set_mesh(&mesh);
/// let view = store.publish(mesh.element_tags(), &[0.5], "Sphere Radii").unwrap();
/// assert!(!store.options_mut(view).unwrap().visible);
/// ```
#[derive(Debug, Default)]
pub struct MshViewStore {
    mesh: Option<SurfaceMesh>,
    views: Vec<ScalarView>,
}

impl MshViewStore {
    /// Create an empty store with no mesh attached.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of published views.
    #[must_use]
    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    /// Render one view as MSH text.
    ///
    /// # Errors
    ///
    /// Fails for an unknown handle, a missing mesh, or a writer error.
    pub fn write_view<W: Write>(&self, view: ViewHandle, writer: &mut W) -> ViewResult<()> {
        let mesh = self.mesh.as_ref().ok_or(ViewError::NoMesh)?;
        let view = self.view(view)?;
        write_msh(mesh, view, writer)
    }
}

impl ViewBackend for MshViewStore {
    fn set_mesh(&mut self, mesh: &SurfaceMesh) {
        self.mesh = Some(mesh.clone());
        self.views.clear();
    }

    fn publish(
        &mut self,
        element_tags: &[u64],
        values: &[f64],
        label: &str,
    ) -> ViewResult<ViewHandle> {
        let mesh = self.mesh.as_ref().ok_or(ViewError::NoMesh)?;
        if element_tags.len() != values.len() {
            return Err(ViewError::LengthMismatch {
                label: label.to_string(),
                elements: element_tags.len(),
                values: values.len(),
            });
        }

        let known: HashSet<u64> = mesh.element_tags().iter().copied().collect();
        if let Some(&tag) = element_tags.iter().find(|t| !known.contains(*t)) {
            return Err(ViewError::UnknownElement {
                label: label.to_string(),
                tag,
            });
        }

        let handle = ViewHandle(self.views.len());
        self.views.push(ScalarView {
            label: label.to_string(),
            element_tags: element_tags.to_vec(),
            values: values.to_vec(),
            options: ViewOptions::default(),
        });
        debug!(label, view = %handle, elements = values.len(), "Published view");
        Ok(handle)
    }

    fn view(&self, view: ViewHandle) -> ViewResult<&ScalarView> {
        self.views.get(view.0).ok_or(ViewError::UnknownView(view))
    }

    fn options_mut(&mut self, view: ViewHandle) -> ViewResult<&mut ViewOptions> {
        self.views
            .get_mut(view.0)
            .map(|v| &mut v.options)
            .ok_or(ViewError::UnknownView(view))
    }

    fn persist(&self, view: ViewHandle, path: &Path) -> ViewResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ViewError::create_dir(parent, e))?;
        }

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_view(view, &mut writer)?;
        writer.flush()?;

        info!(path = %path.display(), view = %view, "Wrote view");
        Ok(())
    }
}

fn write_msh<W: Write>(mesh: &SurfaceMesh, view: &ScalarView, writer: &mut W) -> ViewResult<()> {
    writeln!(writer, "$MeshFormat")?;
    writeln!(writer, "2.2 0 8")?;
    writeln!(writer, "$EndMeshFormat")?;

    writeln!(writer, "$Nodes")?;
    writeln!(writer, "{}", mesh.node_count())?;
    for (i, p) in mesh.nodes().iter().enumerate() {
        writeln!(writer, "{} {} {} {}", i + 1, p.x, p.y, p.z)?;
    }
    writeln!(writer, "$EndNodes")?;

    writeln!(writer, "$Elements")?;
    writeln!(writer, "{}", mesh.triangle_count())?;
    for (tag, [a, b, c]) in mesh.element_tags().iter().zip(mesh.triangles()) {
        // Two integer tags: physical group 0, elementary entity 1
        writeln!(
            writer,
            "{tag} {MSH_TRIANGLE} 2 0 1 {} {} {}",
            a + 1,
            b + 1,
            c + 1
        )?;
    }
    writeln!(writer, "$EndElements")?;

    writeln!(writer, "$ElementData")?;
    writeln!(writer, "1")?;
    writeln!(writer, "\"{}\"", view.label.replace('"', "'"))?;
    writeln!(writer, "1")?;
    writeln!(writer, "0")?;
    writeln!(writer, "3")?;
    writeln!(writer, "0")?;
    writeln!(writer, "1")?;
    writeln!(writer, "{}", view.len())?;
    for (tag, value) in view.element_tags.iter().zip(&view.values) {
        writeln!(writer, "{tag} {value}")?;
    }
    writeln!(writer, "$EndElementData")?;
    Ok(())
}
