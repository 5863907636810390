//! STL (Stereolithography) facet reader and writer.
//!
//! Reads both ASCII and binary STL into a flat list of facets, keeping the
//! normal stored in the file. The stored normal matters here: the mesh
//! builder derives its per-triangle orientation from it rather than from
//! the vertex winding.
//!
//! # Format Detection
//!
//! - ASCII files start with "solid" (after optional whitespace)
//! - Binary files have an 80-byte header followed by a facet count
//!
//! A binary file whose header happens to start with "solid" is recognised
//! by NUL bytes inside the header.
//!
//! # Binary Format
//!
//! ```text
//! UINT8[80]    – Header (ignored)
//! UINT32       – Number of triangles
//! foreach triangle
//!     REAL32[3] – Normal vector
//!     REAL32[3] – Vertex 1
//!     REAL32[3] – Vertex 2
//!     REAL32[3] – Vertex 3
//!     UINT16    – Attribute byte count (usually 0)
//! end
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use mesh_types::{Point3, Vector3};
use tracing::debug;

use crate::error::{IoError, IoResult};

/// STL binary header size in bytes.
const HEADER_SIZE: usize = 80;

/// Size of one triangle in binary STL (normal + 3 vertices + attribute).
const TRIANGLE_SIZE: usize = 50;

/// One STL facet: the stored normal and three vertices, as written in the file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StlFacet {
    /// Facet normal as stored (not necessarily unit length, may be zero).
    pub normal: Vector3<f64>,
    /// The three vertices in file order.
    pub vertices: [Point3<f64>; 3],
}

impl StlFacet {
    /// Create a facet from a stored normal and three vertices.
    #[must_use]
    pub const fn new(normal: Vector3<f64>, vertices: [Point3<f64>; 3]) -> Self {
        Self { normal, vertices }
    }
}

/// Read all facets from an STL file.
///
/// Automatically detects ASCII vs binary format.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be opened or read
/// - The content is not valid STL
///
/// # Example
///
/// ```no_run
/// use mesh_io::read_stl;
///
/// let facets = read_stl("bracket.stl").unwrap();
/// println!("Read {} facets", facets.len());
/// ```
pub fn read_stl<P: AsRef<Path>>(path: P) -> IoResult<Vec<StlFacet>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| IoError::from_open(path, e))?;
    let file_len = file.metadata()?.len();
    let mut reader = BufReader::new(file);

    // Read enough to determine format
    let mut header = Vec::with_capacity(HEADER_SIZE + 4);
    (&mut reader)
        .take((HEADER_SIZE + 4) as u64)
        .read_to_end(&mut header)?;

    if header.len() < 6 {
        return Err(IoError::invalid_content("file too small to be valid STL"));
    }

    let header_str = String::from_utf8_lossy(&header[..header.len().min(HEADER_SIZE)]);
    let facets = if header_str.trim_start().starts_with("solid") && !is_binary_stl_header(&header)
    {
        // ASCII: the already-consumed header is part of the text
        read_stl_ascii(header.as_slice().chain(reader))?
    } else {
        read_stl_binary(&header, reader, file_len)?
    };

    debug!(path = %path.display(), facets = facets.len(), "Read STL");
    Ok(facets)
}

/// Check if a header that starts with "solid" is really binary.
fn is_binary_stl_header(header: &[u8]) -> bool {
    header.len() >= HEADER_SIZE + 4 && header[..HEADER_SIZE].contains(&0)
}

/// Read a binary STL given the already-read header.
///
/// `file_len` bounds the declared facet count before anything is allocated.
fn read_stl_binary<R: Read>(header: &[u8], mut reader: R, file_len: u64) -> IoResult<Vec<StlFacet>> {
    if header.len() < HEADER_SIZE + 4 {
        return Err(IoError::InvalidHeader {
            expected: HEADER_SIZE + 4,
            got: header.len(),
        });
    }

    let face_count = u32::from_le_bytes([
        header[HEADER_SIZE],
        header[HEADER_SIZE + 1],
        header[HEADER_SIZE + 2],
        header[HEADER_SIZE + 3],
    ]);

    // Facets actually present; trailing bytes past the declared count are ignored
    let available = file_len.saturating_sub((HEADER_SIZE + 4) as u64) / TRIANGLE_SIZE as u64;
    if u64::from(face_count) > available {
        return Err(IoError::InvalidFaceCount {
            expected: face_count,
            got: u32::try_from(available).unwrap_or(u32::MAX),
        });
    }

    let mut facets = Vec::with_capacity(face_count as usize);
    let mut triangle_buf = [0u8; TRIANGLE_SIZE];
    for i in 0..face_count {
        reader.read_exact(&mut triangle_buf).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                IoError::InvalidFaceCount {
                    expected: face_count,
                    got: i,
                }
            } else {
                IoError::Io(e)
            }
        })?;

        let normal = read_triple(&triangle_buf[0..12]);
        let v0 = read_triple(&triangle_buf[12..24]);
        let v1 = read_triple(&triangle_buf[24..36]);
        let v2 = read_triple(&triangle_buf[36..48]);
        facets.push(StlFacet::new(
            normal,
            [Point3::from(v0), Point3::from(v1), Point3::from(v2)],
        ));
    }

    Ok(facets)
}

/// Read three little-endian f32s.
fn read_triple(buf: &[u8]) -> Vector3<f64> {
    let x = f32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
    let y = f32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
    let z = f32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]);
    Vector3::new(f64::from(x), f64::from(y), f64::from(z))
}

/// Parse three whitespace-separated floats.
fn parse_triple(parts: &[&str]) -> IoResult<Vector3<f64>> {
    if parts.len() < 3 {
        return Err(IoError::invalid_content(format!(
            "expected three coordinates, got {}",
            parts.len()
        )));
    }
    Ok(Vector3::new(
        parts[0].parse()?,
        parts[1].parse()?,
        parts[2].parse()?,
    ))
}

/// Read an ASCII STL.
fn read_stl_ascii<R: Read>(reader: R) -> IoResult<Vec<StlFacet>> {
    let reader = BufReader::new(reader);
    let mut facets = Vec::new();
    let mut normal = Vector3::zeros();
    let mut in_facet = false;
    let mut in_loop = false;
    let mut vertices: Vec<Point3<f64>> = Vec::with_capacity(3);

    for line in reader.lines() {
        let line = line?;
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(keyword) = parts.first() else {
            continue;
        };

        match keyword.to_lowercase().as_str() {
            "facet" => {
                in_facet = true;
                normal = if parts.len() >= 2 && parts[1].eq_ignore_ascii_case("normal") {
                    parse_triple(&parts[2..])?
                } else {
                    Vector3::zeros()
                };
            }
            "outer" => {
                if parts.len() >= 2 && parts[1].eq_ignore_ascii_case("loop") {
                    in_loop = true;
                    vertices.clear();
                }
            }
            "vertex" => {
                if in_loop {
                    vertices.push(Point3::from(parse_triple(&parts[1..])?));
                }
            }
            "endloop" => {
                in_loop = false;
            }
            "endfacet" => {
                if in_facet {
                    let [v0, v1, v2] = vertices.as_slice() else {
                        return Err(IoError::invalid_content(format!(
                            "facet {} has {} vertices, expected 3",
                            facets.len(),
                            vertices.len()
                        )));
                    };
                    facets.push(StlFacet::new(normal, [*v0, *v1, *v2]));
                }
                in_facet = false;
            }
            "endsolid" => break,
            _ => {}
        }
    }

    Ok(facets)
}

/// Write facets to an STL file, keeping each facet's stored normal.
///
/// # Arguments
///
/// * `facets` - Facets to write
/// * `path` - Output file path
/// * `binary` - If true, write binary STL; otherwise ASCII
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save_stl<P: AsRef<Path>>(facets: &[StlFacet], path: P, binary: bool) -> IoResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    if binary {
        save_stl_binary(facets, &mut writer)?;
    } else {
        save_stl_ascii(facets, &mut writer)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write facets as binary STL.
fn save_stl_binary<W: Write>(facets: &[StlFacet], writer: &mut W) -> IoResult<()> {
    let mut header = [b' '; HEADER_SIZE];
    let text = b"Binary STL written by mesh-io";
    header[..text.len()].copy_from_slice(text);
    writer.write_all(&header)?;

    let face_count = u32::try_from(facets.len())
        .map_err(|_| IoError::invalid_content("too many facets for binary STL"))?;
    writer.write_all(&face_count.to_le_bytes())?;

    for facet in facets {
        write_triple(writer, &facet.normal)?;
        for v in &facet.vertices {
            write_triple(writer, &v.coords)?;
        }
        writer.write_all(&0u16.to_le_bytes())?;
    }

    Ok(())
}

/// Write a vector as 3 little-endian f32s.
fn write_triple<W: Write>(writer: &mut W, v: &Vector3<f64>) -> IoResult<()> {
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: f64 to f32 is intentional for STL format
    {
        writer.write_all(&(v.x as f32).to_le_bytes())?;
        writer.write_all(&(v.y as f32).to_le_bytes())?;
        writer.write_all(&(v.z as f32).to_le_bytes())?;
    }
    Ok(())
}

/// Write facets as ASCII STL.
fn save_stl_ascii<W: Write>(facets: &[StlFacet], writer: &mut W) -> IoResult<()> {
    writeln!(writer, "solid mesh")?;

    for facet in facets {
        let n = &facet.normal;
        writeln!(writer, "  facet normal {:.6e} {:.6e} {:.6e}", n.x, n.y, n.z)?;
        writeln!(writer, "    outer loop")?;
        for v in &facet.vertices {
            writeln!(writer, "      vertex {:.6e} {:.6e} {:.6e}", v.x, v.y, v.z)?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }

    writeln!(writer, "endsolid mesh")?;
    Ok(())
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::unnecessary_raw_string_hashes
)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn test_facet() -> StlFacet {
        StlFacet::new(
            Vector3::new(0.0, 0.0, 2.0),
            [
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
        )
    }

    #[test]
    fn binary_keeps_stored_normal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tri.stl");
        save_stl(&[test_facet()], &path, true).unwrap();

        let facets = read_stl(&path).unwrap();
        assert_eq!(facets.len(), 1);
        assert_relative_eq!(facets[0].normal.z, 2.0);
        assert_relative_eq!(facets[0].vertices[1].x, 1.0);
    }

    #[test]
    fn ascii_keeps_stored_normal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tri_ascii.stl");
        save_stl(&[test_facet(), test_facet()], &path, false).unwrap();

        let facets = read_stl(&path).unwrap();
        assert_eq!(facets.len(), 2);
        assert_relative_eq!(facets[1].normal.z, 2.0, epsilon = 1e-6);
        assert_relative_eq!(facets[1].vertices[2].y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn binary_header_starting_with_solid() {
        let mut bytes = vec![0u8; HEADER_SIZE];
        bytes[..5].copy_from_slice(b"solid");
        bytes.extend_from_slice(&1u32.to_le_bytes());
        for value in [0.0f32, 0.0, -1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0] {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        bytes.extend_from_slice(&0u16.to_le_bytes());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("solid_binary.stl");
        std::fs::write(&path, bytes).unwrap();

        let facets = read_stl(&path).unwrap();
        assert_eq!(facets.len(), 1);
        assert_relative_eq!(facets[0].normal.z, -1.0);
    }

    #[test]
    fn truncated_binary_reports_face_count() {
        let mut bytes = vec![b' '; HEADER_SIZE];
        bytes.extend_from_slice(&3u32.to_le_bytes());
        bytes.extend_from_slice(&[0u8; TRIANGLE_SIZE]);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.stl");
        std::fs::write(&path, bytes).unwrap();

        let err = read_stl(&path).unwrap_err();
        assert!(matches!(
            err,
            IoError::InvalidFaceCount {
                expected: 3,
                got: 1
            }
        ));
    }

    #[test]
    fn oversized_face_count_is_rejected_before_reading() {
        let mut bytes = vec![b' '; HEADER_SIZE];
        bytes.extend_from_slice(&u32::MAX.to_le_bytes());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("header_only.stl");
        std::fs::write(&path, bytes).unwrap();

        let err = read_stl(&path).unwrap_err();
        assert!(matches!(
            err,
            IoError::InvalidFaceCount {
                expected: u32::MAX,
                got: 0
            }
        ));
    }

    #[test]
    fn ascii_parsing() {
        let ascii_stl = br#"solid test
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 0 1 0
    endloop
  endfacet
endsolid test"#;

        let facets = read_stl_ascii(&ascii_stl[..]).unwrap();
        assert_eq!(facets.len(), 1);
        assert_eq!(facets[0].normal, Vector3::z());
    }

    #[test]
    fn ascii_facet_with_two_vertices_is_rejected() {
        let ascii_stl = b"solid bad\nfacet normal 0 0 1\nouter loop\nvertex 0 0 0\nvertex 1 0 0\nendloop\nendfacet\nendsolid bad\n";
        let err = read_stl_ascii(&ascii_stl[..]).unwrap_err();
        assert!(matches!(err, IoError::InvalidContent { .. }));
    }

    #[test]
    fn load_nonexistent_file() {
        let result = read_stl("nonexistent_file_12345.stl");
        assert!(matches!(result, Err(IoError::FileNotFound { .. })));
    }
}
