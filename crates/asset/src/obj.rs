//! OBJ text format loader: positions, texture coordinates, normals and
//! triangular faces in full `p/t/n` form.
//!
//! Face corners are never welded: each corner appends a fresh vertex and the
//! new vertex's position in the output sequence to the index list, so the
//! indices are the identity sequence by construction. Out-of-range and
//! malformed references are reported as typed errors instead of being
//! silently accepted.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::mesh::{MeshData, MeshVertex};

#[derive(Debug, Error)]
pub enum ObjError {
    #[error("failed to open OBJ file {}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read line {line}")]
    Read {
        line: usize,
        #[source]
        source: io::Error,
    },
    #[error("line {line}: missing {what}")]
    Missing { line: usize, what: &'static str },
    #[error("line {line}: invalid {what} '{token}'")]
    Invalid {
        line: usize,
        what: &'static str,
        token: String,
    },
    #[error("line {line}: faces must be triangles with `p/t/n` corners")]
    UnsupportedFace { line: usize },
    #[error("line {line}: {what} index {index} out of range 1..={len}")]
    IndexOutOfRange {
        line: usize,
        what: &'static str,
        index: usize,
        len: usize,
    },
    #[error("mesh does not fit 32-bit indices")]
    TooManyVertices,
}

/// Load an OBJ mesh from a file path.
pub fn load_obj_from_path(path: impl AsRef<Path>) -> Result<MeshData, ObjError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ObjError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    load_obj_from_reader(BufReader::new(file))
}

/// Load an OBJ mesh from a [`BufRead`] implementation.
pub fn load_obj_from_reader<R: BufRead>(reader: R) -> Result<MeshData, ObjError> {
    parse_obj(reader)
}

/// Convenience helper to parse an OBJ string literal.
pub fn load_obj_from_str(contents: &str) -> Result<MeshData, ObjError> {
    parse_obj(io::Cursor::new(contents))
}

fn parse_obj<R: BufRead>(reader: R) -> Result<MeshData, ObjError> {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut texcoords: Vec<[f32; 2]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();

    let mut vertices: Vec<MeshVertex> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| ObjError::Read {
            line: line_no + 1,
            source,
        })?;
        let mut parts = line.split_whitespace();
        let Some(tag) = parts.next() else { continue };

        match tag {
            "v" => {
                let x = parse_f32(parts.next(), line_no, "x coordinate")?;
                let y = parse_f32(parts.next(), line_no, "y coordinate")?;
                let z = parse_f32(parts.next(), line_no, "z coordinate")?;
                positions.push([x, y, z]);
            }
            "vt" => {
                let u = parse_f32(parts.next(), line_no, "u coordinate")?;
                let v = parse_f32(parts.next(), line_no, "v coordinate")?;
                texcoords.push([u, v]);
            }
            "vn" => {
                let nx = parse_f32(parts.next(), line_no, "nx coordinate")?;
                let ny = parse_f32(parts.next(), line_no, "ny coordinate")?;
                let nz = parse_f32(parts.next(), line_no, "nz coordinate")?;
                normals.push([nx, ny, nz]);
            }
            "f" => {
                let corners: Vec<&str> = parts.collect();
                if corners.len() != 3 {
                    return Err(ObjError::UnsupportedFace { line: line_no + 1 });
                }
                for corner in corners {
                    let (pi, ti, ni) = parse_corner(corner, line_no)?;
                    let position = *lookup(&positions, pi, "position", line_no)?;
                    let uv = *lookup(&texcoords, ti, "texture coordinate", line_no)?;
                    let normal = *lookup(&normals, ni, "normal", line_no)?;

                    let index =
                        u32::try_from(vertices.len()).map_err(|_| ObjError::TooManyVertices)?;
                    vertices.push(MeshVertex::new(position, uv, normal));
                    indices.push(index);
                }
            }
            _ => {
                // Ignore other directives (#/o/g/s/usemtl/mtllib/etc.)
            }
        }
    }

    log::debug!(
        "parsed OBJ: {} vertices, {} triangles",
        vertices.len(),
        indices.len() / 3
    );
    Ok(MeshData::new(vertices, indices))
}

fn parse_f32(value: Option<&str>, line_no: usize, what: &'static str) -> Result<f32, ObjError> {
    let token = value.ok_or(ObjError::Missing {
        line: line_no + 1,
        what,
    })?;
    token.parse::<f32>().map_err(|_| ObjError::Invalid {
        line: line_no + 1,
        what,
        token: token.to_string(),
    })
}

/// Split a `p/t/n` corner into three 1-based pool indices.
fn parse_corner(token: &str, line_no: usize) -> Result<(usize, usize, usize), ObjError> {
    let mut split = token.split('/');
    let p = parse_index(split.next(), line_no)?;
    let t = parse_index(split.next(), line_no)?;
    let n = parse_index(split.next(), line_no)?;
    if split.next().is_some() {
        return Err(ObjError::UnsupportedFace { line: line_no + 1 });
    }
    Ok((p, t, n))
}

fn parse_index(value: Option<&str>, line_no: usize) -> Result<usize, ObjError> {
    let token = value
        .filter(|v| !v.is_empty())
        .ok_or(ObjError::UnsupportedFace { line: line_no + 1 })?;
    let idx = token.parse::<usize>().map_err(|_| ObjError::Invalid {
        line: line_no + 1,
        what: "face index",
        token: token.to_string(),
    })?;
    if idx == 0 {
        return Err(ObjError::Invalid {
            line: line_no + 1,
            what: "face index",
            token: token.to_string(),
        });
    }
    Ok(idx)
}

fn lookup<'a, T>(
    pool: &'a [T],
    index: usize,
    what: &'static str,
    line_no: usize,
) -> Result<&'a T, ObjError> {
    pool.get(index - 1).ok_or(ObjError::IndexOutOfRange {
        line: line_no + 1,
        what,
        index,
        len: pool.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = r#"
        v 0.0 0.0 0.0
        v 1.0 0.0 0.0
        v 0.0 1.0 0.0
        vn 0.0 0.0 1.0
        vt 0.0 0.0
        vt 1.0 0.0
        vt 0.0 1.0
        f 1/1/1 2/2/1 3/3/1
    "#;

    #[test]
    fn parse_simple_triangle() {
        let mesh = load_obj_from_str(TRIANGLE).expect("parse triangle");
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn corner_order_is_preserved() {
        let src = "v 1.0 0.0 0.0\nv 0.0 2.0 0.0\nv 0.0 0.0 3.0\n\
                   vt 0.0 0.0\nvt 0.5 0.0\nvt 0.0 0.5\n\
                   vn 0.0 0.0 1.0\n\
                   f 1/1/1 2/2/1 3/3/1\n";
        let mesh = load_obj_from_str(src).expect("parse");
        assert_eq!(mesh.vertices[0].position, [1.0, 0.0, 0.0]);
        assert_eq!(mesh.vertices[1].position, [0.0, 2.0, 0.0]);
        assert_eq!(mesh.vertices[2].position, [0.0, 0.0, 3.0]);
        assert_eq!(mesh.vertices[1].uv, [0.5, 0.0]);
        assert_eq!(mesh.vertices[2].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn shared_corners_are_not_welded() {
        // Two faces referencing the same pool entries still produce six
        // independent vertices and identity indices.
        let src = "v 0.0 0.0 0.0\nv 1.0 0.0 0.0\nv 0.0 1.0 0.0\nv 1.0 1.0 0.0\n\
                   vt 0.0 0.0\nvn 0.0 0.0 1.0\n\
                   f 1/1/1 2/1/1 3/1/1\n\
                   f 2/1/1 4/1/1 3/1/1\n";
        let mesh = load_obj_from_str(src).expect("parse");
        assert_eq!(mesh.vertices.len(), 6);
        assert_eq!(mesh.indices, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(mesh.indices.len(), 3 * mesh.triangle_count());
    }

    #[test]
    fn attribute_only_file_loads_empty() {
        let src = "v 0.0 0.0 0.0\nvt 0.0 0.0\nvn 0.0 0.0 1.0\n";
        let mesh = load_obj_from_str(src).expect("parse");
        assert!(mesh.is_empty());
        assert!(mesh.indices.is_empty());
    }

    #[test]
    fn missing_file_fails_to_open() {
        let err = load_obj_from_path("/definitely/not/here.obj").unwrap_err();
        assert!(matches!(err, ObjError::Open { .. }));
    }

    #[test]
    fn out_of_range_index_is_reported() {
        let src = "v 0.0 0.0 0.0\nv 1.0 0.0 0.0\nv 0.0 1.0 0.0\n\
                   vt 0.0 0.0\nvn 0.0 0.0 1.0\n\
                   f 1/1/1 2/1/1 5/1/1\n";
        let err = load_obj_from_str(src).unwrap_err();
        match err {
            ObjError::IndexOutOfRange {
                what, index, len, ..
            } => {
                assert_eq!(what, "position");
                assert_eq!(index, 5);
                assert_eq!(len, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_triangle_face_is_rejected() {
        let src = "v 0.0 0.0 0.0\nv 1.0 0.0 0.0\nv 0.0 1.0 0.0\nv 1.0 1.0 0.0\n\
                   vt 0.0 0.0\nvn 0.0 0.0 1.0\n\
                   f 1/1/1 2/1/1 3/1/1 4/1/1\n";
        let err = load_obj_from_str(src).unwrap_err();
        assert!(matches!(err, ObjError::UnsupportedFace { line: 7 }));
    }

    #[test]
    fn corner_without_normal_is_rejected() {
        let src = "v 0.0 0.0 0.0\nv 1.0 0.0 0.0\nv 0.0 1.0 0.0\n\
                   vt 0.0 0.0\n\
                   f 1/1 2/1 3/1\n";
        let err = load_obj_from_str(src).unwrap_err();
        assert!(matches!(err, ObjError::UnsupportedFace { .. }));
    }

    #[test]
    fn malformed_coordinate_is_rejected() {
        let src = "v 0.0 abc 0.0\n";
        let err = load_obj_from_str(src).unwrap_err();
        assert!(matches!(
            err,
            ObjError::Invalid {
                what: "y coordinate",
                ..
            }
        ));
    }

    #[test]
    fn unknown_directives_are_ignored() {
        let src = "# comment\no mesh\ns off\nusemtl none\n\
                   v 0.0 0.0 0.0\nv 1.0 0.0 0.0\nv 0.0 1.0 0.0\n\
                   vt 0.0 0.0\nvn 0.0 0.0 1.0\n\
                   f 1/1/1 2/1/1 3/1/1\n";
        let mesh = load_obj_from_str(src).expect("parse");
        assert_eq!(mesh.triangle_count(), 1);
    }
}
