//! Minimal OBJ parser supporting positions, normals and polygon faces.
//! Texture coordinates may appear in face corners but are not kept.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use anyhow::{Context, Result, anyhow};

use crate::mesh::{Face, MeshData, RawMesh};
use crate::normalize::{NormalizeConfig, normalize};

/// Load an OBJ mesh from a file path.
pub fn load_obj_from_path(path: impl AsRef<Path>) -> Result<RawMesh> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open OBJ file: {}", path.as_ref().display()))?;
    load_obj_from_reader(BufReader::new(file))
}

/// Load an OBJ mesh from a [`BufRead`] implementation.
pub fn load_obj_from_reader<R: BufRead>(reader: R) -> Result<RawMesh> {
    parse_obj(reader)
}

/// Convenience helper to parse an OBJ string literal.
pub fn load_obj_from_str(contents: &str) -> Result<RawMesh> {
    parse_obj(io::Cursor::new(contents))
}

/// Parse, center, scale and resolve normals in one go.
pub fn load_mesh_from_path(path: impl AsRef<Path>, config: &NormalizeConfig) -> Result<MeshData> {
    let path = path.as_ref();
    let raw = load_obj_from_path(path)?;
    log::info!(
        "Parsed {}: {} vertices, {} faces, {} normals",
        path.display(),
        raw.positions.len(),
        raw.faces.len(),
        raw.normals.len()
    );

    let mesh = normalize(&raw, config)
        .with_context(|| format!("Invalid mesh in {}", path.display()))?;
    if !mesh.is_valid() {
        anyhow::bail!("OBJ contained no triangles: {}", path.display());
    }

    log::info!(
        "Mesh ready: {} vertices, {} triangles ({:?} normals, margin {})",
        mesh.vertex_count(),
        mesh.triangle_count(),
        config.normal_policy,
        config.scale_margin
    );
    Ok(mesh)
}

fn parse_obj<R: BufRead>(reader: R) -> Result<RawMesh> {
    let mut raw = RawMesh::default();
    let mut texcoord_count = 0usize;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", line_no + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut parts = trimmed.split_whitespace();
        let tag = parts
            .next()
            .ok_or_else(|| anyhow!("Malformed OBJ line {}: '{}'", line_no + 1, trimmed))?;

        match tag {
            "v" => {
                let x = parse_f32(parts.next(), line_no, "x coordinate")?;
                let y = parse_f32(parts.next(), line_no, "y coordinate")?;
                let z = parse_f32(parts.next(), line_no, "z coordinate")?;
                raw.positions.push([x, y, z]);
            }
            "vt" => texcoord_count += 1,
            "vn" => {
                let nx = parse_f32(parts.next(), line_no, "nx coordinate")?;
                let ny = parse_f32(parts.next(), line_no, "ny coordinate")?;
                let nz = parse_f32(parts.next(), line_no, "nz coordinate")?;
                raw.normals.push([nx, ny, nz]);
            }
            "f" => {
                let mut vertices: Vec<u32> = Vec::new();
                let mut normals: Vec<u32> = Vec::new();
                for part in parts {
                    let (vi, vni) = parse_face_vertex(
                        part,
                        raw.positions.len(),
                        texcoord_count,
                        raw.normals.len(),
                        line_no,
                    )?;
                    vertices.push(vi);
                    if let Some(ni) = vni {
                        normals.push(ni);
                    }
                }

                if vertices.len() < 3 {
                    log::warn!(
                        "Skipping face with {} corner(s) on line {}",
                        vertices.len(),
                        line_no + 1
                    );
                    continue;
                }

                let face = if normals.is_empty() {
                    Face::new(vertices)
                } else if normals.len() == vertices.len() {
                    Face::with_normals(vertices, normals)
                } else {
                    log::warn!(
                        "Face on line {} has normals on only some corners; ignoring them",
                        line_no + 1
                    );
                    Face::new(vertices)
                };
                raw.faces.push(face);
            }
            _ => {
                // Ignore other directives (o/g/s/usemtl/etc.)
            }
        }
    }

    Ok(raw)
}

fn parse_f32(value: Option<&str>, line_no: usize, what: &str) -> Result<f32> {
    let token = value.ok_or_else(|| anyhow!("Missing {} on line {}", what, line_no + 1))?;
    token
        .parse::<f32>()
        .with_context(|| format!("Failed to parse {} on line {}", what, line_no + 1))
}

/// Returns 0-based (position, normal) indices of one face corner.
fn parse_face_vertex(
    token: &str,
    pos_count: usize,
    tex_count: usize,
    norm_count: usize,
    line_no: usize,
) -> Result<(u32, Option<u32>)> {
    let mut split = token.split('/');
    let pos = split
        .next()
        .ok_or_else(|| anyhow!("Malformed face element '{}' on line {}", token, line_no + 1))?;
    let pos_idx = resolve_index(pos, pos_count, line_no)?;

    // Texture index is validated but dropped.
    if let Some(value) = split.next().filter(|v| !v.is_empty()) {
        resolve_index(value, tex_count, line_no)?;
    }

    let norm_idx = match split.next() {
        Some(value) if !value.is_empty() => Some(resolve_index(value, norm_count, line_no)?),
        _ => None,
    };

    Ok((pos_idx, norm_idx))
}

fn resolve_index(token: &str, len: usize, line_no: usize) -> Result<u32> {
    let raw = token
        .parse::<i64>()
        .with_context(|| format!("Invalid index '{}' on line {}", token, line_no + 1))?;
    if raw == 0 {
        anyhow::bail!("OBJ indices are 1-based; found 0 on line {}", line_no + 1);
    }

    let idx = if raw > 0 { raw - 1 } else { len as i64 + raw };

    if idx < 0 || idx as usize >= len {
        anyhow::bail!(
            "OBJ index {} resolved out of bounds (len={}) on line {}",
            raw,
            len,
            line_no + 1
        );
    }

    u32::try_from(idx).map_err(|_| anyhow!("OBJ index {} too large on line {}", raw, line_no + 1))
}
