//! Mesh normalization: center at the centroid, scale into the unit cube with a
//! margin, resolve one normal per vertex and triangulate.
//!
//! Synthesized smooth normals are the unweighted sum of the unit normals of
//! all faces touching a vertex, renormalized. Neither face area nor corner
//! angle is taken into account.

use std::collections::HashMap;

use glam::{DVec3, Vec3};
use thiserror::Error;

use crate::mesh::{Face, MeshData, MeshVertex, RawMesh};

/// After scaling, `max |coord| == 1 / DEFAULT_SCALE_MARGIN`.
pub const DEFAULT_SCALE_MARGIN: f32 = 1.5;

/// How normals are synthesized when the source carries none.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NormalPolicy {
    /// Every face corner gets its own vertex carrying the face normal.
    Flat,
    /// Vertices are shared; each gets the average of adjacent face normals.
    #[default]
    Smooth,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NormalizeConfig {
    /// Extra room around the mesh; 1.0 touches the unit cube.
    pub scale_margin: f32,
    pub normal_policy: NormalPolicy,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            scale_margin: DEFAULT_SCALE_MARGIN,
            normal_policy: NormalPolicy::Smooth,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum MeshError {
    #[error("face {face} has {count} vertices, at least 3 are required")]
    TooFewVertices { face: usize, count: usize },
    #[error("face {face} references vertex {index}, but the mesh has {count} vertices")]
    VertexIndexOutOfRange { face: usize, index: u32, count: usize },
    #[error("face {face} references normal {index}, but the mesh has {count} normals")]
    NormalIndexOutOfRange { face: usize, index: u32, count: usize },
    #[error("face {face} has {vertices} vertex references but {normals} normal references")]
    NormalRefMismatch {
        face: usize,
        vertices: usize,
        normals: usize,
    },
    #[error("scale margin must be a positive finite number, got {0}")]
    InvalidScaleMargin(f32),
    #[error("mesh needs more than {} vertices", u32::MAX)]
    TooManyVertices,
}

/// Check every face against the vertex and normal lists.
pub fn validate(raw: &RawMesh) -> Result<(), MeshError> {
    let vertex_count = raw.positions.len();
    let normal_count = raw.normals.len();

    for (face_idx, face) in raw.faces.iter().enumerate() {
        if face.vertices.len() < 3 {
            return Err(MeshError::TooFewVertices {
                face: face_idx,
                count: face.vertices.len(),
            });
        }
        if let Some(&index) = face.vertices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(MeshError::VertexIndexOutOfRange {
                face: face_idx,
                index,
                count: vertex_count,
            });
        }
        if let Some(normals) = &face.normals {
            if normals.len() != face.vertices.len() {
                return Err(MeshError::NormalRefMismatch {
                    face: face_idx,
                    vertices: face.vertices.len(),
                    normals: normals.len(),
                });
            }
            if let Some(&index) = normals.iter().find(|&&i| i as usize >= normal_count) {
                return Err(MeshError::NormalIndexOutOfRange {
                    face: face_idx,
                    index,
                    count: normal_count,
                });
            }
        }
    }
    Ok(())
}

/// Component-wise mean; the origin for an empty set.
pub fn centroid(positions: &[Vec3]) -> Vec3 {
    if positions.is_empty() {
        return Vec3::ZERO;
    }
    let sum = positions
        .iter()
        .fold(DVec3::ZERO, |acc, p| acc + p.as_dvec3());
    (sum / positions.len() as f64).as_vec3()
}

/// Move the centroid to the origin. Returns the removed offset.
pub fn center(positions: &mut [Vec3]) -> Vec3 {
    let c = centroid(positions);
    for p in positions.iter_mut() {
        *p -= c;
    }
    c
}

/// Divide all coordinates by `max |coord| * margin`. Returns the divisor.
///
/// A mesh without extent (empty, or every vertex at the origin) is left
/// untouched and `1.0` is returned.
pub fn scale_to_unit(positions: &mut [Vec3], margin: f32) -> f32 {
    let global_max = positions
        .iter()
        .map(|p| p.abs().max_element())
        .fold(0.0_f32, f32::max);

    if !(global_max > 0.0 && global_max.is_finite()) {
        if !positions.is_empty() {
            log::warn!("mesh has no spatial extent (max |coord| = {global_max}); scaling skipped");
        }
        return 1.0;
    }

    let factor = global_max * margin;
    for p in positions.iter_mut() {
        *p /= factor;
    }
    factor
}

/// Unit normal of the triangle `a, b, c` (counter-clockwise front), or `None`
/// if the edges are collinear.
#[inline]
pub fn face_normal(a: Vec3, b: Vec3, c: Vec3) -> Option<Vec3> {
    (b - a).cross(c - a).try_normalize()
}

/// Normal of a polygon from its first three corners.
fn polygon_normal(positions: &[Vec3], face: &Face) -> Option<Vec3> {
    match face.vertices.as_slice() {
        [a, b, c, ..] => face_normal(
            *positions.get(*a as usize)?,
            *positions.get(*b as usize)?,
            *positions.get(*c as usize)?,
        ),
        _ => None,
    }
}

/// Result of [`smooth_normals`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SmoothNormals {
    /// One entry per position. Zero for vertices that no non-degenerate face
    /// touches.
    pub normals: Vec<Vec3>,
    pub degenerate_faces: Vec<usize>,
}

/// Per-vertex normals from accumulated unit face normals.
pub fn smooth_normals(positions: &[Vec3], faces: &[Face]) -> SmoothNormals {
    let mut sums = vec![Vec3::ZERO; positions.len()];
    let mut degenerate_faces = Vec::new();

    for (face_idx, face) in faces.iter().enumerate() {
        let Some(n) = polygon_normal(positions, face) else {
            degenerate_faces.push(face_idx);
            continue;
        };
        for &v in &face.vertices {
            if let Some(sum) = sums.get_mut(v as usize) {
                *sum += n;
            }
        }
    }

    let normals = sums
        .into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::ZERO))
        .collect();

    SmoothNormals {
        normals,
        degenerate_faces,
    }
}

/// Where the per-vertex normals come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum NormalSource {
    /// Every face corner names a source normal.
    PerCorner,
    /// One source normal per position, matched by index.
    PerVertex,
    Synthesized(NormalPolicy),
}

fn normal_source(raw: &RawMesh, policy: NormalPolicy) -> NormalSource {
    if raw.normals.is_empty() {
        return NormalSource::Synthesized(policy);
    }
    if !raw.faces.is_empty() && raw.faces.iter().all(|f| f.normals.is_some()) {
        return NormalSource::PerCorner;
    }
    if raw.normals.len() == raw.positions.len() {
        return NormalSource::PerVertex;
    }
    log::warn!(
        "{} source normals cannot be matched to {} vertices; synthesizing instead",
        raw.normals.len(),
        raw.positions.len()
    );
    NormalSource::Synthesized(policy)
}

fn next_index(len: usize) -> Result<u32, MeshError> {
    u32::try_from(len).map_err(|_| MeshError::TooManyVertices)
}

/// Triangulate a polygon as a fan around its first corner.
fn push_fan(indices: &mut Vec<u32>, corners: &[u32]) {
    for tri in 1..corners.len().saturating_sub(1) {
        indices.push(corners[0]);
        indices.push(corners[tri]);
        indices.push(corners[tri + 1]);
    }
}

fn unit_or_zero(n: [f32; 3]) -> [f32; 3] {
    Vec3::from_array(n)
        .try_normalize()
        .unwrap_or(Vec3::ZERO)
        .to_array()
}

/// Turn a raw mesh into renderer-ready buffers.
///
/// Fails on faces with fewer than three corners or out-of-range indices.
/// Degenerate geometry never fails: zero-extent meshes skip scaling and
/// degenerate faces are listed in [`MeshData::degenerate_faces`].
///
/// Centering and scaling act on the unique source positions, before corners
/// are expanded into vertices. Flat or per-corner output repeats shared
/// positions, so the plain mean of its vertex buffer is generally not zero;
/// the centroid of its distinct positions is.
pub fn normalize(raw: &RawMesh, config: &NormalizeConfig) -> Result<MeshData, MeshError> {
    if !(config.scale_margin.is_finite() && config.scale_margin > 0.0) {
        return Err(MeshError::InvalidScaleMargin(config.scale_margin));
    }
    validate(raw)?;

    let mut positions: Vec<Vec3> = raw.positions.iter().map(|&p| Vec3::from_array(p)).collect();
    let offset = center(&mut positions);
    let factor = scale_to_unit(&mut positions, config.scale_margin);
    log::debug!("mesh centered (offset {offset:?}) and scaled by 1/{factor}");

    let source = normal_source(raw, config.normal_policy);
    let mut vertices: Vec<MeshVertex> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();
    let mut degenerate_faces = Vec::new();

    match source {
        NormalSource::PerCorner => {
            let mut unique: HashMap<(u32, u32), u32> = HashMap::new();
            for face in &raw.faces {
                let refs = face.normals.as_deref().unwrap_or_default();
                let mut corners = Vec::with_capacity(face.vertices.len());
                for (&vi, &ni) in face.vertices.iter().zip(refs) {
                    let index = match unique.get(&(vi, ni)) {
                        Some(&idx) => idx,
                        None => {
                            let idx = next_index(vertices.len())?;
                            vertices.push(MeshVertex::new(
                                positions[vi as usize].to_array(),
                                unit_or_zero(raw.normals[ni as usize]),
                            ));
                            unique.insert((vi, ni), idx);
                            idx
                        }
                    };
                    corners.push(index);
                }
                push_fan(&mut indices, &corners);
            }
        }
        NormalSource::PerVertex => {
            next_index(positions.len())?;
            vertices = positions
                .iter()
                .zip(&raw.normals)
                .map(|(p, &n)| MeshVertex::new(p.to_array(), unit_or_zero(n)))
                .collect();
            for face in &raw.faces {
                push_fan(&mut indices, &face.vertices);
            }
        }
        NormalSource::Synthesized(NormalPolicy::Smooth) => {
            next_index(positions.len())?;
            let smooth = smooth_normals(&positions, &raw.faces);
            vertices = positions
                .iter()
                .zip(&smooth.normals)
                .map(|(p, n)| MeshVertex::new(p.to_array(), n.to_array()))
                .collect();
            for face in &raw.faces {
                push_fan(&mut indices, &face.vertices);
            }
            degenerate_faces = smooth.degenerate_faces;
        }
        NormalSource::Synthesized(NormalPolicy::Flat) => {
            for (face_idx, face) in raw.faces.iter().enumerate() {
                let normal = polygon_normal(&positions, face).unwrap_or_else(|| {
                    degenerate_faces.push(face_idx);
                    Vec3::ZERO
                });
                let mut corners = Vec::with_capacity(face.vertices.len());
                for &vi in &face.vertices {
                    corners.push(next_index(vertices.len())?);
                    vertices.push(MeshVertex::new(
                        positions[vi as usize].to_array(),
                        normal.to_array(),
                    ));
                }
                push_fan(&mut indices, &corners);
            }
        }
    }

    if !degenerate_faces.is_empty() {
        log::warn!(
            "{} degenerate face(s) contribute no normal",
            degenerate_faces.len()
        );
    }

    Ok(MeshData {
        vertices,
        indices,
        degenerate_faces,
    })
}
