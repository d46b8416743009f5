use std::time::Instant;

use rayon::iter::ParallelIterator;
use rayon::slice::ParallelSliceMut;
use serde::{Deserialize, Serialize};

use crate::utils;

use super::{BoundingBox, Vec3};

/// A triangulated surface mesh, the universal unit the kernel operates on.
///
/// Positions and normals are packed `3*V` coordinate buffers; indices are a
/// packed `3*F` buffer of vertex ids. Normals are always present on a mesh
/// once it has passed through construction or any repair operator, even
/// though the wire format treats them as optional input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mesh {
    pub id: String,
    pub name: String,
    positions: Vec<f32>,
    indices: Vec<u32>,
    normals: Vec<f32>,
}

impl Mesh {
    /// Build a mesh from raw buffers, computing normals if none are supplied.
    ///
    /// Does not validate; callers that accept untrusted input should call
    /// [`Mesh::validate`] first.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        positions: Vec<f32>,
        indices: Vec<u32>,
        normals: Option<Vec<f32>>,
    ) -> Mesh {
        let normals = match normals {
            Some(n) if n.len() == positions.len() => n,
            _ => super::compute_normals(&positions, &indices),
        };

        Mesh { id: id.into(), name: name.into(), positions, indices, normals }
    }

    /// An empty mesh with no vertices or faces.
    pub fn empty(id: impl Into<String>) -> Mesh {
        Mesh { id: id.into(), name: String::new(), positions: Vec::new(), indices: Vec::new(), normals: Vec::new() }
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn normals(&self) -> &[f32] {
        &self.normals
    }

    /// Number of vertices, `positions.len() / 3`.
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Number of triangles, `indices.len() / 3`.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Coordinates of vertex `i`.
    pub fn vertex(&self, i: usize) -> Vec3 {
        Vec3::new(self.positions[3 * i], self.positions[3 * i + 1], self.positions[3 * i + 2])
    }

    /// Normal at vertex `i`.
    pub fn normal(&self, i: usize) -> Vec3 {
        Vec3::new(self.normals[3 * i], self.normals[3 * i + 1], self.normals[3 * i + 2])
    }

    /// Vertex indices of face `f`.
    pub fn face(&self, f: usize) -> [u32; 3] {
        [self.indices[3 * f], self.indices[3 * f + 1], self.indices[3 * f + 2]]
    }

    /// Bounding box of the mesh in its own coordinate space.
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_positions(&self.positions)
    }

    /// Recompute and store vertex normals using area-weighted face normal
    /// accumulation, as specified for [`super::compute_normals`].
    pub fn recompute_normals(&mut self) {
        let before = Instant::now();
        self.normals = super::compute_normals(&self.positions, &self.indices);
        log::debug!(
            "recomputed normals for {} vertices in {:.2?}",
            utils::math_helper::format_integer(self.vertex_count()),
            before.elapsed()
        );
    }

    /// Validate the structural invariants of the mesh.
    ///
    /// Returns every violation found rather than stopping at the first one,
    /// so callers can report an exhaustive list (per the request-surface
    /// validation contract).
    pub fn validate(&self) -> Result<(), Vec<MeshError>> {
        let mut errors = Vec::new();

        if self.positions.len() % 3 != 0 {
            errors.push(MeshError::LengthNotDivisibleByThree { array: "positions" });
        }
        if self.indices.len() % 3 != 0 {
            errors.push(MeshError::LengthNotDivisibleByThree { array: "indices" });
        }

        let vertex_count = self.positions.len() / 3;
        for (i, &index) in self.indices.iter().enumerate() {
            if index as usize >= vertex_count {
                errors.push(MeshError::IndexOutOfBounds { position: i, index, vertex_count });
                break;
            }
        }

        if !self.normals.is_empty() && self.normals.len() != self.positions.len() {
            errors.push(MeshError::NormalsLengthMismatch {
                normals_len: self.normals.len(),
                positions_len: self.positions.len(),
            });
        }

        for v in &self.positions {
            if !v.is_finite() {
                errors.push(MeshError::NonFiniteCoordinate);
                break;
            }
        }

        let bbox = self.bounding_box();
        if bbox.min.x > bbox.max.x || bbox.min.y > bbox.max.y || bbox.min.z > bbox.max.z {
            errors.push(MeshError::InvertedBoundingBox);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Apply a rigid rotation (in-place) to every vertex, about the origin.
    pub(crate) fn rotate_vertices_par(&mut self, rotate: impl Fn(Vec3) -> Vec3 + Sync) {
        self.positions.par_chunks_mut(3).for_each(|chunk| {
            let v = Vec3::new(chunk[0], chunk[1], chunk[2]);
            let rotated = rotate(v);
            chunk[0] = rotated.x;
            chunk[1] = rotated.y;
            chunk[2] = rotated.z;
        });
    }
}

/// Violation of a [`Mesh`] structural invariant.
#[derive(Debug, Clone, PartialEq)]
pub enum MeshError {
    LengthNotDivisibleByThree { array: &'static str },
    IndexOutOfBounds { position: usize, index: u32, vertex_count: usize },
    NormalsLengthMismatch { normals_len: usize, positions_len: usize },
    NonFiniteCoordinate,
    InvertedBoundingBox,
}

impl std::fmt::Display for MeshError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeshError::LengthNotDivisibleByThree { array } => {
                write!(f, "{array} length is not divisible by 3")
            }
            MeshError::IndexOutOfBounds { position, index, vertex_count } => write!(
                f,
                "index {index} at position {position} exceeds vertex count {vertex_count}"
            ),
            MeshError::NormalsLengthMismatch { normals_len, positions_len } => write!(
                f,
                "normals length {normals_len} does not match positions length {positions_len}"
            ),
            MeshError::NonFiniteCoordinate => write!(f, "mesh contains a non-finite coordinate"),
            MeshError::InvertedBoundingBox => {
                write!(f, "bounding box has min greater than max on at least one axis")
            }
        }
    }
}

impl std::error::Error for MeshError {}
