//! Wire data model shared with the packing engine.
//!
//! These records mirror the engine's input and output format. Vertices and
//! faces are flat arrays; faces refer to vertices by index.

use std::hash::{Hash, Hasher};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A UV vertex as consumed by the packer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UvVert {
    /// UV coordinates.
    pub uv: [f32; 2],

    /// Opaque key, ignored by the packer. Used to keep apart vertices that
    /// share UV coordinates but belong to different 3D points.
    pub control_id: u64,

    /// Position of the corresponding 3D vertex. Only read by the packer when
    /// island normalization is enabled.
    pub vert_3d: [f32; 3],
}

impl UvVert {
    /// Creates a new vertex.
    pub fn new(uv: [f32; 2], control_id: u64, vert_3d: [f32; 3]) -> Self {
        Self {
            uv,
            control_id,
            vert_3d,
        }
    }

    /// Returns the exact-equality key of this vertex.
    pub fn key(&self) -> VertKey {
        VertKey {
            uv: self.uv.map(f32::to_bits),
            control_id: self.control_id,
            vert_3d: self.vert_3d.map(f32::to_bits),
        }
    }
}

/// Hash key identifying a packer-vertex.
///
/// Floats are compared by bit pattern, so two keys are equal only when every
/// coordinate is exactly the same. `0.0` and `-0.0` are distinct keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertKey {
    uv: [u32; 2],
    control_id: u64,
    vert_3d: [u32; 3],
}

impl Hash for VertKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uv.hash(state);
        self.vert_3d.hash(state);
        self.control_id.hash(state);
    }
}

/// A UV face: an ordered loop of vertex indices.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UvFace {
    /// Face id, equal to the face's position in the face array.
    pub id: usize,

    /// Indices into the vertex array, in winding order.
    pub verts: Vec<usize>,

    /// Selection input flag. Only honoured by the packer when unselected
    /// faces are processed.
    pub selected: bool,
}

impl UvFace {
    /// Creates an empty face with the given id.
    pub fn new(id: usize) -> Self {
        Self {
            id,
            verts: Vec::new(),
            selected: false,
        }
    }

    /// Sets the selection flag.
    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Sets the vertex indices.
    pub fn with_verts(mut self, verts: Vec<usize>) -> Self {
        self.verts = verts;
        self
    }
}

/// The UV map handed to the packer.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UvData {
    /// Deduplicated vertices.
    pub verts: Vec<UvVert>,
    /// Faces referring to `verts`.
    pub faces: Vec<UvFace>,
}

impl UvData {
    /// Creates UV data from vertex and face arrays.
    pub fn new(verts: Vec<UvVert>, faces: Vec<UvFace>) -> Self {
        Self { verts, faces }
    }

    /// Returns true when there is nothing to pack.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Total number of face corners.
    pub fn corner_count(&self) -> usize {
        self.faces.iter().map(|f| f.verts.len()).sum()
    }

    /// Checks that every face index and vertex reference is in range.
    ///
    /// Walks the entire data set.
    pub fn check_indices(&self) -> Option<String> {
        for (index, face) in self.faces.iter().enumerate() {
            if face.id != index {
                return Some(format!("face at {} has id {}", index, face.id));
            }
            if face.verts.len() < 3 {
                return Some(format!("face {} has {} vertices", index, face.verts.len()));
            }
            if let Some(&v) = face.verts.iter().find(|&&v| v >= self.verts.len()) {
                return Some(format!(
                    "face {} references vertex {} (vertex count {})",
                    index,
                    v,
                    self.verts.len()
                ));
            }
        }
        None
    }
}

/// Transform parameters for one packed island.
///
/// Together they describe a similarity transform; see
/// [`UvTransform::from_solution`](crate::transform::UvTransform::from_solution)
/// for the composition order.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IslandPackSolution {
    /// Index into the islands message.
    pub island_idx: usize,

    /// Rotation angle in radians.
    pub angle: f32,

    /// Scale applied before rotation.
    pub pre_scale: f32,

    /// Inverse scale applied after the offset.
    pub scale: f32,

    /// Rotation pivot.
    pub pivot: [f32; 2],

    /// Translation applied after rotation.
    pub offset: [f32; 2],

    /// Translation applied last.
    pub post_scale_offset: [f32; 2],
}

impl IslandPackSolution {
    /// A solution that leaves the island where it is.
    pub fn identity(island_idx: usize) -> Self {
        Self {
            island_idx,
            angle: 0.0,
            pre_scale: 1.0,
            scale: 1.0,
            pivot: [0.0, 0.0],
            offset: [0.0, 0.0],
            post_scale_offset: [0.0, 0.0],
        }
    }

    /// Sets the rotation angle and pivot.
    pub fn with_rotation(mut self, angle: f32, pivot: [f32; 2]) -> Self {
        self.angle = angle;
        self.pivot = pivot;
        self
    }

    /// Sets the pre-rotation scale and the post-offset inverse scale.
    pub fn with_scales(mut self, pre_scale: f32, scale: f32) -> Self {
        self.pre_scale = pre_scale;
        self.scale = scale;
        self
    }

    /// Sets the offset and the post-scale offset.
    pub fn with_offsets(mut self, offset: [f32; 2], post_scale_offset: [f32; 2]) -> Self {
        self.offset = offset;
        self.post_scale_offset = post_scale_offset;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_key_is_exact() {
        let a = UvVert::new([0.25, 0.5], 7, [1.0, 2.0, 3.0]);
        let b = UvVert::new([0.25, 0.5], 7, [1.0, 2.0, 3.0]);
        let c = UvVert::new([0.25, 0.5 + f32::EPSILON], 7, [1.0, 2.0, 3.0]);
        let d = UvVert::new([0.25, 0.5], 8, [1.0, 2.0, 3.0]);

        assert_eq!(a.key(), b.key());
        assert_ne!(a.key(), c.key());
        assert_ne!(a.key(), d.key());
    }

    #[test]
    fn test_key_in_map() {
        let mut map = HashMap::new();
        map.insert(UvVert::new([0.0, 1.0], 1, [0.0; 3]).key(), 0usize);

        assert_eq!(map.get(&UvVert::new([0.0, 1.0], 1, [0.0; 3]).key()), Some(&0));
        assert_eq!(map.get(&UvVert::new([0.0, 1.0], 2, [0.0; 3]).key()), None);
    }

    #[test]
    fn test_check_indices() {
        let verts = vec![UvVert::default(); 3];
        let good = UvData::new(verts.clone(), vec![UvFace::new(0).with_verts(vec![0, 1, 2])]);
        assert!(good.check_indices().is_none());
        assert_eq!(good.corner_count(), 3);

        let bad = UvData::new(verts, vec![UvFace::new(0).with_verts(vec![0, 1, 5])]);
        assert!(bad.check_indices().unwrap().contains("vertex 5"));
    }
}
