//! Builds the packer's shared-vertex UV graph from host polygons.
//!
//! The host stores one UV per polygon corner; the packer wants a vertex
//! array shared between faces. Corners collapse into one packer-vertex only
//! when UV, 3D position and point handle are all exactly equal, so distinct
//! points with the same UV stay distinct.

use crate::host::{active_layers, MeshScene, PointId, PolygonId, PolygonMesh};
use std::collections::HashMap;
use std::sync::Arc;
use uvpack_core::{Result, UvData, UvFace, UvVert, VertKey};

/// One polygon corner as read from the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corner {
    /// Point handle of the corner.
    pub point: PointId,
    /// UV of the corner.
    pub uv: [f32; 2],
    /// Position of the point.
    pub position: [f32; 3],
}

impl Corner {
    /// Creates a corner.
    pub fn new(point: PointId, uv: [f32; 2], position: [f32; 3]) -> Self {
        Self {
            point,
            uv,
            position,
        }
    }

    fn to_vert(self) -> UvVert {
        UvVert::new(self.uv, self.point.0, self.position)
    }
}

/// Incrementally deduplicates corners into packer vertices and faces.
#[derive(Debug, Default)]
pub struct ExtractionBuilder {
    verts: Vec<UvVert>,
    faces: Vec<UvFace>,
    lookup: HashMap<VertKey, usize>,
    polygon_faces: HashMap<PolygonId, usize>,
    vertex_points: Vec<PointId>,
}

impl ExtractionBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the packer-vertex index of a corner, adding a vertex on first
    /// sight.
    pub fn vertex_index(&mut self, corner: Corner) -> usize {
        let vert = corner.to_vert();
        let next = self.verts.len();
        let index = *self.lookup.entry(vert.key()).or_insert(next);

        if index == next {
            self.verts.push(vert);
            self.vertex_points.push(corner.point);
        }
        index
    }

    /// Appends a face for a host polygon and returns its face index.
    ///
    /// `selected` becomes the face's selection flag.
    pub fn push_polygon(
        &mut self,
        polygon: PolygonId,
        selected: bool,
        corners: impl IntoIterator<Item = Corner>,
    ) -> usize {
        let face_index = self.faces.len();
        let verts = corners
            .into_iter()
            .map(|corner| self.vertex_index(corner))
            .collect();

        self.faces.push(
            UvFace::new(face_index)
                .with_verts(verts)
                .with_selected(selected),
        );

        if let Some(existing) = self.polygon_faces.insert(polygon, face_index) {
            log::warn!(
                "polygon {:?} seen twice (faces {} and {}), keeping the first",
                polygon,
                existing,
                face_index
            );
            self.polygon_faces.insert(polygon, existing);
        }

        face_index
    }

    /// Number of vertices so far.
    pub fn vertex_count(&self) -> usize {
        self.verts.len()
    }

    /// Number of faces so far.
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Finishes the build.
    pub fn finish(self) -> Extraction {
        Extraction {
            uv_data: Arc::new(UvData::new(self.verts, self.faces)),
            polygon_faces: self.polygon_faces,
            vertex_points: self.vertex_points,
        }
    }
}

/// Deduplicated UV data plus the tables needed to write results back.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    uv_data: Arc<UvData>,
    polygon_faces: HashMap<PolygonId, usize>,
    vertex_points: Vec<PointId>,
}

impl Extraction {
    /// The UV data for the packer.
    pub fn uv_data(&self) -> &Arc<UvData> {
        &self.uv_data
    }

    /// Face index of a host polygon.
    pub fn face_of(&self, polygon: PolygonId) -> Option<usize> {
        self.polygon_faces.get(&polygon).copied()
    }

    /// Host point of a packer-vertex.
    pub fn point_of(&self, vertex: usize) -> Option<PointId> {
        self.vertex_points.get(vertex).copied()
    }

    /// Packer-vertex indices of a face.
    pub fn face_verts(&self, face: usize) -> Option<&[usize]> {
        self.uv_data.faces.get(face).map(|f| f.verts.as_slice())
    }

    /// Number of packer vertices.
    pub fn vertex_count(&self) -> usize {
        self.uv_data.verts.len()
    }

    /// Number of faces.
    pub fn face_count(&self) -> usize {
        self.uv_data.faces.len()
    }

    /// Returns true if no polygon was extracted.
    pub fn is_empty(&self) -> bool {
        self.uv_data.is_empty()
    }
}

/// Reads one mesh into the builder. Returns false if the mesh has no UV map
/// called `uv_map`.
///
/// A face is flagged selected when its polygon is marked (see
/// [`PolygonMesh::is_marked`]).
pub fn extract_mesh<M: PolygonMesh + ?Sized>(
    builder: &mut ExtractionBuilder,
    mesh: &M,
    uv_map: &str,
) -> Result<bool> {
    let Some(map) = mesh.uv_map(uv_map) else {
        return Ok(false);
    };

    let mut corners = Vec::new();
    for index in 0..mesh.polygon_count() {
        let polygon = mesh.polygon_id(index)?;
        let selected = mesh.is_marked(polygon)?;

        corners.clear();
        for point in mesh.polygon_points(polygon)? {
            corners.push(Corner::new(
                point,
                mesh.polygon_uv(polygon, point, map)?,
                mesh.point_position(point)?,
            ));
        }
        builder.push_polygon(polygon, selected, corners.iter().copied());
    }

    Ok(true)
}

/// Extracts every polygon of every active layer carrying `uv_map`.
///
/// Layers without the UV map are skipped.
pub fn extract_uvs<S: MeshScene + ?Sized>(scene: &S, uv_map: &str) -> Result<Extraction> {
    let mut builder = ExtractionBuilder::new();

    for layer in active_layers(scene)? {
        if !extract_mesh(&mut builder, scene.mesh(layer)?, uv_map)? {
            log::warn!("layer {} has no UV map named {:?}, skipped", layer, uv_map);
        }
    }

    log::debug!(
        "extracted {} faces, {} unique vertices",
        builder.face_count(),
        builder.vertex_count()
    );
    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corner(point: u64, uv: [f32; 2], position: [f32; 3]) -> Corner {
        Corner::new(PointId(point), uv, position)
    }

    #[test]
    fn test_identical_corners_collapse() {
        let mut builder = ExtractionBuilder::new();
        let c = corner(3, [0.1, 0.2], [1.0, 0.0, 0.0]);

        let indices: Vec<_> = (0..5).map(|_| builder.vertex_index(c)).collect();

        assert_eq!(builder.vertex_count(), 1);
        assert_eq!(indices, vec![0; 5]);
    }

    #[test]
    fn test_same_uv_different_point_stays_apart() {
        let mut builder = ExtractionBuilder::new();
        let a = builder.vertex_index(corner(1, [0.5, 0.5], [0.0, 0.0, 0.0]));
        let b = builder.vertex_index(corner(2, [0.5, 0.5], [0.0, 0.0, 0.0]));
        let c = builder.vertex_index(corner(1, [0.5, 0.5], [0.0, 0.0, 1.0]));

        assert_eq!(builder.vertex_count(), 3);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_two_triangles_sharing_an_edge() {
        let mut builder = ExtractionBuilder::new();
        let p = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ];
        // Point 3 reuses the UV of point 1.
        builder.push_polygon(
            PolygonId(10),
            true,
            [
                corner(0, [0.0, 0.0], p[0]),
                corner(1, [1.0, 0.0], p[1]),
                corner(2, [1.0, 1.0], p[2]),
            ],
        );
        builder.push_polygon(
            PolygonId(11),
            true,
            [
                corner(0, [0.0, 0.0], p[0]),
                corner(2, [1.0, 1.0], p[2]),
                corner(3, [1.0, 0.0], p[3]),
            ],
        );

        let extraction = builder.finish();
        assert_eq!(extraction.vertex_count(), 4);
        assert_eq!(extraction.face_count(), 2);
        assert_eq!(extraction.face_verts(1), Some(&[0, 2, 3][..]));
        assert_eq!(extraction.face_of(PolygonId(11)), Some(1));
        assert_eq!(extraction.point_of(3), Some(PointId(3)));
    }

    #[test]
    fn test_duplicate_polygon_keeps_first_face() {
        let mut builder = ExtractionBuilder::new();
        let tri = [
            corner(0, [0.0, 0.0], [0.0; 3]),
            corner(1, [1.0, 0.0], [0.0; 3]),
            corner(2, [0.0, 1.0], [0.0; 3]),
        ];
        builder.push_polygon(PolygonId(1), false, tri);
        builder.push_polygon(PolygonId(1), false, tri);

        let extraction = builder.finish();
        assert_eq!(extraction.face_count(), 2);
        assert_eq!(extraction.face_of(PolygonId(1)), Some(0));
    }
}
