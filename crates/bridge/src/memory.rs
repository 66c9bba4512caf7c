//! An in-memory host scene.
//!
//! Implements the host traits over plain vectors. Useful for headless
//! pipelines, tests and benchmarks.

use crate::host::{
    EditableMesh, HostError, HostResult, LayerFlags, MapId, MeshScene, PointId, PolygonId,
    PolygonMesh,
};

/// Host error code for an unknown handle.
pub const ERR_NOT_FOUND: i32 = -2;

/// Host error code for an out-of-range layer index.
pub const ERR_BAD_LAYER: i32 = -3;

/// Host error code for a point that is not a corner of the polygon.
pub const ERR_NOT_A_CORNER: i32 = -4;

const UV_MAP: MapId = MapId(1);

#[derive(Debug, Clone)]
struct MemoryPolygon {
    points: Vec<usize>,
    uvs: Vec<[f32; 2]>,
    selected: bool,
}

/// A polygon mesh with a single UV map.
#[derive(Debug, Clone, Default)]
pub struct MemoryMesh {
    points: Vec<[f32; 3]>,
    polygons: Vec<MemoryPolygon>,
    uv_map_name: Option<String>,
    handle_base: u64,
    selected: usize,
}

impl MemoryMesh {
    /// Creates an empty mesh whose UV map is called `uv_map`.
    pub fn new(uv_map: impl Into<String>) -> Self {
        Self {
            uv_map_name: Some(uv_map.into()),
            ..Default::default()
        }
    }

    /// Creates an empty mesh without any UV map.
    pub fn without_uv_map() -> Self {
        Self::default()
    }

    /// Builds a `cols` x `rows` grid of quads covering the unit square.
    ///
    /// Each quad is mapped into its own cell shrunk by `gap`. Neighbouring
    /// quads share points; with a positive `gap` their corners get distinct
    /// UVs, so every quad is its own UV island. With `gap == 0.0` shared
    /// corners have equal UVs and the whole grid is one island.
    pub fn grid(uv_map: impl Into<String>, cols: usize, rows: usize, gap: f32) -> Self {
        let mut mesh = Self::new(uv_map);
        let cell_w = 1.0 / cols as f32;
        let cell_h = 1.0 / rows as f32;

        for y in 0..=rows {
            for x in 0..=cols {
                mesh.add_point([x as f32 * cell_w, y as f32 * cell_h, 0.0]);
            }
        }

        for y in 0..rows {
            for x in 0..cols {
                let p0 = y * (cols + 1) + x;
                let points = [p0, p0 + 1, p0 + cols + 2, p0 + cols + 1];
                let (u0, v0) = (x as f32 * cell_w + gap, y as f32 * cell_h + gap);
                let (u1, v1) = (
                    (x + 1) as f32 * cell_w - gap,
                    (y + 1) as f32 * cell_h - gap,
                );
                mesh.add_polygon(&points, &[[u0, v0], [u1, v0], [u1, v1], [u0, v1]], true);
            }
        }

        mesh
    }

    /// Adds a point and returns its index.
    pub fn add_point(&mut self, position: [f32; 3]) -> usize {
        self.points.push(position);
        self.points.len() - 1
    }

    /// Adds a polygon and returns its index.
    ///
    /// # Panics
    ///
    /// Panics if `points` and `uvs` differ in length or a point index is out
    /// of range.
    pub fn add_polygon(&mut self, points: &[usize], uvs: &[[f32; 2]], selected: bool) -> usize {
        assert_eq!(points.len(), uvs.len(), "one UV per corner");
        assert!(
            points.iter().all(|&p| p < self.points.len()),
            "point index out of range"
        );

        self.selected += usize::from(selected);
        self.polygons.push(MemoryPolygon {
            points: points.to_vec(),
            uvs: uvs.to_vec(),
            selected,
        });
        self.polygons.len() - 1
    }

    /// Sets the selection state of a polygon by index.
    pub fn set_selected(&mut self, polygon: usize, selected: bool) {
        if let Some(p) = self.polygons.get_mut(polygon) {
            if p.selected != selected {
                p.selected = selected;
                if selected {
                    self.selected += 1;
                } else {
                    self.selected -= 1;
                }
            }
        }
    }

    /// UV of a corner, by polygon index and corner position.
    pub fn corner_uv(&self, polygon: usize, corner: usize) -> Option<[f32; 2]> {
        self.polygons.get(polygon)?.uvs.get(corner).copied()
    }

    /// Number of selected polygons.
    pub fn selected_count(&self) -> usize {
        self.selected
    }

    /// Handle of the polygon at `index`.
    pub fn polygon_handle(&self, index: usize) -> PolygonId {
        PolygonId(self.handle_base + index as u64)
    }

    /// Handle of the point at `index`.
    pub fn point_handle(&self, index: usize) -> PointId {
        PointId(self.handle_base + index as u64)
    }

    fn polygon_index(&self, polygon: PolygonId) -> HostResult<usize> {
        polygon
            .0
            .checked_sub(self.handle_base)
            .map(|i| i as usize)
            .filter(|&i| i < self.polygons.len())
            .ok_or_else(|| HostError::new(ERR_NOT_FOUND, format!("polygon {:?}", polygon)))
    }

    fn point_index(&self, point: PointId) -> HostResult<usize> {
        point
            .0
            .checked_sub(self.handle_base)
            .map(|i| i as usize)
            .filter(|&i| i < self.points.len())
            .ok_or_else(|| HostError::new(ERR_NOT_FOUND, format!("point {:?}", point)))
    }

    fn corner(&self, polygon: PolygonId, point: PointId, map: MapId) -> HostResult<(usize, usize)> {
        if map != UV_MAP || self.uv_map_name.is_none() {
            return Err(HostError::new(ERR_NOT_FOUND, format!("map {:?}", map)));
        }
        let poly = self.polygon_index(polygon)?;
        let point_index = self.point_index(point)?;
        let corner = self.polygons[poly]
            .points
            .iter()
            .position(|&p| p == point_index)
            .ok_or_else(|| {
                HostError::new(
                    ERR_NOT_A_CORNER,
                    format!("point {:?} on polygon {:?}", point, polygon),
                )
            })?;
        Ok((poly, corner))
    }
}

impl PolygonMesh for MemoryMesh {
    fn uv_map(&self, name: &str) -> Option<MapId> {
        (self.uv_map_name.as_deref() == Some(name)).then_some(UV_MAP)
    }

    fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    fn polygon_id(&self, index: usize) -> HostResult<PolygonId> {
        if index < self.polygons.len() {
            Ok(self.polygon_handle(index))
        } else {
            Err(HostError::new(ERR_NOT_FOUND, format!("polygon index {}", index)))
        }
    }

    fn is_selected(&self, polygon: PolygonId) -> HostResult<bool> {
        Ok(self.polygons[self.polygon_index(polygon)?].selected)
    }

    fn has_selection(&self) -> HostResult<bool> {
        Ok(self.selected > 0)
    }

    fn polygon_points(&self, polygon: PolygonId) -> HostResult<Vec<PointId>> {
        let poly = &self.polygons[self.polygon_index(polygon)?];
        Ok(poly.points.iter().map(|&p| self.point_handle(p)).collect())
    }

    fn polygon_uv(&self, polygon: PolygonId, point: PointId, map: MapId) -> HostResult<[f32; 2]> {
        let (poly, corner) = self.corner(polygon, point, map)?;
        Ok(self.polygons[poly].uvs[corner])
    }

    fn point_position(&self, point: PointId) -> HostResult<[f32; 3]> {
        Ok(self.points[self.point_index(point)?])
    }
}

impl EditableMesh for MemoryMesh {
    fn set_polygon_uv(
        &mut self,
        polygon: PolygonId,
        point: PointId,
        map: MapId,
        uv: [f32; 2],
    ) -> HostResult<()> {
        let (poly, corner) = self.corner(polygon, point, map)?;
        self.polygons[poly].uvs[corner] = uv;
        Ok(())
    }
}

/// One layer of a [`MemoryScene`].
#[derive(Debug, Clone)]
pub struct MemoryLayer {
    mesh: MemoryMesh,
    flags: LayerFlags,
    uv_edit_marks: usize,
}

impl MemoryLayer {
    /// The layer's mesh.
    pub fn mesh(&self) -> &MemoryMesh {
        &self.mesh
    }

    /// The layer's scan flags.
    pub fn flags(&self) -> LayerFlags {
        self.flags
    }

    /// How many times the layer was marked as UV-edited.
    pub fn uv_edit_marks(&self) -> usize {
        self.uv_edit_marks
    }
}

/// A scene of in-memory mesh layers.
#[derive(Debug, Clone, Default)]
pub struct MemoryScene {
    layers: Vec<MemoryLayer>,
    polygon_mode: bool,
    applied: usize,
}

impl MemoryScene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a layer and returns its index. Handles of the mesh are rebased
    /// so they stay unique across layers.
    pub fn add_layer(&mut self, mut mesh: MemoryMesh, flags: LayerFlags) -> usize {
        let index = self.layers.len();
        mesh.handle_base = (index as u64) << 32;
        self.layers.push(MemoryLayer {
            mesh,
            flags,
            uv_edit_marks: 0,
        });
        index
    }

    /// Adds a layer, builder style.
    pub fn with_layer(mut self, mesh: MemoryMesh, flags: LayerFlags) -> Self {
        self.add_layer(mesh, flags);
        self
    }

    /// Switches polygon selection mode on or off.
    pub fn set_polygon_mode(&mut self, enabled: bool) {
        self.polygon_mode = enabled;
    }

    /// A layer by index.
    pub fn layer(&self, index: usize) -> Option<&MemoryLayer> {
        self.layers.get(index)
    }

    /// Number of times edits were applied.
    pub fn applied_count(&self) -> usize {
        self.applied
    }

    fn layer_checked(&self, index: usize) -> HostResult<&MemoryLayer> {
        self.layers
            .get(index)
            .ok_or_else(|| HostError::new(ERR_BAD_LAYER, format!("layer {}", index)))
    }

    fn layer_checked_mut(&mut self, index: usize) -> HostResult<&mut MemoryLayer> {
        self.layers
            .get_mut(index)
            .ok_or_else(|| HostError::new(ERR_BAD_LAYER, format!("layer {}", index)))
    }
}

impl MeshScene for MemoryScene {
    type Mesh = MemoryMesh;

    fn layer_count(&self) -> HostResult<usize> {
        Ok(self.layers.len())
    }

    fn layer_flags(&self, layer: usize) -> HostResult<LayerFlags> {
        Ok(self.layer_checked(layer)?.flags)
    }

    fn selected_polygon_count(&self) -> usize {
        if !self.polygon_mode {
            return 0;
        }
        self.layers
            .iter()
            .filter(|l| l.flags.active)
            .map(|l| l.mesh.selected_count())
            .sum()
    }

    fn mesh(&self, layer: usize) -> HostResult<&MemoryMesh> {
        Ok(&self.layer_checked(layer)?.mesh)
    }

    fn mesh_mut(&mut self, layer: usize) -> HostResult<&mut MemoryMesh> {
        let layer = self.layer_checked_mut(layer)?;
        if !layer.flags.editable {
            return Err(HostError::new(ERR_BAD_LAYER, "layer is not editable"));
        }
        Ok(&mut layer.mesh)
    }

    fn mark_uv_edited(&mut self, layer: usize) -> HostResult<()> {
        self.layer_checked_mut(layer)?.uv_edit_marks += 1;
        Ok(())
    }

    fn apply_edits(&mut self) -> HostResult<()> {
        self.applied += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_shape() {
        let mesh = MemoryMesh::grid("Texture", 3, 2, 0.01);
        assert_eq!(mesh.polygon_count(), 6);
        assert_eq!(mesh.points.len(), 12);
        assert_eq!(mesh.selected_count(), 6);
    }

    #[test]
    fn test_handles_unique_across_layers() {
        let scene = MemoryScene::new()
            .with_layer(MemoryMesh::grid("Texture", 1, 1, 0.0), LayerFlags::ACTIVE_EDIT)
            .with_layer(MemoryMesh::grid("Texture", 1, 1, 0.0), LayerFlags::ACTIVE_EDIT);

        let a = scene.mesh(0).unwrap().polygon_id(0).unwrap();
        let b = scene.mesh(1).unwrap().polygon_id(0).unwrap();
        assert_ne!(a, b);
        assert!(scene.mesh(0).unwrap().is_selected(b).is_err());
    }

    #[test]
    fn test_corner_uv_roundtrip() {
        let mut mesh = MemoryMesh::grid("Texture", 1, 1, 0.0);
        let map = mesh.uv_map("Texture").unwrap();
        let polygon = mesh.polygon_id(0).unwrap();
        let point = mesh.polygon_points(polygon).unwrap()[2];

        mesh.set_polygon_uv(polygon, point, map, [0.3, 0.7]).unwrap();
        assert_eq!(mesh.polygon_uv(polygon, point, map).unwrap(), [0.3, 0.7]);
        assert_eq!(mesh.corner_uv(0, 2), Some([0.3, 0.7]));
    }

    #[test]
    fn test_missing_map() {
        let mesh = MemoryMesh::without_uv_map();
        assert!(mesh.uv_map("Texture").is_none());
        assert!(MemoryMesh::new("Other").uv_map("Texture").is_none());
    }

    #[test]
    fn test_empty_selection_marks_every_polygon() {
        let mut mesh = MemoryMesh::grid("Texture", 2, 1, 0.1);
        let first = mesh.polygon_id(0).unwrap();
        let second = mesh.polygon_id(1).unwrap();

        mesh.set_selected(1, false);
        assert!(mesh.is_marked(first).unwrap());
        assert!(!mesh.is_marked(second).unwrap());

        mesh.set_selected(0, false);
        mesh.set_selected(0, false);
        assert_eq!(mesh.selected_count(), 0);
        assert!(!mesh.has_selection().unwrap());
        assert!(mesh.is_marked(first).unwrap());
        assert!(mesh.is_marked(second).unwrap());
    }

    #[test]
    fn test_selection_count_needs_polygon_mode() {
        let mut scene =
            MemoryScene::new().with_layer(MemoryMesh::grid("Texture", 2, 2, 0.0), LayerFlags::ACTIVE_EDIT);
        assert_eq!(scene.selected_polygon_count(), 0);
        scene.set_polygon_mode(true);
        assert_eq!(scene.selected_polygon_count(), 4);
    }
}
