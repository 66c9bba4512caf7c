//! Host mesh editor interface.
//!
//! The bridge only needs a narrow, handle-based view of the host: layers,
//! polygons with their point loops, one named UV channel per mesh, and the
//! selection state. Handles are opaque to the bridge and must be unique
//! across the whole scene.

pub use uvpack_core::HostError;

/// Result of a host call.
pub type HostResult<T> = std::result::Result<T, HostError>;

/// Handle of a host polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PolygonId(pub u64);

/// Handle of a host point (3D vertex).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointId(pub u64);

/// Handle of a mesh map (vertex map) on one mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MapId(pub u64);

/// Scan flags of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayerFlags {
    /// The layer is active: its mesh is read for packing.
    pub active: bool,
    /// The layer is editable: packed UVs are written to it.
    pub editable: bool,
}

impl LayerFlags {
    /// Flags for a layer that is both read and written.
    pub const ACTIVE_EDIT: LayerFlags = LayerFlags {
        active: true,
        editable: true,
    };
}

/// Read access to one mesh.
pub trait PolygonMesh {
    /// Looks up a UV map by name.
    fn uv_map(&self, name: &str) -> Option<MapId>;

    /// Number of polygons in the mesh.
    fn polygon_count(&self) -> usize;

    /// Handle of the polygon at `index`.
    fn polygon_id(&self, index: usize) -> HostResult<PolygonId>;

    /// Whether the polygon is selected.
    fn is_selected(&self, polygon: PolygonId) -> HostResult<bool>;

    /// Whether any polygon of the mesh is selected.
    fn has_selection(&self) -> HostResult<bool>;

    /// Whether the polygon is marked for packing: it is selected, or nothing
    /// in the mesh is selected, in which case every polygon is marked.
    fn is_marked(&self, polygon: PolygonId) -> HostResult<bool> {
        Ok(!self.has_selection()? || self.is_selected(polygon)?)
    }

    /// The polygon's points in winding order.
    fn polygon_points(&self, polygon: PolygonId) -> HostResult<Vec<PointId>>;

    /// UV of one polygon corner. Corners of the same point may differ
    /// between polygons (discontinuous UVs).
    fn polygon_uv(&self, polygon: PolygonId, point: PointId, map: MapId) -> HostResult<[f32; 2]>;

    /// 3D position of a point.
    fn point_position(&self, point: PointId) -> HostResult<[f32; 3]>;
}

/// Write access to one mesh.
pub trait EditableMesh: PolygonMesh {
    /// Sets the UV of one polygon corner.
    fn set_polygon_uv(
        &mut self,
        polygon: PolygonId,
        point: PointId,
        map: MapId,
        uv: [f32; 2],
    ) -> HostResult<()>;
}

/// The host scene: a list of mesh layers plus selection state.
pub trait MeshScene {
    /// Mesh type of every layer.
    type Mesh: EditableMesh;

    /// Number of mesh layers.
    fn layer_count(&self) -> HostResult<usize>;

    /// Scan flags of a layer.
    fn layer_flags(&self, layer: usize) -> HostResult<LayerFlags>;

    /// Number of selected polygons when polygon selection mode is current;
    /// zero in any other selection mode.
    fn selected_polygon_count(&self) -> usize;

    /// Mesh of a layer for reading.
    fn mesh(&self, layer: usize) -> HostResult<&Self::Mesh>;

    /// Mesh of a layer for editing.
    fn mesh_mut(&mut self, layer: usize) -> HostResult<&mut Self::Mesh>;

    /// Signals that the UV maps of a layer's mesh were edited.
    fn mark_uv_edited(&mut self, layer: usize) -> HostResult<()>;

    /// Commits all pending layer edits.
    fn apply_edits(&mut self) -> HostResult<()>;
}

/// Indices of the layers whose flags match `filter`.
pub fn layers_where<S: MeshScene + ?Sized>(
    scene: &S,
    filter: impl Fn(LayerFlags) -> bool,
) -> HostResult<Vec<usize>> {
    let mut layers = Vec::new();
    for layer in 0..scene.layer_count()? {
        if filter(scene.layer_flags(layer)?) {
            layers.push(layer);
        }
    }
    Ok(layers)
}

/// Indices of the active layers.
pub fn active_layers<S: MeshScene + ?Sized>(scene: &S) -> HostResult<Vec<usize>> {
    layers_where(scene, |flags| flags.active)
}

/// Indices of the editable layers.
pub fn editable_layers<S: MeshScene + ?Sized>(scene: &S) -> HostResult<Vec<usize>> {
    layers_where(scene, |flags| flags.editable)
}
