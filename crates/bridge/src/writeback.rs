//! Writes solved UVs back to the host meshes.

use crate::extract::Extraction;
use crate::host::{editable_layers, EditableMesh, MeshScene, PolygonMesh};
use uvpack_core::{Error, Result};

/// Summary of a write-back pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteBackStats {
    /// Polygon corners written.
    pub corners_written: usize,
    /// Layers marked as UV-edited.
    pub layers_edited: usize,
    /// Marked polygons skipped because they were not extracted.
    pub polygons_skipped: usize,
}

/// Writes `solved` (one UV per packer-vertex) to every marked polygon of
/// every editable layer. With nothing selected in a mesh, all of its
/// polygons are marked.
///
/// Each layer that received writes is marked UV-edited once; edits are
/// applied once at the end.
pub fn write_back<S: MeshScene + ?Sized>(
    scene: &mut S,
    extraction: &Extraction,
    solved: &[[f32; 2]],
    uv_map: &str,
) -> Result<WriteBackStats> {
    if solved.len() != extraction.vertex_count() {
        return Err(Error::MalformedSolution(format!(
            "{} solved UVs for {} vertices",
            solved.len(),
            extraction.vertex_count()
        )));
    }

    let mut stats = WriteBackStats::default();

    for layer in editable_layers(scene)? {
        let mesh = scene.mesh_mut(layer)?;
        let Some(map) = mesh.uv_map(uv_map) else {
            continue;
        };

        let mut written = 0;
        for index in 0..mesh.polygon_count() {
            let polygon = mesh.polygon_id(index)?;
            if !mesh.is_marked(polygon)? {
                continue;
            }

            let Some(face) = extraction.face_of(polygon) else {
                log::debug!("polygon {:?} was not extracted, skipped", polygon);
                stats.polygons_skipped += 1;
                continue;
            };
            let Some(verts) = extraction.face_verts(face) else {
                continue;
            };

            for &vertex in verts {
                let Some(point) = extraction.point_of(vertex) else {
                    continue;
                };
                mesh.set_polygon_uv(polygon, point, map, solved[vertex])?;
                written += 1;
            }
        }

        if written > 0 {
            scene.mark_uv_edited(layer)?;
            stats.layers_edited += 1;
            stats.corners_written += written;
        }
    }

    scene.apply_edits()?;

    log::debug!(
        "wrote {} corners on {} layers",
        stats.corners_written,
        stats.layers_edited
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_uvs;
    use crate::host::LayerFlags;
    use crate::memory::{MemoryMesh, MemoryScene};
    use approx::assert_relative_eq;

    fn shifted(extraction: &Extraction, du: f32) -> Vec<[f32; 2]> {
        extraction
            .uv_data()
            .verts
            .iter()
            .map(|v| [v.uv[0] + du, v.uv[1]])
            .collect()
    }

    #[test]
    fn test_writes_selected_polygons_only() {
        let mut mesh = MemoryMesh::grid("Texture", 2, 1, 0.0);
        mesh.set_selected(1, false);
        let mut scene = MemoryScene::new().with_layer(mesh, LayerFlags::ACTIVE_EDIT);

        let extraction = extract_uvs(&scene, "Texture").unwrap();
        let solved = shifted(&extraction, 0.25);
        let stats = write_back(&mut scene, &extraction, &solved, "Texture").unwrap();

        assert_eq!(stats.corners_written, 4);
        assert_eq!(stats.layers_edited, 1);

        let mesh = scene.layer(0).unwrap().mesh();
        assert_eq!(mesh.corner_uv(0, 0), Some([0.25, 0.0]));
        assert_eq!(mesh.corner_uv(1, 0), Some([0.5, 0.0]));
        assert_eq!(scene.layer(0).unwrap().uv_edit_marks(), 1);
        assert_eq!(scene.applied_count(), 1);
    }

    #[test]
    fn test_empty_selection_writes_every_polygon() {
        let mut mesh = MemoryMesh::grid("Texture", 2, 1, 0.0);
        mesh.set_selected(0, false);
        mesh.set_selected(1, false);
        let mut scene = MemoryScene::new().with_layer(mesh, LayerFlags::ACTIVE_EDIT);

        let extraction = extract_uvs(&scene, "Texture").unwrap();
        assert!(extraction.uv_data().faces.iter().all(|f| f.selected));

        let solved = shifted(&extraction, 0.25);
        let stats = write_back(&mut scene, &extraction, &solved, "Texture").unwrap();

        assert_eq!(stats.corners_written, 8);
        assert_eq!(stats.layers_edited, 1);
        let mesh = scene.layer(0).unwrap().mesh();
        assert_relative_eq!(mesh.corner_uv(1, 1).unwrap()[0], 1.25);
    }

    #[test]
    fn test_read_only_layer_untouched() {
        let read_only = LayerFlags {
            active: true,
            editable: false,
        };
        let mut scene = MemoryScene::new()
            .with_layer(MemoryMesh::grid("Texture", 1, 1, 0.0), read_only)
            .with_layer(MemoryMesh::grid("Texture", 1, 1, 0.0), LayerFlags::ACTIVE_EDIT);

        let extraction = extract_uvs(&scene, "Texture").unwrap();
        let solved = shifted(&extraction, 1.0);
        let stats = write_back(&mut scene, &extraction, &solved, "Texture").unwrap();

        assert_eq!(stats.layers_edited, 1);
        assert_eq!(scene.layer(0).unwrap().uv_edit_marks(), 0);
        assert_eq!(scene.layer(0).unwrap().mesh().corner_uv(0, 1), Some([1.0, 0.0]));
        assert_eq!(scene.layer(1).unwrap().mesh().corner_uv(0, 1), Some([2.0, 0.0]));
    }

    #[test]
    fn test_editable_but_inactive_layer_is_skipped() {
        let edit_only = LayerFlags {
            active: false,
            editable: true,
        };
        let mut scene =
            MemoryScene::new().with_layer(MemoryMesh::grid("Texture", 1, 1, 0.0), edit_only);

        let extraction = extract_uvs(&scene, "Texture").unwrap();
        assert!(extraction.is_empty());

        let stats = write_back(&mut scene, &extraction, &[], "Texture").unwrap();
        assert_eq!(stats.corners_written, 0);
        assert_eq!(stats.polygons_skipped, 1);
        assert_eq!(scene.applied_count(), 1);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let mut scene =
            MemoryScene::new().with_layer(MemoryMesh::grid("Texture", 1, 1, 0.0), LayerFlags::ACTIVE_EDIT);
        let extraction = extract_uvs(&scene, "Texture").unwrap();

        let err = write_back(&mut scene, &extraction, &[[0.0, 0.0]], "Texture").unwrap_err();
        assert!(matches!(err, Error::MalformedSolution(_)));
        assert_eq!(scene.applied_count(), 0);
    }
}
