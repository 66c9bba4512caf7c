//! Applies a pack solution to the original UV coordinates.

use crate::error::{Error, Result};
use crate::transform::UvTransform;
use crate::types::{IslandPackSolution, UvData};

/// Computes the packed UV of every vertex.
///
/// The output starts as an exact copy of each vertex's original UV. Each
/// solved island then overwrites the UVs of its faces' vertices with the
/// transformed original. Vertices in no island, or in islands missing from
/// `solutions`, keep their coordinates bit for bit.
///
/// A vertex used by faces of two different islands is rejected with
/// [`Error::SharedIslandVertex`]; a valid packing never produces one.
pub fn apply_pack_solution(
    data: &UvData,
    islands: &[Vec<usize>],
    solutions: &[IslandPackSolution],
) -> Result<Vec<[f32; 2]>> {
    let mut solved: Vec<[f32; 2]> = data.verts.iter().map(|v| v.uv).collect();
    let mut owner: Vec<Option<usize>> = vec![None; data.verts.len()];

    for solution in solutions {
        let island = islands.get(solution.island_idx).ok_or_else(|| {
            Error::MalformedSolution(format!(
                "island {} out of range ({} islands)",
                solution.island_idx,
                islands.len()
            ))
        })?;
        let transform = UvTransform::from_solution(solution);

        for &face_id in island {
            let face = data.faces.get(face_id).ok_or_else(|| {
                Error::MalformedSolution(format!(
                    "island {} references face {} ({} faces)",
                    solution.island_idx,
                    face_id,
                    data.faces.len()
                ))
            })?;

            for &vertex in &face.verts {
                let original = data.verts.get(vertex).ok_or_else(|| {
                    Error::MalformedSolution(format!("face {} references vertex {}", face_id, vertex))
                })?;

                match owner[vertex] {
                    Some(first) if first != solution.island_idx => {
                        return Err(Error::SharedIslandVertex {
                            vertex,
                            first,
                            second: solution.island_idx,
                        });
                    }
                    _ => owner[vertex] = Some(solution.island_idx),
                }
                solved[vertex] = transform.transform_uv(original.uv);
            }
        }
    }

    let untouched = owner.iter().filter(|o| o.is_none()).count();
    log::debug!(
        "applied {} island solutions, {} of {} vertices unchanged",
        solutions.len(),
        untouched,
        data.verts.len()
    );

    Ok(solved)
}
