//! Benchmarks for UV extraction and write-back.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use uvpack_bridge::{extract_uvs, write_back, LayerFlags, MemoryMesh, MemoryScene};
use uvpack_core::{apply_pack_solution, IslandPackSolution};

fn grid_scene(size: usize) -> MemoryScene {
    MemoryScene::new().with_layer(
        MemoryMesh::grid("Texture", size, size, 0.001),
        LayerFlags::ACTIVE_EDIT,
    )
}

fn extract_benchmark(c: &mut Criterion) {
    let scene = grid_scene(128);

    c.bench_function("extract_128x128_grid", |b| {
        b.iter(|| {
            let extraction = extract_uvs(black_box(&scene), "Texture");
            black_box(extraction)
        })
    });
}

fn write_back_benchmark(c: &mut Criterion) {
    let mut scene = grid_scene(64);
    let extraction = extract_uvs(&scene, "Texture").unwrap();
    let islands: Vec<Vec<usize>> = (0..extraction.face_count()).map(|f| vec![f]).collect();
    let solutions: Vec<IslandPackSolution> = (0..islands.len())
        .map(|i| IslandPackSolution::identity(i).with_rotation(0.5, [0.5, 0.5]))
        .collect();

    c.bench_function("apply_and_write_64x64_grid", |b| {
        b.iter(|| {
            let solved =
                apply_pack_solution(extraction.uv_data(), black_box(&islands), &solutions).unwrap();
            let stats = write_back(&mut scene, &extraction, &solved, "Texture").unwrap();
            black_box(stats)
        })
    });
}

criterion_group!(benches, extract_benchmark, write_back_benchmark);
criterion_main!(benches);
