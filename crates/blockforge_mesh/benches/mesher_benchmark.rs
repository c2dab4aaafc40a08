//! Chunk meshing benchmark: naive vs greedy over a dense pattern chunk.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use blockforge_mesh::{build_chunk_mesh, MeshingOptions};
use blockforge_world::{Chunk, Voxel, VoxelKind, CHUNK_SIZE};

fn make_pattern_chunk() -> Chunk {
    let mut chunk = Chunk::new(0, 0, 0);
    for y in 0..CHUNK_SIZE {
        for z in 0..CHUNK_SIZE {
            for x in 0..CHUNK_SIZE {
                let hash = (x as u32).wrapping_mul(73_856_093)
                    ^ (y as u32).wrapping_mul(19_349_663)
                    ^ (z as u32).wrapping_mul(83_492_791);
                if hash % 7 == 0 {
                    continue;
                }
                chunk.set_voxel(x, y, z, Voxel::new(VoxelKind::Stone));
            }
        }
    }
    chunk
}

fn bench_meshers(c: &mut Criterion) {
    let chunk = make_pattern_chunk();

    c.bench_function("mesh_naive_pattern_chunk", |b| {
        b.iter(|| build_chunk_mesh(black_box(&chunk), MeshingOptions::NAIVE));
    });

    c.bench_function("mesh_greedy_pattern_chunk", |b| {
        b.iter(|| build_chunk_mesh(black_box(&chunk), MeshingOptions::GREEDY));
    });
}

criterion_group!(benches, bench_meshers);
criterion_main!(benches);
