//! Demonstration of chunk mesh generation

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rust_hex_map::*;

fn main() -> Result<()> {
    env_logger::init();

    println!("Generating hex map...");

    let config = HexMapConfigBuilder::new()
        .seed(42)
        .map_size(MapSize::Small)
        .build()?;

    let mut grid = HexGrid::new(config)?;
    let (width, height) = grid.cell_counts();
    println!("Created {} cells ({}x{}) in {} chunks", grid.cell_count(), width, height, grid.chunk_count());

    // Sculpt some random terrain: elevation by distance from a hill top, a lake
    // in the low corner and a few towns
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let hill = HexCoordinates::from_offset_coordinates(12, 8);
    for id in 0..grid.cell_count() {
        let coordinates = grid.cells()[id].coordinates;
        let elevation = 5 - coordinates.distance_to(hill).min(6) as i32;
        grid.set_elevation(id, elevation.max(0) + rng.gen_range(0..2))?;
        if elevation <= 0 {
            grid.set_water_level(id, 1)?;
        }
        grid.set_urban_level(id, rng.gen_range(0..4))?;
        let shade = 0.3 + 0.1 * elevation.max(0) as f32;
        grid.set_color(id, Vec4::new(shade * 0.6, shade, shade * 0.4, 1.0))?;
    }

    let mesher = HexMapMesher::new();
    let chunks = mesher.rebuild_all(&grid)?;

    println!("\nMesh statistics:");
    let mut totals = [(0usize, 0usize); 6];
    let mut features = 0;
    for data in &chunks {
        for (i, (_, mesh)) in data.surfaces().iter().enumerate() {
            totals[i].0 += mesh.vertex_count();
            totals[i].1 += mesh.triangle_count();
        }
        features += data.features.len();
    }
    let names = chunks.first().map(|c| c.surfaces().map(|(name, _)| name));
    if let Some(names) = names {
        for (name, (vertices, triangles)) in names.iter().zip(totals) {
            println!("  {:<12} {:>7} vertices, {:>7} triangles", name, vertices, triangles);
        }
    }
    println!("  Features: {}", features);

    // Memory estimate
    let bytes: usize = chunks
        .iter()
        .flat_map(|c| c.surfaces())
        .map(|(_, m)| {
            m.positions.len() * 12
                + m.normals.len() * 12
                + m.colors.len() * 16
                + (m.uvs.len() + m.uv2s.len()) * 8
                + m.indices.len() * 4
        })
        .sum();
    println!("\nMemory usage: {} bytes ({:.2} MB)", bytes, bytes as f32 / 1024.0 / 1024.0);

    // Edit a single cell and rebuild only what changed
    grid.take_dirty_chunks();
    grid.set_elevation(0, 3)?;
    let rebuilt = mesher.rebuild_dirty(&mut grid)?;
    println!(
        "\nAfter editing cell 0: rebuilt chunks {:?}",
        rebuilt.iter().map(|(chunk, _)| *chunk).collect::<Vec<_>>()
    );
    println!("Idle pooled buffers: {}", mesher.pool().idle_count());

    Ok(())
}
