//! Rivers, roads and a lake on a small map

use rust_hex_map::*;

fn main() -> Result<()> {
    env_logger::init();

    let config = HexMapConfigBuilder::new()
        .seed(11)
        .map_size(MapSize::Custom {
            chunk_count_x: 1,
            chunk_count_z: 1,
        })
        .build()?;
    let mut grid = HexGrid::new(config)?;

    // A ridge along the top row, sloping down toward a lake at the bottom
    for id in 0..grid.cell_count() {
        let z = grid.cells()[id].coordinates.z();
        grid.set_elevation(id, z)?;
    }
    for id in 0..5 {
        grid.set_elevation(id, 0)?;
        grid.set_water_level(id, 1)?;
    }

    // A river running down the middle column into the lake
    for z in (1..5).rev() {
        let id = z * 5 + 2;
        let direction = if z % 2 == 0 { HexDirection::SE } else { HexDirection::SW };
        grid.try_set_outgoing_river(id, direction)?;
    }

    // A road crossing the slope, stopping at the river
    for id in [10, 11] {
        grid.add_road(id, HexDirection::E)?;
    }
    if let Err(err) = grid.try_add_road(12, HexDirection::NE) {
        println!("Road refused: {}", err);
    }

    let mesher = HexMapMesher::new();
    let data = mesher.rebuild(&grid, 0)?;
    for (name, mesh) in data.surfaces() {
        println!("{:<12} {:>6} vertices, {:>6} triangles", name, mesh.vertex_count(), mesh.triangle_count());
    }

    if let Some(cell) = grid.cell_at(Vec3::new(35.0, 0.0, 30.0)) {
        println!(
            "Cell at (35, 30): {} elevation {} rivers in {:?} out {:?}",
            cell.coordinates, cell.elevation, cell.incoming_river, cell.outgoing_river
        );
    }

    Ok(())
}
