//! # World Streaming Integration Tests
//!
//! Walks an observer through generated terrain and checks the properties that
//! must hold after every completed load pass.

use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use cgmath::Point3;
use voxel_world::{
    config::{HeightStrategy, WorldConfig},
    engine_state::{
        buffer_state::RecordingBufferSink,
        rendering::{texture::TextureAtlas, Vertex},
        voxels::{
            block::block_side::BlockSide,
            chunk::{ChunkCoord, CHUNK_DIMENSION},
            height_field::HeightField,
            world::World,
        },
    },
};

fn hilly_config(render_distance: i32) -> WorldConfig {
    WorldConfig {
        world_height: 48,
        sea_level: 20,
        render_distance,
        seed: 7,
        height_strategy: HeightStrategy::Perlin,
        height_amplitude: 12.0,
        height_frequency: 0.08,
        max_concurrent_loads: 8,
        ..WorldConfig::default()
    }
}

fn window(center: ChunkCoord, r: i32) -> HashSet<ChunkCoord> {
    (center.x - r..center.x + r)
        .flat_map(|x| (center.z - r..center.z + r).map(move |z| ChunkCoord::new(x, z)))
        .collect()
}

/// Every edge face of every loaded chunk agrees with the block across the edge.
fn assert_culling_symmetry(world: &World) {
    let last = CHUNK_DIMENSION - 1;
    let height = world.settings().world_height as i32;

    for a in world.chunks() {
        let coord = a.position();
        for (side, b_coord) in [
            (BlockSide::Right, ChunkCoord::new(coord.x + 1, coord.z)),
            (BlockSide::Front, ChunkCoord::new(coord.x, coord.z + 1)),
        ] {
            let Some(b) = world.chunk(b_coord) else {
                continue;
            };
            for along in 0..CHUNK_DIMENSION {
                for y in 0..height {
                    let ((ax, az), (bx, bz)) = match side {
                        BlockSide::Right => ((last, along), (0, along)),
                        _ => ((along, last), (along, 0)),
                    };
                    let a_block = a.block(ax, y, az).unwrap();
                    let b_block = b.block(bx, y, bz).unwrap();
                    if a_block.is_solid() {
                        assert_eq!(
                            a_block.is_face_visible(side),
                            !b_block.is_solid(),
                            "{coord} {side:?} at ({ax}, {y}, {az})"
                        );
                    }
                    if b_block.is_solid() {
                        assert_eq!(
                            b_block.is_face_visible(side.opposite()),
                            !a_block.is_solid(),
                            "{b_coord} {:?} at ({bx}, {y}, {bz})",
                            side.opposite()
                        );
                    }
                }
            }
        }
    }
}

fn assert_air_is_never_visible(world: &World) {
    let height = world.settings().world_height as i32;
    for chunk in world.chunks() {
        for x in 0..CHUNK_DIMENSION {
            for z in 0..CHUNK_DIMENSION {
                for y in 0..height {
                    let block = chunk.block(x, y, z).unwrap();
                    if !block.is_solid() {
                        assert_eq!(block.visible_face_count(), 0);
                    }
                }
            }
        }
    }
}

fn assert_meshes_are_consistent(world: &World, sink: &RecordingBufferSink) {
    for chunk in world.chunks() {
        assert!(!chunk.needs_update(), "{} is stale", chunk.position());
        let faces = chunk.visible_face_count();
        let mesh = chunk.mesh();
        assert_eq!(mesh.vertices.len(), 4 * faces);
        assert_eq!(mesh.indices.len(), 6 * faces);
        assert!(mesh.indices.iter().all(|&index| (index as usize) < 4 * faces));

        let (vertex_bytes, index_bytes) = chunk
            .buffers()
            .and_then(|handle| sink.contents(handle))
            .unwrap();
        assert_eq!(vertex_bytes.len(), 4 * faces * std::mem::size_of::<Vertex>());
        assert_eq!(index_bytes.len(), 6 * faces * std::mem::size_of::<u32>());
    }
}

#[test]
fn walking_keeps_every_invariant() {
    let config = hilly_config(2);
    let mut sink = RecordingBufferSink::new();
    let mut world = World::new(&config, &TextureAtlas::flat_colors()).unwrap();

    let path = [
        Point3::new(1.0, 40.0, 1.0),
        Point3::new(17.0, 40.0, 1.0),
        Point3::new(33.5, 40.0, -2.0),
        Point3::new(33.5, 40.0, -40.0),
        Point3::new(-70.0, 40.0, 5.0),
    ];

    let mut total_loaded = 0;
    let mut total_evicted = 0;
    for position in path {
        let report = world.update(position, &mut sink).unwrap();
        assert!(report.failed.is_empty());
        total_loaded += report.loaded.len();
        total_evicted += report.evicted.len();

        let active = ChunkCoord::from_world_position(position.x, position.z);
        assert_eq!(world.active_chunk(), Some(active));
        assert_eq!(world.loaded_coordinates(), &window(active, 2));
        assert_eq!(world.chunk_count(), 16);
        assert_eq!(sink.live_buffers(), 16);

        assert_culling_symmetry(&world);
        assert_air_is_never_visible(&world);
        assert_meshes_are_consistent(&world, &sink);
    }

    assert_eq!(total_loaded - total_evicted, 16);
    assert_eq!(sink.released_buffers() as usize, total_evicted);
}

#[test]
fn two_chunk_load_and_unload() {
    let config = WorldConfig {
        world_height: 32,
        sea_level: 16,
        render_distance: 1,
        ..WorldConfig::default()
    };
    // chunk (0,0) stands 3 blocks taller than chunk (1,0)
    let terrain = |x: i32, _z: i32| if x < 16 { 3 } else { 0 };
    let mut world = World::with_height_field(
        &config,
        &TextureAtlas::flat_colors(),
        Arc::new(terrain),
    )
    .unwrap();
    let mut sink = RecordingBufferSink::new();
    let a = ChunkCoord::new(0, 0);
    let b = ChunkCoord::new(1, 0);

    let report = world.load_coordinates(&[a, b], &mut sink);
    assert_eq!(report.loaded, vec![a, b]);
    assert_eq!(report.remeshed_neighbours, 0);

    let right_face = |world: &World, y: i32| {
        let chunk = world.chunk(a).unwrap();
        assert!(chunk.block(15, y, 0).unwrap().is_solid());
        chunk.block(15, y, 0).unwrap().is_face_visible(BlockSide::Right)
    };
    let faces_before = world.chunk(a).unwrap().visible_face_count();
    for y in 16..19 {
        assert!(world.chunk(b).unwrap().block(0, y, 0).is_some_and(|block| !block.is_solid()));
        assert!(right_face(&world, y));
    }
    assert!(!right_face(&world, 15));

    let report = world.unload_coordinates(&[b], &mut sink);
    assert_eq!(report.evicted, vec![b]);
    assert_eq!(report.remeshed_neighbours, 1);
    for y in 16..19 {
        assert!(!right_face(&world, y));
    }

    let chunk = world.chunk(a).unwrap();
    assert_eq!(chunk.visible_face_count(), faces_before - 3 * 16);
    assert_eq!(chunk.mesh().face_count(), chunk.visible_face_count());
    assert_eq!(world.loaded_coordinates(), &HashSet::from([a]));
}

#[test]
fn a_panicking_chunk_is_skipped_and_retried() {
    let config = WorldConfig {
        world_height: 32,
        sea_level: 16,
        render_distance: 2,
        ..WorldConfig::default()
    };
    let armed = Arc::new(AtomicBool::new(true));
    let trigger = Arc::clone(&armed);
    // (24, 8) is sampled only by chunk (1, 0)
    let terrain = move |x: i32, z: i32| {
        if x == 24 && z == 8 && trigger.swap(false, Ordering::SeqCst) {
            panic!("terrain source unavailable");
        }
        2
    };
    let height_field: Arc<dyn HeightField> = Arc::new(terrain);
    let mut world =
        World::with_height_field(&config, &TextureAtlas::flat_colors(), height_field).unwrap();
    let mut sink = RecordingBufferSink::new();
    let broken = ChunkCoord::new(1, 0);

    let report = world.update(Point3::new(8.0, 30.0, 8.0), &mut sink).unwrap();
    assert_eq!(report.failed, vec![broken]);
    assert_eq!(report.loaded.len(), 15);
    assert!(!armed.load(Ordering::SeqCst));

    let mut expected = window(ChunkCoord::new(0, 0), 2);
    expected.remove(&broken);
    assert_eq!(world.loaded_coordinates(), &expected);
    assert!(world.chunk(broken).is_none());

    // the gap is treated as solid, so nothing is drawn into it
    let edge = world.chunk(ChunkCoord::new(0, 0)).unwrap();
    assert!(!edge.block(15, 17, 4).unwrap().is_face_visible(BlockSide::Right));

    let report = world.update(Point3::new(8.0, 30.0, 20.0), &mut sink).unwrap();
    assert!(report.failed.is_empty());
    assert!(report.loaded.contains(&broken));
    assert_eq!(world.loaded_coordinates(), &window(ChunkCoord::new(0, 1), 2));
    assert_culling_symmetry(&world);
}

#[test]
fn render_draws_only_chunks_in_view() {
    use cgmath::Deg;
    use voxel_world::engine_state::{
        camera_state::{CameraProvider, FirstPersonCamera},
        rendering::frustum::Frustum,
    };

    let config = hilly_config(3);
    let mut sink = RecordingBufferSink::new();
    let mut world = World::new(&config, &TextureAtlas::flat_colors()).unwrap();
    world.update(Point3::new(8.0, 40.0, 8.0), &mut sink);

    // facing -z
    let camera = FirstPersonCamera::new(Point3::new(8.0, 40.0, 8.0), Deg(-90.0), 800, 600);
    let frustum = Frustum::from_view_projection(&camera.view_projection());
    let draws = world.render(&frustum, &mut sink);

    let drawn: HashSet<_> = sink.take_draws().into_iter().map(|(handle, _)| handle).collect();
    assert_eq!(drawn.len(), draws);
    assert!(draws > 0 && draws < 36);

    let home = world.chunk(ChunkCoord::new(0, 0)).and_then(|chunk| chunk.buffers()).unwrap();
    let behind = world.chunk(ChunkCoord::new(0, 2)).and_then(|chunk| chunk.buffers()).unwrap();
    assert!(drawn.contains(&home));
    assert!(!drawn.contains(&behind));

    world.release_all(&mut sink);
    assert_eq!(sink.live_buffers(), 0);
}
