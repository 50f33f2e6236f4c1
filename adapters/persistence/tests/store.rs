use std::{fs, path::PathBuf};

use glam::Vec3;
use maze_episode_core::{CellCoord, Command, CoordinateMapper, EpisodeId, MazeGeometry};
use maze_episode_persistence::{
    CaptureError, EpisodeCounter, EpisodeLog, EpisodeMetrics, FileCounterStorage, LoadError,
    MazeStore, SaveError, EPISODE_LOG_HEADER,
};
use maze_episode_world::{self as world, query, GridModel, MazeCarver, World};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "maze-episode-persistence-{}-{name}",
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&dir);
    dir
}

fn generated_world(size: u32, agent: Vec3, target: Vec3) -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(&mut world, Command::SeedGenerator { seed: 99 }, &mut events);
    world::apply(
        &mut world,
        Command::GenerateMaze {
            size,
            agent,
            target,
        },
        &mut events,
    );
    world
}

fn save(
    store: &MazeStore,
    world: &World,
    agent: Vec3,
    target: Vec3,
    id: u64,
) -> Result<PathBuf, SaveError> {
    let mapper = query::mapper(world).expect("maze generated");
    store.save(
        query::wall_view(world),
        mapper,
        agent,
        target,
        EpisodeId::new(id),
    )
}

#[test]
fn saved_three_by_three_lists_nine_cells_in_order() {
    let dir = scratch_dir("three-by-three");
    let store = MazeStore::new(&dir);
    let agent = Vec3::new(-2.0, 0.25, -2.0);
    let target = Vec3::new(2.0, 0.25, 2.0);
    let world = generated_world(3, agent, target);

    let path = save(&store, &world, agent, target, 1).expect("save succeeds");

    assert_eq!(path, dir.join("maze_episode_1.json"));
    let record = store.load(EpisodeId::new(1)).expect("load succeeds");
    assert_eq!(record.maze_size, 3);
    assert_eq!(record.agent_start, CellCoord::new(0, 0));
    assert_eq!(record.target, CellCoord::new(2, 2));
    let order: Vec<(u32, u32)> = record.cells.iter().map(|cell| (cell.x, cell.y)).collect();
    assert_eq!(
        order,
        vec![
            (0, 0),
            (0, 1),
            (0, 2),
            (1, 0),
            (1, 1),
            (1, 2),
            (2, 0),
            (2, 1),
            (2, 2),
        ]
    );
    for cell in &record.cells {
        for flag in [cell.top, cell.bottom, cell.left, cell.right] {
            assert!(flag <= 1, "flags are encoded as 0 or 1");
        }
    }

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn saved_json_uses_the_documented_field_names() {
    let dir = scratch_dir("field-names");
    let store = MazeStore::new(&dir);
    let agent = Vec3::new(0.0, 0.25, 0.0);
    let target = Vec3::new(2.0, 0.25, -2.0);
    let world = generated_world(3, agent, target);

    let path = save(&store, &world, agent, target, 5).expect("save succeeds");

    let contents = fs::read_to_string(path).expect("record readable");
    let json: serde_json::Value = serde_json::from_str(&contents).expect("valid json");
    assert_eq!(json["mazeSize"], 3);
    assert_eq!(json["agentStart"], serde_json::json!({ "x": 1, "y": 1 }));
    assert_eq!(json["target"], serde_json::json!({ "x": 2, "y": 0 }));
    assert_eq!(json["cells"].as_array().map(Vec::len), Some(9));
    assert!(contents.contains('\n'), "records are pretty printed");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn coincident_positions_write_nothing() {
    let dir = scratch_dir("coincident");
    let store = MazeStore::new(&dir);
    let position = Vec3::new(2.0, 0.25, 2.0);
    let world = generated_world(3, position, position);

    let error = save(&store, &world, position, position, 3).expect_err("save must be refused");

    match error {
        SaveError::Rejected { episode, source } => {
            assert_eq!(episode, 3);
            assert_eq!(source, CaptureError::CoincidentPositions { position });
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!store.record_path(EpisodeId::new(3)).exists());
    assert!(!dir.exists(), "rejected saves do not create the directory");
}

#[test]
fn rectangular_layouts_are_refused_before_writing() {
    let dir = scratch_dir("rectangular");
    let store = MazeStore::new(&dir);
    let mut grid = GridModel::new(4, 2);
    let mut events = Vec::new();
    let _ = MazeCarver::from_seed(5).carve(&mut grid, CellCoord::new(0, 0), &mut events);
    let mapper = CoordinateMapper::new(4, 2, MazeGeometry::default()).expect("mapper");

    let error = store
        .save(grid.view(), &mapper, Vec3::ZERO, Vec3::X, EpisodeId::new(1))
        .expect_err("rectangular mazes cannot be recorded");

    match error {
        SaveError::Rejected { source, .. } => assert_eq!(
            source,
            CaptureError::NotSquare {
                width: 4,
                height: 2,
            }
        ),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!dir.exists());
    assert!(matches!(
        store.load(EpisodeId::new(1)),
        Err(LoadError::Read { .. })
    ));
}

#[test]
fn rejected_save_leaves_the_world_usable() {
    let dir = scratch_dir("retry");
    let store = MazeStore::new(&dir);
    let agent = Vec3::new(-2.0, 0.25, 0.0);
    let world = generated_world(3, agent, agent);

    assert!(save(&store, &world, agent, agent, 4).is_err());
    let path = save(&store, &world, agent, Vec3::new(2.0, 0.25, 0.0), 4).expect("retry succeeds");

    assert!(path.exists());
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn saving_twice_overwrites_the_record() {
    let dir = scratch_dir("overwrite");
    let store = MazeStore::new(&dir);
    let agent = Vec3::new(-2.0, 0.25, -2.0);
    let first_target = Vec3::new(2.0, 0.25, 2.0);
    let second_target = Vec3::new(0.0, 0.25, 2.0);
    let world = generated_world(3, agent, first_target);

    let _ = save(&store, &world, agent, first_target, 8).expect("first save");
    let _ = save(&store, &world, agent, second_target, 8).expect("second save");

    let record = store.load(EpisodeId::new(8)).expect("load");
    assert_eq!(record.target, CellCoord::new(1, 2));
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn loading_a_missing_or_corrupt_record_fails() {
    let dir = scratch_dir("corrupt");
    let store = MazeStore::new(&dir);

    assert!(matches!(
        store.load(EpisodeId::new(1)),
        Err(LoadError::Read { .. })
    ));

    fs::create_dir_all(&dir).expect("create scratch dir");
    fs::write(store.record_path(EpisodeId::new(2)), "{ not json").expect("write corrupt file");
    assert!(matches!(
        store.load(EpisodeId::new(2)),
        Err(LoadError::Parse { .. })
    ));

    fs::write(
        store.record_path(EpisodeId::new(3)),
        r#"{"mazeSize":2,"agentStart":{"x":0,"y":0},"target":{"x":1,"y":1},"cells":[]}"#,
    )
    .expect("write truncated record");
    assert!(matches!(
        store.load(EpisodeId::new(3)),
        Err(LoadError::Invalid { .. })
    ));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn file_counter_persists_between_instances() {
    let dir = scratch_dir("counter");
    let storage = FileCounterStorage::in_dir(&dir);

    let mut counter = EpisodeCounter::new(storage.clone());
    assert_eq!(counter.next_episode().expect("first"), EpisodeId::new(1));
    assert_eq!(counter.next_episode().expect("second"), EpisodeId::new(2));

    let mut resumed = EpisodeCounter::new(storage.clone());
    assert_eq!(resumed.next_episode().expect("third"), EpisodeId::new(3));
    assert_eq!(
        fs::read_to_string(storage.path()).expect("counter readable"),
        "3"
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn episode_log_writes_the_header_once() {
    let dir = scratch_dir("episode-log");
    let log = EpisodeLog::in_dir(&dir);
    let metrics = EpisodeMetrics {
        episode: EpisodeId::new(1),
        total_reward: 0.9,
        success: true,
        step_count: 40,
        visited_cells: 6,
        distance_traveled: 12.5,
        maze_size: 3,
    };
    let idle = EpisodeMetrics {
        episode: EpisodeId::new(2),
        step_count: 1,
        ..metrics
    };

    assert!(log.append(&metrics).expect("first append"));
    assert!(!log.append(&idle).expect("idle append"));
    assert!(log
        .append(&EpisodeMetrics {
            episode: EpisodeId::new(3),
            success: false,
            ..metrics
        })
        .expect("third append"));

    let contents = fs::read_to_string(log.path()).expect("log readable");
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(
        lines,
        vec![
            EPISODE_LOG_HEADER,
            "1,0.900,1,40,6,12.500,3",
            "3,0.900,0,40,6,12.500,3",
        ]
    );

    let _ = fs::remove_dir_all(&dir);
}
