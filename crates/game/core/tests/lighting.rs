use lumen_core::{Dungeon, EntityId, Feature, Game, GameConfig, Mob, MobAction, Tile, Vector};

fn lit(dungeon: &Dungeon) -> Vec<Vector> {
    dungeon
        .bounds()
        .cells()
        .filter(|cell| dungeon.tile(*cell).lit())
        .collect()
}

#[test]
fn open_room_lit_from_center_is_an_exact_disk() {
    let mut dungeon = Dungeon::new(21, 21);
    let center = Vector::new(10, 10);
    dungeon
        .add_feature(Feature::torch(EntityId(1), center, 6))
        .unwrap();
    dungeon.calculate_lighting();

    let disk: Vec<Vector> = dungeon
        .bounds()
        .cells()
        .filter(|cell| (*cell - center).length_squared() < 36)
        .collect();
    assert_eq!(lit(&dungeon), disk);
}

#[test]
fn wall_two_east_shadows_the_cell_behind_it() {
    let mut dungeon = Dungeon::new(7, 5);
    let source = Vector::new(2, 2);
    let wall = Vector::new(4, 2);
    dungeon.set_tile(wall, Tile::wall());
    dungeon
        .add_feature(Feature::torch(EntityId(1), source, 5))
        .unwrap();
    dungeon.calculate_lighting();

    assert!(dungeon.tile(wall).lit());
    assert!(!dungeon.tile(Vector::new(5, 2)).lit());
    assert!(!dungeon.tile(Vector::new(6, 2)).lit());
    assert!(dungeon.tile(Vector::new(5, 1)).lit());
    assert!(dungeon.tile(Vector::new(5, 3)).lit());
}

#[test]
fn walls_inside_a_room_never_light_the_far_side() {
    let dungeon_rows = [
        "#########",
        "#...#...#",
        "#...#...#",
        "#...#...#",
        "#########",
    ];
    let mut dungeon = Dungeon::from_rows(&dungeon_rows);
    dungeon
        .add_feature(Feature::torch(EntityId(1), Vector::new(2, 2), 8))
        .unwrap();
    dungeon.calculate_lighting();

    assert!(lit(&dungeon).iter().all(|cell| cell.x <= 4));
}

#[test]
fn seen_persists_while_visible_follows_the_player() {
    let mut dungeon = Dungeon::from_rows(&[
        "###########",
        "#....#....#",
        "#.........#",
        "#....#....#",
        "###########",
    ]);
    dungeon = dungeon.with_origin(Vector::new(1, 2));
    let config = GameConfig::default().with_player_vision_radius(3);
    let mut game = Game::new(config, dungeon).unwrap();

    let start = Vector::new(1, 2);
    assert!(game.dungeon().tile(start).visible());

    for _ in 0..5 {
        game.play(MobAction::Move(Vector::EAST)).unwrap();
    }
    assert_eq!(game.player().unwrap().location(), Vector::new(6, 2));

    let start_tile = game.dungeon().tile(start);
    assert!(!start_tile.visible());
    assert!(start_tile.seen());
    assert!(game.dungeon().tile(Vector::new(8, 2)).visible());
}

#[test]
fn carried_light_moves_with_its_bearer() {
    let mut game = Game::new(
        GameConfig::default().with_player_light_radius(0),
        Dungeon::new(15, 5),
    )
    .unwrap();
    let id = game.allocate_entity_id();
    game.spawn_mob(
        Mob::monster(id, "will-o-wisp", 'w')
            .with_light_radius(1)
            .with_vision_radius(0)
            .with_location(Vector::new(12, 0)),
    )
    .unwrap();
    game.play(MobAction::Wait).unwrap();

    let wisp = game.dungeon().mob(id).unwrap().location();
    assert_eq!(lit(game.dungeon()), vec![wisp]);
}
