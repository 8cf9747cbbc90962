use lumen_core::{
    Dungeon, EntityId, Game, GameConfig, GameEvent, GameState, Item, ItemKind, Mob, MobAction,
    Vector,
};

fn game(config: GameConfig) -> Game {
    Game::new(config, Dungeon::new(11, 11)).expect("empty dungeon accepts the player")
}

#[test]
fn wait_with_no_monsters_returns_to_player_turn_one_turn_later() {
    let mut game = game(GameConfig::default());
    assert_eq!(game.state(), GameState::PlayerTurn);

    let outcome = game.step(MobAction::Wait).unwrap();
    assert_eq!(outcome.state, GameState::WorldTurn);

    let outcome = game.step(MobAction::None).unwrap();
    assert_eq!(outcome.state, GameState::PlayerTurn);
    assert_eq!(game.turn(), 2);
}

#[test]
fn killed_monster_leaves_corpse_and_inventory_after_reaping() {
    let mut game = game(GameConfig::default().with_player_attack_strength(50));
    let rat = game.allocate_entity_id();
    let charm = game.allocate_entity_id();
    let spot = Vector::new(6, 5);
    game.spawn_mob(
        Mob::monster(rat, "rat", 'r')
            .with_health(7)
            .with_location(spot)
            .with_item(Item::new(charm, "charm", '"', 1)),
    )
    .unwrap();

    let outcome = game.play(MobAction::Move(Vector::EAST)).unwrap();

    assert_eq!(outcome.state, GameState::PlayerTurn);
    assert!(game.dungeon().mob(rat).is_none());
    let items = game.dungeon().feature_group(spot).items();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].kind(), ItemKind::Corpse);
    assert_eq!(items[0].name(), "rat corpse");
    assert_eq!(items[1].id(), charm);
    assert!(outcome.events.iter().any(|event| matches!(
        event,
        GameEvent::Died { id, location, .. } if *id == rat && *location == spot
    )));
}

#[test]
fn corpse_blocks_the_cell_it_lies_on() {
    let mut game = game(GameConfig::default().with_player_attack_strength(50));
    let rat = game.allocate_entity_id();
    game.spawn_mob(Mob::monster(rat, "rat", 'r').with_location(Vector::new(6, 5)))
        .unwrap();
    game.play(MobAction::Move(Vector::EAST)).unwrap();

    let outcome = game.play(MobAction::Move(Vector::EAST)).unwrap();
    assert_eq!(outcome.state, GameState::PlayerTurn);
    assert_eq!(game.player().unwrap().location(), Vector::new(5, 5));
    assert_eq!(game.turn(), 2);
}

#[test]
fn monsters_close_in_and_fight() {
    let mut game = game(GameConfig::default().with_player_health(100));
    let orc = game.allocate_entity_id();
    game.spawn_mob(
        Mob::monster(orc, "orc", 'o')
            .with_attack_strength(2)
            .with_location(Vector::new(8, 5)),
    )
    .unwrap();

    game.play(MobAction::Wait).unwrap();
    assert_eq!(game.dungeon().mob(orc).unwrap().location(), Vector::new(7, 5));
    game.play(MobAction::Wait).unwrap();
    assert_eq!(game.dungeon().mob(orc).unwrap().location(), Vector::new(6, 5));

    let outcome = game.play(MobAction::Wait).unwrap();
    assert_eq!(game.player().unwrap().health(), 98);
    assert!(outcome
        .messages
        .iter()
        .any(|message| message.text == "orc hits Player for 2 damage."));
}

#[test]
fn player_death_closes_the_game() {
    let mut game = game(GameConfig::default().with_player_health(1));
    let orc = game.allocate_entity_id();
    game.spawn_mob(Mob::monster(orc, "orc", 'o').with_location(Vector::new(6, 5)))
        .unwrap();

    let outcome = game.play(MobAction::Wait).unwrap();

    assert_eq!(outcome.state, GameState::Closed);
    assert!(game.player().is_none());
    assert_eq!(outcome.messages.last().unwrap().text, "You die...");
    assert_eq!(game.step(MobAction::Wait).unwrap().state, GameState::Closed);
}

#[test]
fn fixed_seed_replays_identically() {
    let run = || {
        let mut game = game(GameConfig::default().with_seed(7));
        let bat = game.allocate_entity_id();
        // the wall keeps the bat from ever seeing the player
        let mut walled = Dungeon::new(11, 11);
        for y in 0..11 {
            walled.set_tile(Vector::new(5, y), lumen_core::Tile::wall());
        }
        let index = game.add_dungeon(walled);
        game.change_level(index, Some(Vector::new(1, 5))).unwrap();
        game.spawn_mob(Mob::monster(bat, "bat", 'b').with_location(Vector::new(8, 5)))
            .unwrap();
        (0..10)
            .map(|_| {
                game.play(MobAction::Wait).unwrap();
                game.dungeon().mob(bat).unwrap().location()
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}

#[test]
fn messages_are_tagged_with_their_turn() {
    let mut game = game(GameConfig::default());
    game.play(MobAction::Wait).unwrap();
    game.play(MobAction::Wait).unwrap();
    let turns: Vec<u64> = game.messages().iter().map(|message| message.turn).collect();
    assert_eq!(turns, vec![1, 1, 2]);
    assert_eq!(game.messages().iter().next().unwrap().text, Game::WELCOME);
    assert_eq!(game.player().unwrap().id(), EntityId::PLAYER);
}
