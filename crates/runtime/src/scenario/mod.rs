//! Starting level generation.
//!
//! Terrain and population are rolled from [`RuntimeConfig::seed`] with a
//! seeded [`StdRng`], so the same configuration always yields the same level.
//! The builder fills a [`Dungeon`] completely before handing it to
//! [`Game::new`], which places the player at the origin.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use lumen_core::{Color, Dungeon, EntityId, Feature, Game, Item, ItemKind, Mob, Tile, Vector};

use crate::api::Result;
use crate::config::{LevelConfig, RuntimeConfig};

/// Offset from the origin of the monster every level starts with.
pub const DUMMY_OFFSET: Vector = Vector::new(5, 0);

pub const TORCH_LIGHT_RADIUS: u32 = 6;

struct MonsterTemplate {
    name: &'static str,
    glyph: char,
    color: Color,
    health: u32,
    attack_strength: u32,
}

const MONSTERS: [MonsterTemplate; 4] = [
    MonsterTemplate {
        name: "rat",
        glyph: 'r',
        color: Color::Yellow,
        health: 3,
        attack_strength: 1,
    },
    MonsterTemplate {
        name: "kobold",
        glyph: 'k',
        color: Color::Green,
        health: 5,
        attack_strength: 1,
    },
    MonsterTemplate {
        name: "goblin",
        glyph: 'g',
        color: Color::Green,
        health: 6,
        attack_strength: 2,
    },
    MonsterTemplate {
        name: "orc",
        glyph: 'o',
        color: Color::Red,
        health: 8,
        attack_strength: 2,
    },
];

struct ItemTemplate {
    name: &'static str,
    glyph: char,
    weight: u32,
    light_radius: u32,
    kind: ItemKind,
}

const ITEMS: [ItemTemplate; 5] = [
    ItemTemplate {
        name: "gold coin",
        glyph: '$',
        weight: 1,
        light_radius: 0,
        kind: ItemKind::Misc,
    },
    ItemTemplate {
        name: "potion",
        glyph: '!',
        weight: 2,
        light_radius: 0,
        kind: ItemKind::Misc,
    },
    ItemTemplate {
        name: "scroll",
        glyph: '?',
        weight: 1,
        light_radius: 0,
        kind: ItemKind::Misc,
    },
    ItemTemplate {
        name: "dagger",
        glyph: ')',
        weight: 5,
        light_radius: 0,
        kind: ItemKind::Weapon { attack_strength: 2 },
    },
    ItemTemplate {
        name: "lantern",
        glyph: '(',
        weight: 4,
        light_radius: 3,
        kind: ItemKind::Misc,
    },
];

/// Builds a ready-to-play game from configuration.
pub fn build_game(config: &RuntimeConfig) -> Result<Game> {
    config.validate()?;
    let dungeon = build_dungeon(&config.level, config.seed)?;
    let game = Game::new(config.game_config(), dungeon)?;
    info!(
        target: "lumen::scenario",
        seed = config.seed,
        width = config.level.width,
        height = config.level.height,
        mobs = game.dungeon().mobs().len(),
        "starting level ready"
    );
    Ok(game)
}

/// Rolls terrain and population for one level. The origin stays empty for
/// the player.
pub fn build_dungeon(level: &LevelConfig, seed: u64) -> Result<Dungeon> {
    level.validate()?;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut dungeon = Dungeon::new(level.width, level.height);
    let origin = dungeon.origin();
    let dummy = origin + DUMMY_OFFSET;

    for cell in dungeon.bounds().cells() {
        if cell == origin || cell == dummy {
            continue;
        }
        if rng.gen_bool(level.wall_density) {
            dungeon.set_tile(cell, Tile::wall());
        }
    }

    let mut next_id = 1;
    let mut allocate = move || {
        let id = EntityId(next_id);
        next_id += 1;
        id
    };

    if dungeon.contains(dummy) {
        dungeon.add_mob(Mob::monster(allocate(), "orc", 'o').with_location(dummy))?;
    }

    let mut free: Vec<Vector> = dungeon
        .bounds()
        .cells()
        .filter(|&cell| cell != origin && is_free(&dungeon, cell))
        .collect();
    free.shuffle(&mut rng);

    let wanted = level.monsters + level.items + level.torches;
    if wanted > free.len() {
        warn!(
            target: "lumen::scenario",
            wanted,
            free = free.len(),
            "level too crowded, placing what fits"
        );
    }

    for _ in 0..level.monsters {
        let Some(location) = free.pop() else { break };
        let template = &MONSTERS[rng.gen_range(0..MONSTERS.len())];
        let mob = Mob::monster(allocate(), template.name, template.glyph)
            .with_color(template.color)
            .with_health(template.health)
            .with_attack_strength(template.attack_strength)
            .with_location(location);
        dungeon.add_mob(mob)?;
    }

    for _ in 0..level.items {
        let Some(location) = free.pop() else { break };
        let template = &ITEMS[rng.gen_range(0..ITEMS.len())];
        let item = Item::new(allocate(), template.name, template.glyph, template.weight)
            .with_light_radius(template.light_radius)
            .with_kind(template.kind)
            .with_location(location);
        dungeon.add_item(item)?;
    }

    for _ in 0..level.torches {
        let Some(location) = free.pop() else { break };
        dungeon.add_feature(Feature::torch(allocate(), location, TORCH_LIGHT_RADIUS))?;
    }

    Ok(dungeon)
}

fn is_free(dungeon: &Dungeon, cell: Vector) -> bool {
    dungeon.tile(cell).crossable() && dungeon.feature_group(cell).is_empty()
}
