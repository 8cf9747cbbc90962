//! Actors: the player and every monster.
//!
//! A [`Mob`] is owned by the dungeon cell it stands on and relocated by the
//! dungeon. It owns its inventory outright. Decision logic lives in [`ai`],
//! attack resolution in [`combat`].
pub mod ai;
pub mod combat;

use std::fmt;

use crate::config::GameConfig;
use crate::entity::{Appearance, EntityId, Item};
use crate::error::{ActionFailure, InvariantError};
use crate::geometry::Vector;
use crate::tile::Color;

pub use ai::Focus;
pub use combat::Hit;

/// Whether decisions come from the input layer or from [`ai`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum MobKind {
    Player,
    Monster,
}

/// Actor allegiance. Actors of different factions are enemies.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Faction {
    Player,
    #[default]
    Monster,
}

impl Faction {
    pub fn is_hostile_to(self, other: Faction) -> bool {
        self != other
    }
}

/// A movable object: anything with health that takes turns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mob {
    id: EntityId,
    appearance: Appearance,
    kind: MobKind,
    faction: Faction,
    vision_radius: u32,
    inventory: Vec<Item>,
    health: u32,
    max_health: u32,
    attack_strength: u32,
    last_ticked_turn: u64,
    focus: Option<Focus>,
}

impl Mob {
    const CORPSE_WEIGHT: u32 = 20;

    /// Creates the player from configuration. The player always has
    /// [`EntityId::PLAYER`].
    pub fn player(config: &GameConfig) -> Self {
        Self {
            id: EntityId::PLAYER,
            appearance: Appearance::new("Player", '@')
                .with_color(Color::White)
                .with_light_radius(config.player_light_radius),
            kind: MobKind::Player,
            faction: Faction::Player,
            vision_radius: config.player_vision_radius,
            inventory: Vec::new(),
            health: config.player_max_health,
            max_health: config.player_max_health,
            attack_strength: config.player_attack_strength,
            last_ticked_turn: 0,
            focus: None,
        }
    }

    /// Creates a hostile monster with default stats.
    pub fn monster(id: EntityId, name: impl Into<String>, glyph: char) -> Self {
        Self {
            id,
            appearance: Appearance::new(name, glyph),
            kind: MobKind::Monster,
            faction: Faction::Monster,
            vision_radius: GameConfig::DEFAULT_MOB_VISION_RADIUS,
            inventory: Vec::new(),
            health: GameConfig::DEFAULT_MOB_MAX_HEALTH,
            max_health: GameConfig::DEFAULT_MOB_MAX_HEALTH,
            attack_strength: GameConfig::DEFAULT_MOB_ATTACK_STRENGTH,
            last_ticked_turn: 0,
            focus: None,
        }
    }

    pub fn with_location(mut self, location: Vector) -> Self {
        self.appearance.set_location(location);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.appearance = self.appearance.with_color(color);
        self
    }

    pub fn with_faction(mut self, faction: Faction) -> Self {
        self.faction = faction;
        self
    }

    pub fn with_health(mut self, max_health: u32) -> Self {
        self.health = max_health;
        self.max_health = max_health;
        self
    }

    pub fn with_attack_strength(mut self, attack_strength: u32) -> Self {
        self.attack_strength = attack_strength;
        self
    }

    pub fn with_vision_radius(mut self, vision_radius: u32) -> Self {
        self.vision_radius = vision_radius;
        self
    }

    pub fn with_light_radius(mut self, light_radius: u32) -> Self {
        self.appearance = self.appearance.with_light_radius(light_radius);
        self
    }

    pub fn with_item(mut self, item: Item) -> Self {
        self.pick_up(item);
        self
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn appearance(&self) -> &Appearance {
        &self.appearance
    }

    pub fn name(&self) -> &str {
        self.appearance.name()
    }

    pub fn location(&self) -> Vector {
        self.appearance.location()
    }

    pub fn kind(&self) -> MobKind {
        self.kind
    }

    pub fn is_player(&self) -> bool {
        self.kind == MobKind::Player
    }

    pub fn faction(&self) -> Faction {
        self.faction
    }

    pub fn is_hostile_to(&self, other: &Mob) -> bool {
        self.faction.is_hostile_to(other.faction)
    }

    pub fn vision_radius(&self) -> u32 {
        self.vision_radius
    }

    /// Own light radius or the brightest carried item, whichever is larger.
    pub fn light_radius(&self) -> u32 {
        self.inventory
            .iter()
            .map(Item::light_radius)
            .fold(self.appearance.light_radius(), u32::max)
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    pub fn attack_strength(&self) -> u32 {
        self.attack_strength
    }

    pub fn dead(&self) -> bool {
        self.health == 0
    }

    /// Actors never share a cell.
    pub fn crossable(&self) -> bool {
        false
    }

    pub fn last_ticked_turn(&self) -> u64 {
        self.last_ticked_turn
    }

    pub fn focus(&self) -> Option<Focus> {
        self.focus
    }

    pub fn inventory(&self) -> &[Item] {
        &self.inventory
    }

    /// Item at a zero-based inventory position, for the input layer's
    /// selection menus.
    pub fn inventory_item(&self, index: usize) -> Option<&Item> {
        self.inventory.get(index)
    }

    pub(crate) fn corpse_weight(&self) -> u32 {
        Self::CORPSE_WEIGHT
    }

    pub(crate) fn set_location(&mut self, location: Vector) {
        self.appearance.set_location(location);
    }

    pub(crate) fn set_focus(&mut self, focus: Option<Focus>) {
        self.focus = focus;
    }

    /// Records that this mob acted on `turn`. Must be called exactly once per
    /// turn, in sequence.
    pub(crate) fn begin_tick(&mut self, turn: u64) -> Result<(), InvariantError> {
        let expected_last = turn.saturating_sub(1);
        if self.last_ticked_turn != expected_last {
            return Err(InvariantError::TickOutOfOrder {
                mob: self.id,
                turn,
                expected_last,
                actual_last: self.last_ticked_turn,
            });
        }
        self.last_ticked_turn = turn;
        Ok(())
    }

    /// Aligns the turn bookkeeping of a mob that enters play mid-game.
    pub(crate) fn sync_turn(&mut self, current_turn: u64) {
        self.last_ticked_turn = current_turn.saturating_sub(1);
    }

    pub(crate) fn pick_up(&mut self, mut item: Item) {
        item.set_location(self.location());
        self.inventory.push(item);
    }

    pub(crate) fn take_item(&mut self, item: EntityId) -> Result<Item, ActionFailure> {
        let index = self
            .inventory
            .iter()
            .position(|held| held.id() == item)
            .ok_or(ActionFailure::NotInInventory { item })?;
        let mut item = self.inventory.remove(index);
        item.set_location(self.location());
        Ok(item)
    }

    pub(crate) fn take_all(&mut self) -> Vec<Item> {
        let location = self.location();
        let mut items = std::mem::take(&mut self.inventory);
        for item in &mut items {
            item.set_location(location);
        }
        items
    }

    /// Subtracts up to `damage` health, returning the amount actually lost.
    pub fn attacked_for(&mut self, damage: u32) -> u32 {
        let dealt = damage.min(self.health);
        self.health -= dealt;
        dealt
    }

    /// Turns a dead mob into the things it leaves behind: a corpse followed
    /// by its whole inventory, all placed at its location.
    pub(crate) fn die(&mut self, corpse_id: EntityId) -> Vec<Item> {
        self.health = 0;
        let mut remains = vec![Item::corpse_of(corpse_id, self)];
        remains.extend(self.take_all());
        remains
    }
}

impl fmt::Display for Mob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Mob {} {} hp:{}/{}, visionRadius:{}>",
            self.id, self.appearance, self.health, self.max_health, self.vision_radius
        )
    }
}
