//! One dungeon level: the terrain grid plus sparse per-cell occupancy.
//!
//! The dungeon exclusively owns its tiles and every [`FeatureGroup`]. Actors
//! live inside the group of the cell they stand on; an id → location index
//! lets callers address them by [`EntityId`]. Moving an actor removes it from
//! one group and re-inserts it into another.
mod lighting;

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::action::MobAction;
use crate::actor::{Mob, ai};
use crate::entity::{EntityId, Feature, Item};
use crate::error::InvariantError;
use crate::feature_group::{EMPTY_GROUP, FeatureGroup};
use crate::geometry::{Rect, Vector};
use crate::tile::{Flag, Tile};

/// A single level of the game.
#[derive(Clone, Debug)]
pub struct Dungeon {
    width: u32,
    height: u32,
    origin: Vector,
    tiles: Vec<Tile>,
    features: HashMap<Vector, FeatureGroup>,
    mob_index: BTreeMap<EntityId, Vector>,
}

impl Dungeon {
    /// Creates a dungeon filled with floor. The origin is the center cell.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Tile::floor())
    }

    pub fn filled(width: u32, height: u32, tile: Tile) -> Self {
        Self {
            width,
            height,
            origin: Vector::new((width / 2) as i32, (height / 2) as i32),
            tiles: vec![tile; width as usize * height as usize],
            features: HashMap::new(),
            mob_index: BTreeMap::new(),
        }
    }

    /// Builds terrain from ASCII rows: `#` is wall, anything else is floor.
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len() as u32;
        let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0) as u32;
        let mut dungeon = Self::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, glyph) in row.chars().enumerate() {
                if glyph == '#' {
                    dungeon.set_tile(Vector::new(x as i32, y as i32), Tile::wall());
                }
            }
        }
        dungeon
    }

    pub fn with_origin(mut self, origin: Vector) -> Self {
        self.origin = origin;
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn origin(&self) -> Vector {
        self.origin
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_dimensions(self.width as i32, self.height as i32)
    }

    pub fn contains(&self, location: Vector) -> bool {
        self.index(location).is_some()
    }

    fn index(&self, location: Vector) -> Option<usize> {
        let (x, y) = (location.x, location.y);
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Terrain at `location`, or [`Tile::INVALID`] outside the grid.
    pub fn tile(&self, location: Vector) -> Tile {
        self.index(location)
            .map(|index| self.tiles[index])
            .unwrap_or(Tile::INVALID)
    }

    /// Replaces terrain. Returns false when `location` is outside the grid.
    pub fn set_tile(&mut self, location: Vector, tile: Tile) -> bool {
        match self.index(location) {
            Some(index) => {
                self.tiles[index] = tile;
                true
            }
            None => false,
        }
    }

    fn tile_mut(&mut self, location: Vector) -> Option<&mut Tile> {
        self.index(location).map(move |index| &mut self.tiles[index])
    }

    /// Occupancy at `location`. Never fails; untouched cells read as empty.
    pub fn feature_group(&self, location: Vector) -> &FeatureGroup {
        self.features.get(&location).unwrap_or(&EMPTY_GROUP)
    }

    /// Mutable occupancy at `location`, created on first use.
    pub(crate) fn feature_group_mut(&mut self, location: Vector) -> &mut FeatureGroup {
        self.features.entry(location).or_default()
    }

    /// Drops the record for `location` if nothing is left in it.
    fn prune(&mut self, location: Vector) {
        if self.features.get(&location).is_some_and(FeatureGroup::is_empty) {
            self.features.remove(&location);
        }
    }

    /// Cells that hold at least one occupant.
    pub fn occupied(&self) -> impl Iterator<Item = (Vector, &FeatureGroup)> {
        self.features
            .iter()
            .filter(|(_, group)| !group.is_empty())
            .map(|(location, group)| (*location, group))
    }

    fn ensure_in_bounds(&self, entity: EntityId, location: Vector) -> Result<(), InvariantError> {
        if self.contains(location) {
            Ok(())
        } else {
            Err(InvariantError::OutOfBounds { entity, location })
        }
    }

    /// Places `mob` at its own stored location.
    pub fn add_mob(&mut self, mob: Mob) -> Result<(), InvariantError> {
        let (id, location) = (mob.id(), mob.location());
        self.ensure_in_bounds(id, location)?;
        if let Some(existing) = self.mob_index.get(&id) {
            return Err(InvariantError::DuplicateMob {
                location: *existing,
                existing: id,
                incoming: id,
            });
        }
        self.feature_group_mut(location).insert_actor(mob)?;
        self.mob_index.insert(id, location);
        Ok(())
    }

    /// Removes the mob, failing if it is not where it claims to be.
    pub fn delete_mob(&mut self, mob: EntityId) -> Result<Mob, InvariantError> {
        let location = *self
            .mob_index
            .get(&mob)
            .ok_or(InvariantError::UnknownMob { mob })?;
        let removed = self
            .features
            .get_mut(&location)
            .and_then(|group| group.remove_actor(mob))
            .ok_or(InvariantError::MissingMob { mob, location })?;
        self.mob_index.remove(&mob);
        self.prune(location);
        Ok(removed)
    }

    pub fn add_feature(&mut self, feature: Feature) -> Result<(), InvariantError> {
        let location = feature.location();
        self.ensure_in_bounds(feature.id(), location)?;
        self.feature_group_mut(location).insert_feature(feature)
    }

    pub fn delete_feature(&mut self, feature: &Feature) -> Result<Feature, InvariantError> {
        let (id, location) = (feature.id(), feature.location());
        let removed = self
            .features
            .get_mut(&location)
            .and_then(|group| group.remove_feature(id))
            .ok_or(InvariantError::MissingFeature {
                feature: id,
                location,
            })?;
        self.prune(location);
        Ok(removed)
    }

    /// Puts `item` on the ground at its own stored location.
    pub fn add_item(&mut self, item: Item) -> Result<(), InvariantError> {
        let location = item.location();
        self.ensure_in_bounds(item.id(), location)?;
        self.feature_group_mut(location).push_item(item);
        Ok(())
    }

    pub fn delete_item(&mut self, item: &Item) -> Result<Item, InvariantError> {
        let (id, location) = (item.id(), item.location());
        let removed = self
            .features
            .get_mut(&location)
            .and_then(|group| group.remove_item(id))
            .ok_or(InvariantError::MissingItem { item: id, location })?;
        self.prune(location);
        Ok(removed)
    }

    /// Removes and returns every item lying at `location`.
    pub(crate) fn take_items(&mut self, location: Vector) -> Vec<Item> {
        let items = self
            .features
            .get_mut(&location)
            .map(FeatureGroup::take_items)
            .unwrap_or_default();
        self.prune(location);
        items
    }

    /// Attempts to move `mob` by `delta`.
    ///
    /// Succeeds only if both the destination tile and its occupants are
    /// crossable. Returns `Ok(false)` without touching anything otherwise.
    pub fn move_mob(&mut self, mob: EntityId, delta: Vector) -> Result<bool, InvariantError> {
        let origin = *self
            .mob_index
            .get(&mob)
            .ok_or(InvariantError::UnknownMob { mob })?;
        let destination = origin + delta;

        if !self.tile(destination).crossable() || !self.feature_group(destination).crossable() {
            return Ok(false);
        }

        let mut moving = self.delete_mob(mob)?;
        moving.set_location(destination);
        self.add_mob(moving)?;
        debug!(target: "lumen::dungeon", %mob, from = %origin, to = %destination, "mob moved");
        Ok(true)
    }

    pub fn mob(&self, mob: EntityId) -> Option<&Mob> {
        let location = self.mob_index.get(&mob)?;
        self.features.get(location)?.actor()
    }

    pub(crate) fn mob_mut(&mut self, mob: EntityId) -> Option<&mut Mob> {
        let location = self.mob_index.get(&mob)?;
        self.features.get_mut(location)?.actor_mut()
    }

    pub(crate) fn expect_mob(&self, mob: EntityId) -> Result<&Mob, InvariantError> {
        self.mob(mob).ok_or(InvariantError::UnknownMob { mob })
    }

    pub(crate) fn expect_mob_mut(&mut self, mob: EntityId) -> Result<&mut Mob, InvariantError> {
        self.mob_mut(mob).ok_or(InvariantError::UnknownMob { mob })
    }

    pub fn mob_at(&self, location: Vector) -> Option<&Mob> {
        self.feature_group(location).actor()
    }

    /// Every actor currently present, in ascending id order.
    pub fn mobs(&self) -> Vec<&Mob> {
        self.mob_index.keys().filter_map(|id| self.mob(*id)).collect()
    }

    /// Snapshot of actor ids, in ascending id order.
    pub fn mob_ids(&self) -> Vec<EntityId> {
        self.mob_index.keys().copied().collect()
    }

    pub(crate) fn mobs_mut(&mut self) -> impl Iterator<Item = &mut Mob> {
        self.features
            .values_mut()
            .filter_map(FeatureGroup::actor_mut)
    }

    /// Removes every dead actor. Returns them in id order.
    pub fn reap_dead(&mut self) -> Result<Vec<Mob>, InvariantError> {
        let dead: Vec<EntityId> = self
            .mobs()
            .into_iter()
            .filter(|mob| mob.dead())
            .map(Mob::id)
            .collect();
        dead.into_iter().map(|id| self.delete_mob(id)).collect()
    }

    /// Runs one actor's turn bookkeeping and decision for `turn`.
    ///
    /// Fails if the actor already acted this turn or skipped a turn. The
    /// chosen focus is stored on the actor; the action is returned for the
    /// engine to dispatch.
    pub fn tick_mob(
        &mut self,
        mob: EntityId,
        turn: u64,
        game_seed: u64,
    ) -> Result<MobAction, InvariantError> {
        self.expect_mob_mut(mob)?.begin_tick(turn)?;
        let decision = ai::decide(self.expect_mob(mob)?, self, turn, game_seed);
        self.expect_mob_mut(mob)?.set_focus(decision.focus);
        Ok(decision.action)
    }

    /// Highest id among everything in this dungeon, carried items included.
    pub(crate) fn max_entity_id(&self) -> Option<EntityId> {
        self.occupied()
            .flat_map(|(_, group)| {
                let carried = group
                    .actor()
                    .into_iter()
                    .flat_map(|mob| mob.inventory().iter().map(Item::id));
                group.occupants().map(|occupant| occupant.id()).chain(carried)
            })
            .max()
    }

    /// Clears `flag` on every tile.
    pub fn reset_flag(&mut self, flag: Flag) {
        for tile in &mut self.tiles {
            tile.clear(flag);
        }
    }
}
