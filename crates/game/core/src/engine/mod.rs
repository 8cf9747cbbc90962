//! Turn engine.
//!
//! [`Game`] owns every dungeon and drives the [`GameState`] machine. The
//! player's [`MobAction`] and each monster's AI decision go through the same
//! interpreter (see `interpret.rs`); the world turn then reaps the dead and
//! recomputes lighting and visibility.
mod interpret;
mod messages;
mod state;

pub use messages::{GameEvent, Message, MessageLog};
pub use state::{GameState, Trigger};

use tracing::{debug, info};

use crate::action::MobAction;
use crate::actor::Mob;
use crate::config::GameConfig;
use crate::dungeon::Dungeon;
use crate::entity::{EntityId, Feature, Item};
use crate::error::InvariantError;
use crate::geometry::Vector;
use crate::tile::Flag;

/// What one call to [`Game::step`] produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepOutcome {
    pub state: GameState,
    pub turn: u64,
    /// Messages narrated during this step, oldest first.
    pub messages: Vec<Message>,
    pub events: Vec<GameEvent>,
}

/// A running game.
#[derive(Clone, Debug)]
pub struct Game {
    config: GameConfig,
    dungeons: Vec<Dungeon>,
    current: usize,
    state: GameState,
    turn: u64,
    messages: MessageLog,
    pending_messages: Vec<Message>,
    pending_events: Vec<GameEvent>,
    next_entity_id: u32,
    dirty: bool,
}

impl Game {
    pub const WELCOME: &'static str = "Welcome to Lumen!";

    /// Starts a game in `dungeon`, placing the player at its origin.
    pub fn new(config: GameConfig, mut dungeon: Dungeon) -> Result<Self, InvariantError> {
        let player = Mob::player(&config).with_location(dungeon.origin());
        dungeon.add_mob(player)?;

        let next_entity_id = dungeon.max_entity_id().map_or(1, |id| id.0 + 1);
        let mut game = Self {
            messages: MessageLog::with_capacity(config.message_capacity),
            config,
            dungeons: vec![dungeon],
            current: 0,
            state: GameState::PlayerTurn,
            turn: 1,
            pending_messages: Vec::new(),
            pending_events: Vec::new(),
            next_entity_id,
            dirty: true,
        };
        game.resync_turns(game.current);
        game.refresh_view();
        game.messages.push(Message {
            turn: game.turn,
            text: Self::WELCOME.to_string(),
        });
        debug!(target: "lumen::engine", seed = game.config.seed, "game started");
        Ok(game)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_closed(&self) -> bool {
        self.state.is_closed()
    }

    /// Turn counter, starting at 1.
    pub fn turn(&self) -> u64 {
        self.turn
    }

    pub fn messages(&self) -> &MessageLog {
        &self.messages
    }

    /// The level the player is on.
    pub fn dungeon(&self) -> &Dungeon {
        &self.dungeons[self.current]
    }

    pub(crate) fn dungeon_mut(&mut self) -> &mut Dungeon {
        &mut self.dungeons[self.current]
    }

    pub fn dungeon_index(&self) -> usize {
        self.current
    }

    pub fn dungeon_count(&self) -> usize {
        self.dungeons.len()
    }

    pub fn dungeon_at(&self, index: usize) -> Option<&Dungeon> {
        self.dungeons.get(index)
    }

    /// The player, unless they have died and been reaped.
    pub fn player(&self) -> Option<&Mob> {
        self.dungeon().mob(EntityId::PLAYER)
    }

    /// Whether the view changed since the last call.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn allocate_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_entity_id);
        self.next_entity_id += 1;
        id
    }

    /// Adds an actor to the current level, aligned with the current turn.
    pub fn spawn_mob(&mut self, mut mob: Mob) -> Result<EntityId, InvariantError> {
        let id = mob.id();
        mob.sync_turn(self.turn);
        self.reserve(id);
        self.dungeon_mut().add_mob(mob)?;
        Ok(id)
    }

    pub fn add_feature(&mut self, feature: Feature) -> Result<(), InvariantError> {
        self.reserve(feature.id());
        self.dungeon_mut().add_feature(feature)
    }

    pub fn add_item(&mut self, item: Item) -> Result<(), InvariantError> {
        self.reserve(item.id());
        self.dungeon_mut().add_item(item)
    }

    /// Keeps allocated ids clear of ids chosen by the caller.
    fn reserve(&mut self, id: EntityId) {
        self.next_entity_id = self.next_entity_id.max(id.0 + 1);
    }

    /// Adds another independent level. Returns its index.
    pub fn add_dungeon(&mut self, dungeon: Dungeon) -> usize {
        if let Some(id) = dungeon.max_entity_id() {
            self.reserve(id);
        }
        self.dungeons.push(dungeon);
        self.dungeons.len() - 1
    }

    /// Moves the player to another level, at `arrival` or that level's origin.
    pub fn change_level(
        &mut self,
        index: usize,
        arrival: Option<Vector>,
    ) -> Result<(), InvariantError> {
        if index >= self.dungeons.len() {
            return Err(InvariantError::UnknownDungeon {
                index,
                count: self.dungeons.len(),
            });
        }
        if index == self.current {
            return Ok(());
        }

        let arrival = arrival.unwrap_or_else(|| self.dungeons[index].origin());
        let mut player = self.dungeon_mut().delete_mob(EntityId::PLAYER)?;
        let departure = player.location();
        player.set_location(arrival);
        if let Err(error) = self.dungeons[index].add_mob(player.clone()) {
            player.set_location(departure);
            self.dungeon_mut().add_mob(player)?;
            return Err(error);
        }

        let from = self.current;
        self.current = index;
        self.resync_turns(index);
        self.refresh_view();
        self.pending_events.push(GameEvent::LevelChanged { from, to: index });
        info!(target: "lumen::engine", from, to = index, "level changed");
        Ok(())
    }

    /// Aligns every actor on a level with the current turn.
    fn resync_turns(&mut self, index: usize) {
        let turn = self.turn;
        for mob in self.dungeons[index].mobs_mut() {
            mob.sync_turn(turn);
        }
    }

    /// Ends the game. Idempotent.
    pub fn close(&mut self) {
        if let Ok(next) = self.state.next(Trigger::Close) {
            self.state = next;
            debug!(target: "lumen::engine", "game closed");
        }
    }

    /// Advances the state machine by exactly one legal step.
    ///
    /// On the player's turn `action` is performed for the player; if it did
    /// not use up the turn the state stays [`GameState::PlayerTurn`]. On the
    /// world turn `action` is ignored and every other actor acts. A closed
    /// game ignores everything.
    pub fn step(&mut self, action: MobAction) -> Result<StepOutcome, InvariantError> {
        match self.state {
            GameState::PlayerTurn => {
                debug!(target: "lumen::engine", turn = self.turn, %action, "player action");
                if self.perform(EntityId::PLAYER, action)? {
                    self.transition(Trigger::PlayerActed)?;
                }
            }
            GameState::WorldTurn => self.run_world_turn()?,
            GameState::Closed => {}
        }
        Ok(self.drain_outcome())
    }

    /// Performs the player's action and, if it used up the turn, resolves the
    /// world turn as well. Messages from both steps are combined.
    pub fn play(&mut self, action: MobAction) -> Result<StepOutcome, InvariantError> {
        let mut outcome = self.step(action)?;
        if self.state == GameState::WorldTurn {
            let world = self.step(MobAction::None)?;
            outcome.messages.extend(world.messages);
            outcome.events.extend(world.events);
            outcome.state = world.state;
            outcome.turn = world.turn;
        }
        Ok(outcome)
    }

    fn run_world_turn(&mut self) -> Result<(), InvariantError> {
        let turn = self.turn;
        let seed = self.config.seed;

        for id in self.dungeon().mob_ids() {
            if self.dungeon().mob(id).is_none_or(Mob::dead) {
                continue;
            }
            let action = self.dungeon_mut().tick_mob(id, turn, seed)?;
            self.perform(id, action)?;
        }

        self.reap_dead()?;
        self.refresh_view();

        if self.player().is_none() {
            self.narrate("You die...");
            self.transition(Trigger::PlayerDied)?;
            return Ok(());
        }

        self.turn += 1;
        self.transition(Trigger::WorldResolved)
    }

    fn reap_dead(&mut self) -> Result<(), InvariantError> {
        for mob in self.dungeon_mut().reap_dead()? {
            debug!(target: "lumen::engine", mob = %mob.id(), at = %mob.location(), "reaped");
        }
        Ok(())
    }

    /// Recomputes the transient flags: light from every source, then what the
    /// player can see.
    fn refresh_view(&mut self) {
        let viewer = self
            .player()
            .map(|player| (player.location(), player.vision_radius()));
        let dungeon = self.dungeon_mut();
        dungeon.reset_flag(Flag::TRANSIENT);
        dungeon.calculate_lighting();
        if let Some((location, radius)) = viewer {
            dungeon.update_visibility(location, radius);
        }
        self.dirty = true;
    }

    fn transition(&mut self, trigger: Trigger) -> Result<(), InvariantError> {
        let next = self.state.next(trigger)?;
        debug!(
            target: "lumen::engine",
            from = %self.state,
            to = %next,
            %trigger,
            turn = self.turn,
            "state transition"
        );
        self.state = next;
        Ok(())
    }

    pub(crate) fn narrate(&mut self, text: impl Into<String>) {
        let message = Message {
            turn: self.turn,
            text: text.into(),
        };
        self.messages.push(message.clone());
        self.pending_messages.push(message);
    }

    fn drain_outcome(&mut self) -> StepOutcome {
        StepOutcome {
            state: self.state,
            turn: self.turn,
            messages: std::mem::take(&mut self.pending_messages),
            events: std::mem::take(&mut self.pending_events),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_game() -> Game {
        Game::new(GameConfig::default(), Dungeon::new(9, 9)).unwrap()
    }

    #[test]
    fn new_game_welcomes_the_player_at_origin() {
        let game = quiet_game();
        assert_eq!(game.state(), GameState::PlayerTurn);
        assert_eq!(game.turn(), 1);
        assert_eq!(game.player().unwrap().location(), Vector::new(4, 4));
        let welcome = game.messages().last().unwrap();
        assert_eq!(welcome.text, Game::WELCOME);
        assert_eq!(welcome.turn, 1);
    }

    #[test]
    fn new_game_lights_and_reveals_around_the_player() {
        let game = quiet_game();
        let here = game.player().unwrap().location();
        let tile = game.dungeon().tile(here);
        assert!(tile.lit());
        assert!(tile.visible());
        assert!(tile.seen());
    }

    #[test]
    fn wait_then_world_turn_advances_turn_once() {
        let mut game = quiet_game();
        let outcome = game.step(MobAction::Wait).unwrap();
        assert_eq!(outcome.state, GameState::WorldTurn);
        assert_eq!(outcome.turn, 1);
        let outcome = game.step(MobAction::None).unwrap();
        assert_eq!(outcome.state, GameState::PlayerTurn);
        assert_eq!(outcome.turn, 2);
    }

    #[test]
    fn none_changes_nothing() {
        let mut game = quiet_game();
        let outcome = game.step(MobAction::None).unwrap();
        assert_eq!(outcome.state, GameState::PlayerTurn);
        assert!(outcome.messages.is_empty());
        assert_eq!(game.turn(), 1);
    }

    #[test]
    fn closed_game_ignores_input() {
        let mut game = quiet_game();
        game.close();
        game.close();
        let outcome = game.step(MobAction::Wait).unwrap();
        assert_eq!(outcome.state, GameState::Closed);
        assert_eq!(game.turn(), 1);
    }

    #[test]
    fn allocated_ids_skip_reserved_ones() {
        let mut game = quiet_game();
        game.add_item(Item::new(EntityId(40), "rock", '*', 1).with_location(Vector::new(1, 1)))
            .unwrap();
        assert_eq!(game.allocate_entity_id(), EntityId(41));
        assert_eq!(game.allocate_entity_id(), EntityId(42));
    }

    #[test]
    fn spawned_mobs_join_the_next_world_turn() {
        let mut game = quiet_game();
        game.play(MobAction::Wait).unwrap();
        game.play(MobAction::Wait).unwrap();
        let id = game.allocate_entity_id();
        game.spawn_mob(Mob::monster(id, "rat", 'r').with_location(Vector::new(0, 0)))
            .unwrap();
        game.play(MobAction::Wait).unwrap();
        assert_eq!(game.dungeon().mob(id).unwrap().last_ticked_turn(), 3);
    }

    #[test]
    fn change_level_moves_player_and_resyncs() {
        let mut game = quiet_game();
        game.play(MobAction::Wait).unwrap();

        let mut lower = Dungeon::new(5, 5);
        lower
            .add_mob(Mob::monster(EntityId(30), "bat", 'b').with_location(Vector::new(0, 0)))
            .unwrap();
        let index = game.add_dungeon(lower);
        game.change_level(index, None).unwrap();

        assert_eq!(game.dungeon_index(), index);
        assert!(game.dungeon_at(0).unwrap().mob(EntityId::PLAYER).is_none());
        assert_eq!(game.player().unwrap().location(), Vector::new(2, 2));
        assert_eq!(
            game.dungeon().mob(EntityId(30)).unwrap().last_ticked_turn(),
            game.turn() - 1
        );
        game.play(MobAction::Wait).unwrap();
        assert_eq!(game.allocate_entity_id(), EntityId(31));
    }

    #[test]
    fn change_level_to_missing_index_is_fatal() {
        let mut game = quiet_game();
        assert_eq!(
            game.change_level(3, None),
            Err(InvariantError::UnknownDungeon { index: 3, count: 1 })
        );
    }
}
