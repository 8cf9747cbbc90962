/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    /// Base seed for every deterministic roll (AI wandering).
    pub seed: u64,
    /// Number of narrated messages retained in the log.
    pub message_capacity: usize,
    pub player_vision_radius: u32,
    pub player_light_radius: u32,
    pub player_max_health: u32,
    pub player_attack_strength: u32,
}

impl GameConfig {
    // ===== compile-time constants =====
    pub const DEFAULT_DUNGEON_WIDTH: u32 = 256;
    pub const DEFAULT_DUNGEON_HEIGHT: u32 = 256;
    pub const CORPSE_GLYPH: char = '%';
    /// Upper bound accepted for configured vision and light radii.
    pub const MAX_SIGHT_RADIUS: u32 = 1024;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_SEED: u64 = 0;
    pub const DEFAULT_MESSAGE_CAPACITY: usize = 64;
    /// How far the player can see.
    pub const PLAYER_VISION_RADIUS: u32 = 100;
    /// How far the player emits light.
    pub const PLAYER_LIGHT_RADIUS: u32 = 2;
    pub const PLAYER_MAX_HEALTH: u32 = 20;
    pub const PLAYER_ATTACK_STRENGTH: u32 = 3;
    pub const DEFAULT_MOB_VISION_RADIUS: u32 = 8;
    pub const DEFAULT_MOB_MAX_HEALTH: u32 = 6;
    pub const DEFAULT_MOB_ATTACK_STRENGTH: u32 = 1;

    pub fn new() -> Self {
        Self {
            seed: Self::DEFAULT_SEED,
            message_capacity: Self::DEFAULT_MESSAGE_CAPACITY,
            player_vision_radius: Self::PLAYER_VISION_RADIUS,
            player_light_radius: Self::PLAYER_LIGHT_RADIUS,
            player_max_health: Self::PLAYER_MAX_HEALTH,
            player_attack_strength: Self::PLAYER_ATTACK_STRENGTH,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_message_capacity(mut self, capacity: usize) -> Self {
        self.message_capacity = capacity.max(1);
        self
    }

    pub fn with_player_vision_radius(mut self, radius: u32) -> Self {
        self.player_vision_radius = radius;
        self
    }

    pub fn with_player_light_radius(mut self, radius: u32) -> Self {
        self.player_light_radius = radius;
        self
    }

    pub fn with_player_health(mut self, max_health: u32) -> Self {
        self.player_max_health = max_health;
        self
    }

    pub fn with_player_attack_strength(mut self, strength: u32) -> Self {
        self.player_attack_strength = strength;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
