//! Identity and appearance shared by everything that occupies a cell.
//!
//! Actors, static features, and items each embed an [`Appearance`] by value
//! and expose it through explicit accessors. [`Occupant`] is the closed
//! variant used for polymorphic queries over a cell's contents.
use std::fmt;

use crate::actor::Mob;
use crate::config::GameConfig;
use crate::geometry::Vector;
use crate::tile::{Color, Flag};

/// Unique identifier for any entity placed in a dungeon or carried by an actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl EntityId {
    /// Reserved identifier for the controllable player character.
    pub const PLAYER: Self = Self(0);

    #[inline]
    pub const fn is_player(self) -> bool {
        self.0 == Self::PLAYER.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Geometry and rendering payload common to every entity kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Appearance {
    name: String,
    glyph: char,
    color: Color,
    location: Vector,
    flags: Flag,
    light_radius: u32,
}

impl Appearance {
    pub fn new(name: impl Into<String>, glyph: char) -> Self {
        Self {
            name: name.into(),
            glyph,
            color: Color::Default,
            location: Vector::ZERO,
            flags: Flag::empty(),
            light_radius: 0,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_location(mut self, location: Vector) -> Self {
        self.location = location;
        self
    }

    pub fn with_flags(mut self, flags: Flag) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_light_radius(mut self, light_radius: u32) -> Self {
        self.light_radius = light_radius;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn glyph(&self) -> char {
        self.glyph
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn location(&self) -> Vector {
        self.location
    }

    pub fn flags(&self) -> Flag {
        self.flags
    }

    pub fn light_radius(&self) -> u32 {
        self.light_radius
    }

    pub(crate) fn set_location(&mut self, location: Vector) {
        self.location = location;
    }
}

impl fmt::Display for Appearance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<{} char:{}, loc:{}, flags:{}, lightRadius:{}>",
            self.name, self.glyph, self.location, self.flags, self.light_radius
        )
    }
}

/// A static, non-carryable fixture such as a torch sconce or a staircase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Feature {
    id: EntityId,
    appearance: Appearance,
}

impl Feature {
    pub fn new(id: EntityId, appearance: Appearance) -> Self {
        Self { id, appearance }
    }

    /// A crossable wall sconce that emits light.
    pub fn torch(id: EntityId, location: Vector, light_radius: u32) -> Self {
        Self::new(
            id,
            Appearance::new("torch", '*')
                .with_color(Color::Yellow)
                .with_location(location)
                .with_flags(Flag::CROSSABLE)
                .with_light_radius(light_radius),
        )
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn appearance(&self) -> &Appearance {
        &self.appearance
    }

    pub fn location(&self) -> Vector {
        self.appearance.location()
    }

    pub fn crossable(&self) -> bool {
        self.appearance.flags().contains(Flag::CROSSABLE)
    }

    pub fn blocks_light(&self) -> bool {
        self.appearance.flags().contains(Flag::BLOCKS_LIGHT)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Feature {} {}>", self.id, self.appearance)
    }
}

/// Item categories with behavior the engine cares about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ItemKind {
    #[default]
    Misc,
    /// Remains of a dead actor. Blocks its cell.
    Corpse,
    /// Melee weapon. Attacks still deal the wielder's base strength.
    Weapon { attack_strength: u32 },
}

/// A carryable thing. Owned either by exactly one dungeon cell or by exactly
/// one actor's inventory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Item {
    id: EntityId,
    appearance: Appearance,
    weight: u32,
    kind: ItemKind,
}

impl Item {
    pub fn new(id: EntityId, name: impl Into<String>, glyph: char, weight: u32) -> Self {
        Self {
            id,
            appearance: Appearance::new(name, glyph).with_flags(Flag::CROSSABLE),
            weight,
            kind: ItemKind::Misc,
        }
    }

    /// Corpse left behind by `mob`, placed at its last location.
    pub fn corpse_of(id: EntityId, mob: &Mob) -> Self {
        Self {
            id,
            appearance: Appearance::new(
                format!("{} corpse", mob.name()),
                GameConfig::CORPSE_GLYPH,
            )
            .with_color(Color::Red)
            .with_location(mob.location())
            .with_flags(Flag::BLOCKING),
            weight: mob.corpse_weight(),
            kind: ItemKind::Corpse,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.appearance = self.appearance.with_color(color);
        self
    }

    pub fn with_location(mut self, location: Vector) -> Self {
        self.appearance.set_location(location);
        self
    }

    pub fn with_light_radius(mut self, light_radius: u32) -> Self {
        self.appearance = self.appearance.with_light_radius(light_radius);
        self
    }

    pub fn with_kind(mut self, kind: ItemKind) -> Self {
        self.kind = kind;
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

    pub fn weight(&self) -> u32 {
        self.weight
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    /// Strength recorded on a weapon, `None` for anything else.
    pub fn attack_strength(&self) -> Option<u32> {
        match self.kind {
            ItemKind::Weapon { attack_strength } => Some(attack_strength),
            _ => None,
        }
    }

    pub fn light_radius(&self) -> u32 {
        self.appearance.light_radius()
    }

    pub fn crossable(&self) -> bool {
        let flags = self.appearance.flags();
        flags.contains(Flag::CROSSABLE) && !flags.contains(Flag::BLOCKING)
    }

    pub(crate) fn set_location(&mut self, location: Vector) {
        self.appearance.set_location(location);
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Item {} {} kind:{}, weight:{}>",
            self.id, self.appearance, self.kind, self.weight
        )
    }
}

/// Borrowed view over one occupant of a cell.
#[derive(Clone, Copy, Debug)]
pub enum Occupant<'a> {
    Actor(&'a Mob),
    Feature(&'a Feature),
    Item(&'a Item),
}

impl<'a> Occupant<'a> {
    pub fn id(&self) -> EntityId {
        match self {
            Occupant::Actor(mob) => mob.id(),
            Occupant::Feature(feature) => feature.id(),
            Occupant::Item(item) => item.id(),
        }
    }

    pub fn appearance(&self) -> &'a Appearance {
        match self {
            Occupant::Actor(mob) => mob.appearance(),
            Occupant::Feature(feature) => feature.appearance(),
            Occupant::Item(item) => item.appearance(),
        }
    }

    pub fn name(&self) -> &'a str {
        self.appearance().name()
    }

    pub fn glyph(&self) -> char {
        self.appearance().glyph()
    }

    pub fn color(&self) -> Color {
        self.appearance().color()
    }

    pub fn flags(&self) -> Flag {
        self.appearance().flags()
    }

    /// Effective light radius; for actors this includes carried items.
    pub fn light_radius(&self) -> u32 {
        match self {
            Occupant::Actor(mob) => mob.light_radius(),
            Occupant::Feature(feature) => feature.appearance().light_radius(),
            Occupant::Item(item) => item.light_radius(),
        }
    }

    pub fn crossable(&self) -> bool {
        match self {
            Occupant::Actor(mob) => mob.crossable(),
            Occupant::Feature(feature) => feature.crossable(),
            Occupant::Item(item) => item.crossable(),
        }
    }
}
