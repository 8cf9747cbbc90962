//! Per-cell occupancy: at most one actor, at most one static feature, and an
//! ordered pile of items.
use crate::actor::Mob;
use crate::entity::{EntityId, Feature, Item, Occupant};
use crate::error::InvariantError;

/// The mutable occupancy record for one grid cell.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct FeatureGroup {
    actor: Option<Mob>,
    feature: Option<Feature>,
    items: Vec<Item>,
}

/// Shared empty group returned for cells nobody has touched.
pub(crate) static EMPTY_GROUP: FeatureGroup = FeatureGroup::new();

impl FeatureGroup {
    pub const fn new() -> Self {
        Self {
            actor: None,
            feature: None,
            items: Vec::new(),
        }
    }

    pub fn actor(&self) -> Option<&Mob> {
        self.actor.as_ref()
    }

    pub fn feature(&self) -> Option<&Feature> {
        self.feature.as_ref()
    }

    /// Items in the order they were put down.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.actor.is_none() && self.feature.is_none() && self.items.is_empty()
    }

    /// Every occupant: actor first, then feature, then items.
    pub fn occupants(&self) -> impl Iterator<Item = Occupant<'_>> {
        self.actor
            .iter()
            .map(Occupant::Actor)
            .chain(self.feature.iter().map(Occupant::Feature))
            .chain(self.items.iter().map(Occupant::Item))
    }

    /// True only if every occupant is individually crossable.
    pub fn crossable(&self) -> bool {
        self.occupants().all(|occupant| occupant.crossable())
    }

    /// Whether a static feature here stops light.
    pub fn blocks_light(&self) -> bool {
        self.feature.as_ref().is_some_and(Feature::blocks_light)
    }

    /// The occupant a renderer should draw: the actor, else the most
    /// recently dropped item, else the feature.
    pub fn top(&self) -> Option<Occupant<'_>> {
        self.actor
            .as_ref()
            .map(Occupant::Actor)
            .or_else(|| self.items.last().map(Occupant::Item))
            .or_else(|| self.feature.as_ref().map(Occupant::Feature))
    }

    pub(crate) fn actor_mut(&mut self) -> Option<&mut Mob> {
        self.actor.as_mut()
    }

    pub(crate) fn insert_actor(&mut self, mob: Mob) -> Result<(), InvariantError> {
        if let Some(existing) = &self.actor {
            return Err(InvariantError::DuplicateMob {
                location: mob.location(),
                existing: existing.id(),
                incoming: mob.id(),
            });
        }
        self.actor = Some(mob);
        Ok(())
    }

    /// Removes the actor only if it is `mob`.
    pub(crate) fn remove_actor(&mut self, mob: EntityId) -> Option<Mob> {
        match &self.actor {
            Some(actor) if actor.id() == mob => self.actor.take(),
            _ => None,
        }
    }

    pub(crate) fn insert_feature(&mut self, feature: Feature) -> Result<(), InvariantError> {
        if let Some(existing) = &self.feature {
            return Err(InvariantError::DuplicateFeature {
                location: feature.location(),
                existing: existing.id(),
                incoming: feature.id(),
            });
        }
        self.feature = Some(feature);
        Ok(())
    }

    pub(crate) fn remove_feature(&mut self, feature: EntityId) -> Option<Feature> {
        match &self.feature {
            Some(existing) if existing.id() == feature => self.feature.take(),
            _ => None,
        }
    }

    pub(crate) fn push_item(&mut self, item: Item) {
        self.items.push(item);
    }

    pub(crate) fn remove_item(&mut self, item: EntityId) -> Option<Item> {
        let index = self.items.iter().position(|held| held.id() == item)?;
        Some(self.items.remove(index))
    }

    pub(crate) fn take_items(&mut self) -> Vec<Item> {
        std::mem::take(&mut self.items)
    }
}
