//! Lighting and perception passes over a [`Dungeon`].
//!
//! Shadowcasts only read the grid. Their results come back as private cell
//! sets and are folded into the tile arena here, on the calling thread.
use tracing::trace;

use crate::entity::Occupant;
use crate::fov::{self, FieldOfView, Opacity};
use crate::geometry::{Rect, Vector};
use crate::tile::{Flag, Tile};

use super::Dungeon;

impl Opacity for Dungeon {
    fn bounds(&self) -> Rect {
        Dungeon::bounds(self)
    }

    fn blocks_light(&self, location: Vector) -> bool {
        self.tile(location).blocks_light() || self.feature_group(location).blocks_light()
    }
}

impl Dungeon {
    /// Every actor or feature that emits light, as `(location, radius)` pairs
    /// sorted by location. Items glow only while carried.
    pub fn light_sources(&self) -> Vec<(Vector, u32)> {
        let mut sources: Vec<(Vector, u32)> = self
            .occupied()
            .flat_map(|(location, group)| {
                group
                    .occupants()
                    .filter(|occupant| !matches!(occupant, Occupant::Item(_)))
                    .map(|occupant| occupant.light_radius())
                    .filter(|radius| *radius > 0)
                    .map(move |radius| (location, radius))
            })
            .collect();
        sources.sort_unstable_by_key(|(location, radius)| (location.y, location.x, *radius));
        sources
    }

    /// Cells visible from `origin` within `radius`.
    pub fn field_of_view(&self, origin: Vector, radius: u32) -> FieldOfView {
        fov::shadowcast(self, origin, radius)
    }

    /// Flags [`Flag::LIT`] on every tile reached by any light source.
    ///
    /// Does not clear previous results; call [`Dungeon::reset_flag`] first.
    pub fn calculate_lighting(&mut self) {
        let sources = self.light_sources();
        let fields = fov::shadowcast_many(self, &sources);

        let mut lit = 0usize;
        for field in &fields {
            lit += field.len();
            self.flag_cells(field.iter(), Flag::LIT);
        }
        trace!(
            target: "lumen::lighting",
            sources = sources.len(),
            cells = lit,
            "lighting pass complete"
        );
    }

    /// Calls `visit` once per tile visible from `origin`, in row-major order.
    pub fn on_tiles_in_line_of_sight<F>(&self, origin: Vector, radius: u32, mut visit: F)
    where
        F: FnMut(Vector, Tile),
    {
        for location in self.field_of_view(origin, radius) {
            visit(location, self.tile(location));
        }
    }

    /// Sets `flag` on every tile visible from `origin`.
    pub fn flag_by_line_of_sight(&mut self, origin: Vector, radius: u32, flag: Flag) {
        let field = self.field_of_view(origin, radius);
        self.flag_cells(field.iter(), flag);
    }

    /// Marks the viewer's field of view [`Flag::VISIBLE`] and [`Flag::SEEN`].
    pub fn update_visibility(&mut self, viewer: Vector, vision_radius: u32) {
        self.flag_by_line_of_sight(viewer, vision_radius, Flag::VISIBLE | Flag::SEEN);
    }

    fn flag_cells(&mut self, cells: impl Iterator<Item = Vector>, flag: Flag) {
        for location in cells {
            if let Some(tile) = self.tile_mut(location) {
                tile.set(flag);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::actor::Mob;
    use crate::entity::{EntityId, Feature, Item};

    use super::*;

    fn open(width: u32, height: u32) -> Dungeon {
        Dungeon::new(width, height)
    }

    fn lit_cells(dungeon: &Dungeon) -> Vec<Vector> {
        dungeon
            .bounds()
            .cells()
            .filter(|cell| dungeon.tile(*cell).lit())
            .collect()
    }

    #[test]
    fn torch_lights_a_disk() {
        let mut dungeon = open(11, 11);
        let center = Vector::new(5, 5);
        dungeon
            .add_feature(Feature::torch(EntityId(1), center, 3))
            .unwrap();
        dungeon.calculate_lighting();

        let expected: Vec<Vector> = dungeon
            .bounds()
            .cells()
            .filter(|cell| (*cell - center).length_squared() < 9)
            .collect();
        assert_eq!(lit_cells(&dungeon), expected);
    }

    #[test]
    fn overlapping_sources_merge() {
        let mut dungeon = open(12, 5);
        dungeon
            .add_feature(Feature::torch(EntityId(1), Vector::new(2, 2), 2))
            .unwrap();
        dungeon
            .add_mob(
                Mob::monster(EntityId(2), "glowworm", 'w')
                    .with_location(Vector::new(9, 2))
                    .with_light_radius(2),
            )
            .unwrap();
        dungeon.calculate_lighting();

        assert!(dungeon.tile(Vector::new(2, 2)).lit());
        assert!(dungeon.tile(Vector::new(9, 2)).lit());
        assert!(!dungeon.tile(Vector::new(5, 2)).lit());
    }

    #[test]
    fn light_sources_skip_dark_occupants() {
        let mut dungeon = open(5, 5);
        dungeon
            .add_mob(Mob::monster(EntityId(1), "rat", 'r').with_location(Vector::new(1, 1)))
            .unwrap();
        dungeon
            .add_feature(Feature::torch(EntityId(2), Vector::new(3, 3), 4))
            .unwrap();
        assert_eq!(dungeon.light_sources(), vec![(Vector::new(3, 3), 4)]);
    }

    #[test]
    fn lanterns_glow_only_when_carried() {
        let mut dungeon = open(9, 9);
        let lantern = |id| Item::new(EntityId(id), "lantern", '(', 4).with_light_radius(3);
        dungeon
            .add_item(lantern(1).with_location(Vector::new(1, 1)))
            .unwrap();
        dungeon
            .add_mob(
                Mob::monster(EntityId(2), "kobold", 'k')
                    .with_location(Vector::new(6, 6))
                    .with_item(lantern(3)),
            )
            .unwrap();

        assert_eq!(dungeon.light_sources(), vec![(Vector::new(6, 6), 3)]);
        dungeon.calculate_lighting();
        assert!(!dungeon.tile(Vector::new(1, 1)).lit());
        assert!(dungeon.tile(Vector::new(6, 6)).lit());
    }

    #[test]
    fn reset_then_recalculate_is_not_incremental() {
        let mut dungeon = open(9, 9);
        let torch = Feature::torch(EntityId(1), Vector::new(1, 1), 2);
        dungeon.add_feature(torch.clone()).unwrap();
        dungeon.calculate_lighting();
        assert!(dungeon.tile(Vector::new(1, 1)).lit());

        dungeon.delete_feature(&torch).unwrap();
        dungeon.reset_flag(Flag::TRANSIENT);
        dungeon.calculate_lighting();
        assert!(lit_cells(&dungeon).is_empty());
    }

    #[test]
    fn visibility_sets_seen_which_survives_reset() {
        let mut dungeon = open(9, 9);
        dungeon.update_visibility(Vector::new(4, 4), 2);
        let cell = Vector::new(4, 3);
        assert!(dungeon.tile(cell).visible());
        assert!(dungeon.tile(cell).seen());

        dungeon.reset_flag(Flag::TRANSIENT);
        assert!(!dungeon.tile(cell).visible());
        assert!(dungeon.tile(cell).seen());
    }

    #[test]
    fn line_of_sight_visits_each_tile_once() {
        let dungeon = Dungeon::from_rows(&[
            ".....", //
            ".....", //
            "..#..", //
            ".....", //
            ".....",
        ]);
        let mut visited = Vec::new();
        dungeon.on_tiles_in_line_of_sight(Vector::new(2, 4), 5, |location, tile| {
            visited.push((location, tile.blocks_light()));
        });
        let mut unique = visited.clone();
        unique.dedup();
        assert_eq!(visited, unique);
        assert!(visited.contains(&(Vector::new(2, 2), true)));
        assert!(!visited.iter().any(|(location, _)| *location == Vector::new(2, 0)));
    }
}
