//! Recursive shadowcasting field of view.
//!
//! Implementation of Björn Bergström's recursive shadowcasting: the area
//! around an origin is split into eight octants, each reduced to the same
//! row-scanning routine through a coordinate transform. Each row is scanned
//! from the steep edge toward the shallow edge while a `[end, start]` slope
//! interval tracks the part of the octant not yet shadowed. A blocking cell
//! spawns a child scan for the next row restricted to the slopes in front of
//! it and narrows the parent's interval past it.
//!
//! Octants are scanned in parallel. Each task writes into its own buffer and
//! the buffers are merged after the join, so no cell is ever written from two
//! threads.

use rayon::prelude::*;

use crate::geometry::{Rect, Vector};

/// Read-only grid queried by the shadowcaster.
pub trait Opacity: Sync {
    /// Cells that exist. Everything outside is skipped.
    fn bounds(&self) -> Rect;

    /// Whether `location` stops light and sight.
    fn blocks_light(&self, location: Vector) -> bool;
}

/// Sign/swap multipliers `xx, xy, yx, yy` for each of the eight octants.
const OCTANT_TRANSFORMS: [[i32; 8]; 4] = [
    [1, 0, 0, -1, -1, 0, 0, 1],
    [0, 1, -1, 0, 0, -1, 1, 0],
    [0, 1, 1, 0, 0, -1, -1, 0],
    [1, 0, 0, 1, -1, 0, 0, -1],
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Octant {
    xx: i32,
    xy: i32,
    yx: i32,
    yy: i32,
}

impl Octant {
    fn new(index: usize) -> Self {
        Self {
            xx: OCTANT_TRANSFORMS[0][index],
            xy: OCTANT_TRANSFORMS[1][index],
            yx: OCTANT_TRANSFORMS[2][index],
            yy: OCTANT_TRANSFORMS[3][index],
        }
    }

    /// Maps octant-local `(dx, dy)` to a grid location.
    fn transform(&self, origin: Vector, dx: i32, dy: i32) -> Vector {
        Vector::new(
            origin.x + dx * self.xx + dy * self.xy,
            origin.y + dx * self.yx + dy * self.yy,
        )
    }
}

/// Cells reached by one shadowcast, in row-major order without duplicates.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct FieldOfView {
    origin: Vector,
    radius: u32,
    cells: Vec<Vector>,
}

impl FieldOfView {
    fn from_cells(origin: Vector, radius: u32, mut cells: Vec<Vector>) -> Self {
        cells.sort_unstable_by_key(|cell| row_major(*cell));
        cells.dedup();
        Self {
            origin,
            radius,
            cells,
        }
    }

    pub fn origin(&self) -> Vector {
        self.origin
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn contains(&self, location: Vector) -> bool {
        self.cells
            .binary_search_by_key(&row_major(location), |cell| row_major(*cell))
            .is_ok()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Vector> + '_ {
        self.cells.iter().copied()
    }
}

impl IntoIterator for FieldOfView {
    type Item = Vector;
    type IntoIter = std::vec::IntoIter<Vector>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.into_iter()
    }
}

fn row_major(location: Vector) -> (i32, i32) {
    (location.y, location.x)
}

/// Computes every cell within `radius` of `origin` with a clear line of sight.
///
/// The origin itself is always included when it lies inside the grid. Other
/// cells are included only when their squared distance is strictly less than
/// `radius²`. Blocking cells that are reached are included; cells behind them
/// are not.
///
/// Rows past the far edge of the grid hold no cells, so the scan stops at the
/// grid's reach however large `radius` is.
pub fn shadowcast<G>(grid: &G, origin: Vector, radius: u32) -> FieldOfView
where
    G: Opacity + ?Sized,
{
    let bounds = grid.bounds();
    if !bounds.contains(origin) {
        return FieldOfView::from_cells(origin, radius, Vec::new());
    }

    let reach = bounds.width().max(bounds.height());
    let rows = i32::try_from(radius).map_or(reach, |radius| radius.min(reach));
    let radius_squared = u64::from(radius) * u64::from(radius);

    let mut cells: Vec<Vector> = (0..8)
        .into_par_iter()
        .flat_map_iter(|index| {
            let mut scan = OctantScan {
                grid,
                bounds,
                origin,
                rows,
                radius_squared,
                octant: Octant::new(index),
                cells: Vec::new(),
            };
            scan.scan(1, 1.0, 0.0);
            scan.cells
        })
        .collect();
    cells.push(origin);

    FieldOfView::from_cells(origin, radius, cells)
}

/// Computes one field of view per source in parallel.
pub fn shadowcast_many<G>(grid: &G, sources: &[(Vector, u32)]) -> Vec<FieldOfView>
where
    G: Opacity + ?Sized,
{
    sources
        .par_iter()
        .map(|&(origin, radius)| shadowcast(grid, origin, radius))
        .collect()
}

/// One octant's scan state. Owns its private output buffer.
struct OctantScan<'a, G: ?Sized> {
    grid: &'a G,
    bounds: Rect,
    origin: Vector,
    /// Last row scanned: the radius, capped at the grid's reach.
    rows: i32,
    radius_squared: u64,
    octant: Octant,
    cells: Vec<Vector>,
}

impl<G> OctantScan<'_, G>
where
    G: Opacity + ?Sized,
{
    fn scan(&mut self, row: i32, mut start_slope: f64, end_slope: f64) {
        if start_slope < end_slope {
            return;
        }

        let mut new_start_slope = 0.0;

        for distance in row..=self.rows {
            let dy = -distance;
            let mut blocked = false;

            for dx in -distance..=0 {
                let location = self.octant.transform(self.origin, dx, dy);
                if !self.bounds.contains(location) {
                    continue;
                }

                // slopes of the cell's left and right extremities
                let (fdx, fdy) = (f64::from(dx), f64::from(dy));
                let left_slope = (fdx - 0.5) / (fdy + 0.5);
                let right_slope = (fdx + 0.5) / (fdy - 0.5);

                if start_slope < right_slope {
                    continue;
                }
                if end_slope > left_slope {
                    break;
                }

                if Vector::new(dx, dy).length_squared().unsigned_abs() < self.radius_squared {
                    self.cells.push(location);
                }

                let opaque = self.grid.blocks_light(location);
                if blocked {
                    if opaque {
                        new_start_slope = right_slope;
                        continue;
                    }
                    blocked = false;
                    start_slope = new_start_slope;
                } else if opaque && distance < self.rows {
                    blocked = true;
                    self.scan(distance + 1, start_slope, left_slope);
                    new_start_slope = right_slope;
                }
            }

            if blocked {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    struct TestGrid {
        width: i32,
        height: i32,
        walls: HashSet<Vector>,
    }

    impl TestGrid {
        fn open(width: i32, height: i32) -> Self {
            Self {
                width,
                height,
                walls: HashSet::new(),
            }
        }

        fn with_wall(mut self, location: Vector) -> Self {
            self.walls.insert(location);
            self
        }
    }

    impl Opacity for TestGrid {
        fn bounds(&self) -> Rect {
            Rect::from_dimensions(self.width, self.height)
        }

        fn blocks_light(&self, location: Vector) -> bool {
            self.walls.contains(&location)
        }
    }

    #[test]
    fn octant_table_covers_all_eight_sign_swaps() {
        let origin = Vector::ZERO;
        let images: HashSet<Vector> = (0..8)
            .map(|index| Octant::new(index).transform(origin, -1, -2))
            .collect();
        assert_eq!(images.len(), 8);
    }

    #[test]
    fn open_room_lights_exact_disk() {
        let grid = TestGrid::open(21, 21);
        let center = Vector::new(10, 10);
        let radius = 5;
        let fov = shadowcast(&grid, center, radius);

        let expected: Vec<Vector> = grid
            .bounds()
            .cells()
            .filter(|cell| (*cell - center).length_squared() < i64::from(radius * radius))
            .collect();
        assert_eq!(fov.iter().collect::<Vec<_>>(), expected);
        assert_eq!(fov.len(), 69);
    }

    #[test]
    fn single_wall_shadows_cells_behind_it() {
        let grid = TestGrid::open(11, 11).with_wall(Vector::new(7, 5));
        let fov = shadowcast(&grid, Vector::new(5, 5), 5);

        assert!(fov.contains(Vector::new(7, 5)), "the wall itself is lit");
        assert!(!fov.contains(Vector::new(8, 5)));
        assert!(!fov.contains(Vector::new(9, 5)));
        assert!(fov.contains(Vector::new(8, 4)));
        assert!(fov.contains(Vector::new(8, 6)));
    }

    #[test]
    fn full_wall_blocks_everything_behind() {
        let mut grid = TestGrid::open(11, 11);
        for y in 0..11 {
            grid = grid.with_wall(Vector::new(7, y));
        }
        let fov = shadowcast(&grid, Vector::new(5, 5), 8);
        assert!(fov.iter().all(|cell| cell.x <= 7));
        assert!((0..11).all(|y| fov.contains(Vector::new(7, y))));
    }

    #[test]
    fn corridor_limits_sight_to_its_walls() {
        let mut grid = TestGrid::open(11, 11);
        for cell in Rect::from_dimensions(11, 11).cells() {
            if cell.y != 5 {
                grid = grid.with_wall(cell);
            }
        }
        let fov = shadowcast(&grid, Vector::new(1, 5), 6);
        assert!(fov.iter().all(|cell| (4..=6).contains(&cell.y)));
        assert!(fov.contains(Vector::new(6, 5)));
        assert!(!fov.contains(Vector::new(7, 5)), "beyond radius");
        assert_eq!(fov.len(), 21);
    }

    #[test]
    fn corner_origin_is_clipped_to_grid() {
        let grid = TestGrid::open(5, 5);
        let fov = shadowcast(&grid, Vector::ZERO, 3);
        let expected: Vec<Vector> = Rect::from_dimensions(3, 3).cells().collect();
        assert_eq!(fov.iter().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn zero_radius_sees_only_origin() {
        let grid = TestGrid::open(5, 5);
        let fov = shadowcast(&grid, Vector::new(2, 2), 0);
        assert_eq!(fov.iter().collect::<Vec<_>>(), vec![Vector::new(2, 2)]);
    }

    #[test]
    fn origin_outside_grid_sees_nothing() {
        let grid = TestGrid::open(5, 5);
        assert!(shadowcast(&grid, Vector::new(-1, 2), 3).is_empty());
    }

    #[test]
    fn oversized_radius_matches_grid_reach() {
        let grid = TestGrid::open(5, 5).with_wall(Vector::new(3, 2));
        let origin = Vector::new(2, 2);
        let reach = shadowcast(&grid, origin, 8);
        for radius in [50, 5_000, u32::MAX] {
            let fov = shadowcast(&grid, origin, radius);
            assert_eq!(fov.iter().collect::<Vec<_>>(), reach.iter().collect::<Vec<_>>());
            assert_eq!(fov.radius(), radius);
        }
        assert!(!reach.contains(Vector::new(4, 2)));
        assert_eq!(shadowcast(&TestGrid::open(5, 5), origin, u32::MAX).len(), 25);
    }

    #[test]
    fn many_sources_match_individual_casts() {
        let grid = TestGrid::open(15, 15).with_wall(Vector::new(7, 7));
        let sources = [(Vector::new(2, 2), 4), (Vector::new(12, 12), 3)];
        let fields = shadowcast_many(&grid, &sources);
        assert_eq!(fields.len(), 2);
        for (field, (origin, radius)) in fields.iter().zip(sources) {
            assert_eq!(*field, shadowcast(&grid, origin, radius));
        }
    }
}
