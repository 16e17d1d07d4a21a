use std::collections::HashMap;
use std::collections::hash_map::{Entry, Values};

use crate::error::SamplerError;
use crate::sample::{Sample, distance_sq};

/// Number of cells a neighbor query may always walk, however few samples the grid holds.
const WALK_BUDGET: usize = 4096;

/// A sparse acceleration grid over accepted samples.
///
/// Cells are cubes of side `cell_size`, addressed by integer coordinates relative to the
/// grid origin. With `cell_size = radius / sqrt(D)` a cell can hold at most one sample,
/// so each cell maps to a single index into the sample list that owns the samples.
///
/// Neighbor queries walk the cells around the query position axis by axis, starting at the
/// center cell and moving outwards, and drop every branch whose partial distance is already
/// out of reach. Only when the box around the search ball exceeds both 4096 cells and the
/// number of occupied cells (high dimensions, or a search radius far above the cell size) are
/// the occupied cells scanned instead.
#[derive(Clone, Debug)]
pub struct SpatialGrid<const D: usize> {
    /// Position of the corner of cell `[0; D]`.
    origin: [f64; D],
    /// Side length of a cell.
    cell_size: f64,
    /// Occupied cells, mapped to the index of their sample.
    cells: HashMap<[i64; D], usize>,
}

impl<const D: usize> SpatialGrid<D> {
    /// Creates an empty grid. `cell_size` must be positive.
    pub fn new(origin: [f64; D], cell_size: f64) -> Self {
        debug_assert!(cell_size > 0.0, "cell size must be positive");
        SpatialGrid {
            origin,
            cell_size,
            cells: HashMap::new(),
        }
    }

    /// The cell size that guarantees at most one sample per cell for the given radius.
    pub fn cell_size_for(radius: f64) -> f64 {
        radius / (D as f64).sqrt()
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn origin(&self) -> [f64; D] {
        self.origin
    }

    /// Number of occupied cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Index of the sample stored in `cell`, if any.
    pub fn get(&self, cell: &[i64; D]) -> Option<usize> {
        self.cells.get(cell).copied()
    }

    /// Maps a position to the coordinate of the cell containing it.
    pub fn cell_of(&self, position: &[f64; D]) -> [i64; D] {
        std::array::from_fn(|i| ((position[i] - self.origin[i]) / self.cell_size).floor() as i64)
    }

    /// Number of cells along each axis that a search of `search_radius` may have to inspect.
    pub fn reach(&self, search_radius: f64) -> i64 {
        (search_radius / self.cell_size).ceil() as i64
    }

    /// Records the sample `index` at `position` and returns its cell.
    ///
    /// Fails if the cell is already taken, which means the separation invariant was broken
    /// by whoever produced the position.
    pub fn insert(&mut self, index: usize, position: &[f64; D]) -> Result<[i64; D], SamplerError> {
        let cell = self.cell_of(position);
        match self.cells.entry(cell) {
            Entry::Occupied(entry) => Err(SamplerError::CellOccupied {
                cell: cell.to_vec(),
                occupant: *entry.get(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(index);
                Ok(cell)
            }
        }
    }

    /// Samples strictly closer than `search_radius` to `position`.
    ///
    /// `samples` is the list the grid indexes into. The order of the results is unspecified.
    pub fn neighbors_within_radius<'a>(
        &'a self,
        samples: &'a [Sample<D>],
        position: [f64; D],
        search_radius: f64,
    ) -> impl Iterator<Item = &'a Sample<D>> + 'a {
        let limit = search_radius * search_radius;
        let candidates = if self.walk_is_cheaper(search_radius) {
            Candidates::Walk {
                walk: CellWalk::new(self, position, search_radius),
                cells: &self.cells,
            }
        } else {
            Candidates::Scan(self.cells.values())
        };
        candidates
            .map(move |index| &samples[index])
            .filter(move |sample| distance_sq(&sample.position, &position) < limit)
    }

    /// The cells a walk of `search_radius` around `position` inspects, in visiting order.
    ///
    /// The center cell comes first. The number of cells grows with `(search_radius / cell_size)^D`.
    pub fn visited_cells(&self, position: &[f64; D], search_radius: f64) -> Vec<[i64; D]> {
        CellWalk::new(self, *position, search_radius).collect()
    }

    fn walk_is_cheaper(&self, search_radius: f64) -> bool {
        let side = (2 * self.reach(search_radius) + 1) as f64;
        side.powi(D as i32) <= WALK_BUDGET.max(self.cells.len()) as f64
    }

    /// Distance along `axis` from `coordinate` to the cell `cell` on that axis.
    fn axis_gap(&self, axis: usize, cell: i64, coordinate: f64) -> f64 {
        let lo = self.origin[axis] + cell as f64 * self.cell_size;
        let hi = lo + self.cell_size;
        if coordinate < lo {
            lo - coordinate
        } else if coordinate > hi {
            coordinate - hi
        } else {
            0.0
        }
    }
}

/// Sample indices a query has to test.
enum Candidates<'a, const D: usize> {
    Walk {
        walk: CellWalk<'a, D>,
        cells: &'a HashMap<[i64; D], usize>,
    },
    Scan(Values<'a, [i64; D], usize>),
}

impl<const D: usize> Iterator for Candidates<'_, D> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        match self {
            Candidates::Walk { walk, cells } => walk.find_map(|cell| cells.get(&cell).copied()),
            Candidates::Scan(values) => values.next().copied(),
        }
    }
}

/// Odometer over the cells closer than a search radius to a position.
///
/// Each axis steps through the offsets `0, -1, 1, -2, 2, ...` of the center cell. An axis is
/// exhausted once even its nearest remaining offset cannot fit in the radius left over by the
/// axes before it.
struct CellWalk<'a, const D: usize> {
    grid: &'a SpatialGrid<D>,
    position: [f64; D],
    center: [i64; D],
    limit: f64,
    /// Position of every axis in its offset sequence.
    index: [usize; D],
    /// Squared distance accumulated over axes `0..=i` for the current indices.
    prefix: [f64; D],
    started: bool,
    done: bool,
}

impl<'a, const D: usize> CellWalk<'a, D> {
    fn new(grid: &'a SpatialGrid<D>, position: [f64; D], search_radius: f64) -> Self {
        CellWalk {
            grid,
            position,
            center: grid.cell_of(&position),
            limit: search_radius * search_radius,
            index: [0; D],
            prefix: [0.0; D],
            started: false,
            done: D == 0,
        }
    }

    /// Moves `axis` forward from its current index to the first cell that still fits.
    fn settle(&mut self, axis: usize) -> bool {
        let before = if axis == 0 { 0.0 } else { self.prefix[axis - 1] };
        loop {
            let j = self.index[axis];
            let nearest = (offset_magnitude(j) - 1).max(0) as f64 * self.grid.cell_size;
            if before + nearest * nearest >= self.limit {
                return false;
            }
            let cell = self.center[axis] + offset_at(j);
            let gap = self.grid.axis_gap(axis, cell, self.position[axis]);
            if before + gap * gap < self.limit {
                self.prefix[axis] = before + gap * gap;
                return true;
            }
            self.index[axis] += 1;
        }
    }
}

impl<const D: usize> Iterator for CellWalk<'_, D> {
    type Item = [i64; D];

    fn next(&mut self) -> Option<[i64; D]> {
        if self.done {
            return None;
        }
        let mut axis = if self.started {
            self.index[D - 1] += 1;
            D - 1
        } else {
            self.started = true;
            0
        };
        loop {
            if self.settle(axis) {
                if axis + 1 == D {
                    return Some(std::array::from_fn(|i| self.center[i] + offset_at(self.index[i])));
                }
                axis += 1;
                self.index[axis] = 0;
            } else if axis == 0 {
                self.done = true;
                return None;
            } else {
                axis -= 1;
                self.index[axis] += 1;
            }
        }
    }
}

/// Offset of the `j`-th step of the sequence `0, -1, 1, -2, 2, ...`.
fn offset_at(j: usize) -> i64 {
    let magnitude = offset_magnitude(j);
    if j % 2 == 1 { -magnitude } else { magnitude }
}

fn offset_magnitude(j: usize) -> i64 {
    j.div_ceil(2) as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{RandomSource, seeded};

    #[test]
    fn test_cell_indexing() {
        let grid = SpatialGrid::<2>::new([0.0, 0.0], 1.0);
        assert_eq!(grid.cell_of(&[0.5, 0.5]), [0, 0]);
        assert_eq!(grid.cell_of(&[1.5, 0.5]), [1, 0]);
        assert_eq!(grid.cell_of(&[0.5, 1.5]), [0, 1]);
        assert_eq!(grid.cell_of(&[-0.5, 2.0]), [-1, 2]);
    }

    #[test]
    fn test_cell_indexing_with_origin() {
        let grid = SpatialGrid::<3>::new([10.0, -5.0, 0.0], 2.0);
        assert_eq!(grid.cell_of(&[10.0, -5.0, 0.0]), [0, 0, 0]);
        assert_eq!(grid.cell_of(&[13.9, -0.9, 5.0]), [1, 2, 2]);
    }

    #[test]
    fn test_offset_sequence() {
        let offsets: Vec<i64> = (0..7).map(offset_at).collect();
        assert_eq!(offsets, vec![0, -1, 1, -2, 2, -3, 3]);
    }

    #[test]
    fn test_insert_rejects_occupied_cell() {
        let mut grid = SpatialGrid::<2>::new([0.0, 0.0], 1.0);
        assert_eq!(grid.insert(0, &[0.2, 0.2]), Ok([0, 0]));
        assert_eq!(
            grid.insert(1, &[0.8, 0.9]),
            Err(SamplerError::CellOccupied { cell: vec![0, 0], occupant: 0 })
        );
        assert_eq!(grid.len(), 1);
        assert_eq!(grid.get(&[0, 0]), Some(0));
    }

    #[test]
    fn test_neighbors_filter_by_distance() {
        let radius = 2.0;
        let mut grid = SpatialGrid::<2>::new([0.0, 0.0], SpatialGrid::<2>::cell_size_for(radius));
        let samples = vec![
            Sample::new([1.0, 1.0], radius),
            Sample::new([2.5, 1.0], radius),
            Sample::new([7.0, 7.0], radius),
        ];
        for (i, s) in samples.iter().enumerate() {
            grid.insert(i, &s.position).unwrap();
        }

        let found: Vec<_> = grid.neighbors_within_radius(&samples, [1.2, 1.0], radius).collect();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|s| s.position[0] < 3.0));

        let found: Vec<_> = grid.neighbors_within_radius(&samples, [7.0, 5.5], radius).collect();
        assert_eq!(found, vec![&samples[2]]);
    }

    fn assert_matches_brute_force<const D: usize>(side: f64, radius: f64, count: usize, searches: &[f64]) {
        let mut grid = SpatialGrid::<D>::new([0.0; D], SpatialGrid::<D>::cell_size_for(radius));
        let mut rng = seeded(3);
        let mut samples: Vec<Sample<D>> = Vec::new();
        let mut attempts = 0;
        while samples.len() < count && attempts < 100_000 {
            attempts += 1;
            let p: [f64; D] = std::array::from_fn(|_| rng.next_float() * side);
            if samples.iter().all(|s| !s.conflicts_with(&p, radius)) {
                grid.insert(samples.len(), &p).unwrap();
                samples.push(Sample::new(p, radius));
            }
        }

        for &search in searches {
            for _ in 0..50 {
                let q: [f64; D] = std::array::from_fn(|_| rng.next_float() * side);
                let mut found: Vec<_> = grid
                    .neighbors_within_radius(&samples, q, search)
                    .map(|s| s.position)
                    .collect();
                let mut expected: Vec<_> = samples
                    .iter()
                    .filter(|s| s.distance_sq(&q) < search * search)
                    .map(|s| s.position)
                    .collect();
                found.sort_by(|a, b| a.partial_cmp(b).unwrap());
                expected.sort_by(|a, b| a.partial_cmp(b).unwrap());
                assert_eq!(found, expected, "search radius {} in {}D", search, D);
            }
        }
    }

    #[test]
    fn test_neighbors_match_brute_force() {
        // Small searches walk the cells, the 2D radius of 30 and every 12D search scan.
        assert_matches_brute_force::<2>(20.0, 1.0, 200, &[0.5, 1.0, 2.5, 4.0, 30.0]);
        assert_matches_brute_force::<3>(10.0, 1.0, 200, &[0.5, 1.0, 2.5, 4.0]);
        assert_matches_brute_force::<12>(3.0, 1.0, 300, &[1.0, 2.0]);

        let grid = SpatialGrid::<2>::new([0.0; 2], SpatialGrid::<2>::cell_size_for(1.0));
        assert!(grid.walk_is_cheaper(4.0));
        assert!(!grid.walk_is_cheaper(30.0));
        let grid = SpatialGrid::<12>::new([0.0; 12], SpatialGrid::<12>::cell_size_for(1.0));
        assert!(!grid.walk_is_cheaper(1.0));
    }

    #[test]
    fn test_walk_matches_cell_distance() {
        let grid = SpatialGrid::<2>::new([0.0, 0.0], 1.0);
        let position = [3.3, 4.8];
        let mut cells = grid.visited_cells(&position, 2.5);
        let mut expected = Vec::new();
        for x in -2..=7 {
            for y in -2..=7 {
                let gap_x = grid.axis_gap(0, x, position[0]);
                let gap_y = grid.axis_gap(1, y, position[1]);
                if gap_x * gap_x + gap_y * gap_y < 2.5 * 2.5 {
                    expected.push([x, y]);
                }
            }
        }
        assert_eq!(cells[0], grid.cell_of(&position));
        cells.sort();
        expected.sort();
        assert_eq!(cells, expected);
    }

    #[test]
    fn test_visited_cells_stay_within_reach() {
        let grid = SpatialGrid::<3>::new([0.0; 3], SpatialGrid::<3>::cell_size_for(8.0));
        let position = [25.3, 17.1, 40.9];
        let center = grid.cell_of(&position);
        let reach = grid.reach(8.0);
        let cells = grid.visited_cells(&position, 8.0);

        assert!(!cells.is_empty());
        assert_eq!(cells[0], center, "nearest cell is visited first");
        for cell in &cells {
            for i in 0..3 {
                assert!((cell[i] - center[i]).abs() <= reach);
            }
        }
        let side = (2 * reach + 1) as usize;
        assert!(cells.len() < side.pow(3), "corner cells are pruned");
    }

    #[test]
    fn test_huge_search_radius_on_sparse_grid() {
        // A reach of 1415 cells per axis: only scanning the two samples is affordable.
        let mut grid = SpatialGrid::<2>::new([0.0, 0.0], SpatialGrid::<2>::cell_size_for(0.05));
        let samples = vec![Sample::new([10.0, 10.0], 50.0), Sample::new([90.0, 90.0], 50.0)];
        for (i, s) in samples.iter().enumerate() {
            grid.insert(i, &s.position).unwrap();
        }
        assert_eq!(grid.neighbors_within_radius(&samples, [50.0, 50.0], 50.0).count(), 0);
        assert_eq!(grid.neighbors_within_radius(&samples, [40.0, 40.0], 50.0).count(), 1);
        assert_eq!(grid.neighbors_within_radius(&samples, [50.0, 50.0], 60.0).count(), 2);
    }
}
