//! Gate identification: finding the crossing points between adjacent Zones.
//!
//! The zoning subsystem supplies Zones (districts, each a set of convex plots in world
//! space) and the road rectangles physically separating them. For every pair of Zones
//! with a shared border, the identifier locates the connecting road, samples walkable
//! grid cells along it, and emits one (or several, see [`GatePolicy`]) Gate records that
//! the precalculator later links into the abstract Graph.

use crate::{grid::NavGrid, Point, ZoneId};
use log::{debug, trace};

/// An axis-aligned world-space rectangle in the x/z plane.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// Smallest x of the rectangle.
    pub min_x: f32,
    /// Smallest z of the rectangle.
    pub min_z: f32,
    /// Largest x of the rectangle.
    pub max_x: f32,
    /// Largest z of the rectangle.
    pub max_z: f32,
}

impl Rect {
    /// Creates a Rect from its corner coordinates.
    pub fn new(min_x: f32, min_z: f32, max_x: f32, max_z: f32) -> Rect {
        Rect {
            min_x,
            min_z,
            max_x,
            max_z,
        }
    }

    fn union(&self, other: &Rect) -> Rect {
        Rect {
            min_x: self.min_x.min(other.min_x),
            min_z: self.min_z.min(other.min_z),
            max_x: self.max_x.max(other.max_x),
            max_z: self.max_z.max(other.max_z),
        }
    }
}

/// A city district: a contiguous set of convex plots.
#[derive(Clone, Debug)]
pub struct Zone {
    /// The Zone's id, unique within the city.
    pub id: ZoneId,
    /// The plots making up the Zone, in world space.
    pub plots: Vec<Rect>,
}

impl Zone {
    /// The bounding box of all plots, or `None` for an empty Zone.
    pub fn bounds(&self) -> Option<Rect> {
        let mut iter = self.plots.iter();
        let first = *iter.next()?;
        Some(iter.fold(first, |acc, plot| acc.union(plot)))
    }
}

/// A walkable grid cell chosen to represent a crossing between two adjacent Zones.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Gate {
    /// The two Zones this Gate connects.
    pub zones: (ZoneId, ZoneId),
    /// The cell the Gate sits on. Walkable on the road grid by construction.
    pub pos: Point,
}

/// How many of the walkable cells sampled along a road crossing become Gates.
///
/// Collapsing to a single representative keeps the abstract Graph small at the price of
/// routing granularity; keeping all samples gives macro routes more choices across wide
/// roads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GatePolicy {
    /// One Gate per boundary: the median of the ordered walkable samples (default).
    #[default]
    SingleRepresentative,
    /// One Gate per walkable sample.
    AllSamples,
}

/// Counters reported by a [`GateIdentifier`] run.
///
/// A boundary without a walkable cell is not an error (the Zones simply stay
/// disconnected in the abstract Graph), but it is worth surfacing, so it is counted
/// here instead of failing the scan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GateStats {
    /// Zone pairs whose bounding boxes were tested for a connecting road.
    pub pairs_scanned: usize,
    /// Zone pairs for which a connecting road was found.
    pub boundaries_found: usize,
    /// Boundaries where no walkable cell was sampled; no Gate was emitted.
    pub unconnected_boundaries: usize,
    /// Total Gates emitted.
    pub gates_emitted: usize,
}

enum Orientation {
    /// Road runs north-south between a west and an east Zone.
    Vertical,
    /// Road runs east-west between a north and a south Zone.
    Horizontal,
}

/// Scans Zone pairs for connecting roads and emits [`Gate`]s.
#[derive(Clone, Copy, Debug)]
pub struct GateIdentifier {
    /// Slack for the bounding-box adjacency test, in world units. Absorbs the
    /// floating-point error of procedurally placed plots.
    pub tolerance: f32,
    /// Gate reduction policy per boundary.
    pub policy: GatePolicy,
}

impl Default for GateIdentifier {
    fn default() -> GateIdentifier {
        GateIdentifier {
            tolerance: 0.1,
            policy: GatePolicy::default(),
        }
    }
}

impl GateIdentifier {
    /// Scans every unordered Zone pair and emits Gates for each connected boundary.
    ///
    /// `grid` must be the road-class Grid: Gates sit on road crossings, and their
    /// walkability is judged against it.
    pub fn identify(
        &self,
        zones: &[Zone],
        roads: &[Rect],
        grid: &NavGrid,
    ) -> (Vec<Gate>, GateStats) {
        let mut gates = Vec::new();
        let mut stats = GateStats::default();

        for (i, a) in zones.iter().enumerate() {
            let Some(a_bounds) = a.bounds() else { continue };
            for b in &zones[i + 1..] {
                let Some(b_bounds) = b.bounds() else { continue };
                stats.pairs_scanned += 1;

                let Some((road, orientation)) =
                    self.connecting_road(&a_bounds, &b_bounds, roads)
                else {
                    continue;
                };
                stats.boundaries_found += 1;

                let samples = self.sample_crossing(&a_bounds, &b_bounds, road, &orientation, grid);
                if samples.is_empty() {
                    stats.unconnected_boundaries += 1;
                    debug!(
                        "no walkable cell on the road between zones {} and {}; boundary left unconnected",
                        a.id, b.id
                    );
                    continue;
                }

                match self.policy {
                    GatePolicy::SingleRepresentative => {
                        let pos = samples[samples.len() / 2];
                        trace!("gate between zones {} and {} at {:?}", a.id, b.id, pos);
                        gates.push(Gate {
                            zones: (a.id, b.id),
                            pos,
                        });
                        stats.gates_emitted += 1;
                    }
                    GatePolicy::AllSamples => {
                        stats.gates_emitted += samples.len();
                        for pos in samples {
                            trace!("gate between zones {} and {} at {:?}", a.id, b.id, pos);
                            gates.push(Gate {
                                zones: (a.id, b.id),
                                pos,
                            });
                        }
                    }
                }
            }
        }

        debug!(
            "gate scan: {} pairs, {} boundaries, {} gates, {} unconnected",
            stats.pairs_scanned,
            stats.boundaries_found,
            stats.gates_emitted,
            stats.unconnected_boundaries
        );
        (gates, stats)
    }

    /// Finds the road rectangle sitting between the two Zone bounds, if any.
    fn connecting_road<'r>(
        &self,
        a: &Rect,
        b: &Rect,
        roads: &'r [Rect],
    ) -> Option<(&'r Rect, Orientation)> {
        let tol = self.tolerance;
        // normalize to (west, east) and (north, south)
        let (west, east) = if a.min_x <= b.min_x { (a, b) } else { (b, a) };
        let (north, south) = if a.min_z <= b.min_z { (a, b) } else { (b, a) };

        for road in roads {
            let vertical_fit = (road.min_x - west.max_x).abs() <= tol
                && (east.min_x - road.max_x).abs() <= tol
                && overlap(road.min_z, road.max_z, a.min_z.max(b.min_z), a.max_z.min(b.max_z))
                    > tol;
            if vertical_fit {
                return Some((road, Orientation::Vertical));
            }

            let horizontal_fit = (road.min_z - north.max_z).abs() <= tol
                && (south.min_z - road.max_z).abs() <= tol
                && overlap(road.min_x, road.max_x, a.min_x.max(b.min_x), a.max_x.min(b.max_x))
                    > tol;
            if horizontal_fit {
                return Some((road, Orientation::Horizontal));
            }
        }
        None
    }

    /// Samples walkable cells across the road within the span both Zones share.
    ///
    /// The returned cells are deduplicated and ordered along the crossing, so the median
    /// of the list is the middle of the physical boundary.
    fn sample_crossing(
        &self,
        a: &Rect,
        b: &Rect,
        road: &Rect,
        orientation: &Orientation,
        grid: &NavGrid,
    ) -> Vec<Point> {
        let step = 1.0 / grid.params().scale;
        let mut cells = Vec::new();

        match orientation {
            Orientation::Vertical => {
                let wx = (road.min_x + road.max_x) / 2.0;
                let from = a.min_z.max(b.min_z).max(road.min_z);
                let to = a.max_z.min(b.max_z).min(road.max_z);
                let mut wz = from + step / 2.0;
                while wz < to {
                    if let Some(p) = grid.to_grid(wx, wz) {
                        if grid.is_walkable(p) && cells.last() != Some(&p) {
                            cells.push(p);
                        }
                    }
                    wz += step;
                }
            }
            Orientation::Horizontal => {
                let wz = (road.min_z + road.max_z) / 2.0;
                let from = a.min_x.max(b.min_x).max(road.min_x);
                let to = a.max_x.min(b.max_x).min(road.max_x);
                let mut wx = from + step / 2.0;
                while wx < to {
                    if let Some(p) = grid.to_grid(wx, wz) {
                        if grid.is_walkable(p) && cells.last() != Some(&p) {
                            cells.push(p);
                        }
                    }
                    wx += step;
                }
            }
        }
        cells
    }
}

fn overlap(a_min: f32, a_max: f32, b_min: f32, b_max: f32) -> f32 {
    a_max.min(b_max) - a_min.max(b_min)
}
