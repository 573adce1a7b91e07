/// A grid path converted to world space, ready for an agent to walk.
///
/// Points are `[x, y, z]` with `y` fixed to the surface height of the actor class the
/// path was computed for. `length` is the cumulative Euclidean length of the polyline.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldPath {
    /// The world-space waypoints, in walk order.
    pub points: Vec<[f32; 3]>,
    /// Summed Euclidean segment lengths.
    pub length: f32,
}

impl WorldPath {
    /// Builds a WorldPath from already-converted points, computing the length.
    pub fn new(points: Vec<[f32; 3]>) -> WorldPath {
        let length = points
            .windows(2)
            .map(|seg| {
                let dx = seg[1][0] - seg[0][0];
                let dy = seg[1][1] - seg[0][1];
                let dz = seg[1][2] - seg[0][2];
                (dx * dx + dy * dy + dz * dz).sqrt()
            })
            .sum();
        WorldPath { points, length }
    }

    /// The number of waypoints.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// `true` if the path has no waypoints.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
