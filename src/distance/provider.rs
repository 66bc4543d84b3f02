use crate::domain::types::Point;
use crate::error::SolverError;

/// Synchronous source of point-pair distances in kilometers.
///
/// Implementations must be deterministic within one run; results are
/// memoized by [`DistanceMatrix`](crate::distance::matrix::DistanceMatrix),
/// so each pair is requested at most once. Any error aborts the run.
pub trait DistanceProvider {
    fn distance(&self, from: Point, to: Point) -> Result<f64, SolverError>;
}

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance on a spherical earth.
#[derive(Debug, Clone, Copy, Default)]
pub struct HaversineDistance;

impl DistanceProvider for HaversineDistance {
    fn distance(&self, from: Point, to: Point) -> Result<f64, SolverError> {
        let d_lat = (to.lat - from.lat).to_radians();
        let d_lon = (to.lon - from.lon).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + from.lat.to_radians().cos() * to.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        Ok(EARTH_RADIUS_KM * c)
    }
}

/// Straight-line distance treating coordinates as planar kilometers.
///
/// Suited to synthetic or already-projected instances where spherical
/// corrections are noise.
#[derive(Debug, Clone, Copy, Default)]
pub struct EuclideanDistance;

impl DistanceProvider for EuclideanDistance {
    fn distance(&self, from: Point, to: Point) -> Result<f64, SolverError> {
        let dx = to.lat - from.lat;
        let dy = to.lon - from.lon;
        Ok((dx * dx + dy * dy).sqrt())
    }
}
