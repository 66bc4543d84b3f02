use tracing::info;

use crate::distance::provider::DistanceProvider;
use crate::domain::types::{Delivery, Point};
use crate::error::SolverError;

/// Read-only memoized distances for one run.
///
/// Row and column 0 are the depot; delivery `i` sits at index `i + 1`. The
/// point-pair set is small and static for a run, so every pair is resolved
/// once up-front and the provider is never called during evolution. Owned
/// by the run, not shared process-wide.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    cells: Vec<Vec<f64>>,
}

impl DistanceMatrix {
    /// Resolve all depot/delivery pairs through `provider`.
    ///
    /// Any provider failure aborts the build and propagates.
    pub fn build(
        depot: Point,
        deliveries: &[Delivery],
        provider: &dyn DistanceProvider,
    ) -> Result<Self, SolverError> {
        let points: Vec<Point> = std::iter::once(depot)
            .chain(deliveries.iter().map(|d| d.location))
            .collect();

        let n = points.len();
        let mut cells = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    cells[i][j] = provider.distance(points[i], points[j])?;
                }
            }
        }

        info!(
            "Built distance matrix for {} deliveries ({} point pairs)",
            deliveries.len(),
            n * n - n
        );

        Ok(Self { cells })
    }

    pub fn depot_to(&self, delivery: usize) -> f64 {
        self.cells[0][delivery + 1]
    }

    pub fn to_depot(&self, delivery: usize) -> f64 {
        self.cells[delivery + 1][0]
    }

    pub fn between(&self, from: usize, to: usize) -> f64 {
        self.cells[from + 1][to + 1]
    }

    /// Number of deliveries covered.
    pub fn len(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
