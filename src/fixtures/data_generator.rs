use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use crate::domain::types::{Delivery, Point, Priority, Vehicle};

/// Roughly one in four synthetic deliveries is critical.
const CRITICAL_SHARE: f64 = 0.25;

/// Generate a deterministic synthetic instance for demos and benchmarks.
///
/// Deliveries are scattered up to ~15 km around the depot with demands in
/// the 15–90 kg range; the fleet cycles through a few van profiles. The
/// same seed always yields the same instance.
pub fn generate_instance(
    delivery_count: usize,
    vehicle_count: usize,
    seed: u64,
) -> (Vec<Delivery>, Vec<Vehicle>, Point) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let depot = Point::new(1.3521, 103.8198);

    let deliveries: Vec<Delivery> = (0..delivery_count)
        .map(|i| {
            // ~0.13 degrees is ~15 km at this latitude.
            let lat = depot.lat + rng.gen_range(-0.13..0.13);
            let lon = depot.lon + rng.gen_range(-0.13..0.13);
            let weight = rng.gen_range(15.0..=90.0_f64).round();
            let priority = if rng.gen_bool(CRITICAL_SHARE) {
                Priority::Critical
            } else {
                Priority::Regular
            };
            Delivery::new(format!("D{:03}", i + 1), Point::new(lat, lon), weight, priority)
        })
        .collect();

    // A small mixed fleet: capacity in kg, range in km, cost per km.
    let profiles = [(600.0, 160.0, 1.2), (450.0, 140.0, 1.0), (300.0, 120.0, 0.8)];
    let vehicles: Vec<Vehicle> = (0..vehicle_count)
        .map(|i| {
            let (capacity, range, cost) = profiles[i % profiles.len()];
            Vehicle::new(format!("V{:02}", i + 1), capacity, range, cost)
        })
        .collect();

    let total_demand: f64 = deliveries.iter().map(|d| d.weight).sum();
    let total_capacity: f64 = vehicles.iter().map(|v| v.max_capacity).sum();
    info!(
        "Generated {} deliveries ({:.0} kg total) for {} vehicles ({:.0} kg total)",
        deliveries.len(),
        total_demand,
        vehicles.len(),
        total_capacity
    );
    if total_capacity < total_demand {
        warn!(
            "Total fleet capacity ({:.0} kg) is below total demand ({:.0} kg); \
             the solver will surface the excess via penalties",
            total_capacity, total_demand
        );
    }

    (deliveries, vehicles, depot)
}
