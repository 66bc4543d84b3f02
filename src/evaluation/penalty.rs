use crate::domain::types::{Delivery, Vehicle};

/// Total load above vehicle capacity, summed over all routes.
pub fn capacity_excess(genes: &[Vec<usize>], deliveries: &[Delivery], vehicles: &[Vehicle]) -> f64 {
    genes
        .iter()
        .zip(vehicles)
        .map(|(route, vehicle)| {
            let load = route_load(route, deliveries);
            (load - vehicle.max_capacity).max(0.0)
        })
        .sum()
}

/// Total route distance above vehicle range, summed over all routes.
///
/// `route_distances[v]` must be the depot-to-depot distance of slot `v`.
pub fn autonomy_excess(route_distances: &[f64], vehicles: &[Vehicle]) -> f64 {
    route_distances
        .iter()
        .zip(vehicles)
        .map(|(&distance, vehicle)| (distance - vehicle.max_range).max(0.0))
        .sum()
}

/// Sum of in-route positions of critical deliveries.
///
/// A critical stop served first contributes 0, served second contributes 1,
/// and so on; regular deliveries contribute nothing.
pub fn priority_delay(genes: &[Vec<usize>], deliveries: &[Delivery]) -> f64 {
    genes
        .iter()
        .flat_map(|route| route.iter().enumerate())
        .filter(|&(_, &delivery)| deliveries[delivery].priority.is_critical())
        .map(|(position, _)| position as f64)
        .sum()
}

/// Critical deliveries not served as the first stop of their route.
pub fn late_critical_stops(genes: &[Vec<usize>], deliveries: &[Delivery]) -> usize {
    genes
        .iter()
        .flat_map(|route| route.iter().enumerate())
        .filter(|&(position, &delivery)| {
            position > 0 && deliveries[delivery].priority.is_critical()
        })
        .count()
}

/// Coefficient of variation of per-route loads among used vehicles.
///
/// Empty routes are excluded; fewer than two used routes balance trivially.
pub fn load_imbalance(route_loads: &[f64]) -> f64 {
    let used: Vec<f64> = route_loads.iter().copied().filter(|&l| l > 0.0).collect();
    if used.len() < 2 {
        return 0.0;
    }

    let mean = used.iter().sum::<f64>() / used.len() as f64;
    if mean == 0.0 {
        return 0.0;
    }
    let variance = used.iter().map(|l| (l - mean).powi(2)).sum::<f64>() / used.len() as f64;
    variance.sqrt() / mean
}

/// Number of non-empty routes.
pub fn used_vehicles(genes: &[Vec<usize>]) -> usize {
    genes.iter().filter(|route| !route.is_empty()).count()
}

pub fn route_load(route: &[usize], deliveries: &[Delivery]) -> f64 {
    route.iter().map(|&d| deliveries[d].weight).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{Point, Priority};

    fn delivery(weight: f64, priority: Priority) -> Delivery {
        Delivery::new("d", Point::new(0.0, 0.0), weight, priority)
    }

    fn vehicle(capacity: f64, range: f64) -> Vehicle {
        Vehicle::new("v", capacity, range, 1.0)
    }

    #[test]
    fn capacity_excess_counts_only_overload() {
        let deliveries = vec![
            delivery(10.0, Priority::Regular),
            delivery(20.0, Priority::Regular),
            delivery(30.0, Priority::Regular),
        ];
        let vehicles = vec![vehicle(50.0, 100.0), vehicle(50.0, 100.0)];

        // All three in one route: 60 kg against 50 kg.
        let overloaded = vec![vec![0, 1, 2], vec![]];
        assert_eq!(capacity_excess(&overloaded, &deliveries, &vehicles), 10.0);

        // Split 30/30: no overload anywhere.
        let split = vec![vec![0, 1], vec![2]];
        assert_eq!(capacity_excess(&split, &deliveries, &vehicles), 0.0);
    }

    #[test]
    fn autonomy_excess_counts_only_over_range() {
        let vehicles = vec![vehicle(100.0, 50.0), vehicle(100.0, 80.0)];
        assert_eq!(autonomy_excess(&[70.0, 60.0], &vehicles), 20.0);
        assert_eq!(autonomy_excess(&[50.0, 80.0], &vehicles), 0.0);
    }

    #[test]
    fn priority_delay_grows_with_position() {
        let deliveries = vec![
            delivery(1.0, Priority::Critical),
            delivery(1.0, Priority::Regular),
            delivery(1.0, Priority::Regular),
        ];

        let first = vec![vec![0, 1, 2]];
        let last = vec![vec![1, 2, 0]];
        assert_eq!(priority_delay(&first, &deliveries), 0.0);
        assert_eq!(priority_delay(&last, &deliveries), 2.0);
        assert!(priority_delay(&first, &deliveries) < priority_delay(&last, &deliveries));

        assert_eq!(late_critical_stops(&first, &deliveries), 0);
        assert_eq!(late_critical_stops(&last, &deliveries), 1);
    }

    #[test]
    fn load_imbalance_is_zero_for_even_split() {
        assert_eq!(load_imbalance(&[30.0, 30.0]), 0.0);
        assert!(load_imbalance(&[10.0, 50.0]) > 0.0);
        // Empty slots are ignored, single used route balances trivially.
        assert_eq!(load_imbalance(&[60.0, 0.0]), 0.0);
    }

    #[test]
    fn used_vehicles_ignores_empty_slots() {
        assert_eq!(used_vehicles(&[vec![0], vec![], vec![1, 2]]), 2);
        assert_eq!(used_vehicles(&[]), 0);
    }
}
