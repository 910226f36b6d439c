//! Fare estimation. Pure and deterministic: coordinates and an hour of day
//! in, road distance and price out.

pub const BASE_FARE: f64 = 30.00;
pub const PER_KM_RATE: f64 = 5.00;
pub const PEAK_MULTIPLIER: f64 = 1.5;

/// Straight-line distance underestimates the road route; 20% is close
/// enough for a quote.
pub const ROAD_ROUTE_FACTOR: f64 = 1.2;

const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct FareEstimate {
    pub distance_km: f64,
    pub fare: f64,
    pub peak: bool,
}

/// Calculate distance between two coordinates using Haversine formula
/// Returns distance in kilometers
pub fn haversine_distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Morning (07:00-09:00) and evening (16:00-18:00) rush, inclusive on both
/// ends.
pub fn is_peak_hour(hour: u32) -> bool {
    (7..=9).contains(&hour) || (16..=18).contains(&hour)
}

/// Estimate the fare for a trip between two coordinates at a given hour of
/// day (0-23). Distance and fare are rounded to 2 decimal places.
pub fn estimate_fare(
    pickup_lat: f64,
    pickup_lng: f64,
    dropoff_lat: f64,
    dropoff_lng: f64,
    hour: u32,
) -> FareEstimate {
    let distance_km =
        haversine_distance(pickup_lat, pickup_lng, dropoff_lat, dropoff_lng) * ROAD_ROUTE_FACTOR;

    let peak = is_peak_hour(hour);
    let multiplier = if peak { PEAK_MULTIPLIER } else { 1.0 };
    let fare = (BASE_FARE + distance_km * PER_KM_RATE) * multiplier;

    FareEstimate {
        distance_km: round2(distance_km),
        fare: round2(fare),
        peak,
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    // Port of Spain and Arima, roughly 25 km apart by road
    const POS: (f64, f64) = (10.6596, -61.5019);
    const ARIMA: (f64, f64) = (10.6373, -61.2833);

    #[test]
    fn test_haversine_port_of_spain_arima() {
        let distance = haversine_distance(POS.0, POS.1, ARIMA.0, ARIMA.1);
        assert!(distance > 20.0 && distance < 28.0);
    }

    #[test]
    fn test_haversine_symmetric() {
        let ab = haversine_distance(POS.0, POS.1, ARIMA.0, ARIMA.1);
        let ba = haversine_distance(ARIMA.0, ARIMA.1, POS.0, POS.1);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn test_haversine_zero_at_identity() {
        assert_eq!(haversine_distance(POS.0, POS.1, POS.0, POS.1), 0.0);
    }

    #[test]
    fn test_zero_distance_off_peak_is_base_fare() {
        let estimate = estimate_fare(POS.0, POS.1, POS.0, POS.1, 12);
        assert_eq!(estimate.distance_km, 0.0);
        assert_eq!(estimate.fare, 30.00);
        assert!(!estimate.peak);
    }

    #[test]
    fn test_fare_monotone_in_distance() {
        let near = estimate_fare(10.65, -61.50, 10.66, -61.50, 12);
        let far = estimate_fare(10.65, -61.50, 10.70, -61.40, 12);
        assert!(far.distance_km > near.distance_km);
        assert!(far.fare >= near.fare);
    }

    #[test]
    fn test_peak_is_one_and_a_half_times_off_peak() {
        let off_peak = estimate_fare(POS.0, POS.1, ARIMA.0, ARIMA.1, 12);
        let peak = estimate_fare(POS.0, POS.1, ARIMA.0, ARIMA.1, 8);
        assert!(peak.peak);
        assert!((peak.fare - 1.5 * off_peak.fare).abs() < 0.02);
    }

    #[test]
    fn test_peak_hour_boundaries() {
        for hour in [7, 8, 9, 16, 17, 18] {
            assert!(is_peak_hour(hour), "hour {hour}");
        }
        for hour in [0, 6, 10, 15, 19, 23] {
            assert!(!is_peak_hour(hour), "hour {hour}");
        }
    }

    #[test]
    fn test_morning_rush_scenario() {
        // Booking at 08:00 across Trinidad's east-west corridor
        let estimate = estimate_fare(10.65, -61.50, 10.70, -61.40, 8);
        let expected_km =
            haversine_distance(10.65, -61.50, 10.70, -61.40) * ROAD_ROUTE_FACTOR;
        assert!((estimate.distance_km - expected_km).abs() < 0.01);
        let expected_fare = (BASE_FARE + expected_km * PER_KM_RATE) * PEAK_MULTIPLIER;
        assert!((estimate.fare - expected_fare).abs() < 0.01);
    }
}
