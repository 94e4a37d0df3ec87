use chrono::Timelike;

use crate::core::distance::DistanceFormula;
use crate::models::{QueryPoint, Venue};

/// Seconds since midnight of the clock portion only; sub-second precision,
/// date and timezone are all ignored.
#[inline]
fn clock_seconds<T: Timelike>(time: &T) -> u32 {
    time.hour() * 3600 + time.minute() * 60 + time.second()
}

/// Check if the query point is within the venue's availability radius
///
/// The radius boundary itself counts as reachable. Always measures with
/// Haversine; [`SearchEngine`](crate::core::SearchEngine) goes through
/// [`is_within_radius_using`] with its configured formula instead.
#[inline]
pub fn is_within_radius(query: &QueryPoint, venue: &Venue) -> bool {
    is_within_radius_using(DistanceFormula::Haversine, query, venue)
}

/// Same as [`is_within_radius`] with an explicit distance formula
#[inline]
pub fn is_within_radius_using(formula: DistanceFormula, query: &QueryPoint, venue: &Venue) -> bool {
    formula.distance(query.location(), venue.location()) <= f64::from(venue.availability_radius)
}

/// Check if a venue is open at the given time of day
///
/// Both ends of the window are exclusive: a venue is closed at the exact
/// second it opens and at the exact second it closes. A window that does not
/// close after it opens (e.g. spanning midnight) is never open.
#[inline]
pub fn is_open_at<T: Timelike>(now: &T, venue: &Venue) -> bool {
    let now = clock_seconds(now);
    let open = clock_seconds(&venue.open_hour);
    let close = clock_seconds(&venue.close_hour);

    open < now && now < close
}

/// Full per-venue predicate: reachable first, then open
#[inline]
pub fn matches_query(formula: DistanceFormula, query: &QueryPoint, venue: &Venue) -> bool {
    is_within_radius_using(formula, query, venue) && is_open_at(&query.at, venue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::distance::haversine_distance;
    use chrono::{NaiveDate, NaiveTime};

    fn hms(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    fn create_venue(lat: f64, lon: f64, radius: u32) -> Venue {
        Venue {
            id: 1,
            latitude: lat,
            longitude: lon,
            availability_radius: radius,
            open_hour: hms(9, 0, 0),
            close_hour: hms(18, 0, 0),
            rating: 4.0,
        }
    }

    #[test]
    fn test_open_boundaries_are_exclusive() {
        let venue = create_venue(0.0, 0.0, 5);

        assert!(!is_open_at(&hms(9, 0, 0), &venue));
        assert!(!is_open_at(&hms(18, 0, 0), &venue));
        assert!(is_open_at(&hms(9, 0, 1), &venue));
        assert!(is_open_at(&hms(17, 59, 59), &venue));
        assert!(!is_open_at(&hms(8, 0, 0), &venue));
        assert!(!is_open_at(&hms(23, 0, 0), &venue));
    }

    #[test]
    fn test_open_ignores_subsecond_and_date() {
        let venue = create_venue(0.0, 0.0, 5);

        let at_open = NaiveTime::from_hms_milli_opt(9, 0, 0, 999).unwrap();
        assert!(!is_open_at(&at_open, &venue));

        let noon = NaiveDate::from_ymd_opt(1999, 12, 31)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert!(is_open_at(&noon, &venue));
    }

    #[test]
    fn test_overnight_window_is_never_open() {
        let mut venue = create_venue(0.0, 0.0, 5);
        venue.open_hour = hms(22, 0, 0);
        venue.close_hour = hms(2, 0, 0);

        assert!(!is_open_at(&hms(23, 0, 0), &venue));
        assert!(!is_open_at(&hms(1, 0, 0), &venue));
    }

    #[test]
    fn test_radius_is_inclusive() {
        let query = QueryPoint::new(0.01, 0.0, hms(12, 0, 0));
        let distance = haversine_distance(0.01, 0.0, 0.0, 0.0);

        // Place the venue so that its radius sits exactly on the distance
        let mut venue = create_venue(0.0, 0.0, 0);
        venue.availability_radius = distance.ceil() as u32;
        assert!(is_within_radius(&query, &venue));

        // A radius below the distance is out of range
        venue.availability_radius = distance.floor() as u32;
        assert!(!is_within_radius(&query, &venue));
    }

    #[test]
    fn test_radius_boundary_exactly_equal() {
        // Query on the venue itself: distance 0 against radius 0
        let query = QueryPoint::new(10.0, 10.0, hms(12, 0, 0));
        let venue = create_venue(10.0, 10.0, 0);
        assert!(is_within_radius(&query, &venue));
    }

    #[test]
    fn test_plain_radius_check_is_haversine() {
        let venue = create_venue(0.0, 0.0, 5);
        for lat in [0.0, 0.03, 0.0449, 0.0451, 0.1, 1.0] {
            let query = QueryPoint::new(lat, 0.0, hms(12, 0, 0));
            assert_eq!(
                is_within_radius(&query, &venue),
                is_within_radius_using(DistanceFormula::Haversine, &query, &venue),
            );
        }
    }

    #[test]
    fn test_matches_query_short_circuits_on_range() {
        let venue = create_venue(0.0, 0.0, 5);

        let near_open = QueryPoint::new(0.01, 0.0, hms(12, 0, 0));
        let near_closed = QueryPoint::new(0.01, 0.0, hms(8, 0, 0));
        let far_open = QueryPoint::new(1.0, 0.0, hms(12, 0, 0));

        assert!(matches_query(DistanceFormula::Haversine, &near_open, &venue));
        assert!(!matches_query(DistanceFormula::Haversine, &near_closed, &venue));
        assert!(!matches_query(DistanceFormula::Haversine, &far_open, &venue));
    }
}
