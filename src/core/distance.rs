use serde::Deserialize;

/// Earth's radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.01;

/// Calculate the Haversine distance between two points in kilometers
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lon1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lon2` - Longitude of second point in degrees
///
/// # Returns
/// Distance in kilometers
#[inline]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push `a` just outside [0, 1] for antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Equirectangular approximation of the distance between two points
///
/// Much cheaper than Haversine, accurate for short distances away from the
/// poles. Error grows with distance and latitude.
#[inline]
pub fn equirectangular_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let mean_lat = ((lat1 + lat2) / 2.0).to_radians();
    let x = (lon2 - lon1).to_radians() * mean_lat.cos();
    let y = (lat2 - lat1).to_radians();

    EARTH_RADIUS_KM * (x * x + y * y).sqrt()
}

/// Spherical law of cosines distance between two points
///
/// Loses precision for very close points compared to Haversine.
#[inline]
pub fn spherical_cosine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let cos_angle = lat1_rad.sin() * lat2_rad.sin()
        + lat1_rad.cos() * lat2_rad.cos() * delta_lon.cos();

    EARTH_RADIUS_KM * cos_angle.clamp(-1.0, 1.0).acos()
}

/// Distance formula used when evaluating venue reachability
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceFormula {
    #[default]
    Haversine,
    Equirectangular,
    SphericalCosine,
}

impl DistanceFormula {
    /// Distance in kilometers between two `(latitude, longitude)` pairs in degrees
    #[inline]
    pub fn distance(self, from: (f64, f64), to: (f64, f64)) -> f64 {
        let (lat1, lon1) = from;
        let (lat2, lon2) = to;
        match self {
            Self::Haversine => haversine_distance(lat1, lon1, lat2, lon2),
            Self::Equirectangular => equirectangular_distance(lat1, lon1, lat2, lon2),
            Self::SphericalCosine => spherical_cosine_distance(lat1, lon1, lat2, lon2),
        }
    }
}
