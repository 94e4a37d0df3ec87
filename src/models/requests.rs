use std::collections::HashMap;
use thiserror::Error;
use validator::Validate;

/// Reasons a nearby-venues query is rejected before touching the catalog
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Missing query parameter: {0}")]
    Missing(&'static str),

    #[error("Query parameter {name} is not a number: {value:?}")]
    NotANumber { name: &'static str, value: String },

    #[error("Query parameter {name} is out of range: {value}")]
    OutOfRange { name: &'static str, value: f64 },
}

/// Coordinates of a nearby-venues request
///
/// GET /?latitude={lat}&longitude={lon}
#[derive(Debug, Clone, Copy, PartialEq, Validate)]
pub struct NearbyRequest {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

impl NearbyRequest {
    /// Build a request from raw query-string parameters
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, ValidationError> {
        let request = Self {
            latitude: coordinate(params, "latitude")?,
            longitude: coordinate(params, "longitude")?,
        };

        if let Err(errors) = request.validate() {
            let fields = errors.field_errors();
            return Err(if fields.contains_key("latitude") {
                ValidationError::OutOfRange {
                    name: "latitude",
                    value: request.latitude,
                }
            } else {
                ValidationError::OutOfRange {
                    name: "longitude",
                    value: request.longitude,
                }
            });
        }

        Ok(request)
    }
}

fn coordinate(params: &HashMap<String, String>, name: &'static str) -> Result<f64, ValidationError> {
    let raw = params
        .get(name)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .ok_or(ValidationError::Missing(name))?;

    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ValidationError::NotANumber {
            name,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_valid_coordinates() {
        let request = NearbyRequest::from_params(&params(&[("latitude", "-33.45"), ("longitude", "-70.66")])).unwrap();
        assert_eq!(request.latitude, -33.45);
        assert_eq!(request.longitude, -70.66);
    }

    #[test]
    fn test_missing_and_empty_parameters() {
        assert_eq!(
            NearbyRequest::from_params(&params(&[("latitude", "0")])),
            Err(ValidationError::Missing("longitude"))
        );
        assert_eq!(
            NearbyRequest::from_params(&params(&[("latitude", ""), ("longitude", "0")])),
            Err(ValidationError::Missing("latitude"))
        );
    }

    #[test]
    fn test_non_numeric_parameters() {
        assert!(matches!(
            NearbyRequest::from_params(&params(&[("latitude", "north"), ("longitude", "0")])),
            Err(ValidationError::NotANumber { name: "latitude", .. })
        ));
        assert!(matches!(
            NearbyRequest::from_params(&params(&[("latitude", "0"), ("longitude", "NaN")])),
            Err(ValidationError::NotANumber { name: "longitude", .. })
        ));
    }

    #[test]
    fn test_out_of_range_parameters() {
        assert!(matches!(
            NearbyRequest::from_params(&params(&[("latitude", "91"), ("longitude", "0")])),
            Err(ValidationError::OutOfRange { name: "latitude", .. })
        ));
        assert!(matches!(
            NearbyRequest::from_params(&params(&[("latitude", "0"), ("longitude", "-180.5")])),
            Err(ValidationError::OutOfRange { name: "longitude", .. })
        ));
        assert!(NearbyRequest::from_params(&params(&[("latitude", "90"), ("longitude", "180")])).is_ok());
    }
}
