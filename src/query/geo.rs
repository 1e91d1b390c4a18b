//! GeoJSON points and great-circle distance.
//!
//! Coordinates follow GeoJSON order: `[longitude, latitude]`.

use crate::errors::DbError;
use bson::{Bson, Document as BsonDocument};
use serde::{Deserialize, Serialize};

/// Sphere radius used for 2dsphere distances, in meters.
pub const EARTH_RADIUS_M: f64 = 6_378_100.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lng: f64,
    pub lat: f64,
}

impl GeoPoint {
    /// # Errors
    /// Returns `DbError::InvalidGeometry` if either coordinate is out of range or not finite.
    pub fn new(lng: f64, lat: f64) -> Result<Self, DbError> {
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(DbError::InvalidGeometry(format!("longitude out of bounds: {lng}")));
        }
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(DbError::InvalidGeometry(format!("latitude out of bounds: {lat}")));
        }
        Ok(Self { lng, lat })
    }

    /// Parses a `[lng, lat]` coordinate array.
    ///
    /// # Errors
    /// Returns `DbError::InvalidGeometry` unless `value` is an array of exactly two numbers in range.
    pub fn from_coordinates(value: &Bson) -> Result<Self, DbError> {
        let Bson::Array(items) = value else {
            return Err(DbError::InvalidGeometry(format!("coordinates must be an array, got {value}")));
        };
        if items.len() != 2 {
            return Err(DbError::InvalidGeometry(format!(
                "point must have exactly two coordinates, got {}",
                items.len()
            )));
        }
        let lng = bson_number(&items[0])
            .ok_or_else(|| DbError::InvalidGeometry(format!("non-numeric longitude: {}", items[0])))?;
        let lat = bson_number(&items[1])
            .ok_or_else(|| DbError::InvalidGeometry(format!("non-numeric latitude: {}", items[1])))?;
        Self::new(lng, lat)
    }

    /// Parses a GeoJSON `{type: "Point", coordinates: [lng, lat]}` document.
    ///
    /// # Errors
    /// Returns `DbError::InvalidGeometry` for any other shape.
    pub fn from_geojson(geometry: &BsonDocument) -> Result<Self, DbError> {
        match geometry.get("type") {
            Some(Bson::String(t)) if t == "Point" => {}
            Some(other) => {
                return Err(DbError::InvalidGeometry(format!("unsupported geometry type: {other}")));
            }
            None => return Err(DbError::InvalidGeometry("geometry is missing a type".into())),
        }
        let coords = geometry
            .get("coordinates")
            .ok_or_else(|| DbError::InvalidGeometry("geometry is missing coordinates".into()))?;
        Self::from_coordinates(coords)
    }

    /// Reads a stored location: either a GeoJSON point or a legacy `[lng, lat]` pair.
    /// Anything else is treated as "no location" and never matches a proximity filter.
    #[must_use]
    pub fn from_stored(value: &Bson) -> Option<Self> {
        match value {
            Bson::Document(d) => Self::from_geojson(d).ok(),
            Bson::Array(_) => Self::from_coordinates(value).ok(),
            _ => None,
        }
    }

    /// Great-circle distance in meters.
    #[must_use]
    pub fn distance_m(&self, other: &Self) -> f64 {
        let (lat1, lat2) = (self.lat.to_radians(), other.lat.to_radians());
        let dlat = lat2 - lat1;
        let dlng = (other.lng - self.lng).to_radians();
        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_M * a.sqrt().min(1.0).asin()
    }
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn bson_number(v: &Bson) -> Option<f64> {
    match v {
        Bson::Int32(i) => Some(f64::from(*i)),
        Bson::Int64(i) => Some(*i as f64),
        Bson::Double(f) => Some(*f),
        Bson::Decimal128(d) => d.to_string().parse::<f64>().ok(),
        _ => None,
    }
}
