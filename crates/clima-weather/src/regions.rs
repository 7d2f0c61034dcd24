//! The fixed department table and nearest-region lookup.
//!
//! Departments are compared with a planar squared distance over raw
//! latitude/longitude. They are far enough apart that a geodesic metric
//! would not change any answer.

use crate::types::Coordinates;

/// A department with representative coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

impl Region {
    const fn new(name: &'static str, latitude: f64, longitude: f64) -> Self {
        Self {
            name,
            latitude,
            longitude,
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    fn distance_sq(&self, latitude: f64, longitude: f64) -> f64 {
        let dlat = latitude - self.latitude;
        let dlon = longitude - self.longitude;
        dlat * dlat + dlon * dlon
    }
}

/// Name of the region used at startup and when location is unavailable
pub const DEFAULT_REGION_NAME: &str = "San Salvador";

/// Table order is significant: distance ties go to the earlier entry.
static REGIONS: [Region; 14] = [
    Region::new("Ahuachapán", 13.9214, -89.845),
    Region::new("Chalatenango", 14.0333, -88.9333),
    Region::new("Santa Ana", 13.9942, -89.5597),
    Region::new("Sonsonate", 13.7189, -89.7242),
    Region::new("San Salvador", 13.6929, -89.2182),
    Region::new("La Libertad", 13.6769, -89.2797),
    Region::new("Cuscatlán", 13.7167, -88.9333),
    Region::new("Cabañas", 13.8667, -88.6333),
    Region::new("La Paz", 13.5, -88.8667),
    Region::new("San Vicente", 13.6333, -88.8),
    Region::new("Usulután", 13.35, -88.45),
    Region::new("San Miguel", 13.4833, -88.1833),
    Region::new("Morazán", 13.7, -88.1),
    Region::new("La Unión", 13.3369, -87.8439),
];

/// All regions in table order.
pub fn all() -> &'static [Region] {
    &REGIONS
}

/// Region names in table order, as offered by the picker.
pub fn names() -> impl Iterator<Item = &'static str> {
    REGIONS.iter().map(|r| r.name)
}

/// Look up a region by its exact name.
pub fn find(name: &str) -> Option<&'static Region> {
    REGIONS.iter().find(|r| r.name == name)
}

/// The hardcoded default region.
pub fn default_region() -> &'static Region {
    &REGIONS[4]
}

/// Nearest region to the given coordinates. Never fails.
pub fn resolve_nearest(latitude: f64, longitude: f64) -> &'static Region {
    let nearest = nearest_in(&REGIONS, latitude, longitude).unwrap_or(default_region());
    tracing::debug!(
        "Nearest region: {} for ({}, {})",
        nearest.name,
        latitude,
        longitude
    );
    nearest
}

/// Nearest entry of `table`, or `None` when the table is empty.
///
/// Only a strictly smaller distance replaces the current best, so the
/// first of several equidistant entries wins.
pub fn nearest_in(table: &[Region], latitude: f64, longitude: f64) -> Option<&Region> {
    let (first, rest) = table.split_first()?;
    let mut nearest = first;
    let mut min_distance = first.distance_sq(latitude, longitude);

    for region in rest {
        let distance = region.distance_sq(latitude, longitude);
        if distance < min_distance {
            min_distance = distance;
            nearest = region;
        }
    }

    Some(nearest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_has_fourteen_unique_names() {
        assert_eq!(all().len(), 14);
        let mut names: Vec<_> = names().collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 14);
    }

    #[test]
    fn test_default_region_is_san_salvador() {
        assert_eq!(default_region().name, DEFAULT_REGION_NAME);
        assert_eq!(find(DEFAULT_REGION_NAME), Some(default_region()));
    }

    #[test]
    fn test_own_coordinates_resolve_to_self() {
        for region in all() {
            assert_eq!(
                resolve_nearest(region.latitude, region.longitude).name,
                region.name
            );
        }
    }

    #[test]
    fn test_resolve_is_total() {
        let samples = [
            (0.0, 0.0),
            (90.0, 180.0),
            (-90.0, -180.0),
            (13.7, -89.0),
            (1e9, -1e9),
            (f64::NAN, 0.0),
        ];
        for (lat, lon) in samples {
            let name = resolve_nearest(lat, lon).name;
            assert!(find(name).is_some(), "{name} not in table");
        }
    }

    #[test]
    fn test_nearby_points() {
        // Soyapango sits just east of the capital
        assert_eq!(resolve_nearest(13.7100, -89.1400).name, "San Salvador");
        // Gulf of Fonseca shore
        assert_eq!(resolve_nearest(13.4000, -87.9000).name, "La Unión");
        // Metapán, far north-west
        assert_eq!(resolve_nearest(14.3330, -89.4500).name, "Santa Ana");
    }

    #[test]
    fn test_tie_goes_to_earlier_entry() {
        let table = [
            Region::new("West", 0.0, -2.0),
            Region::new("East", 0.0, 2.0),
        ];
        assert_eq!(nearest_in(&table, 0.0, 0.0).map(|r| r.name), Some("West"));

        let reversed = [table[1], table[0]];
        assert_eq!(nearest_in(&reversed, 0.0, 0.0).map(|r| r.name), Some("East"));
    }

    #[test]
    fn test_empty_table() {
        assert!(nearest_in(&[], 13.0, -89.0).is_none());
    }

    #[test]
    fn test_find_unknown() {
        assert!(find("Atlantis").is_none());
        assert!(find("san salvador").is_none());
    }
}
