//! Patient-to-practitioner proximity.

use wellmatch_model::{GeoPoint, LocationOptions};

/// Proximity of one practitioner to the patient.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LocationScore {
    /// Proximity in `[0, 1]`.
    pub score: f64,
    /// Great-circle distance; `None` when either side has no coordinates.
    pub distance_km: Option<f64>,
    pub same_city: bool,
}

/// Great-circle distance between two points (haversine).
pub fn haversine_km(from: GeoPoint, to: GeoPoint, earth_radius_km: f64) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lng = (to.lng - from.lng).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + from.lat.to_radians().cos() * to.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.clamp(0.0, 1.0).sqrt().atan2((1.0 - a.clamp(0.0, 1.0)).sqrt());
    earth_radius_km * c
}

/// Scores proximity between canonical city names.
///
/// Same city scores 1.0. Two known cities score linearly by distance,
/// reaching zero at `max_distance_km`. Anything else gets the fixed
/// `unknown_score`.
pub fn location_score(
    patient_city: Option<&str>,
    practitioner_city: Option<&str>,
    options: &LocationOptions,
) -> LocationScore {
    let (Some(patient), Some(practitioner)) = (patient_city, practitioner_city) else {
        return unknown(options);
    };
    if patient == practitioner {
        return LocationScore {
            score: 1.0,
            distance_km: Some(0.0),
            same_city: true,
        };
    }

    let (Some(from), Some(to)) = (options.coordinates(patient), options.coordinates(practitioner))
    else {
        return unknown(options);
    };
    let distance = haversine_km(from, to, options.earth_radius_km);
    LocationScore {
        score: (1.0 - distance / options.max_distance_km).clamp(0.0, 1.0),
        distance_km: Some(distance),
        same_city: false,
    }
}

fn unknown(options: &LocationOptions) -> LocationScore {
    LocationScore {
        score: options.unknown_score.clamp(0.0, 1.0),
        distance_km: None,
        same_city: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mumbai_to_pune_is_about_120_km() {
        let options = LocationOptions::default();
        let distance = haversine_km(
            options.coordinates("mumbai").unwrap(),
            options.coordinates("pune").unwrap(),
            options.earth_radius_km,
        );
        assert!((115.0..125.0).contains(&distance), "{distance}");
    }

    #[test]
    fn same_city_is_full_score() {
        let score = location_score(Some("mumbai"), Some("mumbai"), &LocationOptions::default());
        assert_eq!(score.score, 1.0);
        assert!(score.same_city);
    }

    #[test]
    fn same_unlisted_city_still_matches() {
        let score = location_score(Some("nashik"), Some("nashik"), &LocationOptions::default());
        assert_eq!(score.score, 1.0);
    }

    #[test]
    fn distance_decays_linearly() {
        let score = location_score(Some("mumbai"), Some("pune"), &LocationOptions::default());
        assert!(score.score > 0.9 && score.score < 0.95, "{}", score.score);
        assert!(!score.same_city);

        let far = location_score(Some("delhi"), Some("chennai"), &LocationOptions::default());
        assert!(far.score < 0.2, "{}", far.score);
    }

    #[test]
    fn unknown_side_gets_fixed_score() {
        let options = LocationOptions::default();
        for (patient, practitioner) in [
            (None, Some("mumbai")),
            (Some("mumbai"), None),
            (Some("atlantis"), Some("mumbai")),
        ] {
            let score = location_score(patient, practitioner, &options);
            assert_eq!(score.score, 0.2);
            assert_eq!(score.distance_km, None);
        }
    }
}
