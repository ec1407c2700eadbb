//! # Proximity Filter
//!
//! Linear scan over candidates already fetched from storage: drop anything
//! without a usable position, keep what lies within the radius, nearest first.

use super::geo::distance_km;
use super::models::location::{Located, Location};

/// A candidate that passed the radius check, with its distance from the origin
#[derive(Debug, Clone, PartialEq)]
pub struct Nearby<T> {
    pub item: T,
    pub distance_km: f64,
}

/// Candidates within `radius_km` of `origin` (boundary inclusive), sorted by
/// ascending distance. Equal distances keep their input order.
pub fn nearby<T, I>(origin: Location, radius_km: f64, candidates: I) -> Vec<Nearby<T>>
where
    T: Located,
    I: IntoIterator<Item = T>,
{
    let mut matches: Vec<Nearby<T>> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let location = candidate.location().filter(Location::is_well_formed)?;
            let distance = distance_km(origin, location);
            (distance <= radius_km).then_some(Nearby {
                item: candidate,
                distance_km: distance,
            })
        })
        .collect();

    // sort_by is stable
    matches.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    matches
}
