use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("station must be between 1 and 7, got {0}")]
pub struct InvalidStation(pub i64);

/// One of the seven shooting positions of a competition.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Station(u8);

impl Station {
    pub const FIRST: u8 = 1;
    pub const LAST: u8 = 7;

    /// Tie-break order used when a competition carries no configured stations.
    pub const DEFAULT_TIE_BREAK: [Station; 3] = [Station(1), Station(2), Station(3)];

    pub fn new(number: u8) -> Result<Self, InvalidStation> {
        if (Self::FIRST..=Self::LAST).contains(&number) {
            Ok(Self(number))
        } else {
            Err(InvalidStation(number.into()))
        }
    }

    pub fn number(self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = Station> {
        (Self::FIRST..=Self::LAST).map(Station)
    }
}

impl TryFrom<u8> for Station {
    type Error = InvalidStation;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<i16> for Station {
    type Error = InvalidStation;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_| InvalidStation(value.into()))
            .and_then(Self::new)
    }
}

impl From<Station> for u8 {
    fn from(station: Station) -> Self {
        station.0
    }
}

impl From<Station> for i16 {
    fn from(station: Station) -> Self {
        station.0.into()
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_range_bounds() {
        assert_eq!(Station::new(1).map(Station::number), Ok(1));
        assert_eq!(Station::new(7).map(Station::number), Ok(7));
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert_eq!(Station::new(0), Err(InvalidStation(0)));
        assert_eq!(Station::new(8), Err(InvalidStation(8)));
        assert_eq!(Station::try_from(-3i16), Err(InvalidStation(-3)));
    }

    #[test]
    fn test_deserialize_validates() {
        let station: Station = serde_json::from_str("4").unwrap();
        assert_eq!(station.number(), 4);
        assert!(serde_json::from_str::<Station>("9").is_err());
    }

    #[test]
    fn test_all_lists_seven_stations_in_order() {
        let numbers: Vec<u8> = Station::all().map(Station::number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6, 7]);
    }
}
