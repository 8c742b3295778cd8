mod competition;
mod klass;
mod league;
mod score;
mod shooter;
mod station;

pub use competition::{Competition, MAX_TIE_BREAK_STATIONS};
pub use klass::{Klass, UnknownKlass};
pub use league::League;
pub use score::{MAX_SHOT_VALUE, SHOTS_PER_SERIES, Score, ScoreDetail, Shot, StationResult};
pub use shooter::Shooter;
pub use station::{InvalidStation, Station};
