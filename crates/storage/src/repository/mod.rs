pub mod competition;
pub mod league;
pub mod score;
pub mod shooter;

pub use competition::CompetitionRepository;
pub use league::LeagueRepository;
pub use score::ScoreRepository;
pub use shooter::ShooterRepository;
