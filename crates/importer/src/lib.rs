pub mod error;
pub mod legacy;
pub mod traits;

pub use error::{ImporterError, Result};
pub use legacy::LegacyImporter;
pub use traits::{ImportContext, ImportSummary, LeagueImporter};
