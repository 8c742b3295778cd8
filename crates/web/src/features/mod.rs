pub mod competitions;
pub mod cup;
pub mod health;
pub mod live;
pub mod results;
pub mod scores;
pub mod shooters;
