pub mod cup;
pub mod export;
pub mod ranking;
pub mod standings;
