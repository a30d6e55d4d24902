pub mod about;
pub mod amino_acids;
pub mod base;
pub mod complex;
pub mod engine;
pub mod enzyme;
pub mod error;
pub mod operate;
pub mod replication;
pub mod strand;

pub use complex::Complex;
pub use enzyme::Enzyme;
pub use error::TypoError;
pub use strand::Strand;
