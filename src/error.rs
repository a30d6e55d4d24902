use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypoError {
    #[error("invalid base '{letter}' at position {position}")]
    InvalidBase { letter: char, position: usize },
    #[error("unknown amino acid '{0}'")]
    UnknownAminoAcid(String),
    #[error("enzyme has no amino acids")]
    EmptyEnzyme,
    #[error("Non can not be part of an enzyme (position {0})")]
    NonInEnzyme(usize),
    #[error("complex strands differ in length: {top} vs {bottom}")]
    LengthMismatch { top: usize, bottom: usize },
    #[error("position {position} is not a base on a strand of length {len}")]
    NotOnStrand { position: usize, len: usize },
    #[error("pool grew to {size} strands, more than the limit of {limit}")]
    PoolOverflow { size: usize, limit: usize },
}
