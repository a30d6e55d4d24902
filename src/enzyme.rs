use crate::{
    amino_acids::{AminoAcid, Kink},
    base::Base,
    error::TypoError,
};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Compass direction of a segment of a folded enzyme.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    const CLOCKWISE: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    fn quarter(self) -> i8 {
        match self {
            Direction::North => 0,
            Direction::East => 1,
            Direction::South => 2,
            Direction::West => 3,
        }
    }

    fn from_quarter(quarter: i8) -> Self {
        Self::CLOCKWISE[quarter.rem_euclid(4) as usize]
    }

    pub fn turn(self, kink: Kink) -> Self {
        Self::from_quarter(self.quarter() + kink.quarter_turns())
    }

    /// The base an enzyme binds to when this is its relative final direction.
    pub fn binding_base(self) -> Base {
        match self {
            Direction::East => Base::A,
            Direction::North => Base::C,
            Direction::South => Base::G,
            Direction::West => Base::T,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::East => "east",
            Direction::South => "south",
            Direction::West => "west",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// First and last segment directions of a folded enzyme.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fold {
    pub first: Direction,
    pub last: Direction,
}

/// A non-empty chain of amino acids, none of which is `Non`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Enzyme(Vec<AminoAcid>);

impl Enzyme {
    pub fn new(amino_acids: Vec<AminoAcid>) -> Result<Self, TypoError> {
        if amino_acids.is_empty() {
            return Err(TypoError::EmptyEnzyme);
        }
        if let Some(i) = amino_acids.iter().position(|aa| *aa == AminoAcid::Non) {
            return Err(TypoError::NonInEnzyme(i));
        }
        Ok(Self(amino_acids))
    }

    /// Only for chains already known to be free of `Non`, e.g. from translation.
    pub(crate) fn from_translation(amino_acids: Vec<AminoAcid>) -> Self {
        debug_assert!(!amino_acids.is_empty());
        debug_assert!(!amino_acids.contains(&AminoAcid::Non));
        Self(amino_acids)
    }

    pub fn amino_acids(&self) -> &[AminoAcid] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Folds the enzyme starting north. Every segment contributes its kink to
    /// the final direction, the first one included.
    pub fn fold(&self) -> Fold {
        let last = self
            .0
            .iter()
            .fold(Direction::North, |dir, aa| dir.turn(aa.kink()));
        let first = self
            .0
            .first()
            .map(|aa| Direction::North.turn(aa.kink()))
            .unwrap_or(Direction::North);
        Fold { first, last }
    }

    /// The base this enzyme binds to.
    pub fn preference(&self) -> Base {
        let Fold { first, last } = self.fold();
        let rotation = Direction::East.quarter() - first.quarter();
        Direction::from_quarter(last.quarter() + rotation).binding_base()
    }
}

impl fmt::Display for Enzyme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().join("-"))
    }
}

impl FromStr for Enzyme {
    type Err = TypoError;

    /// Parses hyphen, comma or whitespace separated amino acid names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amino_acids = s
            .split(|c: char| c == '-' || c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .map(|part| {
                AminoAcid::from_name(part).ok_or_else(|| TypoError::UnknownAminoAcid(part.into()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(amino_acids)
    }
}

impl TryFrom<String> for Enzyme {
    type Error = TypoError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Enzyme> for String {
    fn from(enzyme: Enzyme) -> Self {
        enzyme.to_string()
    }
}
