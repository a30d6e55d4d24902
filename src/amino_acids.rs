//! The typogenetic code: pseudo-codon decoding and the static behaviour of
//! each amino acid.

use crate::base::{Base, Cell};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AminoAcid {
    /// Punctuation between enzymes; never part of one.
    Non,
    Cut,
    Del,
    Swi,
    Mvr,
    Mvl,
    Cop,
    Off,
    Ina,
    Inc,
    Ing,
    Int,
    Rpy,
    Rpu,
    Lpy,
    Lpu,
}

/// Pseudo-codon table, indexed by `4 * first + second` base index.
const CODE: [AminoAcid; 16] = [
    AminoAcid::Non,
    AminoAcid::Cut,
    AminoAcid::Del,
    AminoAcid::Swi,
    AminoAcid::Mvr,
    AminoAcid::Mvl,
    AminoAcid::Cop,
    AminoAcid::Off,
    AminoAcid::Ina,
    AminoAcid::Inc,
    AminoAcid::Ing,
    AminoAcid::Int,
    AminoAcid::Rpy,
    AminoAcid::Rpu,
    AminoAcid::Lpy,
    AminoAcid::Lpu,
];

lazy_static! {
    static ref AMINO_ACID_NAMES: HashMap<String, AminoAcid> = AminoAcid::ALL
        .iter()
        .map(|aa| (aa.name().to_ascii_lowercase(), *aa))
        .collect();
}

/// How an amino acid bends the tertiary structure of its enzyme.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Kink {
    Left,
    Straight,
    Right,
}

impl Kink {
    /// Signed quarter turns, clockwise positive.
    pub fn quarter_turns(self) -> i8 {
        match self {
            Kink::Left => -1,
            Kink::Straight => 0,
            Kink::Right => 1,
        }
    }
}

/// Which class of base a search stops on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BaseClass {
    Purine,
    Pyrimidine,
}

impl BaseClass {
    pub fn matches(self, base: Base) -> bool {
        match self {
            BaseClass::Purine => base.is_purine(),
            BaseClass::Pyrimidine => base.is_pyrimidine(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Search {
    pub step: isize,
    pub target: BaseClass,
}

/// What an amino acid does to the complex it is bound to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    Delete,
    Switch,
    Move(isize),
    CopyMode(bool),
    /// Insert the cell to the right of the current unit; a gap for `Cut`.
    Insert(Cell),
    Search(Search),
}

impl AminoAcid {
    pub const ALL: [AminoAcid; 16] = CODE;

    #[inline(always)]
    pub fn decode(first: Base, second: Base) -> Self {
        CODE[first.index() * 4 + second.index()]
    }

    pub fn name(self) -> &'static str {
        match self {
            AminoAcid::Non => "Non",
            AminoAcid::Cut => "Cut",
            AminoAcid::Del => "Del",
            AminoAcid::Swi => "Swi",
            AminoAcid::Mvr => "Mvr",
            AminoAcid::Mvl => "Mvl",
            AminoAcid::Cop => "Cop",
            AminoAcid::Off => "Off",
            AminoAcid::Ina => "Ina",
            AminoAcid::Inc => "Inc",
            AminoAcid::Ing => "Ing",
            AminoAcid::Int => "Int",
            AminoAcid::Rpy => "Rpy",
            AminoAcid::Rpu => "Rpu",
            AminoAcid::Lpy => "Lpy",
            AminoAcid::Lpu => "Lpu",
        }
    }

    /// Case-insensitive lookup by three-letter name.
    pub fn from_name(name: &str) -> Option<Self> {
        AMINO_ACID_NAMES.get(&name.trim().to_ascii_lowercase()).copied()
    }

    pub fn kink(self) -> Kink {
        match self {
            AminoAcid::Swi
            | AminoAcid::Cop
            | AminoAcid::Inc
            | AminoAcid::Ing
            | AminoAcid::Rpy => Kink::Right,
            AminoAcid::Off
            | AminoAcid::Int
            | AminoAcid::Rpu
            | AminoAcid::Lpy
            | AminoAcid::Lpu => Kink::Left,
            AminoAcid::Non
            | AminoAcid::Cut
            | AminoAcid::Del
            | AminoAcid::Mvr
            | AminoAcid::Mvl
            | AminoAcid::Ina => Kink::Straight,
        }
    }

    /// `None` only for `Non`, which has no behaviour.
    pub fn action(self) -> Option<Action> {
        let action = match self {
            AminoAcid::Non => return None,
            AminoAcid::Cut => Action::Insert(None),
            AminoAcid::Del => Action::Delete,
            AminoAcid::Swi => Action::Switch,
            AminoAcid::Mvr => Action::Move(1),
            AminoAcid::Mvl => Action::Move(-1),
            AminoAcid::Cop => Action::CopyMode(true),
            AminoAcid::Off => Action::CopyMode(false),
            AminoAcid::Ina => Action::Insert(Some(Base::A)),
            AminoAcid::Inc => Action::Insert(Some(Base::C)),
            AminoAcid::Ing => Action::Insert(Some(Base::G)),
            AminoAcid::Int => Action::Insert(Some(Base::T)),
            AminoAcid::Rpy => Action::Search(Search {
                step: 1,
                target: BaseClass::Pyrimidine,
            }),
            AminoAcid::Rpu => Action::Search(Search {
                step: 1,
                target: BaseClass::Purine,
            }),
            AminoAcid::Lpy => Action::Search(Search {
                step: -1,
                target: BaseClass::Pyrimidine,
            }),
            AminoAcid::Lpu => Action::Search(Search {
                step: -1,
                target: BaseClass::Purine,
            }),
        };
        Some(action)
    }
}

impl fmt::Display for AminoAcid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
