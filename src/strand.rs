use crate::{
    amino_acids::AminoAcid,
    base::{Base, Cell, cell_symbol},
    enzyme::Enzyme,
    error::TypoError,
};
use anyhow::Result;
use bio::io::fasta;
use serde::{Deserialize, Serialize};
use std::{fmt, fs::File, str::FromStr};

/// One track of typogenetic tape. Cells left empty by deletion or padding
/// stay in place as gaps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Strand(Vec<Cell>);

impl Strand {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self(cells)
    }

    pub fn from_bases(bases: &[Base]) -> Self {
        Self(bases.iter().copied().map(Some).collect())
    }

    /// An all-gap strand of the given length.
    pub fn gaps(len: usize) -> Self {
        Self(vec![None; len])
    }

    pub fn from_sequence(sequence: &str) -> Result<Self, TypoError> {
        sequence
            .chars()
            .filter(|c| !c.is_whitespace())
            .enumerate()
            .map(|(position, letter)| {
                if Base::is_gap_letter(letter) {
                    return Ok(None);
                }
                u8::try_from(letter)
                    .ok()
                    .and_then(Base::from_letter)
                    .map(Some)
                    .ok_or(TypoError::InvalidBase { letter, position })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    /// Reads every record of a FASTA file as `(id, strand)`.
    pub fn from_fasta_file(filename: &str) -> Result<Vec<(String, Strand)>> {
        let file = File::open(filename)?;
        let mut ret = vec![];
        for record in fasta::Reader::new(file).records() {
            let record = record?;
            let sequence = String::from_utf8_lossy(record.seq());
            ret.push((record.id().to_string(), Self::from_sequence(&sequence)?));
        }
        Ok(ret)
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.0
    }

    /// The base at `pos`, or `None` for a gap or a position off the strand.
    #[inline(always)]
    pub fn base_at(&self, pos: isize) -> Option<Base> {
        usize::try_from(pos)
            .ok()
            .and_then(|i| self.0.get(i).copied().flatten())
    }

    #[inline(always)]
    pub fn is_on_strand(&self, pos: isize) -> bool {
        self.base_at(pos).is_some()
    }

    pub fn set(&mut self, pos: usize, cell: Cell) {
        self.0[pos] = cell;
    }

    /// Inserts `cell` before index `pos`; `pos == len` appends.
    pub fn insert(&mut self, pos: usize, cell: Cell) {
        self.0.insert(pos, cell);
    }

    pub fn gap_count(&self) -> usize {
        self.0.iter().filter(|c| c.is_none()).count()
    }

    /// Maximal runs of consecutive bases, left to right.
    pub fn runs(&self) -> Vec<Strand> {
        self.0
            .split(|cell| cell.is_none())
            .filter(|run| !run.is_empty())
            .map(|run| Strand(run.to_vec()))
            .collect()
    }

    /// Every position holding `base`, ascending.
    pub fn binding_sites(&self, base: Base) -> Vec<usize> {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell == Some(base))
            .map(|(i, _)| i)
            .collect()
    }

    /// Translates the strand, two bases at a time, into the enzymes it codes
    /// for. `Non` (and any pair touching a gap) separates enzymes; a trailing
    /// unpaired base is ignored.
    pub fn enzymes(&self) -> Vec<Enzyme> {
        let mut ret = vec![];
        let mut current = Vec::with_capacity(self.len() / 2);
        for pair in self.0.chunks_exact(2) {
            let aa = match (pair[0], pair[1]) {
                (Some(first), Some(second)) => AminoAcid::decode(first, second),
                _ => AminoAcid::Non,
            };
            if aa == AminoAcid::Non {
                if !current.is_empty() {
                    ret.push(Enzyme::from_translation(std::mem::take(&mut current)));
                }
                continue;
            }
            current.push(aa);
        }
        if !current.is_empty() {
            ret.push(Enzyme::from_translation(current));
        }
        ret
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text: String = self.0.iter().map(|cell| cell_symbol(*cell)).collect();
        write!(f, "{text}")
    }
}

impl FromStr for Strand {
    type Err = TypoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_sequence(s)
    }
}

impl TryFrom<String> for Strand {
    type Error = TypoError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_sequence(&value)
    }
}

impl From<Strand> for String {
    fn from(strand: Strand) -> Self {
        strand.to_string()
    }
}
