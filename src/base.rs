use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder shown for a tape cell that holds no base.
pub const GAP_SYMBOL: char = '·';

/// One of the four typogenetic bases.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Base {
    A,
    C,
    G,
    T,
}

/// A single tape cell; `None` is a gap left by a deletion, a cut or padding.
pub type Cell = Option<Base>;

impl Base {
    pub const ALL: [Base; 4] = [Base::A, Base::C, Base::G, Base::T];

    #[inline(always)]
    pub fn from_letter(letter: u8) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            b'A' => Some(Base::A),
            b'C' => Some(Base::C),
            b'G' => Some(Base::G),
            b'T' => Some(Base::T),
            _ => None,
        }
    }

    #[inline(always)]
    pub fn letter(self) -> char {
        match self {
            Base::A => 'A',
            Base::C => 'C',
            Base::G => 'G',
            Base::T => 'T',
        }
    }

    /// Position of the base in the pseudo-codon table.
    #[inline(always)]
    pub fn index(self) -> usize {
        match self {
            Base::A => 0,
            Base::C => 1,
            Base::G => 2,
            Base::T => 3,
        }
    }

    #[inline(always)]
    pub fn complement(self) -> Self {
        match self {
            Base::A => Base::T,
            Base::C => Base::G,
            Base::G => Base::C,
            Base::T => Base::A,
        }
    }

    #[inline(always)]
    pub fn is_purine(self) -> bool {
        matches!(self, Base::A | Base::G)
    }

    #[inline(always)]
    pub fn is_pyrimidine(self) -> bool {
        matches!(self, Base::C | Base::T)
    }

    /// Letters accepted as a gap when reading strand text.
    #[inline(always)]
    pub fn is_gap_letter(letter: char) -> bool {
        matches!(letter, GAP_SYMBOL | '.' | '-')
    }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

pub fn cell_symbol(cell: Cell) -> char {
    cell.map(Base::letter).unwrap_or(GAP_SYMBOL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_letter() {
        assert_eq!(Base::from_letter(b'A'), Some(Base::A));
        assert_eq!(Base::from_letter(b'c'), Some(Base::C));
        assert_eq!(Base::from_letter(b'G'), Some(Base::G));
        assert_eq!(Base::from_letter(b't'), Some(Base::T));
        assert_eq!(Base::from_letter(b'U'), None);
        assert_eq!(Base::from_letter(b'X'), None);
    }

    #[test]
    fn test_complement() {
        assert_eq!(Base::A.complement(), Base::T);
        assert_eq!(Base::C.complement(), Base::G);
        assert_eq!(Base::G.complement(), Base::C);
        assert_eq!(Base::T.complement(), Base::A);
        for b in Base::ALL {
            assert_eq!(b.complement().complement(), b);
        }
    }

    #[test]
    fn test_purine_pyrimidine() {
        for b in Base::ALL {
            assert_ne!(b.is_purine(), b.is_pyrimidine());
        }
        assert!(Base::A.is_purine());
        assert!(Base::G.is_purine());
        assert!(Base::C.is_pyrimidine());
        assert!(Base::T.is_pyrimidine());
    }

    #[test]
    fn test_cell_symbol() {
        assert_eq!(cell_symbol(Some(Base::G)), 'G');
        assert_eq!(cell_symbol(None), GAP_SYMBOL);
        assert!(Base::is_gap_letter(GAP_SYMBOL));
        assert!(!Base::is_gap_letter(' '));
    }
}
