use crate::{error::TypoError, strand::Strand};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index on the opposite track paired with `pos` on a track of length `len`.
#[inline(always)]
pub fn mirror(pos: usize, len: usize) -> usize {
    len - 1 - pos
}

/// Where the opposite track takes its padding cell when a cell is inserted
/// at `pos` into a track that was `len` long before the insertion.
#[inline(always)]
pub fn mirror_insertion(pos: usize, len: usize) -> usize {
    len - pos
}

/// Two antiparallel tracks of equal length. Cell `i` of the bottom track
/// pairs with cell `len - 1 - i` of the top track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Complex {
    pub(crate) strands: [Strand; 2],
}

impl Complex {
    /// A complex whose bottom track is empty.
    pub fn new(strand: Strand) -> Self {
        let bottom = Strand::gaps(strand.len());
        Self {
            strands: [strand, bottom],
        }
    }

    pub fn from_tracks(top: Strand, bottom: Strand) -> Result<Self, TypoError> {
        if top.len() != bottom.len() {
            return Err(TypoError::LengthMismatch {
                top: top.len(),
                bottom: bottom.len(),
            });
        }
        Ok(Self {
            strands: [top, bottom],
        })
    }

    pub fn top(&self) -> &Strand {
        &self.strands[0]
    }

    pub fn bottom(&self) -> &Strand {
        &self.strands[1]
    }

    pub fn len(&self) -> usize {
        self.strands[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.strands[0].is_empty()
    }

    pub fn is_balanced(&self) -> bool {
        self.strands[0].len() == self.strands[1].len()
    }

    pub fn into_tracks(self) -> [Strand; 2] {
        self.strands
    }

    /// Dissociates the complex: every maximal run of bases on the top track,
    /// then on the bottom track, left to right.
    pub fn products(&self) -> Vec<Strand> {
        self.strands.iter().flat_map(Strand::runs).collect()
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.strands[0], self.strands[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strand(s: &str) -> Strand {
        Strand::from_sequence(s).unwrap()
    }

    fn texts(strands: &[Strand]) -> Vec<String> {
        strands.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_mirror() {
        assert_eq!(mirror(0, 19), 18);
        assert_eq!(mirror(18, 19), 0);
        assert_eq!(mirror(2, 19), 16);
        assert_eq!(mirror(0, 1), 0);
        for len in 1..10 {
            for pos in 0..len {
                assert_eq!(mirror(mirror(pos, len), len), pos);
            }
        }
    }

    #[test]
    fn test_mirror_insertion() {
        // Appending to the top prepends to the bottom and vice versa.
        assert_eq!(mirror_insertion(5, 5), 0);
        assert_eq!(mirror_insertion(0, 5), 5);
        assert_eq!(mirror_insertion(2, 5), 3);
    }

    #[test]
    fn test_insertion_keeps_tracks_paired() {
        let top = strand("GCAGT");
        for pos in 0..=top.len() {
            let mut c = Complex::from_tracks(top.clone(), strand("ACTGC")).unwrap();
            let len = c.len();
            c.strands[0].insert(pos, None);
            c.strands[1].insert(mirror_insertion(pos, len), None);
            assert!(c.is_balanced());
            let new_len = c.len();
            let bottom_gap = c.strands[1]
                .cells()
                .iter()
                .position(|cell| cell.is_none())
                .unwrap();
            assert_eq!(mirror(bottom_gap, new_len), pos);
        }
    }

    #[test]
    fn test_new_has_empty_bottom() {
        let c = Complex::new(strand("ACGT"));
        assert!(c.is_balanced());
        assert_eq!(c.bottom().gap_count(), 4);
        assert_eq!(c.to_string(), "ACGT/····");
    }

    #[test]
    fn test_from_tracks_length_mismatch() {
        assert_eq!(
            Complex::from_tracks(strand("ACG"), strand("AC")),
            Err(TypoError::LengthMismatch { top: 3, bottom: 2 })
        );
    }

    #[test]
    fn test_products() {
        let c = Complex::from_tracks(strand(""), strand("")).unwrap();
        assert!(c.products().is_empty());

        let c = Complex::from_tracks(strand("··ACG··T·G"), strand("·AC·G··TA·")).unwrap();
        assert_eq!(texts(&c.products()), vec!["ACG", "T", "G", "AC", "G", "TA"]);

        let c = Complex::from_tracks(strand("ACG··T·G"), strand("ACG··TA·")).unwrap();
        assert_eq!(texts(&c.products()), vec!["ACG", "T", "G", "ACG", "TA"]);
    }

    #[test]
    fn test_products_idempotent() {
        let c = Complex::from_tracks(strand("AC·GT"), strand("·T··A")).unwrap();
        assert_eq!(c.products(), c.products());
    }
}
