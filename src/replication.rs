//! Strands acting on themselves: translation, binding and the products that
//! make up the next generation.

use crate::{
    base::Base,
    complex::Complex,
    enzyme::Enzyme,
    error::TypoError,
    operate::{TraceSink, TraceStep},
    strand::Strand,
};
use itertools::Itertools;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Outcome of one enzyme bound at one site of a fresh copy of a strand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteRun {
    pub position: usize,
    pub products: Vec<Strand>,
    pub trace: Vec<TraceStep>,
}

/// Runs `enzyme` once per binding site of `strand`, each time on a new
/// complex built from an untouched copy of the strand.
pub fn run_at_binding_sites(enzyme: &Enzyme, strand: &Strand, with_trace: bool) -> Vec<SiteRun> {
    strand
        .binding_sites(enzyme.preference())
        .into_iter()
        .map(|position| run_at(enzyme, strand, position, with_trace))
        .collect()
}

pub fn run_at(enzyme: &Enzyme, strand: &Strand, position: usize, with_trace: bool) -> SiteRun {
    let mut trace: Vec<TraceStep> = vec![];
    let sink: Option<&mut dyn TraceSink> = if with_trace { Some(&mut trace) } else { None };
    let complex = enzyme.operate_on(Complex::new(strand.clone()), position, sink);
    SiteRun {
        position,
        products: complex.products(),
        trace,
    }
}

fn first_site(complex: &Complex, base: Base) -> Option<usize> {
    complex.top().cells().iter().position(|cell| *cell == Some(base))
}

/// Lets every enzyme coded by `strand` act, in order, on one shared complex
/// built from the strand. An enzyme binds at the first base of its
/// preference on the current top track and is skipped when there is none.
pub fn replicate_strand(strand: &Strand) -> Vec<Strand> {
    let mut complex = Complex::new(strand.clone());
    for enzyme in strand.enzymes() {
        if let Some(site) = first_site(&complex, enzyme.preference()) {
            complex = enzyme.operate_on(complex, site, None);
        }
    }
    complex.products()
}

/// Products of every member of the pool, in pool order.
pub fn next_generation(pool: &[Strand]) -> Vec<Strand> {
    pool.par_iter().flat_map_iter(replicate_strand).collect()
}

/// Distinct strands of a pool with their counts, ordered by strand text.
pub fn tally(pool: &[Strand]) -> Vec<(String, usize)> {
    pool.iter()
        .map(Strand::to_string)
        .counts()
        .into_iter()
        .sorted()
        .collect()
}

/// Successive generations grown from a seed pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evolution {
    pub generations: Vec<Vec<Strand>>,
}

impl Evolution {
    /// Grows `rounds` generations after `seed`. Fails as soon as a generation
    /// holds more than `max_pool_size` strands.
    pub fn grow(seed: Vec<Strand>, rounds: usize, max_pool_size: usize) -> Result<Self, TypoError> {
        let mut generations = vec![seed];
        for round in 1..=rounds {
            let Some(parents) = generations.last() else {
                break;
            };
            let daughters = next_generation(parents);
            tracing::debug!(round, size = daughters.len(), "generation grown");
            if daughters.len() > max_pool_size {
                return Err(TypoError::PoolOverflow {
                    size: daughters.len(),
                    limit: max_pool_size,
                });
            }
            generations.push(daughters);
        }
        Ok(Self { generations })
    }

    pub fn last(&self) -> &[Strand] {
        self.generations.last().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn tallies(&self) -> Vec<Vec<(String, usize)>> {
        self.generations.iter().map(|pool| tally(pool)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUINE: &str = "CGTTCCTCTCTCTCTATAGAGAGAGAGGAACG";

    fn strand(s: &str) -> Strand {
        Strand::from_sequence(s).unwrap()
    }

    fn texts(strands: &[Strand]) -> Vec<String> {
        strands.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_run_at_binding_sites() {
        let e: Enzyme = "Rpu-Inc-Cop-Mvr-Mvl-Swi-Lpu-Int".parse().unwrap();
        let runs = run_at_binding_sites(&e, &strand("TAGATCCAGTCCATCGA"), true);
        let positions: Vec<usize> = runs.iter().map(|r| r.position).collect();
        assert_eq!(positions, vec![2, 8, 15]);
        assert_eq!(texts(&runs[0].products), vec!["ATG", "TAGACATCCAGTCCATCGA"]);
        assert_eq!(texts(&runs[1].products), vec!["ATG", "TAGATCCAGTCCACATCGA"]);
        assert_eq!(texts(&runs[2].products), vec!["TAGATCCAGTCCATCGAC", "G"]);
        assert_eq!(runs[2].trace.len(), 5);
        assert!(run_at(&e, &strand("TAGATCCAGTCCATCGA"), 2, false).trace.is_empty());
    }

    #[test]
    fn test_quine_doubles_each_generation() {
        let seed = strand(QUINE);
        assert_eq!(texts(&replicate_strand(&seed)), vec![QUINE, QUINE]);
        let evolution = Evolution::grow(vec![seed], 5, 1_000).unwrap();
        assert_eq!(evolution.generations.len(), 6);
        for (n, tally) in evolution.tallies().iter().enumerate() {
            assert_eq!(tally, &vec![(QUINE.to_string(), 1 << n)]);
        }
        assert_eq!(evolution.last().len(), 32);
    }

    #[test]
    fn test_pool_overflow() {
        let err = Evolution::grow(vec![strand(QUINE)], 5, 10).unwrap_err();
        assert_eq!(err, TypoError::PoolOverflow { size: 16, limit: 10 });
    }

    #[test]
    fn test_strand_without_enzymes_survives_unchanged() {
        assert_eq!(texts(&replicate_strand(&strand("AAAA"))), vec!["AAAA"]);
        assert!(replicate_strand(&strand("")).is_empty());
    }

    #[test]
    fn test_tally_is_sorted() {
        let pool = vec![strand("GG"), strand("AC"), strand("GG")];
        assert_eq!(
            tally(&pool),
            vec![("AC".to_string(), 1), ("GG".to_string(), 2)]
        );
    }
}
