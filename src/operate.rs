//! Enzymatic activity: an enzyme walking a complex one amino acid at a time.

use crate::{
    amino_acids::Action,
    base::cell_symbol,
    complex::{Complex, mirror, mirror_insertion},
    enzyme::Enzyme,
};
use serde::{Deserialize, Serialize};
use std::fmt;

const HALT_ON_GAP: &str = "empty";
const HALT_OFF_STRAND: &str = "off";
const COMPLETED: &str = "done";
const OFF_STRAND_SYMBOL: char = '-';

/// One line of an operation trace: the step about to run (or how the run
/// ended), where the enzyme sits and both tracks as the enzyme sees them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceStep {
    pub label: String,
    pub pos: isize,
    pub symbol: char,
    pub current: String,
    pub opposite: String,
}

impl TraceStep {
    fn new(label: &str, pos: isize, complex: &Complex) -> Self {
        let current = complex.top();
        let symbol = match usize::try_from(pos) {
            Ok(i) if i < current.len() => cell_symbol(current.cells()[i]),
            _ => OFF_STRAND_SYMBOL,
        };
        Self {
            label: label.to_string(),
            pos,
            symbol,
            current: current.to_string(),
            opposite: complex.bottom().to_string(),
        }
    }

    pub fn is_halt(&self) -> bool {
        self.label == HALT_ON_GAP || self.label == HALT_OFF_STRAND
    }
}

impl fmt::Display for TraceStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<5} {:>4} {} {:?} {:?}",
            self.label, self.pos, self.symbol, self.current, self.opposite
        )
    }
}

/// Receives trace steps while an enzyme operates. Purely observational.
pub trait TraceSink {
    fn record(&mut self, step: TraceStep);
}

impl TraceSink for Vec<TraceStep> {
    fn record(&mut self, step: TraceStep) {
        self.push(step);
    }
}

impl TraceSink for String {
    fn record(&mut self, step: TraceStep) {
        self.push_str(&step.to_string());
        self.push('\n');
    }
}

fn record(trace: &mut Option<&mut dyn TraceSink>, label: &str, pos: isize, complex: &Complex) {
    if let Some(sink) = trace.as_deref_mut() {
        sink.record(TraceStep::new(label, pos, complex));
    }
}

/// Writes the complement of the current-track base at `pos` into the paired
/// cell of the opposite track. Gaps are not copied.
fn copy_opposite(complex: &mut Complex, pos: usize) {
    let len = complex.len();
    if let Some(base) = complex.strands[0].base_at(pos as isize) {
        complex.strands[1].set(mirror(pos, len), Some(base.complement()));
    }
}

impl Enzyme {
    /// Runs the enzyme on `complex`, bound at `start` on the top track, and
    /// returns the transformed complex. Tracks come back in the enzyme's
    /// final orientation: after an odd number of `Swi` the former bottom
    /// track is on top.
    ///
    /// Running off either end of a track or onto a gap ends the run early.
    /// A `start` that is not a base on the top track ends it before the
    /// first amino acid.
    ///
    /// # Panics
    ///
    /// Panics if the tracks of `complex` differ in length, or if the enzyme
    /// holds `Non`, which `Enzyme::new` rules out.
    pub fn operate_on(
        &self,
        mut complex: Complex,
        start: usize,
        mut trace: Option<&mut dyn TraceSink>,
    ) -> Complex {
        assert!(
            complex.is_balanced(),
            "invalid complex: track lengths {} and {} differ",
            complex.top().len(),
            complex.bottom().len()
        );

        let mut pos = isize::try_from(start).unwrap_or(isize::MAX);
        let mut copy_mode = false;

        if !complex.strands[0].is_on_strand(pos) {
            Self::halt(&mut trace, pos, &complex);
            return complex;
        }

        for aa in self.amino_acids() {
            record(&mut trace, aa.name(), pos, &complex);
            tracing::trace!(amino_acid = %aa, pos, copy_mode, "operating");

            let action = match aa.action() {
                Some(action) => action,
                None => panic!("{aa} can not operate on a complex"),
            };
            // The enzyme is always on a base when a step begins.
            let here = pos as usize;
            match action {
                Action::Delete => {
                    complex.strands[0].set(here, None);
                    pos -= 1;
                }
                Action::Switch => {
                    complex.strands.swap(0, 1);
                    pos = mirror(here, complex.len()) as isize;
                }
                Action::Move(step) => pos += step,
                Action::CopyMode(on) => copy_mode = on,
                Action::Insert(cell) => {
                    let len = complex.len();
                    let at = here + 1;
                    complex.strands[0].insert(at, cell);
                    complex.strands[1].insert(mirror_insertion(at, len), None);
                    pos += 1;
                }
                Action::Search(search) => {
                    pos += search.step;
                    while let Some(base) = complex.strands[0].base_at(pos) {
                        if copy_mode {
                            copy_opposite(&mut complex, pos as usize);
                        }
                        if search.target.matches(base) {
                            break;
                        }
                        pos += search.step;
                    }
                }
            }

            if !complex.strands[0].is_on_strand(pos) {
                Self::halt(&mut trace, pos, &complex);
                return complex;
            }
            if copy_mode {
                copy_opposite(&mut complex, pos as usize);
            }
        }

        record(&mut trace, COMPLETED, pos, &complex);
        tracing::debug!(enzyme = %self, pos, "enzyme completed");
        complex
    }

    fn halt(trace: &mut Option<&mut dyn TraceSink>, pos: isize, complex: &Complex) {
        let on_track = usize::try_from(pos).is_ok_and(|i| i < complex.len());
        let label = if on_track {
            HALT_ON_GAP
        } else {
            HALT_OFF_STRAND
        };
        tracing::debug!(pos, reason = label, "enzyme fell off");
        record(trace, label, pos, complex);
    }
}

/// Renders a trace the way it is printed by the command line tools.
pub fn format_trace(steps: &[TraceStep]) -> String {
    let mut text = String::new();
    for step in steps {
        text.record(step.clone());
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{amino_acids::AminoAcid::*, base::GAP_SYMBOL, strand::Strand};

    const BOOK_STRAND: &str = "TAGATCCAGTCCATCGA";

    fn strand(s: &str) -> Strand {
        Strand::from_sequence(s).unwrap()
    }

    fn book_enzyme() -> Enzyme {
        Enzyme::new(vec![Rpu, Inc, Cop, Mvr, Mvl, Swi, Lpu, Int]).unwrap()
    }

    fn run(enzyme: &Enzyme, s: &str, pos: usize) -> Vec<String> {
        let mut steps: Vec<TraceStep> = vec![];
        enzyme
            .operate_on(Complex::new(strand(s)), pos, Some(&mut steps))
            .products()
            .iter()
            .map(|p| p.to_string())
            .collect()
    }

    #[test]
    fn test_operate_on_book_examples() {
        let e = book_enzyme();
        assert_eq!(run(&e, BOOK_STRAND, 8), vec!["ATG", "TAGATCCAGTCCACATCGA"]);
        assert_eq!(run(&e, BOOK_STRAND, 15), vec!["TAGATCCAGTCCATCGAC", "G"]);
        assert_eq!(run(&e, BOOK_STRAND, 2), vec!["ATG", "TAGACATCCAGTCCATCGA"]);
    }

    #[test]
    fn test_operate_on_switch_and_copy() {
        let e = Enzyme::new(vec![Ina, Rpu, Cop, Inc, Swi]).unwrap();
        assert_eq!(run(&e, "GATCCGGCAT", 2), vec!["GC", "GATACCGCGCAT"]);
    }

    #[test]
    fn test_trace_falls_off_the_end() {
        let mut steps: Vec<TraceStep> = vec![];
        book_enzyme().operate_on(Complex::new(strand(BOOK_STRAND)), 15, Some(&mut steps));
        let labels: Vec<&str> = steps.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Rpu", "Inc", "Cop", "Mvr", "off"]);
        let positions: Vec<isize> = steps.iter().map(|s| s.pos).collect();
        assert_eq!(positions, vec![15, 16, 17, 17, 18]);
        let symbols: String = steps.iter().map(|s| s.symbol).collect();
        assert_eq!(symbols, "GACC-");
        assert_eq!(steps[3].current, "TAGATCCAGTCCATCGAC");
        assert_eq!(steps[3].opposite, "G·················");
        assert!(steps[4].is_halt());
    }

    #[test]
    fn test_trace_done_line() {
        let mut steps: Vec<TraceStep> = vec![];
        book_enzyme().operate_on(Complex::new(strand(BOOK_STRAND)), 8, Some(&mut steps));
        assert_eq!(steps.len(), 9);
        let last = &steps[8];
        assert_eq!(last.label, "done");
        assert_eq!(last.pos, 4);
        assert_eq!(last.symbol, 'T');
        assert_eq!(last.current, "···ATG·············");
        assert_eq!(last.opposite, "TAGATCCAGTCCACATCGA");
        // Lpu runs on the former bottom track.
        assert_eq!(steps[6].label, "Lpu");
        assert_eq!(steps[6].current, "···AG·············");
    }

    #[test]
    fn test_trace_does_not_change_outcome() {
        let e = book_enzyme();
        for pos in [2, 8, 15] {
            let mut text = String::new();
            let traced = e.operate_on(Complex::new(strand(BOOK_STRAND)), pos, Some(&mut text));
            let silent = e.operate_on(Complex::new(strand(BOOK_STRAND)), pos, None);
            assert_eq!(traced, silent);
            assert!(text.lines().count() > 1);
        }
    }

    #[test]
    fn test_halt_on_gap() {
        let e = Enzyme::new(vec![Mvr, Mvr, Ina]).unwrap();
        let mut steps: Vec<TraceStep> = vec![];
        let c = e.operate_on(Complex::new(strand("AC·G")), 0, Some(&mut steps));
        assert_eq!(steps.last().unwrap().label, "empty");
        assert_eq!(steps.last().unwrap().symbol, GAP_SYMBOL);
        assert_eq!(c.top().to_string(), "AC·G");
    }

    #[test]
    fn test_delete_moves_left() {
        let e = Enzyme::new(vec![Del, Del]).unwrap();
        let c = e.operate_on(Complex::new(strand("ACGT")), 2, None);
        assert_eq!(c.top().to_string(), "A··T");
        let products: Vec<String> = c.products().iter().map(|p| p.to_string()).collect();
        assert_eq!(products, vec!["A", "T"]);
    }

    #[test]
    fn test_cut_inserts_gap() {
        let e = Enzyme::new(vec![Cut]).unwrap();
        let c = e.operate_on(Complex::new(strand("ACGT")), 1, None);
        assert!(c.is_balanced());
        assert_eq!(c.top().to_string(), "AC·GT");
        let products: Vec<String> = c.products().iter().map(|p| p.to_string()).collect();
        assert_eq!(products, vec!["AC", "GT"]);
    }

    #[test]
    fn test_insert_at_both_ends_keeps_tracks_balanced() {
        let e = Enzyme::new(vec![Cop, Ing]).unwrap();
        let c = e.operate_on(Complex::new(strand("ACGT")), 3, None);
        assert!(c.is_balanced());
        assert_eq!(c.top().to_string(), "ACGTG");
        assert_eq!(c.bottom().to_string(), "CA···");

        let e = Enzyme::new(vec![Swi, Cop, Int]).unwrap();
        let c = Complex::from_tracks(strand("ACGT"), strand("ACGT")).unwrap();
        let c = e.operate_on(c, 3, None);
        assert!(c.is_balanced());
        assert_eq!(c.len(), 5);
    }

    #[test]
    fn test_search_copies_when_in_copy_mode() {
        let e = Enzyme::new(vec![Cop, Rpy]).unwrap();
        let c = e.operate_on(Complex::new(strand("AGGC")), 0, None);
        assert_eq!(c.top().to_string(), "AGGC");
        assert_eq!(c.bottom().to_string(), "GCCT");
    }

    #[test]
    fn test_search_without_match_falls_off() {
        let e = Enzyme::new(vec![Lpy, Ina]).unwrap();
        let c = e.operate_on(Complex::new(strand("AAGA")), 3, None);
        assert_eq!(c.top().to_string(), "AAGA");
    }

    #[test]
    fn test_noop_round_trip() {
        let e = Enzyme::new(vec![Mvr, Mvl]).unwrap();
        let c = Complex::from_tracks(strand("AC·GTA"), strand("··TT·G")).unwrap();
        let before = c.products();
        let after = e.operate_on(c, 3, None).products();
        assert_eq!(before, after);
    }

    #[test]
    fn test_start_off_strand_is_a_no_op() {
        let e = book_enzyme();
        let c = Complex::new(strand("TA·A"));
        let mut steps: Vec<TraceStep> = vec![];
        assert_eq!(e.operate_on(c.clone(), 2, Some(&mut steps)), c);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].label, "empty");
        assert_eq!(e.operate_on(c.clone(), 10, None), c);
    }

    #[test]
    #[should_panic(expected = "invalid complex")]
    fn test_unbalanced_complex_panics() {
        let c = Complex {
            strands: [strand("ACG"), strand("AC")],
        };
        book_enzyme().operate_on(c, 0, None);
    }

    #[test]
    fn test_format_trace() {
        let mut steps: Vec<TraceStep> = vec![];
        book_enzyme().operate_on(Complex::new(strand(BOOK_STRAND)), 15, Some(&mut steps));
        let text = format_trace(&steps);
        assert_eq!(text.lines().count(), 5);
        assert!(text.starts_with("Rpu     15 G \"TAGATCCAGTCCATCGA\""));
        assert!(text.lines().last().unwrap().starts_with("off     18 -"));
    }
}
