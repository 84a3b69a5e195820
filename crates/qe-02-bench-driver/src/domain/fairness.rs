//! # Fairness Scoring
//!
//! After the run, both finished collections are sorted by pair index and
//! merge-joined. For every pair confirmed on both paths the path whose
//! command landed at the strictly lower height wins. Equal heights are ties
//! and count toward neither score.

use serde::Serialize;
use std::cmp::Ordering;

use super::request::{PairIndex, Path, ResolvedRequest};

/// Outcome of one compared pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PairResult {
    pub pair: PairIndex,
    pub strong_height: u32,
    pub weak_height: u32,
    /// `None` on a tie.
    pub winner: Option<Path>,
}

/// Result of the scoring pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FairnessReport {
    /// Compared pairs in pair-index order.
    pub pairs: Vec<PairResult>,
    pub strong_score: u64,
    pub weak_score: u64,
    pub ties: u64,
    /// Pairs confirmed on one path only.
    pub weak_only: u64,
    pub strong_only: u64,
}

impl FairnessReport {
    /// Number of compared pairs.
    #[must_use]
    pub fn total(&self) -> usize {
        self.pairs.len()
    }

    /// `strong_score / weak_score`, undefined when the weak path never won.
    #[must_use]
    pub fn ratio(&self) -> Option<f64> {
        if self.weak_score == 0 {
            None
        } else {
            Some(self.strong_score as f64 / self.weak_score as f64)
        }
    }
}

/// Score the two finished collections.
#[must_use]
pub fn score(mut weak: Vec<ResolvedRequest>, mut strong: Vec<ResolvedRequest>) -> FairnessReport {
    weak.sort_by_key(|r| r.pair);
    strong.sort_by_key(|r| r.pair);

    let mut report = FairnessReport::default();
    let (mut w, mut s) = (weak.iter().peekable(), strong.iter().peekable());

    loop {
        match (w.peek(), s.peek()) {
            (Some(wr), Some(sr)) => match wr.pair.cmp(&sr.pair) {
                Ordering::Less => {
                    report.weak_only += 1;
                    w.next();
                }
                Ordering::Greater => {
                    report.strong_only += 1;
                    s.next();
                }
                Ordering::Equal => {
                    let winner = match sr.height.cmp(&wr.height) {
                        Ordering::Less => {
                            report.strong_score += 1;
                            Some(Path::Strong)
                        }
                        Ordering::Greater => {
                            report.weak_score += 1;
                            Some(Path::Weak)
                        }
                        Ordering::Equal => {
                            report.ties += 1;
                            None
                        }
                    };
                    report.pairs.push(PairResult {
                        pair: sr.pair,
                        strong_height: sr.height,
                        weak_height: wr.height,
                        winner,
                    });
                    w.next();
                    s.next();
                }
            },
            (Some(_), None) => {
                report.weak_only += 1;
                w.next();
            }
            (None, Some(_)) => {
                report.strong_only += 1;
                s.next();
            }
            (None, None) => break,
        }
    }
    report
}
