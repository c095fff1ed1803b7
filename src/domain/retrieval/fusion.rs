//! Result fusion for combining independently ranked result lists
//!
//! Both methods key results by `chunk_id`. Output is ordered by descending
//! fused score; equal scores keep the order in which a chunk first appeared
//! across the input rankings. Fused results are re-ranked from 1 and tagged
//! with the hybrid source.

use std::cmp::Ordering;
use std::collections::HashMap;

use super::request::FusionMethod;
use super::result::{assign_ranks, RetrievalResult, SOURCE_HYBRID};

/// Parameters for [`fuse`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusionParams {
    pub method: FusionMethod,
    pub rrf_k: u32,
    pub semantic_weight: f64,
    pub keyword_weight: f64,
}

/// Combine a semantic and a keyword ranking with the selected method
pub fn fuse(
    semantic: &[RetrievalResult],
    keyword: &[RetrievalResult],
    params: &FusionParams,
) -> Vec<RetrievalResult> {
    match params.method {
        FusionMethod::Rrf => fuse_rrf(&[semantic, keyword], params.rrf_k),
        FusionMethod::Weighted => fuse_weighted(
            semantic,
            keyword,
            params.semantic_weight,
            params.keyword_weight,
        ),
    }
}

/// Reciprocal Rank Fusion
///
/// score(chunk) = sum over rankings of 1 / (rrf_k + rank_in_that_ranking),
/// with rank counted from 1 by position.
pub fn fuse_rrf(rankings: &[&[RetrievalResult]], rrf_k: u32) -> Vec<RetrievalResult> {
    let mut accumulator = Accumulator::default();

    for ranking in rankings {
        for (position, result) in ranking.iter().enumerate() {
            let contribution = 1.0 / (rrf_k as f64 + position as f64 + 1.0);
            accumulator.add(result, contribution);
        }
    }

    accumulator.finish()
}

/// Weighted score fusion
///
/// Each ranking's scores are min-max normalized into [0, 1] first; a chunk
/// absent from a ranking contributes 0 for it.
pub fn fuse_weighted(
    semantic: &[RetrievalResult],
    keyword: &[RetrievalResult],
    semantic_weight: f64,
    keyword_weight: f64,
) -> Vec<RetrievalResult> {
    let mut accumulator = Accumulator::default();

    for (ranking, weight) in [(semantic, semantic_weight), (keyword, keyword_weight)] {
        let normalized = min_max_normalize(ranking);
        for (result, score) in ranking.iter().zip(normalized) {
            accumulator.add(result, weight * score);
        }
    }

    accumulator.finish()
}

fn min_max_normalize(ranking: &[RetrievalResult]) -> Vec<f64> {
    let min = ranking.iter().map(|r| r.score).fold(f64::INFINITY, f64::min);
    let max = ranking
        .iter()
        .map(|r| r.score)
        .fold(f64::NEG_INFINITY, f64::max);
    let spread = max - min;

    ranking
        .iter()
        .map(|r| {
            if spread > 0.0 {
                (r.score - min) / spread
            } else {
                1.0
            }
        })
        .collect()
}

#[derive(Default)]
struct Accumulator {
    order: Vec<RetrievalResult>,
    index: HashMap<String, usize>,
    scores: Vec<f64>,
}

impl Accumulator {
    fn add(&mut self, result: &RetrievalResult, contribution: f64) {
        match self.index.get(&result.chunk_id) {
            Some(&slot) => self.scores[slot] += contribution,
            None => {
                self.index.insert(result.chunk_id.clone(), self.order.len());
                self.order.push(result.clone());
                self.scores.push(contribution);
            }
        }
    }

    fn finish(self) -> Vec<RetrievalResult> {
        let mut fused: Vec<RetrievalResult> = self
            .order
            .into_iter()
            .zip(self.scores)
            .map(|(mut result, score)| {
                result.score = score;
                result.source = SOURCE_HYBRID.to_string();
                result
            })
            .collect();

        // stable sort keeps first-appearance order for ties
        fused.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        assign_ranks(&mut fused);
        fused
    }
}
