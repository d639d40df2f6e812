//! Synthetic scores for when the remote service is unavailable.
//!
//! The values are plausible but carry no information about the image; they
//! are marked `ml_source: "fallback"` so callers can tell them apart.

use crate::models::{Analysis, AnalysisResult, Scores};
use rand::Rng;

pub const FALLBACK_SOURCE: &str = "fallback";

const MIN_SCORE: f64 = 0.0;
const MAX_SCORE: f64 = 10.0;

/// Build a fallback result from the given random source.
pub fn fallback_result<R: Rng + ?Sized>(rng: &mut R) -> AnalysisResult {
    let aesthetic: f64 = rng.gen_range(5.0..8.0);
    let blur = clamp_score(aesthetic + rng.gen_range(-1.0..1.5));
    let composition = clamp_score(aesthetic + rng.gen_range(-0.75..0.75));
    let combined = clamp_score(
        aesthetic * 0.5 + blur * 0.2 + composition * 0.3 + rng.gen_range(-0.25..0.25),
    );

    let scores = Scores {
        aesthetic_score: round2(aesthetic),
        blur_score: round2(blur),
        composition_score: round2(composition),
        combined_score: round2(combined),
    };

    AnalysisResult {
        status: "success".to_string(),
        analysis: Analysis {
            blur_category: blur_category(scores.blur_score).to_string(),
            face_detected: false,
            aesthetic_rating: aesthetic_rating(scores.aesthetic_score).to_string(),
            recommendation: "maybe".to_string(),
            action: "manual_review".to_string(),
        },
        scores,
        ml_source: FALLBACK_SOURCE.to_string(),
    }
}

fn clamp_score(score: f64) -> f64 {
    score.clamp(MIN_SCORE, MAX_SCORE)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn blur_category(blur_score: f64) -> &'static str {
    if blur_score >= 7.0 {
        "sharp"
    } else if blur_score >= 4.0 {
        "slightly_blurry"
    } else {
        "blurry"
    }
}

fn aesthetic_rating(aesthetic_score: f64) -> &'static str {
    if aesthetic_score >= 7.0 {
        "high"
    } else if aesthetic_score >= 5.0 {
        "medium"
    } else {
        "low"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn is_rounded(value: f64) -> bool {
        ((value * 100.0).round() - value * 100.0).abs() < 1e-6
    }

    #[test]
    fn test_scores_are_rounded_and_in_range() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..200 {
            let result = fallback_result(&mut rng);
            let s = &result.scores;

            assert!((5.0..=8.0).contains(&s.aesthetic_score));
            for value in [
                s.aesthetic_score,
                s.blur_score,
                s.composition_score,
                s.combined_score,
            ] {
                assert!((MIN_SCORE..=MAX_SCORE).contains(&value));
                assert!(is_rounded(value), "{} not rounded to 2 decimals", value);
            }
        }
    }

    #[test]
    fn test_fixed_analysis_fields() {
        let result = fallback_result(&mut StdRng::seed_from_u64(1));

        assert_eq!(result.status, "success");
        assert_eq!(result.ml_source, "fallback");
        assert!(!result.analysis.face_detected);
        assert_eq!(result.analysis.recommendation, "maybe");
        assert_eq!(result.analysis.action, "manual_review");
    }

    #[test]
    fn test_same_seed_same_result() {
        let a = fallback_result(&mut StdRng::seed_from_u64(42));
        let b = fallback_result(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_categories_follow_scores() {
        assert_eq!(blur_category(7.5), "sharp");
        assert_eq!(blur_category(4.0), "slightly_blurry");
        assert_eq!(blur_category(3.99), "blurry");
        assert_eq!(aesthetic_rating(7.0), "high");
        assert_eq!(aesthetic_rating(6.2), "medium");
        assert_eq!(aesthetic_rating(2.0), "low");
    }

    #[test]
    fn test_serializes_with_expected_keys() {
        let value = serde_json::to_value(fallback_result(&mut StdRng::seed_from_u64(3))).unwrap();

        for key in [
            "aesthetic_score",
            "blur_score",
            "composition_score",
            "combined_score",
        ] {
            assert!(value["scores"][key].is_f64(), "missing {}", key);
        }
        assert_eq!(value["ml_source"], "fallback");
    }
}
