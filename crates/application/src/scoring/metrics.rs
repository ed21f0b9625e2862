//! Text comparison metrics.
//!
//! Every function here is pure and returns a score in [0, 1]. A missing reference or an
//! empty evidence list yields 0.0 rather than an error; whether a metric applies at all
//! is decided by the scoring engine.

use std::collections::HashSet;

/// Recall weighting used by [`rouge_l`].
pub const ROUGE_L_BETA: f64 = 1.2;

/// 1.0 when the trimmed prediction equals the trimmed reference.
pub fn exact_match(prediction: &str, reference: Option<&str>) -> f64 {
    match reference {
        Some(reference) if prediction.trim() == reference.trim() => 1.0,
        _ => 0.0,
    }
}

/// Harmonic mean of token precision and recall.
///
/// Tokens are lower-cased and split on whitespace. Overlap counts distinct shared
/// tokens, so repeating a matching token does not earn extra credit, while precision and
/// recall still divide by the full token counts.
pub fn token_f1(prediction: &str, reference: Option<&str>) -> f64 {
    let Some(reference) = reference else {
        return 0.0;
    };

    let prediction = prediction.to_lowercase();
    let reference = reference.to_lowercase();
    let pred_tokens: Vec<&str> = prediction.split_whitespace().collect();
    let ref_tokens: Vec<&str> = reference.split_whitespace().collect();

    if pred_tokens.is_empty() || ref_tokens.is_empty() {
        return 0.0;
    }

    let pred_set: HashSet<&str> = pred_tokens.iter().copied().collect();
    let ref_set: HashSet<&str> = ref_tokens.iter().copied().collect();
    let common = pred_set.intersection(&ref_set).count();

    if common == 0 {
        return 0.0;
    }

    let precision = common as f64 / pred_tokens.len() as f64;
    let recall = common as f64 / ref_tokens.len() as f64;

    2.0 * precision * recall / (precision + recall)
}

/// Length of the longest common subsequence of two token sequences.
///
/// Uses a single rolling row sized to the shorter sequence, so memory stays
/// O(min(n, m)) while time is O(n * m).
pub fn lcs_length<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    // LCS length is symmetric; roll over the shorter side.
    let (outer, inner) = if a.len() >= b.len() { (a, b) } else { (b, a) };

    let mut dp = vec![0usize; inner.len() + 1];
    for token in outer {
        let mut diagonal = 0;
        for (j, other) in inner.iter().enumerate() {
            let above = dp[j + 1];
            dp[j + 1] = if token == other {
                diagonal + 1
            } else {
                above.max(dp[j])
            };
            diagonal = above;
        }
    }

    dp[inner.len()]
}

/// ROUGE-L F-measure over whitespace tokens, weighted toward recall.
///
/// Tokens are compared case-sensitively and in order.
pub fn rouge_l(prediction: &str, reference: Option<&str>) -> f64 {
    let Some(reference) = reference else {
        return 0.0;
    };

    let pred_tokens: Vec<&str> = prediction.split_whitespace().collect();
    let ref_tokens: Vec<&str> = reference.split_whitespace().collect();

    let lcs = lcs_length(&pred_tokens, &ref_tokens);
    if lcs == 0 {
        return 0.0;
    }

    let precision = lcs as f64 / pred_tokens.len() as f64;
    let recall = lcs as f64 / ref_tokens.len() as f64;
    let beta_sq = ROUGE_L_BETA * ROUGE_L_BETA;

    let denominator = recall + beta_sq * precision;
    if denominator == 0.0 {
        return 0.0;
    }

    (1.0 + beta_sq) * precision * recall / denominator
}

/// Fraction of evidence items found in the prediction, ignoring case.
pub fn evidence_coverage<S: AsRef<str>>(prediction: &str, evidence: &[S]) -> f64 {
    if evidence.is_empty() {
        return 0.0;
    }

    let prediction = prediction.to_lowercase();
    let covered = evidence
        .iter()
        .filter(|item| prediction.contains(&item.as_ref().to_lowercase()))
        .count();

    covered as f64 / evidence.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_exact_match() {
        assert_eq!(exact_match("  Paris ", Some("Paris")), 1.0);
        assert_eq!(exact_match("paris", Some("Paris")), 0.0);
        assert_eq!(exact_match("Paris", None), 0.0);
    }

    #[test]
    fn test_token_f1_identical() {
        assert_eq!(token_f1("The cat sat", Some("the CAT sat")), 1.0);
    }

    #[test]
    fn test_token_f1_partial_overlap() {
        // common = {cat}, p = 1/2, r = 1/3
        let score = token_f1("cat dog", Some("a cat sat"));
        assert!(approx(score, 2.0 * 0.5 * (1.0 / 3.0) / (0.5 + 1.0 / 3.0)));
    }

    #[test]
    fn test_token_f1_duplicates_do_not_add_credit() {
        // common = {cat}, p = 1/3, r = 1/1
        let score = token_f1("cat cat cat", Some("cat"));
        assert!(approx(score, 0.5));
    }

    #[test]
    fn test_token_f1_degenerate_inputs() {
        assert_eq!(token_f1("anything", None), 0.0);
        assert_eq!(token_f1("   ", Some("words")), 0.0);
        assert_eq!(token_f1("words", Some("")), 0.0);
        assert_eq!(token_f1("alpha", Some("beta")), 0.0);
    }

    #[test]
    fn test_lcs_length() {
        assert_eq!(lcs_length(&["a", "b", "c"], &["a", "c"]), 2);
        assert_eq!(lcs_length(&["a", "c"], &["a", "b", "c"]), 2);
        assert_eq!(lcs_length(&["a", "b"], &["c", "d"]), 0);
        assert_eq!(lcs_length::<&str>(&[], &["a"]), 0);
        assert_eq!(lcs_length(&["x", "a", "y", "b"], &["a", "b", "x", "y"]), 2);
    }

    #[test]
    fn test_lcs_length_is_order_preserving() {
        assert_eq!(lcs_length(&["b", "a"], &["a", "b"]), 1);
    }

    #[test]
    fn test_rouge_l_identical() {
        assert_eq!(rouge_l("the quick brown fox", Some("the quick brown fox")), 1.0);
    }

    #[test]
    fn test_rouge_l_weighted_toward_recall() {
        // lcs = 2, p = 2/3, r = 2/2
        let p: f64 = 2.0 / 3.0;
        let r: f64 = 1.0;
        let beta_sq = ROUGE_L_BETA * ROUGE_L_BETA;
        let expected = (1.0 + beta_sq) * p * r / (r + beta_sq * p);

        assert!(approx(rouge_l("a b c", Some("a c")), expected));
    }

    #[test]
    fn test_rouge_l_is_case_sensitive() {
        assert_eq!(rouge_l("Alpha", Some("alpha")), 0.0);
    }

    #[test]
    fn test_rouge_l_missing_inputs() {
        assert_eq!(rouge_l("text", None), 0.0);
        assert_eq!(rouge_l("", Some("text")), 0.0);
        assert_eq!(rouge_l("text", Some("")), 0.0);
    }

    #[test]
    fn test_evidence_coverage() {
        assert_eq!(evidence_coverage("the cat sat", &["cat", "dog"]), 0.5);
        assert_eq!(evidence_coverage("The CAT sat", &["cat"]), 1.0);
        assert_eq!(evidence_coverage::<&str>("anything", &[]), 0.0);
    }
}
