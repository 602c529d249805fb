use crate::models::{CaseRecord, ScoredCase};

/// Re-rank broad-retrieval candidates against the full token set.
///
/// The repository already did the wide-net retrieval on the primary token
/// (recall over precision); this is the precision stage. With a single token
/// there is nothing to re-rank: every candidate keeps its recency order with
/// score 1. With multiple tokens each record is scored by the number of
/// tokens found in the lower-cased concatenation of its disease label,
/// content, product name and verdict; score-0 records are dropped and the
/// rest are stable-sorted by score descending, so ties keep the repository's
/// recency order.
pub fn rank_cases(tokens: &[String], candidates: Vec<CaseRecord>) -> Vec<ScoredCase> {
    if tokens.len() <= 1 {
        return candidates
            .into_iter()
            .map(|record| ScoredCase { record, score: 1 })
            .collect();
    }

    let mut scored: Vec<ScoredCase> = candidates
        .into_iter()
        .filter_map(|record| {
            let score = score_record(tokens, &record);
            if score > 0 {
                Some(ScoredCase { record, score })
            } else {
                None
            }
        })
        .collect();

    // sort_by is stable: equal scores preserve input order.
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}

/// Count how many tokens hit this record.
///
/// A token counts when the record's text contains it, or — mirroring the
/// reverse match of the original library ("左侧甲状腺乳头状癌" must still hit a
/// record labeled "甲状腺") — when the token contains the record's disease
/// label (labels of length 1 are too ambiguous to reverse-match).
fn score_record(tokens: &[String], record: &CaseRecord) -> usize {
    let haystack = format!(
        "{} {} {} {}",
        record.disease_type,
        record.content,
        record.product_name.as_deref().unwrap_or(""),
        record.verdict
    )
    .to_lowercase();

    let disease = record.disease_type.to_lowercase();
    let reverse_ok = disease.chars().count() > 1;

    tokens
        .iter()
        .filter(|token| haystack.contains(token.as_str()) || (reverse_ok && token.contains(&disease)))
        .count()
}
