// Unit tests for the pure pipeline stages

use chrono::Utc;

use uwcase::core::{
    aggregate, normalize, rank_cases, sanitize, sort_products, RankingPolicy, SanitizeError,
    SynonymTable,
};
use uwcase::models::{CaseRecord, SortCriterion, Verdict};

fn case(disease: &str, product: &str, verdict: Verdict) -> CaseRecord {
    CaseRecord {
        disease_type: disease.to_string(),
        product_name: Some(product.to_string()),
        company: None,
        verdict,
        content: format!("{} case detail", disease),
        summary: None,
        created_at: Utc::now(),
        source: "用户分享".to_string(),
    }
}

#[test]
fn test_normalization_idempotent() {
    let mut table = SynonymTable::new();
    table.insert("nodule", "thyroid-nodule lung-nodule");
    table.insert("thyroid", "thyroid-nodule");

    let first = normalize("thyroid nodule", &table);
    let second = normalize(&first.expanded, &table);

    for token in &first.tokens {
        assert!(second.tokens.contains(token), "lost token {}", token);
    }
}

#[test]
fn test_bidirectional_containment_scores_at_least_one() {
    // Record disease is a substring of the query token.
    let tokens = vec!["左侧甲状腺乳头状癌".to_string(), "已手术".to_string()];
    let ranked = rank_cases(&tokens, vec![case("甲状腺", "Plan A", Verdict::Pass)]);
    assert_eq!(ranked.len(), 1);
    assert!(ranked[0].score >= 1);

    // Query token is a substring of the record text.
    let tokens = vec!["结节".to_string(), "无血流".to_string()];
    let ranked = rank_cases(&tokens, vec![case("甲状腺结节", "Plan A", Verdict::Pass)]);
    assert_eq!(ranked.len(), 1);
    assert!(ranked[0].score >= 1);
}

#[test]
fn test_score_monotonicity() {
    let record = || case("thyroid-nodule", "Plan A", Verdict::Pass);

    let base_tokens = vec!["thyroid-nodule".to_string()];
    let more_tokens = vec!["thyroid-nodule".to_string(), "detail".to_string()];

    let base = rank_cases(&base_tokens, vec![record()]);
    let more = rank_cases(&more_tokens, vec![record()]);

    assert!(more[0].score >= base[0].score);
}

#[test]
fn test_sorter_stability_on_ties() {
    let cases = vec![
        case("gout", "First Plan", Verdict::Pass),
        case("gout", "Second Plan", Verdict::Pass),
    ];

    let mut products = aggregate(cases, &RankingPolicy::default());
    assert_eq!(products.len(), 2);

    // Identical pass rates, counts and scores: grouping order must survive.
    sort_products(&mut products, SortCriterion::Recommend);
    assert_eq!(products[0].name, "First Plan");
    assert_eq!(products[1].name, "Second Plan");
}

#[test]
fn test_sanitizer_strips_fences() {
    let products = sanitize("```json\n{\"products\":[]}\n```").unwrap();
    assert!(products.is_empty());
}

#[test]
fn test_sanitizer_rejects_garbage() {
    assert_eq!(
        sanitize("not json at all").unwrap_err(),
        SanitizeError::MalformedJson
    );
}

#[test]
fn test_aggregation_bounds() {
    let cases = vec![
        case("gout", "Plan A", Verdict::Pass),
        case("gout", "Plan A", Verdict::Reject),
        case("gout", "Plan A", Verdict::Manual),
        case("gout", "Plan B", Verdict::Exclude),
    ];

    for product in aggregate(cases, &RankingPolicy::default()) {
        assert!(product.pass_count <= product.total_count);
        assert!(product.total_count > 0);
        assert!((0.0..=1.0).contains(&product.pass_rate));
    }
}

#[test]
fn test_sort_criteria_order_by_their_scores() {
    let cases = vec![
        case("gout", "城市惠民保2024", Verdict::Pass),
        case("gout", "康宁重疾险", Verdict::Pass),
        case("gout", "普通医疗险", Verdict::Pass),
    ];

    let policy = RankingPolicy::default();
    let mut products = aggregate(cases, &policy);

    sort_products(&mut products, SortCriterion::Leverage);
    assert_eq!(products[0].name, "城市惠民保2024");

    sort_products(&mut products, SortCriterion::Coverage);
    assert_eq!(products[0].name, "康宁重疾险");
}
