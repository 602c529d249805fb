// Criterion benchmarks for UWCase

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use chrono::Utc;

use uwcase::core::{aggregate, normalize, rank_cases, RankingPolicy, SynonymTable};
use uwcase::models::{CaseRecord, Verdict};

fn create_case(i: usize) -> CaseRecord {
    let diseases = ["甲状腺结节", "肺结节", "乙肝", "糖尿病", "高血压"];
    let products = ["Plan A", "城市惠民保2024", "康宁重疾险", "Plan D"];
    let verdicts = [Verdict::Pass, Verdict::Exclude, Verdict::Reject, Verdict::Manual];

    CaseRecord {
        disease_type: diseases[i % diseases.len()].to_string(),
        product_name: Some(products[i % products.len()].to_string()),
        company: Some("平安".to_string()),
        verdict: verdicts[i % verdicts.len()],
        content: format!("case {} 复查无变化，边界清晰", i),
        summary: None,
        created_at: Utc::now(),
        source: "用户分享".to_string(),
    }
}

fn bench_normalize(c: &mut Criterion) {
    let table = SynonymTable::builtin();

    c.bench_function("normalize_colloquial_query", |b| {
        b.iter(|| black_box(normalize("左侧甲状腺结节4a 血糖高", &table)));
    });
}

fn bench_ranking(c: &mut Criterion) {
    let tokens = vec![
        "甲状腺结节".to_string(),
        "边界清晰".to_string(),
        "复查".to_string(),
    ];

    let mut group = c.benchmark_group("rank_cases");
    for size in [10usize, 100, 1000] {
        let cases: Vec<CaseRecord> = (0..size).map(create_case).collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &cases, |b, cases| {
            b.iter(|| black_box(rank_cases(&tokens, cases.clone())));
        });
    }
    group.finish();
}

fn bench_aggregate(c: &mut Criterion) {
    let policy = RankingPolicy::default();
    let cases: Vec<CaseRecord> = (0..100).map(create_case).collect();

    c.bench_function("aggregate_100_cases", |b| {
        b.iter(|| black_box(aggregate(cases.clone(), &policy)));
    });
}

criterion_group!(benches, bench_normalize, bench_ranking, bench_aggregate);

criterion_main!(benches);
