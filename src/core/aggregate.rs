use std::collections::HashMap;

use crate::models::{CaseRecord, ProductAggregate, Verdict};

/// Label used when a case record carries no product name.
pub const UNKNOWN_PRODUCT: &str = "unknown product";

/// Fixed keyword sets behind the heuristic product scores.
///
/// These are deterministic rule lookups, not learned weights: the same input
/// always produces the same score. The keyword lists and tier values are
/// plain data so deployments can override them from configuration.
#[derive(Debug, Clone)]
pub struct RankingPolicy {
    /// Product-name markers for low-threshold/inclusive products (惠民保 tier).
    pub inclusive_markers: Vec<String>,
    /// Product-name markers for critical-illness/high-payout products.
    pub critical_markers: Vec<String>,
    /// Company names treated as recognized large insurers.
    pub major_insurers: Vec<String>,
    pub high_tier: f64,
    pub mid_tier: f64,
    pub low_tier: f64,
}

impl Default for RankingPolicy {
    fn default() -> Self {
        Self {
            inclusive_markers: vec![
                "惠民".to_string(),
                "普惠".to_string(),
                "inclusive".to_string(),
            ],
            critical_markers: vec![
                "重疾".to_string(),
                "防癌".to_string(),
                "critical".to_string(),
            ],
            major_insurers: vec![
                "平安".to_string(),
                "国寿".to_string(),
                "太平洋".to_string(),
                "人保".to_string(),
                "泰康".to_string(),
                "友邦".to_string(),
            ],
            high_tier: 95.0,
            mid_tier: 70.0,
            low_tier: 55.0,
        }
    }
}

impl RankingPolicy {
    /// Inclusive products lever a small premium into broad acceptance;
    /// critical-illness products trade leverage for payout size.
    pub fn leverage_score(&self, product_name: &str) -> f64 {
        let name = product_name.to_lowercase();
        if contains_any(&name, &self.inclusive_markers) {
            self.high_tier
        } else if contains_any(&name, &self.critical_markers) {
            self.low_tier
        } else {
            self.mid_tier
        }
    }

    /// Mirror image of leverage: critical-illness products cover the most.
    pub fn coverage_score(&self, product_name: &str) -> f64 {
        let name = product_name.to_lowercase();
        if contains_any(&name, &self.critical_markers) {
            self.high_tier
        } else if contains_any(&name, &self.inclusive_markers) {
            self.low_tier
        } else {
            self.mid_tier
        }
    }

    pub fn company_score(&self, company: Option<&str>) -> f64 {
        match company {
            Some(c) if contains_any(&c.to_lowercase(), &self.major_insurers) => self.high_tier,
            _ => self.mid_tier,
        }
    }
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles
        .iter()
        .any(|n| !n.is_empty() && haystack.contains(&n.to_lowercase()))
}

/// Group flat case records into per-product aggregates.
///
/// Groups appear in first-seen order; within a group, cases keep the
/// repository's return order. Company is taken from the first case that
/// names one.
pub fn aggregate(cases: Vec<CaseRecord>, policy: &RankingPolicy) -> Vec<ProductAggregate> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<CaseRecord>> = HashMap::new();

    for case in cases {
        let name = case
            .product_name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_PRODUCT.to_string());

        if !groups.contains_key(&name) {
            order.push(name.clone());
        }
        groups.entry(name).or_default().push(case);
    }

    order
        .into_iter()
        .map(|name| {
            let cases = groups.remove(&name).unwrap_or_default();
            let total_count = cases.len();
            let pass_count = cases.iter().filter(|c| c.verdict == Verdict::Pass).count();
            let pass_rate = if total_count > 0 {
                pass_count as f64 / total_count as f64
            } else {
                0.0
            };
            let company = cases.iter().find_map(|c| c.company.clone());

            ProductAggregate {
                leverage_score: policy.leverage_score(&name),
                coverage_score: policy.coverage_score(&name),
                company_score: policy.company_score(company.as_deref()),
                name,
                company,
                cases,
                pass_count,
                total_count,
                pass_rate,
            }
        })
        .collect()
}
