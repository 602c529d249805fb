use crate::models::{ProductAggregate, SortCriterion};

/// Order aggregates by the selected criterion.
///
/// All branches use the stable `sort_by`, so exact ties keep the grouping
/// (first-seen) order. Scores are ordered with `total_cmp`; they are plain
/// tier values and never NaN, but total ordering keeps the comparator honest.
pub fn sort_products(products: &mut [ProductAggregate], criterion: SortCriterion) {
    match criterion {
        SortCriterion::Recommend => {
            // Pass rate descending, ties broken by case volume.
            products.sort_by(|a, b| {
                b.pass_rate
                    .total_cmp(&a.pass_rate)
                    .then_with(|| b.total_count.cmp(&a.total_count))
            });
        }
        SortCriterion::Leverage => {
            products.sort_by(|a, b| b.leverage_score.total_cmp(&a.leverage_score));
        }
        SortCriterion::Coverage => {
            products.sort_by(|a, b| b.coverage_score.total_cmp(&a.coverage_score));
        }
        SortCriterion::Company => {
            products.sort_by(|a, b| b.company_score.total_cmp(&a.company_score));
        }
    }
}

/// Parse the wire value of the sort selector.
pub fn parse_criterion(value: &str) -> Option<SortCriterion> {
    match value.trim().to_lowercase().as_str() {
        "recommend" => Some(SortCriterion::Recommend),
        "leverage" => Some(SortCriterion::Leverage),
        "coverage" => Some(SortCriterion::Coverage),
        "company" => Some(SortCriterion::Company),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, pass: usize, total: usize, leverage: f64, coverage: f64, company: f64) -> ProductAggregate {
        ProductAggregate {
            name: name.to_string(),
            company: None,
            cases: vec![],
            pass_count: pass,
            total_count: total,
            pass_rate: if total > 0 { pass as f64 / total as f64 } else { 0.0 },
            leverage_score: leverage,
            company_score: company,
            coverage_score: coverage,
        }
    }

    #[test]
    fn test_recommend_orders_by_pass_rate_then_volume() {
        let mut products = vec![
            product("low-rate", 1, 4, 0.0, 0.0, 0.0),
            product("high-rate-small", 2, 2, 0.0, 0.0, 0.0),
            product("high-rate-big", 5, 5, 0.0, 0.0, 0.0),
        ];

        sort_products(&mut products, SortCriterion::Recommend);

        assert_eq!(products[0].name, "high-rate-big");
        assert_eq!(products[1].name, "high-rate-small");
        assert_eq!(products[2].name, "low-rate");
    }

    #[test]
    fn test_leverage_sort_descending() {
        let mut products = vec![
            product("mid", 0, 1, 70.0, 0.0, 0.0),
            product("high", 0, 1, 95.0, 0.0, 0.0),
        ];

        sort_products(&mut products, SortCriterion::Leverage);
        assert_eq!(products[0].name, "high");
    }

    #[test]
    fn test_exact_ties_keep_input_order() {
        let mut products = vec![
            product("first", 1, 2, 70.0, 70.0, 70.0),
            product("second", 1, 2, 70.0, 70.0, 70.0),
            product("third", 1, 2, 70.0, 70.0, 70.0),
        ];

        for criterion in [
            SortCriterion::Recommend,
            SortCriterion::Leverage,
            SortCriterion::Coverage,
            SortCriterion::Company,
        ] {
            sort_products(&mut products, criterion);
            let order: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
            assert_eq!(order, vec!["first", "second", "third"]);
        }
    }

    #[test]
    fn test_parse_criterion() {
        assert_eq!(parse_criterion("recommend"), Some(SortCriterion::Recommend));
        assert_eq!(parse_criterion(" Coverage "), Some(SortCriterion::Coverage));
        assert_eq!(parse_criterion("lucky"), None);
    }
}
