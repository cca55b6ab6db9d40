//! Property-based tests for the cost advisor's pure pieces

use chrono::{Duration, NaiveDate};
use hygienectl::cost::aggregation::{aggregate, UsageAggregate, UsageTotals};
use hygienectl::cost::estimator::estimate_provisioned;
use hygienectl::cost::recommender::{recommend, Basis, RecommendationInput};
use hygienectl::cost::window::{DailySeries, LookbackWindow};
use hygienectl::cost::{PricingModel, Verdict, UNIT_THRESHOLD};
use hygienectl::provider::BillingMode;
use proptest::prelude::*;

fn window() -> LookbackWindow {
    LookbackWindow::ending_at(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap())
}

fn sparse_series() -> impl Strategy<Value = Vec<(i64, u32)>> {
    prop::collection::vec((-10i64..100, 0u32..1_000_000), 0..120)
}

fn to_series(w: &LookbackWindow, points: &[(i64, u32)]) -> DailySeries {
    points
        .iter()
        .map(|(offset, value)| (w.start() + Duration::days(*offset), f64::from(*value)))
        .collect()
}

proptest! {
    #[test]
    fn test_totals_below_threshold_decide_on_window(
        writes in 0u32..2_592_000,
        reads in 0u32..2_592_000,
        provisioned in any::<bool>(),
        estimate in prop::option::of(0.0f64..1000.0),
    ) {
        let mode = if provisioned { BillingMode::Provisioned } else { BillingMode::OnDemand };
        let input = RecommendationInput {
            usage: UsageAggregate {
                window: UsageTotals { writes: f64::from(writes), reads: f64::from(reads) },
                months: [UsageTotals::default(); 3],
            },
            provisioned_monthly_estimate: estimate,
            current_mode: mode,
        };
        let rec = recommend(&input, &PricingModel::default());

        prop_assert_eq!(rec.basis, Basis::WindowTotals);
        prop_assert!(rec.costs.is_none());
        let expected = if provisioned {
            Verdict::OnDemandWouldSave
        } else {
            Verdict::OnDemandConfirmedOptimal
        };
        prop_assert_eq!(rec.verdict, expected);
    }

    #[test]
    fn test_on_demand_cost_strictly_increasing(
        base in 0.0f64..1e9,
        extra in 1.0f64..1e9,
        other in 0.0f64..1e9,
    ) {
        let pricing = PricingModel::default();
        let cost = |writes: f64, reads: f64| pricing.on_demand_cost(writes, reads);
        prop_assert!(cost(base + extra, other) > cost(base, other));
        prop_assert!(cost(other, base + extra) > cost(other, base));
    }

    #[test]
    fn test_buckets_partition_the_window(
        writes in sparse_series(),
        reads in sparse_series(),
    ) {
        let w = window();
        let writes = to_series(&w, &writes);
        let reads = to_series(&w, &reads);
        let agg = aggregate(&w, &writes, &reads);

        let in_window = |series: &DailySeries| -> f64 {
            series.iter().filter(|(d, _)| w.contains(**d)).map(|(_, v)| v).sum()
        };
        // Integer-valued samples keep these sums exact
        prop_assert_eq!(agg.window.writes, in_window(&writes));
        prop_assert_eq!(agg.window.reads, in_window(&reads));
        prop_assert_eq!(agg.months.iter().map(|m| m.writes).sum::<f64>(), agg.window.writes);
        prop_assert_eq!(agg.months.iter().map(|m| m.reads).sum::<f64>(), agg.window.reads);
    }

    #[test]
    fn test_estimate_units_cover_the_mean(
        reads in prop::collection::vec(0.0f64..10_000.0, 1..90),
        writes in prop::collection::vec(0.0f64..10_000.0, 1..90),
    ) {
        let pricing = PricingModel::default();
        let estimate = estimate_provisioned("t", &reads, &writes, &pricing).unwrap();
        let mean = |v: &[f64]| v.iter().sum::<f64>() / v.len() as f64;

        prop_assert!(estimate.read_units as f64 >= mean(&reads));
        prop_assert!((estimate.read_units as f64) < mean(&reads) + 1.0);
        prop_assert!(estimate.write_units as f64 >= mean(&writes));
        prop_assert!(estimate.monthly_cost >= 0.0);
    }
}

#[test]
fn test_threshold_is_one_unit_month() {
    assert_eq!(UNIT_THRESHOLD, 86_400.0 * 30.0);
}
