//! On-demand vs provisioned decision for a single table
//!
//! The checks run cheapest first and the first one that matches decides.
//! All price comparisons are made per 720-hour month.

use super::aggregation::UsageAggregate;
use super::pricing::PricingModel;
use super::window::MONTHS;
use crate::provider::BillingMode;
use serde::Serialize;

/// Consumed units equal to one provisioned unit held for 30 days
/// (86,400 seconds/day × 30 days).
pub const UNIT_THRESHOLD: f64 = 2_592_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Table is on-demand and on-demand was the cheaper mode
    OnDemandConfirmedOptimal,
    /// Table is provisioned and on-demand would have been cheaper
    OnDemandWouldSave,
    /// Every month's on-demand cost undercut the provisioned estimate
    ProvisionedExceedsOnDemand,
    NoSuggestion,
}

impl Verdict {
    /// Whether an operator should look at the table
    pub fn needs_attention(&self) -> bool {
        !matches!(self, Verdict::OnDemandConfirmedOptimal)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Verdict::OnDemandConfirmedOptimal => "on-demand confirmed optimal",
            Verdict::OnDemandWouldSave => "on-demand would save money",
            Verdict::ProvisionedExceedsOnDemand => "provisioned exceeds on-demand",
            Verdict::NoSuggestion => "no suggestion",
        };
        f.write_str(s)
    }
}

/// Which check produced the verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Basis {
    /// 90-day totals below one unit-month
    WindowTotals,
    /// Each monthly total below one unit-month
    MonthlyTotals,
    /// Each month's on-demand cost below one read + one write unit-month
    PriceFloor,
    /// Each month's on-demand cost below the provisioned estimate
    ProvisionedCost,
    Inconclusive,
}

impl std::fmt::Display for Basis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Basis::WindowTotals => "3 month total",
            Basis::MonthlyTotals => "one month totals",
            Basis::PriceFloor => "monthly on-demand prices below minimum",
            Basis::ProvisionedCost => "provisioned price exceeded on-demand price",
            Basis::Inconclusive => "no check matched",
        };
        f.write_str(s)
    }
}

/// Monthly prices backing the price-based checks
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostDetails {
    /// On-demand cost per month, newest first
    pub monthly_on_demand: [f64; MONTHS],
    pub minimum_provisioned_monthly: f64,
    /// `None` when the table had no provisioned-capacity datapoints
    pub provisioned_monthly_estimate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub verdict: Verdict,
    pub basis: Basis,
    pub current_mode: BillingMode,
    pub sum_writes: f64,
    pub sum_reads: f64,
    /// Present for the price-based outcomes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub costs: Option<CostDetails>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationInput {
    pub usage: UsageAggregate,
    pub provisioned_monthly_estimate: Option<f64>,
    pub current_mode: BillingMode,
}

fn on_demand_verdict(mode: BillingMode) -> Verdict {
    match mode {
        BillingMode::OnDemand => Verdict::OnDemandConfirmedOptimal,
        BillingMode::Provisioned => Verdict::OnDemandWouldSave,
    }
}

pub fn recommend(input: &RecommendationInput, pricing: &PricingModel) -> Recommendation {
    let usage = &input.usage;
    let decide = |verdict: Verdict, basis: Basis, costs: Option<CostDetails>| Recommendation {
        verdict,
        basis,
        current_mode: input.current_mode,
        sum_writes: usage.window.writes,
        sum_reads: usage.window.reads,
        costs,
    };

    if usage.window.writes < UNIT_THRESHOLD && usage.window.reads < UNIT_THRESHOLD {
        return decide(on_demand_verdict(input.current_mode), Basis::WindowTotals, None);
    }

    if usage
        .months
        .iter()
        .all(|m| m.writes < UNIT_THRESHOLD && m.reads < UNIT_THRESHOLD)
    {
        return decide(on_demand_verdict(input.current_mode), Basis::MonthlyTotals, None);
    }

    let monthly_on_demand = usage
        .months
        .map(|m| pricing.on_demand_cost(m.writes, m.reads));
    let costs = CostDetails {
        monthly_on_demand,
        minimum_provisioned_monthly: pricing.minimum_provisioned_monthly(),
        provisioned_monthly_estimate: input.provisioned_monthly_estimate,
    };

    if monthly_on_demand
        .iter()
        .all(|cost| *cost < costs.minimum_provisioned_monthly)
    {
        return decide(on_demand_verdict(input.current_mode), Basis::PriceFloor, Some(costs));
    }

    if let Some(estimate) = input.provisioned_monthly_estimate {
        if monthly_on_demand.iter().all(|cost| *cost < estimate) {
            return decide(Verdict::ProvisionedExceedsOnDemand, Basis::ProvisionedCost, Some(costs));
        }
    }

    decide(Verdict::NoSuggestion, Basis::Inconclusive, Some(costs))
}
