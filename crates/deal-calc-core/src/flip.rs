use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::assumptions::MAX_TERM_YEARS;
use crate::error::{ensure_amount, ensure_percent, DealCalcError};
use crate::metrics::percent_of;
use crate::types::{percent_to_fraction, with_metadata, ComputationOutput, Money, Percent};
use crate::DealCalcResult;

pub const DEFAULT_CLOSING_COST_PERCENT: Percent = dec!(2);
pub const DEFAULT_SELLING_COST_PERCENT: Percent = dec!(8);
/// Pay no more than this share of ARV, less repairs.
pub const DEFAULT_MAX_OFFER_RULE_PERCENT: Percent = dec!(70);

fn default_closing_cost_percent() -> Percent {
    DEFAULT_CLOSING_COST_PERCENT
}

fn default_selling_cost_percent() -> Percent {
    DEFAULT_SELLING_COST_PERCENT
}

fn default_max_offer_rule_percent() -> Percent {
    DEFAULT_MAX_OFFER_RULE_PERCENT
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Short-term, interest-only acquisition financing (hard money).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlipFinancing {
    /// Loan as a percentage of the financed cost basis
    pub loan_to_cost_percent: Percent,
    /// Annual interest rate, percent
    pub interest_rate: Percent,
    /// Origination points, percent of loan
    #[serde(default)]
    pub points_percent: Percent,
    /// Whether the rehab budget is part of the financed basis
    #[serde(default)]
    pub finance_rehab: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlipInput {
    pub purchase_price: Money,
    pub rehab_cost: Money,
    /// After repair value
    pub after_repair_value: Money,
    pub holding_months: u32,
    /// Taxes, insurance, utilities while the property is held
    #[serde(default)]
    pub monthly_holding_costs: Money,
    /// Buy-side closing costs, percent of purchase price
    #[serde(default = "default_closing_cost_percent")]
    pub closing_cost_percent: Percent,
    /// Commissions and sell-side closing, percent of ARV
    #[serde(default = "default_selling_cost_percent")]
    pub selling_cost_percent: Percent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financing: Option<FlipFinancing>,
    #[serde(default = "default_max_offer_rule_percent")]
    pub max_offer_rule_percent: Percent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlipOutput {
    pub closing_costs: Money,
    pub loan_amount: Money,
    /// Points plus interest over the holding period
    pub financing_cost: Money,
    pub holding_cost_total: Money,
    pub selling_costs: Money,
    /// Every cost through sale, excluding loan principal
    pub total_project_cost: Money,
    /// Out-of-pocket cash before sale proceeds
    pub cash_invested: Money,
    pub net_profit: Money,
    pub roi_percent: Percent,
    pub annualized_roi_percent: Percent,
    /// Profit as a share of ARV
    pub profit_margin_percent: Percent,
    pub max_allowable_offer: Money,
    pub meets_max_offer_rule: bool,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Fix-and-flip deal economics.
pub fn calculate_flip(input: &FlipInput) -> DealCalcResult<FlipOutput> {
    validate_input(input)?;

    let months = Decimal::from(input.holding_months);
    let closing_costs = input.purchase_price * percent_to_fraction(input.closing_cost_percent);
    let holding_cost_total = input.monthly_holding_costs * months;
    let selling_costs = input.after_repair_value * percent_to_fraction(input.selling_cost_percent);

    let (loan_amount, financing_cost) = match &input.financing {
        Some(f) => {
            let basis = if f.finance_rehab {
                input.purchase_price + input.rehab_cost
            } else {
                input.purchase_price
            };
            let loan = basis * percent_to_fraction(f.loan_to_cost_percent);
            let points = loan * percent_to_fraction(f.points_percent);
            let monthly_interest = loan * percent_to_fraction(f.interest_rate) / dec!(12);
            (loan, points + monthly_interest * months)
        }
        None => (Decimal::ZERO, Decimal::ZERO),
    };

    let pre_sale_outlay = input.purchase_price
        + input.rehab_cost
        + closing_costs
        + holding_cost_total
        + financing_cost;
    let total_project_cost = pre_sale_outlay + selling_costs;
    let cash_invested = (pre_sale_outlay - loan_amount).max(Decimal::ZERO);
    let net_profit = input.after_repair_value - total_project_cost;

    let roi_percent = if cash_invested > Decimal::ZERO {
        percent_of(net_profit, cash_invested, "return on cash invested")?
    } else {
        Decimal::ZERO
    };
    let annualized_roi_percent = roi_percent
        .checked_mul(dec!(12))
        .ok_or_else(|| DealCalcError::overflow("annualized return"))?
        / months;
    let profit_margin_percent = percent_of(net_profit, input.after_repair_value, "profit margin")?;

    let max_allowable_offer = (input.after_repair_value
        * percent_to_fraction(input.max_offer_rule_percent)
        - input.rehab_cost)
        .max(Decimal::ZERO);
    let meets_max_offer_rule = input.purchase_price <= max_allowable_offer;

    debug!(%net_profit, %roi_percent, %max_allowable_offer, "computed flip");

    Ok(FlipOutput {
        closing_costs,
        loan_amount,
        financing_cost,
        holding_cost_total,
        selling_costs,
        total_project_cost,
        cash_invested,
        net_profit,
        roi_percent,
        annualized_roi_percent,
        profit_margin_percent,
        max_allowable_offer,
        meets_max_offer_rule,
    })
}

/// Flip analysis wrapped in the standard output envelope.
pub fn analyze_flip(input: &FlipInput) -> DealCalcResult<ComputationOutput<FlipOutput>> {
    let start = Instant::now();
    let out = calculate_flip(input)?;

    let mut warnings = Vec::new();
    if out.net_profit < Decimal::ZERO {
        warnings.push(format!("Deal loses {} at the stated ARV", out.net_profit.abs().round_dp(2)));
    }
    if !out.meets_max_offer_rule {
        warnings.push(format!(
            "Purchase price exceeds the {}% rule maximum offer of {}",
            input.max_offer_rule_percent,
            out.max_allowable_offer.round_dp(2)
        ));
    }
    if out.cash_invested.is_zero() {
        warnings.push("Deal is fully financed; ROI on cash is undefined and reported as 0".into());
    }
    if out.profit_margin_percent < dec!(10) && out.net_profit >= Decimal::ZERO {
        warnings.push("Profit margin under 10% of ARV leaves little room for overruns".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fix-and-flip deal analysis (ARV less all-in cost)",
        input,
        warnings,
        elapsed,
        out,
    ))
}

fn validate_input(input: &FlipInput) -> DealCalcResult<()> {
    ensure_amount("purchase_price", input.purchase_price)?;
    ensure_amount("rehab_cost", input.rehab_cost)?;
    ensure_amount("after_repair_value", input.after_repair_value)?;
    if input.after_repair_value.is_zero() {
        return Err(DealCalcError::invalid(
            "after_repair_value",
            "After repair value must be positive",
        ));
    }
    if input.holding_months == 0 || input.holding_months > MAX_TERM_YEARS * 12 {
        return Err(DealCalcError::invalid(
            "holding_months",
            format!(
                "Holding period must be between 1 and {} months",
                MAX_TERM_YEARS * 12
            ),
        ));
    }
    ensure_amount("monthly_holding_costs", input.monthly_holding_costs)?;
    ensure_percent("closing_cost_percent", input.closing_cost_percent)?;
    ensure_percent("selling_cost_percent", input.selling_cost_percent)?;
    ensure_percent("max_offer_rule_percent", input.max_offer_rule_percent)?;
    if let Some(f) = &input.financing {
        ensure_percent("financing.loan_to_cost_percent", f.loan_to_cost_percent)?;
        ensure_percent("financing.interest_rate", f.interest_rate)?;
        ensure_percent("financing.points_percent", f.points_percent)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
