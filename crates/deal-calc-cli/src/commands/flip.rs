use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use deal_calc_core::flip::{
    self, FlipFinancing, FlipInput, DEFAULT_CLOSING_COST_PERCENT, DEFAULT_MAX_OFFER_RULE_PERCENT,
    DEFAULT_SELLING_COST_PERCENT,
};

use crate::input;

/// Arguments for fix-and-flip analysis
#[derive(Args)]
pub struct FlipArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Purchase price
    #[arg(long, value_parser = super::money)]
    pub price: Option<Decimal>,

    /// Rehab budget
    #[arg(long, default_value = "0", value_parser = super::money)]
    pub rehab: Decimal,

    /// After repair value
    #[arg(long, value_parser = super::money)]
    pub arv: Option<Decimal>,

    /// Months from purchase to sale
    #[arg(long)]
    pub months: Option<u32>,

    /// Monthly taxes, insurance and utilities while held
    #[arg(long, default_value = "0", value_parser = super::money)]
    pub holding_costs: Decimal,

    /// Buy-side closing costs, percent of price
    #[arg(long)]
    pub closing_pct: Option<Decimal>,

    /// Selling costs, percent of ARV
    #[arg(long)]
    pub selling_pct: Option<Decimal>,

    /// Loan-to-cost percent; enables financing
    #[arg(long)]
    pub ltc: Option<Decimal>,

    /// Annual interest rate on the flip loan, percent
    #[arg(long, default_value = "0")]
    pub loan_rate: Decimal,

    /// Origination points, percent of loan
    #[arg(long, default_value = "0")]
    pub points: Decimal,

    /// Include the rehab budget in the financed basis
    #[arg(long)]
    pub finance_rehab: bool,

    /// Maximum-offer rule, percent of ARV
    #[arg(long)]
    pub rule_pct: Option<Decimal>,
}

pub fn run_flip(args: FlipArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let flip_input: FlipInput = match input::from_file_or_stdin(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => FlipInput {
            purchase_price: args.price.ok_or("--price is required (or provide --input)")?,
            rehab_cost: args.rehab,
            after_repair_value: args.arv.ok_or("--arv is required (or provide --input)")?,
            holding_months: args.months.ok_or("--months is required (or provide --input)")?,
            monthly_holding_costs: args.holding_costs,
            closing_cost_percent: args.closing_pct.unwrap_or(DEFAULT_CLOSING_COST_PERCENT),
            selling_cost_percent: args.selling_pct.unwrap_or(DEFAULT_SELLING_COST_PERCENT),
            financing: args.ltc.map(|ltc| FlipFinancing {
                loan_to_cost_percent: ltc,
                interest_rate: args.loan_rate,
                points_percent: args.points,
                finance_rehab: args.finance_rehab,
            }),
            max_offer_rule_percent: args.rule_pct.unwrap_or(DEFAULT_MAX_OFFER_RULE_PERCENT),
        },
    };
    let result = flip::analyze_flip(&flip_input)?;
    Ok(serde_json::to_value(result)?)
}
