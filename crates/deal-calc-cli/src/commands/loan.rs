use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use deal_calc_core::amortization;
use deal_calc_core::metrics::{calculate_cash_on_cash, calculate_ltv};
use deal_calc_core::Assumptions;

/// Arguments for an amortization schedule
#[derive(Args)]
pub struct AmortizationArgs {
    /// Loan principal
    #[arg(long, value_parser = super::money)]
    pub principal: Decimal,

    /// Annual interest rate, percent [default: from assumptions]
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in years [default: from assumptions]
    #[arg(long)]
    pub term: Option<u32>,
}

/// Arguments for loan-to-value
#[derive(Args)]
pub struct LtvArgs {
    #[arg(long, value_parser = super::money)]
    pub loan: Decimal,

    #[arg(long, value_parser = super::money)]
    pub price: Decimal,
}

/// Arguments for cash-on-cash return
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct CashOnCashArgs {
    /// Annual net cash flow (may be negative)
    #[arg(long, value_parser = super::money)]
    pub annual_cash_flow: Decimal,

    /// Cash invested
    #[arg(long, value_parser = super::money)]
    pub invested: Decimal,
}

pub fn run_amortization(
    args: AmortizationArgs,
    assumptions: &Assumptions,
) -> Result<Value, Box<dyn std::error::Error>> {
    let schedule = amortization::amortization_schedule(
        args.principal,
        args.rate.unwrap_or(assumptions.loan.interest_rate),
        args.term.unwrap_or(assumptions.loan.loan_term_years),
    )?;
    Ok(json!({
        "result": {
            "monthly_payment": schedule.monthly_payment,
            "total_interest": schedule.total_interest,
            "total_paid": schedule.total_paid,
        },
        "schedule": schedule.years,
    }))
}

pub fn run_ltv(args: LtvArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let ltv = calculate_ltv(args.loan, args.price)?;
    Ok(json!({ "result": { "ltv_percent": ltv } }))
}

pub fn run_cash_on_cash(args: CashOnCashArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let coc = calculate_cash_on_cash(args.annual_cash_flow, args.invested)?;
    Ok(json!({ "result": { "cash_on_cash_percent": coc } }))
}
