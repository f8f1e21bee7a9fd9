use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use deal_calc_core::dscr::{self, DscrInput};
use deal_calc_core::metrics::{estimate_monthly_insurance_with, estimate_monthly_taxes_with};
use deal_calc_core::quick::{self, PropertyType, QuickDscrOptions, QuickDscrRequest};
use deal_calc_core::Assumptions;

use crate::input;

/// Arguments for a full DSCR test
#[derive(Args)]
pub struct DscrArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Gross monthly rent
    #[arg(long, value_parser = super::money)]
    pub rent: Option<Decimal>,

    /// Purchase price
    #[arg(long, value_parser = super::money)]
    pub price: Option<Decimal>,

    /// Down payment, percent of price [default: from assumptions]
    #[arg(long)]
    pub down: Option<Decimal>,

    /// Annual interest rate, percent [default: from assumptions]
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan term in years [default: from assumptions]
    #[arg(long)]
    pub term: Option<u32>,

    /// Monthly property taxes [default: estimated from price]
    #[arg(long, value_parser = super::money)]
    pub taxes: Option<Decimal>,

    /// Monthly insurance [default: estimated from price]
    #[arg(long, value_parser = super::money)]
    pub insurance: Option<Decimal>,

    /// Monthly HOA dues
    #[arg(long, default_value = "0", value_parser = super::money)]
    pub hoa: Decimal,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PropertyTypeArg {
    SingleFamily,
    Condo,
    Townhouse,
    MultiFamily,
}

impl From<PropertyTypeArg> for PropertyType {
    fn from(arg: PropertyTypeArg) -> Self {
        match arg {
            PropertyTypeArg::SingleFamily => PropertyType::SingleFamily,
            PropertyTypeArg::Condo => PropertyType::Condo,
            PropertyTypeArg::Townhouse => PropertyType::Townhouse,
            PropertyTypeArg::MultiFamily => PropertyType::MultiFamily,
        }
    }
}

/// Arguments for a quick DSCR on estimated rent
#[derive(Args)]
pub struct QuickDscrArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Property value / list price
    #[arg(long, value_parser = super::money)]
    pub value: Option<Decimal>,

    #[arg(long)]
    pub bedrooms: Option<u32>,

    /// Living area in square feet
    #[arg(long)]
    pub sqft: Option<u32>,

    #[arg(long, value_enum, default_value = "single-family")]
    pub property_type: PropertyTypeArg,

    /// Monthly HOA dues
    #[arg(long, default_value = "0", value_parser = super::money)]
    pub hoa: Decimal,

    /// Override the default down payment percent
    #[arg(long)]
    pub down: Option<Decimal>,

    /// Override the default interest rate percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Override the default loan term in years
    #[arg(long)]
    pub term: Option<u32>,
}

pub fn run_dscr(
    args: DscrArgs,
    assumptions: &Assumptions,
) -> Result<Value, Box<dyn std::error::Error>> {
    let dscr_input: DscrInput = match input::from_file_or_stdin(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => {
            let price = args.price.ok_or("--price is required (or provide --input)")?;
            let monthly_taxes = match args.taxes {
                Some(t) => t,
                None => estimate_monthly_taxes_with(price, assumptions.tax_rate_percent)?,
            };
            let monthly_insurance = match args.insurance {
                Some(i) => i,
                None => estimate_monthly_insurance_with(price, assumptions.insurance_rate_percent)?,
            };
            DscrInput {
                monthly_rent: args.rent.ok_or("--rent is required (or provide --input)")?,
                purchase_price: price,
                down_payment_percent: args.down.unwrap_or(assumptions.loan.down_payment_percent),
                interest_rate: args.rate.unwrap_or(assumptions.loan.interest_rate),
                loan_term_years: args.term.unwrap_or(assumptions.loan.loan_term_years),
                monthly_taxes,
                monthly_insurance,
                monthly_hoa: args.hoa,
            }
        }
    };
    let result = dscr::analyze_dscr(&dscr_input, assumptions)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_quick_dscr(
    args: QuickDscrArgs,
    assumptions: &Assumptions,
) -> Result<Value, Box<dyn std::error::Error>> {
    let request: QuickDscrRequest = match input::from_file_or_stdin(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => QuickDscrRequest {
            property_value: args.value.ok_or("--value is required (or provide --input)")?,
            options: QuickDscrOptions {
                bedrooms: args.bedrooms,
                square_feet: args.sqft,
                property_type: args.property_type.into(),
                monthly_hoa: args.hoa,
                down_payment_percent: args.down,
                interest_rate: args.rate,
                loan_term_years: args.term,
            },
        },
    };
    let result = quick::analyze_quick_dscr(request.property_value, &request.options, assumptions)?;
    Ok(serde_json::to_value(result)?)
}
