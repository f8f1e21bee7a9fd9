use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use deal_calc_core::dscr::DscrInput;
use deal_calc_core::flip::FlipInput;
use deal_calc_core::quick::QuickDscrRequest;
use deal_calc_core::Assumptions;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse<T: for<'de> Deserialize<'de>>(input_json: &str) -> NapiResult<T> {
    serde_json::from_str(input_json).map_err(to_napi_error)
}

fn to_json<T: serde::Serialize>(output: &T) -> NapiResult<String> {
    serde_json::to_string(output).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct WithAssumptions<T> {
    #[serde(flatten)]
    input: T,
    #[serde(default)]
    assumptions: Assumptions,
}

#[derive(Deserialize)]
struct PriceInput {
    purchase_price: Decimal,
}

#[derive(Deserialize)]
struct AmortizationInput {
    principal: Decimal,
    annual_rate: Decimal,
    term_years: u32,
}

#[derive(Deserialize)]
struct LtvInput {
    loan_amount: Decimal,
    purchase_price: Decimal,
}

#[derive(Deserialize)]
struct CashOnCashInput {
    annual_cash_flow: Decimal,
    cash_invested: Decimal,
}

#[derive(Deserialize)]
struct AmountInput {
    amount: Decimal,
}

// ---------------------------------------------------------------------------
// DSCR
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_dscr(input_json: String) -> NapiResult<String> {
    let req: WithAssumptions<DscrInput> = parse(&input_json)?;
    let output =
        deal_calc_core::dscr::analyze_dscr(&req.input, &req.assumptions).map_err(to_napi_error)?;
    to_json(&output)
}

#[napi]
pub fn calculate_quick_dscr(input_json: String) -> NapiResult<String> {
    let req: WithAssumptions<QuickDscrRequest> = parse(&input_json)?;
    let output = deal_calc_core::quick::analyze_quick_dscr(
        req.input.property_value,
        &req.input.options,
        &req.assumptions,
    )
    .map_err(to_napi_error)?;
    to_json(&output)
}

// ---------------------------------------------------------------------------
// Flip
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_flip(input_json: String) -> NapiResult<String> {
    let input: FlipInput = parse(&input_json)?;
    let output = deal_calc_core::flip::analyze_flip(&input).map_err(to_napi_error)?;
    to_json(&output)
}

// ---------------------------------------------------------------------------
// Loan math and estimates
// ---------------------------------------------------------------------------

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: AmortizationInput = parse(&input_json)?;
    let output = deal_calc_core::amortization::amortization_schedule(
        input.principal,
        input.annual_rate,
        input.term_years,
    )
    .map_err(to_napi_error)?;
    to_json(&output)
}

#[napi]
pub fn estimate_monthly_taxes(input_json: String) -> NapiResult<String> {
    let input: PriceInput = parse(&input_json)?;
    let output =
        deal_calc_core::estimate_monthly_taxes(input.purchase_price).map_err(to_napi_error)?;
    to_json(&output)
}

#[napi]
pub fn estimate_monthly_insurance(input_json: String) -> NapiResult<String> {
    let input: PriceInput = parse(&input_json)?;
    let output =
        deal_calc_core::estimate_monthly_insurance(input.purchase_price).map_err(to_napi_error)?;
    to_json(&output)
}

#[napi]
pub fn calculate_ltv(input_json: String) -> NapiResult<String> {
    let input: LtvInput = parse(&input_json)?;
    let output = deal_calc_core::calculate_ltv(input.loan_amount, input.purchase_price)
        .map_err(to_napi_error)?;
    to_json(&output)
}

#[napi]
pub fn calculate_cash_on_cash(input_json: String) -> NapiResult<String> {
    let input: CashOnCashInput = parse(&input_json)?;
    let output = deal_calc_core::calculate_cash_on_cash(input.annual_cash_flow, input.cash_invested)
        .map_err(to_napi_error)?;
    to_json(&output)
}

#[napi]
pub fn format_currency(input_json: String) -> NapiResult<String> {
    let input: AmountInput = parse(&input_json)?;
    to_json(&deal_calc_core::format_currency(input.amount))
}
