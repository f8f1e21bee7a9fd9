use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use tracing::{debug, warn};

use crate::amortization;
use crate::assumptions::{Assumptions, DscrThresholds};
use crate::error::{ensure_amount, ensure_percent, DealCalcError};
use crate::metrics::{calculate_cash_on_cash, calculate_ltv};
use crate::types::{percent_to_fraction, with_metadata, ComputationOutput, Money, Percent, Ratio};
use crate::DealCalcResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Property and loan inputs for a DSCR test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DscrInput {
    /// Expected gross monthly rent
    pub monthly_rent: Money,
    /// Acquisition price, also the loan basis
    pub purchase_price: Money,
    /// Cash down payment as a percentage of price (25 = 25%)
    pub down_payment_percent: Percent,
    /// Nominal annual interest rate, percent
    pub interest_rate: Percent,
    /// Amortization term in years
    pub loan_term_years: u32,
    pub monthly_taxes: Money,
    pub monthly_insurance: Money,
    #[serde(default)]
    pub monthly_hoa: Money,
}

/// Coverage tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DscrStatus {
    Strong,
    Acceptable,
    Weak,
}

/// Indicator colour the UI paints the tier with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusColor {
    Green,
    Yellow,
    Red,
}

impl DscrStatus {
    pub fn color(self) -> StatusColor {
        match self {
            DscrStatus::Strong => StatusColor::Green,
            DscrStatus::Acceptable => StatusColor::Yellow,
            DscrStatus::Weak => StatusColor::Red,
        }
    }
}

impl fmt::Display for DscrStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DscrStatus::Strong => "Strong",
            DscrStatus::Acceptable => "Acceptable",
            DscrStatus::Weak => "Weak",
        };
        f.write_str(s)
    }
}

impl fmt::Display for StatusColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StatusColor::Green => "green",
            StatusColor::Yellow => "yellow",
            StatusColor::Red => "red",
        };
        f.write_str(s)
    }
}

/// Conditions under which the ratio is computed but should be read with care.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegenerateCase {
    /// No purchase price, so no loan: coverage reflects carrying costs only
    ZeroPurchasePrice,
    /// Nothing to cover; the ratio is reported as 0
    ZeroDebtService,
}

impl DegenerateCase {
    pub fn describe(self) -> &'static str {
        match self {
            DegenerateCase::ZeroPurchasePrice => {
                "Purchase price is zero; DSCR reflects taxes, insurance and HOA only"
            }
            DegenerateCase::ZeroDebtService => {
                "Total debt service is zero; DSCR is undefined and reported as 0"
            }
        }
    }
}

/// Result of a DSCR test. Every amount keeps full precision; only
/// `dscr_display` is rounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DscrOutput {
    pub loan_amount: Money,
    /// Principal and interest
    pub monthly_mortgage: Money,
    /// Mortgage + taxes + insurance + HOA
    pub total_debt_service: Money,
    pub dscr: Ratio,
    /// `dscr` rounded to 2 decimal places
    pub dscr_display: Ratio,
    pub monthly_net_cash_flow: Money,
    pub annual_net_cash_flow: Money,
    pub status: DscrStatus,
    pub status_color: StatusColor,
    pub message: String,
    pub qualifies: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub degenerate: Vec<DegenerateCase>,
}

/// DSCR result plus the leverage figures shown next to it on the deal page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DscrAnalysis {
    #[serde(flatten)]
    pub dscr: DscrOutput,
    pub down_payment: Money,
    pub ltv_percent: Percent,
    pub cash_on_cash_percent: Percent,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run the DSCR test with the standard 1.25x / 1.10x breakpoints.
pub fn calculate_dscr(input: &DscrInput) -> DealCalcResult<DscrOutput> {
    calculate_dscr_with(input, &DscrThresholds::default())
}

/// Run the DSCR test against caller-supplied breakpoints.
pub fn calculate_dscr_with(
    input: &DscrInput,
    thresholds: &DscrThresholds,
) -> DealCalcResult<DscrOutput> {
    validate_input(input)?;
    thresholds.validate()?;

    let loan_amount = input.purchase_price
        * (Decimal::ONE - percent_to_fraction(input.down_payment_percent));
    let monthly_mortgage =
        amortization::monthly_payment(loan_amount, input.interest_rate, input.loan_term_years)?;

    let total_debt_service =
        monthly_mortgage + input.monthly_taxes + input.monthly_insurance + input.monthly_hoa;

    let mut degenerate = Vec::new();
    if input.purchase_price.is_zero() {
        degenerate.push(DegenerateCase::ZeroPurchasePrice);
    }

    let dscr = if total_debt_service > Decimal::ZERO {
        input
            .monthly_rent
            .checked_div(total_debt_service)
            .ok_or_else(|| DealCalcError::overflow("rent / debt service"))?
    } else {
        degenerate.push(DegenerateCase::ZeroDebtService);
        Decimal::ZERO
    };

    let monthly_net_cash_flow = input.monthly_rent - total_debt_service;
    let annual_net_cash_flow = monthly_net_cash_flow
        .checked_mul(dec!(12))
        .ok_or_else(|| DealCalcError::overflow("annual net cash flow"))?;

    let status = classify_dscr(dscr, thresholds);
    let dscr_display = dscr.round_dp(2);
    let message = status_message(status, dscr_display, thresholds);
    let qualifies = dscr >= thresholds.minimum;

    for case in &degenerate {
        warn!(case = ?case, "degenerate DSCR input: {}", case.describe());
    }
    debug!(
        %loan_amount,
        %monthly_mortgage,
        %total_debt_service,
        %dscr,
        %status,
        qualifies,
        "computed DSCR"
    );

    Ok(DscrOutput {
        loan_amount,
        monthly_mortgage,
        total_debt_service,
        dscr,
        dscr_display,
        monthly_net_cash_flow,
        annual_net_cash_flow,
        status,
        status_color: status.color(),
        message,
        qualifies,
        degenerate,
    })
}

/// Tier a ratio. Lower bounds are inclusive and the ratio is compared
/// unrounded.
pub fn classify_dscr(dscr: Ratio, thresholds: &DscrThresholds) -> DscrStatus {
    if dscr >= thresholds.strong {
        DscrStatus::Strong
    } else if dscr >= thresholds.minimum {
        DscrStatus::Acceptable
    } else {
        DscrStatus::Weak
    }
}

/// DSCR test wrapped in the standard output envelope, with LTV,
/// cash-on-cash on the down payment, and underwriting warnings.
pub fn analyze_dscr(
    input: &DscrInput,
    assumptions: &Assumptions,
) -> DealCalcResult<ComputationOutput<DscrAnalysis>> {
    let start = Instant::now();
    assumptions.validate()?;

    let dscr = calculate_dscr_with(input, &assumptions.thresholds)?;
    let down_payment = input.purchase_price - dscr.loan_amount;
    let ltv_percent = calculate_ltv(dscr.loan_amount, input.purchase_price)?;
    let cash_on_cash_percent = calculate_cash_on_cash(dscr.annual_net_cash_flow, down_payment)?;

    let warnings = underwriting_warnings(&dscr, ltv_percent, &assumptions.thresholds);

    let analysis = DscrAnalysis {
        dscr,
        down_payment,
        ltv_percent,
        cash_on_cash_percent,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Debt Service Coverage Ratio (monthly rent / PITI + HOA)",
        assumptions,
        warnings,
        elapsed,
        analysis,
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn validate_input(input: &DscrInput) -> DealCalcResult<()> {
    if input.loan_term_years == 0 {
        return Err(DealCalcError::invalid(
            "loan_term_years",
            "Loan term must be a positive number of years",
        ));
    }
    ensure_amount("monthly_rent", input.monthly_rent)?;
    ensure_amount("purchase_price", input.purchase_price)?;
    ensure_percent("down_payment_percent", input.down_payment_percent)?;
    ensure_percent("interest_rate", input.interest_rate)?;
    ensure_amount("monthly_taxes", input.monthly_taxes)?;
    ensure_amount("monthly_insurance", input.monthly_insurance)?;
    ensure_amount("monthly_hoa", input.monthly_hoa)?;
    Ok(())
}

fn status_message(status: DscrStatus, dscr: Ratio, thresholds: &DscrThresholds) -> String {
    match status {
        DscrStatus::Strong => format!(
            "Strong coverage at {dscr}x: rent clears the {}x lender target.",
            thresholds.strong
        ),
        DscrStatus::Acceptable => format!(
            "Acceptable coverage at {dscr}x: meets the {}x minimum but is below the {}x target.",
            thresholds.minimum, thresholds.strong
        ),
        DscrStatus::Weak => format!(
            "Weak coverage at {dscr}x: below the {}x minimum most DSCR lenders require.",
            thresholds.minimum
        ),
    }
}

pub(crate) fn underwriting_warnings(
    dscr: &DscrOutput,
    ltv_percent: Percent,
    thresholds: &DscrThresholds,
) -> Vec<String> {
    let mut warnings: Vec<String> = dscr
        .degenerate
        .iter()
        .map(|c| c.describe().to_string())
        .collect();

    if !dscr.qualifies && dscr.total_debt_service > Decimal::ZERO {
        warnings.push(format!(
            "DSCR of {} is below the {}x qualifying minimum",
            dscr.dscr_display, thresholds.minimum
        ));
    }
    if dscr.monthly_net_cash_flow < Decimal::ZERO {
        warnings.push(format!(
            "Negative monthly cash flow of {}",
            dscr.monthly_net_cash_flow.round_dp(2)
        ));
    }
    if ltv_percent > dec!(80) {
        warnings.push(format!("LTV of {ltv_percent}% exceeds 80% (high leverage)"));
    }
    warnings
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
