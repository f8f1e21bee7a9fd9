//! Quick DSCR for listings with no rent on file.
//!
//! Rent is estimated from property value with a percentage-of-value baseline,
//! adjusted for bedroom count and property type and floored by square
//! footage. The coefficients are business tuning knobs, not a fitted model;
//! they live in [`RentEstimateCoefficients`] so they can be overridden
//! without touching the DSCR formula.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::assumptions::Assumptions;
use crate::dscr::{calculate_dscr_with, underwriting_warnings, DscrInput, DscrOutput};
use crate::error::{ensure_amount, ensure_percent, DealCalcError};
use crate::metrics::{calculate_ltv, estimate_monthly_insurance_with, estimate_monthly_taxes_with};
use crate::types::{percent_to_fraction, with_metadata, ComputationOutput, Money, Percent};
use crate::DealCalcResult;

pub const DEFAULT_BASE_RENT_PERCENT: Percent = dec!(0.8);
pub const DEFAULT_BASELINE_BEDROOMS: u32 = 3;
pub const DEFAULT_PER_BEDROOM_ADJUSTMENT_PERCENT: Percent = dec!(5);
pub const DEFAULT_MIN_RENT_PER_SQFT: Money = dec!(0.75);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    #[default]
    SingleFamily,
    Condo,
    Townhouse,
    MultiFamily,
}

/// Tuning parameters for the rent heuristic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RentEstimateCoefficients {
    /// Monthly rent as a percentage of value before adjustments (0.8 = 0.8%)
    pub base_rent_percent: Percent,
    /// Bedroom count the baseline is calibrated for
    pub baseline_bedrooms: u32,
    /// Change in rent per bedroom above/below baseline, percent of baseline
    pub per_bedroom_adjustment_percent: Percent,
    /// Rent never drops below this per square foot when footage is known
    pub min_rent_per_sqft: Money,
    pub single_family_factor: Decimal,
    pub condo_factor: Decimal,
    pub townhouse_factor: Decimal,
    pub multi_family_factor: Decimal,
}

impl Default for RentEstimateCoefficients {
    fn default() -> Self {
        RentEstimateCoefficients {
            base_rent_percent: DEFAULT_BASE_RENT_PERCENT,
            baseline_bedrooms: DEFAULT_BASELINE_BEDROOMS,
            per_bedroom_adjustment_percent: DEFAULT_PER_BEDROOM_ADJUSTMENT_PERCENT,
            min_rent_per_sqft: DEFAULT_MIN_RENT_PER_SQFT,
            single_family_factor: dec!(1.0),
            condo_factor: dec!(0.95),
            townhouse_factor: dec!(0.97),
            multi_family_factor: dec!(1.10),
        }
    }
}

impl RentEstimateCoefficients {
    pub fn factor(&self, property_type: PropertyType) -> Decimal {
        match property_type {
            PropertyType::SingleFamily => self.single_family_factor,
            PropertyType::Condo => self.condo_factor,
            PropertyType::Townhouse => self.townhouse_factor,
            PropertyType::MultiFamily => self.multi_family_factor,
        }
    }

    pub fn validate(&self) -> DealCalcResult<()> {
        ensure_percent("rent.base_rent_percent", self.base_rent_percent)?;
        ensure_percent(
            "rent.per_bedroom_adjustment_percent",
            self.per_bedroom_adjustment_percent,
        )?;
        ensure_amount("rent.min_rent_per_sqft", self.min_rent_per_sqft)?;
        ensure_amount("rent.single_family_factor", self.single_family_factor)?;
        ensure_amount("rent.condo_factor", self.condo_factor)?;
        ensure_amount("rent.townhouse_factor", self.townhouse_factor)?;
        ensure_amount("rent.multi_family_factor", self.multi_family_factor)?;
        Ok(())
    }
}

/// Listing attributes and optional loan overrides for a quick DSCR.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuickDscrOptions {
    pub bedrooms: Option<u32>,
    pub square_feet: Option<u32>,
    pub property_type: PropertyType,
    pub monthly_hoa: Money,
    /// Falls back to `Assumptions::loan` when absent
    pub down_payment_percent: Option<Percent>,
    pub interest_rate: Option<Percent>,
    pub loan_term_years: Option<u32>,
}

/// Wire shape for a quick DSCR request: the value plus listing options
/// at the same level, as the listing pages send it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickDscrRequest {
    pub property_value: Money,
    #[serde(flatten)]
    pub options: QuickDscrOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickDscrOutput {
    #[serde(flatten)]
    pub dscr: DscrOutput,
    pub estimated_rent: Money,
    pub monthly_debt_service: Money,
    pub monthly_taxes: Money,
    pub monthly_insurance: Money,
}

/// Heuristic monthly rent for a property of the given value.
pub fn estimate_monthly_rent(
    property_value: Money,
    options: &QuickDscrOptions,
    coefficients: &RentEstimateCoefficients,
) -> DealCalcResult<Money> {
    ensure_amount("property_value", property_value)?;
    coefficients.validate()?;

    let base = property_value * percent_to_fraction(coefficients.base_rent_percent);

    let bedroom_adj = match options.bedrooms {
        Some(beds) => {
            let delta = Decimal::from(beds) - Decimal::from(coefficients.baseline_bedrooms);
            (delta * percent_to_fraction(coefficients.per_bedroom_adjustment_percent))
                .checked_mul(base)
                .ok_or_else(|| DealCalcError::overflow("bedroom rent adjustment"))?
        }
        None => Decimal::ZERO,
    };

    let mut rent = (base + bedroom_adj)
        .checked_mul(coefficients.factor(options.property_type))
        .ok_or_else(|| DealCalcError::overflow("estimated rent"))?;

    if let Some(sqft) = options.square_feet {
        rent = rent.max(Decimal::from(sqft) * coefficients.min_rent_per_sqft);
    }

    Ok(rent.max(Decimal::ZERO))
}

/// Quick DSCR with the default assumptions.
pub fn calculate_quick_dscr(
    property_value: Money,
    options: &QuickDscrOptions,
) -> DealCalcResult<QuickDscrOutput> {
    calculate_quick_dscr_with(property_value, options, &Assumptions::default())
}

/// Estimate rent, taxes and insurance from the property value and run the
/// standard DSCR test on default (or overridden) loan terms.
///
/// A zero value is not an error: like a zero purchase price in
/// [`calculate_dscr_with`], it comes back flagged in `degenerate`.
pub fn calculate_quick_dscr_with(
    property_value: Money,
    options: &QuickDscrOptions,
    assumptions: &Assumptions,
) -> DealCalcResult<QuickDscrOutput> {
    let estimated_rent = estimate_monthly_rent(property_value, options, &assumptions.rent)?;
    let monthly_taxes = estimate_monthly_taxes_with(property_value, assumptions.tax_rate_percent)?;
    let monthly_insurance =
        estimate_monthly_insurance_with(property_value, assumptions.insurance_rate_percent)?;

    let input = DscrInput {
        monthly_rent: estimated_rent,
        purchase_price: property_value,
        down_payment_percent: options
            .down_payment_percent
            .unwrap_or(assumptions.loan.down_payment_percent),
        interest_rate: options.interest_rate.unwrap_or(assumptions.loan.interest_rate),
        loan_term_years: options
            .loan_term_years
            .unwrap_or(assumptions.loan.loan_term_years),
        monthly_taxes,
        monthly_insurance,
        monthly_hoa: options.monthly_hoa,
    };

    debug!(%property_value, %estimated_rent, property_type = ?options.property_type, "quick DSCR rent estimate");

    let dscr = calculate_dscr_with(&input, &assumptions.thresholds)?;
    let monthly_debt_service = dscr.total_debt_service;

    Ok(QuickDscrOutput {
        dscr,
        estimated_rent,
        monthly_debt_service,
        monthly_taxes,
        monthly_insurance,
    })
}

/// Quick DSCR wrapped in the standard output envelope.
pub fn analyze_quick_dscr(
    property_value: Money,
    options: &QuickDscrOptions,
    assumptions: &Assumptions,
) -> DealCalcResult<ComputationOutput<QuickDscrOutput>> {
    let start = Instant::now();
    assumptions.validate()?;

    let out = calculate_quick_dscr_with(property_value, options, assumptions)?;
    let ltv = calculate_ltv(out.dscr.loan_amount, property_value)?;

    let mut warnings = vec![format!(
        "Rent of {} is a heuristic estimate, not a market comparable",
        out.estimated_rent.round_dp(2)
    )];
    warnings.extend(underwriting_warnings(&out.dscr, ltv, &assumptions.thresholds));

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Quick DSCR (estimated rent, default loan terms)",
        assumptions,
        warnings,
        elapsed,
        out,
    ))
}
