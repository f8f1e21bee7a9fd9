use deal_calc_core::dscr::{self, DegenerateCase, DscrInput, DscrStatus, StatusColor};
use deal_calc_core::{
    calculate_dscr, estimate_monthly_insurance, estimate_monthly_taxes, format_currency,
    Assumptions, DealCalcError,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .finish();
    tracing::subscriber::set_default(subscriber)
}

fn scenario_one() -> DscrInput {
    DscrInput {
        monthly_rent: dec!(2500),
        purchase_price: dec!(350000),
        down_payment_percent: dec!(25),
        interest_rate: dec!(7.5),
        loan_term_years: 30,
        monthly_taxes: estimate_monthly_taxes(dec!(350000)).unwrap(),
        monthly_insurance: estimate_monthly_insurance(dec!(350000)).unwrap(),
        monthly_hoa: Decimal::ZERO,
    }
}

// ===========================================================================
// Concrete scenarios
// ===========================================================================

#[test]
fn test_scenario_rental_at_7_5_percent() {
    let _guard = init_test_tracing();
    let out = calculate_dscr(&scenario_one()).unwrap();

    assert_eq!(out.loan_amount, dec!(262500));
    assert_eq!(format_currency(out.monthly_mortgage), "$1,835");
    assert_eq!(out.total_debt_service.round_dp(2), dec!(2345.85));

    // Derived from the formula: 2500 / 2345.8548 = 1.0657
    assert_eq!(out.dscr.round_dp(4), dec!(1.0657));
    assert_eq!(out.status, DscrStatus::Weak);
    assert!(!out.qualifies);
    assert_eq!(out.monthly_net_cash_flow, dec!(2500) - out.total_debt_service);
}

#[test]
fn test_scenario_zero_term() {
    let input = DscrInput {
        loan_term_years: 0,
        ..scenario_one()
    };
    assert!(matches!(
        calculate_dscr(&input),
        Err(DealCalcError::InvalidInput { .. })
    ));
}

#[test]
fn test_scenario_zero_rent() {
    let input = DscrInput {
        monthly_rent: Decimal::ZERO,
        ..scenario_one()
    };
    let out = calculate_dscr(&input).unwrap();
    assert!(out.total_debt_service > Decimal::ZERO);
    assert_eq!(out.dscr, Decimal::ZERO);
    assert!(!out.qualifies);
}

#[test]
fn test_scenario_zero_price() {
    let _guard = init_test_tracing();
    let input = DscrInput {
        purchase_price: Decimal::ZERO,
        monthly_taxes: dec!(200),
        monthly_insurance: dec!(80),
        monthly_hoa: dec!(120),
        ..scenario_one()
    };
    let out = calculate_dscr(&input).unwrap();
    assert_eq!(out.loan_amount, Decimal::ZERO);
    assert_eq!(out.monthly_mortgage, Decimal::ZERO);
    assert_eq!(out.total_debt_service, dec!(400));
    assert_eq!(out.degenerate, vec![DegenerateCase::ZeroPurchasePrice]);
}

#[test]
fn test_zero_rate_mortgage_is_straight_line() {
    let input = DscrInput {
        interest_rate: Decimal::ZERO,
        ..scenario_one()
    };
    let out = calculate_dscr(&input).unwrap();
    assert_eq!(out.monthly_mortgage, dec!(262500) / dec!(360));
}

#[test]
fn test_boundary_tiers() {
    let t = Assumptions::default().thresholds;
    assert_eq!(dscr::classify_dscr(dec!(1.25), &t), DscrStatus::Strong);
    assert_eq!(dscr::classify_dscr(dec!(1.2499999), &t), DscrStatus::Acceptable);
    assert_eq!(dscr::classify_dscr(dec!(1.10), &t), DscrStatus::Acceptable);
    assert_eq!(dscr::classify_dscr(dec!(1.0999999), &t), DscrStatus::Weak);
    assert_eq!(DscrStatus::Acceptable.color(), StatusColor::Yellow);
}

#[test]
fn test_analysis_envelope() {
    let out = dscr::analyze_dscr(&scenario_one(), &Assumptions::default()).unwrap();
    assert_eq!(out.metadata.precision, "rust_decimal_128bit");
    assert_eq!(out.assumptions["thresholds"]["minimum"], "1.10");
    assert!(!out.warnings.is_empty());
}

// ===========================================================================
// Properties
// ===========================================================================

fn input_with(rent_cents: u64, rate_eighths: u32) -> DscrInput {
    DscrInput {
        monthly_rent: Decimal::from(rent_cents) / dec!(100),
        interest_rate: Decimal::from(rate_eighths) * dec!(0.125),
        ..scenario_one()
    }
}

proptest! {
    #[test]
    fn loan_amount_identity(price in 0u64..5_000_000, down in 0u32..=100) {
        let input = DscrInput {
            purchase_price: Decimal::from(price),
            down_payment_percent: Decimal::from(down),
            ..scenario_one()
        };
        let out = calculate_dscr(&input).unwrap();
        let expected = Decimal::from(price) * (Decimal::ONE - Decimal::from(down) / dec!(100));
        prop_assert_eq!(out.loan_amount, expected);
        prop_assert!(out.loan_amount >= Decimal::ZERO);
    }

    #[test]
    fn more_rent_never_lowers_coverage(
        rent in 0u64..2_000_000,
        extra in 0u64..500_000,
        rate in 0u32..120,
    ) {
        let lo = calculate_dscr(&input_with(rent, rate)).unwrap();
        let hi = calculate_dscr(&input_with(rent + extra, rate)).unwrap();
        prop_assert!(hi.dscr >= lo.dscr);
        prop_assert!(hi.monthly_net_cash_flow >= lo.monthly_net_cash_flow);
    }

    #[test]
    fn higher_rate_never_raises_coverage(
        rent in 0u64..2_000_000,
        rate in 0u32..120,
        bump in 1u32..40,
    ) {
        let lo = calculate_dscr(&input_with(rent, rate)).unwrap();
        let hi = calculate_dscr(&input_with(rent, rate + bump)).unwrap();
        prop_assert!(hi.dscr <= lo.dscr);
    }

    #[test]
    fn qualifies_iff_at_minimum(rent in 0u64..1_000_000, rate in 0u32..120) {
        let out = calculate_dscr(&input_with(rent, rate)).unwrap();
        prop_assert_eq!(out.qualifies, out.dscr >= dec!(1.10));
    }

    #[test]
    fn recomputation_is_identical(rent in 0u64..1_000_000, rate in 0u32..120) {
        let input = input_with(rent, rate);
        prop_assert_eq!(calculate_dscr(&input).unwrap(), calculate_dscr(&input).unwrap());
    }
}
