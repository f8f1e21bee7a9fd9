pub mod amortization;
pub mod assumptions;
pub mod dscr;
pub mod error;
pub mod flip;
pub mod format;
pub mod metrics;
pub mod quick;
pub mod types;

pub use assumptions::{Assumptions, DscrThresholds, LoanDefaults};
pub use dscr::{calculate_dscr, calculate_dscr_with, DscrInput, DscrOutput, DscrStatus};
pub use error::DealCalcError;
pub use format::format_currency;
pub use metrics::{
    calculate_cash_on_cash, calculate_ltv, estimate_monthly_insurance, estimate_monthly_taxes,
};
pub use quick::{calculate_quick_dscr, QuickDscrOptions, QuickDscrOutput, QuickDscrRequest};
pub use types::*;

/// Standard result type for all deal calculations
pub type DealCalcResult<T> = Result<T, DealCalcError>;
