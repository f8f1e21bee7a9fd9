pub mod dscr;
pub mod flip;
pub mod loan;

use deal_calc_core::format::parse_amount;
use rust_decimal::Decimal;

/// Value parser for money flags; accepts `350000`, `$350,000` or `-1,200`.
pub fn money(s: &str) -> Result<Decimal, String> {
    parse_amount(s).map_err(|e| e.to_string())
}
