use assert_cmd::Command;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;
use std::io::Write;

fn dealcalc() -> Command {
    let mut cmd = Command::cargo_bin("dealcalc").unwrap();
    cmd.write_stdin("");
    cmd
}

fn decimal(value: &Value) -> Decimal {
    value.as_str().unwrap().parse().unwrap()
}

fn json_stdout(cmd: &mut Command) -> Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

#[test]
fn test_help_lists_commands() {
    let output = dealcalc().arg("--help").assert().success().get_output().stdout.clone();
    let text = String::from_utf8(output).unwrap();
    for cmd in ["dscr", "quick-dscr", "flip", "amortization", "ltv", "cash-on-cash"] {
        assert!(text.contains(cmd), "missing {cmd} in help");
    }
}

#[test]
fn test_dscr_from_flags() {
    let value = json_stdout(dealcalc().args(["dscr", "--rent", "2500", "--price", "350000"]));
    let result = &value["result"];
    assert_eq!(decimal(&result["loan_amount"]), dec!(262500));
    assert_eq!(decimal(&result["dscr_display"]), dec!(1.07));
    assert_eq!(result["status"], "Weak");
    assert_eq!(result["qualifies"], false);
}

#[test]
fn test_dscr_from_input_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"monthly_rent": "3000", "purchase_price": "360000", "down_payment_percent": "0",
            "interest_rate": "0", "loan_term_years": 30, "monthly_taxes": "0",
            "monthly_insurance": "0"}}"#
    )
    .unwrap();
    let path = file.path().to_str().unwrap();
    let value = json_stdout(dealcalc().args(["dscr", "--input", path]));
    assert_eq!(value["result"]["status"], "Strong");
    assert_eq!(decimal(&value["result"]["dscr_display"]), dec!(3));
}

#[test]
fn test_assumptions_file_changes_thresholds() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(file, "thresholds:\n  strong: \"1.00\"\n  minimum: \"1.00\"").unwrap();
    let path = file.path().to_str().unwrap();
    let value = json_stdout(dealcalc().args([
        "dscr",
        "--rent",
        "2500",
        "--price",
        "350000",
        "--assumptions",
        path,
    ]));
    assert_eq!(value["result"]["status"], "Strong");
    assert_eq!(value["result"]["qualifies"], true);
}

#[test]
fn test_zero_term_is_an_error() {
    dealcalc()
        .args(["dscr", "--rent", "2500", "--price", "350000", "--term", "0"])
        .assert()
        .failure()
        .code(1);
}

#[test]
fn test_quick_dscr_minimal_output() {
    let output = dealcalc()
        .args(["quick-dscr", "--value", "350000", "--output", "minimal"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(String::from_utf8(output).unwrap().trim(), "1.19");
}

#[test]
fn test_cash_on_cash_accepts_negative_flow() {
    let value = json_stdout(dealcalc().args([
        "cash-on-cash",
        "--annual-cash-flow",
        "-1200",
        "--invested",
        "60000",
    ]));
    assert_eq!(decimal(&value["result"]["cash_on_cash_percent"]), dec!(-2));
}

#[test]
fn test_amortization_schedule_rows() {
    let value = json_stdout(dealcalc().args([
        "amortization",
        "--principal",
        "200000",
        "--rate",
        "6",
        "--term",
        "15",
    ]));
    assert_eq!(value["schedule"].as_array().unwrap().len(), 15);
}

#[test]
fn test_money_flags_accept_formatted_amounts() {
    let value = json_stdout(dealcalc().args(["dscr", "--rent", "$2,500", "--price", "$350,000"]));
    assert_eq!(decimal(&value["result"]["loan_amount"]), dec!(262500));

    let value = json_stdout(dealcalc().args([
        "cash-on-cash",
        "--annual-cash-flow",
        "-1,200",
        "--invested",
        "$60,000",
    ]));
    assert_eq!(decimal(&value["result"]["cash_on_cash_percent"]), dec!(-2));
}

#[test]
fn test_unparseable_amount_is_a_usage_error() {
    dealcalc()
        .args(["ltv", "--loan", "lots", "--price", "350000"])
        .assert()
        .failure();
}

#[test]
fn test_amortization_rejects_absurd_term() {
    dealcalc()
        .args(["amortization", "--principal", "100000", "--rate", "0", "--term", "4000000000"])
        .assert()
        .failure()
        .code(1);
}
