use super::*;

#[test]
fn test_quantiles() {
    let v = vec![1.0, 2.0, 3.0, 4.0, 5.0];
    assert_eq!(median(&v), 3.0);
    assert_eq!(p10(&v), 2.0);
    assert_eq!(p90(&v), 5.0);
}

#[test]
fn test_quantiles_empty() {
    assert_eq!(median(&[]), 0.0);
    assert_eq!(mean(&[]), 0.0);
}

#[test]
fn test_share_percent() {
    assert_eq!(share_percent(0, 0), 0.0);
    assert_eq!(share_percent(1, 4), 25.0);
}

#[test]
fn test_formatting() {
    assert_eq!(format_f64_2(9.6019), "9.60");
    assert_eq!(format_f64_2(-0.005), "-0.01");
}
