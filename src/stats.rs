use crate::error::Error;

// Pearson's chi-squared goodness-of-fit between an observed and an expected
// frequency vector. Lower means closer.
pub fn chi_squared(observed: &[f64], expected: &[f64]) -> Result<f64, Error> {
    if observed.len() != expected.len() {
        return Err(Error::LengthMismatch {
            left: observed.len(),
            right: expected.len(),
        });
    }
    Ok(observed
        .iter()
        .zip(expected.iter())
        .map(|(o, e)| (o - e).powi(2) / e)
        .sum())
}

#[test]
fn test_chi_squared_identical_distributions() {
    assert_eq!(Ok(0.0), chi_squared(&[0.4, 0.6], &[0.4, 0.6]));
}

#[test]
fn test_chi_squared_known_values() {
    assert_eq!(Ok(1.0), chi_squared(&[0.0, 0.0], &[0.4, 0.6]));

    let result = chi_squared(&[50.0, 45.0, 5.0], &[30.0, 60.0, 10.0]).unwrap();
    assert!((result - 19.583).abs() < 0.001);
}

#[test]
fn test_chi_squared_length_mismatch() {
    let result = chi_squared(&[1.0], &[0.5, 0.5]);
    assert_eq!(Err(Error::LengthMismatch { left: 1, right: 2 }), result);
}
