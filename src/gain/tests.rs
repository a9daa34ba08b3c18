// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::io::Write;

use approx::assert_relative_eq;
use indoc::indoc;
use tempfile::NamedTempFile;

use super::*;

/// Make a curve following `gain = a * exp(b * current)`.
fn exponential_curve(a: f64, b: f64, currents: &[f64]) -> GainCurve {
    let gains = currents.iter().map(|c| a * (b * c).exp()).collect();
    GainCurve::new(currents.to_vec(), gains).unwrap()
}

#[test]
fn test_divider_current_is_exact() {
    for (v, expected) in DRIFT_VOLTAGES.iter().zip([
        0.0006, 0.00061, 0.00062, 0.00063, 0.00064, 0.00065, 0.00066, 0.00067, 0.00068,
    ]) {
        assert_eq!(divider_current(*v), *v / 5_000_000.0);
        assert_relative_eq!(divider_current(*v), expected, max_relative = 1e-15);
    }
}

#[test]
fn test_fit_recovers_exponential() {
    let a = 12.5;
    let b = 15_000.0;
    let curve = exponential_curve(a, b, &[550e-6, 600e-6, 650e-6, 700e-6, 750e-6]);
    let fit = curve.fit();
    assert_relative_eq!(fit.slope, b, max_relative = 1e-9);
    assert_relative_eq!(fit.intercept, a.ln(), max_relative = 1e-9);
}

#[test]
fn test_effective_gains_at_every_drift_voltage() {
    let a = 3.0;
    let b = 12_000.0;
    let curve = exponential_curve(a, b, &[590e-6, 700e-6]);
    let (_, gains) = estimate_effective_gains(&curve);

    assert_eq!(gains.len(), DRIFT_VOLTAGES.len());
    for (gain, v) in gains.iter().zip(DRIFT_VOLTAGES) {
        assert_eq!(gain.drift_voltage, v);
        assert_eq!(gain.divider_current, v / 5_000_000.0);
        let expected = a * (b * v / 5_000_000.0).exp();
        assert_relative_eq!(gain.gain, expected, max_relative = 1e-9);
    }
}

#[test]
fn test_fit_of_noisy_linear_log_gain() {
    // ln(gain) = 2x + 1 with symmetric perturbations; OLS gives the exact line.
    let currents = vec![0.0, 1.0, 2.0, 3.0];
    let log_gains = [1.1, 2.9, 5.1, 6.9];
    let gains = log_gains.iter().map(|l: &f64| l.exp()).collect();
    let fit = GainCurve::new(currents, gains).unwrap().fit();
    assert_relative_eq!(fit.slope, 1.96, max_relative = 1e-9);
    assert_relative_eq!(fit.intercept, 1.06, max_relative = 1e-9);
}

#[test]
fn test_non_positive_gain_is_rejected() {
    let result = GainCurve::new(vec![1.0, 2.0, 3.0], vec![10.0, 0.0, 30.0]);
    assert!(matches!(
        result,
        Err(GainError::NonPositiveGain { index: 1, .. })
    ));

    let result = GainCurve::new(vec![1.0, 2.0], vec![-1.0, 3.0]);
    assert!(matches!(
        result,
        Err(GainError::NonPositiveGain { index: 0, .. })
    ));
}

#[test]
fn test_underdetermined_curve_is_rejected() {
    let result = GainCurve::new(vec![1.0], vec![10.0]);
    assert!(matches!(result, Err(GainError::Underdetermined(1))));

    let result = GainCurve::new(vec![2.0, 2.0, 2.0], vec![10.0, 11.0, 12.0]);
    assert!(matches!(result, Err(GainError::Underdetermined(1))));

    let result = GainCurve::new(vec![], vec![]);
    assert!(matches!(result, Err(GainError::Underdetermined(0))));
}

#[test]
fn test_mismatched_lengths_are_rejected() {
    let result = GainCurve::new(vec![1.0, 2.0], vec![10.0]);
    assert!(matches!(
        result,
        Err(GainError::LengthMismatch {
            currents: 2,
            gains: 1
        })
    ));
}

#[test]
fn test_read_text() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(
        indoc! {"
            # gain vs divider current
            current gain
            0.00060 1200.0
            0.00065, 4500.0  # comma separated

            0.00070 17000.0
        "}
        .as_bytes(),
    )
    .unwrap();

    let curve = GainCurve::read_text(file.path()).unwrap();
    assert_eq!(curve.len(), 3);
    assert_eq!(curve.currents().to_vec(), vec![0.0006, 0.00065, 0.0007]);
    assert_eq!(curve.gains().to_vec(), vec![1200.0, 4500.0, 17000.0]);
}

#[test]
fn test_read_text_bad_line() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(
        indoc! {"
            0.00060 1200.0
            0.00065 lots
        "}
        .as_bytes(),
    )
    .unwrap();

    let result = GainCurve::read_text(file.path());
    assert!(matches!(result, Err(GainError::Parse { line: 2, .. })));
}

#[test]
fn test_read_text_missing_file() {
    let result = GainCurve::read_text("/this/does/not/exist.txt");
    assert!(matches!(result, Err(GainError::IO { .. })));
}
