//! Parsing of the diagnostic command's text output.

use super::{Reading, SampleError};

/// Strongest signal the scale maps to 100%.
const DBM_CEILING: f64 = -30.0;

/// Width of the dBm range mapped onto 0..100 (-100 dBm is 0%).
const DBM_SPAN: f64 = 70.0;

/// Convert a dBm value into a percentage of the -100..=-30 dBm range.
///
/// The mapping is linear and is not clamped.
pub fn dbm_to_percent(dbm: f64) -> f64 {
    100.0 - ((DBM_CEILING - dbm) / DBM_SPAN * 100.0)
}

/// Parse the command output into a [`Reading`].
///
/// The first line carries the signal level and the second line the noise
/// level. The value is whatever follows the last `:` on the line.
pub fn parse_output(output: &str) -> Result<Reading, SampleError> {
    let mut lines = output.trim_start().split('\n');

    let signal = lines
        .next()
        .ok_or_else(|| SampleError::Parse("missing signal line".to_string()))
        .and_then(|line| parse_dbm(line, "signal"))?;
    let noise = lines
        .next()
        .ok_or_else(|| SampleError::Parse("missing noise line".to_string()))
        .and_then(|line| parse_dbm(line, "noise"))?;

    Ok(Reading {
        signal: dbm_to_percent(signal as f64),
        noise: dbm_to_percent(noise as f64),
    })
}

fn parse_dbm(line: &str, what: &str) -> Result<i64, SampleError> {
    let (_, value) = line
        .rsplit_once(':')
        .ok_or_else(|| SampleError::Parse(format!("no value on {} line: {:?}", what, line)))?;
    value
        .trim()
        .parse::<i64>()
        .map_err(|e| SampleError::Parse(format!("bad {} value {:?}: {}", what, value.trim(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 0.01,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_dbm_range_endpoints() {
        assert_eq!(dbm_to_percent(-30.0), 100.0);
        assert_eq!(dbm_to_percent(-100.0), 0.0);
    }

    #[test]
    fn test_dbm_mapping_is_linear_and_monotonic() {
        let mut previous = dbm_to_percent(-100.0);
        for dbm in -99..=-30 {
            let pct = dbm_to_percent(dbm as f64);
            assert!(pct > previous);
            assert_close(pct - previous, 100.0 / 70.0);
            previous = pct;
        }
    }

    #[test]
    fn test_dbm_outside_range_is_not_clamped() {
        assert!(dbm_to_percent(-20.0) > 100.0);
        assert!(dbm_to_percent(-110.0) < 0.0);
    }

    #[test]
    fn test_parse_colon_separated_fields() {
        let reading = parse_output("Agr:ctl:-50\nNoise:ctl:-90\nextra:line\n").unwrap();
        assert_close(reading.signal, 71.43);
        assert_close(reading.noise, 14.29);
    }

    #[test]
    fn test_parse_airport_output() {
        let output = "     agrCtlRSSI: -58\n     agrCtlNoise: -94\n";
        let reading = parse_output(output).unwrap();
        assert_close(reading.signal, dbm_to_percent(-58.0));
        assert_close(reading.noise, dbm_to_percent(-94.0));
    }

    #[test]
    fn test_parse_missing_noise_line() {
        let err = parse_output("agrCtlRSSI: -58").unwrap_err();
        assert!(matches!(err, SampleError::Parse(_)));
    }

    #[test]
    fn test_parse_empty_output() {
        let err = parse_output("").unwrap_err();
        assert!(matches!(err, SampleError::Parse(_)));
    }

    #[test]
    fn test_parse_non_numeric_value() {
        let err = parse_output("agrCtlRSSI: strong\nagrCtlNoise: -94\n").unwrap_err();
        assert!(matches!(err, SampleError::Parse(_)));
    }
}
