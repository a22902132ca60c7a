//! Human-scaled bit rates.

use std::fmt;

const DIVISOR: f64 = 1024.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BitUnit {
    Bit,
    Kbit,
    Mbit,
    Gbit,
}

impl BitUnit {
    pub fn label(self) -> &'static str {
        match self {
            Self::Bit => "bit",
            Self::Kbit => "kbit",
            Self::Mbit => "Mbit",
            Self::Gbit => "Gbit",
        }
    }

    fn next(self) -> Option<Self> {
        match self {
            Self::Bit => Some(Self::Kbit),
            Self::Kbit => Some(Self::Mbit),
            Self::Mbit => Some(Self::Gbit),
            Self::Gbit => None,
        }
    }
}

impl fmt::Display for BitUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormattedMagnitude {
    pub value: f64,
    pub unit: BitUnit,
}

/// Divide by 1024 while the value is at least 1024 and a bigger unit exists.
/// Negative and NaN inputs (a wrapped counter) are treated as zero.
pub fn format_bits(n_bits: f64) -> FormattedMagnitude {
    let mut value = if n_bits.is_nan() || n_bits < 0.0 {
        0.0
    } else {
        n_bits
    };
    let mut unit = BitUnit::Bit;
    while value >= DIVISOR {
        let Some(next) = unit.next() else {
            break;
        };
        value /= DIVISOR;
        unit = next;
    }
    FormattedMagnitude { value, unit }
}

/// `"976.56kbit/s"`: two decimals at most, trailing zeros dropped.
pub fn format_rate(n_bits: f64) -> String {
    let scaled = format_bits(n_bits);
    format!("{}{}/s", trim_decimals(scaled.value, 2), scaled.unit)
}

pub(crate) fn trim_decimals(value: f64, places: usize) -> String {
    let text = format!("{value:.places$}");
    if !text.contains('.') {
        return text;
    }
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const K: f64 = 1024.0;

    #[test]
    fn boundaries_follow_the_divisor_table() {
        assert_eq!(
            format_bits(0.0),
            FormattedMagnitude {
                value: 0.0,
                unit: BitUnit::Bit
            }
        );
        assert_eq!(format_bits(1023.0).unit, BitUnit::Bit);
        assert_eq!(format_bits(1023.0).value, 1023.0);
        assert_eq!(
            format_bits(K),
            FormattedMagnitude {
                value: 1.0,
                unit: BitUnit::Kbit
            }
        );
        assert_eq!(
            format_bits(K * K),
            FormattedMagnitude {
                value: 1.0,
                unit: BitUnit::Mbit
            }
        );

        let below_gbit = format_bits(K * K * K - 1.0);
        assert_eq!(below_gbit.unit, BitUnit::Mbit);
        assert!(below_gbit.value < K);

        assert_eq!(format_bits(K * K * K).unit, BitUnit::Gbit);
    }

    #[test]
    fn gbit_is_never_divided_further() {
        let huge = format_bits(K * K * K * K * 5.0);
        assert_eq!(huge.unit, BitUnit::Gbit);
        assert_eq!(huge.value, 5.0 * K);
    }

    #[test]
    fn scaled_value_stays_in_range() {
        let mut n = 1.0;
        while n < 1e15 {
            let out = format_bits(n);
            assert!(out.value >= 1.0, "{n} -> {out:?}");
            if out.unit != BitUnit::Gbit {
                assert!(out.value < K, "{n} -> {out:?}");
            }
            n *= 3.7;
        }
    }

    #[test]
    fn one_megabit_per_second_stays_in_kbit() {
        let out = format_bits(1_000_000.0);
        assert_eq!(out.unit, BitUnit::Kbit);
        assert!((out.value - 976.5625).abs() < 1e-9);
        assert!((1_000_000.0 / K / K - 0.9536).abs() < 1e-3);
    }

    #[test]
    fn negative_input_clamps_to_zero() {
        assert_eq!(format_bits(-4096.0).value, 0.0);
        assert_eq!(format_bits(f64::NAN).unit, BitUnit::Bit);
    }

    #[test]
    fn rate_text_trims_trailing_zeros() {
        assert_eq!(format_rate(0.0), "0bit/s");
        assert_eq!(format_rate(K), "1kbit/s");
        assert_eq!(format_rate(1_000_000.0), "976.56kbit/s");
        assert_eq!(format_rate(K * K * 1.5), "1.5Mbit/s");
    }
}
