//! Numeric field rendering.
//!
//! The receiver patch parses fields the way they come out of a C++ stream
//! with default float formatting: `%g` at six significant digits. That
//! means no trailing zeros (`90`, not `90.000000`), plain decimals for
//! magnitudes in `[1e-4, 1e6)`, and `d.ddddde±XX` outside that range.
//!
//! One deliberate departure: negative zero renders as `0`. The wrist
//! transform negates two axes, and a hand resting exactly on the origin
//! should not put `-0` on the wire.

/// Significant digits, as with the default stream precision.
pub const PRECISION: usize = 6;

/// Render one field value.
pub fn format_field(value: f32) -> String {
    // The stream promotes to double before formatting.
    let v = value as f64;

    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf".to_string() } else { "-inf".to_string() };
    }
    if v == 0.0 {
        return "0".to_string();
    }

    // Round to PRECISION significant digits first; the exponent of the
    // rounded value picks the notation.
    let sci = format!("{:.*e}", PRECISION - 1, v);
    let (mantissa, exp) = match sci.split_once('e') {
        Some(parts) => parts,
        None => return sci,
    };
    let exp: i32 = exp.parse().unwrap_or(0);

    if exp < -4 || exp >= PRECISION as i32 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exp.abs())
    } else {
        let decimals = (PRECISION as i32 - 1 - exp) as usize;
        trim_fraction(&format!("{:.*}", decimals, v)).to_string()
    }
}

/// Strip trailing fractional zeros and a dangling decimal point.
fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_have_no_fraction() {
        assert_eq!(format_field(0.0), "0");
        assert_eq!(format_field(90.0), "90");
        assert_eq!(format_field(180.0), "180");
        assert_eq!(format_field(-45.0), "-45");
    }

    #[test]
    fn negative_zero_is_plain_zero() {
        assert_eq!(format_field(-0.0), "0");
    }

    #[test]
    fn fractions_keep_six_significant_digits() {
        assert_eq!(format_field(-12.5), "-12.5");
        assert_eq!(format_field(0.12), "0.12");
        assert_eq!(format_field(0.123456789), "0.123457");
        assert_eq!(format_field(57.29578), "57.2958");
        assert_eq!(format_field(123456.7), "123457");
    }

    #[test]
    fn small_and_large_use_exponent() {
        assert_eq!(format_field(0.0001), "0.0001");
        assert_eq!(format_field(0.00001), "1e-05");
        assert_eq!(format_field(1_500_000.0), "1.5e+06");
        assert_eq!(format_field(-2.5e-7), "-2.5e-07");
    }

    #[test]
    fn non_finite_values() {
        assert_eq!(format_field(f32::NAN), "nan");
        assert_eq!(format_field(f32::INFINITY), "inf");
        assert_eq!(format_field(f32::NEG_INFINITY), "-inf");
    }

    #[test]
    fn rendered_fields_never_contain_delimiters() {
        for v in [0.0f32, -0.0, 1.0, -179.99, 3.0e12, 1.0e-12, f32::NAN] {
            let s = format_field(v);
            assert!(!s.contains(';'), "{}", s);
            assert!(!s.contains(' '), "{}", s);
        }
    }
}
