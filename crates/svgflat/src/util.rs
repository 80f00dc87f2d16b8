/// Formats a coordinate the way ECMAScript's number-to-string does, so the
/// emitted path data matches what the reference JavaScript tooling produces
/// (including tie-breaking cases where Rust's default float formatting can
/// pick a different shortest round-trippable decimal).
///
/// Non-finite values are kept textual: a missing mandatory shape attribute
/// deliberately propagates `NaN` into the output rather than failing.
pub(crate) fn format_number<'a>(value: f64, buf: &'a mut ryu_js::Buffer) -> &'a str {
    if value.is_nan() {
        return "NaN";
    }
    if value == f64::INFINITY {
        return "Infinity";
    }
    if value == f64::NEG_INFINITY {
        return "-Infinity";
    }
    // Collapse -0 so transforms never print a negative zero.
    let value = if value == 0.0 { 0.0 } else { value };
    buf.format_finite(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_floats_print_without_fraction() {
        let mut buf = ryu_js::Buffer::new();
        assert_eq!(format_number(5.0, &mut buf), "5");
        assert_eq!(format_number(-10.0, &mut buf), "-10");
        assert_eq!(format_number(0.5, &mut buf), "0.5");
    }

    #[test]
    fn non_finite_values_stay_textual() {
        let mut buf = ryu_js::Buffer::new();
        assert_eq!(format_number(f64::NAN, &mut buf), "NaN");
        assert_eq!(format_number(f64::INFINITY, &mut buf), "Infinity");
    }

    #[test]
    fn negative_zero_collapses() {
        let mut buf = ryu_js::Buffer::new();
        assert_eq!(format_number(-0.0, &mut buf), "0");
    }
}
