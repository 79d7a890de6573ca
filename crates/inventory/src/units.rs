//! Conversion between packages and base units.
//!
//! Every raw form value goes through [`parse_number`] before it reaches arithmetic, so
//! none of these functions panic or yield `NaN`. Sign is never checked here; range
//! validation belongs to the caller.

/// A value that may be read as a number: typed numbers, text typed into a form field,
/// or an absent value.
pub trait NumericInput {
    /// The parsed value, or `None` when the input is absent or unparseable.
    fn to_number(&self) -> Option<f64>;
}

impl NumericInput for f64 {
    fn to_number(&self) -> Option<f64> {
        (!self.is_nan()).then_some(*self)
    }
}

impl NumericInput for f32 {
    fn to_number(&self) -> Option<f64> {
        f64::from(*self).to_number()
    }
}

impl NumericInput for i64 {
    fn to_number(&self) -> Option<f64> {
        Some(*self as f64)
    }
}

impl NumericInput for i32 {
    fn to_number(&self) -> Option<f64> {
        Some(f64::from(*self))
    }
}

impl NumericInput for u32 {
    fn to_number(&self) -> Option<f64> {
        Some(f64::from(*self))
    }
}

impl NumericInput for str {
    fn to_number(&self) -> Option<f64> {
        parse_leading_float(self)
    }
}

impl NumericInput for String {
    fn to_number(&self) -> Option<f64> {
        parse_leading_float(self)
    }
}

impl<T: NumericInput + ?Sized> NumericInput for &T {
    fn to_number(&self) -> Option<f64> {
        (**self).to_number()
    }
}

impl<T: NumericInput> NumericInput for Option<T> {
    fn to_number(&self) -> Option<f64> {
        self.as_ref().and_then(NumericInput::to_number)
    }
}

/// Parse the longest numeric prefix of `input`.
///
/// Leading whitespace is skipped and trailing garbage ignored, so `"12 boxes"` reads as
/// `12`. Accepts an optional sign, digits with an optional fraction, an optional
/// exponent, and `Infinity`.
fn parse_leading_float(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let len = bytes.len();

    let mut end = 0;
    let negative = match bytes.first() {
        Some(b'-') => {
            end = 1;
            true
        }
        Some(b'+') => {
            end = 1;
            false
        }
        _ => false,
    };

    if s[end..].starts_with("Infinity") {
        return Some(if negative { f64::NEG_INFINITY } else { f64::INFINITY });
    }

    let int_start = end;
    while end < len && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < len && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < len && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    if end < len && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < len && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < len && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

/// Parse `value`, yielding `None` when it is absent or unparseable.
pub fn parse_number(value: impl NumericInput) -> Option<f64> {
    value.to_number()
}

/// Parse `value`, yielding `fallback` when it is absent or unparseable.
pub fn parse_number_or(value: impl NumericInput, fallback: f64) -> f64 {
    value.to_number().unwrap_or(fallback)
}

/// Convert a package count into base units.
///
/// Returns `0` if either input is unparseable. A package size of `0` yields `0`.
pub fn packages_to_base_units(packages: impl NumericInput, package_size: impl NumericInput) -> f64 {
    match (packages.to_number(), package_size.to_number()) {
        (Some(packages), Some(size)) => {
            let base = packages * size;
            if base.is_nan() { 0.0 } else { base }
        }
        _ => 0.0,
    }
}

/// Convert base units into packages. Without a positive package size, packages are a
/// 1:1 alias for base units.
pub fn base_units_to_packages(base_units: f64, package_size: f64) -> f64 {
    if package_size > 0.0 {
        base_units / package_size
    } else {
        base_units
    }
}

/// Round half up to 2 decimals.
pub(crate) fn round_to_cents(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

/// Render a quantity for a text field.
///
/// Rounds to 2 decimals; whole values render without a fractional part and trailing
/// zeros are trimmed otherwise (`2`, `2.5`, `0.33`). Unparseable input renders as `"0"`.
/// Formatting is idempotent.
pub fn format_quantity_for_display(value: impl NumericInput) -> String {
    let Some(parsed) = value.to_number() else {
        return "0".to_string();
    };

    let rounded = round_to_cents(parsed);
    if rounded.is_infinite() {
        return if rounded > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if rounded.fract() == 0.0 {
        // Avoid rendering negative zero as "-0".
        if rounded == 0.0 {
            return "0".to_string();
        }
        return format!("{rounded}");
    }

    let fixed = format!("{rounded:.2}");
    fixed.trim_end_matches('0').to_string()
}
