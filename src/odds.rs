//! Probability to decimal price conversion and display helpers.

/// Fair decimal price for probability `p`, no margin applied.
pub fn fair_odds(p: f64) -> f64 {
    if p <= 0.0 {
        return f64::INFINITY;
    }
    1.0 / p
}

/// Price shown to users: implied probabilities across both sides sum to
/// `1 + margin`. Rounded half-up to cents and floored at `min_odds`.
pub fn display_odds(p: f64, margin: f64, min_odds: f64) -> f64 {
    let loaded = p * (1.0 + margin.max(0.0));
    if loaded <= 0.0 {
        return f64::MAX;
    }
    round_half_up_cents(1.0 / loaded).max(min_odds)
}

pub fn implied_probability(decimal: f64) -> Option<f64> {
    (decimal.is_finite() && decimal > 1.0).then(|| 1.0 / decimal)
}

/// Strips the book margin from a two-way price pair. Returns
/// `(p_a, p_b, overround)` where `overround` is the excess over 100%.
pub fn no_vig_from_decimal(odds_a: f64, odds_b: f64) -> Option<(f64, f64, f64)> {
    let ia = implied_probability(odds_a)?;
    let ib = implied_probability(odds_b)?;
    let sum = ia + ib;
    if sum <= 0.0 {
        return None;
    }
    Some((ia / sum, ib / sum, sum - 1.0))
}

pub fn format_odds(value: f64) -> String {
    format!("{:.2}", round_half_up_cents(value))
}

/// Same as [`format_odds`] with a locale decimal separator, e.g. `','`.
pub fn format_odds_localized(value: f64, decimal_separator: char) -> String {
    let plain = format_odds(value);
    if decimal_separator == '.' {
        return plain;
    }
    plain.replacen('.', &decimal_separator.to_string(), 1)
}

fn round_half_up_cents(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    // The nudge keeps values like 1.005 (stored as 1.00499..) rounding up.
    ((value * 100.0) + 0.5 + 1e-9).floor() / 100.0
}
