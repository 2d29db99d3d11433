//! Equipment load conversion between the backend's native mass unit (grams)
//! and the display unit used in plan files (whole pounds).

use crate::wire::WeightUnit;

/// Native units per display unit.
pub const GRAMS_PER_POUND: f64 = 453.59237;

/// Convert a wire weight to whole display pounds.
///
/// Values already tagged as pounds are only rounded. Zero is zero whatever
/// the unit says.
pub fn to_display_weight(value: f64, unit: Option<&WeightUnit>) -> f64 {
    if value == 0.0 {
        return 0.0;
    }

    if unit.is_some_and(WeightUnit::is_display_unit) {
        return value.round();
    }

    (value / GRAMS_PER_POUND).round()
}

/// Convert display pounds back to the native unit, rounded to a whole gram.
pub fn to_native_weight(display_value: f64) -> f64 {
    (display_value * GRAMS_PER_POUND).round()
}
