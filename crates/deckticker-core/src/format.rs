//! Display formatting for the button face.
//!
//! Pure functions, no I/O, fully deterministic: the render layer feeds them
//! the pipeline output and pushes the results to the host verbatim.

/// Binary display state the host maps to button colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    /// Green. Non-negative change, zero included.
    Up,
    /// Red. Negative change, and the substitute for every fetch failure.
    Down,
}

impl ButtonState {
    /// Wire value for the host's `setState` command.
    pub const fn code(self) -> u8 {
        match self {
            Self::Up => 0,
            Self::Down => 1,
        }
    }
}

/// Up when `change >= 0` (zero counts as up), down otherwise. There is no
/// neutral state; failure callers substitute [`ButtonState::Down`].
pub fn state_for_change(change: f64) -> ButtonState {
    if change >= 0.0 {
        ButtonState::Up
    } else {
        ButtonState::Down
    }
}

pub fn format_price(price: f64) -> String {
    format!("${price:.2}")
}

pub fn format_change(change: f64) -> String {
    // -0.0 would otherwise render as "+-0.00".
    let change = if change == 0.0 { 0.0 } else { change };
    if change >= 0.0 {
        format!("+{change:.2}")
    } else {
        format!("{change:.2}")
    }
}

pub fn format_percent(change_percent: f64) -> String {
    format!("{}%", format_change(change_percent))
}

/// Three display lines joined by newline: symbol, price, percent change
/// (with a trailing `" AH"` marker outside regular hours). A `None` price
/// means the fetch failed and the whole title collapses to `"ERROR"`.
pub fn format_title(
    symbol: &str,
    price: Option<f64>,
    change_percent: f64,
    is_after_hours: bool,
) -> String {
    let Some(price) = price else {
        return String::from("ERROR");
    };

    let suffix = if is_after_hours { " AH" } else { "" };
    format!(
        "{symbol}\n{}\n{}{suffix}",
        format_price(price),
        format_percent(change_percent)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_has_dollar_sign_and_two_decimals() {
        assert_eq!(format_price(150.5), "$150.50");
        assert_eq!(format_price(99.99), "$99.99");
        assert_eq!(format_price(1000.0), "$1000.00");
        assert_eq!(format_price(-12.345), "$-12.35");
    }

    #[test]
    fn change_always_carries_a_sign() {
        assert_eq!(format_change(5.50), "+5.50");
        assert_eq!(format_change(-3.25), "-3.25");
        assert_eq!(format_change(0.0), "+0.00");
        assert_eq!(format_change(-0.0), "+0.00");
    }

    #[test]
    fn percent_always_carries_a_sign_and_suffix() {
        assert_eq!(format_percent(3.79), "+3.79%");
        assert_eq!(format_percent(-2.50), "-2.50%");
        assert_eq!(format_percent(0.0), "+0.00%");
    }

    #[test]
    fn regular_hours_title() {
        assert_eq!(
            format_title("AAPL", Some(150.50), 3.79, false),
            "AAPL\n$150.50\n+3.79%"
        );
    }

    #[test]
    fn after_hours_title_gets_the_marker() {
        assert_eq!(
            format_title("TSLA", Some(245.75), -1.25, true),
            "TSLA\n$245.75\n-1.25% AH"
        );
    }

    #[test]
    fn missing_price_is_always_error() {
        assert_eq!(format_title("AAPL", None, 0.0, false), "ERROR");
        assert_eq!(format_title("TSLA", None, 12.5, true), "ERROR");
    }

    #[test]
    fn zero_change_counts_as_up() {
        assert_eq!(state_for_change(0.0), ButtonState::Up);
        assert_eq!(state_for_change(f64::EPSILON), ButtonState::Up);
        assert_eq!(state_for_change(-f64::EPSILON), ButtonState::Down);
        assert_eq!(state_for_change(-3.25), ButtonState::Down);
    }

    #[test]
    fn state_codes_match_the_host_contract() {
        assert_eq!(ButtonState::Up.code(), 0);
        assert_eq!(ButtonState::Down.code(), 1);
    }
}
