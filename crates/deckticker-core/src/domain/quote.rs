/// Canonical result of one successful fetch.
///
/// A `Quote` is only ever built from a complete, well-formed upstream
/// response; a missing required field fails the fetch instead of producing
/// a partially populated value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    /// Authoritative price to display. May be a pre-/post-market override.
    pub current_price: f64,
    /// Basis for change computation.
    pub previous_close: f64,
    /// True when `current_price` came from a pre/post-market field rather
    /// than the regular session price.
    pub is_after_hours: bool,
}

impl Quote {
    pub fn regular(current_price: f64, previous_close: f64) -> Self {
        Self {
            current_price,
            previous_close,
            is_after_hours: false,
        }
    }

    pub fn change(&self) -> f64 {
        self.current_price - self.previous_close
    }

    /// Percentage change against the previous close. A previous close of
    /// exactly zero is undefined upstream data and yields a non-finite
    /// value here; there is deliberately no zero guard.
    pub fn change_percent(&self) -> f64 {
        self.change() / self.previous_close * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_change() {
        let quote = Quote::regular(150.50, 145.00);
        assert_eq!(format!("{:.2}", quote.change()), "5.50");
        assert_eq!(format!("{:.2}", quote.change_percent()), "3.79");
    }

    #[test]
    fn negative_change() {
        let quote = Quote::regular(140.00, 145.00);
        assert_eq!(format!("{:.2}", quote.change()), "-5.00");
        assert_eq!(format!("{:.2}", quote.change_percent()), "-3.45");
    }

    #[test]
    fn zero_change() {
        let quote = Quote::regular(100.00, 100.00);
        assert_eq!(quote.change(), 0.0);
        assert_eq!(quote.change_percent(), 0.0);
    }

    #[test]
    fn zero_previous_close_propagates_non_finite_percent() {
        let quote = Quote::regular(10.0, 0.0);
        assert!(!quote.change_percent().is_finite());
    }
}
