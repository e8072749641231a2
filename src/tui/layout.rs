//! Responsive breakpoints for the TUI layout.
//!
//! Width thresholds live here so render code never compares raw column counts.

use crate::config::CardVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Breakpoint {
    /// < 60 cols: one column, short hints
    Compact,
    /// 60-99 cols: form and side panel stacked
    Normal,
    /// 100-139 cols: form and side panel side by side
    Wide,
    /// 140+ cols: two card columns
    UltraWide,
}

impl Breakpoint {
    pub fn from_width(width: u16) -> Self {
        match width {
            0..=59 => Breakpoint::Compact,
            60..=99 => Breakpoint::Normal,
            100..=139 => Breakpoint::Wide,
            _ => Breakpoint::UltraWide,
        }
    }

    /// Check if at least this breakpoint (inclusive)
    pub fn at_least(&self, min: Breakpoint) -> bool {
        self.ordinal() >= min.ordinal()
    }

    fn ordinal(&self) -> u8 {
        match self {
            Breakpoint::Compact => 0,
            Breakpoint::Normal => 1,
            Breakpoint::Wide => 2,
            Breakpoint::UltraWide => 3,
        }
    }

    /// Card grid columns for the product and sheet lists
    pub fn card_columns(&self, variant: CardVariant) -> usize {
        match (variant, self) {
            (CardVariant::Detailed, Breakpoint::UltraWide) => 2,
            _ => 1,
        }
    }
}

/// Terminal rows taken by one list entry
pub fn card_height(variant: CardVariant) -> u16 {
    match variant {
        CardVariant::Simple => 1,
        CardVariant::Detailed => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakpoint_thresholds() {
        assert_eq!(Breakpoint::from_width(59), Breakpoint::Compact);
        assert_eq!(Breakpoint::from_width(60), Breakpoint::Normal);
        assert_eq!(Breakpoint::from_width(100), Breakpoint::Wide);
        assert_eq!(Breakpoint::from_width(140), Breakpoint::UltraWide);
        assert!(Breakpoint::Wide.at_least(Breakpoint::Normal));
        assert!(!Breakpoint::Normal.at_least(Breakpoint::Wide));
    }

    #[test]
    fn only_wide_detailed_lists_use_two_columns() {
        assert_eq!(Breakpoint::UltraWide.card_columns(CardVariant::Detailed), 2);
        assert_eq!(Breakpoint::UltraWide.card_columns(CardVariant::Simple), 1);
        assert_eq!(Breakpoint::Wide.card_columns(CardVariant::Detailed), 1);
    }
}
