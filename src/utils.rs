use ratatui::layout::{Constraint, Direction, Layout, Rect};
use rust_decimal::{Decimal, RoundingStrategy};

/// Formats an amount the way prices are shown everywhere: two decimals,
/// halves rounded away from zero.
pub fn format_money(amount: Decimal) -> String {
    format!(
        "{:.2}",
        amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// Helper function to create a centered rectangle.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(dec!(40)), "40.00");
        assert_eq!(format_money(dec!(2.5)), "2.50");
        assert_eq!(format_money(dec!(1.005)), "1.01");
        assert_eq!(format_money(dec!(2.125)), "2.13");
        assert_eq!(format_money(dec!(-1.005)), "-1.01");
    }
}
