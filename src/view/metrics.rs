use ratatui::style::Color;

use crate::types::DashboardStats;
use crate::view::format::{
    change_color, format_count, format_currency, format_percent_change, format_rate, Locale,
};

#[derive(Debug, Clone, PartialEq)]
pub struct MetricCard {
    pub title: &'static str,
    pub value: String,
    pub change: String,
    pub change_color: Color,
}

fn card(title: &'static str, value: String, percentage: f64) -> MetricCard {
    MetricCard {
        title,
        value,
        change: format_percent_change(percentage),
        change_color: change_color(percentage),
    }
}

/// GGR, RTP, DAU and total bets, in display order.
pub fn metric_cards(stats: &DashboardStats, locale: &Locale) -> [MetricCard; 4] {
    [
        card("GGR", format_currency(stats.ggr.value.round() as i64, locale), stats.ggr.percentage),
        card("RTP", format_rate(stats.rtp.value, locale), stats.rtp.percentage),
        card("DAU", format_count(stats.dau.value, locale), stats.dau.percentage),
        card(
            "Total bets",
            format_currency(stats.total_bets.value.round() as i64, locale),
            stats.total_bets.percentage,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Metric;

    #[test]
    fn cards_format_each_metric_its_own_way() {
        let stats = DashboardStats {
            ggr: Metric { value: 1_250_000.0, percentage: 4.2 },
            rtp: Metric { value: 96.1, percentage: -0.3 },
            dau: Metric { value: 1840.0, percentage: 12.0 },
            total_bets: Metric { value: 9_800_000.0, percentage: 0.0 },
        };
        let cards = metric_cards(&stats, &Locale::default());

        assert_eq!(cards[0].value, "$12,500.00");
        assert_eq!(cards[1].value, "96.10%");
        assert_eq!(cards[1].change, "-0.3%");
        assert_eq!(cards[1].change_color, Color::Red);
        assert_eq!(cards[2].value, "1,840");
        assert_eq!(cards[3].title, "Total bets");
        assert_eq!(cards[3].change_color, Color::Green);
    }
}
