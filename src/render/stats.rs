//! Fixed-layout stat cards.

use super::{escape, fmt_currency, fmt_fixed2, NO_DATA};
use crate::report::{NetworkReport, StatEntry, StatValue};

fn card(value: &str, label: &str, color: &str) -> String {
    format!(
        "<div class=\"stat-card\"><h5 class=\"{}\">{}</h5><p class=\"mb-0 text-muted small\">{}</p></div>\n",
        color,
        value,
        escape(label)
    )
}

/// Cards in input order; the order encodes display priority, never sort.
pub fn stat_cards(entries: &[StatEntry]) -> String {
    if entries.is_empty() {
        return format!("<p class=\"text-muted\">{}</p>\n", NO_DATA);
    }
    let mut html = String::new();
    for entry in entries {
        let value = match &entry.value {
            StatValue::Number(n) => fmt_fixed2(*n),
            StatValue::Text(s) => escape(s),
        };
        html.push_str(&card(&value, &entry.metric, "text-primary"));
    }
    html
}

/// The six basic cards of the network results page.
pub fn network_stat_cards(report: &NetworkReport) -> String {
    let stats = &report.stats;
    let cards = [
        (report.node_count.to_string(), "节点数量", "text-primary"),
        (report.edge_count.to_string(), "连接数量", "text-primary"),
        (fmt_currency(stats.total_amount), "总交易金额", "text-primary"),
        (fmt_currency(stats.avg_amount), "平均交易金额", "text-primary"),
        (fmt_currency(stats.borrow_stats.total), "借方交易总额", "text-danger"),
        (fmt_currency(stats.lend_stats.total), "贷方交易总额", "text-success"),
    ];
    let mut html = String::new();
    for (value, label, color) in cards {
        html.push_str(&card(&value, label, color));
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_values_get_two_decimals() {
        let entries: Vec<StatEntry> =
            serde_json::from_str(r#"[{"统计指标":"笔数","数值":12}]"#).unwrap();
        let html = stat_cards(&entries);
        assert!(html.contains("12.00"));
        assert!(html.contains("笔数"));
    }

    #[test]
    fn test_text_values_verbatim() {
        let entries: Vec<StatEntry> =
            serde_json::from_str(r#"[{"统计指标":"户名","数值":"张三"}]"#).unwrap();
        let html = stat_cards(&entries);
        assert!(html.contains("张三"));
        assert!(!html.contains("张三.00"));
    }

    #[test]
    fn test_cards_keep_input_order() {
        let entries: Vec<StatEntry> = serde_json::from_str(
            r#"[{"统计指标":"乙","数值":2},{"统计指标":"甲","数值":1}]"#,
        )
        .unwrap();
        let html = stat_cards(&entries);
        let first = html.find("乙").unwrap();
        let second = html.find("甲").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_empty_stats_placeholder() {
        assert!(stat_cards(&[]).contains(NO_DATA));
    }

    #[test]
    fn test_network_cards_currency_and_accents() {
        let report: NetworkReport = serde_json::from_str(
            r#"{
                "filename": "network_1",
                "html_file": "g.html",
                "node_count": 5,
                "edge_count": 4,
                "stats": {
                    "total_amount": 1234567.0,
                    "avg_amount": 100.5,
                    "borrow_stats": {"total": 1000000.0},
                    "lend_stats": {"total": 234567.0}
                }
            }"#,
        )
        .unwrap();
        let html = network_stat_cards(&report);
        assert!(html.contains("¥1,234,567.00"));
        assert!(html.contains("¥100.50"));
        assert!(html.contains("text-danger"));
        assert!(html.contains("text-success"));
    }
}
