//! Ranked and ledger tables.
//!
//! Ranking tables truncate to the first 10 entries of the supplied order;
//! the backend pre-sorts, the renderer never re-sorts. Rank badges are
//! 1-indexed by display position.

use super::{escape, fmt_fixed2, no_data_row};
use crate::report::{AccountActivity, LedgerRow, NetDirection, OrderedMap};

pub const RANK_LIMIT: usize = 10;

/// Sign of the amount picks the cell class. Independent of the categorical
/// net-direction badge; both are rendered as given even when inconsistent.
pub fn amount_class(amount: f64) -> &'static str {
    if amount > 0.0 {
        "text-success"
    } else if amount < 0.0 {
        "text-danger"
    } else {
        ""
    }
}

pub fn direction_badge_class(direction: Option<NetDirection>) -> &'static str {
    match direction {
        Some(NetDirection::Income) => "badge-success",
        Some(NetDirection::Expense) => "badge-danger",
        _ => "badge-secondary",
    }
}

fn money_cell(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("¥{}", fmt_fixed2(v)),
        None => "-".to_string(),
    }
}

/// Counterparty breakdown: ranked, truncated to the first 10 rows.
pub fn counterparty_table(rows: &[LedgerRow]) -> String {
    let mut html = String::from(
        "<table><thead><tr><th>排名</th><th>对方户名</th><th>交易次数</th>\
         <th>总交易金额</th><th>净方向</th><th>总收入</th><th>总支出</th></tr></thead>\n<tbody>\n",
    );
    if rows.is_empty() {
        html.push_str(&no_data_row(7));
    }
    for (index, row) in rows.iter().take(RANK_LIMIT).enumerate() {
        let direction_label = row.net_direction.map(|d| d.label()).unwrap_or("-");
        html.push_str(&format!(
            "<tr><td><span class=\"badge bg-primary\">{}</span></td>\
             <td><strong>{}</strong></td><td>{}</td>\
             <td class=\"{}\">¥{}</td>\
             <td><span class=\"badge {}\">{}</span></td>\
             <td class=\"text-success\">{}</td><td class=\"text-danger\">{}</td></tr>\n",
            index + 1,
            escape(&row.label),
            row.count,
            amount_class(row.total_amount),
            fmt_fixed2(row.total_amount),
            direction_badge_class(row.net_direction),
            direction_label,
            money_cell(row.total_income),
            money_cell(row.total_expense),
        ));
    }
    html.push_str("</tbody></table>\n");
    html
}

/// Type/channel breakdown: every row, no ranking column.
pub fn breakdown_table(label_header: &str, rows: &[LedgerRow]) -> String {
    let mut html = format!(
        "<table><thead><tr><th>{}</th><th>交易次数</th><th>总金额</th></tr></thead>\n<tbody>\n",
        escape(label_header)
    );
    if rows.is_empty() {
        html.push_str(&no_data_row(3));
    }
    for row in rows {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td class=\"{}\">¥{}</td></tr>\n",
            escape(&row.label),
            row.count,
            amount_class(row.total_amount),
            fmt_fixed2(row.total_amount),
        ));
    }
    html.push_str("</tbody></table>\n");
    html
}

/// TOP accounts/counterparties on the network page: first 10 entries of the
/// pre-ranked mapping, in insertion order.
pub fn ranked_activity_table(entries: &OrderedMap<AccountActivity>, badge_class: &str) -> String {
    let mut html = String::from(
        "<table><thead><tr><th>排名</th><th>户名</th><th>交易金额</th><th>交易次数</th></tr></thead>\n<tbody>\n",
    );
    if entries.is_empty() {
        html.push_str(&no_data_row(4));
    }
    for (index, (name, activity)) in entries.iter().take(RANK_LIMIT).enumerate() {
        html.push_str(&format!(
            "<tr><td><span class=\"badge {}\">{}</span></td>\
             <td><strong>{}</strong></td>\
             <td class=\"text-success\">¥{}</td><td>{}</td></tr>\n",
            badge_class,
            index + 1,
            escape(name),
            fmt_fixed2(activity.amount),
            activity.count,
        ));
    }
    html.push_str("</tbody></table>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(label: &str, amount: f64, direction: Option<&str>) -> LedgerRow {
        let direction_field = direction
            .map(|d| format!(",\"净方向\":\"{}\"", d))
            .unwrap_or_default();
        serde_json::from_str(&format!(
            r#"{{"对方户名":"{}","交易次数":1,"总交易金额":{}{}}}"#,
            label, amount, direction_field
        ))
        .unwrap()
    }

    fn activity_map(n: usize) -> OrderedMap<AccountActivity> {
        OrderedMap(
            (0..n)
                .map(|i| {
                    (
                        format!("账户{}", i),
                        AccountActivity {
                            amount: 100.0 * i as f64,
                            count: i as u64,
                        },
                    )
                })
                .collect(),
        )
    }

    #[test]
    fn test_amount_class_by_sign() {
        assert_eq!(amount_class(1.0), "text-success");
        assert_eq!(amount_class(-1.0), "text-danger");
        assert_eq!(amount_class(0.0), "");
    }

    #[test]
    fn test_sign_and_direction_are_independent() {
        // Positive amount labeled net-expense: both rendered as given.
        let html = counterparty_table(&[row("甲", 50.0, Some("净支出"))]);
        assert!(html.contains("text-success"));
        assert!(html.contains("badge-danger"));
        assert!(html.contains("净支出"));
    }

    #[test]
    fn test_counterparty_truncates_to_ten_in_input_order() {
        let rows: Vec<LedgerRow> = (0..14).map(|i| row(&format!("户{}", i), 1.0, None)).collect();
        let html = counterparty_table(&rows);
        assert!(html.contains("户0"));
        assert!(html.contains("户9"));
        assert!(!html.contains("户10"));
        // 1-indexed display rank, not a stored id.
        assert!(html.contains(">10</span>"));
        assert!(!html.contains(">11</span>"));
    }

    #[test]
    fn test_empty_tables_render_no_data_row() {
        let html = counterparty_table(&[]);
        assert!(html.contains("colspan=\"7\""));
        let html = breakdown_table("交易类型", &[]);
        assert!(html.contains("colspan=\"3\""));
        let html = ranked_activity_table(&OrderedMap(Vec::new()), "bg-primary");
        assert!(html.contains("colspan=\"4\""));
    }

    #[test]
    fn test_breakdown_renders_all_rows() {
        let rows: Vec<LedgerRow> = (0..12).map(|i| row(&format!("类{}", i), -1.0, None)).collect();
        let html = breakdown_table("交易类型", &rows);
        assert!(html.contains("类11"));
        assert!(html.contains("text-danger"));
    }

    #[test]
    fn test_ranked_activity_limit_and_order() {
        let html = ranked_activity_table(&activity_map(12), "bg-success");
        assert!(html.contains("账户0"));
        assert!(html.contains("账户9"));
        assert!(!html.contains("账户10"));
        let first = html.find("账户0").unwrap();
        let last = html.find("账户9").unwrap();
        assert!(first < last);
    }

    #[test]
    fn test_missing_income_expense_render_dash() {
        let html = counterparty_table(&[row("乙", 0.0, None)]);
        assert!(html.contains("<td class=\"text-success\">-</td>"));
        assert!(html.contains("badge-secondary"));
    }
}
