//! Turns a report into structured HTML output.
//!
//! Renderers are pure string builders over the typed report; the presentation
//! shell (stylesheet, layout chrome) is external. Every optional collection
//! renders an explicit empty state instead of failing.

pub mod charts;
pub mod network;
pub mod stats;
pub mod tables;

use crate::api::AssetUrls;
use crate::logging::{self, obj, v_num, v_str, Domain, Level};
use crate::report::{FlowReport, NetworkReport};

pub const NO_DATA: &str = "暂无数据";

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Two fixed decimal places, the default numeric display.
pub fn fmt_fixed2(v: f64) -> String {
    format!("{:.2}", v)
}

/// Densities and centrality scores get four places.
pub fn fmt_fixed4(v: f64) -> String {
    format!("{:.4}", v)
}

/// Currency glyph plus thousands grouping, two decimal places.
pub fn fmt_currency(v: f64) -> String {
    let s = format!("{:.2}", v.abs());
    let (int_part, frac_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));
    let digits = int_part.as_bytes();
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, d) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*d as char);
    }
    let sign = if v < 0.0 { "-" } else { "" };
    format!("{}¥{}.{}", sign, grouped, frac_part)
}

pub fn no_data_row(colspan: usize) -> String {
    format!(
        "<tr><td colspan=\"{}\" class=\"text-center text-muted\">{}</td></tr>\n",
        colspan, NO_DATA
    )
}

fn section(title: &str, body: &str) -> String {
    format!("<section>\n<h3>{}</h3>\n{}</section>\n", escape(title), body)
}

pub fn flow_page(report: &FlowReport, urls: &AssetUrls) -> String {
    let buckets = charts::classify(&report.chart_files);

    let mut html = String::new();
    html.push_str(&format!(
        "<h2 id=\"filename-display\">文件：{}</h2>\n",
        escape(&report.filename)
    ));
    html.push_str(&section("整体统计", &stats::stat_cards(&report.total_stats)));
    html.push_str(&section(
        "主要分析图表",
        &charts::chart_section(&buckets.main, urls),
    ));
    html.push_str(&section(
        "小时分析图表",
        &charts::chart_section(&buckets.hourly, urls),
    ));
    html.push_str(&section(
        "交易对手统计",
        &tables::counterparty_table(&report.counterparty_stats),
    ));
    html.push_str(&section(
        "交易类型统计",
        &tables::breakdown_table("交易类型", &report.transaction_type_stats),
    ));
    html.push_str(&section(
        "交易渠道统计",
        &tables::breakdown_table("交易渠道", &report.channel_stats),
    ));
    html.push_str(&section("结果下载", &charts::download_links(report, urls)));

    logging::log(
        Level::Debug,
        Domain::Render,
        "flow_page",
        obj(&[
            ("filename", v_str(&report.filename)),
            ("charts", v_num(report.chart_files.len() as f64)),
        ]),
    );
    html
}

pub fn network_page(report: &NetworkReport, urls: &AssetUrls, graph_reachable: bool) -> String {
    let mut html = String::new();
    html.push_str(&format!(
        "<h2 id=\"filename-display\">分析文件：{}</h2>\n",
        escape(&report.filename)
    ));
    if !report.uploaded_files.is_empty() {
        html.push_str(&format!(
            "<p class=\"text-muted\">共上传 {} 个文件</p>\n",
            report.uploaded_files.len()
        ));
    }
    html.push_str(&section("网络统计", &stats::network_stat_cards(report)));
    html.push_str(&section(
        "资金流向网络图",
        &network::graph_embed(&urls.network_url(&report.html_file), graph_reachable),
    ));
    html.push_str(&section(
        "TOP账户",
        &tables::ranked_activity_table(&report.stats.top_accounts, "bg-primary"),
    ));
    html.push_str(&section(
        "TOP交易对手",
        &tables::ranked_activity_table(&report.stats.top_counterparties, "bg-success"),
    ));
    // The analysis section stays hidden entirely when the backend omitted it.
    if let Some(analysis) = &report.network_analysis {
        html.push_str(&network::analysis_section(analysis));
    }

    logging::log(
        Level::Debug,
        Domain::Render,
        "network_page",
        obj(&[
            ("filename", v_str(&report.filename)),
            ("graph_reachable", serde_json::json!(graph_reachable)),
        ]),
    );
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&#39;");
        assert_eq!(escape("对方户名"), "对方户名");
    }

    #[test]
    fn test_fmt_fixed() {
        assert_eq!(fmt_fixed2(12.0), "12.00");
        assert_eq!(fmt_fixed2(-0.005), "-0.01");
        assert_eq!(fmt_fixed4(0.25), "0.2500");
    }

    #[test]
    fn test_fmt_currency_groups_thousands() {
        assert_eq!(fmt_currency(1234567.891), "¥1,234,567.89");
        assert_eq!(fmt_currency(999.5), "¥999.50");
        assert_eq!(fmt_currency(0.0), "¥0.00");
        assert_eq!(fmt_currency(-1200.0), "-¥1,200.00");
    }

    #[test]
    fn test_no_data_row_spans_columns() {
        let row = no_data_row(7);
        assert!(row.contains("colspan=\"7\""));
        assert!(row.contains(NO_DATA));
    }
}
