//! Network analysis details: basic metrics, centrality top lists, community
//! cards, and the graph embed.

use super::{escape, fmt_fixed4, NO_DATA};
use crate::report::{Community, NetworkAnalysis};

pub const CENTRALITY_LIMIT: usize = 5;
pub const COMMUNITY_LIMIT: usize = 6;
pub const PREVIEW_NAMES: usize = 3;

pub const GRAPH_LOAD_FAILED_MSG: &str = "网络图加载失败，请检查后端服务状态";

/// Interactive graph document, or a visible warning when the asset does not
/// answer. Never a blank frame.
pub fn graph_embed(url: &str, reachable: bool) -> String {
    if reachable {
        format!(
            "<iframe id=\"network-iframe\" src=\"{}\" loading=\"lazy\"></iframe>\n",
            escape(url)
        )
    } else {
        format!(
            "<div class=\"alert alert-warning text-center\">{}</div>\n",
            GRAPH_LOAD_FAILED_MSG
        )
    }
}

fn metric_item(label: &str, value: &str) -> String {
    format!(
        "<li class=\"list-group-item\"><span>{}</span><strong>{}</strong></li>\n",
        escape(label),
        value
    )
}

/// Degree/betweenness top list, truncated to the first five pre-ranked pairs.
pub fn centrality_list(pairs: &[(String, f64)], badge_class: &str) -> String {
    if pairs.is_empty() {
        return format!("<li class=\"list-group-item text-muted\">{}</li>\n", NO_DATA);
    }
    let mut html = String::new();
    for (index, (node, score)) in pairs.iter().take(CENTRALITY_LIMIT).enumerate() {
        html.push_str(&format!(
            "<li class=\"list-group-item\"><span><span class=\"badge {}\">{}</span>{}</span>\
             <strong>{}</strong></li>\n",
            badge_class,
            index + 1,
            escape(node),
            fmt_fixed4(*score),
        ));
    }
    html
}

/// First three member names; the ellipsis marker appears only when the
/// community lists more than three.
pub fn community_preview(community: &Community) -> String {
    let names: Vec<String> = community
        .nodes
        .iter()
        .take(PREVIEW_NAMES)
        .map(|n| escape(n))
        .collect();
    let marker = if community.nodes.len() > PREVIEW_NAMES {
        "..."
    } else {
        ""
    };
    format!("{}{}", names.join(", "), marker)
}

pub fn community_cards(communities: &[Community]) -> String {
    if communities.is_empty() {
        return format!("<p class=\"text-muted\">{}</p>\n", NO_DATA);
    }
    // The full count is reported even when only six cards are shown.
    let mut html = format!(
        "<p class=\"text-muted\">检测到 {} 个社区</p>\n",
        communities.len()
    );
    for community in communities.iter().take(COMMUNITY_LIMIT) {
        html.push_str(&format!(
            "<div class=\"card\"><div class=\"card-header\"><strong>社区 {}</strong>\
             <span class=\"badge bg-secondary\">{} 个节点</span></div>\
             <div class=\"card-body\"><small class=\"text-muted\">{}</small></div></div>\n",
            community.id + 1,
            community.size,
            community_preview(community),
        ));
    }
    html
}

/// The whole analysis section; callers skip it when the backend omitted the
/// analysis block.
pub fn analysis_section(analysis: &NetworkAnalysis) -> String {
    let mut html = String::from("<section id=\"network-analysis-section\">\n<h3>网络分析详情</h3>\n");

    html.push_str("<h5>基本网络信息</h5>\n<ul class=\"list-group\">\n");
    html.push_str(&metric_item("节点数量", &analysis.node_count.to_string()));
    html.push_str(&metric_item("边数量", &analysis.edge_count.to_string()));
    html.push_str(&metric_item(
        "连通分量数",
        &analysis.connected_components_count.to_string(),
    ));
    html.push_str(&metric_item("网络密度", &fmt_fixed4(analysis.density)));
    html.push_str(&metric_item(
        "是否有向图",
        if analysis.is_directed { "是" } else { "否" },
    ));
    if let Some(clustering) = &analysis.clustering {
        html.push_str(&metric_item("平均聚类系数", &fmt_fixed4(clustering.average)));
    }
    html.push_str("</ul>\n");

    html.push_str("<h5>度中心性 TOP5</h5>\n<ul class=\"list-group\">\n");
    html.push_str(&centrality_list(&analysis.degree_centrality_top10, "bg-warning"));
    html.push_str("</ul>\n");

    html.push_str("<h5>介数中心性 TOP5</h5>\n<ul class=\"list-group\">\n");
    html.push_str(&centrality_list(
        &analysis.betweenness_centrality_top10,
        "bg-info",
    ));
    html.push_str("</ul>\n");

    html.push_str("<h5>社区检测结果</h5>\n");
    html.push_str(&community_cards(&analysis.communities));

    html.push_str("</section>\n");
    html
}
