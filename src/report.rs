//! Typed model of the analysis backend's report payloads.
//!
//! The backend emits loosely-shaped JSON with Chinese column names coming
//! straight out of its spreadsheet pipeline; everything optional there is
//! optional here, and deserialization never fails on an absent collection.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Discriminant stored alongside a handed-off report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Flow,
    Network,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Flow => "flow",
            ReportKind::Network => "network",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "flow" => Some(ReportKind::Flow),
            "network" => Some(ReportKind::Network),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisReport {
    Flow(FlowReport),
    Network(NetworkReport),
}

impl AnalysisReport {
    pub fn kind(&self) -> ReportKind {
        match self {
            AnalysisReport::Flow(_) => ReportKind::Flow,
            AnalysisReport::Network(_) => ReportKind::Network,
        }
    }

    pub fn filename(&self) -> &str {
        match self {
            AnalysisReport::Flow(r) => &r.filename,
            AnalysisReport::Network(r) => &r.filename,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            AnalysisReport::Flow(r) => r.message.as_deref(),
            AnalysisReport::Network(r) => r.message.as_deref(),
        }
    }
}

/// A stat value is a number or free text depending on the metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatValue {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatEntry {
    #[serde(rename = "统计指标")]
    pub metric: String,
    #[serde(rename = "数值")]
    pub value: StatValue,
}

/// Net direction of a counterparty ledger row. The backend writes
/// `净收入`/`净支出`/`平衡`; anything unrecognized collapses to neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NetDirection {
    #[serde(rename = "净收入")]
    Income,
    #[serde(rename = "净支出")]
    Expense,
    #[serde(rename = "平衡")]
    Neutral,
}

impl NetDirection {
    pub fn label(&self) -> &'static str {
        match self {
            NetDirection::Income => "净收入",
            NetDirection::Expense => "净支出",
            NetDirection::Neutral => "平衡",
        }
    }
}

impl<'de> Deserialize<'de> for NetDirection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(match tag.as_str() {
            "净收入" => NetDirection::Income,
            "净支出" => NetDirection::Expense,
            _ => NetDirection::Neutral,
        })
    }
}

/// One line of a counterparty/type/channel breakdown table. The label key
/// differs per table, hence the aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRow {
    #[serde(rename = "对方户名", alias = "交易类型", alias = "交易渠道")]
    pub label: String,
    #[serde(rename = "交易次数")]
    pub count: u64,
    #[serde(rename = "总交易金额", alias = "总金额")]
    pub total_amount: f64,
    #[serde(rename = "净方向", default, skip_serializing_if = "Option::is_none")]
    pub net_direction: Option<NetDirection>,
    #[serde(rename = "总收入", default, skip_serializing_if = "Option::is_none")]
    pub total_income: Option<f64>,
    #[serde(rename = "总支出", default, skip_serializing_if = "Option::is_none")]
    pub total_expense: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_file: Option<String>,
    #[serde(default)]
    pub chart_files: Vec<String>,
    #[serde(default)]
    pub total_stats: Vec<StatEntry>,
    #[serde(default)]
    pub counterparty_stats: Vec<LedgerRow>,
    #[serde(default)]
    pub transaction_type_stats: Vec<LedgerRow>,
    #[serde(default)]
    pub channel_stats: Vec<LedgerRow>,
    // Trend series feed the downloadable report only; carried as-is.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub daily_transactions: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hourly_stats: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub filename: String,
    pub html_file: String,
    pub node_count: u64,
    pub edge_count: u64,
    pub stats: NetworkStats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_analysis: Option<NetworkAnalysis>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub uploaded_files: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkStats {
    pub total_amount: f64,
    pub avg_amount: f64,
    pub borrow_stats: DirectionStats,
    pub lend_stats: DirectionStats,
    #[serde(default)]
    pub top_accounts: OrderedMap<AccountActivity>,
    #[serde(default)]
    pub top_counterparties: OrderedMap<AccountActivity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionStats {
    pub total: f64,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub avg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountActivity {
    #[serde(rename = "交易金额")]
    pub amount: f64,
    #[serde(rename = "交易次数")]
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkAnalysis {
    pub node_count: u64,
    pub edge_count: u64,
    pub connected_components_count: u64,
    pub density: f64,
    pub is_directed: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub connected_components_sizes: Vec<u64>,
    #[serde(default)]
    pub degree_centrality_top10: Vec<(String, f64)>,
    #[serde(default)]
    pub betweenness_centrality_top10: Vec<(String, f64)>,
    #[serde(default)]
    pub communities: Vec<Community>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clustering: Option<ClusteringInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusteringInfo {
    pub average: f64,
    #[serde(default)]
    pub top_nodes: Vec<(String, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Community {
    pub id: u64,
    pub size: u64,
    pub nodes: Vec<String>,
}

/// A JSON-object mapping that keeps document order. The top-account and
/// top-counterparty mappings are pre-ranked by the backend, so insertion
/// order is the display order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V>(pub Vec<(String, V)>);

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        OrderedMap(Vec::new())
    }
}

impl<V> OrderedMap<V> {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (String, V)> {
        self.0.iter()
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MapVisitor<V>(std::marker::PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for MapVisitor<V> {
            type Value = OrderedMap<V>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry()? {
                    entries.push((key, value));
                }
                Ok(OrderedMap(entries))
            }
        }

        deserializer.deserialize_map(MapVisitor(std::marker::PhantomData))
    }
}
