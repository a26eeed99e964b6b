//! Chart asset classification, embeds, and download links.

use super::{escape, NO_DATA};
use crate::api::AssetUrls;
use crate::report::FlowReport;

pub const MAIN_TAG: &str = "main_analysis";
pub const HOURLY_TAG: &str = "hourly_analysis";

#[derive(Debug, Default, PartialEq)]
pub struct ChartBuckets {
    pub main: Vec<String>,
    pub hourly: Vec<String>,
}

/// Substring classification into the two display containers. An identifier
/// matching neither tag is excluded from display but stays downloadable.
pub fn classify(chart_files: &[String]) -> ChartBuckets {
    let mut buckets = ChartBuckets::default();
    for file in chart_files {
        if file.contains(MAIN_TAG) {
            buckets.main.push(file.clone());
        } else if file.contains(HOURLY_TAG) {
            buckets.hourly.push(file.clone());
        }
    }
    buckets
}

pub fn chart_section(files: &[String], urls: &AssetUrls) -> String {
    if files.is_empty() {
        return format!("<p class=\"text-muted\">{}</p>\n", NO_DATA);
    }
    let mut html = String::new();
    for file in files {
        html.push_str(&format!(
            "<img class=\"chart-img\" src=\"{}\" alt=\"分析图表\">\n",
            escape(&urls.chart_url(file))
        ));
    }
    html
}

/// One link per chart asset (all of them, matched or not) plus the optional
/// consolidated report.
pub fn download_links(report: &FlowReport, urls: &AssetUrls) -> String {
    let mut html = String::new();
    if let Some(report_file) = &report.report_file {
        html.push_str(&format!(
            "<a class=\"btn-download\" href=\"{}\">下载Excel报告</a>\n",
            escape(&urls.download_url(report_file))
        ));
    }
    for (index, file) in report.chart_files.iter().enumerate() {
        html.push_str(&format!(
            "<a class=\"btn-download\" href=\"{}\" download=\"{}\">下载图表 {}</a>\n",
            escape(&urls.chart_url(file)),
            escape(file),
            index + 1
        ));
    }
    if html.is_empty() {
        return format!("<p class=\"text-muted\">{}</p>\n", NO_DATA);
    }
    html
}
