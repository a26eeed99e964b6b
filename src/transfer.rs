//! Single-slot handoff between the upload page and a results page.
//!
//! The writer stores exactly one report plus its discriminant; the reader
//! consumes it once. Reading the wrong discriminant, or reading after the
//! slot was consumed, is expected (direct navigation, reload, back button)
//! and reported as absence rather than an error.

use anyhow::{Context, Result};

use crate::logging::{self, obj, v_num, v_str, Domain, Level};
use crate::report::{AnalysisReport, ReportKind};

struct Handoff {
    kind: ReportKind,
    payload: String,
}

#[derive(Default)]
pub struct ResultTransfer {
    slot: Option<Handoff>,
}

impl ResultTransfer {
    pub fn new() -> Self {
        Self { slot: None }
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }

    /// Store a report, overwriting any prior handoff. Serialization through
    /// JSON is lossless for every numeric and nested-mapping field.
    pub fn put(&mut self, report: &AnalysisReport) -> Result<()> {
        let payload = match report {
            AnalysisReport::Flow(r) => serde_json::to_string(r),
            AnalysisReport::Network(r) => serde_json::to_string(r),
        }
        .context("序列化分析结果失败")?;

        logging::log(
            Level::Debug,
            Domain::Transfer,
            "put",
            obj(&[
                ("kind", v_str(report.kind().as_str())),
                ("bytes", v_num(payload.len() as f64)),
            ]),
        );
        self.slot = Some(Handoff {
            kind: report.kind(),
            payload,
        });
        Ok(())
    }

    /// Consume the stored report if present and the discriminant matches.
    /// A mismatched read leaves the slot untouched.
    pub fn take(&mut self, expected: ReportKind) -> Option<AnalysisReport> {
        let matches = self
            .slot
            .as_ref()
            .map(|h| h.kind == expected)
            .unwrap_or(false);
        if !matches {
            logging::log(
                Level::Warn,
                Domain::Transfer,
                "take_absent",
                obj(&[("expected", v_str(expected.as_str()))]),
            );
            return None;
        }

        let handoff = self.slot.take()?;
        let report = match handoff.kind {
            ReportKind::Flow => serde_json::from_str(&handoff.payload)
                .ok()
                .map(AnalysisReport::Flow),
            ReportKind::Network => serde_json::from_str(&handoff.payload)
                .ok()
                .map(AnalysisReport::Network),
        };
        // A corrupt payload is treated as absence, same as a stale slot.
        report
    }
}
