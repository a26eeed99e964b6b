//! Upload orchestration: selection validation and the submit state machine.
//!
//! Two pipelines (flow, network) share this type; they own disjoint control
//! state and may be in flight concurrently. The control is disabled while a
//! request is outstanding and re-enabled on every terminal path.

use crate::alert::AlertChannel;
use crate::api::{AnalysisBackend, UploadError};
use crate::logging::{self, obj, v_num, v_str, Domain, Level};
use crate::report::{AnalysisReport, ReportKind};
use crate::transfer::ResultTransfer;

pub const EMPTY_SELECTION_MSG: &str = "请选择要上传的文件";
pub const BAD_EXTENSION_MSG: &str = "请上传Excel格式的文件(.xlsx或.xls)";
pub const FLOW_DONE_MSG: &str = "文件分析完成！";
pub const NETWORK_DONE_MSG: &str = "网络图分析完成！";

/// A file picked through the file dialog or dropped onto the upload area.
/// Both paths produce this type, so acceptance rules cannot diverge.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// Case-sensitive suffix match; anything else is rejected before any request.
pub fn has_excel_extension(name: &str) -> bool {
    name.ends_with(".xlsx") || name.ends_with(".xls")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisMode {
    Flow,
    Network,
}

impl AnalysisMode {
    pub fn kind(&self) -> ReportKind {
        match self {
            AnalysisMode::Flow => ReportKind::Flow,
            AnalysisMode::Network => ReportKind::Network,
        }
    }

    pub fn idle_label(&self) -> &'static str {
        match self {
            AnalysisMode::Flow => "开始流水分析",
            AnalysisMode::Network => "开始网络分析",
        }
    }

    fn done_message(&self) -> &'static str {
        match self {
            AnalysisMode::Flow => FLOW_DONE_MSG,
            AnalysisMode::Network => NETWORK_DONE_MSG,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlState {
    Idle,
    Submitting,
}

/// What the caller should do after a submit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Report stored; navigate to the matching results page.
    Navigate(ReportKind),
    /// Validation failed or the backend said no; the form stays usable.
    Stayed,
    /// A submission is already outstanding on this control.
    Blocked,
}

pub struct UploadPipeline {
    mode: AnalysisMode,
    control: ControlState,
}

impl UploadPipeline {
    pub fn new(mode: AnalysisMode) -> Self {
        Self {
            mode,
            control: ControlState::Idle,
        }
    }

    pub fn mode(&self) -> AnalysisMode {
        self.mode
    }

    pub fn control(&self) -> ControlState {
        self.control
    }

    pub fn is_enabled(&self) -> bool {
        self.control == ControlState::Idle
    }

    /// Label on the trigger control for the current state.
    pub fn label(&self) -> &'static str {
        match self.control {
            ControlState::Idle => self.mode.idle_label(),
            ControlState::Submitting => "分析中...",
        }
    }

    /// Shown next to the picker; the accepted count is how partial rejection
    /// surfaces to the user.
    pub fn selection_summary(accepted: &[UploadFile]) -> String {
        let names: Vec<&str> = accepted.iter().map(|f| f.name.as_str()).collect();
        format!("已选择 {} 个文件: {}", accepted.len(), names.join(", "))
    }

    /// Files surviving the shared acceptance rules, in selection order. Also
    /// feeds the displayed summary, so the shown count matches what is sent.
    pub fn accepted(&self, selection: &[UploadFile]) -> Vec<UploadFile> {
        match self.mode {
            // Single-file pipeline: only the first selected file counts.
            AnalysisMode::Flow => selection
                .iter()
                .take(1)
                .filter(|f| has_excel_extension(&f.name))
                .cloned()
                .collect(),
            // Invalid entries are dropped, not fatal, as long as one survives.
            AnalysisMode::Network => selection
                .iter()
                .filter(|f| has_excel_extension(&f.name))
                .cloned()
                .collect(),
        }
    }

    /// Apply the shared acceptance rules to a selection. `None` means a
    /// warning was raised and nothing may be sent.
    pub fn validate(
        &self,
        selection: &[UploadFile],
        alerts: &mut AlertChannel,
    ) -> Option<Vec<UploadFile>> {
        if selection.is_empty() {
            alerts.warning(EMPTY_SELECTION_MSG);
            return None;
        }

        let accepted = self.accepted(selection);

        if accepted.is_empty() {
            alerts.warning(BAD_EXTENSION_MSG);
            return None;
        }

        logging::log(
            Level::Debug,
            Domain::Upload,
            "selection_accepted",
            obj(&[
                ("mode", v_str(self.mode.kind().as_str())),
                ("selected", v_num(selection.len() as f64)),
                ("accepted", v_num(accepted.len() as f64)),
            ]),
        );
        Some(accepted)
    }

    /// Drive one full submit cycle. The control enters `Submitting` before
    /// the request is issued and returns to `Idle` on every terminal path.
    pub async fn submit(
        &mut self,
        backend: &dyn AnalysisBackend,
        selection: &[UploadFile],
        alerts: &mut AlertChannel,
        transfer: &mut ResultTransfer,
    ) -> SubmitOutcome {
        if self.control == ControlState::Submitting {
            return SubmitOutcome::Blocked;
        }

        let accepted = match self.validate(selection, alerts) {
            Some(files) => files,
            None => return SubmitOutcome::Stayed,
        };

        self.control = ControlState::Submitting;
        logging::log(
            Level::Info,
            Domain::Upload,
            "submit",
            obj(&[
                ("mode", v_str(self.mode.kind().as_str())),
                ("files", v_num(accepted.len() as f64)),
            ]),
        );

        let result = match self.mode {
            AnalysisMode::Flow => backend
                .upload_flow(&accepted[0])
                .await
                .map(AnalysisReport::Flow),
            AnalysisMode::Network => backend
                .upload_network(&accepted)
                .await
                .map(AnalysisReport::Network),
        };

        // Single exit from the submitting state, success or not.
        self.control = ControlState::Idle;

        match result {
            Ok(report) => self.complete(report, alerts, transfer),
            Err(err) => {
                let event = match err {
                    UploadError::Unreachable { .. } => "backend_unreachable",
                    _ => "upload_rejected",
                };
                logging::log(
                    Level::Error,
                    Domain::Upload,
                    event,
                    obj(&[
                        ("mode", v_str(self.mode.kind().as_str())),
                        ("detail", v_str(&err.to_string())),
                    ]),
                );
                alerts.danger(err.user_message());
                SubmitOutcome::Stayed
            }
        }
    }

    fn complete(
        &self,
        report: AnalysisReport,
        alerts: &mut AlertChannel,
        transfer: &mut ResultTransfer,
    ) -> SubmitOutcome {
        let kind = report.kind();
        let message = report
            .message()
            .unwrap_or(self.mode.done_message())
            .to_string();
        if let Err(err) = transfer.put(&report) {
            alerts.danger(err.to_string());
            return SubmitOutcome::Stayed;
        }
        alerts.success(message);
        SubmitOutcome::Navigate(kind)
    }
}
