use std::path::Path;

use anyhow::{bail, Context, Result};

use flowlens::alert::AlertChannel;
use flowlens::api::BackendClient;
use flowlens::pages::{self, PageLoad};
use flowlens::report::ReportKind;
use flowlens::state::Config;
use flowlens::transfer::ResultTransfer;
use flowlens::upload::{AnalysisMode, SubmitOutcome, UploadFile, UploadPipeline};

fn usage() -> ! {
    eprintln!("usage: flowlens flow <file.xlsx>");
    eprintln!("       flowlens network <file.xlsx> [more.xlsx ...]");
    std::process::exit(2);
}

fn parse_args(args: &[String]) -> (AnalysisMode, Vec<String>) {
    let mode = match args.first().map(String::as_str) {
        Some("flow") => AnalysisMode::Flow,
        Some("network") => AnalysisMode::Network,
        _ => usage(),
    };
    (mode, args[1..].to_vec())
}

fn load_selection(paths: &[String]) -> Result<Vec<UploadFile>> {
    let mut selection = Vec::with_capacity(paths.len());
    for path in paths {
        let bytes =
            std::fs::read(path).with_context(|| format!("无法读取文件 {}", path))?;
        let name = Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.clone());
        selection.push(UploadFile::new(name, bytes));
    }
    Ok(selection)
}

fn print_notices(alerts: &mut AlertChannel) {
    for notice in alerts.drain() {
        eprintln!("[{}] {}", notice.kind.as_str(), notice.message);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (mode, paths) = parse_args(&args);

    let backend = BackendClient::new(&cfg)?;
    let urls = backend.urls();
    let mut alerts = AlertChannel::new(cfg.alert_ttl_secs);

    // Failures warn but never block the form.
    pages::run_entry_probe(&backend, &mut alerts).await;

    let selection = load_selection(&paths)?;
    let mut transfer = ResultTransfer::new();
    let mut pipeline = UploadPipeline::new(mode);

    let accepted = pipeline.accepted(&selection);
    if !accepted.is_empty() {
        eprintln!("{}", UploadPipeline::selection_summary(&accepted));
    }

    let outcome = pipeline
        .submit(&backend, &selection, &mut alerts, &mut transfer)
        .await;
    print_notices(&mut alerts);

    let kind = match outcome {
        SubmitOutcome::Navigate(kind) => kind,
        SubmitOutcome::Stayed | SubmitOutcome::Blocked => {
            bail!("分析未完成");
        }
    };

    let page = match kind {
        ReportKind::Flow => pages::load_flow_page(&mut transfer, &urls, &mut alerts),
        ReportKind::Network => {
            pages::load_network_page(&mut transfer, &backend, &urls, &mut alerts).await
        }
    };
    print_notices(&mut alerts);

    match page {
        PageLoad::Rendered(html) => {
            let out_path = pages::write_page(Path::new(&cfg.out_dir), kind, &html)?;
            println!("{}", out_path.display());
            Ok(())
        }
        PageLoad::RedirectToEntry => bail!("结果已失效，请重新分析"),
    }
}
