use std::fmt::Write as _;

use cforce_core::report::{display, display_list, IpTraceReport, OsintReport, ScanReport};
use cforce_core::{
    AppViewModel, ChatRole, LogEntry, LogSeverity, Page, PipelineResult, PipelineRowView, RunState,
    PROGRESS_DONE,
};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";
const BAR_WIDTH: usize = 20;
const VISIBLE_LOG_LINES: usize = 12;
const VISIBLE_CHAT_MESSAGES: usize = 8;
const LIST_PREVIEW: usize = 8;

pub const HELP: &str = "/scan /osint /trace /assistant switch page | /export save report | /quit\n\
text on a pipeline page runs it for that target; on the assistant page it asks a question";

/// Full frame for the current view, prefixed with a clear-screen sequence.
pub fn render(view: &AppViewModel) -> String {
    let mut out = String::from(CLEAR_SCREEN);
    render_header(&mut out, view);
    for row in &view.pipelines {
        render_row(&mut out, row, view.page.pipeline_kind() == Some(row.kind));
    }
    out.push('\n');

    match view.page {
        Page::Assistant => render_chat(&mut out, view),
        _ => {
            if let Some(result) = view.active_pipeline().and_then(|row| row.result.as_ref()) {
                render_result(&mut out, result);
            }
        }
    }

    let _ = writeln!(out, "\n-- ACTIVITY --");
    let skip = view.logs.len().saturating_sub(VISIBLE_LOG_LINES);
    for entry in view.logs.iter().skip(skip) {
        render_log_line(&mut out, entry);
    }
    let _ = write!(out, "\n{HELP}\n> ");
    out
}

fn render_header(out: &mut String, view: &AppViewModel) {
    out.push_str("C-FORCE AI //");
    for page in Page::ALL {
        if page == view.page {
            let _ = write!(out, " [{}]", page.label());
        } else {
            let _ = write!(out, " {}", page.label());
        }
    }
    out.push('\n');
    if view.page.pipeline_kind().is_some() {
        let _ = writeln!(out, "Target: {}", view.target_input);
    }
    if view.export_pending {
        out.push_str("Exporting...\n");
    }
    out.push('\n');
}

fn render_row(out: &mut String, row: &PipelineRowView, active: bool) {
    let marker = if active { '>' } else { ' ' };
    let _ = writeln!(
        out,
        "{marker} {:<9}{:<10}{} {:>3}%  {}",
        row.kind.label(),
        state_label(row.run_state),
        progress_bar(row.progress),
        row.progress,
        row.target.as_deref().unwrap_or("")
    );
}

fn state_label(state: RunState) -> &'static str {
    match state {
        RunState::Idle => "IDLE",
        RunState::Running => "RUNNING",
        RunState::Succeeded => "DONE",
        RunState::Failed(_) => "FAILED",
    }
}

pub fn progress_bar(progress: u8) -> String {
    let filled = usize::from(progress.min(PROGRESS_DONE)) * BAR_WIDTH / usize::from(PROGRESS_DONE);
    format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

fn render_log_line(out: &mut String, entry: &LogEntry) {
    let tag = match entry.severity {
        LogSeverity::Info => "INFO",
        LogSeverity::Success => " OK ",
        LogSeverity::Warning => "WARN",
        LogSeverity::Error => "ERR ",
    };
    let _ = writeln!(out, "[{}] {tag} {}", entry.timestamp, entry.message);
}

fn render_chat(out: &mut String, view: &AppViewModel) {
    let _ = writeln!(out, "-- SECURITY ASSISTANT --");
    let skip = view.chat.len().saturating_sub(VISIBLE_CHAT_MESSAGES);
    for message in view.chat.iter().skip(skip) {
        let who = match message.role {
            ChatRole::User => "you",
            ChatRole::Assistant => "ai ",
        };
        let _ = writeln!(out, "{who}> {}", message.content);
    }
    if view.assistant_pending {
        out.push_str("ai > ...\n");
    }
}

fn render_result(out: &mut String, result: &PipelineResult) {
    match result {
        PipelineResult::Scan(report) => render_scan(out, report),
        PipelineResult::Osint(report) => render_osint(out, report),
        PipelineResult::IpTrace(report) => render_ip_trace(out, report),
    }
}

fn render_scan(out: &mut String, report: &ScanReport) {
    let _ = writeln!(out, "VULN REPORT / {}", display(report.target.as_ref()));
    let _ = writeln!(
        out,
        "Status: {}   Server IP: {}",
        display(report.status.as_ref()),
        display(report.server_ip.as_ref())
    );
    let _ = writeln!(out, "{}", display(report.exposure_summary.as_ref()));
    if let Some(profile) = &report.technical_profile {
        let _ = writeln!(
            out,
            "Hosting: {}  ISP: {}  ASN: {}  Server: {}  WAF/CDN: {}",
            display(profile.hosting.as_ref()),
            display(profile.isp.as_ref()),
            display(profile.asn.as_ref()),
            display(profile.server.as_ref()),
            display(profile.waf.as_ref()),
        );
        let _ = writeln!(out, "Stack: {}", display_list(profile.tech_stack.as_ref()));
    }
    let vulns = report.vulnerabilities.as_deref().unwrap_or_default();
    let _ = writeln!(out, "Vulnerabilities: {}", vulns.len());
    for vuln in vulns.iter().take(LIST_PREVIEW) {
        let severity = vuln
            .severity_level()
            .map_or_else(|| display(vuln.severity.as_ref()), |level| level.label());
        let _ = writeln!(
            out,
            "  [{severity}] {} ({})",
            display(vuln.title.as_ref()),
            display(vuln.id.as_ref())
        );
    }
}

fn render_osint(out: &mut String, report: &OsintReport) {
    let _ = writeln!(out, "OSINT / {}", display(report.target.as_ref()));
    let _ = writeln!(out, "{}", display(report.executive_summary.as_ref()));
    if let Some(domain) = &report.domain_profile {
        let _ = writeln!(
            out,
            "Registrar: {}  Created: {}  Expires: {}",
            display(domain.registrar.as_ref()),
            display(domain.creation_date.as_ref()),
            display(domain.expiry_date.as_ref()),
        );
    }
    if let Some(infra) = &report.infrastructure_profile {
        let _ = writeln!(
            out,
            "IPs: {}  Hosting: {}",
            display_list(infra.ip_addresses.as_ref()),
            display(infra.hosting.as_ref())
        );
    }
    let subdomains = report
        .exposed_assets
        .as_ref()
        .and_then(|assets| assets.subdomains.as_ref());
    let _ = writeln!(out, "Subdomains: {}", display_list(subdomains));
}

fn render_ip_trace(out: &mut String, report: &IpTraceReport) {
    let _ = writeln!(out, "IP TRACE / {}", display(report.target.as_ref()));
    let _ = writeln!(out, "{}", display(report.executive_summary.as_ref()));
    if let Some(overview) = &report.network_overview {
        let _ = writeln!(
            out,
            "ASNs: {}  CIDR blocks: {}  IPs: {}",
            display(overview.total_asns.as_ref()),
            display(overview.ip_allocations_count.as_ref()),
            display(overview.total_ip_count.as_ref()),
        );
    }
    let ranges = report.all_country_ip_ranges.as_deref().unwrap_or_default();
    let _ = writeln!(out, "Ranges: {}", ranges.len());
    for range in ranges.iter().take(LIST_PREVIEW) {
        let _ = writeln!(out, "  {}", range.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cforce_core::{update, AppState, Msg};

    #[test]
    fn progress_bar_is_proportional() {
        assert_eq!(progress_bar(0), format!("[{}]", ".".repeat(BAR_WIDTH)));
        assert_eq!(progress_bar(100), format!("[{}]", "#".repeat(BAR_WIDTH)));
        assert_eq!(progress_bar(50).matches('#').count(), BAR_WIDTH / 2);
    }

    #[test]
    fn empty_scan_result_renders_placeholders() {
        let mut out = String::new();
        render_result(&mut out, &PipelineResult::Scan(ScanReport::default()));
        assert!(out.contains("VULN REPORT / N/A"));
        assert!(out.contains("Vulnerabilities: 0"));
    }

    #[test]
    fn frame_marks_active_page_and_shows_target() {
        let (state, _) = update(AppState::new(), Msg::TargetChanged("example.com".into()));
        let frame = render(&state.view());
        assert!(frame.contains("[SCANNER]"));
        assert!(frame.contains("Target: example.com"));
        assert!(frame.contains("> SCAN"));
    }
}
