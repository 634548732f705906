use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use cforce_core::report::{
    display, display_list, IpTraceReport, OsintReport, ScanReport, Text, PLACEHOLDER,
};
use cforce_core::{PipelineKind, PipelineResult};

use crate::filename::report_filename;
use crate::persist::{PersistError, ReportWriter};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
    #[error("result is a {actual} report, expected {expected}")]
    KindMismatch {
        expected: PipelineKind,
        actual: PipelineKind,
    },
}

/// Render `result` and write it into `output_dir` under its deterministic name.
pub fn write_report(
    output_dir: &Path,
    kind: PipelineKind,
    target: &str,
    result: &PipelineResult,
    generated_utc: &str,
) -> Result<PathBuf, ExportError> {
    if result.kind() != kind {
        return Err(ExportError::KindMismatch {
            expected: kind,
            actual: result.kind(),
        });
    }
    let document = render_report(target, result, generated_utc);
    let writer = ReportWriter::new(output_dir);
    Ok(writer.write(&report_filename(target), &document)?)
}

/// Markdown document with a front-matter header. Absent fields render as `N/A`.
pub fn render_report(target: &str, result: &PipelineResult, generated_utc: &str) -> String {
    let mut doc = format!(
        "---\ntarget: {target}\nmodule: {module}\ngenerated_utc: {generated_utc}\n---\n\n",
        module = result.kind().label(),
    );
    match result {
        PipelineResult::Scan(report) => render_scan(&mut doc, report),
        PipelineResult::Osint(report) => render_osint(&mut doc, report),
        PipelineResult::IpTrace(report) => render_ip_trace(&mut doc, report),
    }
    doc
}

fn field(doc: &mut String, label: &str, value: Option<&Text>) {
    let _ = writeln!(doc, "- **{label}:** {}", display(value));
}

fn list_field(doc: &mut String, label: &str, values: Option<&Vec<Text>>) {
    let _ = writeln!(doc, "- **{label}:** {}", display_list(values));
}

fn section(doc: &mut String, title: &str) {
    let _ = write!(doc, "\n## {title}\n\n");
}

fn paragraph(doc: &mut String, title: &str, value: Option<&Text>) {
    section(doc, title);
    let _ = writeln!(doc, "{}", display(value));
}

fn bullets(doc: &mut String, title: &str, values: Option<&Vec<Text>>) {
    section(doc, title);
    match values {
        Some(items) if !items.is_empty() => {
            for item in items {
                let _ = writeln!(doc, "- {}", item.as_str());
            }
        }
        _ => {
            let _ = writeln!(doc, "{PLACEHOLDER}");
        }
    }
}

fn render_scan(doc: &mut String, report: &ScanReport) {
    let _ = writeln!(doc, "# VULN REPORT / {}", display(report.target.as_ref()));
    doc.push('\n');
    field(doc, "Status", report.status.as_ref());
    field(doc, "Server IP", report.server_ip.as_ref());

    paragraph(doc, "Exposure Summary", report.exposure_summary.as_ref());

    section(doc, "Technical Profile");
    let profile = report.technical_profile.clone().unwrap_or_default();
    field(doc, "Hosting", profile.hosting.as_ref());
    field(doc, "ISP", profile.isp.as_ref());
    field(doc, "ASN", profile.asn.as_ref());
    field(doc, "Server", profile.server.as_ref());
    field(doc, "WAF/CDN", profile.waf.as_ref());
    field(doc, "TLS", profile.tls_config.as_ref());
    list_field(doc, "Tech Stack", profile.tech_stack.as_ref());

    section(doc, "Open Ports");
    match report.open_ports.as_deref() {
        Some(ports) if !ports.is_empty() => {
            doc.push_str("| Port | Service | Version | Info |\n|---|---|---|---|\n");
            for port in ports {
                let _ = writeln!(
                    doc,
                    "| {} | {} | {} | {} |",
                    display(port.port.as_ref()),
                    display(port.service.as_ref()),
                    display(port.version.as_ref()),
                    display(port.info.as_ref()),
                );
            }
        }
        _ => {
            let _ = writeln!(doc, "{PLACEHOLDER}");
        }
    }

    section(doc, "Vulnerabilities");
    match report.vulnerabilities.as_deref() {
        Some(vulns) if !vulns.is_empty() => {
            for vuln in vulns {
                let _ = write!(
                    doc,
                    "### {} ({})\n\n",
                    display(vuln.title.as_ref()),
                    display(vuln.id.as_ref())
                );
                field(doc, "Severity", vuln.severity.as_ref());
                field(doc, "Type", vuln.category.as_ref());
                field(doc, "CVSS", vuln.cvss.as_ref());
                field(doc, "Affected Component", vuln.affected_component.as_ref());
                field(doc, "Mitigated by WAF", vuln.mitigated_by_waf.as_ref());
                field(doc, "Description", vuln.description.as_ref());
                field(doc, "Exploitation (conceptual)", vuln.exploit_info.as_ref());
                field(doc, "Remediation", vuln.remediation.as_ref());
                doc.push('\n');
            }
        }
        _ => {
            let _ = writeln!(doc, "No known vulnerabilities reported.");
        }
    }

    bullets(doc, "Hardening Recommendations", report.hardening_recommendations.as_ref());
    paragraph(doc, "Risk Assessment", report.risk_assessment.as_ref());
    paragraph(doc, "Disclaimer", report.disclaimer.as_ref());
}

fn render_osint(doc: &mut String, report: &OsintReport) {
    let _ = writeln!(doc, "# OSINT REPORT / {}", display(report.target.as_ref()));

    paragraph(doc, "Executive Summary", report.executive_summary.as_ref());

    section(doc, "Domain Profile");
    let domain = report.domain_profile.clone().unwrap_or_default();
    field(doc, "Domain", domain.domain.as_ref());
    field(doc, "Registrar", domain.registrar.as_ref());
    field(doc, "Created", domain.creation_date.as_ref());
    field(doc, "Expires", domain.expiry_date.as_ref());
    field(doc, "Ownership", domain.ownership.as_ref());
    field(doc, "DNS Records", domain.dns_records.as_ref());

    section(doc, "Infrastructure");
    let infra = report.infrastructure_profile.clone().unwrap_or_default();
    list_field(doc, "IP Addresses", infra.ip_addresses.as_ref());
    field(doc, "Geolocation", infra.geolocation.as_ref());
    field(doc, "Hosting", infra.hosting.as_ref());
    field(doc, "ASN", infra.asn.as_ref());
    field(doc, "WAF/CDN", infra.waf.as_ref());

    bullets(doc, "Tech Stack", report.tech_stack_overview.as_ref());

    let assets = report.exposed_assets.clone().unwrap_or_default();
    bullets(doc, "Subdomains", assets.subdomains.as_ref());
    bullets(doc, "Indexed URLs", assets.indexed_urls.as_ref());
    bullets(doc, "Public Files", assets.public_files.as_ref());

    paragraph(doc, "Historical Intelligence", report.historical_intelligence.as_ref());
    bullets(doc, "Observations", report.observations.as_ref());
    paragraph(doc, "Disclaimer", report.disclaimer.as_ref());
}

fn render_ip_trace(doc: &mut String, report: &IpTraceReport) {
    let _ = writeln!(doc, "# IP TRACE / {}", display(report.target.as_ref()));

    paragraph(doc, "Executive Summary", report.executive_summary.as_ref());

    section(doc, "Network Overview");
    let overview = report.network_overview.clone().unwrap_or_default();
    field(doc, "Total ASNs", overview.total_asns.as_ref());
    field(doc, "CIDR Blocks", overview.ip_allocations_count.as_ref());
    field(doc, "Total IPs", overview.total_ip_count.as_ref());
    field(doc, "Connectivity", overview.connectivity_score.as_ref());

    bullets(doc, "Country IP Ranges", report.all_country_ip_ranges.as_ref());

    section(doc, "ASN Mapping");
    match report.asn_mapping.as_deref() {
        Some(mappings) if !mappings.is_empty() => {
            doc.push_str("| ASN | Organization | Type | Ranges |\n|---|---|---|---|\n");
            for mapping in mappings {
                let _ = writeln!(
                    doc,
                    "| {} | {} | {} | {} |",
                    display(mapping.asn.as_ref()),
                    display(mapping.organization.as_ref()),
                    display(mapping.category.as_ref()),
                    display_list(mapping.ranges.as_ref()),
                );
            }
        }
        _ => {
            let _ = writeln!(doc, "{PLACEHOLDER}");
        }
    }

    section(doc, "ISP Profile");
    match report.isp_profile.as_deref() {
        Some(isps) if !isps.is_empty() => {
            for isp in isps {
                let _ = writeln!(
                    doc,
                    "- **{}**: {} ({})",
                    display(isp.name.as_ref()),
                    display(isp.services.as_ref()),
                    display(isp.market_share.as_ref()),
                );
            }
        }
        _ => {
            let _ = writeln!(doc, "{PLACEHOLDER}");
        }
    }

    section(doc, "Infrastructure");
    let infra = report.infrastructure.clone().unwrap_or_default();
    list_field(doc, "IXPs", infra.ixps.as_ref());
    list_field(doc, "Transit Providers", infra.transit_providers.as_ref());
    list_field(doc, "Cloud Providers", infra.cloud_providers.as_ref());

    section(doc, "Reputation");
    let reputation = report.reputation.clone().unwrap_or_default();
    field(doc, "Abuse Rating", reputation.abuse_rating.as_ref());
    field(doc, "Blacklist Stats", reputation.blacklist_stats.as_ref());

    bullets(doc, "Observations", report.observations.as_ref());
    paragraph(doc, "Disclaimer", report.disclaimer.as_ref());
}
