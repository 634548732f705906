use std::fs;

use cforce_core::report::{
    IpTraceReport, OpenPort, OsintReport, ScanReport, TechnicalProfile, Vulnerability,
};
use cforce_core::{PipelineKind, PipelineResult};
use cforce_engine::{render_report, write_report, ExportError, PersistError, ReportWriter};
use tempfile::TempDir;

const GENERATED: &str = "2026-01-02T03:04:05Z";

fn scan_result() -> PipelineResult {
    PipelineResult::Scan(ScanReport {
        target: Some("example.com".into()),
        status: Some("CRITICAL_EXPOSURE".into()),
        technical_profile: Some(TechnicalProfile {
            server: Some("nginx".into()),
            tech_stack: Some(vec!["nginx".into(), "PHP".into()]),
            ..TechnicalProfile::default()
        }),
        open_ports: Some(vec![OpenPort {
            port: Some("443".into()),
            service: Some("https".into()),
            ..OpenPort::default()
        }]),
        vulnerabilities: Some(vec![Vulnerability {
            id: Some("CVE-2021-44228".into()),
            title: Some("Log4Shell".into()),
            severity: Some("CRITICAL".into()),
            ..Vulnerability::default()
        }]),
        ..ScanReport::default()
    })
}

#[test]
fn report_has_front_matter_and_placeholders() {
    let doc = render_report("example.com", &scan_result(), GENERATED);

    assert!(doc.starts_with(
        "---\ntarget: example.com\nmodule: SCAN\ngenerated_utc: 2026-01-02T03:04:05Z\n---\n\n"
    ));
    assert!(doc.contains("# VULN REPORT / example.com"));
    assert!(doc.contains("- **Server:** nginx"));
    assert!(doc.contains("- **Tech Stack:** nginx, PHP"));
    assert!(doc.contains("- **Hosting:** N/A"));
    assert!(doc.contains("| 443 | https | N/A | N/A |"));
    assert!(doc.contains("### Log4Shell (CVE-2021-44228)"));
    assert!(doc.contains("- **Remediation:** N/A"));
}

#[test]
fn empty_reports_render_for_every_kind() {
    let results = [
        PipelineResult::Scan(ScanReport::default()),
        PipelineResult::Osint(OsintReport::default()),
        PipelineResult::IpTrace(IpTraceReport::default()),
    ];
    for result in results {
        let doc = render_report("x", &result, GENERATED);
        assert!(doc.contains(&format!("module: {}", result.kind().label())));
        assert!(doc.contains("## Disclaimer\n\nN/A"));
    }
}

#[test]
fn write_report_uses_sanitized_target_and_overwrites() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("reports");

    let first = write_report(&dir, PipelineKind::Scan, "example.com", &scan_result(), GENERATED)
        .unwrap();
    assert_eq!(first, dir.join("C-FORCE_REPORT_example_com.md"));

    let second = write_report(
        &dir,
        PipelineKind::Scan,
        "example.com",
        &PipelineResult::Scan(ScanReport::default()),
        GENERATED,
    )
    .unwrap();
    assert_eq!(first, second);
    assert!(fs::read_to_string(&second).unwrap().contains("# VULN REPORT / N/A"));
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 1);
}

#[test]
fn kind_mismatch_is_rejected() {
    let temp = TempDir::new().unwrap();

    let err = write_report(
        temp.path(),
        PipelineKind::Osint,
        "example.com",
        &scan_result(),
        GENERATED,
    )
    .unwrap_err();

    assert!(matches!(err, ExportError::KindMismatch { .. }));
}

#[test]
fn output_path_that_is_a_file_is_rejected() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let err = ReportWriter::new(file_path.clone())
        .write("C-FORCE_REPORT_a_com.md", "data")
        .unwrap_err();

    assert!(matches!(err, PersistError::OutputDir { .. }));
    assert!(err.to_string().contains("C-FORCE_REPORT_a_com.md"));
}

#[test]
fn missing_output_dir_is_created() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("reports").join("nested");

    let path = ReportWriter::new(&dir)
        .write("C-FORCE_REPORT_a_com.md", "# report")
        .unwrap();

    assert_eq!(path, dir.join("C-FORCE_REPORT_a_com.md"));
    assert_eq!(fs::read_to_string(path).unwrap(), "# report");
}
