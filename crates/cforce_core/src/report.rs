//! Result schemas for the three pipelines.
//!
//! Every member is optional: model output is trusted for shape, not for
//! completeness. Presentation goes through [`display`] and [`display_list`],
//! which never fail on an absent value.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::PipelineKind;

/// Rendered in place of any absent field.
pub const PLACEHOLDER: &str = "N/A";

/// Object members consulted, in order, when an object sits where text is expected.
const LABEL_KEYS: [&str; 5] = ["organization", "org", "name", "label", "value"];

/// A leaf value from model output.
///
/// Any JSON scalar is accepted. Arrays and objects are flattened to display
/// text so a model answering `"port": 80` or `"asn": {"name": ..}` still
/// yields a usable field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Text(String);

impl Text {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Text {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for Text {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Text(flatten_value(&value)))
    }
}

fn flatten_value(value: &Value) -> String {
    match value {
        Value::Null => PLACEHOLDER.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(flatten_value)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(map) => LABEL_KEYS
            .iter()
            .filter_map(|key| map.get(*key))
            .find(|candidate| is_truthy(candidate))
            .map(flatten_value)
            .unwrap_or_else(|| value.to_string()),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Total accessor for an optional text field.
pub fn display(value: Option<&Text>) -> &str {
    value.map(Text::as_str).unwrap_or(PLACEHOLDER)
}

/// Total accessor for an optional list field; absent and empty lists both yield the placeholder.
pub fn display_list(values: Option<&Vec<Text>>) -> String {
    match values {
        Some(items) if !items.is_empty() => items
            .iter()
            .map(Text::as_str)
            .collect::<Vec<_>>()
            .join(", "),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Closed severity scale used by the scan prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "LOW" => Some(Severity::Low),
            "MEDIUM" => Some(Severity::Medium),
            "HIGH" => Some(Severity::High),
            "CRITICAL" => Some(Severity::Critical),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }
}

// ---------------------------------------------------------------------------
// Scan
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub target: Option<Text>,
    pub server_ip: Option<Text>,
    pub status: Option<Text>,
    pub exposure_summary: Option<Text>,
    pub risk_assessment: Option<Text>,
    pub disclaimer: Option<Text>,
    pub technical_profile: Option<TechnicalProfile>,
    pub open_ports: Option<Vec<OpenPort>>,
    pub vulnerabilities: Option<Vec<Vulnerability>>,
    pub hardening_recommendations: Option<Vec<Text>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalProfile {
    pub hosting: Option<Text>,
    pub isp: Option<Text>,
    pub asn: Option<Text>,
    pub server: Option<Text>,
    pub tech_stack: Option<Vec<Text>>,
    pub tls_config: Option<Text>,
    pub waf: Option<Text>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenPort {
    pub port: Option<Text>,
    pub service: Option<Text>,
    pub version: Option<Text>,
    pub info: Option<Text>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vulnerability {
    pub id: Option<Text>,
    pub title: Option<Text>,
    #[serde(rename = "type")]
    pub category: Option<Text>,
    pub severity: Option<Text>,
    pub cvss: Option<Text>,
    pub affected_component: Option<Text>,
    pub description: Option<Text>,
    pub exploit_info: Option<Text>,
    pub remediation: Option<Text>,
    pub mitigated_by_waf: Option<Text>,
}

impl Vulnerability {
    /// Severity mapped onto the closed scale, `None` when absent or off-scale.
    pub fn severity_level(&self) -> Option<Severity> {
        self.severity.as_ref().and_then(|s| Severity::parse(s.as_str()))
    }
}

// ---------------------------------------------------------------------------
// OSINT
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OsintReport {
    pub target: Option<Text>,
    pub executive_summary: Option<Text>,
    pub domain_profile: Option<DomainProfile>,
    pub infrastructure_profile: Option<InfrastructureProfile>,
    pub tech_stack_overview: Option<Vec<Text>>,
    pub exposed_assets: Option<ExposedAssets>,
    pub historical_intelligence: Option<Text>,
    pub observations: Option<Vec<Text>>,
    pub disclaimer: Option<Text>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainProfile {
    pub domain: Option<Text>,
    pub registrar: Option<Text>,
    pub creation_date: Option<Text>,
    pub expiry_date: Option<Text>,
    pub ownership: Option<Text>,
    pub dns_records: Option<Text>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfrastructureProfile {
    pub ip_addresses: Option<Vec<Text>>,
    pub geolocation: Option<Text>,
    pub hosting: Option<Text>,
    pub asn: Option<Text>,
    pub waf: Option<Text>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExposedAssets {
    pub subdomains: Option<Vec<Text>>,
    pub indexed_urls: Option<Vec<Text>>,
    pub public_files: Option<Vec<Text>>,
}

// ---------------------------------------------------------------------------
// IP trace
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpTraceReport {
    pub target: Option<Text>,
    pub executive_summary: Option<Text>,
    pub network_overview: Option<NetworkOverview>,
    pub all_country_ip_ranges: Option<Vec<Text>>,
    pub asn_mapping: Option<Vec<AsnMapping>>,
    pub isp_profile: Option<Vec<IspProfile>>,
    pub infrastructure: Option<NetworkInfrastructure>,
    pub reputation: Option<Reputation>,
    pub observations: Option<Vec<Text>>,
    pub disclaimer: Option<Text>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkOverview {
    pub total_asns: Option<Text>,
    pub ip_allocations_count: Option<Text>,
    pub total_ip_count: Option<Text>,
    pub connectivity_score: Option<Text>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsnMapping {
    pub asn: Option<Text>,
    pub organization: Option<Text>,
    pub ranges: Option<Vec<Text>>,
    #[serde(rename = "type")]
    pub category: Option<Text>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IspProfile {
    pub name: Option<Text>,
    pub market_share: Option<Text>,
    pub services: Option<Text>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInfrastructure {
    pub ixps: Option<Vec<Text>>,
    pub transit_providers: Option<Vec<Text>>,
    pub cloud_providers: Option<Vec<Text>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reputation {
    pub abuse_rating: Option<Text>,
    pub blacklist_stats: Option<Text>,
}

/// A parsed pipeline output, tagged by the pipeline that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PipelineResult {
    Scan(ScanReport),
    Osint(OsintReport),
    IpTrace(IpTraceReport),
}

impl PipelineResult {
    pub fn kind(&self) -> PipelineKind {
        match self {
            PipelineResult::Scan(_) => PipelineKind::Scan,
            PipelineResult::Osint(_) => PipelineKind::Osint,
            PipelineResult::IpTrace(_) => PipelineKind::IpTrace,
        }
    }

    /// Compact JSON with the wire member names; absent members serialize as `null`.
    pub fn to_json(&self) -> String {
        // Only strings, options and vectors below: serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(json: &str) -> Text {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn scalars_become_text() {
        assert_eq!(text("\"nginx\"").as_str(), "nginx");
        assert_eq!(text("443").as_str(), "443");
        assert_eq!(text("7.5").as_str(), "7.5");
        assert_eq!(text("true").as_str(), "true");
    }

    #[test]
    fn arrays_join_rendered_elements() {
        assert_eq!(text("[\"a\", 2, null]").as_str(), "a, 2, N/A");
    }

    #[test]
    fn objects_prefer_label_members_in_order() {
        assert_eq!(text(r#"{"name":"Paltel","org":"AS12975"}"#).as_str(), "AS12975");
        assert_eq!(text(r#"{"organization":"","name":"Ooredoo"}"#).as_str(), "Ooredoo");
        assert_eq!(text(r#"{"a":"MX 10 mail"}"#).as_str(), r#"{"a":"MX 10 mail"}"#);
    }

    #[test]
    fn absent_fields_render_placeholder() {
        let report: ScanReport = serde_json::from_str("{}").unwrap();
        assert_eq!(display(report.server_ip.as_ref()), PLACEHOLDER);
        assert_eq!(display_list(report.hardening_recommendations.as_ref()), PLACEHOLDER);
        assert_eq!(display_list(Some(&Vec::new())), PLACEHOLDER);
    }

    #[test]
    fn null_members_are_absent() {
        let report: OsintReport = serde_json::from_str(r#"{"target":null}"#).unwrap();
        assert!(report.target.is_none());
    }

    #[test]
    fn severity_is_case_insensitive_and_closed() {
        let vuln = Vulnerability {
            severity: Some(Text::new("high")),
            ..Vulnerability::default()
        };
        assert_eq!(vuln.severity_level(), Some(Severity::High));
        assert_eq!(Severity::parse("SEVERE"), None);
        assert!(Severity::Critical > Severity::Low);
    }

    #[test]
    fn type_member_maps_to_category() {
        let vuln: Vulnerability = serde_json::from_str(r#"{"type":"XSS"}"#).unwrap();
        assert_eq!(display(vuln.category.as_ref()), "XSS");
        let json = serde_json::to_string(&vuln).unwrap();
        assert!(json.contains("\"type\":\"XSS\""));
    }
}
