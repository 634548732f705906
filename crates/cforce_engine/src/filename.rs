const PREFIX: &str = "C-FORCE_REPORT_";
const MAX_STEM_LEN: usize = 80;

/// Deterministic report filename: `C-FORCE_REPORT_{target}.md` with every
/// non-ASCII-alphanumeric character of the target replaced by `_`.
pub fn report_filename(target: &str) -> String {
    let mut stem: String = target
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if stem.is_empty() {
        stem.push_str("untitled");
    }
    // ASCII only, so byte truncation lands on a char boundary.
    stem.truncate(MAX_STEM_LEN);
    format!("{PREFIX}{stem}.md")
}
