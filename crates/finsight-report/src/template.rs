use finsight_types::ReportTemplate;

/// Ordered (keywords, template) rules; the first rule with a hit wins
const TEMPLATE_RULES: &[(&[&str], ReportTemplate)] = &[
    (
        &["retirement", "retire", "pension", "rrsp", "tfsa"],
        ReportTemplate::RetirementFocused,
    ),
    (
        &["tax", "taxation", "deduction", "credit"],
        ReportTemplate::TaxFocused,
    ),
];

/// Pick the section ordering for a stored customization preference.
///
/// Matching is case-insensitive substring search. Empty preferences and
/// preferences matching no rule use the default ordering.
pub fn select_template(preference: &str) -> ReportTemplate {
    let preference = preference.to_lowercase();
    if preference.trim().is_empty() {
        return ReportTemplate::Default;
    }

    TEMPLATE_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| preference.contains(k)))
        .map(|(_, template)| *template)
        .unwrap_or_default()
}
