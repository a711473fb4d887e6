use entitle_types::{Error, FeatureName};
use std::collections::HashSet;

// ── Catalogue ────────────────────────────────────────────────────

#[test]
fn catalogue_has_no_duplicates() {
    let names: HashSet<&str> = FeatureName::ALL.iter().map(|n| n.as_str()).collect();
    assert_eq!(names.len(), FeatureName::ALL.len());
}

#[test]
fn catalogue_is_sorted_like_ord() {
    let mut sorted = FeatureName::ALL;
    sorted.sort();
    assert_eq!(sorted, FeatureName::ALL);
}

// ── Wire names ───────────────────────────────────────────────────

#[test]
fn serde_matches_as_str() {
    for name in FeatureName::ALL {
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, format!("\"{}\"", name.as_str()));
        let parsed: FeatureName = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, name);
    }
}

#[test]
fn from_str_known() {
    assert_eq!("user_limit".parse::<FeatureName>().unwrap(), FeatureName::UserLimit);
    assert_eq!(
        "multiple_external_auth".parse::<FeatureName>().unwrap(),
        FeatureName::MultipleExternalAuth
    );
}

#[test]
fn from_str_unknown() {
    let err = "teleportation".parse::<FeatureName>().unwrap_err();
    assert!(matches!(err, Error::UnknownFeature(ref s) if s == "teleportation"));
    assert!(format!("{err}").contains("unknown feature"));
}

#[test]
fn display_is_wire_name() {
    assert_eq!(FeatureName::HighAvailability.to_string(), "high_availability");
}

// ── Humanize ─────────────────────────────────────────────────────

#[test]
fn humanize_special_cases() {
    assert_eq!(FeatureName::Scim.humanize(), "SCIM");
    assert_eq!(FeatureName::TemplateRbac.humanize(), "Template RBAC");
}

#[test]
fn humanize_title_cases_words() {
    assert_eq!(FeatureName::AuditLog.humanize(), "Audit Log");
    assert_eq!(FeatureName::BrowserOnly.humanize(), "Browser Only");
    assert_eq!(
        FeatureName::ExternalProvisionerDaemons.humanize(),
        "External Provisioner Daemons"
    );
}

// ── Always enable ────────────────────────────────────────────────

#[test]
fn always_enable_set() {
    let always: Vec<FeatureName> = FeatureName::ALL
        .into_iter()
        .filter(FeatureName::always_enable)
        .collect();
    assert_eq!(
        always,
        vec![
            FeatureName::MultipleExternalAuth,
            FeatureName::ExternalProvisionerDaemons,
            FeatureName::Appearance,
        ]
    );
}
