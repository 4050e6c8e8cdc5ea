use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::logic::classification::{AccessLevel, SecurityClassification};
use crate::logic::organisation::{
    OrganisationProfile, OrganisationProfileParams, OrganisationProfiles,
};

const ACCESS: &str = "access";
const CLASSIFICATION: &str = "classification";
const GROUP: &str = "group";

/// Parse an organisations claim into profiles keyed by organisation id.
///
/// Never fails: a missing or non-object claim yields an empty map and
/// non-object entries are skipped.
pub fn parse_organisation_profiles(claim: Option<&Value>) -> OrganisationProfiles {
    let Some(claim) = claim.filter(|v| !v.is_null()) else {
        debug!("No organisations claim, no organisation profiles");
        return OrganisationProfiles::new();
    };

    let Some(entries) = claim.as_object() else {
        warn!("Organisations claim is not an object, ignoring it");
        return OrganisationProfiles::new();
    };

    let mut profiles = OrganisationProfiles::new();
    for (organisation_id, entry) in entries {
        match entry.as_object() {
            Some(entry) => {
                profiles.insert(organisation_id.as_str(), parse_profile(organisation_id, entry))
            }
            None => warn!("Skipping malformed profile for organisation {organisation_id}"),
        }
    }

    profiles
}

fn parse_profile(organisation_id: &str, entry: &Map<String, Value>) -> OrganisationProfile {
    let access_level = text(entry, ACCESS).and_then(|value| {
        let parsed = AccessLevel::parse(value);
        if parsed.is_none() {
            warn!(
                "Invalid access level '{value}' for organisation {organisation_id}, using default"
            );
        }
        parsed
    });

    let security_classification = text(entry, CLASSIFICATION).and_then(|value| {
        let parsed = SecurityClassification::parse(value);
        if parsed.is_none() {
            warn!(
                "Invalid classification '{value}' for organisation {organisation_id}, using default"
            );
        }
        parsed
    });

    let group = text(entry, GROUP)
        .map(str::to_lowercase)
        .filter(|_| {
            let keep = access_level == Some(AccessLevel::Group);
            if !keep {
                warn!(
                    "Ignoring group for organisation {organisation_id} without GROUP access level"
                );
            }
            keep
        });

    OrganisationProfile::new(OrganisationProfileParams {
        security_classification,
        access_level,
        group,
    })
}

fn text<'a>(entry: &'a Map<String, Value>, field: &str) -> Option<&'a str> {
    entry.get(field).and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_profiles() {
        let claim = json!({
            "org-1": {"access": "organisation", "classification": "private"},
            "org-2": {"access": "group", "classification": "public", "group": "group-1"}
        });

        let profiles = parse_organisation_profiles(Some(&claim));

        assert_eq!(profiles.len(), 2);

        let org1 = profiles.get("org-1").unwrap();
        assert_eq!(org1.access_level(), AccessLevel::Organisation);
        assert_eq!(org1.security_classification(), SecurityClassification::Private);
        assert_eq!(org1.group(), None);

        let org2 = profiles.get("org-2").unwrap();
        assert_eq!(org2.access_level(), AccessLevel::Group);
        assert_eq!(org2.security_classification(), SecurityClassification::Public);
        assert_eq!(org2.group(), Some("group-1"));
    }

    #[test]
    fn test_values_are_case_insensitive_and_group_lowercased() {
        let claim = json!({
            "ORG-1": {"access": "GROUP", "classification": "Restricted", "group": "Group-A"}
        });

        let profiles = parse_organisation_profiles(Some(&claim));
        let profile = profiles.get("org-1").unwrap();

        assert_eq!(profile.access_level(), AccessLevel::Group);
        assert_eq!(profile.security_classification(), SecurityClassification::Restricted);
        assert_eq!(profile.group(), Some("group-a"));
        assert_eq!(profiles.ids().collect::<Vec<_>>(), vec!["ORG-1"]);
    }

    #[test]
    fn test_malformed_entry_is_skipped() {
        let claim = json!({
            "org-1": 42,
            "org-2": "organisation",
            "org-3": {"access": "organisation"}
        });

        let profiles = parse_organisation_profiles(Some(&claim));

        assert_eq!(profiles.len(), 1);
        assert!(profiles.get("org-1").is_none());
        assert_eq!(
            profiles.get("org-3").unwrap().access_level(),
            AccessLevel::Organisation
        );
    }

    #[test]
    fn test_null_or_non_object_claim_is_empty() {
        assert!(parse_organisation_profiles(None).is_empty());
        assert!(parse_organisation_profiles(Some(&Value::Null)).is_empty());
        assert!(parse_organisation_profiles(Some(&json!("org-1"))).is_empty());
        assert!(parse_organisation_profiles(Some(&json!(["org-1"]))).is_empty());
    }

    #[test]
    fn test_invalid_values_fall_back_to_defaults() {
        let claim = json!({
            "org-1": {"access": "everything", "classification": "top-secret"}
        });

        let profiles = parse_organisation_profiles(Some(&claim));
        let profile = profiles.get("org-1").unwrap();

        assert_eq!(profile.access_level(), AccessLevel::Individual);
        assert_eq!(profile.security_classification(), SecurityClassification::Public);
    }

    #[test]
    fn test_group_dropped_unless_group_access() {
        let claim = json!({
            "org-1": {"access": "organisation", "group": "group-1"},
            "org-2": {"group": "group-2"}
        });

        let profiles = parse_organisation_profiles(Some(&claim));

        assert_eq!(profiles.get("org-1").unwrap().group(), None);
        assert_eq!(profiles.get("org-2").unwrap().group(), None);
        assert_eq!(
            profiles.get("org-2").unwrap().access_level(),
            AccessLevel::Individual
        );
    }

    #[test]
    fn test_group_access_without_group_downgrades() {
        let claim = json!({"org-1": {"access": "group"}});

        let profiles = parse_organisation_profiles(Some(&claim));

        assert_eq!(
            profiles.get("org-1").unwrap().access_level(),
            AccessLevel::Individual
        );
    }
}
