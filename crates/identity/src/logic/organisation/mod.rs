pub mod parser;
pub use self::parser::*;

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use crate::logic::classification::{AccessLevel, SecurityClassification};

/// Profile applied to users for organisations they have no explicit profile for
pub static DEFAULT_USER_PROFILE: OrganisationProfile =
    OrganisationProfile::fixed(AccessLevel::Individual, SecurityClassification::Public);

/// Profile applied to client-only authentications, for every organisation
pub static CLIENT_PROFILE: OrganisationProfile =
    OrganisationProfile::fixed(AccessLevel::Organisation, SecurityClassification::Public);

/// A user's access level, classification and optional group within one organisation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct OrganisationProfile {
    security_classification: SecurityClassification,
    access_level: AccessLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    group: Option<String>,
}

/// Raw inputs for [`OrganisationProfile::new`]. Absent fields fall back to defaults.
#[derive(Debug, Clone, Default)]
pub struct OrganisationProfileParams {
    pub security_classification: Option<SecurityClassification>,
    pub access_level: Option<AccessLevel>,
    pub group: Option<String>,
}

impl OrganisationProfile {
    /// Least restrictive classification, used when none is provided
    pub const DEFAULT_CLASSIFICATION: SecurityClassification = SecurityClassification::Public;
    /// Most restrictive access level, used when none is provided
    pub const DEFAULT_ACCESS_LEVEL: AccessLevel = AccessLevel::Individual;

    const fn fixed(
        access_level: AccessLevel,
        security_classification: SecurityClassification,
    ) -> Self {
        Self {
            security_classification,
            access_level,
            group: None,
        }
    }

    /// Build a profile, applying defaults and the group invariant.
    ///
    /// `Group` access without a non-empty group is downgraded to `Individual`.
    pub fn new(params: OrganisationProfileParams) -> Self {
        let group = params.group.filter(|g| !g.is_empty());
        let mut access_level = params.access_level.unwrap_or(Self::DEFAULT_ACCESS_LEVEL);

        if access_level == AccessLevel::Group && group.is_none() {
            tracing::warn!(
                "Usage of access level GROUP without group is forbidden, defaulting to INDIVIDUAL"
            );
            access_level = AccessLevel::Individual;
        }

        Self {
            security_classification: params
                .security_classification
                .unwrap_or(Self::DEFAULT_CLASSIFICATION),
            access_level,
            group,
        }
    }

    pub fn security_classification(&self) -> SecurityClassification {
        self.security_classification
    }

    pub fn access_level(&self) -> AccessLevel {
        self.access_level
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }
}

impl Default for OrganisationProfile {
    fn default() -> Self {
        DEFAULT_USER_PROFILE.clone()
    }
}

/// Organisation profiles keyed by organisation id, compared case-insensitively.
///
/// The id as first inserted is kept for display; lookups normalise to lower case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganisationProfiles {
    entries: BTreeMap<String, (String, OrganisationProfile)>,
}

impl OrganisationProfiles {
    pub fn new() -> Self {
        Self::default()
    }

    fn normalise(organisation_id: &str) -> String {
        organisation_id.to_lowercase()
    }

    /// Insert or replace the profile for an organisation.
    pub fn insert(&mut self, organisation_id: impl Into<String>, profile: OrganisationProfile) {
        let organisation_id = organisation_id.into();
        let key = Self::normalise(&organisation_id);
        match self.entries.get_mut(&key) {
            Some(entry) => entry.1 = profile,
            None => {
                self.entries.insert(key, (organisation_id, profile));
            }
        }
    }

    pub fn get(&self, organisation_id: &str) -> Option<&OrganisationProfile> {
        self.entries
            .get(&Self::normalise(organisation_id))
            .map(|(_, profile)| profile)
    }

    pub fn contains(&self, organisation_id: &str) -> bool {
        self.entries.contains_key(&Self::normalise(organisation_id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Organisation ids as originally provided
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|(id, _)| id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OrganisationProfile)> {
        self.entries
            .values()
            .map(|(id, profile)| (id.as_str(), profile))
    }
}

impl<K: Into<String>> FromIterator<(K, OrganisationProfile)> for OrganisationProfiles {
    fn from_iter<I: IntoIterator<Item = (K, OrganisationProfile)>>(iter: I) -> Self {
        let mut profiles = OrganisationProfiles::new();
        profiles.extend(iter);
        profiles
    }
}

impl<K: Into<String>> Extend<(K, OrganisationProfile)> for OrganisationProfiles {
    fn extend<I: IntoIterator<Item = (K, OrganisationProfile)>>(&mut self, iter: I) {
        for (id, profile) in iter {
            self.insert(id, profile);
        }
    }
}

impl Serialize for OrganisationProfiles {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}
