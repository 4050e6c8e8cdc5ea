pub mod extractor;
pub mod gateway;
pub mod service;

pub use self::extractor::*;
pub use self::gateway::*;
pub use self::service::*;

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::logic::organisation::{OrganisationProfile, OrganisationProfiles};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub default_jurisdiction: Option<String>,
    pub default_case_type: Option<String>,
    pub default_state: Option<String>,
}

/// Inputs for [`UserInfo::new`].
#[derive(Debug, Clone, Default)]
pub struct UserInfoParams {
    pub subject: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub authorities: BTreeSet<String>,
    pub roles: BTreeSet<String>,
    pub groups: BTreeSet<String>,
    pub preferences: UserPreferences,
    pub organisation_profiles: OrganisationProfiles,
}

/// Canonical identity of an authenticated user.
///
/// `Debug` only prints the subject and authorities so that names and
/// emails stay out of logs.
#[derive(Clone, PartialEq, Eq)]
pub struct UserInfo {
    subject: String,
    name: Option<String>,
    email: Option<String>,
    authorities: BTreeSet<String>,
    roles: BTreeSet<String>,
    groups: BTreeSet<String>,
    preferences: UserPreferences,
    organisation_profiles: OrganisationProfiles,
}

impl UserInfo {
    pub fn new(params: UserInfoParams) -> Self {
        Self {
            subject: params.subject,
            name: params.name,
            email: params.email,
            authorities: params.authorities,
            roles: params.roles,
            groups: params.groups,
            preferences: params.preferences,
            organisation_profiles: params.organisation_profiles,
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Display name, falling back to the subject
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.subject)
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Email when known, subject otherwise
    pub fn username(&self) -> &str {
        self.email.as_deref().unwrap_or(&self.subject)
    }

    pub fn authorities(&self) -> &BTreeSet<String> {
        &self.authorities
    }

    pub fn roles(&self) -> &BTreeSet<String> {
        &self.roles
    }

    pub fn groups(&self) -> &BTreeSet<String> {
        &self.groups
    }

    pub fn preferences(&self) -> &UserPreferences {
        &self.preferences
    }

    pub fn organisation_profiles(&self) -> &OrganisationProfiles {
        &self.organisation_profiles
    }

    pub fn organisation_profile(&self, organisation_id: &str) -> Option<&OrganisationProfile> {
        self.organisation_profiles.get(organisation_id)
    }

    pub fn organisation_ids(&self) -> BTreeSet<String> {
        self.organisation_profiles.ids().map(str::to_string).collect()
    }
}

impl fmt::Debug for UserInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserInfo")
            .field("subject", &self.subject)
            .field("authorities", &self.authorities)
            .finish_non_exhaustive()
    }
}
