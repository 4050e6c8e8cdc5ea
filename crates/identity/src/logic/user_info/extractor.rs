use std::collections::BTreeSet;

use serde_json::Value;
use tracing::{debug, warn};

use crate::logic::claims::{ClaimNames, ClaimsParser, EmailRequirement};
use crate::logic::error::AuthenticationError;
use crate::logic::organisation::{OrganisationProfiles, parse_organisation_profiles};
use crate::logic::user_info::{UserInfo, UserInfoParams, UserPreferences};

/// Builds a [`UserInfo`] from a set of claims.
pub trait UserInfoExtractor: Send + Sync {
    fn extract(&self, claims: &dyn ClaimsParser) -> Result<UserInfo, AuthenticationError>;
}

/// Extracts user info using a configurable claim name mapping.
#[derive(Debug, Clone, Default)]
pub struct DefaultUserInfoExtractor {
    claim_names: ClaimNames,
}

impl DefaultUserInfoExtractor {
    pub fn new(claim_names: ClaimNames) -> Self {
        Self { claim_names }
    }

    pub fn claim_names(&self) -> &ClaimNames {
        &self.claim_names
    }

    fn extract_preferences(&self, claims: &dyn ClaimsParser) -> UserPreferences {
        UserPreferences {
            default_jurisdiction: claims.get_string(&self.claim_names.default_jurisdiction),
            default_case_type: claims.get_string(&self.claim_names.default_case_type),
            default_state: claims.get_string(&self.claim_names.default_state),
        }
    }

    fn extract_profiles(&self, subject: &str, claims: &dyn ClaimsParser) -> OrganisationProfiles {
        debug!("Extracting organisation profiles for subject `{subject}`");
        match claims.get_object(&self.claim_names.organisations) {
            Some(organisations) => parse_organisation_profiles(Some(&Value::Object(organisations))),
            None => {
                warn!("No organisation profiles extracted for subject `{subject}`");
                OrganisationProfiles::new()
            }
        }
    }
}

impl UserInfoExtractor for DefaultUserInfoExtractor {
    fn extract(&self, claims: &dyn ClaimsParser) -> Result<UserInfo, AuthenticationError> {
        let names = &self.claim_names;

        let subject = claims
            .get_string(&names.sub)
            .ok_or_else(|| AuthenticationError::missing_claim(&names.sub))?;

        let email = claims.get_string(&names.email);
        if email.is_none() && names.email_requirement == EmailRequirement::Mandatory {
            return Err(AuthenticationError::missing_claim(&names.email));
        }

        let roles: BTreeSet<String> = claims.get_list(&names.roles).into_iter().collect();
        let groups: BTreeSet<String> = claims.get_list(&names.groups).into_iter().collect();

        Ok(UserInfo::new(UserInfoParams {
            name: claims.get_string(&names.name),
            email,
            authorities: roles.clone(),
            roles,
            groups,
            preferences: self.extract_preferences(claims),
            organisation_profiles: self.extract_profiles(&subject, claims),
            subject,
        }))
    }
}
