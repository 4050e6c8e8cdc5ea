use serde::{Deserialize, Serialize};

/// Whether a missing email claim fails extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailRequirement {
    #[default]
    Optional,
    Mandatory,
}

/// Identity provider flavour, selecting claim naming conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    #[default]
    Generic,
    Cognito,
    Keycloak,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Generic => "generic",
            Provider::Cognito => "cognito",
            Provider::Keycloak => "keycloak",
        }
    }

    /// Namespace prepended to private claim names
    pub fn claim_prefix(&self) -> &'static str {
        match self {
            Provider::Generic => "app.quickcase.claims/",
            Provider::Cognito => "custom:",
            Provider::Keycloak => "",
        }
    }

    /// Scope marking a token as issued on behalf of a user
    pub fn openid_scope(&self) -> &'static str {
        match self {
            Provider::Cognito => "profile",
            Provider::Generic | Provider::Keycloak => "openid",
        }
    }

    pub fn email_requirement(&self) -> EmailRequirement {
        match self {
            Provider::Generic => EmailRequirement::Optional,
            Provider::Cognito | Provider::Keycloak => EmailRequirement::Mandatory,
        }
    }

    fn private_claims(&self) -> PrivateClaims {
        match self {
            Provider::Generic => PrivateClaims {
                roles: "roles",
                groups: "groups",
                organisations: "organisations",
                default_jurisdiction: "default_jurisdiction",
                default_case_type: "default_case_type",
                default_state: "default_state",
            },
            Provider::Cognito => PrivateClaims {
                roles: "app_roles",
                groups: "app_groups",
                organisations: "app_organisations",
                default_jurisdiction: "default_jurisdiction",
                default_case_type: "default_case_type",
                default_state: "default_state",
            },
            Provider::Keycloak => PrivateClaims {
                roles: "app_roles",
                groups: "app_groups",
                organisations: "app_organisations",
                default_jurisdiction: "user_default_jurisdiction",
                default_case_type: "user_default_case_type",
                default_state: "user_default_state",
            },
        }
    }
}

struct PrivateClaims {
    roles: &'static str,
    groups: &'static str,
    organisations: &'static str,
    default_jurisdiction: &'static str,
    default_case_type: &'static str,
    default_state: &'static str,
}

/// Per-claim name overrides. Private claim overrides are still prefixed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimNameOverrides {
    pub sub: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub roles: Option<String>,
    pub groups: Option<String>,
    pub organisations: Option<String>,
    pub default_jurisdiction: Option<String>,
    pub default_case_type: Option<String>,
    pub default_state: Option<String>,
}

/// Fully resolved claim names used by the user info extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimNames {
    pub sub: String,
    pub name: String,
    pub email: String,
    pub roles: String,
    pub groups: String,
    pub organisations: String,
    pub default_jurisdiction: String,
    pub default_case_type: String,
    pub default_state: String,
    pub email_requirement: EmailRequirement,
}

impl ClaimNames {
    /// Resolve names for a provider, with an optional prefix replacing the
    /// provider's own namespace.
    pub fn resolve(
        provider: Provider,
        prefix: Option<&str>,
        overrides: &ClaimNameOverrides,
    ) -> Self {
        let prefix = prefix.unwrap_or(provider.claim_prefix());
        let defaults = provider.private_claims();

        let standard = |value: &Option<String>, default: &str| {
            value.clone().unwrap_or_else(|| default.to_string())
        };
        let private = |value: &Option<String>, default: &str| {
            format!("{prefix}{}", value.as_deref().unwrap_or(default))
        };

        Self {
            sub: standard(&overrides.sub, "sub"),
            name: standard(&overrides.name, "name"),
            email: standard(&overrides.email, "email"),
            roles: private(&overrides.roles, defaults.roles),
            groups: private(&overrides.groups, defaults.groups),
            organisations: private(&overrides.organisations, defaults.organisations),
            default_jurisdiction: private(
                &overrides.default_jurisdiction,
                defaults.default_jurisdiction,
            ),
            default_case_type: private(&overrides.default_case_type, defaults.default_case_type),
            default_state: private(&overrides.default_state, defaults.default_state),
            email_requirement: provider.email_requirement(),
        }
    }

    pub fn for_provider(provider: Provider) -> Self {
        Self::resolve(provider, None, &ClaimNameOverrides::default())
    }

    pub fn generic() -> Self {
        Self::for_provider(Provider::Generic)
    }

    pub fn cognito() -> Self {
        Self::for_provider(Provider::Cognito)
    }

    pub fn keycloak() -> Self {
        Self::for_provider(Provider::Keycloak)
    }
}

impl Default for ClaimNames {
    fn default() -> Self {
        Self::generic()
    }
}
