use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shared::env::optional_var;
use shared::error::CommonError;
use tracing::debug;
use url::Url;

use crate::logic::authentication::{AuthenticationConverter, AuthorityPrefixes, UserInfoSource};
use crate::logic::claims::{ClaimNameOverrides, ClaimNames, Provider};
use crate::logic::error::AuthenticationError;
use crate::logic::user_info::{
    DefaultUserInfoExtractor, DefaultUserInfoService, HttpUserInfoGateway,
};

pub const USER_INFO_URI_ENV: &str = "OIDC_USER_INFO_URI";
pub const OPENID_SCOPE_ENV: &str = "OIDC_OPENID_SCOPE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserInfoMode {
    /// Claims are fetched from the user-info endpoint
    #[default]
    UserInfo,
    /// Claims are read from the access token itself
    AccessToken,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimsConfig {
    /// Replaces the provider's private claim namespace
    pub prefix: Option<String>,
    pub names: ClaimNameOverrides,
}

/// OIDC settings for a deployment.
///
/// ```yaml
/// provider: cognito
/// mode: user_info
/// user_info_uri: https://auth.example.com/oauth2/userInfo
/// claims:
///   names:
///     roles: roles
/// authorities:
///   scope_prefix: SCOPE_
///   role_prefix: ROLE_
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OidcConfig {
    pub provider: Provider,
    pub mode: UserInfoMode,
    pub user_info_uri: Option<Url>,
    pub openid_scope: Option<String>,
    pub claims: ClaimsConfig,
    pub authorities: AuthorityPrefixes,
}

impl OidcConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CommonError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CommonError> {
        let path = path.as_ref();
        debug!("Loading OIDC configuration from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Override the endpoint and marker scope from `OIDC_USER_INFO_URI` and
    /// `OIDC_OPENID_SCOPE` when set.
    pub fn with_env_overrides(mut self) -> Result<Self, CommonError> {
        if let Some(uri) = optional_var(USER_INFO_URI_ENV)? {
            self.user_info_uri = Some(Url::parse(&uri)?);
        }
        if let Some(scope) = optional_var(OPENID_SCOPE_ENV)? {
            self.openid_scope = Some(scope);
        }
        Ok(self)
    }

    pub fn claim_names(&self) -> ClaimNames {
        ClaimNames::resolve(
            self.provider,
            self.claims.prefix.as_deref(),
            &self.claims.names,
        )
    }

    /// Marker scope identifying user tokens
    pub fn openid_scope(&self) -> &str {
        self.openid_scope
            .as_deref()
            .unwrap_or(self.provider.openid_scope())
    }

    pub fn build_converter(
        &self,
        http_client: reqwest::Client,
    ) -> Result<AuthenticationConverter, AuthenticationError> {
        let claim_names = self.claim_names();
        let extractor = Arc::new(DefaultUserInfoExtractor::new(claim_names));

        let source = match self.mode {
            UserInfoMode::AccessToken => UserInfoSource::AccessToken(extractor),
            UserInfoMode::UserInfo => {
                let uri = self.user_info_uri.clone().ok_or_else(|| {
                    AuthenticationError::InvalidConfiguration {
                        msg: "user_info_uri is required in user_info mode".to_string(),
                    }
                })?;
                let gateway = Arc::new(HttpUserInfoGateway::new(http_client, uri));
                UserInfoSource::Endpoint(Arc::new(DefaultUserInfoService::new(gateway, extractor)))
            }
        };

        debug!(
            "Configured {} OIDC provider in {:?} mode",
            self.provider.as_str(),
            self.mode
        );

        Ok(AuthenticationConverter::new(
            source,
            self.openid_scope(),
            self.authorities.clone(),
        ))
    }
}
