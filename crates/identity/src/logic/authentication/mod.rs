pub mod converter;
pub use self::converter::*;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::logic::organisation::{CLIENT_PROFILE, DEFAULT_USER_PROFILE, OrganisationProfile};
use crate::logic::user_info::{SUBJECT_CLAIM, UserInfo};

/// Display name of client-only authentications
pub const CLIENT_NAME: &str = "System";

static NO_GROUPS: BTreeSet<String> = BTreeSet::new();

/// Prefixes applied to scope and role authorities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorityPrefixes {
    pub scope_prefix: String,
    pub role_prefix: String,
}

impl Default for AuthorityPrefixes {
    fn default() -> Self {
        Self {
            scope_prefix: "SCOPE_".to_string(),
            role_prefix: "ROLE_".to_string(),
        }
    }
}

impl AuthorityPrefixes {
    pub fn scope_authorities<'a>(
        &self,
        scopes: impl IntoIterator<Item = &'a String>,
    ) -> BTreeSet<String> {
        prefixed(&self.scope_prefix, scopes)
    }

    pub fn role_authorities<'a>(
        &self,
        roles: impl IntoIterator<Item = &'a String>,
    ) -> BTreeSet<String> {
        prefixed(&self.role_prefix, roles)
    }
}

fn prefixed<'a>(prefix: &str, values: impl IntoIterator<Item = &'a String>) -> BTreeSet<String> {
    values
        .into_iter()
        .filter(|value| !value.is_empty())
        .map(|value| format!("{prefix}{value}"))
        .collect()
}

/// A signature-verified access token, as handed over by the token verifier.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedToken {
    token: String,
    claims: Map<String, Value>,
}

impl VerifiedToken {
    pub fn new(token: impl Into<String>, claims: Map<String, Value>) -> Self {
        Self {
            token: token.into(),
            claims,
        }
    }

    /// Raw token, used as bearer credential
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn claims(&self) -> &Map<String, Value> {
        &self.claims
    }

    fn string_claim(&self, name: &str) -> Option<&str> {
        self.claims
            .get(name)
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn subject(&self) -> Option<&str> {
        self.string_claim(SUBJECT_CLAIM)
    }

    pub fn client_id(&self) -> Option<&str> {
        self.string_claim("client_id")
    }

    /// Scopes from the `scope` claim, either space-separated or an array.
    pub fn scopes(&self) -> BTreeSet<String> {
        match self.claims.get("scope") {
            Some(Value::String(scope)) => scope.split_whitespace().map(str::to_string).collect(),
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .flat_map(str::split_whitespace)
                .map(str::to_string)
                .collect(),
            _ => BTreeSet::new(),
        }
    }
}

/// Machine-to-machine authentication, with no user behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientAuthentication {
    access_token: String,
    client_id: String,
    scopes: BTreeSet<String>,
    authorities: BTreeSet<String>,
}

impl ClientAuthentication {
    pub fn new(
        access_token: impl Into<String>,
        client_id: impl Into<String>,
        scopes: BTreeSet<String>,
        prefixes: &AuthorityPrefixes,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            client_id: client_id.into(),
            authorities: prefixes.scope_authorities(&scopes),
            scopes,
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn scopes(&self) -> &BTreeSet<String> {
        &self.scopes
    }
}

/// Authentication on behalf of a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAuthentication {
    access_token: String,
    user_info: UserInfo,
    scopes: BTreeSet<String>,
    authorities: BTreeSet<String>,
}

impl UserAuthentication {
    pub fn new(
        access_token: impl Into<String>,
        user_info: UserInfo,
        scopes: BTreeSet<String>,
        prefixes: &AuthorityPrefixes,
    ) -> Self {
        let mut authorities = prefixes.scope_authorities(&scopes);
        authorities.extend(prefixes.role_authorities(user_info.authorities()));

        Self {
            access_token: access_token.into(),
            user_info,
            scopes,
            authorities,
        }
    }

    pub fn user_info(&self) -> &UserInfo {
        &self.user_info
    }

    pub fn scopes(&self) -> &BTreeSet<String> {
        &self.scopes
    }
}

/// Normalised authentication handed to the security layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuickcaseAuthentication {
    Client(ClientAuthentication),
    User(UserAuthentication),
}

impl QuickcaseAuthentication {
    /// Client id or user subject
    pub fn id(&self) -> &str {
        match self {
            QuickcaseAuthentication::Client(client) => &client.client_id,
            QuickcaseAuthentication::User(user) => user.user_info.subject(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            QuickcaseAuthentication::Client(_) => CLIENT_NAME,
            QuickcaseAuthentication::User(user) => user.user_info.name(),
        }
    }

    pub fn email(&self) -> Option<&str> {
        match self {
            QuickcaseAuthentication::Client(_) => None,
            QuickcaseAuthentication::User(user) => user.user_info.email(),
        }
    }

    pub fn authorities(&self) -> &BTreeSet<String> {
        match self {
            QuickcaseAuthentication::Client(client) => &client.authorities,
            QuickcaseAuthentication::User(user) => &user.authorities,
        }
    }

    /// Client scopes, or user roles
    pub fn roles(&self) -> &BTreeSet<String> {
        match self {
            QuickcaseAuthentication::Client(client) => &client.scopes,
            QuickcaseAuthentication::User(user) => user.user_info.roles(),
        }
    }

    pub fn groups(&self) -> &BTreeSet<String> {
        match self {
            QuickcaseAuthentication::Client(_) => &NO_GROUPS,
            QuickcaseAuthentication::User(user) => user.user_info.groups(),
        }
    }

    pub fn access_token(&self) -> &str {
        match self {
            QuickcaseAuthentication::Client(client) => &client.access_token,
            QuickcaseAuthentication::User(user) => &user.access_token,
        }
    }

    pub fn user_info(&self) -> Option<&UserInfo> {
        match self {
            QuickcaseAuthentication::Client(_) => None,
            QuickcaseAuthentication::User(user) => Some(&user.user_info),
        }
    }

    pub fn is_client_only(&self) -> bool {
        matches!(self, QuickcaseAuthentication::Client(_))
    }

    /// Always true: an authentication only exists once fully built.
    pub fn is_authenticated(&self) -> bool {
        true
    }

    /// Profile for an organisation, looked up ignoring case.
    ///
    /// Clients get organisation-wide access everywhere; users without a
    /// matching profile get individual access.
    pub fn organisation_profile(&self, organisation_id: &str) -> &OrganisationProfile {
        match self {
            QuickcaseAuthentication::Client(_) => &CLIENT_PROFILE,
            QuickcaseAuthentication::User(user) => user
                .user_info
                .organisation_profile(organisation_id)
                .unwrap_or(&DEFAULT_USER_PROFILE),
        }
    }
}
