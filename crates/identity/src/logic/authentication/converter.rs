use std::sync::Arc;

use tracing::{debug, info};

use crate::logic::authentication::{
    AuthorityPrefixes, ClientAuthentication, QuickcaseAuthentication, UserAuthentication,
    VerifiedToken,
};
use crate::logic::claims::FlatClaimsParser;
use crate::logic::error::AuthenticationError;
use crate::logic::user_info::{SUBJECT_CLAIM, UserInfo, UserInfoExtractor, UserInfoService};

/// Where user info comes from once a token is known to represent a user.
#[derive(Clone)]
pub enum UserInfoSource {
    /// Fetch claims from the user-info endpoint
    Endpoint(Arc<dyn UserInfoService>),
    /// Extract from the access token's own claims
    AccessToken(Arc<dyn UserInfoExtractor>),
}

/// Turns a verified token into a client or user authentication.
///
/// Stateless: each call decides independently from the token's scopes.
#[derive(Clone)]
pub struct AuthenticationConverter {
    source: UserInfoSource,
    openid_scope: String,
    prefixes: AuthorityPrefixes,
}

impl AuthenticationConverter {
    pub fn new(
        source: UserInfoSource,
        openid_scope: impl Into<String>,
        prefixes: AuthorityPrefixes,
    ) -> Self {
        Self {
            source,
            openid_scope: openid_scope.into(),
            prefixes,
        }
    }

    pub fn openid_scope(&self) -> &str {
        &self.openid_scope
    }

    /// Fails on the client path only when the token has neither `sub` nor
    /// `client_id`.
    pub async fn convert(
        &self,
        token: &VerifiedToken,
    ) -> Result<QuickcaseAuthentication, AuthenticationError> {
        let scopes = token.scopes();

        if !scopes.contains(&self.openid_scope) {
            let client_id = token
                .subject()
                .or_else(|| token.client_id())
                .ok_or_else(|| AuthenticationError::missing_claim(SUBJECT_CLAIM))?;

            info!("Authenticated client `{client_id}`");
            return Ok(QuickcaseAuthentication::Client(ClientAuthentication::new(
                token.token(),
                client_id,
                scopes,
                &self.prefixes,
            )));
        }

        let user_info = self.load_user_info(token).await?;

        info!("Authenticated user `{}`", user_info.subject());
        Ok(QuickcaseAuthentication::User(UserAuthentication::new(
            token.token(),
            user_info,
            scopes,
            &self.prefixes,
        )))
    }

    async fn load_user_info(&self, token: &VerifiedToken) -> Result<UserInfo, AuthenticationError> {
        match &self.source {
            UserInfoSource::Endpoint(service) => {
                let subject = token
                    .subject()
                    .ok_or_else(|| AuthenticationError::missing_claim(SUBJECT_CLAIM))?;
                debug!("Loading user info from endpoint for subject `{subject}`");
                service.load_user_info(subject, token.token()).await
            }
            UserInfoSource::AccessToken(extractor) => {
                debug!("Extracting user info from access token claims");
                extractor.extract(&FlatClaimsParser::new(token.claims().clone()))
            }
        }
    }
}
