use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::logic::claims::{ClaimsParser, JsonClaimsParser};
use crate::logic::error::AuthenticationError;
use crate::logic::user_info::{UserInfo, UserInfoExtractor, UserInfoGateway};

/// Standard subject claim, compared on both the token and the user-info
/// response. Claim name overrides only apply to extraction.
pub const SUBJECT_CLAIM: &str = "sub";

/// Loads the user info for the subject of a verified token.
#[async_trait]
pub trait UserInfoService: Send + Sync {
    async fn load_user_info(
        &self,
        expected_subject: &str,
        access_token: &str,
    ) -> Result<UserInfo, AuthenticationError>;
}

/// Fetches claims through a gateway and rejects them unless their subject is
/// exactly the subject of the token being verified.
#[derive(Clone)]
pub struct DefaultUserInfoService {
    gateway: Arc<dyn UserInfoGateway>,
    extractor: Arc<dyn UserInfoExtractor>,
}

impl DefaultUserInfoService {
    pub fn new(gateway: Arc<dyn UserInfoGateway>, extractor: Arc<dyn UserInfoExtractor>) -> Self {
        Self { gateway, extractor }
    }
}

#[async_trait]
impl UserInfoService for DefaultUserInfoService {
    async fn load_user_info(
        &self,
        expected_subject: &str,
        access_token: &str,
    ) -> Result<UserInfo, AuthenticationError> {
        let claims = JsonClaimsParser::new(self.gateway.get_claims(access_token).await?);

        let actual_subject = claims.get_string(SUBJECT_CLAIM);
        if actual_subject.as_deref() != Some(expected_subject) {
            warn!("User info subject does not match token subject `{expected_subject}`");
            return Err(AuthenticationError::SubjectMismatch {
                expected: expected_subject.to_string(),
                actual: actual_subject,
            });
        }

        debug!("Extracting user info for subject `{expected_subject}`");
        self.extractor.extract(&claims)
    }
}
