use shared::error::CommonError;
use thiserror::Error;

/// Fatal failures of an authentication attempt.
///
/// Malformed organisation entries and unparsable organisation claims are not
/// represented here: they are recovered where they occur and only logged.
#[derive(Error, Debug)]
pub enum AuthenticationError {
    #[error("mandatory claim missing: {claim}")]
    MissingClaim { claim: String },
    #[error("user info subject does not match expected subject")]
    SubjectMismatch {
        expected: String,
        actual: Option<String>,
    },
    #[error("user info request failed: {msg}")]
    RemoteFetch {
        msg: String,
        #[source]
        source: Option<anyhow::Error>,
    },
    #[error("invalid OIDC configuration: {msg}")]
    InvalidConfiguration { msg: String },
}

impl AuthenticationError {
    pub fn missing_claim(claim: impl Into<String>) -> Self {
        AuthenticationError::MissingClaim {
            claim: claim.into(),
        }
    }

    pub fn remote_fetch(msg: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        AuthenticationError::RemoteFetch {
            msg: msg.into(),
            source,
        }
    }
}

impl From<AuthenticationError> for CommonError {
    fn from(e: AuthenticationError) -> Self {
        match e {
            AuthenticationError::InvalidConfiguration { msg } => CommonError::InvalidRequest {
                msg,
                source: None,
            },
            other => CommonError::Authentication {
                msg: other.to_string(),
                source: Some(anyhow::Error::from(other)),
            },
        }
    }
}
