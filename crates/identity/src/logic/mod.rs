pub mod authentication;
pub mod claims;
pub mod classification;
pub mod config;
pub mod error;
pub mod organisation;
pub mod user_info;

pub use self::authentication::{
    AuthenticationConverter, QuickcaseAuthentication, UserInfoSource, VerifiedToken,
};
pub use self::config::OidcConfig;
pub use self::error::AuthenticationError;
