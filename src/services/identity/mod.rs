//! Caller identity resolution.
//!
//! Two resolvers implement [`IdentityResolver`]; one of them is picked at startup
//! from `IDENTITY_MODE` and shared by every request:
//! - [`UnverifiedClaimsResolver`]: decodes the JWT payload without checking the signature.
//! - [`VerifiedJwtResolver`]: verifies the token, then reads identity claims from it.
pub mod claims;
pub mod factory;
pub mod resolver;
pub mod verified;

use std::fmt;

use thiserror::Error;

pub use factory::build_identity_resolver;
pub use resolver::{UnverifiedClaimsResolver, VerifiedJwtResolver};

/// The string naming the caller, resolved once per inbound call.
///
/// Immutable after construction. Never taken from a request body.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity(String);

impl Identity {
    pub(crate) fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A resolved caller: who they are, plus the raw credential to forward upstream.
#[derive(Clone)]
pub struct Caller {
    identity: Identity,
    bearer: String,
    request_id: Option<String>,
}

impl Caller {
    pub fn new(identity: Identity, bearer: impl Into<String>) -> Self {
        Self {
            identity,
            bearer: bearer.into(),
            request_id: None,
        }
    }

    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn bearer(&self) -> &str {
        &self.bearer
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }
}

impl fmt::Debug for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print the credential
        f.debug_struct("Caller")
            .field("identity", &self.identity)
            .field("request_id", &self.request_id)
            .finish()
    }
}

/// Why no identity could be resolved. Every variant means "unauthenticated".
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("missing authorization header")]
    MissingHeader,
    #[error("authorization header is not a Bearer credential")]
    NotBearer,
    #[error("credential carries no usable identity claim")]
    NoIdentity,
    #[error("credential verification failed: {0}")]
    Verification(#[from] jsonwebtoken::errors::Error),
}

/// Turns the raw `Authorization` header value into a [`Caller`].
///
/// Implementations are stateless apart from immutable key material and
/// must be safe to share across concurrent requests.
pub trait IdentityResolver: Send + Sync {
    /// Short name for logs.
    fn mode(&self) -> &'static str;

    fn resolve(&self, authorization: Option<&str>) -> Result<Caller, IdentityError>;
}

/// Strips the `Bearer ` prefix (case-sensitive, single space).
pub fn bearer_token(authorization: Option<&str>) -> Result<&str, IdentityError> {
    let header = authorization.ok_or(IdentityError::MissingHeader)?;
    header
        .strip_prefix("Bearer ")
        .ok_or(IdentityError::NotBearer)
}
