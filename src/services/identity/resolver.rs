use crate::services::identity::{
    Caller, Identity, IdentityError, IdentityResolver, bearer_token,
    claims::extract_unverified_identity,
    verified::{AccessTokenVerifier, identity_from_verified},
};

/// Reads identity claims straight out of the payload segment. No signature check.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnverifiedClaimsResolver;

impl IdentityResolver for UnverifiedClaimsResolver {
    fn mode(&self) -> &'static str {
        "unverified"
    }

    fn resolve(&self, authorization: Option<&str>) -> Result<Caller, IdentityError> {
        let token = bearer_token(authorization)?;
        let identity = extract_unverified_identity(token).ok_or(IdentityError::NoIdentity)?;
        Ok(Caller::new(Identity::new(identity), token))
    }
}

/// Verifies the access token first, then applies the verified-claim priority.
#[derive(Debug, Clone)]
pub struct VerifiedJwtResolver {
    verifier: AccessTokenVerifier,
}

impl VerifiedJwtResolver {
    pub fn new(verifier: AccessTokenVerifier) -> Self {
        Self { verifier }
    }
}

impl IdentityResolver for VerifiedJwtResolver {
    fn mode(&self) -> &'static str {
        "verified"
    }

    fn resolve(&self, authorization: Option<&str>) -> Result<Caller, IdentityError> {
        let token = bearer_token(authorization)?;
        let claims = self.verifier.verify(token)?;
        let identity = identity_from_verified(&claims).ok_or(IdentityError::NoIdentity)?;
        Ok(Caller::new(Identity::new(identity), token))
    }
}
