/// Factory: build the configured `IdentityResolver` from application `Config`.
use std::sync::Arc;

use crate::config::{Config, ConfigError, IdentityMode};
use crate::services::identity::{
    IdentityResolver, UnverifiedClaimsResolver, VerifiedJwtResolver,
    verified::AccessTokenVerifier,
};

pub fn build_identity_resolver(config: &Config) -> Result<Arc<dyn IdentityResolver>, ConfigError> {
    match config.identity_mode {
        IdentityMode::Unverified => {
            tracing::warn!(
                "IDENTITY_MODE=unverified: bearer token signatures are NOT checked; \
                 deploy only behind a perimeter that authenticates callers"
            );
            Ok(Arc::new(UnverifiedClaimsResolver))
        }
        IdentityMode::Verified => {
            let auth = config
                .verified_auth
                .as_ref()
                .ok_or(ConfigError::Missing("AUTH_ISSUER"))?;

            let verifier = AccessTokenVerifier::from_config(auth).map_err(|err| {
                tracing::error!(error = %err, "failed to load access token public key");
                ConfigError::Invalid("ACCESS_JWT_PUBLIC_KEY_PEM")
            })?;

            Ok(Arc::new(VerifiedJwtResolver::new(verifier)))
        }
    }
}
