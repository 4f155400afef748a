//! Identity from a credential whose signature was already checked.
//!
//! The first identity claim *present* decides: a `user_id` that is blank or of an
//! unusable JSON type is not skipped in favour of a lower-priority claim, it makes
//! the credential carry no identity at all. A `null` claim counts as absent.
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::config::VerifiedAuthConfig;
use crate::services::identity::claims::claim_as_string;

/// Claims checked on a verified credential, highest priority first.
/// The subject is the fallback when none of them is present.
pub const VERIFIED_IDENTITY_CLAIMS: [&str; 3] = ["user_id", "preferred_username", "email"];

/// A credential whose integrity was already established by a trust layer.
pub trait VerifiedCredential {
    fn claim(&self, name: &str) -> Option<&Value>;
    fn subject(&self) -> &str;
}

/// Reads the caller identity from a verified credential.
///
/// `None` when the deciding claim is present but unusable, or when the fallback
/// subject is blank.
pub fn identity_from_verified(credential: &impl VerifiedCredential) -> Option<String> {
    let deciding = VERIFIED_IDENTITY_CLAIMS
        .iter()
        .find_map(|name| credential.claim(name).filter(|v| !v.is_null()));

    match deciding {
        Some(value) => claim_as_string(value),
        None => Some(credential.subject())
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string),
    }
}

/// Decoded claims of a signature-verified access token.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifiedClaims {
    pub sub: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VerifiedCredential for VerifiedClaims {
    fn claim(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }

    fn subject(&self) -> &str {
        &self.sub
    }
}

/// Access-token verifier (signature + iss/aud/exp/nbf).
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct AccessTokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for AccessTokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessTokenVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl AccessTokenVerifier {
    pub fn from_config(config: &VerifiedAuthConfig) -> Result<Self, jsonwebtoken::errors::Error> {
        let pem = config.public_key_pem.as_bytes();
        let decoding_key = match config.algorithm {
            Algorithm::EdDSA => DecodingKey::from_ed_pem(pem)?,
            Algorithm::ES256 | Algorithm::ES384 => DecodingKey::from_ec_pem(pem)?,
            _ => DecodingKey::from_rsa_pem(pem)?,
        };

        Ok(Self::new(
            decoding_key,
            config.algorithm,
            &config.issuer,
            &config.audience,
            config.leeway_seconds,
        ))
    }

    pub fn new(
        decoding_key: DecodingKey,
        algorithm: Algorithm,
        issuer: &str,
        audience: &str,
        leeway_seconds: u64,
    ) -> Self {
        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.validate_nbf = true;
        validation.leeway = leeway_seconds;

        Self {
            decoding_key,
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<VerifiedClaims, jsonwebtoken::errors::Error> {
        let data =
            jsonwebtoken::decode::<VerifiedClaims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }
}
