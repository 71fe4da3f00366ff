//! HMAC JWT signing and verification

use chrono::Duration;
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::domain::entities::token::{Claims, TokenKind};
use crate::errors::{DomainError, TokenError};

use super::config::TokenServiceConfig;

/// Signs and verifies access/refresh JWTs bound to one issuer and audience
#[derive(Clone)]
pub struct SigningEngine {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: jsonwebtoken::Algorithm,
    /// Full validation: signature, exp, nbf, iss, aud
    validation: Validation,
    /// Same as `validation` but ignores expiry; used by revocation
    expiry_lenient: Validation,
    issuer: String,
    audience: String,
}

impl std::fmt::Debug for SigningEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningEngine")
            .field("algorithm", &self.algorithm)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish()
    }
}

impl SigningEngine {
    /// Creates a signing engine from the token service configuration
    ///
    /// # Returns
    ///
    /// * `Ok(SigningEngine)` - Engine ready to sign
    /// * `Err(DomainError::Config)` - No signing secret configured
    pub fn new(config: &TokenServiceConfig) -> Result<Self, DomainError> {
        if config.jwt_secret.trim().is_empty() {
            return Err(DomainError::config("JWT signing secret is not configured"));
        }

        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(config.algorithm);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = 0;

        let mut expiry_lenient = validation.clone();
        expiry_lenient.validate_exp = false;

        Ok(Self {
            encoding_key,
            decoding_key,
            algorithm: config.algorithm,
            validation,
            expiry_lenient,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
        })
    }

    /// Builds claims for `user_id` and signs them
    pub fn issue(
        &self,
        user_id: Uuid,
        kind: TokenKind,
        role: Option<String>,
        ttl: Duration,
    ) -> Result<(String, Claims), DomainError> {
        let claims = Claims::new(user_id, kind, role, ttl, &self.issuer, &self.audience);
        let token = self.sign(&claims)?;
        Ok((token, claims))
    }

    /// Encodes claims into a JWT
    pub fn sign(&self, claims: &Claims) -> Result<String, DomainError> {
        let header = Header::new(self.algorithm);
        encode(&header, claims, &self.encoding_key)
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))
    }

    /// Verifies a token and checks that it is of `expected` kind
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - The decoded claims if valid
    /// * `Err(TokenError::TokenExpired)` - `exp` has passed
    /// * `Err(TokenError::InvalidTokenFormat)` - Bad signature, structure, issuer or audience
    /// * `Err(TokenError::KindMismatch)` - Valid token of the other kind
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims, DomainError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                JwtErrorKind::ExpiredSignature => DomainError::Token(TokenError::TokenExpired),
                _ => DomainError::Token(TokenError::InvalidTokenFormat),
            })?
            .claims;

        if claims.kind != expected {
            return Err(DomainError::Token(TokenError::KindMismatch {
                expected,
                actual: claims.kind,
            }));
        }

        Ok(claims)
    }

    /// Decodes a signature-valid token without enforcing `exp`
    pub fn decode_ignoring_expiry(&self, token: &str) -> Result<Claims, DomainError> {
        decode::<Claims>(token, &self.decoding_key, &self.expiry_lenient)
            .map(|data| data.claims)
            .map_err(|_| DomainError::Token(TokenError::InvalidTokenFormat))
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }
}
