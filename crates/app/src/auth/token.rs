//! API token format and verifier hashing.
//!
//! Tokens look like `sf_v1_<token uuid>.<64 hex chars of secret>`. Only a
//! SHA-256 digest bound to the token and its owner is ever stored.

use std::{fmt, str::FromStr};

use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;
use zeroize::Zeroize;

use crate::domain::users::records::UserUuid;

/// API token identifier prefix.
pub const API_TOKEN_PREFIX: &str = "sf";

/// Number of secret bytes encoded in a token.
pub const API_TOKEN_SECRET_BYTES: usize = 32;

const API_TOKEN_SECRET_HEX_CHARS: usize = API_TOKEN_SECRET_BYTES * 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiTokenVersion {
    V1,
}

impl ApiTokenVersion {
    #[must_use]
    pub const fn as_i16(self) -> i16 {
        match self {
            Self::V1 => 1,
        }
    }

    #[must_use]
    pub const fn segment(self) -> &'static str {
        match self {
            Self::V1 => "v1",
        }
    }
}

impl TryFrom<i16> for ApiTokenVersion {
    type Error = ApiTokenError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::V1),
            _ => Err(ApiTokenError::UnsupportedVersion),
        }
    }
}

impl FromStr for ApiTokenVersion {
    type Err = ApiTokenError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "v1" => Ok(Self::V1),
            _ => Err(ApiTokenError::UnsupportedVersion),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiTokenError {
    #[error("api token format is invalid")]
    InvalidFormat,

    #[error("api token uses an unsupported version")]
    UnsupportedVersion,

    #[error("api token secret encoding is invalid")]
    InvalidSecretEncoding,
}

/// A raw bearer token. The secret is wiped from memory on drop.
#[derive(Clone)]
pub struct ApiToken {
    uuid: Uuid,
    version: ApiTokenVersion,
    secret: [u8; API_TOKEN_SECRET_BYTES],
}

impl ApiToken {
    /// Generate a token with a fresh identifier and random secret.
    #[must_use]
    pub fn generate() -> Self {
        let mut secret = [0_u8; API_TOKEN_SECRET_BYTES];

        OsRng.fill_bytes(&mut secret);

        Self {
            uuid: Uuid::now_v7(),
            version: ApiTokenVersion::V1,
            secret,
        }
    }

    #[must_use]
    pub const fn uuid(&self) -> Uuid {
        self.uuid
    }

    #[must_use]
    pub const fn version(&self) -> ApiTokenVersion {
        self.version
    }

    /// Hex SHA-256 over `{token_uuid}:{version}:{user_uuid}:{secret}`.
    ///
    /// Binding the owner into the digest means a stored hash cannot be moved
    /// to another user's row.
    #[must_use]
    pub fn digest(&self, user: UserUuid) -> String {
        let mut hasher = Sha256::new();

        hasher.update(self.uuid.simple().to_string());
        hasher.update(b":");
        hasher.update(self.version.as_i16().to_string());
        hasher.update(b":");
        hasher.update(user.into_uuid().simple().to_string());
        hasher.update(b":");
        hasher.update(self.secret);

        format!("{:x}", hasher.finalize())
    }

    /// Compare this token against a stored digest without short-circuiting.
    #[must_use]
    pub fn matches(&self, user: UserUuid, stored_digest: &str) -> bool {
        let digest = self.digest(user);

        digest.len() == stored_digest.len()
            && digest
                .bytes()
                .zip(stored_digest.bytes())
                .fold(0_u8, |diff, (a, b)| diff | (a ^ b))
                == 0
    }
}

impl fmt::Display for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{API_TOKEN_PREFIX}_{}_{}.",
            self.version.segment(),
            self.uuid.simple()
        )?;

        for byte in self.secret {
            write!(f, "{byte:02x}")?;
        }

        Ok(())
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiToken")
            .field("uuid", &self.uuid)
            .field("version", &self.version)
            .field("secret", &"**redacted**")
            .finish()
    }
}

impl FromStr for ApiToken {
    type Err = ApiTokenError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let (identifier, secret_hex) = token.split_once('.').ok_or(ApiTokenError::InvalidFormat)?;

        let mut parts = identifier.splitn(3, '_');

        let prefix = parts.next().ok_or(ApiTokenError::InvalidFormat)?;
        let version = parts.next().ok_or(ApiTokenError::InvalidFormat)?;
        let uuid = parts.next().ok_or(ApiTokenError::InvalidFormat)?;

        if prefix != API_TOKEN_PREFIX {
            return Err(ApiTokenError::InvalidFormat);
        }

        Ok(Self {
            version: version.parse()?,
            uuid: Uuid::try_parse(uuid).map_err(|_invalid| ApiTokenError::InvalidFormat)?,
            secret: decode_secret(secret_hex).ok_or(ApiTokenError::InvalidSecretEncoding)?,
        })
    }
}

impl Drop for ApiToken {
    fn drop(&mut self) {
        self.secret.zeroize();
    }
}

fn decode_secret(secret_hex: &str) -> Option<[u8; API_TOKEN_SECRET_BYTES]> {
    if secret_hex.len() != API_TOKEN_SECRET_HEX_CHARS || !secret_hex.is_ascii() {
        return None;
    }

    let mut secret = [0_u8; API_TOKEN_SECRET_BYTES];

    for (byte, pair) in secret.iter_mut().zip(secret_hex.as_bytes().chunks_exact(2)) {
        let pair = std::str::from_utf8(pair).ok()?;

        *byte = u8::from_str_radix(pair, 16).ok()?;
    }

    Some(secret)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn formatted_token_parses_back() -> TestResult {
        let token = ApiToken::generate();
        let parsed: ApiToken = token.to_string().parse()?;

        assert_eq!(parsed.uuid(), token.uuid());
        assert_eq!(parsed.version(), ApiTokenVersion::V1);
        assert_eq!(parsed.secret, token.secret);

        Ok(())
    }

    #[test]
    fn formatted_token_has_expected_shape() {
        let token = ApiToken::generate().to_string();

        assert!(token.starts_with("sf_v1_"));
        assert_eq!(token.split_once('.').map(|(_, secret)| secret.len()), Some(64));
    }

    #[test]
    fn rejects_foreign_prefix_and_bad_secret() {
        let uuid = Uuid::nil().simple();
        let secret = "ab".repeat(API_TOKEN_SECRET_BYTES);

        assert_eq!(
            format!("lt_v1_{uuid}.{secret}").parse::<ApiToken>().err(),
            Some(ApiTokenError::InvalidFormat)
        );
        assert_eq!(
            format!("sf_v9_{uuid}.{secret}").parse::<ApiToken>().err(),
            Some(ApiTokenError::UnsupportedVersion)
        );
        assert_eq!(
            format!("sf_v1_{uuid}.zz").parse::<ApiToken>().err(),
            Some(ApiTokenError::InvalidSecretEncoding)
        );
    }

    #[test]
    fn digest_is_bound_to_owner() {
        let token = ApiToken::generate();
        let owner = UserUuid::new();
        let digest = token.digest(owner);

        assert!(token.matches(owner, &digest));
        assert!(!token.matches(UserUuid::new(), &digest));
        assert!(!ApiToken::generate().matches(owner, &digest));
    }

    #[test]
    fn debug_output_redacts_secret() {
        let token = ApiToken::generate();
        let debug = format!("{token:?}");

        assert!(debug.contains("**redacted**"));
        assert!(!debug.contains(&token.to_string()));
    }
}
