use std::collections::HashMap;
use std::fmt;

use argon2::{
    password_hash::SaltString, Algorithm, Argon2, Params, PasswordHash, PasswordHasher,
    PasswordVerifier, Version,
};

use crate::errors::internal::CryptoError;
use crate::errors::InternalError;

/// One-way password hashing used by the member aggregate
///
/// `encode` produces a salted hash; `matches` checks a raw candidate against a
/// previously encoded value. Implementations never return the raw input.
pub trait PasswordEncoder: Send + Sync {
    fn encode(&self, raw_password: &str) -> Result<String, InternalError>;

    fn matches(&self, raw_password: &str, encoded_password: &str) -> bool;
}

/// Argon2id hasher with the application pepper supplied as the Argon2 secret
pub struct Argon2PasswordEncoder {
    pepper: String,
}

impl Argon2PasswordEncoder {
    pub fn new(pepper: impl Into<String>) -> Self {
        Self { pepper: pepper.into() }
    }

    fn argon2(&self) -> Result<Argon2<'_>, CryptoError> {
        Argon2::new_with_secret(
            self.pepper.as_bytes(),
            Algorithm::Argon2id,
            Version::V0x13,
            Params::default(),
        )
        .map_err(|e| CryptoError::password_hash("argon2", "init", e))
    }
}

impl PasswordEncoder for Argon2PasswordEncoder {
    fn encode(&self, raw_password: &str) -> Result<String, InternalError> {
        let salt = SaltString::generate(&mut rand_core::OsRng);
        let hash = self
            .argon2()?
            .hash_password(raw_password.as_bytes(), &salt)
            .map_err(|e| CryptoError::password_hash("argon2", "encode", e))?
            .to_string();
        Ok(hash)
    }

    fn matches(&self, raw_password: &str, encoded_password: &str) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(encoded_password) else {
            return false;
        };
        let Ok(argon2) = self.argon2() else {
            return false;
        };
        argon2
            .verify_password(raw_password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

impl fmt::Debug for Argon2PasswordEncoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Argon2PasswordEncoder")
            .field("pepper", &"<redacted>")
            .finish()
    }
}

const ID_PREFIX: char = '{';
const ID_SUFFIX: char = '}';

/// Encoder that tags every hash with the id of the algorithm that produced it
///
/// Stored values look like `{argon2}$argon2id$v=19$...`. New hashes always use
/// the default id; `matches` picks the delegate from the stored tag, so hashes
/// without a known tag never match.
pub struct DelegatingPasswordEncoder {
    id_for_encode: &'static str,
    delegates: HashMap<&'static str, Box<dyn PasswordEncoder>>,
}

impl DelegatingPasswordEncoder {
    pub const ARGON2_ID: &'static str = "argon2";

    pub fn new(
        id_for_encode: &'static str,
        delegates: HashMap<&'static str, Box<dyn PasswordEncoder>>,
    ) -> Result<Self, InternalError> {
        if !delegates.contains_key(id_for_encode) {
            return Err(CryptoError::password_hash(
                "delegating_encoder",
                "init",
                format!("no delegate registered for id '{}'", id_for_encode),
            )
            .into());
        }
        Ok(Self { id_for_encode, delegates })
    }

    /// Default application encoder: Argon2id keyed with `pepper`
    pub fn with_pepper(pepper: impl Into<String>) -> Self {
        let mut delegates: HashMap<&'static str, Box<dyn PasswordEncoder>> = HashMap::new();
        delegates.insert(Self::ARGON2_ID, Box::new(Argon2PasswordEncoder::new(pepper)));
        Self {
            id_for_encode: Self::ARGON2_ID,
            delegates,
        }
    }

    fn split_id(encoded_password: &str) -> Option<(&str, &str)> {
        let rest = encoded_password.strip_prefix(ID_PREFIX)?;
        rest.split_once(ID_SUFFIX)
    }
}

impl PasswordEncoder for DelegatingPasswordEncoder {
    fn encode(&self, raw_password: &str) -> Result<String, InternalError> {
        let delegate = self.delegates.get(self.id_for_encode).ok_or_else(|| {
            CryptoError::password_hash("delegating_encoder", "encode", "default delegate missing")
        })?;
        let hash = delegate.encode(raw_password)?;
        Ok(format!("{ID_PREFIX}{}{ID_SUFFIX}{hash}", self.id_for_encode))
    }

    fn matches(&self, raw_password: &str, encoded_password: &str) -> bool {
        match Self::split_id(encoded_password) {
            Some((id, hash)) => self
                .delegates
                .get(id)
                .is_some_and(|delegate| delegate.matches(raw_password, hash)),
            None => {
                tracing::debug!("Stored password has no encoder id, refusing to match");
                false
            }
        }
    }
}

impl fmt::Debug for DelegatingPasswordEncoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<_> = self.delegates.keys().collect();
        ids.sort();
        f.debug_struct("DelegatingPasswordEncoder")
            .field("id_for_encode", &self.id_for_encode)
            .field("delegates", &ids)
            .finish()
    }
}
