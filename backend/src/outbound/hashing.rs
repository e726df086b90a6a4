//! bcrypt-backed `PasswordHasher` adapter.
//!
//! Each call draws a fresh salt, so hashing the same password twice yields
//! two different digests that both verify.

use crate::domain::ports::{PasswordHashError, PasswordHasher};
use crate::domain::{Password, PasswordDigest};

/// Work factor used when none is configured.
pub const DEFAULT_BCRYPT_COST: u32 = 10;

const MIN_COST: u32 = 4;
const MAX_COST: u32 = 31;

/// bcrypt with a fixed work factor.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// Create a hasher, rejecting costs bcrypt does not support.
    pub fn new(cost: u32) -> Result<Self, PasswordHashError> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(PasswordHashError::hash(format!(
                "bcrypt cost {cost} outside {}..={}",
                MIN_COST,
                MAX_COST
            )));
        }
        Ok(Self { cost })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self {
            cost: DEFAULT_BCRYPT_COST,
        }
    }
}

impl PasswordHasher for BcryptPasswordHasher {
    fn hash(&self, password: &Password) -> Result<PasswordDigest, PasswordHashError> {
        let encoded = bcrypt::hash(password.expose(), self.cost)
            .map_err(|err| PasswordHashError::hash(err.to_string()))?;
        PasswordDigest::new(encoded).map_err(|err| PasswordHashError::hash(err.to_string()))
    }

    fn verify(
        &self,
        password: &Password,
        digest: &PasswordDigest,
    ) -> Result<bool, PasswordHashError> {
        bcrypt::verify(password.expose(), digest.as_str())
            .map_err(|err| PasswordHashError::malformed_digest(err.to_string()))
    }
}
