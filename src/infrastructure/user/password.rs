//! Salted password hashing with a configurable Argon2id cost

use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordHasher as _, PasswordVerifier as _, Version};
use std::fmt::Debug;

use crate::domain::DomainError;

/// Argon2 iteration count used when none is configured
pub const DEFAULT_PASSWORD_COST: u32 = Params::DEFAULT_T_COST;

/// One-way password hashing
///
/// `hash` draws a fresh salt per call and returns a PHC string carrying the
/// salt and cost parameters, so `verify` needs nothing but that string.
pub trait PasswordHasher: Send + Sync + Debug {
    fn hash(&self, password: &str) -> Result<String, DomainError>;

    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Argon2id hasher
///
/// The cost factor is the iteration count (`t`); memory and lanes stay at
/// the library defaults.
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    /// Build a hasher for the given cost; zero is rejected
    pub fn with_cost(cost: u32) -> Result<Self, DomainError> {
        let params = Params::new(Params::DEFAULT_M_COST, cost, Params::DEFAULT_P_COST, None)
            .map_err(|e| {
                DomainError::configuration(format!("Invalid password cost {}: {}", cost, e))
            })?;

        Ok(Self { params })
    }

    pub fn cost(&self) -> u32 {
        self.params.t_cost()
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DomainError::internal(format!("Failed to hash password: {}", e)))
    }

    // Parameters come from the stored string, so hashes made under an older
    // cost still verify.
    fn verify(&self, password: &str, hash: &str) -> bool {
        PasswordHash::new(hash)
            .map(|parsed| {
                self.argon2()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_with_default_cost() {
        let hasher = Argon2Hasher::default();

        let hash = hasher.hash("secret1").unwrap();

        assert_ne!(hash, "secret1");
        assert!(hash.starts_with("$argon2id$v=19$"));
        assert!(hasher.verify("secret1", &hash));
        assert!(!hasher.verify("secret2", &hash));
        assert_eq!(hasher.cost(), DEFAULT_PASSWORD_COST);
    }

    #[test]
    fn test_phc_string_records_configured_cost() {
        let hasher = Argon2Hasher::with_cost(3).unwrap();

        let hash = hasher.hash("secret1").unwrap();
        let parsed = PasswordHash::new(&hash).unwrap();
        let params = Params::try_from(&parsed).unwrap();

        assert_eq!(params.t_cost(), 3);
        assert_eq!(params.m_cost(), Params::DEFAULT_M_COST);
        assert_eq!(params.p_cost(), Params::DEFAULT_P_COST);
        assert!(hash.contains(",t=3,"));
    }

    #[test]
    fn test_hash_from_other_cost_still_verifies() {
        let old = Argon2Hasher::with_cost(1).unwrap().hash("secret1").unwrap();

        assert!(Argon2Hasher::with_cost(4).unwrap().verify("secret1", &old));
    }

    #[test]
    fn test_zero_cost_is_configuration_error() {
        assert!(matches!(
            Argon2Hasher::with_cost(0),
            Err(DomainError::Configuration { .. })
        ));
    }

    #[test]
    fn test_each_hash_gets_its_own_salt() {
        let hasher = Argon2Hasher::with_cost(1).unwrap();

        let first = hasher.hash("secret1").unwrap();
        let second = hasher.hash("secret1").unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        let hasher = Argon2Hasher::default();

        assert!(!hasher.verify("secret1", "not-a-phc-string"));
        assert!(!hasher.verify("secret1", ""));
    }
}
