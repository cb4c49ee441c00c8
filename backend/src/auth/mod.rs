//! Authentication module
//!
//! Provides salted password hashing, JWT issuance/validation, and the
//! request extractor for protected routes.

mod hashing;
mod middleware;
mod token;

pub use hashing::{
    generate_salt, Argon2HashingService, HashingAlgorithm, HashingError, HashingService,
    Sha256HashingService, SALT_BYTES,
};
pub use middleware::AuthUser;
pub use token::{Claims, JwtKeys, TokenClaims, TokenConfig, TokenService, TokenVerification};
