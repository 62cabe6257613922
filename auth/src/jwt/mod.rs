pub mod claims;
pub mod errors;
pub mod manager;

pub use claims::TokenClaims;
pub use errors::JwtError;
pub use manager::TokenManager;
