pub mod claims;
pub mod errors;
pub mod issuer;
pub mod settings;
pub mod verifier;

pub use claims::Claims;
pub use errors::JwtError;
pub use issuer::TokenIssuer;
pub use settings::TokenSettings;
pub use verifier::TokenVerifier;
