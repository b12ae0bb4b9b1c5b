pub mod claims;
pub mod codec;
pub mod errors;

pub use claims::GenericIntent;
pub use claims::TokenClaims;
pub use claims::TokenKind;
pub use claims::TokenPurpose;
pub use codec::TokenCodec;
pub use errors::TokenError;
