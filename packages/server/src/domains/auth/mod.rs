//! Auth domain - verifies bearer tokens issued for viewers
//!
//! Tokens are HS256 JWTs whose `sub` claim is the viewer identity used by
//! the posts domain for likes, authorship and deletion rights.

pub mod jwt;

pub use jwt::{Claims, JwtService};
