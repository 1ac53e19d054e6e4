//! # techpack-auth
//!
//! JWT handling for TechPack. The platform's identity provider mints the
//! tokens; this crate verifies them and exposes the stable user id they
//! carry. There is no session or credential management here.

pub mod jwt;

pub use jwt::{AccessClaims, JwtDecoder, JwtEncoder};
