//! Share link issuance and anonymous resolution.

pub mod access;
pub mod service;
pub mod token;

pub use access::AccessService;
pub use service::ShareService;
pub use token::TokenGenerator;
