pub mod client;
pub mod token;

pub use client::OAuthClient;
pub use token::{Authorized, TokenResponse};
