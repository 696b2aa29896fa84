#[cfg(test)]
pub mod common;

pub mod account_linking;
pub mod oauth_flow;
