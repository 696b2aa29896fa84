pub mod account;
pub mod property;

pub use account::{Account, Credential};
pub use property::Property;
