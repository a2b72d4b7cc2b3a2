pub mod record;
pub mod rotator;

pub use record::{AccessToken, RefreshRecord, TokenPair};
pub use rotator::TokenRotator;
