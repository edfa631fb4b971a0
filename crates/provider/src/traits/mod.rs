//! Traits for the provider module.

mod error;
pub use error::{ProviderError, ProviderResult};

mod token;
#[cfg(any(test, feature = "test-utils"))]
pub use token::MockTokenReader;
pub use token::TokenReader;

mod account;
#[cfg(any(test, feature = "test-utils"))]
pub use account::MockSmartAccount;
pub use account::SmartAccount;

mod paymaster;
#[cfg(any(test, feature = "test-utils"))]
pub use paymaster::MockPaymaster;
pub use paymaster::Paymaster;

mod bundler;
#[cfg(any(test, feature = "test-utils"))]
pub use bundler::MockBundler;
pub use bundler::Bundler;
