//! Storage contracts and built-in store implementations for access grants.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	auth::{AccessGrant, AccountId, ProviderId},
};

/// Boxed future returned by [`CredentialStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend contract for persisted access grants.
pub trait CredentialStore
where
	Self: Send + Sync,
{
	/// Persists or replaces the grant stored under `key`.
	fn save(&self, key: StoreKey, grant: AccessGrant) -> StoreFuture<'_, ()>;

	/// Fetches the grant stored under `key`, if present.
	fn fetch<'a>(&'a self, key: &'a StoreKey) -> StoreFuture<'a, Option<AccessGrant>>;

	/// Removes and returns the grant stored under `key`, if present.
	fn remove<'a>(&'a self, key: &'a StoreKey) -> StoreFuture<'a, Option<AccessGrant>>;
}

/// Error type produced by [`CredentialStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Unique key identifying a stored grant: which provider issued it, for which account.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoreKey {
	/// Issuing provider.
	pub provider: ProviderId,
	/// Caller-chosen account identifier.
	pub account: AccountId,
}
impl StoreKey {
	/// Builds a key for the provider/account pair.
	pub fn new(provider: ProviderId, account: AccountId) -> Self {
		Self { provider, account }
	}
}
impl Display for StoreKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}/{}", self.provider, self.account)
	}
}
