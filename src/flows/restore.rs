// self
use crate::{
	_prelude::*,
	auth::AccessGrant,
	flows::OAuthClient,
	http::OAuthHttpClient,
	oauth::TransportErrorMapper,
	obs::{self, FlowKind},
};

impl<C, M> OAuthClient<C, M>
where
	C: ?Sized + OAuthHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Loads the persisted grant for the attached account and moves the credential to `Access`.
	///
	/// Returns `Ok(None)` and leaves the credential untouched when nothing is stored.
	pub async fn restore(&self) -> Result<Option<AccessGrant>> {
		obs::observe(FlowKind::Restore, "restore", async move {
			let (store, key) = self.attached_store()?;
			let Some(grant) = store.fetch(&key).await? else {
				return Ok(None);
			};

			#[cfg(feature = "tracing")]
			tracing::debug!(key = %key, "restored access grant");

			self.credential.write().set_access_token(grant.token.clone());

			Ok(Some(grant))
		})
		.await
	}
}
