//! Interactive PIN-based (out-of-band) authorization against Twitter.
//!
//! The example reads `TWITTER_CONSUMER_KEY` / `TWITTER_CONSUMER_SECRET` from the
//! environment, prints the authorize URL, waits for the PIN shown by Twitter, exchanges it for
//! an access token persisted in a local file store, and verifies the credentials with a signed
//! call.

// std
use std::{
	io::{self, Write},
	sync::Arc,
};
// crates.io
use color_eyre::Result;
// self
use twitter_oauth1::{
	auth::{AccountId, TokenKind},
	config::ClientConfig,
	flows::ReqwestOAuthClient,
	provider::ServiceProviderDescription,
	request::ResourceRequest,
	store::FileStore,
	twitter,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let config = ClientConfig::from_env()?;
	let account = prompt_with_default("Account label for the saved token", Some("default"))?;
	let store_path = prompt_with_default("Token store path", Some("twitter-tokens.json"))?;
	let store = Arc::new(FileStore::open(store_path)?);
	let client = ReqwestOAuthClient::new(ServiceProviderDescription::twitter()?, config.credential()?)
		.with_store(store, AccountId::new(account)?);

	if client.token_kind() != TokenKind::Access && client.restore().await?.is_none() {
		client.request_token(config.callback.as_deref()).await?;

		println!("Authorize URL: {}", client.authorize_url()?);
		println!("Open the URL, approve the application, and paste the PIN Twitter shows.");

		let pin = prompt_with_default("PIN", None)?;
		let grant = client.access_token(&pin).await?;

		println!(
			"Authorized as @{} (user id {}).",
			grant.screen_name.as_deref().unwrap_or("unknown"),
			grant.user_id.as_deref().unwrap_or("unknown")
		);
	} else {
		println!("Reusing the saved access token.");
	}

	let response = client
		.send(
			ResourceRequest::get(twitter::api_url("account/verify_credentials.json")?)
				.param("skip_status", "true"),
		)
		.await?;

	println!("verify_credentials ({}): {}", response.status, response.text());

	if let Some(rate_limit) = response.rate_limit {
		println!(
			"Rate limit: {}/{} remaining, resets at {}.",
			rate_limit.remaining, rate_limit.limit, rate_limit.reset
		);
	}

	Ok(())
}

fn prompt_with_default(message: &str, default: Option<&str>) -> Result<String> {
	loop {
		if let Some(value) = default {
			print!("{message} [{value}]: ");
		} else {
			print!("{message}: ");
		}

		io::stdout().flush()?;

		let mut input = String::new();

		io::stdin().read_line(&mut input)?;

		let trimmed = input.trim();

		if trimmed.is_empty() {
			if let Some(value) = default {
				return Ok(value.to_owned());
			}
		} else {
			return Ok(trimmed.to_owned());
		}
	}
}
