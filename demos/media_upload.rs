//! Uploads an image with a multipart request and attaches it to a new status.
//!
//! Requires `TWITTER_CONSUMER_KEY`, `TWITTER_CONSUMER_SECRET`, `TWITTER_ACCESS_TOKEN`, and
//! `TWITTER_ACCESS_TOKEN_SECRET`. Usage: `cargo run --example media_upload -- <image> [text]`.

// std
use std::{env, fs, path::Path};
// crates.io
use color_eyre::{Result, eyre::eyre};
use serde_json::Value;
// self
use twitter_oauth1::{
	config::ClientConfig,
	flows::ReqwestOAuthClient,
	provider::ServiceProviderDescription,
	request::{MultipartForm, ResourceRequest},
	twitter,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let mut args = env::args().skip(1);
	let image = args.next().ok_or_else(|| eyre!("Pass the path of the image to upload."))?;
	let text = args.next().unwrap_or_else(|| "Uploaded with twitter-oauth1.".into());
	let config = ClientConfig::from_env()?;
	let client =
		ReqwestOAuthClient::new(ServiceProviderDescription::twitter()?, config.credential()?);
	let path = Path::new(&image);
	let file_name = path.file_name().and_then(|name| name.to_str()).unwrap_or("upload.bin");
	let form = MultipartForm::new().file("media", file_name, mime_for(path), fs::read(path)?);
	let upload = client
		.send(ResourceRequest::post(twitter::upload_url("media/upload.json")?).multipart(form))
		.await?;
	let media: Value = serde_json::from_slice(&upload.body)?;
	let media_id = media
		.get("media_id_string")
		.and_then(Value::as_str)
		.ok_or_else(|| eyre!("Upload response did not carry media_id_string: {media}"))?;

	println!("Uploaded media {media_id}.");

	let status = client
		.send(
			ResourceRequest::post(twitter::api_url("statuses/update.json")?)
				.param("status", text)
				.param("media_ids", media_id),
		)
		.await?;

	println!("statuses/update ({}): {}", status.status, status.text());

	Ok(())
}

fn mime_for(path: &Path) -> &'static str {
	match path.extension().and_then(|ext| ext.to_str()) {
		Some("png") => "image/png",
		Some("gif") => "image/gif",
		Some("jpg" | "jpeg") => "image/jpeg",
		_ => "application/octet-stream",
	}
}
