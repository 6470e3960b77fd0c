//! Percent-encoding (RFC 5849 §3.6) and URI normalization (RFC 5849 §3.4.1.2).

// std
use std::{borrow::Cow, str::Utf8Error};
// crates.io
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use url::form_urlencoded;
// self
use crate::_prelude::*;

/// Escapes every byte except the unreserved set `ALPHA / DIGIT / "-" / "." / "_" / "~"`.
pub const OAUTH_ENCODE_SET: &AsciiSet =
	&NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Percent-encodes a UTF-8 string with uppercase hex digits.
pub fn percent_encode(value: &str) -> String {
	utf8_percent_encode(value, OAUTH_ENCODE_SET).to_string()
}

/// Reverses [`percent_encode`]. `+` is kept literally.
pub fn percent_decode(value: &str) -> Result<String, Utf8Error> {
	percent_decode_str(value).decode_utf8().map(Cow::into_owned)
}

/// Encodes `name=value` pairs joined by `&`, in the given order.
pub fn encode_pairs<'a, I>(pairs: I) -> String
where
	I: IntoIterator<Item = (&'a str, &'a str)>,
{
	let mut buf = String::new();

	for (idx, (name, value)) in pairs.into_iter().enumerate() {
		if idx > 0 {
			buf.push('&');
		}

		buf.push_str(&percent_encode(name));
		buf.push('=');
		buf.push_str(&percent_encode(value));
	}

	buf
}

/// Decodes an `application/x-www-form-urlencoded` string (`+` becomes a space, a missing `=`
/// yields an empty value).
pub fn parse_form(body: &str) -> Vec<(String, String)> {
	form_urlencoded::parse(body.as_bytes()).into_owned().collect()
}

/// Base string URI: lowercase scheme and host, the port only when it is not the scheme
/// default, and the path. Query and fragment are dropped.
pub fn base_string_uri(url: &Url) -> String {
	let mut uri = format!("{}://{}", url.scheme(), url.host_str().unwrap_or_default());

	if let Some(port) = url.port() {
		uri.push(':');
		uri.push_str(&port.to_string());
	}

	uri.push_str(url.path());

	uri
}
