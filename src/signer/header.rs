//! `Authorization: OAuth ...` header assembly and parsing (RFC 5849 §3.5.1).

// self
use crate::{
	_prelude::*,
	signer::encode::{percent_decode, percent_encode},
};

const SCHEME: &str = "OAuth";

/// Errors raised while parsing an OAuth `Authorization` header.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum HeaderParseError {
	/// The value does not start with the `OAuth` scheme.
	#[error("Authorization header does not use the OAuth scheme.")]
	MissingScheme,
	/// A parameter is not of the form `name="value"`.
	#[error("Malformed Authorization header parameter: {segment}.")]
	MalformedParameter {
		/// Offending segment.
		segment: String,
	},
	/// A parameter value is not valid percent-encoded UTF-8.
	#[error("Authorization header parameter `{name}` is not valid percent-encoded UTF-8.")]
	InvalidEncoding {
		/// Parameter name.
		name: String,
	},
}

/// Protocol parameters (including `oauth_signature`) plus an optional realm.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationHeader {
	realm: Option<String>,
	params: Vec<(String, String)>,
}
impl AuthorizationHeader {
	/// Builds a header; parameters are kept sorted by name.
	pub fn new<I>(realm: Option<String>, params: I) -> Self
	where
		I: IntoIterator<Item = (String, String)>,
	{
		let mut params = params.into_iter().collect::<Vec<_>>();

		params.sort();

		Self { realm, params }
	}

	/// Parses a header value such as `OAuth realm="Photos", oauth_consumer_key="..."`.
	pub fn parse(value: &str) -> Result<Self, HeaderParseError> {
		let value = value.trim();
		let rest = match value.get(..SCHEME.len()) {
			Some(scheme) if scheme.eq_ignore_ascii_case(SCHEME) => &value[SCHEME.len()..],
			_ => return Err(HeaderParseError::MissingScheme),
		};

		if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
			return Err(HeaderParseError::MissingScheme);
		}

		let mut realm = None;
		let mut params = Vec::new();

		for (name, raw) in tokenize(rest)? {
			if name == "realm" {
				realm = Some(raw);

				continue;
			}

			let decoded_name = percent_decode(&name)
				.map_err(|_| HeaderParseError::InvalidEncoding { name: name.clone() })?;
			let decoded_value = percent_decode(&raw)
				.map_err(|_| HeaderParseError::InvalidEncoding { name: name.clone() })?;

			params.push((decoded_name, decoded_value));
		}

		Ok(Self::new(realm, params))
	}

	/// Optional `realm` value.
	pub fn realm(&self) -> Option<&str> {
		self.realm.as_deref()
	}

	/// Protocol parameters sorted by name.
	pub fn params(&self) -> &[(String, String)] {
		&self.params
	}

	/// Looks up a protocol parameter.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.params.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
	}

	/// The `oauth_signature` value, if present.
	pub fn signature(&self) -> Option<&str> {
		self.get("oauth_signature")
	}

	/// Protocol parameters that feed the signature base string (everything but the
	/// signature itself).
	pub fn signed_params(&self) -> impl Iterator<Item = (&str, &str)> {
		self.params
			.iter()
			.filter(|(name, _)| name != "oauth_signature")
			.map(|(name, value)| (name.as_str(), value.as_str()))
	}
}
impl Display for AuthorizationHeader {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(SCHEME)?;
		f.write_str(" ")?;

		let mut first = true;

		if let Some(realm) = &self.realm {
			f.write_str("realm=\"")?;

			for c in realm.chars() {
				if matches!(c, '"' | '\\') {
					f.write_str("\\")?;
				}

				write!(f, "{c}")?;
			}

			f.write_str("\"")?;

			first = false;
		}

		for (name, value) in &self.params {
			if !first {
				f.write_str(", ")?;
			}

			write!(f, "{}=\"{}\"", percent_encode(name), percent_encode(value))?;

			first = false;
		}

		Ok(())
	}
}
impl FromStr for AuthorizationHeader {
	type Err = HeaderParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

/// Splits `name="value", ...` into pairs, honouring quoted-string escapes.
fn tokenize(input: &str) -> Result<Vec<(String, String)>, HeaderParseError> {
	let malformed = |at: &str| HeaderParseError::MalformedParameter {
		segment: at.split(',').next().unwrap_or(at).trim().to_owned(),
	};
	let mut pairs = Vec::new();
	let mut rest = input.trim_start_matches(|c: char| c == ',' || c.is_whitespace());

	while !rest.is_empty() {
		let (name, after) = rest.split_once('=').ok_or_else(|| malformed(rest))?;

		if name.contains(',') {
			return Err(malformed(rest));
		}

		let after = after.trim_start();
		let Some(body) = after.strip_prefix('"') else {
			return Err(malformed(rest));
		};
		let mut value = String::new();
		let mut chars = body.char_indices();
		let mut end = None;

		while let Some((i, c)) = chars.next() {
			match c {
				'\\' => match chars.next() {
					Some((_, escaped)) => value.push(escaped),
					None => break,
				},
				'"' => {
					end = Some(i + 1);

					break;
				},
				_ => value.push(c),
			}
		}

		let Some(end) = end else {
			return Err(malformed(rest));
		};

		pairs.push((name.trim().to_owned(), value));

		let tail = body[end..].trim_start();

		if !tail.is_empty() && !tail.starts_with(',') {
			return Err(malformed(rest));
		}

		rest = tail.trim_start_matches(|c: char| c == ',' || c.is_whitespace());
	}

	Ok(pairs)
}
