//! Resource request description and the prepared (signed, ready-to-send) form.

// crates.io
use http::{
	HeaderMap, HeaderValue,
	header::{AUTHORIZATION, CONTENT_TYPE},
};
// self
use crate::{
	_prelude::*,
	error::ConfigError,
	signer::{AuthorizationHeader, encode},
};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP methods used by OAuth endpoints and resource requests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
	/// `GET`.
	#[default]
	Get,
	/// `POST`.
	Post,
	/// `PUT`.
	Put,
	/// `DELETE`.
	Delete,
}
impl HttpMethod {
	/// Uppercase method token as used in the signature base string.
	pub const fn as_str(self) -> &'static str {
		match self {
			HttpMethod::Get => "GET",
			HttpMethod::Post => "POST",
			HttpMethod::Put => "PUT",
			HttpMethod::Delete => "DELETE",
		}
	}

	/// Whether parameters travel in the entity body for this method.
	pub const fn carries_body(self) -> bool {
		matches!(self, HttpMethod::Post | HttpMethod::Put)
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl From<HttpMethod> for http::Method {
	fn from(method: HttpMethod) -> Self {
		match method {
			HttpMethod::Get => http::Method::GET,
			HttpMethod::Post => http::Method::POST,
			HttpMethod::Put => http::Method::PUT,
			HttpMethod::Delete => http::Method::DELETE,
		}
	}
}

/// Content of a single multipart part.
#[derive(Clone, PartialEq, Eq)]
pub enum PartValue {
	/// Plain text field.
	Text(String),
	/// File upload.
	File {
		/// File name reported in `Content-Disposition`.
		file_name: String,
		/// MIME type of the payload.
		content_type: String,
		/// Raw payload.
		bytes: Vec<u8>,
	},
}
impl Debug for PartValue {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			PartValue::Text(value) => f.debug_tuple("Text").field(value).finish(),
			PartValue::File { file_name, content_type, bytes } => f
				.debug_struct("File")
				.field("file_name", file_name)
				.field("content_type", content_type)
				.field("len", &bytes.len())
				.finish(),
		}
	}
}

/// Named multipart part.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormPart {
	/// Field name.
	pub name: String,
	/// Field content.
	pub value: PartValue,
}

/// `multipart/form-data` body. Its parts never take part in the signature.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MultipartForm {
	parts: Vec<FormPart>,
}
impl MultipartForm {
	/// Creates an empty form.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a text field.
	pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.parts.push(FormPart { name: name.into(), value: PartValue::Text(value.into()) });

		self
	}

	/// Appends a file part.
	pub fn file(
		mut self,
		name: impl Into<String>,
		file_name: impl Into<String>,
		content_type: impl Into<String>,
		bytes: impl Into<Vec<u8>>,
	) -> Self {
		self.parts.push(FormPart {
			name: name.into(),
			value: PartValue::File {
				file_name: file_name.into(),
				content_type: content_type.into(),
				bytes: bytes.into(),
			},
		});

		self
	}

	/// Parts in insertion order.
	pub fn parts(&self) -> &[FormPart] {
		&self.parts
	}

	/// Consumes the form and returns its parts.
	pub fn into_parts(self) -> Vec<FormPart> {
		self.parts
	}
}

/// Request parameters carried outside the query string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Payload {
	/// No body.
	#[default]
	None,
	/// `application/x-www-form-urlencoded` parameters; these are signed.
	Form(Vec<(String, String)>),
	/// `multipart/form-data` body; not signed.
	Multipart(MultipartForm),
}

/// Resource URI, method, and parameter set handed to the signer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceRequest {
	/// HTTP method.
	pub method: HttpMethod,
	/// Resource URL; any query it already carries is signed and preserved.
	pub url: Url,
	/// Extra query parameters.
	pub query: Vec<(String, String)>,
	/// Body parameters.
	pub payload: Payload,
}
impl ResourceRequest {
	/// Creates a request without parameters.
	pub fn new(method: HttpMethod, url: Url) -> Self {
		Self { method, url, query: Vec::new(), payload: Payload::None }
	}

	/// Shorthand for a `GET` request.
	pub fn get(url: Url) -> Self {
		Self::new(HttpMethod::Get, url)
	}

	/// Shorthand for a `POST` request.
	pub fn post(url: Url) -> Self {
		Self::new(HttpMethod::Post, url)
	}

	/// Adds an API parameter: the query for `GET`/`DELETE`, the form body otherwise.
	pub fn param(self, name: impl Into<String>, value: impl Into<String>) -> Self {
		if self.method.carries_body() {
			self.form_param(name, value)
		} else {
			self.query_param(name, value)
		}
	}

	/// Adds a query parameter.
	pub fn query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.query.push((name.into(), value.into()));

		self
	}

	/// Adds a form-body parameter. On a multipart request the value becomes a text part.
	pub fn form_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.payload = match self.payload {
			Payload::None => Payload::Form(vec![(name.into(), value.into())]),
			Payload::Form(mut params) => {
				params.push((name.into(), value.into()));

				Payload::Form(params)
			},
			Payload::Multipart(form) => Payload::Multipart(form.text(name, value)),
		};

		self
	}

	/// Replaces the body with a multipart form. Existing form parameters become text parts.
	pub fn multipart(mut self, form: MultipartForm) -> Self {
		let form = match std::mem::take(&mut self.payload) {
			Payload::Form(params) =>
				params.into_iter().fold(form, |form, (name, value)| form.text(name, value)),
			_ => form,
		};

		self.payload = Payload::Multipart(form);

		self
	}

	/// Parameters that enter the signature base string besides the URL query: the extra
	/// query parameters and, for form bodies, the body parameters.
	pub fn signature_params(&self) -> impl Iterator<Item = (&str, &str)> {
		let form: &[(String, String)] = match &self.payload {
			Payload::Form(params) => params,
			_ => &[],
		};

		self.query.iter().chain(form.iter()).map(|(name, value)| (name.as_str(), value.as_str()))
	}

	/// URL with the original and extra query parameters re-encoded.
	pub fn full_url(&self) -> Url {
		let mut pairs = self.url.query_pairs().into_owned().collect::<Vec<_>>();

		pairs.extend(self.query.iter().cloned());

		let mut url = self.url.clone();

		if pairs.is_empty() {
			url.set_query(None);
		} else {
			let query =
				encode::encode_pairs(pairs.iter().map(|(name, value)| (name.as_str(), value.as_str())));

			url.set_query(Some(&query));
		}

		url
	}

	/// Attaches the `Authorization` header and encodes the body.
	pub fn prepare(&self, authorization: &AuthorizationHeader) -> Result<PreparedRequest, ConfigError> {
		let mut headers = HeaderMap::new();

		headers.insert(AUTHORIZATION, HeaderValue::from_str(&authorization.to_string())?);

		let body = match &self.payload {
			Payload::None => RequestBody::Empty,
			Payload::Form(params) => {
				headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));

				RequestBody::Form(encode::encode_pairs(
					params.iter().map(|(name, value)| (name.as_str(), value.as_str())),
				))
			},
			Payload::Multipart(form) => RequestBody::Multipart(form.clone()),
		};

		Ok(PreparedRequest { method: self.method, url: self.full_url(), headers, body })
	}
}

/// Encoded request body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestBody {
	/// No body.
	Empty,
	/// Percent-encoded form body.
	Form(String),
	/// Multipart body; the transport chooses the boundary.
	Multipart(MultipartForm),
}

/// Signed request ready to hand to a transport.
#[derive(Clone, Debug)]
pub struct PreparedRequest {
	/// HTTP method.
	pub method: HttpMethod,
	/// Final URL including the query string.
	pub url: Url,
	/// Headers, including `Authorization` and the form `Content-Type`.
	pub headers: HeaderMap,
	/// Encoded body.
	pub body: RequestBody,
}
impl PreparedRequest {
	/// Signed `Authorization` header value.
	pub fn authorization(&self) -> Option<&str> {
		self.headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok())
	}

	/// Builds a reqwest request for callers that send it themselves.
	#[cfg(feature = "reqwest")]
	pub fn into_reqwest(self, client: &ReqwestClient) -> Result<reqwest::RequestBuilder, ReqwestError> {
		let builder = client.request(self.method.into(), self.url).headers(self.headers);

		Ok(match self.body {
			RequestBody::Empty => builder,
			RequestBody::Form(body) => builder.body(body),
			RequestBody::Multipart(form) => builder.multipart(reqwest_form(form)?),
		})
	}
}

#[cfg(feature = "reqwest")]
pub(crate) fn reqwest_form(form: MultipartForm) -> Result<reqwest::multipart::Form, ReqwestError> {
	use reqwest::multipart::{Form, Part};

	let mut out = Form::new();

	for part in form.into_parts() {
		out = match part.value {
			PartValue::Text(value) => out.text(part.name, value),
			PartValue::File { file_name, content_type, bytes } => out.part(
				part.name,
				Part::bytes(bytes).file_name(file_name).mime_str(&content_type)?,
			),
		};
	}

	Ok(out)
}
