//! Identifiers naming a provider description and the account a grant belongs to.
//!
//! Both render into [`StoreKey`](crate::store::StoreKey) as `provider/account`, so neither may
//! contain `/`, whitespace, or control characters.

// std
use std::{borrow::Borrow, marker::PhantomData, ops::Deref};
// crates.io
use serde::{Deserializer, Serializer, de::Error as _};
// self
use crate::_prelude::*;

const MAX_LEN: usize = 64;

/// Marker describing one identifier family.
pub trait IdKind {
	/// Label used in errors and `Debug` output.
	const LABEL: &'static str;
}

/// Marker for [`ProviderId`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Provider {}
impl IdKind for Provider {
	const LABEL: &'static str = "Provider";
}

/// Marker for [`AccountId`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Account {}
impl IdKind for Account {
	const LABEL: &'static str = "Account";
}

/// Identifier for an OAuth service provider description, such as `twitter`.
pub type ProviderId = Id<Provider>;
/// Caller-chosen label for an authorized account, such as a screen name.
pub type AccountId = Id<Account>;

/// Error returned when an identifier is rejected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// Nothing was supplied.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// `Provider` or `Account`.
		kind: &'static str,
	},
	/// Whitespace, a control character, or the `/` key separator was found.
	#[error("{kind} identifier cannot contain {character:?}.")]
	InvalidCharacter {
		/// `Provider` or `Account`.
		kind: &'static str,
		/// First offending character.
		character: char,
	},
	/// Longer than the permitted character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// `Provider` or `Account`.
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

/// Validated identifier of kind `K`.
pub struct Id<K> {
	value: String,
	kind: PhantomData<K>,
}
impl<K> Id<K>
where
	K: IdKind,
{
	/// Validates and wraps `value`.
	pub fn new(value: impl Into<String>) -> Result<Self, IdentifierError> {
		let value = value.into();

		check::<K>(&value)?;

		Ok(Self { value, kind: PhantomData })
	}

	/// Borrowed view of the identifier.
	pub fn as_str(&self) -> &str {
		&self.value
	}
}
impl<K> Clone for Id<K> {
	fn clone(&self) -> Self {
		Self { value: self.value.clone(), kind: PhantomData }
	}
}
impl<K> PartialEq for Id<K> {
	fn eq(&self, other: &Self) -> bool {
		self.value == other.value
	}
}
impl<K> Eq for Id<K> {}
impl<K> PartialOrd for Id<K> {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}
impl<K> Ord for Id<K> {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		self.value.cmp(&other.value)
	}
}
impl<K> std::hash::Hash for Id<K> {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		self.value.hash(state);
	}
}
impl<K> Deref for Id<K> {
	type Target = str;

	fn deref(&self) -> &str {
		&self.value
	}
}
impl<K> AsRef<str> for Id<K> {
	fn as_ref(&self) -> &str {
		&self.value
	}
}
impl<K> Borrow<str> for Id<K> {
	fn borrow(&self) -> &str {
		&self.value
	}
}
impl<K> From<Id<K>> for String {
	fn from(id: Id<K>) -> Self {
		id.value
	}
}
impl<K> TryFrom<String> for Id<K>
where
	K: IdKind,
{
	type Error = IdentifierError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}
impl<K> FromStr for Id<K>
where
	K: IdKind,
{
	type Err = IdentifierError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}
impl<K> Debug for Id<K>
where
	K: IdKind,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}({})", K::LABEL, self.value)
	}
}
impl<K> Display for Id<K> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.value)
	}
}
impl<K> Serialize for Id<K> {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&self.value)
	}
}
impl<'de, K> Deserialize<'de> for Id<K>
where
	K: IdKind,
{
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		Self::new(String::deserialize(deserializer)?).map_err(D::Error::custom)
	}
}

fn check<K>(value: &str) -> Result<(), IdentifierError>
where
	K: IdKind,
{
	let kind = K::LABEL;

	if value.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if let Some(character) =
		value.chars().find(|c| c.is_whitespace() || c.is_control() || *c == '/')
	{
		return Err(IdentifierError::InvalidCharacter { kind, character });
	}
	if value.chars().count() > MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: MAX_LEN });
	}

	Ok(())
}
