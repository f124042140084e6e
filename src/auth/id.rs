//! Strongly typed identifiers for platform users and remote media resources.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "RawId", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				validate_view($kind, view)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				validate_view($kind, &value)?;

				Ok(Self(value))
			}
		}
		impl TryFrom<RawId> for $name {
			type Error = IdentifierError;

			fn try_from(value: RawId) -> Result<Self, Self::Error> {
				Self::try_from(value.into_string())
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

const IDENTIFIER_MAX_LEN: usize = 128;

/// Wire representation of a Graph identifier.
///
/// The token endpoint reports `user_id` as a JSON number while every other endpoint uses
/// strings, so both shapes are accepted and normalized to text.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum RawId {
	/// Identifier encoded as a JSON string.
	Text(String),
	/// Identifier encoded as a JSON number.
	Number(u64),
}
impl RawId {
	/// Returns the textual form of the identifier.
	pub fn into_string(self) -> String {
		match self {
			Self::Text(value) => value,
			Self::Number(value) => value.to_string(),
		}
	}
}

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (user, creation, thread).
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} identifier contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier (user, creation, thread).
		kind: &'static str,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (user, creation, thread).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

def_id! { UserId, "Platform user identifier that owns tokens and media.", "User" }
def_id! { CreationId, "Identifier of a media container awaiting publication.", "Creation" }
def_id! { ThreadId, "Identifier of a published thread.", "Thread" }

fn validate_view(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn identifiers_validate() {
		assert!(UserId::new(" 1789").is_err(), "Leading whitespace must be rejected.");
		assert!(UserId::new("1789 ").is_err(), "Trailing whitespace must be rejected.");

		let user = UserId::new("17841400000").expect("User fixture should be considered valid.");

		assert_eq!(user.as_ref(), "17841400000");
		assert!(CreationId::new("").is_err());
		assert!(ThreadId::new("with space").is_err());
	}

	#[test]
	fn numeric_and_string_ids_deserialize() {
		let numeric: UserId =
			serde_json::from_str("17841400000000000").expect("Numeric id should deserialize.");
		let text: UserId =
			serde_json::from_str("\"17841400000000000\"").expect("String id should deserialize.");

		assert_eq!(numeric, text);
		assert!(serde_json::from_str::<CreationId>("\"\"").is_err());
		assert!(serde_json::from_str::<CreationId>("\"a b\"").is_err());
	}

	#[test]
	fn length_limit_is_enforced() {
		let exact = "9".repeat(IDENTIFIER_MAX_LEN);

		UserId::new(&exact).expect("Exact length should succeed.");

		let too_long = "9".repeat(IDENTIFIER_MAX_LEN + 1);

		assert!(matches!(
			UserId::new(&too_long),
			Err(IdentifierError::TooLong { kind: "User", max: IDENTIFIER_MAX_LEN })
		));
	}

	#[test]
	fn serializes_as_plain_string() {
		let thread = ThreadId::new("1800").expect("Thread fixture should be valid.");

		assert_eq!(serde_json::to_string(&thread).expect("Serialize should succeed."), "\"1800\"");
		assert_eq!(format!("{thread:?}"), "Thread(1800)");
	}
}
