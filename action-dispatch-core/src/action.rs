//! Action identifiers.

use crate::error::InvalidActionError;
use std::{borrow::Borrow, fmt, sync::Arc};

/// The name of an operation to be dispatched.
///
/// Actions are validated on construction: they must contain at least one
/// visible character and no control characters. Whitespace and invisible
/// format characters such as U+200B do not count as visible. Cloning is cheap.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Action(Arc<str>);

impl Action {
    /// Validate and create an action.
    pub fn new(name: impl AsRef<str>) -> Result<Self, InvalidActionError> {
        let name = name.as_ref();
        if is_blank(name) {
            return Err(InvalidActionError::Empty);
        }
        if let Some(position) = control_position(name) {
            return Err(InvalidActionError::ControlCharacter {
                action: name.to_owned(),
                position,
            });
        }
        Ok(Self(Arc::from(name)))
    }

    /// The action name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Returns true if `s` has no visible character.
pub(crate) fn is_blank(s: &str) -> bool {
    s.chars().all(|c| c.is_whitespace() || is_invisible_format(c))
}

/// Zero-width and other default-ignorable format characters.
fn is_invisible_format(c: char) -> bool {
    matches!(
        c,
        '\u{00AD}' | '\u{180E}' | '\u{200B}'..='\u{200F}' | '\u{2060}'..='\u{2064}' | '\u{FEFF}'
    )
}

/// Byte offset of the first control character, if any.
pub(crate) fn control_position(s: &str) -> Option<usize> {
    s.char_indices().find(|(_, c)| c.is_control()).map(|(i, _)| i)
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Action").field(&&*self.0).finish()
    }
}

impl AsRef<str> for Action {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Action {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Action {
    type Error = InvalidActionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for Action {
    type Error = InvalidActionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
