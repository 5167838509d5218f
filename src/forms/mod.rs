mod user;
mod profile;
mod post;

pub use self::{
  user::*,
  profile::*,
  post::*,
};

/// Filter an optional field down to a usable value.  Whitespace-only input
/// counts as missing so validation reports it.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
  value.filter(|v| !v.trim().is_empty())
}

pub(crate) fn is_missing(value: &Option<String>) -> bool {
  match value {
    Some(v) => v.trim().is_empty(),
    None => true,
  }
}
