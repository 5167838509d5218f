use serde::{Deserialize, Serialize};

use crate::error::*;

#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct CreatePost {
  #[serde(default)]
  pub text: String,
}

impl CreatePost {
  pub fn validate(&self) -> Result<()> {
    if self.text.trim().is_empty() {
      Err(Error::Validation(vec!["Text is required".to_string()]))
    } else {
      Ok(())
    }
  }
}

#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct CreateComment {
  #[serde(default)]
  pub text: String,
}

impl CreateComment {
  pub fn validate(&self) -> Result<()> {
    if self.text.trim().is_empty() {
      Err(Error::Validation(vec!["Text is required".to_string()]))
    } else {
      Ok(())
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn post_text_is_required() {
    assert!(CreatePost { text: "  ".to_string() }.validate().is_err());
    assert!(CreatePost { text: "hello".to_string() }.validate().is_ok());
  }

  #[test]
  fn comment_text_is_required() {
    assert!(CreateComment::default().validate().is_err());
  }
}
