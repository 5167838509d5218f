use std::convert::TryFrom;

use serde::{Deserialize, Serialize};

use crate::error::*;
use crate::auth::jwt::*;
use crate::models::User;

use super::is_missing;

#[derive(Debug, Deserialize)]
pub struct UserOut<T> {
  pub user: T,
}

#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct LoginUser {
  #[serde(default)]
  pub email: Option<String>,
  #[serde(default)]
  pub password: Option<String>,
}

impl LoginUser {
  pub fn validate(&self) -> Result<()> {
    let mut errors = Vec::new();
    if is_missing(&self.email) {
      errors.push("Please include a valid email".to_string());
    }
    if is_missing(&self.password) {
      errors.push("Password is required".to_string());
    }
    if errors.is_empty() {
      Ok(())
    } else {
      Err(Error::Validation(errors))
    }
  }
}

#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct RegisterUser {
  #[serde(default)]
  pub name: Option<String>,
  #[serde(default)]
  pub email: Option<String>,
  #[serde(default)]
  pub password: Option<String>,
  pub avatar: Option<String>,
}

impl RegisterUser {
  pub fn validate(&self) -> Result<()> {
    let mut errors = Vec::new();
    if is_missing(&self.name) {
      errors.push("Name is required".to_string());
    }
    match &self.email {
      Some(email) if email.contains('@') => (),
      _ => errors.push("Please include a valid email".to_string()),
    }
    match &self.password {
      Some(password) if password.len() >= 6 => (),
      _ => errors.push("Please enter a password with 6 or more characters".to_string()),
    }
    if errors.is_empty() {
      Ok(())
    } else {
      Err(Error::Validation(errors))
    }
  }
}

#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct UserResponseInner {
  pub name: String,
  pub token: String,
  pub email: String,
  pub avatar: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct UserResponse {
  pub user: UserResponseInner,
}

impl TryFrom<User> for UserResponse {
  type Error = Error;

  fn try_from(user: User) -> Result<Self> {
    let token = user.generate_jwt()?;
    Ok(UserResponse {
      user: UserResponseInner {
        name: user.name,
        email: user.email,
        token,
        avatar: user.avatar,
      }
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn register_reports_every_violated_field() {
    let form = RegisterUser {
      name: Some("  ".to_string()),
      email: Some("not-an-email".to_string()),
      password: Some("short".to_string()),
      avatar: None,
    };
    match form.validate() {
      Err(Error::Validation(errors)) => assert_eq!(errors.len(), 3),
      other => panic!("expected validation error, got {:?}", other),
    }
  }

  #[test]
  fn login_accepts_complete_input() {
    let form = LoginUser {
      email: Some("ada@example.com".to_string()),
      password: Some("hunter22".to_string()),
    };
    assert!(form.validate().is_ok());
  }
}
