use chrono::NaiveDateTime;

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct User {
  pub id: i32,
  pub name: String,
  pub email: String,
  pub password: String,
  pub avatar: Option<String>,
  pub created_at: NaiveDateTime,
  pub updated_at: NaiveDateTime,
}

/// Owner name/avatar joined onto profile documents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Owner {
  pub id: i32,
  pub name: String,
  pub avatar: Option<String>,
}
