use log::*;

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::Value as JsonValue;

use libreauth::pass;

use jsonwebtoken::errors::Error as JwtError;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
  // 401
  #[error("unauthorized: {0}")]
  Unauthorized(JsonValue),

  // 404
  #[error("not found: {0}")]
  NotFound(JsonValue),

  // 400, one message per violated field
  #[error("validation failed: {0:?}")]
  Validation(Vec<String>),

  // 400, duplicate like / missing like
  #[error("conflict: {0}")]
  Conflict(JsonValue),

  // 500
  #[error("internal server error")]
  InternalServerError,

  // 400
  #[error("bad request: {0}")]
  BadRequest(String),

  // Json error
  #[error("Json error: {source}")]
  JsonError {
    #[from]
    source: serde_json::Error,
  },

  // Password error
  #[error("Password error: {0}")]
  PasswordError(String),

  #[error("JWT error")]
  JwtError {
    #[from]
    source: JwtError,
  },

  #[error("disconnected: {0}")]
  DisconnectedError(String),

  #[error("postgres error")]
  PgError {
    #[from]
    source: tokio_postgres::error::Error,
  },

  #[error("http client error")]
  HttpError {
    #[from]
    source: reqwest::Error,
  },

  #[error("crossbeam recv error")]
  RecvError {
    #[from]
    source: crossbeam_channel::RecvError,
  },

  #[error("std io error")]
  IOError {
    #[from]
    source: std::io::Error,
  },

  #[error("config error")]
  ConfigError {
    #[from]
    source: config::ConfigError,
  },

  #[error(transparent)]
  Other(#[from] anyhow::Error),
}

impl Error {
  /// NotFound with the single-message body shape shared by missing and
  /// malformed identifiers.
  pub fn not_found(msg: &str) -> Self {
    Error::NotFound(json!({ "msg": msg }))
  }

  pub fn unauthorized(msg: &str) -> Self {
    Error::Unauthorized(json!({ "msg": msg }))
  }

  pub fn conflict(msg: &str) -> Self {
    Error::Conflict(json!({ "msg": msg }))
  }
}

impl From<pass::ErrorCode> for Error {
  fn from(code: pass::ErrorCode) -> Self {
    Error::PasswordError(format!("code={:?}", code))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// the ResponseError trait lets us convert errors to http responses with appropriate data
// https://actix.rs/docs/errors/
impl ResponseError for Error {
  fn error_response(&self) -> HttpResponse {
    match self {
      Error::Unauthorized(ref message) => HttpResponse::Unauthorized().json(message),
      Error::NotFound(ref message) => HttpResponse::NotFound().json(message),
      Error::Validation(ref messages) => {
        let errors: Vec<JsonValue> = messages.iter()
          .map(|msg| json!({ "msg": msg }))
          .collect();
        HttpResponse::build(StatusCode::BAD_REQUEST).json(json!({ "errors": errors }))
      },
      Error::Conflict(ref message) => {
        HttpResponse::build(StatusCode::BAD_REQUEST).json(message)
      },
      Error::BadRequest(ref message) => {
        HttpResponse::build(StatusCode::BAD_REQUEST).json(message)
      },
      Error::DisconnectedError(ref message) => {
        HttpResponse::build(StatusCode::BAD_GATEWAY).json(message)
      },
      ref err => {
        error!("InternalServerError: {:?}", err);
        HttpResponse::InternalServerError().json("Internal Server Error")
      },
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn validation_lists_every_message() {
    let err = Error::Validation(vec![
      "Status is required".to_string(),
      "Skills is required".to_string(),
    ]);
    let resp = err.error_response();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[test]
  fn status_mapping() {
    assert_eq!(Error::unauthorized("no token").error_response().status(),
      StatusCode::UNAUTHORIZED);
    assert_eq!(Error::not_found("Profile not found").error_response().status(),
      StatusCode::NOT_FOUND);
    assert_eq!(Error::conflict("Post already liked").error_response().status(),
      StatusCode::BAD_REQUEST);
    assert_eq!(Error::InternalServerError.error_response().status(),
      StatusCode::INTERNAL_SERVER_ERROR);
  }
}
