use log::*;

use std::convert::TryFrom;

use actix_web::{
  get, post, web, HttpResponse,
  Error
};

use crate::error::*;
use crate::app::*;
use crate::forms::*;
use crate::auth::AuthData;

use crate::db::DbService;
use crate::auth::pass;

use crate::middleware::Auth;

/// login user
#[post("/users/login")]
async fn login(
  db: web::Data<DbService>,
  login: web::Json<UserOut<LoginUser>>,
) -> Result<HttpResponse, Error> {
  let login = &login.user;
  login.validate()?;

  // Get user from database
  let user = match db.user.get_by_email(login.email.as_deref().unwrap_or_default()).await? {
    Some(user) => user,
    _ => {
      // unknown email.  Same response as a bad password.
      return Err(crate::Error::unauthorized("Invalid Credentials").into());
    }
  };

  let res = pass::check_password(&user.password,
    login.password.as_deref().unwrap_or_default())?;
  debug!("login: user={} valid={}", user.id, res.is_valid);
  if res.is_valid {
    if res.needs_update {
      // Rehash password.
      db.user.update_password(user.id,
        login.password.as_deref().unwrap_or_default()).await?;
    }
    Ok(HttpResponse::Ok().json(UserResponse::try_from(user)?))
  } else {
    Err(crate::Error::unauthorized("Invalid Credentials").into())
  }
}

/// register new user
#[post("/users")]
async fn register(
  cfg: web::Data<UserService>,
  db: web::Data<DbService>,
  register: web::Json<UserOut<RegisterUser>>,
) -> Result<HttpResponse, Error> {
  if !cfg.allow_register {
    return Ok(HttpResponse::Forbidden().finish());
  }

  let register = &register.user;
  register.validate()?;

  let email = register.email.as_deref().unwrap_or_default();
  if db.user.get_by_email(email).await?.is_some() {
    return Err(crate::Error::conflict("User already exists").into());
  }

  let user = match db.user.register_user(
      register.name.as_deref().unwrap_or_default(),
      email,
      register.password.as_deref().unwrap_or_default(),
      register.avatar.as_deref(),
    ).await? {
    Some(user) => user,
    _ => {
      return Ok(HttpResponse::InternalServerError().json("Failed to get user info."));
    },
  };

  Ok(HttpResponse::Ok().json(UserResponse::try_from(user)?))
}

/// get current user
#[get("/user", wrap="Auth::required()")]
async fn get_user(
  auth: AuthData,
  db: web::Data<DbService>,
) -> Result<HttpResponse, Error> {
  // Get auth user from database
  match db.user.get_by_id(auth.user_id).await? {
    Some(user) => {
      Ok(HttpResponse::Ok().json(UserResponse::try_from(user)?))
    },
    _ => {
      // token for a deleted user.
      Err(crate::Error::not_found("User not found").into())
    }
  }
}

#[derive(Debug, Clone, Default)]
pub struct UserService {
  pub allow_register: bool,
}

impl super::Service for UserService {
  fn load_app_config(&mut self, config: &AppConfig, _prefix: &str) -> Result<()> {
    self.allow_register = config.get_bool("User.allow_register")?.unwrap_or(true);
    Ok(())
  }

  fn api_config(&self, web: &mut web::ServiceConfig) {
    web
      .data(self.clone())
      .service(register)
      .service(login)
      .service(get_user);
  }
}

pub fn new_factory() -> UserService {
  Default::default()
}
