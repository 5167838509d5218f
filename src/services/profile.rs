use actix_web::{
  get, post, put, delete, web, HttpResponse,
  Error
};

use uuid::Uuid;

use crate::error::*;
use crate::app::*;
use crate::forms::*;
use crate::models::ProfileDetails;
use crate::auth::AuthData;
use crate::db::DbService;
use crate::middleware::Auth;

async fn fetch_own_profile(db: &DbService, user_id: i32) -> Result<ProfileDetails> {
  match db.profile.get_by_user(user_id).await? {
    Some(profile) => Ok(profile),
    None => Err(crate::Error::not_found("There is no profile for this user")),
  }
}

/// get own profile
#[get("/profile/me", wrap="Auth::required()")]
async fn get_own_profile(
  auth: AuthData,
  db: web::Data<DbService>,
) -> Result<HttpResponse, Error> {
  let profile = fetch_own_profile(&db, auth.user_id).await?;
  Ok(HttpResponse::Ok().json(profile))
}

/// create or update own profile
#[post("/profile", wrap="Auth::required()")]
async fn upsert_profile(
  auth: AuthData,
  db: web::Data<DbService>,
  form: web::Json<UpsertProfile>,
) -> Result<HttpResponse, Error> {
  let form = form.into_inner();
  form.validate()?;

  if db.profile.get_by_user(auth.user_id).await?.is_some() {
    db.profile.update(auth.user_id, &form).await?;
  } else {
    db.profile.store(auth.user_id, &form).await?;
  }

  match db.profile.get_by_user(auth.user_id).await? {
    Some(profile) => Ok(HttpResponse::Ok().json(profile)),
    None => Err(crate::Error::InternalServerError.into()),
  }
}

/// list every profile with its owner's name/avatar
#[get("/profile")]
async fn list_profiles(
  db: web::Data<DbService>,
) -> Result<HttpResponse, Error> {
  let profiles = db.profile.get_all().await?;
  Ok(HttpResponse::Ok().json(profiles))
}

/// get profile by user id
#[get("/profile/user/{user_id}")]
async fn get_profile_by_user(
  db: web::Data<DbService>,
  user_id: web::Path<String>,
) -> Result<HttpResponse, Error> {
  // a malformed id presents the same NotFound as an absent one
  let user_id: i32 = match user_id.parse() {
    Ok(id) => id,
    Err(_) => return Err(crate::Error::not_found("Profile not found").into()),
  };

  match db.profile.get_by_user(user_id).await? {
    Some(profile) => Ok(HttpResponse::Ok().json(profile)),
    None => Err(crate::Error::not_found("Profile not found").into()),
  }
}

/// delete the account: posts, then profile, then the user record
#[delete("/profile", wrap="Auth::required()")]
async fn delete_account(
  auth: AuthData,
  db: web::Data<DbService>,
) -> Result<HttpResponse, Error> {
  db.post.delete_by_author(auth.user_id).await?;
  db.profile.delete_by_user(auth.user_id).await?;
  db.user.delete(auth.user_id).await?;

  Ok(HttpResponse::Ok().json(json!({ "msg": "User deleted" })))
}

/// add an experience entry
#[put("/profile/experience", wrap="Auth::required()")]
async fn add_experience(
  auth: AuthData,
  db: web::Data<DbService>,
  form: web::Json<ExperienceForm>,
) -> Result<HttpResponse, Error> {
  let entry = form.into_inner().into_entry()?;

  let mut profile = fetch_own_profile(&db, auth.user_id).await?;
  profile.add_experience(entry);
  db.profile.save_experience(auth.user_id, &profile.experience).await?;

  Ok(HttpResponse::Ok().json(profile))
}

/// remove an experience entry by its id
#[delete("/profile/experience/{exp_id}", wrap="Auth::required()")]
async fn remove_experience(
  auth: AuthData,
  db: web::Data<DbService>,
  exp_id: web::Path<String>,
) -> Result<HttpResponse, Error> {
  let mut profile = fetch_own_profile(&db, auth.user_id).await?;

  // an id matching no entry (malformed included) leaves the list unchanged
  if let Ok(exp_id) = Uuid::parse_str(&exp_id) {
    profile.remove_experience(&exp_id);
  }
  db.profile.save_experience(auth.user_id, &profile.experience).await?;

  Ok(HttpResponse::Ok().json(profile))
}

/// add an education entry
#[put("/profile/education", wrap="Auth::required()")]
async fn add_education(
  auth: AuthData,
  db: web::Data<DbService>,
  form: web::Json<EducationForm>,
) -> Result<HttpResponse, Error> {
  let entry = form.into_inner().into_entry()?;

  let mut profile = fetch_own_profile(&db, auth.user_id).await?;
  profile.add_education(entry);
  db.profile.save_education(auth.user_id, &profile.education).await?;

  Ok(HttpResponse::Ok().json(profile))
}

/// remove an education entry by its id
#[delete("/profile/education/{edu_id}", wrap="Auth::required()")]
async fn remove_education(
  auth: AuthData,
  db: web::Data<DbService>,
  edu_id: web::Path<String>,
) -> Result<HttpResponse, Error> {
  let mut profile = fetch_own_profile(&db, auth.user_id).await?;

  if let Ok(edu_id) = Uuid::parse_str(&edu_id) {
    profile.remove_education(&edu_id);
  }
  db.profile.save_education(auth.user_id, &profile.education).await?;

  Ok(HttpResponse::Ok().json(profile))
}

#[derive(Debug, Clone, Default)]
pub struct ProfileService {
}

impl super::Service for ProfileService {
  fn load_app_config(&mut self, _config: &AppConfig, _prefix: &str) -> Result<()> {
    Ok(())
  }

  fn api_config(&self, web: &mut web::ServiceConfig) {
    web
      .data(self.clone())
      .service(get_own_profile)
      .service(upsert_profile)
      .service(list_profiles)
      .service(get_profile_by_user)
      .service(delete_account)
      .service(add_experience)
      .service(remove_experience)
      .service(add_education)
      .service(remove_education);
  }
}

pub fn new_factory() -> ProfileService {
  Default::default()
}
