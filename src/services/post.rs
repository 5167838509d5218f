use chrono::Utc;

use actix_web::{
  get, post, put, delete, web, HttpResponse,
  Error
};

use uuid::Uuid;

use crate::error::*;
use crate::app::*;
use crate::forms::*;
use crate::models::*;
use crate::auth::AuthData;
use crate::db::DbService;
use crate::middleware::Auth;

fn parse_post_id(id: &str) -> Result<i32> {
  // a malformed id presents the same NotFound as an absent one
  id.parse().map_err(|_| crate::Error::not_found("Post not found"))
}

async fn fetch_post(db: &DbService, post_id: i32) -> Result<Post> {
  match db.post.get_by_id(post_id).await? {
    Some(post) => Ok(post),
    None => Err(crate::Error::not_found("Post not found")),
  }
}

async fn fetch_author(db: &DbService, user_id: i32) -> Result<User> {
  match db.user.get_by_id(user_id).await? {
    Some(user) => Ok(user),
    None => Err(crate::Error::not_found("User not found")),
  }
}

/// create a post
#[post("/posts", wrap="Auth::required()")]
async fn store_post(
  auth: AuthData,
  db: web::Data<DbService>,
  form: web::Json<CreatePost>,
) -> Result<HttpResponse, Error> {
  let form = form.into_inner();
  form.validate()?;

  // author snapshot resolved at write time
  let user = fetch_author(&db, auth.user_id).await?;

  match db.post.store(auth.user_id, &form.text, &user.name,
      user.avatar.as_deref()).await? {
    Some(post) => Ok(HttpResponse::Ok().json(post)),
    None => Err(crate::Error::InternalServerError.into()),
  }
}

/// list posts, most recent first
#[get("/posts", wrap="Auth::required()")]
async fn list_posts(
  _auth: AuthData,
  db: web::Data<DbService>,
) -> Result<HttpResponse, Error> {
  let posts = db.post.get_all().await?;
  Ok(HttpResponse::Ok().json(posts))
}

/// get post by id
#[get("/posts/{id}", wrap="Auth::required()")]
async fn get_post(
  _auth: AuthData,
  db: web::Data<DbService>,
  id: web::Path<String>,
) -> Result<HttpResponse, Error> {
  let post = fetch_post(&db, parse_post_id(&id)?).await?;
  Ok(HttpResponse::Ok().json(post))
}

/// delete own post
#[delete("/posts/{id}", wrap="Auth::required()")]
async fn delete_post(
  auth: AuthData,
  db: web::Data<DbService>,
  id: web::Path<String>,
) -> Result<HttpResponse, Error> {
  let post = fetch_post(&db, parse_post_id(&id)?).await?;

  if post.user != auth.user_id {
    return Err(crate::Error::unauthorized("User not authorized").into());
  }
  db.post.delete(post.id).await?;

  Ok(HttpResponse::Ok().json(json!({ "msg": "Post removed" })))
}

/// like a post
#[put("/posts/like/{id}", wrap="Auth::required()")]
async fn like_post(
  auth: AuthData,
  db: web::Data<DbService>,
  id: web::Path<String>,
) -> Result<HttpResponse, Error> {
  let mut post = fetch_post(&db, parse_post_id(&id)?).await?;

  if !post.add_like(auth.user_id) {
    return Err(crate::Error::conflict("Post already liked").into());
  }
  db.post.save_likes(post.id, &post.likes).await?;

  Ok(HttpResponse::Ok().json(&post.likes))
}

/// remove own like from a post
#[put("/posts/unlike/{id}", wrap="Auth::required()")]
async fn unlike_post(
  auth: AuthData,
  db: web::Data<DbService>,
  id: web::Path<String>,
) -> Result<HttpResponse, Error> {
  let mut post = fetch_post(&db, parse_post_id(&id)?).await?;

  if !post.remove_like(auth.user_id) {
    return Err(crate::Error::conflict("Post has not yet been liked").into());
  }
  db.post.save_likes(post.id, &post.likes).await?;

  Ok(HttpResponse::Ok().json(&post.likes))
}

/// comment on a post
#[post("/posts/comment/{id}", wrap="Auth::required()")]
async fn add_comment(
  auth: AuthData,
  db: web::Data<DbService>,
  id: web::Path<String>,
  form: web::Json<CreateComment>,
) -> Result<HttpResponse, Error> {
  let form = form.into_inner();
  form.validate()?;

  // author snapshot resolved at write time
  let user = fetch_author(&db, auth.user_id).await?;
  let mut post = fetch_post(&db, parse_post_id(&id)?).await?;

  post.add_comment(Comment {
    id: Uuid::new_v4(),
    user: auth.user_id,
    text: form.text,
    name: user.name,
    avatar: user.avatar,
    created_at: Utc::now().naive_utc(),
  });
  db.post.save_comments(post.id, &post.comments).await?;

  Ok(HttpResponse::Ok().json(&post.comments))
}

/// delete own comment from a post
#[delete("/posts/comment/{id}/{comment_id}", wrap="Auth::required()")]
async fn delete_comment(
  auth: AuthData,
  db: web::Data<DbService>,
  path: web::Path<(String, String)>,
) -> Result<HttpResponse, Error> {
  let (id, comment_id) = path.into_inner();
  let mut post = fetch_post(&db, parse_post_id(&id)?).await?;

  let comment_id = match Uuid::parse_str(&comment_id) {
    Ok(comment_id) => comment_id,
    Err(_) => return Err(crate::Error::not_found("Comment does not exist").into()),
  };
  let author = match post.find_comment(&comment_id) {
    Some(comment) => comment.user,
    None => return Err(crate::Error::not_found("Comment does not exist").into()),
  };
  if author != auth.user_id {
    return Err(crate::Error::unauthorized("User not authorized").into());
  }

  // delete the comment named by the validated id
  post.remove_comment(&comment_id);
  db.post.save_comments(post.id, &post.comments).await?;

  Ok(HttpResponse::Ok().json(&post.comments))
}

#[derive(Debug, Clone, Default)]
pub struct PostService {
}

impl super::Service for PostService {
  fn load_app_config(&mut self, _config: &AppConfig, _prefix: &str) -> Result<()> {
    Ok(())
  }

  fn api_config(&self, web: &mut web::ServiceConfig) {
    web
      .data(self.clone())
      .service(store_post)
      .service(list_posts)
      .service(get_post)
      .service(delete_post)
      .service(like_post)
      .service(unlike_post)
      .service(add_comment)
      .service(delete_comment);
  }
}

pub fn new_factory() -> PostService {
  Default::default()
}
