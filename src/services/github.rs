use actix_web::{
  get, web, HttpResponse,
  Error
};

use crate::error::*;
use crate::app::*;
use crate::github::{GithubClient, DEFAULT_API_URL};

/// proxy the user's public repository list
#[get("/profile/github/{username}")]
async fn get_github_repos(
  cfg: web::Data<GithubService>,
  username: web::Path<String>,
) -> Result<HttpResponse, Error> {
  let repos = cfg.client.user_repos(&username).await?;
  Ok(HttpResponse::Ok().json(repos))
}

#[derive(Clone, Default)]
pub struct GithubService {
  pub client: GithubClient,
}

impl super::Service for GithubService {
  fn load_app_config(&mut self, config: &AppConfig, _prefix: &str) -> Result<()> {
    let api_url = config.get_str("Github.api_url")?
      .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let token = config.get_str("Github.token")?;
    self.client = GithubClient::new(&api_url, token);
    Ok(())
  }

  fn api_config(&self, web: &mut web::ServiceConfig) {
    web
      .data(self.clone())
      .service(get_github_repos);
  }
}

pub fn new_factory() -> GithubService {
  Default::default()
}
