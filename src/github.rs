use reqwest::header::{AUTHORIZATION, USER_AGENT};

use serde_json::Value as JsonValue;

use crate::error::*;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

// fixed page size / sort order forwarded upstream
const PER_PAGE: u32 = 5;
const SORT: &str = "created:asc";

/// Looks up a user's public repositories on the external hosting service.
#[derive(Clone)]
pub struct GithubClient {
  client: reqwest::Client,
  api_url: String,
  token: Option<String>,
}

impl Default for GithubClient {
  fn default() -> Self {
    Self::new(DEFAULT_API_URL, None)
  }
}

impl GithubClient {
  pub fn new(api_url: &str, token: Option<String>) -> Self {
    Self {
      client: reqwest::Client::new(),
      api_url: api_url.trim_end_matches('/').to_string(),
      token,
    }
  }

  fn repos_url(&self, username: &str) -> String {
    format!("{}/users/{}/repos?per_page={}&sort={}",
      self.api_url, username, PER_PAGE, SORT)
  }

  /// Relays the upstream repository list unchanged.  Every non-success
  /// upstream status maps to the one NotFound shape.
  pub async fn user_repos(&self, username: &str) -> Result<JsonValue> {
    let mut req = self.client.get(&self.repos_url(username))
      // the hosting service rejects requests without a user agent
      .header(USER_AGENT, "dev-network");
    if let Some(ref token) = self.token {
      req = req.header(AUTHORIZATION, format!("token {}", token));
    }

    let resp = req.send().await?;
    if !resp.status().is_success() {
      return Err(Error::not_found("No Github profile found"));
    }
    Ok(resp.json().await?)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn repos_url_carries_page_size_and_sort() {
    let client = GithubClient::default();
    assert_eq!(client.repos_url("octocat"),
      "https://api.github.com/users/octocat/repos?per_page=5&sort=created:asc");
  }

  #[test]
  fn custom_api_url_is_normalized() {
    let client = GithubClient::new("http://localhost:9000/", None);
    assert!(client.repos_url("octocat")
      .starts_with("http://localhost:9000/users/octocat/repos"));
  }
}
