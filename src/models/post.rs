use chrono::NaiveDateTime;

use serde::{Deserialize, Serialize};

use uuid::Uuid;

/// A bare author reference.  One entry per user, enforced in `add_like`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Like {
  pub user: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
  pub id: Uuid,
  pub user: i32,
  pub text: String,
  // author snapshot taken at creation time, never re-synced
  pub name: String,
  pub avatar: Option<String>,
  #[serde(rename = "date")]
  pub created_at: NaiveDateTime,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Post {
  pub id: i32,
  pub user: i32,
  pub text: String,
  // author snapshot taken at creation time, never re-synced
  pub name: String,
  pub avatar: Option<String>,
  pub likes: Vec<Like>,
  pub comments: Vec<Comment>,
  #[serde(rename = "date")]
  pub created_at: NaiveDateTime,
}

impl Post {
  /// Returns false if the user already appears in the like list.
  pub fn add_like(&mut self, user_id: i32) -> bool {
    if self.likes.iter().any(|like| like.user == user_id) {
      return false;
    }
    self.likes.insert(0, Like { user: user_id });
    true
  }

  /// Returns false if the user has no entry in the like list.
  pub fn remove_like(&mut self, user_id: i32) -> bool {
    match self.likes.iter().position(|like| like.user == user_id) {
      Some(idx) => {
        self.likes.remove(idx);
        true
      },
      None => false,
    }
  }

  pub fn add_comment(&mut self, comment: Comment) {
    self.comments.insert(0, comment);
  }

  pub fn find_comment(&self, id: &Uuid) -> Option<&Comment> {
    self.comments.iter().find(|comment| comment.id == *id)
  }

  /// Removes the comment matching `id`, not a position re-derived from the
  /// author, so authors with several comments lose exactly the one named.
  pub fn remove_comment(&mut self, id: &Uuid) -> Option<Comment> {
    let idx = self.comments.iter().position(|comment| comment.id == *id)?;
    Some(self.comments.remove(idx))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn post() -> Post {
    Post {
      id: 1,
      user: 7,
      text: "hello".to_string(),
      name: "Ada".to_string(),
      avatar: None,
      likes: Vec::new(),
      comments: Vec::new(),
      created_at: NaiveDateTime::from_timestamp(1_600_000_000, 0),
    }
  }

  fn comment(user: i32, text: &str) -> Comment {
    Comment {
      id: Uuid::new_v4(),
      user,
      text: text.to_string(),
      name: "Ada".to_string(),
      avatar: None,
      created_at: NaiveDateTime::from_timestamp(1_600_000_100, 0),
    }
  }

  #[test]
  fn like_is_unique_per_user() {
    let mut post = post();
    assert!(post.add_like(7));
    assert!(!post.add_like(7));
    assert_eq!(post.likes.len(), 1);
  }

  #[test]
  fn unlike_requires_an_existing_like() {
    let mut post = post();
    assert!(!post.remove_like(7));
    assert_eq!(post.likes.len(), 0);

    post.add_like(7);
    assert!(post.remove_like(7));
    assert_eq!(post.likes.len(), 0);
  }

  #[test]
  fn likes_head_insert() {
    let mut post = post();
    post.add_like(1);
    post.add_like(2);
    assert_eq!(post.likes[0].user, 2);
    assert_eq!(post.likes[1].user, 1);
  }

  #[test]
  fn comments_head_insert() {
    let mut post = post();
    post.add_comment(comment(1, "first"));
    post.add_comment(comment(2, "second"));
    assert_eq!(post.comments[0].text, "second");
    assert_eq!(post.comments[1].text, "first");
  }

  #[test]
  fn remove_comment_targets_the_named_id() {
    let mut post = post();
    let older = comment(7, "older");
    let older_id = older.id;
    post.add_comment(older);
    post.add_comment(comment(7, "newer"));

    // same author commented twice, the one named by id goes
    let removed = post.remove_comment(&older_id).unwrap();
    assert_eq!(removed.text, "older");
    assert_eq!(post.comments.len(), 1);
    assert_eq!(post.comments[0].text, "newer");
  }

  #[test]
  fn remove_comment_with_unknown_id_is_none() {
    let mut post = post();
    post.add_comment(comment(7, "only"));
    assert!(post.remove_comment(&Uuid::new_v4()).is_none());
    assert_eq!(post.comments.len(), 1);
  }

  #[test]
  fn creation_timestamp_serializes_as_date() {
    let post = post();
    let value = serde_json::to_value(&post).unwrap();
    assert!(value.get("date").is_some());
    assert!(value.get("created_at").is_none());
  }
}
