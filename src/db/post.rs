use tokio_postgres::Row;
use tokio_postgres::types::Json;

use crate::error::*;
use crate::models::*;

use crate::db::*;

#[derive(Clone)]
pub struct PostService {
  // get one post
  post_by_id: VersionedStatement,

  // get posts, most recent first
  all_posts: VersionedStatement,

  // store post
  insert_post: VersionedStatement,

  // delete post
  delete_post: VersionedStatement,

  // nested list write-back
  set_likes: VersionedStatement,
  set_comments: VersionedStatement,

  // account deletion cascade
  delete_by_author: VersionedStatement,
}

static POST_SELECT: &'static str = r#"
SELECT id, user_id, text, name, avatar, likes, comments, created_at FROM posts
"#;

fn post_from_row(row: &Row) -> Post {
  let likes: Json<Vec<Like>> = row.get(5);
  let comments: Json<Vec<Comment>> = row.get(6);

  Post {
    id: row.get(0),
    user: row.get(1),
    text: row.get(2),
    name: row.get(3),
    avatar: row.get(4),
    likes: likes.0,
    comments: comments.0,
    created_at: row.get(7),
  }
}

fn post_from_opt_row(row: &Option<Row>) -> Option<Post> {
  if let Some(ref row) = row {
    Some(post_from_row(row))
  } else {
    None
  }
}

impl PostService {
  pub fn new(cl: SharedClient) -> Result<PostService> {
    let post_by_id = VersionedStatement::new(cl.clone(),
        &format!(r#"{} WHERE id = $1"#, POST_SELECT))?;
    let all_posts = VersionedStatement::new(cl.clone(),
        &format!(r#"{} ORDER BY created_at DESC, id DESC"#, POST_SELECT))?;

    let insert_post = VersionedStatement::new(cl.clone(),
        r#"INSERT INTO posts(user_id, text, name, avatar)
        VALUES($1, $2, $3, $4)
        RETURNING id, user_id, text, name, avatar, likes, comments, created_at"#)?;

    let delete_post = VersionedStatement::new(cl.clone(),
        r#"DELETE FROM posts WHERE id = $1"#)?;

    let set_likes = VersionedStatement::new(cl.clone(),
        r#"UPDATE posts SET likes = $2, updated_at = now() WHERE id = $1"#)?;
    let set_comments = VersionedStatement::new(cl.clone(),
        r#"UPDATE posts SET comments = $2, updated_at = now() WHERE id = $1"#)?;

    let delete_by_author = VersionedStatement::new(cl.clone(),
        r#"DELETE FROM posts WHERE user_id = $1"#)?;

    Ok(PostService {
      post_by_id,
      all_posts,

      insert_post,
      delete_post,

      set_likes,
      set_comments,

      delete_by_author,
    })
  }

  pub async fn prepare(&self) -> Result<()> {
    self.post_by_id.prepare().await?;
    self.all_posts.prepare().await?;

    self.insert_post.prepare().await?;
    self.delete_post.prepare().await?;

    self.set_likes.prepare().await?;
    self.set_comments.prepare().await?;

    self.delete_by_author.prepare().await?;
    Ok(())
  }

  pub async fn get_by_id(&self, post_id: i32) -> Result<Option<Post>> {
    let row = self.post_by_id.query_opt(&[&post_id]).await?;
    Ok(post_from_opt_row(&row))
  }

  pub async fn get_all(&self) -> Result<Vec<Post>> {
    let rows = self.all_posts.query(&[]).await?;
    Ok(rows.iter().map(post_from_row).collect())
  }

  /// Stores a new post with the author snapshot taken at write time.
  pub async fn store(&self, user_id: i32, text: &str, name: &str,
    avatar: Option<&str>) -> Result<Option<Post>>
  {
    let row = self.insert_post.query_opt(&[&user_id, &text, &name, &avatar]).await?;
    Ok(post_from_opt_row(&row))
  }

  pub async fn delete(&self, post_id: i32) -> Result<u64> {
    Ok(self.delete_post.execute(&[&post_id]).await?)
  }

  pub async fn save_likes(&self, post_id: i32, likes: &Vec<Like>) -> Result<u64> {
    Ok(self.set_likes.execute(&[&post_id, &Json(likes)]).await?)
  }

  pub async fn save_comments(&self, post_id: i32, comments: &Vec<Comment>) -> Result<u64> {
    Ok(self.set_comments.execute(&[&post_id, &Json(comments)]).await?)
  }

  pub async fn delete_by_author(&self, user_id: i32) -> Result<u64> {
    Ok(self.delete_by_author.execute(&[&user_id]).await?)
  }
}
