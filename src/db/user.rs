use crate::error::*;
use crate::models::*;

use crate::auth::pass;
use crate::db::*;

use tokio_postgres::Row;

#[derive(Clone)]
pub struct UserService {
  // gets
  user_by_id: VersionedStatement,
  user_by_email: VersionedStatement,

  // register
  insert_user: VersionedStatement,

  // login rehash
  update_password: VersionedStatement,

  // account deletion
  delete_user: VersionedStatement,
}

static USER_SELECT: &'static str = r#"
SELECT id, name, email, password, avatar, created_at, updated_at FROM users
"#;

fn user_from_row(row: &Row) -> User {
  User {
    id: row.get(0),
    name: row.get(1),
    email: row.get(2),
    password: row.get(3),
    avatar: row.get(4),
    created_at: row.get(5),
    updated_at: row.get(6),
  }
}

fn user_from_opt_row(row: &Option<Row>) -> Option<User> {
  if let Some(ref row) = row {
    Some(user_from_row(row))
  } else {
    None
  }
}

impl UserService {
  pub fn new(cl: SharedClient) -> Result<UserService> {
    // Build user_by_* queries
    let user_by_id = VersionedStatement::new(cl.clone(),
        &format!(r#"{} WHERE id = $1"#, USER_SELECT))?;
    let user_by_email = VersionedStatement::new(cl.clone(),
        &format!(r#"{} WHERE email = $1"#, USER_SELECT))?;

    let insert_user = VersionedStatement::new(cl.clone(),
        r#"INSERT INTO users(name, email, password, avatar)
        VALUES($1, $2, $3, $4)
        RETURNING id, name, email, password, avatar, created_at, updated_at"#)?;

    let update_password = VersionedStatement::new(cl.clone(),
        r#"UPDATE users SET password = $2, updated_at = now() WHERE id = $1"#)?;

    let delete_user = VersionedStatement::new(cl.clone(),
        r#"DELETE FROM users WHERE id = $1"#)?;

    Ok(UserService {
      user_by_id,
      user_by_email,
      insert_user,
      update_password,
      delete_user,
    })
  }

  pub async fn prepare(&self) -> Result<()> {
    self.user_by_id.prepare().await?;
    self.user_by_email.prepare().await?;

    self.insert_user.prepare().await?;
    self.update_password.prepare().await?;
    self.delete_user.prepare().await?;

    Ok(())
  }

  pub async fn get_by_id(&self, user_id: i32) -> Result<Option<User>> {
    let row = self.user_by_id.query_opt(&[&user_id]).await?;
    Ok(user_from_opt_row(&row))
  }

  pub async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
    let row = self.user_by_email.query_opt(&[&email]).await?;
    Ok(user_from_opt_row(&row))
  }

  pub async fn register_user(&self, name: &str, email: &str, password: &str,
    avatar: Option<&str>) -> Result<Option<User>>
  {
    let hashed = pass::hash_password(password)?;
    let row = self.insert_user.query_opt(&[&name, &email, &hashed, &avatar]).await?;
    Ok(user_from_opt_row(&row))
  }

  pub async fn update_password(&self, user_id: i32, password: &str) -> Result<u64> {
    let hashed = pass::hash_password(password)?;
    Ok(self.update_password.execute(&[&user_id, &hashed]).await?)
  }

  pub async fn delete(&self, user_id: i32) -> Result<u64> {
    Ok(self.delete_user.execute(&[&user_id]).await?)
  }
}
