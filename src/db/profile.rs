use tokio_postgres::Row;
use tokio_postgres::types::Json;

use crate::error::*;
use crate::models::*;
use crate::forms::UpsertProfile;

use crate::db::*;

#[derive(Clone)]
pub struct ProfileService {
  // get one profile
  profile_by_user: VersionedStatement,

  // get every profile
  all_profiles: VersionedStatement,

  // upsert
  insert_profile: VersionedStatement,
  update_profile: VersionedStatement,

  // nested list write-back
  set_experience: VersionedStatement,
  set_education: VersionedStatement,

  // account deletion
  delete_profile: VersionedStatement,
}

static PROFILE_DETAILS_SELECT: &'static str = r#"
SELECT p.id, u.id, u.name, u.avatar,
  p.company, p.website, p.location, p.status, p.skills, p.bio,
  p.github_username, p.social, p.experience, p.education, p.created_at
FROM profiles p INNER JOIN users u ON p.user_id = u.id
"#;

fn profile_details_from_row(row: &Row) -> ProfileDetails {
  let social: Json<SocialLinks> = row.get(11);
  let experience: Json<Vec<Experience>> = row.get(12);
  let education: Json<Vec<Education>> = row.get(13);

  ProfileDetails {
    id: row.get(0),
    user: Owner {
      id: row.get(1),
      name: row.get(2),
      avatar: row.get(3),
    },
    company: row.get(4),
    website: row.get(5),
    location: row.get(6),
    status: row.get(7),
    skills: row.get(8),
    bio: row.get(9),
    github_username: row.get(10),
    social: social.0,
    experience: experience.0,
    education: education.0,
    created_at: row.get(14),
  }
}

fn profile_details_from_opt_row(row: &Option<Row>) -> Option<ProfileDetails> {
  if let Some(ref row) = row {
    Some(profile_details_from_row(row))
  } else {
    None
  }
}

impl ProfileService {
  pub fn new(cl: SharedClient) -> Result<ProfileService> {
    // Build profile_by_user / all_profiles queries
    let profile_by_user = VersionedStatement::new(cl.clone(),
        &format!(r#"{} WHERE p.user_id = $1"#, PROFILE_DETAILS_SELECT))?;
    let all_profiles = VersionedStatement::new(cl.clone(),
        &format!(r#"{} ORDER BY p.id"#, PROFILE_DETAILS_SELECT))?;

    // upsert queries.  Scalar fields absent from the request stay
    // unchanged on update; status/skills/social are always written.
    let insert_profile = VersionedStatement::new(cl.clone(),
        r#"INSERT INTO profiles(user_id, company, website, location,
          status, skills, bio, github_username, social)
        VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9)"#)?;
    let update_profile = VersionedStatement::new(cl.clone(),
        r#"UPDATE profiles SET
          company = COALESCE($2, company),
          website = COALESCE($3, website),
          location = COALESCE($4, location),
          status = $5,
          skills = $6,
          bio = COALESCE($7, bio),
          github_username = COALESCE($8, github_username),
          social = $9,
          updated_at = now()
        WHERE user_id = $1"#)?;

    // whole-list write-back for the embedded entries
    let set_experience = VersionedStatement::new(cl.clone(),
        r#"UPDATE profiles SET experience = $2, updated_at = now()
        WHERE user_id = $1"#)?;
    let set_education = VersionedStatement::new(cl.clone(),
        r#"UPDATE profiles SET education = $2, updated_at = now()
        WHERE user_id = $1"#)?;

    let delete_profile = VersionedStatement::new(cl.clone(),
        r#"DELETE FROM profiles WHERE user_id = $1"#)?;

    Ok(ProfileService {
      profile_by_user,
      all_profiles,

      insert_profile,
      update_profile,

      set_experience,
      set_education,

      delete_profile,
    })
  }

  pub async fn prepare(&self) -> Result<()> {
    self.profile_by_user.prepare().await?;
    self.all_profiles.prepare().await?;

    self.insert_profile.prepare().await?;
    self.update_profile.prepare().await?;

    self.set_experience.prepare().await?;
    self.set_education.prepare().await?;

    self.delete_profile.prepare().await?;
    Ok(())
  }

  pub async fn get_by_user(&self, user_id: i32) -> Result<Option<ProfileDetails>> {
    let row = self.profile_by_user.query_opt(&[&user_id]).await?;
    Ok(profile_details_from_opt_row(&row))
  }

  pub async fn get_all(&self) -> Result<Vec<ProfileDetails>> {
    let rows = self.all_profiles.query(&[]).await?;
    Ok(rows.iter().map(profile_details_from_row).collect())
  }

  pub async fn store(&self, user_id: i32, form: &UpsertProfile) -> Result<u64> {
    Ok(self.insert_profile.execute(&[
      &user_id, &form.company, &form.website, &form.location,
      &form.status, &form.skills_list(), &form.bio, &form.github_username,
      &Json(form.social()),
    ]).await?)
  }

  pub async fn update(&self, user_id: i32, form: &UpsertProfile) -> Result<u64> {
    Ok(self.update_profile.execute(&[
      &user_id, &form.company, &form.website, &form.location,
      &form.status, &form.skills_list(), &form.bio, &form.github_username,
      &Json(form.social()),
    ]).await?)
  }

  pub async fn save_experience(&self, user_id: i32, entries: &Vec<Experience>) -> Result<u64> {
    Ok(self.set_experience.execute(&[&user_id, &Json(entries)]).await?)
  }

  pub async fn save_education(&self, user_id: i32, entries: &Vec<Education>) -> Result<u64> {
    Ok(self.set_education.execute(&[&user_id, &Json(entries)]).await?)
  }

  pub async fn delete_by_user(&self, user_id: i32) -> Result<u64> {
    Ok(self.delete_profile.execute(&[&user_id]).await?)
  }
}
