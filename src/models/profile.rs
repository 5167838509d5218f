use chrono::{NaiveDate, NaiveDateTime};

use serde::{Deserialize, Serialize};

use uuid::Uuid;

use crate::models::*;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SocialLinks {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub youtube: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub twitter: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub facebook: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub linkedin: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub instagram: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Experience {
  pub id: Uuid,
  pub title: String,
  pub company: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub location: Option<String>,
  pub from: NaiveDate,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub to: Option<NaiveDate>,
  #[serde(default)]
  pub current: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Education {
  pub id: Uuid,
  pub school: String,
  pub degree: String,
  // declared on the document, presence not enforced by validation
  #[serde(rename = "fieldofstudy", skip_serializing_if = "Option::is_none")]
  pub field_of_study: Option<String>,
  pub from: NaiveDate,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub to: Option<NaiveDate>,
  #[serde(default)]
  pub current: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
}

/// A profile document joined with its owner's name/avatar.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ProfileDetails {
  pub id: i32,
  pub user: Owner,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub company: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub website: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub location: Option<String>,
  pub status: String,
  pub skills: Vec<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub bio: Option<String>,
  #[serde(rename = "githubusername", skip_serializing_if = "Option::is_none")]
  pub github_username: Option<String>,
  pub social: SocialLinks,
  pub experience: Vec<Experience>,
  pub education: Vec<Education>,
  #[serde(rename = "date")]
  pub created_at: NaiveDateTime,
}

impl ProfileDetails {
  /// Entries are most-recent-first.
  pub fn add_experience(&mut self, entry: Experience) {
    self.experience.insert(0, entry);
  }

  /// Removes the entry matching `id`.  An unknown id leaves the list
  /// unchanged and returns None.
  pub fn remove_experience(&mut self, id: &Uuid) -> Option<Experience> {
    let idx = self.experience.iter().position(|entry| entry.id == *id)?;
    Some(self.experience.remove(idx))
  }

  pub fn add_education(&mut self, entry: Education) {
    self.education.insert(0, entry);
  }

  pub fn remove_education(&mut self, id: &Uuid) -> Option<Education> {
    let idx = self.education.iter().position(|entry| entry.id == *id)?;
    Some(self.education.remove(idx))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn profile() -> ProfileDetails {
    ProfileDetails {
      id: 1,
      user: Owner {
        id: 7,
        name: "Ada".to_string(),
        avatar: None,
      },
      company: None,
      website: None,
      location: None,
      status: "Developer".to_string(),
      skills: vec![" rust".to_string()],
      bio: None,
      github_username: None,
      social: SocialLinks::default(),
      experience: Vec::new(),
      education: Vec::new(),
      created_at: NaiveDateTime::from_timestamp(1_600_000_000, 0),
    }
  }

  fn experience(title: &str) -> Experience {
    Experience {
      id: Uuid::new_v4(),
      title: title.to_string(),
      company: "Initech".to_string(),
      location: None,
      from: NaiveDate::from_ymd(2019, 1, 1),
      to: None,
      current: true,
      description: None,
    }
  }

  #[test]
  fn experience_is_most_recent_first() {
    let mut profile = profile();
    profile.add_experience(experience("first"));
    profile.add_experience(experience("second"));

    let titles: Vec<&str> = profile.experience.iter()
      .map(|e| e.title.as_str())
      .collect();
    assert_eq!(titles, vec!["second", "first"]);
  }

  #[test]
  fn remove_experience_matches_entry_id() {
    let mut profile = profile();
    let first = experience("first");
    let first_id = first.id;
    profile.add_experience(first);
    profile.add_experience(experience("second"));

    let removed = profile.remove_experience(&first_id).unwrap();
    assert_eq!(removed.title, "first");
    assert_eq!(profile.experience.len(), 1);
    assert_eq!(profile.experience[0].title, "second");
  }

  #[test]
  fn remove_experience_with_unknown_id_is_a_noop() {
    let mut profile = profile();
    profile.add_experience(experience("only"));

    assert!(profile.remove_experience(&Uuid::new_v4()).is_none());
    assert_eq!(profile.experience.len(), 1);
  }

  #[test]
  fn education_field_names_on_the_wire() {
    let entry = Education {
      id: Uuid::new_v4(),
      school: "MIT".to_string(),
      degree: "BSc".to_string(),
      field_of_study: Some("CS".to_string()),
      from: NaiveDate::from_ymd(2015, 9, 1),
      to: None,
      current: false,
      description: None,
    };
    let value = serde_json::to_value(&entry).unwrap();
    assert!(value.get("fieldofstudy").is_some());
    assert!(value.get("field_of_study").is_none());
  }
}
