use chrono::NaiveDate;

use serde::{Deserialize, Serialize};

use uuid::Uuid;

use crate::error::*;
use crate::models::{Education, Experience, SocialLinks};

use super::{is_missing, non_empty};

/// Skills arrive either as a ready-made list or as one comma-delimited
/// string.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Skills {
  List(Vec<String>),
  Text(String),
}

impl Skills {
  fn is_missing(&self) -> bool {
    match self {
      Skills::List(list) => list.is_empty(),
      Skills::Text(text) => text.trim().is_empty(),
    }
  }

  /// A list is stored as supplied.  A string is comma-split, each entry
  /// trimmed, keeping the single-leading-space convention of the stored
  /// form.
  pub fn normalize(&self) -> Vec<String> {
    match self {
      Skills::List(list) => list.clone(),
      Skills::Text(text) => text
        .split(',')
        .map(|skill| format!(" {}", skill.trim()))
        .collect(),
    }
  }
}

#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct UpsertProfile {
  #[serde(default)]
  pub status: Option<String>,
  #[serde(default)]
  pub skills: Option<Skills>,
  pub company: Option<String>,
  pub website: Option<String>,
  pub location: Option<String>,
  pub bio: Option<String>,
  #[serde(default, rename = "githubusername")]
  pub github_username: Option<String>,
  pub youtube: Option<String>,
  pub twitter: Option<String>,
  pub facebook: Option<String>,
  pub linkedin: Option<String>,
  pub instagram: Option<String>,
}

impl UpsertProfile {
  pub fn validate(&self) -> Result<()> {
    let mut errors = Vec::new();
    if is_missing(&self.status) {
      errors.push("Status is required".to_string());
    }
    match &self.skills {
      Some(skills) if !skills.is_missing() => (),
      _ => errors.push("Skills is required".to_string()),
    }
    if errors.is_empty() {
      Ok(())
    } else {
      Err(Error::Validation(errors))
    }
  }

  pub fn skills_list(&self) -> Vec<String> {
    self.skills.as_ref().map(Skills::normalize).unwrap_or_default()
  }

  /// The social object is rebuilt from exactly the platforms present in
  /// this request on every call.
  pub fn social(&self) -> SocialLinks {
    SocialLinks {
      youtube: self.youtube.clone(),
      twitter: self.twitter.clone(),
      facebook: self.facebook.clone(),
      linkedin: self.linkedin.clone(),
      instagram: self.instagram.clone(),
    }
  }
}

#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ExperienceForm {
  #[serde(default)]
  pub title: Option<String>,
  #[serde(default)]
  pub company: Option<String>,
  pub location: Option<String>,
  #[serde(default)]
  pub from: Option<NaiveDate>,
  pub to: Option<NaiveDate>,
  #[serde(default)]
  pub current: bool,
  pub description: Option<String>,
}

impl ExperienceForm {
  pub fn into_entry(self) -> Result<Experience> {
    let mut errors = Vec::new();
    let title = non_empty(self.title);
    let company = non_empty(self.company);
    if title.is_none() {
      errors.push("Title is required".to_string());
    }
    if company.is_none() {
      errors.push("Company is required".to_string());
    }
    if self.from.is_none() {
      errors.push("From date is required".to_string());
    }
    match (title, company, self.from) {
      (Some(title), Some(company), Some(from)) => Ok(Experience {
        id: Uuid::new_v4(),
        title,
        company,
        location: self.location,
        from,
        to: self.to,
        current: self.current,
        description: self.description,
      }),
      _ => Err(Error::Validation(errors)),
    }
  }
}

#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct EducationForm {
  #[serde(default)]
  pub school: Option<String>,
  #[serde(default)]
  pub degree: Option<String>,
  // accepted but not required, matching the stored document
  #[serde(default, rename = "fieldofstudy")]
  pub field_of_study: Option<String>,
  #[serde(default)]
  pub from: Option<NaiveDate>,
  pub to: Option<NaiveDate>,
  #[serde(default)]
  pub current: bool,
  pub description: Option<String>,
}

impl EducationForm {
  pub fn into_entry(self) -> Result<Education> {
    let mut errors = Vec::new();
    let school = non_empty(self.school);
    let degree = non_empty(self.degree);
    if school.is_none() {
      errors.push("School is required".to_string());
    }
    if degree.is_none() {
      errors.push("Degree is required".to_string());
    }
    if self.from.is_none() {
      errors.push("From date is required".to_string());
    }
    match (school, degree, self.from) {
      (Some(school), Some(degree), Some(from)) => Ok(Education {
        id: Uuid::new_v4(),
        school,
        degree,
        field_of_study: self.field_of_study,
        from,
        to: self.to,
        current: self.current,
        description: self.description,
      }),
      _ => Err(Error::Validation(errors)),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn skills_string_normalizes_each_entry() {
    let skills = Skills::Text("a, b ,c".to_string());
    assert_eq!(skills.normalize(), vec![" a", " b", " c"]);
  }

  #[test]
  fn skills_list_is_stored_as_supplied() {
    let skills = Skills::List(vec!["rust".to_string(), " sql ".to_string()]);
    assert_eq!(skills.normalize(), vec!["rust", " sql "]);
  }

  #[test]
  fn upsert_reports_both_missing_fields() {
    let form = UpsertProfile::default();
    match form.validate() {
      Err(Error::Validation(errors)) => {
        assert_eq!(errors, vec![
          "Status is required".to_string(),
          "Skills is required".to_string(),
        ]);
      },
      other => panic!("expected validation error, got {:?}", other),
    }
  }

  #[test]
  fn empty_skills_string_counts_as_missing() {
    let form = UpsertProfile {
      status: Some("Developer".to_string()),
      skills: Some(Skills::Text("   ".to_string())),
      ..Default::default()
    };
    assert!(form.validate().is_err());
  }

  #[test]
  fn social_keeps_only_supplied_platforms() {
    let form = UpsertProfile {
      twitter: Some("https://twitter.com/ada".to_string()),
      ..Default::default()
    };
    let social = form.social();
    assert_eq!(social.twitter.as_deref(), Some("https://twitter.com/ada"));
    assert!(social.youtube.is_none());
    assert!(social.linkedin.is_none());
  }

  #[test]
  fn experience_requires_title_company_and_from() {
    let form = ExperienceForm::default();
    match form.into_entry() {
      Err(Error::Validation(errors)) => assert_eq!(errors.len(), 3),
      other => panic!("expected validation error, got {:?}", other),
    }
  }

  #[test]
  fn education_does_not_require_fieldofstudy() {
    let form = EducationForm {
      school: Some("MIT".to_string()),
      degree: Some("BSc".to_string()),
      from: Some(NaiveDate::from_ymd(2015, 9, 1)),
      ..Default::default()
    };
    let entry = form.into_entry().unwrap();
    assert!(entry.field_of_study.is_none());
  }
}
