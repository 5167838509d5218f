use libreauth::pass::{Algorithm, HashBuilder, Hasher};

use crate::error::*;

pub const PWD_ALGORITHM: Algorithm = Algorithm::Argon2;
pub const PWD_SCHEME_VERSION: usize = 1;

// If the Hasher changes, make sure to increment PWD_SCHEME_VERSION
lazy_static! {
  pub static ref HASHER: Hasher = {
    HashBuilder::new()
      .algorithm(PWD_ALGORITHM)
      .version(PWD_SCHEME_VERSION)
      .finalize()
      .unwrap()
  };
}

#[derive(Debug)]
pub struct CheckedPass {
  pub is_valid: bool,
  pub needs_update: bool,
}

pub fn check_password(stored: &str, password: &str) -> Result<CheckedPass> {
  let checker = HashBuilder::from_phc(stored)?;
  let is_valid = checker.is_valid(password);
  Ok(CheckedPass {
    is_valid,
    needs_update: is_valid && checker.needs_update(Some(PWD_SCHEME_VERSION)),
  })
}

pub fn hash_password(password: &str) -> Result<String> {
  Ok(HASHER.hash(password)?)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn hash_then_check() {
    let stored = hash_password("hunter22").unwrap();
    let checked = check_password(&stored, "hunter22").unwrap();
    assert!(checked.is_valid);
    assert!(!checked.needs_update);

    let wrong = check_password(&stored, "hunter23").unwrap();
    assert!(!wrong.is_valid);
  }
}
