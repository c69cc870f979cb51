use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::DrsError::InvalidPassport;
use crate::error::Result;

/// The form body accepted by the POST endpoints: zero or more encoded JWT
/// GA4GH Passports with embedded Visas, and an expand flag controlling bundle
/// expansion. It implements [Deserialize] so the binding is declared
/// statically rather than rewritten per field at runtime.
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct Passports {
  pub expand: bool,
  pub passports: Vec<String>,
}

impl Passports {
  /// Create a new passports body.
  pub fn new(expand: bool, passports: Vec<String>) -> Self {
    Self { expand, passports }
  }

  /// Structurally check each submitted token: three non-empty base64url
  /// segments, as for any signed JWT. Cryptographic verification of the
  /// Passport and its Visas belongs to an external policy engine and is not
  /// performed here.
  pub fn validate(&self) -> Result<()> {
    for token in &self.passports {
      let segments: Vec<&str> = token.split('.').collect();

      let structurally_valid = segments.len() == 3
        && segments
          .iter()
          .all(|segment| !segment.is_empty() && URL_SAFE_NO_PAD.decode(segment).is_ok());

      if !structurally_valid {
        return Err(InvalidPassport(
          "passport is not a structurally valid signed JWT".to_string(),
        ));
      }
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::DrsError;

  const EXAMPLE_PASSPORT: &str = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.\
    eyJnYTRnaF9wYXNzcG9ydF92MSI6W119.\
    JJ5rN0ktP0qwyZmIPpxmF_p7JsxAZH6L6brUxtad3CM";

  fn example_passport() -> String {
    EXAMPLE_PASSPORT.to_string()
  }

  #[test]
  fn no_passports_is_valid() {
    assert!(Passports::default().validate().is_ok());
  }

  #[test]
  fn well_formed_passport_is_valid() {
    let passports = Passports::new(false, vec![example_passport()]);
    assert!(passports.validate().is_ok());
  }

  #[test]
  fn malformed_passport_is_rejected() {
    for token in ["not-a-jwt", "only.two", "a..b", "ö.ö.ö"] {
      let passports = Passports::new(false, vec![token.to_string()]);
      assert!(matches!(
        passports.validate(),
        Err(DrsError::InvalidPassport(_))
      ));
    }
  }

  #[test]
  fn one_malformed_passport_rejects_the_set() {
    let passports = Passports::new(false, vec![example_passport(), "bad".to_string()]);
    assert!(matches!(
      passports.validate(),
      Err(DrsError::InvalidPassport(_))
    ));
  }
}
