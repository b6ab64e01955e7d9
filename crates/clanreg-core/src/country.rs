//! The closed country catalog.
//!
//! Every stored clan carries exactly one [`Country`]. Free-text input is
//! mapped onto the catalog by [`Country::normalize`], which ignores case,
//! surrounding whitespace, and the choice between spaces and underscores.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::{Display, EnumIter, IntoEnumIterator, IntoStaticStr};

use crate::{Error, Result};

/// A member of the country catalog.
///
/// The `Display` form (e.g. `"Czech Republic"`) is the canonical spelling; it
/// is what gets stored and serialised.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Display,
  EnumIter,
  IntoStaticStr,
)]
pub enum Country {
  Albania,
  Andorra,
  Austria,
  Belarus,
  Belgium,
  #[strum(to_string = "Bosnia and Herzegovina")]
  BosniaAndHerzegovina,
  Bulgaria,
  Croatia,
  Cyprus,
  #[strum(to_string = "Czech Republic")]
  CzechRepublic,
  Denmark,
  Estonia,
  Finland,
  France,
  Germany,
  Greece,
  Hungary,
  Iceland,
  Ireland,
  Italy,
  Kosovo,
  Latvia,
  Liechtenstein,
  Lithuania,
  Luxembourg,
  Malta,
  Moldova,
  Monaco,
  Montenegro,
  Netherlands,
  #[strum(to_string = "North Macedonia")]
  NorthMacedonia,
  Norway,
  Poland,
  Portugal,
  Romania,
  #[strum(to_string = "San Marino")]
  SanMarino,
  Serbia,
  Slovakia,
  Slovenia,
  Spain,
  Sweden,
  Switzerland,
  Ukraine,
  #[strum(to_string = "United Kingdom")]
  UnitedKingdom,
  #[strum(to_string = "Vatican City")]
  VaticanCity,
  /// Clans that recruit across borders.
  International,
  /// Sentinel for clans whose country was never determined.
  #[default]
  Unknown,
}

impl Country {
  /// Canonical display spelling, e.g. `"North Macedonia"`.
  pub fn as_str(self) -> &'static str { self.into() }

  /// Upper-snake lookup key, e.g. `"NORTH_MACEDONIA"`.
  pub fn key(self) -> String { lookup_key(self.as_str()) }

  /// Map free-text input onto the catalog.
  ///
  /// `"czech republic"`, `" CZECH_REPUBLIC "` and `"Czech Republic"` all
  /// resolve to [`Country::CzechRepublic`]. Anything else fails with
  /// [`Error::InvalidCountry`] carrying the untouched input.
  pub fn normalize(raw: &str) -> Result<Self> {
    let key = lookup_key(raw);
    if key.is_empty() {
      return Err(Error::InvalidCountry(raw.to_owned()));
    }
    Self::iter()
      .find(|c| c.key() == key)
      .ok_or_else(|| Error::InvalidCountry(raw.to_owned()))
  }

  /// Like [`Country::normalize`], but absent or blank input falls back to
  /// [`Country::Unknown`].
  pub fn normalize_or_unknown(raw: Option<&str>) -> Result<Self> {
    match raw {
      Some(s) if !s.trim().is_empty() => Self::normalize(s),
      _ => Ok(Self::Unknown),
    }
  }

  /// Canonical names of every catalog member, in declaration order.
  pub fn names() -> Vec<&'static str> { Self::iter().map(Self::as_str).collect() }
}

/// Split on whitespace and underscores, upper-case, and re-join with `_`.
fn lookup_key(raw: &str) -> String {
  raw
    .split(|c: char| c.is_whitespace() || c == '_')
    .filter(|word| !word.is_empty())
    .map(str::to_uppercase)
    .collect::<Vec<_>>()
    .join("_")
}

impl FromStr for Country {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> { Self::normalize(s) }
}

impl Serialize for Country {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(self.as_str())
  }
}

impl<'de> Deserialize<'de> for Country {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    struct CountryVisitor;

    impl serde::de::Visitor<'_> for CountryVisitor {
      type Value = Country;

      fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a country name")
      }

      fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Country, E> {
        Country::normalize(v).map_err(E::custom)
      }
    }

    deserializer.deserialize_str(CountryVisitor)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn case_and_separator_variants_agree() {
    for raw in [
      "czech republic",
      "CZECH_REPUBLIC",
      "Czech Republic",
      "  czech_Republic ",
      "Czech   Republic",
    ] {
      assert_eq!(Country::normalize(raw).unwrap(), Country::CzechRepublic, "{raw:?}");
    }
  }

  #[test]
  fn normalize_is_idempotent_over_the_catalog() {
    for country in Country::iter() {
      let once = Country::normalize(country.as_str()).unwrap();
      let twice = Country::normalize(once.as_str()).unwrap();
      assert_eq!(once, country);
      assert_eq!(twice, once);
      assert_eq!(Country::normalize(&country.key()).unwrap(), country);
    }
  }

  #[test]
  fn unknown_input_is_rejected_with_raw_text() {
    let err = Country::normalize("not_a_real_country").unwrap_err();
    assert!(matches!(err, Error::InvalidCountry(ref raw) if raw == "not_a_real_country"));

    assert!(matches!(Country::normalize("   "), Err(Error::InvalidCountry(_))));
  }

  #[test]
  fn sentinels_are_members() {
    assert_eq!(Country::normalize("international").unwrap(), Country::International);
    assert_eq!(Country::normalize("UNKNOWN").unwrap(), Country::Unknown);
    assert_eq!(Country::default(), Country::Unknown);
  }

  #[test]
  fn bosnia_keeps_lowercase_conjunction() {
    assert_eq!(Country::BosniaAndHerzegovina.as_str(), "Bosnia and Herzegovina");
    assert_eq!(
      Country::normalize("BOSNIA_AND_HERZEGOVINA").unwrap(),
      Country::BosniaAndHerzegovina
    );
  }

  #[test]
  fn absent_or_blank_falls_back_to_unknown() {
    assert_eq!(Country::normalize_or_unknown(None).unwrap(), Country::Unknown);
    assert_eq!(Country::normalize_or_unknown(Some("")).unwrap(), Country::Unknown);
    assert_eq!(Country::normalize_or_unknown(Some("france")).unwrap(), Country::France);
    assert!(Country::normalize_or_unknown(Some("Atlantis")).is_err());
  }

  #[test]
  fn names_cover_the_catalog() {
    let names = Country::names();
    assert_eq!(names.len(), 47);
    assert_eq!(names.first(), Some(&"Albania"));
    assert_eq!(names.last(), Some(&"Unknown"));
  }

  #[test]
  fn serde_uses_display_form() {
    let json = serde_json::to_string(&Country::UnitedKingdom).unwrap();
    assert_eq!(json, "\"United Kingdom\"");

    let parsed: Country = serde_json::from_str("\"UNITED_KINGDOM\"").unwrap();
    assert_eq!(parsed, Country::UnitedKingdom);

    assert!(serde_json::from_str::<Country>("\"Narnia\"").is_err());
  }
}
