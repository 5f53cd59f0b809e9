//! User preferences collected before generating a plan
//!
//! Enum values serialize to the labels shown to the user (and sent to the
//! model), so stored plans read the same in every build of the app.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// ---------------------------------------------------------------------------
/// Catalogue
/// ---------------------------------------------------------------------------

pub const WORKOUT_MODELS: &[&str] = &[
  "PPL (Push/Pull/Legs)",
  "Upper / Lower",
  "ABC",
  "ABCD",
  "ABCDE",
  "Full Body",
  "Tradicional (Seg-Sex)",
  "Personalizado",
];

/// Sentinel restriction meaning "no physical limitation"
pub const NO_RESTRICTION: &str = "Nenhuma";

pub const RESTRICTION_OPTIONS: &[&str] = &["Joelho", "Ombro", "Coluna", "Cotovelo", NO_RESTRICTION];

/// ---------------------------------------------------------------------------
/// Choice Enums
/// ---------------------------------------------------------------------------

macro_rules! labelled_enum {
  (
    $(#[$meta:meta])*
    $name:ident { $( $(#[$vmeta:meta])* $variant:ident => $label:literal, $key:literal ),+ $(,)? }
  ) => {
    $(#[$meta])*
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub enum $name {
      $(
        $(#[$vmeta])*
        #[serde(rename = $label)]
        $variant,
      )+
    }

    impl $name {
      pub const ALL: &'static [$name] = &[$($name::$variant),+];

      pub fn label(&self) -> &'static str {
        match self {
          $(Self::$variant => $label,)+
        }
      }
    }

    impl std::fmt::Display for $name {
      fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
      }
    }

    impl std::str::FromStr for $name {
      type Err = String;

      /// Accepts either the display label or the short ASCII key
      fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        $(
          if s == $label || s.eq_ignore_ascii_case($key) {
            return Ok(Self::$variant);
          }
        )+
        Err(format!("Unknown {}: {}", stringify!($name).to_lowercase(), s))
      }
    }
  };
}

labelled_enum! {
  /// Training objective
  Goal {
    Hypertrophy => "Hipertrofia", "hypertrophy",
    Strength => "Força", "strength",
    Endurance => "Resistência", "endurance",
    Definition => "Definição", "definition",
    WeightLoss => "Emagrecimento", "weight-loss",
  }
}

labelled_enum! {
  /// Experience level
  Level {
    Beginner => "Iniciante", "beginner",
    Intermediate => "Intermediário", "intermediate",
    Advanced => "Avançado", "advanced",
  }
}

labelled_enum! {
  /// Available equipment
  Equipment {
    FullGym => "Academia Completa", "full-gym",
    BasicGym => "Academia Básica", "basic-gym",
    HomeGym => "Home Gym (Halteres/Elásticos)", "home-gym",
    Bodyweight => "Sem Equipamento (Calistenia)", "bodyweight",
  }
}

labelled_enum! {
  /// Training days per week
  Frequency {
    Two => "2 dias", "2",
    Three => "3 dias", "3",
    Four => "4 dias", "4",
    Five => "5 dias", "5",
    Six => "6 dias", "6",
  }
}

/// ---------------------------------------------------------------------------
/// Restrictions
/// ---------------------------------------------------------------------------

/// Set of physical restriction labels.
///
/// Never empty: holds either the `Nenhuma` sentinel alone or one or more
/// concrete restrictions, in selection order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Restrictions(Vec<String>);

impl Default for Restrictions {
  fn default() -> Self {
    Self(vec![NO_RESTRICTION.to_string()])
  }
}

impl Restrictions {
  /// Build from a list of labels, normalizing the sentinel rules
  pub fn from_labels<I, S>(labels: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    labels
      .into_iter()
      .fold(Self::default(), |acc, label| acc.select(label.as_ref()))
  }

  /// Select a label without deselecting it if already present
  fn select(mut self, label: &str) -> Self {
    if label == NO_RESTRICTION {
      return Self::default();
    }
    self.0.retain(|r| r != NO_RESTRICTION);
    if !self.0.iter().any(|r| r == label) {
      self.0.push(label.to_string());
    }
    self
  }

  /// Toggle a restriction label.
  ///
  /// Choosing the sentinel clears every concrete restriction; choosing a
  /// concrete one drops the sentinel; removing the last concrete one brings
  /// the sentinel back.
  pub fn toggle(&self, label: &str) -> Self {
    if label == NO_RESTRICTION {
      return Self::default();
    }

    let mut next: Vec<String> = self
      .0
      .iter()
      .filter(|r| r.as_str() != NO_RESTRICTION)
      .cloned()
      .collect();

    if let Some(pos) = next.iter().position(|r| r == label) {
      next.remove(pos);
    } else {
      next.push(label.to_string());
    }

    if next.is_empty() {
      Self::default()
    } else {
      Self(next)
    }
  }

  pub fn is_none(&self) -> bool {
    self.0.len() == 1 && self.0[0] == NO_RESTRICTION
  }

  pub fn as_slice(&self) -> &[String] {
    &self.0
  }
}

impl<'de> Deserialize<'de> for Restrictions {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: serde::Deserializer<'de>,
  {
    let labels = Vec::<String>::deserialize(deserializer)?;
    Ok(Self::from_labels(labels))
  }
}

/// ---------------------------------------------------------------------------
/// Preferences
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum ValidationError {
  #[error("Select at least one workout model")]
  NoModelSelected,

  #[error("Unknown workout model: {0}")]
  UnknownModel(String),

  #[error("Unknown restriction: {0}")]
  UnknownRestriction(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreferences {
  pub models: Vec<String>,
  pub goal: Goal,
  pub level: Level,
  pub equipment: Equipment,
  pub frequency: Frequency,
  #[serde(default)]
  pub restrictions: Restrictions,
}

impl Default for UserPreferences {
  fn default() -> Self {
    Self {
      models: Vec::new(),
      goal: Goal::Hypertrophy,
      level: Level::Intermediate,
      equipment: Equipment::FullGym,
      frequency: Frequency::Four,
      restrictions: Restrictions::default(),
    }
  }
}

impl UserPreferences {
  /// Add the model if missing, remove it if present
  pub fn toggle_model(&mut self, model: &str) {
    if let Some(pos) = self.models.iter().position(|m| m == model) {
      self.models.remove(pos);
    } else {
      self.models.push(model.to_string());
    }
  }

  pub fn toggle_restriction(&mut self, label: &str) {
    self.restrictions = self.restrictions.toggle(label);
  }

  /// Checked before any generation request goes out
  pub fn validate(&self) -> Result<(), ValidationError> {
    if self.models.is_empty() {
      return Err(ValidationError::NoModelSelected);
    }
    if let Some(model) = self.models.iter().find(|m| !WORKOUT_MODELS.contains(&m.as_str())) {
      return Err(ValidationError::UnknownModel(model.clone()));
    }
    if let Some(label) = self
      .restrictions
      .as_slice()
      .iter()
      .find(|r| !RESTRICTION_OPTIONS.contains(&r.as_str()))
    {
      return Err(ValidationError::UnknownRestriction(label.clone()));
    }
    Ok(())
  }
}
