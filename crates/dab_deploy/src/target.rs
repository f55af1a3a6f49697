//! Deployment targets.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DeployError;

/// The fixed set of deployment environments. Workspace hosts and tokens per
/// target are the external CLI's concern, selected by name.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Dev,
    Staging,
    Prod,
}

impl Target {
    /// Name passed to `--target`, and expected as a key in `databricks.yml`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Staging => "staging",
            Self::Prod => "prod",
        }
    }

    pub fn all() -> [Target; 3] {
        [Self::Dev, Self::Staging, Self::Prod]
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Target {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dev" => Ok(Self::Dev),
            "staging" => Ok(Self::Staging),
            "prod" => Ok(Self::Prod),
            other => Err(DeployError::UnknownTarget(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_names() {
        for target in Target::all() {
            assert_eq!(target.name().parse::<Target>().unwrap(), target);
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("PROD".parse::<Target>().unwrap(), Target::Prod);
    }

    #[test]
    fn unknown_target_is_rejected() {
        assert!(matches!(
            "qa".parse::<Target>(),
            Err(DeployError::UnknownTarget(_))
        ));
    }
}
