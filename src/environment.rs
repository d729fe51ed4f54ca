//! Render environment threaded through every resolution and render call.

use crate::variant::Variant;

/// Environment variable consulted by [`RenderContext::from_env`].
pub const ENV_VAR: &str = "BDLR_ENV";

/// Build flavour the bundles are rendered for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
  /// Individual tags per source file, debug variants preferred.
  #[default]
  Development,
  /// One hashed tag per bundle, minified variants preferred.
  Production,
}

impl Environment {
  /// Interpret a raw environment value. Only `production` and `prod` select production.
  pub fn parse(value: Option<&str>) -> Self {
    match value {
      Some("production" | "prod") => Self::Production,
      _ => Self::Development,
    }
  }

  /// Variant markers in the order they are probed on disk.
  pub fn variant_order(self) -> [Variant; 3] {
    match self {
      Self::Development => [Variant::Debug, Variant::Plain, Variant::Minified],
      Self::Production => [Variant::Minified, Variant::Plain, Variant::Debug],
    }
  }
}

/// Per-call rendering configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderContext {
  /// Environment the output is produced for.
  pub environment: Environment,
}

impl RenderContext {
  /// Context for development output.
  pub fn development() -> Self {
    Self {
      environment: Environment::Development,
    }
  }

  /// Context for production output.
  pub fn production() -> Self {
    Self {
      environment: Environment::Production,
    }
  }

  /// Build a context from a raw environment value such as `"prod"`.
  pub fn from_value(value: Option<&str>) -> Self {
    Self {
      environment: Environment::parse(value),
    }
  }

  /// Read the environment from [`ENV_VAR`]; unset or non-unicode values mean development.
  pub fn from_env() -> Self {
    let value = std::env::var(ENV_VAR).ok();
    Self::from_value(value.as_deref())
  }

  /// Whether production output is requested.
  pub fn is_production(&self) -> bool {
    self.environment == Environment::Production
  }
}
