//! Container options with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults (auto check on, fail on violation)
//! 2. Optional TOML file passed to [`TreeOptions::load`]
//! 3. Environment variables: `VALTREE_*` prefix

use std::path::Path;

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::errors::OptionsError;

/// Validation behaviour of a [`Tree`](crate::domain::Tree), fixed at creation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TreeOptions {
    /// Run the acyclicity check before every child insertion.
    pub enable_auto_check: bool,
    /// Fail the mutation on a rejected child instead of dropping it.
    /// Only meaningful when `enable_auto_check` is set.
    pub throw_on_error: bool,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self::strict()
    }
}

impl TreeOptions {
    /// Check every insertion and fail fast.
    pub fn strict() -> Self {
        Self {
            enable_auto_check: true,
            throw_on_error: true,
        }
    }

    /// Check every insertion, silently drop rejected values.
    pub fn lenient() -> Self {
        Self {
            enable_auto_check: true,
            throw_on_error: false,
        }
    }

    /// Skip the acyclicity check. The caller guarantees acyclic input;
    /// unbounded walks over a cyclic tree do not terminate.
    pub fn unchecked() -> Self {
        Self {
            enable_auto_check: false,
            throw_on_error: false,
        }
    }

    pub fn with_auto_check(mut self, enabled: bool) -> Self {
        self.enable_auto_check = enabled;
        self
    }

    pub fn with_throw_on_error(mut self, throw: bool) -> Self {
        self.throw_on_error = throw;
        self
    }

    /// True when a failed check must surface as an error.
    pub fn fails_fast(&self) -> bool {
        self.enable_auto_check && self.throw_on_error
    }

    /// Load options with layered precedence.
    ///
    /// # Arguments
    /// * `path` - Optional TOML file; missing files are an error
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. TOML file (`enable_auto_check = false`, ...)
    /// 3. Environment variables: `VALTREE_ENABLE_AUTO_CHECK`, `VALTREE_THROW_ON_ERROR`
    #[instrument(level = "debug")]
    pub fn load(path: Option<&Path>) -> Result<Self, OptionsError> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("enable_auto_check", defaults.enable_auto_check)?
            .set_default("throw_on_error", defaults.throw_on_error)?;

        if let Some(path) = path {
            if !path.exists() {
                return Err(OptionsError::FileNotFound(path.to_path_buf()));
            }
            builder = builder.add_source(
                File::from(path.to_path_buf())
                    .format(FileFormat::Toml)
                    .required(true),
            );
        }

        builder = builder.add_source(
            Environment::with_prefix("VALTREE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let options: Self = builder.build()?.try_deserialize()?;
        debug!(?options, "loaded tree options");
        Ok(options)
    }
}
