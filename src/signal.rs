// SPDX-License-Identifier: GPL-3.0-or-later
//! Environment signals: immutable snapshots of the runtime conditions that
//! drive presentation decisions (viewport size, color-scheme preference).
//!
//! A signal is created by whatever observation mechanism the host
//! application wires up (a resize callback, an OS theme query) and handed
//! to the [`AdaptationController`](crate::controller::AdaptationController).
//! It is plain data; all interpretation happens during evaluation.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// The user's (or system's) color-scheme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    #[default]
    System,
}

impl ThemePreference {
    /// Returns true if the effective theme is dark.
    /// For System, detects the actual system theme, defaulting to dark on
    /// detection error.
    #[must_use]
    pub fn is_dark(self) -> bool {
        match self {
            ThemePreference::Light => false,
            ThemePreference::Dark => true,
            ThemePreference::System => {
                !matches!(dark_light::detect(), Ok(dark_light::Mode::Light))
            }
        }
    }
}

/// An immutable snapshot of observable runtime conditions relevant to
/// presentation. Created on each observed change and discarded after
/// evaluation; never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentSignal {
    /// Viewport width in logical pixels.
    pub width: u32,
    /// Viewport height in logical pixels.
    pub height: u32,
    /// Color-scheme preference carried by the environment.
    #[serde(default)]
    pub theme: ThemePreference,
}

impl EnvironmentSignal {
    #[must_use]
    pub const fn new(width: u32, height: u32, theme: ThemePreference) -> Self {
        Self {
            width,
            height,
            theme,
        }
    }

    /// Checks that the signal carries sensible values.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` if either dimension is zero.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::Validation(format!(
                "viewport dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}
