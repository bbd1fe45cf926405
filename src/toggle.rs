// SPDX-License-Identifier: GPL-3.0-or-later
//! Named boolean runtime flags.

use std::fmt;

/// A named boolean flag that can be flipped at runtime, for options that
/// debug menus and sync handlers toggle while the application runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleVar {
    name: &'static str,
    state: bool,
}

impl ToggleVar {
    #[must_use]
    pub const fn new(name: &'static str, state: bool) -> Self {
        Self { name, state }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.state
    }

    pub fn set(&mut self, state: bool) -> bool {
        self.state = state;
        state
    }

    /// Flips the flag and returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.state = !self.state;
        tracing::debug!(name = self.name, state = self.state, "toggled flag");
        self.state
    }

    /// Human-readable state, for debug displays.
    #[must_use]
    pub const fn state_label(&self) -> &'static str {
        if self.state {
            "Enabled"
        } else {
            "Disabled"
        }
    }
}

impl fmt::Display for ToggleVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.state_label())
    }
}
