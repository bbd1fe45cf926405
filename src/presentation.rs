// SPDX-License-Identifier: GPL-3.0-or-later
//! Derived presentation state.
//!
//! A [`PresentationConfig`] is the output of evaluating an
//! [`EnvironmentSignal`](crate::signal::EnvironmentSignal): the resolved
//! theme variant, the layout breakpoint for the viewport width and the
//! selected color pair. Configs are immutable values compared by equality;
//! a new evaluation supersedes the old config, it never mutates it.

use crate::defaults::{BREAKPOINT_NARROW_MAX_WIDTH, BREAKPOINT_WIDE_MIN_WIDTH};
use crate::theming::{ColorPair, PaletteSelection};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Layout breakpoint identifier derived from the viewport width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    Narrow,
    Medium,
    Wide,
}

impl Breakpoint {
    /// Classifies a viewport width.
    #[must_use]
    pub const fn from_width(width: u32) -> Self {
        if width < BREAKPOINT_NARROW_MAX_WIDTH {
            Breakpoint::Narrow
        } else if width > BREAKPOINT_WIDE_MIN_WIDTH {
            Breakpoint::Wide
        } else {
            Breakpoint::Medium
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Breakpoint::Narrow => "narrow",
            Breakpoint::Medium => "medium",
            Breakpoint::Wide => "wide",
        }
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The resolved theme variant. Unlike
/// [`ThemePreference`](crate::signal::ThemePreference) there is no System
/// value here; evaluation already resolved it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeVariant {
    Light,
    Dark,
}

impl ThemeVariant {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ThemeVariant::Light => "light",
            ThemeVariant::Dark => "dark",
        }
    }

    #[must_use]
    pub const fn is_dark(self) -> bool {
        matches!(self, ThemeVariant::Dark)
    }
}

impl fmt::Display for ThemeVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The derived set of display parameters produced from an environment
/// signal. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationConfig {
    pub theme: ThemeVariant,
    pub breakpoint: Breakpoint,
    /// The palette the colors were resolved from.
    pub palette: PaletteSelection,
    /// Background/foreground pair every surface should render with.
    pub colors: ColorPair,
}
