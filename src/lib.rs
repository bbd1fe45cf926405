// SPDX-License-Identifier: GPL-3.0-or-later
//! `adaptive-ui` is a toolkit-agnostic presentation engine for adaptive
//! desktop user interfaces.
//!
//! The core is the [`controller::AdaptationController`]: it turns an
//! [`signal::EnvironmentSignal`] (viewport size, color-scheme preference)
//! into an immutable [`presentation::PresentationConfig`] (theme variant,
//! layout breakpoint, color palette) and forwards it to a
//! [`controller::RenderSurface`]. Around the core sit the palette catalog,
//! persisted local settings and a localhost socket layer that keeps
//! multiple running instances' presentation in sync.
//!
//! No widget toolkit is assumed; the host application implements
//! `RenderSurface` for whatever it renders with.

#![doc(html_root_url = "https://docs.rs/adaptive-ui/1.1.0")]

pub mod color;
pub mod controller;
pub mod defaults;
pub mod error;
pub mod presentation;
pub mod settings;
pub mod signal;
pub mod sync;
pub mod theming;
pub mod toggle;

pub use color::Color;
pub use controller::{AdaptationController, RenderSurface};
pub use error::{Error, Result};
pub use presentation::{Breakpoint, PresentationConfig, ThemeVariant};
pub use signal::{EnvironmentSignal, ThemePreference};
