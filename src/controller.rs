// SPDX-License-Identifier: GPL-3.0-or-later
//! The adaptation controller.
//!
//! The controller converts an [`EnvironmentSignal`] into a
//! [`PresentationConfig`] and forwards it to a rendering surface. It is
//! synchronous and single-threaded: whatever observation mechanism detects
//! environment changes (a resize callback, a polling timer, a sync signal
//! from another instance) calls [`AdaptationController::on_signal_changed`]
//! directly.
//!
//! Evaluation is pure. The only state the controller owns is the last
//! applied config (read-only to callers) and its explicit inputs: the
//! palette catalog, the current palette selection and runtime options.

use crate::error::Result;
use crate::presentation::{Breakpoint, PresentationConfig, ThemeVariant};
use crate::signal::EnvironmentSignal;
use crate::theming::{self, PaletteCatalog, PaletteSelection};
use crate::toggle::ToggleVar;

/// External consumer that visually applies a presentation config.
///
/// Implementations are expected to be idempotent: applying an equal config
/// twice must not change what is rendered.
pub trait RenderSurface {
    fn apply(&mut self, config: &PresentationConfig);
}

/// Runtime options of the controller.
#[derive(Debug, Clone)]
pub struct ControllerOptions {
    /// When enabled, an unchanged config is re-applied to the surface
    /// anyway (used after the surface was rebuilt from scratch).
    pub force_reapply: ToggleVar,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            force_reapply: ToggleVar::new("FORCE_REAPPLY", false),
        }
    }
}

/// Maps environment signals to presentation configs and pushes them to a
/// rendering surface.
pub struct AdaptationController<S: RenderSurface> {
    surface: S,
    catalog: PaletteCatalog,
    palette: Option<PaletteSelection>,
    pub options: ControllerOptions,
    last_applied: Option<PresentationConfig>,
}

impl<S: RenderSurface> AdaptationController<S> {
    pub fn new(surface: S) -> Self {
        Self::with_catalog(surface, PaletteCatalog::builtin())
    }

    pub fn with_catalog(surface: S, catalog: PaletteCatalog) -> Self {
        Self {
            surface,
            catalog,
            palette: None,
            options: ControllerOptions::default(),
            last_applied: None,
        }
    }

    /// Selects the palette used by subsequent evaluations. The selection
    /// is an explicit input; it does not trigger a render by itself.
    pub fn set_palette(&mut self, selection: PaletteSelection) {
        tracing::debug!(selection = %selection, "palette selected");
        self.palette = Some(selection);
    }

    /// Reverts to the per-variant default palette.
    pub fn clear_palette(&mut self) {
        self.palette = None;
    }

    pub fn catalog_mut(&mut self) -> &mut PaletteCatalog {
        &mut self.catalog
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// The config currently in effect, if any signal was applied yet.
    #[must_use]
    pub fn last_applied(&self) -> Option<&PresentationConfig> {
        self.last_applied.as_ref()
    }

    /// Derives the presentation config for a signal.
    ///
    /// Deterministic and side-effect free: for equal signals (and an
    /// unchanged palette selection) the returned configs compare equal.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` when the signal is malformed
    /// (non-positive dimensions). The controller state is untouched.
    pub fn evaluate(&self, signal: &EnvironmentSignal) -> Result<PresentationConfig> {
        signal.validate()?;

        let theme = if signal.theme.is_dark() {
            ThemeVariant::Dark
        } else {
            ThemeVariant::Light
        };
        let breakpoint = Breakpoint::from_width(signal.width);

        let selection = self
            .palette
            .clone()
            .unwrap_or_else(|| theming::default_for(theme));
        let (palette, colors) = self.catalog.resolve(&selection, theme);

        Ok(PresentationConfig {
            theme,
            breakpoint,
            palette,
            colors,
        })
    }

    /// Invoked by the observation source whenever the environment changes.
    ///
    /// Evaluates the signal and forwards the result to the surface's
    /// `apply`, exactly once per distinct config: a repeated equal config
    /// is skipped unless `options.force_reapply` is enabled.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` for a malformed signal; the previously
    /// applied config stays in effect (no partial update).
    pub fn on_signal_changed(&mut self, signal: &EnvironmentSignal) -> Result<PresentationConfig> {
        let config = self.evaluate(signal)?;

        let unchanged = self.last_applied.as_ref() == Some(&config);
        if unchanged && !self.options.force_reapply.enabled() {
            tracing::debug!(
                theme = %config.theme,
                breakpoint = %config.breakpoint,
                "config unchanged, skipping apply"
            );
        } else {
            tracing::debug!(
                theme = %config.theme,
                breakpoint = %config.breakpoint,
                palette = %config.palette,
                "applying presentation config"
            );
            self.surface.apply(&config);
            self.last_applied = Some(config.clone());
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::error::Error;
    use crate::signal::ThemePreference;

    /// Test surface that records every applied config.
    #[derive(Default)]
    struct RecordingSurface {
        applied: Vec<PresentationConfig>,
    }

    impl RenderSurface for RecordingSurface {
        fn apply(&mut self, config: &PresentationConfig) {
            self.applied.push(config.clone());
        }
    }

    fn controller() -> AdaptationController<RecordingSurface> {
        AdaptationController::new(RecordingSurface::default())
    }

    #[test]
    fn evaluate_is_deterministic() {
        let ctrl = controller();
        let signal = EnvironmentSignal::new(1024, 768, ThemePreference::Dark);
        let first = ctrl.evaluate(&signal).expect("valid signal");
        let second = ctrl.evaluate(&signal).expect("valid signal");
        assert_eq!(first, second);
    }

    #[test]
    fn wide_dark_signal_selects_dark_wide_config() {
        let ctrl = controller();
        let signal = EnvironmentSignal::new(1920, 1080, ThemePreference::Dark);
        let config = ctrl.evaluate(&signal).expect("valid signal");

        assert_eq!(config.theme, ThemeVariant::Dark);
        assert_eq!(config.breakpoint, Breakpoint::Wide);
        assert_eq!(config.colors.background, Color::from_u32(0x1c1c1c));
    }

    #[test]
    fn narrow_light_signal_selects_light_narrow_config() {
        let ctrl = controller();
        let signal = EnvironmentSignal::new(320, 480, ThemePreference::Light);
        let config = ctrl.evaluate(&signal).expect("valid signal");

        assert_eq!(config.theme, ThemeVariant::Light);
        assert_eq!(config.breakpoint, Breakpoint::Narrow);
        assert_eq!(config.colors.background, Color::from_u32(0xd3d3d3));
    }

    #[test]
    fn zero_width_signal_fails_with_validation_error() {
        let ctrl = controller();
        let signal = EnvironmentSignal::new(0, 100, ThemePreference::Dark);
        assert!(matches!(ctrl.evaluate(&signal), Err(Error::Validation(_))));
    }

    #[test]
    fn invalid_signal_leaves_prior_config_in_effect() {
        let mut ctrl = controller();
        let valid = EnvironmentSignal::new(800, 600, ThemePreference::Dark);
        let applied = ctrl.on_signal_changed(&valid).expect("valid signal");

        let invalid = EnvironmentSignal::new(0, 600, ThemePreference::Dark);
        assert!(ctrl.on_signal_changed(&invalid).is_err());

        assert_eq!(ctrl.last_applied(), Some(&applied));
        assert_eq!(ctrl.surface.applied.len(), 1);

        // A new valid signal resumes normally.
        let next = EnvironmentSignal::new(1300, 900, ThemePreference::Dark);
        let config = ctrl.on_signal_changed(&next).expect("valid signal");
        assert_eq!(config.breakpoint, Breakpoint::Wide);
        assert_eq!(ctrl.surface.applied.len(), 2);
    }

    #[test]
    fn repeated_equal_signal_applies_once() {
        let mut ctrl = controller();
        let signal = EnvironmentSignal::new(800, 600, ThemePreference::Dark);

        ctrl.on_signal_changed(&signal).expect("valid signal");
        ctrl.on_signal_changed(&signal).expect("valid signal");

        assert_eq!(ctrl.surface.applied.len(), 1);
    }

    #[test]
    fn force_reapply_overrides_dedup() {
        let mut ctrl = controller();
        ctrl.options.force_reapply.set(true);
        let signal = EnvironmentSignal::new(800, 600, ThemePreference::Dark);

        ctrl.on_signal_changed(&signal).expect("valid signal");
        ctrl.on_signal_changed(&signal).expect("valid signal");

        assert_eq!(ctrl.surface.applied.len(), 2);
    }

    #[test]
    fn palette_selection_flows_into_config() {
        let mut ctrl = controller();
        ctrl.set_palette(PaletteSelection::new("alternatives", "Yellow on Black"));
        let signal = EnvironmentSignal::new(800, 600, ThemePreference::Dark);
        let config = ctrl.evaluate(&signal).expect("valid signal");

        assert_eq!(config.palette.name, "Yellow on Black");
        assert_eq!(config.colors.foreground, Color::from_u32(0xffff00));
    }

    #[test]
    fn unknown_palette_falls_back_to_variant_default() {
        let mut ctrl = controller();
        ctrl.set_palette(PaletteSelection::new("saved", "Removed"));
        let signal = EnvironmentSignal::new(800, 600, ThemePreference::Light);
        let config = ctrl.evaluate(&signal).expect("valid signal");

        assert_eq!(config.palette, theming::default_for(ThemeVariant::Light));
    }
}
