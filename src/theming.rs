// SPDX-License-Identifier: GPL-3.0-or-later
//! Palette catalog and color pairs.
//!
//! The catalog groups named background/foreground pairs the way the
//! application ships them: `defaults` (light text on dark grey),
//! `alternatives` (high-contrast pairs), `light_mode` (dark text on light
//! surfaces) and `saved` (user-saved pairs fed from local settings).
//! Selections that no longer resolve fall back to the built-in default for
//! the active theme variant.

use crate::color::Color;
use crate::presentation::ThemeVariant;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A background/foreground color pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPair {
    pub background: Color,
    pub foreground: Color,
}

impl ColorPair {
    #[must_use]
    pub const fn new(background: Color, foreground: Color) -> Self {
        Self {
            background,
            foreground,
        }
    }
}

const fn pair(background: u32, foreground: u32) -> ColorPair {
    ColorPair::new(Color::from_u32(background), Color::from_u32(foreground))
}

/// Group used for user-saved palettes.
pub const SAVED_GROUP: &str = "saved";

/// A `(group, name)` reference into the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteSelection {
    pub group: String,
    pub name: String,
}

impl PaletteSelection {
    #[must_use]
    pub fn new(group: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
        }
    }
}

impl Default for PaletteSelection {
    fn default() -> Self {
        default_for(ThemeVariant::Dark)
    }
}

impl fmt::Display for PaletteSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.group, self.name)
    }
}

/// The built-in selection for a theme variant, used when nothing is
/// selected or a selection no longer resolves.
#[must_use]
pub fn default_for(variant: ThemeVariant) -> PaletteSelection {
    match variant {
        ThemeVariant::Dark => PaletteSelection::new("defaults", "White on Dark Grey"),
        ThemeVariant::Light => PaletteSelection::new("light_mode", "Black on Light Grey"),
    }
}

const DEFAULTS: &[(&str, ColorPair)] = &[
    ("White on Dark Grey", pair(0x1c1c1c, 0xffffff)),
    ("Light Grey on Dark Grey", pair(0x1c1c1c, 0xd3d3d3)),
    ("Light Blue on Dark Grey", pair(0x1c1c1c, 0xadd8e6)),
    ("Light Green on Dark Grey", pair(0x1c1c1c, 0x90ee90)),
    ("Light Yellow on Dark Grey", pair(0x1c1c1c, 0xffffe0)),
    ("Light Pink on Dark Grey", pair(0x1c1c1c, 0xffb6c1)),
    ("Light Coral on Dark Grey", pair(0x1c1c1c, 0xf08080)),
    ("Light Cyan on Dark Grey", pair(0x1c1c1c, 0xe0ffff)),
    ("Light Goldenrod on Dark Grey", pair(0x1c1c1c, 0xfafad2)),
    ("Light Sky Blue on Dark Grey", pair(0x1c1c1c, 0x87cefa)),
    ("Light Peach on Dark Grey", pair(0x1c1c1c, 0xffdab9)),
    ("Light Lavender on Dark Grey", pair(0x1c1c1c, 0xe6e6fa)),
    ("Light Mint on Dark Grey", pair(0x1c1c1c, 0xf5fffa)),
    ("Light Wheat on Dark Grey", pair(0x1c1c1c, 0xf5deb3)),
    ("Light Teal on Dark Grey", pair(0x1c1c1c, 0xe0f0ff)),
    ("Light Olive on Dark Grey", pair(0x1c1c1c, 0xf5f5dc)),
];

const ALTERNATIVES: &[(&str, ColorPair)] = &[
    ("Black on Yellow", pair(0xffff00, 0x000000)),
    ("Yellow on Black", pair(0x000000, 0xffff00)),
    ("White on Purple", pair(0x800080, 0xffffff)),
    ("Purple on White", pair(0xffffff, 0x800080)),
    ("White on Black", pair(0x000000, 0xffffff)),
    ("Black on White", pair(0xffffff, 0x000000)),
    ("Blue on Grey", pair(0x808080, 0x0000ff)),
    ("Grey on Blue", pair(0x0000ff, 0x808080)),
    ("Green on Black", pair(0x000000, 0x008000)),
    ("Black on Green", pair(0x008000, 0x000000)),
    ("Red on Yellow", pair(0xffff00, 0xff0000)),
    ("Yellow on Red", pair(0xff0000, 0xffff00)),
    ("Cyan on Black", pair(0x000000, 0x00ffff)),
    ("Black on Cyan", pair(0x00ffff, 0x000000)),
    ("White on Navy", pair(0x000080, 0xffffff)),
    ("Navy on White", pair(0xffffff, 0x000080)),
    ("Yellow on Navy", pair(0x000080, 0xffff00)),
    ("Navy on Yellow", pair(0xffff00, 0x000080)),
    ("White on Maroon", pair(0x800000, 0xffffff)),
    ("Maroon on White", pair(0xffffff, 0x800000)),
];

const LIGHT_MODE: &[(&str, ColorPair)] = &[
    ("Black on Light Grey", pair(0xd3d3d3, 0x000000)),
    ("Navy on Light Yellow", pair(0xffffe0, 0x000080)),
    ("Maroon on Light Cyan", pair(0xe0ffff, 0x800000)),
    ("Green on Light Peach", pair(0xffdab9, 0x008000)),
    ("Purple on Light Lavender", pair(0xe6e6fa, 0x800080)),
    ("Blue on Light Mint", pair(0xf5fffa, 0x0000ff)),
    ("Red on Light Teal", pair(0xe0f0ff, 0xff0000)),
    ("Brown on Light Pink", pair(0xffb6c1, 0xa52a2a)),
    ("Orange on Light Blue", pair(0xadd8e6, 0xff4500)),
];

/// Named palette groups available to the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteCatalog {
    groups: BTreeMap<String, BTreeMap<String, ColorPair>>,
}

impl PaletteCatalog {
    /// The built-in catalog, with an empty `saved` group.
    #[must_use]
    pub fn builtin() -> Self {
        let mut groups = BTreeMap::new();
        for (group, entries) in [
            ("defaults", DEFAULTS),
            ("alternatives", ALTERNATIVES),
            ("light_mode", LIGHT_MODE),
        ] {
            groups.insert(
                group.to_string(),
                entries
                    .iter()
                    .map(|(name, colors)| ((*name).to_string(), *colors))
                    .collect(),
            );
        }
        groups.insert(SAVED_GROUP.to_string(), BTreeMap::new());
        Self { groups }
    }

    /// Replaces the `saved` group with user-saved pairs from settings.
    pub fn set_saved(&mut self, saved: &BTreeMap<String, ColorPair>) {
        self.groups.insert(SAVED_GROUP.to_string(), saved.clone());
    }

    /// Looks a pair up by group and name.
    #[must_use]
    pub fn get(&self, group: &str, name: &str) -> Option<ColorPair> {
        self.groups.get(group).and_then(|g| g.get(name)).copied()
    }

    /// Resolves a selection, falling back to the built-in default for
    /// `variant` when the selection no longer exists (e.g. a saved palette
    /// was removed after being selected).
    #[must_use]
    pub fn resolve(
        &self,
        selection: &PaletteSelection,
        variant: ThemeVariant,
    ) -> (PaletteSelection, ColorPair) {
        if let Some(colors) = self.get(&selection.group, &selection.name) {
            return (selection.clone(), colors);
        }

        tracing::warn!(
            selection = %selection,
            "palette not found, reverting to default"
        );
        let fallback = default_for(variant);
        let colors = self
            .get(&fallback.group, &fallback.name)
            .unwrap_or(DEFAULTS[0].1);
        (fallback, colors)
    }

    /// Iterates groups and their entries in stable order, for building
    /// selection menus.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, ColorPair>)> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Default for PaletteCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Produces a uniformly random background/foreground pair.
///
/// Random bytes come from a v4 UUID, the one entropy source already in the
/// crate's stack.
#[must_use]
pub fn random_pair() -> ColorPair {
    let bytes = *uuid::Uuid::new_v4().as_bytes();
    let colors = ColorPair::new(
        Color::new(bytes[0], bytes[1], bytes[2]),
        Color::new(bytes[3], bytes[4], bytes[5]),
    );
    tracing::info!(
        background = %colors.background,
        foreground = %colors.foreground,
        "set random color palette"
    );
    colors
}
