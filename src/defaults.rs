// SPDX-License-Identifier: GPL-3.0-or-later
//! Centralized default values for all tunable constants.
//!
//! This module serves as the single source of truth for default values
//! used across the crate. Constants are organized by category.
//!
//! # Categories
//!
//! - **Breakpoint**: Viewport width thresholds for layout breakpoints
//! - **Brightness**: Factors used when deriving hover/pressed colors
//! - **Settings**: Local settings format version bounds
//! - **Sync**: Instance synchronisation port range, timeout and buffer sizes

/// Application name used for the config directory and sync envelopes.
pub const APP_NAME: &str = "AdaptiveUI";

// ==========================================================================
// Breakpoint Thresholds
// ==========================================================================

/// Viewports narrower than this are classified as `Narrow`.
pub const BREAKPOINT_NARROW_MAX_WIDTH: u32 = 600;

/// Viewports wider than this are classified as `Wide`.
/// Widths between the two thresholds (inclusive) are `Medium`.
pub const BREAKPOINT_WIDE_MIN_WIDTH: u32 = 1200;

// ==========================================================================
// Brightness Defaults
// ==========================================================================

/// Default factor applied when darkening a color (active menu backgrounds).
pub const DARKEN_FACTOR: f32 = 0.75;

/// Default factor applied when lightening a color (active menu foregrounds).
pub const LIGHTEN_FACTOR: f32 = 1.75;

// ==========================================================================
// Local Settings Defaults
// ==========================================================================

/// Current local settings format version.
pub const SETTINGS_VERSION: u32 = 1;

/// Lowest settings format version this crate can still load.
pub const SETTINGS_MIN_SUPPORTED_VERSION: u32 = 1;

// ==========================================================================
// Instance Sync Defaults
// ==========================================================================

/// Default port for the instance sync socket.
pub const SYNC_DEFAULT_PORT: u16 = 50007;

/// Lowest port accepted for the sync socket (start of the dynamic range).
pub const SYNC_MIN_PORT: u16 = 49152;

/// Timeout for a client round trip, in seconds.
pub const SYNC_TIMEOUT_SECS: u64 = 10;

/// Read buffer size for a single envelope. Envelopes are small JSON
/// documents; anything larger than this is rejected as malformed.
pub const SYNC_READ_BUFFER_BYTES: usize = 4096;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    // Breakpoint validation
    assert!(BREAKPOINT_NARROW_MAX_WIDTH < BREAKPOINT_WIDE_MIN_WIDTH);
    assert!(BREAKPOINT_NARROW_MAX_WIDTH > 0);

    // Brightness validation
    assert!(DARKEN_FACTOR < 1.0 && DARKEN_FACTOR > 0.0);
    assert!(LIGHTEN_FACTOR > 1.0);

    // Settings validation
    assert!(SETTINGS_MIN_SUPPORTED_VERSION <= SETTINGS_VERSION);

    // Sync validation
    assert!(SYNC_DEFAULT_PORT >= SYNC_MIN_PORT);
    assert!(SYNC_READ_BUFFER_BYTES >= 1024);
};
