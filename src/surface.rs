// src/surface.rs
//! Presentation boundary.
//!
//! The crate renders into [`Bitmap`]s and hands finished frames to a
//! [`PresentSurface`]. Window-system and framebuffer backends implement
//! the trait outside this crate.

use anyhow::Result;

use crate::bitmap::Bitmap;

/// A destination that can display a finished frame.
pub trait PresentSurface {
    /// Width and height of the surface in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// Displays the frame. The bitmap is not required to match
    /// [`dimensions`](Self::dimensions); how a mismatch is handled is up to
    /// the backend.
    fn present(&mut self, frame: &Bitmap) -> Result<()>;
}
