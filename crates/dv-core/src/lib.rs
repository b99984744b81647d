//! Foundational pixel and geometry primitives for dashboard frame analysis.
//!
//! ## Images and Views
//! `Image<T>` owns a contiguous `width * height` buffer. `ImageView` borrows
//! with an element stride, so a rectangular zone of a frame is a zero-copy
//! `subview` of the full frame buffer.
//!
//! ## Coordinates
//! Pixel coordinates are zero-based with `(0, 0)` at the top-left. `Rect`
//! origins may be negative or out of bounds; cropping a view by a `Rect`
//! intersects with the image bounds first and yields `None` for an empty
//! intersection.

mod error;
mod image;
mod rect;

pub use error::Error;
pub use image::{Image, ImageView, Rgb, to_luma};
pub use rect::Rect;
