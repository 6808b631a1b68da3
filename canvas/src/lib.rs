//!
//! # page_canvas
//!
//! `page_canvas` is a device-independent 2D vector graphics layer for generating documents. Drawing
//! is described in page units (points, inches, millimeters and so on) using affine transforms, a
//! stack of saved graphics states and paths built from lines, bezier curves, arcs and shapes.
//!
//! A `RenderDispatcher` validates every drawing instruction and sends it on to up to two sinks: an
//! interactive `SurfaceSink` (which receives the effective device transform along with local
//! geometry) and a `RecorderSink` (which receives the page's default view matrix followed by every
//! change to the user transform, so it can write a persistent copy of the page).
//!
//! Two recorders are supplied: `Vec<RecordedDraw>` keeps a serializable list of the instructions,
//! and `ContentStreamRecorder` writes them out as a PDF-style page content stream.
//!
//! Paths can be flattened into polylines, widened into stroke outlines and tested for containment
//! using either fill rule, so the same geometry can be used for hit testing as for drawing.
//!
#![warn(bare_trait_objects)]

#[macro_use]
extern crate serde_derive;

mod error;
mod geometry;
mod transform;
mod page;
mod graphics_state;
mod color;
mod draw;
mod path_conversion;
mod path;
mod font;
mod texture;
mod sink;
mod recording;
mod content_stream;
mod dispatcher;

pub use self::error::*;
pub use self::geometry::*;
pub use self::transform::*;
pub use self::page::*;
pub use self::graphics_state::*;
pub use self::color::*;
pub use self::draw::*;
pub use self::path_conversion::*;
pub use self::path::*;
pub use self::font::*;
pub use self::texture::*;
pub use self::sink::*;
pub use self::recording::*;
pub use self::content_stream::*;
pub use self::dispatcher::*;

pub use flo_curves as curves;
pub use flo_curves::geo::{Coordinate2D, Coord2};
