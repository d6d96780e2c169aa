//! Seismic wiggle-trace preparation and rendering.
//!
//! [`wiggle::normalize`] rescales a samples × traces matrix into trace-spacing
//! units and [`wiggle::insert_zeros`] splits a trace at its zero crossings for
//! variable-area fill. [`render::render_wiggle`] drives any
//! [`render::TraceSink`]; the PNG exporter and the egui viewer both replay a
//! recorded [`render::DisplayList`].

pub mod config;
pub mod data;
pub mod export;
pub mod render;
pub mod wiggle;
