//! Procedural generator for the circular node badges shown in the recipe tree.
//!
//! The pipeline is small: [`render`] shades a canvas, [`png_writer`] turns it
//! into a PNG byte stream, and [`node_gen`] decides which textures need to be
//! written and where.

pub mod node_gen;
pub mod png_writer;
pub mod render;
