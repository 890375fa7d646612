use crate::png_writer::write_png;
use crate::render::{render_node, Geometry, NodeStyle};
use anyhow::{Context, Result};
use image::Rgb;
use std::{
    fs::{create_dir_all, OpenOptions},
    io::{BufWriter, ErrorKind},
    path::{Path, PathBuf},
};
use tracing::info;

/// Where the mod looks up its GUI textures, relative to the project root.
pub const TEXTURE_SUBDIR: [&str; 7] = [
    "src",
    "main",
    "resources",
    "assets",
    "craftmastery",
    "textures",
    "gui",
];

#[derive(Debug)]
pub struct Args {
    pub output: PathBuf,
}

/// One of the node textures shipped with the mod.
#[derive(Debug, Clone, Copy)]
pub struct NodeVariant {
    pub name: &'static str,
    pub file_name: &'static str,
    pub style: NodeStyle,
}

pub const STUDIED: NodeVariant = NodeVariant {
    name: "studied",
    file_name: "node_studied.png",
    style: NodeStyle {
        inner: Rgb([102, 187, 106]), // #66BB6A
        outer: Rgb([46, 125, 50]),   // #2E7D32
        edge: Rgb([200, 230, 201]),  // #C8E6C9
        highlight: Rgb([236, 255, 241]),
        highlight_strength: 0.45,
    },
};

pub const UNLOCKED: NodeVariant = NodeVariant {
    name: "unlocked",
    file_name: "node_unlocked.png",
    style: NodeStyle {
        inner: Rgb([255, 213, 79]), // #FFD54F
        outer: Rgb([255, 152, 0]),  // #FF9800
        edge: Rgb([255, 224, 178]), // #FFE0B2
        highlight: Rgb([255, 249, 230]),
        highlight_strength: 0.35,
    },
};

pub const VARIANTS: [NodeVariant; 2] = [STUDIED, UNLOCKED];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Generated,
    /// A file was already present and has been left alone
    Skipped,
}

/// Resolve the texture directory under a project root.
pub fn output_dir(root: &Path) -> PathBuf {
    TEXTURE_SUBDIR
        .iter()
        .fold(root.to_path_buf(), |path, part| path.join(part))
}

pub fn generate_nodes(args: &Args) -> Result<Vec<(&'static str, Outcome)>> {
    create_dir_all(&args.output).with_context(|| {
        format!(
            "Can't create output directory {}",
            args.output.display()
        )
    })?;
    info!("Writing node textures to {}", args.output.display());

    VARIANTS
        .iter()
        .map(|variant| Ok((variant.name, generate_node(&args.output, variant)?)))
        .collect()
}

/// Render and write a single texture unless the file already exists.
///
/// The file is opened with `create_new`, so the existence check and the
/// creation happen as one operation and two concurrent runs can't both write.
pub fn generate_node(out_dir: &Path, variant: &NodeVariant) -> Result<Outcome> {
    let path = out_dir.join(variant.file_name);

    let file = match OpenOptions::new().write(true).create_new(true).open(&path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::AlreadyExists => {
            info!("Skipping {}: already exists", variant.file_name);
            return Ok(Outcome::Skipped);
        }
        Err(err) => {
            return Err(err).with_context(|| format!("Failed to create {}", path.display()))
        }
    };

    let canvas = render_node(&Geometry::NODE, &variant.style);
    write_png(&canvas, BufWriter::new(file))
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!("✓ Generated {}", variant.file_name);
    Ok(Outcome::Generated)
}
