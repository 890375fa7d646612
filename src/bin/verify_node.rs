use anyhow::{bail, Context, Result};
use node_icon_gen::render::Geometry;

fn main() -> Result<()> {
    let path = std::env::args().nth(1).unwrap_or_else(|| {
        "src/main/resources/assets/craftmastery/textures/gui/node_studied.png".to_string()
    });

    let img = image::open(&path)
        .with_context(|| format!("Failed to open {path}"))?
        .to_rgba8();
    let geometry = Geometry::NODE;

    println!("Checking node texture: {}", path);
    println!("Image dimensions: {}x{}", img.width(), img.height());

    if (img.width(), img.height()) != (geometry.width, geometry.height) {
        bail!(
            "expected {}x{}, found {}x{}",
            geometry.width,
            geometry.height,
            img.width(),
            img.height()
        );
    }

    let center = img.get_pixel(geometry.width / 2, geometry.height / 2);
    println!(
        "Center pixel RGBA: [{}, {}, {}, {}]",
        center[0], center[1], center[2], center[3]
    );

    let mut opaque_outside = 0;
    let mut clear_inside = 0;
    for (x, y, pixel) in img.enumerate_pixels() {
        let inside = geometry.distance(x, y) <= geometry.radius;
        if inside && pixel[3] != 255 {
            clear_inside += 1;
        } else if !inside && pixel[3] != 0 {
            opaque_outside += 1;
        }
    }

    println!("\nMask analysis:");
    println!("  {} pixels inside the disc are not opaque", clear_inside);
    println!("  {} pixels outside the disc are not transparent", opaque_outside);

    if clear_inside + opaque_outside > 0 {
        bail!("circular alpha mask does not match the node geometry");
    }
    println!("✓ Node mask looks right");
    Ok(())
}
