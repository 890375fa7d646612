use image::{ImageBuffer, Rgb, Rgba, RgbaImage};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Canvas size and disc layout shared by every node texture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub width: u32,
    pub height: u32,
    pub radius: f64,
    /// Width of the flat-colored ring at the rim of the disc
    pub edge_width: f64,
    /// Light source position in pixel coordinates, deliberately off-center
    pub highlight_anchor: (f64, f64),
}

impl Geometry {
    /// The 64×64 layout used for the shipped textures.
    pub const NODE: Geometry = Geometry {
        width: 64,
        height: 64,
        radius: 28.0,
        edge_width: 2.5,
        highlight_anchor: (18.0, 18.0),
    };

    pub fn center(&self) -> (f64, f64) {
        (
            (self.width as f64 - 1.0) / 2.0,
            (self.height as f64 - 1.0) / 2.0,
        )
    }

    /// Distance from the pixel at (x, y) to the disc center.
    pub fn distance(&self, x: u32, y: u32) -> f64 {
        let (cx, cy) = self.center();
        (x as f64 - cx).hypot(y as f64 - cy)
    }

    pub fn in_edge_ring(&self, distance: f64) -> bool {
        self.radius - self.edge_width <= distance && distance <= self.radius
    }

    /// Highlight intensity at (x, y) before scaling by the style's strength.
    pub fn highlight_falloff(&self, x: u32, y: u32) -> f64 {
        let (ax, ay) = self.highlight_anchor;
        let hx = (x as f64 - ax) / self.radius;
        let hy = (y as f64 - ay) / self.radius;
        (1.0 - (hx * hx + hy * hy)).max(0.0)
    }
}

/// Colors of a single node badge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeStyle {
    pub inner: Rgb<u8>,
    pub outer: Rgb<u8>,
    pub edge: Rgb<u8>,
    pub highlight: Rgb<u8>,
    /// Blend factor toward `highlight` at the anchor, in [0, 1]
    pub highlight_strength: f64,
}

/// Render a complete node texture.
///
/// Pixels outside the disc are fully transparent, everything inside is opaque.
/// Channel math is done in `f64` and truncated toward zero so the output is
/// reproducible pixel for pixel.
pub fn render_node(geometry: &Geometry, style: &NodeStyle) -> RgbaImage {
    ImageBuffer::from_fn(geometry.width, geometry.height, |x, y| {
        shade_pixel(geometry, style, x, y)
    })
}

fn shade_pixel(geometry: &Geometry, style: &NodeStyle, x: u32, y: u32) -> Rgba<u8> {
    let distance = geometry.distance(x, y);
    if distance > geometry.radius {
        return TRANSPARENT;
    }

    let t = (distance / geometry.radius).clamp(0.0, 1.0);
    let mut color = lerp_rgb(style.inner, style.outer, t);

    if geometry.in_edge_ring(distance) {
        color = style.edge;
    }

    let highlight = geometry.highlight_falloff(x, y) * style.highlight_strength;
    if highlight > 0.0 {
        for (channel, target) in color.0.iter_mut().zip(style.highlight.0) {
            *channel = blend_toward(*channel, target, highlight);
        }
    }

    let [r, g, b] = color.0;
    Rgba([r, g, b, 255])
}

fn lerp_rgb(from: Rgb<u8>, to: Rgb<u8>, t: f64) -> Rgb<u8> {
    Rgb([
        lerp(from[0], to[0], t),
        lerp(from[1], to[1], t),
        lerp(from[2], to[2], t),
    ])
}

fn lerp(a: u8, b: u8, t: f64) -> u8 {
    let a = a as f64;
    (a + (b as f64 - a) * t) as u8
}

fn blend_toward(channel: u8, target: u8, amount: f64) -> u8 {
    let channel = channel as f64;
    (channel + amount * (target as f64 - channel)).min(255.0) as u8
}
