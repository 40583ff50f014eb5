use std::time::{Duration, Instant};

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, Rgba32FImage, RgbaImage};

use super::geometry::centered_square;
use crate::error::{Result, StackError};
use crate::state::Stack;

/// A finished composite
#[derive(Debug, Clone)]
pub struct Composite {
    pub image: RgbaImage,
    pub layers: usize,
    pub elapsed: Duration,
}

/// Draw every entry of `stack`, bottom to top, onto a cleared
/// `canvas_size` x `canvas_size` canvas.
///
/// Each entry is cropped to its centered square and stretched to cover the
/// whole canvas, then blended source-over onto what is already there.
pub fn composite(stack: &Stack, canvas_size: u32, filter: FilterType) -> RgbaImage {
    // Fully transparent
    let mut canvas = RgbaImage::new(canvas_size, canvas_size);

    for entry in stack.iter() {
        let Some(crop) = centered_square(entry.width(), entry.height()) else {
            tracing::debug!("Skipping empty image {}", entry.source.name);
            continue;
        };

        let square = entry.image.crop_imm(crop.x, crop.y, crop.side, crop.side);
        let layer = if crop.side == canvas_size {
            square.to_rgba8()
        } else {
            stretch(&square, canvas_size, filter)
        };

        imageops::overlay(&mut canvas, &layer, 0, 0);
    }

    canvas
}

/// Resample `square` to `size` x `size` in premultiplied alpha.
///
/// Colour stored under fully transparent pixels carries no weight, so it
/// cannot bleed into the opaque neighbours.
fn stretch(square: &DynamicImage, size: u32, filter: FilterType) -> RgbaImage {
    let mut premultiplied: Rgba32FImage = square.to_rgba32f();
    for p in premultiplied.pixels_mut() {
        let a = p[3];
        p[0] *= a;
        p[1] *= a;
        p[2] *= a;
    }

    let resized = imageops::resize(&premultiplied, size, size, filter);

    RgbaImage::from_fn(size, size, |x, y| {
        let [r, g, b, a] = resized.get_pixel(x, y).0;
        let a = a.clamp(0.0, 1.0);
        if a <= 0.0 {
            return Rgba([0, 0, 0, 0]);
        }
        let channel = |v: f32| ((v / a).clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgba([channel(r), channel(g), channel(b), (a * 255.0).round() as u8])
    })
}

/// Composite on the blocking pool so the UI stays responsive
pub async fn composite_async(
    stack: Stack,
    canvas_size: u32,
    filter: FilterType,
) -> Result<Composite> {
    tokio::task::spawn_blocking(move || {
        let started = Instant::now();
        let image = composite(&stack, canvas_size, filter);
        let elapsed = started.elapsed();

        tracing::debug!(
            "Composited {} layers at {}px in {:?}",
            stack.len(),
            canvas_size,
            elapsed
        );

        Composite {
            image,
            layers: stack.len(),
            elapsed,
        }
    })
    .await
    .map_err(|e| StackError::Task(e.to_string()))
}
