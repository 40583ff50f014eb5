use image::{DynamicImage, RgbaImage};

/// Shrink an image to fit in a `size` x `size` box for the list row.
///
/// Aspect ratio is preserved. Images already smaller than the box are
/// returned at their own size.
pub fn make_thumbnail(image: &DynamicImage, size: u32) -> RgbaImage {
    if image.width() <= size && image.height() <= size {
        return image.to_rgba8();
    }
    image.thumbnail(size, size).to_rgba8()
}
