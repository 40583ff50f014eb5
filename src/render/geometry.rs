/// Square region of an image, in source pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub side: u32,
}

/// Largest square centered on a `width` x `height` image.
///
/// The side is the shorter dimension. When the leftover is odd the extra
/// pixel goes to the right/bottom margin. `None` for an empty image.
pub fn centered_square(width: u32, height: u32) -> Option<CropRect> {
    let side = width.min(height);
    if side == 0 {
        return None;
    }

    Some(CropRect {
        x: (width - side) / 2,
        y: (height - side) / 2,
        side,
    })
}
