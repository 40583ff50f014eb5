/// View helpers
///
/// - `stack_list.rs` - the entry rows with Up/Down/Remove controls

pub mod stack_list;

use iced::widget::image::Handle;
use image::RgbaImage;

/// Upload-ready handle for an RGBA raster, taking over its pixels
pub fn to_handle(image: RgbaImage) -> Handle {
    let (width, height) = image.dimensions();
    Handle::from_rgba(width, height, image.into_raw())
}
