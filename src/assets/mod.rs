//! Photo and frame inputs: decoding, EXIF orientation, downscaling, frame lookup.

pub mod decode;
pub mod exif;
pub mod frames;
pub mod photo;

pub use decode::{RasterImage, decode_image};
pub use exif::{Orientation, read_orientation};
pub use frames::{FrameLibrary, FrameSelection, load_frame_file};
pub use photo::{Photo, PhotoOpts, process_photo, process_photo_tracked};
