mod classification;
mod inference_device;
mod label_table;
mod model_config;
mod poke_image;

pub use classification::*;
pub use inference_device::*;
pub use label_table::*;
pub use model_config::*;
pub use poke_image::*;
