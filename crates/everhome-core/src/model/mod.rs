// ── Domain model ──
//
// Normalized device types built from `everhome_api` wire records,
// category allow-lists, the immutable collection handed to consumers,
// and pure projections of heterogeneous device state.

pub mod category;
pub mod collection;
pub mod describe;
pub mod device;
pub mod projection;

pub use category::{Category, SubtypeFilter};
pub use collection::DeviceCollection;
pub use describe::{DeviceClass, EntityDescription, MANUFACTURER};
pub use device::{Device, DeviceId, DeviceState};
pub use projection::{brightness_to_device, brightness_to_presentation};
