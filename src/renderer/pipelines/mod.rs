//! Pipeline state cache: the compute and render pipeline objects for both
//! patch domains, built once against the device and reused every frame.

pub mod factors;
pub mod patch;
