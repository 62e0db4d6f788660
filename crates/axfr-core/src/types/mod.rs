mod names;
mod zone;

pub use names::*;
pub use zone::*;
