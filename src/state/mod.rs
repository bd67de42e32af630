pub mod touch;

pub use touch::{TouchGesture, TouchRelease};
