pub mod compute;

pub use compute::{handle_compute, __path_handle_compute};
