pub mod blocking;
pub mod callback;
pub mod util;
