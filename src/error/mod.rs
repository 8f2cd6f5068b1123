mod types;

pub use types::{ForgeError, Result};
