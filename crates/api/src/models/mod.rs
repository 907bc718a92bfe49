pub mod descriptor;
pub mod key;
pub mod names;
pub mod types;
pub mod util;

pub use descriptor::*;
pub use key::*;
pub use types::*;
