mod process;
mod scan;
mod system;

pub use process::*;
pub use scan::*;
pub use system::*;
