mod load;
mod servers;
mod types;

pub use load::*;
pub use servers::*;
pub use types::*;
