pub mod broker;
pub mod errors;
pub mod leg;
pub mod spread;

pub use broker::*;
pub use errors::*;
pub use leg::*;
pub use spread::*;
