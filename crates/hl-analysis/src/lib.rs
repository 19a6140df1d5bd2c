pub mod balance;
pub mod classify;
pub mod margin;
pub mod roll;

pub use balance::*;
pub use classify::*;
pub use margin::*;
pub use roll::*;
