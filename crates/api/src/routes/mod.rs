pub mod error;
pub mod home;
pub mod measurements;
pub mod stations;

pub use error::*;
pub use home::*;
pub use measurements::*;
pub use stations::*;
