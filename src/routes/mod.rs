pub mod upload;

pub use upload::register;
