pub mod display_name;
pub use display_name::display_name;
