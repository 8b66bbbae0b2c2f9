pub mod animation;
pub mod catalog;
pub mod error;
pub mod food;
pub mod location;
pub mod resolver;
pub mod selection;
pub mod session;
pub mod wheel;
