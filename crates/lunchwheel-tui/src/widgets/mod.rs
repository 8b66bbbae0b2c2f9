pub mod fuzzy_input;
pub mod spinner;
pub mod wheel_face;
