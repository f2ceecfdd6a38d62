pub mod score;
pub mod select;
pub mod validate;
