pub mod entity;
pub mod localized;
