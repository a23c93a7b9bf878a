mod rule;
mod sendmail;
mod status;

pub mod dtos {
    pub use crate::rule::dtos::*;
    pub use crate::sendmail::dtos::*;
}

pub use crate::rule::api::*;
pub use crate::sendmail::api::*;
pub use crate::status::api::*;
