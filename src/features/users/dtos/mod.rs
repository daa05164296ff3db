mod profile_dto;
mod settings_dto;

pub use profile_dto::*;
pub use settings_dto::*;
