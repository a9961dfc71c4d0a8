pub mod backend;
pub mod base_api;
pub mod design_api;
pub mod search_structs;
