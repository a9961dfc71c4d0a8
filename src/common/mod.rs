pub mod api_client;
pub mod image_ref;
pub mod image_utils;
pub mod logging;
pub mod selected_file;
pub mod settings;
