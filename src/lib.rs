pub mod api;
pub mod common;
pub mod components;
pub mod pages;
