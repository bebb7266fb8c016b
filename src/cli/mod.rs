pub mod combine;
pub mod command;
pub mod info;
pub mod output;
pub mod progress;
pub mod validate;
