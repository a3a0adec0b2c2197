pub mod dirs;
pub mod logger;
pub mod strings;
