pub mod api;
pub mod content;
pub mod export;
pub mod lesson;
