pub mod client;
pub mod client_task;
pub mod link;
pub mod milestone;
pub mod project;
pub mod submission;
pub mod template;
