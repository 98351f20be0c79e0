pub mod clock;
pub mod member;
pub mod project;
pub mod project_store;
pub mod session;
pub mod session_recorder;
pub mod store_error;
