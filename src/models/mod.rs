pub mod application;
pub mod interview;
pub mod job;
pub mod profile;
pub mod question;
