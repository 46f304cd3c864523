pub mod advice;
pub mod draft;
pub mod file;
pub mod group;
pub mod profile;
pub mod reminder;
pub mod resource;
pub mod response;
pub mod session;
pub mod submission;
pub mod task;
pub mod user;
