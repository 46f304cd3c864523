pub mod admin;
pub mod file;
pub mod group;
pub mod health;
pub mod session;
pub mod student;
pub mod task;
pub mod teacher;

pub use admin::admin_config;
pub use session::session_config;
pub use student::student_config;
pub use teacher::teacher_config;

use actix_web::web;

/// Every route of the API, shared by the server and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure)
        .configure(session_config)
        .configure(student_config)
        .configure(teacher_config)
        .configure(admin_config);
}
