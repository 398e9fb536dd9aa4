pub mod campus_services;
pub mod course_feedback;

pub use campus_services::{CAMPUS_SERVICES_JSON, campus_services};
pub use course_feedback::course_feedback;
