pub mod core;
pub mod courses;
pub mod syllabus;
pub mod terms;
