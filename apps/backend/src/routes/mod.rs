pub mod auth;
pub mod data;
pub mod exams;
pub mod extract;
pub mod lessons;
pub mod modules;
pub mod schedules;
pub mod students;
