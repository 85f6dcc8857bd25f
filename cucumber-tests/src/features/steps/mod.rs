pub mod api_steps;
pub mod guard_steps;
pub mod navigation_steps;
pub mod session_steps;
