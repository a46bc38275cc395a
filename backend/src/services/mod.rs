pub mod client_dashboard;
pub mod onboarding;
pub mod projects;
