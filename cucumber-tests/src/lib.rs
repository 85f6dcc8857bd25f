pub mod features;
pub mod test_app;
