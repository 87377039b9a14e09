pub mod app;

pub use app::{Seed, bearer, make_test_app, send};
