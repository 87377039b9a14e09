use std::env;

use crate::config::AppConfig;

/// Secret shared by every test that mints or verifies tokens.
pub const TEST_JWT_SECRET: &str = "test-secret-for-attendance";

/// Points the global configuration at a deterministic test setup.
///
/// Sets `APP_ENV=test` and a fixed `JWT_SECRET` both in the environment and
/// on the already-initialised singleton, so it is safe to call from any test
/// regardless of ordering.
pub fn init_test_config() {
    unsafe {
        env::set_var("APP_ENV", "test");
        env::set_var("JWT_SECRET", TEST_JWT_SECRET);
    }
    AppConfig::set_env("test");
    AppConfig::set_jwt_secret(TEST_JWT_SECRET);
}
