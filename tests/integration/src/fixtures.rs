//! Test data generators

use std::sync::atomic::{AtomicU64, Ordering};

use chat_core::{LoginRequest, SignupRequest};

pub const PASSWORD: &str = "hunter22";

static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Signup payload with a fresh email
pub fn signup_request(name: &str) -> SignupRequest {
    let suffix = unique_suffix();
    SignupRequest::new(
        format!("{name} {suffix}"),
        format!("{}{suffix}@example.com", name.to_lowercase()),
        PASSWORD,
    )
}

pub fn login_for(signup: &SignupRequest) -> LoginRequest {
    LoginRequest::from(signup)
}
