//! Request payloads shared by the client and the server

mod requests;

pub use requests::{LoginRequest, SendMessageRequest, SignupRequest, UpdateProfileRequest, REQUIRED};
