pub mod password;

pub use password::{encode_password, verify_password};
