pub mod jwt;
pub mod password;
pub mod extractor;
pub mod authorize;
