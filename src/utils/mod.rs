pub mod multipart;
pub mod storage;
pub mod validation;
