//! HTTP request handlers

pub mod admin;
pub mod sessions;
pub mod submissions;
pub mod upload_grant;
