pub mod auth;
pub mod editor;
pub mod input;
pub mod logging;
pub mod url;
#[cfg(test)]
pub mod test_utils;
