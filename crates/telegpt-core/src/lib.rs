pub mod error;
pub mod http;
pub mod prompt;
pub mod summarize;
pub mod summary;
pub mod transcript;

pub use error::*;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!version().is_empty());
    }
}
