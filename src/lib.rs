pub mod config;
pub mod error;
pub mod export;
pub mod parser;
pub mod path;
pub mod tokenizer;
pub mod value;

pub use config::Config;
pub use error::HoconError;
pub use value::{Fragment, HoconValue, NodeRef};

/// Parses a HOCON configuration string into a [`Config`].
pub fn parse(text: &str) -> Result<Config, HoconError> {
    Config::from_str(text)
}
