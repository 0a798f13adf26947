use std::fmt;

/// The main error type for HOCON parsing and value access.
#[derive(Debug, Clone, PartialEq)]
pub enum HoconError {
    SyntaxError {
        message: String,
        line: usize,
        column: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Raised when the input ends while a value is still expected.
    UnexpectedEof {
        message: String,
        line: usize,
        column: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Raised when a quoted or triple-quoted string is not closed.
    UnclosedString {
        quote: &'static str,
        line: usize,
        column: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Raised for characters that cannot start a key or value.
    UnexpectedCharacter {
        character: char,
        line: usize,
        column: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Raised when a path is required to exist but does not resolve.
    PathNotFound {
        path: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Raised when a resolved value cannot be converted to the requested type.
    TypeError {
        message: String,
        hint: Option<String>,
        code: Option<u32>,
    },
}

impl fmt::Display for HoconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HoconError::SyntaxError { message, line, column, hint, code } =>
                write!(f, "[HOCON] Syntax Error at {}:{}: {}{}{}",
                    line, column, message,
                    hint.as_ref().map_or(String::new(), |h| format!(" Hint: {}", h)),
                    code.map_or(String::new(), |c| format!(" Code: {}", c))
                ),
            HoconError::UnexpectedEof { message, line, column, hint, code } =>
                write!(f, "[HOCON] Unexpected EOF at {}:{}: {}{}{}",
                    line, column, message,
                    hint.as_ref().map_or(String::new(), |h| format!(" Hint: {}", h)),
                    code.map_or(String::new(), |c| format!(" Code: {}", c))
                ),
            HoconError::UnclosedString { quote, line, column, hint, code } =>
                write!(f, "[HOCON] Unclosed string starting with {} at {}:{}{}{}",
                    quote, line, column,
                    hint.as_ref().map_or(String::new(), |h| format!(" Hint: {}", h)),
                    code.map_or(String::new(), |c| format!(" Code: {}", c))
                ),
            HoconError::UnexpectedCharacter { character, line, column, hint, code } =>
                write!(f, "[HOCON] Unexpected character '{}' at {}:{}{}{}",
                    character, line, column,
                    hint.as_ref().map_or(String::new(), |h| format!(" Hint: {}", h)),
                    code.map_or(String::new(), |c| format!(" Code: {}", c))
                ),
            HoconError::PathNotFound { path, hint, code } =>
                write!(f, "[HOCON] Path '{}' not found{}{}",
                    path,
                    hint.as_ref().map_or(String::new(), |h| format!(" Hint: {}", h)),
                    code.map_or(String::new(), |c| format!(" Code: {}", c))
                ),
            HoconError::TypeError { message, hint, code } =>
                write!(f, "[HOCON] Type Error: {}{}{}",
                    message,
                    hint.as_ref().map_or(String::new(), |h| format!(" Hint: {}", h)),
                    code.map_or(String::new(), |c| format!(" Code: {}", c))
                ),
        }
    }
}

impl std::error::Error for HoconError {}
