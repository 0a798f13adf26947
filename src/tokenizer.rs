use crate::HoconError;

/// A classified lexical unit pulled from the input text.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// One path segment of a key, unquoted or quoted.
    Key(String),
    /// `:` or `=`.
    Assign,
    Dot,
    ObjectStart,
    ObjectEnd,
    ArrayStart,
    ArrayEnd,
    /// A quoted, triple-quoted or unquoted literal value.
    Literal(String),
    Eof,
}

/// Characters that end an unquoted key segment.
const KEY_TERMINATORS: &str = ".:=\"{}[],#";
/// Characters that end an unquoted value run. `:` and `=` stay legal so
/// values like `127.0.0.1:8080` survive unquoted.
const VALUE_TERMINATORS: &str = "\"{}[],#";

/// Tokenizer over a complete in-memory configuration text.
///
/// Key position and value position use different lexical rules, so the
/// parser drives the tokenizer through two entry points: `pull_next` for
/// keys and structure, and `is_value`/`pull_value` for value sequences.
/// Single-line whitespace between value tokens is surfaced separately
/// through `pull_space_or_tab` so the parser can keep it as a
/// concatenation fragment.
pub struct Tokenizer {
    chars: Vec<char>,
    index: usize,
    line: usize,
    column: usize,
}

impl Tokenizer {
    pub fn new(input: &str) -> Self {
        Tokenizer {
            chars: input.chars().collect(),
            index: 0,
            line: 1,
            column: 0,
        }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn eof(&self) -> bool {
        self.index >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.index).copied()
    }

    fn matches(&self, pattern: &str) -> bool {
        pattern
            .chars()
            .enumerate()
            .all(|(i, c)| self.chars.get(self.index + i) == Some(&c))
    }

    fn bump(&mut self) -> Option<char> {
        let curr = self.peek();
        if let Some(c) = curr {
            if c == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
            self.index += 1;
        }
        curr
    }

    fn is_start_of_comment(&self) -> bool {
        self.matches("#") || self.matches("//")
    }

    /// Skips whitespace (including newlines) and `#`/`//` comments.
    pub fn pull_whitespace_and_comments(&mut self) {
        loop {
            while let Some(c) = self.peek() {
                if c.is_whitespace() {
                    self.bump();
                } else {
                    break;
                }
            }
            if self.is_start_of_comment() {
                while let Some(c) = self.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.bump();
                }
            } else {
                return;
            }
        }
    }

    /// Pulls the next key-position token. Commas between sibling keys are
    /// skipped here; the value grammar consumes its own trailing comma.
    pub fn pull_next(&mut self) -> Result<Token, HoconError> {
        loop {
            self.pull_whitespace_and_comments();
            let c = match self.peek() {
                Some(c) => c,
                None => return Ok(Token::Eof),
            };
            return match c {
                '.' => {
                    self.bump();
                    Ok(Token::Dot)
                }
                ':' | '=' => {
                    self.bump();
                    Ok(Token::Assign)
                }
                '{' => {
                    self.bump();
                    Ok(Token::ObjectStart)
                }
                '}' => {
                    self.bump();
                    Ok(Token::ObjectEnd)
                }
                '[' => {
                    self.bump();
                    Ok(Token::ArrayStart)
                }
                ']' => {
                    self.bump();
                    Ok(Token::ArrayEnd)
                }
                ',' => {
                    self.bump();
                    continue;
                }
                '"' => Ok(Token::Key(self.pull_quoted_text()?)),
                _ if self.is_unquoted_key_start() => Ok(Token::Key(self.pull_unquoted_key())),
                other => {
                    self.bump();
                    Err(HoconError::UnexpectedCharacter {
                        character: other,
                        line: self.line,
                        column: self.column,
                        hint: Some("Expected a key, '}' or end of input".into()),
                        code: Some(104),
                    })
                }
            };
        }
    }

    fn is_unquoted_key_start(&self) -> bool {
        match self.peek() {
            Some(c) => !c.is_whitespace() && !KEY_TERMINATORS.contains(c) && !self.matches("//"),
            None => false,
        }
    }

    fn pull_unquoted_key(&mut self) -> String {
        let mut key = String::new();
        while self.is_unquoted_key_start() {
            key.push(self.bump().unwrap_or_default());
        }
        key
    }

    /// True while the pending characters still belong to the current value
    /// sequence. A newline, comma, `]`, `}` or comment ends the sequence.
    pub fn is_value(&self) -> bool {
        self.matches("{") || self.matches("[") || self.matches("\"") || self.is_unquoted_value_start()
    }

    fn is_unquoted_value_start(&self) -> bool {
        match self.peek() {
            Some(c) => !c.is_whitespace() && !VALUE_TERMINATORS.contains(c) && !self.matches("//"),
            None => false,
        }
    }

    /// Pulls the next value-position token. Call only when `is_value()`.
    pub fn pull_value(&mut self) -> Result<Token, HoconError> {
        match self.peek() {
            Some('{') => {
                self.bump();
                Ok(Token::ObjectStart)
            }
            Some('[') => {
                self.bump();
                Ok(Token::ArrayStart)
            }
            Some('"') if self.matches("\"\"\"") => Ok(Token::Literal(self.pull_triple_quoted_text()?)),
            Some('"') => Ok(Token::Literal(self.pull_quoted_text()?)),
            Some(_) => Ok(Token::Literal(self.pull_unquoted_text())),
            None => Err(HoconError::UnexpectedEof {
                message: "End of input reached while trying to read a value".into(),
                line: self.line,
                column: self.column,
                hint: None,
                code: Some(101),
            }),
        }
    }

    fn pull_unquoted_text(&mut self) -> String {
        let mut text = String::new();
        while self.is_unquoted_value_start() {
            text.push(self.bump().unwrap_or_default());
        }
        text
    }

    fn pull_quoted_text(&mut self) -> Result<String, HoconError> {
        self.bump(); // opening quote
        let mut content = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(content),
                Some('\\') => content.push(self.pull_escape_sequence()?),
                Some(c) => content.push(c),
                None => {
                    return Err(HoconError::UnclosedString {
                        quote: "\"",
                        line: self.line,
                        column: self.column,
                        hint: Some("String literal not closed".into()),
                        code: Some(103),
                    });
                }
            }
        }
    }

    fn pull_escape_sequence(&mut self) -> Result<char, HoconError> {
        let escaped = self.bump().ok_or(HoconError::UnclosedString {
            quote: "\"",
            line: self.line,
            column: self.column,
            hint: Some("Trailing backslash in string".into()),
            code: Some(103),
        })?;
        let c = match escaped {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            'b' => '\u{0008}',
            'f' => '\u{000C}',
            '\\' => '\\',
            '/' => '/',
            '"' => '"',
            'u' => {
                let mut code = 0u32;
                for _ in 0..4 {
                    let digit = self.bump().and_then(|c| c.to_digit(16)).ok_or_else(|| {
                        HoconError::SyntaxError {
                            message: "Invalid \\u escape sequence".into(),
                            line: self.line,
                            column: self.column,
                            hint: Some("\\u must be followed by 4 hex digits".into()),
                            code: Some(105),
                        }
                    })?;
                    code = code * 16 + digit;
                }
                char::from_u32(code).unwrap_or('\u{FFFD}')
            }
            other => other,
        };
        Ok(c)
    }

    /// Raw string: content is taken verbatim up to the closing `"""`.
    fn pull_triple_quoted_text(&mut self) -> Result<String, HoconError> {
        self.bump();
        self.bump();
        self.bump();
        let mut content = String::new();
        while !self.matches("\"\"\"") {
            match self.bump() {
                Some(c) => content.push(c),
                None => {
                    return Err(HoconError::UnclosedString {
                        quote: "\"\"\"",
                        line: self.line,
                        column: self.column,
                        hint: Some("Triple-quoted string not closed".into()),
                        code: Some(103),
                    });
                }
            }
        }
        self.bump();
        self.bump();
        self.bump();
        Ok(content)
    }

    pub fn is_space_or_tab(&self) -> bool {
        matches!(self.peek(), Some(' ') | Some('\t'))
    }

    /// Pulls a run of same-line whitespace, preserved by the parser as a
    /// concatenation fragment.
    pub fn pull_space_or_tab(&mut self) -> String {
        let mut ws = String::new();
        while self.is_space_or_tab() {
            ws.push(self.bump().unwrap_or_default());
        }
        ws
    }

    pub fn is_array_end(&self) -> bool {
        self.matches("]")
    }

    pub fn pull_array_end(&mut self) -> Result<(), HoconError> {
        if !self.is_array_end() {
            return Err(HoconError::SyntaxError {
                message: "Expected end of array".into(),
                line: self.line,
                column: self.column,
                hint: Some("Arrays must be closed with ']'".into()),
                code: Some(106),
            });
        }
        self.bump();
        Ok(())
    }

    pub fn is_comma(&self) -> bool {
        self.matches(",")
    }

    pub fn pull_comma(&mut self) {
        if self.is_comma() {
            self.bump();
        }
    }
}
