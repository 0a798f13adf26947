use crate::HoconError;
use crate::tokenizer::{Token, Tokenizer};
use crate::value::{HoconValue, NodeRef};

/// Recursive-descent parser over the token stream.
///
/// One function per grammar production: object body, key content, value
/// sequence, array. The `root` flag on `parse_object` controls whether
/// the body may hold multiple sibling keys; a dotted-path segment
/// expands through a single-key object body, a brace body always allows
/// many. This is the grammar encoding, not incidental control flow.
pub struct Parser {
    tokenizer: Tokenizer,
}

impl Parser {
    /// Parses a complete configuration text into its root node.
    pub fn parse(text: &str) -> Result<NodeRef, HoconError> {
        let root = HoconValue::node();
        let mut parser = Parser {
            tokenizer: Tokenizer::new(text),
        };
        parser.tokenizer.pull_whitespace_and_comments();
        parser.parse_object(&root, true, "")?;
        Ok(root)
    }

    fn parse_object(&mut self, owner: &NodeRef, root: bool, path: &str) -> Result<(), HoconError> {
        // keep existing object content so repeated declarations merge
        owner.borrow_mut().shape_as_object();

        while !self.tokenizer.eof() {
            match self.tokenizer.pull_next()? {
                Token::Key(key) => {
                    let node = owner.borrow_mut().get_or_create_key(&key);
                    let next_path = if path.is_empty() {
                        key
                    } else {
                        format!("{}.{}", path, key)
                    };
                    self.parse_key_content(&node, &next_path)?;
                    if !root {
                        return Ok(());
                    }
                }
                Token::ObjectEnd => return Ok(()),
                Token::Eof => return Ok(()),
                // anything else is skipped, which is also what lets a
                // pure-JSON document open with a top-level brace
                _ => {}
            }
        }
        Ok(())
    }

    fn parse_key_content(&mut self, node: &NodeRef, path: &str) -> Result<(), HoconError> {
        while !self.tokenizer.eof() {
            match self.tokenizer.pull_next()? {
                Token::Dot => {
                    // one level of dotted-path expansion
                    return self.parse_object(node, false, path);
                }
                Token::Assign => {
                    // scalars replace, objects merge; the clear happens
                    // here for scalar-over-scalar and in parse_value for
                    // scalar-over-object
                    if !node.borrow().is_object() {
                        node.borrow_mut().clear();
                    }
                    return self.parse_value(node, path);
                }
                Token::ObjectStart => {
                    return self.parse_object(node, true, path);
                }
                Token::Eof => return Ok(()),
                _ => {}
            }
        }
        Ok(())
    }

    /// Reads value tokens into `owner` while the tokenizer reports the
    /// value sequence is still open, preserving same-line whitespace
    /// between tokens as concatenation fragments.
    fn parse_value(&mut self, owner: &NodeRef, path: &str) -> Result<(), HoconError> {
        if self.tokenizer.eof() {
            return Err(HoconError::UnexpectedEof {
                message: "End of input reached while trying to read a value".into(),
                line: self.tokenizer.line(),
                column: self.tokenizer.column(),
                hint: Some(format!("While reading the value of '{}'", path)),
                code: Some(201),
            });
        }

        self.tokenizer.pull_whitespace_and_comments();
        while self.tokenizer.is_value() {
            match self.tokenizer.pull_value()? {
                Token::Literal(text) => {
                    // a scalar assignment over a previous object destroys
                    // the object
                    if owner.borrow().is_object() {
                        owner.borrow_mut().clear();
                    }
                    owner.borrow_mut().append_literal(text);
                }
                Token::ObjectStart => {
                    self.parse_object(owner, true, path)?;
                }
                Token::ArrayStart => {
                    let elements = self.parse_array(path)?;
                    owner.borrow_mut().append_array(elements);
                }
                _ => {}
            }

            if self.tokenizer.is_space_or_tab() {
                let whitespace = self.tokenizer.pull_space_or_tab();
                // single-line whitespace is part of a string concatenation,
                // never of an object shaped by a brace body
                if !whitespace.is_empty() && !owner.borrow().is_object() {
                    owner.borrow_mut().append_whitespace(whitespace);
                }
            }
        }

        self.tokenizer.pull_comma();
        Ok(())
    }

    fn parse_array(&mut self, path: &str) -> Result<Vec<NodeRef>, HoconError> {
        let mut elements = Vec::new();
        loop {
            self.tokenizer.pull_whitespace_and_comments();
            if self.tokenizer.eof() || self.tokenizer.is_array_end() {
                break;
            }
            let element = HoconValue::node();
            self.parse_value(&element, path)?;
            elements.push(element);
        }
        self.tokenizer.pull_array_end()?;
        Ok(elements)
    }
}
