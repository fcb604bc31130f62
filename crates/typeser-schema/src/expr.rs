//! # Type Expressions
//!
//! The textual type language used in schema documents:
//!
//! ```text
//! expr := IDENT ( "[" [ expr ( "," expr )* [ "," ] ] "]" )?
//! IDENT := [A-Za-z_][A-Za-z0-9_.]*
//! ```
//!
//! Parsing only produces a syntax tree; names are resolved against the
//! declared enums and records by the compiler.

use std::fmt;

use crate::error::SchemaError;

/// A parsed type expression: a name with optional bracketed arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeExpr {
    pub name: String,
    pub args: Vec<TypeExpr>,
    /// Byte offset of `name` in the source text.
    pub position: usize,
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if self.args.is_empty() {
            return Ok(());
        }
        f.write_str("[")?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str("]")
    }
}

/// Parse a complete type expression.
///
/// # Errors
///
/// [`SchemaError::Expression`] with the byte offset of the first
/// unexpected character.
pub fn parse(text: &str) -> Result<TypeExpr, SchemaError> {
    let mut parser = Parser { text, pos: 0 };
    let expr = parser.expr()?;
    parser.skip_ws();
    if parser.pos < text.len() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(expr)
}

struct Parser<'a> {
    text: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn error(&self, message: impl Into<String>) -> SchemaError {
        SchemaError::Expression {
            expr: self.text.to_string(),
            position: self.pos,
            message: message.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_ws();
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn ident(&mut self) -> Result<(String, usize), SchemaError> {
        self.skip_ws();
        let start = self.pos;
        match self.peek() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
            Some(c) => return Err(self.error(format!("expected a type name, found '{c}'"))),
            None => return Err(self.error("expected a type name, found end of input")),
        }
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
                self.pos += 1;
            } else {
                break;
            }
        }
        Ok((self.text[start..self.pos].to_string(), start))
    }

    fn expr(&mut self) -> Result<TypeExpr, SchemaError> {
        let (name, position) = self.ident()?;
        let mut args = Vec::new();
        if self.eat('[') {
            if !self.eat(']') {
                loop {
                    args.push(self.expr()?);
                    if self.eat(']') {
                        break;
                    }
                    if !self.eat(',') {
                        return Err(self.error("expected ',' or ']'"));
                    }
                    // Trailing comma.
                    if self.eat(']') {
                        break;
                    }
                }
            }
        }
        Ok(TypeExpr {
            name,
            args,
            position,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested() {
        let expr = parse("Dict[str, List[Optional[ int ]]]").unwrap();
        assert_eq!(expr.name, "Dict");
        assert_eq!(expr.args.len(), 2);
        assert_eq!(expr.to_string(), "Dict[str, List[Optional[int]]]");
        assert_eq!(expr.args[1].position, 10);
    }

    #[test]
    fn test_parse_empty_and_trailing_comma() {
        assert!(parse("Tuple[]").unwrap().args.is_empty());
        assert_eq!(parse("Tuple[int, str,]").unwrap().args.len(), 2);
    }

    #[test]
    fn test_dotted_names() {
        assert_eq!(parse("geo.Point").unwrap().name, "geo.Point");
    }

    #[test]
    fn test_errors_carry_position() {
        match parse("List[int").unwrap_err() {
            SchemaError::Expression { position, message, .. } => {
                assert_eq!(position, 8);
                assert!(message.contains("','"));
            }
            other => panic!("expected expression error, got {other:?}"),
        }
        match parse("List[int] x").unwrap_err() {
            SchemaError::Expression { position, .. } => assert_eq!(position, 10),
            other => panic!("expected expression error, got {other:?}"),
        }
        assert!(parse("").is_err());
        assert!(parse("[int]").is_err());
        assert!(parse("Dict[str,,int]").is_err());
    }
}
