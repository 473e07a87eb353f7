//! Restricted arithmetic evaluator for `MATH` formulas.
//!
//! A formula is plain text after the interpreter has spliced nested
//! expression values into it. The grammar is deliberately tiny: numbers,
//! `+ - * /` (with the `− × ÷` spellings accepted, since they survive
//! entity unescaping), unary minus, and parentheses, with multiplicative
//! precedence over additive. Nothing else evaluates; in particular no
//! identifiers and no host-language escape hatch.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
enum TokenType {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LeftParen,
    RightParen,
    Eof,
}

#[derive(Debug, Clone)]
struct Token {
    token_type: TokenType,
    lexeme: String,
}

/// Formula-local failure. The interpreter wraps this into its own error
/// type together with the span of the enclosing `MATH` node.
#[derive(Debug, Clone)]
pub struct MathError {
    pub message: String,
}

impl MathError {
    fn new(message: String) -> Self {
        Self { message }
    }
}

impl fmt::Display for MathError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for MathError {}

/// Evaluates a spliced formula to a number.
pub fn evaluate(formula: &str) -> Result<f64, MathError> {
    let tokens = scan_tokens(formula)?;
    let mut parser = FormulaParser { tokens, current: 0 };
    let result = parser.expression()?;
    parser.expect_eof()?;
    Ok(result)
}

fn scan_tokens(formula: &str) -> Result<Vec<Token>, MathError> {
    let chars: Vec<char> = formula.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' | '\t' | '\r' | '\n' => {
                i += 1;
            }
            '+' => {
                tokens.push(Token {
                    token_type: TokenType::Plus,
                    lexeme: c.to_string(),
                });
                i += 1;
            }
            '-' | '\u{2212}' => {
                tokens.push(Token {
                    token_type: TokenType::Minus,
                    lexeme: c.to_string(),
                });
                i += 1;
            }
            '*' | '\u{00d7}' => {
                tokens.push(Token {
                    token_type: TokenType::Star,
                    lexeme: c.to_string(),
                });
                i += 1;
            }
            '/' | '\u{00f7}' => {
                tokens.push(Token {
                    token_type: TokenType::Slash,
                    lexeme: c.to_string(),
                });
                i += 1;
            }
            '(' => {
                tokens.push(Token {
                    token_type: TokenType::LeftParen,
                    lexeme: c.to_string(),
                });
                i += 1;
            }
            ')' => {
                tokens.push(Token {
                    token_type: TokenType::RightParen,
                    lexeme: c.to_string(),
                });
                i += 1;
            }
            _ if c.is_ascii_digit() => {
                let start = i;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
                if i < chars.len()
                    && chars[i] == '.'
                    && i + 1 < chars.len()
                    && chars[i + 1].is_ascii_digit()
                {
                    i += 1;
                    while i < chars.len() && chars[i].is_ascii_digit() {
                        i += 1;
                    }
                }
                let lexeme: String = chars[start..i].iter().collect();
                let number = lexeme
                    .parse::<f64>()
                    .map_err(|_| MathError::new(format!("Invalid number '{}'", lexeme)))?;
                tokens.push(Token {
                    token_type: TokenType::Number(number),
                    lexeme,
                });
            }
            _ => {
                return Err(MathError::new(format!(
                    "Unexpected character '{}' in formula",
                    c
                )));
            }
        }
    }

    tokens.push(Token {
        token_type: TokenType::Eof,
        lexeme: String::new(),
    });
    Ok(tokens)
}

struct FormulaParser {
    tokens: Vec<Token>,
    current: usize,
}

impl FormulaParser {
    // expression := term (("+" | "-") term)*
    fn expression(&mut self) -> Result<f64, MathError> {
        let mut value = self.term()?;

        loop {
            if self.match_type(&TokenType::Plus) {
                value += self.term()?;
            } else if self.match_type(&TokenType::Minus) {
                value -= self.term()?;
            } else {
                break;
            }
        }

        Ok(value)
    }

    // term := unary (("*" | "/") unary)*
    fn term(&mut self) -> Result<f64, MathError> {
        let mut value = self.unary()?;

        loop {
            if self.match_type(&TokenType::Star) {
                value *= self.unary()?;
            } else if self.match_type(&TokenType::Slash) {
                let divisor = self.unary()?;
                if divisor == 0.0 {
                    return Err(MathError::new("Division by zero".to_string()));
                }
                value /= divisor;
            } else {
                break;
            }
        }

        Ok(value)
    }

    // unary := "-" unary | primary
    fn unary(&mut self) -> Result<f64, MathError> {
        if self.match_type(&TokenType::Minus) {
            return Ok(-self.unary()?);
        }
        self.primary()
    }

    // primary := number | "(" expression ")"
    fn primary(&mut self) -> Result<f64, MathError> {
        if let TokenType::Number(n) = self.peek().token_type {
            self.advance();
            return Ok(n);
        }

        if self.match_type(&TokenType::LeftParen) {
            let value = self.expression()?;
            if !self.match_type(&TokenType::RightParen) {
                return Err(MathError::new("Expected ')' in formula".to_string()));
            }
            return Ok(value);
        }

        let token = self.peek();
        if token.token_type == TokenType::Eof {
            Err(MathError::new("Unexpected end of formula".to_string()))
        } else {
            Err(MathError::new(format!(
                "Expected a number, found '{}'",
                token.lexeme
            )))
        }
    }

    fn expect_eof(&mut self) -> Result<(), MathError> {
        if self.peek().token_type == TokenType::Eof {
            Ok(())
        } else {
            Err(MathError::new(format!(
                "Unexpected '{}' after formula",
                self.peek().lexeme
            )))
        }
    }

    fn match_type(&mut self, token_type: &TokenType) -> bool {
        if &self.peek().token_type == token_type {
            self.advance();
            true
        } else {
            false
        }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn advance(&mut self) {
        if self.current < self.tokens.len() - 1 {
            self.current += 1;
        }
    }
}
