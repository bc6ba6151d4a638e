use std::rc::Rc;

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum TokenKind {
    Illegal(Rc<str>),
    Ident(Rc<str>),
    Int(Rc<str>),
    String(Rc<str>),

    // Operators
    Assign,
    Plus,
    Minus,
    Bang,
    Asterisk,
    Slash,

    Equal,
    NotEqual,

    GreaterThan,
    LessThan,

    Comma,
    Colon,
    SemiColon,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,

    // Keywords
    Function,
    Let,
    True,
    False,
    If,
    Else,
    Return,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

fn keywords(ident: &str) -> Option<TokenKind> {
    match ident {
        "fn" => Some(TokenKind::Function),
        "let" => Some(TokenKind::Let),
        "true" => Some(TokenKind::True),
        "false" => Some(TokenKind::False),
        "if" => Some(TokenKind::If),
        "else" => Some(TokenKind::Else),
        "return" => Some(TokenKind::Return),
        _ => None,
    }
}

#[derive(Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    iter: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        let iter = input.char_indices().peekable();
        Self { input, iter }
    }

    fn is_letter(ch: char) -> bool {
        ch.is_ascii_alphabetic() || ch == '_'
    }

    fn read_identifier(&mut self, start: usize) -> Token {
        while self.iter.next_if(|(_, ch)| Self::is_letter(*ch)).is_some() {}

        let end = self.next_idx();
        let ident = &self.input[start..end];
        Token {
            kind: keywords(ident).unwrap_or_else(|| TokenKind::Ident(ident.into())),
            start,
            end,
        }
    }

    fn read_number(&mut self, start: usize) -> Token {
        while self.iter.next_if(|(_, ch)| ch.is_ascii_digit()).is_some() {}

        let end = self.next_idx();
        let digits = &self.input[start..end];

        Token {
            kind: TokenKind::Int(digits.into()),
            start,
            end,
        }
    }

    // `start` is the opening quote. The literal is the raw text between the
    // quotes, no escape sequences. An unterminated literal runs to the end
    // of the input instead of producing an error token.
    fn read_string(&mut self, start: usize) -> Token {
        let content_start = self.next_idx();
        loop {
            match self.iter.next() {
                Some((idx, '"')) => {
                    return Token {
                        kind: TokenKind::String(self.input[content_start..idx].into()),
                        start,
                        end: self.next_idx(),
                    }
                }
                None => {
                    return Token {
                        kind: TokenKind::String(self.input[content_start..].into()),
                        start,
                        end: self.input.len(),
                    }
                }
                Some(_) => {}
            }
        }
    }

    fn next_idx(&mut self) -> usize {
        self.iter
            .peek()
            .map(|(idx, _)| *idx)
            .unwrap_or(self.input.len())
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let mut iter = self.iter.by_ref().skip_while(|(_, ch)| ch.is_whitespace());

        if let Some((idx, ch)) = iter.next() {
            let tok = match ch {
                '=' => {
                    if self.iter.next_if(|(_, ch)| *ch == '=').is_some() {
                        Token {
                            kind: TokenKind::Equal,
                            start: idx,
                            end: self.next_idx(),
                        }
                    } else {
                        Token {
                            kind: TokenKind::Assign,
                            start: idx,
                            end: self.next_idx(),
                        }
                    }
                }
                '+' => Token {
                    kind: TokenKind::Plus,
                    start: idx,
                    end: self.next_idx(),
                },
                ',' => Token {
                    kind: TokenKind::Comma,
                    start: idx,
                    end: self.next_idx(),
                },
                ':' => Token {
                    kind: TokenKind::Colon,
                    start: idx,
                    end: self.next_idx(),
                },
                ';' => Token {
                    kind: TokenKind::SemiColon,
                    start: idx,
                    end: self.next_idx(),
                },
                '(' => Token {
                    kind: TokenKind::LParen,
                    start: idx,
                    end: self.next_idx(),
                },
                ')' => Token {
                    kind: TokenKind::RParen,
                    start: idx,
                    end: self.next_idx(),
                },
                '{' => Token {
                    kind: TokenKind::LBrace,
                    start: idx,
                    end: self.next_idx(),
                },
                '}' => Token {
                    kind: TokenKind::RBrace,
                    start: idx,
                    end: self.next_idx(),
                },
                '[' => Token {
                    kind: TokenKind::LBracket,
                    start: idx,
                    end: self.next_idx(),
                },
                ']' => Token {
                    kind: TokenKind::RBracket,
                    start: idx,
                    end: self.next_idx(),
                },
                '-' => Token {
                    kind: TokenKind::Minus,
                    start: idx,
                    end: self.next_idx(),
                },
                '!' => {
                    if self.iter.next_if(|(_, ch)| *ch == '=').is_some() {
                        Token {
                            kind: TokenKind::NotEqual,
                            start: idx,
                            end: self.next_idx(),
                        }
                    } else {
                        Token {
                            kind: TokenKind::Bang,
                            start: idx,
                            end: self.next_idx(),
                        }
                    }
                }
                '*' => Token {
                    kind: TokenKind::Asterisk,
                    start: idx,
                    end: self.next_idx(),
                },
                '/' => Token {
                    kind: TokenKind::Slash,
                    start: idx,
                    end: self.next_idx(),
                },
                '<' => Token {
                    kind: TokenKind::LessThan,
                    start: idx,
                    end: self.next_idx(),
                },
                '>' => Token {
                    kind: TokenKind::GreaterThan,
                    start: idx,
                    end: self.next_idx(),
                },
                '"' => self.read_string(idx),
                c if Tokenizer::is_letter(c) => self.read_identifier(idx),
                c if c.is_ascii_digit() => self.read_number(idx),
                _ => Token {
                    kind: TokenKind::Illegal(ch.to_string().into()),
                    start: idx,
                    end: self.next_idx(),
                },
            };
            Some(tok)
        } else {
            None
        }
    }
}
