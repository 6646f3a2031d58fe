//! Lexer (tokenizer) for v2 source code
//!
//! Converts raw source text into a lazy stream of [`Token`]s consumed by the
//! parser. Whitespace and comments (`// ...` to end of line, `{ ... }` up to the
//! first `}`) separate tokens and are dropped, unless the lexer is switched to
//! trivia mode with [`Lexer::with_comments`].
//!
//! Competing literal forms follow maximal munch with a fixed priority: a `0x`
//! or `0b` prefix followed by at least one valid digit wins over a decimal `0`.

use super::ast::SourceLocation;
use std::fmt;
use thiserror::Error;

/// Position of a token's first character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub offset: usize, // byte offset into the source
}

impl Position {
    pub fn location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

/// Reserved words, including the builtin type names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Method,
    Var,
    Begin,
    End,
    If,
    Then,
    Else,
    While,
    Do,
    Repeat,
    Until,
    Break,
    Array,
    Of,
    // Builtin types
    Bool,
    Byte,
    Int,
    Uint,
    Long,
    Ulong,
    Char,
    String,
}

impl Keyword {
    pub fn from_word(word: &str) -> Option<Self> {
        let keyword = match word {
            "method" => Keyword::Method,
            "var" => Keyword::Var,
            "begin" => Keyword::Begin,
            "end" => Keyword::End,
            "if" => Keyword::If,
            "then" => Keyword::Then,
            "else" => Keyword::Else,
            "while" => Keyword::While,
            "do" => Keyword::Do,
            "repeat" => Keyword::Repeat,
            "until" => Keyword::Until,
            "break" => Keyword::Break,
            "array" => Keyword::Array,
            "of" => Keyword::Of,
            "bool" => Keyword::Bool,
            "byte" => Keyword::Byte,
            "int" => Keyword::Int,
            "uint" => Keyword::Uint,
            "long" => Keyword::Long,
            "ulong" => Keyword::Ulong,
            "char" => Keyword::Char,
            "string" => Keyword::String,
            _ => return None,
        };
        Some(keyword)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Method => "method",
            Keyword::Var => "var",
            Keyword::Begin => "begin",
            Keyword::End => "end",
            Keyword::If => "if",
            Keyword::Then => "then",
            Keyword::Else => "else",
            Keyword::While => "while",
            Keyword::Do => "do",
            Keyword::Repeat => "repeat",
            Keyword::Until => "until",
            Keyword::Break => "break",
            Keyword::Array => "array",
            Keyword::Of => "of",
            Keyword::Bool => "bool",
            Keyword::Byte => "byte",
            Keyword::Int => "int",
            Keyword::Uint => "uint",
            Keyword::Long => "long",
            Keyword::Ulong => "ulong",
            Keyword::Char => "char",
            Keyword::String => "string",
        }
    }

    pub fn is_builtin_type(&self) -> bool {
        matches!(
            self,
            Keyword::Bool
                | Keyword::Byte
                | Keyword::Int
                | Keyword::Uint
                | Keyword::Long
                | Keyword::Ulong
                | Keyword::Char
                | Keyword::String
        )
    }
}

/// Operators, symbolic and word-spelled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Assign, // :=

    // Arithmetic
    Plus,    // +
    Minus,   // -
    Star,    // *
    Slash,   // /
    Percent, // %

    // Comparison
    Eq,    // =
    NotEq, // !=
    Lt,    // <
    Le,    // <=
    Gt,    // >
    Ge,    // >=

    // Shift
    LtLt, // <<
    GtGt, // >>

    // Logical
    AndAnd, // &&
    OrOr,   // ||
    And,    // and
    Or,     // or
    Not,    // not
    Bang,   // !

    // Bitwise
    Amp,   // &
    Pipe,  // |
    Caret, // ^
    Tilde, // ~
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Assign => ":=",
            Operator::Plus => "+",
            Operator::Minus => "-",
            Operator::Star => "*",
            Operator::Slash => "/",
            Operator::Percent => "%",
            Operator::Eq => "=",
            Operator::NotEq => "!=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::LtLt => "<<",
            Operator::GtGt => ">>",
            Operator::AndAnd => "&&",
            Operator::OrOr => "||",
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Not => "not",
            Operator::Bang => "!",
            Operator::Amp => "&",
            Operator::Pipe => "|",
            Operator::Caret => "^",
            Operator::Tilde => "~",
        }
    }
}

/// Punctuation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Punct {
    LParen,    // (
    RParen,    // )
    LBracket,  // [
    RBracket,  // ]
    Comma,     // ,
    Colon,     // :
    Semicolon, // ;
}

impl Punct {
    pub fn as_str(&self) -> &'static str {
        match self {
            Punct::LParen => "(",
            Punct::RParen => ")",
            Punct::LBracket => "[",
            Punct::RBracket => "]",
            Punct::Comma => ",",
            Punct::Colon => ":",
            Punct::Semicolon => ";",
        }
    }
}

/// Token classes produced by the lexer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    StringLit,
    CharLit,
    HexLit,
    BinLit,
    DecLit,
    BoolLit,
    Keyword(Keyword),
    Operator(Operator),
    Punct(Punct),
    Comment,
    Eof,
}

impl TokenKind {
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::StringLit
                | TokenKind::CharLit
                | TokenKind::HexLit
                | TokenKind::BinLit
                | TokenKind::DecLit
                | TokenKind::BoolLit
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Identifier => write!(f, "identifier"),
            TokenKind::StringLit => write!(f, "string literal"),
            TokenKind::CharLit => write!(f, "char literal"),
            TokenKind::HexLit => write!(f, "hex literal"),
            TokenKind::BinLit => write!(f, "binary literal"),
            TokenKind::DecLit => write!(f, "decimal literal"),
            TokenKind::BoolLit => write!(f, "bool literal"),
            TokenKind::Keyword(kw) => write!(f, "'{}'", kw.as_str()),
            TokenKind::Operator(op) => write!(f, "'{}'", op.as_str()),
            TokenKind::Punct(p) => write!(f, "'{}'", p.as_str()),
            TokenKind::Comment => write!(f, "comment"),
            TokenKind::Eof => write!(f, "end of file"),
        }
    }
}

/// A lexical token borrowing its text from the source buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub text: &'src str,
    pub position: Position,
}

impl Token<'_> {
    /// Returns the source location where this token appears.
    pub fn location(&self) -> SourceLocation {
        self.position.location()
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Identifier => write!(f, "identifier '{}'", self.text),
            TokenKind::StringLit
            | TokenKind::CharLit
            | TokenKind::HexLit
            | TokenKind::BinLit
            | TokenKind::DecLit
            | TokenKind::BoolLit => write!(f, "{} {}", self.kind, self.text),
            _ => write!(f, "{}", self.kind),
        }
    }
}

/// Lexer error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated comment")]
    UnterminatedComment,
    #[error("invalid character literal")]
    InvalidCharLiteral,
    #[error("unrecognized character '{0}'")]
    UnrecognizedCharacter(char),
}

/// Lexer error type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Lexer error at line {}, column {}: {kind}", .location.line, .location.column)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub location: SourceLocation,
}

/// Start lexing `source`; tokens are produced on demand.
pub fn tokenize(source: &str) -> Lexer<'_> {
    Lexer::new(source)
}

/// Lexer for v2 source code
pub struct Lexer<'src> {
    source: &'src str,
    position: usize,
    line: usize,
    column: usize,
    emit_comments: bool,
    finished: bool,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source string.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            position: 0,
            line: 1,
            column: 1,
            emit_comments: false,
            finished: false,
        }
    }

    /// Emit `Comment` tokens instead of discarding them
    pub fn with_comments(mut self, emit: bool) -> Self {
        self.emit_comments = emit;
        self
    }

    /// Tokenize the entire input
    pub fn tokenize(self) -> Result<Vec<Token<'src>>, LexError> {
        self.collect()
    }

    /// Scan one token, comments included
    fn scan(&mut self) -> Result<Token<'src>, LexError> {
        loop {
            self.skip_whitespace();

            let start = self.current_position();
            let Some(ch) = self.advance() else {
                return Ok(self.make_token(TokenKind::Eof, start));
            };

            let kind = match ch {
                '/' if self.peek() == Some('/') => {
                    self.skip_line_comment();
                    TokenKind::Comment
                }
                '{' => {
                    self.skip_brace_comment(start)?;
                    TokenKind::Comment
                }

                '"' => self.string_literal(start)?,
                '\'' => self.char_literal(start)?,
                '0'..='9' => self.number_literal(ch),
                'a'..='z' | 'A'..='Z' | '_' => self.identifier_or_keyword(start),

                ':' => {
                    if self.match_char('=') {
                        TokenKind::Operator(Operator::Assign)
                    } else {
                        TokenKind::Punct(Punct::Colon)
                    }
                }
                '<' => {
                    if self.match_char('=') {
                        TokenKind::Operator(Operator::Le)
                    } else if self.match_char('<') {
                        TokenKind::Operator(Operator::LtLt)
                    } else {
                        TokenKind::Operator(Operator::Lt)
                    }
                }
                '>' => {
                    if self.match_char('=') {
                        TokenKind::Operator(Operator::Ge)
                    } else if self.match_char('>') {
                        TokenKind::Operator(Operator::GtGt)
                    } else {
                        TokenKind::Operator(Operator::Gt)
                    }
                }
                '!' => {
                    if self.match_char('=') {
                        TokenKind::Operator(Operator::NotEq)
                    } else {
                        TokenKind::Operator(Operator::Bang)
                    }
                }
                '&' => {
                    if self.match_char('&') {
                        TokenKind::Operator(Operator::AndAnd)
                    } else {
                        TokenKind::Operator(Operator::Amp)
                    }
                }
                '|' => {
                    if self.match_char('|') {
                        TokenKind::Operator(Operator::OrOr)
                    } else {
                        TokenKind::Operator(Operator::Pipe)
                    }
                }
                '=' => TokenKind::Operator(Operator::Eq),
                '+' => TokenKind::Operator(Operator::Plus),
                '-' => TokenKind::Operator(Operator::Minus),
                '*' => TokenKind::Operator(Operator::Star),
                '/' => TokenKind::Operator(Operator::Slash),
                '%' => TokenKind::Operator(Operator::Percent),
                '^' => TokenKind::Operator(Operator::Caret),
                '~' => TokenKind::Operator(Operator::Tilde),

                '(' => TokenKind::Punct(Punct::LParen),
                ')' => TokenKind::Punct(Punct::RParen),
                '[' => TokenKind::Punct(Punct::LBracket),
                ']' => TokenKind::Punct(Punct::RBracket),
                ',' => TokenKind::Punct(Punct::Comma),
                ';' => TokenKind::Punct(Punct::Semicolon),

                _ => {
                    return Err(LexError {
                        kind: LexErrorKind::UnrecognizedCharacter(ch),
                        location: start.location(),
                    });
                }
            };

            if kind == TokenKind::Comment && !self.emit_comments {
                continue;
            }
            return Ok(self.make_token(kind, start));
        }
    }

    /// String literal; escapes are kept verbatim
    fn string_literal(&mut self, start: Position) -> Result<TokenKind, LexError> {
        while let Some(ch) = self.advance() {
            match ch {
                '"' => return Ok(TokenKind::StringLit),
                '\\' => {
                    if self.advance().is_none() {
                        break;
                    }
                }
                _ => {}
            }
        }

        Err(LexError {
            kind: LexErrorKind::UnterminatedString,
            location: start.location(),
        })
    }

    /// Character literal: exactly one character other than `'` and `\`
    fn char_literal(&mut self, start: Position) -> Result<TokenKind, LexError> {
        let invalid = LexError {
            kind: LexErrorKind::InvalidCharLiteral,
            location: start.location(),
        };

        match self.peek() {
            Some('\'') | Some('\\') | None => return Err(invalid),
            Some(_) => {
                self.advance();
            }
        }

        if self.match_char('\'') {
            Ok(TokenKind::CharLit)
        } else {
            Err(invalid)
        }
    }

    /// Hex (`0x1F`), binary (`0b101`) or decimal literal
    fn number_literal(&mut self, first_digit: char) -> TokenKind {
        if first_digit == '0' {
            match (self.peek(), self.peek_ahead(1)) {
                (Some('x' | 'X'), Some(d)) if d.is_ascii_hexdigit() => {
                    self.advance();
                    self.advance_while(|c| c.is_ascii_hexdigit());
                    return TokenKind::HexLit;
                }
                (Some('b' | 'B'), Some('0' | '1')) => {
                    self.advance();
                    self.advance_while(|c| c == '0' || c == '1');
                    return TokenKind::BinLit;
                }
                _ => {}
            }
        }

        self.advance_while(|c| c.is_ascii_digit());
        TokenKind::DecLit
    }

    /// Identifier, keyword, word operator or boolean literal
    fn identifier_or_keyword(&mut self, start: Position) -> TokenKind {
        self.advance_while(|c| c.is_ascii_alphanumeric() || c == '_');

        match &self.source[start.offset..self.position] {
            "true" | "false" => TokenKind::BoolLit,
            "and" => TokenKind::Operator(Operator::And),
            "or" => TokenKind::Operator(Operator::Or),
            "not" => TokenKind::Operator(Operator::Not),
            word => Keyword::from_word(word)
                .map(TokenKind::Keyword)
                .unwrap_or(TokenKind::Identifier),
        }
    }

    fn skip_whitespace(&mut self) {
        self.advance_while(char::is_whitespace);
    }

    /// Skip single-line comment (// ...), leaving the newline in place
    fn skip_line_comment(&mut self) {
        self.advance_while(|c| c != '\n');
    }

    /// Skip `{ ... }`; braces do not nest
    fn skip_brace_comment(&mut self, start: Position) -> Result<(), LexError> {
        while let Some(ch) = self.advance() {
            if ch == '}' {
                return Ok(());
            }
        }

        Err(LexError {
            kind: LexErrorKind::UnterminatedComment,
            location: start.location(),
        })
    }

    fn make_token(&self, kind: TokenKind, start: Position) -> Token<'src> {
        Token {
            kind,
            text: &self.source[start.offset..self.position],
            position: start,
        }
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.source[self.position..].chars().next()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.source[self.position..].chars().nth(n)
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += ch.len_utf8();

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn advance_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.advance();
        }
    }

    fn current_position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
            offset: self.position,
        }
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Result<Token<'src>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let result = self.scan();
        match &result {
            Ok(token) if token.kind == TokenKind::Eof => self.finished = true,
            Err(_) => self.finished = true,
            Ok(_) => {}
        }
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).map(|t| t.unwrap().kind).collect()
    }

    fn lex_error(source: &str) -> LexError {
        tokenize(source)
            .find_map(Result::err)
            .expect("expected a lexer error")
    }

    #[test]
    fn test_simple_tokens() {
        let tokens = Lexer::new("method main() begin x := 0; end;")
            .tokenize()
            .unwrap();

        assert!(matches!(tokens[0].kind, TokenKind::Keyword(Keyword::Method)));
        assert!(matches!(tokens[1].kind, TokenKind::Identifier));
        assert_eq!(tokens[1].text, "main");
        assert!(matches!(tokens[2].kind, TokenKind::Punct(Punct::LParen)));
        assert!(matches!(tokens[3].kind, TokenKind::Punct(Punct::RParen)));
        assert!(matches!(tokens[4].kind, TokenKind::Keyword(Keyword::Begin)));
        assert!(matches!(tokens[5].kind, TokenKind::Identifier));
        assert!(matches!(tokens[6].kind, TokenKind::Operator(Operator::Assign)));
        assert!(matches!(tokens[7].kind, TokenKind::DecLit));
        assert!(matches!(tokens[8].kind, TokenKind::Punct(Punct::Semicolon)));
        assert!(matches!(tokens[9].kind, TokenKind::Keyword(Keyword::End)));
        assert!(matches!(tokens[10].kind, TokenKind::Punct(Punct::Semicolon)));
        assert!(matches!(tokens[11].kind, TokenKind::Eof));
        assert_eq!(tokens.len(), 12);
    }

    #[test]
    fn test_operators() {
        let ops = kinds(":= : <= << < >= >> > != ! && & || | = and or not ~ ^");

        assert_eq!(
            ops,
            vec![
                TokenKind::Operator(Operator::Assign),
                TokenKind::Punct(Punct::Colon),
                TokenKind::Operator(Operator::Le),
                TokenKind::Operator(Operator::LtLt),
                TokenKind::Operator(Operator::Lt),
                TokenKind::Operator(Operator::Ge),
                TokenKind::Operator(Operator::GtGt),
                TokenKind::Operator(Operator::Gt),
                TokenKind::Operator(Operator::NotEq),
                TokenKind::Operator(Operator::Bang),
                TokenKind::Operator(Operator::AndAnd),
                TokenKind::Operator(Operator::Amp),
                TokenKind::Operator(Operator::OrOr),
                TokenKind::Operator(Operator::Pipe),
                TokenKind::Operator(Operator::Eq),
                TokenKind::Operator(Operator::And),
                TokenKind::Operator(Operator::Or),
                TokenKind::Operator(Operator::Not),
                TokenKind::Operator(Operator::Tilde),
                TokenKind::Operator(Operator::Caret),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comments() {
        let tokens = Lexer::new("x; // comment\ny; { block\ncomment } z;")
            .tokenize()
            .unwrap();
        let texts: Vec<_> = tokens.iter().map(|t| t.text).collect();

        assert_eq!(texts, vec!["x", ";", "y", ";", "z", ";", ""]);
        assert_eq!(tokens[4].position.line, 3);
    }

    #[test]
    fn test_brace_comment_does_not_nest() {
        // The first '}' closes the comment; the second is not a token.
        let err = lex_error("{ outer { inner } still } x");
        assert_eq!(err.kind, LexErrorKind::UnrecognizedCharacter('}'));
    }

    #[test]
    fn test_comment_tokens_in_trivia_mode() {
        let tokens = Lexer::new("x { note } // tail")
            .with_comments(true)
            .tokenize()
            .unwrap();

        assert_eq!(tokens[1].kind, TokenKind::Comment);
        assert_eq!(tokens[1].text, "{ note }");
        assert_eq!(tokens[2].kind, TokenKind::Comment);
        assert_eq!(tokens[2].text, "// tail");
    }

    #[test]
    fn test_number_literals() {
        let tokens = Lexer::new("0x1F 0B101 42 0 0x 0b2").tokenize().unwrap();
        let pairs: Vec<_> = tokens.iter().map(|t| (t.kind, t.text)).collect();

        assert_eq!(
            pairs,
            vec![
                (TokenKind::HexLit, "0x1F"),
                (TokenKind::BinLit, "0B101"),
                (TokenKind::DecLit, "42"),
                (TokenKind::DecLit, "0"),
                (TokenKind::DecLit, "0"),
                (TokenKind::Identifier, "x"),
                (TokenKind::DecLit, "0"),
                (TokenKind::Identifier, "b2"),
                (TokenKind::Eof, ""),
            ]
        );
    }

    #[test]
    fn test_string_and_char_literals() {
        let tokens = Lexer::new(r#""hello \"world\"" 'a' true false"#)
            .tokenize()
            .unwrap();

        assert_eq!(tokens[0].kind, TokenKind::StringLit);
        assert_eq!(tokens[0].text, r#""hello \"world\"""#);
        assert_eq!(tokens[1].kind, TokenKind::CharLit);
        assert_eq!(tokens[1].text, "'a'");
        assert_eq!(tokens[2].kind, TokenKind::BoolLit);
        assert_eq!(tokens[3].kind, TokenKind::BoolLit);
    }

    #[test]
    fn test_keywords_and_builtin_types() {
        let tokens = Lexer::new("array of string ulong methods").tokenize().unwrap();

        assert_eq!(tokens[0].kind, TokenKind::Keyword(Keyword::Array));
        assert_eq!(tokens[1].kind, TokenKind::Keyword(Keyword::Of));
        assert_eq!(tokens[2].kind, TokenKind::Keyword(Keyword::String));
        assert_eq!(tokens[3].kind, TokenKind::Keyword(Keyword::Ulong));
        assert_eq!(tokens[4].kind, TokenKind::Identifier);
    }

    #[test]
    fn test_positions() {
        let tokens = Lexer::new("a\n  bc := 1").tokenize().unwrap();

        assert_eq!(tokens[1].position, Position { line: 2, column: 3, offset: 4 });
        assert_eq!(tokens[2].location(), SourceLocation::new(2, 6));
    }

    #[test]
    fn test_unterminated_string() {
        let err = lex_error("x := \"abc");
        assert_eq!(err.kind, LexErrorKind::UnterminatedString);
        assert_eq!(err.location, SourceLocation::new(1, 6));
    }

    #[test]
    fn test_unterminated_comment() {
        let err = lex_error("x { never closed");
        assert_eq!(err.kind, LexErrorKind::UnterminatedComment);
        assert_eq!(err.location, SourceLocation::new(1, 3));
    }

    #[test]
    fn test_invalid_char_literals() {
        for source in ["''", "'ab'", r"'\n'", "'"] {
            assert_eq!(lex_error(source).kind, LexErrorKind::InvalidCharLiteral, "{source}");
        }
    }

    #[test]
    fn test_unrecognized_character() {
        let err = lex_error("x := 1 @ 2");
        assert_eq!(err.kind, LexErrorKind::UnrecognizedCharacter('@'));
        assert_eq!(err.location, SourceLocation::new(1, 8));
    }

    #[test]
    fn test_stream_ends_after_eof() {
        let mut lexer = tokenize("x");
        assert!(matches!(lexer.next(), Some(Ok(t)) if t.kind == TokenKind::Identifier));
        assert!(matches!(lexer.next(), Some(Ok(t)) if t.kind == TokenKind::Eof));
        assert!(lexer.next().is_none());
    }

    #[test]
    fn test_stream_ends_after_error() {
        let mut lexer = tokenize("@ x");
        assert!(matches!(lexer.next(), Some(Err(_))));
        assert!(lexer.next().is_none());
    }
}
