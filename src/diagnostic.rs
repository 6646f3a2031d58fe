//! A single flattened error record for callers that only need to report a
//! failed parse: what went wrong and where.

use crate::parser::lexer::{LexError, LexErrorKind};
use crate::parser::parse::ParseError;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    UnterminatedString,
    UnterminatedComment,
    InvalidCharLiteral,
    UnrecognizedCharacter,
    UnexpectedToken,
    UnexpectedEof,
    InvalidAssignmentTarget,
    NestingTooDeep,
}

impl DiagnosticKind {
    pub fn is_lex_error(&self) -> bool {
        matches!(
            self,
            DiagnosticKind::UnterminatedString
                | DiagnosticKind::UnterminatedComment
                | DiagnosticKind::InvalidCharLiteral
                | DiagnosticKind::UnrecognizedCharacter
        )
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_lex_error() {
            write!(f, "Lexer error")
        } else {
            write!(f, "Parse error")
        }
    }
}

/// Error returned by [`crate::parse_source`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at line {line}, column {column}: {message}")]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl From<LexError> for Diagnostic {
    fn from(err: LexError) -> Self {
        let kind = match err.kind {
            LexErrorKind::UnterminatedString => DiagnosticKind::UnterminatedString,
            LexErrorKind::UnterminatedComment => DiagnosticKind::UnterminatedComment,
            LexErrorKind::InvalidCharLiteral => DiagnosticKind::InvalidCharLiteral,
            LexErrorKind::UnrecognizedCharacter(_) => DiagnosticKind::UnrecognizedCharacter,
        };
        Diagnostic {
            kind,
            message: err.kind.to_string(),
            line: err.location.line,
            column: err.location.column,
        }
    }
}

impl From<ParseError> for Diagnostic {
    fn from(err: ParseError) -> Self {
        let kind = match err {
            ParseError::UnexpectedToken { .. } => DiagnosticKind::UnexpectedToken,
            ParseError::UnexpectedEof { .. } => DiagnosticKind::UnexpectedEof,
            ParseError::InvalidAssignmentTarget { .. } => DiagnosticKind::InvalidAssignmentTarget,
            ParseError::NestingTooDeep { .. } => DiagnosticKind::NestingTooDeep,
        };
        let location = err.location();
        Diagnostic {
            kind,
            message: err.detail(),
            line: location.line,
            column: location.column,
        }
    }
}
