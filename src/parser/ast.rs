// AST (Abstract Syntax Tree) definitions for v2 source files

use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Builtin type names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinType {
    Bool,
    Byte,
    Int,
    Uint,
    Long,
    Ulong,
    Char,
    String,
}

impl BuiltinType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuiltinType::Bool => "bool",
            BuiltinType::Byte => "byte",
            BuiltinType::Int => "int",
            BuiltinType::Uint => "uint",
            BuiltinType::Long => "long",
            BuiltinType::Ulong => "ulong",
            BuiltinType::Char => "char",
            BuiltinType::String => "string",
        }
    }
}

/// Type reference: builtin, user-named, or `array [,,] of T`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Builtin(BuiltinType, SourceLocation),
    Named(String, SourceLocation),
    Array {
        element: Box<TypeRef>,
        rank: usize, // number of ',' inside the brackets + 1
        location: SourceLocation,
    },
}

impl TypeRef {
    pub fn location(&self) -> SourceLocation {
        match self {
            TypeRef::Builtin(_, loc) | TypeRef::Named(_, loc) => *loc,
            TypeRef::Array { location, .. } => *location,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Builtin(builtin, _) => write!(f, "{}", builtin.as_str()),
            TypeRef::Named(name, _) => write!(f, "{}", name),
            TypeRef::Array { element, rank, .. } => {
                write!(f, "array [{}] of {}", ",".repeat(rank.saturating_sub(1)), element)
            }
        }
    }
}

/// Binary operators, listed from lowest to highest precedence level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Logical
    Or,
    And,
    // Bitwise
    BitOr,
    BitXor,
    BitAnd,
    // Comparison
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    // Shift
    Shl,
    Shr,
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinOp {
    /// Canonical source spelling (`and`/`or` print as `&&`/`||`)
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOp::Or => "||",
            BinOp::And => "&&",
            BinOp::BitOr => "|",
            BinOp::BitXor => "^",
            BinOp::BitAnd => "&",
            BinOp::Eq => "=",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::Le => "<=",
            BinOp::Ge => ">=",
            BinOp::Shl => "<<",
            BinOp::Shr => ">>",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
        }
    }

    /// Precedence level, 1 (`||`) through 10 (`*`)
    pub fn level(&self) -> u8 {
        match self {
            BinOp::Or => 1,
            BinOp::And => 2,
            BinOp::BitOr => 3,
            BinOp::BitXor => 4,
            BinOp::BitAnd => 5,
            BinOp::Eq | BinOp::Ne => 6,
            BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge => 7,
            BinOp::Shl | BinOp::Shr => 8,
            BinOp::Add | BinOp::Sub => 9,
            BinOp::Mul | BinOp::Div | BinOp::Mod => 10,
        }
    }
}

/// Unary (prefix) operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,    // -x
    Not,    // !x, not x
    BitNot, // ~x
}

impl UnOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnOp::Neg => "-",
            UnOp::Not => "!",
            UnOp::BitNot => "~",
        }
    }
}

/// Literal values. Raw token text is kept verbatim, including quotes and
/// radix prefixes; nothing is interpreted at parse time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiteralValue {
    Bool(bool),
    Str(String),
    Char(String),
    Hex(String),
    Bin(String),
    Dec(String),
}

impl LiteralValue {
    pub fn raw(&self) -> &str {
        match self {
            LiteralValue::Bool(true) => "true",
            LiteralValue::Bool(false) => "false",
            LiteralValue::Str(raw)
            | LiteralValue::Char(raw)
            | LiteralValue::Hex(raw)
            | LiteralValue::Bin(raw)
            | LiteralValue::Dec(raw) => raw,
        }
    }
}

/// Expressions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Literal(LiteralValue, SourceLocation),
    Identifier(String, SourceLocation),
    Unary {
        op: UnOp,
        operand: Box<Expr>,
        location: SourceLocation,
    },
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
        location: SourceLocation,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        location: SourceLocation,
    },
    Index {
        base: Box<Expr>,
        args: Vec<Expr>,
        location: SourceLocation,
    },
    Paren {
        inner: Box<Expr>,
        location: SourceLocation,
    },
}

impl Expr {
    /// Get the source location of this expression
    pub fn location(&self) -> SourceLocation {
        match self {
            Expr::Literal(_, loc) | Expr::Identifier(_, loc) => *loc,
            Expr::Unary { location, .. }
            | Expr::Binary { location, .. }
            | Expr::Call { location, .. }
            | Expr::Index { location, .. }
            | Expr::Paren { location, .. } => *location,
        }
    }

    /// Name of the callee when it is a plain identifier
    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            Expr::Identifier(name, _) => Some(name),
            _ => None,
        }
    }
}

/// `repeat ... while` keeps looping while the condition holds,
/// `repeat ... until` stops once it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopKind {
    While,
    Until,
}

impl LoopKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoopKind::While => "while",
            LoopKind::Until => "until",
        }
    }
}

/// `a, b, c: T;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarDecl {
    pub names: Vec<String>,
    pub var_type: Option<TypeRef>,
    pub location: SourceLocation,
}

/// `begin ... end;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub location: SourceLocation,
}

/// Statements
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    If {
        condition: Expr,
        then_branch: Box<Statement>,
        else_branch: Option<Box<Statement>>,
        location: SourceLocation,
    },
    Block(Block),
    While {
        condition: Expr,
        body: Box<Statement>,
        location: SourceLocation,
    },
    DoLoop {
        body: Box<Statement>,
        kind: LoopKind,
        condition: Expr,
        location: SourceLocation,
    },
    Break {
        location: SourceLocation,
    },
    Assignment {
        target: Expr,
        value: Expr,
        location: SourceLocation,
    },
    ExprStmt {
        expr: Expr,
        location: SourceLocation,
    },
    VarDecl(VarDecl),
}

impl Statement {
    /// Get the source location of this statement
    pub fn location(&self) -> SourceLocation {
        match self {
            Statement::If { location, .. }
            | Statement::While { location, .. }
            | Statement::DoLoop { location, .. }
            | Statement::Break { location }
            | Statement::Assignment { location, .. }
            | Statement::ExprStmt { location, .. } => *location,
            Statement::Block(block) => block.location,
            Statement::VarDecl(decl) => decl.location,
        }
    }
}

/// Function parameter: `name [: T]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgDef {
    pub name: String,
    pub arg_type: Option<TypeRef>,
    pub location: SourceLocation,
}

/// Function body: zero or more `var` sections followed by the main block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Body {
    pub var_blocks: Vec<Vec<VarDecl>>,
    pub block: Block,
}

/// `method name(args) [: T] (body | ;)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDef {
    pub name: String,
    pub params: Vec<ArgDef>,
    pub return_type: Option<TypeRef>,
    pub body: Option<Body>, // None for a forward declaration
    pub location: SourceLocation,
}

impl FuncDef {
    pub fn is_declaration(&self) -> bool {
        self.body.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceItem {
    FuncDef(FuncDef),
}

/// Root of one parsed translation unit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceFile {
    pub items: Vec<SourceItem>,
}

impl SourceFile {
    pub fn new() -> Self {
        SourceFile::default()
    }

    /// All function definitions and declarations, in source order
    pub fn functions(&self) -> impl Iterator<Item = &FuncDef> {
        self.items.iter().map(|item| match item {
            SourceItem::FuncDef(func) => func,
        })
    }
}
