// Integration tests for the v2 lexer and parser

use v2lang::parser::ast::*;
use v2lang::parser::lexer::{LexErrorKind, Lexer, TokenKind};
use v2lang::parser::parse::ParseError;
use v2lang::parser::{Parser, MAX_NESTING_DEPTH};
use v2lang::{flow, outline, parse_source, printer, DiagnosticKind};
use std::thread;

fn body_of(source: &str) -> Vec<Statement> {
    let file = parse_source(source).expect("Parsing failed");
    let func = file.functions().next().expect("no method");
    func.body.clone().expect("no body").block.statements
}

fn statements(body: &str) -> Vec<Statement> {
    body_of(&format!("method test() begin {} end;", body))
}

fn expr(text: &str) -> Expr {
    match statements(&format!("x := {};", text)).remove(0) {
        Statement::Assignment { value, .. } => value,
        other => panic!("expected assignment, got {:?}", other),
    }
}

/// Compact prefix form ignoring locations: `(+ 1 (* 2 3))`
fn sexpr(e: &Expr) -> String {
    match e {
        Expr::Literal(v, _) => v.raw().to_string(),
        Expr::Identifier(name, _) => name.clone(),
        Expr::Unary { op, operand, .. } => format!("({} {})", op.symbol(), sexpr(operand)),
        Expr::Binary {
            op, left, right, ..
        } => format!("({} {} {})", op.symbol(), sexpr(left), sexpr(right)),
        Expr::Call { callee, args, .. } => {
            let args: Vec<String> = args.iter().map(sexpr).collect();
            format!("(call {} [{}])", sexpr(callee), args.join(" "))
        }
        Expr::Index { base, args, .. } => {
            let args: Vec<String> = args.iter().map(sexpr).collect();
            format!("(index {} [{}])", sexpr(base), args.join(" "))
        }
        Expr::Paren { inner, .. } => format!("[{}]", sexpr(inner)),
    }
}

#[test]
fn test_mul_binds_tighter_than_add() {
    let e = expr("1 + 2 * 3");
    assert!(matches!(
        &e,
        Expr::Binary { op: BinOp::Add, left, right, .. }
            if matches!(left.as_ref(), Expr::Literal(LiteralValue::Dec(d), _) if d == "1")
            && matches!(right.as_ref(), Expr::Binary { op: BinOp::Mul, .. })
    ));
}

#[test]
fn test_precedence_ladder() {
    assert_eq!(
        sexpr(&expr("a or b and c | d ^ e & f = g < h << i + j * k")),
        "(|| a (&& b (| c (^ d (& e (= f (< g (<< h (+ i (* j k))))))))))"
    );
    assert_eq!(
        sexpr(&expr("a * b + c << d < e = f & g ^ h | i && j || k")),
        "(|| (&& (| (^ (& (= (< (<< (+ (* a b) c) d) e) f) g) h) i) j) k)"
    );
}

#[test]
fn test_left_associativity() {
    assert_eq!(sexpr(&expr("a - b - c")), "(- (- a b) c)");
    assert_eq!(sexpr(&expr("a / b % c * d")), "(* (% (/ a b) c) d)");
    assert_eq!(sexpr(&expr("a < b >= c")), "(>= (< a b) c)");
}

#[test]
fn test_unary_is_prefix_and_right_recursive() {
    assert_eq!(sexpr(&expr("- - x")), "(- (- x))");
    assert_eq!(sexpr(&expr("not !~x")), "(! (! (~ x)))");
    assert_eq!(sexpr(&expr("-a * b")), "(* (- a) b)");
    assert_eq!(sexpr(&expr("-f(x)[1]")), "(- (index (call f [x]) [1]))");
}

#[test]
fn test_postfix_and_primary() {
    assert_eq!(sexpr(&expr("f()(1, 2)")), "(call (call f []) [1 2])");
    assert_eq!(sexpr(&expr("m[i, j]")), "(index m [i j])");
    assert_eq!(sexpr(&expr("(a + b) * c")), "(* [(+ a b)] c)");
}

#[test]
fn test_dangling_else_binds_inner_if() {
    let stmts = statements("if a then if b then s1; else s2;");
    assert_eq!(stmts.len(), 1);
    let Statement::If {
        then_branch,
        else_branch,
        ..
    } = &stmts[0]
    else {
        panic!("expected if");
    };
    assert!(else_branch.is_none());
    assert!(matches!(
        then_branch.as_ref(),
        Statement::If {
            else_branch: Some(_),
            ..
        }
    ));
}

#[test]
fn test_func_def_shape() {
    let file = parse_source("method f(x: int, y): bool begin end;").unwrap();
    let func = file.functions().next().unwrap();

    assert_eq!(func.name, "f");
    assert_eq!(func.params.len(), 2);
    assert_eq!(func.params[0].name, "x");
    assert!(matches!(
        func.params[0].arg_type,
        Some(TypeRef::Builtin(BuiltinType::Int, _))
    ));
    assert_eq!(func.params[1].name, "y");
    assert!(func.params[1].arg_type.is_none());
    assert!(matches!(
        func.return_type,
        Some(TypeRef::Builtin(BuiltinType::Bool, _))
    ));
    let body = func.body.as_ref().unwrap();
    assert!(body.var_blocks.is_empty());
    assert!(body.block.statements.is_empty());
}

#[test]
fn test_declaration_without_body() {
    let file = parse_source("method f();").unwrap();
    let func = file.functions().next().unwrap();
    assert!(func.body.is_none());
    assert!(func.is_declaration());
}

#[test]
fn test_assignment_not_expr_stmt() {
    let stmts = statements("x := 5;");
    assert!(matches!(
        &stmts[0],
        Statement::Assignment {
            target: Expr::Identifier(name, _),
            value: Expr::Literal(LiteralValue::Dec(v), _),
            ..
        } if name == "x" && v == "5"
    ));

    // A postfix head followed by operators stays an expression statement
    let stmts = statements("f(x) + 1;");
    assert!(matches!(
        &stmts[0],
        Statement::ExprStmt {
            expr: Expr::Binary { op: BinOp::Add, .. },
            ..
        }
    ));

    let stmts = statements("a[i] := b[j];");
    assert!(matches!(
        &stmts[0],
        Statement::Assignment {
            target: Expr::Index { .. },
            ..
        }
    ));
}

#[test]
fn test_repeat_until() {
    let stmts = statements("repeat x := x + 1; until x = 10;");
    let Statement::DoLoop {
        body,
        kind,
        condition,
        ..
    } = &stmts[0]
    else {
        panic!("expected repeat");
    };
    assert!(matches!(body.as_ref(), Statement::Assignment { .. }));
    assert_eq!(*kind, LoopKind::Until);
    assert_eq!(sexpr(condition), "(= x 10)");
}

#[test]
fn test_nested_blocks_consume_semicolon() {
    let stmts = statements("begin x; begin end; end; y;");
    assert_eq!(stmts.len(), 2);
    assert!(matches!(&stmts[0], Statement::Block(b) if b.statements.len() == 2));
}

#[test]
fn test_body_var_sections() {
    let file = parse_source(
        "method f() var a, b: int; c; var d: array [,] of Point; begin end;",
    )
    .unwrap();
    let body = file.functions().next().unwrap().body.clone().unwrap();

    assert_eq!(body.var_blocks.len(), 2);
    assert_eq!(body.var_blocks[0].len(), 2);
    assert_eq!(body.var_blocks[0][0].names, vec!["a", "b"]);
    assert!(body.var_blocks[0][1].var_type.is_none());
    assert!(matches!(
        &body.var_blocks[1][0].var_type,
        Some(TypeRef::Array { rank: 2, element, .. })
            if matches!(element.as_ref(), TypeRef::Named(n, _) if n == "Point")
    ));
}

#[test]
fn test_var_decl_statement_forms() {
    let stmts = statements("var i: int; j, k: long; j;");
    assert!(matches!(&stmts[0], Statement::VarDecl(d) if d.names == vec!["i"]));
    assert!(matches!(&stmts[1], Statement::VarDecl(d) if d.names == vec!["j", "k"]));
    assert!(matches!(&stmts[2], Statement::ExprStmt { .. }));
}

#[test]
fn test_missing_expression_error() {
    let source = "method f() begin x := ; end;";
    let err = Parser::new(source)
        .unwrap()
        .parse_source_file()
        .unwrap_err();

    match &err {
        ParseError::UnexpectedToken {
            expected,
            found,
            location,
        } => {
            assert!(expected.contains("identifier"));
            assert!(expected.contains("'('"));
            assert!(expected.contains("literal"));
            assert!(expected.contains("'not'"));
            assert_eq!(found, "';'");
            assert_eq!((location.line, location.column), (1, 23));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_unexpected_eof() {
    let err = Parser::new("method f() begin x := 1")
        .unwrap()
        .parse_source_file()
        .unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedEof { .. }));
}

#[test]
fn test_unterminated_string() {
    let err = parse_source("method f() begin s := \"abc").unwrap_err();
    assert_eq!(err.kind, DiagnosticKind::UnterminatedString);
    assert_eq!((err.line, err.column), (1, 23));
    assert!(err.to_string().starts_with("Lexer error at line 1, column 23"));

    let err = Lexer::new("\"abc").tokenize().unwrap_err();
    assert_eq!(err.kind, LexErrorKind::UnterminatedString);
}

#[test]
fn test_comments_are_discarded() {
    let file = parse_source(
        "// header\nmethod f() { braces { do not nest }\nbegin // trailing\n x; end;",
    );
    // `{ braces { do not nest }` closes at the first `}`
    assert!(file.is_ok());

    let tokens = Lexer::new("a { c } b // d").with_comments(true).tokenize().unwrap();
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Identifier,
            TokenKind::Comment,
            TokenKind::Identifier,
            TokenKind::Comment,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_recovery_collects_every_error() {
    let source = "
        method f() begin
            x := ;
            y := 1;
            z := * 2;
        end;
        method g() begin end;
    ";
    let mut parser = Parser::new(source).unwrap();
    let (file, errors) = parser.parse_source_file_recovering();

    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].location().line, 3);
    assert_eq!(errors[1].location().line, 5);
    let names: Vec<&str> = file.functions().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["f", "g"]);
}

/// Run `f` on a thread with a 2 MiB stack, the smallest a caller is likely to use
fn on_small_stack<T: Send + 'static>(f: impl FnOnce() -> T + Send + 'static) -> T {
    thread::Builder::new()
        .stack_size(2 * 1024 * 1024)
        .spawn(f)
        .unwrap()
        .join()
        .unwrap()
}

fn nested_parens(n: usize) -> String {
    format!("method f() begin x := {}1{}; end;", "(".repeat(n), ")".repeat(n))
}

fn nested_ifs(n: usize) -> String {
    format!("method f() begin {}x := 1; end;", "if c then ".repeat(n))
}

#[test]
fn test_nesting_up_to_limit_is_accepted() {
    let depth = MAX_NESTING_DEPTH - 8;
    on_small_stack(move || {
        for source in [
            nested_parens(depth),
            nested_ifs(depth),
            format!("method f() begin x := {}1; end;", "- ".repeat(depth)),
            format!("method f() begin x := {}1{}; end;", "g(".repeat(depth), ")".repeat(depth)),
            format!("method f() begin x := {}1; end;", "1 + ".repeat(depth)),
        ] {
            let file = parse_source(&source).unwrap();
            // Every tree walker copes with the deepest accepted tree
            let printed = printer::print_source_file(&file);
            assert!(parse_source(&printed).is_ok(), "reparse failed: {}", printed);
            outline::render_text(&outline::build(&file));
            flow::analyze(&file, &flow::FlowOptions::default());
        }
    });
}

#[test]
fn test_excessive_nesting_is_an_error() {
    on_small_stack(|| {
        for source in [
            nested_parens(10_000),
            nested_ifs(10_000),
            format!("method f() begin x := {}1; end;", "-".repeat(10_000)),
            format!("method f() begin x := {}1; end;", "not ".repeat(10_000)),
            format!("method f() {}end;", "begin ".repeat(10_000)),
            format!("method f() begin x := {}1; end;", "a * ".repeat(10_000)),
        ] {
            let err = parse_source(&source).unwrap_err();
            assert_eq!(err.kind, DiagnosticKind::NestingTooDeep);
            assert_eq!(err.line, 1);
            assert!(err.message.contains(&MAX_NESTING_DEPTH.to_string()));
        }
    });
}

#[test]
fn test_nesting_error_position() {
    // The first paren sits at column 23 and the statement itself is one level
    let err = parse_source(&nested_parens(MAX_NESTING_DEPTH)).unwrap_err();
    assert_eq!(err.kind, DiagnosticKind::NestingTooDeep);
    assert_eq!(err.column, 23 + MAX_NESTING_DEPTH);

    assert!(parse_source(&nested_parens(MAX_NESTING_DEPTH - 1)).is_ok());
}

#[test]
fn test_recovery_after_nesting_error() {
    let source = format!(
        "method f() begin\n x := {}1{};\n y := (2);\nend;\n",
        "(".repeat(500),
        ")".repeat(500)
    );
    let mut parser = Parser::new(&source).unwrap();
    let (file, errors) = parser.parse_source_file_recovering();

    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], ParseError::NestingTooDeep { .. }));
    let func = file.functions().next().unwrap();
    let statements = &func.body.as_ref().unwrap().block.statements;
    assert_eq!(statements.len(), 1);
    assert!(matches!(&statements[0], Statement::Assignment { value: Expr::Paren { .. }, .. }));
}

mod precedence_props {
    use super::*;
    use proptest::prelude::*;

    const OPS: [&str; 19] = [
        "||", "&&", "|", "^", "&", "=", "!=", "<", ">", "<=", ">=", "<<", ">>", "+", "-", "*",
        "/", "%", "or",
    ];

    fn level(op: &str) -> u8 {
        match op {
            "||" | "or" => 1,
            "&&" | "and" => 2,
            "|" => 3,
            "^" => 4,
            "&" => 5,
            "=" | "!=" => 6,
            "<" | ">" | "<=" | ">=" => 7,
            "<<" | ">>" => 8,
            "+" | "-" => 9,
            _ => 10,
        }
    }

    /// Reference precedence-climbing over a flat operand/operator list
    fn reference(operands: &[String], ops: &[&str]) -> String {
        fn climb(
            operands: &[String],
            ops: &[&str],
            pos: &mut usize,
            min_level: u8,
        ) -> String {
            let mut left = operands[*pos].clone();
            while *pos < ops.len() && level(ops[*pos]) >= min_level {
                let op = ops[*pos];
                *pos += 1;
                let right = climb(operands, ops, pos, level(op) + 1);
                let symbol = if op == "or" { "||" } else { op };
                left = format!("({} {} {})", symbol, left, right);
            }
            left
        }
        let mut pos = 0;
        climb(operands, ops, &mut pos, 1)
    }

    proptest! {
        #[test]
        fn binary_trees_follow_precedence_and_left_assoc(
            picks in prop::collection::vec(0..OPS.len(), 1..8)
        ) {
            let ops: Vec<&str> = picks.iter().map(|&i| OPS[i]).collect();
            let operands: Vec<String> = (0..=ops.len()).map(|i| format!("v{}", i)).collect();

            let mut text = operands[0].clone();
            for (op, operand) in ops.iter().zip(&operands[1..]) {
                text.push_str(&format!(" {} {}", op, operand));
            }

            prop_assert_eq!(sexpr(&expr(&text)), reference(&operands, &ops));
        }
    }
}
