//! Expression AST - the core of SQL expression building.
//!
//! A strongly-typed AST for the expressions the renderer emits, with
//! exhaustive pattern matching enforced by the compiler.

use super::token::{Token, TokenStream};

/// A SQL expression.
///
/// Every variant must be handled in `to_tokens()` - the compiler enforces this.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Column reference.
    Column { column: String },

    /// Literal values
    Literal(Literal),

    /// Binary operation: left op right
    BinaryOp {
        left: Box<Expr>,
        op: BinaryOperator,
        right: Box<Expr>,
    },

    /// Function call: name(args...)
    Function {
        name: String,
        args: Vec<Expr>,
        distinct: bool,
    },

    /// CASE WHEN... THEN... ELSE... END
    Case {
        when_clauses: Vec<(Expr, Expr)>,
        else_clause: Option<Box<Expr>>,
    },

    /// IS NOT NULL test.
    IsNotNull { expr: Box<Expr> },

    /// Wildcard: *
    Star,

    /// Parenthesized expression
    Paren(Box<Expr>),

    /// Ordered-set aggregate: PERCENTILE_CONT(f) WITHIN GROUP (ORDER BY expr)
    PercentileCont { fraction: f64, order_expr: Box<Expr> },

    /// Window function: function OVER (ORDER BY exprs). An empty order
    /// list renders as OVER ().
    WindowFunction {
        function: Box<Expr>,
        order_by: Vec<WindowOrderBy>,
    },
}

/// An ORDER BY item inside an OVER clause.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowOrderBy {
    pub expr: Expr,
    pub desc: bool,
}

impl WindowOrderBy {
    pub fn asc(expr: Expr) -> Self {
        Self { expr, desc: false }
    }

    pub fn desc(expr: Expr) -> Self {
        Self { expr, desc: true }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    String(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Eq,
    Lt,
    Gt,
    Plus,
    Minus,
    Mul,
    Div,
    And,
    Or,
}

fn binary_op_to_token(op: BinaryOperator) -> Token {
    match op {
        BinaryOperator::Eq => Token::Eq,
        BinaryOperator::Lt => Token::Lt,
        BinaryOperator::Gt => Token::Gt,
        BinaryOperator::Plus => Token::Plus,
        BinaryOperator::Minus => Token::Minus,
        BinaryOperator::Mul => Token::Mul,
        BinaryOperator::Div => Token::Div,
        BinaryOperator::And => Token::And,
        BinaryOperator::Or => Token::Or,
    }
}

impl Expr {
    /// Convert this expression to a token stream.
    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();

        match self {
            Expr::Column { column } => {
                ts.push(Token::Ident(column.clone()));
            }

            Expr::Literal(lit) => {
                ts.push(match lit {
                    Literal::Int(n) => Token::LitInt(*n),
                    Literal::Float(f) => Token::LitFloat(*f),
                    Literal::String(s) => Token::LitString(s.clone()),
                });
            }

            Expr::BinaryOp { left, op, right } => {
                ts.append(&left.to_tokens());
                ts.space();
                ts.push(binary_op_to_token(*op));
                ts.space();
                ts.append(&right.to_tokens());
            }

            Expr::Function {
                name,
                args,
                distinct,
            } => {
                ts.push(Token::FunctionName(name.clone()));
                ts.lparen();
                if *distinct {
                    ts.push(Token::Distinct).space();
                }
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        ts.comma().space();
                    }
                    ts.append(&arg.to_tokens());
                }
                ts.rparen();
            }

            Expr::Case {
                when_clauses,
                else_clause,
            } => {
                ts.push(Token::Case);
                for (when, then) in when_clauses {
                    ts.space().push(Token::When).space();
                    ts.append(&when.to_tokens());
                    ts.space().push(Token::Then).space();
                    ts.append(&then.to_tokens());
                }
                if let Some(else_expr) = else_clause {
                    ts.space().push(Token::Else).space();
                    ts.append(&else_expr.to_tokens());
                }
                ts.space().push(Token::End);
            }

            Expr::IsNotNull { expr } => {
                ts.append(&expr.to_tokens());
                ts.space().push(Token::IsNotNull);
            }

            Expr::Star => {
                ts.push(Token::Star);
            }

            Expr::Paren(inner) => {
                ts.lparen();
                ts.append(&inner.to_tokens());
                ts.rparen();
            }

            Expr::PercentileCont {
                fraction,
                order_expr,
            } => {
                ts.push(Token::FunctionName("PERCENTILE_CONT".into()));
                ts.lparen();
                ts.push(Token::LitFloat(*fraction));
                ts.rparen();
                ts.space().push(Token::WithinGroup).space();
                ts.lparen();
                ts.push(Token::OrderBy).space();
                ts.append(&order_expr.to_tokens());
                ts.rparen();
            }

            Expr::WindowFunction { function, order_by } => {
                ts.append(&function.to_tokens());
                ts.space().push(Token::Over).space();
                ts.lparen();
                if !order_by.is_empty() {
                    ts.push(Token::OrderBy).space();
                    for (i, item) in order_by.iter().enumerate() {
                        if i > 0 {
                            ts.comma().space();
                        }
                        ts.append(&item.expr.to_tokens());
                        if item.desc {
                            ts.space().push(Token::Desc);
                        }
                    }
                }
                ts.rparen();
            }
        }

        ts
    }

    pub fn binary(self, op: BinaryOperator, right: Expr) -> Expr {
        Expr::BinaryOp {
            left: Box::new(self),
            op,
            right: Box::new(right),
        }
    }
}

// =============================================================================
// Constructor helpers
// =============================================================================

/// Column reference.
pub fn col(name: &str) -> Expr {
    Expr::Column {
        column: name.to_string(),
    }
}

pub fn lit_int(n: i64) -> Expr {
    Expr::Literal(Literal::Int(n))
}

pub fn lit_float(f: f64) -> Expr {
    Expr::Literal(Literal::Float(f))
}

pub fn lit_str(s: &str) -> Expr {
    Expr::Literal(Literal::String(s.to_string()))
}

pub fn star() -> Expr {
    Expr::Star
}

/// COUNT(*)
pub fn count_star() -> Expr {
    Expr::Function {
        name: "COUNT".into(),
        args: vec![star()],
        distinct: false,
    }
}

/// COUNT(DISTINCT expr)
pub fn count_distinct(expr: Expr) -> Expr {
    Expr::Function {
        name: "COUNT".into(),
        args: vec![expr],
        distinct: true,
    }
}

pub fn sum(expr: Expr) -> Expr {
    func("SUM", vec![expr])
}

pub fn avg(expr: Expr) -> Expr {
    func("AVG", vec![expr])
}

pub fn min(expr: Expr) -> Expr {
    func("MIN", vec![expr])
}

pub fn max(expr: Expr) -> Expr {
    func("MAX", vec![expr])
}

/// Generic function call.
pub fn func(name: &str, args: Vec<Expr>) -> Expr {
    Expr::Function {
        name: name.to_string(),
        args,
        distinct: false,
    }
}

/// PERCENTILE_CONT(fraction) WITHIN GROUP (ORDER BY expr)
pub fn percentile_cont(fraction: f64, order_expr: Expr) -> Expr {
    Expr::PercentileCont {
        fraction,
        order_expr: Box::new(order_expr),
    }
}

/// LAG(expr) OVER (ORDER BY order_by...)
pub fn lag_over(expr: Expr, order_by: Vec<WindowOrderBy>) -> Expr {
    Expr::WindowFunction {
        function: Box::new(func("LAG", vec![expr])),
        order_by,
    }
}

/// expr OVER (), i.e. a window over the whole result set.
pub fn over_all(expr: Expr) -> Expr {
    Expr::WindowFunction {
        function: Box::new(expr),
        order_by: vec![],
    }
}
