//! SQL generation module.
//!
//! A type-safe SQL builder targeting one generic dialect. It includes:
//!
//! - [`query`] - SELECT query builder
//! - [`expr`] - Expression AST and builder DSL
//! - [`token`] - Token types for SQL generation

pub mod expr;
pub mod query;
pub mod token;

// Re-export commonly used types at the sql module level
pub use expr::{
    avg, col, count_distinct, count_star, func, lag_over, lit_float, lit_int, lit_str, max, min,
    over_all, percentile_cont, star, sum, BinaryOperator, Expr, Literal, WindowOrderBy,
};
pub use query::{Cte, OrderByExpr, Query, SelectExpr, SortDir, TableRef};
pub use token::{Token, TokenStream};
