/// SQL front-end: case-folding scanner, tokenizer, grammar engine, parse
/// driver and tree pretty printer.

pub mod ast;
pub mod driver;
pub mod grammar;
pub mod lexer;
pub mod pretty_print;
pub mod scanner;
pub mod template;
pub mod token;

pub use ast::AstNode;
pub use driver::{ParseDriver, parse_batch, parse_statement, parse_statement_list, read_all};
pub use grammar::{GrammarEngine, QueryGrammar};
pub use pretty_print::{render, render_at, render_flat};
