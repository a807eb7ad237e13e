use std::io::{BufReader, Read};

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::common::QueryResult;
use crate::config::READ_BUFFER_SIZE;
use super::ast::AstNode;
use super::grammar::{GrammarEngine, QueryGrammar};
use super::lexer::Lexer;
use super::scanner::{CaseFoldingStream, StringStream};
use super::token::TokenStream;

#[cfg(test)]
mod tests;

/// Wires source text through the case-folding scanner, the lexer and a
/// grammar engine. Parsing is a pure function of the text; the driver holds
/// no state besides the engine.
#[derive(Debug, Default, Clone)]
pub struct ParseDriver<G: GrammarEngine = QueryGrammar> {
    engine: G,
}

impl ParseDriver<QueryGrammar> {
    pub fn new() -> Self {
        Self { engine: QueryGrammar }
    }
}

impl<G: GrammarEngine> ParseDriver<G> {
    pub fn with_engine(engine: G) -> Self {
        Self { engine }
    }

    /// Parses `text` as exactly one statement.
    pub fn parse_statement(&self, text: &str) -> QueryResult<AstNode> {
        let tokens = Self::tokenize(text)?;
        match self.engine.parse_statement(tokens) {
            Ok(tree) => {
                debug!("parsed statement ({} bytes)", text.len());
                Ok(tree)
            }
            Err(e) => {
                debug!("statement rejected: {}", e);
                Err(e.into())
            }
        }
    }

    /// Parses `text` as zero or more statements. The root is a group whose
    /// children are the statements in source order.
    pub fn parse_statement_list(&self, text: &str) -> QueryResult<AstNode> {
        let tokens = Self::tokenize(text)?;
        match self.engine.parse_statement_list(tokens) {
            Ok(tree) => {
                debug!("parsed {} statement(s) ({} bytes)", tree.children().len(), text.len());
                Ok(tree)
            }
            Err(e) => {
                debug!("statement list rejected: {}", e);
                Err(e.into())
            }
        }
    }

    fn tokenize(text: &str) -> QueryResult<TokenStream> {
        let stream = CaseFoldingStream::new(StringStream::new(text));
        let tokens = Lexer::new(stream).tokenize().inspect_err(|e| {
            debug!("tokenizer rejected input: {}", e);
        })?;
        trace!("token stream holds {} tokens", tokens.len());
        Ok(tokens)
    }
}

impl<G: GrammarEngine + Sync> ParseDriver<G> {
    /// Parses independent statement lists in parallel. Results keep the
    /// order of `texts`.
    pub fn parse_batch<T: AsRef<str> + Sync>(&self, texts: &[T]) -> Vec<QueryResult<AstNode>> {
        texts
            .par_iter()
            .map(|text| self.parse_statement_list(text.as_ref()))
            .collect()
    }
}

pub fn parse_statement(text: &str) -> QueryResult<AstNode> {
    ParseDriver::new().parse_statement(text)
}

pub fn parse_statement_list(text: &str) -> QueryResult<AstNode> {
    ParseDriver::new().parse_statement_list(text)
}

pub fn parse_batch<T: AsRef<str> + Sync>(texts: &[T]) -> Vec<QueryResult<AstNode>> {
    ParseDriver::new().parse_batch(texts)
}

/// Drains `source` to the end and returns its contents as text.
/// Read failures and invalid UTF-8 surface as `QueryError::Io`.
pub fn read_all<R: Read>(source: R) -> QueryResult<String> {
    let mut reader = BufReader::with_capacity(READ_BUFFER_SIZE, source);
    let mut text = String::new();
    let n = reader.read_to_string(&mut text)?;
    debug!("read {} bytes of query text", n);
    Ok(text)
}
