//! Grammar engine for the query language.
//!
//! [`GrammarEngine`] is the seam the parse driver talks to. [`QueryGrammar`]
//! is the built-in recursive-descent implementation covering analytical
//! queries (the TPC-H query shape) plus `CREATE VIEW` / `DROP VIEW`.
//!
//! Trees use canonical upper-case labels for everything derived from
//! keywords and operators, so `select` and `SELECT` parse to the same tree.
//! Identifiers and literals keep their source text.

use sqlparser::keywords::Keyword;

use super::ast::AstNode;
use super::token::{Token, TokenKind, TokenStream};
use crate::common::SyntaxError;
use crate::config::MAX_NESTING_DEPTH;

/// Turns a token stream into a syntax tree.
pub trait GrammarEngine {
    /// Exactly one statement, optionally followed by `;`, then end of input.
    fn parse_statement(&self, tokens: TokenStream) -> Result<AstNode, SyntaxError>;

    /// Zero or more `;`-separated statements under one `AstNode::Group` root.
    fn parse_statement_list(&self, tokens: TokenStream) -> Result<AstNode, SyntaxError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct QueryGrammar;

impl GrammarEngine for QueryGrammar {
    fn parse_statement(&self, tokens: TokenStream) -> Result<AstNode, SyntaxError> {
        let mut parser = Parser::new(tokens);
        let stmt = parser.parse_statement()?;
        parser.eat(TokenKind::Semicolon);
        parser.expect_eof()?;
        Ok(stmt)
    }

    fn parse_statement_list(&self, tokens: TokenStream) -> Result<AstNode, SyntaxError> {
        let mut parser = Parser::new(tokens);
        let mut stmts = Vec::new();
        loop {
            while parser.eat(TokenKind::Semicolon) {}
            if parser.tokens.at_eof() {
                break;
            }
            stmts.push(parser.parse_statement()?);
            if !parser.eat(TokenKind::Semicolon) {
                parser.expect_eof()?;
                break;
            }
        }
        Ok(AstNode::group(stmts))
    }
}

/// Words that can never be used as bare identifiers.
const RESERVED: &[Keyword] = &[
    Keyword::ALL,
    Keyword::AND,
    Keyword::AS,
    Keyword::ASC,
    Keyword::BETWEEN,
    Keyword::BY,
    Keyword::CASE,
    Keyword::CREATE,
    Keyword::CROSS,
    Keyword::DESC,
    Keyword::DISTINCT,
    Keyword::DROP,
    Keyword::ELSE,
    Keyword::END,
    Keyword::EXCEPT,
    Keyword::EXISTS,
    Keyword::FALSE,
    Keyword::FROM,
    Keyword::FULL,
    Keyword::GROUP,
    Keyword::HAVING,
    Keyword::IN,
    Keyword::INNER,
    Keyword::INTERSECT,
    Keyword::IS,
    Keyword::JOIN,
    Keyword::LEFT,
    Keyword::LIKE,
    Keyword::LIMIT,
    Keyword::NOT,
    Keyword::NULL,
    Keyword::ON,
    Keyword::OR,
    Keyword::ORDER,
    Keyword::OUTER,
    Keyword::RIGHT,
    Keyword::SELECT,
    Keyword::THEN,
    Keyword::TRUE,
    Keyword::UNION,
    Keyword::WHEN,
    Keyword::WHERE,
];

pub fn is_reserved(keyword: Keyword) -> bool {
    RESERVED.contains(&keyword)
}

const INTERVAL_UNITS: &[Keyword] = &[
    Keyword::YEAR,
    Keyword::MONTH,
    Keyword::DAY,
    Keyword::HOUR,
    Keyword::MINUTE,
    Keyword::SECOND,
];

struct Parser {
    tokens: TokenStream,
    depth: usize,
}

impl Parser {
    fn new(tokens: TokenStream) -> Self {
        Self { tokens, depth: 0 }
    }

    /// Runs `f` one nesting level deeper, failing once `MAX_NESTING_DEPTH`
    /// levels are open.
    fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, SyntaxError>,
    ) -> Result<T, SyntaxError> {
        if self.depth >= MAX_NESTING_DEPTH {
            let tok = self.peek();
            return Err(SyntaxError::new(tok.line, tok.column, "maximum nesting depth exceeded"));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    // =======================================================================
    // Token helpers
    // =======================================================================

    fn peek(&self) -> &Token {
        self.tokens.peek()
    }

    fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn peek_keyword(&self, keyword: Keyword) -> bool {
        self.peek().is_keyword(keyword)
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.peek_is(kind) {
            self.tokens.advance();
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: Keyword) -> bool {
        if self.peek_keyword(keyword) {
            self.tokens.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<Token, SyntaxError> {
        if self.peek_is(kind) {
            Ok(self.tokens.advance())
        } else {
            Err(self.mismatch(what))
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword, what: &str) -> Result<(), SyntaxError> {
        if self.eat_keyword(keyword) {
            Ok(())
        } else {
            Err(self.mismatch(what))
        }
    }

    fn expect_eof(&self) -> Result<(), SyntaxError> {
        if self.tokens.at_eof() {
            Ok(())
        } else {
            let tok = self.peek();
            Err(SyntaxError::new(
                tok.line,
                tok.column,
                format!("extraneous input '{}' expecting <EOF>", tok.display_text()),
            ))
        }
    }

    fn mismatch(&self, what: &str) -> SyntaxError {
        let tok = self.peek();
        SyntaxError::new(
            tok.line,
            tok.column,
            format!("mismatched input '{}' expecting {}", tok.display_text(), what),
        )
    }

    fn is_identifier(tok: &Token) -> bool {
        match tok.kind {
            TokenKind::Word { keyword } => !is_reserved(keyword),
            TokenKind::QuotedIdent => true,
            _ => false,
        }
    }

    fn identifier(&mut self) -> Result<AstNode, SyntaxError> {
        if Self::is_identifier(self.peek()) {
            Ok(AstNode::leaf(self.tokens.advance().text))
        } else {
            Err(self.mismatch("identifier"))
        }
    }

    /// Whether the `(` at the read position opens a query, looking through
    /// any further `(` for a SELECT.
    fn query_follows_paren(&self) -> bool {
        let mut k = 2;
        while self.tokens.lt(k).kind == TokenKind::LParen {
            k += 1;
        }
        self.tokens.lt(k).is_keyword(Keyword::SELECT)
    }

    // =======================================================================
    // Statements
    // =======================================================================

    fn parse_statement(&mut self) -> Result<AstNode, SyntaxError> {
        if self.peek_keyword(Keyword::SELECT) || self.peek_is(TokenKind::LParen) {
            self.parse_query()
        } else if self.peek_keyword(Keyword::CREATE) {
            self.parse_create_view()
        } else if self.peek_keyword(Keyword::DROP) {
            self.parse_drop_view()
        } else {
            Err(self.mismatch("statement"))
        }
    }

    fn parse_create_view(&mut self) -> Result<AstNode, SyntaxError> {
        self.expect_keyword(Keyword::CREATE, "CREATE")?;
        self.expect_keyword(Keyword::VIEW, "VIEW")?;
        let mut children = vec![self.identifier()?];
        if self.eat(TokenKind::LParen) {
            let mut columns = vec![self.identifier()?];
            while self.eat(TokenKind::Comma) {
                columns.push(self.identifier()?);
            }
            self.expect(TokenKind::RParen, "')'")?;
            children.push(AstNode::internal("COLUMNS", columns));
        }
        self.expect_keyword(Keyword::AS, "AS")?;
        children.push(self.parse_query()?);
        Ok(AstNode::internal("CREATE_VIEW", children))
    }

    fn parse_drop_view(&mut self) -> Result<AstNode, SyntaxError> {
        self.expect_keyword(Keyword::DROP, "DROP")?;
        self.expect_keyword(Keyword::VIEW, "VIEW")?;
        let name = self.identifier()?;
        Ok(AstNode::internal("DROP_VIEW", vec![name]))
    }

    // =======================================================================
    // Queries
    // =======================================================================

    fn parse_query(&mut self) -> Result<AstNode, SyntaxError> {
        self.nested(Self::parse_query_body)
    }

    fn parse_query_body(&mut self) -> Result<AstNode, SyntaxError> {
        let mut children = vec![self.parse_query_expr()?];

        if self.eat_keyword(Keyword::ORDER) {
            self.expect_keyword(Keyword::BY, "BY")?;
            let mut items = vec![self.parse_sort_item()?];
            while self.eat(TokenKind::Comma) {
                items.push(self.parse_sort_item()?);
            }
            children.push(AstNode::internal("ORDER_BY", items));
        }

        if self.eat_keyword(Keyword::LIMIT) {
            let count = self.expect(TokenKind::Number, "number")?;
            children.push(AstNode::internal("LIMIT", vec![AstNode::leaf(count.text)]));
        }

        Ok(AstNode::internal("QUERY", children))
    }

    fn parse_sort_item(&mut self) -> Result<AstNode, SyntaxError> {
        let mut children = vec![self.parse_expr()?];
        if self.eat_keyword(Keyword::ASC) {
            children.push(AstNode::leaf("ASC"));
        } else if self.eat_keyword(Keyword::DESC) {
            children.push(AstNode::leaf("DESC"));
        }
        Ok(AstNode::internal("SORT_ITEM", children))
    }

    /// Set operations, left-associative.
    fn parse_query_expr(&mut self) -> Result<AstNode, SyntaxError> {
        let mut left = self.parse_query_term()?;
        loop {
            let label = if self.eat_keyword(Keyword::UNION) {
                if self.eat_keyword(Keyword::ALL) { "UNION_ALL" } else { "UNION" }
            } else if self.eat_keyword(Keyword::INTERSECT) {
                "INTERSECT"
            } else if self.eat_keyword(Keyword::EXCEPT) {
                "EXCEPT"
            } else {
                return Ok(left);
            };
            let right = self.parse_query_term()?;
            left = AstNode::internal(label, vec![left, right]);
        }
    }

    fn parse_query_term(&mut self) -> Result<AstNode, SyntaxError> {
        if self.eat(TokenKind::LParen) {
            let query = self.parse_query()?;
            self.expect(TokenKind::RParen, "')'")?;
            return Ok(query);
        }
        self.parse_query_spec()
    }

    fn parse_query_spec(&mut self) -> Result<AstNode, SyntaxError> {
        self.expect_keyword(Keyword::SELECT, "SELECT")?;

        let mut select = Vec::new();
        if self.eat_keyword(Keyword::DISTINCT) {
            select.push(AstNode::leaf("DISTINCT"));
        } else {
            self.eat_keyword(Keyword::ALL);
        }
        select.push(self.parse_select_item()?);
        while self.eat(TokenKind::Comma) {
            select.push(self.parse_select_item()?);
        }
        let mut children = vec![AstNode::internal("SELECT", select)];

        if self.eat_keyword(Keyword::FROM) {
            let mut relations = vec![self.parse_relation()?];
            while self.eat(TokenKind::Comma) {
                relations.push(self.parse_relation()?);
            }
            children.push(AstNode::internal("FROM", relations));
        }

        if self.eat_keyword(Keyword::WHERE) {
            children.push(AstNode::internal("WHERE", vec![self.parse_expr()?]));
        }

        if self.eat_keyword(Keyword::GROUP) {
            self.expect_keyword(Keyword::BY, "BY")?;
            let mut exprs = vec![self.parse_expr()?];
            while self.eat(TokenKind::Comma) {
                exprs.push(self.parse_expr()?);
            }
            children.push(AstNode::internal("GROUP_BY", exprs));
        }

        if self.eat_keyword(Keyword::HAVING) {
            children.push(AstNode::internal("HAVING", vec![self.parse_expr()?]));
        }

        Ok(AstNode::internal("QUERY_SPEC", children))
    }

    fn parse_select_item(&mut self) -> Result<AstNode, SyntaxError> {
        if self.eat(TokenKind::Star) {
            return Ok(AstNode::leaf("ALL_COLUMNS"));
        }
        if Self::is_identifier(self.peek())
            && self.tokens.lt(2).kind == TokenKind::Period
            && self.tokens.lt(3).kind == TokenKind::Star
        {
            let table = self.identifier()?;
            self.tokens.advance();
            self.tokens.advance();
            return Ok(AstNode::internal("ALL_COLUMNS", vec![table]));
        }
        let mut children = vec![self.parse_expr()?];
        if let Some(alias) = self.parse_optional_alias()? {
            children.push(alias);
        }
        Ok(AstNode::internal("SELECT_ITEM", children))
    }

    fn parse_optional_alias(&mut self) -> Result<Option<AstNode>, SyntaxError> {
        if self.eat_keyword(Keyword::AS) {
            return self.identifier().map(Some);
        }
        if Self::is_identifier(self.peek()) {
            return self.identifier().map(Some);
        }
        Ok(None)
    }

    // =======================================================================
    // Relations
    // =======================================================================

    fn parse_relation(&mut self) -> Result<AstNode, SyntaxError> {
        self.nested(Self::parse_join_chain)
    }

    fn parse_join_chain(&mut self) -> Result<AstNode, SyntaxError> {
        let mut left = self.parse_relation_primary()?;
        loop {
            if self.eat_keyword(Keyword::CROSS) {
                self.expect_keyword(Keyword::JOIN, "JOIN")?;
                let right = self.parse_relation_primary()?;
                left = AstNode::internal("CROSS_JOIN", vec![left, right]);
                continue;
            }

            let kind = if self.eat_keyword(Keyword::JOIN) {
                "INNER"
            } else if self.eat_keyword(Keyword::INNER) {
                self.expect_keyword(Keyword::JOIN, "JOIN")?;
                "INNER"
            } else if self.peek_keyword(Keyword::LEFT)
                || self.peek_keyword(Keyword::RIGHT)
                || self.peek_keyword(Keyword::FULL)
            {
                let kind = match self.tokens.advance().keyword() {
                    Keyword::LEFT => "LEFT",
                    Keyword::RIGHT => "RIGHT",
                    _ => "FULL",
                };
                self.eat_keyword(Keyword::OUTER);
                self.expect_keyword(Keyword::JOIN, "JOIN")?;
                kind
            } else {
                return Ok(left);
            };

            let right = self.parse_relation_primary()?;
            self.expect_keyword(Keyword::ON, "ON")?;
            let on = AstNode::internal("ON", vec![self.parse_expr()?]);
            left = AstNode::internal("JOIN", vec![AstNode::leaf(kind), left, right, on]);
        }
    }

    fn parse_relation_primary(&mut self) -> Result<AstNode, SyntaxError> {
        if self.peek_is(TokenKind::LParen) {
            if self.query_follows_paren() {
                self.tokens.advance();
                let mut children = vec![self.parse_query()?];
                self.expect(TokenKind::RParen, "')'")?;
                if let Some(alias) = self.parse_optional_alias()? {
                    children.push(alias);
                }
                return Ok(AstNode::internal("SUBQUERY", children));
            }
            self.tokens.advance();
            let relation = self.parse_relation()?;
            self.expect(TokenKind::RParen, "')'")?;
            return Ok(relation);
        }

        let mut children = vec![self.parse_table_name()?];
        if let Some(alias) = self.parse_optional_alias()? {
            children.push(alias);
        }
        Ok(AstNode::internal("TABLE", children))
    }

    /// Possibly schema-qualified name, kept as one leaf in source spelling.
    fn parse_table_name(&mut self) -> Result<AstNode, SyntaxError> {
        if !Self::is_identifier(self.peek()) {
            return Err(self.mismatch("table name"));
        }
        let mut name = self.tokens.advance().text;
        while self.peek_is(TokenKind::Period) && Self::is_identifier(self.tokens.lt(2)) {
            self.tokens.advance();
            name.push('.');
            name.push_str(&self.tokens.advance().text);
        }
        Ok(AstNode::leaf(name))
    }

    // =======================================================================
    // Expressions
    // =======================================================================

    fn parse_expr(&mut self) -> Result<AstNode, SyntaxError> {
        self.nested(Self::parse_or_expr)
    }

    fn parse_or_expr(&mut self) -> Result<AstNode, SyntaxError> {
        let mut left = self.parse_and_expr()?;
        while self.eat_keyword(Keyword::OR) {
            let right = self.parse_and_expr()?;
            left = AstNode::internal("OR", vec![left, right]);
        }
        Ok(left)
    }

    fn parse_and_expr(&mut self) -> Result<AstNode, SyntaxError> {
        let mut left = self.parse_not_expr()?;
        while self.eat_keyword(Keyword::AND) {
            let right = self.parse_not_expr()?;
            left = AstNode::internal("AND", vec![left, right]);
        }
        Ok(left)
    }

    fn parse_not_expr(&mut self) -> Result<AstNode, SyntaxError> {
        if self.eat_keyword(Keyword::NOT) {
            let inner = self.nested(Self::parse_not_expr)?;
            return Ok(AstNode::internal("NOT", vec![inner]));
        }
        self.parse_predicate()
    }

    fn parse_predicate(&mut self) -> Result<AstNode, SyntaxError> {
        let left = self.parse_additive()?;

        let op = match self.peek().kind {
            TokenKind::Eq => Some("="),
            TokenKind::Neq => Some("<>"),
            TokenKind::Lt => Some("<"),
            TokenKind::LtEq => Some("<="),
            TokenKind::Gt => Some(">"),
            TokenKind::GtEq => Some(">="),
            _ => None,
        };
        if let Some(op) = op {
            self.tokens.advance();
            let right = self.parse_additive()?;
            return Ok(AstNode::internal(op, vec![left, right]));
        }

        if self.eat_keyword(Keyword::IS) {
            let label = if self.eat_keyword(Keyword::NOT) { "IS_NOT_NULL" } else { "IS_NULL" };
            self.expect_keyword(Keyword::NULL, "NULL")?;
            return Ok(AstNode::internal(label, vec![left]));
        }

        let negated = self.peek_keyword(Keyword::NOT)
            && matches!(
                self.tokens.lt(2).keyword(),
                Keyword::BETWEEN | Keyword::IN | Keyword::LIKE
            );
        if negated {
            self.tokens.advance();
        }

        if self.eat_keyword(Keyword::BETWEEN) {
            let low = self.parse_additive()?;
            self.expect_keyword(Keyword::AND, "AND")?;
            let high = self.parse_additive()?;
            let label = if negated { "NOT_BETWEEN" } else { "BETWEEN" };
            return Ok(AstNode::internal(label, vec![left, low, high]));
        }

        if self.eat_keyword(Keyword::IN) {
            self.expect(TokenKind::LParen, "'('")?;
            let set = if self.peek_keyword(Keyword::SELECT) {
                self.parse_query()?
            } else {
                let mut values = vec![self.parse_expr()?];
                while self.eat(TokenKind::Comma) {
                    values.push(self.parse_expr()?);
                }
                AstNode::internal("IN_LIST", values)
            };
            self.expect(TokenKind::RParen, "')'")?;
            let label = if negated { "NOT_IN" } else { "IN" };
            return Ok(AstNode::internal(label, vec![left, set]));
        }

        if self.eat_keyword(Keyword::LIKE) {
            let pattern = self.parse_additive()?;
            let label = if negated { "NOT_LIKE" } else { "LIKE" };
            return Ok(AstNode::internal(label, vec![left, pattern]));
        }

        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<AstNode, SyntaxError> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => "+",
                TokenKind::Minus => "-",
                TokenKind::Concat => "||",
                _ => return Ok(left),
            };
            self.tokens.advance();
            let right = self.parse_multiplicative()?;
            left = AstNode::internal(op, vec![left, right]);
        }
    }

    fn parse_multiplicative(&mut self) -> Result<AstNode, SyntaxError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Star => "*",
                TokenKind::Slash => "/",
                TokenKind::Percent => "%",
                _ => return Ok(left),
            };
            self.tokens.advance();
            let right = self.parse_unary()?;
            left = AstNode::internal(op, vec![left, right]);
        }
    }

    fn parse_unary(&mut self) -> Result<AstNode, SyntaxError> {
        if self.eat(TokenKind::Minus) {
            let inner = self.nested(Self::parse_unary)?;
            return Ok(AstNode::internal("NEGATE", vec![inner]));
        }
        if self.eat(TokenKind::Plus) {
            return self.nested(Self::parse_unary);
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<AstNode, SyntaxError> {
        let tok = self.peek().clone();
        let next = self.tokens.lt(2).kind;

        match tok.kind {
            TokenKind::Number | TokenKind::String => {
                self.tokens.advance();
                return Ok(AstNode::leaf(tok.text));
            }
            TokenKind::LParen => {
                self.tokens.advance();
                if self.peek_keyword(Keyword::SELECT) {
                    let query = self.parse_query()?;
                    self.expect(TokenKind::RParen, "')'")?;
                    return Ok(AstNode::internal("SCALAR_SUBQUERY", vec![query]));
                }
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen, "')'")?;
                return Ok(inner);
            }
            _ => {}
        }

        match tok.keyword() {
            Keyword::NULL => {
                self.tokens.advance();
                return Ok(AstNode::leaf("NULL"));
            }
            Keyword::TRUE => {
                self.tokens.advance();
                return Ok(AstNode::leaf("TRUE"));
            }
            Keyword::FALSE => {
                self.tokens.advance();
                return Ok(AstNode::leaf("FALSE"));
            }
            Keyword::EXISTS => {
                self.tokens.advance();
                self.expect(TokenKind::LParen, "'('")?;
                let query = self.parse_query()?;
                self.expect(TokenKind::RParen, "')'")?;
                return Ok(AstNode::internal("EXISTS", vec![query]));
            }
            Keyword::CASE => return self.parse_case(),
            Keyword::DATE if next == TokenKind::String => {
                self.tokens.advance();
                let value = self.tokens.advance();
                return Ok(AstNode::internal("DATE", vec![AstNode::leaf(value.text)]));
            }
            Keyword::INTERVAL if next == TokenKind::String => return self.parse_interval(),
            Keyword::EXTRACT if next == TokenKind::LParen => return self.parse_extract(),
            Keyword::SUBSTRING if next == TokenKind::LParen => return self.parse_substring(),
            _ => {}
        }

        if Self::is_identifier(&tok) {
            if next == TokenKind::LParen {
                return self.parse_function_call();
            }
            let mut expr = self.identifier()?;
            while self.peek_is(TokenKind::Period) && Self::is_identifier(self.tokens.lt(2)) {
                self.tokens.advance();
                let field = self.identifier()?;
                expr = AstNode::internal("DEREFERENCE", vec![expr, field]);
            }
            return Ok(expr);
        }

        Err(self.mismatch("expression"))
    }

    fn parse_function_call(&mut self) -> Result<AstNode, SyntaxError> {
        let mut children = vec![self.identifier()?];
        self.expect(TokenKind::LParen, "'('")?;
        if self.eat(TokenKind::Star) {
            children.push(AstNode::leaf("*"));
        } else if !self.peek_is(TokenKind::RParen) {
            if self.eat_keyword(Keyword::DISTINCT) {
                children.push(AstNode::leaf("DISTINCT"));
            }
            children.push(self.parse_expr()?);
            while self.eat(TokenKind::Comma) {
                children.push(self.parse_expr()?);
            }
        }
        self.expect(TokenKind::RParen, "')'")?;
        Ok(AstNode::internal("FUNCTION_CALL", children))
    }

    fn parse_case(&mut self) -> Result<AstNode, SyntaxError> {
        self.expect_keyword(Keyword::CASE, "CASE")?;
        let mut children = Vec::new();
        let label = if self.peek_keyword(Keyword::WHEN) {
            "SEARCHED_CASE"
        } else {
            children.push(self.parse_expr()?);
            "SIMPLE_CASE"
        };

        if !self.peek_keyword(Keyword::WHEN) {
            return Err(self.mismatch("WHEN"));
        }
        while self.eat_keyword(Keyword::WHEN) {
            let condition = self.parse_expr()?;
            self.expect_keyword(Keyword::THEN, "THEN")?;
            let result = self.parse_expr()?;
            children.push(AstNode::internal("WHEN", vec![condition, result]));
        }
        if self.eat_keyword(Keyword::ELSE) {
            children.push(AstNode::internal("ELSE", vec![self.parse_expr()?]));
        }
        self.expect_keyword(Keyword::END, "END")?;
        Ok(AstNode::internal(label, children))
    }

    /// `INTERVAL '90' DAY [(3)]`
    fn parse_interval(&mut self) -> Result<AstNode, SyntaxError> {
        self.expect_keyword(Keyword::INTERVAL, "INTERVAL")?;
        let value = self.expect(TokenKind::String, "string literal")?;
        let unit = self.parse_interval_unit()?;
        let mut children = vec![AstNode::leaf(value.text), unit];
        if self.peek_is(TokenKind::LParen) && self.tokens.lt(2).kind == TokenKind::Number {
            self.tokens.advance();
            let precision = self.tokens.advance();
            self.expect(TokenKind::RParen, "')'")?;
            children.push(AstNode::leaf(precision.text));
        }
        Ok(AstNode::internal("INTERVAL", children))
    }

    fn parse_interval_unit(&mut self) -> Result<AstNode, SyntaxError> {
        if INTERVAL_UNITS.contains(&self.peek().keyword()) {
            Ok(AstNode::leaf(self.tokens.advance().text.to_uppercase()))
        } else {
            Err(self.mismatch("YEAR, MONTH, DAY, HOUR, MINUTE or SECOND"))
        }
    }

    /// `EXTRACT(YEAR FROM expr)`
    fn parse_extract(&mut self) -> Result<AstNode, SyntaxError> {
        self.expect_keyword(Keyword::EXTRACT, "EXTRACT")?;
        self.expect(TokenKind::LParen, "'('")?;
        let field = self.parse_interval_unit()?;
        self.expect_keyword(Keyword::FROM, "FROM")?;
        let source = self.parse_expr()?;
        self.expect(TokenKind::RParen, "')'")?;
        Ok(AstNode::internal("EXTRACT", vec![field, source]))
    }

    /// `SUBSTRING(expr FROM start [FOR len])` or `SUBSTRING(expr, start [, len])`
    fn parse_substring(&mut self) -> Result<AstNode, SyntaxError> {
        self.expect_keyword(Keyword::SUBSTRING, "SUBSTRING")?;
        self.expect(TokenKind::LParen, "'('")?;
        let mut children = vec![self.parse_expr()?];
        if self.eat_keyword(Keyword::FROM) {
            children.push(self.parse_expr()?);
            if self.eat_keyword(Keyword::FOR) {
                children.push(self.parse_expr()?);
            }
        } else {
            self.expect(TokenKind::Comma, "FROM or ','")?;
            children.push(self.parse_expr()?);
            if self.eat(TokenKind::Comma) {
                children.push(self.parse_expr()?);
            }
        }
        self.expect(TokenKind::RParen, "')'")?;
        Ok(AstNode::internal("SUBSTRING", children))
    }
}
