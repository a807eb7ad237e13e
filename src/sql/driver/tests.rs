use super::*;
use std::io;

use crate::common::{QueryError, SyntaxError};
use crate::sql::pretty_print::render;

const TPCH_Q6: &str = "\
select
    sum(l_extendedprice * l_discount) as revenue
from
    lineitem
where
    l_shipdate >= date '1994-01-01'
    and l_shipdate < date '1994-01-01' + interval '1' year
    and l_discount between 0.06 - 0.01 and 0.06 + 0.01
    and l_quantity < 24;
";

fn find_leaf<'a>(node: &'a AstNode, label: &str) -> Option<&'a AstNode> {
    if node.is_leaf() && node.label() == Some(label) {
        return Some(node);
    }
    node.children().iter().find_map(|c| find_leaf(c, label))
}

#[test]
fn test_keyword_case_does_not_change_tree() {
    let lower = parse_statement("select Foo from Bar where x = 1").unwrap();
    let upper = parse_statement("SELECT Foo FROM Bar WHERE x = 1").unwrap();
    let mixed = parse_statement("SeLeCt Foo fRoM Bar wHeRe x = 1").unwrap();
    assert_eq!(lower, upper);
    assert_eq!(lower, mixed);
}

#[test]
fn test_identifier_case_is_preserved() {
    let a = parse_statement("select Foo from t").unwrap();
    let b = parse_statement("select foo from t").unwrap();
    assert_ne!(a, b);
    assert!(find_leaf(&a, "Foo").is_some());
    assert!(find_leaf(&a, "foo").is_none());
}

#[test]
fn test_mixed_case_string_literal_keeps_casing() {
    let tree = parse_statement("SeLeCt * FrOm t WhErE name = 'MiXeD CaSe'").unwrap();
    assert!(find_leaf(&tree, "'MiXeD CaSe'").is_some());
    assert!(find_leaf(&tree, "'MIXED CASE'").is_none());
}

#[test]
fn test_two_leaves_render_inline() {
    let tree = parse_statement("select a, b").unwrap();
    assert_eq!(render(&tree), "(QUERY (QUERY_SPEC (SELECT (SELECT_ITEM a) (SELECT_ITEM b))))");
}

#[test]
fn test_three_leaves_render_multiline() {
    let tree = parse_statement("select a, b, c").unwrap();
    let expected = [
        "(QUERY",
        "   (QUERY_SPEC",
        "      (SELECT",
        "         (SELECT_ITEM a)",
        "         (SELECT_ITEM b)",
        "         (SELECT_ITEM c))))",
    ]
    .join("\n");
    assert_eq!(render(&tree), expected);
}

#[test]
fn test_empty_statement_list() {
    let tree = parse_statement_list("").unwrap();
    assert!(tree.is_nil());
    assert!(tree.children().is_empty());
    assert_eq!(render(&tree), "");

    let only_separators = parse_statement_list(" ;; -- nothing here\n").unwrap();
    assert_eq!(render(&only_separators), "");
}

#[test]
fn test_two_statement_list_has_no_wrapper() {
    let tree = parse_statement_list("select a; drop view v").unwrap();
    assert!(tree.is_nil());
    assert_eq!(tree.children().len(), 2);
    let rendered = render(&tree);
    assert_eq!(rendered, "(QUERY (QUERY_SPEC (SELECT (SELECT_ITEM a)))) (DROP_VIEW v)");
    assert_eq!(
        rendered,
        format!("{} {}", render(&tree.children()[0]), render(&tree.children()[1]))
    );
}

#[test]
fn test_statement_list_keeps_source_order() {
    let tree = parse_statement_list("drop view b; drop view a;").unwrap();
    let names: Vec<&str> = tree
        .children()
        .iter()
        .filter_map(|s| s.child(0).and_then(AstNode::label))
        .collect();
    assert_eq!(names, vec!["b", "a"]);
}

#[test]
fn test_tpch_q6_render() {
    let tree = parse_statement(TPCH_Q6).unwrap();
    let expected = [
        "(QUERY",
        "   (QUERY_SPEC",
        "      (SELECT",
        "         (SELECT_ITEM",
        "            (FUNCTION_CALL",
        "               sum",
        "               (* l_extendedprice l_discount))",
        "            revenue))",
        "      (FROM (TABLE lineitem))",
        "      (WHERE",
        "         (AND",
        "            (AND",
        "               (AND",
        "                  (>= l_shipdate (DATE '1994-01-01'))",
        "                  (<",
        "                     l_shipdate",
        "                     (+",
        "                        (DATE '1994-01-01')",
        "                        (INTERVAL '1' YEAR))))",
        "               (BETWEEN",
        "                  l_discount",
        "                  (- 0.06 0.01)",
        "                  (+ 0.06 0.01)))",
        "            (< l_quantity 24)))))",
    ]
    .join("\n");
    assert_eq!(render(&tree), expected);
    assert_eq!(render(&tree), render(&tree));
}

#[test]
fn test_syntax_error_propagates() {
    let err = parse_statement("select a from").unwrap_err();
    match err {
        QueryError::Syntax(SyntaxError { line, column, message }) => {
            assert_eq!((line, column), (1, 13));
            assert_eq!(message, "mismatched input '<EOF>' expecting table name");
        }
        other => panic!("unexpected error: {:?}", other),
    }

    let err = parse_statement_list("select 'open").unwrap_err();
    assert!(matches!(err, QueryError::Syntax(_)));
    assert!(err.to_string().starts_with("Syntax Error: line 1:7"));
}

#[test]
fn test_deep_nesting_is_a_syntax_error() {
    let deep = format!("select {}1{}", "(".repeat(1000), ")".repeat(1000));
    let err = parse_statement(&deep).unwrap_err();
    assert!(matches!(err, QueryError::Syntax(_)));
    assert!(err.to_string().ends_with("maximum nesting depth exceeded"));

    let list = format!("select a; select {}1{}", "(".repeat(20_000), ")".repeat(20_000));
    assert!(matches!(parse_statement_list(&list), Err(QueryError::Syntax(_))));
}

#[test]
fn test_statement_mode_rejects_lists() {
    assert!(parse_statement("select a; select b").is_err());
    assert!(parse_statement_list("select a; select b").is_ok());
    assert!(parse_statement("select a;").is_ok());
}

#[test]
fn test_read_all_drains_source() {
    let text = "select a\nfrom t;\n".repeat(1000);
    let read = read_all(text.as_bytes()).unwrap();
    assert_eq!(read, text);
    let tree = parse_statement_list(&read).unwrap();
    assert_eq!(tree.children().len(), 1000);
}

struct FailingReader;

impl Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::other("stream truncated"))
    }
}

#[test]
fn test_read_all_propagates_io_errors() {
    let err = read_all(FailingReader).unwrap_err();
    match err {
        QueryError::Io(e) => assert_eq!(e.to_string(), "stream truncated"),
        other => panic!("unexpected error: {:?}", other),
    }

    let err = read_all(&b"s\xff\xfe"[..]).unwrap_err();
    match err {
        QueryError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::InvalidData),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_parse_batch_keeps_order() {
    let texts = ["select a", "select", "", "drop view v; drop view w"];
    let results = parse_batch(&texts);
    assert_eq!(results.len(), 4);
    assert_eq!(results[0].as_ref().unwrap().children().len(), 1);
    assert!(matches!(results[1], Err(QueryError::Syntax(_))));
    assert_eq!(render(results[2].as_ref().unwrap()), "");
    assert_eq!(results[3].as_ref().unwrap().children().len(), 2);
}

/// Engine that echoes every token's text as a leaf.
struct EchoGrammar;

impl GrammarEngine for EchoGrammar {
    fn parse_statement(&self, tokens: TokenStream) -> Result<AstNode, SyntaxError> {
        let leaves = tokens
            .tokens()
            .iter()
            .map(|t| AstNode::leaf(t.text.clone()))
            .collect();
        Ok(AstNode::internal("TOKENS", leaves))
    }

    fn parse_statement_list(&self, tokens: TokenStream) -> Result<AstNode, SyntaxError> {
        Ok(AstNode::group(vec![self.parse_statement(tokens)?]))
    }
}

#[test]
fn test_custom_engine_sees_original_text() {
    let driver = ParseDriver::with_engine(EchoGrammar);
    let tree = driver.parse_statement("SeLeCt 'AbC' x").unwrap();
    assert_eq!(render(&tree), "(TOKENS\n   SeLeCt\n   'AbC'\n   x)");
    let list = driver.parse_statement_list("a b").unwrap();
    assert_eq!(render(&list), "(TOKENS a b)");
}

#[test]
fn test_tpch_q1_shape() {
    let q1 = "
        select l_returnflag, l_linestatus, sum(l_extendedprice * (1 - l_discount)) as sum_disc_price,
               count(*) as count_order
        from lineitem
        where l_shipdate <= date '1998-12-01' - interval '90' day (3)
        group by l_returnflag, l_linestatus
        order by l_returnflag, l_linestatus;
    ";
    let tree = parse_statement(q1).unwrap();
    let labels: Vec<&str> = tree.children().iter().filter_map(AstNode::label).collect();
    assert_eq!(labels, vec!["QUERY_SPEC", "ORDER_BY"]);
    let spec: Vec<&str> = tree.children()[0].children().iter().filter_map(AstNode::label).collect();
    assert_eq!(spec, vec!["SELECT", "FROM", "WHERE", "GROUP_BY"]);
    assert!(find_leaf(&tree, "count_order").is_some());
}
