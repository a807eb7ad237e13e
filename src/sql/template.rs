/// Normalization for TPC-H `qgen` query templates.
/// Templates carry directives (`:x`, `:o`, `:n 10`) and parameter markers
/// (`:1`, `:2`, ...) that are not part of the query language. They are
/// stripped so a template can be parsed directly.

use std::sync::LazyLock;

use regex::Regex;

static DIRECTIVE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^:[xo]$").expect("valid directive regex"));
static ROW_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^:n -?[0-9]+").expect("valid row count regex"));
static PARAMETER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^']):([0-9]+)").expect("valid parameter regex"));

/// Removes `qgen` directives and replaces unquoted parameter markers with
/// their number. Markers inside quotes right after the opening quote
/// (e.g. `':1'`) are left alone.
pub fn normalize_template(text: &str) -> String {
    let text = DIRECTIVE_LINE.replace_all(text, "");
    let text = ROW_COUNT.replace_all(&text, "");
    PARAMETER.replace_all(&text, "${1}${2}").into_owned()
}
