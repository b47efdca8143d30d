//! Native column type mapping.
//!
//! MySQL reports column types as opaque strings with embedded size arguments
//! and modifier keywords (`INT(11) UNSIGNED ZEROFILL`, `VARCHAR(255)`,
//! `ENUM('a','b')`). This module translates them into [`TypeExpression`]s of
//! the Sequelize `DataTypes` vocabulary.
//!
//! Mapping is an ordered list of [`TypeRule`]s evaluated top to bottom; the
//! first rule whose predicate matches produces the expression. A type that no
//! rule matches is an [`UnsupportedType`] error.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Modifier keyword carried after a symbolic type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeFlag {
    /// `UNSIGNED` numeric modifier.
    Unsigned,
    /// `ZEROFILL` numeric modifier.
    Zerofill,
    /// `BINARY` string modifier.
    Binary,
}

impl TypeFlag {
    /// Returns the keyword for this flag.
    #[must_use]
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Unsigned => "UNSIGNED",
            Self::Zerofill => "ZEROFILL",
            Self::Binary => "BINARY",
        }
    }
}

/// A column type expressed in the target vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeExpression {
    /// Named type with optional arguments, e.g. `STRING(255)` or `INTEGER`.
    Symbolic {
        /// Type name.
        name: String,
        /// Arguments as they appear in the native type (`'tiny'`, `10`).
        args: Vec<String>,
    },
    /// Named type followed by modifier flags, e.g. `INTEGER(11).UNSIGNED`.
    SymbolicWithFlags {
        /// Type name.
        name: String,
        /// Arguments as they appear in the native type.
        args: Vec<String>,
        /// Trailing modifier flags, in emission order.
        flags: Vec<TypeFlag>,
    },
    /// Raw type string with no vocabulary equivalent, emitted verbatim.
    Literal(String),
}

impl TypeExpression {
    /// Creates a symbolic type without arguments.
    #[must_use]
    pub fn symbolic(name: impl Into<String>) -> Self {
        Self::Symbolic {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Creates a symbolic type with a single argument.
    #[must_use]
    pub fn sized(name: impl Into<String>, arg: impl Into<String>) -> Self {
        Self::Symbolic {
            name: name.into(),
            args: vec![arg.into()],
        }
    }

    /// Creates an opaque literal type.
    #[must_use]
    pub fn literal(raw: impl Into<String>) -> Self {
        Self::Literal(raw.into())
    }

    /// Splits `NAME(arg, ...)` into a symbolic type.
    ///
    /// Text that does not have that shape is kept whole as the type name.
    #[must_use]
    pub fn parse_symbolic(text: &str) -> Self {
        let text = text.trim();
        match SYMBOLIC_RE.captures(text) {
            Some(caps) => Self::Symbolic {
                name: caps[1].trim().to_string(),
                args: split_args(&caps[2]),
            },
            None => Self::symbolic(text),
        }
    }

    /// Attaches modifier flags. An empty flag list leaves the type unchanged.
    #[must_use]
    pub fn with_flags(self, flags: Vec<TypeFlag>) -> Self {
        if flags.is_empty() {
            return self;
        }
        match self {
            Self::Symbolic { name, args } => Self::SymbolicWithFlags { name, args, flags },
            Self::SymbolicWithFlags {
                name,
                args,
                flags: mut existing,
            } => {
                existing.extend(flags);
                Self::SymbolicWithFlags {
                    name,
                    args,
                    flags: existing,
                }
            }
            Self::Literal(raw) => Self::Literal(raw),
        }
    }

    /// Returns the type name, or `None` for literals.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Symbolic { name, .. } | Self::SymbolicWithFlags { name, .. } => Some(name),
            Self::Literal(_) => None,
        }
    }

    /// Returns the type arguments.
    #[must_use]
    pub fn args(&self) -> &[String] {
        match self {
            Self::Symbolic { args, .. } | Self::SymbolicWithFlags { args, .. } => args,
            Self::Literal(_) => &[],
        }
    }

    /// Returns the modifier flags.
    #[must_use]
    pub fn flags(&self) -> &[TypeFlag] {
        match self {
            Self::SymbolicWithFlags { flags, .. } => flags,
            Self::Symbolic { .. } | Self::Literal(_) => &[],
        }
    }
}

/// The native type matched no mapping rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported native type '{0}'")]
pub struct UnsupportedType(pub String);

/// One entry of the ordered mapping table.
pub struct TypeRule {
    /// Short rule name, used in logs and tests.
    pub name: &'static str,
    matches: fn(&str) -> bool,
    apply: fn(&str) -> TypeExpression,
}

impl TypeRule {
    /// Returns true if this rule handles the (normalized) native type.
    #[must_use]
    pub fn matches(&self, native: &str) -> bool {
        (self.matches)(native)
    }

    /// Maps the (normalized) native type.
    #[must_use]
    pub fn apply(&self, native: &str) -> TypeExpression {
        (self.apply)(native)
    }
}

impl fmt::Debug for TypeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRule").field("name", &self.name).finish()
    }
}

static BOOLEAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^TINYINT\(1\)(\s|$)").expect("Invalid boolean regex"));
static PASSTHROUGH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^TEXT$|^TIME$|ENUM|^BLOB").expect("Invalid passthrough regex"));
static NUMERIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"INTEGER|BIGINT|FLOAT|DOUBLE|TINYINT|SMALLINT|MEDIUMINT|DECIMAL")
        .expect("Invalid numeric regex")
});
static INT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^INT\(").expect("Invalid int regex"));
static UNMODELLED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"YEAR|GEOMETRY|POINT|LINESTRING|POLYGON|^VARBINARY\(|BINARY\(|BIT\(")
        .expect("Invalid unmodelled type regex")
});
static SYMBOLIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Z][A-Z0-9_ ]*?)\s*\((.*)\)$").expect("Invalid symbolic type regex")
});

/// The mapping rules, in precedence order.
pub static RULES: &[TypeRule] = &[
    TypeRule {
        name: "boolean",
        matches: is_boolean,
        apply: to_boolean,
    },
    TypeRule {
        name: "passthrough",
        matches: is_passthrough,
        apply: TypeExpression::parse_symbolic,
    },
    TypeRule {
        name: "numeric",
        matches: is_numeric,
        apply: to_numeric,
    },
    TypeRule {
        name: "int",
        matches: is_int,
        apply: to_integer,
    },
    TypeRule {
        name: "unmodelled",
        matches: is_unmodelled,
        apply: to_literal,
    },
    TypeRule {
        name: "varchar",
        matches: is_varchar,
        apply: to_string_type,
    },
    TypeRule {
        name: "varchar_binary",
        matches: is_varchar_binary,
        apply: to_binary_string,
    },
    TypeRule {
        name: "char_binary",
        matches: is_char_binary,
        apply: to_binary_char,
    },
    TypeRule {
        name: "char",
        matches: is_char,
        apply: TypeExpression::parse_symbolic,
    },
    TypeRule {
        name: "sized_text",
        matches: is_sized_text,
        apply: to_sized_text,
    },
    TypeRule {
        name: "sized_blob",
        matches: is_sized_blob,
        apply: to_sized_blob,
    },
    TypeRule {
        name: "datetime",
        matches: is_datetime,
        apply: to_date,
    },
    TypeRule {
        name: "date",
        matches: is_date,
        apply: to_date_only,
    },
    TypeRule {
        name: "timestamp",
        matches: is_timestamp,
        apply: to_timestamp,
    },
];

/// Maps a native column type to the target vocabulary.
///
/// The input is normalized first, so `int(11) unsigned` and
/// `INT(11) UNSIGNED` map identically.
///
/// Integer rules expect a display width. MySQL 8.0.19 and later omit it
/// (`int unsigned`, `bigint`): plain `INT` matches no rule and `BIGINT`
/// maps without arguments. Servers reporting widthless integers therefore
/// fail on their first `INT` column.
pub fn map_native_type(native: &str) -> Result<TypeExpression, UnsupportedType> {
    let normalized = normalize_native_type(native);
    matching_rule(&normalized)
        .map(|rule| rule.apply(&normalized))
        .ok_or(UnsupportedType(native.to_string()))
}

/// Returns the first rule that handles a normalized native type.
#[must_use]
pub fn matching_rule(normalized: &str) -> Option<&'static TypeRule> {
    RULES.iter().find(|rule| rule.matches(normalized))
}

/// Upper-cases a native type outside of quoted values and trims it.
///
/// Enumeration values keep their case: `enum('Draft','Live')` becomes
/// `ENUM('Draft','Live')`.
#[must_use]
pub fn normalize_native_type(native: &str) -> String {
    let mut out = String::with_capacity(native.len());
    let mut quoted = false;
    for c in native.trim().chars() {
        if c == '\'' {
            quoted = !quoted;
            out.push(c);
        } else if quoted {
            out.push(c);
        } else {
            out.extend(c.to_uppercase());
        }
    }
    out
}

/// Undoes SQL string escaping inside a quoted value: doubled quotes and
/// backslash escapes.
#[must_use]
pub fn unquote_sql_string(quoted: &str) -> String {
    let mut out = String::with_capacity(quoted.len());
    let mut chars = quoted.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\'' if chars.peek() == Some(&'\'') => {
                chars.next();
                out.push('\'');
            }
            '\\' => match chars.next() {
                Some('n') => out.push('\n'),
                Some('r') => out.push('\r'),
                Some('t') => out.push('\t'),
                Some('0') => out.push('\0'),
                Some(other) => out.push(other),
                None => out.push('\\'),
            },
            _ => out.push(c),
        }
    }
    out
}

/// Removes `UNSIGNED`/`ZEROFILL` from a numeric type, returning the base
/// type text and the flags found, `UNSIGNED` first.
fn split_numeric_modifiers(native: &str) -> (String, Vec<TypeFlag>) {
    let mut flags = Vec::new();
    if native.contains("UNSIGNED") {
        flags.push(TypeFlag::Unsigned);
    }
    if native.contains("ZEROFILL") {
        flags.push(TypeFlag::Zerofill);
    }
    let base = native
        .replacen("UNSIGNED", "", 1)
        .replacen("ZEROFILL", "", 1)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    (base, flags)
}

/// Splits an argument list on commas that are not inside quotes.
fn split_args(args: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    for c in args.chars() {
        match c {
            '\'' => {
                quoted = !quoted;
                current.push(c);
            }
            ',' if !quoted => out.push(std::mem::take(&mut current).trim().to_string()),
            _ => current.push(c),
        }
    }
    if !current.trim().is_empty() || !out.is_empty() {
        out.push(current.trim().to_string());
    }
    out
}

fn is_boolean(t: &str) -> bool {
    BOOLEAN_RE.is_match(t)
}

fn to_boolean(_: &str) -> TypeExpression {
    TypeExpression::symbolic("BOOLEAN")
}

fn is_passthrough(t: &str) -> bool {
    PASSTHROUGH_RE.is_match(t)
}

fn is_numeric(t: &str) -> bool {
    NUMERIC_RE.is_match(t)
}

fn to_numeric(t: &str) -> TypeExpression {
    let (base, flags) = split_numeric_modifiers(t);
    TypeExpression::parse_symbolic(&base).with_flags(flags)
}

fn is_int(t: &str) -> bool {
    INT_RE.is_match(t)
}

fn to_integer(t: &str) -> TypeExpression {
    let (base, flags) = split_numeric_modifiers(t);
    TypeExpression::parse_symbolic(&base.replacen("INT", "INTEGER", 1)).with_flags(flags)
}

fn is_unmodelled(t: &str) -> bool {
    UNMODELLED_RE.is_match(t)
}

fn to_literal(t: &str) -> TypeExpression {
    TypeExpression::literal(t)
}

fn is_varchar(t: &str) -> bool {
    t.contains("VARCHAR(")
}

fn to_string_type(t: &str) -> TypeExpression {
    TypeExpression::parse_symbolic(&t.replacen("VARCHAR", "STRING", 1))
}

fn is_varchar_binary(t: &str) -> bool {
    t.contains("VARCHAR BINARY")
}

fn to_binary_string(_: &str) -> TypeExpression {
    TypeExpression::symbolic("STRING").with_flags(vec![TypeFlag::Binary])
}

fn is_char_binary(t: &str) -> bool {
    t.contains("CHAR") && t.contains("BINARY")
}

fn to_binary_char(t: &str) -> TypeExpression {
    TypeExpression::parse_symbolic(&t.replacen("BINARY", "", 1))
        .with_flags(vec![TypeFlag::Binary])
}

fn is_char(t: &str) -> bool {
    t.contains("CHAR(")
}

fn size_of(t: &str, family: &str) -> Option<&'static str> {
    ["TINY", "MEDIUM", "LONG"]
        .into_iter()
        .find(|prefix| t.contains(&format!("{}{}", prefix, family)))
        .map(|prefix| match prefix {
            "TINY" => "'tiny'",
            "MEDIUM" => "'medium'",
            _ => "'long'",
        })
}

fn is_sized_text(t: &str) -> bool {
    size_of(t, "TEXT").is_some()
}

fn to_sized_text(t: &str) -> TypeExpression {
    TypeExpression::sized("TEXT", size_of(t, "TEXT").unwrap_or("'long'"))
}

fn is_sized_blob(t: &str) -> bool {
    size_of(t, "BLOB").is_some()
}

fn to_sized_blob(t: &str) -> TypeExpression {
    TypeExpression::sized("BLOB", size_of(t, "BLOB").unwrap_or("'long'"))
}

fn is_datetime(t: &str) -> bool {
    t.contains("DATETIME")
}

fn to_date(t: &str) -> TypeExpression {
    TypeExpression::parse_symbolic(&t.replacen("DATETIME", "DATE", 1))
}

fn is_date(t: &str) -> bool {
    t.contains("DATE")
}

fn to_date_only(_: &str) -> TypeExpression {
    TypeExpression::symbolic("DATEONLY")
}

fn is_timestamp(t: &str) -> bool {
    t.contains("TIMESTAMP")
}

fn to_timestamp(_: &str) -> TypeExpression {
    TypeExpression::literal("TIMESTAMP")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(native: &str) -> TypeExpression {
        map_native_type(native).unwrap()
    }

    fn rule_name(native: &str) -> &'static str {
        matching_rule(&normalize_native_type(native)).unwrap().name
    }

    #[test]
    fn test_unsigned_zerofill_flags_in_order() {
        assert_eq!(
            map("INT(11) UNSIGNED ZEROFILL"),
            TypeExpression::SymbolicWithFlags {
                name: "INTEGER".to_string(),
                args: vec!["11".to_string()],
                flags: vec![TypeFlag::Unsigned, TypeFlag::Zerofill],
            }
        );
        assert_eq!(
            map("BIGINT(20) ZEROFILL UNSIGNED").flags(),
            &[TypeFlag::Unsigned, TypeFlag::Zerofill]
        );
        assert_eq!(
            map("DECIMAL(10,2) UNSIGNED"),
            TypeExpression::SymbolicWithFlags {
                name: "DECIMAL".to_string(),
                args: vec!["10".to_string(), "2".to_string()],
                flags: vec![TypeFlag::Unsigned],
            }
        );
    }

    #[test]
    fn test_numeric_without_modifiers() {
        assert_eq!(map("BIGINT(20)"), TypeExpression::sized("BIGINT", "20"));
        assert_eq!(map("FLOAT"), TypeExpression::symbolic("FLOAT"));
        assert_eq!(map("SMALLINT(6)"), TypeExpression::sized("SMALLINT", "6"));
        assert_eq!(rule_name("MEDIUMINT(9)"), "numeric");
    }

    #[test]
    fn test_tinyint_one_is_boolean() {
        assert_eq!(map("TINYINT(1)"), TypeExpression::symbolic("BOOLEAN"));
        assert_eq!(map("tinyint(1) unsigned"), TypeExpression::symbolic("BOOLEAN"));
        assert_eq!(rule_name("TINYINT(1)"), "boolean");
        assert_eq!(map("TINYINT(4)"), TypeExpression::sized("TINYINT", "4"));
        assert_eq!(map("TINYINT(10)"), TypeExpression::sized("TINYINT", "10"));
    }

    #[test]
    fn test_bare_int_renamed() {
        assert_eq!(map("INT(11)"), TypeExpression::sized("INTEGER", "11"));
        assert_eq!(rule_name("INT(11) UNSIGNED"), "int");
        assert_eq!(map("INT(10) UNSIGNED").flags(), &[TypeFlag::Unsigned]);
    }

    #[test]
    fn test_widthless_integers() {
        assert!(map_native_type("int unsigned").is_err());
        assert_eq!(
            map("bigint unsigned"),
            TypeExpression::symbolic("BIGINT").with_flags(vec![TypeFlag::Unsigned])
        );
    }

    #[test]
    fn test_passthrough_types() {
        assert_eq!(map("TEXT"), TypeExpression::symbolic("TEXT"));
        assert_eq!(map("TIME"), TypeExpression::symbolic("TIME"));
        assert_eq!(map("BLOB"), TypeExpression::symbolic("BLOB"));
        assert_eq!(
            map("enum('Draft','Live, now')"),
            TypeExpression::Symbolic {
                name: "ENUM".to_string(),
                args: vec!["'Draft'".to_string(), "'Live, now'".to_string()],
            }
        );
    }

    #[test]
    fn test_unmodelled_types_are_literals() {
        for native in [
            "YEAR(4)",
            "GEOMETRY",
            "POINT",
            "LINESTRING",
            "POLYGON",
            "VARBINARY(16)",
            "BINARY(16)",
            "BIT(1)",
        ] {
            assert_eq!(map(native), TypeExpression::literal(native), "{}", native);
        }
        assert_eq!(map("TIMESTAMP"), TypeExpression::literal("TIMESTAMP"));
        assert_eq!(map("TIMESTAMP(6)"), TypeExpression::literal("TIMESTAMP"));
    }

    #[test]
    fn test_string_types() {
        assert_eq!(map("VARCHAR(255)"), TypeExpression::sized("STRING", "255"));
        assert_eq!(
            map("VARCHAR BINARY"),
            TypeExpression::symbolic("STRING").with_flags(vec![TypeFlag::Binary])
        );
        assert_eq!(
            map("CHAR(36) BINARY"),
            TypeExpression::sized("CHAR", "36").with_flags(vec![TypeFlag::Binary])
        );
        assert_eq!(map("CHAR(2)"), TypeExpression::sized("CHAR", "2"));
        assert_eq!(rule_name("CHAR(2)"), "char");
    }

    #[test]
    fn test_sized_text_and_blob() {
        assert_eq!(map("TINYTEXT"), TypeExpression::sized("TEXT", "'tiny'"));
        assert_eq!(map("MEDIUMTEXT"), TypeExpression::sized("TEXT", "'medium'"));
        assert_eq!(map("LONGTEXT"), TypeExpression::sized("TEXT", "'long'"));
        assert_eq!(map("TINYBLOB"), TypeExpression::sized("BLOB", "'tiny'"));
        assert_eq!(map("MEDIUMBLOB"), TypeExpression::sized("BLOB", "'medium'"));
        assert_eq!(map("LONGBLOB"), TypeExpression::sized("BLOB", "'long'"));
    }

    #[test]
    fn test_date_types() {
        assert_eq!(map("DATETIME"), TypeExpression::symbolic("DATE"));
        assert_eq!(map("DATETIME(3)"), TypeExpression::sized("DATE", "3"));
        assert_eq!(map("DATE"), TypeExpression::symbolic("DATEONLY"));
    }

    #[test]
    fn test_unknown_type_fails() {
        assert_eq!(
            map_native_type("FOOBAR(5)"),
            Err(UnsupportedType("FOOBAR(5)".to_string()))
        );
        assert!(map_native_type("JSON").is_err());
        assert!(map_native_type("SET('a','b')").is_err());
    }

    #[test]
    fn test_normalize_keeps_quoted_case() {
        assert_eq!(
            normalize_native_type("  enum('Draft','live')  "),
            "ENUM('Draft','live')"
        );
        assert_eq!(normalize_native_type("int(11) unsigned"), "INT(11) UNSIGNED");
    }

    #[test]
    fn test_rules_are_exclusive_in_order() {
        // Every sample is claimed by exactly the rule listed, even where a
        // later rule would also match.
        let samples = [
            ("TINYINT(1)", "boolean"),
            ("ENUM('INT(1)')", "passthrough"),
            ("TINYINT(3) UNSIGNED", "numeric"),
            ("INT(11)", "int"),
            ("VARBINARY(255)", "unmodelled"),
            ("VARCHAR(64)", "varchar"),
            ("VARCHAR BINARY", "varchar_binary"),
            ("CHAR(10) BINARY", "char_binary"),
            ("CHAR(10)", "char"),
            ("MEDIUMTEXT", "sized_text"),
            ("LONGBLOB", "sized_blob"),
            ("DATETIME(6)", "datetime"),
            ("DATE", "date"),
            ("TIMESTAMP", "timestamp"),
        ];
        for (native, expected) in samples {
            assert_eq!(rule_name(native), expected, "{}", native);
        }
        assert_eq!(RULES.len(), samples.len());
    }

    #[test]
    fn test_unquote_sql_string() {
        assert_eq!(unquote_sql_string("plain"), "plain");
        assert_eq!(unquote_sql_string("it''s"), "it's");
        assert_eq!(unquote_sql_string(r"a\\b\nc"), "a\\b\nc");
    }
}
