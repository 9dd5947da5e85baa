//! Value expression AST types.

use serde::{Deserialize, Serialize};

use super::clause::{OrderByItem, WindowSpec};
use super::query::Query;
use crate::comments::{CommentPosition, Comments};

/// A possibly quoted name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier {
    /// The name, unescaped.
    pub name: String,
    /// Whether the source quoted it (`"x"`, `` `x` ``, `[x]`).
    pub quoted: bool,
}

impl Identifier {
    /// Creates an unquoted identifier.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quoted: false,
        }
    }

    /// Creates a quoted identifier.
    #[must_use]
    pub fn quoted(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quoted: true,
        }
    }
}

/// Classification of a literal token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiteralKind {
    /// Numeric literal, including hex/binary/octal and money.
    Number,
    /// Single-quoted string.
    String,
    /// Dollar-quoted string.
    DollarString,
    /// `true` / `false`.
    Boolean,
    /// `null`.
    Null,
    /// Other keyword literals such as `current_timestamp`.
    Keyword,
}

impl LiteralKind {
    /// Classifies the normalized text of a literal token.
    #[must_use]
    pub fn of(text: &str) -> Self {
        match text {
            "null" => Self::Null,
            "true" | "false" => Self::Boolean,
            _ if text.starts_with('\'') => Self::String,
            _ if text.starts_with('$') && !text[1..].starts_with(|c: char| c.is_ascii_digit()) => {
                Self::DollarString
            }
            _ if text
                .starts_with(|c: char| c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | '$')) =>
            {
                Self::Number
            }
            _ => Self::Keyword,
        }
    }
}

/// A literal value, kept as its normalized source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Literal {
    /// Literal classification.
    pub kind: LiteralKind,
    /// Source text (strings keep their quotes).
    pub text: String,
}

impl Literal {
    /// Creates a literal from token text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            kind: LiteralKind::of(&text),
            text,
        }
    }

    /// For a single-quoted string, the content with `''` unescaped.
    #[must_use]
    pub fn string_value(&self) -> Option<String> {
        if self.kind != LiteralKind::String {
            return None;
        }
        let inner = self.text.strip_prefix('\'')?.strip_suffix('\'')?;
        Some(inner.replace("''", "'"))
    }
}

/// A column reference such as `u.id` or `public.users.id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRef {
    /// Qualifiers, outermost first.
    pub namespaces: Vec<Identifier>,
    /// Column name.
    pub name: Identifier,
}

/// A type name as written in casts: `numeric(10, 2)`, `pg_catalog.int4`,
/// `text[]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeName {
    /// Qualifiers, outermost first.
    pub namespaces: Vec<Identifier>,
    /// Type name. Multi-word names are normalized to lower case.
    pub name: String,
    /// Type modifiers in parentheses.
    pub args: Vec<Expr>,
    /// Number of trailing `[]`.
    pub array_dimensions: usize,
    /// Comments found inside the type name; after-comments render behind
    /// the last `[]` or `)`.
    #[serde(skip_serializing_if = "Comments::is_empty", default)]
    pub comments: Comments,
}

impl TypeName {
    /// Creates an unqualified type without modifiers.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            namespaces: Vec::new(),
            name: name.into(),
            args: Vec::new(),
            array_dimensions: 0,
            comments: Comments::new(),
        }
    }
}

/// How a cast was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CastStyle {
    /// `cast(x as t)`
    Function,
    /// `x::t`
    Operator,
}

/// A function argument, optionally introduced by a keyword as in
/// `substring(x from 1 for 2)`, `extract(year from x)` or
/// `trim(both 'x' from y)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionArg {
    /// Keyword before the argument (`from`, `for`, `in`, `year from`,
    /// `both`, ...). `None` for a comma-separated argument.
    pub keyword: Option<String>,
    /// The argument value.
    pub value: Expr,
}

/// What follows `over`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Over {
    /// `over w`
    Named(Identifier),
    /// `over (partition by ...)`
    Window(WindowSpec),
}

/// A function call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Qualifiers, outermost first.
    pub namespaces: Vec<Identifier>,
    /// Function name, lower-cased.
    pub name: String,
    /// Whether `distinct` preceded the arguments.
    pub distinct: bool,
    /// Arguments.
    pub args: Vec<FunctionArg>,
    /// `order by` inside the argument list.
    pub order_by: Vec<OrderByItem>,
    /// `within group (order by ...)`.
    pub within_group: Vec<OrderByItem>,
    /// `filter (where ...)`.
    pub filter: Option<Box<Expr>>,
    /// `over ...`.
    pub over: Option<Over>,
}

impl FunctionCall {
    /// Creates a call without modifiers.
    #[must_use]
    pub fn new(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self {
            namespaces: Vec::new(),
            name: name.into(),
            distinct: false,
            args: args
                .into_iter()
                .map(|value| FunctionArg {
                    keyword: None,
                    value,
                })
                .collect(),
            order_by: Vec::new(),
            within_group: Vec::new(),
            filter: None,
            over: None,
        }
    }
}

/// `when <key> then <value>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseKeyValuePair {
    /// Condition (searched form) or compared value (simple form).
    pub key: Expr,
    /// Result.
    pub value: Expr,
    /// Comments on the `when` (before) and `then` (after) keywords.
    pub comments: Comments,
}

/// The branches of a CASE expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchCaseArgument {
    /// At least one `when ... then ...` pair.
    pub cases: Vec<CaseKeyValuePair>,
    /// `else` result.
    pub else_value: Option<Box<Expr>>,
    /// Comments on the `else` (before) and `end` (after) keywords.
    pub comments: Comments,
}

/// `case [operand] when ... then ... [else ...] end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseExpr {
    /// Discriminant of the simple form; `None` for the searched form.
    pub operand: Option<Box<Expr>>,
    /// Branches.
    pub switch: SwitchCaseArgument,
}

/// Right-hand side of `in`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InList {
    /// `in (1, 2, 3)`
    Values(Vec<Expr>),
    /// `in (select ...)`
    Query(Box<Query>),
}

/// The shape of a value expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExprKind {
    /// Column reference.
    Column(ColumnRef),
    /// `*` or `t.*`.
    Wildcard {
        /// Qualifiers before `.*`.
        namespaces: Vec<Identifier>,
    },
    /// Literal value.
    Literal(Literal),
    /// Parameter placeholder, prefix included (`$1`, `:id`, `?`).
    Parameter {
        /// Placeholder text.
        text: String,
    },
    /// Prefixed string: `e'\n'`, `x'1F'`, `u&'...'`.
    PrefixedString {
        /// Lower-case prefix.
        specifier: String,
        /// The string literal.
        literal: Literal,
    },
    /// Typed literal: `interval '1 day'`, `date '2020-01-01'`.
    TypedLiteral {
        /// Type keyword.
        type_name: String,
        /// The string literal.
        literal: Literal,
    },
    /// Prefix operator.
    Unary {
        /// Operator text.
        op: String,
        /// Operand.
        operand: Box<Expr>,
    },
    /// Binary operator.
    Binary {
        /// Left operand.
        left: Box<Expr>,
        /// Operator text, lower-cased.
        op: String,
        /// Right operand.
        right: Box<Expr>,
    },
    /// `[not] between low and high`.
    Between {
        /// Tested value.
        expr: Box<Expr>,
        /// Whether `not between` was written.
        negated: bool,
        /// Lower bound.
        low: Box<Expr>,
        /// Upper bound.
        high: Box<Expr>,
    },
    /// `[not] in (...)`.
    In {
        /// Tested value.
        expr: Box<Expr>,
        /// Whether `not in` was written.
        negated: bool,
        /// Values or subquery.
        list: InList,
    },
    /// `[not] exists (select ...)`.
    Exists {
        /// Whether `not exists` was written.
        negated: bool,
        /// The subquery.
        query: Box<Query>,
    },
    /// Function call.
    Function(FunctionCall),
    /// Cast.
    Cast {
        /// Cast operand.
        expr: Box<Expr>,
        /// Target type.
        type_name: TypeName,
        /// Written form.
        style: CastStyle,
    },
    /// CASE expression.
    Case(CaseExpr),
    /// Parenthesized expression.
    Paren(Box<Expr>),
    /// Row constructor `(a, b)`.
    Tuple(Vec<Expr>),
    /// Scalar subquery.
    Subquery(Box<Query>),
    /// `array[...]`.
    Array(Vec<Expr>),
    /// `array(select ...)`.
    ArrayQuery(Box<Query>),
    /// `value[index]`.
    Index {
        /// Subscripted value.
        expr: Box<Expr>,
        /// Index.
        index: Box<Expr>,
    },
    /// `value[lower:upper]`; either bound may be omitted.
    Slice {
        /// Subscripted value.
        expr: Box<Expr>,
        /// Lower bound.
        lower: Option<Box<Expr>>,
        /// Upper bound.
        upper: Option<Box<Expr>>,
    },
    /// `default` in `values` or `set`.
    Default,
}

/// A value expression with the comments attached to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    /// The expression.
    pub kind: ExprKind,
    /// Comments before/after the expression.
    #[serde(skip_serializing_if = "Comments::is_empty", default)]
    pub comments: Comments,
}

impl From<ExprKind> for Expr {
    fn from(kind: ExprKind) -> Self {
        Self::new(kind)
    }
}

impl Expr {
    /// Wraps a kind without comments.
    #[must_use]
    pub const fn new(kind: ExprKind) -> Self {
        Self {
            kind,
            comments: Comments::new(),
        }
    }

    /// Creates an unqualified column reference.
    #[must_use]
    pub fn column(name: impl Into<String>) -> Self {
        Self::new(ExprKind::Column(ColumnRef {
            namespaces: Vec::new(),
            name: Identifier::new(name),
        }))
    }

    /// Creates a qualified column reference.
    #[must_use]
    pub fn qualified_column(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(ExprKind::Column(ColumnRef {
            namespaces: vec![Identifier::new(table)],
            name: Identifier::new(name),
        }))
    }

    /// Creates a literal from its source text.
    #[must_use]
    pub fn literal(text: impl Into<String>) -> Self {
        Self::new(ExprKind::Literal(Literal::new(text)))
    }

    /// Creates a binary expression.
    #[must_use]
    pub fn binary(self, op: impl Into<String>, right: Self) -> Self {
        Self::new(ExprKind::Binary {
            left: Box::new(self),
            op: op.into(),
            right: Box::new(right),
        })
    }

    /// Adds comments at the given position, after existing ones.
    #[must_use]
    pub fn with_comments(mut self, position: CommentPosition, comments: Vec<String>) -> Self {
        self.comments.extend(position, comments);
        self
    }

    /// Returns the column reference, if this is one.
    #[must_use]
    pub const fn as_column(&self) -> Option<&ColumnRef> {
        match &self.kind {
            ExprKind::Column(column) => Some(column),
            _ => None,
        }
    }

    /// Returns the literal, if this is one.
    #[must_use]
    pub const fn as_literal(&self) -> Option<&Literal> {
        match &self.kind {
            ExprKind::Literal(literal) => Some(literal),
            _ => None,
        }
    }

    /// Returns the function call, if this is one.
    #[must_use]
    pub const fn as_function(&self) -> Option<&FunctionCall> {
        match &self.kind {
            ExprKind::Function(call) => Some(call),
            _ => None,
        }
    }

    /// Returns the CASE expression, if this is one.
    #[must_use]
    pub const fn as_case(&self) -> Option<&CaseExpr> {
        match &self.kind {
            ExprKind::Case(case) => Some(case),
            _ => None,
        }
    }
}
