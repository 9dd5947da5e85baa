//! Pratt expression parser for operator precedence.
//!
//! Operators are matched by their normalized token text. Binding powers
//! follow PostgreSQL's precedence table, loosest first.

/// Binding power of `::` and `[...]`, which bind tighter than any prefix
/// or infix operator.
pub const POSTFIX_BINDING_POWER: u8 = 27;

/// Right binding power used for the bounds of `between`.
pub const BETWEEN_BOUND_BINDING_POWER: u8 = 12;

/// Returns the prefix binding power for an operator.
///
/// Returns `None` if the operator cannot start an expression.
#[must_use]
pub fn prefix_binding_power(op: &str) -> Option<u8> {
    match op {
        "not" => Some(5),
        "-" | "+" | "~" | "!" | "!!" | "|/" | "||/" | "@" => Some(25),
        _ => None,
    }
}

/// Returns the infix binding power for an operator.
///
/// Returns `(left_bp, right_bp)` where:
/// - Higher binding power = binds tighter
/// - Left associative: `left_bp < right_bp`
///
/// Returns `None` if the operator is not infix. Unknown symbolic operators
/// (`@>`, `->>`, `&&`, ...) share one precedence level; unknown keyword
/// operators are not infix.
#[must_use]
pub fn infix_binding_power(op: &str) -> Option<(u8, u8)> {
    let power = match op {
        "or" | "xor" => (1, 2),
        "and" => (3, 4),
        "is" | "is not" | "is distinct from" | "is not distinct from" => (7, 8),
        "=" | "<>" | "!=" | "<" | ">" | "<=" | ">=" => (9, 10),
        "like" | "not like" | "ilike" | "not ilike" | "similar to" | "not similar to" | "rlike"
        | "regexp" | "between" | "not between" | "in" | "not in" | "escape" => (11, 12),
        "+" | "-" => (15, 16),
        "*" | "/" | "%" => (17, 18),
        "^" => (19, 20),
        "at time zone" => (21, 22),
        "collate" => (23, 24),
        // `:` only appears inside slices; `::` is postfix.
        ":" | "::" => return None,
        _ if op.starts_with(|c: char| c.is_ascii_alphabetic()) => return None,
        _ => (13, 14),
    };
    Some(power)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_order() {
        let or = infix_binding_power("or").unwrap();
        let and = infix_binding_power("and").unwrap();
        let eq = infix_binding_power("=").unwrap();
        let plus = infix_binding_power("+").unwrap();
        let star = infix_binding_power("*").unwrap();
        assert!(or.0 < and.0);
        assert!(and.0 < eq.0);
        assert!(eq.0 < plus.0);
        assert!(plus.0 < star.0);
    }

    #[test]
    fn test_left_associative() {
        let (left, right) = infix_binding_power("-").unwrap();
        assert!(left < right);
    }

    #[test]
    fn test_custom_symbolic_operators() {
        assert_eq!(infix_binding_power("@>"), Some((13, 14)));
        assert_eq!(infix_binding_power("->>"), Some((13, 14)));
        assert_eq!(infix_binding_power("||"), Some((13, 14)));
    }

    #[test]
    fn test_non_infix() {
        assert_eq!(infix_binding_power("not"), None);
        assert_eq!(infix_binding_power("exists"), None);
        assert_eq!(infix_binding_power("interval"), None);
        assert_eq!(infix_binding_power("::"), None);
        assert_eq!(infix_binding_power(":"), None);
    }

    #[test]
    fn test_prefix() {
        assert_eq!(prefix_binding_power("not"), Some(5));
        assert_eq!(prefix_binding_power("-"), Some(25));
        assert_eq!(prefix_binding_power("="), None);
    }
}
