//! Comparison and membership semantics over runtime values

use inkgate_core::{NaryOp, Value};

/// Compare two values under a comparison or membership operator
///
/// Absent operands (`Value::Null`) make every comparison false, so rules
/// degrade to non-matching on missing context fields instead of erroring.
/// The same fail-closed result applies to value-level type mismatches,
/// with one exception: equality across distinct concrete types is a plain
/// `false`/`true` for `eq`/`ne`.
pub(crate) fn compare_values(left: &Value, op: NaryOp, right: &Value) -> bool {
    if left.is_null() || right.is_null() {
        tracing::debug!(op = op.name(), "absent operand in comparison, not a match");
        return false;
    }

    match op {
        NaryOp::Eq => left == right,
        NaryOp::Ne => left != right,
        NaryOp::Gt | NaryOp::Ge | NaryOp::Lt | NaryOp::Le => match (left, right) {
            (Value::Number(l), Value::Number(r)) => match op {
                NaryOp::Gt => l > r,
                NaryOp::Ge => l >= r,
                NaryOp::Lt => l < r,
                NaryOp::Le => l <= r,
                _ => unreachable!(),
            },
            _ => {
                tracing::debug!(
                    op = op.name(),
                    left = left.type_name(),
                    right = right.type_name(),
                    "ordering is only defined for numbers, not a match"
                );
                false
            }
        },
        NaryOp::In => match right {
            Value::Array(items) => items.iter().any(|item| item == left),
            _ => {
                tracing::debug!(
                    right = right.type_name(),
                    "'in' needs a list operand, not a match"
                );
                false
            }
        },
        // Logical connectives are handled by the evaluator, not here
        NaryOp::And | NaryOp::Or => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_ordering() {
        assert!(compare_values(&Value::Number(14.0), NaryOp::Gt, &Value::Number(10.0)));
        assert!(compare_values(&Value::Number(10.0), NaryOp::Le, &Value::Number(10.0)));
        assert!(!compare_values(&Value::Number(9.0), NaryOp::Ge, &Value::Number(10.0)));
    }

    #[test]
    fn test_equality() {
        assert!(compare_values(
            &Value::String("forearm".to_string()),
            NaryOp::Eq,
            &Value::String("forearm".to_string()),
        ));
        assert!(compare_values(&Value::Bool(true), NaryOp::Eq, &Value::Bool(true)));
        assert!(compare_values(
            &Value::Number(1.0),
            NaryOp::Ne,
            &Value::String("1".to_string()),
        ));
    }

    #[test]
    fn test_absent_operand_is_never_a_match() {
        // `> [absent, 70]` is false, not an error
        assert!(!compare_values(&Value::Null, NaryOp::Gt, &Value::Number(70.0)));
        assert!(!compare_values(&Value::Number(70.0), NaryOp::Lt, &Value::Null));
        // absent is not equal and not not-equal to anything
        assert!(!compare_values(&Value::Null, NaryOp::Eq, &Value::Null));
        assert!(!compare_values(&Value::Null, NaryOp::Ne, &Value::Bool(true)));
    }

    #[test]
    fn test_in_membership() {
        let list = Value::Array(vec![
            Value::String("neck".to_string()),
            Value::String("face".to_string()),
        ]);

        assert!(compare_values(
            &Value::String("neck".to_string()),
            NaryOp::In,
            &list
        ));
        assert!(!compare_values(
            &Value::String("forearm".to_string()),
            NaryOp::In,
            &list
        ));
        // absent left operand
        assert!(!compare_values(&Value::Null, NaryOp::In, &list));
        // non-list right operand fails closed
        assert!(!compare_values(
            &Value::String("neck".to_string()),
            NaryOp::In,
            &Value::String("neck".to_string()),
        ));
    }

    #[test]
    fn test_ordering_on_non_numbers_fails_closed() {
        assert!(!compare_values(
            &Value::String("a".to_string()),
            NaryOp::Lt,
            &Value::String("b".to_string()),
        ));
        assert!(!compare_values(&Value::Bool(false), NaryOp::Gt, &Value::Bool(true)));
    }
}
