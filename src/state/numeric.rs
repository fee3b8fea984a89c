use crate::data::{GroundNumericEffect, Idx, Valuation};

/// Bit pattern used for hashing and equality of state values: every `NaN`
/// maps to one pattern and `-0.0` to `0.0`.
pub(crate) fn canonical_bits(value: f64) -> u64 {
    if value.is_nan() {
        f64::NAN.to_bits()
    } else if value == 0.0 {
        0.0f64.to_bits()
    } else {
        value.to_bits()
    }
}

/// Drops trailing undefined values so equal valuations have equal vectors.
pub(crate) fn normalize(values: &mut Vec<f64>) {
    while values.last().is_some_and(|value| value.is_nan()) {
        values.pop();
    }
}

/// Applies `effects` in order. Right-hand sides are read from `pre`, the
/// state the action is applied in; the affected function's current value is
/// read from `values` so repeated effects on one function accumulate.
pub(crate) fn apply_numeric_effects<'e>(
    values: &mut Vec<f64>,
    effects: impl IntoIterator<Item = &'e GroundNumericEffect>,
    pre: &Valuation<'_>,
) {
    for effect in effects {
        let rhs = effect.expression.evaluate(pre);
        let index = effect.function.index();
        if values.len() <= index {
            values.resize(index + 1, f64::NAN);
        }
        values[index] = effect.op.apply(values[index], rhs);
    }
}

#[cfg(test)]
mod tests {
    use super::{apply_numeric_effects, canonical_bits, normalize};
    use crate::data::{
        AssignOperator, Bitset, FunctionIndex, GroundFunctionExpression, GroundFunctionRef,
        GroundNumericEffect, Valuation,
    };

    #[test]
    fn canonical_bits_merge_equal_values() {
        assert_eq!(canonical_bits(-0.0), canonical_bits(0.0));
        assert_eq!(canonical_bits(f64::NAN), canonical_bits(-f64::NAN));
        assert_ne!(canonical_bits(1.0), canonical_bits(2.0));
    }

    #[test]
    fn effects_read_rhs_from_pre_state() {
        let empty = Bitset::new();
        let pre = [1.0, 10.0];
        let valuation = Valuation {
            static_atoms: &empty,
            fluent_atoms: &empty,
            derived_atoms: &empty,
            static_values: &[],
            fluent_values: &pre,
        };
        let fuel = FunctionIndex::from_raw(0);
        let other = GroundFunctionExpression::Function(GroundFunctionRef::Fluent(
            FunctionIndex::from_raw(1),
        ));
        let effects = vec![
            GroundNumericEffect {
                op: AssignOperator::Assign,
                function: FunctionIndex::from_raw(1),
                expression: GroundFunctionExpression::Number(0.0),
            },
            GroundNumericEffect {
                op: AssignOperator::Increase,
                function: fuel,
                expression: other,
            },
            GroundNumericEffect {
                op: AssignOperator::Assign,
                function: FunctionIndex::from_raw(3),
                expression: GroundFunctionExpression::Number(2.0),
            },
        ];
        let mut values = pre.to_vec();
        apply_numeric_effects(&mut values, &effects, &valuation);
        assert_eq!(values[0], 11.0);
        assert_eq!(values[1], 0.0);
        assert!(values[2].is_nan());
        assert_eq!(values[3], 2.0);

        let mut trailing = vec![1.0, f64::NAN, f64::NAN];
        normalize(&mut trailing);
        assert_eq!(trailing, vec![1.0]);
    }
}
