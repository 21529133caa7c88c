//! Java constant-initializer stub
//!
//! The resolution engine's Java-interop layer demands an initializer
//! evaluator even when no real Java semantic model is wired in. The null
//! evaluator satisfies that contract with fixed "unknown" answers: no field
//! has a known constant initializer and none is a compile-time constant.

/// Minimal projection of a Java field as seen by the interop layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaField {
    pub name: String,
    pub declaring_class: Option<String>,
    pub is_static: bool,
    pub is_final: bool,
}

/// A compile-time constant value of a Java field initializer
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    Boolean(bool),
    Int(i64),
    Double(f64),
    Str(String),
}

/// Answers the two constant-initializer queries the resolution engine asks
/// about Java fields
pub trait PropertyInitializerEvaluator {
    /// The field's compile-time constant initializer, if known
    fn initializer_constant(&self, field: &JavaField) -> Option<ConstantValue>;

    /// Whether the field is a non-null compile-time constant
    fn is_compile_time_constant(&self, field: &JavaField) -> bool;
}

/// Evaluator used when no Java semantic model is available
pub struct NullPropertyInitializerEvaluator;

impl PropertyInitializerEvaluator for NullPropertyInitializerEvaluator {
    fn initializer_constant(&self, _field: &JavaField) -> Option<ConstantValue> {
        None
    }

    fn is_compile_time_constant(&self, _field: &JavaField) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, is_static: bool, is_final: bool) -> JavaField {
        JavaField {
            name: name.to_string(),
            declaring_class: Some("com.example.Constants".to_string()),
            is_static,
            is_final,
        }
    }

    #[test]
    fn test_null_evaluator_never_knows_a_constant() {
        let evaluator = NullPropertyInitializerEvaluator;
        for f in [
            field("MAX_VALUE", true, true),
            field("counter", false, false),
            field("flag", true, false),
        ] {
            assert_eq!(evaluator.initializer_constant(&f), None);
            assert!(!evaluator.is_compile_time_constant(&f));
        }
    }

    #[test]
    fn test_even_static_final_fields_are_unknown() {
        // A real model would evaluate `static final` initializers; the stub
        // must not guess.
        let evaluator = NullPropertyInitializerEvaluator;
        let f = field("SERIAL_VERSION_UID", true, true);
        assert_eq!(evaluator.initializer_constant(&f), None);
        assert!(!evaluator.is_compile_time_constant(&f));
    }
}
