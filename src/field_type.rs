/// Shape of a single cell value, used by the sniffing heuristics.
///
/// Values are never converted; the type only describes what a cell looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Type {
    /// Unsigned integer (non-negative whole number).
    Unsigned,
    /// Signed integer (negative whole number).
    Signed,
    /// Floating point number.
    Float,
    /// Boolean value (true/false, yes/no).
    Boolean,
    /// Date value (without time component).
    Date,
    /// `DateTime` value (date with time component).
    DateTime,
    /// Null/empty value.
    NULL,
    /// Text/string value (fallback type).
    #[default]
    Text,
}

impl Type {
    /// Number of variants in the Type enum.
    pub const COUNT: usize = 8;

    /// Index suitable for per-type counter arrays.
    #[inline]
    pub const fn as_index(&self) -> usize {
        match self {
            Type::NULL => 0,
            Type::Boolean => 1,
            Type::Unsigned => 2,
            Type::Signed => 3,
            Type::Float => 4,
            Type::Date => 5,
            Type::DateTime => 6,
            Type::Text => 7,
        }
    }

    /// Merge two types, returning the most general type that can represent both.
    pub fn merge(self, other: Type) -> Type {
        if self == other {
            return self;
        }
        if self == Type::NULL {
            return other;
        }
        if other == Type::NULL {
            return self;
        }

        match (self, other) {
            (Type::Unsigned, Type::Signed) | (Type::Signed, Type::Unsigned) => Type::Signed,
            (Type::Unsigned | Type::Signed, Type::Float)
            | (Type::Float, Type::Unsigned | Type::Signed) => Type::Float,
            (Type::Date, Type::DateTime) | (Type::DateTime, Type::Date) => Type::DateTime,
            _ => Type::Text,
        }
    }

    /// Returns true if a value of this type fits a column of type `column`.
    #[inline]
    pub fn fits(self, column: Type) -> bool {
        self.merge(column) == column
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_merge() {
        assert_eq!(Type::Unsigned.merge(Type::Unsigned), Type::Unsigned);
        assert_eq!(Type::Unsigned.merge(Type::Signed), Type::Signed);
        assert_eq!(Type::Signed.merge(Type::Float), Type::Float);
        assert_eq!(Type::NULL.merge(Type::Unsigned), Type::Unsigned);
        assert_eq!(Type::Date.merge(Type::DateTime), Type::DateTime);
        assert_eq!(Type::Boolean.merge(Type::Text), Type::Text);
    }

    #[test]
    fn test_fits() {
        assert!(Type::Unsigned.fits(Type::Float));
        assert!(!Type::Float.fits(Type::Unsigned));
        assert!(!Type::Text.fits(Type::Float));
        assert!(Type::NULL.fits(Type::Date));
    }
}
