//! Reductions over a list of numbers

/// Arithmetic operation exposed over the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
  Sum,
  Multiply,
}

impl Operation {
  /// Reduce `values` with this operation
  pub fn apply(self, values: &[f64]) -> f64 {
    match self {
      Operation::Sum => sum(values),
      Operation::Multiply => product(values),
    }
  }

  /// Prefix used for result keys produced by this operation
  pub fn key_prefix(self) -> &'static str {
    match self {
      Operation::Sum => "sum",
      Operation::Multiply => "mul",
    }
  }
}

/// Sum of `values` in input order, 0.0 when empty
pub fn sum(values: &[f64]) -> f64 {
  values.iter().fold(0.0, |acc, v| acc + v)
}

/// Product of `values` in input order, 1.0 when empty
pub fn product(values: &[f64]) -> f64 {
  values.iter().fold(1.0, |acc, v| acc * v)
}
