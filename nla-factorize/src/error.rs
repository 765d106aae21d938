
use nd::ShapeError;
use linxal;

use std::error;
use std::fmt;

pub type Result<T> = ::std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
  /// A diagonal candidate was zero, negative or NaN.
  NotPositiveDefinite {
    column: usize,
    pivot: f64,
  },
  EmptyMatrix,
  NotSquare {
    rows: usize,
    cols: usize,
  },
  BufferLength {
    expected: usize,
    actual: usize,
  },
  DimensionMismatch {
    left: (usize, usize),
    right: (usize, usize),
  },
  /// A pivot vanished while inverting or orthogonalizing.
  Singular {
    column: usize,
  },
  /// An eigenpair or column index past the end.
  OutOfRange {
    index: usize,
    len: usize,
  },
  /// The routine succeeded but handed back no vectors.
  MissingVectors {
    routine: &'static str,
  },
  Linxal(linxal::types::Error),
  Shape(ShapeError),
}

impl From<linxal::types::Error> for Error {
  fn from(v: linxal::types::Error) -> Error {
    Error::Linxal(v)
  }
}

impl From<ShapeError> for Error {
  fn from(v: ShapeError) -> Error {
    Error::Shape(v)
  }
}

impl fmt::Display for Error {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      &Error::NotPositiveDefinite { column, pivot } => {
        write!(f, "matrix is not positive definite (column {}, pivot {})",
               column, pivot)
      },
      &Error::EmptyMatrix => write!(f, "matrix has no elements"),
      &Error::NotSquare { rows, cols } => {
        write!(f, "expected a square matrix, got {}x{}", rows, cols)
      },
      &Error::BufferLength { expected, actual } => {
        write!(f, "buffer holds {} elements, expected {}", actual, expected)
      },
      &Error::DimensionMismatch { left, right } => {
        write!(f, "operand shapes {}x{} and {}x{} don't agree",
               left.0, left.1, right.0, right.1)
      },
      &Error::Singular { column } => {
        write!(f, "matrix is singular (column {})", column)
      },
      &Error::OutOfRange { index, len } => {
        write!(f, "index {} out of range for length {}", index, len)
      },
      &Error::MissingVectors { routine } => {
        write!(f, "{} returned no vectors", routine)
      },
      &Error::Linxal(ref e) => write!(f, "LAPACK failed: {:?}", e),
      &Error::Shape(ref e) => write!(f, "{}", e),
    }
  }
}

impl error::Error for Error { }

/// Lifts one of linxal's per-routine errors into ours.
pub fn lapack<E>(e: E) -> Error
  where linxal::types::Error: From<E>,
{
  Error::Linxal(From::from(e))
}

/// Checks that `dim` describes a non-empty square matrix and returns its order.
pub fn square(dim: (usize, usize)) -> Result<usize> {
  if dim.0 != dim.1 {
    return Err(Error::NotSquare { rows: dim.0, cols: dim.1, });
  }
  if dim.0 == 0 {
    return Err(Error::EmptyMatrix);
  }

  Ok(dim.0)
}

#[test]
fn square_preconditions() {
  match square((2, 3)) {
    Err(Error::NotSquare { rows: 2, cols: 3 }) => {},
    r => panic!("unexpected: {:?}", r),
  }
  match square((0, 0)) {
    Err(Error::EmptyMatrix) => {},
    r => panic!("unexpected: {:?}", r),
  }
  assert_eq!(square((4, 4)).unwrap(), 4);
}
