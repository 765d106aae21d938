use nd::{Array, ArrayBase, ArrayViewMut, Data, DataMut, Ix2, LinalgScalar};
use num_traits::{Float, ToPrimitive, Zero};

use error::{square, Error, Result};
use primitives::Primitives;

/// Column oriented, left looking Cholesky factorization `A = L L^T`.
///
/// Every inner product goes through `P::dot`. Work happens on a scratch
/// copy; the caller's matrix is only overwritten once all columns have
/// been eliminated.
#[derive(Clone, Copy, Debug)]
pub struct LeftLooking<P, E> {
  primitives: P,
  pivot_tolerance: E,
}

impl<P, E> LeftLooking<P, E>
  where P: Primitives<E>,
        E: LinalgScalar + Float,
{
  /// Rejects any diagonal candidate `<= 0`.
  pub fn new(primitives: P) -> LeftLooking<P, E> {
    LeftLooking {
      primitives: primitives,
      pivot_tolerance: E::zero(),
    }
  }

  /// Rejects diagonal candidates `<= tol` instead. Negative (or NaN)
  /// tolerances are treated as zero.
  pub fn with_pivot_tolerance(mut self, tol: E) -> LeftLooking<P, E> {
    self.pivot_tolerance = if tol > E::zero() { tol } else { E::zero() };
    self
  }

  pub fn pivot_tolerance(&self) -> E { self.pivot_tolerance }
  pub fn primitives(&self) -> &P { &self.primitives }

  /// Returns the lower triangular factor of `a`, leaving `a` alone.
  pub fn factor<S>(&self, a: &ArrayBase<S, Ix2>) -> Result<Array<E, Ix2>>
    where S: Data<Elem = E>,
  {
    let n = square(a.dim())?;
    let mut l = a.to_owned();
    self.eliminate(&mut l, n)?;
    Ok(l)
  }

  /// Overwrites `a` with its factor. On error `a` is unchanged.
  pub fn factor_into<S>(&self, a: &mut ArrayBase<S, Ix2>) -> Result<()>
    where S: DataMut<Elem = E>,
  {
    let l = self.factor(&*a)?;
    a.assign(&l);
    Ok(())
  }

  /// Row major `n * n` buffer entry point.
  pub fn factor_buffer(&self, n: usize, buffer: &mut [E]) -> Result<()> {
    if n == 0 {
      return Err(Error::EmptyMatrix);
    }
    let expected = n.checked_mul(n);
    if expected != Some(buffer.len()) {
      return Err(Error::BufferLength {
        expected: expected.unwrap_or(::std::usize::MAX),
        actual: buffer.len(),
      });
    }

    let mut a = ArrayViewMut::from_shape((n, n), buffer)?;
    self.factor_into(&mut a)
  }

  fn eliminate(&self, l: &mut Array<E, Ix2>, n: usize) -> Result<()> {
    for i in 0..n {
      let mut diag = l[[i, i]];
      if i > 0 {
        let row = l.row(i);
        let prefix = row.slice(s![..i as isize]);
        diag = diag - self.primitives.dot(prefix.view(), prefix);
      }

      // written so that NaN fails too
      if !(diag > self.pivot_tolerance) {
        return Err(Error::NotPositiveDefinite {
          column: i,
          pivot: diag.to_f64().unwrap_or(::std::f64::NAN),
        });
      }

      let pivot = diag.sqrt();
      l[[i, i]] = pivot;

      for j in i + 1..n {
        let mut element = l[[j, i]];
        if i > 0 {
          element = element - self.primitives.dot(l.row(j).slice(s![..i as isize]),
                                                  l.row(i).slice(s![..i as isize]));
        }
        l[[j, i]] = element / pivot;
      }
    }

    zero_upper(l);
    Ok(())
  }
}

/// Zeros everything strictly above the diagonal.
pub fn zero_upper<S>(a: &mut ArrayBase<S, Ix2>)
  where S: DataMut,
        S::Elem: Zero + Clone,
{
  let rows = a.dim().0;
  let cols = a.dim().1 as isize;
  for k in 0..rows {
    let start = k as isize + 1;
    if start >= cols { break; }

    let mut row = a.row_mut(k);
    row.slice_mut(s![start..])
      .fill(Zero::zero());
  }
}

/// Largest element wise `|a - b|`. NaN anywhere makes the result NaN.
pub fn max_abs_difference<S1, S2, E>(a: &ArrayBase<S1, Ix2>,
                                     b: &ArrayBase<S2, Ix2>) -> Result<E>
  where S1: Data<Elem = E>,
        S2: Data<Elem = E>,
        E: Float,
{
  if a.dim() != b.dim() {
    return Err(Error::DimensionMismatch {
      left: a.dim(),
      right: b.dim(),
    });
  }

  Ok(a.iter()
     .zip(b.iter())
     .map(|(&l, &r)| (l - r).abs() )
     .fold(E::zero(), |max, v| {
       if max.is_nan() || v.is_nan() {
         E::nan()
       } else if v > max {
         v
       } else {
         max
       }
     }))
}

#[derive(Clone, Debug)]
pub struct Reconstruction<E> {
  /// `|L L^T - A|`, element wise.
  pub difference: Array<E, Ix2>,
  pub max_error: E,
}
impl<E> Reconstruction<E>
  where E: Float,
{
  pub fn is_within(&self, tol: E) -> bool {
    self.max_error < tol
  }
}

/// Rebuilds `L L^T` through `P::multiply` and compares it against `original`.
pub fn verify<P, S1, S2, E>(primitives: &P,
                            l: &ArrayBase<S1, Ix2>,
                            original: &ArrayBase<S2, Ix2>)
  -> Result<Reconstruction<E>>
  where P: Primitives<E>,
        S1: Data<Elem = E>,
        S2: Data<Elem = E>,
        E: LinalgScalar + Float,
{
  let mut difference = primitives.multiply(l.view(), l.t())?;
  let max_error = max_abs_difference(&difference, original)?;

  for (d, &o) in difference.iter_mut().zip(original.iter()) {
    *d = (*d - o).abs();
  }

  Ok(Reconstruction {
    difference: difference,
    max_error: max_error,
  })
}

#[cfg(test)]
fn diagonally_dominant(n: usize) -> Array<f64, Ix2> {
  use primitives::Ndarray;

  let mut b: Array<f64, Ix2> = Array::zeros((n, n));
  for i in 0..n {
    for j in 0..n {
      b[[i, j]] = ((i * 7 + j * 3) % 5) as f64 / 5.0;
    }
  }
  let mut a = Ndarray.multiply(b.view(), b.t()).unwrap();
  for i in 0..n {
    a[[i, i]] += n as f64;
  }
  a
}

#[test]
fn cholesky_identity() {
  use nd::arr2;
  use primitives::Ndarray;

  let a = arr2(&[
    [1.0, 0.0],
    [0.0, 1.0],
  ]);
  let l = LeftLooking::new(Ndarray).factor(&a).unwrap();
  assert_eq!(l, a);
}

#[test]
fn cholesky_two_by_two() {
  use nd::arr2;
  use primitives::Ndarray;

  let a = arr2(&[
    [4.0, 2.0],
    [2.0, 3.0],
  ]);
  let l = LeftLooking::new(Ndarray).factor(&a).unwrap();
  let expected = arr2(&[
    [2.0, 0.0],
    [1.0, 2.0f64.sqrt()],
  ]);
  assert_eq!(l, expected);

  let rec = verify(&Ndarray, &l, &a).unwrap();
  assert!(rec.is_within(1e-12), "max error {}", rec.max_error);
}

#[test]
fn cholesky_llstar() {
  use nd::arr2;
  use primitives::Reference;

  let a = arr2(&[
    [4.0, 12.0, -16.0],
    [12.0, 37.0, -43.0],
    [-16.0, -43.0, 98.0],
  ]);

  let l = LeftLooking::new(Reference)
    .factor(&a)
    .expect("cholesky factorization failed");

  let expected = arr2(&[
    [2.0, 0.0, 0.0],
    [6.0, 1.0, 0.0],
    [-8.0, 5.0, 3.0],
  ]);
  assert_eq!(l, expected);
}

#[test]
fn cholesky_reconstructs_larger_inputs() {
  use primitives::{Ndarray, Reference};

  for &n in &[1usize, 3, 8, 17] {
    let a = diagonally_dominant(n);
    let l = LeftLooking::new(Ndarray).factor(&a).unwrap();

    for i in 0..n {
      for j in i + 1..n {
        assert_eq!(l[[i, j]], 0.0, "upper entry ({}, {}) not zeroed", i, j);
      }
    }

    let rec = verify(&Ndarray, &l, &a).unwrap();
    assert!(rec.is_within(1e-9), "n = {}, max error {}", n, rec.max_error);

    let reference = LeftLooking::new(Reference).factor(&a).unwrap();
    assert!(max_abs_difference(&l, &reference).unwrap() < 1e-12);
  }
}

#[test]
fn cholesky_rejects_indefinite() {
  use nd::arr2;
  use primitives::Ndarray;

  let chol = LeftLooking::new(Ndarray);

  match chol.factor(&arr2(&[[-1.0]])) {
    Err(Error::NotPositiveDefinite { column: 0, pivot }) => assert_eq!(pivot, -1.0),
    r => panic!("unexpected: {:?}", r),
  }

  let a = arr2(&[
    [1.0, 2.0],
    [2.0, 1.0],
  ]);
  match chol.factor(&a) {
    Err(Error::NotPositiveDefinite { column: 1, pivot }) => assert_eq!(pivot, -3.0),
    r => panic!("unexpected: {:?}", r),
  }

  // semidefinite: the second pivot reduces to exactly zero
  let a = arr2(&[
    [1.0, 1.0],
    [1.0, 1.0],
  ]);
  match chol.factor(&a) {
    Err(Error::NotPositiveDefinite { column: 1, pivot }) => assert_eq!(pivot, 0.0),
    r => panic!("unexpected: {:?}", r),
  }

  let a = arr2(&[[::std::f64::NAN]]);
  assert!(chol.factor(&a).is_err());
}

#[test]
fn cholesky_pivot_tolerance() {
  use nd::arr2;
  use primitives::Ndarray;

  let a = arr2(&[
    [1.0, 1.0],
    [1.0, 1.0 + 1e-12],
  ]);
  assert!(LeftLooking::new(Ndarray).factor(&a).is_ok());

  let strict = LeftLooking::new(Ndarray).with_pivot_tolerance(1e-9);
  assert_eq!(strict.pivot_tolerance(), 1e-9);
  match strict.factor(&a) {
    Err(Error::NotPositiveDefinite { column: 1, .. }) => {},
    r => panic!("unexpected: {:?}", r),
  }

  let clamped = LeftLooking::new(Ndarray).with_pivot_tolerance(-1.0);
  assert_eq!(clamped.pivot_tolerance(), 0.0);
}

#[test]
fn cholesky_buffer_entry_point() {
  use primitives::Ndarray;

  let chol = LeftLooking::new(Ndarray);

  let mut buffer = vec![4.0, 2.0, 2.0, 3.0];
  chol.factor_buffer(2, &mut buffer[..]).unwrap();
  assert_eq!(buffer, vec![2.0, 0.0, 1.0, 2.0f64.sqrt()]);

  let mut short = vec![1.0, 0.0, 0.0];
  match chol.factor_buffer(2, &mut short[..]) {
    Err(Error::BufferLength { expected: 4, actual: 3 }) => {},
    r => panic!("unexpected: {:?}", r),
  }

  let mut empty: Vec<f64> = Vec::new();
  match chol.factor_buffer(0, &mut empty[..]) {
    Err(Error::EmptyMatrix) => {},
    r => panic!("unexpected: {:?}", r),
  }
}

#[test]
fn cholesky_failure_leaves_input_untouched() {
  use nd::arr2;
  use primitives::Ndarray;

  let chol = LeftLooking::new(Ndarray);

  let original = arr2(&[
    [4.0, 2.0, 1.0],
    [2.0, 1.0, 0.0],
    [1.0, 0.0, 5.0],
  ]);
  let mut a = original.clone();
  assert!(chol.factor_into(&mut a).is_err());
  assert_eq!(a, original);

  let mut buffer = vec![1.0, 2.0, 2.0, 1.0];
  assert!(chol.factor_buffer(2, &mut buffer[..]).is_err());
  assert_eq!(buffer, vec![1.0, 2.0, 2.0, 1.0]);
}

#[test]
fn cholesky_rejects_non_square() {
  use primitives::Ndarray;

  let a: Array<f64, Ix2> = Array::zeros((2, 3));
  match LeftLooking::new(Ndarray).factor(&a) {
    Err(Error::NotSquare { rows: 2, cols: 3 }) => {},
    r => panic!("unexpected: {:?}", r),
  }
}

#[test]
fn cholesky_refactor_does_not_panic() {
  use primitives::Ndarray;

  let chol = LeftLooking::new(Ndarray);
  let l = chol.factor(&diagonally_dominant(5)).unwrap();
  let _ = chol.factor(&l);
}
