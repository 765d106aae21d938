//! The two kernels the hand written factorizations are allowed to lean on.
//! `Ndarray` forwards to ndarray's own (optionally BLAS backed) routines;
//! `Reference` is a plain triple loop, handy for cross checking.

use nd::{Array, ArrayView, Ix1, Ix2, LinalgScalar};
use nd::linalg::general_mat_mul;
use num_traits::{One, Zero};

use error::{Error, Result};

pub trait Primitives<E> {
  /// Inner product of two equal length vectors.
  fn dot(&self, x: ArrayView<E, Ix1>, y: ArrayView<E, Ix1>) -> E;
  /// Dense product `a * b`.
  fn multiply(&self, a: ArrayView<E, Ix2>, b: ArrayView<E, Ix2>)
    -> Result<Array<E, Ix2>>;
}

impl<'a, P, E> Primitives<E> for &'a P
  where P: Primitives<E>,
{
  fn dot(&self, x: ArrayView<E, Ix1>, y: ArrayView<E, Ix1>) -> E {
    (**self).dot(x, y)
  }
  fn multiply(&self, a: ArrayView<E, Ix2>, b: ArrayView<E, Ix2>)
    -> Result<Array<E, Ix2>>
  {
    (**self).multiply(a, b)
  }
}

fn check_product(left: (usize, usize), right: (usize, usize)) -> Result<()> {
  if left.1 != right.0 {
    Err(Error::DimensionMismatch {
      left: left,
      right: right,
    })
  } else {
    Ok(())
  }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Ndarray;

impl<E> Primitives<E> for Ndarray
  where E: LinalgScalar,
{
  fn dot(&self, x: ArrayView<E, Ix1>, y: ArrayView<E, Ix1>) -> E {
    assert_eq!(x.len(), y.len());
    x.dot(&y)
  }
  fn multiply(&self, a: ArrayView<E, Ix2>, b: ArrayView<E, Ix2>)
    -> Result<Array<E, Ix2>>
  {
    check_product(a.dim(), b.dim())?;

    let mut c = Array::zeros((a.dim().0, b.dim().1));
    general_mat_mul(One::one(), &a, &b, Zero::zero(), &mut c);
    Ok(c)
  }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Reference;

impl<E> Primitives<E> for Reference
  where E: LinalgScalar,
{
  fn dot(&self, x: ArrayView<E, Ix1>, y: ArrayView<E, Ix1>) -> E {
    assert_eq!(x.len(), y.len());
    x.iter()
      .zip(y.iter())
      .fold(E::zero(), |acc, (&l, &r)| acc + l * r )
  }
  fn multiply(&self, a: ArrayView<E, Ix2>, b: ArrayView<E, Ix2>)
    -> Result<Array<E, Ix2>>
  {
    check_product(a.dim(), b.dim())?;

    let (m, k) = a.dim();
    let p = b.dim().1;
    let mut c = Array::zeros((m, p));
    for i in 0..m {
      for j in 0..p {
        let mut sum = E::zero();
        for t in 0..k {
          sum = sum + a[[i, t]] * b[[t, j]];
        }
        c[[i, j]] = sum;
      }
    }

    Ok(c)
  }
}

#[test]
fn reference_matches_ndarray() {
  use nd::{arr1, arr2};

  let x = arr1(&[1.0, -2.0, 0.5]);
  let y = arr1(&[4.0, 1.0, 2.0]);
  assert_eq!(Reference.dot(x.view(), y.view()), 3.0);
  assert_eq!(Ndarray.dot(x.view(), y.view()), 3.0);

  let a = arr2(&[
    [1.0, 2.0, 3.0],
    [4.0, 5.0, 6.0],
  ]);
  let b = arr2(&[
    [7.0, 8.0],
    [9.0, 10.0],
    [11.0, 12.0],
  ]);
  let expected = arr2(&[
    [58.0, 64.0],
    [139.0, 154.0],
  ]);
  assert_eq!(Reference.multiply(a.view(), b.view()).unwrap(), expected);
  assert_eq!(Ndarray.multiply(a.view(), b.view()).unwrap(), expected);
}

#[test]
fn multiply_rejects_mismatched_operands() {
  let a: Array<f64, Ix2> = Array::zeros((2, 3));
  let b: Array<f64, Ix2> = Array::zeros((2, 3));
  match Ndarray.multiply(a.view(), b.view()) {
    Err(Error::DimensionMismatch { left: (2, 3), right: (2, 3) }) => {},
    r => panic!("unexpected: {:?}", r),
  }
  assert!(Reference.multiply(a.view(), b.view()).is_err());
}
