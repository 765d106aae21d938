//! Thin wrappers over LAPACK (through linxal) for the textbook dense
//! decompositions. Inputs are only borrowed; LAPACK always works on a copy.

use nd::{Array, ArrayBase, ArrayView, Axis, Data, Ix1, Ix2};
use nd::linalg::general_mat_vec_mul;
use linxal::eigenvalues::symmetric::SymEigen;
use linxal::factorization::cholesky::Cholesky;
use linxal::factorization::qr::QR as HouseholderQR;
use linxal::solve_linear::general::SolveLinear;
use linxal::svd::general::SVD as SingularValues;
use linxal::types::Symmetric;

use cholesky::zero_upper;
use error::{lapack, square, Error, Result};
use primitives::{Ndarray, Primitives};
use qr::QR;

/// `L` with `A = L L^T`, strict upper triangle zeroed (potrf).
pub fn cholesky<S>(a: &ArrayBase<S, Ix2>) -> Result<Array<f64, Ix2>>
  where S: Data<Elem = f64>,
{
  square(a.dim())?;

  let mut l = <f64 as Cholesky>::compute(a, Symmetric::Lower)
    .map_err(lapack)?;
  zero_upper(&mut l);
  Ok(l)
}

/// Householder QR (geqrf, then orgqr for `Q`). Unlike the Gram-Schmidt
/// routine, the diagonal of `R` may carry either sign.
pub fn householder_qr<S>(a: &ArrayBase<S, Ix2>) -> Result<QR<f64>>
  where S: Data<Elem = f64>,
{
  let (m, n) = a.dim();
  if m == 0 || n == 0 {
    return Err(Error::EmptyMatrix);
  }

  let factors = <f64 as HouseholderQR>::compute(a)
    .map_err(lapack)?;
  let q = factors.qm().map_err(lapack)?;
  let r = factors.rm().map_err(lapack)?;
  Ok(QR {
    q: q,
    r: r,
  })
}

#[derive(Clone, Debug)]
pub struct SymmetricEigen {
  /// Ascending.
  pub values: Array<f64, Ix1>,
  /// Orthonormal eigenvectors, one per column, in the order of `values`.
  pub vectors: Array<f64, Ix2>,
}
impl SymmetricEigen {
  pub fn pair(&self, k: usize) -> Result<(f64, ArrayView<f64, Ix1>)> {
    let n = self.values.len();
    if k >= n {
      return Err(Error::OutOfRange { index: k, len: n, });
    }
    Ok((self.values[k], self.vectors.column(k)))
  }
}

/// Eigenvalues and eigenvectors of a symmetric matrix (syev). Only the
/// lower triangle of `a` is read.
pub fn symmetric_eigen<S>(a: &ArrayBase<S, Ix2>) -> Result<SymmetricEigen>
  where S: Data<Elem = f64>,
{
  square(a.dim())?;

  // overwritten with the eigenvectors
  let mut vectors = a.to_owned();
  let values = <f64 as SymEigen>::compute_mut(&mut vectors, Symmetric::Lower, true)
    .map_err(lapack)?;

  Ok(SymmetricEigen {
    values: values,
    vectors: vectors,
  })
}

/// `A v` next to `lambda v` for one eigenpair, for eyeballing.
#[derive(Clone, Debug)]
pub struct EigenResidual {
  pub av: Array<f64, Ix1>,
  pub lambda_v: Array<f64, Ix1>,
}
impl EigenResidual {
  pub fn max_error(&self) -> f64 {
    self.av.iter()
      .zip(self.lambda_v.iter())
      .map(|(&l, &r)| (l - r).abs() )
      .fold(0.0, f64::max)
  }
}

pub fn eigen_residual<S>(a: &ArrayBase<S, Ix2>, eigen: &SymmetricEigen, k: usize)
  -> Result<EigenResidual>
  where S: Data<Elem = f64>,
{
  let n = square(a.dim())?;
  if eigen.vectors.dim() != (n, n) {
    return Err(Error::DimensionMismatch {
      left: a.dim(),
      right: eigen.vectors.dim(),
    });
  }

  let (lambda, v) = eigen.pair(k)?;
  let mut av: Array<f64, Ix1> = Array::zeros(n);
  general_mat_vec_mul(1.0, a, &v, 0.0, &mut av);

  Ok(EigenResidual {
    av: av,
    lambda_v: v.mapv(|x| lambda * x ),
  })
}

#[derive(Clone, Debug)]
pub struct SVD {
  pub u: Array<f64, Ix2>,
  /// Non-increasing.
  pub singular_values: Array<f64, Ix1>,
  pub vt: Array<f64, Ix2>,
}
impl SVD {
  /// `U diag(s) V^T`.
  pub fn reconstruct(&self) -> Result<Array<f64, Ix2>> {
    let mut us = self.u.clone();
    for (mut column, &s) in us.axis_iter_mut(Axis(1)).zip(self.singular_values.iter()) {
      column.mapv_inplace(|v| v * s );
    }
    Ndarray.multiply(us.view(), self.vt.view())
  }
}

/// Full SVD of a square matrix (gesvd), with both `U` and `V^T` square.
pub fn svd<S>(a: &ArrayBase<S, Ix2>) -> Result<SVD>
  where S: Data<Elem = f64>,
{
  square(a.dim())?;

  let sol = <f64 as SingularValues>::compute(a, true, true)
    .map_err(lapack)?;
  match (sol.left_vectors, sol.right_vectors) {
    (Some(u), Some(vt)) => {
      Ok(SVD {
        u: u,
        singular_values: sol.values,
        vt: vt,
      })
    },
    _ => Err(Error::MissingVectors { routine: "gesvd" }),
  }
}

/// `A^-1`, by solving `A X = I` with LAPACK's LU solver (gesv).
pub fn inverse<S>(a: &ArrayBase<S, Ix2>) -> Result<Array<f64, Ix2>>
  where S: Data<Elem = f64>,
{
  let n = square(a.dim())?;

  let mut lu = a.to_owned();
  let mut x: Array<f64, Ix2> = Array::eye(n);
  <f64 as SolveLinear>::compute_multi_into(lu.view_mut(), x.view_mut())
    .map_err(lapack)?;
  Ok(x)
}

#[cfg(test)]
fn test_matrix() -> Array<f64, Ix2> {
  use nd::arr2;

  arr2(&[
    [4.0, 1.0, 0.5, 0.0],
    [1.0, 3.0, 0.25, 0.5],
    [0.5, 0.25, 2.0, 0.1],
    [0.0, 0.5, 0.1, 1.5],
  ])
}

#[test]
fn lapack_cholesky_matches_left_looking() {
  use cholesky::{max_abs_difference, LeftLooking};

  let a = test_matrix();
  let l = self::cholesky(&a).unwrap();
  let mine = LeftLooking::new(Ndarray).factor(&a).unwrap();
  assert!(max_abs_difference(&l, &mine).unwrap() < 1e-12);
  assert_eq!(l[[0, 3]], 0.0);
}

#[test]
fn lapack_cholesky_rejects_indefinite() {
  use nd::arr2;

  let a = arr2(&[
    [1.0, 2.0],
    [2.0, 1.0],
  ]);
  match self::cholesky(&a) {
    Err(Error::Linxal(_)) => {},
    r => panic!("unexpected: {:?}", r),
  }
}

#[test]
fn eigenpairs_satisfy_definition() {
  let a = test_matrix();
  let eigen = symmetric_eigen(&a).unwrap();

  for k in 1..4 {
    assert!(eigen.values[k - 1] <= eigen.values[k]);
  }
  for k in 0..4 {
    let check = eigen_residual(&a, &eigen, k).unwrap();
    assert!(check.max_error() < 1e-10, "pair {}: {:?}", k, check);
  }

  // the trace is preserved
  let trace: f64 = (0..4).map(|i| a[[i, i]] ).sum();
  let sum: f64 = eigen.values.iter().sum();
  assert!((trace - sum).abs() < 1e-10);
}

#[test]
fn svd_reconstructs() {
  use nd::arr2;
  use cholesky::max_abs_difference;

  let a = arr2(&[
    [2.0, -1.0, 0.0, 3.0],
    [1.0, 4.0, -2.0, 0.0],
    [0.0, 1.0, 5.0, 1.0],
    [-3.0, 0.0, 1.0, 2.0],
  ]);
  let svd = self::svd(&a).unwrap();
  for k in 1..4 {
    assert!(svd.singular_values[k - 1] >= svd.singular_values[k]);
  }
  let rebuilt = svd.reconstruct().unwrap();
  assert!(max_abs_difference(&rebuilt, &a).unwrap() < 1e-12);

  let utu = Ndarray.multiply(svd.u.t(), svd.u.view()).unwrap();
  assert!(max_abs_difference(&utu, &Array::eye(4)).unwrap() < 1e-12);
}

#[test]
fn svd_of_diagonal() {
  use nd::arr2;

  let a = arr2(&[
    [3.0, 0.0],
    [0.0, -2.0],
  ]);
  let svd = self::svd(&a).unwrap();
  assert!((svd.singular_values[0] - 3.0).abs() < 1e-12);
  assert!((svd.singular_values[1] - 2.0).abs() < 1e-12);
}

#[test]
fn svd_rank_deficient_completes_u() {
  use nd::arr2;
  use cholesky::max_abs_difference;

  let a = arr2(&[
    [1.0, 2.0],
    [2.0, 4.0],
  ]);
  let svd = self::svd(&a).unwrap();
  assert!(svd.singular_values[1].abs() < 1e-12);

  let utu = Ndarray.multiply(svd.u.t(), svd.u.view()).unwrap();
  assert!(max_abs_difference(&utu, &Array::eye(2)).unwrap() < 1e-12);
  let rebuilt = svd.reconstruct().unwrap();
  assert!(max_abs_difference(&rebuilt, &a).unwrap() < 1e-12);
}

#[test]
fn inverse_round_trip() {
  use cholesky::max_abs_difference;

  let a = test_matrix();
  let inv = inverse(&a).unwrap();
  let product = Ndarray.multiply(a.view(), inv.view()).unwrap();
  assert!(max_abs_difference(&product, &Array::eye(4)).unwrap() < 1e-10);
}

#[test]
fn inverse_rejects_singular() {
  use nd::arr2;

  let a = arr2(&[
    [1.0, 2.0],
    [2.0, 4.0],
  ]);
  assert!(inverse(&a).is_err());
}

#[test]
fn repeated_eigenvalues_stay_orthonormal() {
  use nd::arr2;
  use cholesky::max_abs_difference;

  let a = arr2(&[
    [2.0, 0.0, 0.0],
    [0.0, 2.0, 0.0],
    [0.0, 0.0, 5.0],
  ]);
  let eigen = symmetric_eigen(&a).unwrap();
  assert!((eigen.values[0] - 2.0).abs() < 1e-12);
  assert!((eigen.values[2] - 5.0).abs() < 1e-12);

  let vtv = Ndarray.multiply(eigen.vectors.t(), eigen.vectors.view()).unwrap();
  assert!(max_abs_difference(&vtv, &Array::eye(3)).unwrap() < 1e-12);

  let svd = self::svd(&Array::<f64, Ix2>::eye(3)).unwrap();
  for &s in svd.singular_values.iter() {
    assert!((s - 1.0).abs() < 1e-12);
  }
}

#[test]
fn svd_centering_matrix() {
  use cholesky::max_abs_difference;

  // I - 1 1^T / 5: rank 4, null vector spread over every coordinate
  let mut a: Array<f64, Ix2> = Array::eye(5);
  a.mapv_inplace(|v| v - 0.2 );
  let svd = self::svd(&a).unwrap();
  for k in 0..4 {
    assert!((svd.singular_values[k] - 1.0).abs() < 1e-12);
  }
  assert!(svd.singular_values[4].abs() < 1e-12);

  let utu = Ndarray.multiply(svd.u.t(), svd.u.view()).unwrap();
  assert!(max_abs_difference(&utu, &Array::eye(5)).unwrap() < 1e-12);
  let vvt = Ndarray.multiply(svd.vt.view(), svd.vt.t()).unwrap();
  assert!(max_abs_difference(&vvt, &Array::eye(5)).unwrap() < 1e-12);
  let rebuilt = svd.reconstruct().unwrap();
  assert!(max_abs_difference(&rebuilt, &a).unwrap() < 1e-12);
}

#[test]
fn eigen_residual_index_out_of_range() {
  let a = test_matrix();
  let eigen = symmetric_eigen(&a).unwrap();
  match eigen_residual(&a, &eigen, 4) {
    Err(Error::OutOfRange { index: 4, len: 4 }) => {},
    r => panic!("unexpected: {:?}", r),
  }
}

#[test]
fn householder_qr_agrees_with_gram_schmidt() {
  use cholesky::max_abs_difference;
  use qr::modified_gram_schmidt;

  let a = test_matrix();
  let QR { q, r } = householder_qr(&a).unwrap();
  let qr = Ndarray.multiply(q.view(), r.view()).unwrap();
  assert!(max_abs_difference(&qr, &a).unwrap() < 1e-12);
  let qtq = Ndarray.multiply(q.t(), q.view()).unwrap();
  assert!(max_abs_difference(&qtq, &Array::eye(4)).unwrap() < 1e-12);

  // the factorization is unique up to the signs of R's rows
  let mgs = modified_gram_schmidt(&Ndarray, &a).unwrap();
  assert!(max_abs_difference(&r.mapv(f64::abs), &mgs.r.mapv(f64::abs)).unwrap() < 1e-12);
}
