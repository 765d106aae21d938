use nd::{Array, ArrayBase, Data, Ix2, LinalgScalar};
use num_traits::{Float, NumCast};

use error::{Error, Result};
use primitives::Primitives;

#[derive(Clone, Debug)]
pub struct QR<E> {
  /// `m x n`, orthonormal columns.
  pub q: Array<E, Ix2>,
  /// `n x n`, upper triangular with a positive diagonal.
  pub r: Array<E, Ix2>,
}

/// Thin QR of an `m x n` matrix (`m >= n`) by modified Gram-Schmidt on the
/// columns. Assumes full column rank; a column that vanishes (relative to
/// its original norm) is reported as `Error::Singular`.
pub fn modified_gram_schmidt<P, S, E>(primitives: &P, a: &ArrayBase<S, Ix2>)
  -> Result<QR<E>>
  where P: Primitives<E>,
        S: Data<Elem = E>,
        E: LinalgScalar + Float,
{
  let (m, n) = a.dim();
  if m == 0 || n == 0 {
    return Err(Error::EmptyMatrix);
  }
  if m < n {
    return Err(Error::DimensionMismatch {
      left: (m, n),
      right: (n, n),
    });
  }

  let eps = E::epsilon() * <E as NumCast>::from(m).unwrap_or(E::one());
  let mut q = a.to_owned();
  let mut r = Array::zeros((n, n));

  for i in 0..n {
    let scale = primitives.dot(a.column(i), a.column(i)).sqrt();
    let norm = primitives.dot(q.column(i), q.column(i)).sqrt();
    if !(norm > scale * eps) {
      return Err(Error::Singular { column: i });
    }

    r[[i, i]] = norm;
    q.column_mut(i)
      .mapv_inplace(|v| v / norm );

    let qi = q.column(i).to_owned();
    for j in i + 1..n {
      let rij = primitives.dot(qi.view(), q.column(j));
      r[[i, j]] = rij;
      q.column_mut(j)
        .scaled_add(E::zero() - rij, &qi);
    }
  }

  Ok(QR {
    q: q,
    r: r,
  })
}

#[test]
fn modified_gram_schmidt_square() {
  use nd::arr2;
  use cholesky::max_abs_difference;
  use primitives::Ndarray;

  let a = arr2(&[
    [12.0, -51.0, 4.0,],
    [6.0, 167.0, -68.0,],
    [-4.0, 24.0, -41.0,],
  ]);

  let expected_q = arr2(&[
    [6.0/7.0, -69.0/175.0, -58.0/175.0,],
    [3.0/7.0, 158.0/175.0, 6.0/175.0,],
    [-2.0/7.0, 6.0/35.0, -33.0/35.0,],
  ]);
  let expected_r = arr2(&[
    [14.0, 21.0, -14.0,],
    [0.0, 175.0, -70.0,],
    [0.0, 0.0, 35.0,],
  ]);

  let QR { q, r } = self::modified_gram_schmidt(&Ndarray, &a).unwrap();
  assert!(max_abs_difference(&r, &expected_r).unwrap() < 1e-10);
  assert!(max_abs_difference(&q, &expected_q).unwrap() < 1e-12);

  let qr = Ndarray.multiply(q.view(), r.view()).unwrap();
  assert!(max_abs_difference(&qr, &a).unwrap() < 1e-10);
}

#[test]
fn modified_gram_schmidt_tall() {
  use nd::arr2;
  use cholesky::max_abs_difference;
  use primitives::Reference;

  let a = arr2(&[
    [1.0, 1.0],
    [1.0, 0.0],
    [0.0, 1.0],
  ]);
  let QR { q, r } = self::modified_gram_schmidt(&Reference, &a).unwrap();
  assert_eq!(q.dim(), (3, 2));
  assert_eq!(r.dim(), (2, 2));
  assert_eq!(r[[1, 0]], 0.0);

  let qtq = Reference.multiply(q.t(), q.view()).unwrap();
  assert!(max_abs_difference(&qtq, &Array::eye(2)).unwrap() < 1e-12);
}

#[test]
fn modified_gram_schmidt_rank_deficient() {
  use nd::arr2;
  use primitives::Ndarray;

  let a = arr2(&[
    [1.0, 0.0],
    [0.0, 0.0],
  ]);
  match self::modified_gram_schmidt(&Ndarray, &a) {
    Err(Error::Singular { column: 1 }) => {},
    r => panic!("unexpected: {:?}", r),
  }

  let wide: Array<f64, Ix2> = Array::zeros((2, 3));
  assert!(self::modified_gram_schmidt(&Ndarray, &wide).is_err());
}
