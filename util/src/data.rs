
use nd::{Array, Ix1, Ix2};
use rand::{Rng, SeedableRng};
use rand::isaac::Isaac64Rng;
use rand::distributions::{IndependentSample, Range};

use nla::{Ndarray, Primitives};

/// How the test matrix gets built.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MatrixKind {
  /// `B B^T + I`, `B` uniform in `[0, 1)`.
  ShiftedOuter,
  /// `B^T B`, `B` drawn from `{0.0, 0.1, .., 9.9}`.
  Gram,
}

#[derive(Copy, Clone, Debug)]
pub struct MatrixSetup {
  pub n: usize,
  pub kind: MatrixKind,
  pub rand_seed: u64,
}
impl Default for MatrixSetup {
  fn default() -> Self {
    MatrixSetup {
      n: 4,
      kind: MatrixKind::ShiftedOuter,
      rand_seed: 1,
    }
  }
}

impl Into<MatrixData> for MatrixSetup {
  fn into(self) -> MatrixData {
    let mut rand = Isaac64Rng::from_seed(&[self.rand_seed]);

    let matrix = match self.kind {
      MatrixKind::ShiftedOuter => random_spd(self.n, &mut rand),
      MatrixKind::Gram => random_gram(self.n, &mut rand),
    };
    let rhs = random_vector(self.n, &mut rand);

    MatrixData {
      rand: Some(rand),
      params: self,
      matrix: matrix,
      rhs: rhs,
    }
  }
}

#[derive(Clone)]
pub struct MatrixData {
  /// Left over generator state, for callers that want more samples.
  pub rand: Option<Isaac64Rng>,
  pub params: MatrixSetup,
  pub matrix: Array<f64, Ix2>,
  pub rhs: Array<f64, Ix1>,
}

fn fill_with<R, F>(n: usize, rand: &mut R, mut f: F) -> Array<f64, Ix2>
  where R: Rng,
        F: FnMut(&mut R) -> f64,
{
  let mut b = Array::zeros((n, n));
  for i in 0..n {
    for j in 0..n {
      b[[i, j]] = f(rand);
    }
  }
  b
}

fn tenths<R: Rng>(rand: &mut R) -> f64 {
  let digits = Range::new(0u32, 100);
  digits.ind_sample(rand) as f64 / 10.0
}

/// `B B^T + I` with `B` uniform in `[0, 1)`. Symmetric positive definite
/// with every eigenvalue at least one.
pub fn random_spd<R: Rng>(n: usize, rand: &mut R) -> Array<f64, Ix2> {
  let unit = Range::new(0.0, 1.0);
  let b = fill_with(n, rand, |r| unit.ind_sample(r) );

  let mut a = Ndarray.multiply(b.view(), b.t())
    .expect("square operands");
  for i in 0..n {
    a[[i, i]] += 1.0;
  }
  a
}

/// `B^T B` with `B` drawn from `{0.0, 0.1, .., 9.9}`. Symmetric positive
/// semidefinite; definite unless `B` happens to be singular.
pub fn random_gram<R: Rng>(n: usize, rand: &mut R) -> Array<f64, Ix2> {
  let b = fill_with(n, rand, tenths);
  Ndarray.multiply(b.t(), b.view())
    .expect("square operands")
}

pub fn random_vector<R: Rng>(n: usize, rand: &mut R) -> Array<f64, Ix1> {
  let mut v = Array::zeros(n);
  for i in 0..n {
    v[i] = tenths(rand);
  }
  v
}

#[test]
fn generated_matrices_are_symmetric() {
  let mut rand = Isaac64Rng::from_seed(&[7]);
  for &n in &[1usize, 4, 9] {
    for a in [random_spd(n, &mut rand), random_gram(n, &mut rand)].iter() {
      assert_eq!(a.dim(), (n, n));
      for i in 0..n {
        for j in 0..n {
          assert!((a[[i, j]] - a[[j, i]]).abs() < 1e-12);
        }
      }
    }
  }
}

#[test]
fn spd_factors() {
  use nla::LeftLooking;

  let mut rand = Isaac64Rng::from_seed(&[3]);
  for n in 1..12 {
    let a = random_spd(n, &mut rand);
    for i in 0..n {
      assert!(a[[i, i]] >= 1.0);
    }
    assert!(LeftLooking::new(Ndarray).factor(&a).is_ok());
  }
}

#[test]
fn tenths_stay_on_grid() {
  let mut rand = Isaac64Rng::from_seed(&[11]);
  let v = random_vector(64, &mut rand);
  for &x in v.iter() {
    assert!(x >= 0.0 && x <= 9.9);
    let scaled = x * 10.0;
    assert!((scaled - scaled.round()).abs() < 1e-9);
  }
}

#[test]
fn setup_is_reproducible() {
  let setup = MatrixSetup {
    kind: MatrixKind::Gram,
    .. Default::default()
  };
  let first: MatrixData = setup.into();
  let second: MatrixData = setup.into();
  assert_eq!(first.matrix, second.matrix);
  assert_eq!(first.rhs, second.rhs);
  assert_eq!(first.rhs.len(), 4);
}
