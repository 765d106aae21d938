
extern crate ndarray as nd;
extern crate nla_factorize as nla;
extern crate rand;
extern crate util;

use nd::{Array, Ix2};
use rand::Rng;

use nla::{LeftLooking, Ndarray};
use nla::decompose;
use util::{print_matrix, MatrixData, MatrixKind, MatrixSetup};

use std::process;

const N: usize = 4;
const RNG_SEED: u64 = 1;
const TOLERANCE: f64 = 1e-10;

const SWEEP_MAX: usize = 24;
const TRIALS: usize = 10;

#[derive(Debug, Default)]
struct SweepReport {
  /// `(n, error)` of the worst reconstruction.
  worst_reconstruction: (usize, f64),
  /// `(n, error)` of the worst disagreement with LAPACK.
  worst_disagreement: (usize, f64),
  failures: Vec<(usize, nla::Error)>,
}

fn sweep<R: Rng>(chol: &LeftLooking<Ndarray, f64>, rand: &mut R) -> SweepReport {
  let cases: Vec<usize> = (1..SWEEP_MAX + 1)
    .flat_map(|n| ::std::iter::repeat(n).take(TRIALS) )
    .collect();

  let mut report = SweepReport::default();
  for n in util::reporting(cases, "sweep") {
    let a: Array<f64, Ix2> = util::data::random_spd(n, rand);

    let result = chol.factor(&a)
      .and_then(|l| {
        let rec = nla::verify(chol.primitives(), &l, &a)?;
        let lib = decompose::cholesky(&a)?;
        let disagreement = nla::max_abs_difference(&l, &lib)?;
        Ok((rec.max_error, disagreement))
      });

    match result {
      Ok((rec, disagreement)) => {
        if rec > report.worst_reconstruction.1 {
          report.worst_reconstruction = (n, rec);
        }
        if disagreement > report.worst_disagreement.1 {
          report.worst_disagreement = (n, disagreement);
        }
      },
      Err(e) => report.failures.push((n, e)),
    }
  }

  report
}

fn main() {
  let setup = MatrixSetup {
    n: N,
    kind: MatrixKind::ShiftedOuter,
    rand_seed: RNG_SEED,
  };
  let mut data: MatrixData = setup.into();

  println!("Left looking Cholesky over BLAS style primitives");
  println!("================================================");

  let chol = LeftLooking::new(Ndarray);

  print_matrix("A", &data.matrix);

  let l = match chol.factor(&data.matrix) {
    Ok(l) => l,
    Err(e) => {
      eprintln!("factorization failed: {}", e);
      process::exit(1);
    },
  };
  print_matrix("L", &l);

  let rec = match nla::verify(chol.primitives(), &l, &data.matrix) {
    Ok(rec) => rec,
    Err(e) => {
      eprintln!("verification failed: {}", e);
      process::exit(1);
    },
  };
  println!("max reconstruction error: {:e}", rec.max_error);
  if rec.is_within(TOLERANCE) {
    println!("decomposition is correct");
  } else {
    println!("warning: reconstruction error above {:e}", TOLERANCE);
  }

  let mut rand = data.rand.take()
    .expect("generated data keeps its generator");
  println!("\nStarting sweep over n = 1..{}, {} trials each", SWEEP_MAX, TRIALS);
  let report = sweep(&chol, &mut rand);
  println!("worst reconstruction error: {:e} (n = {})",
           report.worst_reconstruction.1, report.worst_reconstruction.0);
  println!("worst disagreement with LAPACK: {:e} (n = {})",
           report.worst_disagreement.1, report.worst_disagreement.0);
  for &(n, ref e) in report.failures.iter() {
    eprintln!("n = {}: {}", n, e);
  }
  if !report.failures.is_empty() {
    process::exit(1);
  }
}
