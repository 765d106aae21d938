
extern crate ndarray as nd;
extern crate nla_factorize as nla;
extern crate util;

use nd::{Array, Ix2};

use nla::{modified_gram_schmidt, Ndarray, QR};
use nla::decompose;
use util::{format_vector, print_matrix, print_vector,
           MatrixData, MatrixKind, MatrixSetup};

const N: usize = 4;
const RNG_SEED: u64 = 1;

fn cholesky(a: &Array<f64, Ix2>) -> nla::Result<()> {
  println!("\nCholesky factorization");
  let l = decompose::cholesky(a)?;
  print_matrix("L", &l);
  Ok(())
}

fn svd(a: &Array<f64, Ix2>) -> nla::Result<()> {
  println!("\nSingular value decomposition");
  let decompose::SVD { u, singular_values, vt } = decompose::svd(a)?;
  print_vector("S", &singular_values);
  print_matrix("U", &u);
  print_matrix("V^T", &vt);
  Ok(())
}

fn qr(a: &Array<f64, Ix2>) -> nla::Result<()> {
  println!("\nQR factorization");
  let QR { q, r } = decompose::householder_qr(a)?;
  print_matrix("R", &r);
  print_matrix("Q", &q);

  println!("\nQR by modified Gram-Schmidt");
  let QR { q, r } = modified_gram_schmidt(&Ndarray, a)?;
  print_matrix("R", &r);
  print_matrix("Q", &q);
  Ok(())
}

fn eigen(a: &Array<f64, Ix2>) -> nla::Result<()> {
  println!("\nEigenvalues and eigenvectors");
  let eigen = decompose::symmetric_eigen(a)?;
  print_vector("lambda", &eigen.values);
  print_matrix("V", &eigen.vectors);

  let check = decompose::eigen_residual(a, &eigen, 0)?;
  println!("\nA*v:\n{}", format_vector("", &check.av));
  println!("lambda*v:\n{}", format_vector("", &check.lambda_v));
  println!("max |A*v - lambda*v|: {:e}", check.max_error());
  Ok(())
}

fn inverse(a: &Array<f64, Ix2>) -> nla::Result<()> {
  println!("\nMatrix inverse");
  let inv = decompose::inverse(a)?;
  print_matrix("A^-1", &inv);
  Ok(())
}

fn main() {
  let setup = MatrixSetup {
    n: N,
    kind: MatrixKind::Gram,
    rand_seed: RNG_SEED,
  };
  let data: MatrixData = setup.into();

  print_matrix("A", &data.matrix);
  print_vector("b", &data.rhs);

  let sections: [(&'static str, fn(&Array<f64, Ix2>) -> nla::Result<()>); 5] = [
    ("cholesky", cholesky),
    ("svd", svd),
    ("qr", qr),
    ("eigen", eigen),
    ("inverse", inverse),
  ];

  let mut failed = 0;
  for &(name, section) in sections.iter() {
    if let Err(e) = section(&data.matrix) {
      eprintln!("{}: {}", name, e);
      failed += 1;
    }
  }

  if failed > 0 {
    eprintln!("{} of {} sections failed", failed, sections.len());
  }
}
