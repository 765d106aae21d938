extern crate ndarray as nd;
extern crate nla_factorize as nla;
extern crate rand;
extern crate pbr;

use nd::{ArrayBase, Data, Ix1, Ix2};

use std::fmt::Write;

pub mod data;
pub mod progress;

pub use data::{MatrixData, MatrixKind, MatrixSetup};
pub use progress::{reporting, Reporting};

/// `name:` followed by one line per row, each entry `{:10.4}`.
pub fn format_matrix<S>(name: &str, a: &ArrayBase<S, Ix2>) -> String
  where S: Data<Elem = f64>,
{
  let mut out = String::new();
  if !name.is_empty() {
    let _ = writeln!(out, "{}:", name);
  }
  for row in a.outer_iter() {
    for v in row.iter() {
      let _ = write!(out, "{:10.4} ", v);
    }
    out.push('\n');
  }
  out
}

/// `name:` followed by one entry per line, `{:10.6}`.
pub fn format_vector<S>(name: &str, v: &ArrayBase<S, Ix1>) -> String
  where S: Data<Elem = f64>,
{
  let mut out = String::new();
  if !name.is_empty() {
    let _ = writeln!(out, "{}:", name);
  }
  for x in v.iter() {
    let _ = writeln!(out, "{:10.6}", x);
  }
  out
}

pub fn print_matrix<S>(name: &str, a: &ArrayBase<S, Ix2>)
  where S: Data<Elem = f64>,
{
  println!("\n{}", format_matrix(name, a));
}

pub fn print_vector<S>(name: &str, v: &ArrayBase<S, Ix1>)
  where S: Data<Elem = f64>,
{
  println!("\n{}", format_vector(name, v));
}

#[test]
fn matrix_formatting() {
  use nd::arr2;

  let a = arr2(&[
    [1.0, -2.5],
    [0.125, 10.0],
  ]);
  let expected = "A:\n    1.0000    -2.5000 \n    0.1250    10.0000 \n";
  assert_eq!(format_matrix("A", &a), expected);
  assert_eq!(format_matrix("", &a), &expected[3..]);
}

#[test]
fn vector_formatting() {
  use nd::arr1;

  let v = arr1(&[0.5, -1.0]);
  assert_eq!(format_vector("b", &v), "b:\n  0.500000\n -1.000000\n");
}
