use std::io::Stdout;

use pbr::ProgressBar;

/// Counts items of an exact-size iterator on a progress bar. The bar is
/// dropped, and its closing line printed, the first time `next` comes up
/// empty.
pub struct Reporting<I> {
  label: String,
  bar: Option<ProgressBar<Stdout>>,
  inner: I,
}

pub fn reporting<I>(items: I, label: &str) -> Reporting<I::IntoIter>
  where I: IntoIterator,
        I::IntoIter: ExactSizeIterator,
{
  let inner = items.into_iter();
  let mut bar = ProgressBar::new(inner.len() as u64);
  bar.show_speed = false;
  bar.show_time_left = false;
  bar.message(&format!("{}: ", label));

  Reporting {
    label: label.to_string(),
    bar: Some(bar),
    inner: inner,
  }
}

impl<I> Iterator for Reporting<I>
  where I: Iterator,
{
  type Item = I::Item;
  fn next(&mut self) -> Option<I::Item> {
    let item = self.inner.next();
    match (item.is_some(), self.bar.take()) {
      (true, Some(mut bar)) => {
        bar.inc();
        self.bar = Some(bar);
      },
      (false, Some(mut bar)) => {
        bar.finish_println(&format!("{} done!\n", self.label));
      },
      (_, None) => {},
    }
    item
  }
  fn size_hint(&self) -> (usize, Option<usize>) {
    self.inner.size_hint()
  }
}

#[test]
fn yields_everything_once() {
  let mut it = reporting(vec![3, 1, 4], "count");
  assert_eq!(it.size_hint(), (3, Some(3)));
  let items: Vec<i32> = it.by_ref().collect();
  assert_eq!(items, vec![3, 1, 4]);
  assert!(it.bar.is_none());
  assert_eq!(it.next(), None);
}
