use crate::stream::Stream;

impl<Item: Send + 'static> Stream<Item> {
  /// Maps each upstream value to an inner stream and merges all inner
  /// emissions into one downstream, with no concurrency bound.
  ///
  /// Inner streams run simultaneously, so their values interleave in
  /// delivery order; downstream completes only once upstream and every
  /// inner stream have completed, and any error anywhere fails fast.
  pub fn flat_map<Out, F>(&self, f: F) -> Stream<Out>
  where
    Out: Send + 'static,
    F: FnMut(Item) -> Stream<Out> + Clone + Send + Sync + 'static,
  {
    self.flat_map_bounded(usize::MAX, f)
  }

  /// [`flat_map`](Stream::flat_map) with at most `concurrent` inner
  /// streams subscribed at a time; further upstream values wait in
  /// arrival order for a free slot.
  pub fn flat_map_bounded<Out, F>(&self, concurrent: usize, f: F) -> Stream<Out>
  where
    Out: Send + 'static,
    F: FnMut(Item) -> Stream<Out> + Clone + Send + Sync + 'static,
  {
    self.map(f).merge_all(concurrent)
  }

  /// Strictly sequential flattening: one inner stream at a time, output
  /// in upstream value order. Equivalent to `flat_map_bounded(1, f)`.
  pub fn concat_map<Out, F>(&self, f: F) -> Stream<Out>
  where
    Out: Send + 'static,
    F: FnMut(Item) -> Stream<Out> + Clone + Send + Sync + 'static,
  {
    self.flat_map_bounded(1, f)
  }
}
