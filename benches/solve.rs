use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::str::FromStr;
use triadoku::core::Board;
use triadoku::solve::solve;

const EASY: &str =
  "53..7....6..195....98....6.8...6...34..8.3..17...2...6.6....28....419..5....8..79";
const SEVENTEEN: &str =
  "000000010400000000020000000000050407008000300001090000300400200050100000000806000";

fn criterion_benchmark(c: &mut Criterion) {
  let easy = Board::from_str(EASY).unwrap();
  let seventeen = Board::from_str(SEVENTEEN).unwrap();
  c.bench_function("solve easy", |b| b.iter(|| solve(black_box(&easy), 1)));
  c.bench_function("solve 17-given", |b| {
    b.iter(|| solve(black_box(&seventeen), 2))
  });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
