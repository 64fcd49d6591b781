use codspeed_criterion_compat::{criterion_group, criterion_main, BenchmarkId, Criterion};
use natded::Checker;

fn run_proof(checker: &Checker, contents: &str) {
    let outcome = checker.check_file_contents(contents).unwrap();
    // building the dot output is part of every run of the binary
    let _dot = outcome.graph.to_dot();
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let lenient = Checker::default();
    let strict = Checker::default()
        .with_strict_matching()
        .with_lexical_scopes();
    for entry in glob::glob("tests/proofs/*.nd").unwrap() {
        let path = entry.unwrap();
        let name = path.file_stem().unwrap().to_string_lossy().to_string();
        let contents = std::fs::read_to_string(&path).unwrap();
        c.bench_with_input(BenchmarkId::new("lenient", &name), &contents, |b, p| {
            b.iter(|| run_proof(&lenient, p))
        });
        c.bench_with_input(BenchmarkId::new("strict", &name), &contents, |b, p| {
            b.iter(|| run_proof(&strict, p))
        });
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
