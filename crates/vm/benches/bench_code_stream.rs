//! Benchmarks for iterating a code stream and querying jump destination validity.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use evmext_common::utils::strings::decode_hex;
use evmext_vm::core::{code_stream::CodeStream, opcodes};

fn bytecode() -> Vec<u8> {
    decode_hex(include_str!("./testdata/contract.hex")).expect("invalid bytecode")
}

fn test_iterate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evmext_code_stream");
    let code = bytecode();

    group.sample_size(500);
    group.bench_function(BenchmarkId::from_parameter("iterate"), |b| {
        b.iter(|| {
            let stream = CodeStream::new(code.clone());
            let mut iter = stream.iter();
            let mut count = 0usize;
            while let Some(opcode) = iter.next() {
                if let Some(size) = opcodes::push_size(opcode) {
                    black_box(iter.stream().read(size));
                }
                count += 1;
            }
            count
        });
    });

    group.finish();
}

fn test_is_valid_opcode(c: &mut Criterion) {
    let mut group = c.benchmark_group("evmext_code_stream");
    let code = bytecode();

    group.sample_size(500);
    group.bench_function(BenchmarkId::from_parameter("is_valid_opcode_cold"), |b| {
        b.iter(|| {
            let stream = CodeStream::new(code.clone());
            (0..stream.len()).filter(|position| stream.is_valid_opcode(*position)).count()
        });
    });

    let stream = CodeStream::new(code.clone());
    group.bench_function(BenchmarkId::from_parameter("is_valid_opcode_warm"), |b| {
        b.iter(|| (0..stream.len()).filter(|position| stream.is_valid_opcode(*position)).count());
    });

    group.finish();
}

criterion_group!(benches, test_iterate, test_is_valid_opcode);
criterion_main!(benches);
