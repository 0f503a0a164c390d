//! Kernel throughput: arithmetic, filter, take and hashing over 1M-slot columns.

use std::hint::black_box;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use minarrow_compute::enums::operators::ArithmeticOperator;
use minarrow_compute::kernels::arithmetic::arithmetic;
use minarrow_compute::kernels::hash::{dictionary_encode, unique};
use minarrow_compute::kernels::options::{
    ArithmeticOptions, DictionaryEncodeOptions, FilterOptions, TakeOptions,
};
use minarrow_compute::kernels::selection::{filter, take};
use minarrow_compute::{Array, ArrayV, BooleanArray, IntegerArray, StringArray, Value};

const N: usize = 1_000_000;

fn int_column(n: usize) -> Array {
    let values: Vec<i64> = (0..n as i64).map(|i| i.wrapping_mul(2_654_435_761) % 10_000).collect();
    Array::from_int64(IntegerArray::from_slice(&values))
}

fn nullable_int_column(n: usize) -> Array {
    let values: Vec<Option<i64>> = (0..n as i64)
        .map(|i| if i % 7 == 0 { None } else { Some(i) })
        .collect();
    Array::from_int64(IntegerArray::from_options(&values))
}

fn bench_arithmetic(c: &mut Criterion) {
    let mut group = c.benchmark_group("arithmetic");
    group.throughput(Throughput::Elements(N as u64));
    let l = Value::from(int_column(N));
    let r = Value::from(nullable_int_column(N));
    group.bench_function("add_i64_checked", |b| {
        b.iter(|| arithmetic(black_box(&l), &r, ArithmeticOperator::Add, &ArithmeticOptions::checked()))
    });
    group.bench_function("add_i64_unchecked", |b| {
        b.iter(|| arithmetic(black_box(&l), &r, ArithmeticOperator::Add, &ArithmeticOptions::unchecked()))
    });
    group.finish();
}

fn bench_selection(c: &mut Criterion) {
    let mut group = c.benchmark_group("selection");
    group.throughput(Throughput::Elements(N as u64));
    let values = ArrayV::from(nullable_int_column(N));
    let dense: Vec<bool> = (0..N).map(|i| i % 10 != 3).collect();
    let sparse: Vec<bool> = (0..N).map(|i| i % 97 == 0).collect();
    let dense = ArrayV::from(Array::from_bool(BooleanArray::from_slice(&dense)));
    let sparse = ArrayV::from(Array::from_bool(BooleanArray::from_slice(&sparse)));
    group.bench_function("filter_dense", |b| {
        b.iter(|| filter(black_box(&values), &dense, &FilterOptions::default()))
    });
    group.bench_function("filter_sparse", |b| {
        b.iter(|| filter(black_box(&values), &sparse, &FilterOptions::default()))
    });

    let idx: Vec<u32> = (0..N as u32).map(|i| i.wrapping_mul(40_503) % N as u32).collect();
    let indices = ArrayV::from(Array::from_uint32(IntegerArray::from_slice(&idx)));
    group.bench_function("take_random_i64", |b| {
        b.iter(|| take(black_box(&values), &indices, &TakeOptions::default()))
    });
    group.finish();
}

fn bench_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("hash");
    group.throughput(Throughput::Elements(N as u64));
    let ints = ArrayV::from(int_column(N));
    group.bench_function("unique_i64", |b| b.iter(|| unique(black_box(&ints))));

    let words: Vec<String> = (0..N).map(|i| format!("key-{}", i % 5_000)).collect();
    let refs: Vec<&str> = words.iter().map(String::as_str).collect();
    let strings = ArrayV::from(Array::from_string32(StringArray::from_slice(&refs)));
    group.bench_function("dictionary_encode_str", |b| {
        b.iter(|| dictionary_encode(black_box(&strings), &DictionaryEncodeOptions::default()))
    });
    group.finish();
}

criterion_group!(benches, bench_arithmetic, bench_selection, bench_hash);
criterion_main!(benches);
