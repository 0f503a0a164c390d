//! The lane-chunked backend must agree bit for bit with the portable backend.

#![cfg(feature = "simd")]

use minarrow_compute::enums::operators::{ArithmeticOperator, LogicalOperator};
use minarrow_compute::kernels::dispatch::{ComputeBackend, accelerated, portable};
use minarrow_compute::Bitmask;

const ROUNDS: u64 = 64;

fn backends() -> (&'static dyn ComputeBackend, &'static dyn ComputeBackend) {
    let fast = accelerated().expect("simd feature registers an accelerated backend");
    (portable(), fast)
}

fn random_mask(rng: &mut fastrand::Rng, len: usize) -> Bitmask {
    let mut m = Bitmask::with_capacity(len);
    for _ in 0..len {
        m.push(rng.bool());
    }
    m
}

#[test]
fn bitmap_ops_agree() {
    let (slow, fast) = backends();
    for seed in 0..ROUNDS {
        let mut rng = fastrand::Rng::with_seed(seed);
        let len = rng.usize(0..700);
        let (l, r) = (random_mask(&mut rng, len + 9), random_mask(&mut rng, len + 9));
        // unaligned windows on both sides
        let (lo, ro) = (rng.usize(0..9), rng.usize(0..9));
        for op in [
            LogicalOperator::And,
            LogicalOperator::AndNot,
            LogicalOperator::Or,
            LogicalOperator::Xor,
        ] {
            let a = slow.bitmap_op(op, l.view(lo, len), r.view(ro, len));
            let b = fast.bitmap_op(op, l.view(lo, len), r.view(ro, len));
            assert_eq!(a, b, "seed {seed} op {op:?}");
        }
        let off = rng.usize(0..9);
        assert_eq!(
            slow.count_set_bits(&l.bits, off, len),
            fast.count_set_bits(&l.bits, off, len),
            "seed {seed}"
        );
    }
}

#[test]
fn pack_bools_agree() {
    let (slow, fast) = backends();
    for seed in 0..ROUNDS {
        let mut rng = fastrand::Rng::with_seed(seed);
        let len = rng.usize(0..300);
        let src: Vec<bool> = (0..len).map(|_| rng.bool()).collect();
        let offset = rng.usize(0..16);
        let bytes = (offset + len).div_ceil(8);
        let (mut a, mut b) = (vec![0u8; bytes], vec![0u8; bytes]);
        slow.pack_bools(&src, &mut a, offset);
        fast.pack_bools(&src, &mut b, offset);
        assert_eq!(a, b, "seed {seed}");
    }
}

const OPS: [ArithmeticOperator; 3] = [
    ArithmeticOperator::Add,
    ArithmeticOperator::Subtract,
    ArithmeticOperator::Multiply,
];

#[test]
fn integer_arithmetic_agrees() {
    let (slow, fast) = backends();
    for seed in 0..ROUNDS {
        let mut rng = fastrand::Rng::with_seed(seed);
        let len = rng.usize(0..257);
        let l32: Vec<i32> = (0..len).map(|_| rng.i32(..)).collect();
        let r32: Vec<i32> = (0..len).map(|_| rng.i32(..)).collect();
        let l64: Vec<i64> = (0..len).map(|_| rng.i64(..)).collect();
        let r64: Vec<i64> = (0..len).map(|_| rng.i64(..)).collect();
        for op in OPS {
            let (mut a, mut b) = (vec![0i32; len], vec![0i32; len]);
            assert_eq!(slow.binary_i32(op, &l32, &r32, &mut a), fast.binary_i32(op, &l32, &r32, &mut b));
            assert_eq!(a, b, "seed {seed} op {op:?}");

            let (mut a, mut b) = (vec![0i64; len], vec![0i64; len]);
            assert_eq!(slow.binary_i64(op, &l64, &r64, &mut a), fast.binary_i64(op, &l64, &r64, &mut b));
            assert_eq!(a, b, "seed {seed} op {op:?}");
        }
    }
}

#[test]
fn float_arithmetic_agrees() {
    let (slow, fast) = backends();
    let specials = [0.0, -0.0, f64::INFINITY, f64::NEG_INFINITY, f64::NAN, f64::MIN_POSITIVE];
    for seed in 0..ROUNDS {
        let mut rng = fastrand::Rng::with_seed(seed);
        let len = rng.usize(0..257);
        let sample = |rng: &mut fastrand::Rng| {
            if rng.u8(0..10) == 0 {
                specials[rng.usize(0..specials.len())]
            } else {
                (rng.f64() - 0.5) * 1e6
            }
        };
        let l: Vec<f64> = (0..len).map(|_| sample(&mut rng)).collect();
        let r: Vec<f64> = (0..len).map(|_| sample(&mut rng)).collect();
        let l32: Vec<f32> = l.iter().map(|v| *v as f32).collect();
        let r32: Vec<f32> = r.iter().map(|v| *v as f32).collect();
        for op in OPS.into_iter().chain([ArithmeticOperator::Divide]) {
            let (mut a, mut b) = (vec![0f64; len], vec![0f64; len]);
            slow.binary_f64(op, &l, &r, &mut a);
            fast.binary_f64(op, &l, &r, &mut b);
            let bits = |v: &[f64]| v.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
            assert_eq!(bits(&a), bits(&b), "seed {seed} op {op:?}");

            let (mut a, mut b) = (vec![0f32; len], vec![0f32; len]);
            slow.binary_f32(op, &l32, &r32, &mut a);
            fast.binary_f32(op, &l32, &r32, &mut b);
            let bits = |v: &[f32]| v.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
            assert_eq!(bits(&a), bits(&b), "seed {seed} op {op:?}");
        }
    }
}

#[test]
fn unsupported_operators_are_declined_by_both() {
    let (slow, fast) = backends();
    let (l, r) = ([1i32, 2], [3i32, 4]);
    let (mut a, mut b) = ([0i32; 2], [0i32; 2]);
    assert!(!slow.binary_i32(ArithmeticOperator::Power, &l, &r, &mut a));
    assert!(!fast.binary_i32(ArithmeticOperator::Power, &l, &r, &mut b));
    assert_eq!(a, [0, 0]);
    assert_eq!(b, [0, 0]);
}
