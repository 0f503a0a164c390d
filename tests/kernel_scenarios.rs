//! End-to-end kernel behaviour through the public `Array` / `ArrayV` / `Value` API.

use minarrow_compute::enums::operators::{
    ArithmeticOperator, ComparisonOperator, NullEncoding, NullSelection, RoundMode,
};
use minarrow_compute::kernels::arithmetic::arithmetic;
use minarrow_compute::kernels::comparison::compare;
use minarrow_compute::kernels::hash::{dictionary_encode, unify_chunked, unique, value_counts};
use minarrow_compute::kernels::options::{
    ArithmeticOptions, DictionaryEncodeOptions, FilterOptions, RoundOptions,
    RunEndEncodeOptions, TakeOptions,
};
use minarrow_compute::kernels::rounding::round;
use minarrow_compute::kernels::run_end::{run_end_decode, run_end_encode};
use minarrow_compute::kernels::selection::{filter, take};
use minarrow_compute::{
    Array, ArrayV, BooleanArray, DecimalArray, FloatArray, IntegerArray, KernelError,
    MaskedArray, NumericArray, Scalar, StringArray, Value, arr_bool, arr_f64, arr_i32, arr_i64,
    arr_opt, arr_str32, arr_u32,
};

fn view(a: Array) -> ArrayV {
    ArrayV::from(a)
}

#[test]
fn checked_add_overflow_and_unchecked_wrap() {
    let l = Value::from(Array::from_int8(IntegerArray::<i8>::from_slice(&[120, 1])));
    let r = Value::from(Array::from_int8(IntegerArray::<i8>::from_slice(&[10, 1])));
    let checked = arithmetic(&l, &r, ArithmeticOperator::Add, &ArithmeticOptions::checked());
    assert!(matches!(checked, Err(KernelError::Overflow { .. })));

    let wrapped =
        arithmetic(&l, &r, ArithmeticOperator::Add, &ArithmeticOptions::unchecked()).unwrap();
    assert_eq!(
        wrapped,
        Array::from_int8(IntegerArray::<i8>::from_slice(&[-126, 2]))
    );
}

#[test]
fn integer_divide_by_zero_fails_whole_batch() {
    let l = Value::from(arr_i32![1, 2, 3]);
    let r = Value::from(arr_i32![1, 0, 3]);
    for opts in [ArithmeticOptions::checked(), ArithmeticOptions::unchecked()] {
        assert_eq!(
            arithmetic(&l, &r, ArithmeticOperator::Divide, &opts),
            Err(KernelError::DivideByZero)
        );
    }
}

#[test]
fn arithmetic_nulls_and_scalars() {
    let l = Value::from(arr_opt!(i64; Some(4), None, Some(-6)));
    let r = Value::from(Scalar::Int64(Some(2)));
    let out = arithmetic(&l, &r, ArithmeticOperator::Divide, &ArithmeticOptions::default()).unwrap();
    assert_eq!(out, arr_opt!(i64; Some(2), None, Some(-3)));

    // A null scalar nulls every slot
    let null = Value::from(Scalar::Int64(None));
    let out = arithmetic(&l, &null, ArithmeticOperator::Add, &ArithmeticOptions::default()).unwrap();
    assert_eq!(out.null_count(), 3);

    let s = Value::from(Scalar::Int64(Some(1)));
    assert!(arithmetic(&s, &s, ArithmeticOperator::Add, &ArithmeticOptions::default()).is_err());
}

#[test]
fn float_round_half_to_even() {
    let input = view(arr_f64![2.5, 3.5, -2.5, 0.5, 1.25]);
    let opts = RoundOptions {
        ndigits: 0,
        mode: RoundMode::HalfToEven,
    };
    assert_eq!(round(&input, &opts).unwrap(), arr_f64![2.0, 4.0, -2.0, 0.0, 1.0]);
}

#[test]
fn decimal_round_half_up() {
    let dec = DecimalArray::<i128>::from_slice(&[12345, 12355], 10, 2).unwrap();
    let input = view(Array::from_decimal128(dec));
    let opts = RoundOptions {
        ndigits: 0,
        mode: RoundMode::HalfUp,
    };
    let expected = DecimalArray::<i128>::from_slice(&[12300, 12400], 10, 2).unwrap();
    assert_eq!(round(&input, &opts).unwrap(), Array::from_decimal128(expected));
}

#[test]
fn filter_drop_and_emit_nulls() {
    let values = view(arr_i32![10, 20, 30, 40]);
    let mask = view(arr_opt!(bool; Some(true), None, Some(false), Some(true)));

    let dropped = filter(&values, &mask, &FilterOptions::default()).unwrap();
    assert_eq!(dropped, arr_i32![10, 40]);

    let emit = FilterOptions {
        null_selection: NullSelection::EmitNulls,
    };
    let emitted = filter(&values, &mask, &emit).unwrap();
    assert_eq!(emitted, arr_opt!(i32; Some(10), None, Some(40)));
}

#[test]
fn filter_all_true_is_identity() {
    let cases = [
        arr_opt!(i32; Some(1), None, Some(3)),
        arr_opt!(str32; Some("x"), Some(""), None),
        arr_opt!(bool; None, Some(false), Some(true)),
        arr_opt!(f64; Some(0.5), None, Some(f64::INFINITY)),
    ];
    for values in cases {
        let all = Array::from_bool(BooleanArray::from_slice(&vec![true; values.len()]));
        let out = filter(&view(values.clone()), &view(all), &FilterOptions::default()).unwrap();
        assert_eq!(out, values);
    }
}

#[test]
fn take_bounds_both_configurations() {
    let values = view(arr_i32![1, 2, 3]);
    let indices = view(arr_u32![0, 3]);
    assert!(matches!(
        take(&values, &indices, &TakeOptions::default()),
        Err(KernelError::IndexOutOfBounds { .. })
    ));
    let unchecked = TakeOptions {
        bounds_check: false,
    };
    let out = take(&values, &indices, &unchecked).unwrap();
    assert_eq!(out.len(), 2);
}

#[test]
fn unique_and_dictionary_encode_first_seen() {
    let input = view(arr_str32!["a", "b", "a", "c", "b"]);
    assert_eq!(unique(&input).unwrap(), arr_str32!["a", "b", "c"]);

    let encoded = dictionary_encode(&input, &DictionaryEncodeOptions::default()).unwrap();
    match encoded {
        Array::DictionaryArray(d) => {
            assert_eq!(d.indices, arr_i32![0, 1, 0, 2, 1]);
            assert_eq!(d.dictionary, arr_str32!["a", "b", "c"]);
        }
        other => panic!("expected a dictionary array, got {other:?}"),
    }

    let counts = value_counts(&input).unwrap();
    assert_eq!(counts.counts, arr_i64![2, 2, 1]);
}

#[test]
fn dictionary_encode_null_encodings() {
    let input = view(arr_opt!(i32; Some(7), None, Some(7)));
    match dictionary_encode(&input, &DictionaryEncodeOptions::default()).unwrap() {
        Array::DictionaryArray(d) => {
            assert_eq!(d.indices, arr_opt!(i32; Some(0), None, Some(0)));
            assert_eq!(d.dictionary, arr_i32![7]);
        }
        other => panic!("unexpected {other:?}"),
    }
    let encode = DictionaryEncodeOptions {
        null_encoding: NullEncoding::Encode,
    };
    match dictionary_encode(&input, &encode).unwrap() {
        Array::DictionaryArray(d) => {
            assert_eq!(d.indices, arr_i32![0, 1, 0]);
            assert_eq!(d.dictionary.null_count(), 1);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn unify_chunked_shares_one_dictionary() {
    let chunks: Vec<Array> = [
        arr_str32!["x", "y", "x"],
        arr_str32!["z", "x"],
        arr_str32!["y"],
    ]
    .into_iter()
    .map(|c| dictionary_encode(&view(c), &DictionaryEncodeOptions::default()).unwrap())
    .collect();
    let unified = unify_chunked(&chunks).unwrap();
    let decoded: Vec<Vec<String>> = unified
        .iter()
        .map(|c| match c {
            Array::DictionaryArray(d) => {
                assert_eq!(d.dictionary, arr_str32!["x", "y", "z"]);
                let idx = take(
                    &view(d.dictionary.clone()),
                    &view(d.indices.clone()),
                    &TakeOptions::default(),
                )
                .unwrap();
                string_values(&idx)
            }
            other => panic!("unexpected {other:?}"),
        })
        .collect();
    assert_eq!(
        decoded,
        vec![vec!["x", "y", "x"], vec!["z", "x"], vec!["y"]]
    );
}

fn string_values(arr: &Array) -> Vec<String> {
    match arr {
        Array::TextArray(minarrow_compute::TextArray::String32(s)) => (0..s.len())
            .map(|i| s.get_str(i).unwrap_or_default().to_string())
            .collect(),
        other => panic!("unexpected {other:?}"),
    }
}

fn run_end_round_trip(arr: Array) {
    let encoded = run_end_encode(&view(arr.clone()), &RunEndEncodeOptions::default()).unwrap();
    let decoded = run_end_decode(&view(encoded)).unwrap();
    assert_eq!(decoded, arr);
}

#[test]
fn run_end_round_trips() {
    // single run
    run_end_round_trip(arr_i32![4, 4, 4, 4]);
    // no two adjacent equal
    run_end_round_trip(arr_i32![1, 2, 1, 2, 3]);
    // one repeated null
    run_end_round_trip(Array::from_int32(IntegerArray::<i32>::from_options(&[None, None, None])));
    run_end_round_trip(arr_opt!(f64; Some(1.0), Some(1.0), None, Some(2.0)));
    run_end_round_trip(arr_opt!(bool; Some(true), Some(true), None, Some(false)));
    run_end_round_trip(arr_opt!(str32; Some("aa"), Some("aa"), None, Some("b"), Some("b")));
    run_end_round_trip(arr_i32![]);
}

#[test]
fn run_end_window_decodes_mid_run() {
    let encoded =
        run_end_encode(&view(arr_i32![1, 1, 1, 2, 2, 3]), &RunEndEncodeOptions::default()).unwrap();
    let window = view(encoded).slice(2, 3);
    assert_eq!(run_end_decode(&window).unwrap(), arr_i32![1, 2, 2]);
}

#[test]
fn comparison_with_nulls() {
    let l = Value::from(arr_opt!(i32; Some(1), None, Some(5)));
    let r = Value::from(Scalar::Int32(Some(3)));
    let out = compare(&l, &r, ComparisonOperator::LessThan).unwrap();
    assert_eq!(out, arr_opt!(bool; Some(true), None, Some(false)));
}

#[test]
fn float_array_filter_keeps_nan() {
    let values = view(Array::from_float64(FloatArray::<f64>::from_slice(&[
        f64::NAN,
        1.0,
    ])));
    let out = filter(&values, &view(arr_bool![true, false]), &FilterOptions::default()).unwrap();
    match out {
        Array::NumericArray(NumericArray::Float64(f)) => assert!(f.data[0].is_nan()),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn strings_take_preserves_nulls() {
    let mut s = StringArray::<u32>::from_slice(&["p", "q"]);
    s.push_null();
    let values = view(Array::from_string32(s));
    let out = take(&values, &view(arr_u32![2, 1, 0]), &TakeOptions::default()).unwrap();
    assert_eq!(out, arr_opt!(str32; None, Some("q"), Some("p")));
}
