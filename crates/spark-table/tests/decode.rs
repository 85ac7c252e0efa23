//! 解码流程的端到端契约：按位置写入、形状错误、类别错误、非记录目标与行来源错误透传。

mod common;

use std::io;

use common::{FlakyRows, LineRows};
use spark_table::{
    ConversionError, DecodeError, Decoder, DecoderOptions, FieldKind, FieldSlot, IterRows,
    KindError, ParseErrorPolicy, Record, RowShapeError,
};

const LINES: &str = "
1,blonde
2,on
3,blonde
";

#[derive(Debug, Default, PartialEq, Record)]
struct X {
    pub a: i32,
    pub b: String,
    c: i32,
}

#[derive(Debug, Default, PartialEq, Record)]
struct Triple {
    pub a: i32,
    pub b: String,
    pub c: i32,
}

#[derive(Debug, Default, PartialEq, Record)]
struct Pair {
    pub a: i32,
    pub b: String,
}

#[derive(Debug, Default, PartialEq, Record)]
struct WithChar {
    pub a: i32,
    pub grade: char,
}

#[test]
fn decodes_rows_in_order_until_end_of_stream() {
    let mut dec = Decoder::new(LineRows::from_text(LINES));
    let mut decoded = Vec::new();
    loop {
        let mut x = X::default();
        match dec.decode(&mut x) {
            Ok(()) => decoded.push(x),
            Err(err) if err.is_end_of_stream() => break,
            Err(err) => panic!("oops: {err}"),
        }
    }

    let summary: Vec<(i32, &str, i32)> = decoded
        .iter()
        .map(|x| (x.a, x.b.as_str(), x.c))
        .collect();
    assert_eq!(summary, [(1, "blonde", 0), (2, "on", 0), (3, "blonde", 0)]);
}

#[test]
fn private_fields_keep_their_prior_value() {
    let mut dec = Decoder::new(IterRows::new([["4", "red"]]));
    let mut x = X {
        a: 0,
        b: String::new(),
        c: 99,
    };
    dec.decode(&mut x).expect("row matches settable fields");
    assert_eq!(
        x,
        X {
            a: 4,
            b: "red".to_owned(),
            c: 99,
        }
    );
}

#[test]
fn short_row_names_first_missing_field() {
    let mut dec = Decoder::new(IterRows::new([vec!["1", "blonde"]]));
    let mut triple = Triple::default();
    let err = dec.decode(&mut triple).expect_err("row is short");
    assert_eq!(
        err.as_row_shape(),
        Some(&RowShapeError {
            row_len: 2,
            matched_len: 2,
            missing_field: Some("c"),
        })
    );
    assert_eq!(
        err.to_string(),
        "row mismatch: row length = 2, but struct length = 2 (field c)"
    );
    assert_eq!(triple.a, 1);
    assert_eq!(triple.b, "blonde");
}

#[test]
fn long_row_reports_extra_fields_after_writing() {
    let mut dec = Decoder::new(IterRows::new([vec!["1", "blonde", "6"]]));
    let mut pair = Pair::default();
    let err = dec.decode(&mut pair).expect_err("row is long");
    assert_eq!(
        err.as_row_shape(),
        Some(&RowShapeError {
            row_len: 3,
            matched_len: 2,
            missing_field: None,
        })
    );
    assert_eq!(
        pair,
        Pair {
            a: 1,
            b: "blonde".to_owned(),
        }
    );
}

#[test]
fn unregistered_kind_is_reported_and_stops_the_walk() {
    for row in [vec!["1", "A"], vec!["1", "A", "extra"]] {
        let mut dec = Decoder::new(IterRows::new([row]));
        let mut target = WithChar::default();
        let err = dec.decode(&mut target).expect_err("char has no converter");
        assert_eq!(
            err.as_kind(),
            Some(&KindError {
                kind: FieldKind::Char,
                field: "grade",
            })
        );
        assert_eq!(err.to_string(), "char is not decodable (field grade)");
        assert_eq!(target.a, 1, "earlier fields stay written");
        assert_eq!(target.grade, '\0');
    }
}

#[derive(Debug, Default, PartialEq, Record)]
struct Scalars {
    pub flag: bool,
    pub word: isize,
    pub tiny: i8,
    pub small: i16,
    pub medium: i32,
    pub large: i64,
    pub uword: usize,
    pub utiny: u8,
    pub usmall: u16,
    pub umedium: u32,
    pub ularge: u64,
    pub single: f32,
    pub double: f64,
    pub text: String,
}

#[test]
fn every_default_kind_decodes_exactly() {
    let row = [
        "true",
        "-9000",
        "-128",
        "-32768",
        "-2147483648",
        "-9223372036854775808",
        "42",
        "255",
        "65535",
        "4294967295",
        "18446744073709551615",
        "-1.5",
        "6.02214076e23",
        "bonjour",
    ];
    let mut dec = Decoder::with_options(
        IterRows::new([row]),
        DecoderOptions::default().with_parse_errors(ParseErrorPolicy::Propagate),
    );
    let mut scalars = Scalars::default();
    dec.decode(&mut scalars).expect("every field is valid");
    assert_eq!(
        scalars,
        Scalars {
            flag: true,
            word: -9000,
            tiny: i8::MIN,
            small: i16::MIN,
            medium: i32::MIN,
            large: i64::MIN,
            uword: 42,
            utiny: u8::MAX,
            usmall: u16::MAX,
            umedium: u32::MAX,
            ularge: u64::MAX,
            single: -1.5,
            double: 6.02214076e23,
            text: "bonjour".to_owned(),
        }
    );
}

#[test]
fn non_record_target_is_a_no_op() {
    let mut dec = Decoder::new(LineRows::from_text(LINES));
    let mut x = 0_i32;
    dec.decode(&mut x).expect("non-record targets succeed");
    assert_eq!(x, 0, "something touched x");

    let mut words = vec!["keep".to_owned()];
    dec.decode(&mut words).expect("non-record targets succeed");
    assert_eq!(words, ["keep"]);
}

#[derive(Debug, Default, Record)]
struct Nothing;

#[derive(Debug, Default, Record)]
struct Hidden {
    secret: u8,
}

#[test]
fn records_without_settable_fields() {
    let mut dec = Decoder::new(IterRows::new([Vec::<String>::new()]));
    dec.decode(&mut Nothing).expect("empty row for empty record");

    let mut dec = Decoder::new(IterRows::new([vec!["1"]]));
    let mut hidden = Hidden { secret: 3 };
    let err = dec.decode(&mut hidden).expect_err("extra field");
    assert_eq!(
        err.as_row_shape(),
        Some(&RowShapeError {
            row_len: 1,
            matched_len: 0,
            missing_field: None,
        })
    );
    assert_eq!(hidden.secret, 3);
}

#[test]
fn stream_errors_pass_through_unchanged() {
    let mut dec = Decoder::new(FlakyRows {
        served: 0,
        fail_at: 1,
    });
    let mut pair = Pair::default();
    dec.decode(&mut pair).expect("first row is served");
    assert_eq!(pair.a, 1);

    match dec.decode(&mut pair) {
        Err(DecodeError::Stream(err)) => {
            assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
            assert_eq!(err.to_string(), "peer went away");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(pair.a, 1, "failed read leaves the record alone");
}

#[derive(Debug, Default, PartialEq, Record)]
struct Annotated {
    #[table(rename = "Identifier")]
    pub id: u16,
    #[table(skip)]
    pub cached: String,
    pub(crate) note: String,
    pub r#type: String,
}

#[test]
fn attributes_control_names_and_settability() {
    let shape = Annotated::default().shape().expect("derived record");
    let names: Vec<&str> = shape.fields().iter().map(|field| field.name()).collect();
    assert_eq!(names, ["Identifier", "cached", "note", "type"]);
    assert_eq!(shape.settable_len(), 3);
    assert_eq!(shape.name(), "Annotated");

    let mut dec = Decoder::new(IterRows::new([vec!["7", "n", "t"], vec![]]));
    let mut annotated = Annotated {
        cached: "warm".to_owned(),
        ..Annotated::default()
    };
    dec.decode(&mut annotated).expect("three settable fields");
    assert_eq!(annotated.id, 7);
    assert_eq!(annotated.cached, "warm");
    assert_eq!(annotated.note, "n");
    assert_eq!(annotated.r#type, "t");

    let err = dec.decode(&mut annotated).expect_err("empty row");
    assert_eq!(
        err.as_row_shape().and_then(|shape| shape.missing_field),
        Some("Identifier")
    );
}

#[derive(Debug, Default, PartialEq, Record)]
struct Point(pub f64, pub f64, u8);

#[test]
fn tuple_structs_use_positional_names() {
    let mut dec = Decoder::new(IterRows::new([vec!["0.5"], vec!["1", "2"]]));
    let mut point = Point::default();
    let err = dec.decode(&mut point).expect_err("short row");
    assert_eq!(
        err.as_row_shape().and_then(|shape| shape.missing_field),
        Some("1")
    );
    dec.decode(&mut point).expect("full row");
    assert_eq!(point, Point(1.0, 2.0, 0));
}

#[test]
fn boxed_and_dyn_targets_decode_through_the_same_path() {
    let mut dec = Decoder::new(IterRows::new([["5", "boxed"], ["6", "dyn"]]));

    let mut boxed = Box::new(Pair::default());
    dec.decode(&mut boxed).expect("boxed record");
    assert_eq!(boxed.a, 5);

    let mut pair = Pair::default();
    let target: &mut dyn Record = &mut pair;
    dec.decode(target).expect("trait object record");
    assert_eq!(pair.b, "dyn");
}

#[test]
fn records_iterator_ends_cleanly_and_stops_after_stream_failure() {
    let mut dec = Decoder::new(LineRows::from_text(LINES));
    let all: Vec<X> = dec.decode_all().expect("three rows");
    assert_eq!(all.iter().map(|x| x.a).collect::<Vec<_>>(), [1, 2, 3]);

    let mut flaky = Decoder::new(FlakyRows {
        served: 0,
        fail_at: 2,
    });
    let results: Vec<_> = flaky.records::<Pair>().collect();
    assert_eq!(results.len(), 3);
    assert!(results[..2].iter().all(Result::is_ok));
    assert!(matches!(results[2], Err(DecodeError::Stream(_))));
    assert_eq!(flaky.source_mut().served, 2);
}

#[test]
fn source_is_handed_back_with_remaining_rows() {
    let mut dec = Decoder::new(IterRows::new(vec![vec!["1", "a"], vec!["2", "b"]]));
    dec.decode(&mut Pair::default()).expect("first row");
    let remaining: Vec<_> = dec.into_source().into_inner().collect();
    assert_eq!(remaining, [vec!["2", "b"]]);
}

#[derive(Debug, Default, PartialEq, Record)]
struct Outer {
    pub id: u8,
    pub inner: Pair,
}

#[test]
fn nested_record_field_is_a_kind_error() {
    for row in [vec!["1", "x"], vec!["1", "x", "extra"]] {
        let mut dec = Decoder::new(IterRows::new([row]));
        let mut outer = Outer::default();
        let err = dec.decode(&mut outer).expect_err("nested record is not decodable");
        assert_eq!(
            err.as_kind(),
            Some(&KindError {
                kind: FieldKind::Record,
                field: "inner",
            })
        );
        assert_eq!(err.to_string(), "struct is not decodable (field inner)");
        assert_eq!(outer.id, 1);
        assert_eq!(outer.inner, Pair::default());
    }

    let mut dec = Decoder::new(IterRows::new([["1"]]));
    let err = dec.decode(&mut Outer::default()).expect_err("short row");
    assert_eq!(
        err.as_row_shape().and_then(|shape| shape.missing_field),
        Some("inner")
    );
}

#[derive(Debug, Default, PartialEq, Record)]
struct Extras {
    pub maybe: Option<i32>,
    pub big: i128,
    pub wide: u128,
}

fn convert_optional_i32(slot: &mut FieldSlot<'_>, text: &str) -> Result<(), ConversionError> {
    let kind = slot.kind();
    let value = slot
        .downcast_mut::<Option<i32>>()
        .ok_or(ConversionError::SlotMismatch {
            expected: FieldKind::Optional,
            found: kind,
        })?;
    *value = text.parse().ok();
    Ok(())
}

#[test]
fn optional_and_wide_integers_name_their_kind() {
    let mut dec = Decoder::new(IterRows::new([["5", "6", "7"]]));
    let err = dec
        .decode(&mut Extras::default())
        .expect_err("option is not decodable");
    assert_eq!(err.as_kind().map(|err| err.kind), Some(FieldKind::Optional));
    assert_eq!(err.to_string(), "option is not decodable (field maybe)");

    let mut dec = Decoder::new(IterRows::new([["5", "6", "7"]]));
    dec.registry_mut()
        .register(FieldKind::Optional, convert_optional_i32);
    let mut extras = Extras::default();
    let err = dec.decode(&mut extras).expect_err("i128 is not decodable");
    assert_eq!(
        err.as_kind(),
        Some(&KindError {
            kind: FieldKind::I128,
            field: "big",
        })
    );
    assert_eq!(extras.maybe, Some(5));
}

#[test]
fn unsigned_fields_reject_a_plus_sign() {
    #[derive(Debug, Default, Record)]
    struct Count {
        pub n: u8,
    }

    let mut dec = Decoder::with_options(
        IterRows::new([["+5"], ["5"]]),
        DecoderOptions::default().with_parse_errors(ParseErrorPolicy::Propagate),
    );
    let mut count = Count { n: 9 };
    match dec.decode(&mut count) {
        Err(DecodeError::Parse(err)) => {
            assert_eq!(err.field, "n");
            assert_eq!(err.kind, FieldKind::U8);
            assert_eq!(err.text, "+5");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(count.n, 0, "syntax errors write zero");

    dec.decode(&mut count).expect("plain digits");
    assert_eq!(count.n, 5);
}
