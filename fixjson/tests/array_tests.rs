// Array reader behavior: scalar banks, string banks, parallel object
// arrays, and the element-count limit.

use core::cell::Cell;

use fixjson::{
    bank, read_array, terminated, AttrSpec, Dest, ElementTarget, JsonArray, JsonAttr, ParseError,
};
use test_log::test;

#[test]
fn test_integer_elements() {
    let mut values = [0i32; 4];
    let count = Cell::new(0usize);
    {
        let array = JsonArray {
            elements: ElementTarget::Integers(bank(&mut values)),
            count: Some(&count),
            maxlen: 4,
        };
        let rest = read_array("[1, -2, 0x10] ", &array).unwrap();
        assert_eq!(rest, "");
    }
    assert_eq!(count.get(), 3);
    assert_eq!(values, [1, -2, 16, 0]);
}

#[test]
fn test_empty_array() {
    let mut values = [0i32; 2];
    let count = Cell::new(9usize);
    let array = JsonArray {
        elements: ElementTarget::Integers(bank(&mut values)),
        count: Some(&count),
        maxlen: 2,
    };
    read_array("[ ]", &array).unwrap();
    assert_eq!(count.get(), 0);
}

#[test]
fn test_too_many_elements() {
    let mut values = [0i32; 4];
    let count = Cell::new(7usize);
    {
        let array = JsonArray {
            elements: ElementTarget::Integers(bank(&mut values)),
            count: Some(&count),
            maxlen: 3,
        };
        assert_eq!(read_array("[1,2,3,4]", &array), Err(ParseError::TooManyElements));
    }
    // The first three were already written; the count was not.
    assert_eq!(values, [1, 2, 3, 0]);
    assert_eq!(count.get(), 7);
}

#[test]
fn test_bank_exhaustion_reports_too_many() {
    let mut values = [0i32; 2];
    let array = JsonArray {
        elements: ElementTarget::Integers(bank(&mut values)),
        count: None,
        maxlen: 10,
    };
    assert_eq!(read_array("[1,2,3]", &array), Err(ParseError::TooManyElements));
}

#[test]
fn test_mixed_kinds_rejected() {
    let mut values = [0i32; 4];
    let array = JsonArray {
        elements: ElementTarget::Integers(bank(&mut values)),
        count: None,
        maxlen: 4,
    };
    assert_eq!(read_array("[1,true,3]", &array), Err(ParseError::BadNumber));
}

#[test]
fn test_real_elements() {
    let mut values = [0.0f64; 3];
    let count = Cell::new(0usize);
    {
        let array = JsonArray {
            elements: ElementTarget::Reals(bank(&mut values)),
            count: Some(&count),
            maxlen: 3,
        };
        read_array("[1.5, -2e2, 3]", &array).unwrap();
    }
    assert_eq!(count.get(), 3);
    assert_eq!(values, [1.5, -200.0, 3.0]);
}

#[test]
fn test_boolean_elements() {
    let mut values = [false; 3];
    let count = Cell::new(0usize);
    {
        let array = JsonArray {
            elements: ElementTarget::Booleans(bank(&mut values)),
            count: Some(&count),
            maxlen: 3,
        };
        read_array("[true, false, true]", &array).unwrap();
    }
    assert_eq!(values, [true, false, true]);
    assert_eq!(count.get(), 3);
}

#[test]
fn test_short_and_ushort_elements() {
    let mut shorts = [0i16; 3];
    {
        let array = JsonArray {
            elements: ElementTarget::Shorts(bank(&mut shorts)),
            count: None,
            maxlen: 3,
        };
        read_array("[1, -2, 300]", &array).unwrap();
    }
    assert_eq!(shorts, [1, -2, 300]);

    let mut ushorts = [0u16; 2];
    {
        let array = JsonArray {
            elements: ElementTarget::Ushorts(bank(&mut ushorts)),
            count: None,
            maxlen: 2,
        };
        read_array("[0xff, 9]", &array).unwrap();
    }
    assert_eq!(ushorts, [255, 9]);
}

#[test]
fn test_string_elements_pack_into_store() {
    let mut offsets = [0usize; 4];
    let mut store = [0u8; 16];
    let count = Cell::new(0usize);
    {
        let array = JsonArray {
            elements: ElementTarget::Strings {
                offsets: bank(&mut offsets),
                store: bank(&mut store),
            },
            count: Some(&count),
            maxlen: 4,
        };
        read_array(r#"["foo", "quux", ""]"#, &array).unwrap();
    }
    assert_eq!(count.get(), 3);
    assert_eq!(offsets[..3], [0, 4, 9]);
    assert_eq!(terminated(&store[offsets[0]..]), b"foo");
    assert_eq!(terminated(&store[offsets[1]..]), b"quux");
    assert_eq!(terminated(&store[offsets[2]..]), b"");
}

#[test]
fn test_string_store_exhaustion() {
    let mut offsets = [0usize; 2];
    let mut store = [0u8; 4];
    let array = JsonArray {
        elements: ElementTarget::Strings {
            offsets: bank(&mut offsets),
            store: bank(&mut store),
        },
        count: None,
        maxlen: 2,
    };
    assert_eq!(
        read_array(r#"["toolong"]"#, &array),
        Err(ParseError::BadString)
    );
    assert_eq!(
        read_array(r#"[notastring]"#, &array),
        Err(ParseError::BadString)
    );
}

#[test]
fn test_parallel_object_array() {
    let mut prns = [0i32; 4];
    let mut elevations = [0.0f64; 4];
    let mut used = [false; 4];
    let count = Cell::new(0usize);
    {
        let prn_bank = bank(&mut prns);
        let el_bank = bank(&mut elevations);
        let used_bank = bank(&mut used);
        let subtype = [
            JsonAttr::new(
                "PRN",
                AttrSpec::Integer {
                    dest: Dest::Bank(prn_bank),
                    default: 0,
                    map: None,
                },
            ),
            JsonAttr::new(
                "el",
                AttrSpec::Real {
                    dest: Dest::Bank(el_bank),
                    default: 0.0,
                },
            ),
            JsonAttr::new(
                "used",
                AttrSpec::Boolean {
                    dest: Dest::Bank(used_bank),
                    default: false,
                },
            ),
        ];
        let array = JsonArray {
            elements: ElementTarget::Objects { subtype: &subtype },
            count: Some(&count),
            maxlen: 4,
        };
        let rest = read_array(
            r#"[{"PRN":10,"el":45.5,"used":true},{"PRN":29,"el":67.0}]"#,
            &array,
        )
        .unwrap();
        assert_eq!(rest, "");
    }
    assert_eq!(count.get(), 2);
    assert_eq!(prns[..2], [10, 29]);
    assert_eq!(elevations[..2], [45.5, 67.0]);
    // Omitted in the second element, so its default was primed.
    assert_eq!(used[..2], [true, false]);
}

#[test]
fn test_parallel_string_rejected_past_first_element() {
    let mut buf = [0u8; 8];
    let buf_bank = bank(&mut buf);
    let subtype = [JsonAttr::new(
        "name",
        AttrSpec::String {
            dest: fixjson::StrDest::Buffer(buf_bank),
        },
    )];
    let array = JsonArray {
        elements: ElementTarget::Objects { subtype: &subtype },
        count: None,
        maxlen: 4,
    };
    assert_eq!(
        read_array(r#"[{"name":"a"},{"name":"b"}]"#, &array),
        Err(ParseError::ParallelString)
    );
}

#[test]
fn test_array_trailers() {
    let mut values = [0i32; 4];
    let array = JsonArray {
        elements: ElementTarget::Integers(bank(&mut values)),
        count: None,
        maxlen: 4,
    };
    assert_eq!(read_array("[1;2]", &array), Err(ParseError::BadArrayTrailer));
    assert_eq!(read_array("nope", &array), Err(ParseError::MissingArrayStart));
}

#[test]
fn test_array_attribute_within_object() {
    let mut values = [0i32; 8];
    let count = Cell::new(0usize);
    let total = Cell::new(0i32);
    {
        let array = JsonArray {
            elements: ElementTarget::Integers(bank(&mut values)),
            count: Some(&count),
            maxlen: 8,
        };
        let attrs = [
            JsonAttr::new("samples", AttrSpec::Array(array)),
            JsonAttr::new(
                "total",
                AttrSpec::Integer {
                    dest: Dest::scalar(&total),
                    default: 0,
                    map: None,
                },
            ),
        ];
        // Declared as an array but no bracket follows.
        assert_eq!(
            fixjson::read_object(r#"{"samples":5}"#, &attrs),
            Err(ParseError::MissingBracket)
        );

        let rest =
            fixjson::read_object(r#"{"samples":[5, 6, 7],"total":18}"#, &attrs).unwrap();
        assert_eq!(rest, "");
    }
    assert_eq!(count.get(), 3);
    assert_eq!(values[..3], [5, 6, 7]);
    assert_eq!(total.get(), 18);
}
