// Example: unpack a flat telemetry record into fixed storage.

use core::cell::Cell;

use fixjson::{read_object, AttrSpec, Dest, JsonAttr, ParseError};

fn main() -> Result<(), ParseError> {
    let input = r#"{"flag1":true,"flag2":false,"count":42}"#;
    println!("Input: {}", input);

    let count = Cell::new(0i32);
    let flag1 = Cell::new(false);
    let flag2 = Cell::new(false);
    let attrs = [
        JsonAttr::new(
            "count",
            AttrSpec::Integer {
                dest: Dest::scalar(&count),
                default: 0,
                map: None,
            },
        ),
        JsonAttr::new(
            "flag1",
            AttrSpec::Boolean {
                dest: Dest::scalar(&flag1),
                default: false,
            },
        ),
        JsonAttr::new(
            "flag2",
            AttrSpec::Boolean {
                dest: Dest::scalar(&flag2),
                default: false,
            },
        ),
    ];

    read_object(input, &attrs)?;
    println!(
        "count = {}, flag1 = {}, flag2 = {}",
        count.get(),
        flag1.get(),
        flag2.get()
    );
    Ok(())
}
