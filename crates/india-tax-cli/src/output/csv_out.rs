use serde_json::{Map, Value};
use std::io;

use super::{flatten, object_arrays, scalar};

type StdoutCsv<'a> = csv::Writer<io::StdoutLock<'a>>;

/// Write output as CSV to stdout.
///
/// A result holding a list of records (the advance tax installments, planning
/// opportunities) is written as one row per record; anything else as
/// dotted `field,value` pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => {
            let target = match map.get("result") {
                Some(Value::Object(result)) => result,
                _ => map,
            };
            write_object(&mut wtr, target);
        }
        Value::Array(arr) => write_records(&mut wtr, arr),
        _ => {
            let _ = wtr.write_record([scalar(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_object(wtr: &mut StdoutCsv<'_>, map: &Map<String, Value>) {
    let arrays = object_arrays(map);
    if let [(_, records)] = arrays.as_slice() {
        write_records(wtr, records);
        return;
    }

    let _ = wtr.write_record(["field", "value"]);
    for (field, value) in flatten(map) {
        let _ = wtr.write_record([field, value]);
    }
}

fn write_records(wtr: &mut StdoutCsv<'_>, arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            let _ = wtr.write_record([scalar(item)]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    let _ = wtr.write_record(&headers);
    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(scalar).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    }
}
