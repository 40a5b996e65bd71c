use serde_json::Value;
use std::io::{self, Write};

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) -> csv::Result<()> {
    let stdout = io::stdout();
    write_csv(stdout.lock(), value)
}

/// Write `value` as CSV: an envelope's `result` object becomes a
/// field/value listing, arrays of objects become one row per item.
pub fn write_csv<W: Write>(out: W, value: &Value) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);

    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => write_fields(&mut wtr, result)?,
            Some(Value::Array(results)) => write_array(&mut wtr, results)?,
            _ => write_fields(&mut wtr, map)?,
        },
        Value::Array(arr) => write_array(&mut wtr, arr)?,
        _ => wtr.write_record([format_csv_value(value)])?,
    }

    wtr.flush()?;
    Ok(())
}

fn write_fields<W: Write>(
    wtr: &mut csv::Writer<W>,
    map: &serde_json::Map<String, Value>,
) -> csv::Result<()> {
    wtr.write_record(["field", "value"])?;
    for (key, val) in map {
        wtr.write_record([key.as_str(), &format_csv_value(val)])?;
    }
    Ok(())
}

fn write_array<W: Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) -> csv::Result<()> {
    let Some(first) = arr.first() else {
        return Ok(());
    };

    // Headers come from the first object
    if let Value::Object(first) = first {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        wtr.write_record(&headers)?;

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                    .collect();
                wtr.write_record(&row)?;
            }
        }
    } else {
        for item in arr {
            wtr.write_record([format_csv_value(item)])?;
        }
    }
    Ok(())
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(value: &Value) -> String {
        let mut buf = Vec::new();
        write_csv(&mut buf, value).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_array_of_objects() {
        let value = json!([
            {"speed_mbps": 100, "fiber_cost": "3500"},
            {"speed_mbps": 200, "fiber_cost": "5000"},
        ]);
        assert_eq!(render(&value), "fiber_cost,speed_mbps\n3500,100\n5000,200\n");
    }

    #[test]
    fn test_result_envelope() {
        let value = json!({"result": {"total": "180", "seller": "144"}, "warnings": []});
        assert_eq!(render(&value), "field,value\nseller,144\ntotal,180\n");
    }
}
