//! Core data model types for conversion.
//!
//! A sheet is consumed as a sequence of [`Row`]s; each cell is carried as a raw
//! string paired with the [`CellType`] the workbook stored for its column,
//! and [`TypedValue::convert`] turns that pair into a JSON value.

use serde_json::Value;

use crate::error::{ConvertError, ConvertResult};

/// Cell-type tag recorded by the workbook for a cell address.
///
/// The tag reflects how the cell is stored in the source format. It is captured
/// once per column, from the sample row, and reused for every data row in that
/// column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellType {
    /// No stored type (empty or untyped cell); values are inferred heuristically.
    Unset,
    /// Boolean cell.
    Bool,
    /// Date, time, or duration cell.
    Date,
    /// Error cell (e.g. `#DIV/0!`).
    Error,
    /// Formula cell.
    Formula,
    /// Inline string cell.
    InlineString,
    /// Numeric cell.
    Number,
    /// Shared-string cell.
    SharedString,
}

/// A single physical row: its position in the sheet plus its cells as raw strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// 1-based physical position in the sheet. Rows consumed by an initial
    /// skip still advance this position.
    pub index: u32,
    /// Raw cell values in column order.
    pub columns: Vec<String>,
}

/// A raw cell value paired with its column's declared cell type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedValue {
    /// Raw string form of the cell.
    pub raw: String,
    /// Declared type, resolved from the sample row's cell in this column.
    pub cell_type: CellType,
}

/// Parsers tried in order for [`CellType::Unset`] cells; the first success
/// wins. Order matters: `"42"` parses as the float `42.0` and never reaches
/// the integer parser.
const UNSET_PARSERS: [fn(&str) -> Option<Value>; 3] = [float_value, bool_value, int_value];

impl TypedValue {
    /// Create a typed value from a raw cell string and its column's cell type.
    pub fn new(raw: impl Into<String>, cell_type: CellType) -> Self {
        Self {
            raw: raw.into(),
            cell_type,
        }
    }

    /// Convert the raw value according to its declared cell type.
    ///
    /// `Bool` and `Number` cells must parse as their type; `Unset` cells go
    /// through the ordered heuristic (empty → null, then float, bool, and
    /// integer parses, then the raw string); every other tag passes the raw
    /// string through unchanged.
    pub fn convert(&self) -> ConvertResult<Value> {
        match self.cell_type {
            CellType::Unset => Ok(self.infer()),
            CellType::Bool => self.convert_bool(),
            CellType::Number => self.convert_number(),
            CellType::Date
            | CellType::Error
            | CellType::Formula
            | CellType::InlineString
            | CellType::SharedString => Ok(Value::String(self.raw.clone())),
        }
    }

    fn infer(&self) -> Value {
        if self.raw.is_empty() {
            return Value::Null;
        }
        UNSET_PARSERS
            .iter()
            .find_map(|parse| parse(&self.raw))
            .unwrap_or_else(|| Value::String(self.raw.clone()))
    }

    fn convert_bool(&self) -> ConvertResult<Value> {
        parse_bool(&self.raw)
            .map(Value::Bool)
            .map_err(|message| self.failure(message))
    }

    fn convert_number(&self) -> ConvertResult<Value> {
        let parsed = self
            .raw
            .parse::<f64>()
            .map_err(|e| self.failure(e.to_string()))?;
        number_value(parsed).ok_or_else(|| self.failure("not a finite number".to_string()))
    }

    fn failure(&self, message: String) -> ConvertError {
        ConvertError::ConversionFailure {
            raw: self.raw.clone(),
            cell_type: self.cell_type,
            message,
        }
    }
}

fn float_value(raw: &str) -> Option<Value> {
    raw.parse::<f64>().ok().and_then(number_value)
}

fn bool_value(raw: &str) -> Option<Value> {
    parse_bool(raw).ok().map(Value::Bool)
}

fn int_value(raw: &str) -> Option<Value> {
    raw.parse::<i64>().ok().map(|i| Value::Number(i.into()))
}

/// JSON number for a finite float. Integral values inside exact `i64` range
/// serialize as JSON integers, so a numeric cell holding `7` emits `7`, not
/// `7.0`. Non-finite floats have no JSON form and yield `None`.
fn number_value(f: f64) -> Option<Value> {
    // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound.
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        return Some(Value::Number((f as i64).into()));
    }
    serde_json::Number::from_f64(f).map(Value::Number)
}

/// Boolean literal parse shared by `Bool` conversion and the `Unset` heuristic.
fn parse_bool(s: &str) -> Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" => Ok(true),
        "false" | "f" | "0" | "no" | "n" => Ok(false),
        _ => Err("expected bool (true/false/1/0/yes/no)".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::{CellType, TypedValue};

    fn convert(raw: &str, cell_type: CellType) -> Value {
        TypedValue::new(raw, cell_type).convert().unwrap()
    }

    #[test]
    fn number_cells_parse_as_floats() {
        assert_eq!(convert("3.25", CellType::Number), json!(3.25));
        assert_eq!(convert("-0.5", CellType::Number), json!(-0.5));
    }

    #[test]
    fn integral_numbers_serialize_without_fraction() {
        let value = convert("7", CellType::Number);
        assert_eq!(serde_json::to_string(&value).unwrap(), "7");
        let value = convert("42.0", CellType::Number);
        assert_eq!(serde_json::to_string(&value).unwrap(), "42");
    }

    #[test]
    fn number_cells_reject_garbage_and_non_finite() {
        assert!(TypedValue::new("abc", CellType::Number).convert().is_err());
        assert!(TypedValue::new("", CellType::Number).convert().is_err());
        assert!(TypedValue::new("inf", CellType::Number).convert().is_err());
        assert!(TypedValue::new("NaN", CellType::Number).convert().is_err());
    }

    #[test]
    fn bool_cells_accept_common_literals() {
        for raw in ["true", "TRUE", "t", "1", "yes", "Y"] {
            assert_eq!(convert(raw, CellType::Bool), json!(true), "raw={raw}");
        }
        for raw in ["false", "f", "0", "no", "N"] {
            assert_eq!(convert(raw, CellType::Bool), json!(false), "raw={raw}");
        }
        assert!(TypedValue::new("maybe", CellType::Bool).convert().is_err());
    }

    #[test]
    fn unset_cells_follow_parser_priority() {
        // Empty wins outright.
        assert_eq!(convert("", CellType::Unset), Value::Null);
        // "1" is a valid float and a valid bool literal; float goes first.
        assert_eq!(convert("1", CellType::Unset), json!(1));
        assert_eq!(convert("42", CellType::Unset), json!(42));
        assert_eq!(convert("9.5", CellType::Unset), json!(9.5));
        // Not a float, but a bool literal.
        assert_eq!(convert("t", CellType::Unset), json!(true));
        assert_eq!(convert("no", CellType::Unset), json!(false));
        // Nothing parses; the raw string survives.
        assert_eq!(convert("hello", CellType::Unset), json!("hello"));
    }

    #[test]
    fn unset_non_finite_floats_fall_back_to_strings() {
        assert_eq!(convert("inf", CellType::Unset), json!("inf"));
        assert_eq!(convert("NaN", CellType::Unset), json!("NaN"));
    }

    #[test]
    fn other_cell_types_pass_raw_strings_through() {
        for cell_type in [
            CellType::Date,
            CellType::Error,
            CellType::Formula,
            CellType::InlineString,
            CellType::SharedString,
        ] {
            assert_eq!(convert("42", cell_type), json!("42"), "type={cell_type:?}");
        }
    }
}
