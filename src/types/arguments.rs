//! Argumentos brutos de uma chamada de ferramenta.
//!
//! Os clientes MCP enviam um objeto JSON sem tipagem forte. Este módulo
//! oferece duas perguntas distintas sobre cada campo:
//!
//! - **presença**: o campo existe e não é `null`;
//! - **truthiness**: o campo está presente e não é `false`, `0`, `NaN` ou `""`.
//!
//! As regras de validação usam uma ou outra campo a campo, e elas não são
//! intercambiáveis (`by_artifacts: false` está presente, mas não é truthy).

use serde_json::{Map, Value};

use crate::types::errors::ValidationError;

/// Argumentos de uma chamada, imutáveis após o recebimento.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolArguments {
    fields: Map<String, Value>,
}

impl ToolArguments {
    /// Cria a partir do valor `arguments` de `tools/call`.
    ///
    /// `null` é tratado como objeto vazio; qualquer outro não-objeto é rejeitado.
    pub fn from_value(value: Value) -> Result<Self, ValidationError> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            Value::Null => Ok(Self::default()),
            other => Err(ValidationError::InvalidArguments(format!(
                "expected an object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Valor bruto do campo, ignorando `null`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key).filter(|v| !v.is_null())
    }

    /// O campo está presente (equivalente a `!== undefined`).
    pub fn is_present(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// O campo é truthy.
    pub fn is_truthy(&self, key: &str) -> bool {
        self.get(key).is_some_and(is_truthy)
    }

    /// `String(v)` se o campo for truthy.
    pub fn string_if_truthy(&self, key: &str) -> Option<String> {
        self.get(key).filter(|v| is_truthy(v)).map(coerce_string)
    }

    /// `String(v)` se o campo estiver presente.
    pub fn string_if_present(&self, key: &str) -> Option<String> {
        self.get(key).map(coerce_string)
    }

    /// `Number(v)` se o campo estiver presente.
    pub fn number_if_present(&self, key: &str) -> Option<f64> {
        self.get(key).map(coerce_number)
    }

    /// `Boolean(v)`; ausente vira `false`.
    pub fn flag(&self, key: &str) -> bool {
        self.is_truthy(key)
    }

    /// `Boolean(v)`, ou `default` se o campo estiver ausente.
    pub fn flag_or(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Some(value) => is_truthy(value),
            None => default,
        }
    }

    /// Quantidade de campos recebidos.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl TryFrom<Value> for ToolArguments {
    type Error = ValidationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

/// Truthiness no sentido de JavaScript.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Conversão `String(v)`.
pub fn coerce_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => format_number(f),
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| if item.is_null() { String::new() } else { coerce_string(item) })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Conversão `Number(v)`.
pub fn coerce_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => parse_number(s),
        Value::Array(_) | Value::Object(_) => f64::NAN,
    }
}

/// `Number("...")`: decimal, `0x`/`0o`/`0b` sem sinal, ou `Infinity` exato.
fn parse_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    let radix = match trimmed.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return parse_radix(&trimmed[2..], radix);
    }

    let unsigned = trimmed.strip_prefix(|c| c == '+' || c == '-').unwrap_or(trimmed);
    if unsigned == "Infinity" {
        return if trimmed.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    // `str::parse` também aceita `inf` e `nan`
    if !unsigned
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

fn parse_radix(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    digits
        .chars()
        .try_fold(0.0_f64, |acc, c| {
            c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
        })
        .unwrap_or(f64::NAN)
}

/// Formata um número como JavaScript: `5`, `2.5`, `NaN`, `Infinity`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{}", n as i128)
    } else {
        format!("{}", n)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> ToolArguments {
        ToolArguments::from_value(value).unwrap()
    }

    #[test]
    fn test_null_arguments_are_empty() {
        let a = args(Value::Null);
        assert!(a.is_empty());
    }

    #[test]
    fn test_non_object_rejected() {
        let err = ToolArguments::from_value(json!([1, 2])).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidArguments(_)));
    }

    #[test]
    fn test_presence_vs_truthiness() {
        let a = args(json!({
            "by_artifacts": false,
            "counter": 0,
            "by_branch": "",
            "explicit_null": null
        }));

        assert!(a.is_present("by_artifacts"));
        assert!(!a.is_truthy("by_artifacts"));
        assert!(a.is_present("counter"));
        assert!(!a.is_truthy("counter"));
        assert!(a.is_present("by_branch"));
        assert!(!a.is_truthy("by_branch"));
        assert!(!a.is_present("explicit_null"));
        assert!(!a.is_present("missing"));
    }

    #[test]
    fn test_string_coercion() {
        let a = args(json!({"n": 43, "f": 2.5, "b": false, "s": "main"}));

        assert_eq!(a.string_if_present("n").as_deref(), Some("43"));
        assert_eq!(a.string_if_present("f").as_deref(), Some("2.5"));
        assert_eq!(a.string_if_present("b").as_deref(), Some("false"));
        assert_eq!(a.string_if_truthy("b"), None);
        assert_eq!(a.string_if_truthy("s").as_deref(), Some("main"));
    }

    #[test]
    fn test_number_coercion() {
        let a = args(json!({"s": " 12 ", "bad": "abc", "empty": "", "t": true}));

        assert_eq!(a.number_if_present("s"), Some(12.0));
        assert!(a.number_if_present("bad").unwrap().is_nan());
        assert_eq!(a.number_if_present("empty"), Some(0.0));
        assert_eq!(a.number_if_present("t"), Some(1.0));
        assert_eq!(a.number_if_present("missing"), None);
    }

    #[test]
    fn test_number_coercion_prefixes_and_infinity() {
        let n = |s: &str| coerce_number(&json!(s));

        assert_eq!(n("0x10"), 16.0);
        assert_eq!(n("0XfF"), 255.0);
        assert_eq!(n("0b1"), 1.0);
        assert_eq!(n("0o7"), 7.0);
        assert!(n("0x").is_nan());
        assert!(n("0b2").is_nan());
        assert!(n("-0x10").is_nan());

        assert_eq!(n("Infinity"), f64::INFINITY);
        assert_eq!(n(" -Infinity "), f64::NEG_INFINITY);
        assert!(n("inf").is_nan());
        assert!(n("infinity").is_nan());
        assert!(n("NaN").is_nan());

        assert_eq!(n("1e3"), 1000.0);
        assert_eq!(n(".5"), 0.5);
        assert_eq!(n("+7"), 7.0);
    }

    #[test]
    fn test_flags() {
        let a = args(json!({"off": false, "on": "yes"}));

        assert!(!a.flag("off"));
        assert!(a.flag("on"));
        assert!(!a.flag("missing"));
        assert!(a.flag_or("missing", true));
        assert!(!a.flag_or("off", true));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(5.0), "5");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(0.25), "0.25");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
    }
}
