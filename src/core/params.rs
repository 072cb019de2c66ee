//! Parameter schemas and raw argument binding
//!
//! A command's raw arguments are matched against its ordered [`ParamSpec`]
//! list, by flag (`--to 0xABC`, `--to=0xABC`, `--tx-hash` for `txHash`) or
//! by position. Bound values are type-checked and normalized to JSON so the
//! backend always receives typed parameters.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::error::ValidationErrorKind;

/// Normalized parameter set handed to the backend, in schema order
pub type NormalizedParams = Map<String, Value>;

/// Type tag of a command parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamType {
    /// `0x`-prefixed hex address
    #[serde(rename = "address")]
    Address,
    /// Unsigned decimal integer (up to 128 bits)
    #[serde(rename = "uint")]
    Uint,
    #[serde(rename = "bool")]
    Bool,
    #[serde(rename = "string")]
    String,
    /// `0x`-prefixed 32-byte hex value
    #[serde(rename = "bytes32")]
    Bytes32,
    /// Comma-separated addresses
    #[serde(rename = "address[]")]
    AddressList,
    /// Comma-separated unsigned integers
    #[serde(rename = "uint[]")]
    UintList,
}

impl ParamType {
    /// Tag used in usage lines and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::Address => "address",
            ParamType::Uint => "uint",
            ParamType::Bool => "bool",
            ParamType::String => "string",
            ParamType::Bytes32 => "bytes32",
            ParamType::AddressList => "address[]",
            ParamType::UintList => "uint[]",
        }
    }

    /// Check a raw value and convert it to its JSON form
    ///
    /// Returns `None` when the value does not match the type.
    pub fn normalize(&self, raw: &str) -> Option<Value> {
        match self {
            ParamType::Address => is_address(raw).then(|| Value::String(raw.to_string())),
            ParamType::Uint => parse_uint(raw),
            ParamType::Bool => parse_bool(raw).map(Value::Bool),
            ParamType::String => Some(Value::String(raw.to_string())),
            ParamType::Bytes32 => is_bytes32(raw).then(|| Value::String(raw.to_string())),
            ParamType::AddressList => split_list(raw)?
                .into_iter()
                .map(|item| is_address(item).then(|| Value::String(item.to_string())))
                .collect::<Option<Vec<_>>>()
                .map(Value::Array),
            ParamType::UintList => split_list(raw)?
                .into_iter()
                .map(parse_uint)
                .collect::<Option<Vec<_>>>()
                .map(Value::Array),
        }
    }
}

impl std::fmt::Display for ParamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a command's parameter schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,

    #[serde(rename = "type")]
    pub ty: ParamType,

    #[serde(default = "default_required")]
    pub required: bool,

    /// Raw default applied when an optional parameter is omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    #[serde(default)]
    pub description: String,
}

fn default_required() -> bool {
    true
}

impl ParamSpec {
    pub fn required(name: &str, ty: ParamType) -> Self {
        Self {
            name: name.to_string(),
            ty,
            required: true,
            default: None,
            description: String::new(),
        }
    }

    pub fn optional(name: &str, ty: ParamType) -> Self {
        Self {
            required: false,
            ..Self::required(name, ty)
        }
    }

    /// Long flag spelling (`txHash` -> `tx-hash`)
    pub fn flag(&self) -> String {
        to_kebab_case(&self.name)
    }

    /// Whether `key` (a flag without leading dashes) names this parameter
    pub fn matches_flag(&self, key: &str) -> bool {
        key == self.name || key == self.flag()
    }

    /// Usage fragment, e.g. `--amount <uint>` or `[--reason <string>]`
    pub fn usage(&self) -> String {
        let fragment = format!("--{} <{}>", self.flag(), self.ty);
        if self.required {
            fragment
        } else {
            format!("[{}]", fragment)
        }
    }
}

/// Bind raw arguments to a schema and normalize every bound value
pub fn bind(params: &[ParamSpec], args: &[String]) -> Result<NormalizedParams, ValidationErrorKind> {
    let mut raw: Vec<Option<String>> = vec![None; params.len()];
    let mut positionals: Vec<&str> = Vec::new();
    let mut flags_done = false;

    let mut iter = args.iter().peekable();
    while let Some(arg) = iter.next() {
        if flags_done || !arg.starts_with("--") {
            positionals.push(arg.as_str());
            continue;
        }
        if arg == "--" {
            flags_done = true;
            continue;
        }

        let body = &arg[2..];
        let (key, inline) = match body.split_once('=') {
            Some((key, value)) => (key, Some(value.to_string())),
            None => (body, None),
        };

        let index = params
            .iter()
            .position(|p| p.matches_flag(key))
            .ok_or_else(|| ValidationErrorKind::UnknownFlag { flag: arg.clone() })?;
        let spec = &params[index];

        if raw[index].is_some() {
            return Err(ValidationErrorKind::DuplicateParameter {
                param: spec.name.clone(),
            });
        }

        let value = match inline {
            Some(value) => value,
            None => {
                let has_value = iter.peek().is_some_and(|next| !next.starts_with("--"));
                if has_value {
                    iter.next().cloned().unwrap_or_default()
                } else if spec.ty == ParamType::Bool {
                    "true".to_string()
                } else {
                    return Err(ValidationErrorKind::MissingValue {
                        param: spec.name.clone(),
                        expected: spec.ty,
                    });
                }
            }
        };
        raw[index] = Some(value);
    }

    // Positional values fill the parameters not bound by flag, in schema order
    {
        let mut free = raw.iter_mut().filter(|slot| slot.is_none());
        for value in positionals {
            match free.next() {
                Some(slot) => *slot = Some(value.to_string()),
                None => {
                    return Err(ValidationErrorKind::UnexpectedArgument {
                        value: value.to_string(),
                    })
                }
            }
        }
    }

    let mut normalized = NormalizedParams::new();
    for (spec, value) in params.iter().zip(raw) {
        let value = match value.or_else(|| spec.default.clone()) {
            Some(value) => value,
            None if spec.required => {
                return Err(ValidationErrorKind::MissingParameter {
                    param: spec.name.clone(),
                    expected: spec.ty,
                })
            }
            None => continue,
        };

        let typed = spec
            .ty
            .normalize(&value)
            .ok_or_else(|| ValidationErrorKind::InvalidValue {
                param: spec.name.clone(),
                expected: spec.ty,
                value: value.clone(),
            })?;
        normalized.insert(spec.name.clone(), typed);
    }

    Ok(normalized)
}

fn hex_body(raw: &str) -> Option<&str> {
    raw.strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .filter(|body| body.chars().all(|c| c.is_ascii_hexdigit()))
}

fn is_address(raw: &str) -> bool {
    hex_body(raw).is_some_and(|body| !body.is_empty() && body.len() <= 40)
}

fn is_bytes32(raw: &str) -> bool {
    hex_body(raw).is_some_and(|body| body.len() == 64)
}

fn parse_uint(raw: &str) -> Option<Value> {
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let n: u128 = raw.parse().ok()?;
    Some(match u64::try_from(n) {
        Ok(small) => Value::from(small),
        // Wider than a JSON-safe integer, keep the exact decimal text
        Err(_) => Value::String(n.to_string()),
    })
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

fn split_list(raw: &str) -> Option<Vec<&str>> {
    let items: Vec<&str> = raw.split(',').map(str::trim).collect();
    if items.iter().any(|item| item.is_empty()) {
        None
    } else {
        Some(items)
    }
}

fn to_kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn transfer_schema() -> Vec<ParamSpec> {
        vec![
            ParamSpec::required("to", ParamType::Address),
            ParamSpec::required("amount", ParamType::Uint),
        ]
    }

    #[test]
    fn test_bind_by_flag() {
        let bound = bind(&transfer_schema(), &args(&["--to", "0xABC", "--amount", "100"])).unwrap();
        assert_eq!(Value::Object(bound), json!({"to": "0xABC", "amount": 100}));
    }

    #[test]
    fn test_bind_inline_and_positional() {
        let bound = bind(&transfer_schema(), &args(&["--amount=7", "0xdead"])).unwrap();
        assert_eq!(bound["to"], json!("0xdead"));
        assert_eq!(bound["amount"], json!(7));

        let bound = bind(&transfer_schema(), &args(&["0x01", "42"])).unwrap();
        assert_eq!(bound["to"], json!("0x01"));
        assert_eq!(bound["amount"], json!(42));
    }

    #[test]
    fn test_bound_params_keep_schema_order() {
        let bound = bind(&transfer_schema(), &args(&["--amount", "1", "--to", "0x1"])).unwrap();
        let keys: Vec<&String> = bound.keys().collect();
        assert_eq!(keys, vec!["to", "amount"]);
    }

    #[test]
    fn test_missing_required_parameter() {
        let err = bind(&transfer_schema(), &args(&["--to", "0xABC"])).unwrap_err();
        assert_eq!(
            err,
            ValidationErrorKind::MissingParameter {
                param: "amount".to_string(),
                expected: ParamType::Uint,
            }
        );
    }

    #[test]
    fn test_type_mismatch() {
        let err = bind(&transfer_schema(), &args(&["--to", "alice", "--amount", "1"])).unwrap_err();
        assert!(matches!(
            err,
            ValidationErrorKind::InvalidValue { ref param, expected: ParamType::Address, .. } if param == "to"
        ));

        let err = bind(&transfer_schema(), &args(&["--to", "0x1", "--amount", "-5"])).unwrap_err();
        assert!(matches!(err, ValidationErrorKind::InvalidValue { expected: ParamType::Uint, .. }));
    }

    #[test]
    fn test_unknown_duplicate_and_extra_arguments() {
        let schema = transfer_schema();
        assert!(matches!(
            bind(&schema, &args(&["--memo", "x"])).unwrap_err(),
            ValidationErrorKind::UnknownFlag { .. }
        ));
        assert_eq!(
            bind(&schema, &args(&["--to", "0x1", "--to", "0x2"])).unwrap_err(),
            ValidationErrorKind::DuplicateParameter { param: "to".to_string() }
        );
        assert_eq!(
            bind(&schema, &args(&["0x1", "2", "3"])).unwrap_err(),
            ValidationErrorKind::UnexpectedArgument { value: "3".to_string() }
        );
    }

    #[test]
    fn test_flag_without_value() {
        let err = bind(&transfer_schema(), &args(&["--to", "--amount", "1"])).unwrap_err();
        assert_eq!(
            err,
            ValidationErrorKind::MissingValue {
                param: "to".to_string(),
                expected: ParamType::Address,
            }
        );
    }

    #[test]
    fn test_bare_bool_flag_is_true() {
        let schema = vec![ParamSpec::optional("force", ParamType::Bool)];
        let bound = bind(&schema, &args(&["--force"])).unwrap();
        assert_eq!(bound["force"], json!(true));
    }

    #[test]
    fn test_optional_params_and_defaults() {
        let mut decimals = ParamSpec::optional("decimals", ParamType::Uint);
        decimals.default = Some("18".to_string());
        let schema = vec![decimals, ParamSpec::optional("memo", ParamType::String)];

        let bound = bind(&schema, &[]).unwrap();
        assert_eq!(bound["decimals"], json!(18));
        assert!(!bound.contains_key("memo"));
    }

    #[test]
    fn test_kebab_case_flags() {
        let schema = vec![ParamSpec::optional("txHash", ParamType::Bytes32)];
        let hash = format!("0x{}", "ab".repeat(32));
        let bound = bind(&schema, &args(&["--tx-hash", &hash])).unwrap();
        assert_eq!(bound["txHash"], json!(hash));
        assert_eq!(schema[0].usage(), "[--tx-hash <bytes32>]");
    }

    #[test]
    fn test_double_dash_ends_flags() {
        let schema = vec![ParamSpec::required("note", ParamType::String)];
        let bound = bind(&schema, &args(&["--", "--not-a-flag"])).unwrap();
        assert_eq!(bound["note"], json!("--not-a-flag"));
    }

    #[test]
    fn test_normalize_types() {
        assert_eq!(ParamType::Address.normalize("0xABC"), Some(json!("0xABC")));
        assert_eq!(ParamType::Address.normalize("0x"), None);
        assert_eq!(ParamType::Address.normalize(&format!("0x{}", "1".repeat(41))), None);
        assert_eq!(ParamType::Bytes32.normalize("0x1234"), None);
        assert_eq!(ParamType::Bool.normalize("yes"), Some(json!(true)));
        assert_eq!(ParamType::Bool.normalize("maybe"), None);
        assert_eq!(
            ParamType::Uint.normalize("340282366920938463463374607431768211455"),
            Some(json!("340282366920938463463374607431768211455"))
        );
        assert_eq!(ParamType::Uint.normalize("340282366920938463463374607431768211456"), None);
        assert_eq!(
            ParamType::AddressList.normalize("0x1, 0x2"),
            Some(json!(["0x1", "0x2"]))
        );
        assert_eq!(ParamType::UintList.normalize("1,,2"), None);
    }
}
