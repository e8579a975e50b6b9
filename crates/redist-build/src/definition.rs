use std::fmt;

use serde::Serialize;

/// The value half of a preprocessor definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DefinitionValue {
    Str(String),
    Int(i64),
}

/// A preprocessor definition handed to compiled code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Definition {
    pub name: String,
    pub value: DefinitionValue,
}

impl Definition {
    /// A string-literal definition, i.e. `FOO_LIB_CONFIG_STRING="release"`.
    pub fn string<N: Into<String>, V: Into<String>>(name: N, value: V) -> Self {
        Self {
            name: name.into(),
            value: DefinitionValue::Str(value.into()),
        }
    }

    /// A `0`/`1` definition, i.e. `WITH_FOO=1`.
    pub fn flag<N: Into<String>>(name: N, enabled: bool) -> Self {
        Self {
            name: name.into(),
            value: DefinitionValue::Int(enabled as i64),
        }
    }

    /// The value as it should appear in C source (strings are quoted).
    pub fn c_value(&self) -> String {
        match &self.value {
            DefinitionValue::Str(s) => format!("{:?}", s),
            DefinitionValue::Int(i) => i.to_string(),
        }
    }

    /// The value without quoting, suitable for `cargo:rustc-env`.
    pub fn raw_value(&self) -> String {
        match &self.value {
            DefinitionValue::Str(s) => s.clone(),
            DefinitionValue::Int(i) => i.to_string(),
        }
    }
}

impl fmt::Display for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.c_value())
    }
}
