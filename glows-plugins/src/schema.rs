//! Static metadata a plugin declares to the host: identity, tags and the
//! arguments the host renders as form fields.

use serde::Serialize;
use std::collections::BTreeMap;

/// One entry of an option list.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ParamOption {
    pub value: serde_json::Value,
    pub label: String,
}

impl ParamOption {
    pub fn new(value: impl Into<serde_json::Value>, label: impl Into<String>) -> Self {
        ParamOption {
            value: value.into(),
            label: label.into(),
        }
    }

    /// Option whose label is its own value.
    pub fn same(value: &str) -> Self {
        ParamOption::new(value, value)
    }
}

/// An argument: a bare field type such as `"text"` or `"file"`, or a list of
/// choices.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ParamSpec {
    Field(&'static str),
    Options(Vec<ParamOption>),
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PluginSchema {
    pub name: &'static str,
    pub group: &'static str,
    pub label: &'static str,
    #[serde(rename = "type")]
    pub plugin_type: &'static str,
    pub tags: Vec<&'static str>,
    pub description: &'static str,
    pub attribution: &'static str,
    pub args: BTreeMap<&'static str, ParamSpec>,
}
