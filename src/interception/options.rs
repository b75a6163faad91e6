// src/interception/options.rs
//! Wrap configuration
//!
//! [`ProxyOptions`] is what callers hand in: every field optional, rules
//! added one pattern at a time. [`Configuration::normalize`] merges it over
//! the defaults once; the result is shared, read-only, by every view of the
//! wrap tree.

use crate::host::Value;
use crate::interception::path_matcher::RuleMap;
use crate::interception::rules::{ApplyRule, ConstructRule, CreatorRule, Invocation, SetterRule};
use crate::utils::errors::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::warn;

/// Default path separator
pub const DEFAULT_PATH_SEPARATOR: &str = ".";

/// Read-only enforcement mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadOnlyMode {
    /// Writes go through
    #[default]
    Off,

    /// Mutations report success and change nothing
    Silent,

    /// Mutations fail with a read-only violation
    Error,
}

impl ReadOnlyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadOnlyMode::Off => "off",
            ReadOnlyMode::Silent => "silent",
            ReadOnlyMode::Error => "error",
        }
    }

    /// Lenient parse: unrecognized values fall back to `Off`
    pub fn from_setting(value: &str) -> Self {
        value.parse().unwrap_or_else(|_| {
            warn!("Unrecognized read-only mode {:?}, falling back to off", value);
            ReadOnlyMode::Off
        })
    }
}

impl FromStr for ReadOnlyMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "off" | "false" | "none" => Ok(ReadOnlyMode::Off),
            "silent" => Ok(ReadOnlyMode::Silent),
            "error" => Ok(ReadOnlyMode::Error),
            other => Err(format!("unknown read-only mode: {}", other)),
        }
    }
}

impl fmt::Display for ReadOnlyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-supplied wrap options
#[derive(Default)]
pub struct ProxyOptions {
    pub value: Option<RuleMap<Value>>,
    pub creator: Option<RuleMap<CreatorRule>>,
    pub setter: Option<RuleMap<SetterRule>>,
    pub apply: Option<RuleMap<ApplyRule>>,
    pub construct: Option<RuleMap<ConstructRule>>,
    pub read_only: Option<ReadOnlyMode>,
    pub path_separator: Option<String>,
    pub follow_function: Option<bool>,
    pub follow_array: Option<bool>,
    pub follow_non_plain_object: Option<bool>,
}

impl ProxyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace `pattern` reads with a literal value
    pub fn value(mut self, pattern: impl Into<String>, value: impl Into<Value>) -> Self {
        self.value
            .get_or_insert_with(RuleMap::new)
            .insert(pattern, value.into());
        self
    }

    /// Post-process reads at `pattern`
    pub fn creator<F>(mut self, pattern: impl Into<String>, rule: F) -> Self
    where
        F: Fn(&Invocation<'_>, Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.creator
            .get_or_insert_with(RuleMap::new)
            .insert(pattern, Arc::new(rule) as CreatorRule);
        self
    }

    /// Intercept writes at `pattern`
    pub fn setter<F>(mut self, pattern: impl Into<String>, rule: F) -> Self
    where
        F: Fn(&Invocation<'_>, Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.setter
            .get_or_insert_with(RuleMap::new)
            .insert(pattern, Arc::new(rule) as SetterRule);
        self
    }

    /// Intercept calls of functions read at `pattern`
    pub fn apply<F>(mut self, pattern: impl Into<String>, rule: F) -> Self
    where
        F: Fn(&Invocation<'_>, &Value, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.apply
            .get_or_insert_with(RuleMap::new)
            .insert(pattern, Arc::new(rule) as ApplyRule);
        self
    }

    /// Intercept construction of functions read at `pattern`
    pub fn construct<F>(mut self, pattern: impl Into<String>, rule: F) -> Self
    where
        F: Fn(&Invocation<'_>, &[Value], &Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.construct
            .get_or_insert_with(RuleMap::new)
            .insert(pattern, Arc::new(rule) as ConstructRule);
        self
    }

    pub fn read_only(mut self, mode: ReadOnlyMode) -> Self {
        self.read_only = Some(mode);
        self
    }

    pub fn path_separator(mut self, separator: impl Into<String>) -> Self {
        self.path_separator = Some(separator.into());
        self
    }

    pub fn follow_function(mut self, follow: bool) -> Self {
        self.follow_function = Some(follow);
        self
    }

    pub fn follow_array(mut self, follow: bool) -> Self {
        self.follow_array = Some(follow);
        self
    }

    pub fn follow_non_plain_object(mut self, follow: bool) -> Self {
        self.follow_non_plain_object = Some(follow);
        self
    }
}

impl fmt::Debug for ProxyOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyOptions")
            .field("value", &self.value)
            .field("creator", &self.creator)
            .field("setter", &self.setter)
            .field("apply", &self.apply)
            .field("construct", &self.construct)
            .field("read_only", &self.read_only)
            .field("path_separator", &self.path_separator)
            .field("follow_function", &self.follow_function)
            .field("follow_array", &self.follow_array)
            .field("follow_non_plain_object", &self.follow_non_plain_object)
            .finish()
    }
}

/// Normalized, immutable configuration
#[derive(Clone)]
pub struct Configuration {
    pub value: RuleMap<Value>,
    pub creator: RuleMap<CreatorRule>,
    pub setter: RuleMap<SetterRule>,
    pub apply: RuleMap<ApplyRule>,
    pub construct: RuleMap<ConstructRule>,
    pub read_only: ReadOnlyMode,
    pub path_separator: String,
    pub follow_function: bool,
    pub follow_array: bool,
    pub follow_non_plain_object: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            value: RuleMap::new(),
            creator: RuleMap::new(),
            setter: RuleMap::new(),
            apply: RuleMap::new(),
            construct: RuleMap::new(),
            read_only: ReadOnlyMode::Off,
            path_separator: DEFAULT_PATH_SEPARATOR.to_string(),
            follow_function: true,
            follow_array: false,
            follow_non_plain_object: false,
        }
    }
}

impl Configuration {
    /// Shallow-merge user options over the defaults
    pub fn normalize(options: ProxyOptions) -> Self {
        let defaults = Self::default();

        Self {
            value: options.value.unwrap_or(defaults.value),
            creator: options.creator.unwrap_or(defaults.creator),
            setter: options.setter.unwrap_or(defaults.setter),
            apply: options.apply.unwrap_or(defaults.apply),
            construct: options.construct.unwrap_or(defaults.construct),
            read_only: options.read_only.unwrap_or(defaults.read_only),
            path_separator: options.path_separator.unwrap_or(defaults.path_separator),
            follow_function: options.follow_function.unwrap_or(defaults.follow_function),
            follow_array: options.follow_array.unwrap_or(defaults.follow_array),
            follow_non_plain_object: options
                .follow_non_plain_object
                .unwrap_or(defaults.follow_non_plain_object),
        }
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("value", &self.value)
            .field("creator", &self.creator)
            .field("setter", &self.setter)
            .field("apply", &self.apply)
            .field("construct", &self.construct)
            .field("read_only", &self.read_only)
            .field("path_separator", &self.path_separator)
            .field("follow_function", &self.follow_function)
            .field("follow_array", &self.follow_array)
            .field("follow_non_plain_object", &self.follow_non_plain_object)
            .finish()
    }
}
