//! Expectations the runner asserts against API responses.
//!
//! Every helper either returns the checked value or a [`SmokeError::Assertion`]
//! naming the exact expectation that failed and what was observed instead.

use serde_json::Value;

use crate::client::ApiResponse;
use crate::error::SmokeError;
use crate::report::Step;

/// A single expectation about a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    Status(u16),
    NotStatus(u16),
    JsonBody,
    Field(&'static str),
    AbsentField(&'static str),
    NonEmptyString(&'static str),
    IntegerField(&'static str),
    ArrayField(&'static str),
    CountMatchesData,
    ObjectRecords,
    ConsistentStatuses,
}

impl std::fmt::Display for Expectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expectation::Status(code) => write!(f, "status {code}"),
            Expectation::NotStatus(code) => write!(f, "a status other than {code}"),
            Expectation::JsonBody => write!(f, "a JSON object body"),
            Expectation::Field(name) => write!(f, "field `{name}` to be present"),
            Expectation::AbsentField(name) => write!(f, "no `{name}` field"),
            Expectation::NonEmptyString(name) => {
                write!(f, "field `{name}` to be a non-empty string")
            }
            Expectation::IntegerField(name) => {
                write!(f, "field `{name}` to be a non-negative integer")
            }
            Expectation::ArrayField(name) => write!(f, "field `{name}` to be an array"),
            Expectation::CountMatchesData => {
                write!(f, "`count` to equal the number of `data` records")
            }
            Expectation::ObjectRecords => write!(f, "every `data` record to be an object"),
            Expectation::ConsistentStatuses => {
                write!(f, "the same status codes as the first iteration")
            }
        }
    }
}

/// Type of a JSON value as it reads in failure messages
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

pub fn expect_status(step: Step, response: &ApiResponse, expected: u16) -> Result<(), SmokeError> {
    if response.status == expected {
        Ok(())
    } else {
        Err(SmokeError::assertion(
            step,
            Expectation::Status(expected),
            response.describe_status(),
        ))
    }
}

pub fn expect_not_status(
    step: Step,
    response: &ApiResponse,
    rejected: u16,
) -> Result<(), SmokeError> {
    if response.status == rejected {
        Err(SmokeError::assertion(
            step,
            Expectation::NotStatus(rejected),
            response.describe_status(),
        ))
    } else {
        Ok(())
    }
}

fn expect_object<'a>(
    step: Step,
    response: &'a ApiResponse,
) -> Result<&'a serde_json::Map<String, Value>, SmokeError> {
    match &response.body {
        Some(Value::Object(map)) => Ok(map),
        Some(other) => Err(SmokeError::assertion(
            step,
            Expectation::JsonBody,
            format!("{} body", kind_of(other)),
        )),
        None => Err(SmokeError::assertion(
            step,
            Expectation::JsonBody,
            format!("a non-JSON body ({} bytes)", response.raw.len()),
        )),
    }
}

/// Require a field to be present and non-null
pub fn expect_field<'a>(
    step: Step,
    response: &'a ApiResponse,
    name: &'static str,
) -> Result<&'a Value, SmokeError> {
    let body = expect_object(step, response)?;
    match body.get(name) {
        Some(Value::Null) => Err(SmokeError::assertion(
            step,
            Expectation::Field(name),
            "null",
        )),
        Some(value) => Ok(value),
        None => Err(SmokeError::assertion(
            step,
            Expectation::Field(name),
            "field missing",
        )),
    }
}

/// Require a field to be absent or null. A non-JSON body passes.
pub fn expect_absent(
    step: Step,
    response: &ApiResponse,
    name: &'static str,
) -> Result<(), SmokeError> {
    let present = response
        .body
        .as_ref()
        .and_then(|body| body.get(name))
        .map_or(false, |value| !value.is_null());
    if present {
        Err(SmokeError::assertion(
            step,
            Expectation::AbsentField(name),
            format!("`{name}` present"),
        ))
    } else {
        Ok(())
    }
}

pub fn expect_non_empty_string<'a>(
    step: Step,
    response: &'a ApiResponse,
    name: &'static str,
) -> Result<&'a str, SmokeError> {
    match expect_field(step, response, name)? {
        Value::String(s) if !s.is_empty() => Ok(s),
        Value::String(_) => Err(SmokeError::assertion(
            step,
            Expectation::NonEmptyString(name),
            "an empty string",
        )),
        other => Err(SmokeError::assertion(
            step,
            Expectation::NonEmptyString(name),
            kind_of(other),
        )),
    }
}

/// Require an integer-like, non-negative number. `3.0` is accepted, `3.5` is not.
pub fn expect_non_negative_integer(
    step: Step,
    response: &ApiResponse,
    name: &'static str,
) -> Result<u64, SmokeError> {
    let value = expect_field(step, response, name).map_err(|err| match err {
        SmokeError::Assertion {
            expectation: Expectation::Field(_),
            actual,
            ..
        } => SmokeError::assertion(step, Expectation::IntegerField(name), actual),
        other => other,
    })?;

    let integer = value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|n| *n >= 0.0 && n.fract() == 0.0 && *n <= u64::MAX as f64)
            .map(|n| n as u64)
    });

    integer.ok_or_else(|| {
        SmokeError::assertion(step, Expectation::IntegerField(name), value.to_string())
    })
}

pub fn expect_array<'a>(
    step: Step,
    response: &'a ApiResponse,
    name: &'static str,
) -> Result<&'a Vec<Value>, SmokeError> {
    let body = expect_object(step, response)?;
    match body.get(name) {
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(SmokeError::assertion(
            step,
            Expectation::ArrayField(name),
            kind_of(other),
        )),
        None => Err(SmokeError::assertion(
            step,
            Expectation::ArrayField(name),
            "field missing",
        )),
    }
}
