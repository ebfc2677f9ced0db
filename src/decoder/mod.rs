//! Line decoder for the run-log text format.
//!
//! Every line is `<TYPE> <message>`. Most message bodies are `|`-separated
//! fields whose kinds come from [`MessageType::schema`]. Long strings are
//! sent once as memos (`M <id>:<json>`) and later referenced by id.
//!
//! Decoding is lenient at the field level: a field that fails to parse (or
//! references an unknown memo) becomes `null` instead of failing the line.
//! Only a malformed line, an unknown type or a broken memo is an error.

pub mod message_type;

pub use message_type::{FieldKind, FieldSpec, MessageSchema, MessageType};

use crate::model::DecodeError;
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde_json::{Map, Number, Value};
use std::collections::HashMap;

/// One decoded message.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedMessage {
    /// Type of the message.
    pub message_type: MessageType,
    /// Decoded fields, keyed by schema field name.
    pub fields: Map<String, Value>,
}

impl DecodedMessage {
    /// String field, if present and a string.
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    /// Numeric field as `f64`.
    pub fn f64_field(&self, name: &str) -> Option<f64> {
        self.fields.get(name).and_then(Value::as_f64)
    }

    /// Integer field as `i64`.
    pub fn i64_field(&self, name: &str) -> Option<i64> {
        self.fields.get(name).and_then(Value::as_i64)
    }
}

/// Stateful decoder: remembers memos across lines.
#[derive(Debug, Default)]
pub struct MessageDecoder {
    memo: HashMap<String, Value>,
}

impl MessageDecoder {
    /// Create a decoder with an empty memo table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of memorized values.
    pub fn memo_len(&self) -> usize {
        self.memo.len()
    }

    /// Decode one line.
    ///
    /// Returns `Ok(None)` for blank lines and memo lines (which only update
    /// internal state).
    ///
    /// # Errors
    ///
    /// - [`DecodeError::MalformedLine`] if there is no `<TYPE> ` prefix
    /// - [`DecodeError::UnknownMessageType`] for unknown type codes
    /// - [`DecodeError::InvalidMemo`] for memo lines that do not parse
    ///
    /// # Examples
    ///
    /// ```
    /// use runlog::decoder::{MessageDecoder, MessageType};
    ///
    /// let mut decoder = MessageDecoder::new();
    /// assert!(decoder.decode_line(1, "M a:\"my task\"").unwrap().is_none());
    ///
    /// let msg = decoder.decode_line(2, "ST a|a|a|3|0.5").unwrap().unwrap();
    /// assert_eq!(msg.message_type, MessageType::StartTask);
    /// assert_eq!(msg.str_field("name"), Some("my task"));
    /// assert_eq!(msg.i64_field("lineno"), Some(3));
    /// ```
    pub fn decode_line(
        &mut self,
        line_no: usize,
        line: &str,
    ) -> Result<Option<DecodedMessage>, DecodeError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let Some((code, body)) = line.split_once(' ') else {
            return Err(DecodeError::MalformedLine {
                line: line_no,
                content: line.to_string(),
            });
        };

        let message_type =
            MessageType::from_code(code).ok_or_else(|| DecodeError::UnknownMessageType {
                line: line_no,
                message_type: code.to_string(),
            })?;

        let fields = match message_type.schema() {
            MessageSchema::Memo => {
                self.memorize(line_no, body)?;
                return Ok(None);
            }
            MessageSchema::Fields(specs) => self.decode_fields(specs, body),
            MessageSchema::Info => decode_info(body),
            MessageSchema::Time => decode_time(body),
        };

        Ok(Some(DecodedMessage {
            message_type,
            fields,
        }))
    }

    fn memorize(&mut self, line_no: usize, body: &str) -> Result<(), DecodeError> {
        let (id, raw) = body.split_once(':').ok_or_else(|| DecodeError::InvalidMemo {
            line: line_no,
            reason: "missing ':' separator".to_string(),
        })?;
        let value: Value = serde_json::from_str(raw).map_err(|e| DecodeError::InvalidMemo {
            line: line_no,
            reason: e.to_string(),
        })?;
        self.memo.insert(id.to_string(), value);
        Ok(())
    }

    fn decode_fields(&self, specs: &[FieldSpec], body: &str) -> Map<String, Value> {
        // The last field keeps any remaining separators.
        body.splitn(specs.len(), '|')
            .zip(specs)
            .map(|(raw, spec)| (spec.name.to_string(), self.decode_field(spec.kind, raw)))
            .collect()
    }

    fn decode_field(&self, kind: FieldKind, raw: &str) -> Value {
        match kind {
            FieldKind::Oid => self.memo.get(raw).cloned().unwrap_or(Value::Null),
            FieldKind::Int => raw
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or(Value::Null),
            FieldKind::Float => raw
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FieldKind::Str => Value::String(raw.to_string()),
        }
    }
}

fn decode_info(body: &str) -> Map<String, Value> {
    let mut fields = Map::new();
    match serde_json::from_str::<Value>(body) {
        Ok(info) => {
            fields.insert("info".to_string(), info);
        }
        Err(e) => {
            fields.insert("error".to_string(), Value::String(e.to_string()));
        }
    }
    fields
}

/// Normalize the initial time to RFC 3339 UTC. Naive timestamps are taken as UTC.
fn decode_time(body: &str) -> Map<String, Value> {
    let raw = body.trim();
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.and_utc())
        });

    let mut fields = Map::new();
    match parsed {
        Ok(dt) => {
            fields.insert(
                "initial_time".to_string(),
                Value::String(dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
            );
        }
        Err(e) => {
            fields.insert("initial_time".to_string(), Value::String(raw.to_string()));
            fields.insert("error".to_string(), Value::String(e.to_string()));
        }
    }
    fields
}
