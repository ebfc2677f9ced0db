//! Message type codes of the run-log text format and their field schemas.

use std::fmt;

/// How a single `|`-separated field is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Memo id resolved through the decoder's memo table.
    Oid,
    /// Signed integer.
    Int,
    /// Floating point number.
    Float,
    /// Raw string.
    Str,
}

/// Name and kind of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name in the decoded map.
    pub name: &'static str,
    /// Decoding applied to the raw text.
    pub kind: FieldKind,
}

const fn oid(name: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::Oid,
    }
}

const fn int(name: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::Int,
    }
}

const fn float(name: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::Float,
    }
}

const fn string(name: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::Str,
    }
}

const VERSION: &[FieldSpec] = &[string("version")];
const ID: &[FieldSpec] = &[int("part"), string("id")];
const LOG: &[FieldSpec] = &[
    string("level"),
    oid("message"),
    oid("source"),
    int("lineno"),
    float("time_delta_in_seconds"),
];
const START_RUN: &[FieldSpec] = &[oid("name"), float("time_delta_in_seconds")];
const END_RUN: &[FieldSpec] = &[oid("status"), float("time_delta_in_seconds")];
const START_TASK: &[FieldSpec] = &[
    oid("name"),
    oid("libname"),
    oid("source"),
    int("lineno"),
    float("time_delta_in_seconds"),
];
const END_TASK: &[FieldSpec] = &[oid("status"), oid("message"), float("time_delta_in_seconds")];
const START_ELEMENT: &[FieldSpec] = &[
    oid("name"),
    oid("libname"),
    oid("type"),
    oid("doc"),
    oid("source"),
    int("lineno"),
    float("time_delta_in_seconds"),
];
const YIELD_RESUME: &[FieldSpec] = START_TASK;
const END_ELEMENT: &[FieldSpec] = &[oid("type"), oid("status"), float("time_delta_in_seconds")];
const YIELD_SUSPEND: &[FieldSpec] = &[
    oid("name"),
    oid("libname"),
    oid("source"),
    int("lineno"),
    oid("type"),
    oid("value"),
    float("time_delta_in_seconds"),
];
const YIELD_FROM_SUSPEND: &[FieldSpec] = START_TASK;
const ASSIGN: &[FieldSpec] = &[
    oid("source"),
    int("lineno"),
    oid("target"),
    oid("type"),
    oid("value"),
    float("time_delta_in_seconds"),
];
const ELEMENT_ARGUMENT: &[FieldSpec] = &[oid("name"), oid("type"), oid("value")];
const TAG: &[FieldSpec] = &[oid("tag")];
const START_TIME: &[FieldSpec] = &[float("start_time_delta")];
const START_TRACEBACK: &[FieldSpec] = &[oid("message"), float("time_delta_in_seconds")];
const TRACEBACK_ENTRY: &[FieldSpec] = &[
    oid("source"),
    int("lineno"),
    oid("method"),
    oid("line_content"),
];
const TRACEBACK_VARIABLE: &[FieldSpec] = &[oid("name"), oid("type"), oid("value")];
const END_TRACEBACK: &[FieldSpec] = &[float("time_delta_in_seconds")];

/// How a message body is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageSchema {
    /// `|`-separated typed fields.
    Fields(&'static [FieldSpec]),
    /// Body is a JSON document.
    Info,
    /// Body is an ISO-8601 timestamp.
    Time,
    /// Body is `<id>:<json value>` and only updates the memo table.
    Memo,
}

/// Every message type the decoder understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    /// `V`: format version.
    Version,
    /// `I`: informational JSON.
    Info,
    /// `ID`: run id, possibly split into parts.
    Id,
    /// `T`: initial time.
    Time,
    /// `M`: memorize a value for later `oid` references.
    Memo,
    /// `L`: plain-text log message.
    Log,
    /// `LH`: HTML log message.
    LogHtml,
    /// `SR`: start run.
    StartRun,
    /// `RR`: restate run (continuation of a split log).
    RestartRun,
    /// `ER`: end run.
    EndRun,
    /// `ST`: start task.
    StartTask,
    /// `RT`: restate task.
    RestartTask,
    /// `ET`: end task.
    EndTask,
    /// `SE`: start element.
    StartElement,
    /// `RE`: restate element.
    RestartElement,
    /// `EE`: end element.
    EndElement,
    /// `YR`: generator resumed.
    YieldResume,
    /// `RYR`: restate generator resume.
    RestartYieldResume,
    /// `YFR`: `yield from` resumed.
    YieldFromResume,
    /// `YS`: generator suspended with a value.
    YieldSuspend,
    /// `YFS`: `yield from` suspended.
    YieldFromSuspend,
    /// `AS`: assignment.
    Assign,
    /// `EA`: argument of the current element.
    ElementArgument,
    /// `TG`: tag on the current scope.
    Tag,
    /// `S`: start time of the current scope.
    StartTime,
    /// `STB`: start traceback.
    StartTraceback,
    /// `RTB`: restate traceback.
    RestartTraceback,
    /// `TBE`: traceback frame.
    TracebackEntry,
    /// `TBV`: variable of the last traceback frame.
    TracebackVariable,
    /// `ETB`: end traceback.
    EndTraceback,
}

impl MessageType {
    /// Parse a message type code.
    pub fn from_code(code: &str) -> Option<Self> {
        let ty = match code {
            "V" => MessageType::Version,
            "I" => MessageType::Info,
            "ID" => MessageType::Id,
            "T" => MessageType::Time,
            "M" => MessageType::Memo,
            "L" => MessageType::Log,
            "LH" => MessageType::LogHtml,
            "SR" => MessageType::StartRun,
            "RR" => MessageType::RestartRun,
            "ER" => MessageType::EndRun,
            "ST" => MessageType::StartTask,
            "RT" => MessageType::RestartTask,
            "ET" => MessageType::EndTask,
            "SE" => MessageType::StartElement,
            "RE" => MessageType::RestartElement,
            "EE" => MessageType::EndElement,
            "YR" => MessageType::YieldResume,
            "RYR" => MessageType::RestartYieldResume,
            "YFR" => MessageType::YieldFromResume,
            "YS" => MessageType::YieldSuspend,
            "YFS" => MessageType::YieldFromSuspend,
            "AS" => MessageType::Assign,
            "EA" => MessageType::ElementArgument,
            "TG" => MessageType::Tag,
            "S" => MessageType::StartTime,
            "STB" => MessageType::StartTraceback,
            "RTB" => MessageType::RestartTraceback,
            "TBE" => MessageType::TracebackEntry,
            "TBV" => MessageType::TracebackVariable,
            "ETB" => MessageType::EndTraceback,
            _ => return None,
        };
        Some(ty)
    }

    /// The wire code of this type.
    pub fn code(self) -> &'static str {
        match self {
            MessageType::Version => "V",
            MessageType::Info => "I",
            MessageType::Id => "ID",
            MessageType::Time => "T",
            MessageType::Memo => "M",
            MessageType::Log => "L",
            MessageType::LogHtml => "LH",
            MessageType::StartRun => "SR",
            MessageType::RestartRun => "RR",
            MessageType::EndRun => "ER",
            MessageType::StartTask => "ST",
            MessageType::RestartTask => "RT",
            MessageType::EndTask => "ET",
            MessageType::StartElement => "SE",
            MessageType::RestartElement => "RE",
            MessageType::EndElement => "EE",
            MessageType::YieldResume => "YR",
            MessageType::RestartYieldResume => "RYR",
            MessageType::YieldFromResume => "YFR",
            MessageType::YieldSuspend => "YS",
            MessageType::YieldFromSuspend => "YFS",
            MessageType::Assign => "AS",
            MessageType::ElementArgument => "EA",
            MessageType::Tag => "TG",
            MessageType::StartTime => "S",
            MessageType::StartTraceback => "STB",
            MessageType::RestartTraceback => "RTB",
            MessageType::TracebackEntry => "TBE",
            MessageType::TracebackVariable => "TBV",
            MessageType::EndTraceback => "ETB",
        }
    }

    /// How the body of this message is decoded.
    pub fn schema(self) -> MessageSchema {
        use MessageSchema::Fields;
        match self {
            MessageType::Version => Fields(VERSION),
            MessageType::Info => MessageSchema::Info,
            MessageType::Id => Fields(ID),
            MessageType::Time => MessageSchema::Time,
            MessageType::Memo => MessageSchema::Memo,
            MessageType::Log | MessageType::LogHtml => Fields(LOG),
            MessageType::StartRun | MessageType::RestartRun => Fields(START_RUN),
            MessageType::EndRun => Fields(END_RUN),
            MessageType::StartTask | MessageType::RestartTask => Fields(START_TASK),
            MessageType::EndTask => Fields(END_TASK),
            MessageType::StartElement | MessageType::RestartElement => Fields(START_ELEMENT),
            MessageType::EndElement => Fields(END_ELEMENT),
            MessageType::YieldResume
            | MessageType::RestartYieldResume
            | MessageType::YieldFromResume => Fields(YIELD_RESUME),
            MessageType::YieldSuspend => Fields(YIELD_SUSPEND),
            MessageType::YieldFromSuspend => Fields(YIELD_FROM_SUSPEND),
            MessageType::Assign => Fields(ASSIGN),
            MessageType::ElementArgument => Fields(ELEMENT_ARGUMENT),
            MessageType::Tag => Fields(TAG),
            MessageType::StartTime => Fields(START_TIME),
            MessageType::StartTraceback | MessageType::RestartTraceback => Fields(START_TRACEBACK),
            MessageType::TracebackEntry => Fields(TRACEBACK_ENTRY),
            MessageType::TracebackVariable => Fields(TRACEBACK_VARIABLE),
            MessageType::EndTraceback => Fields(END_TRACEBACK),
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_CODES: &[&str] = &[
        "V", "I", "ID", "T", "M", "L", "LH", "SR", "RR", "ER", "ST", "RT", "ET", "SE", "RE",
        "EE", "YR", "RYR", "YFR", "YS", "YFS", "AS", "EA", "TG", "S", "STB", "RTB", "TBE", "TBV",
        "ETB",
    ];

    #[test]
    fn every_code_maps_back_to_itself() {
        for code in ALL_CODES {
            let ty = MessageType::from_code(code).expect("known code");
            assert_eq!(ty.code(), *code);
        }
    }

    #[test]
    fn unknown_code_is_none() {
        assert_eq!(MessageType::from_code("XX"), None);
        assert_eq!(MessageType::from_code(""), None);
    }

    #[test]
    fn restart_types_share_start_schemas() {
        assert_eq!(MessageType::RestartRun.schema(), MessageType::StartRun.schema());
        assert_eq!(MessageType::RestartTask.schema(), MessageType::StartTask.schema());
        assert_eq!(
            MessageType::RestartElement.schema(),
            MessageType::StartElement.schema()
        );
        assert_eq!(
            MessageType::RestartYieldResume.schema(),
            MessageType::YieldResume.schema()
        );
    }

    #[test]
    fn log_schema_field_order() {
        let MessageSchema::Fields(fields) = MessageType::Log.schema() else {
            panic!("log uses field schema");
        };
        let names: Vec<_> = fields.iter().map(|f| f.name).collect();
        assert_eq!(
            names,
            ["level", "message", "source", "lineno", "time_delta_in_seconds"]
        );
        assert_eq!(fields[0].kind, FieldKind::Str);
        assert_eq!(fields[1].kind, FieldKind::Oid);
    }
}
