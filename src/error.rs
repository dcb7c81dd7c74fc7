use crate::assignment::AssignmentBuilderError;
use notify_rust::error::Error as NotifyError;
use pastey::paste;
use reqwest::{Error as ReqwestError, StatusCode};
use serde_json::Error as JsonError;
use serde_norway::Error as YamlError;
use snafu::{Backtrace, GenerateImplicitData, Snafu};
use std::io::Error as IoError;

#[derive(Snafu, Debug)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("I/O error: {source}"))]
    Io {
        source: IoError,
        backtrace: Backtrace,
    },
    #[snafu(display("Invalid YAML: {source}"))]
    Yaml {
        source: YamlError,
        backtrace: Backtrace,
    },
    #[snafu(display("Invalid JSON: {source}"))]
    Json {
        source: JsonError,
        backtrace: Backtrace,
    },
    #[snafu(display("HTTP request failed: {source}"))]
    Reqwest {
        source: ReqwestError,
        backtrace: Backtrace,
    },
    #[snafu(display("Could not show notification: {source}"))]
    Notify {
        source: NotifyError,
        backtrace: Backtrace,
    },
    #[snafu(display("Incomplete assignment: {source}"))]
    Builder {
        source: AssignmentBuilderError,
        backtrace: Backtrace,
    },
    #[snafu(display("{url} responded with {status}"))]
    UnexpectedStatus { url: String, status: StatusCode },
    #[snafu(display(
        "No API token configured. Set CANVAS_API_TOKEN or run `canvas-tracker config set-token`."
    ))]
    MissingToken,
    #[snafu(display("No upcoming assignments for course: {name}"))]
    UnknownCourse { name: String },
    #[snafu(display("Invalid notification threshold: {hours} (expected one of 1, 3, 6, 12, 24)"))]
    InvalidThreshold { hours: u64 },
    #[snafu(display("{message}"))]
    Other { message: String },
}

impl Error {
    pub fn backtrace(&self) -> Option<&Backtrace> {
        match self {
            Self::Io { backtrace, .. } => Some(backtrace),
            Self::Yaml { backtrace, .. } => Some(backtrace),
            Self::Json { backtrace, .. } => Some(backtrace),
            Self::Reqwest { backtrace, .. } => Some(backtrace),
            Self::Notify { backtrace, .. } => Some(backtrace),
            Self::Builder { backtrace, .. } => Some(backtrace),
            _ => None,
        }
    }

    pub fn simple<S: AsRef<str>>(message: S) -> Self {
        Self::Other {
            message: String::from(message.as_ref()),
        }
    }

    pub fn unknown_course<S: AsRef<str>>(name: S) -> Self {
        Self::UnknownCourse {
            name: String::from(name.as_ref()),
        }
    }

    pub fn unexpected_status<S: AsRef<str>>(url: S, status: StatusCode) -> Self {
        Self::UnexpectedStatus {
            url: String::from(url.as_ref()),
            status,
        }
    }
}

macro_rules! impl_from {
    ($type:path, $error:ident, $base_error:ident) => {
        impl From<$type> for $base_error {
            fn from(error: $type) -> Self {
                Self::$error {
                    source: error,
                    backtrace: Backtrace::generate(),
                }
            }
        }
    };
    ($type:path, $error:ident) => {
        impl_from! { $type, $error, Error }
    };
    ($name:ident) => {
        paste! {
            impl_from! { [<$name Error>], $name }
        }
    };
}

impl_from! {NotifyError, Notify}
impl_from! {AssignmentBuilderError, Builder}
impl_from! {Io}
impl_from! {Yaml}
impl_from! {Json}
impl_from! {Reqwest}

pub type Result<V> = core::result::Result<V, Error>;
