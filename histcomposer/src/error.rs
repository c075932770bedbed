// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Error types for histogram composition.
//!
//! Every fallible operation returns [`Error`]. Its [`ErrorKind`] separates inputs that can
//! never work ([`ErrorKind::ConfigInvalid`]) from budgets that are simply too small for the
//! requested ranges ([`ErrorKind::Infeasible`]); the latter is a normal outcome a driver is
//! expected to record and move past.

use std::fmt;

/// The kind of an [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The inputs handed to a builder, partitioner or selector are invalid.
    ConfigInvalid,
    /// No assignment of one candidate per range fits the resource budget.
    Infeasible,
}

impl ErrorKind {
    /// Name of the kind, as printed in messages.
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorKind::ConfigInvalid => "ConfigInvalid",
            ErrorKind::Infeasible => "Infeasible",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by histcomposer operations.
///
/// Besides its kind and message, an error carries ordered key/value context (the range that
/// ran out of resources, the budget left at that point, ...) and optionally the error that
/// caused it.
pub struct Error {
    kind: ErrorKind,
    message: String,
    context: Vec<(&'static str, String)>,
    source: Option<anyhow::Error>,
}

impl Error {
    /// Creates an error with no context.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: vec![],
            source: None,
        }
    }

    /// Shorthand for an [`ErrorKind::ConfigInvalid`] error.
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    /// Shorthand for an [`ErrorKind::Infeasible`] error.
    pub fn infeasible(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Infeasible, message)
    }

    /// Appends a context entry.
    pub fn with_context(mut self, key: &'static str, value: impl ToString) -> Self {
        self.context.push((key, value.to_string()));
        self
    }

    /// Attaches the underlying cause.
    ///
    /// # Panics
    ///
    /// Panics if a source is already attached.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::error::Error as _;
    /// use histcomposer::error::Error;
    ///
    /// let error = Error::config_invalid("cannot read samples");
    /// assert!(error.source().is_none());
    /// let error = error.set_source(std::io::Error::other("truncated file"));
    /// assert!(error.source().is_some());
    /// ```
    pub fn set_source(mut self, src: impl Into<anyhow::Error>) -> Self {
        assert!(self.source.is_none(), "the source error has been set");
        self.source = Some(src.into());
        self
    }

    /// The error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns true for [`ErrorKind::Infeasible`].
    pub fn is_infeasible(&self) -> bool {
        self.kind == ErrorKind::Infeasible
    }

    /// The message, without context.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Context entries in insertion order.
    pub fn context(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.context.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// The first value recorded under `key`, if any.
    pub fn context_value(&self, key: &str) -> Option<&str> {
        self.context().find(|(k, _)| *k == key).map(|(_, v)| v)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.as_str())?;
        for (i, (key, value)) in self.context.iter().enumerate() {
            let sep = if i == 0 { ", context: { " } else { ", " };
            write!(f, "{sep}{key}: {value}")?;
        }
        if !self.context.is_empty() {
            f.write_str(" }")?;
        }
        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }
        if let Some(source) = &self.source {
            write!(f, ", source: {source}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            return f
                .debug_struct("Error")
                .field("kind", &self.kind)
                .field("message", &self.message)
                .field("context", &self.context)
                .field("source", &self.source)
                .finish();
        }

        write!(f, "{}", self.kind)?;
        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }
        for (key, value) in &self.context {
            write!(f, "\n    {key}: {value}")?;
        }
        if let Some(source) = &self.source {
            write!(f, "\ncaused by: {source:#}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|v| v.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_context() {
        let err = Error::infeasible("out of resources")
            .with_context("range", 3)
            .with_context("remaining", "(10, 20, 0, 0)");
        assert_eq!(
            err.to_string(),
            "Infeasible, context: { range: 3, remaining: (10, 20, 0, 0) } => out of resources"
        );
        assert!(err.is_infeasible());
        assert_eq!(err.context_value("range"), Some("3"));
        assert_eq!(err.context_value("missing"), None);
    }

    #[test]
    fn test_debug_lists_context_and_source() {
        let err = Error::config_invalid("bad budget")
            .with_context("budget", "(-1, 0, 0, 0)")
            .set_source(anyhow::anyhow!("negative component"));
        assert_eq!(
            format!("{err:?}"),
            "ConfigInvalid => bad budget\n    budget: (-1, 0, 0, 0)\ncaused by: negative component"
        );
        assert_eq!(
            err.to_string(),
            "ConfigInvalid, context: { budget: (-1, 0, 0, 0) } => bad budget, \
             source: negative component"
        );
    }

    #[test]
    #[should_panic(expected = "the source error has been set")]
    fn test_source_set_twice_panics() {
        let _ = Error::config_invalid("bad")
            .set_source(anyhow::anyhow!("first"))
            .set_source(anyhow::anyhow!("second"));
    }
}
