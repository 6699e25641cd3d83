// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::CollectionKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    pub fn new(title: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            severity,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new("Info", message, Severity::Info)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new("Error!", message, Severity::Error)
    }

    pub fn load_failed(kind: CollectionKind, detail: &str) -> Self {
        let mut message = format!("Failed to load {} data", kind.singular());
        if !detail.is_empty() {
            message.push_str(": ");
            message.push_str(detail);
        }
        Self::error(message)
    }

    pub fn deleted(kind: CollectionKind) -> Self {
        Self::new(
            "Deleted!",
            format!("{} has been deleted successfully.", capitalize(kind.singular())),
            Severity::Success,
        )
    }

    pub fn delete_failed(kind: CollectionKind, detail: &str) -> Self {
        let detail = if detail.trim().is_empty() {
            "request failed"
        } else {
            detail
        };
        Self::error(format!("Error deleting {}: {detail}", kind.singular()))
    }

    pub fn session_expired() -> Self {
        Self::new(
            "Session Expired",
            "Please login again.",
            Severity::Warning,
        )
    }

    pub fn display(&self) -> String {
        format!("{} {}", self.title, self.message)
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
