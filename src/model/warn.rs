//! Warning descriptors attached to configured functions.

use crate::base::split_names;

/// Severity of a configured warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Style,
    Warning,
    Performance,
    Portability,
    Error,
    Information,
}

impl Severity {
    pub fn from_name(name: &str) -> Severity {
        match name {
            "warning" => Severity::Warning,
            "performance" => Severity::Performance,
            "portability" => Severity::Portability,
            "error" => Severity::Error,
            "information" => Severity::Information,
            _ => Severity::Style,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Style => "style",
            Severity::Warning => "warning",
            Severity::Performance => "performance",
            Severity::Portability => "portability",
            Severity::Error => "error",
            Severity::Information => "information",
        }
    }
}

/// Minimum language-standard floors a warning applies from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Standards {
    /// C standard year: 89, 99, 11, 17, 23 (two-digit form).
    pub c: u32,
    /// C++ standard year: 3 (03), 11, 14, 17, 20, 23.
    pub cpp: u32,
}

impl Default for Standards {
    fn default() -> Self {
        Standards { c: 89, cpp: 3 }
    }
}

impl Standards {
    /// Parse a `cstd` attribute (`"c99"`); false on unknown values.
    pub fn set_c(&mut self, name: &str) -> bool {
        match name {
            "c89" => self.c = 89,
            "c99" => self.c = 99,
            "c11" => self.c = 11,
            "c17" => self.c = 17,
            "c23" => self.c = 23,
            _ => return false,
        }
        true
    }

    /// Parse a `cppstd` attribute (`"c++11"`); false on unknown values.
    pub fn set_cpp(&mut self, name: &str) -> bool {
        match name {
            "c++03" => self.cpp = 3,
            "c++11" => self.cpp = 11,
            "c++14" => self.cpp = 14,
            "c++17" => self.cpp = 17,
            "c++20" => self.cpp = 20,
            "c++23" => self.cpp = 23,
            _ => return false,
        }
        true
    }
}

/// One configured warning: severity, standard floors and the user-facing
/// message.
#[derive(Debug, Clone, Default)]
pub struct WarnInfo {
    pub severity: Severity,
    pub standards: Standards,
    pub message: String,
}

/// Synthesize the warning message from a reason plus alternatives list:
/// `"<reason> function 'name' called. It is recommended to use 'a', 'b' or
/// 'c' instead."`.
pub fn compose_warn_message(reason: &str, function: &str, alternatives: &str) -> String {
    let mut message = format!("{reason} function '{function}' called. It is recommended to use ");
    let alt = split_names(alternatives);
    for (i, name) in alt.iter().enumerate() {
        message.push('\'');
        message.push_str(name);
        message.push('\'');
        if i + 2 == alt.len() {
            message.push_str(" or ");
        } else if i + 1 == alt.len() {
            message.push_str(" instead.");
        } else {
            message.push_str(", ");
        }
    }
    message
}
