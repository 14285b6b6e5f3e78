//! One suspended function invocation.

use std::collections::BTreeSet;

use crate::editor::EditorWindow;

/// A remote call frame mirrored locally.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Name of the executing function.
    pub function_name: String,
    /// Read-only view of the function's source.
    pub window: EditorWindow,
    /// Names localised in the function header.
    pub local_names: BTreeSet<String>,
}

impl Frame {
    /// Wrap a tracer window, reading locals from its header line.
    pub fn new(window: EditorWindow) -> Self {
        let local_names = window
            .lines()
            .first()
            .map(|header| parse_local_names(header))
            .unwrap_or_default();
        Self {
            function_name: window.name.clone(),
            window,
            local_names,
        }
    }

    /// Interpreter window token.
    pub fn token(&self) -> i64 {
        self.window.token
    }

    /// Label used in the stack list: `Name[line]`.
    pub fn label(&self) -> String {
        match self.window.current_line() {
            Some(line) => format!("{}[{line}]", self.function_name),
            None => self.function_name.clone(),
        }
    }

    /// Re-read locals after the header may have changed.
    pub fn refresh_locals(&mut self) {
        self.local_names = self
            .window
            .lines()
            .first()
            .map(|header| parse_local_names(header))
            .unwrap_or_default();
    }
}

/// Names after the first `;` of a header such as `r←Z x;a;b ⍝ comment`.
pub fn parse_local_names(header: &str) -> BTreeSet<String> {
    let code = header.split('⍝').next().unwrap_or_default();
    code.split(';')
        .skip(1)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
