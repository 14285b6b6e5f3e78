//! Variable listing for the variables pane.
//!
//! Switching between local and all scope is a view toggle: it only changes
//! which names are requested and shown. Values arrive asynchronously as
//! `ValueTip` replies matched by request token.

use std::collections::{BTreeMap, BTreeSet};

use crate::protocol::command;
use crate::protocol::Message;

/// Which names the pane lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    /// Names localised in the executing function.
    #[default]
    Local,
    /// Every visible name.
    All,
}

impl Scope {
    /// Title tag.
    pub fn label(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::All => "all",
        }
    }

    /// The other scope.
    pub fn toggled(self) -> Self {
        match self {
            Self::Local => Self::All,
            Self::All => Self::Local,
        }
    }
}

/// One displayed row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableRow {
    /// Variable name.
    pub name: String,
    /// Rendered value, empty until the tip arrives.
    pub value: String,
    /// Localised in the executing function.
    pub local: bool,
}

/// Names, values and outstanding requests.
#[derive(Debug, Default)]
pub struct VariableTable {
    scope: Scope,
    locals: BTreeSet<String>,
    visible: Vec<String>,
    values: BTreeMap<String, String>,
    pending: BTreeMap<i64, String>,
}

impl VariableTable {
    /// Empty table in local scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current scope.
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Switch scope and refresh.
    pub fn toggle_scope(&mut self, locals: &BTreeSet<String>, has_frames: bool, tokens: &mut i64) -> Vec<Message> {
        self.scope = self.scope.toggled();
        self.refresh(locals, has_frames, tokens)
    }

    /// Re-request names for the current scope.
    ///
    /// With a frame in local scope the names come from its header; otherwise
    /// the workspace tree is listed and values follow the reply.
    pub fn refresh(&mut self, locals: &BTreeSet<String>, has_frames: bool, tokens: &mut i64) -> Vec<Message> {
        self.locals.clone_from(locals);
        self.pending.clear();
        if self.scope == Scope::Local && has_frames {
            self.visible = locals.iter().cloned().collect();
            self.request_values(tokens)
        } else {
            vec![command::tree_list(0)]
        }
    }

    /// Apply a `ReplyTreeList` for the root node.
    pub fn apply_tree_list(&mut self, names: Vec<String>, tokens: &mut i64) -> Vec<Message> {
        let mut names = names;
        if self.scope == Scope::All {
            for local in &self.locals {
                if !names.contains(local) {
                    names.push(local.clone());
                }
            }
        }
        names.sort();
        names.dedup();
        self.visible = names;
        self.request_values(tokens)
    }

    /// Apply a `ValueTip`. Returns false for tokens this table did not issue.
    pub fn apply_value_tip(&mut self, token: i64, tip: &[String]) -> bool {
        let Some(name) = self.pending.remove(&token) else {
            return false;
        };
        self.values.insert(name, tip.join(" "));
        true
    }

    /// Rows in display order.
    pub fn rows(&self) -> Vec<VariableRow> {
        self.visible
            .iter()
            .map(|name| VariableRow {
                name: name.clone(),
                value: self.values.get(name).cloned().unwrap_or_default(),
                local: self.locals.contains(name),
            })
            .collect()
    }

    fn request_values(&mut self, tokens: &mut i64) -> Vec<Message> {
        self.visible
            .iter()
            .map(|name| {
                *tokens += 1;
                self.pending.insert(*tokens, name.clone());
                command::get_value_tip(name, 0, *tokens)
            })
            .collect()
    }
}
