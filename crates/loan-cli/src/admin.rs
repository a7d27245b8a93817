//! Admin console arguments.

use std::io::{self, BufRead};
use std::str::FromStr;

use loan_admin::{EditSession, Result};
use thiserror::Error;

/// `--set` argument that is not `INDEX:FIELD=VALUE`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected INDEX:FIELD=VALUE, got '{0}'")]
pub struct AssignmentSyntax(String);

/// One `INDEX:FIELD=VALUE` edit. The value may be empty or contain `=`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAssignment {
    pub index: usize,
    pub field: String,
    pub value: String,
}

impl FromStr for FieldAssignment {
    type Err = AssignmentSyntax;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let syntax = || AssignmentSyntax(s.to_string());
        let (index, rest) = s.split_once(':').ok_or_else(syntax)?;
        let (field, value) = rest.split_once('=').ok_or_else(syntax)?;
        let index = index.trim().parse().map_err(|_| syntax())?;
        if field.trim().is_empty() {
            return Err(syntax());
        }
        Ok(Self {
            index,
            field: field.trim().to_string(),
            value: value.to_string(),
        })
    }
}

/// Stages `sets`, then `removes`, on `session`.
///
/// Indexes refer to rows as listed before any edit: assignments run first
/// and removals go from the highest index down. The first failure stops
/// staging; the session should then be discarded.
pub fn stage_edits(
    session: &mut EditSession,
    sets: &[FieldAssignment],
    removes: &[usize],
) -> Result<()> {
    for assignment in sets {
        session.set_field(assignment.index, &assignment.field, &assignment.value)?;
    }
    let mut removes = removes.to_vec();
    removes.sort_unstable_by(|a, b| b.cmp(a));
    removes.dedup();
    for index in removes {
        session.remove(index)?;
    }
    Ok(())
}

/// Reads a password attempt from the first line of `reader`.
///
/// Only the line ending is stripped; other whitespace is part of the
/// attempt. Empty input reads as a blank attempt.
pub fn read_password<R: BufRead>(mut reader: R) -> io::Result<String> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    let len = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(len);
    Ok(line)
}
