// tasks/query.rs — dynamic UPDATE statement construction for partial updates.
//
// Builds the one statement in the system whose shape varies per request:
// `UPDATE tasks SET <subset> WHERE id = $n RETURNING *`. Values are only
// ever bound through placeholders, never spliced into the SQL text.

use super::{TaskError, TaskPatch};

/// A generated UPDATE statement plus its SET values in placeholder order.
///
/// The target id is not part of `params`: it is bound by the executor at
/// the final placeholder position (`params.len() + 1`), after every SET
/// value.
#[derive(Debug, PartialEq, Eq)]
pub struct UpdateQuery {
    pub sql: String,
    pub params: Vec<String>,
}

/// Build the partial-update statement for `patch`.
///
/// Each supplied field contributes one `column = $k` fragment, in the
/// fixed order title, description, priority. Placeholder indices are
/// 1-based and derived from the growing value list — omitted fields
/// shift every subsequent index, so a fixed field→index table would be
/// wrong here. The WHERE placeholder always takes the final index.
///
/// Returns `NoFieldsProvided` when no usable field was supplied, so the
/// caller can reject the request before touching the store.
pub fn build_update(patch: &TaskPatch) -> Result<UpdateQuery, TaskError> {
    let supplied = patch.supplied_fields();
    if supplied.is_empty() {
        return Err(TaskError::NoFieldsProvided);
    }

    let mut fragments = Vec::with_capacity(supplied.len());
    let mut params = Vec::with_capacity(supplied.len());
    for (column, value) in supplied {
        fragments.push(format!("{} = ${}", column, params.len() + 1));
        params.push(value.to_string());
    }

    let sql = format!(
        "UPDATE tasks SET {} WHERE id = ${} RETURNING *",
        fragments.join(", "),
        params.len() + 1
    );

    Ok(UpdateQuery { sql, params })
}
