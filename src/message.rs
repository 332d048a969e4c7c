//! Reminder message formatting.
//!
//! Bodies use WhatsApp markdown: `*bold*` for the header and title,
//! `_italic_` for the footer.

use crate::models::task::Task;

const HEADER: &str = "📋 *Task Reminder*";
const DUE_LINE: &str = "Due: Today";
const FOOTER: &str = "_Sent from your To-Do App_";

/// Render the notification body for `task`.
///
/// The category line is omitted entirely when the task has no category.
#[must_use]
pub fn reminder_body(task: &Task) -> String {
    let mut body = format!(
        "{HEADER}\n\n{marker} *{title}*\n\nPriority: {priority}\n",
        marker = task.priority_marker(),
        title = task.task,
        priority = task.priority_label(),
    );
    if let Some(ref category) = task.category {
        body.push_str(&format!("Category: {category}\n"));
    }
    body.push_str(DUE_LINE);
    body.push_str("\n\n");
    body.push_str(FOOTER);
    body
}
