use chrono::NaiveDateTime;
use diesel::prelude::*;
use helpers::validations::validations::CommentBody;
use lib_config::session::notice::Notice;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::comments;

pub const SUBMITTED: &str = "Comment submitted and awaiting approval";
pub const UPDATED: &str = "Comment Updated!";
pub const UPDATE_FAILED: &str = "Error updating comment!";
pub const DELETED: &str = "Comment deleted!";
pub const NOT_YOUR_COMMENT: &str = "You can only delete your own comments!";

#[derive(Queryable, Selectable, Identifiable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub body: String,
    pub approved: bool,
    pub created_on: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = comments)]
pub struct NewComment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub body: String,
    pub approved: bool,
    pub created_on: NaiveDateTime,
}

impl NewComment {
    /// A fresh comment always starts out pending moderation.
    pub fn pending(post_id: Uuid, author_id: Uuid, body: CommentBody, now: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            author_id,
            body: body.into_inner(),
            approved: false,
            created_on: now,
        }
    }
}

/// An author's edit: new text, and back into the moderation queue.
#[derive(AsChangeset, Debug, PartialEq)]
#[diesel(table_name = comments)]
pub struct CommentEdit {
    pub body: String,
    pub approved: bool,
}

#[derive(Deserialize, Debug)]
pub struct CommentForm {
    #[serde(default)]
    pub body: String,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct CommentView {
    pub id: Uuid,
    pub author: String,
    pub body: String,
    pub approved: bool,
    pub created_on: NaiveDateTime,
}

/// Comments a viewer may see: approved ones plus the viewer's own pending ones.
/// Input order is kept.
pub fn visible_comments(rows: Vec<(Comment, String)>, viewer: Option<Uuid>) -> Vec<CommentView> {
    rows.into_iter()
        .filter(|(comment, _)| comment.approved || Some(comment.author_id) == viewer)
        .map(|(comment, author)| CommentView {
            id: comment.id,
            author,
            body: comment.body,
            approved: comment.approved,
            created_on: comment.created_on,
        })
        .collect()
}

pub fn approved_count(rows: &[(Comment, String)]) -> usize {
    rows.iter().filter(|(comment, _)| comment.approved).count()
}

/// Decides an edit request: the changeset to apply, or the notice explaining
/// why nothing changes.
pub fn plan_edit(comment: &Comment, user_id: Uuid, body: String) -> Result<CommentEdit, Notice> {
    if comment.author_id != user_id {
        return Err(Notice::error(UPDATE_FAILED));
    }
    let body = CommentBody::parse(body).map_err(|_| Notice::error(UPDATE_FAILED))?;
    Ok(CommentEdit {
        body: body.into_inner(),
        approved: false,
    })
}

/// Decides a delete request; only the author may delete.
pub fn plan_delete(comment: &Comment, user_id: Uuid) -> Result<(), Notice> {
    if comment.author_id == user_id {
        Ok(())
    } else {
        Err(Notice::error(NOT_YOUR_COMMENT))
    }
}
