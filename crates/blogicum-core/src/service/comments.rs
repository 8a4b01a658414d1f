//! Comment add/edit/delete.

use super::{BlogService, Outcome, Redirect};
use crate::domain::{Actor, Comment, NewComment};
use crate::error::DomainError;
use crate::forms::{self, CommentInput, FieldErrors};

/// The edit comment form.
#[derive(Debug, Clone)]
pub struct CommentForm {
    pub post_id: i64,
    pub comment: Comment,
    pub input: CommentInput,
    pub errors: FieldErrors,
}

/// Confirmation page shown before a comment is deleted.
#[derive(Debug, Clone)]
pub struct CommentDeletion {
    pub post_id: i64,
    pub comment: Comment,
}

impl BlogService {
    /// Attach a comment to any existing post.
    ///
    /// The post is looked up by id alone, so a post the actor cannot see is
    /// still commentable. Invalid input is dropped and the client is sent
    /// back to the post either way.
    pub async fn add_comment(
        &self,
        actor: &Actor,
        post_id: i64,
        input: CommentInput,
    ) -> Result<Redirect, DomainError> {
        let post = self.get_post(post_id).await?;

        match forms::validate_comment(&input) {
            Ok(valid) => {
                let comment = self
                    .repos
                    .comments
                    .create(NewComment {
                        text: valid.text,
                        post_id: post.id,
                        author_id: actor.user_id,
                    })
                    .await?;
                tracing::info!(
                    comment_id = comment.id,
                    post_id,
                    author = %actor.username,
                    "Comment added"
                );
            }
            Err(errors) => {
                tracing::debug!(post_id, ?errors, "Comment rejected");
            }
        }

        Ok(Redirect::PostDetail(post_id))
    }

    pub async fn edit_comment(
        &self,
        actor: &Actor,
        post_id: i64,
        comment_id: i64,
        form: Option<CommentInput>,
    ) -> Result<Outcome<CommentForm>, DomainError> {
        let comment = self.get_comment(comment_id).await?;
        if !actor.owns(comment.author_id) {
            tracing::debug!(comment_id, actor = %actor.username, "Edit refused, not the author");
            return Ok(Outcome::Redirect(Redirect::PostDetail(post_id)));
        }

        let Some(input) = form else {
            let input = CommentInput::from_comment(&comment);
            return Ok(Outcome::Render(CommentForm {
                post_id,
                comment,
                input,
                errors: FieldErrors::new(),
            }));
        };

        match forms::validate_comment(&input) {
            Ok(valid) => {
                self.repos
                    .comments
                    .save(Comment {
                        text: valid.text,
                        ..comment
                    })
                    .await?;
                tracing::info!(comment_id, post_id, "Comment updated");
                Ok(Outcome::Redirect(Redirect::PostDetail(post_id)))
            }
            Err(errors) => Ok(Outcome::Render(CommentForm {
                post_id,
                comment,
                input,
                errors,
            })),
        }
    }

    pub async fn delete_comment(
        &self,
        actor: &Actor,
        post_id: i64,
        comment_id: i64,
        confirmed: bool,
    ) -> Result<Outcome<CommentDeletion>, DomainError> {
        let comment = self.get_comment(comment_id).await?;
        if !actor.owns(comment.author_id) {
            tracing::debug!(comment_id, actor = %actor.username, "Delete refused, not the author");
            return Ok(Outcome::Redirect(Redirect::PostDetail(post_id)));
        }

        if !confirmed {
            return Ok(Outcome::Render(CommentDeletion { post_id, comment }));
        }

        self.repos.comments.delete(comment_id).await?;

        tracing::info!(comment_id, post_id, "Comment deleted");
        Ok(Outcome::Redirect(Redirect::PostDetail(post_id)))
    }

    async fn get_comment(&self, comment_id: i64) -> Result<Comment, DomainError> {
        self.repos
            .comments
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| DomainError::not_found("comment", comment_id))
    }
}
