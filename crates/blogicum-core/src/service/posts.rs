//! Post detail and post create/edit/delete.

use chrono::{DateTime, Utc};

use super::{BlogService, Outcome, Redirect};
use crate::domain::{Actor, Category, CommentWithAuthor, Location, NewPost, Post, PostSummary};
use crate::error::DomainError;
use crate::forms::{self, CommentInput, FieldErrors, INVALID_CHOICE, PostInput, ValidatedPost};
use crate::visibility;

/// A post with its comment thread and an empty comment form.
#[derive(Debug, Clone)]
pub struct PostDetail {
    pub post: PostSummary,
    pub comments: Vec<CommentWithAuthor>,
    pub form: CommentInput,
}

/// The create/edit post form.
#[derive(Debug, Clone)]
pub struct PostForm {
    /// Set when editing an existing post.
    pub post_id: Option<i64>,
    pub input: PostInput,
    pub errors: FieldErrors,
    pub categories: Vec<Category>,
    pub locations: Vec<Location>,
}

/// Confirmation page shown before a post is deleted.
#[derive(Debug, Clone)]
pub struct PostDeletion {
    pub post: Post,
    pub input: PostInput,
}

impl BlogService {
    /// A single post, hidden from everyone but its author unless public.
    pub async fn post_detail(
        &self,
        viewer: Option<&Actor>,
        post_id: i64,
        now: DateTime<Utc>,
    ) -> Result<PostDetail, DomainError> {
        let post = self
            .repos
            .posts
            .find_summary(post_id)
            .await?
            .filter(|s| visibility::is_visible_to(viewer, &s.post, s.category.as_ref(), now))
            .ok_or_else(|| DomainError::not_found("post", post_id))?;

        let comments = self.repos.comments.list_for_post(post_id).await?;

        Ok(PostDetail {
            post,
            comments,
            form: CommentInput::default(),
        })
    }

    pub async fn create_post(
        &self,
        actor: &Actor,
        form: Option<PostInput>,
    ) -> Result<Outcome<PostForm>, DomainError> {
        let Some(input) = form else {
            return Ok(Outcome::Render(
                self.post_form(None, PostInput::default(), FieldErrors::new())
                    .await?,
            ));
        };

        let valid = match self.clean_post(&input).await? {
            Ok(valid) => valid,
            Err(errors) => return Ok(Outcome::Render(self.post_form(None, input, errors).await?)),
        };

        // The token may predate a rename; redirect to the current username.
        let author = self
            .repos
            .users
            .find_by_id(actor.user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("user", &actor.username))?;

        let post = self
            .repos
            .posts
            .create(NewPost {
                title: valid.title,
                text: valid.text,
                pub_date: valid.pub_date,
                author_id: author.id,
                category_id: Some(valid.category_id),
                location_id: valid.location_id,
                is_published: valid.is_published,
            })
            .await?;

        tracing::info!(post_id = post.id, author = %author.username, "Post created");
        Ok(Outcome::Redirect(Redirect::Profile(author.username)))
    }

    pub async fn edit_post(
        &self,
        actor: &Actor,
        post_id: i64,
        form: Option<PostInput>,
    ) -> Result<Outcome<PostForm>, DomainError> {
        let post = self.get_post(post_id).await?;
        if !actor.owns(post.author_id) {
            tracing::debug!(post_id, actor = %actor.username, "Edit refused, not the author");
            return Ok(Outcome::Redirect(Redirect::PostDetail(post_id)));
        }

        let Some(input) = form else {
            let input = PostInput::from_post(&post);
            return Ok(Outcome::Render(
                self.post_form(Some(post_id), input, FieldErrors::new())
                    .await?,
            ));
        };

        let valid = match self.clean_post(&input).await? {
            Ok(valid) => valid,
            Err(errors) => {
                return Ok(Outcome::Render(
                    self.post_form(Some(post_id), input, errors).await?,
                ));
            }
        };

        let updated = Post {
            title: valid.title,
            text: valid.text,
            pub_date: valid.pub_date,
            category_id: Some(valid.category_id),
            location_id: valid.location_id,
            is_published: valid.is_published,
            ..post
        };
        self.repos.posts.save(updated).await?;

        tracing::info!(post_id, author = %actor.username, "Post updated");
        Ok(Outcome::Redirect(Redirect::PostDetail(post_id)))
    }

    /// Two-phase delete: without `confirmed` only the confirmation is shown.
    pub async fn delete_post(
        &self,
        actor: &Actor,
        post_id: i64,
        confirmed: bool,
    ) -> Result<Outcome<PostDeletion>, DomainError> {
        let post = self.get_post(post_id).await?;
        if !actor.owns(post.author_id) {
            tracing::debug!(post_id, actor = %actor.username, "Delete refused, not the author");
            return Ok(Outcome::Redirect(Redirect::PostDetail(post_id)));
        }

        if !confirmed {
            let input = PostInput::from_post(&post);
            return Ok(Outcome::Render(PostDeletion { post, input }));
        }

        self.repos.posts.delete(post_id).await?;

        tracing::info!(post_id, author = %actor.username, "Post deleted");
        Ok(Outcome::Redirect(Redirect::Index))
    }

    pub(super) async fn get_post(&self, post_id: i64) -> Result<Post, DomainError> {
        self.repos
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))
    }

    /// Syntactic validation plus the checks that need the store.
    async fn clean_post(
        &self,
        input: &PostInput,
    ) -> Result<Result<ValidatedPost, FieldErrors>, DomainError> {
        let valid = match forms::validate_post(input) {
            Ok(valid) => valid,
            Err(errors) => return Ok(Err(errors)),
        };

        let mut errors = FieldErrors::new();
        if self
            .repos
            .categories
            .find_by_id(valid.category_id)
            .await?
            .is_none()
        {
            errors.add("category", INVALID_CHOICE);
        }
        if let Some(location_id) = valid.location_id {
            if self.repos.locations.find_by_id(location_id).await?.is_none() {
                errors.add("location", INVALID_CHOICE);
            }
        }

        Ok(errors.into_result(valid))
    }

    async fn post_form(
        &self,
        post_id: Option<i64>,
        input: PostInput,
        errors: FieldErrors,
    ) -> Result<PostForm, DomainError> {
        Ok(PostForm {
            post_id,
            input,
            errors,
            categories: self.repos.categories.list_published().await?,
            locations: self.repos.locations.list_published().await?,
        })
    }
}
