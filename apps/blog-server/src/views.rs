//! Rendering: service results to page models and HTTP responses.

use actix_web::{HttpResponse, http::header};
use serde::Serialize;

use blogicum_core::domain::{Category, CommentWithAuthor, Location, PostSummary, User, UserRef};
use blogicum_core::forms::{CommentInput, PostInput, ProfileInput};
use blogicum_core::pagination::{Page, PageMeta};
use blogicum_core::service::{
    CommentDeletion, CommentForm, Outcome, PostDeletion, PostForm, ProfileForm, Redirect,
};
use blogicum_shared::dto::UserResponse;
use blogicum_shared::pages::{
    AuthorView, CategoryView, CommentDeletePage, CommentFields, CommentFormPage, CommentView,
    LocationView, PageInfo, PostDeletePage, PostFields, PostFormPage, PostView, ProfileFields,
    ProfileFormPage,
};

/// Path a [`Redirect`] points at.
pub fn location(target: &Redirect) -> String {
    match target {
        Redirect::Index => "/".to_string(),
        Redirect::PostDetail(id) => format!("/posts/{id}/"),
        Redirect::Profile(username) => format!("/profile/{username}/"),
    }
}

pub fn redirect(target: &Redirect) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location(target)))
        .finish()
}

pub fn render<P: Serialize>(page: P) -> HttpResponse {
    HttpResponse::Ok().json(page)
}

/// Render the page model or follow the redirect.
pub fn respond<T, P: Serialize>(outcome: Outcome<T>, to_page: impl FnOnce(T) -> P) -> HttpResponse {
    match outcome {
        Outcome::Render(view) => render(to_page(view)),
        Outcome::Redirect(target) => redirect(&target),
    }
}

pub fn author(user: UserRef) -> AuthorView {
    AuthorView {
        id: user.id,
        username: user.username,
    }
}

pub fn category(category: Category) -> CategoryView {
    CategoryView {
        id: category.id,
        title: category.title,
        description: category.description,
        slug: category.slug,
    }
}

pub fn location_view(location: Location) -> LocationView {
    LocationView {
        id: location.id,
        name: location.name,
    }
}

pub fn post(summary: PostSummary) -> PostView {
    let PostSummary {
        post,
        author: post_author,
        category: post_category,
        location: post_location,
        comment_count,
    } = summary;

    PostView {
        id: post.id,
        title: post.title,
        text: post.text,
        pub_date: post.pub_date,
        is_published: post.is_published,
        author: author(post_author),
        category: post_category.map(category),
        location: post_location.map(location_view),
        comment_count,
    }
}

pub fn comment(entry: CommentWithAuthor) -> CommentView {
    CommentView {
        id: entry.comment.id,
        text: entry.comment.text,
        created_at: entry.comment.created_at,
        author: author(entry.author),
    }
}

pub fn user(user: &User) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        date_joined: user.date_joined,
    }
}

pub fn page_info(meta: &PageMeta) -> PageInfo {
    PageInfo {
        number: meta.number,
        num_pages: meta.num_pages,
        count: meta.count,
        per_page: meta.per_page,
        has_next: meta.has_next(),
        has_previous: meta.has_previous(),
        next_page_number: meta.next_page_number(),
        previous_page_number: meta.previous_page_number(),
    }
}

/// Post views and paginator state of a listing page.
pub fn listing(page: Page<PostSummary>) -> (Vec<PostView>, PageInfo) {
    let page = page.map(post);
    (page.items, page_info(&page.meta))
}

pub fn post_fields(input: PostInput) -> PostFields {
    PostFields {
        is_published: input.publishes(),
        title: input.title,
        text: input.text,
        pub_date: input.pub_date,
        category: input.category,
        location: input.location,
    }
}

pub fn comment_fields(input: CommentInput) -> CommentFields {
    CommentFields { text: input.text }
}

pub fn post_form(form: PostForm) -> PostFormPage {
    PostFormPage {
        post_id: form.post_id,
        form: post_fields(form.input),
        errors: form.errors.into_map(),
        categories: form.categories.into_iter().map(category).collect(),
        locations: form.locations.into_iter().map(location_view).collect(),
    }
}

pub fn post_deletion(deletion: PostDeletion) -> PostDeletePage {
    PostDeletePage {
        post_id: deletion.post.id,
        form: post_fields(deletion.input),
    }
}

pub fn comment_form(form: CommentForm) -> CommentFormPage {
    CommentFormPage {
        post_id: form.post_id,
        comment_id: form.comment.id,
        form: comment_fields(form.input),
        errors: form.errors.into_map(),
    }
}

pub fn comment_deletion(deletion: CommentDeletion) -> CommentDeletePage {
    CommentDeletePage {
        post_id: deletion.post_id,
        comment_id: deletion.comment.id,
        text: deletion.comment.text,
    }
}

pub fn profile_form(form: ProfileForm) -> ProfileFormPage {
    let ProfileInput {
        username,
        email,
        first_name,
        last_name,
    } = form.input;

    ProfileFormPage {
        form: ProfileFields {
            username,
            email,
            first_name,
            last_name,
        },
        errors: form.errors.into_map(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_locations() {
        assert_eq!(location(&Redirect::Index), "/");
        assert_eq!(location(&Redirect::PostDetail(12)), "/posts/12/");
        assert_eq!(
            location(&Redirect::Profile("ann".to_string())),
            "/profile/ann/"
        );
    }

    #[test]
    fn test_redirect_is_302_with_location() {
        let resp = redirect(&Redirect::PostDetail(3));

        assert_eq!(resp.status(), actix_web::http::StatusCode::FOUND);
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/posts/3/");
    }
}
