//! Domain entities - the core business objects.

mod category;
mod comment;
mod location;
mod post;
mod user;

pub use category::{Category, NewCategory};
pub use comment::{Comment, CommentWithAuthor, NewComment};
pub use location::{Location, NewLocation};
pub use post::{NewPost, Post, PostSummary};
pub use user::{Actor, NewUser, User, UserRef};
