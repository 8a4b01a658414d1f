use super::{BlogService, Outcome, Redirect};
use crate::domain::{Actor, User};
use crate::error::DomainError;
use crate::forms::{self, FieldErrors, ProfileInput};

/// The edit profile form.
#[derive(Debug, Clone)]
pub struct ProfileForm {
    pub input: ProfileInput,
    pub errors: FieldErrors,
}

impl BlogService {
    /// Edit the actor's own profile; redirects to it under its new username.
    pub async fn edit_profile(
        &self,
        actor: &Actor,
        form: Option<ProfileInput>,
    ) -> Result<Outcome<ProfileForm>, DomainError> {
        let user = self
            .repos
            .users
            .find_by_id(actor.user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("user", &actor.username))?;

        let Some(input) = form else {
            return Ok(Outcome::Render(ProfileForm {
                input: ProfileInput::from_user(&user),
                errors: FieldErrors::new(),
            }));
        };

        let valid = match forms::validate_profile(&input) {
            Ok(valid) => valid,
            Err(errors) => return Ok(Outcome::Render(ProfileForm { input, errors })),
        };

        if valid.username != user.username {
            let taken = self
                .repos
                .users
                .find_by_username(&valid.username)
                .await?
                .is_some_and(|other| other.id != user.id);
            if taken {
                let mut errors = FieldErrors::new();
                errors.add("username", "A user with that username already exists.");
                return Ok(Outcome::Render(ProfileForm { input, errors }));
            }
        }

        let saved = self
            .repos
            .users
            .save(User {
                username: valid.username,
                email: valid.email,
                first_name: valid.first_name,
                last_name: valid.last_name,
                ..user
            })
            .await?;

        tracing::info!(user_id = saved.id, username = %saved.username, "Profile updated");
        Ok(Outcome::Redirect(Redirect::Profile(saved.username)))
    }
}
