use crate::{
    EngineError, ResultEngine, UserProfile,
    upload::{ImageInput, USERS_FOLDER},
    util::normalize_optional_text,
};

use super::Engine;

/// Profile fields the user can change. `None` keeps the stored value.
#[derive(Clone, Debug, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub image: Option<ImageInput>,
}

impl Engine {
    /// Writes the profile of a freshly signed-up user.
    ///
    /// Registering twice overwrites email and name but keeps the avatar.
    pub async fn register_user(
        &self,
        uid: &str,
        email: Option<&str>,
        name: Option<&str>,
    ) -> ResultEngine<UserProfile> {
        if uid.trim().is_empty() {
            return Err(EngineError::Validation("User id is required".to_string()));
        }
        let existing = self.users.get(uid).await?;
        let profile = UserProfile {
            uid: uid.to_string(),
            email: normalize_optional_text(email),
            name: normalize_optional_text(name),
            image: existing.and_then(|p| p.image),
        };
        let saved = self.users.put(&profile).await?;
        tracing::info!(uid, "user registered");
        Ok(saved)
    }

    pub async fn user(&self, uid: &str) -> ResultEngine<UserProfile> {
        self.users
            .get(uid)
            .await?
            .ok_or_else(|| EngineError::NotFound("User not found".to_string()))
    }

    /// Updates display name and avatar.
    pub async fn update_user(&self, uid: &str, update: UserUpdate) -> ResultEngine<UserProfile> {
        let mut profile = self.user(uid).await?;
        if let Some(name) = normalize_optional_text(update.name.as_deref()) {
            profile.name = Some(name);
        }
        if let Some(image) = &update.image {
            profile.image = Some(self.resolve_image(image, USERS_FOLDER).await?);
        }
        let saved = self.users.put(&profile).await?;
        tracing::info!(uid, "user updated");
        Ok(saved)
    }
}
