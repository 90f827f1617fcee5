//! User profiles.
//!
//! Authentication lives outside the engine; the profile only mirrors what the
//! identity provider hands over (`uid`, email, display name) plus an avatar.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub uid: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub image: Option<String>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub uid: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub image: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&UserProfile> for ActiveModel {
    fn from(value: &UserProfile) -> Self {
        Self {
            uid: ActiveValue::Set(value.uid.clone()),
            email: ActiveValue::Set(value.email.clone()),
            name: ActiveValue::Set(value.name.clone()),
            image: ActiveValue::Set(value.image.clone()),
        }
    }
}

impl From<Model> for UserProfile {
    fn from(model: Model) -> Self {
        Self {
            uid: model.uid,
            email: model.email,
            name: model.name,
            image: model.image,
        }
    }
}
