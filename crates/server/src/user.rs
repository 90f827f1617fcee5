//! Profile of the acting user.

use api_types::user::{UserPatch, UserRegister, UserView};
use axum::{Extension, Json, extract::State, http::StatusCode};
use axum_extra::extract::WithRejection;
use engine::{Response, UserProfile, UserUpdate};

use crate::{CurrentUser, ServerError, image::decode_optional, server::ServerState};

fn user_view(profile: UserProfile) -> UserView {
    UserView {
        uid: profile.uid,
        email: profile.email,
        name: profile.name,
        image: profile.image,
    }
}

/// Stores the profile right after sign-up.
pub async fn register(
    Extension(CurrentUser(uid)): Extension<CurrentUser>,
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<UserRegister>, ServerError>,
) -> Result<(StatusCode, Json<Response<UserView>>), ServerError> {
    let profile = state
        .engine
        .register_user(&uid, payload.email.as_deref(), payload.name.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(Response::ok(user_view(profile)))))
}

pub async fn get(
    Extension(CurrentUser(uid)): Extension<CurrentUser>,
    State(state): State<ServerState>,
) -> Result<Json<Response<UserView>>, ServerError> {
    let profile = state.engine.user(&uid).await?;
    Ok(Json(Response::ok(user_view(profile))))
}

pub async fn update(
    Extension(CurrentUser(uid)): Extension<CurrentUser>,
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<UserPatch>, ServerError>,
) -> Result<Json<Response<UserView>>, ServerError> {
    let update = UserUpdate {
        name: payload.name,
        image: decode_optional(payload.image)?,
    };
    let profile = state.engine.update_user(&uid, update).await?;
    Ok(Json(Response::ok(user_view(profile))))
}
