//! Profile creation endpoint

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use tokio::process::Command;
use tower_cookies::Cookies;

use crate::crypto;
use crate::email::Mailer;
use crate::error::AuthError;
use crate::state::AppState;
use crate::store::AuthBackend;

#[derive(Serialize)]
pub struct CreateProfileResponse {
    pub success: bool,
}

/// POST /createProfile
///
/// multipart/form-data with `fullName`, `Organization`, `password`, and the
/// profile picture as `file`. The picture is stored under its original name
/// in the upload directory.
pub async fn create_profile<B, M>(
    State(state): State<Arc<AppState<B, M>>>,
    cookies: Cookies,
    mut multipart: Multipart,
) -> Result<Json<CreateProfileResponse>, AuthError>
where
    B: AuthBackend,
    M: Mailer,
{
    let mut full_name = None;
    let mut organization = None;
    let mut password = None;
    let mut picture_path: Option<PathBuf> = None;

    while let Some(field) = multipart.next_field().await.map_err(form_err)? {
        match field.name() {
            Some("fullName") => full_name = Some(field.text().await.map_err(form_err)?),
            Some("Organization") => organization = Some(field.text().await.map_err(form_err)?),
            Some("password") => password = Some(field.text().await.map_err(form_err)?),
            Some("file") => {
                // keep only the base name; the client controls the rest
                let file_name = field
                    .file_name()
                    .and_then(|name| Path::new(name).file_name())
                    .map(ToOwned::to_owned);
                let Some(file_name) = file_name else {
                    return Err(AuthError::auth(
                        "Unable to get profile information from form",
                    ));
                };
                let bytes = field.bytes().await.map_err(form_err)?;
                let path = state.upload_dir.join(file_name);
                tokio::fs::write(&path, &bytes)
                    .await
                    .map_err(|e| AuthError::logged_from("Unable to store profile picture", e))?;
                picture_path = Some(path);
            }
            _ => {}
        }
    }

    let (Some(full_name), Some(organization), Some(password), Some(picture_path)) =
        (full_name, organization, password, picture_path)
    else {
        return Err(AuthError::auth(
            "Unable to get profile information from form",
        ));
    };

    if let Err(err) = generate_thumbnail(&picture_path).await {
        tracing::error!(error = %err, path = %picture_path.display(), "thumbnail generation failed");
    }

    let picture_path = picture_path.to_string_lossy().into_owned();
    state
        .session_manager(&cookies)
        .create_profile(&full_name, &organization, &password, &picture_path)?;
    Ok(Json(CreateProfileResponse { success: true }))
}

fn form_err(err: MultipartError) -> AuthError {
    AuthError::auth_from("Unable to get profile information from form", err)
}

/// Downscale an uploaded picture with the external `vipsthumbnail` tool.
/// Returns the generated file name.
async fn generate_thumbnail(filename: &Path) -> Result<String, AuthError> {
    let new_name = crypto::random_string()
        .map_err(|e| AuthError::logged_from("Unable to create thumbnail filename", e))?;

    let status = Command::new("vipsthumbnail")
        .arg("-s")
        .arg("150")
        .arg("-o")
        .arg(&new_name)
        .arg(filename)
        .status()
        .await
        .map_err(|e| AuthError::logged_from("Error running vipsthumbnail", e))?;

    if !status.success() {
        return Err(AuthError::logged("Error running vipsthumbnail"));
    }
    Ok(new_name)
}
