use crate::errors::AppError;
use crate::session::Session;
use std::path::Path;
use tokio::fs;
use tracing::error;

pub async fn load_session(path: &Path) -> Option<Session> {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice::<Session>(&bytes) {
            Ok(session) if !session.token.is_empty() => Some(session),
            Ok(_) => None,
            Err(err) => {
                error!("failed to parse session file: {err}");
                None
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
        Err(err) => {
            error!("failed to read session file: {err}");
            None
        }
    }
}

pub async fn persist_session(path: &Path, session: &Session) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    let payload = serde_json::to_vec_pretty(session).map_err(AppError::internal)?;
    fs::write(path, payload).await?;
    Ok(())
}

pub async fn remove_session(path: &Path) -> Result<(), AppError> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}
