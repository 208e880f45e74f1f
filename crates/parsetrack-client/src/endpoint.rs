//! Derives the progress channel URL from the configured base API address.
//!
//! Shape: `{scheme}://{host}[:port]/ws/resume-parsing/{taskId}/?token={token}`
//! where the scheme is `http` rewritten to `ws` (or `https` to `wss`) and any
//! trailing slash on the base URL is removed before appending the fixed path.

use parsetrack_core::{ClientError, TaskId};
use url::Url;

/// Build the WebSocket URL for one task's progress channel.
///
/// # Errors
///
/// Rejects empty task IDs and tokens, base URLs that do not parse, and base
/// URLs with a scheme other than `http`/`https`.
pub fn progress_url(base: &str, task_id: &TaskId, token: &str) -> Result<Url, ClientError> {
    if task_id.is_empty() {
        return Err(ClientError::EmptyTaskId);
    }
    if token.is_empty() {
        return Err(ClientError::EmptyToken);
    }

    let trimmed = base.strip_suffix('/').unwrap_or(base);
    let mut url = Url::parse(trimmed).map_err(|e| ClientError::InvalidBaseUrl {
        base: base.to_owned(),
        reason: e.to_string(),
    })?;

    let scheme = match url.scheme() {
        "http" => "ws",
        "https" => "wss",
        other => {
            return Err(ClientError::InvalidBaseUrl {
                base: base.to_owned(),
                reason: format!("unsupported scheme `{other}`"),
            });
        }
    };
    url.set_scheme(scheme)
        .map_err(|()| ClientError::InvalidBaseUrl {
            base: base.to_owned(),
            reason: "scheme rewrite failed".to_owned(),
        })?;

    let path = format!(
        "{}/ws/resume-parsing/{}/",
        url.path().trim_end_matches('/'),
        task_id
    );
    url.set_path(&path);
    let _ = url.query_pairs_mut().append_pair("token", token);

    Ok(url)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_becomes_ws() {
        let url = progress_url("http://localhost:8000", &TaskId::from("abc123"), "tok").unwrap();
        assert_eq!(
            url.as_str(),
            "ws://localhost:8000/ws/resume-parsing/abc123/?token=tok"
        );
    }

    #[test]
    fn https_becomes_wss() {
        let url = progress_url("https://api.parsetrack.dev", &TaskId::from("t1"), "tok").unwrap();
        assert_eq!(
            url.as_str(),
            "wss://api.parsetrack.dev/ws/resume-parsing/t1/?token=tok"
        );
    }

    #[test]
    fn trailing_slash_stripped() {
        let url = progress_url("http://localhost:8000/", &TaskId::from("t1"), "tok").unwrap();
        assert_eq!(
            url.as_str(),
            "ws://localhost:8000/ws/resume-parsing/t1/?token=tok"
        );
    }

    #[test]
    fn base_path_prefix_preserved() {
        let url = progress_url("https://example.com/api/v1/", &TaskId::from("t1"), "tok").unwrap();
        assert_eq!(
            url.as_str(),
            "wss://example.com/api/v1/ws/resume-parsing/t1/?token=tok"
        );
    }

    #[test]
    fn token_is_percent_encoded() {
        let url = progress_url("http://localhost", &TaskId::from("t1"), "a b&c").unwrap();
        assert_eq!(url.query(), Some("token=a+b%26c"));
    }

    #[test]
    fn empty_task_id_rejected() {
        let err = progress_url("http://localhost", &TaskId::from(""), "tok").unwrap_err();
        assert!(matches!(err, ClientError::EmptyTaskId));
    }

    #[test]
    fn empty_token_rejected() {
        let err = progress_url("http://localhost", &TaskId::from("t1"), "").unwrap_err();
        assert!(matches!(err, ClientError::EmptyToken));
    }

    #[test]
    fn unsupported_scheme_rejected() {
        let err = progress_url("ftp://example.com", &TaskId::from("t1"), "tok").unwrap_err();
        assert!(matches!(err, ClientError::InvalidBaseUrl { .. }));
        assert!(err.to_string().contains("unsupported scheme"));
    }

    #[test]
    fn garbage_base_rejected() {
        let err = progress_url("not a url", &TaskId::from("t1"), "tok").unwrap_err();
        assert!(matches!(err, ClientError::InvalidBaseUrl { .. }));
    }
}
