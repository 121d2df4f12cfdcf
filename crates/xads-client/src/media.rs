//! Chunked media upload.
//!
//! `Initiated → Appending → Finalized → (Processing → Succeeded|Failed)`.
//! Chunks are sent strictly sequentially with increasing segment indices;
//! the remote protocol tolerates no reordering. Only media requiring
//! post-processing (video, animated image) enters the processing branch.
//! A failed step aborts the whole upload; sessions are never resumed.

use std::time::Duration;

use reqwest::Method;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::client::{AdsClient, RequestBody};
use crate::error::{AdsError, AdsResult};

/// Media category declared at INIT; decides processing behavior remotely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaCategory {
    /// Static image attached to a tweet.
    TweetImage,
    /// Video; always post-processed.
    TweetVideo,
    /// Animated GIF; post-processed.
    TweetGif,
}

impl MediaCategory {
    /// Wire name of the category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TweetImage => "tweet_image",
            Self::TweetVideo => "tweet_video",
            Self::TweetGif => "tweet_gif",
        }
    }

    /// Pick a category from a MIME type.
    #[must_use]
    pub fn from_mime(mime: &str) -> Self {
        if mime.eq_ignore_ascii_case("image/gif") {
            Self::TweetGif
        } else if mime.starts_with("video/") {
            Self::TweetVideo
        } else {
            Self::TweetImage
        }
    }
}

/// A completed upload.
#[derive(Debug, Clone)]
pub struct UploadedMedia {
    /// Media id, referenced when attaching to tweets.
    pub media_id: String,
    /// Media key, referenced by card creation.
    pub media_key: Option<String>,
}

/// One in-flight upload. Created by INIT, mutated by each APPEND,
/// terminated by FINALIZE; never reused across files.
#[derive(Debug)]
struct UploadSession {
    media_id: String,
    media_key: Option<String>,
    segment_index: u32,
}

#[derive(Debug, Deserialize)]
struct InitBody {
    #[serde(default)]
    media_id_string: Option<String>,
    #[serde(default)]
    media_id: Option<u64>,
    #[serde(default)]
    media_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FinalizeBody {
    #[serde(default)]
    processing_info: Option<ProcessingInfo>,
}

#[derive(Debug, Deserialize)]
struct ProcessingInfo {
    #[serde(default)]
    state: String,
    #[serde(default)]
    check_after_secs: Option<u64>,
    #[serde(default)]
    error: Option<ProcessingError>,
}

#[derive(Debug, Deserialize)]
struct ProcessingError {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl ProcessingError {
    fn reason(&self) -> String {
        match (&self.name, &self.message) {
            (Some(name), Some(message)) => format!("{name}: {message}"),
            (Some(name), None) => name.clone(),
            (None, Some(message)) => message.clone(),
            (None, None) => "unspecified processing error".to_string(),
        }
    }
}

impl AdsClient {
    /// Upload a media payload through the chunked protocol and, when the
    /// server post-processes it, wait for processing to complete.
    #[instrument(skip(self, bytes))]
    pub async fn upload_media(
        &self,
        bytes: &[u8],
        mime: &str,
        category: MediaCategory,
    ) -> AdsResult<UploadedMedia> {
        let mut session = self.upload_init(bytes.len() as u64, mime, category).await?;
        self.upload_append_all(&mut session, bytes).await?;
        let processing = self.upload_finalize(&session).await?;

        if let Some(info) = processing {
            self.poll_processing(&session, info).await?;
        }

        Ok(UploadedMedia {
            media_id: session.media_id,
            media_key: session.media_key,
        })
    }

    /// INIT: declare size, MIME type, and category; obtain the media id.
    async fn upload_init(
        &self,
        total_bytes: u64,
        mime: &str,
        category: MediaCategory,
    ) -> AdsResult<UploadSession> {
        let query = vec![
            ("command".to_string(), "INIT".to_string()),
            ("total_bytes".to_string(), total_bytes.to_string()),
            ("media_type".to_string(), mime.to_string()),
            ("media_category".to_string(), category.as_str().to_string()),
        ];

        let value = self
            .execute_bare(Method::POST, &self.upload_url(), &query, &RequestBody::Empty)
            .await?;
        let body: InitBody = serde_json::from_value(value)?;

        let media_id = body
            .media_id_string
            .or_else(|| body.media_id.map(|id| id.to_string()))
            .ok_or_else(|| AdsError::Upload {
                reason: "INIT response carried no media id".into(),
            })?;

        debug!(%media_id, total_bytes, "upload initiated");
        Ok(UploadSession {
            media_id,
            media_key: body.media_key,
            segment_index: 0,
        })
    }

    /// APPEND: send the payload in bounded chunks, one in flight at a
    /// time, segment indices strictly increasing from zero.
    async fn upload_append_all(&self, session: &mut UploadSession, bytes: &[u8]) -> AdsResult<()> {
        let chunk_size = self
            .config
            .upload_chunk_bytes
            .min(crate::config::UPLOAD_CHUNK_CEILING)
            .max(1);

        for chunk in bytes.chunks(chunk_size) {
            let query = vec![
                ("command".to_string(), "APPEND".to_string()),
                ("media_id".to_string(), session.media_id.clone()),
                ("segment_index".to_string(), session.segment_index.to_string()),
            ];

            self.execute_bare(
                Method::POST,
                &self.upload_url(),
                &query,
                &RequestBody::Media(chunk),
            )
            .await?;

            debug!(
                media_id = %session.media_id,
                segment = session.segment_index,
                len = chunk.len(),
                "appended chunk"
            );
            session.segment_index += 1;
        }

        Ok(())
    }

    /// FINALIZE: close the session; the response names processing
    /// metadata when the server transcodes asynchronously.
    async fn upload_finalize(&self, session: &UploadSession) -> AdsResult<Option<ProcessingInfo>> {
        let query = vec![
            ("command".to_string(), "FINALIZE".to_string()),
            ("media_id".to_string(), session.media_id.clone()),
        ];

        let value = self
            .execute_bare(Method::POST, &self.upload_url(), &query, &RequestBody::Empty)
            .await?;
        let body: FinalizeBody = serde_json::from_value(value)?;
        Ok(body.processing_info)
    }

    /// STATUS loop: wait the server-specified delay, poll, repeat until a
    /// terminal state, bounded by the configured total wait, and
    /// cancellable before every sleep.
    async fn poll_processing(
        &self,
        session: &UploadSession,
        mut info: ProcessingInfo,
    ) -> AdsResult<()> {
        let mut waited = Duration::ZERO;

        loop {
            match info.state.as_str() {
                "succeeded" => return Ok(()),
                "failed" => {
                    let reason = info
                        .error
                        .as_ref()
                        .map_or_else(|| "processing failed".to_string(), ProcessingError::reason);
                    return Err(AdsError::Upload { reason });
                }
                // "pending" and "in_progress" keep polling.
                _ => {}
            }

            let delay = Duration::from_secs(info.check_after_secs.unwrap_or(5));
            if waited + delay > self.config.max_processing_wait {
                return Err(AdsError::Upload {
                    reason: format!(
                        "processing did not finish within {}s",
                        self.config.max_processing_wait.as_secs()
                    ),
                });
            }

            tokio::select! {
                () = self.cancel().cancelled() => return Err(AdsError::Cancelled),
                () = tokio::time::sleep(delay) => {}
            }
            waited += delay;

            let query = vec![
                ("command".to_string(), "STATUS".to_string()),
                ("media_id".to_string(), session.media_id.clone()),
            ];
            let value = self
                .execute_bare(Method::GET, &self.upload_url(), &query, &RequestBody::Empty)
                .await?;
            let body: FinalizeBody = serde_json::from_value(value)?;
            info = body.processing_info.ok_or_else(|| AdsError::Upload {
                reason: "STATUS response carried no processing info".into(),
            })?;

            debug!(media_id = %session.media_id, state = %info.state, "processing status");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AdsConfig, RetryPolicy};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};
    use xads_oauth::Credentials;

    fn test_client(server: &MockServer, chunk_bytes: usize) -> AdsClient {
        let credentials = Credentials {
            consumer_key: "ck".into(),
            consumer_secret: "cs".into(),
            access_token: "at".into(),
            access_token_secret: "ats".into(),
        };
        let mut config = AdsConfig::new(credentials).with_base_url(server.uri());
        config.retry = RetryPolicy::immediate(2);
        config.upload_chunk_bytes = chunk_bytes;
        config.max_processing_wait = Duration::from_secs(10);
        AdsClient::new(config).unwrap()
    }

    async fn mount_init(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/1.1/media/upload.json"))
            .and(query_param("command", "INIT"))
            .respond_with(ResponseTemplate::new(202).set_body_json(serde_json::json!({
                "media_id": 710_511_363_345_354_753_u64,
                "media_id_string": "710511363345354753",
                "media_key": "3_710511363345354753"
            })))
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn payload_of_two_chunks_appends_in_order_then_finalizes() {
        let server = MockServer::start().await;
        mount_init(&server).await;

        Mock::given(method("POST"))
            .and(path("/1.1/media/upload.json"))
            .and(query_param("command", "APPEND"))
            .and(query_param("segment_index", "0"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/1.1/media/upload.json"))
            .and(query_param("command", "APPEND"))
            .and(query_param("segment_index", "1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/1.1/media/upload.json"))
            .and(query_param("command", "FINALIZE"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "media_id_string": "710511363345354753"
            })))
            .expect(1)
            .mount(&server)
            .await;

        // 10 bytes with a 5-byte chunk bound: exactly two appends.
        let client = test_client(&server, 5);
        let uploaded = client
            .upload_media(&[0u8; 10], "image/png", MediaCategory::TweetImage)
            .await
            .unwrap();

        assert_eq!(uploaded.media_id, "710511363345354753");
        assert_eq!(uploaded.media_key.as_deref(), Some("3_710511363345354753"));
        // INIT + APPEND x2 + FINALIZE, no STATUS.
        assert_eq!(server.received_requests().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn processing_branch_polls_until_succeeded() {
        let server = MockServer::start().await;
        mount_init(&server).await;

        Mock::given(method("POST"))
            .and(path("/1.1/media/upload.json"))
            .and(query_param("command", "APPEND"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/1.1/media/upload.json"))
            .and(query_param("command", "FINALIZE"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "media_id_string": "710511363345354753",
                "processing_info": {"state": "pending", "check_after_secs": 0}
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/1.1/media/upload.json"))
            .and(query_param("command", "STATUS"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "processing_info": {"state": "in_progress", "check_after_secs": 0}
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/1.1/media/upload.json"))
            .and(query_param("command", "STATUS"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "processing_info": {"state": "succeeded"}
            })))
            .mount(&server)
            .await;

        let client = test_client(&server, 1024);
        let uploaded = client
            .upload_media(&[0u8; 16], "video/mp4", MediaCategory::TweetVideo)
            .await
            .unwrap();

        assert_eq!(uploaded.media_id, "710511363345354753");
    }

    #[tokio::test]
    async fn processing_failure_surfaces_remote_reason() {
        let server = MockServer::start().await;
        mount_init(&server).await;

        Mock::given(method("POST"))
            .and(path("/1.1/media/upload.json"))
            .and(query_param("command", "APPEND"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/1.1/media/upload.json"))
            .and(query_param("command", "FINALIZE"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "processing_info": {"state": "pending", "check_after_secs": 0}
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/1.1/media/upload.json"))
            .and(query_param("command", "STATUS"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "processing_info": {
                    "state": "failed",
                    "error": {"name": "InvalidMedia", "message": "unsupported codec"}
                }
            })))
            .mount(&server)
            .await;

        let client = test_client(&server, 1024);
        let err = client
            .upload_media(&[0u8; 16], "video/mp4", MediaCategory::TweetVideo)
            .await
            .unwrap_err();

        match err {
            AdsError::Upload { reason } => {
                assert!(reason.contains("InvalidMedia"));
                assert!(reason.contains("unsupported codec"));
            }
            other => panic!("expected Upload failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn processing_wait_is_bounded() {
        let server = MockServer::start().await;
        mount_init(&server).await;

        Mock::given(method("POST"))
            .and(path("/1.1/media/upload.json"))
            .and(query_param("command", "APPEND"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/1.1/media/upload.json"))
            .and(query_param("command", "FINALIZE"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "processing_info": {"state": "pending", "check_after_secs": 60}
            })))
            .mount(&server)
            .await;

        let mut client = test_client(&server, 1024);
        client.config.max_processing_wait = Duration::from_millis(50);

        let err = client
            .upload_media(&[0u8; 4], "video/mp4", MediaCategory::TweetVideo)
            .await
            .unwrap_err();

        assert!(matches!(err, AdsError::Upload { .. }));
        // INIT + APPEND + FINALIZE only; the 60s wait never happens.
        assert_eq!(server.received_requests().await.unwrap().len(), 3);
    }

    #[test]
    fn category_from_mime() {
        assert_eq!(MediaCategory::from_mime("image/png"), MediaCategory::TweetImage);
        assert_eq!(MediaCategory::from_mime("image/gif"), MediaCategory::TweetGif);
        assert_eq!(MediaCategory::from_mime("video/mp4"), MediaCategory::TweetVideo);
    }
}
