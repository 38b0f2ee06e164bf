//! Synthesis client: chunked, retried, decoded.

use crate::backend::{SynthesisBackend, SynthesisRequest};
use crate::error::{TtsError, TtsResult};
use crate::retry::{RetryError, RetryPolicy};
use crate::types::{expressiveness_label, resolve_voice, SynthesisOptions};
use narravox_audio::{decode_base64_pcm, merge_buffers, AudioBuffer};
use narravox_foundation::{CredentialProvider, StudioConfig};
use narravox_text::chunk_text;
use std::sync::Arc;
use std::time::Duration;

/// Per-chunk progress callback, receiving percent complete (0-100).
pub type ProgressFn<'a> = &'a (dyn Fn(f32) + Send + Sync);

/// Client that turns one narration part into a single decoded buffer.
///
/// The text is chunked to the request-size bound, each chunk is synthesized
/// sequentially with the retry policy, decoded, and the buffers are merged
/// in chunk order.
pub struct SynthesisClient {
    backend: Arc<dyn SynthesisBackend>,
    credentials: Arc<dyn CredentialProvider>,
    retry: RetryPolicy,
    max_chunk_chars: usize,
    inter_chunk_pause: Duration,
}

impl SynthesisClient {
    pub fn new(
        backend: Arc<dyn SynthesisBackend>,
        credentials: Arc<dyn CredentialProvider>,
        config: &StudioConfig,
    ) -> Self {
        Self {
            backend,
            credentials,
            retry: RetryPolicy::from(&config.retry),
            max_chunk_chars: config.max_chunk_chars,
            inter_chunk_pause: config.inter_chunk_pause,
        }
    }

    /// Synthesize `text` into one buffer, reporting fractional progress.
    pub async fn synthesize(
        &self,
        text: &str,
        opts: &SynthesisOptions,
        progress: Option<ProgressFn<'_>>,
    ) -> TtsResult<AudioBuffer> {
        if !self.credentials.has_credential() {
            self.credentials.request_credential().await;
            return Err(TtsError::MissingCredential);
        }

        let chunks = chunk_text(text, self.max_chunk_chars);
        if chunks.is_empty() {
            return Err(TtsError::InvalidInput("empty text".to_string()));
        }

        let voice = resolve_voice(&opts.voice_id);
        let tone = expressiveness_label(opts.expressiveness);
        let total = chunks.len();
        tracing::debug!(
            backend = self.backend.name(),
            voice = voice.id,
            tone,
            chunks = total,
            "starting synthesis"
        );

        let mut buffers = Vec::with_capacity(total);
        for (index, chunk) in chunks.iter().enumerate() {
            let request = SynthesisRequest {
                instruction: format!("Narrate this story part with a {tone} tone: {chunk}"),
                voice_id: voice.id.to_string(),
                speed: opts.speed,
            };

            let encoded = match self
                .retry
                .run(TtsError::class, || self.backend.synthesize_chunk(&request))
                .await
            {
                Ok(encoded) => encoded,
                Err(RetryError::Fatal(err)) => {
                    tracing::warn!(chunk = index, error = %err, "synthesis aborted");
                    if err.needs_reauth() {
                        self.credentials.request_credential().await;
                    }
                    return Err(err);
                }
                Err(RetryError::Exhausted { attempts, last }) => {
                    tracing::warn!(chunk = index, attempts, error = %last, "retries exhausted");
                    let err = TtsError::ChunkFailed {
                        index,
                        attempts,
                        last_error: Box::new(last),
                    };
                    if err.needs_reauth() {
                        self.credentials.request_credential().await;
                    }
                    return Err(err);
                }
            };

            let buffer =
                decode_base64_pcm(&encoded.payload_b64, encoded.sample_rate, encoded.channels)?;
            buffers.push(buffer);

            if let Some(report) = progress {
                report(((index + 1) as f32 / total as f32) * 100.0);
            }
            if index + 1 < total {
                tokio::time::sleep(self.inter_chunk_pause).await;
            }
        }

        match buffers.len() {
            0 => Err(TtsError::EmptyResponse),
            1 => Ok(buffers.swap_remove(0)),
            _ => Ok(merge_buffers(&buffers)?),
        }
    }

    /// Synthesize the short persona sample line used for voice preview.
    pub async fn preview(&self, voice_id: &str, opts: &SynthesisOptions) -> TtsResult<AudioBuffer> {
        let persona = resolve_voice(voice_id);
        let sample = format!("नमस्ते, मैं {} हूँ।", persona.name);
        let preview_opts = SynthesisOptions {
            voice_id: persona.id.to_string(),
            ..opts.clone()
        };
        self.synthesize(&sample, &preview_opts, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::EncodedAudio;
    use async_trait::async_trait;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine;
    use narravox_audio::{CHANNELS, SAMPLE_RATE_HZ};
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    fn payload(samples: &[i16]) -> EncodedAudio {
        let bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        EncodedAudio {
            payload_b64: BASE64.encode(bytes),
            sample_rate: SAMPLE_RATE_HZ,
            channels: CHANNELS,
        }
    }

    struct ScriptedBackend {
        responses: Mutex<VecDeque<TtsResult<EncodedAudio>>>,
        requests: Mutex<Vec<SynthesisRequest>>,
    }

    impl ScriptedBackend {
        fn new(responses: Vec<TtsResult<EncodedAudio>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.requests.lock().len()
        }
    }

    #[async_trait]
    impl SynthesisBackend for ScriptedBackend {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn synthesize_chunk(&self, request: &SynthesisRequest) -> TtsResult<EncodedAudio> {
            self.requests.lock().push(request.clone());
            self.responses
                .lock()
                .pop_front()
                .unwrap_or_else(|| Err(TtsError::Backend("script exhausted".to_string())))
        }
    }

    struct StubCredentials {
        available: AtomicBool,
        requests: AtomicUsize,
    }

    impl StubCredentials {
        fn new(available: bool) -> Arc<Self> {
            Arc::new(Self {
                available: AtomicBool::new(available),
                requests: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl CredentialProvider for StubCredentials {
        fn has_credential(&self) -> bool {
            self.available.load(Ordering::SeqCst)
        }

        async fn request_credential(&self) {
            self.requests.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn client(
        backend: Arc<ScriptedBackend>,
        credentials: Arc<StubCredentials>,
    ) -> SynthesisClient {
        SynthesisClient::new(backend, credentials, &StudioConfig::default())
    }

    #[tokio::test(start_paused = true)]
    async fn single_chunk_returns_decoded_buffer() {
        let backend = ScriptedBackend::new(vec![Ok(payload(&[1, 2, 3]))]);
        let client = client(backend.clone(), StubCredentials::new(true));

        let buffer = client
            .synthesize("Short text.", &SynthesisOptions::default(), None)
            .await
            .unwrap();
        assert_eq!(buffer.samples, vec![1, 2, 3]);
        assert_eq!(buffer.sample_rate, SAMPLE_RATE_HZ);
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn chunks_are_merged_in_order_with_progress() {
        let backend = ScriptedBackend::new(vec![Ok(payload(&[1, 1])), Ok(payload(&[2, 2]))]);
        let client = client(backend.clone(), StubCredentials::new(true));

        // Two sentences, bound forces two chunks.
        let text = "First sentence here. Second sentence here.";
        let mut opts = SynthesisOptions::default();
        opts.voice_id = "Fenrir".to_string();
        let reported: Mutex<Vec<f32>> = Mutex::new(Vec::new());
        let report = |p: f32| reported.lock().push(p);

        let client = SynthesisClient {
            max_chunk_chars: 25,
            ..client
        };
        let buffer = client.synthesize(text, &opts, Some(&report)).await.unwrap();

        assert_eq!(buffer.samples, vec![1, 1, 2, 2]);
        assert_eq!(*reported.lock(), vec![50.0, 100.0]);
        assert_eq!(backend.calls(), 2);
        let first = backend.requests.lock()[0].clone();
        assert!(first.instruction.starts_with("Narrate this story part with a"));
        assert_eq!(first.voice_id, "Fenrir");
    }

    #[tokio::test(start_paused = true)]
    async fn quota_failures_are_retried_until_success() {
        let backend = ScriptedBackend::new(vec![
            Err(TtsError::QuotaExhausted("Quota exceeded".to_string())),
            Err(TtsError::QuotaExhausted("Quota exceeded".to_string())),
            Ok(payload(&[9])),
        ]);
        let client = client(backend.clone(), StubCredentials::new(true));

        let buffer = client
            .synthesize("Hello.", &SynthesisOptions::default(), None)
            .await
            .unwrap();
        assert_eq!(buffer.samples, vec![9]);
        assert_eq!(backend.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn safety_rejection_aborts_without_retry() {
        let backend = ScriptedBackend::new(vec![Err(TtsError::SafetyRejected(
            "blocked".to_string(),
        ))]);
        let credentials = StubCredentials::new(true);
        let client = client(backend.clone(), credentials.clone());

        let err = client
            .synthesize("Hello.", &SynthesisOptions::default(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, TtsError::SafetyRejected(_)));
        assert_eq!(backend.calls(), 1);
        assert_eq!(credentials.requests.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_auth_triggers_credential_flow() {
        let backend = ScriptedBackend::new(vec![Err(TtsError::AuthStale(
            "Requested entity was not found".to_string(),
        ))]);
        let credentials = StubCredentials::new(true);
        let client = client(backend.clone(), credentials.clone());

        let err = client
            .synthesize("Hello.", &SynthesisOptions::default(), None)
            .await
            .unwrap_err();
        assert!(err.needs_reauth());
        assert_eq!(credentials.requests.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn missing_credential_is_checked_before_any_call() {
        let backend = ScriptedBackend::new(vec![Ok(payload(&[1]))]);
        let credentials = StubCredentials::new(false);
        let client = client(backend.clone(), credentials.clone());

        let err = client
            .synthesize("Hello.", &SynthesisOptions::default(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, TtsError::MissingCredential));
        assert_eq!(backend.calls(), 0);
        assert_eq!(credentials.requests.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_retries_name_the_failing_chunk() {
        let backend = ScriptedBackend::new(vec![]);
        let client = client(backend.clone(), StubCredentials::new(true));

        let err = client
            .synthesize("Hello.", &SynthesisOptions::default(), None)
            .await
            .unwrap_err();
        match err {
            TtsError::ChunkFailed {
                index,
                attempts,
                last_error,
            } => {
                assert_eq!(index, 0);
                assert_eq!(attempts, 5);
                assert!(last_error.to_string().contains("script exhausted"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(backend.calls(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn persistent_quota_exhaustion_keeps_the_reauth_signal() {
        let responses = (0..5)
            .map(|_| Err(TtsError::QuotaExhausted("Quota exceeded".to_string())))
            .collect();
        let backend = ScriptedBackend::new(responses);
        let credentials = StubCredentials::new(true);
        let client = client(backend.clone(), credentials.clone());

        let err = client
            .synthesize("Hello.", &SynthesisOptions::default(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, TtsError::ChunkFailed { .. }));
        assert!(err.needs_reauth());
        assert_eq!(backend.calls(), 5);
        assert_eq!(credentials.requests.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_voice_falls_back_to_default_in_requests() {
        let backend = ScriptedBackend::new(vec![Ok(payload(&[1]))]);
        let client = client(backend.clone(), StubCredentials::new(true));

        let mut opts = SynthesisOptions::default();
        opts.voice_id = "Nobody".to_string();
        client.synthesize("Hello.", &opts, None).await.unwrap();
        assert_eq!(backend.requests.lock()[0].voice_id, "Kore");
    }

    #[tokio::test(start_paused = true)]
    async fn preview_uses_the_persona_sample_line() {
        let backend = ScriptedBackend::new(vec![Ok(payload(&[1]))]);
        let client = client(backend.clone(), StubCredentials::new(true));

        client
            .preview("Aoede", &SynthesisOptions::default())
            .await
            .unwrap();
        let request = backend.requests.lock()[0].clone();
        assert!(request.instruction.contains("नमस्ते"));
        assert!(request.instruction.contains("Aoede"));
        assert_eq!(request.voice_id, "Aoede");
    }
}
