use tokio::sync::mpsc;
use tracing::{debug, instrument};
use crate::voice_actor::{VoiceError, VoiceReply, VoiceRequest};

/// Client for the voice session; the entry point for speech and scanner input.
#[derive(Clone)]
pub struct VoiceClient {
    sender: mpsc::Sender<VoiceRequest>,
}

impl VoiceClient {
    pub fn new(sender: mpsc::Sender<VoiceRequest>) -> Self {
        Self { sender }
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), VoiceError> {
        debug!("Sending shutdown");
        self.sender
            .send(VoiceRequest::Shutdown)
            .await
            .map_err(|_| VoiceError::ActorCommunicationError("Actor closed".to_string()))
    }
}

client_method!(VoiceClient => fn submit_transcript(text: String) -> VoiceReply as VoiceRequest::Transcript, Error = VoiceError);
client_method!(VoiceClient => fn scan_barcode(code: String) -> VoiceReply as VoiceRequest::Barcode, Error = VoiceError);
