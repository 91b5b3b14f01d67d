use std::future::Future;

use crate::error::OperationalError;

/// Something that turns a prompt into raw linear-PCM audio.
///
/// The generate pipeline and the form server are generic over this so the
/// remote call can be swapped out.
pub trait SpeechSynth {
    fn synthesize(
        &self,
        api_key: &str,
        prompt: &str,
    ) -> impl Future<Output = Result<Vec<u8>, OperationalError>> + Send;
}
