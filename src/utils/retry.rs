use std::thread;
use std::time::Duration;

use tracing::warn;

use crate::clients::TextGenerator;
use crate::config::{MAX_RETRIES, RETRY_DELAY};
use crate::error::AppError;

/// Reintentos con cantidad y espera fijas (sin backoff)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: MAX_RETRIES,
            delay: RETRY_DELAY,
        }
    }
}

/// Llama al modelo hasta `max_attempts` veces.
///
/// `on_retry` se invoca antes de cada espera con el número de intento fallido
/// y el error. Si todos los intentos fallan se devuelve un texto vacío.
pub fn generate_with_retry<G, F>(
    generator: &G,
    prompt: &str,
    policy: &RetryPolicy,
    mut on_retry: F,
) -> String
where
    G: TextGenerator + ?Sized,
    F: FnMut(u32, &AppError),
{
    for attempt in 1..=policy.max_attempts {
        match generator.generate(prompt) {
            Ok(text) => return text,
            Err(e) => {
                warn!(attempt, max = policy.max_attempts, error = %e, "falló la llamada al modelo");
                if attempt < policy.max_attempts {
                    on_retry(attempt, &e);
                    thread::sleep(policy.delay);
                }
            }
        }
    }

    warn!(attempts = policy.max_attempts, "se agotaron los reintentos");
    String::new()
}
